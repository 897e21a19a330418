/*!
 * Events Module
 * Call-site descriptors and the record types of log, metric and thread queues
 */

pub mod log;
pub mod metadata;
pub mod metric;
pub mod span;

use crate::core::{Level, Verbosity};
use crate::queue::WireField;
use bytes::{Buf, BufMut, BytesMut};

pub use self::log::{LogEvent, LogQueue, LogStaticStrEvent, TaggedLogInteropEvent, TaggedLogString};
pub use metadata::{leak_descriptor, Descriptor, LogMetadata, MetricMetadata, SpanLocation, SpanMetadata};
pub use metric::{MetricEvent, MetricQueue, TaggedFloatMetricEvent, TaggedIntegerMetricEvent};
pub use span::{
    BeginThreadNamedSpanEvent, BeginThreadSpanEvent, EndThreadNamedSpanEvent, EndThreadSpanEvent,
    ThreadEvent, ThreadQueue,
};

impl WireField for Level {
    const STATIC_SIZE: Option<usize> = Some(1);
    const TYPE_NAME: &'static str = "Level";

    fn wire_size(&self) -> usize {
        1
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u8(self.as_u8());
    }

    fn get(buf: &mut &[u8]) -> Self {
        let value = buf.get_u8();
        Level::from_value(value).unwrap_or_else(|| panic!("invalid log level {}", value))
    }
}

impl WireField for Verbosity {
    const STATIC_SIZE: Option<usize> = Some(1);
    const TYPE_NAME: &'static str = "uint8";

    fn wire_size(&self) -> usize {
        1
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u8(self.as_u8());
    }

    fn get(buf: &mut &[u8]) -> Self {
        let value = buf.get_u8();
        Verbosity::from_value(value).unwrap_or_else(|| panic!("invalid verbosity {}", value))
    }
}
