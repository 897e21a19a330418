/*!
 * Sink Module
 * Destinations for process info, stream registrations and sealed blocks
 */

pub mod auth;
pub mod composite;
pub mod http;
pub mod memory;
pub mod null;
pub mod requests;
pub mod sampling;

use crate::process_info::ProcessInfo;
use crate::stream::{LogBlock, MetricBlock, StreamInfo, ThreadBlock};
use std::sync::Arc;

pub use auth::{ApiKeyAuthenticator, Authenticator, NoAuth};
pub use composite::CompositeEventSink;
pub use http::{HttpEventSink, HttpSinkConfig};
pub use memory::InMemorySink;
pub use null::NullEventSink;
pub use sampling::{CategoryToggles, SampleAll, SamplingController};

/// Receiver of everything the dispatcher produces
///
/// Called outside every producer lock. Implementations must not block on
/// slow work in these callbacks; queue it instead.
pub trait EventSink: Send + Sync {
    fn on_startup(&self, process_info: Arc<ProcessInfo>);
    fn on_shutdown(&self);

    fn on_init_log_stream(&self, stream: &StreamInfo);
    fn on_init_metric_stream(&self, stream: &StreamInfo);
    fn on_init_thread_stream(&self, stream: &StreamInfo);

    fn on_process_log_block(&self, block: Arc<LogBlock>);
    fn on_process_metric_block(&self, block: Arc<MetricBlock>);
    fn on_process_thread_block(&self, block: Arc<ThreadBlock>);

    /// Whether work is still queued or in flight
    fn is_busy(&self) -> bool;

    /// Credentials changed; work held back for authentication may proceed
    fn on_auth_updated(&self) {}
}
