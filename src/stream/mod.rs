/*!
 * Stream Module
 * Event blocks, streams and their registration info
 */

pub mod block;
pub mod event_stream;
pub mod info;

pub use block::{EventBlock, LogBlock, MetricBlock, ThreadBlock};
pub use event_stream::{EventStream, LogStream, MetricStream, ThreadStream};
pub use info::StreamInfo;
