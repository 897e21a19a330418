/*!
 * Dispatch Module
 * Event emission, block rotation and the process-wide dispatcher
 */

pub mod dispatcher;
pub mod flush_monitor;
pub mod global;
pub mod span_guard;
pub mod thread_streams;

pub use dispatcher::{Dispatch, DispatchConfig};
pub use flush_monitor::FlushMonitor;
pub use global::{current, init, is_initialized, shutdown, with_dispatch};
pub use span_guard::{NamedSpanGuard, SpanGuard};
pub use thread_streams::{ThreadStreamHandle, ThreadStreamRegistry};
