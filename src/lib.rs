/*!
 * Telemetry Capture Library
 * In-process capture of logs, metrics and spans, shipped as binary blocks
 *
 * Application threads emit events into per-category streams. Full streams
 * seal their current block, which is handed to a sink together with the
 * dependencies (strings, descriptors, property sets) needed to decode it.
 */

pub mod core;
pub mod dependencies;
pub mod dispatch;
pub mod events;
pub mod interop;
mod macros;
pub mod process_info;
pub mod properties;
pub mod queue;
pub mod setup;
pub mod sink;
pub mod stream;
pub mod strings;

// Re-exports
pub use crate::core::{Level, LevelFilter, TelemetryError, TelemetryResult, Verbosity};
pub use dispatch::{Dispatch, DispatchConfig, FlushMonitor, NamedSpanGuard, SpanGuard};
pub use interop::{LogBridge, TelemetryLayer};
pub use process_info::ProcessInfo;
pub use setup::{init_telemetry, init_tracing, TelemetryConfig, TelemetryGuard};
pub use sink::{
    CompositeEventSink, EventSink, HttpEventSink, HttpSinkConfig, InMemorySink, NullEventSink,
};
pub use strings::StaticStringRef;
