/*!
 * Interop
 * Routes records of the `tracing` and `log` facades into the log stream
 */

pub mod log_bridge;
pub mod tracing_layer;

pub use log_bridge::LogBridge;
pub use tracing_layer::TelemetryLayer;

use crate::dispatch::{global, Dispatch};
use crate::core::Level;
use crate::strings::{DynamicString, StaticStringRef};

/// Dispatcher receiving forwarded records
#[derive(Debug, Clone, Default)]
pub(crate) enum Destination {
    /// Whatever dispatcher is installed when the record arrives
    #[default]
    Global,
    Fixed(Dispatch),
}

impl Destination {
    pub(crate) fn enabled(&self, level: Level) -> bool {
        match self {
            Destination::Global => global::log_enabled(level),
            Destination::Fixed(dispatch) => dispatch.log_enabled(level),
        }
    }

    pub(crate) fn log(&self, level: Level, target: StaticStringRef, msg: DynamicString) {
        match self {
            Destination::Global => global::log_interop(level, target, msg),
            Destination::Fixed(dispatch) => dispatch.log_interop(level, target, msg),
        }
    }

    pub(crate) fn flush(&self) {
        match self {
            Destination::Global => global::flush_log_stream(),
            Destination::Fixed(dispatch) => dispatch.flush_log_stream(),
        }
    }
}

/// Records emitted by this crate are not forwarded, so a failing upload
/// cannot feed its own error log back into the pipeline
pub(crate) fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(env!("CARGO_CRATE_NAME"))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}
