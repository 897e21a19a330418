/*!
 * Log Bridge
 * `log::Log` implementation feeding the log stream
 */

use super::{is_own_target, Destination};
use crate::core::{Level, TelemetryError, TelemetryResult};
use crate::dispatch::Dispatch;
use crate::strings::StaticStringRef;

/// Forwards `log` records as interop log entries
///
/// Targets are interned once each, so they should come from a bounded set
/// (module paths usually do).
#[derive(Debug, Default)]
pub struct LogBridge {
    destination: Destination,
}

impl LogBridge {
    /// Forward to the global dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward to a specific dispatcher
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            destination: Destination::Fixed(dispatch),
        }
    }

    /// Install as the `log` crate's logger, forwarding to the global dispatcher
    pub fn install(max_level: log::LevelFilter) -> TelemetryResult<()> {
        static BRIDGE: LogBridge = LogBridge {
            destination: Destination::Global,
        };
        log::set_logger(&BRIDGE)
            .map_err(|e| TelemetryError::Configuration(format!("cannot install log bridge: {}", e)))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        !is_own_target(metadata.target()) && self.destination.enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = match record.module_path_static() {
            Some(path) if path == record.target() => StaticStringRef::from_static(path),
            _ => StaticStringRef::intern(record.target()),
        };
        self.destination.log(
            Level::from(record.level()),
            target,
            record.args().to_string().into(),
        );
    }

    fn flush(&self) {
        self.destination.flush();
    }
}
