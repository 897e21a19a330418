/*!
 * Diagnostics Tracing
 * Subscriber for the crate's own diagnostics and the host's `tracing` events
 */

use crate::interop::TelemetryLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable switching the fmt output to JSON
pub const TRACE_JSON_ENV: &str = "TELEMETRY_TRACE_JSON";

/// Install the global `tracing` subscriber
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - TELEMETRY_TRACE_JSON: Enable JSON output (default: false)
///
/// With `capture` set, events are also forwarded to the telemetry log stream
/// through a `TelemetryLayer`. Does nothing if a subscriber is already set.
pub fn init_tracing(capture: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(capture.then(TelemetryLayer::new));

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .with_file(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, capture, "diagnostics tracing initialized");
    }
}
