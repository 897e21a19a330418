/*!
 * Setup
 * Environment configuration, diagnostics and one-call initialization
 */

pub mod config;
pub mod guard;
pub mod tracer;

pub use config::TelemetryConfig;
pub use guard::{init_telemetry, TelemetryGuard};
pub use tracer::init_tracing;
