/*!
 * Telemetry Guard
 * One-call initialization of the global dispatcher, undone on drop
 */

use super::config::TelemetryConfig;
use crate::core::{default_guid_allocator, TelemetryResult};
use crate::dispatch::global;
use crate::process_info::ProcessInfo;
use crate::sink::{
    ApiKeyAuthenticator, Authenticator, CategoryToggles, EventSink, HttpEventSink, HttpSinkConfig, NoAuth,
    NullEventSink,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Keeps the global dispatcher installed
///
/// Dropping it flushes the log and metric streams and the calling thread's
/// span stream, then shuts the dispatcher down.
#[must_use = "telemetry shuts down when the guard is dropped"]
pub struct TelemetryGuard {
    installed: bool,
    sink: Arc<dyn EventSink>,
}

impl TelemetryGuard {
    /// False when another dispatcher was already installed; this guard then
    /// leaves it alone
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if !self.installed {
            return;
        }
        global::flush_log_stream();
        global::flush_metric_stream();
        global::flush_current_thread_stream();
        global::shutdown();
    }
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}

/// Build the sink and install the global dispatcher
///
/// Uploads over HTTP when a sink URL is configured; otherwise events are
/// captured and discarded.
pub fn init_telemetry(config: TelemetryConfig) -> TelemetryResult<TelemetryGuard> {
    let sink = build_sink(&config)?;
    let new_guid = default_guid_allocator();
    let process = Arc::new(ProcessInfo::current(&new_guid));

    let installed = global::init(new_guid, process, sink.clone(), config.dispatch.clone());
    if installed {
        info!(
            http = config.sink_url.is_some(),
            max_level = ?config.dispatch.max_log_level,
            "telemetry initialized"
        );
    } else {
        debug!("telemetry already initialized, keeping the running dispatcher");
    }
    Ok(TelemetryGuard { installed, sink })
}

fn build_sink(config: &TelemetryConfig) -> TelemetryResult<Arc<dyn EventSink>> {
    let Some(url) = &config.sink_url else {
        return Ok(Arc::new(NullEventSink));
    };
    let auth: Arc<dyn Authenticator> = match &config.api_key {
        Some(key) => Arc::new(ApiKeyAuthenticator::new(key)?),
        None => Arc::new(NoAuth),
    };
    let sampling = Arc::new(CategoryToggles::new(
        config.enable_logs,
        config.enable_metrics,
        config.enable_spans,
    ));
    let mut http = HttpSinkConfig::new(url.clone());
    http.max_retries = config.max_retries;
    http.flush_period = Some(config.flush_period);
    Ok(Arc::new(HttpEventSink::new(http, auth, sampling)?))
}
