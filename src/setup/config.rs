/*!
 * Telemetry Configuration
 * Settings read from `TELEMETRY_*` environment variables
 */

use crate::core::limits::{DEFAULT_FLUSH_PERIOD, DEFAULT_MAX_RETRIES};
use crate::core::LevelFilter;
use crate::dispatch::DispatchConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const SINK_URL_ENV: &str = "TELEMETRY_SINK_URL";
pub const API_KEY_ENV: &str = "TELEMETRY_API_KEY";
pub const FLUSH_PERIOD_ENV: &str = "TELEMETRY_FLUSH_PERIOD_SECS";
pub const LOG_BUFFER_SIZE_ENV: &str = "TELEMETRY_LOG_BUFFER_SIZE";
pub const METRIC_BUFFER_SIZE_ENV: &str = "TELEMETRY_METRIC_BUFFER_SIZE";
pub const THREAD_BUFFER_SIZE_ENV: &str = "TELEMETRY_THREAD_BUFFER_SIZE";
pub const MAX_LEVEL_ENV: &str = "TELEMETRY_MAX_LEVEL";
pub const ENABLE_LOGS_ENV: &str = "TELEMETRY_ENABLE_LOGS";
pub const ENABLE_METRICS_ENV: &str = "TELEMETRY_ENABLE_METRICS";
pub const ENABLE_SPANS_ENV: &str = "TELEMETRY_ENABLE_SPANS";
pub const MAX_RETRIES_ENV: &str = "TELEMETRY_MAX_RETRIES";

/// Everything `init_telemetry` needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Ingestion endpoint; without one, telemetry is captured and discarded
    pub sink_url: Option<String>,
    pub api_key: Option<String>,
    pub flush_period: Duration,
    pub max_retries: u32,
    pub enable_logs: bool,
    pub enable_metrics: bool,
    pub enable_spans: bool,
    pub dispatch: DispatchConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sink_url: None,
            api_key: None,
            flush_period: DEFAULT_FLUSH_PERIOD,
            max_retries: DEFAULT_MAX_RETRIES,
            enable_logs: true,
            enable_metrics: true,
            enable_spans: true,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Read the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys keep their default and
    /// invalid values are reported and ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.sink_url = non_empty(SINK_URL_ENV);
        config.api_key = non_empty(API_KEY_ENV);

        if let Some(secs) = parse_var::<u64>(&lookup, FLUSH_PERIOD_ENV) {
            if secs == 0 {
                warn!(var = FLUSH_PERIOD_ENV, "flush period must be positive, using default");
            } else {
                config.flush_period = Duration::from_secs(secs);
            }
        }
        if let Some(retries) = parse_var(&lookup, MAX_RETRIES_ENV) {
            config.max_retries = retries;
        }
        if let Some(size) = parse_var(&lookup, LOG_BUFFER_SIZE_ENV) {
            config.dispatch.log_buffer_size = size;
        }
        if let Some(size) = parse_var(&lookup, METRIC_BUFFER_SIZE_ENV) {
            config.dispatch.metric_buffer_size = size;
        }
        if let Some(size) = parse_var(&lookup, THREAD_BUFFER_SIZE_ENV) {
            config.dispatch.thread_buffer_size = size;
        }
        if let Some(raw) = lookup(MAX_LEVEL_ENV) {
            match LevelFilter::parse(raw.trim()) {
                Some(level) => config.dispatch.max_log_level = level,
                None => warn!(var = MAX_LEVEL_ENV, value = %raw, "unknown level, using default"),
            }
        }
        if let Some(enabled) = parse_flag(&lookup, ENABLE_LOGS_ENV) {
            config.enable_logs = enabled;
        }
        if let Some(enabled) = parse_flag(&lookup, ENABLE_METRICS_ENV) {
            config.enable_metrics = enabled;
        }
        if let Some(enabled) = parse_flag(&lookup, ENABLE_SPANS_ENV) {
            config.enable_spans = enabled;
        }
        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = key, value = %raw, "invalid value, using default");
            None
        }
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(var = key, value = %raw, "invalid flag, using default");
            None
        }
    }
}
