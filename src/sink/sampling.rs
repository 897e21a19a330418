/*!
 * Sampling
 * Decides which sealed blocks are worth uploading
 */

use crate::stream::{LogBlock, MetricBlock, ThreadBlock};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-block upload decision
///
/// Consulted by the HTTP sink before a block is serialized. A rejected block
/// is dropped without being compressed.
pub trait SamplingController: Send + Sync {
    fn should_sample_log_block(&self, block: &LogBlock) -> bool;
    fn should_sample_metric_block(&self, block: &MetricBlock) -> bool;
    fn should_sample_thread_block(&self, block: &ThreadBlock) -> bool;
}

/// Uploads every block
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleAll;

impl SamplingController for SampleAll {
    fn should_sample_log_block(&self, _block: &LogBlock) -> bool {
        true
    }

    fn should_sample_metric_block(&self, _block: &MetricBlock) -> bool {
        true
    }

    fn should_sample_thread_block(&self, _block: &ThreadBlock) -> bool {
        true
    }
}

/// Enables or disables whole categories at runtime
#[derive(Debug)]
pub struct CategoryToggles {
    logs: AtomicBool,
    metrics: AtomicBool,
    spans: AtomicBool,
}

impl CategoryToggles {
    pub fn new(logs: bool, metrics: bool, spans: bool) -> Self {
        Self {
            logs: AtomicBool::new(logs),
            metrics: AtomicBool::new(metrics),
            spans: AtomicBool::new(spans),
        }
    }

    pub fn set_logs_enabled(&self, enabled: bool) {
        self.logs.store(enabled, Ordering::Relaxed);
    }

    pub fn set_metrics_enabled(&self, enabled: bool) {
        self.metrics.store(enabled, Ordering::Relaxed);
    }

    pub fn set_spans_enabled(&self, enabled: bool) {
        self.spans.store(enabled, Ordering::Relaxed);
    }

    pub fn logs_enabled(&self) -> bool {
        self.logs.load(Ordering::Relaxed)
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics.load(Ordering::Relaxed)
    }

    pub fn spans_enabled(&self) -> bool {
        self.spans.load(Ordering::Relaxed)
    }
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}

impl SamplingController for CategoryToggles {
    fn should_sample_log_block(&self, _block: &LogBlock) -> bool {
        self.logs_enabled()
    }

    fn should_sample_metric_block(&self, _block: &MetricBlock) -> bool {
        self.metrics_enabled()
    }

    fn should_sample_thread_block(&self, _block: &ThreadBlock) -> bool {
        self.spans_enabled()
    }
}
