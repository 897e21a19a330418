/*!
 * Null Sink
 */

use super::EventSink;
use crate::process_info::ProcessInfo;
use crate::stream::{LogBlock, MetricBlock, StreamInfo, ThreadBlock};
use std::sync::Arc;

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn on_startup(&self, _process_info: Arc<ProcessInfo>) {}
    fn on_shutdown(&self) {}
    fn on_init_log_stream(&self, _stream: &StreamInfo) {}
    fn on_init_metric_stream(&self, _stream: &StreamInfo) {}
    fn on_init_thread_stream(&self, _stream: &StreamInfo) {}
    fn on_process_log_block(&self, _block: Arc<LogBlock>) {}
    fn on_process_metric_block(&self, _block: Arc<MetricBlock>) {}
    fn on_process_thread_block(&self, _block: Arc<ThreadBlock>) {}

    fn is_busy(&self) -> bool {
        false
    }
}
