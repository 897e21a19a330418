/*!
 * Composite Sink
 * Fans every callback out to several sinks
 */

use super::EventSink;
use crate::process_info::ProcessInfo;
use crate::stream::{LogBlock, MetricBlock, StreamInfo, ThreadBlock};
use std::sync::Arc;

pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeEventSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for CompositeEventSink {
    fn on_startup(&self, process_info: Arc<ProcessInfo>) {
        for sink in &self.sinks {
            sink.on_startup(process_info.clone());
        }
    }

    fn on_shutdown(&self) {
        for sink in &self.sinks {
            sink.on_shutdown();
        }
    }

    fn on_init_log_stream(&self, stream: &StreamInfo) {
        for sink in &self.sinks {
            sink.on_init_log_stream(stream);
        }
    }

    fn on_init_metric_stream(&self, stream: &StreamInfo) {
        for sink in &self.sinks {
            sink.on_init_metric_stream(stream);
        }
    }

    fn on_init_thread_stream(&self, stream: &StreamInfo) {
        for sink in &self.sinks {
            sink.on_init_thread_stream(stream);
        }
    }

    fn on_process_log_block(&self, block: Arc<LogBlock>) {
        for sink in &self.sinks {
            sink.on_process_log_block(block.clone());
        }
    }

    fn on_process_metric_block(&self, block: Arc<MetricBlock>) {
        for sink in &self.sinks {
            sink.on_process_metric_block(block.clone());
        }
    }

    fn on_process_thread_block(&self, block: Arc<ThreadBlock>) {
        for sink in &self.sinks {
            sink.on_process_thread_block(block.clone());
        }
    }

    fn is_busy(&self) -> bool {
        self.sinks.iter().any(|sink| sink.is_busy())
    }

    fn on_auth_updated(&self) {
        for sink in &self.sinks {
            sink.on_auth_updated();
        }
    }
}
