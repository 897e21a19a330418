/*!
 * In-Memory Sink
 * Records every callback for inspection
 */

use super::EventSink;
use crate::process_info::ProcessInfo;
use crate::stream::{LogBlock, MetricBlock, StreamInfo, ThreadBlock};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Recorded {
    process: Option<Arc<ProcessInfo>>,
    log_streams: Vec<StreamInfo>,
    metric_streams: Vec<StreamInfo>,
    thread_streams: Vec<StreamInfo>,
    log_blocks: Vec<Arc<LogBlock>>,
    metric_blocks: Vec<Arc<MetricBlock>>,
    thread_blocks: Vec<Arc<ThreadBlock>>,
}

/// Sink keeping everything it receives in memory
#[derive(Default)]
pub struct InMemorySink {
    recorded: Mutex<Recorded>,
    startups: AtomicUsize,
    shutdowns: AtomicUsize,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_info(&self) -> Option<Arc<ProcessInfo>> {
        self.recorded.lock().process.clone()
    }

    pub fn startup_count(&self) -> usize {
        self.startups.load(Ordering::Acquire)
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::Acquire)
    }

    pub fn log_streams(&self) -> Vec<StreamInfo> {
        self.recorded.lock().log_streams.clone()
    }

    pub fn metric_streams(&self) -> Vec<StreamInfo> {
        self.recorded.lock().metric_streams.clone()
    }

    pub fn thread_streams(&self) -> Vec<StreamInfo> {
        self.recorded.lock().thread_streams.clone()
    }

    pub fn log_blocks(&self) -> Vec<Arc<LogBlock>> {
        self.recorded.lock().log_blocks.clone()
    }

    pub fn metric_blocks(&self) -> Vec<Arc<MetricBlock>> {
        self.recorded.lock().metric_blocks.clone()
    }

    pub fn thread_blocks(&self) -> Vec<Arc<ThreadBlock>> {
        self.recorded.lock().thread_blocks.clone()
    }

    /// Total number of blocks received, all categories
    pub fn block_count(&self) -> usize {
        let recorded = self.recorded.lock();
        recorded.log_blocks.len() + recorded.metric_blocks.len() + recorded.thread_blocks.len()
    }
}

impl EventSink for InMemorySink {
    fn on_startup(&self, process_info: Arc<ProcessInfo>) {
        self.startups.fetch_add(1, Ordering::AcqRel);
        self.recorded.lock().process = Some(process_info);
    }

    fn on_shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::AcqRel);
    }

    fn on_init_log_stream(&self, stream: &StreamInfo) {
        self.recorded.lock().log_streams.push(stream.clone());
    }

    fn on_init_metric_stream(&self, stream: &StreamInfo) {
        self.recorded.lock().metric_streams.push(stream.clone());
    }

    fn on_init_thread_stream(&self, stream: &StreamInfo) {
        self.recorded.lock().thread_streams.push(stream.clone());
    }

    fn on_process_log_block(&self, block: Arc<LogBlock>) {
        self.recorded.lock().log_blocks.push(block);
    }

    fn on_process_metric_block(&self, block: Arc<MetricBlock>) {
        self.recorded.lock().metric_blocks.push(block);
    }

    fn on_process_thread_block(&self, block: Arc<ThreadBlock>) {
        self.recorded.lock().thread_blocks.push(block);
    }

    fn is_busy(&self) -> bool {
        false
    }
}
