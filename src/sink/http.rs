/*!
 * HTTP Sink
 * Uploads process, stream and block registrations from a background worker
 *
 * Callbacks only enqueue work. The worker holds queued work until the
 * authenticator is ready, then serializes and posts each item in order. It
 * also drives the flush monitor, so idle streams still ship their blocks.
 */

use super::auth::Authenticator;
use super::requests::{format_insert_process_request, format_insert_stream_request, InsertBlockRequest};
use super::sampling::SamplingController;
use super::EventSink;
use crate::core::limits::{
    DEFAULT_FLUSH_PERIOD, DEFAULT_MAX_RETRIES, INSERT_BLOCK_TIMEOUT, INSERT_PROCESS_TIMEOUT,
    INSERT_STREAM_TIMEOUT, INSERT_THREAD_BLOCK_TIMEOUT, WORKER_WAKEUP_PERIOD,
};
use crate::core::{default_guid_allocator, NewGuid, TelemetryError, TelemetryResult, Verbosity};
use crate::dependencies::ExtractDependencies;
use crate::dispatch::{global, Dispatch, FlushMonitor};
use crate::process_info::ProcessInfo;
use crate::stream::{EventBlock, LogBlock, MetricBlock, StreamInfo, ThreadBlock};
use arc_swap::ArcSwapOption;
use flume::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use reqwest::blocking::{Client, Request};
use reqwest::header::CONTENT_TYPE;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Endpoint and delivery settings of an `HttpEventSink`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSinkConfig {
    /// Prefix of the `insert_process`, `insert_stream` and `insert_block` routes
    pub base_url: String,
    /// Retries after a failed upload; 0 sends every request once
    pub max_retries: u32,
    /// Period of the flush monitor run by the worker; `None` disables it
    pub flush_period: Option<Duration>,
    pub user_agent: String,
}

impl HttpSinkConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            flush_period: Some(DEFAULT_FLUSH_PERIOD),
            user_agent: concat!("telemetry-capture/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Full URL of a route, whether or not `base_url` ends with a slash
    pub fn route(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

// ============================================================================
// Worker Protocol
// ============================================================================

type Job = Box<dyn FnOnce(&Uploader) + Send>;

enum WorkerCommand {
    Job(Job),
    /// Re-check authentication and the flush monitor
    Wake,
    Shutdown,
}

/// State shared by the callbacks and the worker
struct SinkState {
    queue_size: AtomicUsize,
    process: ArcSwapOption<ProcessInfo>,
}

/// Posts signed requests with bounded retries
struct Uploader {
    client: Client,
    config: HttpSinkConfig,
    auth: Arc<dyn Authenticator>,
}

impl Uploader {
    fn post(&self, route: &str, body: Vec<u8>, timeout: Duration) -> TelemetryResult<()> {
        let url = self.config.route(route);
        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .timeout(timeout)
            .body(body)
            .build()?;
        self.auth.sign(&mut request)?;

        let mut attempt = 0;
        loop {
            let retry = if attempt < self.config.max_retries {
                request.try_clone()
            } else {
                None
            };
            let err = match self.send(request) {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
            match retry {
                Some(next) if err.is_retryable() => {
                    attempt += 1;
                    warn!(url = %url, attempt, error = %err, "telemetry upload failed, retrying");
                    request = next;
                }
                _ => return Err(err),
            }
        }
    }

    fn send(&self, request: Request) -> TelemetryResult<()> {
        let url = request.url().to_string();
        let response = self.client.execute(request)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(TelemetryError::UnexpectedStatus {
            status: status.as_u16(),
            url,
            body: response.text().unwrap_or_default(),
        })
    }

    fn upload(&self, what: &'static str, route: &str, body: TelemetryResult<Vec<u8>>, timeout: Duration) {
        let result = body.and_then(|body| self.post(route, body, timeout));
        match result {
            Ok(()) => debug!(request = what, "telemetry request sent"),
            Err(e @ TelemetryError::Signing(_)) => {
                warn!(request = what, error = %e, "dropping unsigned telemetry request")
            }
            Err(e) => error!(request = what, error = %e, "telemetry request failed"),
        }
    }
}

// ============================================================================
// Sink
// ============================================================================

/// Sink uploading everything to an ingestion service over HTTP
pub struct HttpEventSink {
    sender: Sender<WorkerCommand>,
    state: Arc<SinkState>,
    sampling: Arc<dyn SamplingController>,
    new_guid: NewGuid,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HttpEventSink {
    /// Build the client and start the worker thread
    pub fn new(
        config: HttpSinkConfig,
        auth: Arc<dyn Authenticator>,
        sampling: Arc<dyn SamplingController>,
    ) -> TelemetryResult<Self> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            TelemetryError::Configuration(format!("invalid sink url {:?}: {}", config.base_url, e))
        })?;
        let client = Client::builder().user_agent(config.user_agent.clone()).build()?;

        let state = Arc::new(SinkState {
            queue_size: AtomicUsize::new(0),
            process: ArcSwapOption::empty(),
        });
        let (sender, receiver) = flume::unbounded();
        let monitor = config.flush_period.map(FlushMonitor::new);
        let base_url = config.base_url.clone();
        let uploader = Uploader {
            client,
            config,
            auth,
        };
        let worker_state = state.clone();
        let worker = std::thread::Builder::new()
            .name("telemetry-sink".to_string())
            .spawn(move || run_worker(receiver, worker_state, uploader, monitor))
            .map_err(|e| TelemetryError::Configuration(format!("cannot start sink worker: {}", e)))?;

        info!(base_url = %base_url, "http telemetry sink started");
        Ok(Self {
            sender,
            state,
            sampling,
            new_guid: default_guid_allocator(),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Number of requests queued or being sent
    pub fn queue_size(&self) -> usize {
        self.state.queue_size.load(Ordering::Acquire)
    }

    fn enqueue(&self, job: Job) {
        let size = self.state.queue_size.fetch_add(1, Ordering::AcqRel) + 1;
        if self.sender.send(WorkerCommand::Job(job)).is_err() {
            self.state.queue_size.fetch_sub(1, Ordering::AcqRel);
            debug!(error = %TelemetryError::SinkShutDown, "telemetry request discarded");
            return;
        }
        crate::imetric!(lod: Verbosity::Max, "telemetry_sink_queue_size", "count", size as u64);
    }

    fn enqueue_stream(&self, stream: &StreamInfo) {
        let stream = stream.clone();
        self.enqueue(Box::new(move |uploader| {
            uploader.upload(
                "stream",
                "insert_stream",
                format_insert_stream_request(&stream),
                INSERT_STREAM_TIMEOUT,
            );
        }));
    }

    fn enqueue_block<E>(&self, block: Arc<EventBlock<E>>, timeout: Duration)
    where
        E: ExtractDependencies + Send + Sync + 'static,
    {
        let state = self.state.clone();
        let block_id = (self.new_guid)();
        self.enqueue(Box::new(move |uploader| {
            let Some(process) = state.process.load_full() else {
                warn!(stream_id = block.stream_id(), "block sent before process registration, dropped");
                return;
            };
            let body = InsertBlockRequest::new(&process.process_id, block_id, &block).encode();
            uploader.upload("block", "insert_block", body, timeout);
        }));
    }
}

impl EventSink for HttpEventSink {
    fn on_startup(&self, process_info: Arc<ProcessInfo>) {
        self.state.process.store(Some(process_info.clone()));
        self.enqueue(Box::new(move |uploader| {
            uploader.upload(
                "process",
                "insert_process",
                format_insert_process_request(&process_info),
                INSERT_PROCESS_TIMEOUT,
            );
        }));
    }

    /// Stop the worker once everything queued so far has been handled
    ///
    /// Work still waiting for authentication is dropped.
    fn on_shutdown(&self) {
        let Some(worker) = self.worker.lock().take() else {
            return;
        };
        let _ = self.sender.send(WorkerCommand::Shutdown);
        if worker.join().is_err() {
            error!("telemetry sink worker panicked");
        }
        info!("http telemetry sink stopped");
    }

    fn on_init_log_stream(&self, stream: &StreamInfo) {
        self.enqueue_stream(stream);
    }

    fn on_init_metric_stream(&self, stream: &StreamInfo) {
        self.enqueue_stream(stream);
    }

    fn on_init_thread_stream(&self, stream: &StreamInfo) {
        self.enqueue_stream(stream);
    }

    fn on_process_log_block(&self, block: Arc<LogBlock>) {
        if self.sampling.should_sample_log_block(&block) {
            self.enqueue_block(block, INSERT_BLOCK_TIMEOUT);
        }
    }

    fn on_process_metric_block(&self, block: Arc<MetricBlock>) {
        if self.sampling.should_sample_metric_block(&block) {
            self.enqueue_block(block, INSERT_BLOCK_TIMEOUT);
        }
    }

    fn on_process_thread_block(&self, block: Arc<ThreadBlock>) {
        if self.sampling.should_sample_thread_block(&block) {
            self.enqueue_block(block, INSERT_THREAD_BLOCK_TIMEOUT);
        }
    }

    fn is_busy(&self) -> bool {
        self.queue_size() > 0
    }

    fn on_auth_updated(&self) {
        let _ = self.sender.send(WorkerCommand::Wake);
    }
}

impl Drop for HttpEventSink {
    fn drop(&mut self) {
        if self.worker.get_mut().is_some() {
            let _ = self.sender.send(WorkerCommand::Shutdown);
        }
    }
}

// ============================================================================
// Worker Loop
// ============================================================================

/// The global dispatcher, if it is the one this sink was started by
///
/// A dispatcher built directly with `Dispatch::new` is not reachable from
/// here; its owner flushes it.
fn feeding_dispatch(state: &SinkState) -> Option<Dispatch> {
    let process = state.process.load_full()?;
    global::current().filter(|dispatch| Arc::ptr_eq(dispatch.process_info(), &process))
}

fn run_worker(
    receiver: Receiver<WorkerCommand>,
    state: Arc<SinkState>,
    uploader: Uploader,
    monitor: Option<FlushMonitor>,
) {
    let mut pending: VecDeque<Job> = VecDeque::new();
    let mut shutting_down = false;

    loop {
        let wait = monitor
            .as_ref()
            .map_or(WORKER_WAKEUP_PERIOD, |m| m.time_to_flush().min(WORKER_WAKEUP_PERIOD));
        let first = match receiver.recv_timeout(wait) {
            Ok(command) => Some(command),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(WorkerCommand::Shutdown),
        };
        for command in first.into_iter().chain(receiver.try_iter()) {
            match command {
                WorkerCommand::Job(job) => pending.push_back(job),
                WorkerCommand::Wake => {}
                WorkerCommand::Shutdown => shutting_down = true,
            }
        }

        if !shutting_down {
            // Flushed blocks come back through the channel on the next turn
            if let Some(monitor) = &monitor {
                match feeding_dispatch(&state) {
                    Some(dispatch) => monitor.tick_with(&dispatch),
                    None => monitor.skip_if_due(),
                };
            }
        }

        if uploader.auth.is_ready() {
            while let Some(job) = pending.pop_front() {
                job(&uploader);
                let remaining = state.queue_size.fetch_sub(1, Ordering::AcqRel) - 1;
                crate::imetric!(lod: Verbosity::Max, "telemetry_sink_queue_size", "count", remaining as u64);
            }
        }

        if shutting_down {
            break;
        }
    }

    if !pending.is_empty() {
        warn!(
            dropped = pending.len(),
            "telemetry sink stopped before authentication was ready"
        );
        state.queue_size.fetch_sub(pending.len(), Ordering::AcqRel);
    }
}
