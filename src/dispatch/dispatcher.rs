/*!
 * Dispatcher
 * Owns the log, metric and thread streams and rotates their blocks to the sink
 *
 * Every emission path runs in two phases: a short critical section that
 * pushes the event and, if the stream is full, swaps in a fresh block and
 * returns the sealed one; then, with no lock held, the sealed block is
 * handed to the sink.
 */

use super::thread_streams::{
    begin_initializing, current_thread_properties, end_initializing, has_local_stream,
    install_local_stream, with_local_stream, LocalStream, ThreadStreamHandle, ThreadStreamRegistry,
};
use crate::core::id::AtomicGenerator;
use crate::core::limits::{
    DEFAULT_LOG_BUFFER_SIZE, DEFAULT_METRIC_BUFFER_SIZE, DEFAULT_THREAD_BUFFER_SIZE,
};
use crate::core::{now_ticks, DualTime, Level, LevelFilter, NewGuid};
use crate::events::{
    BeginThreadNamedSpanEvent, BeginThreadSpanEvent, EndThreadNamedSpanEvent, EndThreadSpanEvent,
    LogEvent, LogMetadata, LogStaticStrEvent, MetricEvent, MetricMetadata, SpanLocation,
    SpanMetadata, TaggedFloatMetricEvent, TaggedIntegerMetricEvent, TaggedLogInteropEvent,
    TaggedLogString, ThreadEvent,
};
use crate::process_info::ProcessInfo;
use crate::properties::{DefaultContext, PropertySet, PropertySetStore};
use crate::queue::QueueMember;
use crate::sink::EventSink;
use crate::stream::{EventBlock, LogStream, MetricStream, StreamInfo, ThreadStream};
use crate::strings::{DynamicString, StaticStringRef};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

static DISPATCH_IDS: AtomicGenerator = AtomicGenerator::new(1);

/// Block sizes and log level of a dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub log_buffer_size: usize,
    pub metric_buffer_size: usize,
    pub thread_buffer_size: usize,
    pub max_log_level: LevelFilter,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            log_buffer_size: DEFAULT_LOG_BUFFER_SIZE,
            metric_buffer_size: DEFAULT_METRIC_BUFFER_SIZE,
            thread_buffer_size: DEFAULT_THREAD_BUFFER_SIZE,
            max_log_level: LevelFilter::Trace,
        }
    }
}

pub(crate) struct DispatchInner {
    id: u64,
    new_guid: NewGuid,
    sink: Arc<dyn EventSink>,
    process: Arc<ProcessInfo>,
    config: DispatchConfig,
    log_stream: Mutex<LogStream>,
    metric_stream: Mutex<MetricStream>,
    thread_streams: ThreadStreamRegistry,
    property_sets: Arc<PropertySetStore>,
    default_context: DefaultContext,
}

impl DispatchInner {
    pub(crate) fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }
}

/// Handle to a dispatcher; clones share the same streams
#[derive(Clone)]
pub struct Dispatch {
    inner: Arc<DispatchInner>,
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("id", &self.inner.id)
            .field("process_id", &self.inner.process.process_id)
            .field("config", &self.inner.config)
            .finish()
    }
}

impl Dispatch {
    /// Create the log and metric streams and announce them to the sink
    pub fn new(
        new_guid: NewGuid,
        process: Arc<ProcessInfo>,
        sink: Arc<dyn EventSink>,
        config: DispatchConfig,
    ) -> Self {
        sink.on_startup(process.clone());

        let now = DualTime::now();
        let log_stream = LogStream::new(
            process.process_id.clone(),
            EventBlock::new(new_guid(), now, config.log_buffer_size, 0),
            vec!["log".to_string()],
            BTreeMap::new(),
        );
        let metric_stream = MetricStream::new(
            process.process_id.clone(),
            EventBlock::new(new_guid(), now, config.metric_buffer_size, 0),
            vec!["metrics".to_string()],
            BTreeMap::new(),
        );
        let log_info = log_stream.info();
        let metric_info = metric_stream.info();

        let property_sets = Arc::new(PropertySetStore::new());
        let inner = Arc::new(DispatchInner {
            id: DISPATCH_IDS.next(),
            new_guid,
            sink,
            process,
            config,
            log_stream: Mutex::new(log_stream),
            metric_stream: Mutex::new(metric_stream),
            thread_streams: ThreadStreamRegistry::default(),
            default_context: DefaultContext::new(property_sets.clone()),
            property_sets,
        });

        inner.sink.on_init_log_stream(&log_info);
        inner.sink.on_init_metric_stream(&metric_info);
        debug!(
            dispatch_id = inner.id,
            log_stream = %log_info.stream_id,
            metric_stream = %metric_info.stream_id,
            "dispatcher initialized"
        );
        Self { inner }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn process_info(&self) -> &Arc<ProcessInfo> {
        &self.inner.process
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.inner.sink
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    pub fn property_set_store(&self) -> &Arc<PropertySetStore> {
        &self.inner.property_sets
    }

    pub fn default_context(&self) -> &DefaultContext {
        &self.inner.default_context
    }

    /// Canonical property set for a list of pairs
    pub fn property_set<K: AsRef<str>, V: AsRef<str>>(&self, pairs: &[(K, V)]) -> &'static PropertySet {
        self.inner.property_sets.get_pairs(pairs)
    }

    pub fn log_stream_info(&self) -> StreamInfo {
        self.inner.log_stream.lock().info()
    }

    pub fn metric_stream_info(&self) -> StreamInfo {
        self.inner.metric_stream.lock().info()
    }

    #[inline]
    pub fn log_enabled(&self, level: Level) -> bool {
        self.inner.config.max_log_level.allows(level)
    }

    // ========================================================================
    // Logs
    // ========================================================================

    /// Log the call site's format string as the message
    pub fn log_static(&self, desc: &'static LogMetadata) {
        if !self.log_enabled(desc.level) {
            return;
        }
        self.queue_log_entry(&LogStaticStrEvent {
            desc,
            time: now_ticks(),
        });
    }

    /// Log a formatted message tagged with the default context
    pub fn log(&self, desc: &'static LogMetadata, msg: impl Into<DynamicString>) {
        let properties = self.inner.default_context.current();
        self.log_with_properties(desc, properties, msg);
    }

    pub fn log_with_properties(
        &self,
        desc: &'static LogMetadata,
        properties: &'static PropertySet,
        msg: impl Into<DynamicString>,
    ) {
        if !self.log_enabled(desc.level) {
            return;
        }
        self.queue_log_entry(&TaggedLogString {
            desc,
            properties,
            time: now_ticks(),
            msg: msg.into(),
        });
    }

    /// Log an entry coming from another logging facade
    pub fn log_interop(&self, level: Level, target: StaticStringRef, msg: impl Into<DynamicString>) {
        if !self.log_enabled(level) {
            return;
        }
        self.queue_log_entry(&TaggedLogInteropEvent {
            time: now_ticks(),
            level,
            target,
            properties: self.inner.default_context.current(),
            msg: msg.into(),
        });
    }

    fn queue_log_entry<T: QueueMember<LogEvent>>(&self, event: &T) {
        let sealed = {
            let mut stream = self.inner.log_stream.lock();
            stream.push(event);
            if stream.is_full() {
                stream.rotate(DualTime::now())
            } else {
                None
            }
        };
        if let Some(block) = sealed {
            self.inner.sink.on_process_log_block(Arc::new(block));
        }
    }

    /// Ship the current log block, if it has any event
    pub fn flush_log_stream(&self) {
        let sealed = self.inner.log_stream.lock().rotate(DualTime::now());
        if let Some(block) = sealed {
            self.inner.sink.on_process_log_block(Arc::new(block));
        }
    }

    // ========================================================================
    // Metrics
    // ========================================================================

    pub fn int_metric(&self, desc: &'static MetricMetadata, value: u64) {
        let properties = self.inner.default_context.current();
        self.int_metric_with_properties(desc, properties, value);
    }

    pub fn int_metric_with_properties(
        &self,
        desc: &'static MetricMetadata,
        properties: &'static PropertySet,
        value: u64,
    ) {
        self.queue_metric(&TaggedIntegerMetricEvent {
            desc,
            properties,
            value,
            time: now_ticks(),
        });
    }

    pub fn float_metric(&self, desc: &'static MetricMetadata, value: f64) {
        let properties = self.inner.default_context.current();
        self.float_metric_with_properties(desc, properties, value);
    }

    pub fn float_metric_with_properties(
        &self,
        desc: &'static MetricMetadata,
        properties: &'static PropertySet,
        value: f64,
    ) {
        self.queue_metric(&TaggedFloatMetricEvent {
            desc,
            properties,
            value,
            time: now_ticks(),
        });
    }

    fn queue_metric<T: QueueMember<MetricEvent>>(&self, event: &T) {
        let sealed = {
            let mut stream = self.inner.metric_stream.lock();
            stream.push(event);
            if stream.is_full() {
                stream.rotate(DualTime::now())
            } else {
                None
            }
        };
        if let Some(block) = sealed {
            self.inner.sink.on_process_metric_block(Arc::new(block));
        }
    }

    /// Ship the current metric block, if it has any event
    pub fn flush_metric_stream(&self) {
        let sealed = self.inner.metric_stream.lock().rotate(DualTime::now());
        if let Some(block) = sealed {
            self.inner.sink.on_process_metric_block(Arc::new(block));
        }
    }

    // ========================================================================
    // Spans
    // ========================================================================

    pub fn begin_scope(&self, desc: &'static SpanMetadata) {
        self.queue_thread_event(&BeginThreadSpanEvent {
            desc,
            time: now_ticks(),
        });
    }

    pub fn end_scope(&self, desc: &'static SpanMetadata) {
        self.queue_thread_event(&EndThreadSpanEvent {
            desc,
            time: now_ticks(),
        });
    }

    pub fn begin_named_span(&self, location: &'static SpanLocation, name: StaticStringRef) {
        self.queue_thread_event(&BeginThreadNamedSpanEvent {
            location,
            name,
            time: now_ticks(),
        });
    }

    pub fn end_named_span(&self, location: &'static SpanLocation, name: StaticStringRef) {
        self.queue_thread_event(&EndThreadNamedSpanEvent {
            location,
            name,
            time: now_ticks(),
        });
    }

    fn queue_thread_event<T: QueueMember<ThreadEvent>>(&self, event: &T) {
        if !self.init_current_thread_stream() {
            return;
        }
        let sealed = with_local_stream(self.inner.id, |local| {
            local.stream.push(event);
            local.rotate_if_needed()
        })
        .flatten();
        if let Some(block) = sealed {
            self.inner.sink.on_process_thread_block(Arc::new(block));
        }
    }

    /// Create the calling thread's stream now rather than on its first span
    ///
    /// Returns false when the stream cannot be created, which happens when
    /// stream creation itself emits spans on this thread.
    pub fn init_current_thread_stream(&self) -> bool {
        if has_local_stream(self.inner.id) {
            return true;
        }
        if !begin_initializing() {
            return false;
        }
        let (local, info) = self.alloc_thread_stream();
        self.inner.sink.on_init_thread_stream(&info);
        let installed = install_local_stream(local);
        end_initializing();
        installed
    }

    fn alloc_thread_stream(&self) -> (LocalStream, StreamInfo) {
        let stream = ThreadStream::new(
            self.inner.process.process_id.clone(),
            EventBlock::new(
                (self.inner.new_guid)(),
                DualTime::now(),
                self.inner.config.thread_buffer_size,
                0,
            ),
            vec!["cpu".to_string()],
            current_thread_properties().into_iter().collect(),
        );
        let info = stream.info();
        let handle = Arc::new(ThreadStreamHandle::new(info.stream_id.clone()));
        self.inner.thread_streams.register(handle.clone());
        let local = LocalStream::new(self.inner.id, Arc::downgrade(&self.inner), stream, handle);
        (local, info)
    }

    /// Ship the calling thread's current block, if it has any event
    pub fn flush_current_thread_stream(&self) {
        let sealed = with_local_stream(self.inner.id, |local| {
            local.handle.take_flush_request();
            local.stream.rotate(DualTime::now())
        })
        .flatten();
        if let Some(block) = sealed {
            self.inner.sink.on_process_thread_block(Arc::new(block));
        }
    }

    /// Make every thread stream rotate on its owner's next span
    pub fn mark_all_thread_streams_full(&self) {
        self.inner.thread_streams.mark_all_full();
    }

    /// Number of thread streams whose thread is still alive
    pub fn thread_stream_count(&self) -> usize {
        self.inner.thread_streams.len()
    }

    pub fn thread_stream_ids(&self) -> Vec<String> {
        self.inner.thread_streams.stream_ids()
    }
}
