/*!
 * Heterogeneous Queue Tests
 * Replay order, framing and event accessors across the three event queues
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use telemetry_capture::core::{Level, Verbosity};
use telemetry_capture::events::{
    BeginThreadNamedSpanEvent, BeginThreadSpanEvent, EndThreadNamedSpanEvent, EndThreadSpanEvent,
    LogEvent, LogMetadata, LogQueue, LogStaticStrEvent, MetricEvent, MetricMetadata, MetricQueue, SpanLocation,
    SpanMetadata, TaggedFloatMetricEvent, TaggedIntegerMetricEvent, TaggedLogInteropEvent, TaggedLogString,
    ThreadEvent, ThreadQueue,
};
use telemetry_capture::properties::PropertySetStore;
use telemetry_capture::strings::{DynamicString, StaticStringRef};

static FRAME: SpanMetadata = SpanMetadata::new("frame", "queue_test", file!(), line!());
static LOAD: SpanLocation = SpanLocation::new("queue_test", file!(), line!());
static FPS: MetricMetadata = MetricMetadata::new(Verbosity::Min, "fps", "hz", "queue_test", file!(), line!());

#[test]
fn test_thread_queue_preserves_push_order() {
    let mut queue = ThreadQueue::with_capacity(1024);
    let level = StaticStringRef::from_static("level_01");

    queue.push(&BeginThreadSpanEvent { desc: &FRAME, time: 10 });
    queue.push(&BeginThreadNamedSpanEvent {
        location: &LOAD,
        name: level,
        time: 11,
    });
    queue.push(&EndThreadNamedSpanEvent {
        location: &LOAD,
        name: level,
        time: 12,
    });
    queue.push(&EndThreadSpanEvent { desc: &FRAME, time: 13 });

    let events: Vec<ThreadEvent> = queue.iter().collect();
    assert_eq!(events.len(), 4);
    assert_eq!(events.iter().map(ThreadEvent::time).collect::<Vec<_>>(), vec![10, 11, 12, 13]);
    assert_eq!(
        events.iter().map(ThreadEvent::is_begin).collect::<Vec<_>>(),
        vec![true, true, false, false]
    );
    assert_eq!(events[0].name(), "frame");
    assert_eq!(events[1].name(), "level_01");
}

#[test]
fn test_for_each_visits_every_record_once() {
    let store = PropertySetStore::new();
    let props = store.get_pairs(&[("gpu", "discrete")]);
    let mut queue = MetricQueue::with_capacity(256);
    for i in 0..10u64 {
        if i % 2 == 0 {
            queue.push(&TaggedIntegerMetricEvent {
                desc: &FPS,
                properties: props,
                value: i,
                time: i as i64,
            });
        } else {
            queue.push(&TaggedFloatMetricEvent {
                desc: &FPS,
                properties: props,
                value: i as f64 / 2.0,
                time: i as i64,
            });
        }
    }

    let mut ints = Vec::new();
    let mut floats = Vec::new();
    queue.for_each(|event| match event {
        MetricEvent::Integer(evt) => ints.push(evt.value),
        MetricEvent::Float(evt) => floats.push(evt.value),
    });
    assert_eq!(ints, vec![0, 2, 4, 6, 8]);
    assert_eq!(floats, vec![0.5, 1.5, 2.5, 3.5, 4.5]);
}

#[test]
fn test_static_records_have_no_length_prefix() {
    let mut queue = ThreadQueue::with_capacity(64);
    queue.push(&BeginThreadSpanEvent { desc: &FRAME, time: 0 });
    // tag + desc id + time
    assert_eq!(queue.len_bytes(), 1 + 8 + 8);
}

#[test]
fn test_capacity_is_a_soft_budget() {
    let mut queue = ThreadQueue::with_capacity(8);
    for t in 0..100 {
        queue.push(&BeginThreadSpanEvent { desc: &FRAME, time: t });
    }
    assert_eq!(queue.nb_events(), 100);
    assert_eq!(queue.iter().count(), 100);
}

proptest! {
    #[test]
    fn prop_interop_messages_survive_replay(messages in proptest::collection::vec(".{0,64}", 1..20)) {
        let store = PropertySetStore::new();
        let mut queue = LogQueue::with_capacity(1024);
        for (i, msg) in messages.iter().enumerate() {
            queue.push(&TaggedLogInteropEvent {
                time: i as i64,
                level: Level::Debug,
                target: StaticStringRef::from_static("prop"),
                properties: store.empty(),
                msg: DynamicString::from(msg.as_str()),
            });
        }
        let replayed: Vec<String> = queue.iter().map(|e: LogEvent| e.message().to_string()).collect();
        prop_assert_eq!(replayed, messages);
    }
}

// ============================================================================
// Mixed-sequence replay
// ============================================================================

static SAVED: LogMetadata = LogMetadata::new(Level::Info, "queue_test", "saved", file!(), line!());
static FAILED: LogMetadata = LogMetadata::new(Level::Error, "queue_test", "failed {}", file!(), line!());
static LOG_DESCS: [&LogMetadata; 2] = [&SAVED, &FAILED];

static HEAP: MetricMetadata = MetricMetadata::new(Verbosity::Max, "heap", "bytes", "queue_test", file!(), line!());
static METRIC_DESCS: [&MetricMetadata; 2] = [&FPS, &HEAP];

static TICK: SpanMetadata = SpanMetadata::new("tick", "queue_test", file!(), line!());
static SPAN_DESCS: [&SpanMetadata; 2] = [&FRAME, &TICK];

/// Everything observable about one record: variant, descriptor address and field values
#[derive(Debug, Clone, PartialEq)]
enum Record {
    LogStatic { desc: usize, time: i64 },
    LogString { desc: usize, properties: u64, time: i64, msg: String },
    LogInterop { time: i64, level: Level, target: String, properties: u64, msg: String },
    IntMetric { desc: usize, properties: u64, value: u64, time: i64 },
    FloatMetric { desc: usize, properties: u64, bits: u64, time: i64 },
    BeginSpan { desc: usize, time: i64 },
    EndSpan { desc: usize, time: i64 },
    BeginNamed { location: usize, name: String, time: i64 },
    EndNamed { location: usize, name: String, time: i64 },
}

fn addr<T>(value: &'static T) -> usize {
    value as *const T as usize
}

fn property_sets(store: &PropertySetStore) -> [&'static telemetry_capture::properties::PropertySet; 3] {
    [
        store.empty(),
        store.get_pairs(&[("map", "docks")]),
        store.get_pairs(&[("map", "docks"), ("mode", "coop")]),
    ]
}

fn level_strategy() -> impl Strategy<Value = Level> {
    (1u8..=6).prop_map(|v| Level::from_value(v).unwrap_or(Level::Info))
}

#[derive(Debug, Clone)]
enum LogOp {
    Static(usize, i64),
    Str(usize, usize, i64, String),
    Interop(i64, Level, String, usize, String),
}

fn log_op() -> impl Strategy<Value = LogOp> {
    prop_oneof![
        (0..2usize, any::<i64>()).prop_map(|(d, t)| LogOp::Static(d, t)),
        (0..2usize, 0..3usize, any::<i64>(), ".{0,48}").prop_map(|(d, p, t, m)| LogOp::Str(d, p, t, m)),
        (any::<i64>(), level_strategy(), "[a-z_:]{1,16}", 0..3usize, ".{0,48}")
            .prop_map(|(t, l, target, p, m)| LogOp::Interop(t, l, target, p, m)),
    ]
}

#[derive(Debug, Clone)]
enum MetricOp {
    Int(usize, usize, u64, i64),
    Float(usize, usize, f64, i64),
}

fn metric_op() -> impl Strategy<Value = MetricOp> {
    prop_oneof![
        (0..2usize, 0..3usize, any::<u64>(), any::<i64>()).prop_map(|(d, p, v, t)| MetricOp::Int(d, p, v, t)),
        (0..2usize, 0..3usize, any::<f64>(), any::<i64>()).prop_map(|(d, p, v, t)| MetricOp::Float(d, p, v, t)),
    ]
}

#[derive(Debug, Clone)]
enum ThreadOp {
    Begin(usize, i64),
    End(usize, i64),
    BeginNamed(String, i64),
    EndNamed(String, i64),
}

fn thread_op() -> impl Strategy<Value = ThreadOp> {
    prop_oneof![
        (0..2usize, any::<i64>()).prop_map(|(d, t)| ThreadOp::Begin(d, t)),
        (0..2usize, any::<i64>()).prop_map(|(d, t)| ThreadOp::End(d, t)),
        ("[a-z]{1,12}", any::<i64>()).prop_map(|(n, t)| ThreadOp::BeginNamed(n, t)),
        ("[a-z]{1,12}", any::<i64>()).prop_map(|(n, t)| ThreadOp::EndNamed(n, t)),
    ]
}

fn replay_log(queue: &LogQueue) -> Vec<Record> {
    queue
        .iter()
        .map(|event| match event {
            LogEvent::StaticStr(e) => Record::LogStatic { desc: addr(e.desc), time: e.time },
            LogEvent::String(e) => Record::LogString {
                desc: addr(e.desc),
                properties: e.properties.id().0,
                time: e.time,
                msg: e.msg.as_str().to_string(),
            },
            LogEvent::Interop(e) => Record::LogInterop {
                time: e.time,
                level: e.level,
                target: e.target.as_str().to_string(),
                properties: e.properties.id().0,
                msg: e.msg.as_str().to_string(),
            },
        })
        .collect()
}

fn replay_metrics(queue: &MetricQueue) -> Vec<Record> {
    queue
        .iter()
        .map(|event| match event {
            MetricEvent::Integer(e) => Record::IntMetric {
                desc: addr(e.desc),
                properties: e.properties.id().0,
                value: e.value,
                time: e.time,
            },
            MetricEvent::Float(e) => Record::FloatMetric {
                desc: addr(e.desc),
                properties: e.properties.id().0,
                bits: e.value.to_bits(),
                time: e.time,
            },
        })
        .collect()
}

fn replay_thread(queue: &ThreadQueue) -> Vec<Record> {
    queue
        .iter()
        .map(|event| match event {
            ThreadEvent::BeginScope(e) => Record::BeginSpan { desc: addr(e.desc), time: e.time },
            ThreadEvent::EndScope(e) => Record::EndSpan { desc: addr(e.desc), time: e.time },
            ThreadEvent::BeginNamed(e) => Record::BeginNamed {
                location: addr(e.location),
                name: e.name.as_str().to_string(),
                time: e.time,
            },
            ThreadEvent::EndNamed(e) => Record::EndNamed {
                location: addr(e.location),
                name: e.name.as_str().to_string(),
                time: e.time,
            },
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_mixed_log_sequences_replay_exactly(ops in proptest::collection::vec(log_op(), 0..40)) {
        let store = PropertySetStore::new();
        let sets = property_sets(&store);
        let mut queue = LogQueue::with_capacity(256);
        let mut expected = Vec::new();
        for op in ops {
            match op {
                LogOp::Static(d, time) => {
                    queue.push(&LogStaticStrEvent { desc: LOG_DESCS[d], time });
                    expected.push(Record::LogStatic { desc: addr(LOG_DESCS[d]), time });
                }
                LogOp::Str(d, p, time, msg) => {
                    queue.push(&TaggedLogString {
                        desc: LOG_DESCS[d],
                        properties: sets[p],
                        time,
                        msg: DynamicString::from(msg.as_str()),
                    });
                    expected.push(Record::LogString { desc: addr(LOG_DESCS[d]), properties: sets[p].id().0, time, msg });
                }
                LogOp::Interop(time, level, target, p, msg) => {
                    queue.push(&TaggedLogInteropEvent {
                        time,
                        level,
                        target: StaticStringRef::intern(&target),
                        properties: sets[p],
                        msg: DynamicString::from(msg.as_str()),
                    });
                    expected.push(Record::LogInterop { time, level, target, properties: sets[p].id().0, msg });
                }
            }
        }
        prop_assert_eq!(queue.nb_events(), expected.len());
        prop_assert_eq!(replay_log(&queue), expected);
    }

    #[test]
    fn prop_mixed_metric_sequences_replay_exactly(ops in proptest::collection::vec(metric_op(), 0..40)) {
        let store = PropertySetStore::new();
        let sets = property_sets(&store);
        let mut queue = MetricQueue::with_capacity(256);
        let mut expected = Vec::new();
        for op in ops {
            match op {
                MetricOp::Int(d, p, value, time) => {
                    queue.push(&TaggedIntegerMetricEvent { desc: METRIC_DESCS[d], properties: sets[p], value, time });
                    expected.push(Record::IntMetric { desc: addr(METRIC_DESCS[d]), properties: sets[p].id().0, value, time });
                }
                MetricOp::Float(d, p, value, time) => {
                    queue.push(&TaggedFloatMetricEvent { desc: METRIC_DESCS[d], properties: sets[p], value, time });
                    expected.push(Record::FloatMetric {
                        desc: addr(METRIC_DESCS[d]),
                        properties: sets[p].id().0,
                        bits: value.to_bits(),
                        time,
                    });
                }
            }
        }
        prop_assert_eq!(replay_metrics(&queue), expected);
    }

    #[test]
    fn prop_mixed_thread_sequences_replay_exactly(ops in proptest::collection::vec(thread_op(), 0..40)) {
        let mut queue = ThreadQueue::with_capacity(256);
        let mut expected = Vec::new();
        for op in ops {
            match op {
                ThreadOp::Begin(d, time) => {
                    queue.push(&BeginThreadSpanEvent { desc: SPAN_DESCS[d], time });
                    expected.push(Record::BeginSpan { desc: addr(SPAN_DESCS[d]), time });
                }
                ThreadOp::End(d, time) => {
                    queue.push(&EndThreadSpanEvent { desc: SPAN_DESCS[d], time });
                    expected.push(Record::EndSpan { desc: addr(SPAN_DESCS[d]), time });
                }
                ThreadOp::BeginNamed(name, time) => {
                    queue.push(&BeginThreadNamedSpanEvent { location: &LOAD, name: StaticStringRef::intern(&name), time });
                    expected.push(Record::BeginNamed { location: addr(&LOAD), name, time });
                }
                ThreadOp::EndNamed(name, time) => {
                    queue.push(&EndThreadNamedSpanEvent { location: &LOAD, name: StaticStringRef::intern(&name), time });
                    expected.push(Record::EndNamed { location: addr(&LOAD), name, time });
                }
            }
        }
        prop_assert_eq!(replay_thread(&queue), expected);
    }
}
