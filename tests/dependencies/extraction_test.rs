/*!
 * Dependency Extraction Tests
 * Every referenced object is defined once, before anything refers to it
 */

use ahash::AHashSet;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use telemetry_capture::core::{Level, ObjectId, Verbosity};
use telemetry_capture::dependencies::{ExtractDependencies, LogDependency, MetricDependency, ThreadDependency};
use telemetry_capture::events::{
    BeginThreadNamedSpanEvent, BeginThreadSpanEvent, Descriptor, LogEvent, LogMetadata, LogQueue,
    LogStaticStrEvent, MetricEvent, MetricMetadata, MetricQueue, SpanLocation, SpanMetadata,
    TaggedIntegerMetricEvent, TaggedLogString, ThreadEvent, ThreadQueue,
};
use telemetry_capture::properties::PropertySetStore;
use telemetry_capture::strings::{DynamicString, StaticStringRef};

static CPU: MetricMetadata = MetricMetadata::new(Verbosity::Min, "cpu", "percent", "deps", file!(), line!());
static MEM: MetricMetadata = MetricMetadata::new(Verbosity::Min, "mem", "bytes", "deps", file!(), line!());
static NET: MetricMetadata = MetricMetadata::new(Verbosity::Med, "net", "bytes", "deps", file!(), line!());
static DISK: MetricMetadata = MetricMetadata::new(Verbosity::Max, "disk", "bytes", "deps", file!(), line!());
static ALL_METRICS: [&MetricMetadata; 4] = [&CPU, &MEM, &NET, &DISK];

static SAVED: LogMetadata = LogMetadata::new(Level::Info, "deps", "saved {}", file!(), line!());
static SPAN: SpanMetadata = SpanMetadata::new("tick", "deps", file!(), line!());
static LOCATION: SpanLocation = SpanLocation::new("deps", file!(), line!());

fn metric_queue(store: &PropertySetStore, descs: &[&'static MetricMetadata]) -> MetricQueue {
    let mut queue = MetricQueue::with_capacity(1024);
    for (i, desc) in descs.iter().copied().enumerate() {
        queue.push(&TaggedIntegerMetricEvent {
            desc,
            properties: store.empty(),
            value: i as u64,
            time: i as i64,
        });
    }
    queue
}

fn metadata_ids(deps: &telemetry_capture::dependencies::MetricDependencyQueue) -> Vec<ObjectId> {
    deps.iter()
        .filter_map(|dep| match dep {
            MetricDependency::Metadata(meta) => Some(meta.id),
            _ => None,
        })
        .collect()
}

#[test]
fn test_three_metrics_give_three_metadata_records() {
    let store = PropertySetStore::new();
    let queue = metric_queue(&store, &[&CPU, &MEM, &NET]);
    let deps = MetricEvent::extract(&queue);

    assert_eq!(queue.nb_events(), 3);
    assert_eq!(metadata_ids(&deps), vec![CPU.id(), MEM.id(), NET.id()]);
}

#[test]
fn test_strings_precede_the_records_using_them() {
    let store = PropertySetStore::new();
    let props = store.get_pairs(&[("zone", "eu-west")]);
    let mut queue = LogQueue::with_capacity(512);
    queue.push(&TaggedLogString {
        desc: &SAVED,
        properties: props,
        time: 1,
        msg: DynamicString::from("saved slot 2"),
    });
    queue.push(&LogStaticStrEvent { desc: &SAVED, time: 2 });

    let mut defined: AHashSet<ObjectId> = AHashSet::new();
    let mut metadata = 0;
    for dep in LogEvent::extract(&queue).iter() {
        match dep {
            LogDependency::StaticString(s) => {
                assert!(defined.insert(s.id), "string {} defined twice", s.id);
            }
            LogDependency::Metadata(meta) => {
                metadata += 1;
                for string in [meta.target, meta.fmt_str, meta.file] {
                    assert!(defined.contains(&string.id()), "{} used before definition", string.as_str());
                }
                assert_eq!(meta.level, Level::Info);
                assert!(defined.insert(meta.id));
            }
            LogDependency::PropertySet(set) => {
                for property in set.set.properties() {
                    assert!(defined.contains(&property.name.id()));
                    assert!(defined.contains(&property.value.id()));
                }
                assert!(defined.insert(set.set.id()));
            }
            LogDependency::Property(_) => panic!("properties are only listed in the manifest"),
        }
    }
    assert_eq!(metadata, 1);
    assert!(defined.contains(&props.id()));
}

#[test]
fn test_thread_dependencies_cover_named_spans() {
    let name = StaticStringRef::intern("stream_chunk_7");
    let mut queue = ThreadQueue::with_capacity(256);
    queue.push(&BeginThreadSpanEvent { desc: &SPAN, time: 0 });
    queue.push(&BeginThreadNamedSpanEvent {
        location: &LOCATION,
        name,
        time: 1,
    });

    let deps: Vec<ThreadDependency> = ThreadEvent::extract(&queue).iter().collect();
    assert!(deps.iter().any(|d| matches!(d, ThreadDependency::SpanMetadata(m) if m.id == SPAN.id())));
    assert!(deps.iter().any(|d| matches!(d, ThreadDependency::SpanLocation(l) if l.id == LOCATION.id())));
    assert!(deps
        .iter()
        .any(|d| matches!(d, ThreadDependency::StaticString(s) if s.id == name.id() && s.as_str() == "stream_chunk_7")));
}

#[test]
fn test_empty_block_has_no_dependencies() {
    let queue = MetricQueue::with_capacity(16);
    assert!(MetricEvent::extract(&queue).is_empty());
}

proptest! {
    #[test]
    fn prop_metadata_is_deduplicated_in_first_sight_order(picks in proptest::collection::vec(0usize..4, 1..64)) {
        let store = PropertySetStore::new();
        let descs: Vec<&'static MetricMetadata> = picks.iter().map(|&i| ALL_METRICS[i]).collect();
        let queue = metric_queue(&store, &descs);

        let mut expected = Vec::new();
        for desc in &descs {
            if !expected.contains(&desc.id()) {
                expected.push(desc.id());
            }
        }
        prop_assert_eq!(metadata_ids(&MetricEvent::extract(&queue)), expected);
    }
}
