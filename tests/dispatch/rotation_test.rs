/*!
 * Block Rotation Tests
 * Full and forced rotations of the log and metric streams
 */

use super::common::{assert_contiguous, dispatch_with, small_buffers};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use telemetry_capture::core::{Level, LevelFilter, Verbosity};
use telemetry_capture::events::{Descriptor, LogEvent, LogMetadata, MetricMetadata};
use telemetry_capture::DispatchConfig;

static NOTICE: LogMetadata = LogMetadata::new(Level::Info, "rotation", "notice {}", file!(), line!());
static VERBOSE: LogMetadata = LogMetadata::new(Level::Trace, "rotation", "chatter", file!(), line!());
static LATENCY: MetricMetadata =
    MetricMetadata::new(Verbosity::Med, "latency", "ms", "rotation", file!(), line!());

#[test]
fn test_streams_are_registered_at_creation() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    assert_eq!(sink.startup_count(), 1);
    let logs = sink.log_streams();
    let metrics = sink.metric_streams();
    assert_eq!(logs.len(), 1);
    assert_eq!(metrics.len(), 1);
    assert!(logs[0].has_tag("log"));
    assert!(metrics[0].has_tag("metrics"));
    assert_eq!(logs[0].process_id, dispatch.process_info().process_id);
    assert_eq!(dispatch.log_stream_info(), logs[0]);
    assert!(!logs[0].objects_metadata.is_empty());
    assert!(!logs[0].dependencies_metadata.is_empty());
}

#[test]
fn test_full_log_stream_ships_contiguous_blocks() {
    let (dispatch, sink) = dispatch_with(small_buffers(512));
    for i in 0..100 {
        dispatch.log(&NOTICE, format!("notice {}", i));
    }
    let rotated = sink.log_blocks().len();
    assert!(rotated > 1, "expected several rotations, got {}", rotated);

    dispatch.flush_log_stream();
    let blocks = sink.log_blocks();
    assert_eq!(assert_contiguous(&blocks), 100);

    let messages: Vec<String> = blocks
        .iter()
        .flat_map(|b| b.events().iter().map(|e: LogEvent| e.message().to_string()).collect::<Vec<_>>())
        .collect();
    assert_eq!(messages.first().map(String::as_str), Some("notice 0"));
    assert_eq!(messages.last().map(String::as_str), Some("notice 99"));
}

#[test]
fn test_flushing_empty_stream_is_a_no_op() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    dispatch.flush_log_stream();
    dispatch.flush_metric_stream();
    assert_eq!(sink.block_count(), 0);

    dispatch.int_metric(&LATENCY, 3);
    dispatch.flush_metric_stream();
    dispatch.flush_metric_stream();
    let blocks = sink.metric_blocks();
    assert_eq!(blocks.len(), 1);

    // The next block continues after the flushed one
    dispatch.int_metric(&LATENCY, 4);
    dispatch.flush_metric_stream();
    let blocks = sink.metric_blocks();
    assert_eq!(blocks[1].object_offset(), 1);
    assert_eq!(assert_contiguous(&blocks), 2);
}

#[test]
fn test_block_times_are_ordered() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    dispatch.log_static(&NOTICE);
    dispatch.flush_log_stream();
    let block = &sink.log_blocks()[0];
    assert!(block.begin().ticks <= block.end().ticks);
    assert!(block.begin().time <= block.end().time);
}

#[test]
fn test_disabled_levels_are_dropped() {
    let config = DispatchConfig {
        max_log_level: LevelFilter::Info,
        ..DispatchConfig::default()
    };
    let (dispatch, sink) = dispatch_with(config);
    assert!(!dispatch.log_enabled(Level::Debug));
    dispatch.log_static(&VERBOSE);
    dispatch.log(&VERBOSE, "ignored");
    dispatch.log_static(&NOTICE);
    dispatch.flush_log_stream();

    let blocks = sink.log_blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].nb_events(), 1);
    let first = blocks[0].events().iter().next();
    assert!(matches!(first, Some(LogEvent::StaticStr(e)) if e.desc.id() == NOTICE.id()));
}

#[test]
fn test_concurrent_producers_lose_nothing() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let (dispatch, sink) = dispatch_with(small_buffers(2048));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let dispatch = dispatch.clone();
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    dispatch.int_metric(&LATENCY, (t * PER_THREAD + i) as u64);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer panicked");
    }
    dispatch.flush_metric_stream();

    let blocks = sink.metric_blocks();
    assert_eq!(assert_contiguous(&blocks), THREADS * PER_THREAD);

    // Replay in stream order; each producer's values must come back in push order
    let mut ordered: Vec<_> = blocks.iter().collect();
    ordered.sort_by_key(|b| b.object_offset());
    let mut last_seen: Vec<Option<u64>> = vec![None; THREADS];
    let mut total = 0;
    for block in ordered {
        for event in block.events().iter() {
            let telemetry_capture::events::MetricEvent::Integer(evt) = event else {
                panic!("unexpected float metric");
            };
            let producer = evt.value as usize / PER_THREAD;
            assert!(producer < THREADS, "value {} out of range", evt.value);
            if let Some(previous) = last_seen[producer] {
                assert!(
                    evt.value == previous + 1,
                    "producer {} out of order: {} after {}",
                    producer,
                    evt.value,
                    previous
                );
            } else {
                assert_eq!(evt.value, (producer * PER_THREAD) as u64);
            }
            last_seen[producer] = Some(evt.value);
            total += 1;
        }
    }
    assert_eq!(total, THREADS * PER_THREAD);
    for (producer, last) in last_seen.iter().enumerate() {
        assert_eq!(*last, Some(((producer + 1) * PER_THREAD - 1) as u64));
    }
    assert!(Arc::strong_count(&sink) >= 2);
}

#[test]
fn test_default_context_tags_entries() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    dispatch.default_context().set("map", "harbor");
    dispatch.log(&NOTICE, "tagged");
    dispatch.default_context().clear();
    dispatch.log(&NOTICE, "untagged");
    dispatch.flush_log_stream();

    let events: Vec<LogEvent> = sink.log_blocks()[0].events().iter().collect();
    match (&events[0], &events[1]) {
        (LogEvent::String(tagged), LogEvent::String(untagged)) => {
            assert_eq!(tagged.properties.get("map"), Some("harbor"));
            assert!(untagged.properties.is_empty());
        }
        other => panic!("unexpected events {:?}", other),
    }
}
