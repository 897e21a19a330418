/*!
 * Call-Site Macro Tests
 * Macros emitting through the global dispatcher
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::Arc;
use telemetry_capture::core::{sequential_guid_allocator, Level, LevelFilter, Verbosity};
use telemetry_capture::dispatch::global;
use telemetry_capture::events::{Descriptor, LogEvent, MetricEvent, ThreadEvent};
use telemetry_capture::{DispatchConfig, InMemorySink, ProcessInfo, StaticStringRef};

fn install(max_log_level: LevelFilter) -> Arc<InMemorySink> {
    let sink = Arc::new(InMemorySink::new());
    let new_guid = sequential_guid_allocator("macros");
    let process = Arc::new(ProcessInfo::current(&new_guid));
    let config = DispatchConfig {
        max_log_level,
        ..DispatchConfig::default()
    };
    assert!(global::init(new_guid, process, sink.clone(), config));
    sink
}

#[test]
#[serial]
fn test_log_macros_format_and_filter() {
    let sink = install(LevelFilter::Info);
    telemetry_capture::info!("loaded {} assets", 12);
    telemetry_capture::debug!("filtered {}", "out");
    telemetry_capture::error!(target: "net", "connection lost");
    telemetry_capture::log_static!(Level::Warn, "low memory");
    global::flush_log_stream();
    global::shutdown();

    let events: Vec<LogEvent> = sink.log_blocks()[0].events().iter().collect();
    let messages: Vec<&str> = events.iter().map(LogEvent::message).collect();
    assert_eq!(messages, vec!["loaded 12 assets", "connection lost", "low memory"]);
    assert_eq!(events[1].level(), Level::Error);
    match &events[1] {
        LogEvent::String(evt) => assert_eq!(evt.desc.target, "net"),
        other => panic!("unexpected event {:?}", other),
    }
    match &events[0] {
        LogEvent::String(evt) => {
            assert_eq!(evt.desc.fmt_str, "loaded {} assets");
            assert_eq!(evt.desc.target, module_path!());
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
#[serial]
fn test_each_call_site_has_one_descriptor() {
    let sink = install(LevelFilter::Trace);
    for i in 0..3u64 {
        telemetry_capture::imetric!("requests", "count", i);
    }
    telemetry_capture::fmetric!(lod: Verbosity::Max, "load", "ratio", 0.25);
    global::flush_metric_stream();
    global::shutdown();

    let events: Vec<MetricEvent> = sink.metric_blocks()[0].events().iter().collect();
    assert_eq!(events.len(), 4);
    let first = events[0].desc().id();
    assert!(events[..3].iter().all(|e| e.desc().id() == first));
    assert_ne!(events[3].desc().id(), first);
    assert_eq!(events[3].desc().lod, Verbosity::Max);
    assert_eq!(events[0].desc().name, "requests");
}

#[test]
#[serial]
fn test_span_guards_close_in_reverse_order() {
    let sink = install(LevelFilter::Trace);
    {
        let _outer = telemetry_capture::span_scope!("outer");
        let _inner = telemetry_capture::span_named!(StaticStringRef::intern("inner_dynamic"));
    }
    global::flush_current_thread_stream();
    global::shutdown();

    let events: Vec<ThreadEvent> = sink.thread_blocks()[0].events().iter().collect();
    let trace: Vec<(bool, &str)> = events.iter().map(|e| (e.is_begin(), e.name())).collect();
    assert_eq!(
        trace,
        vec![
            (true, "outer"),
            (true, "inner_dynamic"),
            (false, "inner_dynamic"),
            (false, "outer"),
        ]
    );
}

#[test]
#[serial]
fn test_macros_without_dispatcher_do_nothing() {
    global::shutdown();
    telemetry_capture::warn!("nobody listens {}", 1);
    telemetry_capture::imetric!("orphan", "count", 1);
    let _span = telemetry_capture::span_scope!("orphan");
}
