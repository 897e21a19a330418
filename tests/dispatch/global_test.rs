/*!
 * Global Dispatcher Tests
 * Lifecycle of the process-wide dispatcher
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::Arc;
use telemetry_capture::core::{sequential_guid_allocator, Level};
use telemetry_capture::dispatch::global;
use telemetry_capture::events::{LogEvent, LogMetadata};
use telemetry_capture::{DispatchConfig, InMemorySink, ProcessInfo};

static HELLO: LogMetadata = LogMetadata::new(Level::Info, "global", "hello", file!(), line!());

fn install() -> Arc<InMemorySink> {
    let sink = Arc::new(InMemorySink::new());
    let new_guid = sequential_guid_allocator("global");
    let process = Arc::new(ProcessInfo::current(&new_guid));
    assert!(global::init(new_guid, process, sink.clone(), DispatchConfig::default()));
    sink
}

#[test]
#[serial]
fn test_emission_without_dispatcher_is_silent() {
    global::shutdown();
    assert!(!global::is_initialized());
    assert!(!global::log_enabled(Level::Fatal));
    global::log_static(&HELLO);
    global::log(&HELLO, "dropped");
    global::flush_log_stream();
    global::set_context("k", "v");
    assert!(global::property_set(&[("k", "v")]).is_none());
    assert!(!global::init_current_thread_stream());
}

#[test]
#[serial]
fn test_second_init_keeps_first_dispatcher() {
    let sink = install();
    let other = Arc::new(InMemorySink::new());
    let new_guid = sequential_guid_allocator("other");
    let process = Arc::new(ProcessInfo::current(&new_guid));
    assert!(!global::init(new_guid, process, other.clone(), DispatchConfig::default()));
    assert_eq!(other.startup_count(), 0);

    global::log(&HELLO, "first");
    global::flush_log_stream();
    assert_eq!(sink.log_blocks().len(), 1);
    assert_eq!(other.block_count(), 0);
    global::shutdown();
}

#[test]
#[serial]
fn test_shutdown_notifies_sink_once() {
    let sink = install();
    global::log(&HELLO, "pending");
    global::shutdown();
    global::shutdown();
    assert_eq!(sink.shutdown_count(), 1);
    // Pending events are not flushed by shutdown itself
    assert_eq!(sink.log_blocks().len(), 0);

    global::log(&HELLO, "after shutdown");
    global::flush_log_stream();
    assert_eq!(sink.log_blocks().len(), 0);
}

#[test]
#[serial]
fn test_context_applies_to_global_logs() {
    let sink = install();
    global::set_context("session", "42");
    global::log(&HELLO, "with session");
    global::unset_context("session");
    global::log(&HELLO, "without session");
    global::flush_log_stream();
    global::shutdown();

    let events: Vec<LogEvent> = sink.log_blocks()[0].events().iter().collect();
    let sessions: Vec<Option<&str>> = events
        .iter()
        .map(|e| match e {
            LogEvent::String(evt) => evt.properties.get("session"),
            _ => None,
        })
        .collect();
    assert_eq!(sessions, vec![Some("42"), None]);
}
