/*!
 * Flush Monitor Tests
 * Periodic flushing of idle streams
 */

use super::common::dispatch_with;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Barrier};
use std::time::Duration;
use telemetry_capture::core::Level;
use telemetry_capture::events::{LogMetadata, SpanMetadata};
use serial_test::serial;
use telemetry_capture::dispatch::global;
use telemetry_capture::{DispatchConfig, FlushMonitor};

static IDLE: LogMetadata = LogMetadata::new(Level::Info, "monitor", "idle", file!(), line!());
static STEP: SpanMetadata = SpanMetadata::new("step", "monitor", file!(), line!());

#[test]
fn test_tick_before_period_does_nothing() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    let monitor = FlushMonitor::new(Duration::from_secs(3600));
    dispatch.log_static(&IDLE);

    let remaining = monitor.tick_with(&dispatch);
    assert!(remaining > Duration::ZERO);
    assert!(remaining <= monitor.period());
    assert_eq!(sink.block_count(), 0);
}

#[test]
fn test_skipped_period_rearms_the_monitor() {
    let monitor = FlushMonitor::new(Duration::from_millis(20));
    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(monitor.time_to_flush(), Duration::ZERO);

    assert_eq!(monitor.skip_if_due(), monitor.period());
    assert!(monitor.time_to_flush() > Duration::ZERO);
}

#[test]
#[serial]
fn test_due_tick_without_dispatcher_waits_a_full_period() {
    assert!(!global::is_initialized());
    let monitor = FlushMonitor::new(Duration::from_millis(20));
    std::thread::sleep(Duration::from_millis(40));

    assert_eq!(monitor.tick(), monitor.period());
    assert!(monitor.time_to_flush() > Duration::ZERO);
}

#[test]
fn test_due_tick_flushes_pending_events() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    let monitor = FlushMonitor::new(Duration::ZERO);
    dispatch.log_static(&IDLE);

    assert_eq!(monitor.tick_with(&dispatch), Duration::ZERO);
    assert_eq!(sink.log_blocks().len(), 1);
    assert_eq!(sink.metric_blocks().len(), 0);
}

#[test]
fn test_ticks_without_events_ship_nothing() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    let monitor = FlushMonitor::new(Duration::ZERO);
    monitor.tick_with(&dispatch);
    monitor.tick_with(&dispatch);
    assert_eq!(sink.block_count(), 0);
}

#[test]
fn test_other_threads_rotate_on_their_next_span() {
    let (dispatch, sink) = dispatch_with(DispatchConfig::default());
    let monitor = FlushMonitor::new(Duration::ZERO);
    let barrier = Arc::new(Barrier::new(2));

    let worker = {
        let dispatch = dispatch.clone();
        let barrier = barrier.clone();
        std::thread::spawn(move || {
            dispatch.begin_scope(&STEP);
            dispatch.end_scope(&STEP);
            barrier.wait();
            barrier.wait();
            dispatch.begin_scope(&STEP);
            barrier.wait();
            barrier.wait();
        })
    };

    barrier.wait();
    monitor.flush(&dispatch);
    assert_eq!(sink.thread_blocks().len(), 0, "only the owner may rotate its stream");
    barrier.wait();

    barrier.wait();
    let blocks = sink.thread_blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].nb_events(), 3);
    barrier.wait();
    worker.join().expect("worker panicked");

    // The worker's new block was empty at exit
    assert_eq!(sink.thread_blocks().len(), 1);
}
