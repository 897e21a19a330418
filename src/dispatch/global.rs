/*!
 * Global Dispatcher
 * Process-wide dispatcher with explicit init/shutdown
 *
 * Emission functions load the current dispatcher with a single atomic
 * pointer read. When none is installed (before `init` or after `shutdown`)
 * they do nothing.
 */

use super::dispatcher::{Dispatch, DispatchConfig};
use crate::core::{Level, NewGuid};
use crate::events::{LogMetadata, MetricMetadata, SpanLocation, SpanMetadata};
use crate::process_info::ProcessInfo;
use crate::properties::PropertySet;
use crate::sink::EventSink;
use crate::strings::{DynamicString, StaticStringRef};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

static GLOBAL: ArcSwapOption<Dispatch> = ArcSwapOption::const_empty();

/// Serializes init and shutdown
static LIFECYCLE: Mutex<()> = parking_lot::const_mutex(());

/// Install the process-wide dispatcher
///
/// Returns false, leaving the running dispatcher untouched, if one is
/// already installed.
pub fn init(
    new_guid: NewGuid,
    process: Arc<ProcessInfo>,
    sink: Arc<dyn EventSink>,
    config: DispatchConfig,
) -> bool {
    let _lifecycle = LIFECYCLE.lock();
    if GLOBAL.load().is_some() {
        debug!("telemetry dispatcher already initialized");
        return false;
    }
    let dispatch = Dispatch::new(new_guid, process, sink, config);
    info!(
        process_id = %dispatch.process_info().process_id,
        "telemetry dispatcher installed"
    );
    GLOBAL.store(Some(Arc::new(dispatch)));
    true
}

/// Uninstall the dispatcher and notify its sink
///
/// Pending blocks are not flushed; flush explicitly before shutting down to
/// keep them.
pub fn shutdown() {
    let _lifecycle = LIFECYCLE.lock();
    if let Some(dispatch) = GLOBAL.swap(None) {
        dispatch.sink().on_shutdown();
        info!(
            process_id = %dispatch.process_info().process_id,
            "telemetry dispatcher shut down"
        );
    }
}

pub fn is_initialized() -> bool {
    GLOBAL.load().is_some()
}

/// Clone of the installed dispatcher handle
pub fn current() -> Option<Dispatch> {
    GLOBAL.load().as_deref().cloned()
}

/// Run `f` against the installed dispatcher, if any
#[inline]
pub fn with_dispatch<R>(f: impl FnOnce(&Dispatch) -> R) -> Option<R> {
    let guard = GLOBAL.load();
    guard.as_deref().map(f)
}

// ============================================================================
// Emission
// ============================================================================

#[inline]
pub fn log_enabled(level: Level) -> bool {
    with_dispatch(|d| d.log_enabled(level)).unwrap_or(false)
}

pub fn log_static(desc: &'static LogMetadata) {
    with_dispatch(|d| d.log_static(desc));
}

pub fn log(desc: &'static LogMetadata, msg: impl Into<DynamicString>) {
    with_dispatch(|d| d.log(desc, msg));
}

pub fn log_with_properties(
    desc: &'static LogMetadata,
    properties: &'static PropertySet,
    msg: impl Into<DynamicString>,
) {
    with_dispatch(|d| d.log_with_properties(desc, properties, msg));
}

pub fn log_interop(level: Level, target: StaticStringRef, msg: impl Into<DynamicString>) {
    with_dispatch(|d| d.log_interop(level, target, msg));
}

pub fn int_metric(desc: &'static MetricMetadata, value: u64) {
    with_dispatch(|d| d.int_metric(desc, value));
}

pub fn int_metric_with_properties(desc: &'static MetricMetadata, properties: &'static PropertySet, value: u64) {
    with_dispatch(|d| d.int_metric_with_properties(desc, properties, value));
}

pub fn float_metric(desc: &'static MetricMetadata, value: f64) {
    with_dispatch(|d| d.float_metric(desc, value));
}

pub fn float_metric_with_properties(desc: &'static MetricMetadata, properties: &'static PropertySet, value: f64) {
    with_dispatch(|d| d.float_metric_with_properties(desc, properties, value));
}

pub fn begin_scope(desc: &'static SpanMetadata) {
    with_dispatch(|d| d.begin_scope(desc));
}

pub fn end_scope(desc: &'static SpanMetadata) {
    with_dispatch(|d| d.end_scope(desc));
}

pub fn begin_named_span(location: &'static SpanLocation, name: StaticStringRef) {
    with_dispatch(|d| d.begin_named_span(location, name));
}

pub fn end_named_span(location: &'static SpanLocation, name: StaticStringRef) {
    with_dispatch(|d| d.end_named_span(location, name));
}

/// Canonical property set for a list of pairs, `None` when uninitialized
pub fn property_set<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> Option<&'static PropertySet> {
    with_dispatch(|d| d.property_set(pairs))
}

pub fn set_context(key: &str, value: &str) {
    with_dispatch(|d| d.default_context().set(key, value));
}

pub fn unset_context(key: &str) {
    with_dispatch(|d| d.default_context().unset(key));
}

pub fn clear_context() {
    with_dispatch(|d| d.default_context().clear());
}

// ============================================================================
// Flushing
// ============================================================================

pub fn flush_log_stream() {
    with_dispatch(Dispatch::flush_log_stream);
}

pub fn flush_metric_stream() {
    with_dispatch(Dispatch::flush_metric_stream);
}

pub fn flush_current_thread_stream() {
    with_dispatch(Dispatch::flush_current_thread_stream);
}

pub fn mark_all_thread_streams_full() {
    with_dispatch(Dispatch::mark_all_thread_streams_full);
}

pub fn init_current_thread_stream() -> bool {
    with_dispatch(Dispatch::init_current_thread_stream).unwrap_or(false)
}
