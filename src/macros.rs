/*!
 * Call-Site Macros
 * Declare a static descriptor per call site and emit through the global dispatcher
 *
 * Every macro is a no-op while no dispatcher is installed. Log macros check
 * the level before formatting.
 */

/// Log a formatted message at an explicit level
///
/// ```ignore
/// log!(Level::Info, "loaded {} assets", count);
/// log!(Level::Warn, target: "net", "retrying {}", host);
/// log!(Level::Error, properties: set, "request failed");
/// ```
#[macro_export]
macro_rules! log {
    ($lvl:expr, target: $target:expr, properties: $props:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        static __TELEMETRY_LOG: $crate::events::LogMetadata =
            $crate::events::LogMetadata::new($lvl, $target, $fmt, file!(), line!());
        if $crate::dispatch::global::log_enabled($lvl) {
            $crate::dispatch::global::log_with_properties(&__TELEMETRY_LOG, $props, format!($fmt $(, $arg)*));
        }
    }};
    ($lvl:expr, target: $target:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        static __TELEMETRY_LOG: $crate::events::LogMetadata =
            $crate::events::LogMetadata::new($lvl, $target, $fmt, file!(), line!());
        if $crate::dispatch::global::log_enabled($lvl) {
            $crate::dispatch::global::log(&__TELEMETRY_LOG, format!($fmt $(, $arg)*));
        }
    }};
    ($lvl:expr, properties: $props:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log!($lvl, target: module_path!(), properties: $props, $fmt $(, $arg)*)
    };
    ($lvl:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::log!($lvl, target: module_path!(), $fmt $(, $arg)*)
    };
}

/// Log a fixed message; only the call site's descriptor is queued
#[macro_export]
macro_rules! log_static {
    ($lvl:expr, target: $target:expr, $msg:literal) => {{
        static __TELEMETRY_LOG: $crate::events::LogMetadata =
            $crate::events::LogMetadata::new($lvl, $target, $msg, file!(), line!());
        $crate::dispatch::global::log_static(&__TELEMETRY_LOG);
    }};
    ($lvl:expr, $msg:literal) => {
        $crate::log_static!($lvl, target: module_path!(), $msg)
    };
}

#[macro_export]
macro_rules! fatal {
    ($($rest:tt)+) => { $crate::log!($crate::core::Level::Fatal, $($rest)+) };
}

#[macro_export]
macro_rules! error {
    ($($rest:tt)+) => { $crate::log!($crate::core::Level::Error, $($rest)+) };
}

#[macro_export]
macro_rules! warn {
    ($($rest:tt)+) => { $crate::log!($crate::core::Level::Warn, $($rest)+) };
}

#[macro_export]
macro_rules! info {
    ($($rest:tt)+) => { $crate::log!($crate::core::Level::Info, $($rest)+) };
}

#[macro_export]
macro_rules! debug {
    ($($rest:tt)+) => { $crate::log!($crate::core::Level::Debug, $($rest)+) };
}

#[macro_export]
macro_rules! trace {
    ($($rest:tt)+) => { $crate::log!($crate::core::Level::Trace, $($rest)+) };
}

/// Record an integer metric sample
///
/// ```ignore
/// imetric!("frame_bytes", "bytes", len as u64);
/// imetric!(lod: Verbosity::Max, "allocs", "count", n);
/// ```
#[macro_export]
macro_rules! imetric {
    (lod: $lod:expr, $name:literal, $unit:literal, $value:expr $(,)?) => {{
        static __TELEMETRY_METRIC: $crate::events::MetricMetadata =
            $crate::events::MetricMetadata::new($lod, $name, $unit, module_path!(), file!(), line!());
        $crate::dispatch::global::int_metric(&__TELEMETRY_METRIC, $value);
    }};
    ($name:literal, $unit:literal, $value:expr $(,)?) => {
        $crate::imetric!(lod: $crate::core::Verbosity::Med, $name, $unit, $value)
    };
}

/// Record a float metric sample
#[macro_export]
macro_rules! fmetric {
    (lod: $lod:expr, $name:literal, $unit:literal, $value:expr $(,)?) => {{
        static __TELEMETRY_METRIC: $crate::events::MetricMetadata =
            $crate::events::MetricMetadata::new($lod, $name, $unit, module_path!(), file!(), line!());
        $crate::dispatch::global::float_metric(&__TELEMETRY_METRIC, $value);
    }};
    ($name:literal, $unit:literal, $value:expr $(,)?) => {
        $crate::fmetric!(lod: $crate::core::Verbosity::Med, $name, $unit, $value)
    };
}

/// Begin a span named by a literal; it ends when the returned guard drops
///
/// ```ignore
/// let _span = span_scope!("load_level");
/// ```
#[macro_export]
macro_rules! span_scope {
    ($name:literal) => {{
        static __TELEMETRY_SPAN: $crate::events::SpanMetadata =
            $crate::events::SpanMetadata::new($name, module_path!(), file!(), line!());
        $crate::dispatch::SpanGuard::enter(&__TELEMETRY_SPAN)
    }};
}

/// Begin a span whose name is chosen at runtime
///
/// The name is a `&'static str` or a `StaticStringRef`; intern runtime
/// strings with `StaticStringRef::intern`.
#[macro_export]
macro_rules! span_named {
    ($name:expr) => {{
        static __TELEMETRY_LOCATION: $crate::events::SpanLocation =
            $crate::events::SpanLocation::new(module_path!(), file!(), line!());
        $crate::dispatch::NamedSpanGuard::enter(&__TELEMETRY_LOCATION, $name)
    }};
}
