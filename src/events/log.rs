/*!
 * Log Events
 * Records stored in log stream blocks
 */

use super::metadata::LogMetadata;
use crate::core::Level;
use crate::properties::PropertySet;
use crate::queue::HeterogeneousQueue;
use crate::strings::{DynamicString, StaticStringRef};

/// Log entry whose message is the call site's static format string
#[derive(Debug, Clone)]
pub struct LogStaticStrEvent {
    pub desc: &'static LogMetadata,
    pub time: i64,
}

crate::wire_record!(LogStaticStrEvent {
    desc: &'static LogMetadata => "desc",
    time: i64 => "time",
});

/// Log entry with a formatted message and a property set
#[derive(Debug, Clone)]
pub struct TaggedLogString {
    pub desc: &'static LogMetadata,
    pub properties: &'static PropertySet,
    pub time: i64,
    pub msg: DynamicString,
}

crate::wire_record!(TaggedLogString {
    desc: &'static LogMetadata => "desc",
    properties: &'static PropertySet => "properties",
    time: i64 => "time",
    msg: DynamicString => "msg",
});

/// Log entry forwarded from another logging facade, without a call-site
/// descriptor
#[derive(Debug, Clone)]
pub struct TaggedLogInteropEvent {
    pub time: i64,
    pub level: Level,
    pub target: StaticStringRef,
    pub properties: &'static PropertySet,
    pub msg: DynamicString,
}

crate::wire_record!(TaggedLogInteropEvent {
    time: i64 => "time",
    level: Level => "level",
    target: StaticStringRef => "target",
    properties: &'static PropertySet => "properties",
    msg: DynamicString => "msg",
});

crate::declare_queue! {
    /// Records of a log block
    pub enum LogEvent {
        StaticStr(LogStaticStrEvent),
        String(TaggedLogString),
        Interop(TaggedLogInteropEvent),
    }
}

pub type LogQueue = HeterogeneousQueue<LogEvent>;

impl LogEvent {
    pub fn time(&self) -> i64 {
        match self {
            LogEvent::StaticStr(evt) => evt.time,
            LogEvent::String(evt) => evt.time,
            LogEvent::Interop(evt) => evt.time,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            LogEvent::StaticStr(evt) => evt.desc.level,
            LogEvent::String(evt) => evt.desc.level,
            LogEvent::Interop(evt) => evt.level,
        }
    }

    /// Message text, falling back to the format string for static entries
    pub fn message(&self) -> &str {
        match self {
            LogEvent::StaticStr(evt) => evt.desc.fmt_str,
            LogEvent::String(evt) => evt.msg.as_str(),
            LogEvent::Interop(evt) => evt.msg.as_str(),
        }
    }
}
