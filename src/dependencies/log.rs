/*!
 * Log Dependencies
 */

use super::{DependencyExtractor, ExtractDependencies};
use crate::core::{Level, ObjectId};
use crate::events::{Descriptor, LogEvent, LogMetadata};
use crate::properties::{Property, PropertySetDependency};
use crate::queue::HeterogeneousQueue;
use crate::strings::{StaticStringDependency, StaticStringRef};

/// Out-of-band description of a log call site
#[derive(Debug, Clone)]
pub struct LogMetadataDependency {
    pub id: ObjectId,
    pub target: StaticStringRef,
    pub fmt_str: StaticStringRef,
    pub file: StaticStringRef,
    pub line: u32,
    pub level: Level,
}

crate::wire_record!(LogMetadataDependency {
    id: ObjectId => "id",
    target: StaticStringRef => "target",
    fmt_str: StaticStringRef => "fmt_str",
    file: StaticStringRef => "file",
    line: u32 => "line",
    level: Level => "level",
});

impl LogMetadataDependency {
    pub fn new(desc: &'static LogMetadata) -> Self {
        Self {
            id: desc.id(),
            target: StaticStringRef::from_static(desc.target),
            fmt_str: StaticStringRef::from_static(desc.fmt_str),
            file: StaticStringRef::from_static(desc.file),
            line: desc.line,
            level: desc.level,
        }
    }
}

crate::declare_queue! {
    /// Dependency records of a log block
    pub enum LogDependency {
        StaticString(StaticStringDependency),
        Metadata(LogMetadataDependency),
        PropertySet(PropertySetDependency),
        Property(Property),
    }
}

pub type LogDependencyQueue = HeterogeneousQueue<LogDependency>;

impl DependencyExtractor<LogDependency> {
    pub fn log_metadata(&mut self, desc: &'static LogMetadata) {
        if !self.first_sight(desc.id()) {
            return;
        }
        self.str(desc.target);
        self.str(desc.fmt_str);
        self.str(desc.file);
        self.push(&LogMetadataDependency::new(desc));
    }

    pub fn log_event(&mut self, event: &LogEvent) {
        match event {
            LogEvent::StaticStr(evt) => self.log_metadata(evt.desc),
            LogEvent::String(evt) => {
                self.log_metadata(evt.desc);
                self.property_set(evt.properties);
            }
            LogEvent::Interop(evt) => {
                self.static_string(evt.target);
                self.property_set(evt.properties);
            }
        }
    }
}

impl ExtractDependencies for LogEvent {
    type Dependency = LogDependency;

    fn extract(events: &HeterogeneousQueue<Self>) -> LogDependencyQueue {
        let mut extractor = DependencyExtractor::new();
        events.for_each(|event| extractor.log_event(&event));
        extractor.into_queue()
    }
}
