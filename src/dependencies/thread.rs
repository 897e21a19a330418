/*!
 * Thread Dependencies
 */

use super::{DependencyExtractor, ExtractDependencies};
use crate::core::ObjectId;
use crate::events::{Descriptor, SpanLocation, SpanMetadata, ThreadEvent};
use crate::queue::HeterogeneousQueue;
use crate::strings::{StaticStringDependency, StaticStringRef};

/// Out-of-band description of a scope span call site
#[derive(Debug, Clone)]
pub struct SpanMetadataDependency {
    pub id: ObjectId,
    pub name: StaticStringRef,
    pub target: StaticStringRef,
    pub file: StaticStringRef,
    pub line: u32,
}

crate::wire_record!(SpanMetadataDependency {
    id: ObjectId => "id",
    name: StaticStringRef => "name",
    target: StaticStringRef => "target",
    file: StaticStringRef => "file",
    line: u32 => "line",
});

/// Out-of-band description of a named span call site
#[derive(Debug, Clone)]
pub struct SpanLocationDependency {
    pub id: ObjectId,
    pub target: StaticStringRef,
    pub file: StaticStringRef,
    pub line: u32,
}

crate::wire_record!(SpanLocationDependency {
    id: ObjectId => "id",
    target: StaticStringRef => "target",
    file: StaticStringRef => "file",
    line: u32 => "line",
});

crate::declare_queue! {
    /// Dependency records of a thread block
    pub enum ThreadDependency {
        StaticString(StaticStringDependency),
        SpanMetadata(SpanMetadataDependency),
        SpanLocation(SpanLocationDependency),
    }
}

pub type ThreadDependencyQueue = HeterogeneousQueue<ThreadDependency>;

impl DependencyExtractor<ThreadDependency> {
    pub fn span_metadata(&mut self, desc: &'static SpanMetadata) {
        if !self.first_sight(desc.id()) {
            return;
        }
        self.str(desc.name);
        self.str(desc.target);
        self.str(desc.file);
        self.push(&SpanMetadataDependency {
            id: desc.id(),
            name: StaticStringRef::from_static(desc.name),
            target: StaticStringRef::from_static(desc.target),
            file: StaticStringRef::from_static(desc.file),
            line: desc.line,
        });
    }

    pub fn span_location(&mut self, location: &'static SpanLocation) {
        if !self.first_sight(location.id()) {
            return;
        }
        self.str(location.target);
        self.str(location.file);
        self.push(&SpanLocationDependency {
            id: location.id(),
            target: StaticStringRef::from_static(location.target),
            file: StaticStringRef::from_static(location.file),
            line: location.line,
        });
    }

    pub fn thread_event(&mut self, event: &ThreadEvent) {
        match event {
            ThreadEvent::BeginScope(evt) => self.span_metadata(evt.desc),
            ThreadEvent::EndScope(evt) => self.span_metadata(evt.desc),
            ThreadEvent::BeginNamed(evt) => {
                self.span_location(evt.location);
                self.static_string(evt.name);
            }
            ThreadEvent::EndNamed(evt) => {
                self.span_location(evt.location);
                self.static_string(evt.name);
            }
        }
    }
}

impl ExtractDependencies for ThreadEvent {
    type Dependency = ThreadDependency;

    fn extract(events: &HeterogeneousQueue<Self>) -> ThreadDependencyQueue {
        let mut extractor = DependencyExtractor::new();
        events.for_each(|event| extractor.thread_event(&event));
        extractor.into_queue()
    }
}
