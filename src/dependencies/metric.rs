/*!
 * Metric Dependencies
 */

use super::{DependencyExtractor, ExtractDependencies};
use crate::core::{ObjectId, Verbosity};
use crate::events::{Descriptor, MetricEvent, MetricMetadata};
use crate::properties::{Property, PropertySetDependency};
use crate::queue::HeterogeneousQueue;
use crate::strings::{StaticStringDependency, StaticStringRef};

/// Out-of-band description of a metric call site
#[derive(Debug, Clone)]
pub struct MetricMetadataDependency {
    pub id: ObjectId,
    pub lod: Verbosity,
    pub name: StaticStringRef,
    pub unit: StaticStringRef,
    pub target: StaticStringRef,
    pub file: StaticStringRef,
    pub line: u32,
}

crate::wire_record!(MetricMetadataDependency {
    id: ObjectId => "id",
    lod: Verbosity => "lod",
    name: StaticStringRef => "name",
    unit: StaticStringRef => "unit",
    target: StaticStringRef => "target",
    file: StaticStringRef => "file",
    line: u32 => "line",
});

impl MetricMetadataDependency {
    pub fn new(desc: &'static MetricMetadata) -> Self {
        Self {
            id: desc.id(),
            lod: desc.lod,
            name: StaticStringRef::from_static(desc.name),
            unit: StaticStringRef::from_static(desc.unit),
            target: StaticStringRef::from_static(desc.target),
            file: StaticStringRef::from_static(desc.file),
            line: desc.line,
        }
    }
}

crate::declare_queue! {
    /// Dependency records of a metric block
    pub enum MetricDependency {
        StaticString(StaticStringDependency),
        Metadata(MetricMetadataDependency),
        PropertySet(PropertySetDependency),
        Property(Property),
    }
}

pub type MetricDependencyQueue = HeterogeneousQueue<MetricDependency>;

impl DependencyExtractor<MetricDependency> {
    pub fn metric_metadata(&mut self, desc: &'static MetricMetadata) {
        if !self.first_sight(desc.id()) {
            return;
        }
        self.str(desc.name);
        self.str(desc.unit);
        self.str(desc.target);
        self.str(desc.file);
        self.push(&MetricMetadataDependency::new(desc));
    }

    pub fn metric_event(&mut self, event: &MetricEvent) {
        match event {
            MetricEvent::Integer(evt) => {
                self.metric_metadata(evt.desc);
                self.property_set(evt.properties);
            }
            MetricEvent::Float(evt) => {
                self.metric_metadata(evt.desc);
                self.property_set(evt.properties);
            }
        }
    }
}

impl ExtractDependencies for MetricEvent {
    type Dependency = MetricDependency;

    fn extract(events: &HeterogeneousQueue<Self>) -> MetricDependencyQueue {
        let mut extractor = DependencyExtractor::new();
        events.for_each(|event| extractor.metric_event(&event));
        extractor.into_queue()
    }
}
