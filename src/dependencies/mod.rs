/*!
 * Dependency Extraction
 * Collects every object referenced by a block's events, once each
 *
 * Visiting an object the first time recurses into its own references before
 * pushing its record, so replaying the dependency queue in order always
 * defines an object before anything that refers to it.
 */

pub mod log;
pub mod metric;
pub mod thread;

use crate::core::limits::DEPENDENCY_QUEUE_RESERVE;
use crate::core::ObjectId;
use crate::properties::{PropertySet, PropertySetDependency};
use crate::queue::{HeterogeneousQueue, QueueEvents, QueueMember, WireField};
use crate::strings::{StaticStringDependency, StaticStringRef};
use ahash::AHashSet;
use bytes::{Buf, BufMut, BytesMut};

pub use self::log::{LogDependency, LogDependencyQueue, LogMetadataDependency};
pub use metric::{MetricDependency, MetricDependencyQueue, MetricMetadataDependency};
pub use thread::{SpanLocationDependency, SpanMetadataDependency, ThreadDependency, ThreadDependencyQueue};

/// Event set whose blocks can be described by a dependency queue
pub trait ExtractDependencies: QueueEvents {
    type Dependency: QueueEvents;

    fn extract(events: &HeterogeneousQueue<Self>) -> HeterogeneousQueue<Self::Dependency>;
}

/// Stateful visitor accumulating dependency records for one block
pub struct DependencyExtractor<D: QueueEvents> {
    seen: AHashSet<ObjectId>,
    dependencies: HeterogeneousQueue<D>,
}

impl<D: QueueEvents> DependencyExtractor<D> {
    pub fn new() -> Self {
        Self::with_capacity(DEPENDENCY_QUEUE_RESERVE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: AHashSet::new(),
            dependencies: HeterogeneousQueue::with_capacity(capacity),
        }
    }

    /// Mark an object as seen, returning true the first time
    #[inline]
    pub fn first_sight(&mut self, id: ObjectId) -> bool {
        self.seen.insert(id)
    }

    pub fn push<T: QueueMember<D>>(&mut self, record: &T) {
        self.dependencies.push(record);
    }

    pub fn into_queue(self) -> HeterogeneousQueue<D> {
        self.dependencies
    }
}

impl<D: QueueEvents> Default for DependencyExtractor<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DependencyExtractor<D>
where
    D: QueueEvents,
    StaticStringDependency: QueueMember<D>,
{
    pub fn static_string(&mut self, string: StaticStringRef) {
        if self.first_sight(string.id()) {
            self.push(&StaticStringDependency::new(string));
        }
    }

    pub fn str(&mut self, value: &'static str) {
        self.static_string(StaticStringRef::from_static(value));
    }
}

impl<D> DependencyExtractor<D>
where
    D: QueueEvents,
    StaticStringDependency: QueueMember<D>,
    PropertySetDependency: QueueMember<D>,
{
    pub fn property_set(&mut self, set: &'static PropertySet) {
        if !self.first_sight(set.id()) {
            return;
        }
        for property in set.properties() {
            self.static_string(property.name);
            self.static_string(property.value);
        }
        self.push(&PropertySetDependency::new(set));
    }
}

impl WireField for ObjectId {
    const STATIC_SIZE: Option<usize> = Some(std::mem::size_of::<u64>());
    const TYPE_NAME: &'static str = "uint64";

    fn wire_size(&self) -> usize {
        std::mem::size_of::<u64>()
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.as_u64());
    }

    fn get(buf: &mut &[u8]) -> Self {
        ObjectId(buf.get_u64_le())
    }
}
