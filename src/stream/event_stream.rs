/*!
 * Event Streams
 * Mutable holder of a stream's current block and its rotation
 */

use super::block::EventBlock;
use super::info::StreamInfo;
use crate::core::limits::{LOG_BLOCK_PADDING, METRIC_BLOCK_PADDING, THREAD_BLOCK_PADDING};
use crate::core::DualTime;
use crate::dependencies::ExtractDependencies;
use crate::events::{LogEvent, MetricEvent, ThreadEvent};
use crate::queue::{QueueEvents, QueueMember};
use std::collections::BTreeMap;

/// Stream of one event category
///
/// `PADDING` is the headroom kept below capacity: the stream reports full
/// once the current block reaches `capacity - PADDING` bytes, which bounds
/// how far a single push can overshoot the capacity.
pub struct EventStream<E: QueueEvents, const PADDING: usize> {
    process_id: String,
    stream_id: String,
    tags: Vec<String>,
    properties: BTreeMap<String, String>,
    current: EventBlock<E>,
    full_threshold: usize,
}

pub type LogStream = EventStream<LogEvent, { LOG_BLOCK_PADDING }>;
pub type MetricStream = EventStream<MetricEvent, { METRIC_BLOCK_PADDING }>;
pub type ThreadStream = EventStream<ThreadEvent, { THREAD_BLOCK_PADDING }>;

impl<E: QueueEvents, const PADDING: usize> EventStream<E, PADDING> {
    pub fn new(
        process_id: impl Into<String>,
        block: EventBlock<E>,
        tags: Vec<String>,
        properties: BTreeMap<String, String>,
    ) -> Self {
        let full_threshold = Self::threshold_for(&block);
        Self {
            process_id: process_id.into(),
            stream_id: block.stream_id().to_owned(),
            tags,
            properties,
            current: block,
            full_threshold,
        }
    }

    #[inline]
    const fn padding() -> usize {
        PADDING
    }

    fn threshold_for(block: &EventBlock<E>) -> usize {
        block.capacity().saturating_sub(Self::padding())
    }

    #[inline]
    pub fn push<T: QueueMember<E>>(&mut self, event: &T) {
        self.current.push(event);
    }

    /// Whether the current block should be rotated
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.current.len_bytes() >= self.full_threshold
    }

    /// Force `is_full` to hold until the next swap
    pub fn mark_full(&mut self) {
        self.full_threshold = 0;
    }

    /// Install a new current block and return the previous one
    pub fn swap_blocks(&mut self, block: EventBlock<E>) -> EventBlock<E> {
        self.full_threshold = Self::threshold_for(&block);
        std::mem::replace(&mut self.current, block)
    }

    /// Seal the current block and start the next one
    ///
    /// Returns `None` without touching the stream when the current block is
    /// empty, so empty blocks never consume an offset. The returned block is
    /// already closed at `now`.
    pub fn rotate(&mut self, now: DualTime) -> Option<EventBlock<E>> {
        if self.current.is_empty() {
            return None;
        }
        let next = EventBlock::new(
            self.stream_id.clone(),
            now,
            self.current.capacity(),
            self.current.object_offset() + self.current.nb_events(),
        );
        let mut sealed = self.swap_blocks(next);
        sealed.close(now);
        Some(sealed)
    }

    pub fn current_block(&self) -> &EventBlock<E> {
        &self.current
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl<E: ExtractDependencies, const PADDING: usize> EventStream<E, PADDING> {
    /// Registration snapshot, including the manifests of both queues
    pub fn info(&self) -> StreamInfo {
        StreamInfo {
            process_id: self.process_id.clone(),
            stream_id: self.stream_id.clone(),
            tags: self.tags.clone(),
            properties: self.properties.clone(),
            dependencies_metadata: <E::Dependency as QueueEvents>::manifest(),
            objects_metadata: E::manifest(),
        }
    }
}
