/*!
 * Event Blocks
 * Time-bounded segment of one stream's events
 */

use crate::core::limits::MAX_BLOCK_RESERVE;
use crate::core::DualTime;
use crate::events::{LogEvent, MetricEvent, ThreadEvent};
use crate::queue::{HeterogeneousQueue, QueueEvents, QueueMember};

/// Events of one stream between two rotations
///
/// Lifecycle: open while it is a stream's current block, then swapped out
/// and closed with an end time before anything else sees it. Closed blocks
/// are only read.
#[derive(Debug)]
pub struct EventBlock<E: QueueEvents> {
    stream_id: String,
    begin: DualTime,
    end: Option<DualTime>,
    capacity: usize,
    object_offset: usize,
    events: HeterogeneousQueue<E>,
}

pub type LogBlock = EventBlock<LogEvent>;
pub type MetricBlock = EventBlock<MetricEvent>;
pub type ThreadBlock = EventBlock<ThreadEvent>;

impl<E: QueueEvents> EventBlock<E> {
    /// Empty open block
    ///
    /// `object_offset` is the number of events the stream emitted before this
    /// block. `capacity` is a soft budget in bytes.
    pub fn new(stream_id: impl Into<String>, begin: DualTime, capacity: usize, object_offset: usize) -> Self {
        Self {
            stream_id: stream_id.into(),
            begin,
            end: None,
            capacity,
            object_offset,
            events: HeterogeneousQueue::with_capacity(capacity.min(MAX_BLOCK_RESERVE)),
        }
    }

    #[inline]
    pub fn push<T: QueueMember<E>>(&mut self, event: &T) {
        debug_assert!(self.end.is_none(), "push into a closed block");
        self.events.push(event);
    }

    /// Stamp the end time
    ///
    /// # Panics
    /// If the block was already closed.
    pub fn close(&mut self, end: DualTime) {
        assert!(
            self.end.is_none(),
            "block of stream {} closed twice",
            self.stream_id
        );
        self.end = Some(end);
    }

    /// End time of a closed block
    ///
    /// # Panics
    /// If the block is still open.
    pub fn end(&self) -> DualTime {
        match self.end {
            Some(end) => end,
            None => panic!("end time of an open block of stream {}", self.stream_id),
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn begin(&self) -> DualTime {
        self.begin
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn object_offset(&self) -> usize {
        self.object_offset
    }

    pub fn events(&self) -> &HeterogeneousQueue<E> {
        &self.events
    }

    #[inline]
    pub fn nb_events(&self) -> usize {
        self.events.nb_events()
    }

    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.events.len_bytes()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
