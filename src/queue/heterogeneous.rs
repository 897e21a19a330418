/*!
 * Heterogeneous Queue
 * Append-only byte buffer of tagged records, replayed in push order
 *
 * Record layout: one discriminant byte (index of the type in the queue's
 * declared type list), a little-endian u32 payload length for variable-size
 * types, then the payload.
 */

use super::codec::WireFormat;
use super::reflect::UserDefinedType;
use bytes::{Buf, BufMut, BytesMut};
use std::marker::PhantomData;

/// Closed set of record types a queue accepts, generated by `declare_queue!`
pub trait QueueEvents: Sized {
    /// Decode the record following a discriminant byte
    ///
    /// # Panics
    /// On a discriminant outside the declared type list.
    fn decode(tag: u8, buf: &mut &[u8]) -> Self;

    /// Manifest entries for every declared type, in discriminant order
    fn manifest() -> Vec<UserDefinedType>;
}

/// Membership of a record type in a queue's type list
pub trait QueueMember<E: QueueEvents>: WireFormat {
    const TAG: u8;
}

/// Read one member payload, honoring the length prefix of variable-size types
pub fn read_member<T: WireFormat>(buf: &mut &[u8]) -> T {
    if T::IS_SIZE_STATIC {
        return T::read(buf);
    }
    let size = buf.get_u32_le() as usize;
    assert!(
        size <= buf.len(),
        "record length {} exceeds remaining queue bytes {}",
        size,
        buf.len()
    );
    let (mut payload, rest) = buf.split_at(size);
    let value = T::read(&mut payload);
    assert!(payload.is_empty(), "record decoded short of its length prefix");
    *buf = rest;
    value
}

/// Append-only tagged record buffer
pub struct HeterogeneousQueue<E> {
    buffer: BytesMut,
    nb_events: usize,
    _events: PhantomData<fn() -> E>,
}

impl<E: QueueEvents> HeterogeneousQueue<E> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            nb_events: 0,
            _events: PhantomData,
        }
    }

    /// Append a record
    #[inline]
    pub fn push<T: QueueMember<E>>(&mut self, value: &T) {
        self.buffer.put_u8(T::TAG);
        if !T::IS_SIZE_STATIC {
            self.buffer.put_u32_le(value.size() as u32);
        }
        let start = self.buffer.len();
        value.write(&mut self.buffer);
        debug_assert_eq!(self.buffer.len() - start, value.size());
        self.nb_events += 1;
    }

    /// Replay every record in push order
    pub fn for_each<F: FnMut(E)>(&self, mut visitor: F) {
        for event in self.iter() {
            visitor(event);
        }
    }

    pub fn iter(&self) -> QueueIter<'_, E> {
        QueueIter {
            cursor: &self.buffer[..],
            _events: PhantomData,
        }
    }

    /// Serialized size in bytes
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn nb_events(&self) -> usize {
        self.nb_events
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nb_events == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn manifest() -> Vec<UserDefinedType> {
        E::manifest()
    }
}

impl<E> std::fmt::Debug for HeterogeneousQueue<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeterogeneousQueue")
            .field("nb_events", &self.nb_events)
            .field("len_bytes", &self.buffer.len())
            .finish()
    }
}

/// Single forward decoding pass over a queue
pub struct QueueIter<'a, E> {
    cursor: &'a [u8],
    _events: PhantomData<fn() -> E>,
}

impl<'a, E: QueueEvents> Iterator for QueueIter<'a, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        if self.cursor.is_empty() {
            return None;
        }
        let tag = self.cursor.get_u8();
        Some(E::decode(tag, &mut self.cursor))
    }
}
