/*!
 * Call-Site Descriptors
 * Static facts about a log, metric or span call site, encoded in events by id
 */

use crate::core::{next_object_id, Level, ObjectId, Verbosity};
use crate::queue::WireField;
use bytes::{Buf, BufMut, BytesMut};
use dashmap::DashMap;
use std::sync::OnceLock;

/// A `'static` descriptor that events reference by id
///
/// Ids are assigned on first use and registered so decoding can map them back
/// to the descriptor. Two descriptors with the same content are still two
/// objects with two ids.
pub trait Descriptor: Sync + 'static {
    const TYPE_NAME: &'static str;

    fn id(&'static self) -> ObjectId;

    /// # Panics
    /// If the id does not belong to a registered descriptor of this type.
    fn resolve(id: ObjectId) -> &'static Self;
}

#[derive(Clone, Copy)]
enum Registered {
    Log(&'static LogMetadata),
    Metric(&'static MetricMetadata),
    Span(&'static SpanMetadata),
    Location(&'static SpanLocation),
}

fn registry() -> &'static DashMap<ObjectId, Registered> {
    static REGISTRY: OnceLock<DashMap<ObjectId, Registered>> = OnceLock::new();
    REGISTRY.get_or_init(DashMap::new)
}

fn register(entry: Registered) -> ObjectId {
    let id = next_object_id();
    registry().insert(id, entry);
    id
}

fn lookup(id: ObjectId) -> Option<Registered> {
    registry().get(&id).map(|entry| *entry.value())
}

macro_rules! impl_descriptor {
    ($ty:ident, $variant:ident) => {
        impl Descriptor for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            #[inline]
            fn id(&'static self) -> ObjectId {
                *self.id.get_or_init(|| register(Registered::$variant(self)))
            }

            fn resolve(id: ObjectId) -> &'static Self {
                match lookup(id) {
                    Some(Registered::$variant(desc)) => desc,
                    _ => panic!("{} is not a registered {}", id, stringify!($ty)),
                }
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("id", &self.id.get())
                    .field("target", &self.target)
                    .field("file", &self.file)
                    .field("line", &self.line)
                    .finish()
            }
        }
    };
}

impl<D: Descriptor> WireField for &'static D {
    const STATIC_SIZE: Option<usize> = Some(std::mem::size_of::<u64>());
    const TYPE_NAME: &'static str = D::TYPE_NAME;
    const IS_REFERENCE: bool = true;

    fn wire_size(&self) -> usize {
        std::mem::size_of::<u64>()
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u64_le(D::id(*self).as_u64());
    }

    fn get(buf: &mut &[u8]) -> Self {
        D::resolve(ObjectId(buf.get_u64_le()))
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// Log call site
pub struct LogMetadata {
    pub level: Level,
    pub target: &'static str,
    pub fmt_str: &'static str,
    pub file: &'static str,
    pub line: u32,
    id: OnceLock<ObjectId>,
}

impl LogMetadata {
    pub const fn new(
        level: Level,
        target: &'static str,
        fmt_str: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            level,
            target,
            fmt_str,
            file,
            line,
            id: OnceLock::new(),
        }
    }
}

/// Metric call site
pub struct MetricMetadata {
    pub lod: Verbosity,
    pub name: &'static str,
    pub unit: &'static str,
    pub target: &'static str,
    pub file: &'static str,
    pub line: u32,
    id: OnceLock<ObjectId>,
}

impl MetricMetadata {
    pub const fn new(
        lod: Verbosity,
        name: &'static str,
        unit: &'static str,
        target: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            lod,
            name,
            unit,
            target,
            file,
            line,
            id: OnceLock::new(),
        }
    }
}

/// Scope span call site with a fixed name
pub struct SpanMetadata {
    pub name: &'static str,
    pub target: &'static str,
    pub file: &'static str,
    pub line: u32,
    id: OnceLock<ObjectId>,
}

impl SpanMetadata {
    pub const fn new(name: &'static str, target: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            name,
            target,
            file,
            line,
            id: OnceLock::new(),
        }
    }
}

/// Call site of spans whose name is chosen per event
pub struct SpanLocation {
    pub target: &'static str,
    pub file: &'static str,
    pub line: u32,
    id: OnceLock<ObjectId>,
}

impl SpanLocation {
    pub const fn new(target: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            target,
            file,
            line,
            id: OnceLock::new(),
        }
    }
}

impl_descriptor!(LogMetadata, Log);
impl_descriptor!(MetricMetadata, Metric);
impl_descriptor!(SpanMetadata, Span);
impl_descriptor!(SpanLocation, Location);

/// Leak a descriptor built at runtime
///
/// Each call creates a distinct call site; use it for descriptors that cannot
/// be `static` items, never per event.
pub fn leak_descriptor<D: Descriptor>(desc: D) -> &'static D {
    Box::leak(Box::new(desc))
}
