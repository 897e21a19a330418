/*!
 * ID Generation
 * Stable object ids for dedup keys and guid allocation for streams and blocks
 */

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Object Ids
// ============================================================================

/// Identity of a referenced object (static string, descriptor, property set)
///
/// Ids come from a single process-wide counter, so two objects of different
/// kinds never share an id. Zero is never allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

impl ObjectId {
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic counter handing out ids
#[repr(C, align(64))]
pub struct AtomicGenerator {
    counter: AtomicU64,
}

impl AtomicGenerator {
    /// Create new generator starting at given value
    #[inline]
    pub const fn new(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }

    #[inline]
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Get current counter value (for debugging)
    #[inline]
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

static OBJECT_IDS: AtomicGenerator = AtomicGenerator::new(1);

/// Allocate a fresh process-wide object id
#[inline]
pub fn next_object_id() -> ObjectId {
    ObjectId(OBJECT_IDS.next())
}

// ============================================================================
// Guids
// ============================================================================

/// Guid allocator injected into the dispatcher
///
/// Stream ids and the process id go through this indirection so tests can
/// substitute deterministic ids.
pub type NewGuid = Arc<dyn Fn() -> String + Send + Sync>;

/// Random v4 uuid rendered with hyphens
pub fn random_guid() -> String {
    Uuid::new_v4().to_string()
}

/// Default guid allocator backed by `random_guid`
pub fn default_guid_allocator() -> NewGuid {
    Arc::new(random_guid)
}

/// Deterministic allocator producing `{prefix}-0`, `{prefix}-1`, ...
pub fn sequential_guid_allocator(prefix: &str) -> NewGuid {
    let prefix = prefix.to_string();
    let counter = Arc::new(AtomicU64::new(0));
    Arc::new(move || format!("{}-{}", prefix, counter.fetch_add(1, Ordering::Relaxed)))
}
