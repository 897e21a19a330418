/*!
 * Core Module
 * Fundamental types, ids, time sources and error handling
 */

pub mod errors;
pub mod id;
pub mod levels;
pub mod limits;
pub mod serde;
pub mod time;

// Re-export for convenience
pub use errors::*;
pub use id::{
    default_guid_allocator, next_object_id, random_guid, sequential_guid_allocator, NewGuid,
    ObjectId,
};
pub use levels::{Level, LevelFilter, Verbosity};
pub use time::{now_ticks, DualTime};
