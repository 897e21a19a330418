/*!
 * String Table
 * Process-wide interning of static strings by content
 */

use crate::core::{next_object_id, ObjectId};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::OnceLock;

/// Interned strings indexed both ways
///
/// Entries are never removed. Runtime strings interned through
/// [`StringTable::intern`] are leaked once, so the set of distinct runtime
/// strings must stay small (targets, property keys and values).
pub struct StringTable {
    inner: RwLock<TableInner>,
}

#[derive(Default)]
struct TableInner {
    by_str: AHashMap<&'static str, ObjectId>,
    by_id: AHashMap<ObjectId, &'static str>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner::default()),
        }
    }

    /// Id of a string that already lives for the whole process
    pub fn register_static(&self, value: &'static str) -> ObjectId {
        if let Some(id) = self.inner.read().by_str.get(value) {
            return *id;
        }
        let mut inner = self.inner.write();
        if let Some(id) = inner.by_str.get(value) {
            return *id;
        }
        let id = next_object_id();
        inner.by_str.insert(value, id);
        inner.by_id.insert(id, value);
        id
    }

    /// Id and process-lifetime copy of a runtime string
    pub fn intern(&self, value: &str) -> (ObjectId, &'static str) {
        if let Some((stored, id)) = self.inner.read().by_str.get_key_value(value) {
            return (*id, stored);
        }
        let mut inner = self.inner.write();
        if let Some((stored, id)) = inner.by_str.get_key_value(value) {
            return (*id, stored);
        }
        let leaked: &'static str = Box::leak(value.to_owned().into_boxed_str());
        let id = next_object_id();
        inner.by_str.insert(leaked, id);
        inner.by_id.insert(id, leaked);
        (id, leaked)
    }

    pub fn lookup(&self, id: ObjectId) -> Option<&'static str> {
        self.inner.read().by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Global string table
pub fn string_table() -> &'static StringTable {
    static TABLE: OnceLock<StringTable> = OnceLock::new();
    TABLE.get_or_init(StringTable::new)
}
