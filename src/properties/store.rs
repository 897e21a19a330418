/*!
 * Property Set Store
 * Canonicalizes key/value contexts into shared property sets
 */

use super::set::PropertySet;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

/// Context as held by callers; ordered so lookup ignores insertion order
pub type Context = BTreeMap<String, String>;

/// Interning table from context to canonical [`PropertySet`]
///
/// Sets are leaked and never evicted. Memory grows with the number of
/// distinct contexts, which is expected to stay small.
#[derive(Default)]
pub struct PropertySetStore {
    sets: Mutex<HashMap<Context, &'static PropertySet>>,
}

impl PropertySetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical set for a context
    pub fn get(&self, context: &Context) -> &'static PropertySet {
        let mut sets = self.sets.lock();
        if let Some(set) = sets.get(context) {
            return set;
        }
        let set = PropertySet::leak(context.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        sets.insert(context.clone(), set);
        set
    }

    /// Canonical set for a list of pairs; the last value wins on duplicate keys
    pub fn get_pairs<K, V>(&self, pairs: &[(K, V)]) -> &'static PropertySet
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let context: Context = pairs
            .iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
            .collect();
        self.get(&context)
    }

    /// Canonical empty set
    pub fn empty(&self) -> &'static PropertySet {
        self.get(&Context::new())
    }

    /// Number of distinct sets allocated by this store
    pub fn len(&self) -> usize {
        self.sets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
