/*!
 * Default Context
 * Mutable ambient key/value context resolved to a canonical property set
 */

use super::set::PropertySet;
use super::store::{Context, PropertySetStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;

/// Ambient context attached to log and metric events that carry no explicit
/// properties
///
/// Every mutation re-resolves the canonical set through the store, so reading
/// the current set is a single atomic load.
pub struct DefaultContext {
    store: Arc<PropertySetStore>,
    context: Mutex<Context>,
    current: AtomicPtr<PropertySet>,
}

impl DefaultContext {
    pub fn new(store: Arc<PropertySetStore>) -> Self {
        let empty = store.empty();
        Self {
            store,
            context: Mutex::new(Context::new()),
            current: AtomicPtr::new(empty as *const PropertySet as *mut PropertySet),
        }
    }

    /// Property set matching the context at the time of the call
    #[inline]
    pub fn current(&self) -> &'static PropertySet {
        let ptr = self.current.load(Ordering::Acquire);
        // SAFETY: only pointers obtained from `&'static PropertySet` are ever
        // stored, and property sets are never freed.
        unsafe { &*ptr }
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut context = self.context.lock();
        if context.get(key).map(String::as_str) == Some(value) {
            return;
        }
        context.insert(key.to_owned(), value.to_owned());
        self.update(&context);
    }

    /// Apply several assignments with a single re-resolution
    pub fn set_batch<K, V>(&self, entries: &[(K, V)])
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut context = self.context.lock();
        for (key, value) in entries {
            context.insert(key.as_ref().to_owned(), value.as_ref().to_owned());
        }
        self.update(&context);
    }

    pub fn unset(&self, key: &str) {
        let mut context = self.context.lock();
        context.remove(key);
        self.update(&context);
    }

    pub fn clear(&self) {
        let mut context = self.context.lock();
        context.clear();
        self.update(&context);
    }

    /// Snapshot of the key/value pairs
    pub fn copy(&self) -> Context {
        self.context.lock().clone()
    }

    fn update(&self, context: &Context) {
        let set = self.store.get(context);
        self.current
            .store(set as *const PropertySet as *mut PropertySet, Ordering::Release);
    }
}
