/*!
 * Property Set Tests
 * Canonical sets, shared ids and the default context
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use telemetry_capture::properties::{Context, DefaultContext, PropertySet, PropertySetStore};
use telemetry_capture::strings::StaticStringRef;

#[test]
fn test_equal_contexts_share_one_set() {
    let store = PropertySetStore::new();
    let a = store.get_pairs(&[("map", "docks"), ("mode", "coop")]);
    let b = store.get_pairs(&[("mode", "coop"), ("map", "docks")]);
    let c = store.get_pairs(&[("map", "docks")]);
    assert!(std::ptr::eq(a, b));
    assert!(!std::ptr::eq(a, c));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_sets_resolve_by_id() {
    let store = PropertySetStore::new();
    let set = store.get_pairs(&[("region", "ap-south")]);
    let resolved = PropertySet::resolve(set.id());
    assert!(std::ptr::eq(set, resolved));
    assert_eq!(resolved.get("region"), Some("ap-south"));
    assert_eq!(resolved.get("missing"), None);
}

#[test]
fn test_ids_are_unique_across_object_kinds() {
    let store = PropertySetStore::new();
    let set = store.get_pairs(&[("kind", "set")]);
    let string = StaticStringRef::intern("kind-unique-string");
    assert_ne!(set.id(), string.id());
    for property in set.properties() {
        assert_ne!(property.name.id(), set.id());
        assert_ne!(property.value.id(), set.id());
    }
}

#[test]
fn test_last_duplicate_key_wins() {
    let store = PropertySetStore::new();
    let set = store.get_pairs(&[("build", "debug"), ("build", "release")]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("build"), Some("release"));
}

#[test]
fn test_default_context_follows_mutations() {
    let store = Arc::new(PropertySetStore::new());
    let context = DefaultContext::new(store.clone());
    assert!(context.current().is_empty());

    context.set("user", "ana");
    context.set_batch(&[("team", "blue"), ("user", "bo")]);
    let current = context.current();
    assert_eq!(current.get("user"), Some("bo"));
    assert_eq!(current.get("team"), Some("blue"));
    assert!(std::ptr::eq(current, store.get_pairs(&[("team", "blue"), ("user", "bo")])));

    let snapshot: Context = context.copy();
    assert_eq!(snapshot.len(), 2);

    context.unset("team");
    assert_eq!(context.current().len(), 1);
    context.clear();
    assert!(std::ptr::eq(context.current(), store.empty()));
}

#[test]
fn test_context_is_shared_across_threads() {
    let store = Arc::new(PropertySetStore::new());
    let context = Arc::new(DefaultContext::new(store));
    let writer = {
        let context = context.clone();
        std::thread::spawn(move || context.set("phase", "loading"))
    };
    writer.join().expect("writer panicked");
    assert_eq!(context.current().get("phase"), Some("loading"));
}
