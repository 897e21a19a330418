/*!
 * Property Sets
 * Immutable process-lifetime key/value sets attached to events by id
 */

use crate::core::{next_object_id, ObjectId};
use crate::queue::{WireField, WireFormat};
use crate::strings::StaticStringRef;
use bytes::{Buf, BufMut, BytesMut};
use dashmap::DashMap;
use std::fmt;
use std::sync::OnceLock;

/// One key/value pair, both sides shipped as static string dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: StaticStringRef,
    pub value: StaticStringRef,
}

crate::wire_record!(Property {
    name: StaticStringRef => "name",
    value: StaticStringRef => "value",
});

/// Canonical, leaked set of properties
///
/// Properties are sorted by key so two sets built from the same pairs in a
/// different order are laid out identically.
pub struct PropertySet {
    id: ObjectId,
    properties: Vec<Property>,
}

fn live_sets() -> &'static DashMap<ObjectId, &'static PropertySet> {
    static SETS: OnceLock<DashMap<ObjectId, &'static PropertySet>> = OnceLock::new();
    SETS.get_or_init(DashMap::new)
}

impl PropertySet {
    /// Allocate a set that lives until the process exits
    ///
    /// Only the store calls this; anything else would defeat canonicalization.
    pub(crate) fn leak<'a, I>(pairs: I) -> &'static PropertySet
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut properties: Vec<Property> = pairs
            .into_iter()
            .map(|(name, value)| Property {
                name: StaticStringRef::intern(name),
                value: StaticStringRef::intern(value),
            })
            .collect();
        properties.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));

        let set: &'static PropertySet = Box::leak(Box::new(PropertySet {
            id: next_object_id(),
            properties,
        }));
        live_sets().insert(set.id, set);
        set
    }

    /// Resolve an id read back from a queue
    ///
    /// # Panics
    /// If no set with this id was ever allocated.
    pub fn resolve(id: ObjectId) -> &'static PropertySet {
        match live_sets().get(&id) {
            Some(entry) => *entry.value(),
            None => panic!("property set {} was never allocated", id),
        }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.properties
            .iter()
            .find(|p| p.name.as_str() == name)
            .map(|p| p.value.as_str())
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for p in &self.properties {
            map.entry(&p.name.as_str(), &p.value.as_str());
        }
        map.finish()
    }
}

impl WireField for &'static PropertySet {
    const STATIC_SIZE: Option<usize> = Some(std::mem::size_of::<u64>());
    const TYPE_NAME: &'static str = "PropertySet";
    const IS_REFERENCE: bool = true;

    fn wire_size(&self) -> usize {
        std::mem::size_of::<u64>()
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.id.as_u64());
    }

    fn get(buf: &mut &[u8]) -> Self {
        PropertySet::resolve(ObjectId(buf.get_u64_le()))
    }
}

// ============================================================================
// Dependency Record
// ============================================================================

/// Out-of-band description of a property set: id, count, then (name, value) ids
#[derive(Debug, Clone, Copy)]
pub struct PropertySetDependency {
    pub set: &'static PropertySet,
}

impl PropertySetDependency {
    pub fn new(set: &'static PropertySet) -> Self {
        Self { set }
    }
}

impl WireFormat for PropertySetDependency {
    const IS_SIZE_STATIC: bool = false;

    fn size(&self) -> usize {
        std::mem::size_of::<u64>()
            + std::mem::size_of::<u32>()
            + self.set.len() * 2 * std::mem::size_of::<u64>()
    }

    fn write(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.set.id.as_u64());
        buf.put_u32_le(self.set.len() as u32);
        for property in self.set.properties() {
            property.write(buf);
        }
    }

    /// Resolves the set through the registry
    ///
    /// # Panics
    /// If the encoded pairs differ from the registered set with that id.
    fn read(buf: &mut &[u8]) -> Self {
        let id = ObjectId(buf.get_u64_le());
        let count = buf.get_u32_le() as usize;
        let encoded: Vec<Property> = (0..count).map(|_| Property::read(buf)).collect();
        let set = PropertySet::resolve(id);
        assert!(
            encoded.as_slice() == set.properties(),
            "property set {} decoded with pairs that differ from its registration",
            id
        );
        Self { set }
    }

    fn reflect() -> crate::queue::UserDefinedType {
        crate::queue::reflect_members("PropertySetDependency", false, &[])
    }
}
