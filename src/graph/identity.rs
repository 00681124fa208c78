/*!
 * Identity Map
 * Source object identity to clone handle, local to one top-level clone
 */

use crate::core::types::Identity;
use crate::reflect::ObjectRef;
use ahash::AHashMap;

/// Visited map of the clone walker
///
/// Keeps the source handle alive next to its clone so no address can be
/// reused by a new allocation while the walk is running.
#[derive(Default)]
pub struct IdentityMap {
    entries: AHashMap<Identity, (ObjectRef, ObjectRef)>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone already produced for `source`
    #[inline]
    pub fn get(&self, source: &ObjectRef) -> Option<ObjectRef> {
        self.entries
            .get(&source.identity())
            .map(|(_, clone)| clone.clone())
    }

    /// Record `clone` as the image of `source`
    #[inline]
    pub fn insert(&mut self, source: &ObjectRef, clone: &ObjectRef) {
        self.entries
            .insert(source.identity(), (source.clone(), clone.clone()));
    }

    #[inline]
    pub fn contains(&self, source: &ObjectRef) -> bool {
        self.entries.contains_key(&source.identity())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
