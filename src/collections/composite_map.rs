/*!
 * Composite-Key Maps
 *
 * Maps keyed by [`CompositeKey`] that can also be queried by either
 * component alone:
 * - `CompositeKeyMap`: single-threaded, `ahash` backed, with per-component indexes
 * - `ConcurrentCompositeKeyMap`: sharded `DashMap`, component queries scan
 */

use super::composite_key::CompositeKey;
use ahash::{AHashMap, RandomState};
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Single-threaded composite-key map
///
/// Component lookups resolve through insertion-ordered indexes, so
/// `get_by_first` returns the earliest inserted entry still present.
#[derive(Debug, Clone)]
pub struct CompositeKeyMap<K1, K2, V> {
    entries: AHashMap<CompositeKey<K1, K2>, V>,
    by_first: AHashMap<K1, Vec<K2>>,
    by_second: AHashMap<K2, Vec<K1>>,
}

impl<K1, K2, V> Default for CompositeKeyMap<K1, K2, V> {
    fn default() -> Self {
        Self {
            entries: AHashMap::default(),
            by_first: AHashMap::default(),
            by_second: AHashMap::default(),
        }
    }
}

impl<K1, K2, V> CompositeKeyMap<K1, K2, V>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value stored under `(key1, key2)`
    pub fn insert(&mut self, key1: K1, key2: K2, value: V) -> Option<V> {
        let key = CompositeKey::new(key1, key2);
        if let Some(previous) = self.entries.get_mut(&key) {
            return Some(std::mem::replace(previous, value));
        }
        self.by_first
            .entry(key.key1().clone())
            .or_default()
            .push(key.key2().clone());
        self.by_second
            .entry(key.key2().clone())
            .or_default()
            .push(key.key1().clone());
        self.entries.insert(key, value);
        None
    }

    pub fn remove(&mut self, key1: &K1, key2: &K2) -> Option<V> {
        let key = CompositeKey::new(key1.clone(), key2.clone());
        let value = self.entries.remove(&key)?;
        unindex(&mut self.by_first, key1, key2);
        unindex(&mut self.by_second, key2, key1);
        Some(value)
    }

    pub fn get(&self, key1: &K1, key2: &K2) -> Option<&V> {
        self.entries
            .get(&CompositeKey::new(key1.clone(), key2.clone()))
    }

    pub fn contains(&self, key1: &K1, key2: &K2) -> bool {
        self.get(key1, key2).is_some()
    }

    /// First inserted value whose first component equals `key1`
    pub fn get_by_first(&self, key1: &K1) -> Option<&V> {
        let key2 = self.by_first.get(key1)?.first()?;
        self.get(key1, key2)
    }

    /// First inserted value whose second component equals `key2`
    pub fn get_by_second(&self, key2: &K2) -> Option<&V> {
        let key1 = self.by_second.get(key2)?.first()?;
        self.get(key1, key2)
    }

    /// Every value whose first component equals `key1`, in insertion order
    pub fn values_by_first<'m>(&'m self, key1: &'m K1) -> impl Iterator<Item = &'m V> + 'm {
        self.by_first
            .get(key1)
            .into_iter()
            .flatten()
            .filter_map(move |key2| self.get(key1, key2))
    }

    /// Every value whose second component equals `key2`, in insertion order
    pub fn values_by_second<'m>(&'m self, key2: &'m K2) -> impl Iterator<Item = &'m V> + 'm {
        self.by_second
            .get(key2)
            .into_iter()
            .flatten()
            .filter_map(move |key1| self.get(key1, key2))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompositeKey<K1, K2>, &V)> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_first.clear();
        self.by_second.clear();
    }
}

fn unindex<A, B>(index: &mut AHashMap<A, Vec<B>>, key: &A, other: &B)
where
    A: Eq + Hash,
    B: PartialEq,
{
    if let Some(others) = index.get_mut(key) {
        others.retain(|candidate| candidate != other);
        if others.is_empty() {
            index.remove(key);
        }
    }
}

impl<K1, K2, V> FromIterator<(K1, K2, V)> for CompositeKeyMap<K1, K2, V>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K1, K2, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key1, key2, value) in iter {
            map.insert(key1, key2, value);
        }
        map
    }
}

/// Thread-safe composite-key map
///
/// Pair operations hit a single shard. Lookups and removals by one
/// component scan every shard.
#[derive(Debug, Clone)]
pub struct ConcurrentCompositeKeyMap<K1, K2, V>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
{
    entries: Arc<DashMap<CompositeKey<K1, K2>, V, RandomState>>,
}

impl<K1, K2, V> Default for ConcurrentCompositeKeyMap<K1, K2, V>
where
    K1: Eq + Hash,
    K2: Eq + Hash,
{
    fn default() -> Self {
        Self {
            entries: Arc::new(DashMap::with_hasher(RandomState::new())),
        }
    }
}

impl<K1, K2, V> ConcurrentCompositeKeyMap<K1, K2, V>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Value under `(key1, key2)`, inserting `factory()` first when absent
    ///
    /// The factory runs at most once per call while the shard is locked.
    pub fn get_or_insert_with<F>(&self, key1: K1, key2: K2, factory: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.entries
            .entry(CompositeKey::new(key1, key2))
            .or_insert_with(factory)
            .value()
            .clone()
    }

    /// Insert only when the pair is absent; returns whether it was inserted
    pub fn try_insert(&self, key1: K1, key2: K2, value: V) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.entries.entry(CompositeKey::new(key1, key2)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Insert or replace; returns the previous value
    pub fn insert(&self, key1: K1, key2: K2, value: V) -> Option<V> {
        self.entries.insert(CompositeKey::new(key1, key2), value)
    }

    pub fn get(&self, key1: &K1, key2: &K2) -> Option<V> {
        self.entries
            .get(&CompositeKey::new(key1.clone(), key2.clone()))
            .map(|entry| entry.value().clone())
    }

    pub fn get_by_first(&self, key1: &K1) -> Option<V> {
        self.entries
            .iter()
            .find(|entry| entry.key().matches_first(key1))
            .map(|entry| entry.value().clone())
    }

    pub fn get_by_second(&self, key2: &K2) -> Option<V> {
        self.entries
            .iter()
            .find(|entry| entry.key().matches_second(key2))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key1: &K1, key2: &K2) -> bool {
        self.entries
            .contains_key(&CompositeKey::new(key1.clone(), key2.clone()))
    }

    pub fn remove(&self, key1: &K1, key2: &K2) -> Option<V> {
        self.entries
            .remove(&CompositeKey::new(key1.clone(), key2.clone()))
            .map(|(_, value)| value)
    }

    /// Remove every entry whose first component equals `key1`
    pub fn remove_by_first(&self, key1: &K1) -> usize {
        self.remove_where(|key| key.matches_first(key1))
    }

    /// Remove every entry whose second component equals `key2`
    pub fn remove_by_second(&self, key2: &K2) -> usize {
        self.remove_where(|key| key.matches_second(key2))
    }

    fn remove_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CompositeKey<K1, K2>) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        let removed = before.saturating_sub(self.entries.len());
        debug!(removed, "composite map entries removed by component");
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<K1, K2, V> ConcurrentCompositeKeyMap<K1, K2, V>
where
    K1: Eq + Hash + Clone + PartialEq<K2>,
    K2: Eq + Hash + Clone,
    V: Clone,
{
    /// Remove every entry with `key` in either position
    pub fn remove_by_either(&self, key: &K2) -> usize {
        self.remove_where(|candidate| candidate.matches_either(key))
    }
}
