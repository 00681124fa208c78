/*!
 * Composite Keys
 *
 * Two-part keys that compare positionally against other composite keys and
 * can be matched against either component on its own.
 */

use crate::reflect::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Pair of keys used as one map key
///
/// Equality between two composite keys is positional: both components must
/// match. Matching a single component is explicit through
/// [`matches_first`](Self::matches_first), [`matches_second`](Self::matches_second)
/// and [`matches_either`](Self::matches_either).
#[derive(Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeKey<K1, K2> {
    key1: K1,
    key2: K2,
}

impl<K1, K2> CompositeKey<K1, K2> {
    #[inline]
    pub const fn new(key1: K1, key2: K2) -> Self {
        Self { key1, key2 }
    }

    #[inline]
    pub fn key1(&self) -> &K1 {
        &self.key1
    }

    #[inline]
    pub fn key2(&self) -> &K2 {
        &self.key2
    }

    #[inline]
    pub fn into_parts(self) -> (K1, K2) {
        (self.key1, self.key2)
    }
}

impl<K1: PartialEq, K2: PartialEq> CompositeKey<K1, K2> {
    #[inline]
    pub fn matches_first(&self, key: &K1) -> bool {
        self.key1 == *key
    }

    #[inline]
    pub fn matches_second(&self, key: &K2) -> bool {
        self.key2 == *key
    }

    /// Whether `key` equals either component
    #[inline]
    pub fn matches_either<Q>(&self, key: &Q) -> bool
    where
        K1: PartialEq<Q>,
        K2: PartialEq<Q>,
        Q: ?Sized,
    {
        self.key1 == *key || self.key2 == *key
    }
}

/// Fold one component hash into the running key hash
#[inline]
fn fold(h: u64, component: u64) -> u64 {
    (h << 5).wrapping_add(3).wrapping_add(h) ^ component
}

#[inline]
fn component_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = ahash::AHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

impl<K1: Hash, K2: Hash> CompositeKey<K1, K2> {
    /// Order-sensitive combination of both component hashes
    pub fn combined_hash(&self) -> u64 {
        fold(fold(0, component_hash(&self.key1)), component_hash(&self.key2))
    }
}

impl<K1: Hash, K2: Hash> Hash for CompositeKey<K1, K2> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.combined_hash());
    }
}

impl<K1: fmt::Debug, K2: fmt::Debug> fmt::Debug for CompositeKey<K1, K2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompositeKey")
            .field(&self.key1)
            .field(&self.key2)
            .finish()
    }
}

impl<K1, K2> From<(K1, K2)> for CompositeKey<K1, K2> {
    #[inline]
    fn from((key1, key2): (K1, K2)) -> Self {
        Self::new(key1, key2)
    }
}

impl<K1, K2> From<CompositeKey<K1, K2>> for (K1, K2) {
    #[inline]
    fn from(key: CompositeKey<K1, K2>) -> Self {
        key.into_parts()
    }
}

/// A dynamic key equals a bare value matching either component
impl PartialEq<Value> for CompositeKey<Value, Value> {
    fn eq(&self, other: &Value) -> bool {
        self.matches_either(other)
    }
}

impl PartialEq<CompositeKey<Value, Value>> for Value {
    fn eq(&self, other: &CompositeKey<Value, Value>) -> bool {
        other == self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_equality_is_positional() {
        let key = CompositeKey::new(1, "s");
        assert_eq!(key, CompositeKey::new(1, "s"));
        assert_ne!(key, CompositeKey::new(2, "s"));
        assert_ne!(CompositeKey::new(1, 2), CompositeKey::new(2, 1));
    }

    #[test]
    fn test_component_matching() {
        let key = CompositeKey::new(1u32, String::from("s"));
        assert!(key.matches_first(&1));
        assert!(!key.matches_first(&2));
        assert!(key.matches_second(&"s".to_string()));

        let same = CompositeKey::new(4i64, 9i64);
        assert!(same.matches_either(&9));
        assert!(!same.matches_either(&5));
    }

    #[test]
    fn test_dynamic_key_matches_bare_values() {
        let key = CompositeKey::new(Value::from(1i32), Value::from("s"));
        assert!(key == Value::from(1i32));
        assert!(key == Value::from("s"));
        assert!(Value::from("s") == key);
        assert!(key != Value::from(2i32));
        assert_eq!(key, CompositeKey::new(Value::from(1i32), Value::from("s")));
        assert_ne!(key, CompositeKey::new(Value::from(2i32), Value::from("s")));
    }

    #[test]
    fn test_hash_is_order_sensitive_and_consistent() {
        let a = CompositeKey::new(1u8, 2u8);
        assert_eq!(a.combined_hash(), CompositeKey::new(1u8, 2u8).combined_hash());
        assert_ne!(a.combined_hash(), CompositeKey::new(2u8, 1u8).combined_hash());
    }

    #[test]
    fn test_tuple_conversions() {
        let key: CompositeKey<i32, char> = (7, 'x').into();
        assert_eq!(*key.key1(), 7);
        assert_eq!(*key.key2(), 'x');
        let (a, b): (i32, char) = key.into();
        assert_eq!((a, b), (7, 'x'));
    }
}
