/*!
 * Deep Equality
 *
 * Structural comparison of two object graphs:
 * - identical references are equal without further inspection
 * - null-like values only equal other null-like values
 * - primitive leaves use native equality
 * - values of different runtime types are never equal
 * - sequences compare element by element in lockstep
 * - composites compare every instance field, inherited private ones included
 */

use crate::core::config::{FicheConfig, WalkConfig};
use crate::core::traits::EqualityStrategy;
use crate::core::types::Identity;
use crate::reflect::{Object, Shape, TypeRegistry, Value};
use ahash::{AHashSet, AHasher};
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Levels of nesting folded into [`DeepEqualityComparer::hash`]
const HASH_DEPTH: usize = 4;

/// Deep equality using the global registry and configuration
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    DeepEquality::default().equals(a, b)
}

/// Deep equality bound to a registry and walk configuration
#[derive(Clone, Copy)]
pub struct DeepEquality<'r> {
    registry: &'r TypeRegistry,
    config: WalkConfig,
}

impl Default for DeepEquality<'static> {
    fn default() -> Self {
        Self::new(TypeRegistry::global(), FicheConfig::global().walk)
    }
}

impl<'r> DeepEquality<'r> {
    pub fn new(registry: &'r TypeRegistry, config: WalkConfig) -> Self {
        Self { registry, config }
    }

    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        let mut walk = EqualityWalk {
            registry: self.registry,
            in_progress: self.config.equality_cycle_guard.then(AHashSet::new),
        };
        let equal = walk.values(a, b);
        trace!(equal, "deep equality finished");
        equal
    }
}

struct EqualityWalk<'r> {
    registry: &'r TypeRegistry,
    /// Object pairs currently being compared; revisiting one means a cycle
    in_progress: Option<AHashSet<(Identity, Identity)>>,
}

impl EqualityWalk<'_> {
    fn values(&mut self, a: &Value, b: &Value) -> bool {
        if a.ref_eq(b) {
            return true;
        }

        let a_shape = self.registry.classify(a);
        let b_shape = self.registry.classify(b);
        match (a_shape.is_null(), b_shape.is_null()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }

        if a_shape.is_primitive() && b_shape.is_primitive() {
            return a == b;
        }
        if a.type_name() != b.type_name() {
            return false;
        }

        if let (Value::Object(x), Value::Object(y), Some(in_progress)) =
            (a, b, self.in_progress.as_mut())
        {
            if !in_progress.insert((x.identity(), y.identity())) {
                return true;
            }
        }

        match a_shape {
            Shape::Sequence => self.sequences(a, b),
            Shape::Composite(_) => self.composites(a, b),
            Shape::Null | Shape::Primitive(_) => a == b,
        }
    }

    fn sequences(&mut self, a: &Value, b: &Value) -> bool {
        let (left, right) = match (a.elements(), b.elements()) {
            (Ok(left), Ok(right)) => (left, right),
            (Err(_), Err(_)) => return true,
            (Ok(_), Err(err)) | (Err(err), Ok(_)) => {
                trace!(error = %err, "one sequence failed to enumerate");
                return false;
            }
        };

        let mut left = left.iter();
        let mut right = right.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if !self.values(x, y) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }

    fn composites(&mut self, a: &Value, b: &Value) -> bool {
        let left = fields_of(a);
        let right = fields_of(b);
        left.len() == right.len()
            && left
                .iter()
                .zip(right.iter())
                .all(|(x, y)| self.values(x, y))
    }
}

/// Snapshot of a composite's fields; empty for non-composites
fn fields_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Struct(c) => c.fields().to_vec(),
        Value::Object(o) => match &*o.read() {
            Object::Instance(c) => c.fields().to_vec(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Equality strategy backed by the deep walker
///
/// The hash folds the structure of the first few nesting levels, so values
/// that are deep-equal always hash equally.
#[derive(Clone, Copy)]
pub struct DeepEqualityComparer<'r> {
    equality: DeepEquality<'r>,
}

impl Default for DeepEqualityComparer<'static> {
    fn default() -> Self {
        Self {
            equality: DeepEquality::default(),
        }
    }
}

impl<'r> DeepEqualityComparer<'r> {
    pub fn new(registry: &'r TypeRegistry, config: WalkConfig) -> Self {
        Self {
            equality: DeepEquality::new(registry, config),
        }
    }

    fn hash_into(&self, value: &Value, depth: usize, state: &mut AHasher) {
        match self.equality.registry.classify(value) {
            Shape::Null => 0u8.hash(state),
            Shape::Primitive(_) => {
                1u8.hash(state);
                value.hash(state);
            }
            Shape::Sequence => {
                2u8.hash(state);
                value.type_name().hash(state);
                if depth == 0 {
                    return;
                }
                match value.elements() {
                    Ok(elements) => {
                        elements.len().hash(state);
                        for element in &elements {
                            self.hash_into(element, depth - 1, state);
                        }
                    }
                    Err(_) => u8::MAX.hash(state),
                }
            }
            Shape::Composite(_) => {
                3u8.hash(state);
                value.type_name().hash(state);
                if depth == 0 {
                    return;
                }
                for field in fields_of(value) {
                    self.hash_into(&field, depth - 1, state);
                }
            }
        }
    }
}

impl EqualityStrategy<Value> for DeepEqualityComparer<'_> {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        self.equality.equals(a, b)
    }

    fn hash(&self, value: &Value) -> u64 {
        let mut state = AHasher::default();
        self.hash_into(value, HASH_DEPTH, &mut state);
        state.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Composite, Enumerable, TypeDescriptor};
    use crate::core::errors::{FicheError, Result};

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(TypeDescriptor::class("Base").private_field("secret"))
            .unwrap();
        registry
            .register(
                TypeDescriptor::class("Node")
                    .extends("Base")
                    .auto_property("Value")
                    .public_field("next"),
            )
            .unwrap();
        registry
    }

    fn node(registry: &TypeRegistry, value: i32, secret: &str) -> Value {
        let mut node = registry.instantiate("Node").unwrap();
        node.set_field("Value", value).unwrap();
        node.set_field("base.secret", secret).unwrap();
        node
    }

    #[test]
    fn test_basic_rules() {
        let registry = registry();
        let eq = DeepEquality::new(&registry, WalkConfig::default());
        let a = node(&registry, 1, "s");

        assert!(eq.equals(&a, &a));
        assert!(eq.equals(&Value::Null, &Value::Null));
        assert!(!eq.equals(&a, &Value::Null));
        assert!(!eq.equals(&Value::from(1i32), &Value::from(1i64)));
        assert!(eq.equals(&Value::from("x"), &Value::from("x")));
        assert!(!eq.equals(&a, &Value::list("Node", vec![])));
    }

    #[test]
    fn test_inherited_private_fields_are_compared() {
        let registry = registry();
        let eq = DeepEquality::new(&registry, WalkConfig::default());
        assert!(eq.equals(&node(&registry, 1, "s"), &node(&registry, 1, "s")));
        assert!(!eq.equals(&node(&registry, 1, "s"), &node(&registry, 1, "t")));
    }

    #[test]
    fn test_sequences_compare_in_lockstep() {
        let registry = registry();
        let eq = DeepEquality::new(&registry, WalkConfig::default());
        let a = Value::list("List", vec![Value::from(1i32), Value::from(2i32)]);
        let b = Value::list("List", vec![Value::from(1i32), Value::from(2i32)]);
        let shorter = Value::list("List", vec![Value::from(1i32)]);
        assert!(eq.equals(&a, &b));
        assert!(!eq.equals(&a, &shorter));
        assert!(!eq.equals(&shorter, &a));
    }

    #[test]
    fn test_failing_sequences() {
        struct Broken;
        impl Enumerable for Broken {
            fn type_name(&self) -> &str {
                "Broken"
            }
            fn enumerate(&self) -> Result<Vec<Value>> {
                Err(FicheError::EnumerationFailed("closed".into()))
            }
        }
        struct Empty;
        impl Enumerable for Empty {
            fn type_name(&self) -> &str {
                "Broken"
            }
            fn enumerate(&self) -> Result<Vec<Value>> {
                Ok(Vec::new())
            }
        }

        let registry = registry();
        let eq = DeepEquality::new(&registry, WalkConfig::default());
        assert!(eq.equals(&Value::custom(Broken), &Value::custom(Broken)));
        assert!(!eq.equals(&Value::custom(Broken), &Value::custom(Empty)));
    }

    #[test]
    fn test_cycle_guard_terminates() {
        let registry = registry();
        let eq = DeepEquality::new(&registry, WalkConfig::guarded());
        let mut a = node(&registry, 1, "s");
        let mut b = node(&registry, 1, "s");
        a.set_field("next", a.clone()).unwrap();
        b.set_field("next", b.clone()).unwrap();
        assert!(eq.equals(&a, &b));

        let mut c = node(&registry, 2, "s");
        c.set_field("next", c.clone()).unwrap();
        assert!(!eq.equals(&a, &c));
    }

    #[test]
    fn test_registered_primitive_uses_native_equality() {
        let registry = registry();
        registry.register_primitive("Node");
        let eq = DeepEquality::new(&registry, WalkConfig::default());
        assert!(!eq.equals(&node(&registry, 1, "s"), &node(&registry, 1, "s")));
    }

    #[test]
    fn test_comparer_hash_agrees_with_equality() {
        let registry = registry();
        let comparer = DeepEqualityComparer::new(&registry, WalkConfig::default());
        let a = node(&registry, 7, "s");
        let b = node(&registry, 7, "s");
        assert!(comparer.equals(&a, &b));
        assert_eq!(comparer.hash(&a), comparer.hash(&b));

        let struct_layout = {
            registry
                .register(TypeDescriptor::structure("Pair").public_field("l"))
                .unwrap();
            registry.layout("Pair").unwrap()
        };
        let p = Value::from_composite(Composite::new(struct_layout.clone()));
        let q = Value::from_composite(Composite::new(struct_layout));
        assert_eq!(comparer.hash(&p), comparer.hash(&q));
    }
}
