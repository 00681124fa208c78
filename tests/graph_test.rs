/*!
 * Graph Walker Tests
 * Deep clone, copy with overrides and deep equality over object graphs
 */

use fiche::graph::{DeepEquality, GraphCloner};
use fiche::reflect::{ArrayValue, Object};
use fiche::{
    copy, deep_clone, deep_equals, FicheError, Overrides, TypeDescriptor, TypeRegistry, Value,
    WalkConfig,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn registry() -> &'static TypeRegistry {
    let registry = TypeRegistry::global();
    registry
        .register(TypeDescriptor::class("GraphEntity").private_field("id"))
        .unwrap();
    registry
        .register(
            TypeDescriptor::class("GraphNode")
                .extends("GraphEntity")
                .auto_property("Label")
                .public_field("weight")
                .public_field("next"),
        )
        .unwrap();
    registry
        .register(
            TypeDescriptor::structure("GraphPoint")
                .public_field("x")
                .public_field("y"),
        )
        .unwrap();
    registry
}

fn node(label: &str, weight: i64) -> Value {
    let mut node = registry().instantiate("GraphNode").unwrap();
    node.set_field("Label", label).unwrap();
    node.set_field("weight", weight).unwrap();
    node
}

fn chain(weights: &[i64]) -> Value {
    let mut head = Value::Null;
    for (i, weight) in weights.iter().enumerate().rev() {
        let mut current = node(&format!("n{}", i), *weight);
        current.set_field("next", head).unwrap();
        head = current;
    }
    head
}

#[test]
fn test_registered_null_sentinels_are_null_for_the_walkers() {
    let registry = registry();
    let sentinel = Value::from("graph-missing");
    registry.register_null_value(sentinel.clone());
    registry.register_null_type("GraphMissingList");

    assert_eq!(deep_clone(&sentinel).unwrap(), sentinel);
    assert!(deep_equals(&sentinel, &Value::Null));
    assert!(deep_equals(&Value::Null, &sentinel));
    assert!(!deep_equals(&sentinel, &Value::from("graph-present")));

    let missing = Value::list("GraphMissingList", vec![node("m", 1)]);
    assert!(deep_clone(&missing).unwrap().ref_eq(&missing));
    assert!(deep_equals(&missing, &Value::Null));

    let mut with_sentinel = node("s", 3);
    with_sentinel.set_field("next", sentinel.clone()).unwrap();
    assert!(deep_equals(&with_sentinel, &node("s", 3)));
    let clone = deep_clone(&with_sentinel).unwrap();
    assert_eq!(clone.field("next"), Some(sentinel));
}

#[test]
fn test_self_reference_points_to_clone() {
    let mut a = node("a", 1);
    a.set_field("next", a.clone()).unwrap();

    let clone = deep_clone(&a).unwrap();
    let next = clone.field("next").unwrap();
    assert!(!clone.ref_eq(&a));
    assert!(next.ref_eq(&clone));
    assert!(deep_equals(&a, &clone));
}

#[test]
fn test_two_node_cycle() {
    let mut a = node("a", 1);
    let mut b = node("b", 2);
    a.set_field("next", b.clone()).unwrap();
    b.set_field("next", a.clone()).unwrap();

    let clone = deep_clone(&a).unwrap();
    let clone_b = clone.field("next").unwrap();
    assert!(clone_b.field("next").unwrap().ref_eq(&clone));
    assert!(!clone_b.ref_eq(&b));
    assert!(deep_equals(&a, &clone));
}

#[test]
fn test_primitives_and_structs_clone_by_value() {
    assert_eq!(deep_clone(&Value::from(42i32)).unwrap(), Value::from(42i32));
    assert!(deep_clone(&Value::Null).unwrap().is_null());

    let mut point = registry().instantiate("GraphPoint").unwrap();
    point.set_field("x", 1.5f64).unwrap();
    point.set_field("y", node("inner", 3)).unwrap();
    let clone = deep_clone(&point).unwrap();

    assert!(deep_equals(&point, &clone));
    assert!(!clone.field("y").unwrap().ref_eq(&point.field("y").unwrap()));
}

#[test]
fn test_inherited_private_field_is_cloned() {
    let mut a = node("a", 1);
    a.set_field("base.id", 77i32).unwrap();
    let clone = deep_clone(&a).unwrap();
    assert_eq!(clone.field("base.id"), Some(Value::from(77i32)));

    a.set_field("base.id", 78i32).unwrap();
    assert!(!deep_equals(&a, &clone));
}

#[test]
fn test_sequences_clone_elementwise() {
    let shared = node("shared", 5);
    let list = Value::list("List", vec![shared.clone(), shared.clone(), Value::from("x")]);
    let clone = deep_clone(&list).unwrap();

    let items = clone.elements().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items[0].ref_eq(&items[1]));
    assert!(!items[0].ref_eq(&shared));
    assert!(deep_equals(&list, &clone));

    let array = Value::object(Object::Array(ArrayValue::new("GraphNode", vec![shared.clone()])));
    let cloned_array = deep_clone(&array).unwrap();
    assert!(deep_equals(&array, &cloned_array));
    assert!(!cloned_array.ref_eq(&array));
}

#[test]
fn test_copy_with_overrides() {
    let source = chain(&[1, 2, 3]);
    let replacement = node("replacement", 9);
    let overrides = Overrides::new()
        .set("weight", 100i64)
        .unwrap()
        .set("next.next", replacement.clone())
        .unwrap();

    let result = copy(&source, &overrides).unwrap();
    assert_eq!(result.field("weight"), Some(Value::from(100i64)));
    let second = result.field("next").unwrap();
    assert_eq!(second.field("weight"), Some(Value::from(2i64)));
    assert!(second.field("next").unwrap().ref_eq(&replacement));
    assert_eq!(source.field("weight"), Some(Value::from(1i64)));
}

#[test]
fn test_colliding_overrides_are_rejected() {
    let err = Overrides::new()
        .set("next", Value::Null)
        .unwrap()
        .set("next.weight", 1i64)
        .unwrap_err();
    assert!(matches!(err, FicheError::InvalidOperation(_)));

    let err = Overrides::new().set("next..weight", 1i64).unwrap_err();
    assert!(err.is_argument_error());
}

#[test]
fn test_unguarded_equality_on_acyclic_graph() {
    let registry = registry();
    let equality = DeepEquality::new(registry, WalkConfig::unguarded());
    let a = chain(&[1, 2]);
    let b = GraphCloner::new(registry).deep_clone(&a).unwrap();
    assert!(equality.equals(&a, &b));
}

proptest! {
    #[test]
    fn prop_clone_is_equal_and_distinct(weights in prop::collection::vec(any::<i64>(), 1..12)) {
        let source = chain(&weights);
        let clone = deep_clone(&source).unwrap();
        prop_assert!(deep_equals(&source, &clone));
        prop_assert!(!clone.ref_eq(&source));
    }

    #[test]
    fn prop_one_leaf_change_breaks_equality(
        weights in prop::collection::vec(any::<i64>(), 1..12),
        index in any::<prop::sample::Index>(),
    ) {
        let source = chain(&weights);
        let clone = deep_clone(&source).unwrap();

        let target = index.index(weights.len());
        let mut cursor = clone.clone();
        for _ in 0..target {
            cursor = cursor.field("next").unwrap();
        }
        cursor
            .set_field("weight", weights[target].wrapping_add(1))
            .unwrap();
        prop_assert!(!deep_equals(&source, &clone));
    }
}
