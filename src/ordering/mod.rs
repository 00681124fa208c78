/*!
 * Ordering Engine
 *
 * Stable multi-key sorting behind lazy views:
 * - `order_by` creates the root step, `then_by` appends tie breakers
 * - each enumeration buffers the source once and computes every key column
 * - a quick sort over buffer positions yields the permutation map
 * - elements are yielded in map order; full ties keep source order
 */

mod buffer;
mod comparer;
mod sorter;
mod step;
mod view;

pub use comparer::{by_fn, FnComparer, KeyComparer, NaturalOrder, PartialOrder, ValueComparer};
pub use view::{OrderByExt, Ordered, OrderedSequence};

use crate::core::errors::{FicheError, Result};
use crate::core::types::SortDirection;
use crate::core::validation::ensure_not_null;
use crate::reflect::{ObjectRef, Value};

/// Order a dynamic sequence value ascending by `key`
///
/// Fails immediately with `InvalidArgument` when `source` is null-like or
/// not a sequence. Incomparable keys fail when the view is enumerated.
pub fn order_values<'a, F>(source: &Value, key: F) -> Result<OrderedSequence<'a, Value>>
where
    F: Fn(&Value) -> Value + 'a,
{
    order_values_with(source, key, ValueComparer, SortDirection::Ascending)
}

/// Order a dynamic sequence value descending by `key`
pub fn order_values_descending<'a, F>(source: &Value, key: F) -> Result<OrderedSequence<'a, Value>>
where
    F: Fn(&Value) -> Value + 'a,
{
    order_values_with(source, key, ValueComparer, SortDirection::Descending)
}

/// Order a dynamic sequence value with an explicit comparer and direction
///
/// The view reads the sequence's current elements on every enumeration.
pub fn order_values_with<'a, K, F, C>(
    source: &Value,
    key: F,
    comparer: C,
    direction: SortDirection,
) -> Result<OrderedSequence<'a, Value>>
where
    F: Fn(&Value) -> K + 'a,
    C: KeyComparer<K> + 'a,
    K: 'a,
{
    let sequence = sequence_object(source)?;
    Ok(OrderedSequence::from_source(
        move || sequence.read().elements(),
        key,
        comparer,
        direction,
    ))
}

fn sequence_object(source: &Value) -> Result<ObjectRef> {
    ensure_not_null(source, "source")?;
    match source {
        Value::Object(object) if object.read().is_sequence() => Ok(object.clone()),
        other => Err(FicheError::invalid_argument(
            "source",
            format!(
                "{} is not a sequence",
                other.type_name().as_deref().unwrap_or("value")
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Enumerable, TypeDescriptor, TypeRegistry};

    fn pairs() -> Value {
        let registry = TypeRegistry::global();
        registry
            .register(TypeDescriptor::structure("OrderingPair").public_field("item1").public_field("item2"))
            .unwrap();
        let make = |a: &str, b: i32| {
            let mut pair = registry.instantiate("OrderingPair").unwrap();
            pair.set_field("item1", a).unwrap();
            pair.set_field("item2", b).unwrap();
            pair
        };
        Value::list("List", vec![make("b", 2), make("a", 2), make("a", 1)])
    }

    #[test]
    fn test_order_values_by_fields() {
        let source = pairs();
        let sorted = order_values(&source, |v| v.field("item1").unwrap_or_default())
            .unwrap()
            .then_by_with(
                |v: &Value| v.field("item2").unwrap_or_default(),
                ValueComparer,
                SortDirection::Ascending,
            )
            .to_vec()
            .unwrap();
        let keys: Vec<(Value, Value)> = sorted
            .iter()
            .map(|v| (v.field("item1").unwrap(), v.field("item2").unwrap()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Value::from("a"), Value::from(1i32)),
                (Value::from("a"), Value::from(2i32)),
                (Value::from("b"), Value::from(2i32)),
            ]
        );
    }

    #[test]
    fn test_invalid_sources_fail_eagerly() {
        assert!(matches!(
            order_values(&Value::Null, |v| v.clone()),
            Err(FicheError::InvalidArgument { .. })
        ));
        assert!(matches!(
            order_values(&Value::from(3i32), |v| v.clone()),
            Err(FicheError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_incomparable_keys_fail_on_enumeration() {
        let source = Value::list("List", vec![Value::from("a"), Value::from(1i32)]);
        let view = order_values(&source, |v| v.clone()).unwrap();
        assert!(matches!(view.iter(), Err(FicheError::InvalidOperation(_))));
    }

    #[test]
    fn test_view_sees_current_elements() {
        let source = Value::list("List", vec![Value::from(2i32), Value::from(1i32)]);
        let view = order_values_descending(&source, |v| v.clone()).unwrap();
        assert_eq!(view.to_vec().unwrap().len(), 2);

        if let Some(list) = source.as_object().unwrap().write().as_list_mut() {
            list.items.push(Value::from(9i32));
        }
        assert_eq!(view.to_vec().unwrap()[0], Value::from(9i32));
    }

    #[test]
    fn test_custom_sequence_failure_surfaces_on_enumeration() {
        struct Closed;
        impl Enumerable for Closed {
            fn type_name(&self) -> &str {
                "Closed"
            }
            fn enumerate(&self) -> Result<Vec<Value>> {
                Err(FicheError::EnumerationFailed("closed".into()))
            }
        }
        let view = order_values(&Value::custom(Closed), |v| v.clone()).unwrap();
        assert!(matches!(view.iter(), Err(FicheError::EnumerationFailed(_))));
    }
}
