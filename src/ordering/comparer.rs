/*!
 * Key Comparers
 * Ordering strategies for sort keys
 */

use crate::core::errors::{FicheError, Result};
use crate::reflect::Value;
use std::cmp::Ordering;
use std::rc::Rc;
use std::sync::Arc;

/// Compares two sort keys
///
/// A comparer may refuse a pair of keys; the error surfaces when the
/// ordered view is enumerated, before any element is yielded.
pub trait KeyComparer<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Result<Ordering>;
}

/// Natural `Ord` ordering of the key type
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> KeyComparer<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        Ok(a.cmp(b))
    }
}

/// `PartialOrd` ordering; incomparable pairs (e.g. `NaN`) fail with `InvalidOperation`
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialOrder;

impl<K: PartialOrd + std::fmt::Debug + ?Sized> KeyComparer<K> for PartialOrder {
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        a.partial_cmp(b).ok_or_else(|| {
            FicheError::invalid_operation(format!("keys {:?} and {:?} are not comparable", a, b))
        })
    }
}

/// Infallible comparison closure
#[derive(Clone, Copy)]
pub struct FnComparer<F>(pub F);

impl<K: ?Sized, F> KeyComparer<K> for FnComparer<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        Ok((self.0)(a, b))
    }
}

/// Wrap a closure as a comparer
pub fn by_fn<K: ?Sized, F: Fn(&K, &K) -> Ordering>(f: F) -> FnComparer<F> {
    FnComparer(f)
}

/// Natural ordering of dynamic values
///
/// Null sorts before everything; primitives compare when their kinds share
/// an ordering (numbers across widths). Any other pair fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueComparer;

impl KeyComparer<Value> for ValueComparer {
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        match (a, b) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Null, _) => Ok(Ordering::Less),
            (_, Value::Null) => Ok(Ordering::Greater),
            (Value::Primitive(x), Value::Primitive(y)) => x.try_compare(y).ok_or_else(|| {
                FicheError::invalid_operation(format!(
                    "cannot compare {} with {}",
                    x.type_name(),
                    y.type_name()
                ))
            }),
            _ => Err(FicheError::invalid_operation(format!(
                "values of type {} and {} have no natural ordering",
                a.type_name().as_deref().unwrap_or("null"),
                b.type_name().as_deref().unwrap_or("null")
            ))),
        }
    }
}

impl<K: ?Sized, C: KeyComparer<K> + ?Sized> KeyComparer<K> for &C {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        (**self).compare(a, b)
    }
}

impl<K: ?Sized, C: KeyComparer<K> + ?Sized> KeyComparer<K> for Box<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        (**self).compare(a, b)
    }
}

impl<K: ?Sized, C: KeyComparer<K> + ?Sized> KeyComparer<K> for Rc<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        (**self).compare(a, b)
    }
}

impl<K: ?Sized, C: KeyComparer<K> + ?Sized> KeyComparer<K> for Arc<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        (**self).compare(a, b)
    }
}
