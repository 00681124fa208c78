/*!
 * Core Traits
 * Comparison helpers and equality strategies
 */

use std::hash::{Hash, Hasher};

/// Readable comparisons over `PartialOrd`
///
/// Incomparable values (e.g. `NaN`) answer `false` to every query.
pub trait ComparableExt: PartialOrd + Sized {
    #[inline]
    fn is_less_than(&self, other: &Self) -> bool {
        self < other
    }

    #[inline]
    fn is_less_than_or_equal(&self, other: &Self) -> bool {
        self <= other
    }

    #[inline]
    fn is_greater_than(&self, other: &Self) -> bool {
        self > other
    }

    #[inline]
    fn is_greater_than_or_equal(&self, other: &Self) -> bool {
        self >= other
    }

    /// Whether `self` lies between `lower` and `upper`
    ///
    /// Bounds are inclusive unless `exclude_bounds` is set.
    fn is_between(&self, lower: &Self, upper: &Self, exclude_bounds: bool) -> bool {
        if exclude_bounds {
            self > lower && self < upper
        } else {
            self >= lower && self <= upper
        }
    }

    /// Clamp into `[lower, upper]`
    fn clamp_between(self, lower: Self, upper: Self) -> Self {
        if self < lower {
            lower
        } else if self > upper {
            upper
        } else {
            self
        }
    }
}

impl<T: PartialOrd> ComparableExt for T {}

/// Pluggable equality used by the sequence operations
///
/// `hash` must agree with `equals`: equal values hash equally.
pub trait EqualityStrategy<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;
    fn hash(&self, value: &T) -> u64;
}

impl<T: ?Sized, E: EqualityStrategy<T> + ?Sized> EqualityStrategy<T> for &E {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }
}

/// `Eq + Hash` equality
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquality;

impl<T: Eq + Hash + ?Sized> EqualityStrategy<T> for DefaultEquality {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        let mut hasher = ahash::AHasher::default();
        value.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_comparisons() {
        assert!(1i32.is_less_than(&2));
        assert!(2i64.is_less_than_or_equal(&2));
        assert!("b".is_greater_than(&"a"));
        assert!(3u8.is_greater_than_or_equal(&3));
    }

    #[test]
    fn test_is_between() {
        assert!(5i32.is_between(&1, &5, false));
        assert!(!5i32.is_between(&1, &5, true));
        assert!(3i32.is_between(&1, &5, true));
        assert!(!f64::NAN.is_between(&0.0, &1.0, false));
    }

    #[test]
    fn test_clamp_between() {
        assert_eq!(10i32.clamp_between(0, 5), 5);
        assert_eq!((-1i32).clamp_between(0, 5), 0);
        assert_eq!(3i32.clamp_between(0, 5), 3);
    }

    #[test]
    fn test_default_equality_agrees_with_hash() {
        let eq = DefaultEquality;
        assert!(eq.equals("abc", "abc"));
        assert!(!eq.equals(&1u32, &2u32));
        assert_eq!(
            EqualityStrategy::<str>::hash(&eq, "abc"),
            EqualityStrategy::<str>::hash(&eq, "abc")
        );
    }
}
