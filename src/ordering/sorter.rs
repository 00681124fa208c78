/*!
 * Index Sort
 * Quick sort over a permutation of buffer positions
 */

use super::step::Sorter;
use crate::core::errors::Result;

/// Sort the positions `0..count` by the sorter chain
///
/// Returns the permutation map: `map[k]` is the buffer position of the
/// k-th element in sorted order.
pub(crate) fn sort_indices(sorter: &dyn Sorter<'_>, count: usize) -> Result<Vec<usize>> {
    let mut map: Vec<usize> = (0..count).collect();
    if count > 1 {
        quick_sort(sorter, &mut map, 0, count as isize - 1)?;
    }
    Ok(map)
}

/// Middle-pivot partitioning; recurses into the smaller side and loops on the larger
fn quick_sort(sorter: &dyn Sorter<'_>, map: &mut [usize], mut left: isize, mut right: isize) -> Result<()> {
    let len = map.len() as isize;
    loop {
        let mut i = left;
        let mut j = right;
        let pivot = map[(i + ((j - i) >> 1)) as usize];
        loop {
            while i < len && sorter.compare_keys(pivot, map[i as usize])?.is_gt() {
                i += 1;
            }
            while j >= 0 && sorter.compare_keys(pivot, map[j as usize])?.is_lt() {
                j -= 1;
            }
            if i > j {
                break;
            }
            if i < j {
                map.swap(i as usize, j as usize);
            }
            i += 1;
            j -= 1;
            if i > j {
                break;
            }
        }

        if j - left <= right - i {
            if left < j {
                quick_sort(sorter, map, left, j)?;
            }
            left = i;
        } else {
            if i < right {
                quick_sort(sorter, map, i, right)?;
            }
            right = j;
        }

        if left >= right {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::FicheError;
    use std::cmp::Ordering;

    struct Keys(Vec<i32>);

    impl<'s> Sorter<'s> for Keys {
        fn compare_keys(&self, left: usize, right: usize) -> Result<Ordering> {
            Ok(self.0[left].cmp(&self.0[right]).then(left.cmp(&right)))
        }

        fn link(&mut self, _next: Box<dyn Sorter<'s> + 's>) {}
    }

    struct Failing;

    impl<'s> Sorter<'s> for Failing {
        fn compare_keys(&self, _left: usize, _right: usize) -> Result<Ordering> {
            Err(FicheError::invalid_operation("incomparable"))
        }

        fn link(&mut self, _next: Box<dyn Sorter<'s> + 's>) {}
    }

    fn sorted(keys: Vec<i32>) -> Vec<i32> {
        let sorter = Keys(keys.clone());
        sort_indices(&sorter, keys.len())
            .unwrap()
            .into_iter()
            .map(|i| keys[i])
            .collect()
    }

    #[test]
    fn test_sorts_small_inputs() {
        assert_eq!(sorted(vec![]), Vec::<i32>::new());
        assert_eq!(sorted(vec![1]), vec![1]);
        assert_eq!(sorted(vec![2, 1]), vec![1, 2]);
        assert_eq!(sorted(vec![3, 1, 2, 3, 0]), vec![0, 1, 2, 3, 3]);
    }

    #[test]
    fn test_sorts_reversed_and_duplicate_runs() {
        let input: Vec<i32> = (0..200).rev().map(|v| v % 17).collect();
        let mut expected = input.clone();
        expected.sort();
        assert_eq!(sorted(input), expected);
    }

    #[test]
    fn test_permutation_is_stable() {
        let keys = vec![1, 0, 1, 0, 1];
        let map = sort_indices(&Keys(keys), 5).unwrap();
        assert_eq!(map, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_comparison_error_propagates() {
        assert!(sort_indices(&Failing, 3).is_err());
        assert!(sort_indices(&Failing, 1).is_ok());
    }
}
