/*!
 * Sequence Extensions
 *
 * Lazy adapters and queries over any iterator. Adapters that can discover
 * a bad index only after draining their source yield the error as their
 * final item instead of failing up front.
 */

use crate::core::errors::{FicheError, Result};
use crate::core::traits::{DefaultEquality, EqualityStrategy};
use crate::ordering::{OrderByExt, OrderedSequence};
use crate::random::RandomSource;
use crate::reflect::{TypeRegistry, Value};
use ahash::AHashMap;
use std::hash::Hash;
use std::iter::{Chain, Once};

pub trait SequenceExt: Iterator + Sized {
    /// Yield the source, then `item`
    fn append(self, item: Self::Item) -> Chain<Self, Once<Self::Item>> {
        self.chain(std::iter::once(item))
    }

    /// Yield the source, then every element of `items`
    fn append_all<J>(self, items: J) -> Chain<Self, J::IntoIter>
    where
        J: IntoIterator<Item = Self::Item>,
    {
        self.chain(items)
    }

    /// Yield `item` at position `index`
    ///
    /// `index == len` appends. A larger index yields an `OutOfRange` error
    /// after the whole source.
    fn insert_at(self, index: usize, item: Self::Item) -> InsertAt<Self, Once<Self::Item>> {
        InsertAt::new(self, index, std::iter::once(item))
    }

    /// Yield every element of `items` starting at position `index`
    fn insert_all_at<J>(self, index: usize, items: J) -> InsertAt<Self, J::IntoIter>
    where
        J: IntoIterator<Item = Self::Item>,
    {
        InsertAt::new(self, index, items.into_iter())
    }

    /// Yield every element except the one at `index`
    ///
    /// When the source ends before `index`, the last item is an `OutOfRange` error.
    fn skip_index(self, index: usize) -> SkipIndex<Self> {
        SkipIndex {
            source: self,
            index,
            position: 0,
            skipped: false,
            done: false,
        }
    }

    /// Every ordered selection of `count` elements, by source position
    ///
    /// `count == 0` yields one empty selection; `count` above the length
    /// yields nothing. Equal elements at different positions are distinct.
    fn permute(self, count: usize) -> Permute<Self::Item>
    where
        Self::Item: Clone,
    {
        Permute::new(self.collect(), count)
    }

    /// Every ordering of the whole sequence
    fn permutations(self) -> Permute<Self::Item>
    where
        Self::Item: Clone,
    {
        let items: Vec<Self::Item> = self.collect();
        let count = items.len();
        Permute::new(items, count)
    }

    /// Random order, drawn afresh on each enumeration
    fn shuffle<'a, R>(self, random: &'a R) -> OrderedSequence<'a, Self::Item>
    where
        Self: Clone + 'a,
        R: RandomSource + ?Sized,
    {
        self.order_by(move |_| random.next_non_negative())
    }

    fn are_elements_unique(self) -> bool
    where
        Self::Item: Eq + Hash,
    {
        self.are_elements_unique_by(DefaultEquality)
    }

    /// Whether no two elements are equal under `strategy`
    fn are_elements_unique_by<E>(self, strategy: E) -> bool
    where
        E: EqualityStrategy<Self::Item>,
    {
        let mut seen: AHashMap<u64, Vec<Self::Item>> = AHashMap::default();
        for item in self {
            let bucket = seen.entry(strategy.hash(&item)).or_default();
            if bucket.iter().any(|other| strategy.equals(other, &item)) {
                return false;
            }
            bucket.push(item);
        }
        true
    }

    /// Distinct elements not equal to `item`
    fn except(self, item: Self::Item) -> Except<Self, DefaultEquality>
    where
        Self::Item: Eq + Hash + Clone,
    {
        self.except_by(item, DefaultEquality)
    }

    /// Distinct elements not equal to `item` under `strategy`
    fn except_by<E>(self, item: Self::Item, strategy: E) -> Except<Self, E>
    where
        Self::Item: Clone,
        E: EqualityStrategy<Self::Item>,
    {
        let mut seen: AHashMap<u64, Vec<Self::Item>> = AHashMap::default();
        seen.insert(strategy.hash(&item), vec![item]);
        Except {
            source: self,
            strategy,
            seen,
        }
    }

    fn index_of(mut self, item: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        self.position(|element| element == *item)
    }

    fn index_of_by<E>(mut self, item: &Self::Item, strategy: E) -> Option<usize>
    where
        E: EqualityStrategy<Self::Item>,
    {
        self.position(|element| strategy.equals(item, &element))
    }

    fn last_index_of(self, item: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        self.enumerate()
            .filter(|(_, element)| element == item)
            .last()
            .map(|(index, _)| index)
    }

    fn last_index_of_by<E>(self, item: &Self::Item, strategy: E) -> Option<usize>
    where
        E: EqualityStrategy<Self::Item>,
    {
        self.enumerate()
            .filter(|(_, element)| strategy.equals(item, element))
            .last()
            .map(|(index, _)| index)
    }
}

impl<I: Iterator> SequenceExt for I {}

/// Whether `source` is absent or yields nothing
pub fn is_null_or_empty<I: IntoIterator>(source: Option<I>) -> bool {
    source.map_or(true, |items| items.into_iter().next().is_none())
}

/// Whether a dynamic value is null-like or a sequence without elements
///
/// Fails with `InvalidArgument` for a non-sequence value.
pub fn is_null_or_empty_value(source: &Value) -> Result<bool> {
    if TypeRegistry::global().is_null(source) {
        return Ok(true);
    }
    match source.as_object() {
        Some(object) if object.read().is_sequence() => Ok(object.read().elements()?.is_empty()),
        _ => Err(FicheError::invalid_argument("source", "value is not a sequence")),
    }
}

/// Adapter returned by [`SequenceExt::insert_at`] and [`SequenceExt::insert_all_at`]
#[derive(Debug, Clone)]
pub struct InsertAt<I, J> {
    source: I,
    index: usize,
    position: usize,
    pending: Option<J>,
    active: Option<J>,
    done: bool,
}

impl<I, J> InsertAt<I, J> {
    fn new(source: I, index: usize, items: J) -> Self {
        Self {
            source,
            index,
            position: 0,
            pending: Some(items),
            active: None,
            done: false,
        }
    }
}

impl<I, J> Iterator for InsertAt<I, J>
where
    I: Iterator,
    J: Iterator<Item = I::Item>,
{
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(items) = self.active.as_mut() {
                if let Some(item) = items.next() {
                    return Some(Ok(item));
                }
                self.active = None;
            }
            if self.done {
                return None;
            }
            if self.position == self.index && self.pending.is_some() {
                self.active = self.pending.take();
                continue;
            }
            match self.source.next() {
                Some(item) => {
                    self.position += 1;
                    return Some(Ok(item));
                }
                None => {
                    self.done = true;
                    if self.position < self.index {
                        return Some(Err(FicheError::out_of_range(
                            "index",
                            format!("{} exceeds the sequence length {}", self.index, self.position),
                        )));
                    }
                    return None;
                }
            }
        }
    }
}

/// Adapter returned by [`SequenceExt::skip_index`]
#[derive(Debug, Clone)]
pub struct SkipIndex<I> {
    source: I,
    index: usize,
    position: usize,
    skipped: bool,
    done: bool,
}

impl<I: Iterator> Iterator for SkipIndex<I> {
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(item) = self.source.next() {
            let position = self.position;
            self.position += 1;
            if position == self.index {
                self.skipped = true;
                continue;
            }
            return Some(Ok(item));
        }
        self.done = true;
        if self.skipped {
            None
        } else {
            Some(Err(FicheError::out_of_range(
                "index",
                format!("{} was never reached; the sequence has {} elements", self.index, self.position),
            )))
        }
    }
}

/// Adapter returned by [`SequenceExt::except`] and [`SequenceExt::except_by`]
pub struct Except<I: Iterator, E> {
    source: I,
    strategy: E,
    seen: AHashMap<u64, Vec<I::Item>>,
}

impl<I, E> Iterator for Except<I, E>
where
    I: Iterator,
    I::Item: Clone,
    E: EqualityStrategy<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        for item in self.source.by_ref() {
            let bucket = self.seen.entry(self.strategy.hash(&item)).or_default();
            if bucket.iter().any(|other| self.strategy.equals(other, &item)) {
                continue;
            }
            bucket.push(item.clone());
            return Some(item);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PermuteState {
    Start,
    Running,
    Done,
}

/// Adapter returned by [`SequenceExt::permute`] and [`SequenceExt::permutations`]
///
/// Selections are produced in lexicographic order of source positions.
#[derive(Debug, Clone)]
pub struct Permute<T> {
    items: Vec<T>,
    count: usize,
    positions: Vec<usize>,
    state: PermuteState,
}

impl<T: Clone> Permute<T> {
    fn new(items: Vec<T>, count: usize) -> Self {
        Self {
            items,
            count,
            positions: Vec::with_capacity(count),
            state: PermuteState::Start,
        }
    }

    fn current(&self) -> Vec<T> {
        self.positions
            .iter()
            .map(|&position| self.items[position].clone())
            .collect()
    }

    /// Step to the next tuple of distinct positions
    fn advance(&mut self) -> bool {
        let len = self.items.len();
        for depth in (0..self.count).rev() {
            let mut candidate = self.positions[depth] + 1;
            while candidate < len && self.positions[..depth].contains(&candidate) {
                candidate += 1;
            }
            if candidate >= len {
                continue;
            }
            self.positions[depth] = candidate;
            for slot in depth + 1..self.count {
                let mut lowest = 0;
                while self.positions[..slot].contains(&lowest) {
                    lowest += 1;
                }
                self.positions[slot] = lowest;
            }
            return true;
        }
        false
    }
}

impl<T: Clone> Iterator for Permute<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        match self.state {
            PermuteState::Done => None,
            PermuteState::Start => {
                if self.count > self.items.len() {
                    self.state = PermuteState::Done;
                    return None;
                }
                self.positions = (0..self.count).collect();
                self.state = if self.count == 0 {
                    PermuteState::Done
                } else {
                    PermuteState::Running
                };
                Some(self.current())
            }
            PermuteState::Running => {
                if self.advance() {
                    Some(self.current())
                } else {
                    self.state = PermuteState::Done;
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DeepEqualityComparer;

    fn collect<T>(items: impl Iterator<Item = Result<T>>) -> Result<Vec<T>> {
        items.collect()
    }

    #[test]
    fn test_append() {
        assert_eq!(vec![1, 2].into_iter().append(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(vec![1].into_iter().append_all(vec![2, 3]).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_at() {
        let letters = ["a", "b", "c"];
        assert_eq!(collect(letters.into_iter().insert_at(1, "X")).unwrap(), vec!["a", "X", "b", "c"]);
        assert_eq!(collect(letters.into_iter().insert_at(0, "X")).unwrap(), vec!["X", "a", "b", "c"]);
        assert_eq!(collect(letters.into_iter().insert_at(3, "X")).unwrap(), vec!["a", "b", "c", "X"]);

        let err = collect(letters.into_iter().insert_at(5, "X")).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_insert_at_error_is_last_item() {
        let items: Vec<Result<i32>> = vec![1, 2].into_iter().insert_at(4, 9).collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok() && items[1].is_ok());
        assert!(matches!(items[2], Err(FicheError::OutOfRange { .. })));
    }

    #[test]
    fn test_insert_all_at() {
        let out = collect(vec![1, 4].into_iter().insert_all_at(1, vec![2, 3])).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
        let empty = collect(Vec::<i32>::new().into_iter().insert_all_at(0, vec![7, 8])).unwrap();
        assert_eq!(empty, vec![7, 8]);
    }

    #[test]
    fn test_skip_index() {
        assert_eq!(collect(vec![1, 2, 3].into_iter().skip_index(1)).unwrap(), vec![1, 3]);
        assert_eq!(collect(vec![1, 2, 3].into_iter().skip_index(2)).unwrap(), vec![1, 2]);
        let items: Vec<Result<i32>> = vec![1, 2].into_iter().skip_index(2).collect();
        assert_eq!(items.len(), 3);
        assert!(items[2].is_err());
    }

    #[test]
    fn test_permute() {
        let pairs: Vec<Vec<char>> = "abc".chars().permute(2).collect();
        assert_eq!(
            pairs,
            vec![
                vec!['a', 'b'],
                vec!['a', 'c'],
                vec!['b', 'a'],
                vec!['b', 'c'],
                vec!['c', 'a'],
                vec!['c', 'b'],
            ]
        );
        assert_eq!("abc".chars().permute(0).collect::<Vec<_>>(), vec![Vec::<char>::new()]);
        assert_eq!("ab".chars().permute(3).count(), 0);
        assert_eq!((0..4).permutations().count(), 24);
        assert_eq!(vec![1, 1].into_iter().permutations().count(), 2);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let random = crate::random::SafeRandom::shared();
        let shuffled = (0..50).shuffle(random);
        let mut first = shuffled.to_vec().unwrap();
        first.sort();
        assert_eq!(first, (0..50).collect::<Vec<_>>());
        assert_eq!(shuffled.to_vec().unwrap().len(), 50);
    }

    #[test]
    fn test_uniqueness() {
        assert!(vec![1, 2, 3].into_iter().are_elements_unique());
        assert!(!vec![1, 2, 1].into_iter().are_elements_unique());
        assert!(Vec::<u8>::new().into_iter().are_elements_unique());
    }

    #[test]
    fn test_uniqueness_with_deep_equality() {
        let list = |n: i32| Value::list("List", vec![Value::from(n)]);
        let comparer = DeepEqualityComparer::default();
        assert!(!vec![list(1), list(1)].into_iter().are_elements_unique_by(&comparer));
        assert!(vec![list(1), list(2)].into_iter().are_elements_unique_by(&comparer));
        // Identity equality sees two distinct objects
        assert!(vec![list(1), list(1)].into_iter().are_elements_unique());
    }

    #[test]
    fn test_except_is_distinct() {
        let out: Vec<i32> = vec![1, 2, 2, 3, 1, 4].into_iter().except(1).collect();
        assert_eq!(out, vec![2, 3, 4]);
    }

    #[test]
    fn test_index_queries() {
        let items = ["a", "b", "a"];
        assert_eq!(items.iter().index_of(&&"a"), Some(0));
        assert_eq!(items.iter().last_index_of(&&"a"), Some(2));
        assert_eq!(items.iter().index_of(&&"z"), None);
        assert_eq!(items.into_iter().last_index_of_by(&"b", DefaultEquality), Some(1));
        assert_eq!(items.into_iter().index_of_by(&"a", DefaultEquality), Some(0));
    }

    #[test]
    fn test_null_or_empty() {
        assert!(is_null_or_empty::<Vec<i32>>(None));
        assert!(is_null_or_empty(Some(Vec::<i32>::new())));
        assert!(!is_null_or_empty(Some(vec![1])));

        assert!(is_null_or_empty_value(&Value::Null).unwrap());
        assert!(is_null_or_empty_value(&Value::list("List", vec![])).unwrap());
        assert!(!is_null_or_empty_value(&Value::list("List", vec![Value::from(1i32)])).unwrap());
        assert!(is_null_or_empty_value(&Value::from(1i32)).is_err());
    }
}
