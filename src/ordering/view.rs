/*!
 * Ordered Views
 *
 * Lazy, restartable sorted views over a source. Nothing is read from the
 * source until the view is enumerated; every enumeration buffers the
 * source again, recomputes all keys and re-sorts.
 */

use super::buffer::Buffer;
use super::comparer::{KeyComparer, NaturalOrder};
use super::sorter::sort_indices;
use super::step::{KeyStep, SortStep, StepNode};
use crate::core::errors::Result;
use crate::core::types::SortDirection;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

type Source<'a, T> = Rc<dyn Fn() -> Result<Vec<T>> + 'a>;

/// Sorted view produced by `order_by` and refined by `then_by`
///
/// `then_by` is only available here, so a secondary key can never be added
/// to an unordered sequence.
pub struct OrderedSequence<'a, T> {
    source: Source<'a, T>,
    chain: Rc<StepNode<'a, T>>,
}

impl<'a, T> Clone for OrderedSequence<'a, T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            chain: Rc::clone(&self.chain),
        }
    }
}

impl<'a, T> fmt::Debug for OrderedSequence<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSequence")
            .field("steps", &self.chain.depth())
            .finish()
    }
}

impl<'a, T> OrderedSequence<'a, T> {
    /// Root view over a fallible source
    pub fn from_source<S, K, F, C>(source: S, key: F, comparer: C, direction: SortDirection) -> Self
    where
        S: Fn() -> Result<Vec<T>> + 'a,
        F: Fn(&T) -> K + 'a,
        C: KeyComparer<K> + 'a,
        K: 'a,
    {
        let step: Box<dyn SortStep<T> + 'a> = Box::new(KeyStep::new(key, comparer, direction));
        Self {
            source: Rc::new(source),
            chain: Rc::new(StepNode::root(step)),
        }
    }

    /// Break ties of this ordering by `key`, ascending
    pub fn then_by<K, F>(&self, key: F) -> Self
    where
        F: Fn(&T) -> K + 'a,
        K: Ord + 'a,
    {
        self.then_by_with(key, NaturalOrder, SortDirection::Ascending)
    }

    /// Break ties of this ordering by `key`, descending
    pub fn then_by_descending<K, F>(&self, key: F) -> Self
    where
        F: Fn(&T) -> K + 'a,
        K: Ord + 'a,
    {
        self.then_by_with(key, NaturalOrder, SortDirection::Descending)
    }

    /// Break ties of this ordering with an explicit comparer and direction
    pub fn then_by_with<K, F, C>(&self, key: F, comparer: C, direction: SortDirection) -> Self
    where
        F: Fn(&T) -> K + 'a,
        C: KeyComparer<K> + 'a,
        K: 'a,
    {
        let step: Box<dyn SortStep<T> + 'a> = Box::new(KeyStep::new(key, comparer, direction));
        Self {
            source: Rc::clone(&self.source),
            chain: Rc::new(StepNode::child(step, Rc::clone(&self.chain))),
        }
    }

    /// Number of chained sort steps
    pub fn steps(&self) -> usize {
        self.chain.depth()
    }

    /// Buffer, sort, and return the permutation of buffer positions
    fn sorted(&self) -> Result<(Vec<T>, Vec<usize>)> {
        let buffer = Buffer::capture(&*self.source)?;
        let map = {
            let sorter = self.chain.build_sorter(buffer.items());
            sort_indices(&*sorter, buffer.len())?
        };
        debug!(
            elements = buffer.len(),
            steps = self.chain.depth(),
            "ordered sequence sorted"
        );
        Ok((buffer.into_items(), map))
    }

    /// Enumerate in sorted order
    ///
    /// All sorting happens here; comparer failures are reported before any
    /// element is yielded.
    pub fn iter(&self) -> Result<Ordered<T>> {
        let (items, map) = self.sorted()?;
        Ok(Ordered::new(items, map))
    }

    /// Collect the sorted elements
    pub fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.iter()?.collect())
    }

    /// Source positions in sorted order
    pub fn sorted_indices(&self) -> Result<Vec<usize>> {
        Ok(self.sorted()?.1)
    }
}

/// Iterator over one enumeration of an ordered view
#[derive(Debug)]
pub struct Ordered<T> {
    items: Vec<Option<T>>,
    map: std::vec::IntoIter<usize>,
}

impl<T> Ordered<T> {
    fn new(items: Vec<T>, map: Vec<usize>) -> Self {
        Self {
            items: items.into_iter().map(Some).collect(),
            map: map.into_iter(),
        }
    }
}

impl<T> Iterator for Ordered<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let index = self.map.next()?;
        self.items[index].take()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map.size_hint()
    }
}

impl<T> ExactSizeIterator for Ordered<T> {}

/// `order_by` family on any cloneable source
///
/// The source is cloned and iterated once per enumeration of the view.
pub trait OrderByExt: IntoIterator + Clone + Sized {
    /// Order ascending by `key`
    fn order_by<'a, K, F>(self, key: F) -> OrderedSequence<'a, Self::Item>
    where
        Self: 'a,
        F: Fn(&Self::Item) -> K + 'a,
        K: Ord + 'a,
    {
        self.order_by_with(key, NaturalOrder, SortDirection::Ascending)
    }

    /// Order descending by `key`
    fn order_by_descending<'a, K, F>(self, key: F) -> OrderedSequence<'a, Self::Item>
    where
        Self: 'a,
        F: Fn(&Self::Item) -> K + 'a,
        K: Ord + 'a,
    {
        self.order_by_with(key, NaturalOrder, SortDirection::Descending)
    }

    /// Order by `key` with an explicit comparer and direction
    fn order_by_with<'a, K, F, C>(
        self,
        key: F,
        comparer: C,
        direction: SortDirection,
    ) -> OrderedSequence<'a, Self::Item>
    where
        Self: 'a,
        F: Fn(&Self::Item) -> K + 'a,
        C: KeyComparer<K> + 'a,
        K: 'a,
    {
        OrderedSequence::from_source(
            move || Ok(self.clone().into_iter().collect()),
            key,
            comparer,
            direction,
        )
    }
}

impl<S: IntoIterator + Clone> OrderByExt for S {}
