/*!
 * Sort Steps
 *
 * A sort step is one ordering criterion. Steps form a chain from the
 * `then_by` leaf back to the `order_by` root; per enumeration each step
 * materializes its key column into a sorter, and the sorters are linked
 * root first so ties fall through to the next-lower priority.
 */

use super::comparer::KeyComparer;
use crate::core::errors::Result;
use crate::core::types::SortDirection;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::rc::Rc;

/// Key column of one step plus the link to the next-lower priority
pub(crate) trait Sorter<'s> {
    /// Compare the elements at two buffer positions
    fn compare_keys(&self, left: usize, right: usize) -> Result<Ordering>;

    fn link(&mut self, next: Box<dyn Sorter<'s> + 's>);
}

/// Type-erased ordering criterion
pub(crate) trait SortStep<T> {
    /// Extract the keys of every buffered element
    fn sorter<'s>(&'s self, items: &[T]) -> Box<dyn Sorter<'s> + 's>;
}

pub(crate) struct KeyStep<F, C, K> {
    selector: F,
    comparer: C,
    direction: SortDirection,
    _key: PhantomData<fn() -> K>,
}

impl<F, C, K> KeyStep<F, C, K> {
    pub(crate) fn new(selector: F, comparer: C, direction: SortDirection) -> Self {
        Self {
            selector,
            comparer,
            direction,
            _key: PhantomData,
        }
    }
}

impl<T, F, C, K> SortStep<T> for KeyStep<F, C, K>
where
    F: Fn(&T) -> K,
    C: KeyComparer<K>,
{
    fn sorter<'s>(&'s self, items: &[T]) -> Box<dyn Sorter<'s> + 's> {
        Box::new(KeyedSorter {
            keys: items.iter().map(&self.selector).collect::<Vec<K>>(),
            comparer: &self.comparer,
            direction: self.direction,
            next: None,
        })
    }
}

struct KeyedSorter<'s, K, C> {
    keys: Vec<K>,
    comparer: &'s C,
    direction: SortDirection,
    next: Option<Box<dyn Sorter<'s> + 's>>,
}

impl<'s, K, C: KeyComparer<K>> Sorter<'s> for KeyedSorter<'s, K, C> {
    fn compare_keys(&self, left: usize, right: usize) -> Result<Ordering> {
        let ordering = self.comparer.compare(&self.keys[left], &self.keys[right])?;
        if ordering != Ordering::Equal {
            return Ok(self.direction.apply(ordering));
        }
        match &self.next {
            Some(next) => next.compare_keys(left, right),
            // Stable: ties keep source order regardless of direction
            None => Ok(left.cmp(&right)),
        }
    }

    fn link(&mut self, next: Box<dyn Sorter<'s> + 's>) {
        self.next = Some(next);
    }
}

/// One node of the step chain
pub(crate) struct StepNode<'a, T> {
    step: Box<dyn SortStep<T> + 'a>,
    parent: Option<Rc<StepNode<'a, T>>>,
}

impl<'a, T> StepNode<'a, T> {
    pub(crate) fn root(step: Box<dyn SortStep<T> + 'a>) -> Self {
        Self { step, parent: None }
    }

    pub(crate) fn child(step: Box<dyn SortStep<T> + 'a>, parent: Rc<StepNode<'a, T>>) -> Self {
        Self {
            step,
            parent: Some(parent),
        }
    }

    /// Number of steps from the root to this node
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 1;
        let mut parent = self.parent.as_deref();
        while let Some(node) = parent {
            depth += 1;
            parent = node.parent.as_deref();
        }
        depth
    }

    /// Compute key columns root first, then link root -> ... -> leaf
    pub(crate) fn build_sorter<'s>(&'s self, items: &[T]) -> Box<dyn Sorter<'s> + 's> {
        let mut nodes: Vec<&'s StepNode<'a, T>> = Vec::with_capacity(self.depth());
        let mut current = Some(self);
        while let Some(node) = current {
            nodes.push(node);
            current = node.parent.as_deref();
        }

        let mut sorters: Vec<Box<dyn Sorter<'s> + 's>> = nodes
            .iter()
            .rev()
            .map(|node| node.step.sorter(items))
            .collect();

        let mut chain = sorters.pop().unwrap_or_else(|| self.step.sorter(items));
        while let Some(mut sorter) = sorters.pop() {
            sorter.link(chain);
            chain = sorter;
        }
        chain
    }
}
