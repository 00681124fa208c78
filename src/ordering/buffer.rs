/*!
 * Sequence Buffer
 * Snapshot of a source, taken once per enumeration
 */

use crate::core::errors::Result;

/// Materialized elements of one enumeration
#[derive(Debug, Clone)]
pub(crate) struct Buffer<T> {
    items: Vec<T>,
}

impl<T> Buffer<T> {
    /// Drain the source exactly once
    pub(crate) fn capture(source: &dyn Fn() -> Result<Vec<T>>) -> Result<Self> {
        Ok(Self { items: source()? })
    }

    #[inline]
    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn into_items(self) -> Vec<T> {
        self.items
    }
}
