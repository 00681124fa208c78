/*!
 * Collection Mutation
 * Bounds-checked insertion and in-place synchronization of vectors
 */

use crate::core::errors::Result;
use crate::core::traits::{DefaultEquality, EqualityStrategy};
use crate::core::validation::ensure_in_range;
use tracing::debug;

/// Insert `item` at `index`, where `index == len` appends
pub fn collection_insert<T>(collection: &mut Vec<T>, index: usize, item: T) -> Result<()> {
    ensure_in_range(index, 0, collection.len(), "index")?;
    collection.insert(index, item);
    Ok(())
}

/// Synchronize `collection` with `updated` using `Eq`
pub fn update<T>(collection: &mut Vec<T>, updated: &[T]) -> Result<()>
where
    T: Eq + std::hash::Hash + Clone,
{
    update_by(collection, updated, DefaultEquality)
}

/// Synchronize `collection` with `updated` under `strategy`
///
/// Elements missing from `updated` are removed; elements of `updated` not
/// yet present are inserted at their position in `updated`. Elements
/// present in both keep their current position.
pub fn update_by<T, E>(collection: &mut Vec<T>, updated: &[T], strategy: E) -> Result<()>
where
    T: Clone,
    E: EqualityStrategy<T>,
{
    let before = collection.len();
    collection.retain(|item| updated.iter().any(|other| strategy.equals(item, other)));
    let removed = before - collection.len();

    let mut inserted = 0usize;
    for item in updated {
        if collection.iter().any(|existing| strategy.equals(existing, item)) {
            continue;
        }
        let index = updated
            .iter()
            .position(|other| strategy.equals(other, item))
            .unwrap_or(collection.len())
            .min(collection.len());
        collection_insert(collection, index, item.clone())?;
        inserted += 1;
    }

    debug!(removed, inserted, "collection synchronized");
    Ok(())
}
