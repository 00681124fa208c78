/*!
 * Collections
 *
 * Sequence adapters, collection mutation helpers, and composite-key maps
 */

mod collection;
mod composite_key;
mod composite_map;
mod sequence;

pub use collection::{collection_insert, update, update_by};
pub use composite_key::CompositeKey;
pub use composite_map::{CompositeKeyMap, ConcurrentCompositeKeyMap};
pub use sequence::{
    is_null_or_empty, is_null_or_empty_value, Except, InsertAt, Permute, SequenceExt, SkipIndex,
};
