/*!
 * Fiche Library
 *
 * General-purpose object utilities:
 * - Lazy, stable multi-key ordering of sequences
 * - Deep clone, deep copy with overrides, and deep equality over object graphs
 * - Sequence extensions and composite-key maps
 * - Pooled cryptographic random source and cachable async tasks
 */

pub mod collections;
pub mod core;
pub mod graph;
pub mod ordering;
pub mod random;
pub mod reflect;
pub mod tasks;

// Re-exports
pub use crate::core::{
    init_tracing, ComparableExt, DefaultEquality, EqualityStrategy, FicheConfig, FicheError,
    RandomConfig, Result, SortDirection, WalkConfig,
};
pub use collections::{CompositeKey, CompositeKeyMap, ConcurrentCompositeKeyMap, SequenceExt};
pub use graph::{copy, deep_clone, deep_equals, DeepEqualityComparer, FieldPath, Overrides};
pub use ordering::{
    order_values, order_values_descending, order_values_with, KeyComparer, OrderByExt,
    OrderedSequence,
};
pub use random::{RandomSource, SafeRandom};
pub use reflect::{Object, ObjectRef, Primitive, TypeDescriptor, TypeRegistry, Value};
pub use tasks::{wait_sync, CachableTask};
