/*!
 * Graph Walker
 *
 * Deep equality and deep cloning over the reflected object graph.
 * Both walks classify each value through the type registry and treat
 * shared reference objects by identity to stay finite on cycles.
 */

mod clone;
mod equality;
mod identity;
mod path;

pub use clone::{copy, deep_clone, GraphCloner};
pub use equality::{deep_equals, DeepEquality, DeepEqualityComparer};
pub use identity::IdentityMap;
pub use path::{FieldPath, Overrides};
