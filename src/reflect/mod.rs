/*!
 * Reflection
 *
 * Explicit value model and type metadata standing in for runtime reflection:
 * - primitive leaves and their kind families
 * - composite layouts flattened from declared descriptors
 * - shared reference objects with identity
 * - the registry that resolves and caches shapes per type name
 */

mod layout;
mod null;
mod primitive;
mod registry;
mod shape;
mod value;

pub use layout::{FieldDescriptor, Layout, Slot, TypeDescriptor};
pub use null::NullRegistry;
pub use primitive::{Primitive, PrimitiveKind, PrimitiveTypeSet};
pub use registry::TypeRegistry;
pub use shape::Shape;
pub use value::{
    ArrayIndices, ArrayValue, Composite, Enumerable, ListValue, Object, ObjectRef, Value,
};
