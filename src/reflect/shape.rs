/*!
 * Shape Classification
 * How the walkers treat a value: leaf, sequence, or composite
 */

use super::layout::Layout;
use super::primitive::PrimitiveKind;
use std::sync::Arc;

/// Walker view of a value
#[derive(Debug, Clone)]
pub enum Shape {
    /// Null-like; never walked
    Null,
    /// Compared natively and copied by value. `None` for registered
    /// composite or sequence types treated as primitive.
    Primitive(Option<PrimitiveKind>),
    /// Elements are walked in order
    Sequence,
    /// Fields are walked in layout order
    Composite(Arc<Layout>),
}

impl Shape {
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Shape::Primitive(_))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Shape::Null)
    }
}

/// Per-type-name classification cached by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ShapeKind {
    Primitive,
    Sequence,
    Composite,
}
