/*!
 * Type Layouts
 *
 * Declarative type descriptors and the flattened field layout computed from them.
 *
 * A layout lists every instance field of a type, inherited ones included,
 * in a fixed slot order. Each slot carries the path segment used to address it:
 * - the auto-property name when the field backs one, otherwise the field name
 * - inherited private fields are reachable only through a `base.` prefix,
 *   repeated once per inheritance level (`base.base.secret`)
 */

use crate::core::types::{TypeKind, TypeName, Visibility};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: TypeName,
    pub visibility: Visibility,
    /// Name of the auto-property this field backs
    pub property: Option<TypeName>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<TypeName>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
            property: None,
        }
    }

    pub fn public(name: impl Into<TypeName>) -> Self {
        Self::new(name, Visibility::Public)
    }

    pub fn protected(name: impl Into<TypeName>) -> Self {
        Self::new(name, Visibility::Protected)
    }

    pub fn private(name: impl Into<TypeName>) -> Self {
        Self::new(name, Visibility::Private)
    }

    /// Private backing field of an auto-property
    pub fn backing(property: impl Into<TypeName>) -> Self {
        let property = property.into();
        let mut name = TypeName::from("<");
        name.push_str(&property);
        name.push('>');
        Self {
            name,
            visibility: Visibility::Private,
            property: Some(property),
        }
    }

    /// Segment used to address this field in a path
    pub fn segment(&self) -> &str {
        self.property.as_deref().unwrap_or(&self.name)
    }
}

/// Declaration of a composite type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: TypeName,
    pub kind: TypeKind,
    pub base: Option<TypeName>,
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Reference type
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            base: None,
            fields: Vec::new(),
        }
    }

    /// Value type
    pub fn structure(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Struct,
            base: None,
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, base: impl Into<TypeName>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn public_field(self, name: impl Into<TypeName>) -> Self {
        self.field(FieldDescriptor::public(name))
    }

    pub fn private_field(self, name: impl Into<TypeName>) -> Self {
        self.field(FieldDescriptor::private(name))
    }

    pub fn auto_property(self, name: impl Into<TypeName>) -> Self {
        self.field(FieldDescriptor::backing(name))
    }
}

/// One addressable field position in a flattened layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Path segment, `base.` prefixes included
    pub segment: TypeName,
    /// Raw field name as declared
    pub field_name: TypeName,
    /// Type that declares the field
    pub declared_in: TypeName,
    pub visibility: Visibility,
    /// Number of inheritance levels between this type and the declaring type
    pub depth: usize,
}

impl Slot {
    fn own(type_name: &TypeName, field: &FieldDescriptor) -> Self {
        Self {
            segment: TypeName::from(field.segment()),
            field_name: field.name.clone(),
            declared_in: type_name.clone(),
            visibility: field.visibility,
            depth: 0,
        }
    }

    fn inherited(&self) -> Self {
        let segment = if self.visibility.is_private() {
            let mut prefixed = TypeName::from("base.");
            prefixed.push_str(&self.segment);
            prefixed
        } else {
            self.segment.clone()
        };
        Self {
            segment,
            field_name: self.field_name.clone(),
            declared_in: self.declared_in.clone(),
            visibility: self.visibility,
            depth: self.depth + 1,
        }
    }
}

/// Flattened instance layout of a composite type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub type_name: TypeName,
    pub kind: TypeKind,
    pub base: Option<TypeName>,
    slots: Vec<Slot>,
}

impl Layout {
    /// Build from a descriptor and the already-flattened layout of its base
    pub(crate) fn flatten(descriptor: &TypeDescriptor, base: Option<&Arc<Layout>>) -> Self {
        let mut slots: Vec<Slot> = base
            .map(|b| b.slots.iter().map(Slot::inherited).collect())
            .unwrap_or_default();
        slots.extend(
            descriptor
                .fields
                .iter()
                .map(|f| Slot::own(&descriptor.name, f)),
        );
        Self {
            type_name: descriptor.name.clone(),
            kind: descriptor.kind,
            base: descriptor.base.clone(),
            slots,
        }
    }

    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resolve a name to a slot index
    ///
    /// Path segments win over raw field names; raw names of inherited
    /// private fields are not visible.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.segment == name)
            .or_else(|| {
                self.slots.iter().position(|s| {
                    s.field_name == name && (s.depth == 0 || !s.visibility.is_private())
                })
            })
    }
}
