/*!
 * Type Registry
 *
 * Stores type descriptors and caches, per type name:
 * - the flattened layout of each composite type
 * - the shape classification consulted by the walkers
 *
 * Also owns the extensible primitive type set and the null-like registry.
 */

use super::layout::{Layout, TypeDescriptor};
use super::null::NullRegistry;
use super::primitive::PrimitiveKind;
use super::shape::{Shape, ShapeKind};
use super::value::{Composite, Object, Value};
use crate::core::errors::{FicheError, Result};
use crate::core::types::TypeName;
use crate::core::validation::ensure_operation;
use ahash::{AHashSet, RandomState};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Deepest inheritance chain accepted before assuming a cycle
const MAX_INHERITANCE_DEPTH: usize = 64;

pub struct TypeRegistry {
    descriptors: DashMap<TypeName, Arc<TypeDescriptor>, RandomState>,
    layouts: DashMap<TypeName, Arc<Layout>, RandomState>,
    shapes: DashMap<TypeName, ShapeKind, RandomState>,
    primitive_names: RwLock<AHashSet<TypeName>>,
    nulls: NullRegistry,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::with_hasher(RandomState::new()),
            layouts: DashMap::with_hasher(RandomState::new()),
            shapes: DashMap::with_hasher(RandomState::new()),
            primitive_names: RwLock::new(AHashSet::new()),
            nulls: NullRegistry::new(),
        }
    }

    /// Process-wide registry
    pub fn global() -> &'static TypeRegistry {
        static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(TypeRegistry::new)
    }

    /// Add or replace a type; invalidates every cached layout
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<()> {
        if descriptor.name.is_empty() {
            return Err(FicheError::invalid_argument(
                "descriptor",
                "type name cannot be empty",
            ));
        }
        if PrimitiveKind::from_type_name(&descriptor.name).is_some() {
            return Err(FicheError::invalid_argument(
                "descriptor",
                format!("'{}' is a built-in primitive type", descriptor.name),
            ));
        }
        if descriptor.base.as_deref() == Some(descriptor.name.as_str()) {
            return Err(FicheError::invalid_argument(
                "descriptor",
                format!("'{}' cannot extend itself", descriptor.name),
            ));
        }

        debug!(
            type_name = %descriptor.name,
            fields = descriptor.fields.len(),
            base = ?descriptor.base,
            "registering type"
        );
        let name = descriptor.name.clone();
        self.descriptors.insert(name.clone(), Arc::new(descriptor));
        self.layouts.clear();
        self.shapes.remove(&name);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn descriptor(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.descriptors.get(name).map(|d| d.value().clone())
    }

    /// Flattened layout of a registered type, computed once and cached
    pub fn layout(&self, name: &str) -> Result<Arc<Layout>> {
        self.layout_at_depth(name, 0)
    }

    fn layout_at_depth(&self, name: &str, depth: usize) -> Result<Arc<Layout>> {
        let cached = self.layouts.get(name).map(|l| l.value().clone());
        if let Some(layout) = cached {
            return Ok(layout);
        }
        if depth > MAX_INHERITANCE_DEPTH {
            return Err(FicheError::invalid_operation(format!(
                "inheritance chain of '{}' is cyclic or deeper than {}",
                name, MAX_INHERITANCE_DEPTH
            )));
        }

        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| FicheError::UnknownType(name.into()))?;
        let base = match &descriptor.base {
            Some(base) => {
                let base_layout = self.layout_at_depth(base, depth + 1)?;
                ensure_operation(
                    base_layout.kind == descriptor.kind,
                    format!("'{}' and its base '{}' differ in kind", name, base),
                )?;
                Some(base_layout)
            }
            None => None,
        };

        let layout = Arc::new(Layout::flatten(&descriptor, base.as_ref()));
        self.layouts
            .insert(descriptor.name.clone(), Arc::clone(&layout));
        Ok(layout)
    }

    /// Empty composite of a registered type
    pub fn composite(&self, name: &str) -> Result<Composite> {
        Ok(Composite::new(self.layout(name)?))
    }

    /// New instance: an object for classes, a struct value otherwise
    pub fn instantiate(&self, name: &str) -> Result<Value> {
        Ok(Value::from_composite(self.composite(name)?))
    }

    /// Treat values of `type_name` as primitive leaves
    pub fn register_primitive(&self, type_name: impl Into<TypeName>) -> bool {
        let type_name = type_name.into();
        self.shapes.remove(&type_name);
        self.primitive_names.write().insert(type_name)
    }

    pub fn unregister_primitive(&self, type_name: &str) -> bool {
        self.shapes.remove(type_name);
        self.primitive_names.write().remove(type_name)
    }

    /// Built-in primitive kinds plus registered primitive names
    pub fn is_primitive_type(&self, type_name: &str) -> bool {
        PrimitiveKind::from_type_name(type_name).is_some()
            || self.primitive_names.read().contains(type_name)
    }

    #[inline]
    pub fn nulls(&self) -> &NullRegistry {
        &self.nulls
    }

    /// Null-like check used by every null guard in the crate
    #[inline]
    pub fn is_null(&self, value: &Value) -> bool {
        self.nulls.is_null(value)
    }

    pub fn register_null_type(&self, type_name: impl Into<TypeName>) -> bool {
        self.nulls.register_type(type_name)
    }

    pub fn register_null_value(&self, value: Value) -> bool {
        self.nulls.register_value(value)
    }

    /// Classify a value for the walkers
    pub fn classify(&self, value: &Value) -> Shape {
        if self.is_null(value) {
            return Shape::Null;
        }
        match value {
            Value::Null => Shape::Null,
            Value::Primitive(p) => Shape::Primitive(Some(p.kind())),
            Value::Struct(c) => self.classify_composite(c),
            Value::Object(o) => {
                let object = o.read();
                match &*object {
                    Object::Instance(c) => self.classify_composite(c),
                    other => match self.shape_kind(&other.type_name(), ShapeKind::Sequence) {
                        ShapeKind::Primitive => Shape::Primitive(None),
                        _ => Shape::Sequence,
                    },
                }
            }
        }
    }

    fn classify_composite(&self, composite: &Composite) -> Shape {
        match self.shape_kind(composite.type_name(), ShapeKind::Composite) {
            ShapeKind::Primitive => Shape::Primitive(None),
            _ => Shape::Composite(Arc::clone(composite.layout())),
        }
    }

    fn shape_kind(&self, type_name: &TypeName, structural: ShapeKind) -> ShapeKind {
        if let Some(kind) = self.shapes.get(type_name.as_str()).map(|k| *k.value()) {
            return kind;
        }
        let kind = if self.is_primitive_type(type_name) {
            ShapeKind::Primitive
        } else {
            structural
        };
        self.shapes.insert(type_name.clone(), kind);
        kind
    }
}
