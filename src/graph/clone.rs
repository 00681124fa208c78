/*!
 * Deep Clone and Copy
 *
 * Clones an object graph while preserving its topology: every reference
 * object is cloned once, shared references stay shared, and cycles point
 * back into the clone. `copy` additionally replaces the fields named by an
 * override set instead of cloning them.
 */

use super::identity::IdentityMap;
use super::path::Overrides;
use crate::core::data_structures::InlineString;
use crate::core::errors::Result;
use crate::reflect::{Composite, Object, ObjectRef, Shape, TypeRegistry, Value};
use tracing::debug;

/// Deep clone using the global registry
pub fn deep_clone(value: &Value) -> Result<Value> {
    GraphCloner::default().deep_clone(value)
}

/// Deep clone with field overrides using the global registry
pub fn copy(value: &Value, overrides: &Overrides) -> Result<Value> {
    GraphCloner::default().copy(value, overrides)
}

/// Clone entry points bound to a registry
#[derive(Clone, Copy)]
pub struct GraphCloner<'r> {
    registry: &'r TypeRegistry,
}

impl Default for GraphCloner<'static> {
    fn default() -> Self {
        Self::new(TypeRegistry::global())
    }
}

impl<'r> GraphCloner<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// Clone `value` and everything reachable from it
    ///
    /// Null-like values are returned as-is and primitive values are copied.
    /// Reference objects are always cloned, even when their class is
    /// registered as primitive.
    pub fn deep_clone(&self, value: &Value) -> Result<Value> {
        CloneWalk::new(self.registry, None).run(value)
    }

    /// Like [`GraphCloner::deep_clone`], installing override values at their paths
    pub fn copy(&self, value: &Value, overrides: &Overrides) -> Result<Value> {
        CloneWalk::new(self.registry, Some(overrides)).run(value)
    }
}

struct CloneWalk<'a> {
    registry: &'a TypeRegistry,
    overrides: Option<&'a Overrides>,
    visited: IdentityMap,
    path: InlineString,
    applied: usize,
}

impl<'a> CloneWalk<'a> {
    fn new(registry: &'a TypeRegistry, overrides: Option<&'a Overrides>) -> Self {
        Self {
            registry,
            overrides: overrides.filter(|o| !o.is_empty()),
            visited: IdentityMap::new(),
            path: InlineString::new(),
            applied: 0,
        }
    }

    fn run(mut self, value: &Value) -> Result<Value> {
        let clone = self.value(value)?;
        debug!(
            objects = self.visited.len(),
            overrides_applied = self.applied,
            overrides_requested = self.overrides.map_or(0, |o| o.len()),
            "graph clone finished"
        );
        Ok(clone)
    }

    fn value(&mut self, value: &Value) -> Result<Value> {
        match (self.registry.classify(value), value) {
            (Shape::Null, _) => return Ok(value.clone()),
            // Reference types registered as primitive still get their own instance
            (Shape::Primitive(_), Value::Object(o)) => return self.object(o),
            (Shape::Primitive(_), _) => return Ok(value.clone()),
            (Shape::Sequence | Shape::Composite(_), _) => {}
        }
        match value {
            Value::Struct(c) => {
                let mut copy = Composite::clone(c);
                self.fields(&mut copy)?;
                Ok(Value::Struct(Box::new(copy)))
            }
            Value::Object(o) => self.object(o),
            _ => Ok(value.clone()),
        }
    }

    fn object(&mut self, source: &ObjectRef) -> Result<Value> {
        if let Some(existing) = self.visited.get(source) {
            return Ok(Value::Object(existing));
        }

        let shallow = source.read().shallow_copy()?;
        let clone = ObjectRef::new(shallow);
        self.visited.insert(source, &clone);

        // Children are cloned from a snapshot so no lock is held while recursing
        let snapshot = clone.read().shallow_copy()?;
        match snapshot {
            Object::Instance(mut composite) => {
                self.fields(&mut composite)?;
                *clone.write() = Object::Instance(composite);
            }
            Object::Array(mut array) => {
                for index in array.indices() {
                    let element = array.get(&index)?.clone();
                    let cloned = self.value(&element)?;
                    array.set(&index, cloned)?;
                }
                *clone.write() = Object::Array(array);
            }
            Object::List(mut list) => {
                for item in list.items.iter_mut() {
                    *item = self.value(item)?;
                }
                *clone.write() = Object::List(list);
            }
            Object::Custom(_) => {}
        }

        Ok(Value::Object(clone))
    }

    fn fields(&mut self, composite: &mut Composite) -> Result<()> {
        let layout = composite.layout().clone();
        for (index, slot) in layout.slots().iter().enumerate() {
            let mark = self.path.len();
            if !self.path.is_empty() {
                self.path.push('.');
            }
            self.path.push_str(&slot.segment);

            let replacement = self
                .overrides
                .and_then(|o| o.get(self.path.as_str()))
                .cloned();
            let result = match replacement {
                Some(value) => {
                    self.applied += 1;
                    Ok(value)
                }
                None => {
                    let field = composite.fields()[index].clone();
                    self.value(&field)
                }
            };

            self.path.truncate(mark);
            composite.set_at(index, result?);
        }
        Ok(())
    }
}
