/*!
 * Null-Like Values
 * Sentinels treated as null by the walkers and the argument checks
 */

use super::value::Value;
use crate::core::types::TypeName;
use ahash::AHashSet;
use parking_lot::RwLock;

/// Registered null-like type names and values
///
/// `Value::Null` is always null-like. Callers may add whole types (every
/// value of the type is null-like) or individual sentinel values.
#[derive(Default)]
pub struct NullRegistry {
    types: RwLock<AHashSet<TypeName>>,
    values: RwLock<AHashSet<Value>>,
}

impl NullRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every value of `type_name` as null
    pub fn register_type(&self, type_name: impl Into<TypeName>) -> bool {
        self.types.write().insert(type_name.into())
    }

    /// Treat this exact value as null (objects match by identity)
    pub fn register_value(&self, value: Value) -> bool {
        if value.is_null() {
            return false;
        }
        self.values.write().insert(value)
    }

    pub fn unregister_type(&self, type_name: &str) -> bool {
        self.types.write().remove(type_name)
    }

    pub fn unregister_value(&self, value: &Value) -> bool {
        self.values.write().remove(value)
    }

    pub fn is_null(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        {
            let values = self.values.read();
            if !values.is_empty() && values.contains(value) {
                return true;
            }
        }
        let types = self.types.read();
        if types.is_empty() {
            return false;
        }
        value
            .type_name()
            .map(|name| types.contains(name.as_str()))
            .unwrap_or(false)
    }
}
