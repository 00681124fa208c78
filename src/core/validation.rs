/*!
 * Argument Validation
 * Precondition checks raised eagerly, before any lazy work is deferred
 */

use super::data_structures::InlineString;
use super::errors::{FicheError, Result};
use crate::reflect::{TypeRegistry, Value};
use std::fmt::Display;

/// Fail with `InvalidArgument` when `value` is null-like
#[inline]
pub fn ensure_not_null(value: &Value, name: &str) -> Result<()> {
    if TypeRegistry::global().is_null(value) {
        return Err(FicheError::invalid_argument(name, "value cannot be null"));
    }
    Ok(())
}

/// Fail with `OutOfRange` when `value < min`
#[inline]
pub fn ensure_at_least<T: PartialOrd + Display>(value: T, min: T, name: &str) -> Result<()> {
    if value < min {
        return Err(FicheError::out_of_range(
            name,
            format!("{} is less than the minimum {}", value, min),
        ));
    }
    Ok(())
}

/// Fail with `OutOfRange` unless `min <= value <= max`
#[inline]
pub fn ensure_in_range(value: usize, min: usize, max: usize, name: &str) -> Result<()> {
    if value < min || value > max {
        return Err(FicheError::out_of_range(
            name,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(())
}

/// Fail with `InvalidArgument` unless `condition` holds
#[inline]
pub fn ensure_argument(condition: bool, name: &str, message: &str) -> Result<()> {
    if !condition {
        return Err(FicheError::invalid_argument(name, message));
    }
    Ok(())
}

/// Fail with `InvalidOperation` unless `condition` holds
#[inline]
pub fn ensure_operation(condition: bool, message: impl Into<InlineString>) -> Result<()> {
    if !condition {
        return Err(FicheError::invalid_operation(message));
    }
    Ok(())
}
