/*!
 * Field Paths and Overrides
 *
 * Dotted paths address fields from the root of a copied graph
 * (`Inner.Value`, `base.secret`). Each segment is an identifier.
 */

use crate::core::data_structures::InlineString;
use crate::core::errors::{FicheError, Result};
use crate::reflect::Value;
use ahash::AHashMap;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Validated dotted field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(InlineString);

impl FieldPath {
    /// Parse and validate a dotted path
    ///
    /// Fails with `InvalidArgument` on empty paths, empty segments, or
    /// segments that are not identifiers.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(FicheError::invalid_argument("path", "path cannot be empty"));
        }
        for segment in path.split('.') {
            if !is_identifier(segment) {
                return Err(FicheError::invalid_argument(
                    "path",
                    format!("'{}' is not a member access chain ('{}')", path, segment),
                ));
            }
        }
        Ok(Self(InlineString::from(path)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Whether `self` strictly contains `other` as a member
    pub fn is_ancestor_of(&self, other: &FieldPath) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(self.0.as_str())
            && other.0.as_bytes()[self.0.len()] == b'.'
    }
}

impl FromStr for FieldPath {
    type Err = FicheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Borrow<str> for FieldPath {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Replacement values for `copy`, keyed by field path
///
/// Values are installed as-is; they are not cloned.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: AHashMap<FieldPath, Value>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Overrides::insert`]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Result<Self> {
        self.insert(path, value)?;
        Ok(self)
    }

    /// Add one override
    ///
    /// Fails with `InvalidArgument` for malformed paths and with
    /// `InvalidOperation` when the path duplicates, contains, or lies inside
    /// an existing path.
    pub fn insert(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let path = FieldPath::parse(path)?;
        for existing in self.entries.keys() {
            if *existing == path {
                return Err(FicheError::invalid_operation(format!(
                    "path '{}' is specified more than once",
                    path
                )));
            }
            if existing.is_ancestor_of(&path) || path.is_ancestor_of(existing) {
                return Err(FicheError::invalid_operation(format!(
                    "paths '{}' and '{}' collide",
                    existing, path
                )));
            }
        }
        self.entries.insert(path, value.into());
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.entries.get(path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.entries.keys()
    }
}
