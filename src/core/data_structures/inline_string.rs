/*!
 * Inline String Optimization
 * Zero-allocation strings for type names, field paths and error messages
 */

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;

/// Inline-optimized string that stores short strings (≤23 bytes) without heap allocation
///
/// Type names and field names are almost always short, so layouts and paths
/// built from them rarely touch the allocator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct InlineString {
    inner: SmartString,
}

impl InlineString {
    /// Create new inline string
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: SmartString::new(),
        }
    }

    /// Get string slice
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Check if string is stored inline (no heap allocation)
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inner.is_inline()
    }

    /// Get length
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Push string slice
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.inner.push_str(s);
    }

    /// Push a single character
    #[inline]
    pub fn push(&mut self, c: char) {
        self.inner.push(c);
    }

    /// Truncate to `len` bytes
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl Default for InlineString {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for InlineString {
    #[inline]
    fn from(s: &str) -> Self {
        Self {
            inner: SmartString::from(s),
        }
    }
}

impl From<String> for InlineString {
    #[inline]
    fn from(s: String) -> Self {
        Self {
            inner: SmartString::from(s),
        }
    }
}

impl From<&InlineString> for InlineString {
    #[inline]
    fn from(s: &InlineString) -> Self {
        s.clone()
    }
}

impl From<InlineString> for String {
    #[inline]
    fn from(s: InlineString) -> Self {
        s.inner.into()
    }
}

impl AsRef<str> for InlineString {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::ops::Deref for InlineString {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for InlineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::borrow::Borrow<str> for InlineString {
    #[inline(always)]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for InlineString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for InlineString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_storage() {
        let short = InlineString::from("Node");
        assert!(short.is_inline(), "Short type names should be inline");
        assert_eq!(short.as_str(), "Node");
    }

    #[test]
    fn test_long_string_heap_allocated() {
        let long = InlineString::from(
            "Outer.Middle.Inner.DeeplyNestedField.AnotherLevel.Leaf",
        );
        assert!(!long.is_inline(), "Long paths should use heap");
        assert!(long.as_str().ends_with("Leaf"));
    }

    #[test]
    fn test_push_and_truncate() {
        let mut path = InlineString::from("base");
        let mark = path.len();
        path.push('.');
        path.push_str("value");
        assert_eq!(path, "base.value");
        path.truncate(mark);
        assert_eq!(path, "base");
    }

    #[test]
    fn test_serialization() {
        let inline_str = InlineString::from("SimpleStruct.Value");
        let json = serde_json::to_string(&inline_str).unwrap();
        assert_eq!(json, "\"SimpleStruct.Value\"");
        let deserialized: InlineString = serde_json::from_str(&json).unwrap();
        assert_eq!(inline_str, deserialized);
    }
}
