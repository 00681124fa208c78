/*!
 * Core Types
 * Common types used across the crate
 */

use super::data_structures::InlineString;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Registered type name
pub type TypeName = InlineString;

/// Object identity (address of the shared allocation)
pub type Identity = usize;

/// Sort direction of one ordering step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Apply this direction to a comparison result
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    #[inline]
    pub fn is_descending(self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

/// Whether a composite type has reference or value semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Shared reference object: identity matters, cycles possible
    Class,
    /// Value type: copied on assignment, never part of a cycle
    Struct,
}

/// Field visibility within its declaring type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Private,
}

impl Visibility {
    /// Private fields are not addressable by name from derived types
    #[inline]
    pub fn is_private(self) -> bool {
        matches!(self, Visibility::Private)
    }
}
