/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::data_structures::InlineString;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified library error with miette diagnostics
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum FicheError {
    #[error("Invalid argument '{name}': {message}")]
    #[diagnostic(
        code(fiche::invalid_argument),
        help("A required argument was null-like or malformed. Check the call site.")
    )]
    InvalidArgument {
        name: InlineString,
        message: InlineString,
    },

    #[error("Argument '{name}' out of range: {message}")]
    #[diagnostic(
        code(fiche::out_of_range),
        help("The index or count lies outside the bounds of the sequence.")
    )]
    OutOfRange {
        name: InlineString,
        message: InlineString,
    },

    #[error("Invalid operation: {0}")]
    #[diagnostic(
        code(fiche::invalid_operation),
        help("The operation cannot be performed in the current state.")
    )]
    InvalidOperation(InlineString),

    #[error("Unknown type: {0}")]
    #[diagnostic(
        code(fiche::unknown_type),
        help("Register the type descriptor with the type registry before instantiating it.")
    )]
    UnknownType(InlineString),

    #[error("Sequence enumeration failed: {0}")]
    #[diagnostic(
        code(fiche::enumeration_failed),
        help("A custom sequence could not produce a cursor over its elements.")
    )]
    EnumerationFailed(InlineString),

    #[error("Task failed: {0}")]
    #[diagnostic(
        code(fiche::task_failed),
        help("The awaited task panicked or was cancelled. View logs for details.")
    )]
    TaskFailed(InlineString),
}

impl FicheError {
    /// Build an invalid-argument error for the named parameter
    pub fn invalid_argument(
        name: impl Into<InlineString>,
        message: impl Into<InlineString>,
    ) -> Self {
        FicheError::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build an out-of-range error for the named parameter
    pub fn out_of_range(name: impl Into<InlineString>, message: impl Into<InlineString>) -> Self {
        FicheError::OutOfRange {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build an invalid-operation error
    pub fn invalid_operation(message: impl Into<InlineString>) -> Self {
        FicheError::InvalidOperation(message.into())
    }

    /// Whether this error belongs to the invalid-argument family (out of range included)
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            FicheError::InvalidArgument { .. } | FicheError::OutOfRange { .. }
        )
    }
}

/// Serializable error representation for reporting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SerializableError {
    pub error_type: InlineString,
    pub message: InlineString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<InlineString>,
}

impl SerializableError {
    /// Create a new serializable error
    pub fn new(error_type: impl Into<InlineString>, message: impl Into<InlineString>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a new serializable error with details
    pub fn with_details(
        error_type: impl Into<InlineString>,
        message: impl Into<InlineString>,
        details: impl Into<InlineString>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Render as a JSON object for callers that report errors as text
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            FicheError::invalid_operation(format!("failed to serialize error: {}", e))
        })
    }
}

impl From<FicheError> for SerializableError {
    fn from(err: FicheError) -> Self {
        let error_type = match &err {
            FicheError::InvalidArgument { .. } => "invalid_argument",
            FicheError::OutOfRange { .. } => "out_of_range",
            FicheError::InvalidOperation(_) => "invalid_operation",
            FicheError::UnknownType(_) => "unknown_type",
            FicheError::EnumerationFailed(_) => "enumeration_failed",
            FicheError::TaskFailed(_) => "task_failed",
        };
        match &err {
            FicheError::InvalidArgument { name, .. } | FicheError::OutOfRange { name, .. } => {
                SerializableError::with_details(error_type, err.to_string(), name.clone())
            }
            _ => SerializableError::new(error_type, err.to_string()),
        }
    }
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, FicheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = FicheError::invalid_argument("source", "value is null");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"error_type\":\"invalid_argument\""));
        let deserialized: FicheError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, deserialized);
    }

    #[test]
    fn test_error_display() {
        let error = FicheError::out_of_range("index", "5 exceeds length 3");
        assert_eq!(
            error.to_string(),
            "Argument 'index' out of range: 5 exceeds length 3"
        );
        assert!(error.is_argument_error());
        assert!(!FicheError::invalid_operation("nope").is_argument_error());
    }

    #[test]
    fn test_serializable_error_from_argument_error() {
        let serializable: SerializableError = FicheError::invalid_argument("path", "bad").into();
        assert_eq!(serializable.error_type, "invalid_argument");
        assert_eq!(
            serializable.details.as_ref().map(|s| s.as_str()),
            Some("path")
        );
    }

    #[test]
    fn test_serializable_error_without_details() {
        let serializable: SerializableError =
            FicheError::UnknownType("Missing".into()).into();
        assert_eq!(serializable.error_type, "unknown_type");
        assert_eq!(serializable.details, None);
        let json = serializable.to_json().unwrap();
        assert!(json.contains("\"error_type\":\"unknown_type\""));
        assert!(!json.contains("details"));
    }
}
