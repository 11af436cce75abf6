//! Shared Error Types
//!
//! Errors that describe malformed input at the wire level. They are raised
//! both by request parsing at the HTTP boundary and by the exchange core's own
//! defensive checks.
//!
//! # Usage
//!
//! ```rust
//! use roomlog::shared::error::SharedError;
//!
//! let error = SharedError::validation("text", "text should be a string");
//! assert_eq!(error.field(), Some("text"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Input failed a validation rule
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        field: String,
        message: String,
    },

    /// Input could not be decoded at all
    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
    },
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Offending field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::SerializationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = SharedError::validation("text", "text should be a string");
        match error {
            SharedError::ValidationError { ref field, ref message } => {
                assert_eq!(field, "text");
                assert_eq!(message, "text should be a string");
            }
            _ => panic!("Expected ValidationError"),
        }
        assert!(error.to_string().contains("'text'"));
    }

    #[test]
    fn test_from_serde_error() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{ nope }").unwrap_err();
        let shared_error: SharedError = serde_error.into();
        assert!(matches!(shared_error, SharedError::SerializationError { .. }));
        assert_eq!(shared_error.field(), None);
    }
}
