//! Error types for the Problemset domain.
//!
//! These errors describe invalid input at the domain boundary: a malformed
//! problem payload, an unknown difficulty, an unusable identifier or
//! pagination window. Storage and cache errors live in their own crates.
//!
//! # Example
//!
//! ```
//! use problemset_core::{CoreError, Difficulty};
//!
//! let err = "Impossible".parse::<Difficulty>().unwrap_err();
//! assert!(matches!(err, CoreError::UnknownDifficulty(_)));
//! ```

use thiserror::Error;

/// Main error type for domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A field failed validation.
    #[error("Invalid field '{field}': {reason}")]
    Validation {
        /// Name of the offending field (JSON name)
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// Difficulty string is not one of Easy, Medium, Hard.
    #[error("Unknown difficulty '{0}', expected one of Easy, Medium, Hard")]
    UnknownDifficulty(String),

    /// An identifier could not be parsed.
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Page or limit outside the accepted range.
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}

impl CoreError {
    /// Creates a validation error for the given field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a pagination error.
    pub fn invalid_pagination(reason: impl Into<String>) -> Self {
        Self::InvalidPagination(reason.into())
    }

    /// Returns the offending field name, if this is a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result alias for domain operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("titleSlug", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid field 'titleSlug': must not be empty"
        );
        assert_eq!(err.field(), Some("titleSlug"));

        let err = CoreError::invalid_pagination("page must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid pagination: page must be greater than 0"
        );
        assert_eq!(err.field(), None);
    }
}
