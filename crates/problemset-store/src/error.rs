//! Error types for persistent stores.

/// Errors that can occur when talking to a persistent store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store cannot be reached.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// A uniqueness constraint was violated.
    #[error("unique constraint violated on {field}: {value}")]
    Conflict { field: String, value: String },

    /// A query or statement failed.
    #[error("query failed: {0}")]
    Query(String),

    /// A stored row could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new conflict error.
    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Returns true for a uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::conflict("titleSlug", "two-sum");
        assert_eq!(
            err.to_string(),
            "unique constraint violated on titleSlug: two-sum"
        );

        let err = StoreError::unavailable("connection refused");
        assert_eq!(err.to_string(), "store unavailable: connection refused");
    }

    #[test]
    fn test_is_transient() {
        assert!(StoreError::unavailable("down").is_transient());
        assert!(!StoreError::conflict("id", "1").is_transient());
        assert!(!StoreError::query("syntax error").is_transient());
        assert!(StoreError::conflict("id", "1").is_conflict());
    }
}
