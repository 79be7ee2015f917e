//! Service error type.

use problemset_core::CoreError;
use problemset_store::StoreError;
use thiserror::Error;

/// Error de una operacion del servicio.
///
/// Las fallas del cache nunca aparecen aqui: se absorben dentro del servicio.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("{field} '{value}' already exists")]
    Conflict { field: String, value: String },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field, value } => Self::Conflict { field, value },
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_lifted_out_of_store_errors() {
        let err: ServiceError = StoreError::conflict("titleSlug", "two-sum").into();
        assert!(matches!(err, ServiceError::Conflict { ref field, .. } if field == "titleSlug"));
        assert_eq!(err.to_string(), "titleSlug 'two-sum' already exists");
    }

    #[test]
    fn test_other_store_errors_are_wrapped() {
        let err: ServiceError = StoreError::unavailable("refused").into();
        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(err.to_string(), "store unavailable: refused");
    }
}
