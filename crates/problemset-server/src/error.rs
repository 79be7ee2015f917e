use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::service::ServiceError;

#[derive(Debug)]
pub enum AppError {
    /// Recurso no encontrado
    NotFound(String),

    /// Parametros invalidos
    BadRequest(String),

    /// Violacion de unicidad (id o slug ya existen)
    Conflict { field: String, value: String },

    /// El store no responde
    ServiceUnavailable(String),

    /// Error interno
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => AppError::BadRequest(e.to_string()),
            ServiceError::Conflict { field, value } => AppError::Conflict { field, value },
            ServiceError::Store(e) if e.is_transient() => {
                error!(error = %e, "Store unavailable");
                AppError::ServiceUnavailable(e.to_string())
            },
            ServiceError::Store(e) => {
                error!(error = %e, "Store operation failed");
                AppError::Internal(e.to_string())
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            AppError::Conflict { field, value } => (
                StatusCode::CONFLICT,
                "Conflict",
                format!("A problem with {} '{}' already exists", field, value),
            ),
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", msg)
            },
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                msg,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
