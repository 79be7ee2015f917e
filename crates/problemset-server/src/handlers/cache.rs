//! Cache administration handler.

use axum::{extract::State, response::Json};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Response para operaciones de invalidacion.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub success: bool,
    /// Numero de entries invalidadas.
    pub invalidated: usize,
    /// Patrones aplicados.
    pub patterns: Vec<String>,
    /// Mensaje descriptivo.
    pub message: String,
}

/// DELETE /api/v1/cache
/// Invalida todas las entries del catalogo.
#[instrument(skip_all)]
pub async fn flush_cache(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let result = state.service().flush_cache().await;

    let message = if result.failures == 0 {
        format!("Invalidated {} cache entries", result.count)
    } else {
        format!(
            "Invalidated {} cache entries, {} operations failed",
            result.count, result.failures
        )
    };

    Json(InvalidateResponse {
        success: result.failures == 0,
        invalidated: result.count,
        patterns: result.patterns,
        message,
    })
}
