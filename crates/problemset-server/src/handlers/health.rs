use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn up(backend: &str) -> Self {
        Self {
            status: "UP".to_string(),
            backend: backend.to_string(),
            error: None,
        }
    }

    fn down(backend: &str, error: impl ToString) -> Self {
        Self {
            status: "DOWN".to_string(),
            backend: backend.to_string(),
            error: Some(error.to_string()),
        }
    }

    fn is_up(&self) -> bool {
        self.status == "UP"
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: ComponentHealth,
    pub cache: ComponentHealth,
}

/// GET /health
///
/// El estado global depende solo del store: con el cache caido el servicio
/// sigue respondiendo, solo mas lento.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let service = state.service();

    let store = match service.store().health_check().await {
        Ok(()) => ComponentHealth::up(service.store().name()),
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            ComponentHealth::down(service.store().name(), e)
        },
    };

    let cache = match service.cache().ping().await {
        Ok(()) => ComponentHealth::up(service.cache().name()),
        Err(e) => {
            warn!(error = %e, "Cache health check failed");
            ComponentHealth::down(service.cache().name(), e)
        },
    };

    let (status, label) = if store.is_up() {
        (StatusCode::OK, "UP")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "DOWN")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            store,
            cache,
        }),
    )
}
