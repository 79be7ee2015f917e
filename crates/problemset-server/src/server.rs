use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{delete, get},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::handlers::{
    cache::flush_cache,
    health::health_check,
    metrics::metrics_handler,
    problems::{
        create_problem, delete_problem, get_problem, get_statistics, list_problems,
        problems_by_difficulty, problems_by_topic, search_problems, update_problem,
    },
};
use crate::metrics::http_metrics_middleware;
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Prefijo de la API versionada.
pub const API_PREFIX: &str = "/api/v1";

/// Rutas de la aplicacion, sin middleware.
fn app_routes(state: AppState) -> Router {
    let problems = Router::new()
        .route("/problems", get(list_problems).post(create_problem))
        // Las rutas estaticas tienen prioridad sobre /problems/{id}
        .route("/problems/search", get(search_problems))
        .route("/problems/stats", get(get_statistics))
        .route("/problems/difficulty/{difficulty}", get(problems_by_difficulty))
        .route("/problems/topic/{topic}", get(problems_by_topic))
        .route(
            "/problems/{id}",
            get(get_problem).put(update_problem).delete(delete_problem),
        )
        .route("/cache", delete(flush_cache));

    Router::new()
        .route("/health", get(health_check))
        .nest(API_PREFIX, problems)
        .with_state(state)
}

fn with_middleware(router: Router) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(middleware_stack)
}

/// Crea el router de la aplicacion (sin endpoint de metricas).
pub fn create_router(state: AppState) -> Router {
    with_middleware(app_routes(state))
}

/// Crea el router de la aplicacion con el endpoint `/metrics`.
pub fn create_router_with_metrics(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    with_middleware(app_routes(state).merge(metrics_router))
}

/// Runs the server with the given state and metrics handle until a
/// shutdown signal arrives.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_metrics(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
