//! Problemset Server - HTTP API over a cached problem catalog.
//!
//! Reads go through [`service::ProblemService`], which consults the cache
//! before the store and populates it on a miss. Writes go to the store and
//! then invalidate the affected cache keys.

pub mod cache;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod service;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router, create_router_with_metrics, run_server};
pub use service::{ProblemService, ServiceError};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
