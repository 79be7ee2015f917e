//! Metrics module for the Problemset server.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::{CacheMetrics, register_cache_metrics};
pub use http::{http_metrics_middleware, register_http_metrics};
pub use setup::init_metrics;
