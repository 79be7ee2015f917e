//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Buckets de latencia (en segundos), de 100us a 10s.
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Inicializa el sistema de metricas y retorna el handle para el endpoint.
///
/// Solo puede llamarse una vez por proceso: el recorder es global.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .install_recorder()?;

    super::register_cache_metrics();
    super::register_http_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}
