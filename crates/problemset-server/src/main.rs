//! Problemset server binary.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use problemset_server::metrics::init_metrics;
use problemset_server::{AppState, Settings, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("failed to load settings")?;
    let addr = settings.server.socket_addr()?;

    tracing::info!(
        "Starting Problemset Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        store = ?settings.store.backend,
        cache_enabled = settings.cache.enabled,
        "Settings loaded"
    );

    let prometheus = init_metrics().context("failed to initialize metrics")?;

    let state = AppState::connect(&settings)
        .await
        .context("failed to connect to the store")?;

    let result = run_server(addr, state.clone(), prometheus).await;
    state.disconnect().await;

    result.context("server error")
}
