//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CacheBackend, MokaCache, NullCache};
use crate::service::ProblemService;
use crate::settings::{ApiSettings, Settings, StoreBackend};
use problemset_store::{InMemoryStore, ProblemStore, SqliteStore, StoreError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    service: Arc<ProblemService>,
    api: ApiSettings,
}

impl AppState {
    /// Creates a new AppState around an already built service.
    pub fn new(service: ProblemService, api: ApiSettings) -> Self {
        Self {
            service: Arc::new(service),
            api,
        }
    }

    /// Abre el store y el cache descritos en `settings`.
    ///
    /// Falla si el store no responde; un cache que no responde solo se
    /// registra, el servicio funciona sin el.
    pub async fn connect(settings: &Settings) -> Result<Self, StoreError> {
        let store: Arc<dyn ProblemStore> = match settings.store.backend {
            StoreBackend::Memory => Arc::new(InMemoryStore::new()),
            StoreBackend::Sqlite => Arc::new(SqliteStore::open(&settings.store.sqlite_path).await?),
        };
        store.health_check().await?;
        info!(store = store.name(), "Store connected");

        let cache: Arc<dyn CacheBackend> = if settings.cache.enabled {
            Arc::new(MokaCache::new(settings.cache.cache_config()))
        } else {
            Arc::new(NullCache)
        };
        match cache.ping().await {
            Ok(()) => info!(cache = cache.name(), "Cache connected"),
            Err(e) => warn!(cache = cache.name(), error = %e, "Cache not reachable, continuing without it"),
        }

        let service = ProblemService::new(store, cache, settings.ttl_policy());
        Ok(Self::new(service, settings.api))
    }

    /// Libera los recursos del store.
    pub async fn disconnect(&self) {
        match self.service.store().close().await {
            Ok(()) => info!("Store disconnected"),
            Err(e) => warn!(error = %e, "Store did not close cleanly"),
        }
    }

    /// Returns the problem service.
    pub fn service(&self) -> &ProblemService {
        &self.service
    }

    /// Returns the HTTP API limits.
    pub fn api(&self) -> &ApiSettings {
        &self.api
    }
}
