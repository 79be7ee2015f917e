//! In-process cache backend using Moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use glob::Pattern;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tracing::debug;

use crate::cache::backend::{CacheBackend, CacheError};
use crate::metrics::CacheMetrics;

/// Configuracion del cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximo numero de entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// Snapshot almacenado junto con su TTL.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Arc<str>,
    ttl: Duration,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(payload: String, ttl: Duration) -> Self {
        Self {
            payload: Arc::from(payload),
            ttl,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// Expiracion por entry: cada insert fija su propio TTL y las lecturas no
/// lo extienden.
struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache de snapshots usando Moka.
/// Thread-safe y async-friendly.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use problemset_server::cache::{CacheBackend, CacheConfig, MokaCache};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = MokaCache::new(CacheConfig::default());
/// cache
///     .set("problem:1", "{}".to_string(), Duration::from_secs(600))
///     .await
///     .unwrap();
///
/// if let Ok(Some(payload)) = cache.get("problem:1").await {
///     println!("Cache hit: {payload}");
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct MokaCache {
    inner: Cache<String, CacheEntry>,
    metrics: CacheMetrics,
}

impl MokaCache {
    /// Crea un nuevo cache con la configuracion dada.
    pub fn new(config: CacheConfig) -> Self {
        let metrics = CacheMetrics::new();

        // Configurar listener para evictions
        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_eviction(reason);
            })
            .build();

        Self { inner, metrics }
    }

    /// Retorna el numero aproximado de entries en cache.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Actualiza el gauge de entry count.
    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.inner.entry_count());
    }

    /// Sincroniza el cache (para tests principalmente).
    /// Fuerza la limpieza de entries expiradas.
    #[cfg(test)]
    pub(crate) async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl CacheBackend for MokaCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let start = Instant::now();
        let result = self
            .inner
            .get(key)
            .await
            .filter(CacheEntry::is_live)
            .map(|entry| entry.payload.to_string());

        if result.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        self.metrics
            .record_operation_duration("get", start.elapsed());

        Ok(result)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let start = Instant::now();
        self.inner
            .insert(key.to_string(), CacheEntry::new(value, ttl))
            .await;

        self.metrics
            .record_operation_duration("set", start.elapsed());
        self.update_entry_gauge();
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let removed = self.inner.remove(key).await;
        self.update_entry_gauge();
        Ok(removed.is_some_and(|entry| entry.is_live()))
    }

    async fn delete_pattern(&self, pattern_str: &str) -> Result<usize, CacheError> {
        let start = Instant::now();
        let pattern = Pattern::new(pattern_str).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern_str.to_string(),
            reason: e.to_string(),
        })?;

        // Snapshot de las keys que coinciden; entries nuevas durante la
        // iteracion no se consideran.
        let matching: Vec<Arc<String>> = self
            .inner
            .iter()
            .filter(|(key, entry)| entry.is_live() && pattern.matches(key))
            .map(|(key, _)| key)
            .collect();

        let count = matching.len();
        for key in matching {
            self.inner.invalidate(key.as_str()).await;
        }

        debug!(pattern = %pattern_str, count, "Cache entries deleted by pattern");
        self.metrics
            .record_operation_duration("delete_pattern", start.elapsed());
        self.update_entry_gauge();

        Ok(count)
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self
            .inner
            .get(key)
            .await
            .is_some_and(|entry| entry.is_live()))
    }

    async fn ttl_remaining(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        Ok(self
            .inner
            .get(key)
            .await
            .filter(CacheEntry::is_live)
            .map(|entry| entry.expires_at.saturating_duration_since(Instant::now())))
    }

    fn name(&self) -> &str {
        "moka"
    }
}
