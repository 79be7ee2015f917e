//! Typed, failure-absorbing access to a cache backend.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::backend::{CacheBackend, CacheError};
use crate::cache::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Envuelve un [`CacheBackend`] para que ningun error llegue al llamador.
///
/// Las lecturas fallidas o con payload corrupto se tratan como miss; las
/// escrituras fallidas se registran y se ignoran.
#[derive(Clone)]
pub struct BestEffortCache {
    backend: Arc<dyn CacheBackend>,
    metrics: CacheMetrics,
}

impl BestEffortCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            metrics: CacheMetrics::new(),
        }
    }

    /// Backend subyacente.
    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Contadores de fallas absorbidas.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Lee y deserializa un snapshot. `None` en miss o ante cualquier error.
    pub async fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key_str = key.to_string();

        let raw = match self.backend.get(&key_str).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key_str, "Cache miss");
                return None;
            },
            Err(e) => {
                self.absorb("get", &key_str, &e);
                return None;
            },
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %key_str, kind = key.kind(), "Cache hit");
                Some(value)
            },
            Err(e) => {
                let err = CacheError::Malformed {
                    key: key_str.clone(),
                    reason: e.to_string(),
                };
                self.absorb("decode", &key_str, &err);
                // El entry corrupto se descarta para que la proxima lectura lo repueble.
                if let Err(e) = self.backend.delete(&key_str).await {
                    self.absorb("delete", &key_str, &e);
                }
                None
            },
        }
    }

    /// Serializa y guarda un snapshot. Retorna false si no se pudo guardar.
    pub async fn write<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T, ttl: Duration) -> bool {
        let key_str = key.to_string();

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                let err = CacheError::Serialize {
                    key: key_str.clone(),
                    reason: e.to_string(),
                };
                self.absorb("encode", &key_str, &err);
                return false;
            },
        };

        match self.backend.set(&key_str, payload, ttl).await {
            Ok(()) => true,
            Err(e) => {
                self.absorb("set", &key_str, &e);
                false
            },
        }
    }

    fn absorb(&self, operation: &str, key: &str, error: &CacheError) {
        self.metrics.record_failure(operation);
        warn!(
            operation,
            key = %key,
            backend = self.backend.name(),
            error = %error,
            "Cache operation failed, continuing without cache"
        );
    }
}
