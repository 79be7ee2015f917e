//! Cache backend contract.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Error del sistema de cache.
///
/// Ninguna variante debe llegar al cliente: el servicio las trata como
/// miss (lectura) o no-op (escritura/invalidacion).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("malformed payload for key '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("invalid key pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("failed to serialize value for key '{key}': {reason}")]
    Serialize { key: String, reason: String },
}

/// Almacen clave-valor con expiracion por entrada y borrado por patron.
///
/// Los valores son snapshots serializados (JSON). Todas las operaciones son
/// consultivas: un error nunca debe afectar la correccion, solo la latencia.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Obtiene el valor de una key, `None` si no existe o expiro.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Inserta o reemplaza un valor con el TTL dado.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Elimina una key. Retorna true si existia.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Elimina todas las keys que coincidan con un patron glob.
    /// Retorna el numero de entries eliminadas.
    async fn delete_pattern(&self, pattern: &str) -> Result<usize, CacheError>;

    /// Indica si la key existe y no ha expirado.
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Tiempo restante antes de que la key expire, `None` si no existe.
    async fn ttl_remaining(&self, key: &str) -> Result<Option<Duration>, CacheError>;

    /// Verifica que el backend responde.
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    /// Nombre del backend, para logging y health.
    fn name(&self) -> &str;
}

/// Backend usado cuando el cache esta deshabilitado.
/// Toda lectura es un miss y toda escritura un no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<usize, CacheError> {
        Ok(0)
    }

    async fn exists(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    async fn ttl_remaining(&self, _key: &str) -> Result<Option<Duration>, CacheError> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
