//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then environment variables prefixed with `PROBLEMSET__` using `__` as
//! the section separator (`PROBLEMSET__SERVER__PORT=8080`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::cache::{CacheConfig, TtlPolicy};

/// Variable de entorno con la ruta del archivo de configuracion.
pub const CONFIG_PATH_ENV: &str = "PROBLEMSET_CONFIG";

/// Archivo leido cuando `PROBLEMSET_CONFIG` no esta definido.
pub const DEFAULT_CONFIG_PATH: &str = "problemset.toml";

/// Error al cargar o validar la configuracion.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Configuracion completa del servidor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub cache: CacheSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// Direccion de escucha.
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| SettingsError::invalid("server.host", format!("{e}")))
    }
}

/// Backend de persistencia.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub sqlite_path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            sqlite_path: PathBuf::from("data/problemset.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Con `false` el servicio lee siempre del store.
    pub enabled: bool,
    pub max_capacity: u64,
    pub ttl: TtlSettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: CacheConfig::default().max_capacity,
            ttl: TtlSettings::default(),
        }
    }
}

impl CacheSettings {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_capacity: self.max_capacity,
        }
    }
}

/// TTL en segundos por tipo de key.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TtlSettings {
    pub page_secs: u64,
    pub record_secs: u64,
    pub listing_secs: u64,
    pub search_secs: u64,
    pub stats_secs: u64,
}

impl Default for TtlSettings {
    fn default() -> Self {
        let policy = TtlPolicy::default();
        Self {
            page_secs: policy.page.as_secs(),
            record_secs: policy.record.as_secs(),
            listing_secs: policy.listing.as_secs(),
            search_secs: policy.search.as_secs(),
            stats_secs: policy.stats.as_secs(),
        }
    }
}

impl From<TtlSettings> for TtlPolicy {
    fn from(ttl: TtlSettings) -> Self {
        Self {
            page: Duration::from_secs(ttl.page_secs),
            record: Duration::from_secs(ttl.record_secs),
            listing: Duration::from_secs(ttl.listing_secs),
            search: Duration::from_secs(ttl.search_secs),
            stats: Duration::from_secs(ttl.stats_secs),
        }
    }
}

/// Limites de la API HTTP.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Tamano de pagina cuando el cliente no envia `limit`.
    pub default_page_limit: u32,
    /// Tamano maximo de pagina; valores mayores se recortan.
    pub max_page_limit: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            default_page_limit: 20,
            max_page_limit: 20,
        }
    }
}

impl Settings {
    /// Carga la configuracion desde el archivo indicado por
    /// `PROBLEMSET_CONFIG` (o `problemset.toml`) y el entorno.
    pub fn load() -> Result<Self, SettingsError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(environment())
            .build()?;

        Self::from_config(config)
    }

    /// Carga la configuracion desde un string TOML, sin leer el entorno.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Valida las restricciones entre campos.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.api.max_page_limit == 0 {
            return Err(SettingsError::invalid(
                "api.max_page_limit",
                "must be at least 1",
            ));
        }
        if self.api.default_page_limit == 0 || self.api.default_page_limit > self.api.max_page_limit
        {
            return Err(SettingsError::invalid(
                "api.default_page_limit",
                format!("must be between 1 and {}", self.api.max_page_limit),
            ));
        }
        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(SettingsError::invalid(
                "cache.max_capacity",
                "must be at least 1 when the cache is enabled",
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        self.cache.ttl.into()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("PROBLEMSET")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
