//! Cache key derivation and TTL policy.

use std::fmt;
use std::time::Duration;

use problemset_core::{Difficulty, Identifier, Pagination, ProblemFilter};

/// Prefijo de las keys de registros individuales.
pub const RECORD_PREFIX: &str = "problem:";

/// Prefijo de las keys de listados, busquedas y estadisticas.
pub const LISTING_PREFIX: &str = "problems:";

/// Patron que cubre todo el namespace de listados.
pub const LISTING_PATTERN: &str = "problems:*";

/// Patron que cubre todos los registros individuales.
pub const RECORD_PATTERN: &str = "problem:*";

/// Key de cache para cada tipo de lectura.
///
/// La representacion textual es deterministica: dos lecturas con los mismos
/// parametros (despues de normalizar el filtro) producen la misma key.
///
/// # Examples
///
/// ```
/// use problemset_core::{Identifier, Pagination, ProblemFilter};
/// use problemset_server::cache::CacheKey;
///
/// let key = CacheKey::Record(Identifier::Numeric(42));
/// assert_eq!(key.to_string(), "problem:42");
///
/// let page = CacheKey::page(&ProblemFilter::new(), Pagination::default());
/// assert_eq!(page.to_string(), "problems:page:1:limit:20:{}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Page { page: u32, limit: u32, filter: String },
    Record(Identifier),
    Difficulty(Difficulty),
    Topic(String),
    Search(String),
    Stats,
}

impl CacheKey {
    /// Key de una pagina; el filtro se normaliza antes de serializarlo.
    pub fn page(filter: &ProblemFilter, pagination: Pagination) -> Self {
        Self::Page {
            page: pagination.page(),
            limit: pagination.limit(),
            filter: filter.canonical(),
        }
    }

    /// Key de un registro por id o slug.
    pub fn record(identifier: &Identifier) -> Self {
        Self::Record(identifier.clone())
    }

    /// Key de busqueda, normalizada igual que la busqueda misma.
    pub fn search(query: &str) -> Self {
        Self::Search(query.trim().to_lowercase())
    }

    pub fn topic(topic: &str) -> Self {
        Self::Topic(topic.trim().to_string())
    }

    /// TTL aplicable a esta key segun la politica dada.
    pub fn ttl(&self, policy: &TtlPolicy) -> Duration {
        match self {
            Self::Page { .. } => policy.page,
            Self::Record(_) => policy.record,
            Self::Difficulty(_) | Self::Topic(_) => policy.listing,
            Self::Search(_) => policy.search,
            Self::Stats => policy.stats,
        }
    }

    /// Nombre corto del tipo de key, usado como label de metricas.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Page { .. } => "page",
            Self::Record(_) => "record",
            Self::Difficulty(_) => "difficulty",
            Self::Topic(_) => "topic",
            Self::Search(_) => "search",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page {
                page,
                limit,
                filter,
            } => write!(f, "{LISTING_PREFIX}page:{page}:limit:{limit}:{filter}"),
            Self::Record(identifier) => write!(f, "{RECORD_PREFIX}{identifier}"),
            Self::Difficulty(difficulty) => write!(f, "{LISTING_PREFIX}difficulty:{difficulty}"),
            Self::Topic(topic) => write!(f, "{LISTING_PREFIX}topic:{topic}"),
            Self::Search(query) => write!(f, "{LISTING_PREFIX}search:{query}"),
            Self::Stats => write!(f, "{LISTING_PREFIX}stats"),
        }
    }
}

/// Tiempo de vida por tipo de key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub page: Duration,
    pub record: Duration,
    pub listing: Duration,
    pub search: Duration,
    pub stats: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(300),
            record: Duration::from_secs(600),
            listing: Duration::from_secs(600),
            search: Duration::from_secs(300),
            stats: Duration::from_secs(600),
        }
    }
}
