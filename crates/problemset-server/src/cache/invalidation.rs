//! Write invalidation protocol.
//!
//! Every successful mutation maps to an [`InvalidationPlan`]: the single
//! record keys it could have made stale plus the listing namespace, which
//! is always purged since any write may change a page, a listing, a search
//! result or the statistics.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::backend::CacheBackend;
use crate::cache::keys::{CacheKey, LISTING_PATTERN, RECORD_PATTERN};
use crate::metrics::CacheMetrics;
use problemset_core::Identifier;

/// Mutacion exitosa sobre el catalogo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteEvent {
    Created,
    Updated {
        id: i64,
        /// Slug antes del update, si se conocia.
        previous_slug: Option<String>,
        current_slug: String,
    },
    Deleted {
        id: i64,
        slug: String,
    },
}

/// Keys exactas y patrones a eliminar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationPlan {
    pub keys: Vec<String>,
    pub patterns: Vec<String>,
}

impl InvalidationPlan {
    /// Plan para un evento de escritura.
    ///
    /// ```
    /// use problemset_server::cache::{InvalidationPlan, WriteEvent};
    ///
    /// let plan = InvalidationPlan::for_event(&WriteEvent::Deleted {
    ///     id: 3,
    ///     slug: "climbing-stairs".to_string(),
    /// });
    /// assert_eq!(plan.keys, vec!["problem:3", "problem:climbing-stairs"]);
    /// assert_eq!(plan.patterns, vec!["problems:*"]);
    /// ```
    pub fn for_event(event: &WriteEvent) -> Self {
        let mut plan = Self::listings();

        match event {
            WriteEvent::Created => {},
            WriteEvent::Updated {
                id,
                previous_slug,
                current_slug,
            } => {
                plan.push_record(&Identifier::Numeric(*id));
                plan.push_record(&Identifier::Slug(current_slug.clone()));
                if let Some(previous) = previous_slug {
                    plan.push_record(&Identifier::Slug(previous.clone()));
                }
            },
            WriteEvent::Deleted { id, slug } => {
                plan.push_record(&Identifier::Numeric(*id));
                plan.push_record(&Identifier::Slug(slug.clone()));
            },
        }

        plan
    }

    /// Plan que vacia todo el namespace del catalogo.
    pub fn flush_all() -> Self {
        Self {
            keys: Vec::new(),
            patterns: vec![RECORD_PATTERN.to_string(), LISTING_PATTERN.to_string()],
        }
    }

    fn listings() -> Self {
        Self {
            keys: Vec::new(),
            patterns: vec![LISTING_PATTERN.to_string()],
        }
    }

    fn push_record(&mut self, identifier: &Identifier) {
        let key = CacheKey::record(identifier).to_string();
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }
}

/// Resultado de aplicar un plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Numero de entries eliminadas.
    pub count: usize,
    /// Keys exactas solicitadas.
    pub keys: Vec<String>,
    /// Patrones aplicados.
    pub patterns: Vec<String>,
    /// Operaciones que fallaron y fueron ignoradas.
    pub failures: usize,
}

/// Aplica planes de invalidacion contra un backend.
///
/// Nunca falla: cada operacion se intenta de forma independiente y los
/// errores solo se registran, la escritura ya fue confirmada en el store.
#[derive(Clone)]
pub struct Invalidator {
    backend: Arc<dyn CacheBackend>,
    metrics: CacheMetrics,
}

impl Invalidator {
    pub fn new(backend: Arc<dyn CacheBackend>, metrics: CacheMetrics) -> Self {
        Self { backend, metrics }
    }

    pub async fn apply(&self, plan: &InvalidationPlan) -> InvalidationResult {
        let mut result = InvalidationResult {
            keys: plan.keys.clone(),
            patterns: plan.patterns.clone(),
            ..Default::default()
        };

        for key in &plan.keys {
            match self.backend.delete(key).await {
                Ok(true) => result.count += 1,
                Ok(false) => {},
                Err(e) => {
                    result.failures += 1;
                    self.metrics.record_failure("delete");
                    warn!(key = %key, error = %e, "Failed to invalidate cache key");
                },
            }
        }

        for pattern in &plan.patterns {
            match self.backend.delete_pattern(pattern).await {
                Ok(count) => result.count += count,
                Err(e) => {
                    result.failures += 1;
                    self.metrics.record_failure("delete_pattern");
                    warn!(pattern = %pattern, error = %e, "Failed to invalidate cache pattern");
                },
            }
        }

        self.metrics.record_invalidated(result.count);
        info!(
            count = result.count,
            keys = ?result.keys,
            patterns = ?result.patterns,
            failures = result.failures,
            "Cache invalidated"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, MokaCache};
    use std::time::Duration;

    #[test]
    fn test_created_purges_only_listings() {
        let plan = InvalidationPlan::for_event(&WriteEvent::Created);

        assert!(plan.keys.is_empty());
        assert_eq!(plan.patterns, vec![LISTING_PATTERN]);
    }

    #[test]
    fn test_updated_includes_previous_slug() {
        let plan = InvalidationPlan::for_event(&WriteEvent::Updated {
            id: 1,
            previous_slug: Some("two-sum".to_string()),
            current_slug: "two-sum-renamed".to_string(),
        });

        assert_eq!(
            plan.keys,
            vec!["problem:1", "problem:two-sum-renamed", "problem:two-sum"]
        );
    }

    #[test]
    fn test_updated_without_rename_has_no_duplicates() {
        let plan = InvalidationPlan::for_event(&WriteEvent::Updated {
            id: 1,
            previous_slug: Some("two-sum".to_string()),
            current_slug: "two-sum".to_string(),
        });

        assert_eq!(plan.keys, vec!["problem:1", "problem:two-sum"]);
    }

    #[tokio::test]
    async fn test_apply_removes_keys_and_listing_namespace() {
        let cache = Arc::new(MokaCache::new(CacheConfig::default()));
        let ttl = Duration::from_secs(60);
        for key in [
            "problem:3",
            "problem:climbing-stairs",
            "problem:1",
            "problems:stats",
            "problems:topic:Array",
        ] {
            cache.set(key, "{}".to_string(), ttl).await.unwrap();
        }

        let invalidator = Invalidator::new(cache.clone(), CacheMetrics::new());
        let result = invalidator
            .apply(&InvalidationPlan::for_event(&WriteEvent::Deleted {
                id: 3,
                slug: "climbing-stairs".to_string(),
            }))
            .await;

        assert_eq!(result.count, 4);
        assert_eq!(result.failures, 0);
        assert!(cache.get("problem:1").await.unwrap().is_some());
        assert!(cache.get("problem:3").await.unwrap().is_none());
        assert!(cache.get("problems:stats").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flush_all_clears_both_namespaces() {
        let cache = Arc::new(MokaCache::new(CacheConfig::default()));
        let ttl = Duration::from_secs(60);
        cache.set("problem:1", "{}".to_string(), ttl).await.unwrap();
        cache.set("problems:stats", "{}".to_string(), ttl).await.unwrap();
        cache.set("unrelated", "{}".to_string(), ttl).await.unwrap();

        let invalidator = Invalidator::new(cache.clone(), CacheMetrics::new());
        let result = invalidator.apply(&InvalidationPlan::flush_all()).await;

        assert_eq!(result.count, 2);
        assert!(cache.get("unrelated").await.unwrap().is_some());
    }
}
