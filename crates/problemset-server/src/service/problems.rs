//! Read-through access to the problem catalog.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::cache::{
    BestEffortCache, CacheBackend, CacheKey, InvalidationPlan, InvalidationResult, Invalidator,
    TtlPolicy, WriteEvent,
};
use crate::service::ServiceError;
use problemset_core::{
    CoreError, Difficulty, Identifier, NewProblem, Page, Pagination, Problem, ProblemFilter,
    ProblemPatch, ProblemStatistics,
};
use problemset_store::{ProblemStore, StoreError};

/// Servicio de lectura/escritura del catalogo con cache read-through.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use problemset_core::{Identifier, Pagination, ProblemFilter};
/// use problemset_server::cache::{CacheConfig, MokaCache, TtlPolicy};
/// use problemset_server::service::ProblemService;
/// use problemset_store::InMemoryStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), problemset_server::service::ServiceError> {
/// let service = ProblemService::new(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(MokaCache::new(CacheConfig::default())),
///     TtlPolicy::default(),
/// );
///
/// let page = service.get_page(&ProblemFilter::new(), Pagination::default()).await?;
/// println!("{} problems", page.pagination.total);
///
/// let problem = service.get_by_identifier(&Identifier::from("two-sum")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProblemService {
    store: Arc<dyn ProblemStore>,
    cache: BestEffortCache,
    invalidator: Invalidator,
    ttl: TtlPolicy,
}

impl ProblemService {
    pub fn new(store: Arc<dyn ProblemStore>, cache: Arc<dyn CacheBackend>, ttl: TtlPolicy) -> Self {
        let cache = BestEffortCache::new(cache);
        let invalidator = Invalidator::new(Arc::clone(cache.backend()), cache.metrics().clone());

        Self {
            store,
            cache,
            invalidator,
            ttl,
        }
    }

    /// Store subyacente.
    pub fn store(&self) -> &Arc<dyn ProblemStore> {
        &self.store
    }

    /// Backend de cache subyacente.
    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        self.cache.backend()
    }

    /// Fallas de cache absorbidas hasta ahora.
    pub fn cache_failures(&self) -> u64 {
        self.cache.metrics().failures()
    }

    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl
    }

    /// Pagina de problemas que cumplen el filtro, ordenada por id.
    ///
    /// La pagina y el total se leen en paralelo del store en un miss.
    #[instrument(skip(self, pagination), fields(page = pagination.page(), limit = pagination.limit()))]
    pub async fn get_page(
        &self,
        filter: &ProblemFilter,
        pagination: Pagination,
    ) -> Result<Page<Problem>, ServiceError> {
        let filter = filter.normalized();
        let key = CacheKey::page(&filter, pagination);

        self.read_through(key, || async {
            let (rows, total) = tokio::try_join!(
                self.store.find_page(&filter, pagination),
                self.store.count(&filter)
            )?;
            Ok::<_, StoreError>(Page::new(rows, pagination, total))
        })
        .await
    }

    /// Un problema por id numerico o por slug.
    ///
    /// Los "no encontrado" no se cachean: un registro creado despues es
    /// visible de inmediato.
    #[instrument(skip(self, identifier), fields(identifier = %identifier))]
    pub async fn get_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Problem>, ServiceError> {
        let key = CacheKey::record(identifier);

        if let Some(problem) = self.cache.read::<Problem>(&key).await {
            return Ok(Some(problem));
        }

        let found = match identifier {
            Identifier::Numeric(id) => self.store.find_by_id(*id).await?,
            Identifier::Slug(slug) => self.store.find_by_slug(slug).await?,
        };

        if let Some(problem) = &found {
            self.cache.write(&key, problem, key.ttl(&self.ttl)).await;
        }

        Ok(found)
    }

    /// Todos los problemas de una dificultad.
    #[instrument(skip(self, difficulty), fields(difficulty = %difficulty))]
    pub async fn get_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<Problem>, ServiceError> {
        self.read_through(CacheKey::Difficulty(difficulty), || {
            self.store.find_by_difficulty(difficulty)
        })
        .await
    }

    /// Todos los problemas con el topic dado (match exacto).
    #[instrument(skip(self, topic), fields(topic = %topic))]
    pub async fn get_by_topic(&self, topic: &str) -> Result<Vec<Problem>, ServiceError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CoreError::validation("topic", "Topic is required").into());
        }

        self.read_through(CacheKey::topic(topic), || self.store.find_by_topic(topic))
            .await
    }

    /// Busqueda case-insensitive sobre titulo y slug, ordenada por likes.
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<Problem>, ServiceError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(CoreError::validation("q", "Search query is required").into());
        }

        self.read_through(CacheKey::search(&needle), || self.store.search(&needle))
            .await
    }

    /// Agregado del catalogo completo.
    #[instrument(skip(self))]
    pub async fn get_statistics(&self) -> Result<ProblemStatistics, ServiceError> {
        self.read_through(CacheKey::Stats, || self.store.statistics())
            .await
    }

    /// Crea un problema e invalida los listados.
    #[instrument(skip(self, input), fields(slug = %input.title_slug))]
    pub async fn create(&self, input: NewProblem) -> Result<Problem, ServiceError> {
        input.validate()?;

        let problem = self.store.create(input).await?;
        info!(id = problem.id, "Problem created");

        self.invalidator
            .apply(&InvalidationPlan::for_event(&WriteEvent::Created))
            .await;

        Ok(problem)
    }

    /// Aplica un patch parcial. `None` si el id no existe.
    ///
    /// El registro previo se lee antes de escribir para invalidar tambien
    /// la key de su slug anterior cuando el slug cambia.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: i64,
        patch: ProblemPatch,
    ) -> Result<Option<Problem>, ServiceError> {
        patch.validate()?;

        let Some(previous) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        let Some(updated) = self.store.update(id, &patch).await? else {
            return Ok(None);
        };
        info!(id, "Problem updated");

        let event = WriteEvent::Updated {
            id,
            previous_slug: Some(previous.title_slug),
            current_slug: updated.title_slug.clone(),
        };
        self.invalidator
            .apply(&InvalidationPlan::for_event(&event))
            .await;

        Ok(Some(updated))
    }

    /// Elimina un problema. `false` si el id no existe.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(false);
        };

        if !self.store.delete(id).await? {
            return Ok(false);
        }
        info!(id, "Problem deleted");

        let event = WriteEvent::Deleted {
            id,
            slug: existing.title_slug,
        };
        self.invalidator
            .apply(&InvalidationPlan::for_event(&event))
            .await;

        Ok(true)
    }

    /// Vacia todas las entries del catalogo en cache.
    pub async fn flush_cache(&self) -> InvalidationResult {
        self.invalidator.apply(&InvalidationPlan::flush_all()).await
    }

    /// Lee `key` del cache; en un miss ejecuta `fetch` y guarda el resultado.
    async fn read_through<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<T, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        if let Some(cached) = self.cache.read::<T>(&key).await {
            return Ok(cached);
        }

        let value = fetch().await?;
        let stored = self.cache.write(&key, &value, key.ttl(&self.ttl)).await;
        debug!(key = %key, stored, "Populated cache from store");

        Ok(value)
    }
}
