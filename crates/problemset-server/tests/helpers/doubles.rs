//! Test doubles para store y cache.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use problemset_core::{
    Difficulty, NewProblem, Pagination, Problem, ProblemFilter, ProblemPatch, ProblemStatistics,
};
use problemset_server::cache::{CacheBackend, CacheError};
use problemset_store::{InMemoryStore, ProblemStore, StoreError};

/// Store en memoria que registra cada operacion recibida.
pub struct CountingStore {
    inner: InMemoryStore,
    calls: Mutex<Vec<&'static str>>,
}

impl CountingStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, op: &'static str) {
        self.calls.lock().unwrap().push(op);
    }

    /// Numero de llamadas a una operacion.
    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    /// Numero total de llamadas.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProblemStore for CountingStore {
    async fn find_page(
        &self,
        filter: &ProblemFilter,
        pagination: Pagination,
    ) -> Result<Vec<Problem>, StoreError> {
        self.record("find_page");
        self.inner.find_page(filter, pagination).await
    }

    async fn count(&self, filter: &ProblemFilter) -> Result<u64, StoreError> {
        self.record("count");
        self.inner.count(filter).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Problem>, StoreError> {
        self.record("find_by_id");
        self.inner.find_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Problem>, StoreError> {
        self.record("find_by_slug");
        self.inner.find_by_slug(slug).await
    }

    async fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Problem>, StoreError> {
        self.record("find_by_difficulty");
        self.inner.find_by_difficulty(difficulty).await
    }

    async fn find_by_topic(&self, topic: &str) -> Result<Vec<Problem>, StoreError> {
        self.record("find_by_topic");
        self.inner.find_by_topic(topic).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Problem>, StoreError> {
        self.record("search");
        self.inner.search(query).await
    }

    async fn create(&self, input: NewProblem) -> Result<Problem, StoreError> {
        self.record("create");
        self.inner.create(input).await
    }

    async fn update(&self, id: i64, patch: &ProblemPatch) -> Result<Option<Problem>, StoreError> {
        self.record("update");
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.record("delete");
        self.inner.delete(id).await
    }

    async fn statistics(&self) -> Result<ProblemStatistics, StoreError> {
        self.record("statistics");
        self.inner.statistics().await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Store que nunca responde.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::unavailable("connection refused")
}

#[async_trait]
impl ProblemStore for FailingStore {
    async fn find_page(&self, _: &ProblemFilter, _: Pagination) -> Result<Vec<Problem>, StoreError> {
        Err(down())
    }

    async fn count(&self, _: &ProblemFilter) -> Result<u64, StoreError> {
        Err(down())
    }

    async fn find_by_id(&self, _: i64) -> Result<Option<Problem>, StoreError> {
        Err(down())
    }

    async fn find_by_slug(&self, _: &str) -> Result<Option<Problem>, StoreError> {
        Err(down())
    }

    async fn find_by_difficulty(&self, _: Difficulty) -> Result<Vec<Problem>, StoreError> {
        Err(down())
    }

    async fn find_by_topic(&self, _: &str) -> Result<Vec<Problem>, StoreError> {
        Err(down())
    }

    async fn search(&self, _: &str) -> Result<Vec<Problem>, StoreError> {
        Err(down())
    }

    async fn create(&self, _: NewProblem) -> Result<Problem, StoreError> {
        Err(down())
    }

    async fn update(&self, _: i64, _: &ProblemPatch) -> Result<Option<Problem>, StoreError> {
        Err(down())
    }

    async fn delete(&self, _: i64) -> Result<bool, StoreError> {
        Err(down())
    }

    async fn statistics(&self) -> Result<ProblemStatistics, StoreError> {
        Err(down())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(down())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Cache cuyas operaciones siempre fallan.
pub struct FailingCache;

fn unreachable_cache() -> CacheError {
    CacheError::Unavailable("connection reset".to_string())
}

#[async_trait]
impl CacheBackend for FailingCache {
    async fn get(&self, _: &str) -> Result<Option<String>, CacheError> {
        Err(unreachable_cache())
    }

    async fn set(&self, _: &str, _: String, _: Duration) -> Result<(), CacheError> {
        Err(unreachable_cache())
    }

    async fn delete(&self, _: &str) -> Result<bool, CacheError> {
        Err(unreachable_cache())
    }

    async fn delete_pattern(&self, _: &str) -> Result<usize, CacheError> {
        Err(unreachable_cache())
    }

    async fn exists(&self, _: &str) -> Result<bool, CacheError> {
        Err(unreachable_cache())
    }

    async fn ttl_remaining(&self, _: &str) -> Result<Option<Duration>, CacheError> {
        Err(unreachable_cache())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(unreachable_cache())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
