//! Persistent store trait definition.

use async_trait::async_trait;
use problemset_core::{
    Difficulty, NewProblem, Pagination, Problem, ProblemFilter, ProblemPatch, ProblemStatistics,
};

use crate::error::StoreError;

/// Maximum number of rows returned by [`ProblemStore::search`].
pub const SEARCH_LIMIT: usize = 50;

/// Durable source of truth for problems.
///
/// Absence is reported as `Ok(None)` / `Ok(false)`, never as an error.
/// Listings are ordered by ascending id unless stated otherwise.
///
/// # Implementors
///
/// - `InMemoryStore` - process-local maps behind a lock
/// - `SqliteStore` - bundled SQLite database
#[async_trait]
pub trait ProblemStore: Send + Sync {
    /// Returns one page of problems matching `filter`, ordered by id.
    async fn find_page(
        &self,
        filter: &ProblemFilter,
        pagination: Pagination,
    ) -> Result<Vec<Problem>, StoreError>;

    /// Counts problems matching `filter`.
    async fn count(&self, filter: &ProblemFilter) -> Result<u64, StoreError>;

    /// Looks up a problem by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Problem>, StoreError>;

    /// Looks up a problem by slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Problem>, StoreError>;

    /// Returns every problem of the given difficulty.
    async fn find_by_difficulty(&self, difficulty: Difficulty)
    -> Result<Vec<Problem>, StoreError>;

    /// Returns every problem tagged with `topic`.
    async fn find_by_topic(&self, topic: &str) -> Result<Vec<Problem>, StoreError>;

    /// Case-insensitive search over title and slug.
    ///
    /// At most [`SEARCH_LIMIT`] rows, ordered by likes descending and then by id.
    async fn search(&self, query: &str) -> Result<Vec<Problem>, StoreError>;

    /// Inserts a problem.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if the id or slug is already taken
    async fn create(&self, input: NewProblem) -> Result<Problem, StoreError>;

    /// Applies a patch. Returns `None` if no problem has this id.
    async fn update(&self, id: i64, patch: &ProblemPatch) -> Result<Option<Problem>, StoreError>;

    /// Deletes a problem. Returns `false` if no problem has this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Computes catalog-wide statistics.
    async fn statistics(&self) -> Result<ProblemStatistics, StoreError>;

    /// Verifies that the store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Returns the name of this store, for logging.
    fn name(&self) -> &str;

    /// Releases the underlying resources.
    ///
    /// The default implementation is a no-op.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
