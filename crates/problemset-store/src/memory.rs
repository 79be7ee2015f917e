//! In-memory store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexSet;
use parking_lot::RwLock;
use problemset_core::{
    Difficulty, DifficultyCounts, NewProblem, Pagination, Problem, ProblemFilter, ProblemPatch,
    ProblemStatistics,
};
use tracing::debug;

use crate::error::StoreError;
use crate::traits::{ProblemStore, SEARCH_LIMIT};

#[derive(Debug)]
struct MemoryState {
    /// Problems keyed by id; iteration order is ascending id.
    problems: BTreeMap<i64, Problem>,
    next_id: i64,
}

impl MemoryState {
    fn slug_owner(&self, slug: &str) -> Option<i64> {
        self.problems
            .values()
            .find(|p| p.title_slug == slug)
            .map(|p| p.id)
    }

    fn filtered<'a>(
        &'a self,
        filter: &'a ProblemFilter,
    ) -> impl Iterator<Item = &'a Problem> + 'a {
        self.problems.values().filter(move |p| filter.matches(p))
    }
}

/// A process-local [`ProblemStore`].
///
/// Uniqueness of id and slug is enforced under the write lock, so
/// concurrent creates behave like a database with unique constraints.
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                problems: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Creates a store pre-populated with `problems`.
    ///
    /// Later entries win on duplicate ids.
    pub fn with_problems(problems: impl IntoIterator<Item = Problem>) -> Self {
        let problems: BTreeMap<i64, Problem> = problems.into_iter().map(|p| (p.id, p)).collect();
        let next_id = problems
            .keys()
            .next_back()
            .map_or(1, |max| max.saturating_add(1));

        Self {
            state: RwLock::new(MemoryState { problems, next_id }),
        }
    }

    /// Returns the number of stored problems.
    pub fn len(&self) -> usize {
        self.state.read().problems.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProblemStore for InMemoryStore {
    async fn find_page(
        &self,
        filter: &ProblemFilter,
        pagination: Pagination,
    ) -> Result<Vec<Problem>, StoreError> {
        let state = self.state.read();
        Ok(state
            .filtered(filter)
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ProblemFilter) -> Result<u64, StoreError> {
        Ok(self.state.read().filtered(filter).count() as u64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Problem>, StoreError> {
        Ok(self.state.read().problems.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Problem>, StoreError> {
        let state = self.state.read();
        Ok(state
            .problems
            .values()
            .find(|p| p.title_slug == slug)
            .cloned())
    }

    async fn find_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<Problem>, StoreError> {
        let filter = ProblemFilter::new().with_difficulty(difficulty);
        Ok(self.state.read().filtered(&filter).cloned().collect())
    }

    async fn find_by_topic(&self, topic: &str) -> Result<Vec<Problem>, StoreError> {
        let state = self.state.read();
        Ok(state
            .problems
            .values()
            .filter(|p| p.has_topic(topic))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Problem>, StoreError> {
        let needle = query.trim().to_lowercase();
        let mut hits: Vec<Problem> = self
            .state
            .read()
            .problems
            .values()
            .filter(|p| p.matches_search(&needle))
            .cloned()
            .collect();

        // Stable sort: ties keep ascending id order.
        hits.sort_by(|a, b| b.likes.cmp(&a.likes));
        hits.truncate(SEARCH_LIMIT);
        Ok(hits)
    }

    async fn create(&self, input: NewProblem) -> Result<Problem, StoreError> {
        let mut state = self.state.write();

        if let Some(id) = input.id {
            if state.problems.contains_key(&id) {
                return Err(StoreError::conflict("id", id.to_string()));
            }
        }
        if state.slug_owner(&input.title_slug).is_some() {
            return Err(StoreError::conflict("titleSlug", input.title_slug));
        }

        let id = input.id.unwrap_or(state.next_id);
        let following = id
            .checked_add(1)
            .ok_or_else(|| StoreError::query(format!("id {} leaves no room for the next id", id)))?;
        state.next_id = state.next_id.max(following);

        let problem = input.into_problem(id, Utc::now());
        state.problems.insert(id, problem.clone());

        debug!(id = id, slug = %problem.title_slug, "Problem inserted");
        Ok(problem)
    }

    async fn update(&self, id: i64, patch: &ProblemPatch) -> Result<Option<Problem>, StoreError> {
        let mut state = self.state.write();

        if let Some(slug) = &patch.title_slug {
            if matches!(state.slug_owner(slug), Some(owner) if owner != id) {
                return Err(StoreError::conflict("titleSlug", slug.clone()));
            }
        }

        let Some(problem) = state.problems.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(problem, Utc::now());

        Ok(Some(problem.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().problems.remove(&id).is_some())
    }

    async fn statistics(&self) -> Result<ProblemStatistics, StoreError> {
        let state = self.state.read();
        let mut counts = DifficultyCounts::default();
        let mut topics = IndexSet::new();

        for problem in state.problems.values() {
            match problem.difficulty {
                Difficulty::Easy => counts.easy += 1,
                Difficulty::Medium => counts.medium += 1,
                Difficulty::Hard => counts.hard += 1,
            }
            topics.extend(problem.topics.iter().cloned());
        }

        Ok(ProblemStatistics::new(counts, topics.into_iter().collect()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
