//! Catalogo y servicios de prueba.

use std::sync::Arc;

use chrono::Utc;
use problemset_core::{Difficulty, NewProblem, Problem};
use problemset_server::cache::{CacheBackend, CacheConfig, MokaCache, TtlPolicy};
use problemset_server::settings::ApiSettings;
use problemset_server::{AppState, ProblemService};
use problemset_store::{InMemoryStore, ProblemStore};

/// Construye un problema almacenado.
pub fn problem(id: i64, title: &str, slug: &str, difficulty: Difficulty, topics: &[&str], likes: u32) -> Problem {
    NewProblem::new(title, slug, difficulty)
        .with_topics(topics.iter().copied())
        .with_likes(likes)
        .into_problem(id, Utc::now())
}

/// Catalogo base: 2 Easy, 2 Medium, 1 Hard; "Array" en 2 problemas.
pub fn catalog() -> Vec<Problem> {
    vec![
        problem(1, "Two Sum", "two-sum", Difficulty::Easy, &["Array", "Hash Table"], 1000),
        problem(2, "Add Two Numbers", "add-two-numbers", Difficulty::Medium, &["Linked List", "Math"], 300),
        problem(3, "Climbing Stairs", "climbing-stairs", Difficulty::Easy, &["Dynamic Programming", "Math"], 200),
        problem(4, "Two Sum II", "two-sum-ii", Difficulty::Medium, &["Array", "Two Pointers"], 10),
        problem(5, "Trapping Rain Water", "trapping-rain-water", Difficulty::Hard, &["Stack", "Two Pointers"], 700),
    ]
}

pub fn seeded_store() -> InMemoryStore {
    InMemoryStore::with_problems(catalog())
}

pub fn moka() -> Arc<MokaCache> {
    Arc::new(MokaCache::new(CacheConfig::default()))
}

pub fn service_with(store: Arc<dyn ProblemStore>, cache: Arc<dyn CacheBackend>) -> ProblemService {
    ProblemService::new(store, cache, TtlPolicy::default())
}

pub fn state_with(store: Arc<dyn ProblemStore>, cache: Arc<dyn CacheBackend>) -> AppState {
    AppState::new(service_with(store, cache), ApiSettings::default())
}

/// Estado con el catalogo base y cache Moka.
pub fn seeded_state() -> AppState {
    state_with(Arc::new(seeded_store()), moka())
}
