//! Cache module for the Problemset server.
//!
//! This module provides the cache layer consumed by the read-through
//! service: a backend contract with a Moka implementation supporting
//! per-entry TTL and glob-pattern deletion, deterministic key derivation,
//! the TTL policy, and the write invalidation protocol.

pub mod backend;
pub mod best_effort;
pub mod invalidation;
pub mod keys;
pub mod moka_cache;

// Re-exports
pub use backend::{CacheBackend, CacheError, NullCache};
pub use best_effort::BestEffortCache;
pub use invalidation::{InvalidationPlan, InvalidationResult, Invalidator, WriteEvent};
pub use keys::{CacheKey, TtlPolicy};
pub use moka_cache::{CacheConfig, MokaCache};
