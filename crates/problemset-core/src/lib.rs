//! Problemset Core - Domain types
//!
//! This crate provides the foundational types for the Problemset catalog:
//! the [`Problem`] record, the inputs used to create and update it, the
//! filter/pagination shapes used to query it, and the aggregate views
//! returned to callers.
//!
//! It has no knowledge of storage or caching; both the store adapters and
//! the server build on these types.

pub mod error;
pub mod filter;
pub mod identifier;
pub mod page;
pub mod problem;

pub use error::{CoreError, Result};
pub use filter::{Pagination, ProblemFilter};
pub use identifier::Identifier;
pub use page::{DifficultyCounts, Page, PageInfo, ProblemStatistics};
pub use problem::{Difficulty, NewProblem, Problem, ProblemPatch};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
