//! Read-through service layer.
//!
//! [`ProblemService`] is the only component that touches both the store and
//! the cache. Reads consult the cache first and populate it on a miss;
//! writes go to the store and then invalidate every key they could have
//! made stale.

mod error;
mod problems;

pub use error::ServiceError;
pub use problems::ProblemService;
