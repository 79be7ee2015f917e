//! Request extractors for the problem API.

pub mod path;
pub mod query;

pub use path::{IdPath, IdentifierPath};
pub use query::{ListQuery, SearchQuery};
