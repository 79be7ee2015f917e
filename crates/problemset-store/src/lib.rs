//! # Problemset Store
//!
//! Persistent store adapters for the Problemset catalog.
//!
//! The [`ProblemStore`] trait is the only thing the server depends on; it
//! covers filtered/paginated reads, lookups by id or slug, search,
//! aggregate statistics and the three administrative writes.
//!
//! ## Backends
//!
//! - [`InMemoryStore`] - process-local, used by tests and for ephemeral runs
//! - [`SqliteStore`] - durable, bundled SQLite via `rusqlite`
//!
//! ## Example
//!
//! ```ignore
//! use problemset_store::{ProblemStore, SqliteStore};
//! use problemset_core::{Pagination, ProblemFilter};
//!
//! let store = SqliteStore::open("/var/lib/problemset/catalog.db").await?;
//! let rows = store.find_page(&ProblemFilter::new(), Pagination::default()).await?;
//! ```

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-exports
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ProblemStore, SEARCH_LIMIT};

// Re-export problemset_core for consumers
pub use problemset_core;
