//! Filter and pagination shapes used to query the catalog.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::problem::{Difficulty, Problem};

/// Optional predicates over the problem collection.
///
/// Two filters that select the same rows compare equal once normalised,
/// and serialize identically (see [`ProblemFilter::canonical`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ProblemFilter {
    /// Creates an empty filter (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Restricts to problems tagged with `topic`.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Restricts to problems whose title or slug contains `search`.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns the normalised form of this filter.
    ///
    /// Strings are trimmed, empty strings dropped and the search text
    /// lower-cased, since search matching ignores case.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        }

        Self {
            difficulty: self.difficulty,
            topic: clean(&self.topic),
            search: clean(&self.search).map(|s| s.to_lowercase()),
        }
    }

    /// Deterministic encoding of the normalised filter.
    ///
    /// Field order is fixed by the struct declaration and absent fields are
    /// omitted, so an empty filter encodes as `{}`.
    ///
    /// ```
    /// use problemset_core::{Difficulty, ProblemFilter};
    ///
    /// let a = ProblemFilter::new().with_search("  Two SUM ").with_difficulty(Difficulty::Easy);
    /// let b = ProblemFilter::new().with_difficulty(Difficulty::Easy).with_search("two sum");
    /// assert_eq!(a.canonical(), b.canonical());
    /// assert_eq!(ProblemFilter::new().canonical(), "{}");
    /// ```
    pub fn canonical(&self) -> String {
        // Serializing a struct of strings and a unit enum cannot fail.
        serde_json::to_string(&self.normalized()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Returns true when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.normalized() == Self::default()
    }

    /// Evaluates the filter against a problem.
    pub fn matches(&self, problem: &Problem) -> bool {
        let filter = self.normalized();

        if let Some(difficulty) = filter.difficulty {
            if problem.difficulty != difficulty {
                return false;
            }
        }
        if let Some(topic) = &filter.topic {
            if !problem.has_topic(topic) {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            if !problem.matches_search(search) {
                return false;
            }
        }
        true
    }
}

/// Offset-based pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Default page size.
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Creates a pagination window. Both values are 1-based and must be positive.
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page == 0 {
            return Err(CoreError::invalid_pagination("page must be greater than 0"));
        }
        if limit == 0 {
            return Err(CoreError::invalid_pagination("limit must be greater than 0"));
        }
        Ok(Self { page, limit })
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Total page count for `total` rows.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
