//! Paginated and aggregate views over the catalog.

use serde::{Deserialize, Serialize};

use crate::filter::Pagination;

/// Pagination metadata returned with every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PageInfo {
    /// Builds the metadata for a window over `total` rows.
    pub fn new(pagination: Pagination, total: u64) -> Self {
        Self {
            page: pagination.page(),
            limit: pagination.limit(),
            total,
            total_pages: pagination.total_pages(total),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total: u64) -> Self {
        Self {
            data,
            pagination: PageInfo::new(pagination, total),
        }
    }
}

/// Problem count per difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCounts {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

/// Catalog-wide aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatistics {
    pub total: u64,
    pub by_difficulty: DifficultyCounts,
    pub total_topics: u64,
    /// Distinct topics, in first-seen order.
    pub topics: Vec<String>,
}

impl ProblemStatistics {
    /// Builds the aggregate from per-difficulty counts and the distinct topic list.
    pub fn new(by_difficulty: DifficultyCounts, topics: Vec<String>) -> Self {
        Self {
            total: by_difficulty.easy + by_difficulty.medium + by_difficulty.hard,
            by_difficulty,
            total_topics: topics.len() as u64,
            topics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_rounds_up() {
        let info = PageInfo::new(Pagination::new(1, 20).unwrap(), 21);
        assert_eq!(info.total_pages, 2);

        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["totalPages"], 2);
    }

    #[test]
    fn test_statistics_totals() {
        let stats = ProblemStatistics::new(
            DifficultyCounts {
                easy: 3,
                medium: 2,
                hard: 1,
            },
            vec!["A".into(), "B".into()],
        );
        assert_eq!(stats.total, 6);
        assert_eq!(stats.total_topics, 2);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["byDifficulty"]["easy"], 3);
        assert_eq!(json["totalTopics"], 2);
    }
}
