use serde::Deserialize;

use crate::settings::ApiSettings;
use problemset_core::{Difficulty, Pagination, ProblemFilter};

/// Longitud maxima del texto de busqueda.
pub const MAX_SEARCH_LEN: usize = 100;

/// Query parameters de `GET /problems`.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub difficulty: Option<String>,
    pub topic: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Filtro normalizado y ventana de paginacion.
    ///
    /// `limit` se recorta a `api.max_page_limit`; `page` o `limit` en cero
    /// son rechazados.
    pub fn into_parts(self, api: &ApiSettings) -> Result<(ProblemFilter, Pagination), String> {
        let page = self.page.unwrap_or(1);
        let limit = self
            .limit
            .unwrap_or(api.default_page_limit)
            .min(api.max_page_limit);
        let pagination = Pagination::new(page, limit).map_err(|e| e.to_string())?;

        let mut filter = ProblemFilter::new();
        if let Some(difficulty) = self.difficulty.as_deref().map(str::trim) {
            if !difficulty.is_empty() {
                filter.difficulty = Some(difficulty.parse::<Difficulty>().map_err(|e| e.to_string())?);
            }
        }
        filter.topic = self.topic;
        filter.search = self.search;

        Ok((filter.normalized(), pagination))
    }
}

/// Query parameters de `GET /problems/search`.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// Texto de busqueda validado (1 a 100 caracteres despues de trim).
    pub fn query(&self) -> Result<&str, String> {
        let q = self.q.as_deref().map(str::trim).unwrap_or_default();
        if q.is_empty() {
            return Err("Search query is required".to_string());
        }
        if q.chars().count() > MAX_SEARCH_LEN {
            return Err(format!(
                "Search query must be at most {} characters",
                MAX_SEARCH_LEN
            ));
        }
        Ok(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let (filter, pagination) = ListQuery::default()
            .into_parts(&ApiSettings::default())
            .unwrap();

        assert!(filter.is_empty());
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), 20);
    }

    #[test]
    fn test_limit_is_clamped() {
        let query = ListQuery {
            limit: Some(500),
            ..Default::default()
        };
        let (_, pagination) = query.into_parts(&ApiSettings::default()).unwrap();

        assert_eq!(pagination.limit(), 20);
    }

    #[test]
    fn test_zero_page_is_rejected() {
        let query = ListQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(query.into_parts(&ApiSettings::default()).is_err());
    }

    #[test]
    fn test_difficulty_is_parsed_case_insensitively() {
        let query = ListQuery {
            difficulty: Some("easy".into()),
            topic: Some(" Array ".into()),
            ..Default::default()
        };
        let (filter, _) = query.into_parts(&ApiSettings::default()).unwrap();

        assert_eq!(filter.difficulty, Some(Difficulty::Easy));
        assert_eq!(filter.topic.as_deref(), Some("Array"));
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let query = ListQuery {
            difficulty: Some("Impossible".into()),
            ..Default::default()
        };
        assert!(query.into_parts(&ApiSettings::default()).is_err());
    }

    #[test]
    fn test_search_query_bounds() {
        assert!(SearchQuery { q: None }.query().is_err());
        assert!(SearchQuery { q: Some("   ".into()) }.query().is_err());
        assert!(SearchQuery { q: Some("a".repeat(101)) }.query().is_err());
        assert_eq!(SearchQuery { q: Some(" dp ".into()) }.query().unwrap(), "dp");
    }
}
