//! The `Problem` record and its write inputs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const MAX_TITLE_LEN: usize = 200;
const MAX_SLUG_LEN: usize = 200;

/// Problem difficulty bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Returns the canonical name (`Easy`, `Medium`, `Hard`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CoreError;

    /// Parses a difficulty, ignoring ASCII case.
    ///
    /// ```
    /// use problemset_core::Difficulty;
    ///
    /// assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    /// assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    /// assert!("extreme".parse::<Difficulty>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownDifficulty(s.to_string()))
    }
}

fn default_category() -> String {
    "Algorithms".to_string()
}

/// A coding-interview problem as stored in the catalog.
///
/// `id` and `title_slug` are each unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,
    pub frontend_question_id: Option<String>,
    pub title: String,
    pub title_slug: String,
    pub difficulty: Difficulty,
    pub paid_only: bool,
    pub url: Option<String>,
    pub description_url: Option<String>,
    pub solution_url: Option<String>,
    pub solution_code_url: Option<String>,
    pub description: Option<String>,
    pub solution: Option<String>,
    pub solution_code_python: Option<String>,
    pub solution_code_java: Option<String>,
    pub solution_code_cpp: Option<String>,
    pub category: String,
    pub acceptance_rate: Option<f64>,
    pub topics: Vec<String>,
    pub hints: Vec<String>,
    pub likes: u32,
    pub dislikes: u32,
    pub total_accepted: Option<String>,
    pub total_submission: Option<String>,
    pub similar_questions: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    /// Returns true if the problem is tagged with `topic` (exact match).
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// Case-insensitive substring match against title and slug.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.title_slug.to_lowercase().contains(needle)
    }
}

/// Input for creating a problem.
///
/// When `id` is absent the store assigns the next free id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProblem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub frontend_question_id: Option<String>,
    pub title: String,
    pub title_slug: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub paid_only: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description_url: Option<String>,
    #[serde(default)]
    pub solution_url: Option<String>,
    #[serde(default)]
    pub solution_code_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub solution_code_python: Option<String>,
    #[serde(default)]
    pub solution_code_java: Option<String>,
    #[serde(default)]
    pub solution_code_cpp: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub acceptance_rate: Option<f64>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
    #[serde(default)]
    pub total_accepted: Option<String>,
    #[serde(default)]
    pub total_submission: Option<String>,
    #[serde(default)]
    pub similar_questions: Option<serde_json::Value>,
}

impl NewProblem {
    /// Creates a minimal problem input with defaults for every optional field.
    ///
    /// # Examples
    ///
    /// ```
    /// use problemset_core::{Difficulty, NewProblem};
    ///
    /// let input = NewProblem::new("Two Sum", "two-sum", Difficulty::Easy)
    ///     .with_topics(["Array", "Hash Table"])
    ///     .with_likes(1000);
    ///
    /// assert!(input.validate().is_ok());
    /// assert_eq!(input.category, "Algorithms");
    /// ```
    pub fn new(title: impl Into<String>, title_slug: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: None,
            frontend_question_id: None,
            title: title.into(),
            title_slug: title_slug.into(),
            difficulty,
            paid_only: false,
            url: None,
            description_url: None,
            solution_url: None,
            solution_code_url: None,
            description: None,
            solution: None,
            solution_code_python: None,
            solution_code_java: None,
            solution_code_cpp: None,
            category: default_category(),
            acceptance_rate: None,
            topics: Vec::new(),
            hints: Vec::new(),
            likes: 0,
            dislikes: 0,
            total_accepted: None,
            total_submission: None,
            similar_questions: None,
        }
    }

    /// Sets an explicit id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the topic tags.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the like counter.
    pub fn with_likes(mut self, likes: u32) -> Self {
        self.likes = likes;
        self
    }

    /// Validates the input.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_slug(&self.title_slug)?;
        validate_acceptance_rate(self.acceptance_rate)?;
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(CoreError::validation("id", "must be a positive integer"));
            }
            // The store needs `id + 1` for the next generated id.
            if id == i64::MAX {
                return Err(CoreError::validation("id", "is out of range"));
            }
        }
        Ok(())
    }

    /// Builds the stored record, normalising title and topics.
    pub fn into_problem(self, id: i64, now: DateTime<Utc>) -> Problem {
        Problem {
            id,
            frontend_question_id: self.frontend_question_id,
            title: self.title.trim().to_string(),
            title_slug: self.title_slug,
            difficulty: self.difficulty,
            paid_only: self.paid_only,
            url: self.url,
            description_url: self.description_url,
            solution_url: self.solution_url,
            solution_code_url: self.solution_code_url,
            description: self.description,
            solution: self.solution,
            solution_code_python: self.solution_code_python,
            solution_code_java: self.solution_code_java,
            solution_code_cpp: self.solution_code_cpp,
            category: self.category,
            acceptance_rate: self.acceptance_rate,
            topics: dedup_topics(self.topics),
            hints: self.hints,
            likes: self.likes,
            dislikes: self.dislikes,
            total_accepted: self.total_accepted,
            total_submission: self.total_submission,
            similar_questions: self.similar_questions,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a problem. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemPatch {
    pub frontend_question_id: Option<String>,
    pub title: Option<String>,
    pub title_slug: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub paid_only: Option<bool>,
    pub url: Option<String>,
    pub description_url: Option<String>,
    pub solution_url: Option<String>,
    pub solution_code_url: Option<String>,
    pub description: Option<String>,
    pub solution: Option<String>,
    pub solution_code_python: Option<String>,
    pub solution_code_java: Option<String>,
    pub solution_code_cpp: Option<String>,
    pub category: Option<String>,
    pub acceptance_rate: Option<f64>,
    pub topics: Option<Vec<String>>,
    pub hints: Option<Vec<String>>,
    pub likes: Option<u32>,
    pub dislikes: Option<u32>,
    pub total_accepted: Option<String>,
    pub total_submission: Option<String>,
    pub similar_questions: Option<serde_json::Value>,
}

impl ProblemPatch {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(slug) = &self.title_slug {
            validate_slug(slug)?;
        }
        validate_acceptance_rate(self.acceptance_rate)
    }

    /// Applies the patch in place and bumps `updated_at`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use problemset_core::{Difficulty, NewProblem, ProblemPatch};
    ///
    /// let mut problem = NewProblem::new("Two Sum", "two-sum", Difficulty::Easy)
    ///     .into_problem(1, Utc::now());
    /// let patch = ProblemPatch {
    ///     difficulty: Some(Difficulty::Hard),
    ///     ..Default::default()
    /// };
    ///
    /// patch.apply(&mut problem, Utc::now());
    /// assert_eq!(problem.difficulty, Difficulty::Hard);
    /// assert_eq!(problem.title, "Two Sum");
    /// ```
    pub fn apply(&self, problem: &mut Problem, now: DateTime<Utc>) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set_opt(&mut problem.frontend_question_id, &self.frontend_question_id);
        if let Some(title) = &self.title {
            problem.title = title.trim().to_string();
        }
        set(&mut problem.title_slug, &self.title_slug);
        set(&mut problem.difficulty, &self.difficulty);
        set(&mut problem.paid_only, &self.paid_only);
        set_opt(&mut problem.url, &self.url);
        set_opt(&mut problem.description_url, &self.description_url);
        set_opt(&mut problem.solution_url, &self.solution_url);
        set_opt(&mut problem.solution_code_url, &self.solution_code_url);
        set_opt(&mut problem.description, &self.description);
        set_opt(&mut problem.solution, &self.solution);
        set_opt(&mut problem.solution_code_python, &self.solution_code_python);
        set_opt(&mut problem.solution_code_java, &self.solution_code_java);
        set_opt(&mut problem.solution_code_cpp, &self.solution_code_cpp);
        set(&mut problem.category, &self.category);
        set_opt(&mut problem.acceptance_rate, &self.acceptance_rate);
        if let Some(topics) = &self.topics {
            problem.topics = dedup_topics(topics.clone());
        }
        set(&mut problem.hints, &self.hints);
        set(&mut problem.likes, &self.likes);
        set(&mut problem.dislikes, &self.dislikes);
        set_opt(&mut problem.total_accepted, &self.total_accepted);
        set_opt(&mut problem.total_submission, &self.total_submission);
        set_opt(&mut problem.similar_questions, &self.similar_questions);
        problem.updated_at = now;
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == ProblemPatch::default()
    }
}

fn dedup_topics(topics: Vec<String>) -> Vec<String> {
    topics
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

fn validate_title(title: &str) -> Result<()> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(CoreError::validation("title", "Title is required"));
    }
    if len > MAX_TITLE_LEN {
        return Err(CoreError::validation(
            "title",
            format!("Title must not exceed {} characters", MAX_TITLE_LEN),
        ));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(CoreError::validation("titleSlug", "Title slug is required"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::validation(
            "titleSlug",
            format!("Title slug must not exceed {} characters", MAX_SLUG_LEN),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::validation(
            "titleSlug",
            "Title slug can only contain lowercase letters, numbers, and hyphens",
        ));
    }
    // A digits-only slug would read as a numeric id.
    if slug.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::validation(
            "titleSlug",
            "Title slug must contain at least one letter or hyphen",
        ));
    }
    Ok(())
}

fn validate_acceptance_rate(rate: Option<f64>) -> Result<()> {
    match rate {
        Some(r) if !(0.0..=100.0).contains(&r) => Err(CoreError::validation(
            "acceptanceRate",
            "Acceptance rate must be between 0 and 100",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Problem {
        NewProblem::new("Two Sum", "two-sum", Difficulty::Easy)
            .with_topics(["Array", "Hash Table"])
            .into_problem(1, Utc::now())
    }

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" medium ".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(
            "Legendary".parse::<Difficulty>().unwrap_err(),
            CoreError::UnknownDifficulty("Legendary".to_string())
        );
    }

    #[test]
    fn test_difficulty_serializes_as_canonical_name() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }

    #[test]
    fn test_problem_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["titleSlug"], "two-sum");
        assert_eq!(json["paidOnly"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_topics_are_deduplicated_in_order() {
        let problem = NewProblem::new("Two Sum", "two-sum", Difficulty::Easy)
            .with_topics(["Array", "Hash Table", "Array", " "])
            .into_problem(1, Utc::now());
        assert_eq!(problem.topics, vec!["Array", "Hash Table"]);
    }

    #[test]
    fn test_search_matches_title_and_slug() {
        let problem = sample();
        assert!(problem.matches_search("two sum"));
        assert!(problem.matches_search("two-sum"));
        assert!(!problem.matches_search("three"));
    }

    #[test]
    fn test_slug_validation() {
        let ok = NewProblem::new("Two Sum", "two-sum-ii", Difficulty::Easy);
        assert!(ok.validate().is_ok());

        let upper = NewProblem::new("Two Sum", "Two-Sum", Difficulty::Easy);
        assert_eq!(upper.validate().unwrap_err().field(), Some("titleSlug"));

        let numeric = NewProblem::new("Two Sum", "42", Difficulty::Easy);
        assert_eq!(numeric.validate().unwrap_err().field(), Some("titleSlug"));
    }

    #[test]
    fn test_title_and_rate_validation() {
        let blank = NewProblem::new("   ", "blank", Difficulty::Easy);
        assert_eq!(blank.validate().unwrap_err().field(), Some("title"));

        let mut rate = NewProblem::new("Rate", "rate", Difficulty::Easy);
        rate.acceptance_rate = Some(101.0);
        assert_eq!(rate.validate().unwrap_err().field(), Some("acceptanceRate"));

        let bad_id = NewProblem::new("Id", "id", Difficulty::Easy).with_id(0);
        assert_eq!(bad_id.validate().unwrap_err().field(), Some("id"));

        let max_id = NewProblem::new("Id", "id", Difficulty::Easy).with_id(i64::MAX);
        assert_eq!(max_id.validate().unwrap_err().field(), Some("id"));
        let below_max = NewProblem::new("Id", "id", Difficulty::Easy).with_id(i64::MAX - 1);
        assert!(below_max.validate().is_ok());
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut problem = sample();
        let created = problem.created_at;
        let patch = ProblemPatch {
            title_slug: Some("two-sum-renamed".to_string()),
            likes: Some(7),
            ..Default::default()
        };

        patch.apply(&mut problem, Utc::now());

        assert_eq!(problem.title_slug, "two-sum-renamed");
        assert_eq!(problem.likes, 7);
        assert_eq!(problem.title, "Two Sum");
        assert_eq!(problem.topics, vec!["Array", "Hash Table"]);
        assert_eq!(problem.created_at, created);
        assert!(problem.updated_at >= created);
    }

    #[test]
    fn test_patch_from_partial_json() {
        let patch: ProblemPatch = serde_json::from_str(r#"{"difficulty":"Hard"}"#).unwrap();
        assert_eq!(patch.difficulty, Some(Difficulty::Hard));
        assert!(patch.title.is_none());
        assert!(!patch.is_empty());
        assert!(ProblemPatch::default().is_empty());
    }

    #[test]
    fn test_new_problem_defaults_from_json() {
        let input: NewProblem = serde_json::from_str(
            r#"{"title":"Two Sum","titleSlug":"two-sum","difficulty":"Easy"}"#,
        )
        .unwrap();
        assert_eq!(input.category, "Algorithms");
        assert_eq!(input.likes, 0);
        assert!(input.topics.is_empty());
        assert!(input.id.is_none());
    }
}
