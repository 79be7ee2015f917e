#![allow(dead_code)]
use chrono::Utc;
use problemset_core::{Difficulty, NewProblem, Problem};

/// Helper to build a stored problem with topics.
pub fn problem(id: i64, slug: &str, difficulty: Difficulty, topics: &[&str]) -> Problem {
    NewProblem::new(slug.replace('-', " "), slug, difficulty)
        .with_topics(topics.iter().copied())
        .into_problem(id, Utc::now())
}

/// Returns a small catalog fixture.
pub fn catalog() -> Vec<Problem> {
    vec![
        problem(1, "two-sum", Difficulty::Easy, &["Array", "Hash Table"]),
        problem(2, "add-two-numbers", Difficulty::Medium, &["Linked List", "Math"]),
        problem(3, "median-of-two-sorted-arrays", Difficulty::Hard, &["Array", "Binary Search"]),
        problem(4, "valid-parentheses", Difficulty::Easy, &["String", "Stack"]),
    ]
}
