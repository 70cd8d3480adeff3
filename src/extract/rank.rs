//! Academic rank matched against a fixed vocabulary.

use std::sync::LazyLock;

use regex::Regex;

/// Accepted ranks; earlier entries win when several appear.
pub const RANKS: &[&str] = &[
    "Professor",
    "Associate Professor",
    "Assistant Professor",
    "Senior Lecturer",
    "Lecturer",
    "Research Scientist",
    "Postdoctoral",
    "Postdoctoral Fellow",
];

// Longest phrases first so a title like "Associate Professor" is one hit, not two.
static RANK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let mut phrases: Vec<&str> = RANKS.to_vec();
    phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("rank regex")
});

/// Whole-word, case-insensitive rank match against `text`. Returns the vocabulary
/// spelling of the earliest-listed rank found.
pub fn extract_rank(text: &str) -> Option<String> {
    let found: Vec<usize> = RANK_PATTERN
        .find_iter(text)
        .filter_map(|m| rank_index(m.as_str()))
        .collect();
    found.into_iter().min().map(|i| RANKS[i].to_string())
}

fn rank_index(matched: &str) -> Option<usize> {
    let matched = matched.split_whitespace().collect::<Vec<_>>().join(" ");
    RANKS.iter().position(|r| r.eq_ignore_ascii_case(&matched))
}
