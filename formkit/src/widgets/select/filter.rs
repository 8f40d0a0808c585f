//! Option filtering for searchable selects.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::Deserialize;

/// How a searchable select narrows its options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring match on trimmed text, keeping option order.
    #[default]
    Substring,
    /// Fuzzy match ranked by score.
    Fuzzy,
}

impl SearchMode {
    /// Indices of the labels matching `query`, in display order.
    ///
    /// A blank query keeps every label.
    pub fn filter(self, query: &str, labels: &[String]) -> Vec<usize> {
        if query.trim().is_empty() {
            return (0..labels.len()).collect();
        }
        match self {
            SearchMode::Substring => labels
                .iter()
                .enumerate()
                .filter(|(_, label)| contains(label, query))
                .map(|(index, _)| index)
                .collect(),
            SearchMode::Fuzzy => fuzzy_filter(query, labels)
                .into_iter()
                .map(|m| m.index)
                .collect(),
        }
    }
}

/// `haystack` contains `needle`, ignoring case and surrounding whitespace.
pub fn contains(haystack: &str, needle: &str) -> bool {
    haystack
        .trim()
        .to_lowercase()
        .contains(&needle.trim().to_lowercase())
}

/// A label that matched a fuzzy query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMatch {
    /// Position of the label in the input slice.
    pub index: usize,
    /// Higher is better.
    pub score: u32,
}

/// Fuzzy-match `labels` against `query` with nucleo.
///
/// Best score first; equal scores keep their input order.
pub fn fuzzy_filter(query: &str, labels: &[String]) -> Vec<FilterMatch> {
    let query = query.trim();
    if query.is_empty() {
        return (0..labels.len())
            .map(|index| FilterMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(query, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy);

    let mut buf = Vec::new();
    let mut matches: Vec<FilterMatch> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let haystack = Utf32Str::new(label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FilterMatch { index, score })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["Apple", "Banana", "Apricot", "Pineapple"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_substring_keeps_order() {
        assert_eq!(SearchMode::Substring.filter("  APP ", &labels()), vec![0, 3]);
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        assert_eq!(SearchMode::Fuzzy.filter("   ", &labels()), vec![0, 1, 2, 3]);
        assert_eq!(fuzzy_filter("", &labels()).len(), 4);
    }

    #[test]
    fn test_fuzzy_matches_scattered_letters() {
        let found = SearchMode::Fuzzy.filter("apct", &labels());
        assert_eq!(found, vec![2]);
    }

    #[test]
    fn test_fuzzy_ranks_by_score() {
        let matches = fuzzy_filter("ap", &labels());
        assert!(matches.len() >= 2);
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_contains() {
        assert!(contains(" Hello World ", "lo w"));
        assert!(!contains("Hello", "xyz"));
    }
}
