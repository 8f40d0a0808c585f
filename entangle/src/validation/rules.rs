//! Per-item validation rules with a fluent builder.

use std::fmt;

use regex::Regex;

use super::result::ValidationResult;
use crate::error::ConfigError;

/// Type alias for rule closures.
type Rule<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

/// Ordered set of shape checks for a single item.
///
/// Rules run in insertion order and the first failure wins.
///
/// # Example
///
/// ```ignore
/// let rules = Rules::new()
///     .required("Key is required")
///     .max_length(20, "Key is too long");
///
/// assert!(rules.check(&"user_id".to_string()).ok());
/// ```
pub struct Rules<V> {
    rules: Vec<Rule<V>>,
}

impl<V> Rules<V> {
    /// Create an empty rule set. Everything passes.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Run every rule against `value`.
    pub fn check(&self, value: &V) -> ValidationResult {
        for rule in &self.rules {
            if let Err(msg) = rule(value) {
                return ValidationResult::Invalid(msg);
            }
        }
        ValidationResult::Valid
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<V> Default for Rules<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Rules<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules").field("count", &self.rules.len()).finish()
    }
}

// Built-in rules for String values
impl Rules<String> {
    /// Require the value to be non-blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() >= min, msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Require length within `min..=max` (in characters).
    pub fn length(self, min: usize, max: usize, msg: impl Into<String>) -> Self {
        self.rule(
            move |v| {
                let len = v.chars().count();
                len >= min && len <= max
            },
            msg,
        )
    }

    /// Require the value to match a regex pattern.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Result<Self, ConfigError> {
        let re = Regex::new(pattern).map_err(|e| ConfigError::pattern(pattern, e))?;
        Ok(self.rule(move |v| re.is_match(v), msg))
    }

    /// Reject values equal (case-insensitively) to any blocked word.
    pub fn blocked<I, S>(self, words: I, msg: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self.rule(move |v| !words.contains(&v.to_lowercase()), msg)
    }

    /// Require the value to be one of `allowed` (exact match).
    pub fn one_of<I, S>(self, allowed: I, msg: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        self.rule(move |v| allowed.contains(v), msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn test_empty_rules_pass() {
        assert!(Rules::<String>::new().check(&s("")).ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let rules = Rules::new()
            .min_length(3, "too short")
            .pattern("^[0-9]+$", "digits only")
            .unwrap();
        assert_eq!(rules.check(&s("ab")).message(), Some("too short"));
        assert_eq!(rules.check(&s("abc")).message(), Some("digits only"));
        assert!(rules.check(&s("123")).ok());
    }

    #[test]
    fn test_length_counts_chars() {
        let rules = Rules::new().length(1, 3, "bad length");
        assert!(rules.check(&s("äöü")).ok());
        assert!(rules.check(&s("")).is_invalid());
        assert!(rules.check(&s("abcd")).is_invalid());
    }

    #[test]
    fn test_blocked_is_case_insensitive() {
        let rules = Rules::new().blocked(["Admin"], "blocked");
        assert!(rules.check(&s("ADMIN")).is_invalid());
        assert!(rules.check(&s("administrator")).ok());
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = Rules::<String>::new().pattern("[a-", "x").unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }

    #[test]
    fn test_one_of() {
        let rules = Rules::new().one_of(["red", "green"], "Only predefined tags are allowed");
        assert!(rules.check(&s("red")).ok());
        assert!(rules.check(&s("Red")).is_invalid());
    }
}
