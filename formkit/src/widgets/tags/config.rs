//! Tags input configuration.

use entangle::{Bounds, ConfigError, ListMessages, Rules, Uniqueness};
use regex::Regex;
use serde::Deserialize;

use crate::config::WidgetConfig;

/// Sort order applied to tags when sorting is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub(crate) fn sort(self, tags: &mut [String]) {
        tags.sort_by(|a, b| {
            let ord = a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b));
            match self {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
}

/// Tags input configuration.
///
/// # Example
///
/// ```ignore
/// let config = TagsConfig::new()
///     .max_tags(5)
///     .allowed_chars("^[a-z0-9-]+$")
///     .suggestions(["rust", "wasm", "tokio"]);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct TagsConfig {
    pub placeholder: String,
    pub max_tags: Option<usize>,
    pub min_tag_length: usize,
    pub max_tag_length: usize,
    pub allow_duplicates: bool,
    /// Regex every tag must match (searched, not anchored).
    pub allowed_chars: Option<String>,
    /// Tags rejected case-insensitively.
    pub blocked_words: Vec<String>,
    /// Characters that commit the text typed before them.
    pub split_keys: Vec<char>,
    pub create_on_blur: bool,
    pub create_on_paste: bool,
    pub trim_whitespace: bool,
    pub show_counter: bool,
    pub show_clear_all: bool,
    pub empty_message: String,
    pub max_tags_message: String,
    pub duplicate_message: String,
    pub invalid_message: String,
    pub custom_message: String,
    pub aria_label: String,
    pub suggestions: Vec<String>,
    /// Accept tags that are not in `suggestions`.
    pub allow_custom: bool,
    pub sort_tags: bool,
    pub sort_direction: SortDirection,
    pub disabled: bool,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            placeholder: "Add tags...".to_string(),
            max_tags: None,
            min_tag_length: 1,
            max_tag_length: 50,
            allow_duplicates: false,
            allowed_chars: None,
            blocked_words: Vec::new(),
            split_keys: vec![' ', ',', ';'],
            create_on_blur: true,
            create_on_paste: true,
            trim_whitespace: true,
            show_counter: true,
            show_clear_all: true,
            empty_message: "No tags added".to_string(),
            max_tags_message: "Maximum tags reached".to_string(),
            duplicate_message: "Tag already exists".to_string(),
            invalid_message: "Invalid tag format".to_string(),
            custom_message: "Only predefined tags are allowed".to_string(),
            aria_label: "Tags input".to_string(),
            suggestions: Vec::new(),
            allow_custom: true,
            sort_tags: false,
            sort_direction: SortDirection::Asc,
            disabled: false,
        }
    }
}

impl TagsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn max_tags(mut self, max: usize) -> Self {
        self.max_tags = Some(max);
        self
    }

    pub fn tag_length(mut self, min: usize, max: usize) -> Self {
        self.min_tag_length = min;
        self.max_tag_length = max;
        self
    }

    pub fn allow_duplicates(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }

    pub fn allowed_chars(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_chars = Some(pattern.into());
        self
    }

    pub fn blocked_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn split_keys(mut self, keys: impl IntoIterator<Item = char>) -> Self {
        self.split_keys = keys.into_iter().collect();
        self
    }

    pub fn create_on_blur(mut self, enabled: bool) -> Self {
        self.create_on_blur = enabled;
        self
    }

    pub fn create_on_paste(mut self, enabled: bool) -> Self {
        self.create_on_paste = enabled;
        self
    }

    pub fn suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    /// Only accept tags listed in `suggestions`.
    pub fn predefined_only(mut self) -> Self {
        self.allow_custom = false;
        self
    }

    pub fn sorted(mut self, direction: SortDirection) -> Self {
        self.sort_tags = true;
        self.sort_direction = direction;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Capacity bound. A zero maximum means no limit.
    pub(crate) fn bounds(&self) -> Bounds {
        match self.max_tags {
            Some(max) if max > 0 => Bounds::at_most(max),
            _ => Bounds::unbounded(),
        }
    }

    pub(crate) fn uniqueness(&self) -> Uniqueness<String> {
        if self.allow_duplicates {
            Uniqueness::Allow
        } else {
            Uniqueness::case_insensitive()
        }
    }

    pub(crate) fn list_messages(&self) -> ListMessages {
        ListMessages {
            max_reached: self.max_tags_message.clone(),
            duplicate: self.duplicate_message.clone(),
            ..Default::default()
        }
    }

    /// Shape rules. Every failure reports the invalid-format message.
    pub(crate) fn rules(&self) -> Result<Rules<String>, ConfigError> {
        let mut rules = Rules::new().length(
            self.min_tag_length,
            self.max_tag_length,
            self.invalid_message.clone(),
        );
        if let Some(pattern) = &self.allowed_chars {
            rules = rules.pattern(pattern, self.invalid_message.clone())?;
        }
        if !self.blocked_words.is_empty() {
            rules = rules.blocked(&self.blocked_words, self.invalid_message.clone());
        }
        Ok(rules)
    }
}

impl WidgetConfig for TagsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_tag_length > self.max_tag_length {
            return Err(ConfigError::Bounds {
                field: "tagLength",
                min: self.min_tag_length,
                max: self.max_tag_length,
            });
        }
        if let Some(pattern) = &self.allowed_chars {
            Regex::new(pattern).map_err(|e| ConfigError::pattern(pattern.as_str(), e))?;
        }
        Ok(())
    }
}
