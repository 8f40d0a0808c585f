//! Key-value editor configuration.

use entangle::{Bounds, ConfigError, ListMessages};
use serde::Deserialize;

use crate::config::WidgetConfig;

/// Key-value editor configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct KeyValueConfig {
    pub label: Option<String>,
    pub key_label: String,
    pub value_label: String,
    /// Rows always present; mount pads up to this many.
    pub min_rows: usize,
    /// Upper bound on rows. `None` or zero means unbounded.
    pub max_rows: Option<usize>,
    pub required: bool,
    pub disabled: bool,
    /// Allow keyed rows with a blank value.
    pub allow_empty_values: bool,
    /// Report duplicate (trimmed, case-sensitive) keys.
    pub prevent_duplicate_keys: bool,
    pub key_placeholder: String,
    pub value_placeholder: String,
    pub add_button_text: String,
    pub show_duplicate: bool,
    pub show_top_bar: bool,
    /// Enable drag reordering.
    pub reorderable: bool,
}

impl Default for KeyValueConfig {
    fn default() -> Self {
        Self {
            label: None,
            key_label: "Key".to_string(),
            value_label: "Value".to_string(),
            min_rows: 1,
            max_rows: None,
            required: false,
            disabled: false,
            allow_empty_values: true,
            prevent_duplicate_keys: true,
            key_placeholder: "Enter key...".to_string(),
            value_placeholder: "Enter value...".to_string(),
            add_button_text: "Add Row".to_string(),
            show_duplicate: true,
            show_top_bar: true,
            reorderable: false,
        }
    }
}

impl KeyValueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_rows(mut self, min: usize) -> Self {
        self.min_rows = min;
        self
    }

    pub fn max_rows(mut self, max: usize) -> Self {
        self.max_rows = Some(max);
        self
    }

    pub fn disallow_empty_values(mut self) -> Self {
        self.allow_empty_values = false;
        self
    }

    pub fn allow_duplicate_keys(mut self) -> Self {
        self.prevent_duplicate_keys = false;
        self
    }

    pub fn reorderable(mut self) -> Self {
        self.reorderable = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    fn effective_max(&self) -> Option<usize> {
        self.max_rows.filter(|max| *max > 0)
    }

    pub(crate) fn bounds(&self) -> Result<Bounds, ConfigError> {
        Bounds::new(self.min_rows, self.effective_max()).map_err(|_| ConfigError::Bounds {
            field: "rows",
            min: self.min_rows,
            max: self.effective_max().unwrap_or_default(),
        })
    }

    pub(crate) fn list_messages(&self) -> ListMessages {
        ListMessages {
            max_reached: format!(
                "Maximum of {} rows allowed.",
                self.effective_max().unwrap_or_default()
            ),
            min_reached: format!("Minimum of {} row(s) required.", self.min_rows),
            ..Default::default()
        }
    }

    /// `"Min: 1 | Max: 5"`, shown when a maximum is set or more than one row
    /// is required.
    pub fn limits_hint(&self) -> Option<String> {
        match self.effective_max() {
            Some(max) => Some(format!("Min: {} | Max: {}", self.min_rows, max)),
            None if self.min_rows > 1 => Some(format!("Min: {}", self.min_rows)),
            None => None,
        }
    }
}

impl WidgetConfig for KeyValueConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.bounds().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeyValueConfig::default();
        assert_eq!(config.min_rows, 1);
        assert_eq!(config.max_rows, None);
        assert!(config.allow_empty_values);
        assert!(config.prevent_duplicate_keys);
        assert!(!config.reorderable);
    }

    #[test]
    fn test_messages() {
        let messages = KeyValueConfig::new().min_rows(2).max_rows(4).list_messages();
        assert_eq!(messages.max_reached, "Maximum of 4 rows allowed.");
        assert_eq!(messages.min_reached, "Minimum of 2 row(s) required.");
    }

    #[test]
    fn test_inverted_rows_rejected() {
        let err = KeyValueConfig::from_json(json!({ "minRows": 3, "maxRows": 2 })).unwrap_err();
        assert!(matches!(err, ConfigError::Bounds { field: "rows", .. }));
    }

    #[test]
    fn test_limits_hint() {
        assert_eq!(KeyValueConfig::new().limits_hint(), None);
        assert_eq!(
            KeyValueConfig::new().max_rows(3).limits_hint().as_deref(),
            Some("Min: 1 | Max: 3")
        );
        assert_eq!(KeyValueConfig::new().min_rows(2).limits_hint().as_deref(), Some("Min: 2"));
    }
}
