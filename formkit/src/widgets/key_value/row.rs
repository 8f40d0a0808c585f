use serde::{Deserialize, Deserializer, Serialize};

/// One key-value pair. Missing or `null` fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
}

impl Row {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub(crate) fn trimmed_key(&self) -> &str {
        self.key.trim()
    }

    /// A keyed row whose value is blank.
    pub(crate) fn has_empty_value(&self) -> bool {
        !self.trimmed_key().is_empty() && self.value.trim().is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
