//! Attributes declared on a widget's host element.

/// Attribute names forwarded verbatim to the rendered native control.
const PASS_THROUGH: &[&str] = &[
    "disabled",
    "name",
    "placeholder",
    "id",
    "required",
    "autocomplete",
];

/// Ordered attribute list of a host element.
///
/// Declaration order is preserved; binding resolution depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAttributes {
    entries: Vec<(String, String)>,
}

impl HostAttributes {
    /// Create an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append an attribute.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Value of the first attribute with exactly this name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute with this name is declared.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Attributes whose name starts with `prefix`, in declaration order.
    pub fn starting_with<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter().filter(move |(k, _)| k.starts_with(prefix))
    }

    /// All attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Default form field name: the property of the first `wire:model`
    /// marker, else of the first `x-model` marker.
    pub fn model_name(&self) -> Option<&str> {
        self.starting_with("wire:model")
            .next()
            .or_else(|| self.starting_with("x-model").next())
            .map(|(_, v)| v)
    }

    /// Generic attributes forwarded to the rendered control for native form
    /// semantics (`disabled`, `name`, `placeholder`, `aria-*`, ...).
    pub fn pass_through(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|(k, _)| PASS_THROUGH.contains(&k.as_str()) || k.starts_with("aria-"))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HostAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_prefers_wire_model() {
        let attrs = HostAttributes::new()
            .with("x-model", "local")
            .with("wire:model.live", "remote");
        assert_eq!(attrs.model_name(), Some("remote"));
    }

    #[test]
    fn test_model_name_falls_back_to_x_model() {
        let attrs = HostAttributes::new().with("class", "w-full").with("x-model", "tags");
        assert_eq!(attrs.model_name(), Some("tags"));
    }

    #[test]
    fn test_pass_through_keeps_form_attributes_only() {
        let attrs: HostAttributes = [
            ("class", "rounded"),
            ("disabled", ""),
            ("aria-label", "Tags"),
            ("wire:model", "tags"),
            ("placeholder", "Add tags..."),
        ]
        .into_iter()
        .collect();

        let forwarded = attrs.pass_through();
        let keys: Vec<&str> = forwarded.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["disabled", "aria-label", "placeholder"]);
    }
}
