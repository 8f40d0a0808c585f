//! Rendering collaborators.
//!
//! Markup is produced by the embedder. Widgets only need two helpers from it:
//! conditional class composition and symbolic icon resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Join the class strings whose condition is true.
///
/// ```ignore
/// let classes = class_names(&[("btn", true), ("btn-active", is_open), ("", true)]);
/// ```
pub fn class_names(parts: &[(&str, bool)]) -> String {
    parts
        .iter()
        .filter(|(class, enabled)| *enabled && !class.trim().is_empty())
        .map(|(class, _)| class.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visual variant of an icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconVariant {
    #[default]
    Outline,
    Solid,
    Mini,
    Micro,
}

/// Resolves a symbolic icon name into renderable markup.
pub trait IconSet: Send + Sync {
    fn resolve(&self, name: &str, variant: IconVariant) -> Option<String>;
}

/// Page-global, read-only icon registry.
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    icons: HashMap<(String, IconVariant), String>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register markup for `name` in `variant` (builder style).
    pub fn with(
        mut self,
        name: impl Into<String>,
        variant: IconVariant,
        markup: impl Into<String>,
    ) -> Self {
        self.icons.insert((name.into(), variant), markup.into());
        self
    }
}

impl IconSet for IconRegistry {
    /// Exact variant first, then the outline variant.
    fn resolve(&self, name: &str, variant: IconVariant) -> Option<String> {
        self.icons
            .get(&(name.to_string(), variant))
            .or_else(|| self.icons.get(&(name.to_string(), IconVariant::Outline)))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_keeps_true_conditions() {
        let open = true;
        let disabled = false;
        assert_eq!(
            class_names(&[("select", true), ("is-open", open), ("opacity-50", disabled)]),
            "select is-open"
        );
    }

    #[test]
    fn test_class_names_skips_blank() {
        assert_eq!(class_names(&[("  ", true), (" a ", true)]), "a");
    }

    #[test]
    fn test_icon_registry_falls_back_to_outline() {
        let icons = IconRegistry::new().with("check", IconVariant::Outline, "<svg/>");
        assert_eq!(icons.resolve("check", IconVariant::Mini).as_deref(), Some("<svg/>"));
        assert_eq!(icons.resolve("trash", IconVariant::Outline), None);
    }
}
