//! Binding resolution from host attributes.

use crate::attrs::HostAttributes;
use crate::error::BindingError;

/// Server-entangled binding marker. Deferred unless the `.live` modifier is set.
pub const WIRE_MODEL: &str = "wire:model";

/// Client-local binding marker. Always propagates immediately.
pub const X_MODEL: &str = "x-model";

const LIVE_MODIFIER: &str = "live";

/// How local mutations reach the external owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Every `set` is written immediately.
    Live,
    /// Writes are held until the next sync point (blur, commit).
    #[default]
    Deferred,
}

/// Declared connection between a widget's local state and an external value.
///
/// Resolved once at mount and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    property: Option<String>,
    marker: Option<String>,
    mode: SyncMode,
}

impl Binding {
    /// A binding that is not present. Local state is the sole source of truth.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// A binding to `property` with the given sync mode.
    pub fn new(property: impl Into<String>, mode: SyncMode) -> Self {
        Self {
            property: Some(property.into()),
            marker: None,
            mode,
        }
    }

    /// Shorthand for a live binding.
    pub fn live(property: impl Into<String>) -> Self {
        Self::new(property, SyncMode::Live)
    }

    /// Shorthand for a deferred binding.
    pub fn deferred(property: impl Into<String>) -> Self {
        Self::new(property, SyncMode::Deferred)
    }

    /// Resolve the binding from declared attributes.
    ///
    /// The first recognized marker in declaration order wins. Any further
    /// markers are ignored with a warning.
    pub fn resolve(attrs: &HostAttributes) -> Self {
        let mut markers = markers(attrs);
        let Some((key, value)) = markers.next() else {
            return Self::unbound();
        };

        let ignored: Vec<&str> = markers.map(|(k, _)| k).collect();
        if !ignored.is_empty() {
            log::warn!(
                "Multiple model bindings declared; using '{}', ignoring {:?}",
                key,
                ignored
            );
        }

        Self::from_marker(key, value)
    }

    /// Resolve the binding, rejecting hosts that declare more than one marker
    /// or a marker without a property.
    pub fn resolve_strict(attrs: &HostAttributes) -> Result<Self, BindingError> {
        let found: Vec<(&str, &str)> = markers(attrs).collect();
        match found.as_slice() {
            [] => Ok(Self::unbound()),
            [(key, value)] => {
                if value.trim().is_empty() {
                    return Err(BindingError::EmptyProperty {
                        marker: key.to_string(),
                    });
                }
                Ok(Self::from_marker(key, value))
            }
            [(first, _), rest @ ..] => Err(BindingError::conflicting(
                *first,
                rest.iter().map(|(k, _)| k.to_string()).collect(),
            )),
        }
    }

    fn from_marker(key: &str, value: &str) -> Self {
        let property = value.trim();
        if property.is_empty() {
            log::warn!("Binding marker '{}' has no property; treating as unbound", key);
            return Self::unbound();
        }

        let mode = if key.starts_with(X_MODEL) || has_modifier(key, LIVE_MODIFIER) {
            SyncMode::Live
        } else {
            SyncMode::Deferred
        };

        Self {
            property: Some(property.to_string()),
            marker: Some(key.to_string()),
            mode,
        }
    }

    /// Whether the widget is bound to an external property.
    pub fn is_present(&self) -> bool {
        self.property.is_some()
    }

    /// Whether every mutation propagates immediately.
    pub fn is_live(&self) -> bool {
        self.is_present() && self.mode == SyncMode::Live
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Name of the bound property.
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Attribute that produced this binding, if resolved from attributes.
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}

fn markers(attrs: &HostAttributes) -> impl Iterator<Item = (&str, &str)> {
    attrs
        .iter()
        .filter(|(k, _)| k.starts_with(WIRE_MODEL) || k.starts_with(X_MODEL))
}

fn has_modifier(key: &str, modifier: &str) -> bool {
    key.split('.').skip(1).any(|m| m == modifier)
}
