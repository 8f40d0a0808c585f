//! Error types

/// Errors raised while resolving a binding from host attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// More than one binding marker was declared on the same host element.
    #[error("Conflicting model bindings: '{first}' conflicts with {}", .others.join(", "))]
    ConflictingMarkers {
        /// The marker that would have won under declaration order.
        first: String,
        /// Every other marker found on the host.
        others: Vec<String>,
    },

    /// A binding marker was declared without a property name.
    #[error("Binding marker '{marker}' has no property name")]
    EmptyProperty { marker: String },
}

impl BindingError {
    /// Creates a new conflicting markers error.
    pub fn conflicting(first: impl Into<String>, others: Vec<String>) -> Self {
        Self::ConflictingMarkers {
            first: first.into(),
            others,
        }
    }
}

/// Errors raised while building a widget configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The option bag could not be parsed (unknown key, wrong type).
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A character-class pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Lower bound exceeds upper bound.
    #[error("Invalid bounds for {field}: min {min} exceeds max {max}")]
    Bounds {
        field: &'static str,
        min: usize,
        max: usize,
    },

    /// A numeric option is out of its allowed range.
    #[error("Invalid value for {field}: {reason}")]
    Value { field: &'static str, reason: String },
}

impl ConfigError {
    /// Creates a new pattern error.
    pub fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a new out-of-range value error.
    pub fn value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Value {
            field,
            reason: reason.into(),
        }
    }
}

/// Local state does not have the shape an operation requires.
///
/// Raised when, for example, a multi-select receives a scalar from its
/// external owner and is then asked to toggle membership. Callers log it and
/// skip the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Binding mismatch in {widget}: expected {expected}, found {found}")]
pub struct MismatchError {
    pub widget: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl MismatchError {
    /// Creates a new mismatch error.
    pub fn new(widget: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self {
            widget: widget.into(),
            expected,
            found,
        }
    }
}
