//! Widget configuration.
//!
//! Every widget has a typed config struct with documented defaults and builder
//! methods. Configs can also be built from a JSON option bag using the
//! component prop names (`maxTags`, `minRows`, ...); unknown keys are rejected.

use entangle::ConfigError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Shared behavior of widget configuration structs.
pub trait WidgetConfig: Sized + Default + DeserializeOwned {
    /// Check cross-field constraints.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Build from a JSON option bag, rejecting unknown keys.
    fn from_json(value: Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from a JSON string.
    fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
