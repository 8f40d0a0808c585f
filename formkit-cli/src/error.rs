//! Error types

use std::path::PathBuf;

use entangle::{BindingError, ConfigError};

/// Errors surfaced by the scenario runner.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario: {0}")]
    Scenario(#[from] serde_json::Error),

    #[error("Step {index} is not a valid message: {source}")]
    Step {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("Failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
