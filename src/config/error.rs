//! Configuration error types.

use thiserror::Error;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read, or the default template could
    /// not be written.
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid YAML for the expected shape.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Structurally valid but semantically broken settings.
    #[error("validation failed: {0}")]
    Validation(String),
}
