//! Results snapshot storage configuration.

use serde::Deserialize;

/// Last-results persistence settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Whether the snapshot file is written and diffed against.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path to the snapshot file.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_path() -> String {
    "last_results.json".to_string()
}
