//! Fetch retry configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Retry settings for failed fetches within a cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per fetch (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay between attempts (default: 60s).
    #[serde(default = "default_delay", with = "duration")]
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: default_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay() -> Duration {
    Duration::from_secs(60)
}
