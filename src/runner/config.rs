//! Runner configuration.

use crate::config::Config;

/// Runner construction options.
pub struct RunnerConfig {
    /// Application configuration.
    pub config: Config,
    /// Application version.
    pub version: String,
}
