//! Check scheduling configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Inter-cycle scheduling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Base interval between check cycles (default: 3h).
    #[serde(default = "default_check_interval", with = "duration")]
    pub check_interval: Duration,
    /// Random variation applied to the interval, as a percentage of it.
    #[serde(default = "default_jitter_percent")]
    pub jitter_percent: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            jitter_percent: default_jitter_percent(),
        }
    }
}

fn default_check_interval() -> Duration {
    Duration::from_secs(3 * 3600)
}

fn default_jitter_percent() -> f64 {
    20.0
}
