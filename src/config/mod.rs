//! Configuration loading and validation for the availability watcher.
//!
//! Uses serde_yaml to load YAML configuration files with support for
//! environment variable overrides for SMTP credentials. A missing config
//! file is not an error: a commented default template is written to the
//! requested path first, so the user has something to edit.

mod app;
mod checker;
mod duration;
mod email;
mod error;
mod retry;
mod schedule;
mod site;
mod storage;

pub use app::AppConfig;
pub use checker::{CheckerConfig, FetchMethod};
pub use email::EmailConfig;
pub use error::ConfigError;
pub use retry::RetryConfig;
pub use schedule::ScheduleConfig;
pub use site::SiteConfig;
pub use storage::StorageConfig;

use serde::Deserialize;
use std::{env, fs, path::Path};

/// Default configuration template written when the config file is missing.
/// SMTP credentials never live in the file; they come from the environment.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"app:
  name: lodgewatch
  env: development
  log_level: info

checker:
  method: http            # http | browser
  headless: true
  months_ahead: 6
  adults: 1
  children: 0
  check_friday_saturday: true
  check_saturday_sunday: true
  # screenshot_dir: screenshots

site:
  base_url: "https://reservations.ahlsmsworld.com/Yosemite/Plan-Your-Trip/Accommodations/Yosemite-Valley-Lodge/"
  widget_config_url: "https://reservations.ahlsmsworld.com/Yosemite/Search/GetWidgetConfigData"

schedule:
  check_interval: 3h
  jitter_percent: 20

retry:
  max_attempts: 3
  delay: 60s

# Credentials come from SMTP_USERNAME / SMTP_PASSWORD (a .env file works).
email:
  enabled: false
  smtp_server: smtp.gmail.com
  smtp_port: 587
  from_address: ""
  to_address: ""

storage:
  enabled: true
  path: last_results.json
"#;

/// Root configuration structure for the availability watcher.
///
/// Required section: app. All other sections fall back to their defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Fetch strategy and stay parameters.
    #[serde(default)]
    pub checker: CheckerConfig,
    /// Booking site endpoints.
    #[serde(default)]
    pub site: SiteConfig,
    /// Inter-cycle scheduling.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Fetch retry behavior within a cycle.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Email notification settings.
    #[serde(default)]
    pub email: EmailConfig,
    /// Last-results snapshot persistence.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` file (if exists),
    /// then loads YAML config and credentials from environment variables:
    /// `SMTP_USERNAME`, `SMTP_PASSWORD`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.load_credentials_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration, writing the default template first when the
    /// file does not exist. Returns the config and whether it was created.
    pub fn load_or_init(path: &str) -> Result<(Self, bool), ConfigError> {
        let created = if Path::new(path).exists() {
            false
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
            true
        };

        Ok((Self::load(path)?, created))
    }

    /// Load SMTP credentials from environment variables.
    fn load_credentials_from_env(&mut self) {
        if self.email.enabled {
            self.email.username = env::var("SMTP_USERNAME").unwrap_or_default();
            self.email.password = env::var("SMTP_PASSWORD").unwrap_or_default();
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.checker.months_ahead == 0 {
            return Err(ConfigError::Validation(
                "checker.months_ahead must be at least 1".into(),
            ));
        }

        if self.checker.adults == 0 {
            return Err(ConfigError::Validation(
                "checker.adults must be at least 1".into(),
            ));
        }

        if !self.checker.check_friday_saturday && !self.checker.check_saturday_sunday {
            return Err(ConfigError::Validation(
                "at least one weekend pair kind must be enabled".into(),
            ));
        }

        if self.site.base_url.is_empty() {
            return Err(ConfigError::Validation("site.base_url is required".into()));
        }

        if !(0.0..=100.0).contains(&self.schedule.jitter_percent) {
            return Err(ConfigError::Validation(
                "schedule.jitter_percent must be between 0 and 100".into(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "retry.max_attempts must be at least 1".into(),
            ));
        }

        // Only require credentials outside development
        let is_production = self.app.env != "development";
        if self.email.enabled
            && is_production
            && (self.email.username.is_empty() || self.email.password.is_empty())
        {
            return Err(ConfigError::Validation(
                "email credentials not found (set SMTP_USERNAME and SMTP_PASSWORD env vars)"
                    .into(),
            ));
        }

        if self.storage.enabled && self.storage.path.is_empty() {
            return Err(ConfigError::Validation(
                "storage.path is required when storage is enabled".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
