//! Email notification configuration.

use serde::Deserialize;

/// SMTP notification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email notifications are active.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP submission host.
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    /// SMTP submission port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Account name (loaded from SMTP_USERNAME env var).
    #[serde(skip)]
    pub username: String,
    /// Account password (loaded from SMTP_PASSWORD env var).
    #[serde(skip)]
    pub password: String,
    /// Sender address. Falls back to the username when empty.
    #[serde(default)]
    pub from_address: String,
    /// Recipient address. Falls back to the username when empty.
    #[serde(default)]
    pub to_address: String,
    /// Subject used when consecutive weekend nights were found.
    #[serde(default = "default_consecutive_subject")]
    pub consecutive_subject: String,
    /// Subject used when only single weekend nights were found.
    #[serde(default = "default_single_day_subject")]
    pub single_day_subject: String,
    /// Also email fetch errors, not just availability.
    #[serde(default)]
    pub notify_errors: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            to_address: String::new(),
            consecutive_subject: default_consecutive_subject(),
            single_day_subject: default_single_day_subject(),
            notify_errors: false,
        }
    }
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_consecutive_subject() -> String {
    "Consecutive weekend nights available!".to_string()
}

fn default_single_day_subject() -> String {
    "Weekend night available".to_string()
}
