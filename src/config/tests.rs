//! Tests for config module.

use super::*;
use std::time::Duration;

// ==================== Duration parsing tests ====================

#[test]
fn test_parse_duration_seconds() {
    let d = duration::parse_duration("30s").unwrap();
    assert_eq!(d, Duration::from_secs(30));
}

#[test]
fn test_parse_duration_minutes() {
    let d = duration::parse_duration("5m").unwrap();
    assert_eq!(d, Duration::from_secs(300));
}

#[test]
fn test_parse_duration_hours() {
    let d = duration::parse_duration("3h").unwrap();
    assert_eq!(d, Duration::from_secs(10800));
}

#[test]
fn test_parse_duration_days() {
    let d = duration::parse_duration("2d").unwrap();
    assert_eq!(d, Duration::from_secs(172800));
}

#[test]
fn test_parse_duration_milliseconds() {
    let d = duration::parse_duration("100ms").unwrap();
    assert_eq!(d, Duration::from_millis(100));
}

#[test]
fn test_parse_duration_empty() {
    let d = duration::parse_duration("").unwrap();
    assert_eq!(d, Duration::ZERO);
}

#[test]
fn test_parse_duration_invalid_unit() {
    let result = duration::parse_duration("10x");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("unknown duration unit"));
}

#[test]
fn test_parse_duration_fractional() {
    let d = duration::parse_duration("1.5h").unwrap();
    assert_eq!(d, Duration::from_secs(5400));
}

#[test]
fn test_parse_duration_bare_number_is_seconds() {
    let d = duration::parse_duration("45").unwrap();
    assert_eq!(d, Duration::from_secs(45));
}

#[test]
fn test_parse_duration_negative_rejected() {
    let result = duration::parse_duration("-5s");
    assert!(result.is_err());
}

// ==================== YAML field loading tests ====================

/// Parse config from YAML string (for testing).
fn from_yaml(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

fn minimal_valid_yaml() -> String {
    r#"
app:
  name: testwatch
"#
    .to_string()
}

#[test]
fn test_load_minimal_config_uses_defaults() {
    let config = from_yaml(&minimal_valid_yaml()).unwrap();

    assert_eq!(config.app.name, "testwatch");
    assert_eq!(config.app.env, "development");
    assert_eq!(config.checker.method, FetchMethod::Http);
    assert!(config.checker.headless);
    assert_eq!(config.checker.months_ahead, 6);
    assert_eq!(config.checker.adults, 1);
    assert_eq!(config.checker.children, 0);
    assert!(config.checker.check_friday_saturday);
    assert!(config.checker.check_saturday_sunday);
    assert_eq!(config.schedule.check_interval, Duration::from_secs(10800));
    assert_eq!(config.schedule.jitter_percent, 20.0);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.delay, Duration::from_secs(60));
    assert!(!config.email.enabled);
    assert_eq!(config.email.smtp_port, 587);
    assert!(config.storage.enabled);
    assert_eq!(config.storage.path, "last_results.json");
}

#[test]
fn test_load_checker_fields() {
    let yaml = r#"
app:
  name: testwatch

checker:
  method: browser
  headless: false
  browser_path: /usr/bin/chromium
  months_ahead: 2
  adults: 2
  children: 1
  check_saturday_sunday: false
  screenshot_dir: shots
"#;
    let config = from_yaml(yaml).unwrap();

    assert_eq!(config.checker.method, FetchMethod::Browser);
    assert!(!config.checker.headless);
    assert_eq!(config.checker.browser_path.as_deref(), Some("/usr/bin/chromium"));
    assert_eq!(config.checker.months_ahead, 2);
    assert_eq!(config.checker.adults, 2);
    assert_eq!(config.checker.children, 1);
    assert!(config.checker.check_friday_saturday);
    assert!(!config.checker.check_saturday_sunday);
    assert_eq!(config.checker.screenshot_dir.as_deref(), Some("shots"));
}

#[test]
fn test_load_schedule_and_retry_fields() {
    let yaml = r#"
app:
  name: testwatch

schedule:
  check_interval: 90m
  jitter_percent: 10

retry:
  max_attempts: 5
  delay: 30s
"#;
    let config = from_yaml(yaml).unwrap();

    assert_eq!(config.schedule.check_interval, Duration::from_secs(5400));
    assert_eq!(config.schedule.jitter_percent, 10.0);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.delay, Duration::from_secs(30));
}

#[test]
fn test_load_email_fields() {
    let yaml = r#"
app:
  name: testwatch

email:
  enabled: true
  smtp_server: mail.example.org
  smtp_port: 2525
  from_address: watcher@example.org
  to_address: me@example.org
  notify_errors: true
"#;
    let config = from_yaml(yaml).unwrap();

    assert!(config.email.enabled);
    assert_eq!(config.email.smtp_server, "mail.example.org");
    assert_eq!(config.email.smtp_port, 2525);
    assert_eq!(config.email.from_address, "watcher@example.org");
    assert_eq!(config.email.to_address, "me@example.org");
    assert!(config.email.notify_errors);
    // Credentials never come from the file
    assert!(config.email.username.is_empty());
    assert!(config.email.password.is_empty());
}

#[test]
fn test_invalid_method_rejected() {
    let yaml = r#"
app:
  name: testwatch

checker:
  method: selenium
"#;
    assert!(from_yaml(yaml).is_err());
}

// ==================== Validation tests ====================

#[test]
fn test_validate_empty_name() {
    let yaml = r#"
app:
  name: ""
"#;
    let config = from_yaml(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("app.name"));
}

#[test]
fn test_validate_zero_months_ahead() {
    let yaml = r#"
app:
  name: testwatch

checker:
  months_ahead: 0
"#;
    let config = from_yaml(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("months_ahead"));
}

#[test]
fn test_validate_no_pair_kind_enabled() {
    let yaml = r#"
app:
  name: testwatch

checker:
  check_friday_saturday: false
  check_saturday_sunday: false
"#;
    let config = from_yaml(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("weekend pair"));
}

#[test]
fn test_validate_jitter_out_of_range() {
    let yaml = r#"
app:
  name: testwatch

schedule:
  jitter_percent: 150
"#;
    let config = from_yaml(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("jitter_percent"));
}

#[test]
fn test_validate_zero_retry_attempts() {
    let yaml = r#"
app:
  name: testwatch

retry:
  max_attempts: 0
"#;
    let config = from_yaml(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("max_attempts"));
}

#[test]
fn test_validate_missing_credentials_in_production() {
    let yaml = r#"
app:
  name: testwatch
  env: production

email:
  enabled: true
"#;
    let config = from_yaml(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("SMTP_USERNAME"));
}

#[test]
fn test_validate_missing_credentials_ok_in_development() {
    let yaml = r#"
app:
  name: testwatch

email:
  enabled: true
"#;
    let config = from_yaml(yaml).unwrap();
    assert!(config.validate().is_ok());
}

// ==================== File loading tests ====================

#[test]
fn test_load_missing_file_fails() {
    let result = Config::load("/nonexistent/config.yaml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_load_or_init_creates_default_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configs/config.yaml");
    let path_str = path.to_str().unwrap();

    let (config, created) = Config::load_or_init(path_str).unwrap();
    assert!(created);
    assert!(path.exists());
    assert_eq!(config.app.name, "lodgewatch");
    assert_eq!(config.checker.method, FetchMethod::Http);
    assert!(!config.email.enabled);

    // Second load finds the file in place
    let (_, created) = Config::load_or_init(path_str).unwrap();
    assert!(!created);
}

#[test]
fn test_load_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, minimal_valid_yaml()).unwrap();

    let (config, created) = Config::load_or_init(path.to_str().unwrap()).unwrap();
    assert!(!created);
    assert_eq!(config.app.name, "testwatch");
}
