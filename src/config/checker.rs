//! Availability checker configuration.

use serde::Deserialize;
use std::fmt;

/// Strategy used to probe the booking site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Plain HTTP requests plus markup heuristics.
    Http,
    /// Headless Chrome rendering the calendar UI.
    Browser,
}

impl Default for FetchMethod {
    fn default() -> Self {
        FetchMethod::Http
    }
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMethod::Http => write!(f, "http"),
            FetchMethod::Browser => write!(f, "browser"),
        }
    }
}

/// Settings for the availability checker.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    /// Fetch strategy: "http" or "browser".
    #[serde(default)]
    pub method: FetchMethod,
    /// Run the browser without a visible display surface.
    #[serde(default = "default_true")]
    pub headless: bool,
    /// Path to a Chrome/Chromium executable. Auto-detected when unset.
    pub browser_path: Option<String>,
    /// How many months into the future to scan.
    #[serde(default = "default_months_ahead")]
    pub months_ahead: u32,
    /// Number of adults in the stay query.
    #[serde(default = "default_adults")]
    pub adults: u32,
    /// Number of children in the stay query.
    #[serde(default)]
    pub children: u32,
    /// Report Friday-into-Saturday weekend pairs.
    #[serde(default = "default_true")]
    pub check_friday_saturday: bool,
    /// Report Saturday-into-Sunday weekend pairs.
    #[serde(default = "default_true")]
    pub check_saturday_sunday: bool,
    /// Directory for screenshot artifacts (browser strategy only).
    pub screenshot_dir: Option<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            method: FetchMethod::default(),
            headless: true,
            browser_path: None,
            months_ahead: default_months_ahead(),
            adults: default_adults(),
            children: 0,
            check_friday_saturday: true,
            check_saturday_sunday: true,
            screenshot_dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_months_ahead() -> u32 {
    6
}

fn default_adults() -> u32 {
    1
}
