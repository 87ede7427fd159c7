//! Availability fetching strategies for the booking site.

mod browser;
mod http;
mod markup;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, warn};

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

use crate::config::{Config, FetchMethod, RetryConfig};
use crate::domain::{DayAvailability, months_in_horizon, weekend_days};

/// Fetch errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level request failure.
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not look like a results page.
    #[error("unexpected response shape: {0}")]
    Markup(String),

    /// Widget configuration endpoint returned garbage.
    #[error("widget config error: {0}")]
    WidgetConfig(String),

    /// Browser automation failure.
    #[error("automation error: {0}")]
    Automation(String),

    /// Screenshot capture or write failure.
    #[error("screenshot error: {0}")]
    Screenshot(String),
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Fetcher probes the booking site for per-day stay availability.
///
/// Both strategies normalize their output to the same [`DayAvailability`]
/// shape so downstream matching is strategy-agnostic.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Name returns the strategy identifier ("http", "browser").
    fn name(&self) -> &str;

    /// Prepare warms up whatever session state the strategy needs.
    /// Called once per cycle before any fetch.
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// FetchDays probes a one-night stay for each given check-in date and
    /// returns one entry per date, in input order.
    async fn fetch_days(&self, days: &[NaiveDate]) -> Result<Vec<DayAvailability>>;

    /// Screenshot returns the artifact captured during the last fetch,
    /// if the strategy produces one.
    fn screenshot(&self) -> Option<PathBuf> {
        None
    }
}

/// Factory to create the fetch strategy selected by configuration.
pub fn from_config(config: &Config) -> Box<dyn Fetcher> {
    match config.checker.method {
        FetchMethod::Http => Box::new(HttpFetcher::new(
            config.site.clone(),
            config.checker.clone(),
        )),
        FetchMethod::Browser => Box::new(BrowserFetcher::new(
            config.site.clone(),
            config.checker.clone(),
        )),
    }
}

/// Formats a date the way the booking endpoint expects it in query
/// parameters, e.g. "Apr+07%2C+2023".
pub fn format_date_param(date: NaiveDate) -> String {
    format!("{}+{:02}%2C+{}", date.format("%b"), date.day(), date.format("%Y"))
}

/// Builds the stay query URL for a one-night stay checking in on `check_in`.
pub fn booking_url(base_url: &str, check_in: NaiveDate, adults: u32, children: u32) -> String {
    let check_out = check_in + Days::new(1);
    format!(
        "{}?ArrivalDate={}&DepartureDate={}&Adults={}&Children={}",
        base_url,
        format_date_param(check_in),
        format_date_param(check_out),
        adults,
        children
    )
}

/// Probes every weekend day in the horizon, month by month.
///
/// Each per-month fetch is retried independently up to the configured
/// attempt count; a month that keeps failing fails the whole fetch so the
/// caller can abandon the cycle.
pub async fn fetch_horizon(
    fetcher: &dyn Fetcher,
    today: NaiveDate,
    months_ahead: u32,
    retry: &RetryConfig,
) -> Result<Vec<DayAvailability>> {
    prepare_with_retry(fetcher, retry).await?;

    let candidates = weekend_days(today, months_ahead);
    let mut all = Vec::with_capacity(candidates.len());

    for (year, month) in months_in_horizon(today, months_ahead) {
        let days: Vec<NaiveDate> = candidates
            .iter()
            .copied()
            .filter(|d| (d.year(), d.month()) == (year, month))
            .collect();
        if days.is_empty() {
            continue;
        }

        let mut attempt = 0;
        let fetched = loop {
            attempt += 1;
            match fetcher.fetch_days(&days).await {
                Ok(fetched) => break fetched,
                Err(e) if attempt < retry.max_attempts => {
                    warn!(year, month, attempt, error = %e, "month fetch failed, retrying");
                    sleep(retry.delay).await;
                }
                Err(e) => {
                    error!(year, month, attempts = attempt, error = %e, "month fetch failed, giving up");
                    return Err(e);
                }
            }
        };
        all.extend(fetched);
    }

    Ok(all)
}

async fn prepare_with_retry(fetcher: &dyn Fetcher, retry: &RetryConfig) -> Result<()> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match fetcher.prepare().await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retry.max_attempts => {
                warn!(attempt, error = %e, "fetcher preparation failed, retrying");
                sleep(retry.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn zero_delay_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    // ==================== URL formatting tests ====================

    #[test]
    fn test_format_date_param() {
        assert_eq!(format_date_param(date(2023, 4, 7)), "Apr+07%2C+2023");
    }

    #[test]
    fn test_format_date_param_double_digit_day() {
        assert_eq!(format_date_param(date(2025, 12, 19)), "Dec+19%2C+2025");
    }

    #[test]
    fn test_booking_url_one_night_stay() {
        let url = booking_url("https://lodge.example.org/rooms/", date(2023, 4, 7), 2, 1);
        assert_eq!(
            url,
            "https://lodge.example.org/rooms/?ArrivalDate=Apr+07%2C+2023\
             &DepartureDate=Apr+08%2C+2023&Adults=2&Children=1"
        );
    }

    #[test]
    fn test_booking_url_crosses_month_boundary() {
        let url = booking_url("https://lodge.example.org/", date(2025, 5, 31), 1, 0);
        assert!(url.contains("ArrivalDate=May+31%2C+2025"));
        assert!(url.contains("DepartureDate=Jun+01%2C+2025"));
    }

    // ==================== Horizon driver tests ====================

    struct CountingFetcher {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch_days(&self, days: &[NaiveDate]) -> Result<Vec<DayAvailability>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(days.iter().map(|d| DayAvailability::new(*d, false)).collect())
        }
    }

    struct FailingFetcher {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Fetcher for FailingFetcher {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_days(&self, _days: &[NaiveDate]) -> Result<Vec<DayAvailability>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Markup("boom".into()))
        }
    }

    #[tokio::test]
    async fn test_fetch_horizon_covers_every_weekend_day() {
        let fetcher = CountingFetcher {
            calls: AtomicU32::new(0),
        };
        let today = date(2025, 6, 2);

        let days = fetch_horizon(&fetcher, today, 2, &zero_delay_retry(3))
            .await
            .unwrap();

        assert_eq!(days.len(), weekend_days(today, 2).len());
        // One fetch per month that holds candidate days
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_horizon_gives_up_after_max_attempts() {
        let fetcher = FailingFetcher {
            calls: AtomicU32::new(0),
        };

        let result = fetch_horizon(&fetcher, date(2025, 6, 2), 1, &zero_delay_retry(3)).await;

        assert!(result.is_err());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_horizon_single_attempt_when_configured() {
        let fetcher = FailingFetcher {
            calls: AtomicU32::new(0),
        };

        let result = fetch_horizon(&fetcher, date(2025, 6, 2), 1, &zero_delay_retry(1)).await;

        assert!(result.is_err());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
