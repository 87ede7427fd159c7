//! Lightweight HTTP fetch strategy.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue};
use tracing::{debug, info, warn};

use super::{FetchError, Fetcher, Result, booking_url, markup};
use crate::config::{CheckerConfig, SiteConfig};
use crate::domain::DayAvailability;

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-like user agent for the probe session.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Bounds of the randomized delay between per-day probes, in seconds.
const PROBE_DELAY_SECS: (f64, f64) = (2.0, 5.0);

/// HTTP fetch strategy: plain requests against the stay query URL, with a
/// cookie jar warmed up on the accommodation page.
pub struct HttpFetcher {
    client: Client,
    site: SiteConfig,
    checker: CheckerConfig,
}

impl HttpFetcher {
    /// Creates a new HTTP fetcher.
    pub fn new(site: SiteConfig, checker: CheckerConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .expect("failed to build http client");

        Self {
            client,
            site,
            checker,
        }
    }

    /// Fetches the booking widget configuration served as JSONP.
    async fn widget_config(&self) -> Result<serde_json::Value> {
        let timestamp = Utc::now().timestamp_millis();
        let url = format!(
            "{}?callback=jQuery_callback&_={}",
            self.site.widget_config_url, timestamp
        );

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let re = Regex::new(r"(?s)jQuery_callback\((.*)\)").expect("static regex");
        let json = re
            .captures(&body)
            .and_then(|c| c.get(1))
            .ok_or_else(|| FetchError::WidgetConfig("no JSONP payload in response".into()))?;

        serde_json::from_str(json.as_str()).map_err(|e| FetchError::WidgetConfig(e.to_string()))
    }

    async fn probe_day(&self, day: NaiveDate) -> Result<bool> {
        let url = booking_url(
            &self.site.base_url,
            day,
            self.checker.adults,
            self.checker.children,
        );
        debug!(check_in = %day, url = %url, "probing stay");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if body.trim().is_empty() {
            return Err(FetchError::Markup("empty response body".into()));
        }

        Ok(markup::page_indicates_availability(&body))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    /// Visits the accommodation page to pick up session cookies, then
    /// pulls the widget configuration. The latter is best-effort.
    async fn prepare(&self) -> Result<()> {
        self.client
            .get(&self.site.base_url)
            .send()
            .await?
            .error_for_status()?;

        match self.widget_config().await {
            Ok(config) => {
                let keys = config.as_object().map(|o| o.len()).unwrap_or(0);
                debug!(keys, "widget config received");
            }
            Err(e) => warn!(error = %e, "widget config fetch failed"),
        }

        Ok(())
    }

    async fn fetch_days(&self, days: &[NaiveDate]) -> Result<Vec<DayAvailability>> {
        let mut out = Vec::with_capacity(days.len());

        for (i, day) in days.iter().enumerate() {
            let bookable = self.probe_day(*day).await?;
            if bookable {
                info!(check_in = %day, "availability found");
            } else {
                debug!(check_in = %day, "no availability");
            }
            out.push(DayAvailability::new(*day, bookable));

            if i + 1 < days.len() {
                tokio::time::sleep(probe_delay()).await;
            }
        }

        Ok(out)
    }
}

fn probe_delay() -> Duration {
    let secs = rand::thread_rng().gen_range(PROBE_DELAY_SECS.0..=PROBE_DELAY_SECS.1);
    Duration::from_secs_f64(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_delay_within_bounds() {
        for _ in 0..100 {
            let d = probe_delay();
            assert!(d >= Duration::from_secs_f64(PROBE_DELAY_SECS.0));
            assert!(d <= Duration::from_secs_f64(PROBE_DELAY_SECS.1));
        }
    }

    #[test]
    fn test_jsonp_payload_extraction() {
        let body = r#"jQuery_callback({"properties": [{"name": "Valley Lodge"}]})"#;
        let re = Regex::new(r"(?s)jQuery_callback\((.*)\)").unwrap();
        let json = re.captures(body).and_then(|c| c.get(1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(json.as_str()).unwrap();
        assert_eq!(value["properties"][0]["name"], "Valley Lodge");
    }
}
