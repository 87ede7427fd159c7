//! Browser automation fetch strategy.
//!
//! Drives headless Chrome over CDP and feeds the rendered page through the
//! same markup heuristics as the HTTP strategy. The CDP client is
//! synchronous, so all driving happens on the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info, warn};

use super::{FetchError, Fetcher, Result, booking_url, markup};
use crate::config::{CheckerConfig, SiteConfig};
use crate::domain::DayAvailability;

/// Time allowed for client-side rendering after navigation settles.
const RENDER_DELAY: Duration = Duration::from_secs(2);

/// Viewport used for navigation and screenshots.
const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Browser fetch strategy: navigates the stay query URL in headless Chrome
/// and reads the rendered calendar results.
pub struct BrowserFetcher {
    site: SiteConfig,
    checker: CheckerConfig,
    screenshot: Mutex<Option<PathBuf>>,
}

impl BrowserFetcher {
    /// Creates a new browser fetcher. The browser itself launches lazily
    /// on the first fetch.
    pub fn new(site: SiteConfig, checker: CheckerConfig) -> Self {
        Self {
            site,
            checker,
            screenshot: Mutex::new(None),
        }
    }

    fn launch(checker: &CheckerConfig) -> Result<Browser> {
        let options = LaunchOptions::default_builder()
            .headless(checker.headless)
            .sandbox(false)
            .window_size(Some(WINDOW_SIZE))
            .path(checker.browser_path.clone().map(PathBuf::from))
            .build()
            .map_err(|e| FetchError::Automation(e.to_string()))?;

        Browser::new(options).map_err(|e| FetchError::Automation(e.to_string()))
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    fn name(&self) -> &str {
        "browser"
    }

    /// Launches and discards a browser to fail fast when no usable
    /// Chrome/Chromium executable is around.
    async fn prepare(&self) -> Result<()> {
        let checker = self.checker.clone();
        tokio::task::spawn_blocking(move || BrowserFetcher::launch(&checker).map(|_| ()))
            .await
            .map_err(|e| FetchError::Automation(e.to_string()))?
    }

    async fn fetch_days(&self, days: &[NaiveDate]) -> Result<Vec<DayAvailability>> {
        let site = self.site.clone();
        let checker = self.checker.clone();
        let days = days.to_vec();

        let (out, screenshot) =
            tokio::task::spawn_blocking(move || probe_days_blocking(&site, &checker, &days))
                .await
                .map_err(|e| FetchError::Automation(e.to_string()))??;

        if screenshot.is_some() {
            if let Ok(mut slot) = self.screenshot.lock() {
                *slot = screenshot;
            }
        }

        Ok(out)
    }

    fn screenshot(&self) -> Option<PathBuf> {
        self.screenshot.lock().ok().and_then(|slot| slot.clone())
    }
}

fn probe_days_blocking(
    site: &SiteConfig,
    checker: &CheckerConfig,
    days: &[NaiveDate],
) -> Result<(Vec<DayAvailability>, Option<PathBuf>)> {
    let browser = BrowserFetcher::launch(checker)?;
    let tab = browser
        .new_tab()
        .map_err(|e| FetchError::Automation(e.to_string()))?;

    let mut out = Vec::with_capacity(days.len());
    let mut screenshot = None;

    for day in days {
        let url = booking_url(&site.base_url, *day, checker.adults, checker.children);
        debug!(check_in = %day, "navigating to stay page");

        tab.navigate_to(&url)
            .map_err(|e| FetchError::Automation(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| FetchError::Automation(e.to_string()))?;
        thread::sleep(RENDER_DELAY);

        let html = tab
            .get_content()
            .map_err(|e| FetchError::Automation(e.to_string()))?;
        let bookable = markup::page_indicates_availability(&html);

        if bookable {
            info!(check_in = %day, "availability found");
            if screenshot.is_none() {
                if let Some(dir) = &checker.screenshot_dir {
                    match capture_screenshot(&tab, dir, *day) {
                        Ok(path) => screenshot = Some(path),
                        Err(e) => warn!(error = %e, "screenshot capture failed"),
                    }
                }
            }
        } else {
            debug!(check_in = %day, "no availability");
        }

        out.push(DayAvailability::new(*day, bookable));
    }

    Ok((out, screenshot))
}

fn capture_screenshot(tab: &Tab, dir: &str, day: NaiveDate) -> Result<PathBuf> {
    let png = tab
        .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .map_err(|e| FetchError::Screenshot(e.to_string()))?;

    std::fs::create_dir_all(dir).map_err(|e| FetchError::Screenshot(e.to_string()))?;
    let path = Path::new(dir).join(format!("availability_{}.png", day.format("%Y%m%d")));
    std::fs::write(&path, png).map_err(|e| FetchError::Screenshot(e.to_string()))?;

    info!(path = %path.display(), "screenshot captured");
    Ok(path)
}
