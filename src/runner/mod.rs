//! Main watcher implementation.
//!
//! Coordinates all components: fetcher, matcher, storage, and notifications.

mod config;
mod error;
mod stats;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use stats::Stats;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{self, DayAvailability, PairKind, WeekendMatch};
use crate::fetch::{self, Fetcher};
use crate::notification::{
    AvailabilityData, BookingLink, EmailNotifier, ErrorData, Event, Notifier, ShutdownData,
    StartupData,
};
use crate::storage::{JsonFileStore, ResultsSnapshot, ResultsStore};

/// Lower bound for the jittered inter-cycle interval.
const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(1800);

/// Delay before the next cycle after an abandoned one.
const FAILURE_BACKOFF: Duration = Duration::from_secs(900);

/// Main watcher that coordinates all components.
pub struct Runner {
    cfg: Config,
    version: String,
    fetcher: Box<dyn Fetcher>,
    notifier: Option<Arc<EmailNotifier>>,
    store: Option<JsonFileStore>,

    // Runtime state
    started_at: Mutex<Option<Instant>>,
    running: Mutex<bool>,
    stats: Mutex<Stats>,
    previous: Mutex<ResultsSnapshot>,
}

impl Runner {
    /// Creates a new Runner with the fetch strategy from config.
    pub fn new(cfg: RunnerConfig) -> Result<Self, RunnerError> {
        let fetcher = fetch::from_config(&cfg.config);
        Self::with_fetcher(cfg, fetcher)
    }

    /// Creates a new Runner with an explicit fetcher (used by tests).
    pub(crate) fn with_fetcher(
        cfg: RunnerConfig,
        fetcher: Box<dyn Fetcher>,
    ) -> Result<Self, RunnerError> {
        let notifier = if cfg.config.email.enabled {
            match EmailNotifier::new(cfg.config.email.clone()) {
                Ok(notifier) => {
                    info!("email notifier created");
                    Some(Arc::new(notifier))
                }
                Err(e) => {
                    warn!(error = %e, "failed to create email notifier");
                    None
                }
            }
        } else {
            None
        };

        let store = if cfg.config.storage.enabled {
            Some(JsonFileStore::new(cfg.config.storage.path.clone()))
        } else {
            None
        };

        Ok(Self {
            cfg: cfg.config,
            version: cfg.version,
            fetcher,
            notifier,
            store,
            started_at: Mutex::new(None),
            running: Mutex::new(false),
            stats: Mutex::new(Stats::default()),
            previous: Mutex::new(ResultsSnapshot::default()),
        })
    }

    /// Starts the watcher. In single-run mode exactly one cycle executes;
    /// otherwise cycles repeat until interrupted.
    pub async fn start(&self, single_run: bool) -> Result<(), RunnerError> {
        {
            let mut running = self.running.lock().await;
            if *running {
                return Err(RunnerError::AlreadyRunning);
            }
            *running = true;
        }

        {
            let mut started_at = self.started_at.lock().await;
            *started_at = Some(Instant::now());
        }

        info!(
            version = %self.version,
            strategy = %self.fetcher.name(),
            months_ahead = self.cfg.checker.months_ahead,
            single_run,
            "starting availability watcher"
        );

        self.send_notification(Event::startup(StartupData {
            version: self.version.clone(),
            strategy: self.fetcher.name().to_string(),
            months_ahead: self.cfg.checker.months_ahead,
            email_enabled: self.cfg.email.enabled,
        }))
        .await;

        self.load_previous_results().await;

        if single_run {
            self.cycle().await;
            return Ok(());
        }

        self.run_main_loop().await
    }

    /// Gracefully stops the watcher.
    pub async fn stop(&self) -> Result<(), RunnerError> {
        {
            let mut running = self.running.lock().await;
            if !*running {
                return Ok(());
            }
            *running = false;
        }

        info!("stopping watcher...");

        let uptime = self.uptime().await;
        let stats = self.stats().await;

        self.send_notification(Event::shutdown(ShutdownData {
            reason: "graceful shutdown".to_string(),
            uptime,
            graceful: true,
        }))
        .await;

        if let Some(ref notifier) = self.notifier {
            let _ = notifier.close().await;
        }

        info!(
            uptime = ?uptime,
            cycles = stats.cycles,
            fetch_failures = stats.fetch_failures,
            dates_seen = stats.dates_seen,
            matches_found = stats.matches_found,
            notifications_sent = stats.notifications_sent,
            "watcher stopped"
        );

        Ok(())
    }

    /// Returns a copy of the current statistics.
    pub async fn stats(&self) -> Stats {
        self.stats.lock().await.clone()
    }

    /// Returns true if the watcher is currently running.
    pub async fn is_running(&self) -> bool {
        *self.running.lock().await
    }

    /// Returns how long the watcher has been running.
    pub async fn uptime(&self) -> Duration {
        self.started_at
            .lock()
            .await
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Sends a synthetic next-weekend match through the real email path
    /// to validate the SMTP configuration.
    pub async fn send_test_email(&self) -> Result<(), RunnerError> {
        let Some(ref notifier) = self.notifier else {
            return Err(RunnerError::Notification(
                "email is not enabled in config".into(),
            ));
        };

        let friday = domain::next_friday(Local::now().date_naive());
        let saturday = friday + Days::new(1);
        let pair = WeekendMatch::new(
            DayAvailability::new(friday, true),
            DayAvailability::new(saturday, true),
        )
        .ok_or_else(|| RunnerError::Notification("failed to build synthetic match".into()))?;

        let new_dates = vec![friday, saturday];
        let booking_links = self.booking_links(&new_dates);

        info!(server = %self.cfg.email.smtp_server, "sending test email");

        notifier
            .send(&Event::availability(AvailabilityData {
                new_dates: new_dates.clone(),
                all_dates: new_dates,
                pairs: vec![pair],
                booking_links,
                screenshot: None,
            }))
            .await
            .map_err(|e| RunnerError::Notification(e.to_string()))
    }

    /// Probes a single stay and returns whether it is bookable.
    pub async fn check_date(&self, date: NaiveDate) -> Result<bool, RunnerError> {
        self.fetcher
            .prepare()
            .await
            .map_err(|e| RunnerError::Fetch(e.to_string()))?;

        let days = self
            .fetcher
            .fetch_days(&[date])
            .await
            .map_err(|e| RunnerError::Fetch(e.to_string()))?;

        Ok(days.first().is_some_and(|d| d.bookable))
    }

    /// Main check loop with jittered sleep between cycles.
    async fn run_main_loop(&self) -> Result<(), RunnerError> {
        loop {
            if !self.is_running().await {
                break;
            }

            let succeeded = self.cycle().await;

            let delay = if succeeded {
                jittered_interval(
                    self.cfg.schedule.check_interval,
                    self.cfg.schedule.jitter_percent,
                )
            } else {
                FAILURE_BACKOFF
            };

            let next_check = Local::now() + chrono::Duration::seconds(delay.as_secs() as i64);
            info!(
                next_check = %next_check.format("%Y-%m-%d %H:%M:%S"),
                "sleeping until next check"
            );

            tokio::select! {
                _ = sleep(delay) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, stopping");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Runs one fetch, match and notify cycle. Returns false when the
    /// fetch was abandoned; cycle errors never propagate.
    async fn cycle(&self) -> bool {
        let cycle = {
            let mut stats = self.stats.lock().await;
            stats.cycles += 1;
            stats.cycles
        };
        info!(cycle, "starting availability check");

        let today = Local::now().date_naive();
        let days = match fetch::fetch_horizon(
            self.fetcher.as_ref(),
            today,
            self.cfg.checker.months_ahead,
            &self.cfg.retry,
        )
        .await
        {
            Ok(days) => days,
            Err(e) => {
                {
                    let mut stats = self.stats.lock().await;
                    stats.fetch_failures += 1;
                }
                error!(error = %e, "fetch failed, abandoning this cycle");
                self.send_notification(Event::error(ErrorData {
                    component: "fetcher".to_string(),
                    message: "availability check abandoned".to_string(),
                    error: Some(e.to_string()),
                }))
                .await;
                return false;
            }
        };

        let available: Vec<NaiveDate> =
            days.iter().filter(|d| d.bookable).map(|d| d.date).collect();
        let pairs = self.qualifying_pairs(&days);

        {
            let mut stats = self.stats.lock().await;
            stats.dates_seen += available.len() as u64;
            stats.matches_found += pairs.len() as u64;
        }

        let new_dates = {
            let previous = self.previous.lock().await;
            previous.newly_available(&available)
        };

        let snapshot = ResultsSnapshot::new(
            available.clone(),
            pairs
                .iter()
                .map(|m| (m.first().date, m.second().date))
                .collect(),
        );
        if let Some(ref store) = self.store {
            if let Err(e) = store.save(&snapshot).await {
                warn!(error = %e, "failed to save results snapshot");
            }
        }
        {
            let mut previous = self.previous.lock().await;
            *previous = snapshot;
        }

        if new_dates.is_empty() {
            if available.is_empty() {
                info!("no availability found");
            } else {
                info!(
                    available = available.len(),
                    "availability unchanged since last check"
                );
            }
            return true;
        }

        info!(
            new = new_dates.len(),
            available = available.len(),
            matches = pairs.len(),
            "new availability found"
        );
        for pair in &pairs {
            info!(
                first = %pair.first().date,
                second = %pair.second().date,
                kind = %pair.kind(),
                "weekend match"
            );
        }

        // Notify about new dates only; pairs must be new on both nights
        let new_pairs: Vec<WeekendMatch> = pairs
            .iter()
            .copied()
            .filter(|m| {
                new_dates.contains(&m.first().date) && new_dates.contains(&m.second().date)
            })
            .collect();
        let booking_links = self.booking_links(&new_dates);

        let sent = self
            .send_notification(Event::availability(AvailabilityData {
                new_dates,
                all_dates: available,
                pairs: new_pairs,
                booking_links,
                screenshot: self.fetcher.screenshot(),
            }))
            .await;

        if sent {
            let mut stats = self.stats.lock().await;
            stats.notifications_sent += 1;
        }

        true
    }

    /// Keeps only the pair kinds enabled in config.
    fn qualifying_pairs(&self, days: &[DayAvailability]) -> Vec<WeekendMatch> {
        domain::find_weekend_pairs(days)
            .into_iter()
            .filter(|m| match m.kind() {
                PairKind::FriSat => self.cfg.checker.check_friday_saturday,
                PairKind::SatSun => self.cfg.checker.check_saturday_sunday,
            })
            .collect()
    }

    fn booking_links(&self, dates: &[NaiveDate]) -> Vec<BookingLink> {
        dates
            .iter()
            .map(|d| BookingLink {
                date: *d,
                url: fetch::booking_url(
                    &self.cfg.site.base_url,
                    *d,
                    self.cfg.checker.adults,
                    self.cfg.checker.children,
                ),
            })
            .collect()
    }

    async fn load_previous_results(&self) {
        if let Some(ref store) = self.store {
            match store.load().await {
                Ok(snapshot) => {
                    if !snapshot.available_dates.is_empty() {
                        info!(
                            dates = snapshot.available_dates.len(),
                            "loaded previous results"
                        );
                    }
                    let mut previous = self.previous.lock().await;
                    *previous = snapshot;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load previous results, treating all availability as new");
                }
            }
        }
    }

    /// Sends a notification event if a notifier is configured. Returns
    /// whether the event was delivered.
    async fn send_notification(&self, event: Event) -> bool {
        if let Some(ref notifier) = self.notifier {
            match notifier.send(&event).await {
                Ok(()) => return true,
                Err(e) => {
                    warn!(
                        event_type = %event.event_type,
                        error = %e,
                        "failed to send notification"
                    );
                }
            }
        }
        false
    }
}

/// Computes the next inter-cycle delay: the base interval with a uniform
/// random variation of `jitter_percent`, floored at thirty minutes.
fn jittered_interval(base: Duration, jitter_percent: f64) -> Duration {
    let base_secs = base.as_secs_f64();
    let spread = base_secs * jitter_percent / 100.0;

    let secs = if spread > 0.0 {
        rand::thread_rng().gen_range(base_secs - spread..=base_secs + spread)
    } else {
        base_secs
    };

    Duration::from_secs_f64(secs).max(MIN_CHECK_INTERVAL)
}
