#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::WeekendMatch;

/// Notification event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// New weekend availability was found.
    Availability,
    /// The watcher started.
    Startup,
    /// The watcher stopped.
    Shutdown,
    /// A check cycle failed.
    Error,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Availability => write!(f, "availability"),
            EventType::Startup => write!(f, "startup"),
            EventType::Shutdown => write!(f, "shutdown"),
            EventType::Error => write!(f, "error"),
        }
    }
}

/// Direct booking link for a single check-in date.
#[derive(Debug, Clone)]
pub struct BookingLink {
    pub date: NaiveDate,
    pub url: String,
}

/// Availability found during a check cycle.
#[derive(Debug, Clone)]
pub struct AvailabilityData {
    /// Dates that were not available on the previous cycle.
    pub new_dates: Vec<NaiveDate>,
    /// Every available date seen this cycle.
    pub all_dates: Vec<NaiveDate>,
    /// Weekend pairs among the new dates.
    pub pairs: Vec<WeekendMatch>,
    /// Direct booking links for the new dates.
    pub booking_links: Vec<BookingLink>,
    /// Screenshot artifact from the browser strategy, if captured.
    pub screenshot: Option<PathBuf>,
}

/// A failed check cycle.
#[derive(Debug, Clone)]
pub struct ErrorData {
    pub component: String,
    pub message: String,
    pub error: Option<String>,
}

/// Watcher startup.
#[derive(Debug, Clone)]
pub struct StartupData {
    pub version: String,
    pub strategy: String,
    pub months_ahead: u32,
    pub email_enabled: bool,
}

/// Watcher shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownData {
    pub reason: String,
    pub uptime: Duration,
    pub graceful: bool,
}

/// Event payload.
#[derive(Debug, Clone)]
pub enum EventData {
    Availability(AvailabilityData),
    Error(ErrorData),
    Startup(StartupData),
    Shutdown(ShutdownData),
}

/// Notification event.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, data: EventData) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }

    pub fn availability(data: AvailabilityData) -> Self {
        Self::new(EventType::Availability, EventData::Availability(data))
    }

    pub fn error(data: ErrorData) -> Self {
        Self::new(EventType::Error, EventData::Error(data))
    }

    pub fn startup(data: StartupData) -> Self {
        Self::new(EventType::Startup, EventData::Startup(data))
    }

    pub fn shutdown(data: ShutdownData) -> Self {
        Self::new(EventType::Shutdown, EventData::Shutdown(data))
    }
}

/// Trait for notification delivery channels.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification event.
    async fn send(&self, event: &Event) -> Result<(), NotificationError>;

    /// Whether this channel delivers the given event type.
    fn is_enabled(&self, event_type: EventType) -> bool;

    /// Release channel resources.
    async fn close(&self) -> Result<(), NotificationError>;
}

/// Notification delivery error.
#[derive(Debug, Clone)]
pub struct NotificationError {
    pub message: String,
}

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotificationError: {}", self.message)
    }
}

impl std::error::Error for NotificationError {}

impl NotificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// NoopNotifier - empty implementation for tests.
pub struct NoopNotifier;

impl NoopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _event: &Event) -> Result<(), NotificationError> {
        Ok(())
    }

    fn is_enabled(&self, _event_type: EventType) -> bool {
        false
    }

    async fn close(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}

// === Formatting functions ===

/// Formats an availability alert body.
pub fn format_availability(data: &AvailabilityData) -> String {
    let mut body = String::from("Weekend Availability Alert\n\n");

    if !data.pairs.is_empty() {
        body.push_str("Consecutive weekend nights available:\n");
        for pair in &data.pairs {
            body.push_str(&format!(
                "* {} - {} ({})\n",
                format_date_display(pair.first().date),
                format_date_display(pair.second().date),
                pair.kind()
            ));
        }
        body.push('\n');
    }

    if !data.new_dates.is_empty() {
        body.push_str("Newly available weekend days:\n");
        for date in &data.new_dates {
            body.push_str(&format!("* {}\n", format_date_display(*date)));
        }
        body.push('\n');
    }

    body.push_str("All available weekend days:\n");
    for date in &data.all_dates {
        body.push_str(&format!("* {}\n", format_date_display(*date)));
    }

    if !data.booking_links.is_empty() {
        body.push_str("\nDirect booking links:\n");
        for link in &data.booking_links {
            body.push_str(&format!(
                "* {}: {}\n",
                format_date_display(link.date),
                link.url
            ));
        }
    }

    if let Some(path) = &data.screenshot {
        body.push_str(&format!("\nScreenshot attached: {}\n", path.display()));
    }

    body.push_str(&format!(
        "\nThis alert was generated on {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    body
}

/// Formats a cycle error.
pub fn format_error(data: &ErrorData) -> String {
    let error_str = data
        .error
        .as_ref()
        .map(|e| format!("\nError: {}", e))
        .unwrap_or_default();

    format!(
        "Watcher error\n\n\
         Component: {}\n\
         Message: {}{}\n\n\
         {}",
        data.component,
        data.message,
        error_str,
        Utc::now().format("%H:%M:%S UTC")
    )
}

/// Formats a startup notice.
pub fn format_startup(data: &StartupData) -> String {
    format!(
        "Watcher started\n\n\
         Version: {}\n\
         Strategy: {}\n\
         Months ahead: {}\n\
         Email notifications: {}\n\n\
         {}",
        data.version,
        data.strategy,
        data.months_ahead,
        if data.email_enabled { "on" } else { "off" },
        Utc::now().format("%H:%M:%S UTC")
    )
}

/// Formats a shutdown notice.
pub fn format_shutdown(data: &ShutdownData) -> String {
    let status = if data.graceful { "graceful" } else { "forced" };

    format!(
        "Watcher stopped\n\n\
         Reason: {}\n\
         Status: {}\n\
         Uptime: {}\n\n\
         {}",
        data.reason,
        status,
        format_duration(data.uptime),
        Utc::now().format("%H:%M:%S UTC")
    )
}

/// Formats an event into a message body.
pub fn format_event(event: &Event) -> String {
    match &event.data {
        EventData::Availability(data) => format_availability(data),
        EventData::Error(data) => format_error(data),
        EventData::Startup(data) => format_startup(data),
        EventData::Shutdown(data) => format_shutdown(data),
    }
}

// === Helper functions ===

/// Formats a date for display (e.g., "Friday, April 7, 2023").
pub fn format_date_display(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Formats a duration in a compact human form.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
