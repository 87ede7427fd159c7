//! Tests for notification formatting functions.

use super::*;
use crate::domain::{DayAvailability, WeekendMatch};
use std::time::Duration;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekend_pair() -> WeekendMatch {
    let fri = DayAvailability::new(date(2025, 6, 6), true);
    let sat = DayAvailability::new(date(2025, 6, 7), true);
    WeekendMatch::new(fri, sat).unwrap()
}

// ==================== Helper function tests ====================

#[test]
fn test_format_date_display() {
    assert_eq!(format_date_display(date(2023, 4, 7)), "Friday, April 7, 2023");
}

#[test]
fn test_format_date_display_no_day_padding() {
    assert_eq!(format_date_display(date(2025, 6, 1)), "Sunday, June 1, 2025");
}

#[test]
fn test_format_duration_seconds() {
    assert_eq!(format_duration(Duration::from_secs(45)), "45s");
}

#[test]
fn test_format_duration_minutes() {
    assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
}

#[test]
fn test_format_duration_hours() {
    assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m");
}

#[test]
fn test_format_duration_days() {
    assert_eq!(format_duration(Duration::from_secs(90000)), "1d 1h");
}

#[test]
fn test_format_duration_zero() {
    assert_eq!(format_duration(Duration::ZERO), "0s");
}

// ==================== Event formatting tests ====================

fn availability_data() -> AvailabilityData {
    AvailabilityData {
        new_dates: vec![date(2025, 6, 6), date(2025, 6, 7)],
        all_dates: vec![date(2025, 6, 6), date(2025, 6, 7), date(2025, 6, 20)],
        pairs: vec![weekend_pair()],
        booking_links: vec![BookingLink {
            date: date(2025, 6, 6),
            url: "https://lodge.example.org/?ArrivalDate=Jun+06%2C+2025".to_string(),
        }],
        screenshot: None,
    }
}

#[test]
fn test_format_availability_lists_pairs() {
    let body = format_availability(&availability_data());
    assert!(body.contains("Consecutive weekend nights available:"));
    assert!(body.contains("Friday, June 6, 2025 - Saturday, June 7, 2025 (Friday-Saturday)"));
}

#[test]
fn test_format_availability_lists_new_and_all_dates() {
    let body = format_availability(&availability_data());
    assert!(body.contains("Newly available weekend days:"));
    assert!(body.contains("All available weekend days:"));
    assert!(body.contains("Friday, June 20, 2025"));
}

#[test]
fn test_format_availability_includes_booking_links() {
    let body = format_availability(&availability_data());
    assert!(body.contains("Direct booking links:"));
    assert!(body.contains("https://lodge.example.org/?ArrivalDate=Jun+06%2C+2025"));
}

#[test]
fn test_format_availability_without_pairs_skips_section() {
    let mut data = availability_data();
    data.pairs.clear();
    let body = format_availability(&data);
    assert!(!body.contains("Consecutive weekend nights"));
}

#[test]
fn test_format_availability_mentions_screenshot() {
    let mut data = availability_data();
    data.screenshot = Some(std::path::PathBuf::from("shots/availability_20250606.png"));
    let body = format_availability(&data);
    assert!(body.contains("availability_20250606.png"));
}

#[test]
fn test_format_error_includes_component_and_cause() {
    let body = format_error(&ErrorData {
        component: "fetcher".to_string(),
        message: "availability check abandoned".to_string(),
        error: Some("request error: timeout".to_string()),
    });
    assert!(body.contains("Component: fetcher"));
    assert!(body.contains("availability check abandoned"));
    assert!(body.contains("request error: timeout"));
}

#[test]
fn test_format_error_without_cause() {
    let body = format_error(&ErrorData {
        component: "fetcher".to_string(),
        message: "gone wrong".to_string(),
        error: None,
    });
    assert!(!body.contains("Error:"));
}

#[test]
fn test_format_startup_includes_version_and_strategy() {
    let body = format_startup(&StartupData {
        version: "0.1.0".to_string(),
        strategy: "http".to_string(),
        months_ahead: 6,
        email_enabled: true,
    });
    assert!(body.contains("Version: 0.1.0"));
    assert!(body.contains("Strategy: http"));
    assert!(body.contains("Months ahead: 6"));
    assert!(body.contains("Email notifications: on"));
}

#[test]
fn test_format_shutdown_includes_uptime() {
    let body = format_shutdown(&ShutdownData {
        reason: "graceful shutdown".to_string(),
        uptime: Duration::from_secs(3725),
        graceful: true,
    });
    assert!(body.contains("Uptime: 1h 2m"));
    assert!(body.contains("Status: graceful"));
}

#[test]
fn test_format_event_dispatches_by_data() {
    let event = Event::availability(availability_data());
    assert!(format_event(&event).starts_with("Weekend Availability Alert"));
    assert_eq!(event.event_type, EventType::Availability);
}

// ==================== NoopNotifier tests ====================

#[tokio::test]
async fn test_noop_notifier_accepts_everything_silently() {
    let notifier = NoopNotifier::new();
    assert!(notifier.send(&Event::availability(availability_data())).await.is_ok());
    assert!(!notifier.is_enabled(EventType::Availability));
    assert!(notifier.close().await.is_ok());
}
