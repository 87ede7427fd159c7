//! Notification events and delivery channels.

mod email;
mod notifier;

pub use email::EmailNotifier;
pub use notifier::{
    AvailabilityData, BookingLink, ErrorData, Event, EventData, EventType, NoopNotifier,
    NotificationError, Notifier, ShutdownData, StartupData, format_date_display, format_event,
};
