//! Per-day availability model.

use chrono::NaiveDate;

/// DayAvailability records whether a one-night stay checking in on `date`
/// is offered by the booking site. Produced fresh on every check cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAvailability {
    /// Check-in date of the probed stay.
    pub date: NaiveDate,
    /// True when the site offers the stay for booking.
    pub bookable: bool,
}

impl DayAvailability {
    /// Creates a new DayAvailability entry.
    pub fn new(date: NaiveDate, bookable: bool) -> Self {
        Self { date, bookable }
    }
}
