//! Domain models for weekend availability.

mod availability;
mod calendar;
mod weekend;

pub use availability::DayAvailability;
pub use calendar::{months_in_horizon, next_friday, weekend_days};
pub use weekend::{PairKind, WeekendMatch, find_weekend_pairs};
