//! Weekend pair matching.

use chrono::{Datelike, Weekday};
use std::fmt;

use super::DayAvailability;

/// PairKind indicates which weekend nights a match covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// Friday night into Saturday night.
    FriSat,
    /// Saturday night into Sunday night.
    SatSun,
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairKind::FriSat => write!(f, "Friday-Saturday"),
            PairKind::SatSun => write!(f, "Saturday-Sunday"),
        }
    }
}

/// WeekendMatch is a pair of calendar-adjacent, both-bookable days landing
/// on Friday/Saturday or Saturday/Sunday. Only constructible through
/// [`WeekendMatch::new`], which enforces that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendMatch {
    first: DayAvailability,
    second: DayAvailability,
    kind: PairKind,
}

impl WeekendMatch {
    /// Builds a match from two days, or None when the pair does not
    /// qualify: not calendar-adjacent, not both bookable, or not aligned
    /// to a weekend pair.
    pub fn new(first: DayAvailability, second: DayAvailability) -> Option<Self> {
        if !first.bookable || !second.bookable {
            return None;
        }

        if second.date != first.date.succ_opt()? {
            return None;
        }

        let kind = match (first.date.weekday(), second.date.weekday()) {
            (Weekday::Fri, Weekday::Sat) => PairKind::FriSat,
            (Weekday::Sat, Weekday::Sun) => PairKind::SatSun,
            _ => return None,
        };

        Some(Self { first, second, kind })
    }

    pub fn first(&self) -> DayAvailability {
        self.first
    }

    pub fn second(&self) -> DayAvailability {
        self.second
    }

    pub fn kind(&self) -> PairKind {
        self.kind
    }
}

/// Scans a date-sorted sequence of day availabilities and returns every
/// qualifying weekend pair among adjacent entries. Pure and deterministic.
pub fn find_weekend_pairs(days: &[DayAvailability]) -> Vec<WeekendMatch> {
    days.windows(2)
        .filter_map(|w| WeekendMatch::new(w[0], w[1]))
        .collect()
}
