//! Custom serde module for parsing duration strings like "60s", "15m", "3h".

use serde::{self, Deserialize, Deserializer};
use std::time::Duration;

/// Recognized unit suffixes and their length in seconds. Longer suffixes
/// first so "ms" is not read as a bare "s".
const UNITS: &[(&str, f64)] = &[
    ("ms", 1e-3),
    ("s", 1.0),
    ("m", 60.0),
    ("h", 3600.0),
    ("d", 86400.0),
];

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => parse_duration(&s).map_err(serde::de::Error::custom),
        None => Ok(Duration::ZERO),
    }
}

pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Duration::ZERO);
    }

    for (suffix, unit_secs) in UNITS {
        if let Some(number) = s.strip_suffix(suffix) {
            return seconds(number.trim(), *unit_secs, s);
        }
    }

    // A bare number counts as seconds
    seconds(s, 1.0, s)
}

fn seconds(number: &str, multiplier: f64, original: &str) -> Result<Duration, String> {
    let value: f64 = number
        .parse()
        .map_err(|_| format!("unknown duration unit in: {}", original))?;

    if value < 0.0 {
        return Err(format!("duration cannot be negative: {}", original));
    }

    Ok(Duration::from_secs_f64(value * multiplier))
}
