//! Interval-bucketed clock.
//!
//! Formats "now", optionally rounded down to a coarse interval such as `15m`
//! so that the rendered value stays stable for the whole interval.

use chrono::{Local, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::time::INVALID_INTERVAL;
use crate::utils::format_pattern;

static INTERVAL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)([hms])$").unwrap());

/// Source of the current wall-clock time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local time of the system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Hours,
    Minutes,
    Seconds,
}

/// A bucketing interval such as `1s`, `15m` or `2h`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub magnitude: u32,
    pub unit: Unit,
}

impl Interval {
    /// Parses an interval. Returns `None` when the text does not match
    /// `^\d+[hms]$` or its magnitude is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmaker::clock::{Interval, Unit};
    ///
    /// assert_eq!(Interval::parse("15m"), Some(Interval { magnitude: 15, unit: Unit::Minutes }));
    /// assert_eq!(Interval::parse("bogus"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let caps = INTERVAL_PATTERN.captures(text)?;
        let magnitude = caps.get(1)?.as_str().parse::<u32>().ok()?;
        if magnitude == 0 {
            return None;
        }
        let unit = match caps.get(2)?.as_str() {
            "h" => Unit::Hours,
            "m" => Unit::Minutes,
            "s" => Unit::Seconds,
            _ => return None,
        };
        Some(Interval { magnitude, unit })
    }

    /// Rounds the matching field down to a multiple of the magnitude and
    /// zeroes every finer field.
    pub fn floor(&self, dt: NaiveDateTime) -> NaiveDateTime {
        let bucket = |value: u32| value - value % self.magnitude;
        let (hour, minute, second) = match self.unit {
            Unit::Hours => (bucket(dt.hour()), 0, 0),
            Unit::Minutes => (dt.hour(), bucket(dt.minute()), 0),
            Unit::Seconds => (dt.hour(), dt.minute(), bucket(dt.second())),
        };
        dt.date()
            .and_hms_opt(hour, minute, second)
            .unwrap_or(dt)
    }
}

/// Formats the current time of `clock`, bucketed by `interval`, using a date
/// pattern. An invalid interval yields the inline diagnostic
/// `|settings.time.interval is invalid format|` instead of a time.
pub fn format_time(clock: &dyn Clock, pattern: &str, interval: &str) -> String {
    match Interval::parse(interval) {
        Some(interval) => format_pattern(&interval.floor(clock.now()), pattern),
        None => INVALID_INTERVAL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clock_at(h: u32, m: u32, s: u32) -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 5, 17)
                .unwrap()
                .and_hms_milli_opt(h, m, s, 731)
                .unwrap(),
        )
    }

    #[test]
    fn test_quarter_hour_bucket() {
        assert_eq!(format_time(&clock_at(10, 7, 42), "hh:mm", "15m"), "10:00");
        assert_eq!(format_time(&clock_at(10, 59, 1), "hh:mm:ss", "15m"), "10:45:00");
    }

    #[test]
    fn test_hour_and_second_buckets() {
        assert_eq!(format_time(&clock_at(23, 30, 30), "hh:mm:ss", "6h"), "18:00:00");
        assert_eq!(format_time(&clock_at(8, 1, 29), "hh:mm:ss", "10s"), "08:01:20");
    }

    #[test]
    fn test_one_second_drops_sub_second_part() {
        assert_eq!(format_time(&clock_at(8, 1, 29), "ss.SSS", "1s"), "29.000");
    }

    #[test]
    fn test_invalid_interval_is_diagnostic() {
        let clock = clock_at(10, 7, 42);
        assert_eq!(format_time(&clock, "hh:mm", "bogus"), INVALID_INTERVAL);
        assert_eq!(format_time(&clock, "hh:mm", "15d"), INVALID_INTERVAL);
        assert_eq!(format_time(&clock, "hh:mm", "0m"), INVALID_INTERVAL);
        assert_eq!(format_time(&clock, "hh:mm", " 1m"), INVALID_INTERVAL);
    }

    #[test]
    fn test_bucket_is_stable_within_interval() {
        let a = format_time(&clock_at(14, 30, 0), "hh:mm", "30m");
        let b = format_time(&clock_at(14, 59, 59), "hh:mm", "30m");
        assert_eq!(a, b);
    }
}
