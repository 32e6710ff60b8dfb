//! Minute-precision durations used for every attendance metric.
//!
//! Attendance metrics are displayed as `HH:MM` with fractional minutes
//! truncated, so [`WorkDuration`] stores whole minutes and serializes as
//! that string. Hours may exceed 24 when durations are summed.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seconds in a day, added when a later time of day has wrapped past midnight.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A non-negative duration with whole-minute precision.
///
/// # Example
///
/// ```
/// use attendance_engine::models::WorkDuration;
///
/// let duration = WorkDuration::from_seconds(5_459);
/// assert_eq!(duration.to_string(), "01:30");
/// assert_eq!(WorkDuration::from_seconds(-60), WorkDuration::ZERO);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkDuration {
    minutes: i64,
}

impl WorkDuration {
    /// The zero duration, displayed as `00:00`.
    pub const ZERO: WorkDuration = WorkDuration { minutes: 0 };

    /// Builds a duration from minutes, clamping negatives to zero.
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            minutes: minutes.max(0),
        }
    }

    /// Builds a duration from seconds, truncating to whole minutes and
    /// clamping negatives to zero.
    pub fn from_seconds(seconds: i64) -> Self {
        Self::from_minutes(seconds.max(0) / 60)
    }

    /// The elapsed time from `start` to `end` as times of day.
    ///
    /// An `end` earlier than `start` is taken to have wrapped past midnight.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::WorkDuration;
    /// use chrono::NaiveTime;
    ///
    /// let start = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
    /// let end = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
    /// assert_eq!(WorkDuration::wrapped_between(start, end).to_string(), "08:00");
    /// ```
    pub fn wrapped_between(start: NaiveTime, end: NaiveTime) -> Self {
        Self::from_seconds(wrapped_seconds_between(start, end))
    }

    /// How far `later` is past `earlier`, with no midnight wrap.
    ///
    /// Zero when `later` is not after `earlier`.
    pub fn excess_of(later: NaiveTime, earlier: NaiveTime) -> Self {
        Self::from_seconds(seconds_of_day(later) - seconds_of_day(earlier))
    }

    /// Whole minutes in the duration.
    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Returns true for `00:00`.
    pub fn is_zero(&self) -> bool {
        self.minutes == 0
    }

    /// Subtraction clamped at zero.
    pub fn saturating_sub(self, other: WorkDuration) -> WorkDuration {
        WorkDuration::from_minutes(self.minutes - other.minutes)
    }

    /// The duration in decimal hours (e.g. `01:30` is `1.5`).
    pub fn decimal_hours(&self) -> Decimal {
        Decimal::from(self.minutes) / Decimal::from(60)
    }

    /// Decimal hours floored to the nearest half hour, with one fraction digit.
    ///
    /// Zero floors to `0.0`.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::WorkDuration;
    ///
    /// assert_eq!(WorkDuration::from_minutes(89).floored_half_hours().to_string(), "1.0");
    /// assert_eq!(WorkDuration::from_minutes(90).floored_half_hours().to_string(), "1.5");
    /// assert_eq!(WorkDuration::ZERO.floored_half_hours().to_string(), "0.0");
    /// ```
    pub fn floored_half_hours(&self) -> Decimal {
        Decimal::new((self.minutes / 30) * 5, 1)
    }
}

/// Seconds since midnight, ignoring sub-second precision.
pub fn seconds_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

/// Seconds from `start` to `end`, adding a day when `end` is earlier.
pub fn wrapped_seconds_between(start: NaiveTime, end: NaiveTime) -> i64 {
    let delta = seconds_of_day(end) - seconds_of_day(start);
    if delta < 0 { delta + SECONDS_PER_DAY } else { delta }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// Error returned when a string is not an `HH:MM` duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDurationError(String);

impl fmt::Display for ParseDurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration '{}' (expected HH:MM)", self.0)
    }
}

impl std::error::Error for ParseDurationError {}

impl FromStr for WorkDuration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDurationError(s.to_string());
        let (hours, minutes) = s.trim().split_once(':').ok_or_else(err)?;
        let hours: i64 = hours.parse().map_err(|_| err())?;
        let minutes: i64 = minutes.parse().map_err(|_| err())?;
        if hours < 0 || !(0..60).contains(&minutes) {
            return Err(err());
        }
        Ok(WorkDuration::from_minutes(hours * 60 + minutes))
    }
}

impl Serialize for WorkDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Add for WorkDuration {
    type Output = WorkDuration;

    fn add(self, rhs: WorkDuration) -> WorkDuration {
        WorkDuration::from_minutes(self.minutes + rhs.minutes)
    }
}

impl Sum for WorkDuration {
    fn sum<I: Iterator<Item = WorkDuration>>(iter: I) -> Self {
        iter.fold(WorkDuration::ZERO, Add::add)
    }
}
