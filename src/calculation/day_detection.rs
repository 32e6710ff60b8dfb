//! Day detection logic.
//!
//! This module determines the day type (weekday, Saturday, Sunday) of a
//! calendar date, which selects the overtime bucket, and the short weekday
//! label printed on attendance reports.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Represents the type of day for overtime bucketing.
///
/// Weekday overtime goes to OT1, Saturday and Sunday overtime to OT2.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::DayType;
///
/// let day_type = DayType::Saturday;
/// assert!(day_type.is_weekend());
/// assert_eq!(format!("{:?}", day_type), "Saturday");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl DayType {
    /// Returns true for Saturday and Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self, DayType::Saturday | DayType::Sunday)
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
        }
    }
}

/// Determines the day type for a given date.
///
/// # Returns
///
/// - [`DayType::Weekday`] for Monday through Friday
/// - [`DayType::Saturday`] for Saturday
/// - [`DayType::Sunday`] for Sunday
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{DayType, get_day_type};
/// use chrono::NaiveDate;
///
/// // 2025-06-07 is a Saturday
/// assert_eq!(get_day_type(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap()), DayType::Saturday);
/// // 2025-06-08 is a Sunday
/// assert_eq!(get_day_type(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap()), DayType::Sunday);
/// // 2025-06-02 is a Monday
/// assert_eq!(get_day_type(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()), DayType::Weekday);
/// ```
pub fn get_day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Sunday,
        _ => DayType::Weekday,
    }
}

/// The short weekday label used on attendance reports.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::weekday_label;
/// use chrono::NaiveDate;
///
/// assert_eq!(weekday_label(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()), "Tues.");
/// ```
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Sun => "Sun.",
        Weekday::Mon => "Mon.",
        Weekday::Tue => "Tues.",
        Weekday::Wed => "Wed.",
        Weekday::Thu => "Thur.",
        Weekday::Fri => "Fri.",
        Weekday::Sat => "Sat.",
    }
}
