//! Punch models.
//!
//! This module defines the raw clock events read from a biometric device
//! and the per-day punch sequences the collator builds from them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Timestamp layouts accepted for raw punch rows, tried in order.
const PUNCH_TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A single timestamped clock event for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPunch {
    /// The device PIN of the employee who punched.
    pub employee_id: String,
    /// When the punch was recorded.
    pub timestamp: NaiveDateTime,
}

impl RawPunch {
    /// Returns the calendar date the punch belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Returns the time of day of the punch.
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }
}

/// A punch row as it arrives from the device export, before validation.
///
/// The timestamp is kept as text so a single malformed row can be dropped
/// without rejecting the whole upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPunchRow {
    /// The device PIN of the employee who punched.
    pub employee_id: String,
    /// The punch timestamp as exported by the device.
    pub timestamp: String,
}

impl RawPunchRow {
    /// Parses the row into a [`RawPunch`].
    ///
    /// Returns `None` when the employee id is blank or the timestamp does not
    /// match any supported layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::RawPunchRow;
    ///
    /// let row = RawPunchRow {
    ///     employee_id: "1001".to_string(),
    ///     timestamp: "2025-06-02 08:58:13".to_string(),
    /// };
    /// let punch = row.parse().unwrap();
    /// assert_eq!(punch.date().to_string(), "2025-06-02");
    ///
    /// let broken = RawPunchRow {
    ///     employee_id: "1001".to_string(),
    ///     timestamp: "02/06/2025 8am".to_string(),
    /// };
    /// assert!(broken.parse().is_none());
    /// ```
    pub fn parse(&self) -> Option<RawPunch> {
        let employee_id = self.employee_id.trim();
        if employee_id.is_empty() {
            return None;
        }

        let text = self.timestamp.trim();
        PUNCH_TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(|timestamp| RawPunch {
                employee_id: employee_id.to_string(),
                timestamp,
            })
    }
}

/// All punches of one employee on one calendar day.
///
/// Punches are ordered by full timestamp so gap calculations in the
/// deduplicator stay correct. A set may be empty when the collator runs
/// in dense mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPunchSet {
    /// The employee the punches belong to.
    pub employee_id: String,
    /// The calendar day of the punches.
    pub date: NaiveDate,
    /// Punch timestamps in ascending order.
    pub punches: Vec<NaiveDateTime>,
}

impl DailyPunchSet {
    /// Creates an empty punch set for an employee and day.
    pub fn empty(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            punches: Vec::new(),
        }
    }

    /// Returns true if no punch was recorded on this day.
    pub fn is_empty(&self) -> bool {
        self.punches.is_empty()
    }
}
