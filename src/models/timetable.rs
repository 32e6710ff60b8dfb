//! Timetable and schedule models.
//!
//! This module defines the scheduled shift an employee is expected to work
//! on a given day and the in-memory schedule lookup the engine reads from.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// An employee's scheduled shift for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTimetable {
    /// The timetable name as configured on the device (e.g. "NIGHT (22:00 - 06:00)").
    pub name: String,
    /// Scheduled start of work.
    pub start_time: NaiveTime,
    /// Scheduled end of work. May be earlier than the start for overnight shifts.
    pub end_time: NaiveTime,
}

/// How a timetable reorders the chronological punch slots.
///
/// # Example
///
/// ```
/// use attendance_engine::models::ShiftKind;
///
/// assert_eq!(serde_json::to_string(&ShiftKind::Night).unwrap(), "\"night\"");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKind {
    /// Slots are used as punched.
    #[default]
    Standard,
    /// The third punch is the real shift start.
    Night,
    /// A shift spanning midnight whose slots are rotated.
    Afternoon,
}

impl std::fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftKind::Standard => write!(f, "Standard"),
            ShiftKind::Night => write!(f, "Night"),
            ShiftKind::Afternoon => write!(f, "Afternoon"),
        }
    }
}

/// One schedule row: which timetable an employee works on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// The employee the entry applies to.
    pub employee_id: String,
    /// The scheduled day.
    pub date: NaiveDate,
    /// The timetable for that day.
    pub timetable: ScheduledTimetable,
}

/// Read-only schedule lookup keyed by employee and date.
///
/// Built once per request before any metric is computed.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBook {
    entries: HashMap<(String, NaiveDate), ScheduledTimetable>,
}

impl ScheduleBook {
    /// Builds the lookup from schedule rows. A later row for the same
    /// employee and date replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = ScheduleEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| ((entry.employee_id, entry.date), entry.timetable))
            .collect();
        Self { entries }
    }

    /// Returns the timetable scheduled for an employee on a date.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{ScheduleBook, ScheduleEntry, ScheduledTimetable};
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    /// let book = ScheduleBook::from_entries(vec![ScheduleEntry {
    ///     employee_id: "1001".to_string(),
    ///     date,
    ///     timetable: ScheduledTimetable {
    ///         name: "DAY (09:00 - 18:00)".to_string(),
    ///         start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///         end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    ///     },
    /// }]);
    ///
    /// assert!(book.timetable_for("1001", date).is_some());
    /// assert!(book.timetable_for("1002", date).is_none());
    /// ```
    pub fn timetable_for(&self, employee_id: &str, date: NaiveDate) -> Option<&ScheduledTimetable> {
        self.entries.get(&(employee_id.to_string(), date))
    }

    /// Employees with at least one schedule entry between `start` and `end` inclusive.
    pub fn employees_scheduled_between(&self, start: NaiveDate, end: NaiveDate) -> BTreeSet<String> {
        self.entries
            .keys()
            .filter(|(_, date)| *date >= start && *date <= end)
            .map(|(employee_id, _)| employee_id.clone())
            .collect()
    }

    /// The latest scheduled date across all employees.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.entries.keys().map(|(_, date)| *date).max()
    }

    /// Number of schedule entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the schedule holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
