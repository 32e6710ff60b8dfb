//! Request types for the Attendance Engine API.
//!
//! This module defines the JSON request structures for the
//! `/attendance/report` and `/attendance/data-sheet` endpoints. Dates stay
//! strings until validation so a bad date becomes an `INVALID_DATE`
//! response rather than a generic JSON error.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{CollationPolicy, DedupStrategy, EndDateDefault};
use crate::models::{Employee, RawPunchRow, ScheduleEntry, ScheduledTimetable, parse_iso_date};

/// Request body for the `/attendance/report` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// First date of the report, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last date of the report. Defaults per `end_date_default`.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Public holidays, `YYYY-MM-DD`. Replaces the configured defaults.
    #[serde(default)]
    pub public_holidays: Option<Vec<String>>,
    /// Overrides the configured deduplication rule.
    #[serde(default)]
    pub deduplication: Option<DedupStrategy>,
    /// Overrides the configured collation policy.
    #[serde(default)]
    pub collation_policy: Option<CollationPolicy>,
    /// Overrides the configured end date default.
    #[serde(default)]
    pub end_date_default: Option<EndDateDefault>,
    /// The employee directory.
    pub employees: Vec<Employee>,
    /// Scheduled timetables by employee and date.
    #[serde(default)]
    pub schedules: Vec<ScheduleEntryRequest>,
    /// Raw device punches.
    pub punches: Vec<RawPunchRow>,
}

/// Request body for the `/attendance/data-sheet` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSheetRequest {
    /// First date of the sheet, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last date of the sheet. Defaults per `end_date_default`.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Overrides the configured end date default.
    #[serde(default)]
    pub end_date_default: Option<EndDateDefault>,
    /// The employee directory.
    pub employees: Vec<Employee>,
    /// Raw device punches.
    pub punches: Vec<RawPunchRow>,
}

/// One schedule entry as sent by the scheduling system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntryRequest {
    /// The device enrolment number.
    pub employee_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// The timetable name, e.g. "NIGHT (22:00 - 06:00)".
    pub timetable: String,
    /// `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    /// `HH:MM` or `HH:MM:SS`.
    pub end_time: String,
}

impl ScheduleEntryRequest {
    /// Converts to a schedule entry, or `None` if a date or time is unreadable.
    pub fn to_entry(&self) -> Option<ScheduleEntry> {
        let date = parse_iso_date("date", &self.date).ok();
        let start_time = parse_time_of_day(&self.start_time);
        let end_time = parse_time_of_day(&self.end_time);

        match (date, start_time, end_time) {
            (Some(date), Some(start_time), Some(end_time)) => Some(ScheduleEntry {
                employee_id: self.employee_id.trim().to_string(),
                date,
                timetable: ScheduledTimetable {
                    name: self.timetable.clone(),
                    start_time,
                    end_time,
                },
            }),
            _ => None,
        }
    }
}

/// Converts schedule rows, dropping unreadable ones with a warning.
pub fn schedule_entries(rows: &[ScheduleEntryRequest]) -> Vec<ScheduleEntry> {
    rows.iter()
        .filter_map(|row| {
            let entry = row.to_entry();
            if entry.is_none() {
                warn!(
                    employee_id = %row.employee_id,
                    date = %row.date,
                    start_time = %row.start_time,
                    end_time = %row.end_time,
                    "Skipping schedule entry with unreadable date or time"
                );
            }
            entry
        })
        .collect()
}

fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}
