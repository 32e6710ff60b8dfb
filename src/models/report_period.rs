//! Report period and public holiday models.
//!
//! This module contains the [`ReportPeriod`] type used to define the date
//! range of an attendance report and the caller-supplied holiday set.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Parses a request date in ISO `YYYY-MM-DD` form.
///
/// # Arguments
///
/// * `field` - The request field the value came from, used in the error
/// * `value` - The text to parse
///
/// # Example
///
/// ```
/// use attendance_engine::models::parse_iso_date;
///
/// assert!(parse_iso_date("start_date", "2025-06-01").is_ok());
/// assert!(parse_iso_date("start_date", "01/06/2025").is_err());
/// ```
pub fn parse_iso_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// The inclusive date range of a report with its public holidays.
///
/// # Example
///
/// ```
/// use attendance_engine::models::ReportPeriod;
/// use chrono::NaiveDate;
///
/// let period = ReportPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
///     [NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()],
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()));
/// assert!(period.is_public_holiday(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()));
/// assert_eq!(period.day_count(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First reported day (inclusive).
    pub start_date: NaiveDate,
    /// Last reported day (inclusive).
    pub end_date: NaiveDate,
    /// Public holidays, matched by exact calendar date.
    pub public_holidays: BTreeSet<NaiveDate>,
}

impl ReportPeriod {
    /// Creates a period, rejecting an end date before the start date.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        public_holidays: impl IntoIterator<Item = NaiveDate>,
    ) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
            public_holidays: public_holidays.into_iter().collect(),
        })
    }

    /// Checks if a date falls within the period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks if a date is one of the supplied public holidays.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.public_holidays.contains(&date)
    }

    /// Every calendar day of the period in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |date| *date <= self.end_date)
    }

    /// Number of calendar days in the period.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
