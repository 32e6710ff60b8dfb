//! Punch collation.
//!
//! This module turns raw device rows into per-(employee, date) punch
//! sequences restricted to a report period, and resolves the end date of
//! a report when the caller omits it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::{CollationPolicy, EndDateDefault};
use crate::models::{DailyPunchSet, RawPunch, RawPunchRow, ReportPeriod, ScheduleBook};

/// Raw rows after parsing, with the count of rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPunches {
    /// Rows that parsed into punches, in input order.
    pub punches: Vec<RawPunch>,
    /// Rows with a blank employee id or an unreadable timestamp.
    pub skipped_rows: usize,
}

/// Parses raw device rows, dropping malformed ones.
///
/// A malformed row is logged and skipped; it never aborts the batch.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::parse_punch_rows;
/// use attendance_engine::models::RawPunchRow;
///
/// let rows = vec![
///     RawPunchRow { employee_id: "1001".into(), timestamp: "2025-06-02 08:58:00".into() },
///     RawPunchRow { employee_id: "1001".into(), timestamp: "garbage".into() },
/// ];
/// let parsed = parse_punch_rows(&rows);
/// assert_eq!(parsed.punches.len(), 1);
/// assert_eq!(parsed.skipped_rows, 1);
/// ```
pub fn parse_punch_rows(rows: &[RawPunchRow]) -> ParsedPunches {
    let mut parsed = ParsedPunches::default();

    for (index, row) in rows.iter().enumerate() {
        match row.parse() {
            Some(punch) => parsed.punches.push(punch),
            None => {
                warn!(
                    row = index,
                    employee_id = %row.employee_id,
                    timestamp = %row.timestamp,
                    "Dropping malformed punch row"
                );
                parsed.skipped_rows += 1;
            }
        }
    }

    parsed
}

/// Groups punches by employee and calendar day within a period.
///
/// The calendar day comes from each punch's own timestamp. Punches inside
/// a group are ordered by full timestamp. Under [`CollationPolicy::Dense`]
/// every date of the period is emitted, possibly empty, for each employee
/// with a punch or a schedule entry inside the period.
///
/// The result is ordered by employee id, then date.
pub fn collate_punches(
    punches: &[RawPunch],
    period: &ReportPeriod,
    policy: CollationPolicy,
    schedule: &ScheduleBook,
) -> Vec<DailyPunchSet> {
    let mut groups: BTreeMap<(String, NaiveDate), DailyPunchSet> = BTreeMap::new();

    for punch in punches.iter().filter(|p| period.contains_date(p.date())) {
        groups
            .entry((punch.employee_id.clone(), punch.date()))
            .or_insert_with(|| DailyPunchSet::empty(punch.employee_id.clone(), punch.date()))
            .punches
            .push(punch.timestamp);
    }

    if policy == CollationPolicy::Dense {
        let mut employees: BTreeSet<String> = groups.keys().map(|(id, _)| id.clone()).collect();
        employees.extend(schedule.employees_scheduled_between(period.start_date, period.end_date));

        for employee_id in &employees {
            for date in period.dates() {
                groups
                    .entry((employee_id.clone(), date))
                    .or_insert_with(|| DailyPunchSet::empty(employee_id.clone(), date));
            }
        }
    }

    let mut sets: Vec<DailyPunchSet> = groups.into_values().collect();
    for set in &mut sets {
        set.punches.sort();
    }

    debug!(
        groups = sets.len(),
        policy = ?policy,
        start = %period.start_date,
        end = %period.end_date,
        "Collated punches"
    );

    sets
}

/// Resolves the last date of a report.
///
/// An explicit end date is returned as given. Otherwise
/// [`EndDateDefault::StartDate`] yields the start date and
/// [`EndDateDefault::LatestAvailable`] yields the latest punch or schedule
/// date, never earlier than the start date.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::resolve_end_date;
/// use attendance_engine::config::EndDateDefault;
/// use attendance_engine::models::ScheduleBook;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let end = resolve_end_date(start, None, EndDateDefault::StartDate, &[], &ScheduleBook::default());
/// assert_eq!(end, start);
/// ```
pub fn resolve_end_date(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    default: EndDateDefault,
    punches: &[RawPunch],
    schedule: &ScheduleBook,
) -> NaiveDate {
    if let Some(end_date) = end_date {
        return end_date;
    }

    match default {
        EndDateDefault::StartDate => start_date,
        EndDateDefault::LatestAvailable => {
            let latest_punch = punches.iter().map(RawPunch::date).max();
            [latest_punch, schedule.latest_date()]
                .into_iter()
                .flatten()
                .max()
                .map_or(start_date, |latest| latest.max(start_date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScheduleEntry, ScheduledTimetable};
    use chrono::{NaiveDateTime, NaiveTime};

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn punch(employee_id: &str, timestamp: &str) -> RawPunch {
        RawPunch {
            employee_id: employee_id.to_string(),
            timestamp: make_datetime(timestamp),
        }
    }

    fn period(start: &str, end: &str) -> ReportPeriod {
        ReportPeriod::new(make_date(start), make_date(end), []).unwrap()
    }

    fn schedule_entry(employee_id: &str, date: &str) -> ScheduleEntry {
        ScheduleEntry {
            employee_id: employee_id.to_string(),
            date: make_date(date),
            timetable: ScheduledTimetable {
                name: "DAY (09:00 - 18:00)".to_string(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            },
        }
    }

    // ==========================================================================
    // Row parsing
    // ==========================================================================

    #[test]
    fn test_parse_rows_counts_skipped() {
        let rows = vec![
            RawPunchRow {
                employee_id: "1001".to_string(),
                timestamp: "2025-06-02 08:00:00".to_string(),
            },
            RawPunchRow {
                employee_id: "".to_string(),
                timestamp: "2025-06-02 09:00:00".to_string(),
            },
            RawPunchRow {
                employee_id: "1002".to_string(),
                timestamp: "2025-06-02 25:00:00".to_string(),
            },
        ];
        let parsed = parse_punch_rows(&rows);
        assert_eq!(parsed.punches.len(), 1);
        assert_eq!(parsed.skipped_rows, 2);
    }

    // ==========================================================================
    // Sparse collation
    // ==========================================================================

    #[test]
    fn test_sparse_groups_only_days_with_punches() {
        let punches = vec![
            punch("1001", "2025-06-03 17:00:00"),
            punch("1001", "2025-06-03 08:00:00"),
            punch("1001", "2025-06-05 08:00:00"),
        ];
        let sets = collate_punches(
            &punches,
            &period("2025-06-01", "2025-06-07"),
            CollationPolicy::Sparse,
            &ScheduleBook::default(),
        );

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].date, make_date("2025-06-03"));
        assert_eq!(
            sets[0].punches,
            vec![
                make_datetime("2025-06-03 08:00:00"),
                make_datetime("2025-06-03 17:00:00")
            ]
        );
        assert_eq!(sets[1].date, make_date("2025-06-05"));
    }

    #[test]
    fn test_punches_outside_range_are_excluded() {
        let punches = vec![
            punch("1001", "2025-05-31 23:59:59"),
            punch("1001", "2025-06-01 00:00:00"),
            punch("1001", "2025-06-08 00:00:00"),
        ];
        let sets = collate_punches(
            &punches,
            &period("2025-06-01", "2025-06-07"),
            CollationPolicy::Sparse,
            &ScheduleBook::default(),
        );
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].punches.len(), 1);
    }

    #[test]
    fn test_groups_ordered_by_employee_then_date() {
        let punches = vec![
            punch("1002", "2025-06-02 08:00:00"),
            punch("1001", "2025-06-03 08:00:00"),
            punch("1001", "2025-06-02 08:00:00"),
        ];
        let sets = collate_punches(
            &punches,
            &period("2025-06-01", "2025-06-07"),
            CollationPolicy::Sparse,
            &ScheduleBook::default(),
        );
        let keys: Vec<_> = sets
            .iter()
            .map(|s| (s.employee_id.as_str(), s.date.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("1001", "2025-06-02".to_string()),
                ("1001", "2025-06-03".to_string()),
                ("1002", "2025-06-02".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_punch_appears_in_two_groups() {
        let punches = vec![
            punch("1001", "2025-06-02 23:59:00"),
            punch("1001", "2025-06-03 00:01:00"),
        ];
        let sets = collate_punches(
            &punches,
            &period("2025-06-01", "2025-06-07"),
            CollationPolicy::Sparse,
            &ScheduleBook::default(),
        );
        let total: usize = sets.iter().map(|s| s.punches.len()).sum();
        assert_eq!(total, punches.len());
    }

    // ==========================================================================
    // Dense collation
    // ==========================================================================

    #[test]
    fn test_dense_fills_every_date() {
        let punches = vec![punch("1001", "2025-06-03 08:00:00")];
        let sets = collate_punches(
            &punches,
            &period("2025-06-01", "2025-06-07"),
            CollationPolicy::Dense,
            &ScheduleBook::default(),
        );
        assert_eq!(sets.len(), 7);
        assert_eq!(sets.iter().filter(|s| s.is_empty()).count(), 6);
    }

    #[test]
    fn test_dense_includes_scheduled_employee_without_punches() {
        let punches = vec![punch("1001", "2025-06-03 08:00:00")];
        let schedule = ScheduleBook::from_entries(vec![
            schedule_entry("1002", "2025-06-04"),
            schedule_entry("1003", "2025-07-01"),
        ]);
        let sets = collate_punches(
            &punches,
            &period("2025-06-01", "2025-06-03"),
            CollationPolicy::Dense,
            &schedule,
        );
        // 1002 is scheduled on 06-04, outside the range, so only 1001 appears.
        assert_eq!(sets.len(), 3);

        let sets = collate_punches(
            &punches,
            &period("2025-06-01", "2025-06-07"),
            CollationPolicy::Dense,
            &schedule,
        );
        assert_eq!(sets.len(), 14);
        assert!(sets.iter().any(|s| s.employee_id == "1002"));
        assert!(!sets.iter().any(|s| s.employee_id == "1003"));
    }

    // ==========================================================================
    // End date resolution
    // ==========================================================================

    #[test]
    fn test_explicit_end_date_wins() {
        let end = resolve_end_date(
            make_date("2025-06-01"),
            Some(make_date("2025-06-10")),
            EndDateDefault::LatestAvailable,
            &[punch("1001", "2025-06-20 08:00:00")],
            &ScheduleBook::default(),
        );
        assert_eq!(end, make_date("2025-06-10"));
    }

    #[test]
    fn test_latest_available_uses_punches_and_schedule() {
        let schedule = ScheduleBook::from_entries(vec![schedule_entry("1001", "2025-06-25")]);
        let end = resolve_end_date(
            make_date("2025-06-01"),
            None,
            EndDateDefault::LatestAvailable,
            &[punch("1001", "2025-06-20 08:00:00")],
            &schedule,
        );
        assert_eq!(end, make_date("2025-06-25"));
    }

    #[test]
    fn test_latest_available_never_before_start() {
        let end = resolve_end_date(
            make_date("2025-06-01"),
            None,
            EndDateDefault::LatestAvailable,
            &[punch("1001", "2025-05-20 08:00:00")],
            &ScheduleBook::default(),
        );
        assert_eq!(end, make_date("2025-06-01"));
    }
}
