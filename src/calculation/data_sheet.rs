//! Raw punch data sheet.
//!
//! The data sheet lists each day's punches in alternating In/Out columns
//! so a reviewer can see what the device recorded. Only the boundary-pair
//! rule is applied; the slot semantics of the attendance report are not.

use chrono::NaiveTime;

use super::{collate_punches, deduplicate};
use crate::config::{CollationPolicy, DataSheetConfig, DedupStrategy};
use crate::models::{EmployeeDirectory, PunchSheetRow, RawPunch, ReportPeriod, ScheduleBook};

/// Column headers for a sheet `columns` wide: "In", "Out", "In", ...
pub fn data_sheet_columns(columns: usize) -> Vec<String> {
    (0..columns)
        .map(|i| (if i % 2 == 0 { "In" } else { "Out" }).to_string())
        .collect()
}

/// Builds one row per (employee, date) with at least one punch.
///
/// Punches beyond the configured column count are dropped. Punches of
/// employees missing from the directory are ignored.
pub fn build_data_sheet(
    punches: &[RawPunch],
    period: &ReportPeriod,
    directory: &EmployeeDirectory,
    config: &DataSheetConfig,
) -> Vec<PunchSheetRow> {
    let known: Vec<RawPunch> = punches
        .iter()
        .filter(|punch| directory.contains(&punch.employee_id))
        .cloned()
        .collect();

    let strategy = DedupStrategy::BoundaryPair {
        threshold: config.threshold,
    };

    collate_punches(&known, period, CollationPolicy::Sparse, &ScheduleBook::default())
        .into_iter()
        .filter_map(|group| {
            let employee = directory.get(&group.employee_id)?;
            let survivors = deduplicate(&group.punches, strategy).punches;
            Some(PunchSheetRow {
                employee_id: employee.id.clone(),
                full_name: employee.full_name.clone(),
                department: employee.department.clone(),
                date: group.date,
                punches: widen(survivors.iter().map(|p| p.time()), config.columns),
            })
        })
        .collect()
}

fn widen(times: impl Iterator<Item = NaiveTime>, columns: usize) -> Vec<Option<NaiveTime>> {
    let mut cells: Vec<Option<NaiveTime>> = times.take(columns).map(Some).collect();
    cells.resize(columns, None);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GapThreshold;
    use crate::models::Employee;
    use chrono::{NaiveDate, NaiveDateTime};

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn punch(employee_id: &str, timestamp: &str) -> RawPunch {
        RawPunch {
            employee_id: employee_id.to_string(),
            timestamp: make_datetime(timestamp),
        }
    }

    fn directory() -> EmployeeDirectory {
        EmployeeDirectory::new(vec![Employee {
            id: "1001".to_string(),
            full_name: "Ana Lima".to_string(),
            department: None,
        }])
    }

    fn config(columns: usize) -> DataSheetConfig {
        DataSheetConfig {
            columns,
            threshold: GapThreshold::TenMinutes,
        }
    }

    fn period() -> ReportPeriod {
        ReportPeriod::new(make_date("2025-06-02"), make_date("2025-06-03"), []).unwrap()
    }

    #[test]
    fn test_columns_alternate_in_out() {
        assert_eq!(data_sheet_columns(4), vec!["In", "Out", "In", "Out"]);
        assert_eq!(data_sheet_columns(1), vec!["In"]);
    }

    #[test]
    fn test_row_is_padded_to_column_count() {
        let punches = vec![
            punch("1001", "2025-06-02 08:58:00"),
            punch("1001", "2025-06-02 09:01:00"),
            punch("1001", "2025-06-02 17:00:00"),
        ];
        let rows = build_data_sheet(&punches, &period(), &directory(), &config(6));

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].punches,
            vec![Some(t(8, 58)), Some(t(17, 0)), None, None, None, None]
        );
    }

    #[test]
    fn test_punches_past_last_column_are_dropped() {
        let punches = vec![
            punch("1001", "2025-06-02 08:00:00"),
            punch("1001", "2025-06-02 12:00:00"),
            punch("1001", "2025-06-02 13:00:00"),
        ];
        let rows = build_data_sheet(&punches, &period(), &directory(), &config(2));
        assert_eq!(rows[0].punches, vec![Some(t(8, 0)), Some(t(12, 0))]);
    }

    #[test]
    fn test_unknown_employee_and_empty_days_have_no_rows() {
        let punches = vec![
            punch("9999", "2025-06-02 08:00:00"),
            punch("1001", "2025-06-03 08:00:00"),
        ];
        let rows = build_data_sheet(&punches, &period(), &directory(), &config(6));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, make_date("2025-06-03"));
    }
}
