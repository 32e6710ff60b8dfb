//! Holiday overtime redistribution and payroll flooring.
//!
//! Overtime worked on a public holiday is paid from its own bucket, so on a
//! holiday OT1 and OT2 move into OT3. Independently, every bucket gets a
//! floored variant at half-hour granularity for payroll.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AttendanceRecord, AuditStep, WorkDuration};

/// Floors decimal hours to the nearest half hour: `floor(h * 2) / 2`.
///
/// Negative input floors to zero. The result always carries one fraction
/// digit, so zero is `0.0`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::floor_to_half_hour;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// assert_eq!(floor_to_half_hour(dec("1.49")).to_string(), "1.0");
/// assert_eq!(floor_to_half_hour(dec("1.5")).to_string(), "1.5");
/// assert_eq!(floor_to_half_hour(Decimal::ZERO).to_string(), "0.0");
/// ```
pub fn floor_to_half_hour(hours: Decimal) -> Decimal {
    if hours <= Decimal::ZERO {
        return Decimal::new(0, 1);
    }
    let mut floored = (hours * Decimal::TWO).floor() / Decimal::TWO;
    floored.rescale(1);
    floored
}

/// Returns a copy of the record with holiday overtime moved to OT3 and the
/// floored OT variants recomputed.
///
/// The input record is never modified. On a holiday, OT3 becomes
/// OT1 + OT2 + OT3 and OT1 and OT2 become zero, so the total is conserved.
///
/// # Arguments
///
/// * `record` - A record produced by the metric calculator
/// * `holidays` - Public holiday dates, matched exactly
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```no_run
/// use attendance_engine::calculation::redistribute_overtime;
/// # fn example(record: attendance_engine::models::AttendanceRecord) {
/// let holidays = std::collections::BTreeSet::from([record.date]);
/// let redistributed = redistribute_overtime(&record, &holidays, 1);
/// assert_eq!(redistributed.total_overtime(), record.total_overtime());
/// # }
/// ```
pub fn redistribute_overtime(
    record: &AttendanceRecord,
    holidays: &BTreeSet<NaiveDate>,
    step_number: u32,
) -> AttendanceRecord {
    let mut redistributed = record.clone();
    let is_holiday = holidays.contains(&record.date);
    redistributed.is_public_holiday = is_holiday;

    if is_holiday {
        let moved = record.ot1 + record.ot2;
        redistributed.ot3 = moved + record.ot3;
        redistributed.ot1 = WorkDuration::ZERO;
        redistributed.ot2 = WorkDuration::ZERO;

        if !moved.is_zero() {
            debug!(
                employee_id = %record.employee_id,
                date = %record.date,
                ot3 = %redistributed.ot3,
                "Moved holiday overtime to OT3"
            );
            redistributed.audit.push(AuditStep {
                step_number,
                rule_id: "holiday_overtime_redistribution".to_string(),
                rule_name: "Holiday Overtime Redistribution".to_string(),
                input: serde_json::json!({
                    "date": record.date,
                    "ot1": record.ot1,
                    "ot2": record.ot2,
                    "ot3": record.ot3,
                }),
                output: serde_json::json!({
                    "ot1": redistributed.ot1,
                    "ot2": redistributed.ot2,
                    "ot3": redistributed.ot3,
                }),
                reasoning: format!(
                    "{} is a public holiday: {} of overtime moved to OT3",
                    record.date, moved
                ),
            });
        }
    }

    redistributed.ot1_floored = floor_to_half_hour(redistributed.ot1.decimal_hours());
    redistributed.ot2_floored = floor_to_half_hour(redistributed.ot2.decimal_hours());
    redistributed.ot3_floored = floor_to_half_hour(redistributed.ot3.decimal_hours());

    redistributed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::DayType;
    use crate::models::{AttendanceFlags, CanonicalSlots, PayrollColumns, ShiftKind};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn hm(s: &str) -> WorkDuration {
        s.parse().unwrap()
    }

    fn record_with_overtime(date: &str, ot1: &str, ot2: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "1001".to_string(),
            full_name: "Ana Lima".to_string(),
            department: None,
            date: make_date(date),
            weekday_label: "Thur.".to_string(),
            day_type: DayType::Weekday,
            is_public_holiday: false,
            timetable: None,
            shift_kind: ShiftKind::Standard,
            required_work_time: WorkDuration::ZERO,
            start_work_time: None,
            end_work_time: None,
            slots: CanonicalSlots::default(),
            extra_punches: vec![],
            late_clock_in: WorkDuration::ZERO,
            early_clock_in: WorkDuration::ZERO,
            early_clock_out: WorkDuration::ZERO,
            break_duration: WorkDuration::ZERO,
            work_time: WorkDuration::ZERO,
            absent: WorkDuration::ZERO,
            ot1: hm(ot1),
            ot2: hm(ot2),
            ot3: WorkDuration::ZERO,
            ot1_floored: dec("0.0"),
            ot2_floored: dec("0.0"),
            ot3_floored: dec("0.0"),
            payroll: PayrollColumns {
                total_base: dec("1.0"),
                day: None,
                total_day: dec("1.0"),
                night_shift: dec("0.0"),
            },
            flags: AttendanceFlags::default(),
            audit: vec![],
        }
    }

    // ==========================================================================
    // Floor to half hour
    // ==========================================================================

    #[test]
    fn test_floor_exact_half_hours() {
        assert_eq!(floor_to_half_hour(dec("2.5")), dec("2.5"));
        assert_eq!(floor_to_half_hour(dec("3")), dec("3.0"));
    }

    #[test]
    fn test_floor_rounds_down() {
        assert_eq!(floor_to_half_hour(dec("1.4999")), dec("1.0"));
        assert_eq!(floor_to_half_hour(dec("1.9833")), dec("1.5"));
    }

    #[test]
    fn test_floor_zero_is_positive_zero() {
        let floored = floor_to_half_hour(Decimal::ZERO);
        assert_eq!(floored.to_string(), "0.0");
        assert!(!floored.is_sign_negative());
    }

    #[test]
    fn test_floor_negative_is_zero() {
        assert_eq!(floor_to_half_hour(dec("-0.25")).to_string(), "0.0");
    }

    // ==========================================================================
    // Redistribution
    // ==========================================================================

    #[test]
    fn test_holiday_moves_ot1_to_ot3() {
        let record = record_with_overtime("2025-12-25", "01:00", "00:00");
        let holidays = BTreeSet::from([make_date("2025-12-25")]);

        let result = redistribute_overtime(&record, &holidays, 1);

        assert_eq!(result.ot1, WorkDuration::ZERO);
        assert_eq!(result.ot2, WorkDuration::ZERO);
        assert_eq!(result.ot3.to_string(), "01:00");
        assert_eq!(result.ot3_floored, dec("1.0"));
        assert!(result.is_public_holiday);
        assert_eq!(result.audit.len(), 1);
        assert_eq!(result.audit[0].rule_id, "holiday_overtime_redistribution");
    }

    #[test]
    fn test_input_record_is_not_mutated() {
        let record = record_with_overtime("2025-12-25", "01:00", "00:00");
        let holidays = BTreeSet::from([make_date("2025-12-25")]);

        let _ = redistribute_overtime(&record, &holidays, 1);

        assert_eq!(record.ot1.to_string(), "01:00");
        assert!(record.audit.is_empty());
    }

    #[test]
    fn test_non_holiday_passes_through_with_floors() {
        let record = record_with_overtime("2025-12-24", "01:40", "00:00");
        let holidays = BTreeSet::from([make_date("2025-12-25")]);

        let result = redistribute_overtime(&record, &holidays, 1);

        assert_eq!(result.ot1.to_string(), "01:40");
        assert_eq!(result.ot1_floored, dec("1.5"));
        assert_eq!(result.ot2_floored, dec("0.0"));
        assert_eq!(result.ot3, WorkDuration::ZERO);
        assert!(!result.is_public_holiday);
        assert!(result.audit.is_empty());
    }

    #[test]
    fn test_holiday_conserves_total_overtime() {
        let record = record_with_overtime("2025-05-01", "00:00", "02:20");
        let holidays = BTreeSet::from([make_date("2025-05-01")]);

        let result = redistribute_overtime(&record, &holidays, 1);

        assert_eq!(result.total_overtime(), record.total_overtime());
        assert_eq!(result.ot3_floored, dec("2.0"));
    }

    #[test]
    fn test_holiday_without_overtime_adds_no_audit_step() {
        let record = record_with_overtime("2025-05-01", "00:00", "00:00");
        let holidays = BTreeSet::from([make_date("2025-05-01")]);

        let result = redistribute_overtime(&record, &holidays, 1);

        assert!(result.is_public_holiday);
        assert!(result.audit.is_empty());
    }
}
