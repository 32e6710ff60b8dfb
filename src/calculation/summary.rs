//! Per-employee totals.
//!
//! Builds the TOTAL row printed under each employee's block of daily
//! records. Duration columns are summed as minutes; overtime is also
//! reported as decimal hours with one fraction digit.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AttendanceRecord, EmployeeSummary, WorkDuration};

/// Summarizes records, one summary per employee.
///
/// Records must be ordered by employee id; summaries come out in the same
/// order.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::summarize_records;
///
/// assert!(summarize_records(&[]).is_empty());
/// ```
pub fn summarize_records(records: &[AttendanceRecord]) -> Vec<EmployeeSummary> {
    records
        .chunk_by(|a, b| a.employee_id == b.employee_id)
        .map(summarize_employee)
        .collect()
}

fn summarize_employee(records: &[AttendanceRecord]) -> EmployeeSummary {
    let first = &records[0];
    let total = |f: fn(&AttendanceRecord) -> WorkDuration| -> WorkDuration {
        records.iter().map(f).sum()
    };
    let sum_decimal = |f: fn(&AttendanceRecord) -> Decimal| -> Decimal {
        let mut sum: Decimal = records.iter().map(f).sum();
        sum.rescale(1);
        sum
    };

    let ot1 = total(|r| r.ot1);
    let ot2 = total(|r| r.ot2);
    let ot3 = total(|r| r.ot3);

    EmployeeSummary {
        employee_id: first.employee_id.clone(),
        full_name: first.full_name.clone(),
        department: first.department.clone(),
        required_work_time: total(|r| r.required_work_time),
        work_time: total(|r| r.work_time),
        break_duration: total(|r| r.break_duration),
        absent: total(|r| r.absent),
        late_clock_in: total(|r| r.late_clock_in),
        early_clock_in: total(|r| r.early_clock_in),
        early_clock_out: total(|r| r.early_clock_out),
        ot1_hours: one_decimal_hours(ot1),
        ot2_hours: one_decimal_hours(ot2),
        ot3_hours: one_decimal_hours(ot3),
        ot1_floored: sum_decimal(|r| r.ot1_floored),
        ot2_floored: sum_decimal(|r| r.ot2_floored),
        ot3_floored: sum_decimal(|r| r.ot3_floored),
        total_base: sum_decimal(|r| r.payroll.total_base),
        day: sum_decimal(|r| r.payroll.day.unwrap_or_default()),
        total_day: sum_decimal(|r| r.payroll.total_day),
        night_shift: sum_decimal(|r| r.payroll.night_shift),
        days_worked: records.iter().filter(|r| r.slots.shows_attendance()).count(),
        days_scheduled: records.iter().filter(|r| r.timetable.is_some()).count(),
        flagged_days: records.iter().filter(|r| r.flags.any()).count(),
    }
}

/// Decimal hours rounded half away from zero to one fraction digit.
fn one_decimal_hours(duration: WorkDuration) -> Decimal {
    let mut hours = duration
        .decimal_hours()
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    hours.rescale(1);
    hours
}
