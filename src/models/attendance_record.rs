//! Attendance record models.
//!
//! This module contains the [`AttendanceRecord`] produced for every
//! (employee, date) group, together with the report-level types built
//! from those records: [`EmployeeSummary`], [`AttendanceReport`] and the
//! raw punch data sheet rows.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CanonicalSlots, ReportPeriod, ShiftKind, WorkDuration};
use crate::calculation::DayType;

/// A single step in a record's audit trail.
///
/// Each step captures the input, output, and reasoning for one stage
/// decision (a dedup removal, a shift remap, a holiday redistribution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number within the record.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Per-day payroll counters carried next to the time metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollColumns {
    /// 1.0 on every day except Sunday.
    pub total_base: Decimal,
    /// 1.0 when the employee punched Clock-In or Clock-Out on a non-Sunday.
    pub day: Option<Decimal>,
    /// Always 1.0; counts calendar days in the report.
    pub total_day: Decimal,
    /// The night shift allowance when the timetable is a night shift.
    pub night_shift: Decimal,
}

/// Conditions a reviewer should look at before the record reaches payroll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFlags {
    /// Early Clock In is longer than the configured limit.
    pub suspicious_early_clock_in: bool,
    /// The punch pattern is missing its closing punch.
    pub incomplete_punches: bool,
    /// Punches discarded because the day exceeded the slot capacity.
    pub truncated_punches: usize,
}

impl AttendanceFlags {
    /// Returns true if any flag is raised.
    pub fn any(&self) -> bool {
        self.suspicious_early_clock_in || self.incomplete_punches || self.truncated_punches > 0
    }
}

/// The fully resolved attendance of one employee on one day.
///
/// Records are never mutated after the metric calculator builds them;
/// holiday redistribution produces a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee's device PIN.
    pub employee_id: String,
    /// The employee's display name.
    pub full_name: String,
    /// The employee's department, if any.
    pub department: Option<String>,
    /// The calendar day of the record.
    pub date: NaiveDate,
    /// Short weekday label as printed on reports ("Mon.", "Tues.", ...).
    pub weekday_label: String,
    /// Weekday, Saturday or Sunday.
    pub day_type: DayType,
    /// True if the date is a supplied public holiday.
    pub is_public_holiday: bool,
    /// The scheduled timetable name, if a schedule entry exists.
    pub timetable: Option<String>,
    /// How the timetable reordered the punch slots.
    pub shift_kind: ShiftKind,
    /// Scheduled span minus the unpaid break.
    pub required_work_time: WorkDuration,
    /// Scheduled start of work.
    pub start_work_time: Option<NaiveTime>,
    /// Scheduled end of work.
    pub end_work_time: Option<NaiveTime>,
    /// The canonical punch slots after shift adjustment.
    #[serde(flatten)]
    pub slots: CanonicalSlots,
    /// Retained punches beyond the four canonical slots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_punches: Vec<NaiveTime>,
    /// Clock-In past the scheduled start.
    pub late_clock_in: WorkDuration,
    /// Clock-In before the scheduled start.
    pub early_clock_in: WorkDuration,
    /// Final out before the scheduled end.
    pub early_clock_out: WorkDuration,
    /// Clock-Out to In.
    #[serde(rename = "break")]
    pub break_duration: WorkDuration,
    /// Clock-In to final out, less the unpaid break.
    pub work_time: WorkDuration,
    /// Required Work Time on a scheduled day without attendance.
    pub absent: WorkDuration,
    /// Weekday overtime.
    pub ot1: WorkDuration,
    /// Weekend overtime.
    pub ot2: WorkDuration,
    /// Public holiday overtime.
    pub ot3: WorkDuration,
    /// OT1 in hours, floored to the half hour.
    pub ot1_floored: Decimal,
    /// OT2 in hours, floored to the half hour.
    pub ot2_floored: Decimal,
    /// OT3 in hours, floored to the half hour.
    pub ot3_floored: Decimal,
    /// Payroll day counters.
    pub payroll: PayrollColumns,
    /// Review flags.
    pub flags: AttendanceFlags,
    /// Decisions taken while resolving the record.
    pub audit: Vec<AuditStep>,
}

impl AttendanceRecord {
    /// Total overtime across all three buckets.
    pub fn total_overtime(&self) -> WorkDuration {
        self.ot1 + self.ot2 + self.ot3
    }
}

/// Per-employee totals, printed as the TOTAL row under each employee block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// The device enrolment number.
    pub employee_id: String,
    /// The employee's full name.
    pub full_name: String,
    /// The department, if known.
    pub department: Option<String>,
    /// Sum of Required Work Time.
    pub required_work_time: WorkDuration,
    /// Sum of Work Time.
    pub work_time: WorkDuration,
    /// Sum of Break.
    #[serde(rename = "break")]
    pub break_duration: WorkDuration,
    /// Sum of Absent.
    pub absent: WorkDuration,
    /// Sum of Late Clock In.
    pub late_clock_in: WorkDuration,
    /// Sum of Early Clock In.
    pub early_clock_in: WorkDuration,
    /// Sum of Early Clock Out.
    pub early_clock_out: WorkDuration,
    /// OT1 in decimal hours, one fraction digit.
    pub ot1_hours: Decimal,
    /// OT2 in decimal hours, one fraction digit.
    pub ot2_hours: Decimal,
    /// OT3 in decimal hours, one fraction digit.
    pub ot3_hours: Decimal,
    /// Sum of floored OT1.
    pub ot1_floored: Decimal,
    /// Sum of floored OT2.
    pub ot2_floored: Decimal,
    /// Sum of floored OT3.
    pub ot3_floored: Decimal,
    /// Sum of the total base column.
    pub total_base: Decimal,
    /// Sum of the day column.
    pub day: Decimal,
    /// Sum of the total day column.
    pub total_day: Decimal,
    /// Sum of night shift allowances.
    pub night_shift: Decimal,
    /// Days with a Clock-In or Clock-Out punch.
    pub days_worked: usize,
    /// Days with a schedule entry.
    pub days_scheduled: usize,
    /// Days with at least one review flag.
    pub flagged_days: usize,
}

/// The complete output of a report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// Unique identifier for this report.
    pub report_id: Uuid,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that produced the report.
    pub engine_version: String,
    /// The company name shown in the report header.
    pub company_name: String,
    /// The resolved date range.
    pub period: ReportPeriod,
    /// Records ordered by employee id, then date.
    pub records: Vec<AttendanceRecord>,
    /// One summary per employee, in the same order as the records.
    pub summaries: Vec<EmployeeSummary>,
    /// Input rows dropped as malformed or unknown.
    pub skipped_punch_rows: usize,
}

/// One row of the raw punch data sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchSheetRow {
    /// The device enrolment number.
    pub employee_id: String,
    /// The employee's full name.
    pub full_name: String,
    /// The department, if known.
    pub department: Option<String>,
    /// The calendar date of the punches.
    pub date: NaiveDate,
    /// Punch times in alternating In/Out columns, `None` where empty.
    pub punches: Vec<Option<NaiveTime>>,
}

/// The raw punch data sheet returned by the data sheet endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchDataSheet {
    /// Unique identifier for this sheet.
    pub report_id: Uuid,
    /// When the sheet was generated.
    pub generated_at: DateTime<Utc>,
    /// The company name shown in the header.
    pub company_name: String,
    /// The resolved date range.
    pub period: ReportPeriod,
    /// Column headers ("In", "Out", "In", ...).
    pub columns: Vec<String>,
    /// Rows ordered by employee id, then date.
    pub rows: Vec<PunchSheetRow>,
    /// Input rows dropped as malformed or unknown.
    pub skipped_punch_rows: usize,
}
