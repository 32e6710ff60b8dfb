//! The per-group resolution pipeline.
//!
//! Each (employee, date) group runs through the stages in order:
//! deduplicate, assign slots, remap for the shift type, compute metrics,
//! redistribute holiday overtime. Every stage consumes the previous
//! stage's output and builds a new value; groups share nothing but the
//! read-only directory and schedule lookups.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{
    DailyMetrics, DayType, MetricInputs, adjust_for_shift, assign_slots, collate_punches,
    deduplicate, detect_daily_overtime, get_day_type, redistribute_overtime, weekday_label,
};
use crate::config::{CollationPolicy, DedupStrategy, MetricsConfig, ShiftRules};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceFlags, AttendanceRecord, AuditStep, CanonicalSlots, DailyPunchSet, Employee,
    EmployeeDirectory, PayrollColumns, RawPunch, ReportPeriod, ScheduleBook, ScheduledTimetable,
    ShiftKind, WorkDuration,
};

/// Settings that drive one resolution run.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionOptions<'a> {
    /// The near-duplicate punch rule.
    pub strategy: DedupStrategy,
    /// Punches retained per day.
    pub slot_capacity: usize,
    /// Sparse or dense collation.
    pub policy: CollationPolicy,
    /// Metric constants.
    pub metrics: &'a MetricsConfig,
    /// Shift remapping keywords.
    pub shift_rules: &'a ShiftRules,
}

/// The records of one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOutcome {
    /// Records ordered by employee id, then date.
    pub records: Vec<AttendanceRecord>,
    /// Punches skipped because their employee is not in the directory.
    pub unknown_employee_punches: usize,
}

/// Resolves raw punches into attendance records for a period.
///
/// # Errors
///
/// Returns [`EngineError::NoAttendanceData`] when no punch of a known
/// employee falls inside the period, and [`EngineError::InvalidConfig`]
/// for a zero slot capacity.
pub fn resolve_attendance(
    punches: &[RawPunch],
    period: &ReportPeriod,
    directory: &EmployeeDirectory,
    schedule: &ScheduleBook,
    options: &ResolutionOptions<'_>,
) -> EngineResult<ResolutionOutcome> {
    if options.slot_capacity == 0 {
        return Err(EngineError::InvalidConfig {
            field: "slots.capacity".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let (known, unknown_employee_punches) = partition_known_punches(punches, directory);

    if !known.iter().any(|punch| period.contains_date(punch.date())) {
        return Err(EngineError::NoAttendanceData {
            start: period.start_date,
            end: period.end_date,
        });
    }

    let groups = collate_punches(&known, period, options.policy, schedule);

    let mut records = Vec::with_capacity(groups.len());
    for group in &groups {
        let Some(employee) = directory.get(&group.employee_id) else {
            debug!(
                employee_id = %group.employee_id,
                date = %group.date,
                "Skipping scheduled day for employee missing from directory"
            );
            continue;
        };
        let timetable = schedule.timetable_for(&group.employee_id, group.date);
        records.push(resolve_day(
            group,
            employee,
            timetable,
            &period.public_holidays,
            options,
        ));
    }

    records.sort_by(|a, b| (&a.employee_id, a.date).cmp(&(&b.employee_id, b.date)));

    Ok(ResolutionOutcome {
        records,
        unknown_employee_punches,
    })
}

/// Splits off punches whose employee is not enrolled, warning once per id.
fn partition_known_punches(
    punches: &[RawPunch],
    directory: &EmployeeDirectory,
) -> (Vec<RawPunch>, usize) {
    let mut known = Vec::with_capacity(punches.len());
    let mut unknown_ids = BTreeSet::new();
    let mut unknown = 0;

    for punch in punches {
        if directory.contains(&punch.employee_id) {
            known.push(punch.clone());
        } else {
            unknown += 1;
            if unknown_ids.insert(punch.employee_id.as_str()) {
                warn!(employee_id = %punch.employee_id, "Skipping punches for unknown employee");
            }
        }
    }

    (known, unknown)
}

/// Runs every stage for one (employee, date) group.
pub fn resolve_day(
    group: &DailyPunchSet,
    employee: &Employee,
    timetable: Option<&ScheduledTimetable>,
    holidays: &BTreeSet<NaiveDate>,
    options: &ResolutionOptions<'_>,
) -> AttendanceRecord {
    let mut audit = AuditTrail::default();

    let dedup = deduplicate(&group.punches, options.strategy);
    for removal in &dedup.removals {
        let step_number = audit.next_step();
        audit.push(AuditStep {
            step_number,
            rule_id: "punch_deduplication".to_string(),
            rule_name: "Near-Duplicate Punch Removal".to_string(),
            input: serde_json::json!({
                "kept": removal.kept,
                "removed": removal.removed,
                "gap_seconds": removal.gap_seconds,
            }),
            output: serde_json::json!({ "rule": removal.rule }),
            reasoning: format!(
                "Punch at {} is {}s from {}, under the {} threshold",
                removal.removed.time(),
                removal.gap_seconds,
                removal.kept.time(),
                removal.threshold
            ),
        });
    }

    let assignment = assign_slots(&dedup.punches, options.slot_capacity);
    if !assignment.truncated.is_empty() {
        let step_number = audit.next_step();
        audit.push(AuditStep {
            step_number,
            rule_id: "slot_capacity_truncation".to_string(),
            rule_name: "Slot Capacity Truncation".to_string(),
            input: serde_json::json!({
                "capacity": options.slot_capacity,
                "surviving_punches": dedup.punches.len(),
            }),
            output: serde_json::json!({ "discarded": assignment.truncated }),
            reasoning: format!(
                "{} punches survived deduplication but only {} are kept per day",
                dedup.punches.len(),
                options.slot_capacity
            ),
        });
    }

    let timetable_name = timetable.map(|tt| tt.name.as_str());
    let adjustment = adjust_for_shift(
        assignment.slots,
        timetable_name,
        options.shift_rules,
        audit.peek_step(),
    );
    if let Some(step) = adjustment.audit_step {
        audit.next_step();
        audit.push(step);
    }

    let day_type = get_day_type(group.date);
    let metrics = DailyMetrics::compute(&MetricInputs {
        slots: &adjustment.slots,
        timetable,
        day_type,
        unpaid_break: WorkDuration::from_minutes(options.metrics.unpaid_break_minutes),
    });

    if timetable.is_some() && !(metrics.ot1 + metrics.ot2).is_zero() {
        let step_number = audit.next_step();
        let detection = detect_daily_overtime(
            metrics.work_time,
            metrics.required_work_time,
            day_type,
            step_number,
        );
        audit.push(detection.audit_step);
    }

    let flags = AttendanceFlags {
        suspicious_early_clock_in: metrics.early_clock_in.minutes()
            > options.metrics.suspicious_early_clock_in_minutes,
        incomplete_punches: has_incomplete_pattern(&adjustment.slots),
        truncated_punches: assignment.truncated.len(),
    };

    let payroll = payroll_columns(
        day_type,
        &adjustment.slots,
        adjustment.kind,
        options.metrics.night_shift_allowance,
    );

    let record = AttendanceRecord {
        employee_id: employee.id.clone(),
        full_name: employee.full_name.clone(),
        department: employee.department.clone(),
        date: group.date,
        weekday_label: weekday_label(group.date).to_string(),
        day_type,
        is_public_holiday: false,
        timetable: timetable.map(|tt| tt.name.clone()),
        shift_kind: adjustment.kind,
        required_work_time: metrics.required_work_time,
        start_work_time: timetable.map(|tt| tt.start_time),
        end_work_time: timetable.map(|tt| tt.end_time),
        slots: adjustment.slots,
        extra_punches: assignment.extra_punches,
        late_clock_in: metrics.late_clock_in,
        early_clock_in: metrics.early_clock_in,
        early_clock_out: metrics.early_clock_out,
        break_duration: metrics.break_duration,
        work_time: metrics.work_time,
        absent: metrics.absent,
        ot1: metrics.ot1,
        ot2: metrics.ot2,
        ot3: metrics.ot3,
        ot1_floored: Decimal::new(0, 1),
        ot2_floored: Decimal::new(0, 1),
        ot3_floored: Decimal::new(0, 1),
        payroll,
        flags,
        audit: audit.into_steps(),
    };

    let step_number = record.audit.len() as u32 + 1;
    redistribute_overtime(&record, holidays, step_number)
}

/// Only a Clock-In, or Clock-In, Clock-Out and In without an Out.
fn has_incomplete_pattern(slots: &CanonicalSlots) -> bool {
    let clock_in_only = slots.clock_in.is_some()
        && slots.clock_out.is_none()
        && slots.in_.is_none()
        && slots.out.is_none();
    let missing_out = slots.clock_in.is_some()
        && slots.clock_out.is_some()
        && slots.in_.is_some()
        && slots.out.is_none();
    clock_in_only || missing_out
}

fn payroll_columns(
    day_type: DayType,
    slots: &CanonicalSlots,
    kind: ShiftKind,
    night_shift_allowance: Decimal,
) -> PayrollColumns {
    let one = Decimal::new(10, 1);
    let zero = Decimal::new(0, 1);
    let is_sunday = day_type == DayType::Sunday;

    PayrollColumns {
        total_base: if is_sunday { zero } else { one },
        day: (slots.shows_attendance() && !is_sunday).then_some(one),
        total_day: one,
        night_shift: if kind == ShiftKind::Night {
            night_shift_allowance
        } else {
            zero
        },
    }
}

/// Collects audit steps with sequential numbers starting at 1.
#[derive(Debug, Default)]
struct AuditTrail {
    steps: Vec<AuditStep>,
    issued: u32,
}

impl AuditTrail {
    fn peek_step(&self) -> u32 {
        self.issued + 1
    }

    fn next_step(&mut self) -> u32 {
        self.issued += 1;
        self.issued
    }

    fn push(&mut self, step: AuditStep) {
        self.steps.push(step);
    }

    fn into_steps(self) -> Vec<AuditStep> {
        self.steps
    }
}
