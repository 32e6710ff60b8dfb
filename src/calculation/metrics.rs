//! Attendance metric calculation.
//!
//! Every derived column of an attendance record is a [`MetricField`] with
//! its own computation. The field set is fixed, so the calculator selects
//! each computation by variant instead of by column name.
//!
//! All time arithmetic works on time of day. Break, Required Work Time and
//! Work Time treat a later time that is smaller than the reference as
//! having wrapped past midnight. Late Clock In, Early Clock In and Early
//! Clock Out compare times of day directly. Every result is clamped at
//! zero and truncated to whole minutes.

use serde::{Deserialize, Serialize};

use super::{DayType, split_overtime};
use crate::models::{
    CanonicalSlots, ScheduledTimetable, WorkDuration, wrapped_seconds_between,
};

/// The inputs every metric is computed from.
#[derive(Debug, Clone, Copy)]
pub struct MetricInputs<'a> {
    /// Slots after shift-type remapping.
    pub slots: &'a CanonicalSlots,
    /// The scheduled timetable, if any.
    pub timetable: Option<&'a ScheduledTimetable>,
    /// Selects the overtime bucket.
    pub day_type: DayType,
    /// Deducted from Required Work Time and Work Time.
    pub unpaid_break: WorkDuration,
}

/// A derived attendance column.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{DayType, MetricField, MetricInputs};
/// use attendance_engine::models::{CanonicalSlots, ScheduledTimetable, WorkDuration};
/// use chrono::NaiveTime;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let timetable = ScheduledTimetable {
///     name: "DAY (09:00 - 18:00)".to_string(),
///     start_time: t(9, 0),
///     end_time: t(18, 0),
/// };
/// let slots = CanonicalSlots::from_positions(&[t(9, 12)]);
/// let inputs = MetricInputs {
///     slots: &slots,
///     timetable: Some(&timetable),
///     day_type: DayType::Weekday,
///     unpaid_break: WorkDuration::from_minutes(60),
/// };
///
/// assert_eq!(MetricField::LateClockIn.compute(&inputs).to_string(), "00:12");
/// assert_eq!(MetricField::RequiredWorkTime.compute(&inputs).to_string(), "08:00");
/// assert_eq!(MetricField::LateClockIn.label(), "Late Clock In");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    /// Clock-In past the scheduled start.
    LateClockIn,
    /// Clock-In before the scheduled start.
    EarlyClockIn,
    /// Final out before the scheduled end.
    EarlyClockOut,
    /// Clock-Out to In, wrapping midnight.
    Break,
    /// Scheduled span less the unpaid break.
    RequiredWorkTime,
    /// Clock-In to final out less the unpaid break.
    WorkTime,
    /// Required Work Time when neither Clock-In nor Clock-Out exists.
    Absent,
    /// Weekday overtime.
    Ot1,
    /// Weekend overtime.
    Ot2,
    /// Holiday overtime, filled by redistribution.
    Ot3,
}

impl MetricField {
    /// Every metric in report column order.
    pub const ALL: [MetricField; 10] = [
        MetricField::RequiredWorkTime,
        MetricField::LateClockIn,
        MetricField::EarlyClockIn,
        MetricField::EarlyClockOut,
        MetricField::Break,
        MetricField::WorkTime,
        MetricField::Absent,
        MetricField::Ot1,
        MetricField::Ot2,
        MetricField::Ot3,
    ];

    /// The report column header.
    pub fn label(&self) -> &'static str {
        match self {
            MetricField::LateClockIn => "Late Clock In",
            MetricField::EarlyClockIn => "Early Clock In",
            MetricField::EarlyClockOut => "Early Clock Out",
            MetricField::Break => "Break",
            MetricField::RequiredWorkTime => "Required Work Time",
            MetricField::WorkTime => "Work Time",
            MetricField::Absent => "Absent",
            MetricField::Ot1 => "OT1",
            MetricField::Ot2 => "OT2",
            MetricField::Ot3 => "OT3",
        }
    }

    /// Computes the metric.
    ///
    /// Any metric whose operands are missing is `00:00`.
    pub fn compute(&self, inputs: &MetricInputs<'_>) -> WorkDuration {
        let slots = inputs.slots;
        let timetable = inputs.timetable;

        match self {
            MetricField::LateClockIn => match (slots.clock_in, timetable) {
                (Some(clock_in), Some(tt)) => WorkDuration::excess_of(clock_in, tt.start_time),
                _ => WorkDuration::ZERO,
            },
            MetricField::EarlyClockIn => match (slots.clock_in, timetable) {
                (Some(clock_in), Some(tt)) => WorkDuration::excess_of(tt.start_time, clock_in),
                _ => WorkDuration::ZERO,
            },
            MetricField::EarlyClockOut => match (slots.effective_out(), timetable) {
                (Some(out), Some(tt)) => WorkDuration::excess_of(tt.end_time, out),
                _ => WorkDuration::ZERO,
            },
            MetricField::Break => match (slots.clock_out, slots.in_, timetable) {
                (Some(clock_out), Some(back_in), Some(_)) => {
                    WorkDuration::wrapped_between(clock_out, back_in)
                }
                _ => WorkDuration::ZERO,
            },
            MetricField::RequiredWorkTime => match timetable {
                Some(tt) => deduct_break(
                    wrapped_seconds_between(tt.start_time, tt.end_time),
                    inputs.unpaid_break,
                ),
                None => WorkDuration::ZERO,
            },
            MetricField::WorkTime => match (slots.clock_in, slots.effective_out()) {
                (Some(clock_in), Some(out)) => deduct_break(
                    wrapped_seconds_between(clock_in, out),
                    inputs.unpaid_break,
                ),
                _ => WorkDuration::ZERO,
            },
            MetricField::Absent => {
                if timetable.is_some() && !slots.shows_attendance() {
                    MetricField::RequiredWorkTime.compute(inputs)
                } else {
                    WorkDuration::ZERO
                }
            }
            MetricField::Ot1 => overtime(inputs).0,
            MetricField::Ot2 => overtime(inputs).1,
            MetricField::Ot3 => WorkDuration::ZERO,
        }
    }
}

fn deduct_break(seconds: i64, unpaid_break: WorkDuration) -> WorkDuration {
    WorkDuration::from_seconds(seconds - unpaid_break.minutes() * 60)
}

/// OT1 and OT2 from the minute-truncated work and required times.
/// No timetable means no overtime.
fn overtime_from(
    work_time: WorkDuration,
    required_work_time: WorkDuration,
    inputs: &MetricInputs<'_>,
) -> (WorkDuration, WorkDuration) {
    if inputs.timetable.is_none() {
        return (WorkDuration::ZERO, WorkDuration::ZERO);
    }
    split_overtime(work_time.saturating_sub(required_work_time), inputs.day_type)
}

fn overtime(inputs: &MetricInputs<'_>) -> (WorkDuration, WorkDuration) {
    overtime_from(
        MetricField::WorkTime.compute(inputs),
        MetricField::RequiredWorkTime.compute(inputs),
        inputs,
    )
}

/// All metrics of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMetrics {
    /// Late Clock In.
    pub late_clock_in: WorkDuration,
    /// Early Clock In.
    pub early_clock_in: WorkDuration,
    /// Early Clock Out.
    pub early_clock_out: WorkDuration,
    /// Break.
    pub break_duration: WorkDuration,
    /// Required Work Time.
    pub required_work_time: WorkDuration,
    /// Work Time.
    pub work_time: WorkDuration,
    /// Absent.
    pub absent: WorkDuration,
    /// Weekday overtime.
    pub ot1: WorkDuration,
    /// Weekend overtime.
    pub ot2: WorkDuration,
    /// Holiday overtime, zero until redistribution.
    pub ot3: WorkDuration,
}

impl DailyMetrics {
    /// Computes every metric from the same inputs.
    pub fn compute(inputs: &MetricInputs<'_>) -> Self {
        let mut metrics = DailyMetrics::default();
        for field in MetricField::ALL {
            if !matches!(field, MetricField::Ot1 | MetricField::Ot2) {
                *metrics.get_mut(field) = field.compute(inputs);
            }
        }
        (metrics.ot1, metrics.ot2) =
            overtime_from(metrics.work_time, metrics.required_work_time, inputs);
        metrics
    }

    /// Reads one metric.
    pub fn get(&self, field: MetricField) -> WorkDuration {
        match field {
            MetricField::LateClockIn => self.late_clock_in,
            MetricField::EarlyClockIn => self.early_clock_in,
            MetricField::EarlyClockOut => self.early_clock_out,
            MetricField::Break => self.break_duration,
            MetricField::RequiredWorkTime => self.required_work_time,
            MetricField::WorkTime => self.work_time,
            MetricField::Absent => self.absent,
            MetricField::Ot1 => self.ot1,
            MetricField::Ot2 => self.ot2,
            MetricField::Ot3 => self.ot3,
        }
    }

    fn get_mut(&mut self, field: MetricField) -> &mut WorkDuration {
        match field {
            MetricField::LateClockIn => &mut self.late_clock_in,
            MetricField::EarlyClockIn => &mut self.early_clock_in,
            MetricField::EarlyClockOut => &mut self.early_clock_out,
            MetricField::Break => &mut self.break_duration,
            MetricField::RequiredWorkTime => &mut self.required_work_time,
            MetricField::WorkTime => &mut self.work_time,
            MetricField::Absent => &mut self.absent,
            MetricField::Ot1 => &mut self.ot1,
            MetricField::Ot2 => &mut self.ot2,
            MetricField::Ot3 => &mut self.ot3,
        }
    }
}
