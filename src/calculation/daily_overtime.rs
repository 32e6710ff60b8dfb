//! Daily overtime detection functionality.
//!
//! This module splits the time worked beyond the required work time into
//! the weekday (OT1) and weekend (OT2) overtime buckets.

use serde::{Deserialize, Serialize};

use super::DayType;
use crate::models::{AuditStep, WorkDuration};

/// The result of detecting overtime for one day.
///
/// Exactly one of `ot1` and `ot2` can be non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOvertimeDetection {
    /// Weekday overtime.
    pub ot1: WorkDuration,
    /// Weekend overtime.
    pub ot2: WorkDuration,
    /// The audit step recording this detection.
    pub audit_step: AuditStep,
}

impl DailyOvertimeDetection {
    /// The overtime in whichever bucket received it.
    pub fn overtime(&self) -> WorkDuration {
        self.ot1 + self.ot2
    }
}

/// Places overtime in OT1 on weekdays and OT2 on weekends.
///
/// Returns `(ot1, ot2)`.
pub fn split_overtime(overtime: WorkDuration, day_type: DayType) -> (WorkDuration, WorkDuration) {
    if day_type.is_weekend() {
        (WorkDuration::ZERO, overtime)
    } else {
        (overtime, WorkDuration::ZERO)
    }
}

/// Detects whether work time exceeds the required work time.
///
/// # Arguments
///
/// * `work_time` - Minute-truncated work time
/// * `required_work_time` - Minute-truncated required work time
/// * `day_type` - Selects the bucket: OT1 on weekdays, OT2 on weekends
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ## Weekday overtime
///
/// ```
/// use attendance_engine::calculation::{DayType, detect_daily_overtime};
/// use attendance_engine::models::WorkDuration;
///
/// let work: WorkDuration = "09:30".parse().unwrap();
/// let required: WorkDuration = "08:00".parse().unwrap();
/// let result = detect_daily_overtime(work, required, DayType::Weekday, 1);
///
/// assert_eq!(result.ot1.to_string(), "01:30");
/// assert_eq!(result.ot2.to_string(), "00:00");
/// ```
///
/// ## Short day, no overtime
///
/// ```
/// use attendance_engine::calculation::{DayType, detect_daily_overtime};
/// use attendance_engine::models::WorkDuration;
///
/// let work: WorkDuration = "06:00".parse().unwrap();
/// let required: WorkDuration = "08:00".parse().unwrap();
/// let result = detect_daily_overtime(work, required, DayType::Saturday, 1);
///
/// assert!(result.overtime().is_zero());
/// ```
pub fn detect_daily_overtime(
    work_time: WorkDuration,
    required_work_time: WorkDuration,
    day_type: DayType,
    step_number: u32,
) -> DailyOvertimeDetection {
    let overtime = work_time.saturating_sub(required_work_time);
    let (ot1, ot2) = split_overtime(overtime, day_type);
    let bucket = if day_type.is_weekend() { "OT2" } else { "OT1" };

    let reasoning = if overtime.is_zero() {
        format!(
            "Work time {} does not exceed required work time {}, no overtime",
            work_time, required_work_time
        )
    } else {
        format!(
            "Work time {} exceeds required work time {} by {} on a {} day, recorded as {}",
            work_time, required_work_time, overtime, day_type, bucket
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "daily_overtime_detection".to_string(),
        rule_name: "Daily Overtime Detection".to_string(),
        input: serde_json::json!({
            "work_time": work_time,
            "required_work_time": required_work_time,
            "day_type": day_type,
        }),
        output: serde_json::json!({
            "ot1": ot1,
            "ot2": ot2,
        }),
        reasoning,
    };

    DailyOvertimeDetection {
        ot1,
        ot2,
        audit_step,
    }
}
