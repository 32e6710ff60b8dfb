//! Calculation logic for the Attendance Engine.
//!
//! This module contains the stages that turn raw device punches into
//! attendance records: punch collation, near-duplicate removal and slot
//! assignment, shift-type slot remapping, day detection, metric
//! calculation, daily overtime detection and holiday overtime
//! redistribution. The [`resolve_attendance`] pipeline runs them in order
//! for every (employee, date) group; [`summarize_records`] and
//! [`build_data_sheet`] build the report-level views.

mod collator;
mod daily_overtime;
mod data_sheet;
mod day_detection;
mod dedup;
mod metrics;
mod overtime_redistribution;
mod pipeline;
mod shift_adjust;
mod summary;

pub use collator::{ParsedPunches, collate_punches, parse_punch_rows, resolve_end_date};
pub use daily_overtime::{DailyOvertimeDetection, detect_daily_overtime, split_overtime};
pub use data_sheet::{build_data_sheet, data_sheet_columns};
pub use day_detection::{DayType, get_day_type, weekday_label};
pub use dedup::{
    CANONICAL_SLOT_COUNT, DedupOutcome, PunchRemoval, RemovalRule, SlotAssignment, assign_slots,
    deduplicate,
};
pub use metrics::{DailyMetrics, MetricField, MetricInputs};
pub use overtime_redistribution::{floor_to_half_hour, redistribute_overtime};
pub use pipeline::{ResolutionOptions, ResolutionOutcome, resolve_attendance, resolve_day};
pub use shift_adjust::{ShiftAdjustment, adjust_for_shift, classify_timetable, remap_slots};
pub use summary::summarize_records;
