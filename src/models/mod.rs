//! Core data models for the Attendance Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance_record;
mod duration;
mod employee;
mod punch;
mod report_period;
mod slots;
mod timetable;

pub use attendance_record::{
    AttendanceFlags, AttendanceRecord, AttendanceReport, AuditStep, EmployeeSummary,
    PayrollColumns, PunchDataSheet, PunchSheetRow,
};
pub use duration::{
    ParseDurationError, SECONDS_PER_DAY, WorkDuration, seconds_of_day, wrapped_seconds_between,
};
pub use employee::{Employee, EmployeeDirectory};
pub use punch::{DailyPunchSet, RawPunch, RawPunchRow};
pub use report_period::{ReportPeriod, parse_iso_date};
pub use slots::CanonicalSlots;
pub use timetable::{ScheduleBook, ScheduleEntry, ScheduledTimetable, ShiftKind};
