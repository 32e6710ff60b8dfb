//! Configuration types for attendance resolution.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named minimum gap between two punches.
///
/// Both values appear in production reports and neither is a default;
/// the one in force must be named in configuration or in the request.
///
/// # Example
///
/// ```
/// use attendance_engine::config::GapThreshold;
///
/// assert_eq!(GapThreshold::TenMinutes.seconds(), 600);
/// assert_eq!(GapThreshold::OneHour.seconds(), 3600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapThreshold {
    /// 600 seconds.
    TenMinutes,
    /// 3600 seconds.
    OneHour,
}

impl GapThreshold {
    /// The threshold in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            GapThreshold::TenMinutes => 600,
            GapThreshold::OneHour => 3600,
        }
    }
}

impl std::fmt::Display for GapThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapThreshold::TenMinutes => write!(f, "ten_minutes"),
            GapThreshold::OneHour => write!(f, "one_hour"),
        }
    }
}

/// Which near-duplicate punch rule the deduplicator applies.
///
/// Serialized with a `rule` tag, e.g.
///
/// ```yaml
/// deduplication:
///   rule: boundary_pair_with_in_out
///   threshold: ten_minutes
///   in_out_threshold: one_hour
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Drop the second punch while it is too close to the first.
    BoundaryPair {
        /// Minimum gap between the first two punches.
        threshold: GapThreshold,
    },
    /// The boundary-pair rule, then the same check on the In/Out pair.
    BoundaryPairWithInOut {
        /// Minimum gap between the first two punches.
        threshold: GapThreshold,
        /// Minimum gap between the tentative In and Out punches.
        in_out_threshold: GapThreshold,
    },
    /// Scan every consecutive pair until no pair is too close.
    AdjacentPair {
        /// Minimum gap between any two consecutive punches.
        threshold: GapThreshold,
    },
}

/// Whether days without punches produce records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollationPolicy {
    /// Only dates with at least one punch.
    Sparse,
    /// Every date of the range for every employee with punches or schedule entries.
    Dense,
}

/// What an absent end date resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndDateDefault {
    /// The report covers the start date only.
    StartDate,
    /// The report runs to the latest punch or schedule date.
    LatestAvailable,
}

/// Company metadata shown in report headers.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    /// The display name.
    pub name: String,
}

/// Slot capacity for surviving punches.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotConfig {
    /// Punches retained per day after deduplication.
    pub capacity: usize,
}

/// Collation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CollationConfig {
    /// Sparse or dense collation.
    pub policy: CollationPolicy,
    /// What a missing end date resolves to.
    pub end_date_default: EndDateDefault,
}

/// Constants used by the metric calculator.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Deducted from both Required Work Time and Work Time.
    pub unpaid_break_minutes: i64,
    /// Early Clock In above this is flagged for review.
    pub suspicious_early_clock_in_minutes: i64,
    /// Payroll value recorded on night shift days.
    pub night_shift_allowance: Decimal,
}

/// Timetable name patterns that trigger slot remapping.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftRules {
    /// Substring marking a night shift timetable.
    pub night_keyword: String,
    /// Substring marking an afternoon shift timetable.
    pub afternoon_keyword: String,
    /// The exact afternoon timetable label, matched before the keyword.
    pub afternoon_label: String,
}

/// Raw punch data sheet settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSheetConfig {
    /// Number of alternating In/Out columns.
    pub columns: usize,
    /// Boundary-pair threshold applied before listing punches.
    pub threshold: GapThreshold,
}

/// The full contents of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Company metadata.
    pub company: CompanyConfig,
    /// The near-duplicate punch rule.
    pub deduplication: DedupStrategy,
    /// Slot capacity.
    pub slots: SlotConfig,
    /// Collation settings.
    pub collation: CollationConfig,
    /// Metric constants.
    pub metrics: MetricsConfig,
    /// Shift remapping patterns.
    pub shift_rules: ShiftRules,
    /// Raw punch data sheet settings.
    pub data_sheet: DataSheetConfig,
}

/// The contents of the optional `holidays.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidaysConfig {
    /// Holidays applied when a request supplies none.
    #[serde(default)]
    pub public_holidays: Vec<NaiveDate>,
}
