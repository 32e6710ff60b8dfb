//! Shift-type slot remapping.
//!
//! Some timetables break the assumption that punches arrive in Clock-In,
//! Clock-Out, In, Out order. Night shifts start at the third punch, and
//! afternoon shifts that run to midnight have their four punches rotated.
//! This module classifies a timetable and produces the remapped slots.

use tracing::debug;

use crate::config::ShiftRules;
use crate::models::{AuditStep, CanonicalSlots, ShiftKind};

/// The slots of one record after shift-type remapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftAdjustment {
    /// The classified shift kind.
    pub kind: ShiftKind,
    /// Slots after remapping. Unchanged for [`ShiftKind::Standard`].
    pub slots: CanonicalSlots,
    /// Present when the slots were remapped.
    pub audit_step: Option<AuditStep>,
}

/// Classifies a timetable name.
///
/// The night keyword is checked first; keywords match case-insensitively.
/// An exact afternoon label match and an afternoon keyword match both
/// classify as [`ShiftKind::Afternoon`].
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::classify_timetable;
/// use attendance_engine::config::ShiftRules;
/// use attendance_engine::models::ShiftKind;
///
/// let rules = ShiftRules {
///     night_keyword: "NIGHT".to_string(),
///     afternoon_keyword: "AFTERNOON".to_string(),
///     afternoon_label: "AFTERNOON (12:00 - 00:00)".to_string(),
/// };
/// assert_eq!(classify_timetable("Night (22:00 - 06:00)", &rules), ShiftKind::Night);
/// assert_eq!(classify_timetable("AFTERNOON (14:00 - 22:00)", &rules), ShiftKind::Afternoon);
/// assert_eq!(classify_timetable("DAY (09:00 - 18:00)", &rules), ShiftKind::Standard);
/// ```
pub fn classify_timetable(name: &str, rules: &ShiftRules) -> ShiftKind {
    let upper = name.to_uppercase();

    if upper.contains(&rules.night_keyword.to_uppercase()) {
        ShiftKind::Night
    } else if name.trim().eq_ignore_ascii_case(rules.afternoon_label.trim())
        || upper.contains(&rules.afternoon_keyword.to_uppercase())
    {
        ShiftKind::Afternoon
    } else {
        ShiftKind::Standard
    }
}

/// Remaps slots for a shift kind.
///
/// - Night: In moves to Clock-In and In is cleared. The original Clock-In
///   is overwritten, including by an empty In.
/// - Afternoon: Clock-Out becomes Clock-In, Clock-In becomes Out,
///   In becomes Clock-Out and Out becomes In.
/// - Standard: unchanged.
pub fn remap_slots(slots: CanonicalSlots, kind: ShiftKind) -> CanonicalSlots {
    match kind {
        ShiftKind::Standard => slots,
        ShiftKind::Night => CanonicalSlots {
            clock_in: slots.in_,
            in_: None,
            ..slots
        },
        ShiftKind::Afternoon => CanonicalSlots {
            clock_in: slots.clock_out,
            clock_out: slots.in_,
            in_: slots.out,
            out: slots.clock_in,
        },
    }
}

/// Classifies the timetable and remaps the slots.
///
/// Without a timetable the slots pass through unchanged.
pub fn adjust_for_shift(
    slots: CanonicalSlots,
    timetable_name: Option<&str>,
    rules: &ShiftRules,
    step_number: u32,
) -> ShiftAdjustment {
    let kind = timetable_name.map_or(ShiftKind::Standard, |name| classify_timetable(name, rules));
    let adjusted = remap_slots(slots, kind);

    let audit_step = (kind != ShiftKind::Standard).then(|| {
        debug!(kind = %kind, timetable = ?timetable_name, "Remapped punch slots");

        let reasoning = match kind {
            ShiftKind::Night => format!(
                "Timetable '{}' is a night shift: the In punch is the shift start",
                timetable_name.unwrap_or_default()
            ),
            _ => format!(
                "Timetable '{}' is an afternoon shift: slots rotated across midnight",
                timetable_name.unwrap_or_default()
            ),
        };

        AuditStep {
            step_number,
            rule_id: "shift_type_remap".to_string(),
            rule_name: "Shift Type Slot Remap".to_string(),
            input: serde_json::json!({
                "timetable": timetable_name,
                "slots": slots,
            }),
            output: serde_json::json!({
                "shift_kind": kind,
                "slots": adjusted,
            }),
            reasoning,
        }
    });

    ShiftAdjustment {
        kind,
        slots: adjusted,
        audit_step,
    }
}
