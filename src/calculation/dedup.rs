//! Punch deduplication and slot assignment.
//!
//! Biometric devices register double taps and transitional scans as extra
//! punches. This module removes punches that sit too close to a neighbour,
//! under one of the configured [`DedupStrategy`] rules, and assigns the
//! survivors positionally to the canonical slots.
//!
//! Every rule repeats until no violating pair remains, so running the
//! deduplicator over its own output changes nothing.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::config::{DedupStrategy, GapThreshold};
use crate::models::CanonicalSlots;

/// Which check removed a punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalRule {
    /// First/second punch gap.
    BoundaryPair,
    /// Tentative In/Out gap.
    InOutPair,
    /// Any consecutive pair.
    AdjacentPair,
}

/// One punch removed by the deduplicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PunchRemoval {
    /// The rule that fired.
    pub rule: RemovalRule,
    /// The punch that was dropped.
    pub removed: NaiveDateTime,
    /// The neighbour it was too close to.
    pub kept: NaiveDateTime,
    /// Seconds between the two punches.
    pub gap_seconds: i64,
    /// The threshold the gap fell below.
    pub threshold: GapThreshold,
}

/// The result of deduplicating one day's punches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOutcome {
    /// Surviving punches in ascending order.
    pub punches: Vec<NaiveDateTime>,
    /// Removals in the order they happened.
    pub removals: Vec<PunchRemoval>,
}

/// Removes near-duplicate punches from an ordered sequence.
///
/// # Arguments
///
/// * `punches` - One employee's punches for one day, ascending
/// * `strategy` - The rule to apply
///
/// # Examples
///
/// ## Boundary-pair rule collapses a double tap at clock-in
///
/// ```
/// use attendance_engine::calculation::deduplicate;
/// use attendance_engine::config::{DedupStrategy, GapThreshold};
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let outcome = deduplicate(
///     &[at("2025-06-02 08:58:00"), at("2025-06-02 09:01:00")],
///     DedupStrategy::BoundaryPair { threshold: GapThreshold::TenMinutes },
/// );
/// assert_eq!(outcome.punches, vec![at("2025-06-02 08:58:00")]);
/// assert_eq!(outcome.removals.len(), 1);
/// ```
pub fn deduplicate(punches: &[NaiveDateTime], strategy: DedupStrategy) -> DedupOutcome {
    let mut outcome = DedupOutcome {
        punches: punches.to_vec(),
        removals: Vec::new(),
    };

    match strategy {
        DedupStrategy::BoundaryPair { threshold } => {
            apply_boundary_pair(&mut outcome, threshold);
        }
        DedupStrategy::BoundaryPairWithInOut {
            threshold,
            in_out_threshold,
        } => {
            apply_boundary_pair(&mut outcome, threshold);
            apply_in_out_pair(&mut outcome, in_out_threshold);
        }
        DedupStrategy::AdjacentPair { threshold } => {
            apply_adjacent_pair(&mut outcome, threshold);
        }
    }

    for removal in &outcome.removals {
        debug!(
            rule = ?removal.rule,
            removed = %removal.removed,
            kept = %removal.kept,
            gap_seconds = removal.gap_seconds,
            "Removed near-duplicate punch"
        );
    }

    outcome
}

fn gap_seconds(earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
    (later - earlier).num_seconds()
}

/// Drops the punch at `remove` because it is too close to the one at `keep`.
fn remove_punch(
    outcome: &mut DedupOutcome,
    rule: RemovalRule,
    remove: usize,
    keep: usize,
    threshold: GapThreshold,
) {
    let removed = outcome.punches[remove];
    let kept = outcome.punches[keep];
    outcome.punches.remove(remove);
    outcome.removals.push(PunchRemoval {
        rule,
        removed,
        kept,
        gap_seconds: gap_seconds(removed.min(kept), removed.max(kept)),
        threshold,
    });
}

/// Drops the second punch while it is within `threshold` of the first.
/// Later punches move up one position each time.
fn apply_boundary_pair(outcome: &mut DedupOutcome, threshold: GapThreshold) {
    while outcome.punches.len() >= 2
        && gap_seconds(outcome.punches[0], outcome.punches[1]) < threshold.seconds()
    {
        remove_punch(outcome, RemovalRule::BoundaryPair, 1, 0, threshold);
    }
}

/// Drops the tentative Out punch while it is within `threshold` of In.
fn apply_in_out_pair(outcome: &mut DedupOutcome, threshold: GapThreshold) {
    while outcome.punches.len() >= 4
        && gap_seconds(outcome.punches[2], outcome.punches[3]) < threshold.seconds()
    {
        remove_punch(outcome, RemovalRule::InOutPair, 3, 2, threshold);
    }
}

/// Rescans consecutive pairs from the start after every removal.
///
/// The punch to drop depends on where the later punch sat in the day as
/// recorded, before any removal. A pair reaching past the four canonical
/// positions keeps its later punch, so a double tap at the final exit keeps
/// the true exit time. Every other pair keeps the earlier punch, and the
/// day's first punch is never dropped.
fn apply_adjacent_pair(outcome: &mut DedupOutcome, threshold: GapThreshold) {
    let mut positions: Vec<usize> = (0..outcome.punches.len()).collect();

    loop {
        let violation = outcome.punches.windows(2).position(|pair| {
            gap_seconds(pair[0], pair[1]) < threshold.seconds()
        });

        let Some(first) = violation else {
            break;
        };

        let second = first + 1;
        let (remove, keep) = if positions[second] >= CANONICAL_SLOT_COUNT && first != 0 {
            (first, second)
        } else {
            (second, first)
        };
        positions.remove(remove);
        remove_punch(outcome, RemovalRule::AdjacentPair, remove, keep, threshold);
    }
}

/// The positional slot assignment of one day's surviving punches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    /// The four canonical slots, filled in order.
    pub slots: CanonicalSlots,
    /// Retained punches beyond the four canonical slots.
    pub extra_punches: Vec<NaiveTime>,
    /// Punches discarded because the day exceeded the slot capacity.
    pub truncated: Vec<NaiveDateTime>,
}

/// Number of canonical slots on an attendance record.
pub const CANONICAL_SLOT_COUNT: usize = 4;

/// Assigns surviving punches to slots, keeping at most `capacity`.
///
/// The first punch becomes Clock-In, the second Clock-Out, the third In
/// and the fourth Out. A capacity below four leaves the later slots empty;
/// a capacity above four keeps the extra punches on the record without a
/// slot. Anything past the capacity is reported as truncated.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::assign_slots;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let punches = [
///     at("2025-06-02 08:00:00"),
///     at("2025-06-02 12:00:00"),
///     at("2025-06-02 13:00:00"),
///     at("2025-06-02 17:00:00"),
///     at("2025-06-02 19:00:00"),
/// ];
/// let assignment = assign_slots(&punches, 4);
/// assert_eq!(assignment.slots.out, Some(at("2025-06-02 17:00:00").time()));
/// assert_eq!(assignment.truncated, vec![at("2025-06-02 19:00:00")]);
/// ```
pub fn assign_slots(punches: &[NaiveDateTime], capacity: usize) -> SlotAssignment {
    let kept = punches.len().min(capacity);
    let (retained, truncated) = punches.split_at(kept);

    let times: Vec<NaiveTime> = retained.iter().map(NaiveDateTime::time).collect();
    let slotted = times.len().min(CANONICAL_SLOT_COUNT);

    if !truncated.is_empty() {
        debug!(
            capacity,
            truncated = truncated.len(),
            "Punches beyond slot capacity were discarded"
        );
    }

    SlotAssignment {
        slots: CanonicalSlots::from_positions(&times[..slotted]),
        extra_punches: times[slotted..].to_vec(),
        truncated: truncated.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    /// Punches on 2025-06-02 from "HH:MM" strings.
    fn day(times: &[&str]) -> Vec<NaiveDateTime> {
        times
            .iter()
            .map(|t| make_datetime(&format!("2025-06-02 {}:00", t)))
            .collect()
    }

    fn hhmm(punches: &[NaiveDateTime]) -> Vec<String> {
        punches.iter().map(|p| p.format("%H:%M").to_string()).collect()
    }

    const BOUNDARY_10: DedupStrategy = DedupStrategy::BoundaryPair {
        threshold: GapThreshold::TenMinutes,
    };
    const BOUNDARY_1H: DedupStrategy = DedupStrategy::BoundaryPair {
        threshold: GapThreshold::OneHour,
    };
    const ADJACENT_10: DedupStrategy = DedupStrategy::AdjacentPair {
        threshold: GapThreshold::TenMinutes,
    };
    const WITH_IN_OUT: DedupStrategy = DedupStrategy::BoundaryPairWithInOut {
        threshold: GapThreshold::TenMinutes,
        in_out_threshold: GapThreshold::OneHour,
    };

    // ==========================================================================
    // Boundary-pair rule
    // ==========================================================================

    #[test]
    fn test_boundary_pair_collapses_double_tap() {
        let outcome = deduplicate(&day(&["08:58", "09:01"]), BOUNDARY_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:58"]);
        assert_eq!(outcome.removals[0].rule, RemovalRule::BoundaryPair);
        assert_eq!(outcome.removals[0].gap_seconds, 180);
    }

    #[test]
    fn test_boundary_pair_promotes_later_punches() {
        let outcome = deduplicate(&day(&["08:00", "08:05", "12:00", "13:00", "17:00"]), BOUNDARY_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00", "13:00", "17:00"]);
    }

    #[test]
    fn test_boundary_pair_exact_threshold_is_kept() {
        let outcome = deduplicate(&day(&["08:00", "08:10"]), BOUNDARY_10);
        assert_eq!(outcome.punches.len(), 2);
        assert!(outcome.removals.is_empty());
    }

    #[test]
    fn test_boundary_pair_cascades() {
        let outcome = deduplicate(&day(&["08:00", "08:04", "08:08", "12:00"]), BOUNDARY_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00"]);
        assert_eq!(outcome.removals.len(), 2);
    }

    #[test]
    fn test_boundary_pair_one_hour_threshold() {
        let outcome = deduplicate(&day(&["08:00", "08:45", "12:00"]), BOUNDARY_1H);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00"]);
    }

    #[test]
    fn test_boundary_pair_ignores_later_pairs() {
        let outcome = deduplicate(&day(&["08:00", "12:00", "12:02"]), BOUNDARY_10);
        assert_eq!(outcome.punches.len(), 3);
    }

    // ==========================================================================
    // Boundary pair with in/out check
    // ==========================================================================

    #[test]
    fn test_in_out_pair_removes_close_out() {
        let outcome = deduplicate(&day(&["08:00", "12:00", "13:00", "13:30", "17:00"]), WITH_IN_OUT);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00", "13:00", "17:00"]);
        assert_eq!(outcome.removals[0].rule, RemovalRule::InOutPair);
    }

    #[test]
    fn test_in_out_pair_runs_after_boundary_promotion() {
        let outcome = deduplicate(
            &day(&["08:00", "08:03", "12:00", "13:00", "13:20", "17:00"]),
            WITH_IN_OUT,
        );
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00", "13:00", "17:00"]);
        assert_eq!(outcome.removals.len(), 2);
    }

    #[test]
    fn test_in_out_pair_needs_four_punches() {
        let outcome = deduplicate(&day(&["08:00", "12:00", "13:00"]), WITH_IN_OUT);
        assert_eq!(outcome.punches.len(), 3);
    }

    // ==========================================================================
    // Adjacent-pair rule
    // ==========================================================================

    #[test]
    fn test_adjacent_pair_keeps_first_early_and_last_late() {
        let outcome = deduplicate(&day(&["08:30", "08:32", "12:00", "20:06", "20:07"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:30", "12:00", "20:07"]);
    }

    #[test]
    fn test_adjacent_pair_two_punches_keeps_clock_in() {
        let outcome = deduplicate(&day(&["08:58", "09:01"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:58"]);
    }

    #[test]
    fn test_adjacent_pair_middle_pair_keeps_earlier() {
        let outcome = deduplicate(&day(&["08:00", "12:00", "12:03", "17:00"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00", "17:00"]);
    }

    #[test]
    fn test_adjacent_pair_cascading_removals() {
        let outcome = deduplicate(&day(&["08:00", "08:06", "08:12", "08:18"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "08:12"]);
        assert_eq!(outcome.removals.len(), 2);
    }

    #[test]
    fn test_adjacent_pair_within_four_positions_keeps_earlier_out() {
        let outcome = deduplicate(&day(&["08:00", "12:00", "13:00", "13:05"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00", "13:00"]);
        assert_eq!(hhmm(&[outcome.removals[0].removed]), vec!["13:05"]);
    }

    #[test]
    fn test_adjacent_pair_three_punch_day_keeps_earlier() {
        let outcome = deduplicate(&day(&["08:00", "12:00", "12:05"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00"]);
    }

    #[test]
    fn test_adjacent_pair_uses_recorded_positions_after_removal() {
        let outcome = deduplicate(&day(&["08:00", "08:03", "12:00", "17:00", "17:04"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00", "12:00", "17:04"]);
    }

    #[test]
    fn test_adjacent_pair_never_drops_first_punch() {
        let outcome = deduplicate(&day(&["08:00", "08:01", "08:02", "08:03", "08:04"]), ADJACENT_10);
        assert_eq!(hhmm(&outcome.punches), vec!["08:00"]);
        assert_eq!(outcome.removals.len(), 4);
    }

    // ==========================================================================
    // Idempotence and edge cases
    // ==========================================================================

    #[test]
    fn test_every_strategy_is_idempotent_on_sample() {
        let punches = day(&["07:55", "08:01", "08:07", "12:00", "12:30", "13:00", "13:05", "17:00", "17:04"]);
        for strategy in [BOUNDARY_10, BOUNDARY_1H, ADJACENT_10, WITH_IN_OUT] {
            let once = deduplicate(&punches, strategy);
            let twice = deduplicate(&once.punches, strategy);
            assert_eq!(once.punches, twice.punches, "{:?}", strategy);
            assert!(twice.removals.is_empty(), "{:?}", strategy);
        }
    }

    #[test]
    fn test_empty_and_single_punch_days() {
        for strategy in [BOUNDARY_10, ADJACENT_10, WITH_IN_OUT] {
            assert!(deduplicate(&[], strategy).punches.is_empty());
            assert_eq!(deduplicate(&day(&["08:00"]), strategy).punches.len(), 1);
        }
    }

    // ==========================================================================
    // Slot assignment
    // ==========================================================================

    #[test]
    fn test_assign_slots_positional() {
        let assignment = assign_slots(&day(&["08:00", "12:00", "13:00"]), 4);
        assert_eq!(assignment.slots.clock_in.unwrap().to_string(), "08:00:00");
        assert_eq!(assignment.slots.clock_out.unwrap().to_string(), "12:00:00");
        assert_eq!(assignment.slots.in_.unwrap().to_string(), "13:00:00");
        assert_eq!(assignment.slots.out, None);
        assert!(assignment.truncated.is_empty());
    }

    #[test]
    fn test_assign_slots_flags_truncation() {
        let assignment = assign_slots(&day(&["08:00", "10:00", "10:30", "12:00", "13:00", "17:00"]), 4);
        assert_eq!(hhmm(&assignment.truncated), vec!["13:00", "17:00"]);
        assert!(assignment.extra_punches.is_empty());
    }

    #[test]
    fn test_assign_slots_larger_capacity_keeps_extra_punches() {
        let assignment = assign_slots(&day(&["08:00", "10:00", "10:30", "12:00", "13:00", "17:00"]), 6);
        assert!(assignment.truncated.is_empty());
        assert_eq!(assignment.extra_punches.len(), 2);
        assert_eq!(assignment.slots.out.unwrap().to_string(), "12:00:00");
    }

    #[test]
    fn test_assign_slots_smaller_capacity() {
        let assignment = assign_slots(&day(&["08:00", "12:00", "13:00", "17:00"]), 2);
        assert_eq!(assignment.slots.in_, None);
        assert_eq!(assignment.truncated.len(), 2);
    }

    #[test]
    fn test_assign_slots_empty_day() {
        let assignment = assign_slots(&[], 4);
        assert!(!assignment.slots.has_any());
    }
}
