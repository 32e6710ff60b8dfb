//! Canonical punch slots.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// The four roles a surviving punch can take on a working day.
///
/// Slots are filled positionally from the deduplicated punch sequence:
/// first punch is Clock-In, second Clock-Out (start of break), third In
/// (return from break) and fourth Out (final departure). Any slot may be
/// absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSlots {
    /// Arrival at work.
    pub clock_in: Option<NaiveTime>,
    /// Departure for the break.
    pub clock_out: Option<NaiveTime>,
    /// Return from the break.
    #[serde(rename = "in")]
    pub in_: Option<NaiveTime>,
    /// Final departure.
    pub out: Option<NaiveTime>,
}

impl CanonicalSlots {
    /// Fills the slots from an ordered list of punch times.
    ///
    /// Only the first four times are used.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::CanonicalSlots;
    /// use chrono::NaiveTime;
    ///
    /// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    /// let slots = CanonicalSlots::from_positions(&[t(8, 30), t(12, 0), t(13, 0)]);
    /// assert_eq!(slots.clock_in, Some(t(8, 30)));
    /// assert_eq!(slots.in_, Some(t(13, 0)));
    /// assert_eq!(slots.out, None);
    /// ```
    pub fn from_positions(times: &[NaiveTime]) -> Self {
        Self {
            clock_in: times.first().copied(),
            clock_out: times.get(1).copied(),
            in_: times.get(2).copied(),
            out: times.get(3).copied(),
        }
    }

    /// The departure used for work time and early leave: Out, else Clock-Out.
    pub fn effective_out(&self) -> Option<NaiveTime> {
        self.out.or(self.clock_out)
    }

    /// Returns true if at least one slot holds a punch.
    pub fn has_any(&self) -> bool {
        self.clock_in.is_some() || self.clock_out.is_some() || self.in_.is_some() || self.out.is_some()
    }

    /// Returns true if the employee registered attendance.
    ///
    /// A single Clock-In or Clock-Out punch is enough, even without a pair.
    pub fn shows_attendance(&self) -> bool {
        self.clock_in.is_some() || self.clock_out.is_some()
    }

    /// Returns the filled slots in Clock-In, Clock-Out, In, Out order.
    pub fn filled(&self) -> Vec<NaiveTime> {
        [self.clock_in, self.clock_out, self.in_, self.out]
            .into_iter()
            .flatten()
            .collect()
    }
}
