//! # Phase Resolution
//!
//! Maps day indices to the phase that owns them and derives the fertile window
//! around an ovulation day.
//!
//! Phases are kept sorted by start day and searched with a binary search over the
//! start offsets, so lookups never materialise a per-day table.
//!
//! Out-of-range days are handled differently by the two operations:
//! - [`PhaseTable::phase_at`] rejects days outside the timeline
//! - [`fertile_window`] clamps into the timeline and never fails

use crate::layout::LayoutError;
use crate::{Phase, PhaseId};
use serde::Serialize;

/// Days either side of ovulation included in the fertile window.
pub const FERTILE_WINDOW_RADIUS: i64 = 2;

/// Phases of one timeline, sorted by start day.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseTable {
    length_in_days: u32,
    phases: Vec<Phase>,
}

impl PhaseTable {
    /// Build a table without checking that the phases tile the timeline.
    ///
    /// Days left uncovered resolve to no phase; overlapping phases resolve to the one
    /// starting latest. Call [`validate`](Self::validate) to fail fast instead.
    pub fn new(length_in_days: u32, mut phases: Vec<Phase>) -> Self {
        phases.sort_by_key(|phase| phase.start_day);
        Self {
            length_in_days,
            phases,
        }
    }

    pub fn length_in_days(&self) -> u32 {
        self.length_in_days
    }

    /// Phases in start-day order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Phase owning `day`, or `None` if no phase covers it.
    ///
    /// Does not check `day` against the timeline length.
    pub fn lookup(&self, day: u32) -> Option<&Phase> {
        let after = self.phases.partition_point(|phase| phase.start_day <= day);
        let candidate = self.phases.get(after.checked_sub(1)?)?;
        candidate.contains(day).then_some(candidate)
    }

    /// Phase owning `day`.
    ///
    /// # Errors
    /// [`LayoutError::DayOutOfRange`] if `day` is not inside the timeline. A day inside
    /// the timeline that no phase covers yields `Ok(None)`.
    pub fn phase_at(&self, day: u32) -> Result<Option<&Phase>, LayoutError> {
        if day >= self.length_in_days {
            return Err(LayoutError::DayOutOfRange {
                day,
                length: self.length_in_days,
            });
        }
        Ok(self.lookup(day))
    }

    /// Identity of the phase owning `day`; the boundary probe for the gapped layout.
    pub fn phase_id_of(&self, day: u32) -> Option<PhaseId> {
        self.lookup(day).map(|phase| phase.id)
    }

    /// Check that the phases tile `[0, length)` with no gaps, overlaps or empty phases.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut expected_start = 0;

        for phase in &self.phases {
            if phase.length_in_days == 0 {
                return Err(LayoutError::PhasePartition(format!(
                    "{} phase at day {} is empty",
                    phase.id, phase.start_day
                )));
            }
            if phase.start_day != expected_start {
                return Err(LayoutError::PhasePartition(format!(
                    "{} phase starts at day {}, expected day {}",
                    phase.id, phase.start_day, expected_start
                )));
            }
            expected_start = phase.end_day();
        }

        if expected_start != self.length_in_days {
            return Err(LayoutError::PhasePartition(format!(
                "phases cover {} days of a {}-day timeline",
                expected_start, self.length_in_days
            )));
        }
        Ok(())
    }
}

/// Inclusive day range around ovulation, clamped to the timeline.
///
/// An ovulation day far outside the timeline produces a window with
/// `start > end`; this is reported through [`is_empty`](Self::is_empty) rather
/// than as an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FertileWindow {
    pub start: i64,
    pub end: i64,
}

impl FertileWindow {
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Window as timeline day indices, or `None` when empty.
    pub fn days(&self) -> Option<(u32, u32)> {
        if self.is_empty() {
            return None;
        }
        Some((u32::try_from(self.start).ok()?, u32::try_from(self.end).ok()?))
    }
}

/// Fertile window of ±2 days around `ovulation_day`, clamped into `[0, length - 1]`.
///
/// # Example
/// ```
/// use cycle_ring_lib::phases::{fertile_window, FertileWindow};
///
/// assert_eq!(fertile_window(14, 28), FertileWindow { start: 12, end: 16 });
/// assert_eq!(fertile_window(0, 28), FertileWindow { start: 0, end: 2 });
/// assert_eq!(fertile_window(27, 28), FertileWindow { start: 25, end: 27 });
/// ```
pub fn fertile_window(ovulation_day: i64, length_in_days: u32) -> FertileWindow {
    FertileWindow {
        start: ovulation_day.saturating_sub(FERTILE_WINDOW_RADIUS).max(0),
        end: ovulation_day
            .saturating_add(FERTILE_WINDOW_RADIUS)
            .min(i64::from(length_in_days) - 1),
    }
}
