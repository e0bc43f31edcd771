//! # Day-Angle Layout
//!
//! Assigns every day of the timeline a position on the ring. Two strategies exist:
//!
//! ### Phase-gapped points ([`phase_gapped_angles`])
//! One angle per day. Extra angular clearance is inserted wherever the phase changes
//! between consecutive days, so adjacent phase strokes (and the current-day marker
//! sitting on them) never overlap. The clearance is derived from the linear stroke and
//! marker sizes at the given radius, which keeps the gap visually constant no matter
//! how large the ring is drawn.
//!
//! ### Uniform spans ([`uniform_day_spans`])
//! One `[start, end)` interval per day, all the same width, each followed by the same
//! fixed gap. Phase boundaries play no part.
//!
//! Both walks start at `-π/2` (top of the ring) and cover the full circle exactly once.
//! Sizing parameters are validated before any angle is computed; see [`LayoutError`].

use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};
use thiserror::Error;

/// Angle of day 0: the top of the ring in screen coordinates.
pub const START_ANGLE: f64 = -FRAC_PI_2;

/// Stroke width is padded by this factor when converted to angular clearance.
const STROKE_CLEARANCE_FACTOR: f64 = 1.2;

/// Rejections raised before any layout work is done.
///
/// Each variant names the configuration mistake; nothing is clamped silently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Timeline has no days
    #[error("timeline length must be positive")]
    EmptyTimeline,

    /// Radius is zero, negative or not a number
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// A linear sizing value (stroke width, marker radius, gap) is negative or not finite
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidSizing { name: &'static str, value: f64 },

    /// Gaps consume the whole circle, leaving a zero or negative angle per day
    #[error("gaps consume {gap_angle:.4} rad of the circle, leaving no room for {days} days")]
    GapOverflow { gap_angle: f64, days: u32 },

    /// Requested day lies outside `[0, length)`
    #[error("day {day} is outside the {length}-day timeline")]
    DayOutOfRange { day: u32, length: u32 },

    /// Phases do not tile the timeline (only reported by the opt-in check)
    #[error("phases do not partition the timeline: {0}")]
    PhasePartition(String),
}

fn check_radius(radius: f64) -> Result<(), LayoutError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidRadius(radius))
    }
}

fn check_sizing(name: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidSizing { name, value })
    }
}

/// Parameters for [`phase_gapped_angles`].
#[derive(Clone, Debug, PartialEq)]
pub struct GappedLayout {
    pub length_in_days: u32,
    pub radius: f64,
    /// Stroke width of the phase arcs, used only for clearance
    pub stroke_width: f64,
    /// Radius of the current-day marker, used only for clearance
    pub current_day_radius: f64,
    /// Number of gaps reserved around the ring, normally the phase count
    pub total_gaps: u32,
    /// Amplifies the marker clearance so the gap is perceptible
    pub segment_gap_multiplier: f64,
}

impl GappedLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.length_in_days == 0 {
            return Err(LayoutError::EmptyTimeline);
        }
        check_radius(self.radius)?;
        check_sizing("stroke width", self.stroke_width)?;
        check_sizing("current day radius", self.current_day_radius)?;
        check_sizing("segment gap multiplier", self.segment_gap_multiplier)?;

        if self.adjusted_increment() <= 0.0 {
            return Err(LayoutError::GapOverflow {
                gap_angle: self.total_gaps as f64 * self.min_gap(),
                days: self.length_in_days,
            });
        }
        Ok(())
    }

    /// Even spacing with no gaps: `2π / length`.
    pub fn baseline_increment(&self) -> f64 {
        TAU / self.length_in_days as f64
    }

    /// Angular clearance added at each phase boundary.
    ///
    /// Whatever part of the required clearance the baseline day spacing already
    /// provides is not added again, so this is zero for sparse timelines.
    pub fn min_gap(&self) -> f64 {
        let stroke_angular_width = (self.stroke_width * STROKE_CLEARANCE_FACTOR) / self.radius;
        let current_day_angular_width = (2.0 * self.current_day_radius) / self.radius;
        let required =
            stroke_angular_width.max(current_day_angular_width * self.segment_gap_multiplier);

        (required - self.baseline_increment()).max(0.0)
    }

    /// Per-day increment once the reserved gaps have been taken out of the circle.
    pub fn adjusted_increment(&self) -> f64 {
        let total_gap_angle = self.total_gaps as f64 * self.min_gap();
        (TAU - total_gap_angle) / self.length_in_days as f64
    }
}

/// One angle per day, produced by [`phase_gapped_angles`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayAngles {
    angles: Vec<f64>,
    /// Per-day increment used for the walk
    pub increment: f64,
    /// Clearance inserted at each phase boundary
    pub gap: f64,
    /// Angle the walk reached after the last day (before any closing gap)
    pub end: f64,
}

impl DayAngles {
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn get(&self, day: u32) -> Option<f64> {
        self.angles.get(day as usize).copied()
    }

    /// Angle of `day`, rejecting days outside the timeline.
    pub fn angle(&self, day: u32) -> Result<f64, LayoutError> {
        self.get(day).ok_or(LayoutError::DayOutOfRange {
            day,
            length: self.angles.len() as u32,
        })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.angles
    }
}

/// Lay out one angle per day, with clearance at every phase change.
///
/// `phase_of` reports the phase owning a day. It is only used to detect boundaries:
/// a gap follows `day` when both `day` and `day + 1` resolve and differ. No gap is
/// inserted after the final day; the wrap back to day 0 is left to the reserved
/// `total_gaps` budget.
///
/// # Example
/// ```
/// use cycle_ring_lib::layout::{phase_gapped_angles, GappedLayout, START_ANGLE};
///
/// let params = GappedLayout {
///     length_in_days: 10,
///     radius: 70.0,
///     stroke_width: 14.0,
///     current_day_radius: 11.2,
///     total_gaps: 2,
///     segment_gap_multiplier: 1.2,
/// };
/// let angles = phase_gapped_angles(&params, |day| Some(day < 5)).unwrap();
///
/// assert_eq!(angles.len(), 10);
/// assert_eq!(angles.get(0), Some(START_ANGLE));
/// ```
pub fn phase_gapped_angles<K, F>(params: &GappedLayout, phase_of: F) -> Result<DayAngles, LayoutError>
where
    K: PartialEq,
    F: Fn(u32) -> Option<K>,
{
    params.validate()?;

    let length = params.length_in_days;
    let increment = params.adjusted_increment();
    let gap = params.min_gap();

    log::debug!(
        "gapped layout: {} days, increment {:.5} rad, boundary gap {:.5} rad",
        length,
        increment,
        gap
    );

    let mut angles = Vec::with_capacity(length as usize);
    let mut current = START_ANGLE;

    for day in 0..length {
        angles.push(current);
        current += increment;

        if day + 1 < length {
            if let (Some(here), Some(next)) = (phase_of(day), phase_of(day + 1)) {
                if here != next {
                    current += gap;
                }
            }
        }
    }

    Ok(DayAngles {
        angles,
        increment,
        gap,
        end: current,
    })
}

/// Parameters for [`uniform_day_spans`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpanLayout {
    pub length_in_days: u32,
    pub radius: f64,
    /// Linear gap trailing every day
    pub gap_length: f64,
}

impl SpanLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.length_in_days == 0 {
            return Err(LayoutError::EmptyTimeline);
        }
        check_radius(self.radius)?;
        check_sizing("gap length", self.gap_length)?;

        if self.day_angle() <= 0.0 {
            return Err(LayoutError::GapOverflow {
                gap_angle: self.gap_angle() * self.length_in_days as f64,
                days: self.length_in_days,
            });
        }
        Ok(())
    }

    pub fn gap_angle(&self) -> f64 {
        self.gap_length / self.radius
    }

    /// Angular width of every day.
    pub fn day_angle(&self) -> f64 {
        let days = self.length_in_days as f64;
        (TAU - self.gap_angle() * days) / days
    }
}

/// Angular interval `[start, end)` occupied by one day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DaySpan {
    pub start: f64,
    pub end: f64,
}

impl DaySpan {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Lay out one equal-width interval per day, each followed by the same gap.
///
/// # Example
/// ```
/// use cycle_ring_lib::layout::{uniform_day_spans, SpanLayout, LayoutError};
///
/// let spans = uniform_day_spans(&SpanLayout { length_in_days: 28, radius: 70.0, gap_length: 2.0 }).unwrap();
/// assert_eq!(spans.len(), 28);
///
/// // 28 gaps of 20 units cannot fit on a circumference of ~440
/// let too_wide = SpanLayout { length_in_days: 28, radius: 70.0, gap_length: 20.0 };
/// assert!(matches!(uniform_day_spans(&too_wide), Err(LayoutError::GapOverflow { .. })));
/// ```
pub fn uniform_day_spans(params: &SpanLayout) -> Result<Vec<DaySpan>, LayoutError> {
    params.validate()?;

    let day_angle = params.day_angle();
    let gap_angle = params.gap_angle();

    log::debug!(
        "span layout: {} days, day width {:.5} rad, gap {:.5} rad",
        params.length_in_days,
        day_angle,
        gap_angle
    );

    let mut current = START_ANGLE;
    let spans = (0..params.length_in_days)
        .map(|_| {
            let span = DaySpan {
                start: current,
                end: current + day_angle,
            };
            current += day_angle + gap_angle;
            span
        })
        .collect();

    Ok(spans)
}
