//! # Cycle Ring Core Library
//!
//! This library computes the geometry of a segmented cycle ring: a fixed number of
//! days laid out around a full circle, partitioned into contiguous named phases,
//! with a marker for the current day and an optional fertile-window arc.
//!
//! ## Design Philosophy
//!
//! ### Pure Geometry
//! - **Stateless**: every operation is a deterministic function of its inputs, so
//!   results can be cached by value and computed from any thread
//! - **Validate, then compute**: sizing parameters are checked once up front
//!   ([`layout::LayoutError`]); the layout loops themselves never fail
//! - **Renderer agnostic**: the output is plain numbers and SVG path strings; painting
//!   is left to whatever consumes [`ring::RingLayout`]
//!
//! ### Angle Convention
//! Angles are in radians, `0` points along +X and angles grow clockwise on screen
//! (the y axis points down). Day 0 is always anchored at `-π/2`, the top of the ring.
//!
//! ## Core Types
//! - [`PhaseId`]: the closed set of phase identities
//! - [`Phase`]: a contiguous run of days with a colour token
//! - [`Point`]: a 2D coordinate on the drawing surface

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod color;
pub mod config;
pub mod geometry;
pub mod layout;
pub mod phases;
pub mod renderer;
pub mod ring;

/// Identity of a cycle phase.
///
/// The layout engine only compares identities for equality; the concrete
/// variant matters to callers choosing colours or labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseId {
    Menstrual,
    Follicular,
    #[serde(alias = "fertile")]
    Ovulatory,
    Luteal,
}

impl PhaseId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseId::Menstrual => "menstrual",
            PhaseId::Follicular => "follicular",
            PhaseId::Ovulatory => "ovulatory",
            PhaseId::Luteal => "luteal",
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of days owned by one phase.
///
/// Occupies the half-open day range `[start_day, start_day + length_in_days)`.
/// The full phase list is expected to partition the timeline exactly; see
/// [`phases::PhaseTable::validate`] for the opt-in check.
///
/// # Example
/// ```
/// use cycle_ring_lib::{Phase, PhaseId};
///
/// let menstrual = Phase::new(PhaseId::Menstrual, 0, 5, "#e5484d");
/// assert_eq!(menstrual.end_day(), 5);
/// assert_eq!(menstrual.last_day(), 4);
/// assert!(menstrual.contains(4));
/// assert!(!menstrual.contains(5));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub start_day: u32,
    pub length_in_days: u32,
    /// Opaque colour token handed through to the renderer
    pub color: String,
}

impl Phase {
    pub fn new(id: PhaseId, start_day: u32, length_in_days: u32, color: impl Into<String>) -> Self {
        Self {
            id,
            start_day,
            length_in_days,
            color: color.into(),
        }
    }

    /// Exclusive end of the phase's day range.
    pub fn end_day(&self) -> u32 {
        self.start_day.saturating_add(self.length_in_days)
    }

    /// Last day owned by the phase. Equals `start_day` for an empty phase.
    pub fn last_day(&self) -> u32 {
        self.start_day.saturating_add(self.length_in_days.saturating_sub(1))
    }

    pub fn contains(&self, day: u32) -> bool {
        day >= self.start_day && day - self.start_day < self.length_in_days
    }
}

/// A point on the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
