//! # Ring Composition
//!
//! Sequences projection, arc serialization, day layout and phase resolution into the
//! full set of drawable primitives for one cycle snapshot. [`compose`] is the only
//! entry point a renderer needs.
//!
//! ## Output
//! - one [`PhaseArc`] per phase, running from its first day's angle to its last day's
//! - a [`DayMarker`] for the current day, with its owning phase and colour
//! - an optional [`FertileArc`] spanning the clamped fertile window
//! - optional per-day [`DaySegment`]s when a fixed day gap is configured

use crate::color::{darken, FALLBACK_MARKER_COLOR};
use crate::geometry::{arc_path, project};
use crate::layout::{
    phase_gapped_angles, uniform_day_spans, DayAngles, GappedLayout, LayoutError, SpanLayout,
};
use crate::phases::{fertile_window, FertileWindow, PhaseTable};
use crate::{Phase, PhaseId, Point};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Amount the marker colour is darkened for its gradient edge.
const MARKER_SHADE_AMOUNT: f64 = 0.05;

/// Proportions of a ring drawn on a square canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingStyle {
    /// Side of the square canvas
    pub size: f64,
    /// Phase stroke width as a fraction of `size`
    pub stroke_width_ratio: f64,
    /// Marker radius as a fraction of the stroke width
    pub current_day_size_ratio: f64,
    pub segment_gap_multiplier: f64,
    /// Linear gap between per-day segments; no segments are produced when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_gap: Option<f64>,
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            size: 200.0,
            stroke_width_ratio: 0.07,
            current_day_size_ratio: 0.8,
            segment_gap_multiplier: 1.2,
            day_gap: None,
        }
    }
}

/// Absolute ring measurements, derived once from a [`RingStyle`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RingGeometry {
    pub center: Point,
    pub radius: f64,
    pub stroke_width: f64,
    pub current_day_radius: f64,
    pub segment_gap_multiplier: f64,
    pub day_gap: Option<f64>,
}

impl RingGeometry {
    /// Fit the ring inside the canvas so neither stroke nor marker is clipped.
    ///
    /// The radius bottoms out at zero for degenerate styles; layout rejects it later.
    pub fn from_style(style: &RingStyle) -> Self {
        let center = style.size / 2.0;
        let stroke_width = style.size * style.stroke_width_ratio;
        let current_day_radius = stroke_width * style.current_day_size_ratio;
        let radius = (center - stroke_width / 2.0 - current_day_radius / 2.0).max(0.0);

        Self {
            center: Point::new(center, center),
            radius,
            stroke_width,
            current_day_radius,
            segment_gap_multiplier: style.segment_gap_multiplier,
            day_gap: style.day_gap,
        }
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::from_style(&RingStyle::default())
    }
}

/// Caller-supplied state of one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleSnapshot {
    pub length_in_days: u32,
    pub phases: Vec<Phase>,
    pub current_day: u32,
    pub ovulation_day: Option<i64>,
}

/// Arc covering one phase.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhaseArc {
    pub id: PhaseId,
    pub color: String,
    pub start_day: u32,
    /// Last day owned by the phase (inclusive)
    pub end_day: u32,
    pub start_angle: f64,
    pub end_angle: f64,
    pub path: String,
}

/// Current-day marker.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayMarker {
    pub day: u32,
    pub angle: f64,
    pub position: Point,
    pub radius: f64,
    /// Owning phase, `None` when the phase data leaves the day uncovered
    pub phase: Option<PhaseId>,
    pub color: String,
    /// Darkened colour for the marker's gradient edge, when `color` is hex
    pub shade: Option<String>,
}

/// Arc spanning the fertile window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FertileArc {
    pub window: FertileWindow,
    pub start_angle: f64,
    pub end_angle: f64,
    pub path: String,
}

/// One day drawn as its own short arc.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DaySegment {
    pub day: u32,
    pub phase: Option<PhaseId>,
    pub start_angle: f64,
    pub end_angle: f64,
    pub path: String,
}

/// Everything a renderer needs to draw the ring.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RingLayout {
    pub geometry: RingGeometry,
    pub phases: Vec<PhaseArc>,
    pub marker: DayMarker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fertile: Option<FertileArc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub day_segments: Vec<DaySegment>,
}

impl RingLayout {
    pub fn phase_arc(&self, id: PhaseId) -> Option<&PhaseArc> {
        self.phases.iter().find(|arc| arc.id == id)
    }
}

/// Compose the drawable ring for `snapshot`.
///
/// Phase data is trusted: days no phase covers simply get no arc and no marker
/// phase. Sizing and the current day are checked.
///
/// # Errors
/// Any [`LayoutError`] from validating the sizing, and
/// [`LayoutError::DayOutOfRange`] if the current day is outside the timeline.
pub fn compose(snapshot: &CycleSnapshot, geometry: &RingGeometry) -> Result<RingLayout, LayoutError> {
    let table = PhaseTable::new(snapshot.length_in_days, snapshot.phases.clone());
    let params = GappedLayout {
        length_in_days: snapshot.length_in_days,
        radius: geometry.radius,
        stroke_width: geometry.stroke_width,
        current_day_radius: geometry.current_day_radius,
        total_gaps: table.phases().len() as u32,
        segment_gap_multiplier: geometry.segment_gap_multiplier,
    };
    let angles = phase_gapped_angles(&params, |day| table.phase_id_of(day))?;

    let marker = day_marker(&table, &angles, geometry, snapshot.current_day)?;
    let phases: Vec<PhaseArc> = table
        .phases()
        .iter()
        .filter_map(|phase| phase_arc(phase, &angles, geometry))
        .collect();
    let fertile = snapshot.ovulation_day.and_then(|day| {
        fertile_arc(fertile_window(day, snapshot.length_in_days), &angles, geometry)
    });
    let segments = match geometry.day_gap {
        Some(gap_length) => day_segments(&table, geometry, gap_length)?,
        None => Vec::new(),
    };

    log::debug!(
        "composed ring: {} phase arcs, marker on day {} ({}), fertile arc: {}",
        phases.len(),
        marker.day,
        marker.phase.map_or("no phase", |id| id.as_str()),
        fertile.is_some()
    );

    Ok(RingLayout {
        geometry: geometry.clone(),
        phases,
        marker,
        fertile,
        day_segments: segments,
    })
}

fn day_marker(
    table: &PhaseTable,
    angles: &DayAngles,
    geometry: &RingGeometry,
    day: u32,
) -> Result<DayMarker, LayoutError> {
    let angle = angles.angle(day)?;
    let phase = table.phase_at(day)?;
    let color = phase.map_or(FALLBACK_MARKER_COLOR, |phase| phase.color.as_str());

    Ok(DayMarker {
        day,
        angle,
        position: project(geometry.center, geometry.radius, angle),
        radius: geometry.current_day_radius,
        phase: phase.map(|phase| phase.id),
        color: color.to_string(),
        shade: darken(color, MARKER_SHADE_AMOUNT),
    })
}

fn phase_arc(phase: &Phase, angles: &DayAngles, geometry: &RingGeometry) -> Option<PhaseArc> {
    if phase.length_in_days == 0 {
        return None;
    }
    let end_day = phase.last_day();
    let (Some(start_angle), Some(end_angle)) = (angles.get(phase.start_day), angles.get(end_day))
    else {
        log::warn!(
            "{} phase (days {}-{}) lies outside the {}-day timeline, not drawn",
            phase.id,
            phase.start_day,
            end_day,
            angles.len()
        );
        return None;
    };

    Some(PhaseArc {
        id: phase.id,
        color: phase.color.clone(),
        start_day: phase.start_day,
        end_day,
        start_angle,
        end_angle,
        path: arc_path(geometry.center, geometry.radius, start_angle, end_angle),
    })
}

fn fertile_arc(window: FertileWindow, angles: &DayAngles, geometry: &RingGeometry) -> Option<FertileArc> {
    let (start, end) = window.days()?;
    let start_angle = angles.get(start)?;
    let end_angle = angles.get(end)?;

    Some(FertileArc {
        window,
        start_angle,
        end_angle,
        path: arc_path(geometry.center, geometry.radius, start_angle, end_angle),
    })
}

/// Lay every day out as its own equal-width arc separated by `gap_length`.
pub fn day_segments(
    table: &PhaseTable,
    geometry: &RingGeometry,
    gap_length: f64,
) -> Result<Vec<DaySegment>, LayoutError> {
    let spans = uniform_day_spans(&SpanLayout {
        length_in_days: table.length_in_days(),
        radius: geometry.radius,
        gap_length,
    })?;

    Ok(spans
        .into_iter()
        .zip(0u32..)
        .map(|(span, day)| DaySegment {
            day,
            phase: table.phase_id_of(day),
            start_angle: span.start,
            end_angle: span.end,
            path: arc_path(geometry.center, geometry.radius, span.start, span.end),
        })
        .collect())
}

/// Day of the cycle on `today` for a cycle that began on `start`.
///
/// Whole cycles are folded away, so the result is always inside the timeline,
/// including for dates before `start`.
pub fn day_of_cycle(start: NaiveDate, today: NaiveDate, length_in_days: u32) -> Result<u32, LayoutError> {
    if length_in_days == 0 {
        return Err(LayoutError::EmptyTimeline);
    }
    let elapsed = today.signed_duration_since(start).num_days();
    Ok(elapsed.rem_euclid(i64::from(length_in_days)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn snapshot(current_day: u32) -> CycleSnapshot {
        CycleSnapshot {
            length_in_days: 28,
            phases: vec![
                Phase::new(PhaseId::Menstrual, 0, 8, "#e5484d"),
                Phase::new(PhaseId::Follicular, 8, 9, "#f5a524"),
                Phase::new(PhaseId::Ovulatory, 17, 5, "#30a46c"),
                Phase::new(PhaseId::Luteal, 22, 6, "#6e56cf"),
            ],
            current_day,
            ovulation_day: Some(14),
        }
    }

    #[test]
    fn test_geometry_from_default_style() {
        let geometry = RingGeometry::default();
        assert_eq!(geometry.center, Point::new(100.0, 100.0));
        assert!((geometry.stroke_width - 14.0).abs() < 1e-9);
        assert!((geometry.current_day_radius - 11.2).abs() < 1e-9);
        assert!((geometry.radius - 87.4).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_radius_floors_at_zero() {
        let geometry = RingGeometry::from_style(&RingStyle {
            stroke_width_ratio: 2.0,
            ..RingStyle::default()
        });
        assert_eq!(geometry.radius, 0.0);
        assert_eq!(
            compose(&snapshot(0), &geometry),
            Err(LayoutError::InvalidRadius(0.0))
        );
    }

    #[test]
    fn test_compose_phase_arcs() {
        let layout = compose(&snapshot(3), &RingGeometry::default()).unwrap();

        assert_eq!(layout.phases.len(), 4);
        let follicular = layout.phase_arc(PhaseId::Follicular).unwrap();
        assert_eq!((follicular.start_day, follicular.end_day), (8, 16));
        assert!(follicular.path.starts_with("M "));
        assert!(follicular.end_angle > follicular.start_angle);

        // Each later phase starts after the previous one ends
        for pair in layout.phases.windows(2) {
            assert!(pair[1].start_angle > pair[0].end_angle);
        }
    }

    #[test]
    fn test_marker_tracks_current_day_phase() {
        let layout = compose(&snapshot(19), &RingGeometry::default()).unwrap();
        let marker = &layout.marker;

        assert_eq!(marker.phase, Some(PhaseId::Ovulatory));
        assert_eq!(marker.color, "#30a46c");
        assert_eq!(marker.shade.as_deref(), Some("rgb(35, 151, 95)"));
        assert!((marker.radius - 11.2).abs() < 1e-9);
    }

    #[test]
    fn test_marker_on_first_day_sits_at_top() {
        let layout = compose(&snapshot(0), &RingGeometry::default()).unwrap();
        let marker = &layout.marker;

        assert_eq!(marker.angle, -PI / 2.0);
        assert!((marker.position.x - 100.0).abs() < 1e-9);
        assert!((marker.position.y - (100.0 - 87.4)).abs() < 1e-9);
    }

    #[test]
    fn test_current_day_out_of_range_is_rejected() {
        assert_eq!(
            compose(&snapshot(28), &RingGeometry::default()),
            Err(LayoutError::DayOutOfRange { day: 28, length: 28 })
        );
    }

    #[test]
    fn test_uncovered_current_day_falls_back() {
        let mut snap = snapshot(5);
        snap.phases.remove(0);
        let layout = compose(&snap, &RingGeometry::default()).unwrap();

        assert_eq!(layout.marker.phase, None);
        assert_eq!(layout.marker.color, FALLBACK_MARKER_COLOR);
        assert_eq!(layout.marker.shade, None);
        assert_eq!(layout.phases.len(), 3);
    }

    #[test]
    fn test_phase_beyond_timeline_is_skipped() {
        let mut snap = snapshot(0);
        snap.phases.push(Phase::new(PhaseId::Luteal, 30, 2, "#000000"));
        let layout = compose(&snap, &RingGeometry::default()).unwrap();
        assert_eq!(layout.phases.len(), 4);
    }

    #[test]
    fn test_compose_tolerates_extreme_phase_and_ovulation_values() {
        let mut snap = snapshot(3);
        snap.phases.push(Phase::new(PhaseId::Luteal, u32::MAX - 1, 5, "#000000"));
        snap.ovulation_day = Some(i64::MAX);
        let layout = compose(&snap, &RingGeometry::default()).unwrap();

        assert_eq!(layout.phases.len(), 4);
        assert_eq!(layout.marker.phase, Some(PhaseId::Menstrual));
        assert!(layout.fertile.is_none());

        snap.ovulation_day = Some(i64::MIN);
        assert!(compose(&snap, &RingGeometry::default()).unwrap().fertile.is_none());
    }

    #[test]
    fn test_fertile_arc_spans_window() {
        let layout = compose(&snapshot(0), &RingGeometry::default()).unwrap();
        let fertile = layout.fertile.as_ref().unwrap();
        let angles = |day: u32| {
            layout
                .phases
                .iter()
                .find(|arc| arc.start_day == day)
                .map(|arc| arc.start_angle)
        };

        assert_eq!(fertile.window, FertileWindow { start: 12, end: 16 });
        assert!(fertile.start_angle < fertile.end_angle);
        // Window sits inside the follicular arc, so it cannot cross a gap
        let follicular = layout.phase_arc(PhaseId::Follicular).unwrap();
        assert!(fertile.start_angle > follicular.start_angle);
        assert!((fertile.end_angle - follicular.end_angle).abs() < 1e-12);
        assert_eq!(angles(8), Some(follicular.start_angle));
    }

    #[test]
    fn test_fertile_arc_absent_without_ovulation_or_window() {
        let mut snap = snapshot(0);
        snap.ovulation_day = None;
        assert!(compose(&snap, &RingGeometry::default()).unwrap().fertile.is_none());

        snap.ovulation_day = Some(60);
        assert!(compose(&snap, &RingGeometry::default()).unwrap().fertile.is_none());
    }

    #[test]
    fn test_single_day_phase_yields_zero_span_arc() {
        let snap = CycleSnapshot {
            length_in_days: 5,
            phases: vec![
                Phase::new(PhaseId::Menstrual, 0, 1, "#e5484d"),
                Phase::new(PhaseId::Luteal, 1, 4, "#6e56cf"),
            ],
            current_day: 0,
            ovulation_day: None,
        };
        let layout = compose(&snap, &RingGeometry::default()).unwrap();
        let menstrual = layout.phase_arc(PhaseId::Menstrual).unwrap();

        // Ends on its own (only) day rather than borrowing the next day's angle
        assert_eq!(menstrual.start_angle, menstrual.end_angle);
        assert!(menstrual.path.contains(" 0 0 1 "));
    }

    #[test]
    fn test_day_segments_when_gap_configured() {
        let geometry = RingGeometry::from_style(&RingStyle {
            day_gap: Some(2.0),
            ..RingStyle::default()
        });
        let layout = compose(&snapshot(0), &geometry).unwrap();

        assert_eq!(layout.day_segments.len(), 28);
        assert_eq!(layout.day_segments[0].start_angle, -PI / 2.0);
        assert_eq!(layout.day_segments[10].phase, Some(PhaseId::Follicular));
        assert!(layout.day_segments.iter().all(|s| s.end_angle > s.start_angle));
    }

    #[test]
    fn test_day_segments_reject_overflowing_gap() {
        let geometry = RingGeometry::from_style(&RingStyle {
            day_gap: Some(50.0),
            ..RingStyle::default()
        });
        assert!(matches!(
            compose(&snapshot(0), &geometry),
            Err(LayoutError::GapOverflow { .. })
        ));
    }

    #[test]
    fn test_compose_is_repeatable() {
        let geometry = RingGeometry::default();
        assert_eq!(
            compose(&snapshot(12), &geometry),
            compose(&snapshot(12), &geometry)
        );
    }

    #[test]
    fn test_day_of_cycle_wraps() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let on = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        assert_eq!(day_of_cycle(start, on(2026, 10, 1), 28), Ok(0));
        assert_eq!(day_of_cycle(start, on(2026, 10, 19), 28), Ok(18));
        assert_eq!(day_of_cycle(start, on(2026, 10, 29), 28), Ok(0));
        assert_eq!(day_of_cycle(start, on(2026, 9, 30), 28), Ok(27));
        assert_eq!(
            day_of_cycle(start, on(2026, 10, 2), 0),
            Err(LayoutError::EmptyTimeline)
        );
    }
}
