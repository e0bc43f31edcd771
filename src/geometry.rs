//! # Ring Geometry Primitives
//!
//! Polar-to-Cartesian projection and serialization of circular arcs into the SVG
//! path mini-language (`M x y A rx ry 0 large sweep x y`).
//!
//! Screen coordinates are assumed (y grows downwards), so a positive change in angle
//! travels clockwise on screen. The serialized sweep flag is therefore always `1`.

use crate::Point;
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Project a polar coordinate around `center` onto the drawing surface.
///
/// `angle` is in radians with `0` along +X. Non-finite inputs propagate into the
/// result unchanged.
///
/// # Example
/// ```
/// use cycle_ring_lib::{geometry::project, Point};
///
/// let p = project(Point::new(100.0, 100.0), 70.0, 0.0);
/// assert_eq!(p, Point::new(170.0, 100.0));
/// ```
pub fn project(center: Point, radius: f64, angle: f64) -> Point {
    Point {
        x: center.x + radius * angle.cos(),
        y: center.y + radius * angle.sin(),
    }
}

/// Positive (direction of travel) angular span from `start` to `end`, in `[0, 2π)`.
pub fn positive_span(start: f64, end: f64) -> f64 {
    (end - start).rem_euclid(TAU)
}

/// A circular arc ready to be serialized as an SVG path.
///
/// Built by [`ArcPath::new`]; the `Display` impl emits the path string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcPath {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    /// True when the arc travels the long way round (span > π)
    pub large_arc: bool,
}

impl ArcPath {
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            start: project(center, radius, start_angle),
            end: project(center, radius, end_angle),
            radius,
            large_arc: positive_span(start_angle, end_angle) > PI,
        }
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} A {} {} 0 {} 1 {} {}",
            PathNumber(self.start.x),
            PathNumber(self.start.y),
            PathNumber(self.radius),
            PathNumber(self.radius),
            u8::from(self.large_arc),
            PathNumber(self.end.x),
            PathNumber(self.end.y),
        )
    }
}

/// Serialize the arc from `start_angle` to `end_angle` as an SVG path string.
///
/// Equal angles produce a zero-length arc (a point); callers that do not want a
/// visible dot must skip such arcs themselves.
///
/// # Example
/// ```
/// use cycle_ring_lib::{geometry::arc_path, Point};
/// use std::f64::consts::PI;
///
/// let path = arc_path(Point::new(0.0, 0.0), 10.0, 0.0, 3.0 * PI / 2.0);
/// assert!(path.contains(" 0 1 1 "));
/// ```
pub fn arc_path(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> String {
    ArcPath::new(center, radius, start_angle, end_angle).to_string()
}

/// Shortest round-trip formatting, with negative zero printed as `0`.
struct PathNumber(f64);

impl fmt::Display for PathNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
