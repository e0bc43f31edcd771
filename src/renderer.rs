//! # Cycle Ring Rendering
//!
//! Reference consumers of [`RingLayout`]. The engine only produces numbers and path
//! strings; these functions show three ways of painting them:
//! - an SVG document built directly from the serialized arc paths
//! - an ASCII preview for terminals (development mode)
//! - a raster drawing on any monochrome `embedded-graphics` target

use crate::geometry::{positive_span, project};
use crate::ring::RingLayout;
use crate::{PhaseId, Point};
use embedded_graphics::{
    geometry::Point as PixelPoint,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Arc, Circle, PrimitiveStyle, PrimitiveStyleBuilder},
};
use std::fmt::{self, Write};

/// Fertile-window band width relative to the phase stroke.
const FERTILE_BAND_RATIO: f64 = 0.3;

/// Escape a colour token for use inside a double-quoted XML attribute.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn phase_color(layout: &RingLayout, id: Option<PhaseId>) -> &str {
    id.and_then(|id| layout.phase_arc(id))
        .map_or(layout.marker.color.as_str(), |arc| arc.color.as_str())
}

/// Render the ring as a standalone SVG document.
///
/// Per-day segments replace the phase arcs when the layout carries them.
pub fn svg_document(layout: &RingLayout) -> String {
    let mut svg = String::new();
    write_svg(layout, &mut svg).expect("writing to a String cannot fail");
    svg
}

fn write_svg(layout: &RingLayout, svg: &mut impl Write) -> fmt::Result {
    let geometry = &layout.geometry;
    let size = geometry.center.x * 2.0;
    let marker = &layout.marker;
    let marker_color = escape_attr(&marker.color);
    let marker_edge = escape_attr(marker.shade.as_deref().unwrap_or(&marker.color));

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    )?;
    writeln!(
        svg,
        r#"  <defs>
    <radialGradient id="embossGradient" cx="45%" cy="45%" r="50%">
      <stop offset="0%" stop-color="{marker_color}" stop-opacity="1"/>
      <stop offset="60%" stop-color="{marker_color}" stop-opacity="1"/>
      <stop offset="100%" stop-color="{marker_edge}" stop-opacity="1"/>
    </radialGradient>
  </defs>"#
    )?;

    if layout.day_segments.is_empty() {
        for arc in &layout.phases {
            writeln!(
                svg,
                r#"  <path d="{}" stroke="{}" stroke-width="{}" stroke-linecap="round" fill="none"/>"#,
                arc.path,
                escape_attr(&arc.color),
                geometry.stroke_width
            )?;
        }
    } else {
        for segment in &layout.day_segments {
            writeln!(
                svg,
                r#"  <path d="{}" stroke="{}" stroke-width="{}" stroke-linecap="butt" fill="none"/>"#,
                segment.path,
                escape_attr(phase_color(layout, segment.phase)),
                geometry.stroke_width
            )?;
        }
    }

    if let Some(fertile) = &layout.fertile {
        writeln!(
            svg,
            r#"  <path d="{}" stroke="white" stroke-opacity="0.6" stroke-width="{}" stroke-linecap="round" fill="none"/>"#,
            fertile.path,
            geometry.stroke_width * FERTILE_BAND_RATIO
        )?;
    }

    writeln!(
        svg,
        r#"  <circle cx="{}" cy="{}" r="{}" fill="url(#embossGradient)" stroke="{marker_color}" stroke-width="0.5"/>"#,
        marker.position.x, marker.position.y, marker.radius
    )?;
    writeln!(svg, "</svg>")
}

/// Character used for a phase in the ASCII preview.
fn phase_glyph(id: PhaseId) -> char {
    match id {
        PhaseId::Menstrual => 'M',
        PhaseId::Follicular => 'F',
        PhaseId::Ovulatory => 'O',
        PhaseId::Luteal => 'L',
    }
}

/// Sample points along an arc, `start` to `end` in the positive direction.
fn arc_points(center: Point, radius: f64, start: f64, end: f64, steps: usize) -> Vec<Point> {
    let span = positive_span(start, end);
    (0..=steps)
        .map(|i| project(center, radius, start + span * i as f64 / steps as f64))
        .collect()
}

/// Rasterise the layout onto a character grid of `rows` lines.
///
/// Columns are doubled to compensate for tall terminal cells.
pub fn ascii_grid(layout: &RingLayout, rows: usize) -> Vec<String> {
    let rows = rows.max(3);
    let cols = rows * 2;
    let geometry = &layout.geometry;
    let size = geometry.center.x * 2.0;
    let mut grid = vec![vec![' '; cols]; rows];

    let mut plot = |point: Point, glyph: char| {
        if size <= 0.0 {
            return;
        }
        let col = (point.x / size * (cols - 1) as f64).round();
        let row = (point.y / size * (rows - 1) as f64).round();
        if (0.0..cols as f64).contains(&col) && (0.0..rows as f64).contains(&row) {
            grid[row as usize][col as usize] = glyph;
        }
    };

    for arc in &layout.phases {
        for point in arc_points(geometry.center, geometry.radius, arc.start_angle, arc.end_angle, cols * 2) {
            plot(point, phase_glyph(arc.id));
        }
    }

    if let Some(fertile) = &layout.fertile {
        let inner = geometry.radius - geometry.stroke_width;
        for point in arc_points(geometry.center, inner, fertile.start_angle, fertile.end_angle, cols) {
            plot(point, '*');
        }
    }

    plot(layout.marker.position, '@');

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

/// Legend lines printed under the ASCII preview.
pub fn ascii_legend(layout: &RingLayout) -> Vec<String> {
    let marker = &layout.marker;
    let phase = marker.phase.map_or("no phase", |id| id.as_str());
    let mut lines = vec![format!("@ day {} ({})", marker.day + 1, phase)];
    if let Some(fertile) = &layout.fertile {
        lines.push(format!(
            "* fertile window: days {}-{}",
            fertile.window.start + 1,
            fertile.window.end + 1
        ));
    }
    lines
}

/// Print the ASCII preview to stdout.
pub fn draw_ascii(layout: &RingLayout) {
    for line in ascii_grid(layout, 21).into_iter().chain(ascii_legend(layout)) {
        println!("{}", line);
    }
}

fn pixel(point: Point) -> PixelPoint {
    PixelPoint::new(point.x.round() as i32, point.y.round() as i32)
}

/// Draw the ring onto a monochrome display.
///
/// Phase arcs are stroked `On`; the marker is a hollow circle so it stays visible
/// on top of them.
pub fn draw_ring<D>(layout: &RingLayout, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let geometry = &layout.geometry;
    let center = pixel(geometry.center);
    let diameter = (geometry.radius * 2.0).round() as u32;
    let stroke = (geometry.stroke_width.round() as u32).max(1);

    for arc in &layout.phases {
        let sweep = positive_span(arc.start_angle, arc.end_angle) as f32;
        Arc::with_center(center, diameter, (arc.start_angle as f32).rad(), sweep.rad())
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, stroke))
            .draw(display)?;
    }

    if let Some(fertile) = &layout.fertile {
        let inner = (geometry.radius - geometry.stroke_width).max(0.0);
        let sweep = positive_span(fertile.start_angle, fertile.end_angle) as f32;
        Arc::with_center(
            center,
            (inner * 2.0).round() as u32,
            (fertile.start_angle as f32).rad(),
            sweep.rad(),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display)?;
    }

    let marker = &layout.marker;
    let marker_style = PrimitiveStyleBuilder::new()
        .fill_color(BinaryColor::Off)
        .stroke_color(BinaryColor::On)
        .stroke_width(1)
        .build();
    Circle::with_center(pixel(marker.position), (marker.radius * 2.0).round() as u32)
        .into_styled(marker_style)
        .draw(display)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::{compose, CycleSnapshot, RingGeometry, RingStyle};
    use crate::Phase;

    fn layout_with(style: &RingStyle, current_day: u32) -> RingLayout {
        let snapshot = CycleSnapshot {
            length_in_days: 28,
            phases: vec![
                Phase::new(PhaseId::Menstrual, 0, 8, "#e5484d"),
                Phase::new(PhaseId::Follicular, 8, 9, "#f5a524"),
                Phase::new(PhaseId::Ovulatory, 17, 5, "#30a46c"),
                Phase::new(PhaseId::Luteal, 22, 6, "#6e56cf"),
            ],
            current_day,
            ovulation_day: Some(14),
        };
        compose(&snapshot, &RingGeometry::from_style(style)).unwrap()
    }

    #[test]
    fn test_svg_contains_every_arc_and_marker() {
        let layout = layout_with(&RingStyle::default(), 10);
        let svg = svg_document(&layout);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 200 200""#));
        for arc in &layout.phases {
            assert!(svg.contains(&arc.path));
            assert!(svg.contains(&format!(r#"stroke="{}""#, arc.color)));
        }
        assert!(svg.contains(&layout.fertile.as_ref().unwrap().path));
        assert!(svg.contains(r#"fill="url(#embossGradient)""#));
        // Day 10 is follicular; its darkened shade closes the gradient
        assert!(svg.contains(r#"stop-color="rgb(232, 152, 23)""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_uses_day_segments_when_present() {
        let style = RingStyle {
            day_gap: Some(2.0),
            ..RingStyle::default()
        };
        let layout = layout_with(&style, 0);
        let svg = svg_document(&layout);

        assert_eq!(svg.matches("stroke-linecap=\"butt\"").count(), 28);
        assert!(!svg.contains(&layout.phases[0].path));
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"a"b<c>&"#), "a&quot;b&lt;c&gt;&amp;");
    }

    #[test]
    fn test_ascii_grid_shows_phases_and_marker() {
        let layout = layout_with(&RingStyle::default(), 0);
        let grid = ascii_grid(&layout, 21);
        let text = grid.join("\n");

        assert_eq!(grid.len(), 21);
        for glyph in ['M', 'F', 'O', 'L', '@', '*'] {
            assert!(text.contains(glyph), "missing {glyph}");
        }
        // Day 0 sits at the top of the ring
        assert!(grid[..3].iter().any(|row| row.contains('@')));
    }

    #[test]
    fn test_ascii_legend_names_day_phase_and_window() {
        let legend = ascii_legend(&layout_with(&RingStyle::default(), 27));
        assert_eq!(legend, ["@ day 28 (luteal)", "* fertile window: days 13-17"]);
    }

    #[test]
    fn test_ascii_legend_without_fertile_window() {
        let mut layout = layout_with(&RingStyle::default(), 0);
        layout.fertile = None;
        layout.marker.phase = None;
        assert_eq!(ascii_legend(&layout), ["@ day 1 (no phase)"]);
    }

    mod raster_tests {
        use super::*;
        use embedded_graphics::mock_display::MockDisplay;

        fn mock() -> MockDisplay<BinaryColor> {
            let mut display = MockDisplay::new();
            display.set_allow_overdraw(true);
            display.set_allow_out_of_bounds_drawing(true);
            display
        }

        #[test]
        fn test_draw_ring_sets_pixels() {
            let style = RingStyle {
                size: 60.0,
                ..RingStyle::default()
            };
            let layout = layout_with(&style, 5);
            let mut display = mock();

            draw_ring(&layout, &mut display).unwrap();

            let drawn = display.affected_area();
            assert!(drawn.size.width > 40, "ring spans most of the canvas");
            assert!(drawn.size.height > 40);
        }

        #[test]
        fn test_marker_is_hollow() {
            let style = RingStyle {
                size: 60.0,
                ..RingStyle::default()
            };
            let layout = layout_with(&style, 12);
            let mut display = mock();

            draw_ring(&layout, &mut display).unwrap();

            assert_eq!(
                display.get_pixel(pixel(layout.marker.position)),
                Some(BinaryColor::Off)
            );
        }
    }
}
