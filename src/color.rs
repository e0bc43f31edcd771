//! Colour token helpers for marker shading.

/// Fallback marker colour when the current day resolves to no phase.
pub const FALLBACK_MARKER_COLOR: &str = "deeppink";

/// Darken a `#rrggbb` colour by `amount` (0.0 - 1.0 of full scale) per channel.
///
/// Returns an `rgb(r, g, b)` token, or `None` if `color` is not six hex digits
/// (named colours such as [`FALLBACK_MARKER_COLOR`] included).
///
/// # Example
/// ```
/// use cycle_ring_lib::color::darken;
///
/// assert_eq!(darken("#ff8000", 0.05).as_deref(), Some("rgb(242, 115, 0)"));
/// assert_eq!(darken("deeppink", 0.05), None);
/// ```
pub fn darken(color: &str, amount: f64) -> Option<String> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let step = (255.0 * amount).round() as i32;
    let channel = |range: std::ops::Range<usize>| -> Option<i32> {
        let value = i32::from_str_radix(&hex[range], 16).ok()?;
        Some((value - step).clamp(0, 255))
    };

    Some(format!(
        "rgb({}, {}, {})",
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?
    ))
}
