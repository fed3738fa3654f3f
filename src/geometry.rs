//! Pure geometry used by the renderer.
//!
//! Angles are in degrees. 0° points at 3 o'clock and 90° at the top of the
//! page, so with SVG's downward y axis a growing angle turns
//! counter-clockwise on screen.

use crate::style::LineStyle;

/// The point where a ray from the center of an ellipse, at `angle` degrees,
/// crosses its boundary. `width`/`height` are the full extents of the
/// ellipse's bounding box.
pub fn point_on_ellipse(cx: f64, cy: f64, width: f64, height: f64, angle: f64) -> (f64, f64) {
    let a = width / 2.0;
    let b = height / 2.0;
    let angle = angle.rem_euclid(360.0);

    // tan() blows up on the vertical axis.
    if angle == 90.0 {
        return (cx, cy - b);
    }
    if angle == 270.0 {
        return (cx, cy + b);
    }
    if a == 0.0 || b == 0.0 {
        let (sin, cos) = angle.to_radians().sin_cos();
        return (cx + a * axis_sign(cos), cy - b * axis_sign(sin));
    }

    let tan = angle.to_radians().tan();
    let mut dx = a * b / (b * b + a * a * tan * tan).sqrt();
    if angle > 90.0 && angle < 270.0 {
        dx = -dx;
    }
    let dy = -dx * tan;
    (cx + dx, cy + dy)
}

fn axis_sign(value: f64) -> f64 {
    if value.abs() < 1e-12 { 0.0 } else { value.signum() }
}

/// Angular span travelled from `start` to `end`, wrapping through 0°.
pub fn sweep_angle(start: f64, end: f64) -> f64 {
    if end >= start {
        end - start
    } else {
        end + (360.0 - start)
    }
}

/// Whether the arc from `start` to `end` is the longer of the two, which is
/// what SVG's large-arc flag selects.
pub fn sweep_exceeds_180(start: f64, end: f64) -> bool {
    sweep_angle(start, end) > 180.0
}

/// On/off stroke lengths for a line style, scaled by the line width.
/// Solid lines have no dash pattern.
pub fn dash_pattern(style: LineStyle, line_width: f64) -> Option<(f64, f64)> {
    match style {
        LineStyle::Solid => None,
        LineStyle::Dashed => Some((10.0 * line_width, 5.0 * line_width)),
        LineStyle::Dotted => Some((2.0 * line_width, 2.0 * line_width)),
    }
}
