use crate::canvas::Canvas;
use crate::geometry::{dash_pattern, point_on_ellipse, sweep_angle, sweep_exceeds_180};
use crate::shape::{Bounds, Shape, ShapeKind};
use crate::style::{ArcConnect, Fill, HorizontalAlign, Rotation, Style, VerticalAlign};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
const GENERATOR_COMMENT: &str = "<!-- Created with svg-canvas -->";
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Renders the whole canvas as a standalone SVG document.
///
/// The layout is fixed: three header lines, one line holding the
/// background rectangle (empty without a background), one line holding
/// every shape in paint order (empty without shapes), then `</svg>`.
pub fn render_canvas(canvas: &Canvas) -> String {
    let background = frame_svg(canvas);
    let shapes: Vec<String> = canvas.shapes().iter().map(render_shape).collect();

    let mut svg = String::new();
    svg.push_str(XML_DECLARATION);
    svg.push('\n');
    svg.push_str(GENERATOR_COMMENT);
    svg.push('\n');
    svg.push_str(&format!(
        "<svg xmlns=\"{SVG_NAMESPACE}\" width=\"{}\" height=\"{}\">",
        canvas.width(),
        canvas.height()
    ));
    svg.push('\n');
    svg.push_str(&background);
    svg.push('\n');
    svg.push_str(&shapes.join("\n"));
    svg.push('\n');
    svg.push_str("</svg>");
    svg
}

/// The full-page rectangle carrying the background fill and the border.
/// Empty when the canvas has neither.
fn frame_svg(canvas: &Canvas) -> String {
    let border = canvas.border();
    let background = canvas.background_color();
    if background.is_none() && border.width == 0.0 {
        return String::new();
    }
    let mut css = match background {
        Some(color) => format!("fill:{color};"),
        None => "fill:none;".to_string(),
    };
    if border.width == 0.0 {
        css.push_str("stroke-width:0;");
    } else {
        css.push_str(&format!(
            "stroke:{};stroke-width:{};",
            border.color,
            num(border.width)
        ));
        if let Some((on, off)) = dash_pattern(border.style, border.width) {
            css.push_str(&format!("stroke-dasharray:{},{};", num(on), num(off)));
        }
    }
    format!(
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" style=\"{css}\" />",
        canvas.width(),
        canvas.height()
    )
}

pub fn render_shape(shape: &Shape) -> String {
    let style = shape.style();
    match shape.kind() {
        ShapeKind::Line { x1, y1, x2, y2 } => line_svg(style, *x1, *y1, *x2, *y2),
        ShapeKind::Polyline { coordinates } => polyline_svg(style, coordinates),
        ShapeKind::Rectangle { bounds, fill } => rectangle_svg(style, bounds, fill),
        ShapeKind::Polygon { coordinates, fill } => polygon_svg(style, coordinates, fill),
        ShapeKind::Oval { bounds, fill } => oval_svg(style, bounds, fill),
        ShapeKind::Arc {
            bounds,
            fill,
            start_angle,
            end_angle,
            connect,
        } => arc_svg(style, bounds, fill, *start_angle, *end_angle, *connect),
        ShapeKind::Text {
            x,
            y,
            content,
            font_size,
            horizontal_align,
            vertical_align,
            fill,
        } => text_svg(
            style,
            *x,
            *y,
            content,
            *font_size,
            *horizontal_align,
            *vertical_align,
            fill,
        ),
    }
}

fn line_svg(style: &Style, x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" style=\"{}\"{} />",
        num(x1),
        num(y1),
        num(x2),
        num(y2),
        stroke_style(style),
        trailing_attributes(style)
    )
}

fn polyline_svg(style: &Style, coordinates: &[f64]) -> String {
    format!(
        "<polyline points=\"{}\" style=\"fill:none;{}\"{} />",
        points_attribute(coordinates),
        stroke_style(style),
        trailing_attributes(style)
    )
}

fn rectangle_svg(style: &Style, bounds: &Bounds, fill: &Fill) -> String {
    format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" style=\"{}{}\"{} />",
        num(bounds.x),
        num(bounds.y),
        num(bounds.width),
        num(bounds.height),
        fill_style(fill),
        stroke_style(style),
        trailing_attributes(style)
    )
}

fn polygon_svg(style: &Style, coordinates: &[f64], fill: &Fill) -> String {
    format!(
        "<polygon points=\"{}\" style=\"{}{}\"{} />",
        points_attribute(coordinates),
        fill_style(fill),
        stroke_style(style),
        trailing_attributes(style)
    )
}

fn oval_svg(style: &Style, bounds: &Bounds, fill: &Fill) -> String {
    let (cx, cy) = bounds.center();
    format!(
        "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" style=\"{}{}\"{} />",
        num(cx),
        num(cy),
        num(bounds.width / 2.0),
        num(bounds.height / 2.0),
        fill_style(fill),
        stroke_style(style),
        trailing_attributes(style)
    )
}

fn arc_svg(
    style: &Style,
    bounds: &Bounds,
    fill: &Fill,
    start_angle: f64,
    end_angle: f64,
    connect: ArcConnect,
) -> String {
    let (cx, cy) = bounds.center();
    let (rx, ry) = (bounds.width / 2.0, bounds.height / 2.0);
    let point = |angle: f64| point_on_ellipse(cx, cy, bounds.width, bounds.height, angle);
    let (sx, sy) = point(start_angle);
    let (ex, ey) = point(end_angle);

    let mut d = format!("M {},{}", num(sx), num(sy));
    if sweep_angle(start_angle, end_angle) >= 360.0 {
        // Coincident end points would draw nothing; go round in two halves.
        let (mx, my) = point(start_angle + 180.0);
        d.push_str(&arc_segment(rx, ry, false, mx, my));
        d.push_str(&arc_segment(rx, ry, false, ex, ey));
    } else {
        let large = sweep_exceeds_180(start_angle, end_angle);
        d.push_str(&arc_segment(rx, ry, large, ex, ey));
    }
    match connect {
        ArcConnect::None => {}
        ArcConnect::Pie => d.push_str(&format!(" L {},{} Z", num(cx), num(cy))),
        ArcConnect::Direct => d.push_str(" Z"),
    }

    let fill_part = if connect == ArcConnect::None {
        "fill:none;".to_string()
    } else {
        fill_style(fill)
    };
    format!(
        "<path d=\"{d}\" style=\"{}{}\"{} />",
        fill_part,
        stroke_style(style),
        trailing_attributes(style)
    )
}

/// Growing angles run counter-clockwise on screen (see [`point_on_ellipse`]),
/// which is SVG's sweep-flag 0.
fn arc_segment(rx: f64, ry: f64, large: bool, x: f64, y: f64) -> String {
    format!(
        " A {},{} 0 {} 0 {},{}",
        num(rx),
        num(ry),
        u8::from(large),
        num(x),
        num(y)
    )
}

#[allow(clippy::too_many_arguments)]
fn text_svg(
    style: &Style,
    x: f64,
    y: f64,
    content: &str,
    font_size: f64,
    horizontal_align: HorizontalAlign,
    vertical_align: VerticalAlign,
    fill: &Fill,
) -> String {
    format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"{}\" dominant-baseline=\"{}\" style=\"font-size:{};{}{}\"{}>{}</text>",
        num(x),
        num(y),
        text_anchor(horizontal_align),
        dominant_baseline(vertical_align),
        num(font_size),
        fill_style(fill),
        stroke_style(style),
        trailing_attributes(style),
        escape_xml(content)
    )
}

pub fn text_anchor(align: HorizontalAlign) -> &'static str {
    match align {
        HorizontalAlign::Left => "start",
        HorizontalAlign::Center => "middle",
        HorizontalAlign::Right => "end",
    }
}

pub fn dominant_baseline(align: VerticalAlign) -> &'static str {
    match align {
        VerticalAlign::Top => "hanging",
        VerticalAlign::Center => "middle",
        VerticalAlign::Bottom => "alphabetic",
    }
}

/// The `stroke…;` declarations for an outline.
pub fn stroke_style(style: &Style) -> String {
    let mut css = format!("stroke:{};", style.line_color());
    if style.line_width() != 1.0 {
        css.push_str(&format!("stroke-width:{};", num(style.line_width())));
    }
    if let Some((on, off)) = dash_pattern(style.line_style(), style.line_width()) {
        css.push_str(&format!("stroke-dasharray:{},{};", num(on), num(off)));
    }
    css
}

/// The `fill…;` declarations for an interior.
pub fn fill_style(fill: &Fill) -> String {
    let mut css = match &fill.color {
        Some(color) => format!("fill:{color};"),
        None => "fill:none;".to_string(),
    };
    if fill.opacity != 1.0 {
        css.push_str(&format!("fill-opacity:{:.3};", fill.opacity));
    }
    css
}

/// ` transform="rotate(…)"`, or nothing for the identity rotation.
pub fn rotation_transform(rotation: &Rotation) -> String {
    if rotation.is_identity() {
        return String::new();
    }
    format!(
        " transform=\"rotate({} {} {})\"",
        num(rotation.angle),
        num(rotation.pivot_x),
        num(rotation.pivot_y)
    )
}

/// Metadata as extra attributes, in key order.
pub fn metadata_attributes(metadata: &BTreeMap<String, String>) -> String {
    metadata
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", escape_xml(key), escape_xml(value)))
        .collect()
}

fn trailing_attributes(style: &Style) -> String {
    let mut attrs = rotation_transform(&style.rotation());
    attrs.push_str(&metadata_attributes(style.metadata()));
    attrs
}

fn points_attribute(coordinates: &[f64]) -> String {
    coordinates
        .chunks_exact(2)
        .map(|pair| format!("{},{}", num(pair[0]), num(pair[1])))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One fractional digit, with negative zero folded into zero.
fn num(value: f64) -> String {
    let formatted = format!("{value:.1}");
    if formatted == "-0.0" {
        "0.0".to_string()
    } else {
        formatted
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree
        .size()
        .to_int_size()
        .scale_by(render_cfg.scale)
        .ok_or_else(|| anyhow::anyhow!("Invalid PNG scale {}", render_cfg.scale))?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let transform = resvg::tiny_skia::Transform::from_scale(render_cfg.scale, render_cfg.scale);
    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, transform, &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
