//! Scene files: a canvas and its shapes described as JSON.
//!
//! ```json
//! {
//!   "width": 400, "height": 300, "backgroundColor": "#FFFFFF",
//!   "border": { "width": 2, "style": "--", "color": "#333333" },
//!   "shapes": [
//!     { "type": "line", "x1": 10, "y1": 10, "x2": 90, "y2": 90, "lineStyle": "--" },
//!     { "type": "text", "x": 200, "y": 20, "text": "Title", "horizontalAlign": "left" }
//!   ]
//! }
//! ```

use crate::canvas::Canvas;
use crate::error::{CanvasError, Result};
use crate::shape::{ArcSpan, TextLayout};
use crate::style::{ArcConnect, HorizontalAlign, StyleOptions, VerticalAlign};
use crate::theme::Theme;
use serde_json::{Map, Value};
use std::path::Path;

type Object = Map<String, Value>;

pub fn parse_scene(text: &str, theme: &Theme) -> Result<Canvas> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| CanvasError::SceneSyntax(err.to_string()))?;
    scene_from_value(&value, theme)
}

/// Same as [`parse_scene`], but accepts comments, trailing commas and
/// unquoted keys.
pub fn parse_scene_json5(text: &str, theme: &Theme) -> Result<Canvas> {
    let value: Value =
        json5::from_str(text).map_err(|err| CanvasError::SceneSyntax(err.to_string()))?;
    scene_from_value(&value, theme)
}

/// Reads a scene from disk. Files ending in `.json5` use the relaxed syntax.
pub fn load_scene(path: &Path, theme: &Theme) -> Result<Canvas> {
    let text = std::fs::read_to_string(path)?;
    if is_json5(path) {
        parse_scene_json5(&text, theme)
    } else {
        parse_scene(&text, theme)
    }
}

pub fn is_json5(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json5"))
}

pub fn scene_from_value(value: &Value, theme: &Theme) -> Result<Canvas> {
    let root = as_object("scene", value)?;
    let width = required_number(root, "width")?;
    let height = required_number(root, "height")?;
    let mut canvas = Canvas::with_theme(width, height, theme.clone())?;

    match root.get("backgroundColor") {
        None => {}
        Some(Value::Null) => canvas.set_background_color(None)?,
        Some(Value::String(color)) => canvas.set_background_color(Some(color))?,
        Some(other) => return Err(CanvasError::wrong_type("backgroundColor", other)),
    }

    match root.get("border") {
        None | Some(Value::Null) => {}
        Some(Value::Object(border)) => {
            if let Some(width) = optional_number(border, "width")? {
                canvas.set_border_width(width)?;
            }
            if let Some(style) = optional_string(border, "style")? {
                canvas.set_border_style(style)?;
            }
            if let Some(color) = optional_string(border, "color")? {
                canvas.set_border_color(color)?;
            }
        }
        Some(other) => return Err(CanvasError::wrong_type("border", other)),
    }

    match root.get("shapes") {
        None | Some(Value::Null) => {}
        Some(Value::Array(shapes)) => {
            for (index, shape) in shapes.iter().enumerate() {
                let object = as_object(&format!("shapes[{index}]"), shape)?;
                add_shape(&mut canvas, object)?;
            }
        }
        Some(other) => return Err(CanvasError::wrong_type("shapes", other)),
    }

    Ok(canvas)
}

fn add_shape(canvas: &mut Canvas, shape: &Object) -> Result<()> {
    let kind = required_string(shape, "type")?;
    let options = style_options(shape)?;
    match kind {
        "line" => {
            canvas.add_line(
                required_number(shape, "x1")?,
                required_number(shape, "y1")?,
                required_number(shape, "x2")?,
                required_number(shape, "y2")?,
                options,
            )?;
        }
        "polyline" => {
            canvas.add_polyline(&points(shape)?, options)?;
        }
        "polygon" => {
            canvas.add_polygon(&points(shape)?, options)?;
        }
        "rectangle" => {
            let (x, y, w, h) = bounds(shape)?;
            canvas.add_rectangle(x, y, w, h, options)?;
        }
        "oval" => {
            let (x, y, w, h) = bounds(shape)?;
            canvas.add_oval(x, y, w, h, options)?;
        }
        "arc" => {
            let (x, y, w, h) = bounds(shape)?;
            let mut span = ArcSpan::new(
                required_number(shape, "startAngle")?,
                required_number(shape, "endAngle")?,
            );
            if let Some(connect) = optional_string(shape, "connect")? {
                span = span.connect(connect.parse::<ArcConnect>()?);
            }
            canvas.add_arc(x, y, w, h, span, options)?;
        }
        "text" => {
            let x = required_number(shape, "x")?;
            let y = required_number(shape, "y")?;
            let content = required_string(shape, "text")?;
            let mut layout = TextLayout::default().font_size(
                optional_number(shape, "fontSize")?.unwrap_or(canvas.theme().font_size),
            );
            if let Some(align) = optional_string(shape, "horizontalAlign")? {
                layout.horizontal_align = align.parse::<HorizontalAlign>()?;
            }
            if let Some(align) = optional_string(shape, "verticalAlign")? {
                layout.vertical_align = align.parse::<VerticalAlign>()?;
            }
            canvas.add_text_with(x, y, content, layout, options)?;
        }
        other => {
            return Err(CanvasError::bad_value(
                "type",
                format!("unknown shape type '{other}'"),
            ));
        }
    }
    Ok(())
}

fn style_options(shape: &Object) -> Result<StyleOptions> {
    let mut options = StyleOptions::new();
    options.line_width = optional_number(shape, "lineWidth")?;
    options.line_style = optional_string(shape, "lineStyle")?.map(str::to_string);
    options.line_color = optional_string(shape, "lineColor")?.map(str::to_string);
    options.opacity = optional_number(shape, "opacity")?;
    options.name = optional_string(shape, "name")?.map(str::to_string);

    options.fill_color = match shape.get("fillColor") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(color)) => Some(Some(color.clone())),
        Some(other) => return Err(CanvasError::wrong_type("fillColor", other)),
    };

    if let Some(value) = shape.get("rotation") {
        let parts = match value {
            Value::Array(parts) if parts.len() == 3 => parts,
            other => return Err(CanvasError::wrong_type("rotation", other)),
        };
        let mut numbers = [0.0; 3];
        for (slot, part) in numbers.iter_mut().zip(parts) {
            *slot = as_number("rotation", part)?;
        }
        options.rotation = Some((numbers[0], numbers[1], numbers[2]));
    }

    match shape.get("metadata") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (key, value) in entries {
                let text = match value {
                    Value::String(text) => text.clone(),
                    Value::Number(number) => number.to_string(),
                    Value::Bool(flag) => flag.to_string(),
                    other => {
                        return Err(CanvasError::wrong_type(format!("metadata.{key}"), other));
                    }
                };
                options.metadata.insert(key.clone(), text);
            }
        }
        Some(other) => return Err(CanvasError::wrong_type("metadata", other)),
    }

    Ok(options)
}

fn bounds(shape: &Object) -> Result<(f64, f64, f64, f64)> {
    Ok((
        required_number(shape, "x")?,
        required_number(shape, "y")?,
        required_number(shape, "width")?,
        required_number(shape, "height")?,
    ))
}

/// Accepts either a flat `[x, y, x, y]` list or a list of `[x, y]` pairs.
fn points(shape: &Object) -> Result<Vec<f64>> {
    let values = match shape.get("points") {
        Some(Value::Array(values)) => values,
        Some(other) => return Err(CanvasError::wrong_type("points", other)),
        None => return Err(missing("points")),
    };
    let mut flat = Vec::with_capacity(values.len() * 2);
    for value in values {
        match value {
            Value::Array(pair) if pair.len() == 2 => {
                flat.push(as_number("points", &pair[0])?);
                flat.push(as_number("points", &pair[1])?);
            }
            other => flat.push(as_number("points", other)?),
        }
    }
    Ok(flat)
}

fn as_object<'a>(field: &str, value: &'a Value) -> Result<&'a Object> {
    value
        .as_object()
        .ok_or_else(|| CanvasError::wrong_type(field, value))
}

fn as_number(field: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| CanvasError::wrong_type(field, value))
}

fn missing(field: &str) -> CanvasError {
    CanvasError::bad_value(field, "is required")
}

fn required_number(object: &Object, field: &str) -> Result<f64> {
    optional_number(object, field)?.ok_or_else(|| missing(field))
}

fn optional_number(object: &Object, field: &str) -> Result<Option<f64>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_number(field, value).map(Some),
    }
}

fn required_string<'a>(object: &'a Object, field: &str) -> Result<&'a str> {
    optional_string(object, field)?.ok_or_else(|| missing(field))
}

fn optional_string<'a>(object: &'a Object, field: &str) -> Result<Option<&'a str>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(other) => Err(CanvasError::wrong_type(field, other)),
    }
}
