use crate::color::Color;
use crate::error::{CanvasError, Result, finite, non_negative};
use crate::geometry;
use crate::style::{
    ArcConnect, Fill, HorizontalAlign, LineStyle, Rotation, Style, StyleOptions, VerticalAlign,
    check_metadata_key, check_opacity,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const POLYLINE_MIN_VERTICES: usize = 2;
const POLYGON_MIN_VERTICES: usize = 3;
const TEXT_PREVIEW_CHARS: usize = 20;

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a shape. Unique for the lifetime of the process; clones get
/// a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

impl ShapeId {
    fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape #{}", self.0)
    }
}

/// Axis-aligned box given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            x: finite("x", x)?,
            y: finite("y", y)?,
            width: non_negative("width", width)?,
            height: non_negative("height", height)?,
        })
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Start/end angles of an arc plus how its ends are joined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start_angle: f64,
    pub end_angle: f64,
    pub connect: ArcConnect,
}

impl ArcSpan {
    pub fn new(start_angle: f64, end_angle: f64) -> Self {
        Self {
            start_angle,
            end_angle,
            connect: ArcConnect::None,
        }
    }

    pub fn connect(mut self, connect: ArcConnect) -> Self {
        self.connect = connect;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub font_size: f64,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
}

impl TextLayout {
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn align(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.horizontal_align = horizontal;
        self.vertical_align = vertical;
        self
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Center,
        }
    }
}

/// Geometry of each kind of shape.
///
/// Vertex lists are flat `x, y, x, y, …` buffers.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        coordinates: Vec<f64>,
    },
    Rectangle {
        bounds: Bounds,
        fill: Fill,
    },
    Polygon {
        coordinates: Vec<f64>,
        fill: Fill,
    },
    Oval {
        bounds: Bounds,
        fill: Fill,
    },
    Arc {
        bounds: Bounds,
        fill: Fill,
        start_angle: f64,
        end_angle: f64,
        connect: ArcConnect,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        font_size: f64,
        horizontal_align: HorizontalAlign,
        vertical_align: VerticalAlign,
        fill: Fill,
    },
}

impl ShapeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Line { .. } => "Line",
            Self::Polyline { .. } => "Polyline",
            Self::Rectangle { .. } => "Rectangle",
            Self::Polygon { .. } => "Polygon",
            Self::Oval { .. } => "Oval",
            Self::Arc { .. } => "Arc",
            Self::Text { .. } => "Text",
        }
    }
}

/// A drawable: shared outline style plus kind-specific geometry.
#[derive(Debug)]
pub struct Shape {
    id: ShapeId,
    style: Style,
    kind: ShapeKind,
}

impl Clone for Shape {
    fn clone(&self) -> Self {
        Self {
            id: ShapeId::next(),
            style: self.style.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.style == other.style && self.kind == other.kind
    }
}

fn check_coordinates(shape: &'static str, coordinates: &[f64], min: usize) -> Result<Vec<f64>> {
    for (idx, value) in coordinates.iter().enumerate() {
        finite(&format!("coordinate {idx}"), *value)?;
    }
    if coordinates.len() % 2 != 0 {
        return Err(CanvasError::MalformedCoordinates(coordinates.len()));
    }
    let count = coordinates.len() / 2;
    if count < min {
        return Err(CanvasError::InsufficientVertices { shape, min, count });
    }
    Ok(coordinates.to_vec())
}

fn check_angle(field: &str, angle: f64) -> Result<f64> {
    let angle = finite(field, angle)?;
    if !(0.0..=360.0).contains(&angle) {
        return Err(CanvasError::bad_value(
            field,
            format!("must be between 0 and 360, not {angle}"),
        ));
    }
    Ok(angle)
}

fn check_font_size(font_size: f64) -> Result<f64> {
    let font_size = finite("font_size", font_size)?;
    if font_size <= 0.0 {
        return Err(CanvasError::bad_value(
            "font_size",
            format!("must be positive, not {font_size}"),
        ));
    }
    Ok(font_size)
}

fn check_factor(field: &str, factor: f64) -> Result<f64> {
    let factor = finite(field, factor)?;
    if factor <= 0.0 {
        return Err(CanvasError::bad_value(
            field,
            format!("must be positive, not {factor}"),
        ));
    }
    Ok(factor)
}

impl Shape {
    fn from_parts(style: Style, kind: ShapeKind) -> Self {
        Self {
            id: ShapeId::next(),
            style,
            kind,
        }
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, options: StyleOptions) -> Result<Self> {
        let kind = ShapeKind::Line {
            x1: finite("x1", x1)?,
            y1: finite("y1", y1)?,
            x2: finite("x2", x2)?,
            y2: finite("y2", y2)?,
        };
        Ok(Self::from_parts(options.build_style(1.0)?, kind))
    }

    pub fn polyline(coordinates: &[f64], options: StyleOptions) -> Result<Self> {
        let coordinates = check_coordinates("Polyline", coordinates, POLYLINE_MIN_VERTICES)?;
        let style = options.build_style(1.0)?;
        Ok(Self::from_parts(style, ShapeKind::Polyline { coordinates }))
    }

    pub fn rectangle(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        options: StyleOptions,
    ) -> Result<Self> {
        let bounds = Bounds::new(x, y, width, height)?;
        let style = options.build_style(1.0)?;
        let fill = options.build_fill(Color::white())?;
        Ok(Self::from_parts(style, ShapeKind::Rectangle { bounds, fill }))
    }

    pub fn polygon(coordinates: &[f64], options: StyleOptions) -> Result<Self> {
        let coordinates = check_coordinates("Polygon", coordinates, POLYGON_MIN_VERTICES)?;
        let style = options.build_style(1.0)?;
        let fill = options.build_fill(Color::white())?;
        Ok(Self::from_parts(style, ShapeKind::Polygon { coordinates, fill }))
    }

    pub fn oval(x: f64, y: f64, width: f64, height: f64, options: StyleOptions) -> Result<Self> {
        let bounds = Bounds::new(x, y, width, height)?;
        let style = options.build_style(1.0)?;
        let fill = options.build_fill(Color::white())?;
        Ok(Self::from_parts(style, ShapeKind::Oval { bounds, fill }))
    }

    pub fn arc(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        span: ArcSpan,
        options: StyleOptions,
    ) -> Result<Self> {
        let bounds = Bounds::new(x, y, width, height)?;
        let start_angle = check_angle("start_angle", span.start_angle)?;
        let end_angle = check_angle("end_angle", span.end_angle)?;
        let style = options.build_style(1.0)?;
        let fill = options.build_fill(Color::white())?;
        Ok(Self::from_parts(
            style,
            ShapeKind::Arc {
                bounds,
                fill,
                start_angle,
                end_angle,
                connect: span.connect,
            },
        ))
    }

    /// Text anchored at `(x, y)`. Unlike other shapes, text defaults to a
    /// black fill and no outline.
    pub fn text(
        x: f64,
        y: f64,
        content: impl Into<String>,
        layout: TextLayout,
        options: StyleOptions,
    ) -> Result<Self> {
        let x = finite("x", x)?;
        let y = finite("y", y)?;
        let font_size = check_font_size(layout.font_size)?;
        let style = options.build_style(0.0)?;
        let fill = options.build_fill(Color::black())?;
        Ok(Self::from_parts(
            style,
            ShapeKind::Text {
                x,
                y,
                content: content.into(),
                font_size,
                horizontal_align: layout.horizontal_align,
                vertical_align: layout.vertical_align,
                fill,
            },
        ))
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn name(&self) -> Option<&str> {
        self.style.name()
    }

    pub fn rotation(&self) -> Rotation {
        self.style.rotation
    }

    pub fn fill(&self) -> Option<&Fill> {
        match &self.kind {
            ShapeKind::Line { .. } | ShapeKind::Polyline { .. } => None,
            ShapeKind::Rectangle { fill, .. }
            | ShapeKind::Polygon { fill, .. }
            | ShapeKind::Oval { fill, .. }
            | ShapeKind::Arc { fill, .. }
            | ShapeKind::Text { fill, .. } => Some(fill),
        }
    }

    fn fill_mut(&mut self) -> Result<&mut Fill> {
        let label = self.kind.label();
        match &mut self.kind {
            ShapeKind::Line { .. } | ShapeKind::Polyline { .. } => Err(CanvasError::bad_value(
                "fill",
                format!("a {label} has no interior"),
            )),
            ShapeKind::Rectangle { fill, .. }
            | ShapeKind::Polygon { fill, .. }
            | ShapeKind::Oval { fill, .. }
            | ShapeKind::Arc { fill, .. }
            | ShapeKind::Text { fill, .. } => Ok(fill),
        }
    }

    pub fn bounds(&self) -> Option<&Bounds> {
        match &self.kind {
            ShapeKind::Rectangle { bounds, .. }
            | ShapeKind::Oval { bounds, .. }
            | ShapeKind::Arc { bounds, .. } => Some(bounds),
            _ => None,
        }
    }

    pub fn center(&self) -> Option<(f64, f64)> {
        self.bounds().map(Bounds::center)
    }

    /// Clockwise-from-start span of an arc; `None` for other shapes.
    pub fn sweep_angle(&self) -> Option<f64> {
        match self.kind {
            ShapeKind::Arc {
                start_angle,
                end_angle,
                ..
            } => Some(geometry::sweep_angle(start_angle, end_angle)),
            _ => None,
        }
    }

    /// A copy of the vertex list of a polygon or polyline.
    pub fn vertices(&self) -> Option<Vec<(f64, f64)>> {
        match &self.kind {
            ShapeKind::Polyline { coordinates } | ShapeKind::Polygon { coordinates, .. } => Some(
                coordinates
                    .chunks_exact(2)
                    .map(|pair| (pair[0], pair[1]))
                    .collect(),
            ),
            _ => None,
        }
    }

    fn vertex_buffer(&mut self) -> Result<(&mut Vec<f64>, usize)> {
        let label = self.kind.label();
        match &mut self.kind {
            ShapeKind::Polyline { coordinates } => Ok((coordinates, POLYLINE_MIN_VERTICES)),
            ShapeKind::Polygon { coordinates, .. } => Ok((coordinates, POLYGON_MIN_VERTICES)),
            _ => Err(CanvasError::bad_value(
                "vertices",
                format!("a {label} has no vertex list"),
            )),
        }
    }

    pub fn add_vertex(&mut self, x: f64, y: f64) -> Result<()> {
        let x = finite("x", x)?;
        let y = finite("y", y)?;
        let (coordinates, _) = self.vertex_buffer()?;
        coordinates.extend([x, y]);
        Ok(())
    }

    /// Removes the vertex at `index` (a vertex index, not a coordinate
    /// index) and returns it.
    pub fn remove_vertex(&mut self, index: usize) -> Result<(f64, f64)> {
        let label = self.kind.label();
        let (coordinates, min) = self.vertex_buffer()?;
        let count = coordinates.len() / 2;
        if index >= count {
            return Err(CanvasError::bad_value(
                "vertex index",
                format!("{index} is out of range for {count} vertices"),
            ));
        }
        if count <= min {
            return Err(CanvasError::InsufficientVertices {
                shape: label,
                min,
                count: count - 1,
            });
        }
        let removed: Vec<f64> = coordinates.drain(index * 2..index * 2 + 2).collect();
        Ok((removed[0], removed[1]))
    }

    /// Sets the rotation, discarding whatever rotation was there before.
    pub fn rotate(&mut self, pivot_x: f64, pivot_y: f64, angle: f64) -> Result<()> {
        self.style.rotation = Rotation::new(pivot_x, pivot_y, angle)?;
        Ok(())
    }

    pub fn clear_rotation(&mut self) {
        self.style.rotation = Rotation::IDENTITY;
    }

    /// Multiplies every x-bearing field by `fx` and every y-bearing field by
    /// `fy`, including widths, heights and the rotation pivot.
    pub fn scale(&mut self, fx: f64, fy: f64) -> Result<()> {
        let fx = check_factor("scale x", fx)?;
        let fy = check_factor("scale y", fy)?;
        match &mut self.kind {
            ShapeKind::Line { x1, y1, x2, y2 } => {
                *x1 *= fx;
                *y1 *= fy;
                *x2 *= fx;
                *y2 *= fy;
            }
            ShapeKind::Polyline { coordinates } | ShapeKind::Polygon { coordinates, .. } => {
                for pair in coordinates.chunks_exact_mut(2) {
                    pair[0] *= fx;
                    pair[1] *= fy;
                }
            }
            ShapeKind::Rectangle { bounds, .. }
            | ShapeKind::Oval { bounds, .. }
            | ShapeKind::Arc { bounds, .. } => {
                bounds.x *= fx;
                bounds.y *= fy;
                bounds.width *= fx;
                bounds.height *= fy;
            }
            ShapeKind::Text { x, y, .. } => {
                *x *= fx;
                *y *= fy;
            }
        }
        self.style.rotation.pivot_x *= fx;
        self.style.rotation.pivot_y *= fy;
        Ok(())
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        let dx = finite("dx", dx)?;
        let dy = finite("dy", dy)?;
        match &mut self.kind {
            ShapeKind::Line { x1, y1, x2, y2 } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
            ShapeKind::Polyline { coordinates } | ShapeKind::Polygon { coordinates, .. } => {
                for pair in coordinates.chunks_exact_mut(2) {
                    pair[0] += dx;
                    pair[1] += dy;
                }
            }
            ShapeKind::Rectangle { bounds, .. }
            | ShapeKind::Oval { bounds, .. }
            | ShapeKind::Arc { bounds, .. } => {
                bounds.x += dx;
                bounds.y += dy;
            }
            ShapeKind::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
        }
        if !self.style.rotation.is_identity() {
            self.style.rotation.pivot_x += dx;
            self.style.rotation.pivot_y += dy;
        }
        Ok(())
    }

    pub fn set_line_width(&mut self, width: f64) -> Result<()> {
        self.style.line_width = non_negative("line_width", width)?;
        Ok(())
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.style.line_style = style;
    }

    pub fn set_line_color(&mut self, color: &str) -> Result<()> {
        self.style.line_color = Color::normalize(color)?;
        Ok(())
    }

    /// `None` removes the fill.
    pub fn set_fill_color(&mut self, color: Option<&str>) -> Result<()> {
        let color = color.map(Color::normalize).transpose()?;
        self.fill_mut()?.color = color;
        Ok(())
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        let opacity = check_opacity(opacity)?;
        self.fill_mut()?.opacity = opacity;
        Ok(())
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.style.name = name;
    }

    /// Adds or replaces one metadata attribute. The key must be an XML name
    /// the renderer does not already write.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        check_metadata_key(&key)?;
        self.style.metadata.insert(key, value.into());
        Ok(())
    }

    pub fn remove_metadata(&mut self, key: &str) -> Option<String> {
        self.style.metadata.remove(key)
    }

    pub fn set_endpoints(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let new = (finite("x1", x1)?, finite("y1", y1)?, finite("x2", x2)?, finite("y2", y2)?);
        match &mut self.kind {
            ShapeKind::Line { x1, y1, x2, y2 } => {
                (*x1, *y1, *x2, *y2) = new;
                Ok(())
            }
            other => Err(CanvasError::bad_value(
                "endpoints",
                format!("a {} has no endpoints", other.label()),
            )),
        }
    }

    pub fn set_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let new = Bounds::new(x, y, width, height)?;
        match &mut self.kind {
            ShapeKind::Rectangle { bounds, .. }
            | ShapeKind::Oval { bounds, .. }
            | ShapeKind::Arc { bounds, .. } => {
                *bounds = new;
                Ok(())
            }
            other => Err(CanvasError::bad_value(
                "bounds",
                format!("a {} has no bounding box", other.label()),
            )),
        }
    }

    pub fn set_angles(&mut self, start: f64, end: f64) -> Result<()> {
        let start = check_angle("start_angle", start)?;
        let end = check_angle("end_angle", end)?;
        match &mut self.kind {
            ShapeKind::Arc {
                start_angle,
                end_angle,
                ..
            } => {
                *start_angle = start;
                *end_angle = end;
                Ok(())
            }
            other => Err(CanvasError::bad_value(
                "angles",
                format!("a {} has no angles", other.label()),
            )),
        }
    }

    pub fn set_connect(&mut self, mode: ArcConnect) -> Result<()> {
        match &mut self.kind {
            ShapeKind::Arc { connect, .. } => {
                *connect = mode;
                Ok(())
            }
            other => Err(CanvasError::bad_value(
                "connect",
                format!("a {} is not an arc", other.label()),
            )),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        match &mut self.kind {
            ShapeKind::Text { content, .. } => {
                *content = text.into();
                Ok(())
            }
            other => Err(CanvasError::bad_value(
                "text",
                format!("a {} has no text", other.label()),
            )),
        }
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<()> {
        let size = check_font_size(size)?;
        match &mut self.kind {
            ShapeKind::Text { font_size, .. } => {
                *font_size = size;
                Ok(())
            }
            other => Err(CanvasError::bad_value(
                "font_size",
                format!("a {} has no text", other.label()),
            )),
        }
    }

    pub fn set_alignment(
        &mut self,
        horizontal: HorizontalAlign,
        vertical: VerticalAlign,
    ) -> Result<()> {
        match &mut self.kind {
            ShapeKind::Text {
                horizontal_align,
                vertical_align,
                ..
            } => {
                *horizontal_align = horizontal;
                *vertical_align = vertical;
                Ok(())
            }
            other => Err(CanvasError::bad_value(
                "alignment",
                format!("a {} has no text", other.label()),
            )),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.kind.label();
        match &self.kind {
            ShapeKind::Line { x1, y1, x2, y2 } => {
                write!(f, "<{label} ({x1},{y1}) to ({x2},{y2})>")
            }
            ShapeKind::Polyline { coordinates } | ShapeKind::Polygon { coordinates, .. } => {
                write!(f, "<{label} ({} points)>", coordinates.len() / 2)
            }
            ShapeKind::Rectangle { bounds, .. }
            | ShapeKind::Oval { bounds, .. }
            | ShapeKind::Arc { bounds, .. } => write!(
                f,
                "<{label} {}×{} at ({},{})>",
                bounds.width, bounds.height, bounds.x, bounds.y
            ),
            ShapeKind::Text { content, .. } => {
                if content.chars().count() > TEXT_PREVIEW_CHARS {
                    let preview: String = content.chars().take(TEXT_PREVIEW_CHARS).collect();
                    write!(f, "<{label} ('{preview}...')>")
                } else {
                    write!(f, "<{label} ('{content}')>")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_defaults() {
        let line = Shape::line(10.0, 30.0, 90.0, 70.0, StyleOptions::new()).unwrap();
        assert_eq!(line.style().line_width(), 1.0);
        assert_eq!(line.style().line_style(), LineStyle::Solid);
        assert_eq!(line.style().line_color().as_str(), "#000000");
        assert!(line.rotation().is_identity());
        assert!(line.style().metadata().is_empty());
        assert!(line.fill().is_none());
        assert_eq!(line.to_string(), "<Line (10,30) to (90,70)>");
    }

    #[test]
    fn line_coordinates_must_be_numbers() {
        let err = Shape::line(f64::NAN, 30.0, 90.0, 70.0, StyleOptions::new()).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidArgumentType { .. }));
        assert!(Shape::line(10.5, 30.0, 90.0, 70.5, StyleOptions::new()).is_ok());
    }

    #[test]
    fn polygon_vertex_rules() {
        let polygon =
            Shape::polygon(&[10.0, 30.0, 60.0, 100.0, 45.0, 45.0, 0.0, 40.0], StyleOptions::new())
                .unwrap();
        assert_eq!(polygon.vertices().unwrap().len(), 4);
        assert_eq!(polygon.fill().unwrap(), &Fill::default());
        assert_eq!(polygon.to_string(), "<Polygon (4 points)>");

        assert!(matches!(
            Shape::polygon(&[10.0, 30.0, 100.0, 45.0, 45.0, 0.0, 40.0], StyleOptions::new()),
            Err(CanvasError::MalformedCoordinates(7))
        ));
        assert!(Shape::polygon(&[0.0, 0.0, 10.0, 0.0, 5.0, 5.0], StyleOptions::new()).is_ok());
        assert!(matches!(
            Shape::polygon(&[45.0, 45.0, 0.0, 40.0], StyleOptions::new()),
            Err(CanvasError::InsufficientVertices { min: 3, count: 2, .. })
        ));
    }

    #[test]
    fn polyline_vertex_rules() {
        assert!(Shape::polyline(&[0.0, 0.0, 10.0, 10.0], StyleOptions::new()).is_ok());
        assert!(matches!(
            Shape::polyline(&[0.0, 0.0], StyleOptions::new()),
            Err(CanvasError::InsufficientVertices { min: 2, count: 1, .. })
        ));
        assert!(matches!(
            Shape::polyline(&[0.0, 0.0, 10.0], StyleOptions::new()),
            Err(CanvasError::MalformedCoordinates(3))
        ));
    }

    #[test]
    fn remove_vertex_respects_minimum() {
        let mut polyline = Shape::polyline(&[0.0, 0.0, 10.0, 10.0], StyleOptions::new()).unwrap();
        assert!(matches!(
            polyline.remove_vertex(0),
            Err(CanvasError::InsufficientVertices { .. })
        ));
        polyline.add_vertex(20.0, 5.0).unwrap();
        assert_eq!(polyline.remove_vertex(1).unwrap(), (10.0, 10.0));
        assert_eq!(polyline.vertices().unwrap(), vec![(0.0, 0.0), (20.0, 5.0)]);

        let mut polygon =
            Shape::polygon(&[0.0, 0.0, 10.0, 0.0, 5.0, 5.0, 0.0, 5.0], StyleOptions::new())
                .unwrap();
        assert!(polygon.remove_vertex(9).is_err());
        polygon.remove_vertex(3).unwrap();
        assert_eq!(polygon.vertices().unwrap().len(), 3);
        assert!(polygon.remove_vertex(0).is_err());
        assert_eq!(polygon.vertices().unwrap().len(), 3);
    }

    #[test]
    fn vertices_are_a_snapshot() {
        let mut polygon =
            Shape::polygon(&[0.0, 0.0, 10.0, 0.0, 5.0, 5.0], StyleOptions::new()).unwrap();
        let mut snapshot = polygon.vertices().unwrap();
        snapshot.clear();
        assert_eq!(polygon.vertices().unwrap().len(), 3);
        polygon.add_vertex(1.0, 1.0).unwrap();
        assert_eq!(polygon.vertices().unwrap()[3], (1.0, 1.0));
    }

    #[test]
    fn add_vertex_needs_a_vertex_list() {
        let mut rect = Shape::rectangle(0.0, 0.0, 10.0, 10.0, StyleOptions::new()).unwrap();
        assert!(matches!(
            rect.add_vertex(1.0, 1.0),
            Err(CanvasError::InvalidArgumentValue { .. })
        ));
    }

    #[test]
    fn rotation_replaces_previous_rotation() {
        let mut line =
            Shape::line(0.0, 0.0, 10.0, 10.0, StyleOptions::new().rotation(10.0, 10.0, 45.0))
                .unwrap();
        line.rotate(40.0, 40.0, 270.0).unwrap();
        assert_eq!(line.rotation(), Rotation::new(40.0, 40.0, 270.0).unwrap());
        assert!(matches!(
            line.rotate(40.0, 40.0, 400.0),
            Err(CanvasError::InvalidRotation(_))
        ));
        assert_eq!(line.rotation().angle, 270.0);
        line.clear_rotation();
        assert!(line.rotation().is_identity());
    }

    #[test]
    fn constructors_are_all_or_nothing() {
        let err = Shape::rectangle(
            0.0,
            0.0,
            10.0,
            10.0,
            StyleOptions::new().line_color("#FF0000").fill_color("nope"),
        )
        .unwrap_err();
        assert!(matches!(err, CanvasError::InvalidColorFormat(_)));
    }

    #[test]
    fn setters_leave_state_alone_on_error() {
        let mut oval = Shape::oval(10.0, 30.0, 400.0, 500.0, StyleOptions::new()).unwrap();
        assert!(oval.set_opacity(1.5).is_err());
        assert!(oval.set_line_color("#12345").is_err());
        assert!(oval.set_line_width(-1.0).is_err());
        assert_eq!(oval.fill().unwrap().opacity, 1.0);
        assert_eq!(oval.style().line_color().as_str(), "#000000");
        assert_eq!(oval.style().line_width(), 1.0);

        oval.set_fill_color(Some("#00ff00")).unwrap();
        assert_eq!(oval.fill().unwrap().color.as_ref().unwrap().as_str(), "#00FF00");
        oval.set_fill_color(None).unwrap();
        assert!(oval.fill().unwrap().color.is_none());

        let mut line = Shape::line(0.0, 0.0, 1.0, 1.0, StyleOptions::new()).unwrap();
        assert!(line.set_fill_color(Some("#FFFFFF")).is_err());
    }

    #[test]
    fn boxes_have_centers() {
        let oval = Shape::oval(10.0, 30.0, 400.0, 500.0, StyleOptions::new()).unwrap();
        assert_eq!(oval.center(), Some((210.0, 280.0)));
        assert_eq!(oval.to_string(), "<Oval 400×500 at (10,30)>");
        assert!(Shape::oval(0.0, 0.0, -4.0, 5.0, StyleOptions::new()).is_err());
    }

    #[test]
    fn arc_sweep_angles() {
        let arc = Shape::arc(0.0, 0.0, 100.0, 100.0, ArcSpan::new(35.0, 25.0), StyleOptions::new())
            .unwrap();
        assert_eq!(arc.sweep_angle(), Some(350.0));
        let mut arc =
            Shape::arc(0.0, 0.0, 100.0, 100.0, ArcSpan::new(25.0, 35.0), StyleOptions::new())
                .unwrap();
        assert_eq!(arc.sweep_angle(), Some(10.0));
        arc.set_angles(0.0, 360.0).unwrap();
        assert_eq!(arc.sweep_angle(), Some(360.0));
        assert!(arc.set_angles(0.0, 361.0).is_err());
        let negative = ArcSpan::new(-10.0, 5.0);
        assert!(Shape::arc(0.0, 0.0, 1.0, 1.0, negative, StyleOptions::new()).is_err());
    }

    #[test]
    fn text_defaults_and_preview() {
        let text =
            Shape::text(50.0, 50.0, "Test", TextLayout::default(), StyleOptions::new()).unwrap();
        assert_eq!(text.to_string(), "<Text ('Test')>");
        assert_eq!(text.style().line_width(), 0.0);
        assert_eq!(text.fill().unwrap().color, Some(Color::black()));

        let long = Shape::text(
            0.0,
            0.0,
            "012345678901234567890",
            TextLayout::default(),
            StyleOptions::new(),
        )
        .unwrap();
        assert_eq!(long.to_string(), "<Text ('01234567890123456789...')>");

        let zero_size = TextLayout::default().font_size(0.0);
        assert!(Shape::text(0.0, 0.0, "x", zero_size, StyleOptions::new()).is_err());
    }

    #[test]
    fn scale_and_translate_move_every_coordinate() {
        let mut rect = Shape::rectangle(
            10.0,
            20.0,
            30.0,
            40.0,
            StyleOptions::new().rotation(50.0, 50.0, 90.0),
        )
        .unwrap();
        rect.scale(2.0, 0.5).unwrap();
        assert_eq!(rect.bounds(), Some(&Bounds { x: 20.0, y: 10.0, width: 60.0, height: 20.0 }));
        assert_eq!(rect.rotation().pivot_x, 100.0);
        assert_eq!(rect.rotation().pivot_y, 25.0);
        rect.translate(-20.0, 5.0).unwrap();
        assert_eq!(rect.bounds(), Some(&Bounds { x: 0.0, y: 15.0, width: 60.0, height: 20.0 }));
        assert!(rect.scale(0.0, 1.0).is_err());
    }

    #[test]
    fn scale_and_translate_vertex_buffers() {
        let mut polygon =
            Shape::polygon(&[0.0, 0.0, 10.0, 0.0, 5.0, 8.0], StyleOptions::new()).unwrap();
        polygon.scale(2.0, 0.5).unwrap();
        assert_eq!(
            polygon.vertices().unwrap(),
            vec![(0.0, 0.0), (20.0, 0.0), (10.0, 4.0)]
        );
        polygon.translate(1.0, -1.0).unwrap();
        assert_eq!(
            polygon.vertices().unwrap(),
            vec![(1.0, -1.0), (21.0, -1.0), (11.0, 3.0)]
        );

        let mut polyline = Shape::polyline(&[1.0, 2.0, 3.0, 4.0], StyleOptions::new()).unwrap();
        polyline.scale(3.0, 2.0).unwrap();
        polyline.translate(-3.0, 0.5).unwrap();
        assert_eq!(polyline.vertices().unwrap(), vec![(0.0, 4.5), (6.0, 8.5)]);
    }

    #[test]
    fn scale_and_translate_oval_and_arc_boxes() {
        let mut oval = Shape::oval(10.0, 20.0, 40.0, 10.0, StyleOptions::new()).unwrap();
        oval.scale(0.5, 4.0).unwrap();
        assert_eq!(oval.bounds(), Some(&Bounds { x: 5.0, y: 80.0, width: 20.0, height: 40.0 }));
        oval.translate(5.0, -80.0).unwrap();
        assert_eq!(oval.center(), Some((20.0, 20.0)));

        let span = ArcSpan::new(10.0, 200.0).connect(ArcConnect::Pie);
        let mut arc = Shape::arc(0.0, 0.0, 100.0, 50.0, span, StyleOptions::new()).unwrap();
        arc.scale(2.0, 2.0).unwrap();
        arc.translate(10.0, 10.0).unwrap();
        assert_eq!(
            arc.bounds(),
            Some(&Bounds { x: 10.0, y: 10.0, width: 200.0, height: 100.0 })
        );
        assert_eq!(arc.sweep_angle(), Some(190.0));
    }

    #[test]
    fn scale_and_translate_text_anchor_point() {
        let mut text =
            Shape::text(10.0, 20.0, "hi", TextLayout::default(), StyleOptions::new()).unwrap();
        text.scale(1.5, 0.5).unwrap();
        text.translate(-5.0, 5.0).unwrap();
        assert!(matches!(
            text.kind(),
            ShapeKind::Text { x, y, font_size, .. }
                if *x == 10.0 && *y == 15.0 && *font_size == 18.0
        ));
    }

    #[test]
    fn translate_leaves_identity_rotation_alone() {
        let mut line = Shape::line(0.0, 0.0, 10.0, 10.0, StyleOptions::new()).unwrap();
        line.translate(30.0, 40.0).unwrap();
        assert!(line.rotation().is_identity());
        assert_eq!(line.rotation(), Rotation::IDENTITY);

        line.rotate(5.0, 5.0, 45.0).unwrap();
        line.translate(1.0, 2.0).unwrap();
        assert_eq!(line.rotation(), Rotation::new(6.0, 7.0, 45.0).unwrap());
    }

    #[test]
    fn metadata_setter_checks_keys() {
        let mut rect = Shape::rectangle(0.0, 0.0, 1.0, 1.0, StyleOptions::new()).unwrap();
        rect.set_metadata("onclick", "go()").unwrap();
        for key in ["style", "on click", ""] {
            assert!(matches!(
                rect.set_metadata(key, "x"),
                Err(CanvasError::InvalidArgumentValue { .. })
            ));
        }
        assert_eq!(rect.style().metadata().len(), 1);
        assert_eq!(rect.remove_metadata("onclick").as_deref(), Some("go()"));
        assert!(rect.style().metadata().is_empty());
    }

    #[test]
    fn clones_get_fresh_ids() {
        let line = Shape::line(0.0, 0.0, 1.0, 1.0, StyleOptions::new()).unwrap();
        let copy = line.clone();
        assert_ne!(line.id(), copy.id());
        assert_eq!(line, copy);
    }
}
