use crate::color::Color;
use crate::error::{CanvasError, Result, finite, non_negative};
use crate::render;
use crate::shape::{ArcSpan, Shape, ShapeId, TextLayout};
use crate::style::{LineStyle, StyleOptions};
use crate::theme::Theme;
use std::fmt;
use std::path::Path;

/// Outline drawn around the page. A zero width draws nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub width: f64,
    pub style: LineStyle,
    pub color: Color,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: 0.0,
            style: LineStyle::Solid,
            color: Color::black(),
        }
    }
}

/// A page of shapes, painted in insertion order.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    background_color: Option<Color>,
    border: Border,
    theme: Theme,
    shapes: Vec<Shape>,
}

fn page_dimension(field: &str, value: f64) -> Result<u32> {
    let rounded = finite(field, value)?.round();
    if rounded < 1.0 || rounded > f64::from(u32::MAX) {
        return Err(CanvasError::bad_value(
            field,
            format!("must be a positive whole number of pixels, not {value}"),
        ));
    }
    Ok(rounded as u32)
}

impl Canvas {
    /// Fractional dimensions are rounded to the nearest pixel, halves up.
    pub fn new(width: f64, height: f64, background_color: Option<&str>) -> Result<Self> {
        Ok(Self {
            width: page_dimension("width", width)?,
            height: page_dimension("height", height)?,
            background_color: background_color.map(Color::normalize).transpose()?,
            border: Border::default(),
            theme: Theme::standard(),
            shapes: Vec::new(),
        })
    }

    /// A canvas whose shapes take their unset style values from `theme`.
    /// The theme's background is used when `background_color` is `None`.
    pub fn with_theme(width: f64, height: f64, theme: Theme) -> Result<Self> {
        let background = theme.background.clone();
        let mut canvas = Self::new(width, height, background.as_deref())?;
        canvas.theme = theme;
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background_color(&self) -> Option<&Color> {
        self.background_color.as_ref()
    }

    pub fn set_background_color(&mut self, color: Option<&str>) -> Result<()> {
        self.background_color = color.map(Color::normalize).transpose()?;
        Ok(())
    }

    pub fn border(&self) -> &Border {
        &self.border
    }

    pub fn set_border_width(&mut self, width: f64) -> Result<()> {
        self.border.width = non_negative("border_width", width)?;
        Ok(())
    }

    /// Accepts the same tokens as a shape's line style.
    pub fn set_border_style(&mut self, style: &str) -> Result<()> {
        self.border.style = style.parse()?;
        Ok(())
    }

    pub fn set_border_color(&mut self, color: &str) -> Result<()> {
        self.border.color = Color::normalize(color)?;
        Ok(())
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Appends a shape on top of everything already painted and hands it
    /// back for further changes.
    pub fn add_shape(&mut self, shape: Shape) -> &mut Shape {
        self.shapes.push(shape);
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    pub fn add_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let shape = Shape::line(x1, y1, x2, y2, options.themed(&self.theme))?;
        Ok(self.add_shape(shape))
    }

    pub fn add_polyline(
        &mut self,
        coordinates: &[f64],
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let shape = Shape::polyline(coordinates, options.themed(&self.theme))?;
        Ok(self.add_shape(shape))
    }

    pub fn add_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let shape = Shape::rectangle(x, y, width, height, options.themed(&self.theme))?;
        Ok(self.add_shape(shape))
    }

    pub fn add_polygon(
        &mut self,
        coordinates: &[f64],
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let shape = Shape::polygon(coordinates, options.themed(&self.theme))?;
        Ok(self.add_shape(shape))
    }

    pub fn add_oval(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let shape = Shape::oval(x, y, width, height, options.themed(&self.theme))?;
        Ok(self.add_shape(shape))
    }

    pub fn add_arc(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        span: ArcSpan,
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let shape = Shape::arc(x, y, width, height, span, options.themed(&self.theme))?;
        Ok(self.add_shape(shape))
    }

    /// Adds text using the theme's font size. Use [`Canvas::add_text_with`]
    /// for a custom size or alignment.
    pub fn add_text(
        &mut self,
        x: f64,
        y: f64,
        content: impl Into<String>,
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let layout = TextLayout::default().font_size(self.theme.font_size);
        self.add_text_with(x, y, content, layout, options)
    }

    pub fn add_text_with(
        &mut self,
        x: f64,
        y: f64,
        content: impl Into<String>,
        layout: TextLayout,
        options: StyleOptions,
    ) -> Result<&mut Shape> {
        let shape = Shape::text(x, y, content, layout, options.themed_text(&self.theme))?;
        Ok(self.add_shape(shape))
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id() == id)
    }

    fn position(&self, id: ShapeId) -> Result<usize> {
        self.shapes
            .iter()
            .position(|shape| shape.id() == id)
            .ok_or(CanvasError::NotFound(id))
    }

    pub fn remove(&mut self, id: ShapeId) -> Result<Shape> {
        let idx = self.position(id)?;
        Ok(self.shapes.remove(idx))
    }

    /// First shape with the given name, in paint order.
    pub fn get_by_name(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.name() == Some(name))
    }

    pub fn get_all_by_name(&self, name: &str) -> Vec<&Shape> {
        self.shapes
            .iter()
            .filter(|shape| shape.name() == Some(name))
            .collect()
    }

    /// Swaps a shape with the one painted after it. Does nothing if it is
    /// already on top.
    pub fn move_forward(&mut self, id: ShapeId) -> Result<()> {
        let idx = self.position(id)?;
        if idx + 1 < self.shapes.len() {
            self.shapes.swap(idx, idx + 1);
        }
        Ok(())
    }

    /// Swaps a shape with the one painted before it. Does nothing if it is
    /// already at the bottom.
    pub fn move_backward(&mut self, id: ShapeId) -> Result<()> {
        let idx = self.position(id)?;
        if idx > 0 {
            self.shapes.swap(idx, idx - 1);
        }
        Ok(())
    }

    /// Changes the page size and scales every shape by the same factors so
    /// the drawing keeps its proportions.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let width = page_dimension("width", width)?;
        let height = page_dimension("height", height)?;
        let fx = f64::from(width) / f64::from(self.width);
        let fy = f64::from(height) / f64::from(self.height);
        for shape in &mut self.shapes {
            shape.scale(fx, fy)?;
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn render(&self) -> String {
        render::render_canvas(self)
    }

    /// Writes the rendered document to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Canvas {}×{} ({} Graphics)>",
            self.width,
            self.height,
            self.shapes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    fn four_lines() -> (Canvas, Vec<ShapeId>) {
        let mut canvas = Canvas::new(100.0, 100.0, None).unwrap();
        let ids = (0..4)
            .map(|n| {
                let n = f64::from(n);
                canvas
                    .add_line(n, n, n + 10.0, n + 10.0, StyleOptions::new())
                    .unwrap()
                    .id()
            })
            .collect();
        (canvas, ids)
    }

    fn order(canvas: &Canvas) -> Vec<ShapeId> {
        canvas.shapes().iter().map(Shape::id).collect()
    }

    #[test]
    fn new_canvas_is_empty() {
        let canvas = Canvas::new(700.0, 500.0, None).unwrap();
        assert!(canvas.is_empty());
        assert_eq!(canvas.width(), 700);
        assert_eq!(canvas.height(), 500);
        assert_eq!(canvas.background_color(), None);
        assert_eq!(canvas.to_string(), "<Canvas 700×500 (0 Graphics)>");
    }

    #[test]
    fn fractional_dimensions_round() {
        assert_eq!(Canvas::new(100.1, 200.0, None).unwrap().width(), 100);
        assert_eq!(Canvas::new(100.6, 200.0, None).unwrap().width(), 101);
        assert_eq!(Canvas::new(100.5, 200.5, None).unwrap().height(), 201);
        assert!(Canvas::new(0.2, 10.0, None).is_err());
        assert!(Canvas::new(f64::NAN, 10.0, None).is_err());
    }

    #[test]
    fn background_color_is_validated() {
        let canvas = Canvas::new(700.0, 500.0, Some("#ffff00")).unwrap();
        assert_eq!(canvas.background_color().unwrap().as_str(), "#FFFF00");
        for bad in ["FFFF00", "#FFF00", "#FF0", "#FFFG00"] {
            assert!(matches!(
                Canvas::new(700.0, 500.0, Some(bad)),
                Err(CanvasError::InvalidColorFormat(_))
            ));
        }
    }

    #[test]
    fn add_returns_the_stored_shape() {
        let mut canvas = Canvas::new(100.0, 100.0, None).unwrap();
        let line = canvas
            .add_line(10.0, 10.0, 90.0, 90.0, StyleOptions::new())
            .unwrap();
        line.set_line_width(4.0).unwrap();
        assert_eq!(canvas.shapes()[0].style().line_width(), 4.0);
    }

    #[test]
    fn failed_add_leaves_canvas_unchanged() {
        let mut canvas = Canvas::new(100.0, 100.0, None).unwrap();
        assert!(canvas
            .add_polygon(&[0.0, 0.0, 1.0, 1.0], StyleOptions::new())
            .is_err());
        assert!(canvas.is_empty());
    }

    #[test]
    fn lookup_by_name() {
        let mut canvas = Canvas::new(100.0, 100.0, None).unwrap();
        canvas
            .add_rectangle(0.0, 0.0, 5.0, 5.0, StyleOptions::new().name("box"))
            .unwrap();
        canvas
            .add_oval(0.0, 0.0, 5.0, 5.0, StyleOptions::new().name("round"))
            .unwrap();
        canvas
            .add_rectangle(1.0, 1.0, 5.0, 5.0, StyleOptions::new().name("box"))
            .unwrap();

        let first = canvas.get_by_name("box").unwrap();
        assert!(matches!(first.kind(), ShapeKind::Rectangle { bounds, .. } if bounds.x == 0.0));
        assert_eq!(canvas.get_all_by_name("box").len(), 2);
        assert!(canvas.get_by_name("missing").is_none());
        assert!(canvas.get_all_by_name("missing").is_empty());
    }

    #[test]
    fn move_forward_at_top_is_a_no_op() {
        let (mut canvas, ids) = four_lines();
        canvas.move_forward(ids[3]).unwrap();
        assert_eq!(order(&canvas), ids);
    }

    #[test]
    fn move_forward_swaps_with_next() {
        let (mut canvas, ids) = four_lines();
        canvas.move_forward(ids[0]).unwrap();
        assert_eq!(order(&canvas), vec![ids[1], ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn move_backward_swaps_with_previous() {
        let (mut canvas, ids) = four_lines();
        canvas.move_backward(ids[0]).unwrap();
        assert_eq!(order(&canvas), ids);
        canvas.move_backward(ids[2]).unwrap();
        assert_eq!(order(&canvas), vec![ids[0], ids[2], ids[1], ids[3]]);
    }

    #[test]
    fn reordering_foreign_shapes_fails() {
        let (mut canvas, _) = four_lines();
        let stranger = Shape::line(0.0, 0.0, 1.0, 1.0, StyleOptions::new()).unwrap();
        assert!(matches!(
            canvas.move_forward(stranger.id()),
            Err(CanvasError::NotFound(_))
        ));
        assert!(matches!(
            canvas.move_backward(stranger.id()),
            Err(CanvasError::NotFound(_))
        ));
        assert!(canvas.remove(stranger.id()).is_err());
    }

    #[test]
    fn remove_takes_shape_out() {
        let (mut canvas, ids) = four_lines();
        let removed = canvas.remove(ids[1]).unwrap();
        assert_eq!(removed.id(), ids[1]);
        assert_eq!(canvas.len(), 3);
        assert!(canvas.shape(ids[1]).is_none());
    }

    #[test]
    fn resize_scales_shapes() {
        let mut canvas = Canvas::new(100.0, 100.0, None).unwrap();
        let id = canvas
            .add_line(10.0, 10.0, 90.0, 90.0, StyleOptions::new())
            .unwrap()
            .id();
        canvas.resize(50.0, 200.0).unwrap();
        assert_eq!(canvas.width(), 50);
        assert_eq!(canvas.height(), 200);
        assert_eq!(
            canvas.shape(id).unwrap().kind(),
            &ShapeKind::Line {
                x1: 5.0,
                y1: 20.0,
                x2: 45.0,
                y2: 180.0
            }
        );
    }

    #[test]
    fn theme_supplies_defaults() {
        let mut canvas = Canvas::with_theme(100.0, 100.0, Theme::blueprint()).unwrap();
        assert_eq!(canvas.background_color().unwrap().as_str(), "#1D3F73");
        let rect = canvas
            .add_rectangle(0.0, 0.0, 10.0, 10.0, StyleOptions::new())
            .unwrap();
        assert_eq!(rect.style().line_color().as_str(), "#E8F1FF");
        assert_eq!(rect.style().line_width(), 1.5);
        let text = canvas.add_text(5.0, 5.0, "hi", StyleOptions::new()).unwrap();
        assert!(matches!(text.kind(), ShapeKind::Text { font_size, .. } if *font_size == 14.0));
        assert_eq!(text.fill().unwrap().color.as_ref().unwrap().as_str(), "#FFFFFF");
    }

    #[test]
    fn resize_scales_vertices_and_boxes() {
        let mut canvas = Canvas::new(100.0, 100.0, None).unwrap();
        let polygon = canvas
            .add_polygon(&[10.0, 10.0, 50.0, 10.0, 30.0, 40.0], StyleOptions::new())
            .unwrap()
            .id();
        let arc = canvas
            .add_arc(20.0, 30.0, 40.0, 10.0, ArcSpan::new(0.0, 90.0), StyleOptions::new())
            .unwrap()
            .id();
        let text = canvas
            .add_text(60.0, 5.0, "label", StyleOptions::new())
            .unwrap()
            .id();

        canvas.resize(50.0, 200.0).unwrap();

        assert_eq!(
            canvas.shape(polygon).unwrap().vertices().unwrap(),
            vec![(5.0, 20.0), (25.0, 20.0), (15.0, 80.0)]
        );
        let bounds = canvas.shape(arc).unwrap().bounds().unwrap();
        assert_eq!(
            (bounds.x, bounds.y, bounds.width, bounds.height),
            (10.0, 60.0, 20.0, 20.0)
        );
        assert_eq!(canvas.shape(arc).unwrap().sweep_angle(), Some(90.0));
        assert!(matches!(
            canvas.shape(text).unwrap().kind(),
            ShapeKind::Text { x, y, .. } if *x == 30.0 && *y == 10.0
        ));
    }

    #[test]
    fn border_defaults_to_nothing() {
        let canvas = Canvas::new(700.0, 500.0, None).unwrap();
        assert_eq!(canvas.border(), &Border::default());
        assert_eq!(canvas.border().width, 0.0);
    }

    #[test]
    fn border_fields_are_validated() {
        let mut canvas = Canvas::new(700.0, 500.0, None).unwrap();
        canvas.set_border_width(2.5).unwrap();
        canvas.set_border_style("--").unwrap();
        canvas.set_border_color("#ffff00").unwrap();
        assert_eq!(canvas.border().width, 2.5);
        assert_eq!(canvas.border().style, LineStyle::Dashed);
        assert_eq!(canvas.border().color.as_str(), "#FFFF00");

        assert!(matches!(
            canvas.set_border_width(f64::NAN),
            Err(CanvasError::InvalidArgumentType { .. })
        ));
        assert!(matches!(
            canvas.set_border_width(-1.0),
            Err(CanvasError::InvalidArgumentValue { .. })
        ));
        for bad in ["", "888"] {
            assert!(matches!(
                canvas.set_border_style(bad),
                Err(CanvasError::InvalidLineStyle(_))
            ));
        }
        for bad in ["FFFF00", "#FFF00", "#FF0", "#FFFG00"] {
            assert!(matches!(
                canvas.set_border_color(bad),
                Err(CanvasError::InvalidColorFormat(_))
            ));
        }
        assert_eq!(canvas.border().width, 2.5);
        assert_eq!(canvas.border().color.as_str(), "#FFFF00");
    }
}
