use crate::color::Color;
use crate::error::{CanvasError, Result, finite, non_negative};
use crate::theme::Theme;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Accepts both the spelled-out names and the short `-`, `--`, `..` forms.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "solid" | "-" => Some(Self::Solid),
            "dashed" | "--" => Some(Self::Dashed),
            "dotted" | ".." => Some(Self::Dotted),
            _ => None,
        }
    }
}

impl FromStr for LineStyle {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s).ok_or_else(|| CanvasError::InvalidLineStyle(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl FromStr for HorizontalAlign {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(CanvasError::bad_value(
                "horizontal_align",
                format!("'{s}' is not one of left, center, right"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl FromStr for VerticalAlign {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => Err(CanvasError::bad_value(
                "vertical_align",
                format!("'{s}' is not one of top, center, bottom"),
            )),
        }
    }
}

/// How the two ends of an arc are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcConnect {
    #[default]
    None,
    /// Straight lines through the center, closing a wedge.
    Pie,
    /// A straight chord between the end points.
    Direct,
}

impl FromStr for ArcConnect {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "pie" => Ok(Self::Pie),
            "direct" => Ok(Self::Direct),
            _ => Err(CanvasError::bad_value(
                "connect",
                format!("'{s}' is not one of none, pie, direct"),
            )),
        }
    }
}

/// Rotation about a pivot, in degrees. `(0, 0, 0)` means "no transform".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub pivot_x: f64,
    pub pivot_y: f64,
    pub angle: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        pivot_x: 0.0,
        pivot_y: 0.0,
        angle: 0.0,
    };

    pub fn new(pivot_x: f64, pivot_y: f64, angle: f64) -> Result<Self> {
        let pivot_x = finite("rotation pivot x", pivot_x)?;
        let pivot_y = finite("rotation pivot y", pivot_y)?;
        let angle = finite("rotation angle", angle)?;
        if !(0.0..=360.0).contains(&angle) {
            return Err(CanvasError::InvalidRotation(angle));
        }
        Ok(Self {
            pivot_x,
            pivot_y,
            angle,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Outline properties shared by every shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub(crate) line_width: f64,
    pub(crate) line_style: LineStyle,
    pub(crate) line_color: Color,
    pub(crate) rotation: Rotation,
    pub(crate) name: Option<String>,
    pub(crate) metadata: BTreeMap<String, String>,
}

impl Style {
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn line_color(&self) -> &Color {
        &self.line_color
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_style: LineStyle::Solid,
            line_color: Color::black(),
            rotation: Rotation::IDENTITY,
            name: None,
            metadata: BTreeMap::new(),
        }
    }
}

/// Interior properties of shapes that enclose an area.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: Option<Color>,
    pub opacity: f64,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            color: Some(Color::white()),
            opacity: 1.0,
        }
    }
}

static ATTRIBUTE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap());

/// Attributes the renderer writes itself.
const RESERVED_ATTRIBUTES: &[&str] = &[
    "x", "y", "x1", "y1", "x2", "y2", "cx", "cy", "rx", "ry", "width", "height", "points", "d",
    "style", "transform", "text-anchor", "dominant-baseline",
];

/// Metadata keys become attribute names, so they must be XML names that
/// do not collide with anything the renderer emits.
pub(crate) fn check_metadata_key(key: &str) -> Result<()> {
    let field = format!("metadata key '{key}'");
    if !ATTRIBUTE_NAME_RE.is_match(key) {
        return Err(CanvasError::bad_value(field, "is not a valid attribute name"));
    }
    if key.len() >= 3 && key[..3].eq_ignore_ascii_case("xml") {
        return Err(CanvasError::bad_value(field, "uses the reserved 'xml' prefix"));
    }
    if RESERVED_ATTRIBUTES.contains(&key) {
        return Err(CanvasError::bad_value(field, "is written by the renderer"));
    }
    Ok(())
}

pub(crate) fn check_opacity(opacity: f64) -> Result<f64> {
    let opacity = finite("opacity", opacity)?;
    if !(0.0..=1.0).contains(&opacity) {
        return Err(CanvasError::bad_value(
            "opacity",
            format!("must be between 0 and 1, not {opacity}"),
        ));
    }
    Ok(opacity)
}

/// Raw, unvalidated style settings passed to shape constructors.
///
/// Fields left as `None` fall back to the shape's default. Nothing here is
/// checked until a shape is built, so a bad color surfaces from the
/// constructor that received it.
#[derive(Debug, Clone, Default)]
pub struct StyleOptions {
    pub line_width: Option<f64>,
    pub line_style: Option<String>,
    pub line_color: Option<String>,
    /// `Some(None)` asks for no fill at all.
    pub fill_color: Option<Option<String>>,
    pub opacity: Option<f64>,
    pub rotation: Option<(f64, f64, f64)>,
    pub name: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl StyleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn line_style(mut self, style: impl Into<String>) -> Self {
        self.line_style = Some(style.into());
        self
    }

    pub fn line_color(mut self, color: impl Into<String>) -> Self {
        self.line_color = Some(color.into());
        self
    }

    pub fn fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(Some(color.into()));
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill_color = Some(None);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn rotation(mut self, pivot_x: f64, pivot_y: f64, angle: f64) -> Self {
        self.rotation = Some((pivot_x, pivot_y, angle));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Fills unset outline and fill fields from a theme.
    pub fn themed(mut self, theme: &Theme) -> Self {
        self.line_width.get_or_insert(theme.line_width);
        self.line_color.get_or_insert_with(|| theme.line_color.clone());
        self.fill_color.get_or_insert_with(|| theme.fill_color.clone());
        self
    }

    /// Like [`StyleOptions::themed`], using the theme's text defaults.
    pub fn themed_text(mut self, theme: &Theme) -> Self {
        self.line_width.get_or_insert(theme.text_line_width);
        self.line_color.get_or_insert_with(|| theme.line_color.clone());
        self.fill_color.get_or_insert_with(|| Some(theme.text_color.clone()));
        self
    }

    pub(crate) fn build_style(&self, default_line_width: f64) -> Result<Style> {
        let line_width = non_negative("line_width", self.line_width.unwrap_or(default_line_width))?;
        let line_style = match self.line_style.as_deref() {
            Some(token) => token.parse()?,
            None => LineStyle::Solid,
        };
        let line_color = match self.line_color.as_deref() {
            Some(color) => Color::normalize(color)?,
            None => Color::black(),
        };
        let rotation = match self.rotation {
            Some((x, y, angle)) => Rotation::new(x, y, angle)?,
            None => Rotation::IDENTITY,
        };
        for key in self.metadata.keys() {
            check_metadata_key(key)?;
        }
        Ok(Style {
            line_width,
            line_style,
            line_color,
            rotation,
            name: self.name.clone(),
            metadata: self.metadata.clone(),
        })
    }

    pub(crate) fn build_fill(&self, default_color: Color) -> Result<Fill> {
        let color = match &self.fill_color {
            Some(Some(color)) => Some(Color::normalize(color)?),
            Some(None) => None,
            None => Some(default_color),
        };
        let opacity = check_opacity(self.opacity.unwrap_or(1.0))?;
        Ok(Fill { color, opacity })
    }
}
