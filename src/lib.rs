//! Declarative 2D drawing: build shapes on a canvas and serialize the
//! result as an SVG document.
//!
//! ```
//! use svg_canvas::{Canvas, StyleOptions};
//!
//! let mut canvas = Canvas::new(200.0, 100.0, Some("#ffffff")).unwrap();
//! canvas
//!     .add_line(10.0, 10.0, 190.0, 90.0, StyleOptions::new().line_style("--"))
//!     .unwrap();
//! let svg = canvas.render();
//! assert!(svg.contains("<line"));
//! ```

pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod scene;
pub mod shape;
pub mod style;
pub mod theme;

pub use canvas::{Border, Canvas};
#[cfg(feature = "cli")]
pub use cli::run;
pub use color::{Color, palette};
pub use config::{Config, RenderConfig, load_config};
pub use error::{CanvasError, Result};
pub use render::{render_canvas, render_shape};
pub use scene::{load_scene, parse_scene, parse_scene_json5};
pub use shape::{ArcSpan, Bounds, Shape, ShapeId, ShapeKind, TextLayout};
pub use style::{
    ArcConnect, Fill, HorizontalAlign, LineStyle, Rotation, Style, StyleOptions, VerticalAlign,
};
pub use theme::Theme;
