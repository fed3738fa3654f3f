use crate::canvas::Canvas;
use crate::config::load_config;
use crate::render::write_output_svg;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::scene::{is_json5, parse_scene, parse_scene_json5};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "svgcanvas", version, about = "Render a JSON scene of shapes to SVG or PNG")]
pub struct Args {
    /// Scene file (.json or .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme preset, themeVariables, PNG scale)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Resize the scene to this width, scaling every shape
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Resize the scene to this height, scaling every shape
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Log progress to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    if args.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let config = load_config(args.config.as_deref())?;
    log::debug!("theme: {:?}", config.theme);

    let (input, relaxed) = read_input(args.input.as_deref())?;
    let mut canvas = build_canvas(&input, relaxed, &config.theme)?;
    log::info!("loaded {canvas}");

    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(f64::from(canvas.width()));
        let height = args.height.unwrap_or(f64::from(canvas.height()));
        canvas.resize(width, height)?;
        log::info!("resized to {}x{}", canvas.width(), canvas.height());
    }

    let svg = canvas.render();
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config.render)?;
        }
    }
    if let Some(path) = &args.output {
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render: &crate::config::RenderConfig) -> Result<()> {
    write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature"
    ))
}

fn build_canvas(input: &str, relaxed: bool, theme: &Theme) -> Result<Canvas> {
    let canvas = if relaxed {
        parse_scene_json5(input, theme)?
    } else {
        parse_scene(input, theme)?
    };
    Ok(canvas)
}

/// Returns the scene text and whether it should be read as JSON5.
fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)?;
        return Ok((content, is_json5(path)));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
