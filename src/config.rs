use crate::color::Color;
use crate::theme::Theme;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixels per canvas unit when rasterizing.
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    line_width: Option<f64>,
    line_color: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    fill_color: Option<Option<String>>,
    text_color: Option<String>,
    text_line_width: Option<f64>,
    font_size: Option<f64>,
    #[serde(default, deserialize_with = "explicit_null")]
    background: Option<Option<String>>,
}

/// Keeps `"key": null` apart from a missing key: the former is `Some(None)`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    scale: Option<f32>,
}

/// Reads a JSON config file on top of the defaults. `theme` picks a preset;
/// `themeVariables` then overrides single fields of it.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.fill_color {
            config.theme.fill_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.text_line_width {
            config.theme.text_line_width = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    check_theme_colors(&mut config.theme)?;

    if let Some(scale) = parsed.scale {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(anyhow::anyhow!("PNG scale must be positive, not {scale}"));
        }
        config.render.scale = scale;
    }

    Ok(config)
}

/// Normalizes every theme color so a typo surfaces here rather than at the
/// first shape drawn with it.
fn check_theme_colors(theme: &mut Theme) -> anyhow::Result<()> {
    let normalize = |field: &str, value: &str| -> anyhow::Result<String> {
        Color::normalize(value)
            .map(String::from)
            .map_err(|err| anyhow::anyhow!("themeVariables.{field}: {err}"))
    };
    theme.line_color = normalize("lineColor", &theme.line_color)?;
    theme.text_color = normalize("textColor", &theme.text_color)?;
    theme.fill_color = theme
        .fill_color
        .as_deref()
        .map(|fill| normalize("fillColor", fill))
        .transpose()?;
    theme.background = theme
        .background
        .as_deref()
        .map(|background| normalize("background", background))
        .transpose()?;
    Ok(())
}
