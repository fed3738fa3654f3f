use crate::error::{CanvasError, Result, finite};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// A `#RRGGBB` color, always stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Validates a hex color string and returns its canonical form.
    pub fn normalize(input: &str) -> Result<Self> {
        if !HEX_COLOR_RE.is_match(input) {
            return Err(CanvasError::InvalidColorFormat(input.to_string()));
        }
        Ok(Self(input.to_ascii_uppercase()))
    }

    /// Converts hue (degrees, `0..=360`), saturation and lightness
    /// (percent, `0..=100`) to hex. Channels are truncated, not rounded.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Result<Self> {
        let hue = in_range("hue", hue, 360.0)?;
        let s = in_range("saturation", saturation, 100.0)? / 100.0;
        let l = in_range("lightness", lightness, 100.0)? / 100.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector {
            h if h < 1.0 => (chroma, x, 0.0),
            h if h < 2.0 => (x, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, x),
            h if h < 4.0 => (0.0, x, chroma),
            h if h < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0) as u8;
        Ok(Self(format!(
            "#{:02X}{:02X}{:02X}",
            channel(r),
            channel(g),
            channel(b)
        )))
    }

    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn white() -> Self {
        Self("#FFFFFF".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn in_range(field: &str, value: f64, max: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if !(0.0..=max).contains(&value) {
        return Err(CanvasError::bad_value(
            field,
            format!("must be between 0 and {max}, not {value}"),
        ));
    }
    Ok(value)
}

/// A random, reasonably saturated color.
pub fn palette() -> Color {
    let mut rng = rand::thread_rng();
    let hue = rng.gen_range(0.0..360.0);
    let saturation = rng.gen_range(40.0..=100.0);
    let lightness = rng.gen_range(30.0..=70.0);
    // Arguments are in range by construction.
    Color::from_hsl(hue, saturation, lightness).unwrap_or_else(|_| Color::black())
}

impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::normalize(s)
    }
}

impl TryFrom<String> for Color {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self> {
        Self::normalize(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_upper_cases_valid_colors() {
        for input in ["#ff00aa", "#FF00AA", "#Ff00aA", "#123456", "#abcdef"] {
            let color = Color::normalize(input).unwrap();
            assert_eq!(color.as_str(), input.to_ascii_uppercase());
        }
    }

    #[test]
    fn normalize_rejects_malformed_colors() {
        let malformed = [
            "", "FFFF00", "#FFF00", "#FF0", "#FFFG00", "#FFFF000", "FFFF00#", " #FFFF00",
        ];
        for input in malformed {
            assert!(
                matches!(Color::normalize(input), Err(CanvasError::InvalidColorFormat(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn parses_through_from_str() {
        let color: Color = "#00ff00".parse().unwrap();
        assert_eq!(color.to_string(), "#00FF00");
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let color: Color = serde_json::from_str("\"#a0b0c0\"").unwrap();
        assert_eq!(color, Color::normalize("#A0B0C0").unwrap());
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#A0B0C0\"");
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn hsl_converts_with_truncated_channels() {
        assert_eq!(Color::from_hsl(108.0, 100.0, 50.0).unwrap().as_str(), "#32FF00");
        assert_eq!(Color::from_hsl(8.0, 87.0, 31.0).unwrap().as_str(), "#931C0A");
        assert_eq!(Color::from_hsl(300.0, 6.0, 61.0).unwrap().as_str(), "#A195A1");
        assert_eq!(Color::from_hsl(360.0, 100.0, 50.0).unwrap().as_str(), "#FF0000");
        assert_eq!(Color::from_hsl(0.0, 0.0, 100.0).unwrap().as_str(), "#FFFFFF");
        assert!(Color::from_hsl(108.5, 99.5, 50.5).is_ok());
    }

    #[test]
    fn hsl_rejects_out_of_range_components() {
        for (h, s, l) in [
            (-1.0, 100.0, 50.0),
            (361.0, 100.0, 50.0),
            (0.0, -1.0, 50.0),
            (360.0, 101.0, 50.0),
            (0.0, 50.0, -1.0),
            (360.0, 50.0, 101.0),
        ] {
            assert!(
                matches!(
                    Color::from_hsl(h, s, l),
                    Err(CanvasError::InvalidArgumentValue { .. })
                ),
                "({h}, {s}, {l}) should be rejected"
            );
        }
        assert!(matches!(
            Color::from_hsl(f64::NAN, 50.0, 50.0),
            Err(CanvasError::InvalidArgumentType { .. })
        ));
    }

    #[test]
    fn palette_produces_valid_hex() {
        for _ in 0..50 {
            let color = palette();
            assert_eq!(color.as_str().len(), 7);
            assert_eq!(Color::normalize(color.as_str()).unwrap(), color);
        }
    }
}
