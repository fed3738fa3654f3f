use serde::{Deserialize, Serialize};

/// Default style values a canvas hands to the shapes it creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub line_width: f64,
    pub line_color: String,
    pub fill_color: Option<String>,
    pub text_color: String,
    pub text_line_width: f64,
    pub font_size: f64,
    pub background: Option<String>,
}

impl Theme {
    pub fn standard() -> Self {
        Self {
            line_width: 1.0,
            line_color: "#000000".to_string(),
            fill_color: Some("#FFFFFF".to_string()),
            text_color: "#000000".to_string(),
            text_line_width: 0.0,
            font_size: 18.0,
            background: None,
        }
    }

    pub fn blueprint() -> Self {
        Self {
            line_width: 1.5,
            line_color: "#E8F1FF".to_string(),
            fill_color: Some("#2B5A9E".to_string()),
            text_color: "#FFFFFF".to_string(),
            text_line_width: 0.0,
            font_size: 14.0,
            background: Some("#1D3F73".to_string()),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "standard" | "default" => Some(Self::standard()),
            "blueprint" => Some(Self::blueprint()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}
