use crate::shape::ShapeId;

/// Every failure the scene model and renderer can report.
///
/// Validation errors are raised before any state is touched, so a shape or
/// canvas that returned one of these is exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("{field} has the wrong type: {value}")]
    InvalidArgumentType { field: String, value: String },

    #[error("invalid {field}: {reason}")]
    InvalidArgumentValue { field: String, reason: String },

    #[error("'{0}' is not a valid color")]
    InvalidColorFormat(String),

    #[error("rotation must be between 0 and 360, not {0}")]
    InvalidRotation(f64),

    #[error("there must be an even number of coordinates, not {0}")]
    MalformedCoordinates(usize),

    #[error("a {shape} needs at least {min} vertices, not {count}")]
    InsufficientVertices {
        shape: &'static str,
        min: usize,
        count: usize,
    },

    #[error("'{0}' is not a valid line style")]
    InvalidLineStyle(String),

    #[error("{0} is not on this canvas")]
    NotFound(ShapeId),

    #[error("scene file is not valid: {0}")]
    SceneSyntax(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CanvasError>;

impl CanvasError {
    pub(crate) fn wrong_type(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidArgumentType {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn bad_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgumentValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Rejects NaN and infinities, which the model treats as "not a number".
pub(crate) fn finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CanvasError::wrong_type(field, value))
    }
}

pub(crate) fn non_negative(field: &str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(CanvasError::bad_value(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(value)
}
