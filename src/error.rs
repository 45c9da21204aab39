//! Error types for the engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColorError {
    #[error("Malformed color input: {0}")]
    MalformedColor(String),

    #[error("{component} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        component: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Paint catalog '{0}' has no entries")]
    EmptyCatalog(String),

    #[error("Invalid paint entry: {0}")]
    InvalidPaint(String),

    #[error("JSON format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ColorError {
    /// Build an out-of-range error for a single component
    pub(crate) fn out_of_range(component: &'static str, value: f64, min: f64, max: f64) -> Self {
        ColorError::OutOfRange {
            component,
            value,
            min,
            max,
        }
    }
}

/// Check a directly-supplied component against its bounds, never clamping
pub(crate) fn check_range(
    component: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, ColorError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(ColorError::out_of_range(component, value, min, max))
    }
}
