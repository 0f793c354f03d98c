use thiserror::Error;

/// Input-contract violations when building geometry for a surface.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("surface {width}x{height} is too small: both sides must exceed {min}")]
    SurfaceTooSmall { width: f32, height: f32, min: f32 },
    #[error("invalid geometry parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

/// Failures loading, saving or validating an effect configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid { field: field.into(), reason: reason.into() }
    }
}
