use thiserror::Error;

use crate::physics::PhysicsError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Serialization(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),
    #[error("Unknown control preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Rejects NaN and infinite settings.
pub(crate) fn require_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be finite, got {value}")))
    }
}

pub(crate) fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be positive, got {value}")))
    }
}

/// Requires `low <= high` with both ends finite.
pub(crate) fn require_ordered(low_name: &str, low: f32, high_name: &str, high: f32) -> Result<()> {
    require_finite(low_name, low)?;
    require_finite(high_name, high)?;
    if !(low <= high) {
        return Err(SimError::InvalidConfig(format!(
            "{low_name} ({low}) exceeds {high_name} ({high})"
        )));
    }
    Ok(())
}
