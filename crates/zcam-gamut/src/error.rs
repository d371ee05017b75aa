//! Error types for gamut boundary operations.

use thiserror::Error;
use zcam_color::ColorError;
use zcam_math::MathError;

/// Gamut engine error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GamutError {
    /// A search or spline fit failed.
    #[error(transparent)]
    Math(#[from] MathError),

    /// A color conversion failed.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Configuration is inconsistent.
    #[error("invalid gamut config: {0}")]
    InvalidConfig(String),
}

/// Result type for gamut operations.
pub type GamutResult<T> = Result<T, GamutError>;
