//! Error types for color conversions.

use thiserror::Error;

/// Color conversion error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// A partial ZCAM description lacks every attribute of a group.
    #[error("missing {group}: provide one of {alternatives}")]
    MissingAttribute {
        /// Attribute group (hue, lightness, chroma).
        group: &'static str,
        /// Attributes that would satisfy the group.
        alternatives: &'static str,
    },

    /// Hex color string could not be parsed.
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    /// Input value is invalid (NaN, out of range, inconsistent).
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
