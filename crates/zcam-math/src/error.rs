//! Error types for the numeric primitives.

use thiserror::Error;

/// Numeric failure in a search or spline construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// An iterative search ran out of iterations before its bracket
    /// shrank below the requested tolerance.
    #[error("search did not converge: bracket [{lo}, {hi}] still wider than {eps}")]
    NoConvergence {
        /// Lower end of the last bracket.
        lo: f64,
        /// Upper end of the last bracket.
        hi: f64,
        /// Requested tolerance.
        eps: f64,
    },

    /// Knot abscissae and ordinates differ in length.
    #[error("knot count mismatch: {xs} x values, {ys} y values")]
    KnotMismatch {
        /// Number of x values.
        xs: usize,
        /// Number of y values.
        ys: usize,
    },

    /// A spline needs at least one knot.
    #[error("spline needs at least one knot")]
    EmptyKnots,

    /// Knot x values must be strictly increasing.
    #[error("knot x values not strictly increasing at index {index}")]
    UnsortedKnots {
        /// First index whose x is not greater than its predecessor.
        index: usize,
    },
}

/// Result type for numeric operations.
pub type MathResult<T> = Result<T, MathError>;
