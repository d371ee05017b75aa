//! # zcam-math
//!
//! Numeric primitives for the ZCAM gamut engine.
//!
//! - [`Mat3`], [`Vec3`] - double-precision 3x3 transforms on color triplets
//! - [`cat02_adapt`] - CAT02 chromatic adaptation with luminance-corrected gain
//! - [`bisect_boundary`], [`bisect_last_inside`], [`golden_section_extremum`] - 1D searches
//! - [`CubicSpline`], [`spline_fit`], [`SegmentedSpline`] - boundary curves
//!
//! # Design
//!
//! Matrices are **row-major** and multiply **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Everything is f64. The boundary searches run to 1e-7 through steep PQ
//! curves and would stall in single precision.
//!
//! # Usage
//!
//! ```rust
//! use zcam_math::{golden_section_max, Mat3, Vec3};
//!
//! let rgb_to_xyz = Mat3::from_rows([
//!     [0.4124564, 0.3575761, 0.1804375],
//!     [0.2126729, 0.7151522, 0.0721750],
//!     [0.0193339, 0.1191920, 0.9503041],
//! ]);
//! let xyz = rgb_to_xyz * Vec3::new(1.0, 0.5, 0.25);
//! assert!(xyz.y > 0.0);
//!
//! let peak = golden_section_max(|x| -(x - 0.25).powi(2), 0.0, 1.0, 1e-8).unwrap();
//! assert!((peak.x - 0.25).abs() < 1e-7);
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - [`MathError`]
//!
//! # Used By
//!
//! - `zcam-color` - Izazbz and ZCAM transforms
//! - `zcam-gamut` - cusp search and boundary splines

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod error;
mod mat3;
mod search;
mod spline;
mod vec3;

pub use adapt::*;
pub use error::{MathError, MathResult};
pub use mat3::*;
pub use search::*;
pub use spline::*;
pub use vec3::*;
