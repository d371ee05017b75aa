//! # zcam-color
//!
//! Color representations for the ZCAM gamut engine.
//!
//! - [`Rgb`] - sRGB triplets, transfer curve, hex notation
//! - [`Jzazbz`], [`Izazbz`] - PQ-based opponent spaces
//! - [`ViewingConditions`] - white, background, adapting luminance, surround
//! - [`ZcamColor`], [`PartialZcam`], [`Jch`] - appearance attributes
//!
//! # Usage
//!
//! ```rust
//! use zcam_color::{Jch, Rgb, ViewingConditions, ZcamColor, linear_rgb_from_jch};
//!
//! let viewing = ViewingConditions::default();
//! let teal = ZcamColor::from_srgb(Rgb::from_hex("#008080").unwrap(), &viewing);
//! assert!(teal.hue > 180.0 && teal.hue < 220.0);
//!
//! // Darker, same hue and chroma
//! let darker = Jch { lightness: teal.lightness - 10.0, ..teal.jch() };
//! let rgb = linear_rgb_from_jch(darker, &viewing);
//! assert!(rgb.in_unit_cube());
//! ```
//!
//! # Conventions
//!
//! XYZ is absolute (cd/m²). sRGB white maps to the viewing white, whose
//! luminance defaults to 203 cd/m².
//!
//! # Dependencies
//!
//! - `zcam-math` - matrices, CAT02
//! - [`thiserror`] - [`ColorError`]
//!
//! # Used By
//!
//! - `zcam-gamut` - the gamut oracle
//! - `zcam-cli`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod jzazbz;
mod srgb;
mod viewing;
mod zcam;

pub use error::{ColorError, ColorResult};
pub use jzazbz::{IZ_EPSILON, Izazbz, Jzazbz, pq_decode, pq_encode};
pub use srgb::{RGB_TO_XYZ, Rgb, XYZ_TO_RGB, srgb_companding, srgb_linear};
pub use viewing::{REFERENCE_WHITE_LUMINANCE, Surround, ViewingConditions, ViewingConditionsBuilder};
pub use zcam::{
    Jch, PartialZcam, ZcamColor, hue_from_quadrature, hue_quadrature, linear_rgb_from_jch, saturation,
    xyz_from_zcam, zcam_from_xyz,
};
