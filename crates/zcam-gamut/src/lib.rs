//! # zcam-gamut
//!
//! The 8-bit sRGB gamut boundary expressed in ZCAM hue, lightness and
//! chroma.
//!
//! - [`GamutEngine`] - cusp lookup, chroma and lightness limits, clamping
//! - [`GamutBoundary`] - cusp lightness and chroma splines over hue
//! - [`GamutOracle`] - the color model the engine queries
//! - [`GamutConfig`] - tolerances, thresholds, cache budget
//!
//! # Boundary
//!
//! For a fixed hue the displayable chroma peaks at one lightness, the cusp.
//! Cusp lightness over hue has seven extrema at the RGB primaries and
//! secondaries (red twice, one turn apart). The build refines those hues,
//! samples cusps densely, and fits one spline segment between each pair of
//! extrema, so every kink of the boundary lands on a knot.
//!
//! The build is cooperative: [`GamutEngine::build_step`] does one bounded
//! unit of work and returns. Queries never require it; an unbuilt engine
//! searches the model directly and is just slower.
//!
//! # Usage
//!
//! ```rust,no_run
//! use zcam_color::{Jch, ViewingConditions};
//! use zcam_gamut::{BuildStatus, GamutEngine};
//!
//! let mut engine = GamutEngine::new(ViewingConditions::default());
//! while let BuildStatus::InProgress(p) = engine.build_step()? {
//!     println!("{:?} {}/{}", p.phase, p.completed, p.total);
//! }
//!
//! let c = engine.maximize_chroma(259.0, 50.0, 1e-3)?;
//! let clamped = engine.clamp_to_gamut(Jch::new(259.0, 50.0, 60.0), 1e-3)?;
//! assert!(clamped.chroma <= c);
//! # Ok::<(), zcam_gamut::GamutError>(())
//! ```
//!
//! # Dependencies
//!
//! - `zcam-math` - searches and splines
//! - `zcam-cache` - max-chroma memo
//! - `zcam-color` - the ZCAM oracle
//! - [`tracing`] - build progress
//! - [`thiserror`] - [`GamutError`]
//!
//! # Used By
//!
//! - `zcam-cli`
//! - `zcam-bench`
//! - `zcam-tests`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod boundary;
mod build;
mod config;
mod engine;
mod error;
mod oracle;

pub use boundary::{BoundaryCurve, CURVE_POINTS_PER_INTERVAL, CuspPoint, GamutBoundary};
pub use build::{BuildPhase, BuildProgress, BuildStatus, direct_cusp, sample_hues};
pub use config::{EXTREMA_GUESSES, GamutConfig};
pub use engine::{GamutEngine, chroma_cache_key};
pub use error::{GamutError, GamutResult};
pub use oracle::GamutOracle;
