//! CAT02 chromatic adaptation.
//!
//! ZCAM adapts its input to the viewing white with the CIECAM02 cone
//! transform. The von Kries gain is corrected by the luminance ratio of the
//! two whites, so the absolute scale of the source survives adaptation:
//!
//! ```text
//! gain_i = (Yw / Ywr) * (LMSwr_i / LMSw_i) * D + 1 - D
//! ```
//!
//! where `w` is the source white and `wr` the reference (destination) white.
//! See Luo, Li et al., "Some concerns regarding the CAT16 chromatic
//! adaptation transform".
//!
//! # Usage
//!
//! ```rust
//! use zcam_math::{cat02_adapt, D50, D65};
//!
//! // D = 1: the source white lands exactly on the reference white
//! let xyz = cat02_adapt(D50, D50, D65, 1.0);
//! assert!((xyz.x - D65.x).abs() < 1e-12);
//! ```

use crate::{Mat3, Vec3};

// ============================================================================
// Illuminants (relative, Y = 1)
// ============================================================================

/// CIE Standard Illuminant D65.
pub const D65: Vec3 = Vec3::new(0.95047, 1.0, 1.08883);

/// CIE Standard Illuminant D50.
pub const D50: Vec3 = Vec3::new(0.96422, 1.0, 0.82521);

// ============================================================================
// CAT02
// ============================================================================

/// CAT02 XYZ to sharpened LMS.
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Inverse of [`CAT02`].
pub const CAT02_INV: Mat3 = Mat3::from_rows([
    [1.096123820835514, -0.2788690002182872, 0.1827451793827731],
    [0.4543690419753592, 0.4735331543074117, 0.0720978037172291],
    [-0.009627608738429352, -0.005698031216113419, 1.015325639954543],
]);

/// CIECAM02 degree of adaptation.
///
/// `f` is the surround factor (1.0 average, 0.9 dim, 0.8 dark) and `la`
/// the adapting luminance in cd/m². Clamped to `[0, 1]`.
pub fn degree_of_adaptation(f: f64, la: f64) -> f64 {
    let d = f * (1.0 - (1.0 / 3.6) * ((-la - 42.0) / 92.0).exp());
    d.clamp(0.0, 1.0)
}

/// Adapts `xyz`, seen under `src_white`, to `dst_white`.
///
/// `d` is the degree of adaptation: 1 for full (discounted illuminant),
/// 0 for none.
pub fn cat02_adapt(xyz: Vec3, src_white: Vec3, dst_white: Vec3, d: f64) -> Vec3 {
    let lms_w = CAT02 * src_white;
    let lms_wr = CAT02 * dst_white;
    let lms = CAT02 * xyz;
    let ratio = src_white.y / dst_white.y;
    let gain = (lms_wr / lms_w).map(|g| ratio * g * d + 1.0 - d);
    CAT02_INV * (lms * gain)
}
