//! Jzazbz (Safdar et al. 2017) and its ZCAM variant Izazbz.
//!
//! Both start from absolute XYZ (cd/m², D65), pre-shear X and Y, move to
//! LMS and encode with a modified PQ curve. They differ in the achromatic
//! channel:
//!
//! - Jzazbz: `Iz = (L' + M') / 2`, then the lightness compression `Jz`
//! - Izazbz: `Iz = M' - ε`, used as-is by ZCAM
//!
//! # Reference
//!
//! - Safdar, Cui, Kim, Luo (2017). Perceptually uniform color space for
//!   image signals including high dynamic range and wide gamut.
//! - Safdar, Hardeberg, Luo (2021). ZCAM, a colour appearance model based
//!   on a high dynamic range uniform colour space.

use zcam_math::{Mat3, Vec3};

const B: f64 = 1.15;
const G: f64 = 0.66;
const C1: f64 = 3424.0 / 4096.0;
const C2: f64 = 2413.0 / 128.0;
const C3: f64 = 2392.0 / 128.0;
const ETA: f64 = 2610.0 / 16384.0;
/// PQ exponent, stretched by 1.7 relative to ST 2084.
const RHO: f64 = 1.7 * 2523.0 / 32.0;
const JZ_D0: f64 = 1.6295499532821566e-11;
/// Izazbz black offset.
pub const IZ_EPSILON: f64 = 3.7035226210190005e-11;

/// Sheared XYZ to LMS.
const M1: Mat3 = Mat3::from_rows([
    [0.41478972, 0.579999, 0.0146480],
    [-0.2015100, 1.120649, 0.0531008],
    [-0.0166008, 0.264800, 0.6684799],
]);

/// LMS to sheared XYZ.
const M1_INV: Mat3 = Mat3::from_rows([
    [1.9242264357876069, -1.0047923125953657, 0.037651404030618014],
    [0.35031676209499912, 0.72648119393165533, -0.065384422948085025],
    [-0.090982810982847592, -0.31272829052307399, 1.5227665613052606],
]);

// Opponent rows shared by both spaces
const AZ: [f64; 3] = [3.524000, -4.066708, 0.542708];
const BZ: [f64; 3] = [0.199076, 1.096799, -1.295875];

/// Jzazbz (I, a, b) to L'M'S'.
const JZ_TO_LMS: Mat3 = Mat3::from_rows([
    [1.0, 0.13860504327153927, 0.058047316156118862],
    [1.0, -0.13860504327153927, -0.058047316156118862],
    [1.0, -0.096019242026318938, -0.81189189605603884],
]);

/// Modified PQ encoding of an absolute luminance-like value.
#[inline]
pub fn pq_encode(v: f64) -> f64 {
    let vn = (v / 10_000.0).powf(ETA);
    ((C1 + C2 * vn) / (1.0 + C3 * vn)).powf(RHO)
}

/// Inverse of [`pq_encode`]. NaN for inputs without a real preimage.
#[inline]
pub fn pq_decode(v: f64) -> f64 {
    let vp = v.powf(1.0 / RHO);
    10_000.0 * ((C1 - vp) / (C3 * vp - C2)).powf(1.0 / ETA)
}

fn lms_from_xyz(xyz: Vec3) -> Vec3 {
    let sheared = Vec3::new(
        B * xyz.x - (B - 1.0) * xyz.z,
        G * xyz.y - (G - 1.0) * xyz.x,
        xyz.z,
    );
    (M1 * sheared).map(pq_encode)
}

fn xyz_from_lms(lms: Vec3) -> Vec3 {
    let s = M1_INV * lms.map(pq_decode);
    let x = (s.x + (B - 1.0) * s.z) / B;
    let y = (s.y + (G - 1.0) * x) / G;
    Vec3::new(x, y, s.z)
}

/// Jzazbz coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Jzazbz {
    /// Lightness
    pub jz: f64,
    /// Redness-greenness
    pub az: f64,
    /// Yellowness-blueness
    pub bz: f64,
}

impl Jzazbz {
    /// From absolute XYZ (D65).
    pub fn from_xyz(xyz: Vec3) -> Self {
        let lms = lms_from_xyz(xyz);
        let iz = 0.5 * (lms.x + lms.y);
        Self {
            jz: 0.44 * iz / (1.0 - 0.56 * iz) - JZ_D0,
            az: Vec3::from(AZ).dot(lms),
            bz: Vec3::from(BZ).dot(lms),
        }
    }

    /// To absolute XYZ (D65).
    pub fn to_xyz(&self) -> Vec3 {
        let j = self.jz + JZ_D0;
        let iz = j / (0.44 + 0.56 * j);
        xyz_from_lms(JZ_TO_LMS * Vec3::new(iz, self.az, self.bz))
    }
}

/// Izazbz coordinates, the ZCAM flavour of Jzazbz.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Izazbz {
    /// Achromatic response
    pub iz: f64,
    /// Redness-greenness
    pub az: f64,
    /// Yellowness-blueness
    pub bz: f64,
}

impl Izazbz {
    /// From absolute XYZ (D65).
    pub fn from_xyz(xyz: Vec3) -> Self {
        let lms = lms_from_xyz(xyz);
        Self {
            iz: lms.y - IZ_EPSILON,
            az: Vec3::from(AZ).dot(lms),
            bz: Vec3::from(BZ).dot(lms),
        }
    }

    /// To absolute XYZ (D65).
    ///
    /// `M'` follows from `Iz`; the opponent rows then leave a 2x2 system
    /// in `L'` and `S'`.
    pub fn to_xyz(&self) -> Vec3 {
        let m = self.iz + IZ_EPSILON;
        let p = self.az - AZ[1] * m;
        let q = self.bz - BZ[1] * m;
        let det = AZ[0] * BZ[2] - AZ[2] * BZ[0];
        let l = (p * BZ[2] - AZ[2] * q) / det;
        let s = (AZ[0] * q - BZ[0] * p) / det;
        xyz_from_lms(Vec3::new(l, m, s))
    }

    /// Hue angle in degrees, `[0, 360)`.
    #[inline]
    pub fn hue(&self) -> f64 {
        self.bz.atan2(self.az).to_degrees().rem_euclid(360.0)
    }
}
