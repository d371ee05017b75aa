//! ZCAM color appearance model (Safdar, Hardeberg, Luo 2021).
//!
//! Forward: absolute XYZ -> CAT02 to the viewing white -> Izazbz ->
//! appearance attributes. Inverse: (hue, lightness, chroma) -> Izazbz ->
//! XYZ -> linear sRGB.
//!
//! All attribute names follow the paper:
//!
//! | Field | Symbol | Meaning |
//! |-------|--------|---------|
//! | `hue` | hz | hue angle, degrees |
//! | `hue_quadrature` | Hz | hue composition, 0..400 |
//! | `lightness` | Jz | relative to the white, 0..100 |
//! | `brightness` | Qz | absolute |
//! | `chroma` | Cz | relative colorfulness |
//! | `colorfulness` | Mz | absolute |
//! | `saturation` | Sz | colorfulness relative to brightness |
//! | `vividness` | Vz | |
//! | `blackness` | Kz | |
//! | `whiteness` | Wz | |

use zcam_math::{Vec3, cat02_adapt};

use crate::{ColorError, ColorResult, Izazbz, Rgb, ViewingConditions};

// ============================================================================
// Hue quadrature
// ============================================================================

/// Unique hue angles (red, yellow, green, blue, red + 360).
const UNIQUE_HUES: [f64; 5] = [33.44, 89.29, 146.30, 238.36, 393.44];
/// Eccentricity factors at the unique hues.
const UNIQUE_ECC: [f64; 5] = [0.68, 0.64, 1.52, 0.77, 0.68];

/// Hue quadrature `Hz` in `[0, 400)` for a hue angle in degrees.
pub fn hue_quadrature(hue: f64) -> f64 {
    let h = hue.rem_euclid(360.0);
    let h = if h < UNIQUE_HUES[0] { h + 360.0 } else { h };
    let i = (0..4).rev().find(|&k| UNIQUE_HUES[k] <= h).unwrap_or(0);
    let t = (h - UNIQUE_HUES[i]) / UNIQUE_ECC[i];
    let u = (UNIQUE_HUES[i + 1] - h) / UNIQUE_ECC[i + 1];
    100.0 * i as f64 + 100.0 * t / (t + u)
}

/// Hue angle in `[0, 360)` for a hue quadrature. Inverse of [`hue_quadrature`].
pub fn hue_from_quadrature(quadrature: f64) -> f64 {
    let q = quadrature.rem_euclid(400.0);
    let i = ((q / 100.0) as usize).min(3);
    let dq = q - 100.0 * i as f64;
    let (h0, h1) = (UNIQUE_HUES[i], UNIQUE_HUES[i + 1]);
    let (e0, e1) = (UNIQUE_ECC[i], UNIQUE_ECC[i + 1]);
    let h = (dq * (e1 * h0 - e0 * h1) - 100.0 * h0 * e1) / (dq * (e1 - e0) - 100.0 * e1);
    h.rem_euclid(360.0)
}

#[inline]
fn eccentricity(hue: f64) -> f64 {
    1.015 + (89.038 + hue).to_radians().cos()
}

// ============================================================================
// Attribute records
// ============================================================================

/// Hue, lightness and chroma: the triple the gamut engine works in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Jch {
    /// Hue angle, degrees.
    pub hue: f64,
    /// Lightness `Jz`.
    pub lightness: f64,
    /// Chroma `Cz`.
    pub chroma: f64,
}

impl Jch {
    /// Creates a triple.
    pub const fn new(hue: f64, lightness: f64, chroma: f64) -> Self {
        Self { hue, lightness, chroma }
    }
}

/// Fully populated ZCAM attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZcamColor {
    /// Hue angle `hz`, degrees in `[0, 360)`.
    pub hue: f64,
    /// Hue quadrature `Hz`.
    pub hue_quadrature: f64,
    /// Lightness `Jz`.
    pub lightness: f64,
    /// Brightness `Qz`.
    pub brightness: f64,
    /// Chroma `Cz`.
    pub chroma: f64,
    /// Colorfulness `Mz`.
    pub colorfulness: f64,
    /// Saturation `Sz`.
    pub saturation: f64,
    /// Vividness `Vz`.
    pub vividness: f64,
    /// Blackness `Kz`.
    pub blackness: f64,
    /// Whiteness `Wz`.
    pub whiteness: f64,
}

impl ZcamColor {
    /// Attributes of absolute XYZ seen under `source_white`.
    pub fn from_xyz(xyz: Vec3, source_white: Vec3, viewing: &ViewingConditions) -> Self {
        zcam_from_xyz(xyz, source_white, viewing)
    }

    /// Attributes of a companded sRGB color.
    ///
    /// Relative XYZ is scaled to the viewing white luminance, so sRGB white
    /// has lightness 100.
    pub fn from_srgb(rgb: Rgb, viewing: &ViewingConditions) -> Self {
        let white = viewing.white();
        let xyz = rgb.to_linear().to_xyz() * white.y;
        zcam_from_xyz(xyz, white, viewing)
    }

    /// Completes a (hue, lightness, chroma) triple with every attribute.
    pub fn from_jch(jch: Jch, viewing: &ViewingConditions) -> Self {
        let hue = jch.hue.rem_euclid(360.0);
        let (j, c) = (jch.lightness, jch.chroma);
        let qz = j * viewing.qzw / 100.0;
        let mz = c * viewing.qzw / 100.0;
        Self {
            hue,
            hue_quadrature: hue_quadrature(hue),
            lightness: j,
            brightness: qz,
            chroma: c,
            colorfulness: mz,
            saturation: saturation(viewing, j, c),
            vividness: ((j - 58.0).powi(2) + 3.4 * c * c).sqrt(),
            blackness: 100.0 - 0.8 * (j * j + 8.0 * c * c).sqrt(),
            whiteness: 100.0 - ((100.0 - j).powi(2) + c * c).sqrt(),
        }
    }

    /// The (hue, lightness, chroma) part.
    pub fn jch(&self) -> Jch {
        Jch::new(self.hue, self.lightness, self.chroma)
    }
}

/// Saturation `Sz` for a lightness and chroma.
///
/// `Sz = 100 F_L^0.6 sqrt(Mz / Qz)`, where `Mz / Qz = Cz / Jz`.
pub fn saturation(viewing: &ViewingConditions, lightness: f64, chroma: f64) -> f64 {
    if lightness <= 0.0 {
        return 0.0;
    }
    100.0 * viewing.fl.powf(0.6) * (chroma / lightness).sqrt()
}

// ============================================================================
// Forward and inverse model
// ============================================================================

/// ZCAM attributes of absolute XYZ seen under `source_white`.
pub fn zcam_from_xyz(xyz: Vec3, source_white: Vec3, viewing: &ViewingConditions) -> ZcamColor {
    let adapted = cat02_adapt(xyz, source_white, viewing.white(), viewing.d);
    let izab = Izazbz::from_xyz(adapted);
    let hue = izab.hue();
    let qz = viewing.q_coef * izab.iz.max(0.0).powf(viewing.q_exp);
    let mz = 100.0
        * (izab.az * izab.az + izab.bz * izab.bz).powf(0.37)
        * eccentricity(hue).powf(0.068)
        * viewing.m_coef;
    let jch = Jch::new(hue, 100.0 * qz / viewing.qzw, 100.0 * mz / viewing.qzw);
    ZcamColor::from_jch(jch, viewing)
}

/// Absolute XYZ (under the viewing white) for a (hue, lightness, chroma).
///
/// Returns NaN components when the triple has no real preimage, e.g.
/// negative lightness or a chroma so large the PQ inverse breaks down.
pub fn xyz_from_zcam(jch: Jch, viewing: &ViewingConditions) -> Vec3 {
    let qz = jch.lightness * viewing.qzw / 100.0;
    if qz < 0.0 || jch.chroma < 0.0 {
        return Vec3::splat(f64::NAN);
    }
    let iz = (qz / viewing.q_coef).powf(1.0 / viewing.q_exp);
    let mz = jch.chroma * viewing.qzw / 100.0;
    let ez = eccentricity(jch.hue);
    // (az² + bz²)^0.37 = Mz / (100 ez^0.068 m_coef)
    let radius = (mz / (100.0 * ez.powf(0.068) * viewing.m_coef)).powf(1.0 / 0.74);
    let h = jch.hue.to_radians();
    Izazbz { iz, az: radius * h.cos(), bz: radius * h.sin() }.to_xyz()
}

/// Linear sRGB for a (hue, lightness, chroma), relative to the viewing white.
///
/// Channels outside `[0, 1]` (or NaN) mean the color is out of gamut.
pub fn linear_rgb_from_jch(jch: Jch, viewing: &ViewingConditions) -> Rgb {
    Rgb::from_xyz(xyz_from_zcam(jch, viewing) / viewing.white().y)
}

// ============================================================================
// Partial attributes
// ============================================================================

/// ZCAM attributes where any subset may be known.
///
/// [`PartialZcam::normalize`] resolves one attribute from each of three
/// groups into a [`Jch`]:
///
/// - hue: `hue` or `hue_quadrature`
/// - lightness: `lightness` or `brightness`
/// - chroma: `chroma`, `colorfulness`, `saturation`, `vividness`,
///   `blackness` or `whiteness`
///
/// Within a group the first listed attribute wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartialZcam {
    /// Hue angle `hz`.
    pub hue: Option<f64>,
    /// Hue quadrature `Hz`.
    pub hue_quadrature: Option<f64>,
    /// Lightness `Jz`.
    pub lightness: Option<f64>,
    /// Brightness `Qz`.
    pub brightness: Option<f64>,
    /// Chroma `Cz`.
    pub chroma: Option<f64>,
    /// Colorfulness `Mz`.
    pub colorfulness: Option<f64>,
    /// Saturation `Sz`.
    pub saturation: Option<f64>,
    /// Vividness `Vz`.
    pub vividness: Option<f64>,
    /// Blackness `Kz`.
    pub blackness: Option<f64>,
    /// Whiteness `Wz`.
    pub whiteness: Option<f64>,
}

impl PartialZcam {
    /// Resolves hue, lightness and chroma from whichever attributes are set.
    pub fn normalize(&self, viewing: &ViewingConditions) -> ColorResult<Jch> {
        let hue = match (self.hue, self.hue_quadrature) {
            (Some(h), _) => h.rem_euclid(360.0),
            (None, Some(q)) => hue_from_quadrature(q),
            (None, None) => {
                return Err(ColorError::MissingAttribute {
                    group: "hue",
                    alternatives: "hue (hz), hue_quadrature (Hz)",
                });
            }
        };

        let j = match (self.lightness, self.brightness) {
            (Some(j), _) => j,
            (None, Some(q)) => 100.0 * q / viewing.qzw,
            (None, None) => {
                return Err(ColorError::MissingAttribute {
                    group: "lightness",
                    alternatives: "lightness (Jz), brightness (Qz)",
                });
            }
        };

        let c = if let Some(c) = self.chroma {
            c
        } else if let Some(m) = self.colorfulness {
            100.0 * m / viewing.qzw
        } else if let Some(s) = self.saturation {
            // Sz = 100 FL^0.6 sqrt(Cz / Jz)
            j * (s / (100.0 * viewing.fl.powf(0.6))).powi(2)
        } else if let Some(v) = self.vividness {
            non_negative_root((v * v - (j - 58.0).powi(2)) / 3.4, "vividness", v)?
        } else if let Some(k) = self.blackness {
            non_negative_root((((100.0 - k) / 0.8).powi(2) - j * j) / 8.0, "blackness", k)?
        } else if let Some(w) = self.whiteness {
            non_negative_root((100.0 - w).powi(2) - (100.0 - j).powi(2), "whiteness", w)?
        } else {
            return Err(ColorError::MissingAttribute {
                group: "chroma",
                alternatives: "chroma (Cz), colorfulness (Mz), saturation (Sz), \
                               vividness (Vz), blackness (Kz), whiteness (Wz)",
            });
        };

        Ok(Jch::new(hue, j, c))
    }
}

fn non_negative_root(square: f64, name: &str, value: f64) -> ColorResult<f64> {
    if square >= 0.0 {
        Ok(square.sqrt())
    } else {
        Err(ColorError::InvalidValue(format!(
            "{name} {value} is unreachable at this lightness"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn srgb(hex: &str) -> ZcamColor {
        ZcamColor::from_srgb(Rgb::from_hex(hex).unwrap(), &ViewingConditions::default())
    }

    #[test]
    fn test_primaries() {
        let red = srgb("#ff0000");
        assert_abs_diff_eq!(red.hue, 43.5026, epsilon = 1e-3);
        assert_abs_diff_eq!(red.lightness, 52.8354, epsilon = 1e-3);
        assert_abs_diff_eq!(red.chroma, 27.4821, epsilon = 1e-3);
        assert_abs_diff_eq!(red.saturation, 32.9817, epsilon = 1e-3);

        let blue = srgb("#0000ff");
        assert_abs_diff_eq!(blue.hue, 257.6055, epsilon = 1e-3);
        assert_abs_diff_eq!(blue.lightness, 45.2019, epsilon = 1e-3);
        assert_abs_diff_eq!(blue.hue_quadrature, 311.1208, epsilon = 1e-3);
        assert_abs_diff_eq!(blue.vividness, 65.4869, epsilon = 1e-3);
        assert_abs_diff_eq!(blue.blackness, 13.2877, epsilon = 1e-3);
        assert_abs_diff_eq!(blue.whiteness, 35.0693, epsilon = 1e-3);
    }

    #[test]
    fn test_white_and_black() {
        let white = srgb("#ffffff");
        assert_abs_diff_eq!(white.lightness, 100.0, epsilon = 1e-3);
        assert!(white.chroma < 0.25);

        let black = srgb("#000000");
        assert!(black.lightness.abs() < 1e-3);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let viewing = ViewingConditions::default();
        let rgb = Rgb::new(0.2, 0.4, 0.6);
        let z = ZcamColor::from_srgb(rgb, &viewing);
        let back = linear_rgb_from_jch(z.jch(), &viewing).to_companded();
        assert_abs_diff_eq!(back.r, 0.2, epsilon = 1e-7);
        assert_abs_diff_eq!(back.g, 0.4, epsilon = 1e-7);
        assert_abs_diff_eq!(back.b, 0.6, epsilon = 1e-7);
    }

    #[test]
    fn test_inverse_rejects_negative() {
        let viewing = ViewingConditions::default();
        assert!(!linear_rgb_from_jch(Jch::new(10.0, -1.0, 5.0), &viewing).in_unit_cube());
        assert!(!linear_rgb_from_jch(Jch::new(10.0, 50.0, -5.0), &viewing).in_unit_cube());
    }

    #[test]
    fn test_hue_quadrature() {
        assert_abs_diff_eq!(hue_quadrature(33.44), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hue_quadrature(89.29), 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hue_quadrature(259.0), 311.9394, epsilon = 1e-3);
        assert_abs_diff_eq!(hue_quadrature(0.0), 376.2605, epsilon = 1e-3);
        for h in [0.0, 10.0, 50.0, 100.0, 200.0, 259.0, 300.0, 359.9] {
            assert_abs_diff_eq!(hue_from_quadrature(hue_quadrature(h)), h, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_normalize_alternatives() {
        let viewing = ViewingConditions::default();
        let full = ZcamColor::from_jch(Jch::new(120.0, 60.0, 20.0), &viewing);

        let cases = [
            PartialZcam { hue: Some(120.0), lightness: Some(60.0), chroma: Some(20.0), ..Default::default() },
            PartialZcam {
                hue_quadrature: Some(full.hue_quadrature),
                brightness: Some(full.brightness),
                colorfulness: Some(full.colorfulness),
                ..Default::default()
            },
            PartialZcam { hue: Some(120.0), lightness: Some(60.0), saturation: Some(full.saturation), ..Default::default() },
            PartialZcam { hue: Some(120.0), lightness: Some(60.0), vividness: Some(full.vividness), ..Default::default() },
            PartialZcam { hue: Some(120.0), lightness: Some(60.0), blackness: Some(full.blackness), ..Default::default() },
            PartialZcam { hue: Some(120.0), lightness: Some(60.0), whiteness: Some(full.whiteness), ..Default::default() },
        ];
        for (i, p) in cases.iter().enumerate() {
            let jch = p.normalize(&viewing).unwrap();
            assert_abs_diff_eq!(jch.hue, 120.0, epsilon = 1e-9);
            assert_abs_diff_eq!(jch.lightness, 60.0, epsilon = 1e-9);
            assert!((jch.chroma - 20.0).abs() < 1e-9, "case {i}: {}", jch.chroma);
        }
    }

    #[test]
    fn test_normalize_missing_groups() {
        let viewing = ViewingConditions::default();
        let err = PartialZcam { lightness: Some(50.0), chroma: Some(1.0), ..Default::default() }
            .normalize(&viewing)
            .unwrap_err();
        assert!(matches!(err, ColorError::MissingAttribute { group: "hue", .. }));

        let err = PartialZcam { hue: Some(50.0), chroma: Some(1.0), ..Default::default() }
            .normalize(&viewing)
            .unwrap_err();
        assert!(matches!(err, ColorError::MissingAttribute { group: "lightness", .. }));

        let err = PartialZcam { hue: Some(50.0), lightness: Some(1.0), ..Default::default() }
            .normalize(&viewing)
            .unwrap_err();
        assert!(matches!(err, ColorError::MissingAttribute { group: "chroma", .. }));
        assert!(err.to_string().contains("saturation (Sz)"));
    }

    #[test]
    fn test_normalize_unreachable_whiteness() {
        let viewing = ViewingConditions::default();
        let p = PartialZcam { hue: Some(0.0), lightness: Some(20.0), whiteness: Some(90.0), ..Default::default() };
        assert!(matches!(p.normalize(&viewing), Err(ColorError::InvalidValue(_))));
    }
}
