//! sRGB transfer curve, primaries and hex notation.
//!
//! Transfer functions follow IEC 61966-2-1 with the linear segment
//! mirrored for negative values, so out-of-gamut intermediates keep their
//! sign through companding.

use zcam_math::{Mat3, Vec3};

use crate::{ColorError, ColorResult};

/// Linear sRGB to relative XYZ (D65).
pub const RGB_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
]);

/// Relative XYZ (D65) to linear sRGB. Inverse of [`RGB_TO_XYZ`].
pub const XYZ_TO_RGB: Mat3 = Mat3::from_rows([
    [3.2404548360214083, -1.5371388501025751, -0.4985315468684809],
    [-0.9692663898756537, 1.8760109288424913, 0.041556082346673524],
    [0.05564341960421366, -0.20402585426769815, 1.0572251624579287],
]);

/// Half an 8-bit code value in companded units.
const HALF_STEP_8BIT: f64 = 0.5 / 255.0;

/// Encodes linear light to companded sRGB.
///
/// # Formula
///
/// ```text
/// if |L| <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = sign(L) * (1.055 * |L|^(1/2.4) - 0.055)
/// ```
#[inline]
pub fn srgb_companding(l: f64) -> f64 {
    let a = l.abs();
    if a <= 0.0031308 {
        l * 12.92
    } else {
        (1.055 * a.powf(1.0 / 2.4) - 0.055).copysign(l)
    }
}

/// Decodes companded sRGB to linear light. Inverse of [`srgb_companding`].
#[inline]
pub fn srgb_linear(v: f64) -> f64 {
    let a = v.abs();
    if a <= 0.04045 {
        v / 12.92
    } else {
        ((a + 0.055) / 1.055).powf(2.4).copysign(v)
    }
}

/// An RGB triplet. Whether it is linear or companded depends on context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

impl Rgb {
    /// Creates a triplet.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb` into companded values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zcam_color::Rgb;
    ///
    /// let c = Rgb::from_hex("#ff8000").unwrap();
    /// assert_eq!(c.r, 1.0);
    /// assert_eq!(c.b, 0.0);
    /// ```
    pub fn from_hex(hex: &str) -> ColorResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || ColorError::InvalidHex(hex.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        let (r, g, b) = match digits.len() {
            6 => (channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                (short(0)?, short(1)?, short(2)?)
            }
            _ => return Err(invalid()),
        };
        Ok(Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0))
    }

    /// Formats companded values as `#rrggbb`, clamping to `[0, 1]`.
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| {
            let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
            (255.0 * v + 0.5) as u8
        };
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Applies `f` per channel.
    #[inline]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Companded to linear.
    #[inline]
    pub fn to_linear(self) -> Self {
        self.map(srgb_linear)
    }

    /// Linear to companded.
    #[inline]
    pub fn to_companded(self) -> Self {
        self.map(srgb_companding)
    }

    /// Linear sRGB from relative XYZ.
    #[inline]
    pub fn from_xyz(xyz: Vec3) -> Self {
        Self::from(XYZ_TO_RGB * xyz)
    }

    /// Linear sRGB to relative XYZ.
    #[inline]
    pub fn to_xyz(self) -> Vec3 {
        RGB_TO_XYZ * Vec3::from(self)
    }

    /// True if every channel of this linear triplet lies in `[0, 1]`.
    /// NaN is outside.
    #[inline]
    pub fn in_unit_cube(&self) -> bool {
        [self.r, self.g, self.b].iter().all(|v| (0.0..=1.0).contains(v))
    }

    /// True if this linear triplet rounds to a valid 8-bit sRGB code:
    /// every companded channel within half a code value of `[0, 1]`.
    pub fn in_unit_cube_8bit(&self) -> bool {
        let range = -HALF_STEP_8BIT..=1.0 + HALF_STEP_8BIT;
        [self.r, self.g, self.b]
            .iter()
            .all(|&v| range.contains(&srgb_companding(v)))
    }
}

impl From<Vec3> for Rgb {
    #[inline]
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Rgb> for Vec3 {
    #[inline]
    fn from(c: Rgb) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_transfer_roundtrip() {
        for i in -100..=100 {
            let v = i as f64 / 100.0;
            assert_abs_diff_eq!(srgb_companding(srgb_linear(v)), v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transfer_known_values() {
        assert_abs_diff_eq!(srgb_linear(0.5), 0.214041, epsilon = 1e-6);
        assert_abs_diff_eq!(srgb_companding(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(srgb_companding(-0.001), -0.01292, epsilon = 1e-15);
        assert!(srgb_companding(-0.5) < -0.7);
    }

    #[test]
    fn test_matrices_are_inverse() {
        let id = RGB_TO_XYZ * XYZ_TO_RGB;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(id[i][j], expected, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_hex() {
        let c = Rgb::from_hex("#3366CC").unwrap();
        assert_abs_diff_eq!(c.g, 0.4, epsilon = 1e-12);
        assert_eq!(c.to_hex(), "#3366cc");
        assert_eq!(Rgb::from_hex("fff").unwrap(), Rgb::new(1.0, 1.0, 1.0));
        assert_eq!(Rgb::new(1.2, -0.1, f64::NAN).to_hex(), "#ff0000");
    }

    #[test]
    fn test_hex_errors() {
        for bad in ["", "#12345", "#gggggg", "#1234567", "#ffé"] {
            assert!(matches!(Rgb::from_hex(bad), Err(ColorError::InvalidHex(_))), "{bad}");
        }
    }

    #[test]
    fn test_unit_cube() {
        assert!(Rgb::new(0.0, 0.5, 1.0).in_unit_cube());
        assert!(!Rgb::new(0.0, 0.5, 1.0 + 1e-9).in_unit_cube());
        assert!(!Rgb::new(f64::NAN, 0.5, 0.5).in_unit_cube());
    }

    #[test]
    fn test_unit_cube_8bit_tolerance() {
        // Slightly outside [0, 1] but rounds to a valid code value
        assert!(Rgb::new(-1e-4, 0.5, 1.0005).in_unit_cube_8bit());
        assert!(!Rgb::new(-1e-3, 0.5, 0.5).in_unit_cube_8bit());
        assert!(!Rgb::new(0.5, 1.01, 0.5).in_unit_cube_8bit());
        assert!(!Rgb::new(0.5, f64::NAN, 0.5).in_unit_cube_8bit());
    }
}
