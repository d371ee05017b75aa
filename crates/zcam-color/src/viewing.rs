//! ZCAM viewing conditions.
//!
//! Everything that depends only on the viewing environment is computed
//! once here and shared by reference by every conversion.

use zcam_math::{D65, Vec3, degree_of_adaptation};

use crate::{ColorError, ColorResult, Izazbz};

/// HDR reference white, cd/m² (ITU-R BT.2408).
pub const REFERENCE_WHITE_LUMINANCE: f64 = 203.0;

/// Surround class of the viewing environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surround {
    /// Dark room, e.g. cinema.
    Dark,
    /// Dimly lit room, e.g. television.
    Dim,
    /// Typical office or daylight viewing.
    #[default]
    Average,
}

impl Surround {
    /// ZCAM surround factor `F_s`.
    pub const fn factor(self) -> f64 {
        match self {
            Self::Dark => 0.525,
            Self::Dim => 0.59,
            Self::Average => 0.69,
        }
    }

    /// CIECAM02 adaptation factor `F` for the degree of adaptation.
    pub const fn adaptation_factor(self) -> f64 {
        match self {
            Self::Dark => 0.8,
            Self::Dim => 0.9,
            Self::Average => 1.0,
        }
    }
}

/// Immutable viewing environment plus the model terms derived from it.
///
/// # Example
///
/// ```rust
/// use zcam_color::{Surround, ViewingConditions};
///
/// let dim = ViewingConditions::builder()
///     .adapting_luminance(16.0)
///     .surround(Surround::Dim)
///     .build()
///     .unwrap();
/// assert_eq!(dim.surround(), Surround::Dim);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ViewingConditions {
    white: Vec3,
    yb: f64,
    la: f64,
    surround: Surround,
    /// Background factor `F_b = sqrt(Yb / Yw)`.
    pub(crate) fb: f64,
    /// Luminance level adaptation factor `F_L`.
    pub(crate) fl: f64,
    /// Degree of adaptation `D`.
    pub(crate) d: f64,
    /// Achromatic response of the white.
    pub(crate) izw: f64,
    /// Brightness of the white.
    pub(crate) qzw: f64,
    /// `Qz = q_coef * Iz^q_exp`
    pub(crate) q_exp: f64,
    pub(crate) q_coef: f64,
    /// `Mz = m_coef * (az² + bz²)^0.37 * ez^0.068`
    pub(crate) m_coef: f64,
}

impl ViewingConditions {
    /// Starts a builder at the defaults.
    pub fn builder() -> ViewingConditionsBuilder {
        ViewingConditionsBuilder::default()
    }

    /// Absolute white point, cd/m².
    pub fn white(&self) -> Vec3 {
        self.white
    }

    /// Background luminance factor `Yb`.
    pub fn background(&self) -> f64 {
        self.yb
    }

    /// Adapting field luminance `La`, cd/m².
    pub fn adapting_luminance(&self) -> f64 {
        self.la
    }

    /// Surround class.
    pub fn surround(&self) -> Surround {
        self.surround
    }

    /// Brightness of the white, `Qz_w`.
    pub fn white_brightness(&self) -> f64 {
        self.qzw
    }

    /// Luminance level adaptation factor `F_L`.
    pub fn luminance_adaptation(&self) -> f64 {
        self.fl
    }

    /// Degree of chromatic adaptation `D`.
    pub fn degree_of_adaptation(&self) -> f64 {
        self.d
    }
}

impl Default for ViewingConditions {
    fn default() -> Self {
        // Defaults are known-valid; derive directly.
        ViewingConditionsBuilder::default().derive()
    }
}

/// Builder for [`ViewingConditions`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewingConditionsBuilder {
    white: Vec3,
    yb: f64,
    la: f64,
    surround: Surround,
}

impl Default for ViewingConditionsBuilder {
    fn default() -> Self {
        Self {
            white: D65 * REFERENCE_WHITE_LUMINANCE,
            yb: 20.0,
            la: 4.0,
            surround: Surround::Average,
        }
    }
}

impl ViewingConditionsBuilder {
    /// Absolute white point XYZ, cd/m².
    pub fn white(mut self, white: Vec3) -> Self {
        self.white = white;
        self
    }

    /// Background luminance factor `Yb` (percent of the white).
    pub fn background(mut self, yb: f64) -> Self {
        self.yb = yb;
        self
    }

    /// Adapting field luminance `La`, cd/m².
    pub fn adapting_luminance(mut self, la: f64) -> Self {
        self.la = la;
        self
    }

    /// Surround class.
    pub fn surround(mut self, surround: Surround) -> Self {
        self.surround = surround;
        self
    }

    /// Validates and precomputes.
    pub fn build(self) -> ColorResult<ViewingConditions> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.white.x) && positive(self.white.y) && positive(self.white.z)) {
            return Err(ColorError::InvalidValue(format!(
                "white point must be positive, got {:?}",
                self.white.to_array()
            )));
        }
        if !positive(self.yb) {
            return Err(ColorError::InvalidValue(format!("background Yb must be positive, got {}", self.yb)));
        }
        if !positive(self.la) {
            return Err(ColorError::InvalidValue(format!(
                "adapting luminance La must be positive, got {}",
                self.la
            )));
        }
        Ok(self.derive())
    }

    fn derive(self) -> ViewingConditions {
        let fs = self.surround.factor();
        let fb = (self.yb / self.white.y).sqrt();
        let fl = 0.171 * self.la.cbrt() * (1.0 - (-48.0 / 9.0 * self.la).exp());
        let d = degree_of_adaptation(self.surround.adaptation_factor(), self.la);
        let izw = Izazbz::from_xyz(self.white).iz;

        let q_exp = 1.6 * fs / fb.powf(0.12);
        let q_coef = 2700.0 * fs.powf(2.2) * fb.sqrt() * fl.powf(0.2);
        let qzw = q_coef * izw.powf(q_exp);
        let m_coef = fl.powf(0.2) / (fb.powf(0.1) * izw.powf(0.78));

        ViewingConditions {
            white: self.white,
            yb: self.yb,
            la: self.la,
            surround: self.surround,
            fb,
            fl,
            d,
            izw,
            qzw,
            q_exp,
            q_coef,
            m_coef,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_terms() {
        let v = ViewingConditions::default();
        assert_relative_eq!(v.fb, 0.3138824, epsilon = 1e-6);
        assert_relative_eq!(v.fl, 0.2714456, epsilon = 1e-6);
        assert_relative_eq!(v.izw, 0.3935109, epsilon = 1e-6);
        assert_relative_eq!(v.white_brightness(), 157.78864, epsilon = 1e-4);
        assert_eq!(v.surround(), Surround::Average);
        assert_eq!(v.white().y, 203.0);
    }

    #[test]
    fn test_builder_matches_default() {
        let built = ViewingConditions::builder().build().unwrap();
        assert_eq!(built, ViewingConditions::default());
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(matches!(
            ViewingConditions::builder().adapting_luminance(0.0).build(),
            Err(ColorError::InvalidValue(_))
        ));
        assert!(ViewingConditions::builder().background(f64::NAN).build().is_err());
        assert!(ViewingConditions::builder().white(Vec3::new(1.0, -1.0, 1.0)).build().is_err());
    }

    #[test]
    fn test_surround_changes_brightness() {
        let dark = ViewingConditions::builder().surround(Surround::Dark).build().unwrap();
        let avg = ViewingConditions::default();
        assert!(dark.white_brightness() < avg.white_brightness());
        assert!(dark.degree_of_adaptation() < avg.degree_of_adaptation());
    }
}
