//! The seam between the boundary search and the appearance model.

use zcam_color::{Jch, Rgb, ViewingConditions, ZcamColor, linear_rgb_from_jch, saturation};

/// What the gamut engine needs to know about a color model.
///
/// The engine only ever asks for linear RGB of a (hue, lightness, chroma)
/// triple and tests it against the unit cube, so any model with a
/// monotone chroma axis can stand in, e.g. an analytic solid in tests.
pub trait GamutOracle {
    /// Linear display RGB for a triple. NaN or values outside `[0, 1]`
    /// mean the triple is not displayable.
    fn linear_rgb(&self, jch: Jch) -> Rgb;

    /// Saturation corresponding to a lightness and chroma.
    fn saturation(&self, lightness: f64, chroma: f64) -> f64;

    /// Every attribute of a triple.
    fn describe(&self, jch: Jch) -> ZcamColor;
}

impl GamutOracle for ViewingConditions {
    #[inline]
    fn linear_rgb(&self, jch: Jch) -> Rgb {
        linear_rgb_from_jch(jch, self)
    }

    #[inline]
    fn saturation(&self, lightness: f64, chroma: f64) -> f64 {
        saturation(self, lightness, chroma)
    }

    fn describe(&self, jch: Jch) -> ZcamColor {
        ZcamColor::from_jch(jch, self)
    }
}

impl<O: GamutOracle + ?Sized> GamutOracle for &O {
    #[inline]
    fn linear_rgb(&self, jch: Jch) -> Rgb {
        (**self).linear_rgb(jch)
    }

    #[inline]
    fn saturation(&self, lightness: f64, chroma: f64) -> f64 {
        (**self).saturation(lightness, chroma)
    }

    fn describe(&self, jch: Jch) -> ZcamColor {
        (**self).describe(jch)
    }
}
