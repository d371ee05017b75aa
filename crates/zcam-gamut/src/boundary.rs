//! The fitted sRGB boundary: cusp lightness and chroma as splines of hue.

use std::io::{self, Write};

use zcam_color::Jch;
use zcam_math::{CubicSpline, SegmentedSpline};

/// Evaluation points per knot interval in [`GamutBoundary::write_curve`].
pub const CURVE_POINTS_PER_INTERVAL: usize = 57;

/// Most chromatic displayable color of a hue.
///
/// For a fixed hue, the largest in-gamut chroma as a function of lightness
/// rises to a single peak at the cusp and falls again.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CuspPoint {
    /// Hue angle in `[0, 360)`.
    pub hue: f64,
    /// Lightness `Jz` in `[0, 100]`.
    pub lightness: f64,
    /// Chroma `Cz`.
    pub chroma: f64,
}

impl CuspPoint {
    /// As a (hue, lightness, chroma) triple.
    pub fn jch(&self) -> Jch {
        Jch::new(self.hue, self.lightness, self.chroma)
    }
}

/// Which boundary function to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCurve {
    /// Cusp lightness over hue.
    Lightness,
    /// Cusp chroma over hue.
    Chroma,
}

/// Cusp lightness and chroma of every hue, fitted once per engine.
///
/// Both splines are split at the seven hue extrema of the cusp lightness
/// and cover one turn starting at the first extremum. Lookups shift the hue
/// by whole turns into that range.
#[derive(Debug, Clone)]
pub struct GamutBoundary {
    extrema: [f64; 7],
    hues: Vec<f64>,
    lightness_samples: Vec<f64>,
    chroma_samples: Vec<f64>,
    lightness: SegmentedSpline,
    chroma: SegmentedSpline,
    min_chroma: f64,
    max_chroma: f64,
}

impl GamutBoundary {
    pub(crate) fn new(
        extrema: [f64; 7],
        hues: Vec<f64>,
        lightness_samples: Vec<f64>,
        chroma_samples: Vec<f64>,
        lightness: SegmentedSpline,
        chroma: SegmentedSpline,
    ) -> Self {
        let (min_chroma, max_chroma) = chroma
            .control_values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| (lo.min(c), hi.max(c)));
        Self {
            extrema,
            hues,
            lightness_samples,
            chroma_samples,
            lightness,
            chroma,
            min_chroma,
            max_chroma,
        }
    }

    /// Hues of the cusp lightness extrema, increasing.
    pub fn extrema(&self) -> &[f64; 7] {
        &self.extrema
    }

    /// Shifts `hue` by whole turns into `[first extremum, first extremum + 360)`.
    pub fn wrap_hue(&self, hue: f64) -> f64 {
        let first = self.extrema[0];
        first + (hue - first).rem_euclid(360.0)
    }

    /// Interpolated cusp of `hue`. The returned hue is in `[0, 360)`.
    pub fn cusp(&self, hue: f64) -> CuspPoint {
        let h = self.wrap_hue(hue);
        CuspPoint {
            hue: hue.rem_euclid(360.0),
            lightness: self.lightness.eval(h),
            chroma: self.chroma.eval(h),
        }
    }

    /// Cusp lightness spline.
    pub fn lightness_spline(&self) -> &SegmentedSpline {
        &self.lightness
    }

    /// Cusp chroma spline.
    pub fn chroma_spline(&self) -> &SegmentedSpline {
        &self.chroma
    }

    /// Hues at which cusps were searched directly.
    pub fn sample_hues(&self) -> &[f64] {
        &self.hues
    }

    /// The directly searched cusps, in hue order.
    pub fn samples(&self) -> impl Iterator<Item = CuspPoint> + '_ {
        self.hues
            .iter()
            .zip(self.lightness_samples.iter().zip(&self.chroma_samples))
            .map(|(&h, (&l, &c))| CuspPoint { hue: h.rem_euclid(360.0), lightness: l, chroma: c })
    }

    /// Smallest chroma among the chroma knots.
    pub fn min_chroma(&self) -> f64 {
        self.min_chroma
    }

    /// Largest chroma among the chroma knots.
    pub fn max_chroma(&self) -> f64 {
        self.max_chroma
    }

    fn curve(&self, which: BoundaryCurve) -> (&SegmentedSpline, &[f64]) {
        match which {
            BoundaryCurve::Lightness => (&self.lightness, &self.lightness_samples),
            BoundaryCurve::Chroma => (&self.chroma, &self.chroma_samples),
        }
    }

    /// Writes the raw samples of one curve as `hue value` lines.
    pub fn write_samples<W: Write>(&self, which: BoundaryCurve, mut out: W) -> io::Result<()> {
        let (_, values) = self.curve(which);
        for (h, v) in self.hues.iter().zip(values) {
            writeln!(out, "{h} {v}")?;
        }
        Ok(())
    }

    /// Writes the fitted spline of one curve as `hue value` lines,
    /// [`CURVE_POINTS_PER_INTERVAL`] points across each knot interval.
    pub fn write_curve<W: Write>(&self, which: BoundaryCurve, mut out: W) -> io::Result<()> {
        let (spline, _) = self.curve(which);
        for segment in spline.segments() {
            write_segment(segment, &mut out)?;
        }
        Ok(())
    }

    /// Writes the knots of one curve as `hue value` lines.
    pub fn write_knots<W: Write>(&self, which: BoundaryCurve, mut out: W) -> io::Result<()> {
        let (spline, _) = self.curve(which);
        for (h, v) in spline.knots() {
            writeln!(out, "{h} {v}")?;
        }
        Ok(())
    }
}

fn write_segment<W: Write>(segment: &CubicSpline, out: &mut W) -> io::Result<()> {
    let k = CURVE_POINTS_PER_INTERVAL as f64;
    for pair in segment.xs().windows(2) {
        for j in 0..=CURVE_POINTS_PER_INTERVAL {
            let x = pair[0] + (pair[1] - pair[0]) * j as f64 / k;
            writeln!(out, "{x} {}", segment.eval(x))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use zcam_math::fit_segments;

    const EXTREMA: [f64; 7] = [40.0, 100.0, 130.0, 200.0, 260.0, 320.0, 400.0];

    fn boundary() -> GamutBoundary {
        let hues: Vec<f64> = (80..=800).map(|i| i as f64 * 0.5).collect();
        let lightness: Vec<f64> = hues.iter().map(|h| 50.0 + 10.0 * h.to_radians().sin()).collect();
        let chroma: Vec<f64> = hues.iter().map(|h| 30.0 + 5.0 * h.to_radians().cos()).collect();
        let lspline = fit_segments(&hues, &lightness, &EXTREMA, 1e-4, 37, &EXTREMA).unwrap();
        let cspline = fit_segments(&hues, &chroma, &EXTREMA, 1e-4, 37, &EXTREMA).unwrap();
        GamutBoundary::new(EXTREMA, hues, lightness, chroma, lspline, cspline)
    }

    #[test]
    fn test_cusp_wraps_hue() {
        let b = boundary();
        for h in [0.0, 10.0, 39.9, 40.0, 180.0, 359.0] {
            let expected = 30.0 + 5.0 * f64::to_radians(h).cos();
            for turn in [-720.0, -360.0, 0.0, 360.0, 1080.0] {
                let cusp = b.cusp(h + turn);
                assert_abs_diff_eq!(cusp.hue, h, epsilon = 1e-9);
                assert_abs_diff_eq!(cusp.chroma, expected, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_chroma_range() {
        let b = boundary();
        assert!(b.min_chroma() >= 25.0 - 1e-9 && b.min_chroma() < 26.0);
        assert!(b.max_chroma() <= 35.0 + 1e-9 && b.max_chroma() > 34.0);
        assert_eq!(b.samples().count(), b.sample_hues().len());
    }

    #[test]
    fn test_writers() {
        let b = boundary();
        let mut samples = Vec::new();
        b.write_samples(BoundaryCurve::Lightness, &mut samples).unwrap();
        let text = String::from_utf8(samples).unwrap();
        assert_eq!(text.lines().count(), b.sample_hues().len());
        assert!(text.lines().all(|l| l.split(' ').count() == 2));

        let mut curve = Vec::new();
        b.write_curve(BoundaryCurve::Chroma, &mut curve).unwrap();
        let intervals: usize = b.chroma_spline().segments().iter().map(|s| s.len() - 1).sum();
        let lines = String::from_utf8(curve).unwrap().lines().count();
        assert_eq!(lines, intervals * (CURVE_POINTS_PER_INTERVAL + 1));

        let mut knots = Vec::new();
        b.write_knots(BoundaryCurve::Chroma, &mut knots).unwrap();
        assert_eq!(String::from_utf8(knots).unwrap().lines().count(), b.chroma_spline().knot_count());
    }
}
