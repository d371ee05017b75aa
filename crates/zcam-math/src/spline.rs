//! Natural cubic splines and an adaptive knot selector.
//!
//! The gamut boundary is sampled densely once, then replaced by splines
//! with as few knots as needed:
//!
//! - [`CubicSpline`] - natural spline through a set of knots
//! - [`spline_fit`] - greedy knot selection until the worst residual
//!   drops below a tolerance
//! - [`SegmentedSpline`] - independent splines joined end to end, so that
//!   kinks (the hue extrema) become segment boundaries
//!
//! # Usage
//!
//! ```rust
//! use zcam_math::{spline_fit, CubicSpline};
//!
//! let xs: Vec<f64> = (0..=40).map(|i| i as f64 * 0.1).collect();
//! let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
//! let fit = spline_fit(&xs, &ys, 1e-4, 40, &[]).unwrap();
//! assert!(fit.max_error < 1e-4);
//! assert!(fit.spline.len() < xs.len());
//! ```

use crate::{MathError, MathResult};

// ============================================================================
// CubicSpline
// ============================================================================

/// Natural cubic spline (zero second derivative at both ends).
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots.
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Builds a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// `xs` must be strictly increasing. One knot yields a constant, two
    /// knots a straight line.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::KnotMismatch { xs: xs.len(), ys: ys.len() });
        }
        if xs.is_empty() {
            return Err(MathError::EmptyKnots);
        }
        if let Some(index) = (1..xs.len()).find(|&i| xs[i] <= xs[i - 1]) {
            return Err(MathError::UnsortedKnots { index });
        }

        let n = xs.len();
        let mut y2s = vec![0.0; n];
        if n > 2 {
            // Thomas algorithm on the tridiagonal system, natural ends
            let mut u = vec![0.0; n - 1];
            for i in 1..n - 1 {
                let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
                let p = sig * y2s[i - 1] + 2.0;
                y2s[i] = (sig - 1.0) / p;
                let slope = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                    - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
                u[i] = (6.0 * slope / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
            }
            for k in (0..n - 1).rev() {
                y2s[k] = y2s[k] * y2s[k + 1] + u[k];
            }
        }

        Ok(Self { xs, ys, y2s })
    }

    /// Number of knots.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false; construction rejects empty knot sets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Knot abscissae.
    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Knot ordinates.
    #[inline]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// First knot x.
    #[inline]
    pub fn start(&self) -> f64 {
        self.xs[0]
    }

    /// Last knot x.
    #[inline]
    pub fn end(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Evaluates the spline at `t`.
    ///
    /// Outside the knot range the first or last cubic piece is extended.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.xs.len();
        if n == 1 {
            return self.ys[0];
        }
        let lo = self.xs.partition_point(|&x| x <= t).saturating_sub(1).min(n - 2);
        let hi = lo + 1;

        let h = self.xs[hi] - self.xs[lo];
        let a = self.xs[hi] - t;
        let b = t - self.xs[lo];
        let hh = h * h;
        let curve = (a * a * a - a * hh) * self.y2s[lo] + (b * b * b - b * hh) * self.y2s[hi];
        (a * self.ys[lo] + b * self.ys[hi] + curve / 6.0) / h
    }
}

// ============================================================================
// Adaptive fit
// ============================================================================

/// A fitted spline and its largest residual over the fitted samples.
#[derive(Debug, Clone)]
pub struct SplineFit {
    /// The fitted spline.
    pub spline: CubicSpline,
    /// Largest absolute residual over all input samples.
    pub max_error: f64,
}

/// Fits a spline to samples by greedily adding the worst-fitting sample.
///
/// Starts from the first and last sample plus every sample whose x appears
/// in `forced`. Each round rebuilds the spline and adds the sample with the
/// largest residual, while that residual is at least `eps` and fewer than
/// `max_points` knots are in use. `max_error` reports the residual of the
/// returned spline, so it may exceed `eps` when the knot budget ran out.
///
/// `xs` must be strictly increasing.
pub fn spline_fit(
    xs: &[f64],
    ys: &[f64],
    eps: f64,
    max_points: usize,
    forced: &[f64],
) -> MathResult<SplineFit> {
    if xs.len() != ys.len() {
        return Err(MathError::KnotMismatch { xs: xs.len(), ys: ys.len() });
    }
    let n = xs.len();
    if n == 0 {
        return Err(MathError::EmptyKnots);
    }

    let mut chosen: Vec<bool> = xs.iter().map(|x| forced.contains(x)).collect();
    chosen[0] = true;
    chosen[n - 1] = true;

    loop {
        let (kx, ky): (Vec<f64>, Vec<f64>) = (0..n)
            .filter(|&i| chosen[i])
            .map(|i| (xs[i], ys[i]))
            .unzip();
        let knots = kx.len();
        let spline = CubicSpline::new(kx, ky)?;

        let (worst, max_error) = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (spline.eval(x) - y).abs())
            .enumerate()
            .fold((0, 0.0_f64), |acc, (i, e)| if e > acc.1 { (i, e) } else { acc });

        if max_error < eps || knots >= max_points || chosen[worst] {
            return Ok(SplineFit { spline, max_error });
        }
        chosen[worst] = true;
    }
}

/// Fits one spline to the samples with `start <= x <= end`.
pub fn fit_segment(
    xs: &[f64],
    ys: &[f64],
    start: f64,
    end: f64,
    eps: f64,
    max_points: usize,
    forced: &[f64],
) -> MathResult<SplineFit> {
    if xs.len() != ys.len() {
        return Err(MathError::KnotMismatch { xs: xs.len(), ys: ys.len() });
    }
    let (sx, sy): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter(|&(&x, _)| start <= x && x <= end)
        .map(|(&x, &y)| (x, y))
        .unzip();
    spline_fit(&sx, &sy, eps, max_points, forced)
}

// ============================================================================
// SegmentedSpline
// ============================================================================

/// Independent cubic splines covering consecutive ranges of x.
///
/// A segment owns `[start, end)`; values left of the first segment use the
/// first, values right of the last use the last.
#[derive(Debug, Clone, Default)]
pub struct SegmentedSpline {
    segments: Vec<CubicSpline>,
}

impl SegmentedSpline {
    /// Creates an empty segmented spline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment. Segments must be pushed in increasing x order.
    pub fn push(&mut self, spline: CubicSpline) {
        self.segments.push(spline);
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The segments in x order.
    pub fn segments(&self) -> &[CubicSpline] {
        &self.segments
    }

    /// Total knots over all segments (shared ends counted twice).
    pub fn knot_count(&self) -> usize {
        self.segments.iter().map(CubicSpline::len).sum()
    }

    /// All knot y values, segment by segment.
    pub fn control_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.segments.iter().flat_map(|s| s.ys().iter().copied())
    }

    /// All knots as `(x, y)`, segment by segment.
    pub fn knots(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.segments
            .iter()
            .flat_map(|s| s.xs().iter().copied().zip(s.ys().iter().copied()))
    }

    /// Evaluates the segment owning `t`. Returns NaN when empty.
    pub fn eval(&self, t: f64) -> f64 {
        if self.segments.is_empty() {
            return f64::NAN;
        }
        let idx = self
            .segments
            .partition_point(|s| s.start() <= t)
            .saturating_sub(1);
        self.segments[idx].eval(t)
    }
}

/// Fits one spline per consecutive pair of `bounds`.
///
/// Segment `j` uses the samples with `bounds[j-1] <= x <= bounds[j]`.
pub fn fit_segments(
    xs: &[f64],
    ys: &[f64],
    bounds: &[f64],
    eps: f64,
    max_points: usize,
    forced: &[f64],
) -> MathResult<SegmentedSpline> {
    let mut out = SegmentedSpline::new();
    for pair in bounds.windows(2) {
        let fit = fit_segment(xs, ys, pair[0], pair[1], eps, max_points, forced)?;
        out.push(fit.spline);
    }
    Ok(out)
}
