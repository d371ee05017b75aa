//! One-dimensional searches used to trace the gamut boundary.
//!
//! - [`bisect_boundary`] locates the transition of a monotone predicate,
//!   e.g. the largest chroma that still maps inside the RGB cube.
//!   [`bisect_last_inside`] runs the same search but returns the last point
//!   that satisfied the predicate.
//! - [`golden_section_extremum`] locates the extremum of a unimodal
//!   function, e.g. the lightness at which chroma peaks.
//!
//! Both are allocation-free and evaluate their closure once per iteration.

use crate::{MathError, MathResult};

/// `1/φ`
const INV_PHI: f64 = 0.618_033_988_749_894_9;
/// `1/φ²`
const INV_PHI2: f64 = 0.381_966_011_250_105_1;

/// Hard iteration cap for golden-section search. 257 iterations shrink any
/// finite bracket by `φ^-257`, far below f64 resolution.
const GOLDEN_MAX_ITER: usize = 257;

#[inline]
fn midpoint(a: f64, b: f64) -> f64 {
    a + 0.5 * (b - a)
}

/// Finds the transition point of a monotone predicate.
///
/// `inside` must hold at `lo` and fail at `hi`. `lo` may exceed `hi` when
/// searching downwards. The bracket is halved until it is at most `eps`
/// wide (or the midpoint stops moving), and the last midpoint is returned.
///
/// A predicate that is not monotone over the bracket still terminates but
/// returns some transition, not necessarily the one wanted.
///
/// # Example
///
/// ```rust
/// use zcam_math::bisect_boundary;
///
/// let x = bisect_boundary(|x| x <= 1.0, -5.0, 5.0, 1e-5);
/// assert!((x - 1.0).abs() < 1e-5);
/// ```
pub fn bisect_boundary<F>(mut inside: F, lo: f64, hi: f64, eps: f64) -> f64
where
    F: FnMut(f64) -> bool,
{
    let (mut lo, mut hi) = (lo, hi);
    let mut mid = midpoint(lo, hi);
    while (hi - lo).abs() > eps {
        mid = midpoint(lo, hi);
        if mid == lo || mid == hi {
            break;
        }
        if inside(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    mid
}

/// Like [`bisect_boundary`] but returns the last point at which `inside`
/// held, i.e. the final `lo` of the bracket.
///
/// The result is within `eps` of the transition and never on the failing
/// side of it, so callers can use it without re-checking the predicate.
/// Returns `lo` unchanged when no midpoint satisfied `inside`.
pub fn bisect_last_inside<F>(mut inside: F, lo: f64, hi: f64, eps: f64) -> f64
where
    F: FnMut(f64) -> bool,
{
    let (mut lo, mut hi) = (lo, hi);
    while (hi - lo).abs() > eps {
        let mid = midpoint(lo, hi);
        if mid == lo || mid == hi {
            break;
        }
        if inside(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Outcome of a golden-section search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenSection {
    /// Lower end of the final bracket.
    pub lo: f64,
    /// Upper end of the final bracket.
    pub hi: f64,
    /// Best abscissa evaluated.
    pub x: f64,
    /// Function value at `x`.
    pub y: f64,
}

/// Golden-section search for the extremum of a unimodal `f` on `[a, b]`.
///
/// Keeps two interior points at `1/φ²` and `1/φ` of the bracket and reuses
/// one of them each iteration. Stops once the bracket is narrower than
/// `eps` and returns the better of the two points.
///
/// Fails with [`MathError::NoConvergence`] if the bracket cannot be
/// shrunk below `eps` in a bounded number of steps (e.g. `eps` of zero).
pub fn golden_section_extremum<F>(
    mut f: F,
    a: f64,
    b: f64,
    want_min: bool,
    eps: f64,
) -> MathResult<GoldenSection>
where
    F: FnMut(f64) -> f64,
{
    let better = |u: f64, v: f64| if want_min { u < v } else { u > v };

    let (mut a, mut b) = if a <= b { (a, b) } else { (b, a) };
    let mut h = b - a;
    let mut c = a + INV_PHI2 * h;
    let mut d = a + INV_PHI * h;
    let mut yc = f(c);
    let mut yd = f(d);

    for _ in 0..GOLDEN_MAX_ITER {
        if h < eps {
            let (x, y) = if better(yc, yd) { (c, yc) } else { (d, yd) };
            return Ok(GoldenSection { lo: a, hi: b, x, y });
        }
        h *= INV_PHI;
        if better(yc, yd) {
            b = d;
            d = c;
            yd = yc;
            c = a + INV_PHI2 * h;
            yc = f(c);
        } else {
            a = c;
            c = d;
            yc = yd;
            d = a + INV_PHI * h;
            yd = f(d);
        }
    }

    Err(MathError::NoConvergence { lo: a, hi: b, eps })
}

/// Golden-section minimum of `f` on `[a, b]`.
#[inline]
pub fn golden_section_min<F>(f: F, a: f64, b: f64, eps: f64) -> MathResult<GoldenSection>
where
    F: FnMut(f64) -> f64,
{
    golden_section_extremum(f, a, b, true, eps)
}

/// Golden-section maximum of `f` on `[a, b]`.
#[inline]
pub fn golden_section_max<F>(f: F, a: f64, b: f64, eps: f64) -> MathResult<GoldenSection>
where
    F: FnMut(f64) -> f64,
{
    golden_section_extremum(f, a, b, false, eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bisect_upward() {
        let x = bisect_boundary(|x| x <= 1.0, -5.0, 5.0, 1e-5);
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_bisect_downward() {
        // Predicate holds at the upper end
        let x = bisect_boundary(|x| x >= 2.5, 10.0, 0.0, 1e-7);
        assert_abs_diff_eq!(x, 2.5, epsilon = 1e-7);
    }

    #[test]
    fn test_bisect_counts_evaluations() {
        let mut calls = 0;
        bisect_boundary(
            |x| {
                calls += 1;
                x < 0.3
            },
            0.0,
            1.0,
            1e-3,
        );
        // ceil(log2(1 / 1e-3)) = 10
        assert_eq!(calls, 10);
    }

    #[test]
    fn test_bisect_tiny_eps_terminates() {
        let x = bisect_boundary(|x| x < 0.1, 0.0, 1.0, 0.0);
        assert_abs_diff_eq!(x, 0.1, epsilon = 1e-15);
    }

    #[test]
    fn test_bisect_empty_bracket() {
        assert_eq!(bisect_boundary(|_| true, 3.0, 3.0, 1e-6), 3.0);
    }

    #[test]
    fn test_last_inside_never_overshoots() {
        // Transition at a point bisection never lands on exactly
        let edge = 0.123_456_789;
        for eps in [1e-1, 1e-3, 1e-6, 1e-12] {
            let x = bisect_last_inside(|x| x <= edge, 0.0, 1.0, eps);
            assert!(x <= edge);
            assert!(edge - x <= eps);
        }
    }

    #[test]
    fn test_last_inside_downward() {
        let x = bisect_last_inside(|x| x >= 2.5 + 1e-9, 10.0, 0.0, 1e-6);
        assert!(x >= 2.5 + 1e-9);
        assert_abs_diff_eq!(x, 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_last_inside_nothing_inside() {
        assert_eq!(bisect_last_inside(|_| false, 0.0, 1.0, 1e-6), 0.0);
    }

    #[test]
    fn test_golden_min() {
        let r = golden_section_min(|x| (x + 1.0).powi(2) + 2.0, -5.0, 5.0, 1e-5).unwrap();
        assert_abs_diff_eq!(r.x, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(r.y, 2.0, epsilon = 1e-9);
        assert!(r.hi - r.lo < 1e-5);
        assert!(r.lo <= r.x && r.x <= r.hi);
    }

    #[test]
    fn test_golden_max() {
        let r = golden_section_max(|x| 7.0 - (x - 1.0).powi(2), -5.0, 5.0, 1e-5).unwrap();
        assert_abs_diff_eq!(r.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(r.y, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_golden_reversed_bracket() {
        let r = golden_section_min(|x| (x - 2.0).abs(), 4.0, 0.0, 1e-6).unwrap();
        assert_abs_diff_eq!(r.x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_golden_edge_extremum() {
        // Monotone function: the extremum sits at the bracket edge
        let r = golden_section_max(|x| x, 0.0, 1.0, 1e-6).unwrap();
        assert_abs_diff_eq!(r.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_golden_no_convergence() {
        let err = golden_section_min(|x| x * x, -1.0, 1.0, 0.0).unwrap_err();
        assert!(matches!(err, MathError::NoConvergence { eps, .. } if eps == 0.0));
    }
}
