//! Tunables for the boundary build and queries.

use zcam_cache::HashSeed;

use crate::{GamutError, GamutResult};

/// Rough hues of the cusp-lightness extrema of sRGB in ZCAM: R, Y, G, C,
/// B, M and R again one turn later. Even indices are minima.
pub const EXTREMA_GUESSES: [f64; 7] = [42.0, 102.0, 133.0, 204.0, 258.0, 321.0, 402.0];

/// Gamut engine configuration.
///
/// # Example
///
/// ```rust
/// use zcam_gamut::GamutConfig;
///
/// let config = GamutConfig::default()
///     .with_cusp_eps(1e-4)
///     .with_cache_budget(0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GamutConfig {
    /// Tolerance of the per-hue cusp search, in lightness and chroma.
    /// With the cache enabled, max-chroma searches run at least this tight.
    pub cusp_eps: f64,
    /// Upper chroma bracket when nothing better is known.
    pub chroma_ceiling: f64,
    /// Initial hue guesses for the extrema, see [`EXTREMA_GUESSES`].
    pub extrema_guesses: [f64; 7],
    /// Half width of the window searched around each guess, degrees.
    pub extrema_window: f64,
    /// Hue tolerance of the extremum search, degrees.
    pub extrema_eps: f64,
    /// Spacing of the regular hue samples, degrees.
    pub sample_step: f64,
    /// Cusp samples computed per build step.
    pub sample_batch: usize,
    /// Target residual of the boundary splines.
    pub spline_eps: f64,
    /// Knot budget per spline segment.
    pub spline_points: usize,
    /// Chroma added to the spline cusp when bracketing a chroma search,
    /// covering the spline residual.
    pub cusp_slack: f64,
    /// Lightness at or below which clamping yields black.
    pub black_lightness: f64,
    /// Lightness at or above which clamping yields white.
    pub white_lightness: f64,
    /// Memory for the max-chroma cache, bytes. Zero disables it.
    pub cache_budget: usize,
    /// Hash seed of the max-chroma cache.
    pub hash_seed: HashSeed,
}

impl Default for GamutConfig {
    fn default() -> Self {
        Self {
            cusp_eps: 1e-5,
            chroma_ceiling: 101.0,
            extrema_guesses: EXTREMA_GUESSES,
            extrema_window: 22.0,
            extrema_eps: 1e-7,
            sample_step: 0.5,
            sample_batch: 32,
            spline_eps: 1e-3,
            spline_points: 37,
            cusp_slack: 0.05,
            black_lightness: 1e-3,
            white_lightness: 100.0 - 1e-3,
            cache_budget: 4 << 20,
            hash_seed: HashSeed::runtime(),
        }
    }
}

impl GamutConfig {
    /// Sets the cusp search tolerance.
    pub fn with_cusp_eps(mut self, eps: f64) -> Self {
        self.cusp_eps = eps;
        self
    }

    /// Sets the fallback chroma bracket.
    pub fn with_chroma_ceiling(mut self, ceiling: f64) -> Self {
        self.chroma_ceiling = ceiling;
        self
    }

    /// Sets the extremum hue guesses.
    pub fn with_extrema_guesses(mut self, guesses: [f64; 7]) -> Self {
        self.extrema_guesses = guesses;
        self
    }

    /// Sets the regular sample spacing.
    pub fn with_sample_step(mut self, step: f64) -> Self {
        self.sample_step = step;
        self
    }

    /// Sets the number of cusp samples per build step.
    pub fn with_sample_batch(mut self, batch: usize) -> Self {
        self.sample_batch = batch;
        self
    }

    /// Sets spline residual target and knot budget.
    pub fn with_spline(mut self, eps: f64, points: usize) -> Self {
        self.spline_eps = eps;
        self.spline_points = points;
        self
    }

    /// Sets the black and white clamping thresholds.
    pub fn with_lightness_thresholds(mut self, black: f64, white: f64) -> Self {
        self.black_lightness = black;
        self.white_lightness = white;
        self
    }

    /// Sets the cache memory budget in bytes.
    pub fn with_cache_budget(mut self, bytes: usize) -> Self {
        self.cache_budget = bytes;
        self
    }

    /// Uses a fixed cache hash seed.
    pub fn with_hash_seed(mut self, seed: HashSeed) -> Self {
        self.hash_seed = seed;
        self
    }

    /// Checks that every tolerance is positive and the ranges are ordered.
    pub fn validate(&self) -> GamutResult<()> {
        let positive = [
            ("cusp_eps", self.cusp_eps),
            ("chroma_ceiling", self.chroma_ceiling),
            ("extrema_window", self.extrema_window),
            ("extrema_eps", self.extrema_eps),
            ("sample_step", self.sample_step),
            ("spline_eps", self.spline_eps),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GamutError::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.cusp_slack.is_finite() && self.cusp_slack >= 0.0) {
            return Err(GamutError::InvalidConfig(format!(
                "cusp_slack must be non-negative, got {}",
                self.cusp_slack
            )));
        }
        if self.sample_batch == 0 {
            return Err(GamutError::InvalidConfig("sample_batch must be at least 1".into()));
        }
        if self.spline_points < 2 {
            return Err(GamutError::InvalidConfig(format!(
                "spline_points must be at least 2, got {}",
                self.spline_points
            )));
        }
        if !self.extrema_guesses.windows(2).all(|w| w[0] < w[1]) {
            return Err(GamutError::InvalidConfig("extrema_guesses must increase".into()));
        }
        if !(0.0 <= self.black_lightness && self.black_lightness < self.white_lightness && self.white_lightness <= 100.0)
        {
            return Err(GamutError::InvalidConfig(format!(
                "lightness thresholds must satisfy 0 <= black < white <= 100, got {} and {}",
                self.black_lightness, self.white_lightness
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GamutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            GamutConfig::default().with_cusp_eps(0.0),
            GamutConfig::default().with_cusp_eps(f64::NAN),
            GamutConfig::default().with_sample_batch(0),
            GamutConfig::default().with_spline(1e-3, 1),
            GamutConfig::default().with_lightness_thresholds(50.0, 40.0),
            GamutConfig::default().with_extrema_guesses([0.0, 1.0, 2.0, 3.0, 4.0, 6.0, 5.0]),
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(GamutError::InvalidConfig(_))), "{config:?}");
        }
    }
}
