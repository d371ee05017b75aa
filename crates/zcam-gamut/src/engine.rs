//! Gamut queries over a [`GamutOracle`].

use tracing::trace;
use zcam_cache::{DEFAULT_SIZE, Float64Table, BYTES_PER_SLOT};
use zcam_color::{Jch, ViewingConditions};
use zcam_math::bisect_last_inside;

use crate::build::{BuildState, direct_cusp};
use crate::{BuildProgress, BuildStatus, CuspPoint, GamutBoundary, GamutConfig, GamutOracle, GamutResult};

/// Cache key of a (hue, lightness) bucket.
///
/// The upper 16 bits quantize the hue over `[0, 360)`, the lower 16 bits
/// the lightness over `[0, 100]`.
pub fn chroma_cache_key(hue: f64, lightness: f64) -> u32 {
    let h = (hue.rem_euclid(360.0) / 360.0 * 65536.0) as u32 & 0xffff;
    let l = (lightness.clamp(0.0, 100.0) / 100.0 * 65535.0).round() as u32;
    (h << 16) | l
}

/// sRGB gamut boundary queries in (hue, lightness, chroma).
///
/// Every query works right away by searching the model directly. After
/// [`build_boundary`](Self::build_boundary) the cusp comes from fitted
/// splines and chroma searches get a tight bracket.
///
/// # Example
///
/// ```rust,no_run
/// use zcam_color::{Jch, ViewingConditions};
/// use zcam_gamut::GamutEngine;
///
/// let mut engine = GamutEngine::new(ViewingConditions::default());
/// engine.build_boundary().unwrap();
///
/// let cusp = engine.find_cusp(259.0).unwrap();
/// let vivid = Jch::new(259.0, 60.0, 80.0);
/// let clamped = engine.clamp_to_gamut(vivid, 1e-3).unwrap();
/// assert!(clamped.chroma < cusp.chroma);
/// ```
#[derive(Debug)]
pub struct GamutEngine<O = ViewingConditions> {
    oracle: O,
    config: GamutConfig,
    build: Option<BuildState>,
    boundary: Option<GamutBoundary>,
    cache: Option<Float64Table>,
}

impl<O: GamutOracle> GamutEngine<O> {
    /// Creates an engine with the default configuration.
    pub fn new(oracle: O) -> Self {
        Self::from_parts(oracle, GamutConfig::default())
    }

    /// Creates an engine after validating `config`.
    pub fn with_config(oracle: O, config: GamutConfig) -> GamutResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(oracle, config))
    }

    fn from_parts(oracle: O, config: GamutConfig) -> Self {
        let cache = (config.cache_budget > 0)
            .then(|| Float64Table::with_seed(DEFAULT_SIZE, config.cache_budget / BYTES_PER_SLOT, config.hash_seed));
        Self { oracle, config, build: None, boundary: None, cache }
    }

    /// The color model.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The configuration.
    pub fn config(&self) -> &GamutConfig {
        &self.config
    }

    /// The fitted boundary, once built.
    pub fn boundary(&self) -> Option<&GamutBoundary> {
        self.boundary.as_ref()
    }

    /// True once the boundary is built.
    pub fn is_built(&self) -> bool {
        self.boundary.is_some()
    }

    /// The max-chroma cache, unless disabled.
    pub fn cache(&self) -> Option<&Float64Table> {
        self.cache.as_ref()
    }

    // ------------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------------

    /// Runs one bounded unit of the boundary build.
    ///
    /// Returns [`BuildStatus::Complete`] once the boundary exists, including
    /// on every call after that.
    pub fn build_step(&mut self) -> GamutResult<BuildStatus> {
        if self.boundary.is_some() {
            return Ok(BuildStatus::Complete);
        }
        let state = self.build.get_or_insert_with(BuildState::new);
        match state.step(&self.oracle, &self.config)? {
            Some(boundary) => {
                self.boundary = Some(boundary);
                self.build = None;
                Ok(BuildStatus::Complete)
            }
            None => Ok(BuildStatus::InProgress(state.progress(&self.config))),
        }
    }

    /// Builds the boundary, calling `on_yield` between units of work.
    pub fn build_boundary_with<F>(&mut self, mut on_yield: F) -> GamutResult<()>
    where
        F: FnMut(BuildProgress),
    {
        loop {
            match self.build_step()? {
                BuildStatus::InProgress(progress) => on_yield(progress),
                BuildStatus::Complete => return Ok(()),
            }
        }
    }

    /// Builds the boundary to completion. No-op when already built.
    pub fn build_boundary(&mut self) -> GamutResult<()> {
        self.build_boundary_with(|_| {})
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    fn inside(&self, hue: f64, lightness: f64, chroma: f64) -> bool {
        self.oracle.linear_rgb(Jch::new(hue, lightness, chroma)).in_unit_cube()
    }

    /// True if `jch` rounds to a valid 8-bit sRGB color.
    pub fn contains(&self, jch: Jch) -> bool {
        self.oracle.linear_rgb(jch).in_unit_cube_8bit()
    }

    /// Cusp of `hue`, from the splines when built, else searched directly.
    pub fn find_cusp(&self, hue: f64) -> GamutResult<CuspPoint> {
        match &self.boundary {
            Some(boundary) => Ok(boundary.cusp(hue)),
            None => direct_cusp(&self.oracle, &self.config, hue),
        }
    }

    /// Previously found maximum chroma of the (hue, lightness) bucket.
    pub fn cached_max_chroma(&self, hue: f64, lightness: f64) -> Option<f64> {
        self.cache.as_ref()?.get(chroma_cache_key(hue, lightness))
    }

    fn remember(&mut self, hue: f64, lightness: f64, chroma: f64) {
        if let Some(cache) = self.cache.as_mut() {
            cache.set(chroma_cache_key(hue, lightness), chroma);
        }
    }

    /// Largest displayable chroma at `hue` and `lightness`, to `eps`.
    ///
    /// Zero outside `(0, 100)`. The result is always displayable and lies
    /// within `eps` below the boundary.
    ///
    /// Results are cached per (hue, lightness) bucket, see
    /// [`chroma_cache_key`]. With the cache enabled every search runs to at
    /// least [`GamutConfig::cusp_eps`], so a cached value serves any query
    /// with `eps >= cusp_eps`. Tighter queries bypass the lookup.
    pub fn maximize_chroma(&mut self, hue: f64, lightness: f64, eps: f64) -> GamutResult<f64> {
        if !(lightness > 0.0 && lightness < 100.0) {
            return Ok(0.0);
        }
        let tol = match self.cache {
            Some(_) => eps.min(self.config.cusp_eps),
            None => eps,
        };
        if eps >= self.config.cusp_eps {
            if let Some(chroma) = self.cached_max_chroma(hue, lightness) {
                trace!(hue, lightness, chroma, "Max chroma cache hit");
                return Ok(chroma);
            }
        }
        let ceiling = match self.boundary.as_ref().map(|b| b.cusp(hue).chroma + self.config.cusp_slack) {
            Some(ceiling) if !self.inside(hue, lightness, ceiling) => ceiling,
            _ => self.config.chroma_ceiling,
        };
        let chroma = bisect_last_inside(|c| self.inside(hue, lightness, c), 0.0, ceiling, tol);
        self.remember(hue, lightness, chroma);
        Ok(chroma)
    }

    /// Saturation of the most chromatic displayable color at `hue` and
    /// `lightness`. Chroma is searched to `eps / 2`.
    pub fn maximize_saturation(&mut self, hue: f64, lightness: f64, eps: f64) -> GamutResult<f64> {
        let chroma = self.maximize_chroma(hue, lightness, 0.5 * eps)?;
        Ok(self.oracle.saturation(lightness, chroma))
    }

    /// Highest lightness at which `hue` and `chroma` are displayable.
    ///
    /// 100 for (near) zero chroma. A chroma beyond the cusp is displayable
    /// at no lightness; the cusp lightness is returned. Otherwise the result
    /// is displayable and within `eps` of the boundary.
    pub fn maximize_lightness(&self, hue: f64, chroma: f64, eps: f64) -> GamutResult<f64> {
        self.lightness_limit(hue, chroma, eps, 100.0)
    }

    /// Lowest lightness at which `hue` and `chroma` are displayable.
    ///
    /// 0 for (near) zero chroma. A chroma beyond the cusp is displayable
    /// at no lightness; the cusp lightness is returned.
    pub fn minimize_lightness(&self, hue: f64, chroma: f64, eps: f64) -> GamutResult<f64> {
        self.lightness_limit(hue, chroma, eps, 0.0)
    }

    fn lightness_limit(&self, hue: f64, chroma: f64, eps: f64, toward: f64) -> GamutResult<f64> {
        if chroma <= eps {
            return Ok(toward);
        }
        let cusp = self.find_cusp(hue)?;
        // The fitted cusp can sit a hair off the true one
        if chroma > cusp.chroma || !self.inside(hue, cusp.lightness, chroma) {
            return Ok(cusp.lightness);
        }
        Ok(bisect_last_inside(|l| self.inside(hue, l, chroma), cusp.lightness, toward, eps))
    }

    /// Moves `jch` into the gamut by reducing chroma at constant hue and
    /// lightness.
    ///
    /// Near-black and near-white lightness snap to black and white, chroma
    /// within `eps` of zero snaps to zero.
    pub fn clamp_to_gamut(&mut self, jch: Jch, eps: f64) -> GamutResult<Jch> {
        if jch.lightness <= self.config.black_lightness {
            return Ok(Jch::new(jch.hue, 0.0, 0.0));
        }
        if jch.lightness >= self.config.white_lightness {
            return Ok(Jch::new(jch.hue, 100.0, 0.0));
        }
        if jch.chroma <= eps {
            return Ok(Jch { chroma: 0.0, ..jch });
        }
        let max = self.maximize_chroma(jch.hue, jch.lightness, eps)?;
        Ok(Jch { chroma: jch.chroma.min(max), ..jch })
    }
}
