//! Resumable boundary build.
//!
//! The build runs hundreds of thousands of model evaluations, so it is cut
//! into bounded units: one extremum search, one batch of cusp samples, one
//! spline segment. [`GamutEngine::build_step`](crate::GamutEngine::build_step)
//! performs one unit and reports where it stands; the caller decides what
//! to do between units.

use tracing::{debug, info};
use zcam_color::Jch;
use zcam_math::{SegmentedSpline, SplineFit, bisect_boundary, fit_segment, golden_section_extremum, golden_section_max};

use crate::{CuspPoint, GamutBoundary, GamutConfig, GamutError, GamutOracle, GamutResult};

/// Build phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildPhase {
    /// Refining the seven hue extrema of the cusp lightness.
    Extrema,
    /// Searching cusps at the sample hues.
    Sampling,
    /// Fitting the cusp lightness spline, one segment per step.
    FitLightness,
    /// Fitting the cusp chroma spline, one segment per step.
    FitChroma,
    /// Assembling the boundary.
    Finish,
}

/// Position of an unfinished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildProgress {
    /// Phase the next step will work on.
    pub phase: BuildPhase,
    /// Units of this phase already done.
    pub completed: usize,
    /// Units in this phase.
    pub total: usize,
}

/// Outcome of one build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// More steps are needed.
    InProgress(BuildProgress),
    /// The boundary is available.
    Complete,
}

/// Cusp found by searching the model directly.
///
/// Golden-section maximum over lightness `[0, 100]` of the largest chroma
/// whose RGB rounds into the 8-bit cube, both to `config.cusp_eps`.
pub fn direct_cusp<O: GamutOracle>(oracle: &O, config: &GamutConfig, hue: f64) -> GamutResult<CuspPoint> {
    let max_chroma = |lightness: f64| {
        bisect_boundary(
            |chroma| oracle.linear_rgb(Jch::new(hue, lightness, chroma)).in_unit_cube_8bit(),
            0.0,
            config.chroma_ceiling,
            config.cusp_eps,
        )
    };
    let peak = golden_section_max(max_chroma, 0.0, 100.0, config.cusp_eps)?;
    Ok(CuspPoint { hue: hue.rem_euclid(360.0), lightness: peak.x, chroma: peak.y })
}

/// Sample hues over `[extrema[0], extrema[6]]`.
///
/// A regular grid at `step`, the extrema themselves, and pairs at
/// `extremum ± d` for `d` doubling from `100 * cusp_eps` up to `step`.
/// The offsets stay well clear of the cusp search tolerance.
pub fn sample_hues(extrema: &[f64; 7], step: f64, cusp_eps: f64) -> Vec<f64> {
    let (first, last) = (extrema[0], extrema[6]);
    let mut hues = extrema.to_vec();
    for &x in extrema {
        let mut d = 100.0 * cusp_eps;
        while d < step {
            hues.extend([x - d, x + d]);
            d *= 2.0;
        }
    }
    let mut k = (first / step).ceil();
    while k * step <= last {
        hues.push(k * step);
        k += 1.0;
    }
    hues.retain(|h| (first..=last).contains(h));
    hues.sort_by(f64::total_cmp);
    hues.dedup();
    hues
}

/// In-flight build data.
#[derive(Debug, Clone)]
pub(crate) struct BuildState {
    phase: BuildPhase,
    cursor: usize,
    extrema: Vec<f64>,
    hues: Vec<f64>,
    lightness: Vec<f64>,
    chroma: Vec<f64>,
    lightness_spline: SegmentedSpline,
    chroma_spline: SegmentedSpline,
}

impl BuildState {
    pub(crate) fn new() -> Self {
        Self {
            phase: BuildPhase::Extrema,
            cursor: 0,
            extrema: Vec::with_capacity(7),
            hues: Vec::new(),
            lightness: Vec::new(),
            chroma: Vec::new(),
            lightness_spline: SegmentedSpline::new(),
            chroma_spline: SegmentedSpline::new(),
        }
    }

    /// Where the next step starts.
    pub(crate) fn progress(&self, config: &GamutConfig) -> BuildProgress {
        let (completed, total) = match self.phase {
            BuildPhase::Extrema => (self.cursor, config.extrema_guesses.len()),
            BuildPhase::Sampling => (self.cursor, self.hues.len()),
            BuildPhase::FitLightness | BuildPhase::FitChroma => (self.cursor, self.extrema.len() - 1),
            BuildPhase::Finish => (0, 1),
        };
        BuildProgress { phase: self.phase, completed, total }
    }

    /// Performs one unit of work. Returns the boundary after the last one.
    pub(crate) fn step<O: GamutOracle>(
        &mut self,
        oracle: &O,
        config: &GamutConfig,
    ) -> GamutResult<Option<GamutBoundary>> {
        match self.phase {
            BuildPhase::Extrema => self.refine_extremum(oracle, config)?,
            BuildPhase::Sampling => self.sample_batch(oracle, config)?,
            BuildPhase::FitLightness => self.fit_lightness(config)?,
            BuildPhase::FitChroma => self.fit_chroma(config)?,
            BuildPhase::Finish => return self.finish().map(Some),
        }
        Ok(None)
    }

    fn refine_extremum<O: GamutOracle>(&mut self, oracle: &O, config: &GamutConfig) -> GamutResult<()> {
        let i = self.cursor;
        let guess = config.extrema_guesses[i];
        let mut failure = None;
        let cusp_lightness = |hue: f64| match direct_cusp(oracle, config, hue) {
            Ok(cusp) => cusp.lightness,
            Err(e) => {
                failure.get_or_insert(e);
                f64::NAN
            }
        };
        let found = golden_section_extremum(
            cusp_lightness,
            guess - config.extrema_window,
            guess + config.extrema_window,
            i % 2 == 0,
            config.extrema_eps,
        );
        if let Some(e) = failure {
            return Err(e);
        }
        let found = found?;
        debug!(index = i, guess, hue = found.x, lightness = found.y, "Refined hue extremum");
        self.extrema.push(found.x);
        self.cursor += 1;

        if self.cursor == config.extrema_guesses.len() {
            let extrema = self.extrema_array()?;
            self.hues = sample_hues(&extrema, config.sample_step, config.cusp_eps);
            self.lightness.reserve(self.hues.len());
            self.chroma.reserve(self.hues.len());
            info!(extrema = ?self.extrema, samples = self.hues.len(), "Found hue extrema");
            self.advance(BuildPhase::Sampling);
        }
        Ok(())
    }

    fn sample_batch<O: GamutOracle>(&mut self, oracle: &O, config: &GamutConfig) -> GamutResult<()> {
        let end = (self.cursor + config.sample_batch).min(self.hues.len());
        for &hue in &self.hues[self.cursor..end] {
            let cusp = direct_cusp(oracle, config, hue)?;
            self.lightness.push(cusp.lightness);
            self.chroma.push(cusp.chroma);
        }
        self.cursor = end;
        if self.cursor == self.hues.len() {
            debug!(samples = self.hues.len(), "Sampled cusps");
            self.advance(BuildPhase::FitLightness);
        }
        Ok(())
    }

    fn fit_lightness(&mut self, config: &GamutConfig) -> GamutResult<()> {
        let fit = self.fit(&self.lightness, config)?;
        debug!(segment = self.cursor, knots = fit.spline.len(), max_error = fit.max_error, "Fitted lightness segment");
        self.lightness_spline.push(fit.spline);
        self.cursor += 1;
        if self.cursor == self.extrema.len() - 1 {
            self.advance(BuildPhase::FitChroma);
        }
        Ok(())
    }

    fn fit_chroma(&mut self, config: &GamutConfig) -> GamutResult<()> {
        let fit = self.fit(&self.chroma, config)?;
        debug!(segment = self.cursor, knots = fit.spline.len(), max_error = fit.max_error, "Fitted chroma segment");
        self.chroma_spline.push(fit.spline);
        self.cursor += 1;
        if self.cursor == self.extrema.len() - 1 {
            self.advance(BuildPhase::Finish);
        }
        Ok(())
    }

    fn fit(&self, values: &[f64], config: &GamutConfig) -> GamutResult<SplineFit> {
        let j = self.cursor;
        Ok(fit_segment(
            &self.hues,
            values,
            self.extrema[j],
            self.extrema[j + 1],
            config.spline_eps,
            config.spline_points,
            &self.extrema,
        )?)
    }

    fn finish(&mut self) -> GamutResult<GamutBoundary> {
        let extrema = self.extrema_array()?;
        let boundary = GamutBoundary::new(
            extrema,
            std::mem::take(&mut self.hues),
            std::mem::take(&mut self.lightness),
            std::mem::take(&mut self.chroma),
            std::mem::take(&mut self.lightness_spline),
            std::mem::take(&mut self.chroma_spline),
        );
        info!(
            lightness_knots = boundary.lightness_spline().knot_count(),
            chroma_knots = boundary.chroma_spline().knot_count(),
            min_chroma = boundary.min_chroma(),
            max_chroma = boundary.max_chroma(),
            "Gamut boundary ready"
        );
        Ok(boundary)
    }

    fn extrema_array(&self) -> GamutResult<[f64; 7]> {
        let extrema: [f64; 7] = self
            .extrema
            .as_slice()
            .try_into()
            .map_err(|_| GamutError::InvalidConfig(format!("expected 7 hue extrema, found {}", self.extrema.len())))?;
        if !extrema.windows(2).all(|w| w[0] < w[1]) {
            return Err(GamutError::InvalidConfig(format!(
                "hue extrema are not increasing: {extrema:?}; the guesses do not fit this gamut"
            )));
        }
        Ok(extrema)
    }

    fn advance(&mut self, phase: BuildPhase) {
        self.phase = phase;
        self.cursor = 0;
    }
}
