/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements hemisphere-grid synthesis and least-squares fitting of empirical photometric
// laws to a reference model.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Empirical-model fitting
//!
//! Synthesizes a grid of reference-model radiances over randomly tilted
//! facets around a mean ground-plane geometry, then finds the
//! limb-darkening parameter at which a linear least-squares fit of an
//! empirical law to the reference grid has minimum RMS error. The 1-D search
//! brackets the minimum by golden-ratio expansion and polishes it with
//! Brent's minimizer.

use itertools::iproduct;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use regolith_numerics::optimize::{bracket_minimum, BrentMinimizer};

use crate::error::{PhotomError, Result};
use crate::photometry::{LimbDarkeningLaw, PhotometricLaw, DEG2RAD};
use crate::progress::{ProgressMsg, ProgressSink};

/// Grid lines per hemisphere axis.
pub const GRID_LINES: usize = 51;
/// Grid samples; the synthesized grid is `GRID_SAMPLES x GRID_LINES`.
pub const GRID_SAMPLES: usize = GRID_LINES * 2 - 1;

/// Convergence tolerance for the limb-darkening search.
const FIT_TOLERANCE: f64 = 1.0e-6;

/// Mean ground-plane geometry and surface roughness for grid synthesis.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Datum {
    /// Phase angle, degrees.
    pub phase: f64,
    /// Mean incidence angle, degrees.
    pub incidence: f64,
    /// Mean emission angle, degrees.
    pub emission: f64,
    /// RMS slope of the facet tilt distribution, degrees.
    pub rms_slope: f64,
}

/// Reference radiances and per-facet photometric angles over the hemisphere
/// grid, stored row-major as `GRID_SAMPLES x GRID_LINES`.
#[derive(Debug, Clone)]
pub struct HemisphereGrid {
    reference: Vec<f64>,
    incidence: Vec<f64>,
    emission: Vec<f64>,
}

impl HemisphereGrid {
    /// Fills the grid with reference-model radiances at the datum phase and
    /// per-facet incidence/emission angles from Gaussian-tilted facets
    /// (Box-Muller deviates scaled by the RMS bidirectional slope). A fixed
    /// `seed` gives a reproducible grid.
    pub fn synthesize(
        law: &dyn PhotometricLaw,
        datum: &Datum,
        seed: Option<u64>,
    ) -> Result<Self> {
        if datum.phase > datum.incidence + datum.emission {
            return Err(PhotomError::parameter(
                "phase",
                format!(
                    "phase angle {} exceeds incidence {} plus emission {}; no valid fit points",
                    datum.phase, datum.incidence, datum.emission
                ),
            ));
        }

        let inc_x = (datum.incidence * DEG2RAD).sin();
        let inc_z = (datum.incidence * DEG2RAD).cos();
        let ema_z = (datum.emission * DEG2RAD).cos();
        let cos_p = (datum.phase * DEG2RAD).cos();

        // components of the emission direction in the datum frame
        let (ema_x, ema_y) = if datum.incidence == 0.0 || datum.emission == 0.0 {
            ((datum.emission * DEG2RAD).sin(), 0.0)
        } else {
            let ema_x = (cos_p - inc_z * ema_z) / inc_x;
            let ema_y = (datum.emission * DEG2RAD).sin();
            let azimuth = (ema_x / ema_y).clamp(-1.0, 1.0).acos();
            (ema_x, ema_y * azimuth.sin())
        };

        // RMS bidirectional slope of the tilt distribution
        let rms_bi = (datum.rms_slope * DEG2RAD).tan() / 2.0f64.sqrt();

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let cells = GRID_SAMPLES * GRID_LINES;
        let mut reference = Vec::with_capacity(cells);
        let mut incidence = Vec::with_capacity(cells);
        let mut emission = Vec::with_capacity(cells);

        for (_line, _sample) in iproduct!(0..GRID_LINES, 0..GRID_SAMPLES) {
            // Box-Muller polar form
            let (u1, u2, s) = loop {
                let u1 = 2.0 * rng.random::<f64>() - 1.0;
                let u2 = 2.0 * rng.random::<f64>() - 1.0;
                let s = u1 * u1 + u2 * u2;
                if s > 0.0 && s <= 1.0 {
                    break (u1, u2, s);
                }
            };
            let t = (-2.0 * s.ln() / s).sqrt();
            let dzdx = rms_bi * u1 * t;
            let dzdy = rms_bi * u2 * t;
            let den = (1.0 + dzdx * dzdx + dzdy * dzdy).sqrt();

            let munot = (inc_z - inc_x * dzdx) / den;
            let mu = (ema_z - ema_x * dzdx - ema_y * dzdy) / den;
            let inc = munot.clamp(-1.0, 1.0).acos() / DEG2RAD;
            let ema = mu.clamp(-1.0, 1.0).acos() / DEG2RAD;

            reference.push(law.surface_albedo(datum.phase, inc, ema)?);
            incidence.push(inc);
            emission.push(ema);
        }

        Ok(HemisphereGrid {
            reference,
            incidence,
            emission,
        })
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    pub fn incidence(&self) -> &[f64] {
        &self.incidence
    }

    pub fn emission(&self) -> &[f64] {
        &self.emission
    }
}

/// Coefficients and RMS error of one linear least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Additive term; zero for multiplier-only fits.
    pub offset: f64,
    /// Multiplicative term.
    pub multiplier: f64,
    /// RMS error of the fit.
    pub rms: f64,
}

/// Outcome of a least-squares accumulation over the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeastSquares {
    Fit(LinearFit),
    /// The accumulation hit a degenerate denominator; an expected condition
    /// when too few distinct points satisfy the geometric constraints.
    NoFitPossible,
}

/// One trial fit: accumulates least-squares sums of the empirical law's
/// values against the grid's reference radiances at the fixed phase angle,
/// then solves for the multiplier (and offset, if requested).
pub fn linear_fit(
    empirical: &dyn PhotometricLaw,
    grid: &HemisphereGrid,
    phase: f64,
    with_offset: bool,
) -> Result<LeastSquares> {
    let mut sum1 = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_yy = 0.0;

    for cell in 0..grid.len() {
        let x = empirical.surface_albedo(phase, grid.incidence[cell], grid.emission[cell])?;
        let y = grid.reference[cell];
        sum1 += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
        sum_yy += y * y;
    }

    let den = sum1 * sum_xx - sum_x * sum_x;
    if sum1 < 1.0 || sum_xx <= 0.0 || (with_offset && den == 0.0) {
        return Ok(LeastSquares::NoFitPossible);
    }

    let (offset, multiplier, arg) = if with_offset {
        let c0 = (sum_xx * sum_y - sum_x * sum_xy) / den;
        let c1 = (sum1 * sum_xy - sum_x * sum_y) / den;
        let arg = (sum_yy + 2.0 * (c0 * c1 * sum_x - c0 * sum_y - c1 * sum_xy)
            + c0 * c0 * sum1
            + c1 * c1 * sum_xx)
            / sum1;
        (c0, c1, arg)
    } else {
        let c1 = sum_xy / sum_xx;
        let arg = (sum_yy - 2.0 * c1 * sum_xy + c1 * c1 * sum_xx) / sum1;
        (0.0, c1, arg)
    };

    let rms = if arg > 0.0 { arg.sqrt() } else { 0.0 };
    Ok(LeastSquares::Fit(LinearFit {
        offset,
        multiplier,
        rms,
    }))
}

/// Outcome of a limb-darkening search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    Fitted {
        /// The best-fit limb-darkening parameter.
        parameter: f64,
        multiplier: f64,
        offset: f64,
        /// RMS error of the fit at the best parameter.
        rms: f64,
        /// Brent iterations spent polishing the minimum.
        iterations: usize,
    },
    NoFitPossible,
}

/// One fitting run: the empirical law under adjustment, the reference grid,
/// and the fixed phase angle of the comparison.
pub struct FitContext<'a> {
    empirical: &'a mut dyn LimbDarkeningLaw,
    grid: &'a HemisphereGrid,
    phase: f64,
    with_offset: bool,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> FitContext<'a> {
    pub fn new(
        empirical: &'a mut dyn LimbDarkeningLaw,
        grid: &'a HemisphereGrid,
        phase: f64,
        with_offset: bool,
    ) -> Self {
        FitContext {
            empirical,
            grid,
            phase,
            with_offset,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    /// RMS error of the linear fit at one trial parameter value; the
    /// objective of the limb-darkening search.
    pub fn rms_for(&mut self, parameter: f64) -> Result<f64> {
        self.empirical.set_limb_darkening(parameter)?;
        match linear_fit(&*self.empirical, self.grid, self.phase, self.with_offset)? {
            LeastSquares::Fit(fit) => {
                if let Some(sink) = self.progress {
                    sink.emit(ProgressMsg::FitTrial {
                        parameter,
                        rms: fit.rms,
                    });
                }
                Ok(fit.rms)
            }
            LeastSquares::NoFitPossible => Err(PhotomError::NoFitPossible),
        }
    }

    /// Minimizes [`rms_for`](Self::rms_for) over the limb-darkening
    /// parameter. `bracket` is the initial downhill pair handed to the
    /// golden-ratio expansion; (0, 1) suits laws whose parameter naturally
    /// lives in the unit interval.
    pub fn fit(&mut self, bracket: (f64, f64)) -> Result<FitOutcome> {
        match self.search(bracket) {
            Ok(outcome) => Ok(outcome),
            // degenerate accumulation anywhere in the search is the expected
            // "no fit" outcome, not a failure
            Err(PhotomError::NoFitPossible) => Ok(FitOutcome::NoFitPossible),
            Err(e) => Err(e),
        }
    }

    fn search(&mut self, bracket: (f64, f64)) -> Result<FitOutcome> {
        let mut objective = |par: f64| self.rms_for(par);
        let triple = bracket_minimum(bracket.0, bracket.1, &mut objective)?;
        let (lower, upper) = (triple.xa.min(triple.xc), triple.xa.max(triple.xc));
        let minimum = BrentMinimizer::new().minimize(
            lower,
            upper,
            triple.xb,
            FIT_TOLERANCE,
            &mut objective,
        )?;

        // final evaluation at the minimum refreshes the coefficients
        self.empirical.set_limb_darkening(minimum.x)?;
        match linear_fit(&*self.empirical, self.grid, self.phase, self.with_offset)? {
            LeastSquares::Fit(fit) => Ok(FitOutcome::Fitted {
                parameter: minimum.x,
                multiplier: fit.multiplier,
                offset: fit.offset,
                rms: fit.rms,
                iterations: minimum.iterations,
            }),
            LeastSquares::NoFitPossible => Ok(FitOutcome::NoFitPossible),
        }
    }
}

/// Finds the limb-darkening parameter of `empirical` minimizing the RMS
/// error of its linear fit to the grid's reference radiances.
pub fn fit_limb_darkening(
    empirical: &mut dyn LimbDarkeningLaw,
    grid: &HemisphereGrid,
    phase: f64,
    with_offset: bool,
    bracket: (f64, f64),
    progress: Option<&dyn ProgressSink>,
) -> Result<FitOutcome> {
    let mut context = FitContext::new(empirical, grid, phase, with_offset);
    if let Some(sink) = progress {
        context = context.with_progress(sink);
    }
    context.fit(bracket)
}

/// Whether an objective's endpoint values bracket a sign change; root-finding
/// callers run this test before handing an interval to
/// [`BrentSolver::solve`](regolith_numerics::optimize::BrentSolver::solve).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BracketSign {
    Bracketing,
    SameSign { f_lower: f64, f_upper: f64 },
}

pub fn check_bracket<F, E>(lower: f64, upper: f64, f: &mut F) -> std::result::Result<BracketSign, E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
{
    let f_lower = f(lower)?;
    let f_upper = f(upper)?;
    if (f_lower < 0.0 && f_upper > 0.0) || (f_lower > 0.0 && f_upper < 0.0) {
        Ok(BracketSign::Bracketing)
    } else {
        Ok(BracketSign::SameSign { f_lower, f_upper })
    }
}
