/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the multi-scheme 1-D interpolator over tabulated (x, y) data.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Tabulated-data interpolation
//!
//! [`Interpolator`] owns an ordered, unique-x data set and a selected
//! [`InterpScheme`]. It evaluates interpolated (and, for the schemes that
//! support it, extrapolated) values, finite-difference derivatives, and
//! definite integrals of the approximated function.
//!
//! Derived coefficients (spline second derivatives, divided differences,
//! Akima tangents) are computed lazily on the first evaluation after a data
//! or scheme change and cached until the next mutation, so repeated
//! evaluations at the same abscissa are bitwise identical.
//!
//! # References
//! 1. Press et al. Numerical Recipes in C, 2nd ed., sections 3.1-3.3, 4.2-4.3.
//! 2. Akima. A New Method of Interpolation and Smooth Curve Fitting Based on
//!    Local Procedures, 1970.

mod akima;
mod cubic;
mod finite_diff;
mod hermite;
mod integrate;
pub(crate) mod polynomial;

use crate::error::{NumericsError, Result};
use serde::{Deserialize, Serialize};

/// Natural-boundary sentinel: a clamped endpoint derivative at or above this
/// magnitude selects a natural (zero second derivative) boundary instead.
pub(crate) const NATURAL_BOUNDARY: f64 = 0.99e30;

/// The supported interpolation schemes.
///
/// Each scheme implies a minimum number of data points (see
/// [`InterpScheme::min_points`]) which is enforced when the data set is
/// validated on first evaluation, not when the scheme is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpScheme {
    /// Piecewise-linear segments between adjacent points.
    Linear,
    /// Single interpolating polynomial through every point (Newton form).
    Polynomial,
    /// Polynomial interpolation by Neville's algorithm, with per-evaluation
    /// error estimates. Tolerates unsorted data and supports extrapolation.
    PolynomialNeville,
    /// Cubic spline, zero second derivative at both ends.
    CubicNatural,
    /// Cubic spline with caller-supplied first derivatives at both ends.
    CubicClamped,
    /// Cubic spline with wrap-around boundary conditions. The first and last
    /// y values must be equal.
    CubicNatPeriodic,
    /// Local natural cubic through the four points straddling the query,
    /// re-solved on every evaluation. Refuses extrapolation.
    CubicNeighborhood,
    /// Piecewise cubic Hermite using caller-supplied first derivatives at
    /// every data point.
    CubicHermite,
    /// Non-rounded Akima spline, natural boundary handling.
    Akima,
    /// Non-rounded Akima spline with wrap-around slopes.
    AkimaPeriodic,
}

impl InterpScheme {
    /// Minimum number of data points the scheme needs before evaluation.
    pub fn min_points(self) -> usize {
        match self {
            InterpScheme::Linear => 2,
            InterpScheme::Polynomial => 3,
            InterpScheme::PolynomialNeville => 3,
            InterpScheme::CubicNatural => 3,
            InterpScheme::CubicClamped => 3,
            InterpScheme::CubicNatPeriodic => 2,
            InterpScheme::CubicNeighborhood => 4,
            InterpScheme::CubicHermite => 2,
            InterpScheme::Akima => 5,
            InterpScheme::AkimaPeriodic => 5,
        }
    }

    /// Human-readable scheme name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            InterpScheme::Linear => "linear",
            InterpScheme::Polynomial => "polynomial",
            InterpScheme::PolynomialNeville => "polynomial-Neville",
            InterpScheme::CubicNatural => "cubic-natural",
            InterpScheme::CubicClamped => "cubic-clamped",
            InterpScheme::CubicNatPeriodic => "cubic-periodic",
            InterpScheme::CubicNeighborhood => "cubic-neighborhood",
            InterpScheme::CubicHermite => "cubic-Hermite",
            InterpScheme::Akima => "Akima",
            InterpScheme::AkimaPeriodic => "Akima-periodic",
        }
    }

    /// Whether evaluation outside the data domain is numerically meaningful.
    fn can_extrapolate(self) -> bool {
        matches!(
            self,
            InterpScheme::CubicClamped
                | InterpScheme::PolynomialNeville
                | InterpScheme::CubicHermite
        )
    }
}

/// Policy applied when an evaluation abscissa falls outside the data domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extrapolation {
    /// Report [`NumericsError::OutOfDomain`].
    Error,
    /// Evaluate the scheme's functional form outside the domain. Only
    /// meaningful for [`InterpScheme::CubicClamped`] and
    /// [`InterpScheme::PolynomialNeville`]; every other scheme silently
    /// degrades to endpoint clamping, except
    /// [`InterpScheme::CubicNeighborhood`] which refuses with an error.
    Extrapolate,
    /// Clamp the abscissa to the nearest domain endpoint.
    NearestEndpoint,
}

/// Cached, derived coefficients for the current scheme and data set.
#[derive(Debug, Clone)]
enum SplineState {
    /// Second derivatives at the knots (the cubic spline family).
    SecondDerivs(Vec<f64>),
    /// Newton divided-difference coefficients (Polynomial).
    Newton(Vec<f64>),
    /// Knot tangents (Akima family).
    Tangents(Vec<f64>),
}

/// Multi-scheme interpolator over a tabulated (x, y) data set.
#[derive(Debug, Clone)]
pub struct Interpolator {
    scheme: InterpScheme,
    x: Vec<f64>,
    y: Vec<f64>,
    validated: bool,
    state: Option<SplineState>,
    clamped_first: f64,
    clamped_last: f64,
    clamped_set: bool,
    hermite_derivs: Vec<f64>,
    neville_errors: Vec<f64>,
}

impl Interpolator {
    /// Creates an empty interpolator using the given scheme.
    pub fn new(scheme: InterpScheme) -> Self {
        Interpolator {
            scheme,
            x: Vec::new(),
            y: Vec::new(),
            validated: false,
            state: None,
            clamped_first: 0.0,
            clamped_last: 0.0,
            clamped_set: false,
            hermite_derivs: Vec::new(),
            neville_errors: Vec::new(),
        }
    }

    /// Creates an interpolator pre-loaded with data.
    pub fn with_data(scheme: InterpScheme, x: &[f64], y: &[f64]) -> Result<Self> {
        let mut interp = Interpolator::new(scheme);
        interp.add_points(x, y)?;
        Ok(interp)
    }

    /// The currently selected scheme.
    pub fn scheme(&self) -> InterpScheme {
        self.scheme
    }

    /// Number of data points currently held.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when no data has been added yet.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Minimum point count for the current scheme.
    pub fn min_points(&self) -> usize {
        self.scheme.min_points()
    }

    /// Appends a single point. Invalidates any cached spline state and any
    /// previously supplied auxiliary derivative data.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
        self.invalidate();
    }

    /// Appends a batch of points. The two slices must have equal length.
    pub fn add_points(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(NumericsError::invalid(format!(
                "x and y lengths differ: {} vs {}",
                x.len(),
                y.len()
            )));
        }
        self.x.extend_from_slice(x);
        self.y.extend_from_slice(y);
        self.invalidate();
        Ok(())
    }

    /// Switches scheme, keeping the data. Cached coefficients are discarded;
    /// the point-count requirement of the new scheme is checked on the next
    /// evaluation, not here.
    pub fn set_scheme(&mut self, scheme: InterpScheme) {
        self.scheme = scheme;
        self.invalidate();
    }

    /// Clears all data and cached state, keeping the scheme.
    pub fn reset(&mut self) {
        self.x.clear();
        self.y.clear();
        self.invalidate();
    }

    /// Clears all data and switches scheme.
    pub fn reset_with(&mut self, scheme: InterpScheme) {
        self.reset();
        self.scheme = scheme;
    }

    /// Supplies the endpoint first derivatives required by
    /// [`InterpScheme::CubicClamped`]. A magnitude of 1e30 or more at either
    /// end selects a natural boundary there instead. Must be called after the
    /// data has been added; adding more points clears the setting.
    pub fn set_clamped_endpoint_derivs(&mut self, yp_first: f64, yp_last: f64) -> Result<()> {
        if self.scheme != InterpScheme::CubicClamped {
            return Err(NumericsError::invalid(format!(
                "endpoint derivatives only apply to cubic-clamped, not {} interpolation",
                self.scheme.name()
            )));
        }
        if self.x.is_empty() {
            return Err(NumericsError::invalid(
                "endpoint derivatives must be set after data has been added",
            ));
        }
        self.clamped_first = yp_first;
        self.clamped_last = yp_last;
        self.clamped_set = true;
        self.state = None;
        Ok(())
    }

    /// Supplies the per-point first derivatives required by
    /// [`InterpScheme::CubicHermite`]. May be called repeatedly to append.
    pub fn add_hermite_derivs(&mut self, fprime: &[f64]) -> Result<()> {
        if self.scheme != InterpScheme::CubicHermite {
            return Err(NumericsError::invalid(format!(
                "point derivatives only apply to cubic-Hermite, not {} interpolation",
                self.scheme.name()
            )));
        }
        self.hermite_derivs.extend_from_slice(fprime);
        Ok(())
    }

    /// The second derivatives of the clamped cubic spline at every knot,
    /// computing them first if needed.
    pub fn clamped_second_derivatives(&mut self) -> Result<Vec<f64>> {
        if self.scheme != InterpScheme::CubicClamped {
            return Err(NumericsError::invalid(format!(
                "second derivative table only exists for cubic-clamped, not {} interpolation",
                self.scheme.name()
            )));
        }
        self.ensure_ready()?;
        match &self.state {
            Some(SplineState::SecondDerivs(d)) => Ok(d.clone()),
            _ => unreachable!("clamped spline state computed by ensure_ready"),
        }
    }

    /// Error estimates from the most recent Neville evaluation, one entry per
    /// evaluated abscissa since the last call to [`Interpolator::evaluate`]
    /// or [`Interpolator::evaluate_many`].
    pub fn neville_error_estimates(&self) -> Result<&[f64]> {
        if self.scheme != InterpScheme::PolynomialNeville {
            return Err(NumericsError::invalid(format!(
                "error estimates only exist for polynomial-Neville, not {} interpolation",
                self.scheme.name()
            )));
        }
        if self.neville_errors.is_empty() {
            return Err(NumericsError::invalid(
                "no error estimate available until evaluate() has been called",
            ));
        }
        Ok(&self.neville_errors)
    }

    /// Smallest x in the data set.
    pub fn domain_min(&mut self) -> Result<f64> {
        self.ensure_validated()?;
        if self.scheme == InterpScheme::PolynomialNeville {
            // data may be unsorted for Neville
            return Ok(self.x.iter().cloned().fold(f64::INFINITY, f64::min));
        }
        Ok(self.x[0])
    }

    /// Largest x in the data set.
    pub fn domain_max(&mut self) -> Result<f64> {
        self.ensure_validated()?;
        if self.scheme == InterpScheme::PolynomialNeville {
            return Ok(self.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
        }
        Ok(self.x[self.x.len() - 1])
    }

    /// Whether `a` lies within the data domain (with an epsilon allowance at
    /// the endpoints).
    pub fn contains(&mut self, a: f64) -> Result<bool> {
        let min = self.domain_min()?;
        let max = self.domain_max()?;
        Ok(a + f64::EPSILON >= min && a - f64::EPSILON <= max)
    }

    /// Evaluates the approximation at `a` under the given extrapolation
    /// policy.
    pub fn evaluate(&mut self, a: f64, policy: Extrapolation) -> Result<f64> {
        if self.scheme == InterpScheme::PolynomialNeville {
            self.neville_errors.clear();
        }
        self.evaluate_inner(a, policy)
    }

    /// Evaluates at a batch of abscissas. For the Neville scheme the error
    /// estimate vector accumulates one entry per abscissa.
    pub fn evaluate_many(&mut self, a: &[f64], policy: Extrapolation) -> Result<Vec<f64>> {
        if self.scheme == InterpScheme::PolynomialNeville {
            self.neville_errors.clear();
        }
        a.iter()
            .map(|&ai| self.evaluate_inner(ai, policy))
            .collect()
    }

    /// Evaluation without clearing the Neville error accumulator; used by
    /// both public entry points and by the integration internals.
    pub(crate) fn evaluate_inner(&mut self, a: f64, policy: Extrapolation) -> Result<f64> {
        let a0 = if self.contains(a)? {
            a
        } else {
            self.resolve_out_of_domain(a, policy)?
        };
        self.ensure_ready()?;
        match self.scheme {
            InterpScheme::Linear => Ok(self.eval_linear(a0)),
            InterpScheme::Polynomial => Ok(self.eval_newton(a0)),
            InterpScheme::PolynomialNeville => Ok(self.eval_neville(a0)),
            InterpScheme::CubicNatural
            | InterpScheme::CubicClamped
            | InterpScheme::CubicNatPeriodic => Ok(self.eval_cubic(a0)),
            InterpScheme::CubicNeighborhood => self.eval_neighborhood(a0),
            InterpScheme::CubicHermite => self.eval_hermite(a0),
            InterpScheme::Akima | InterpScheme::AkimaPeriodic => Ok(self.eval_akima(a0)),
        }
    }

    /// Maps an out-of-domain abscissa to the value actually evaluated, or
    /// reports the policy violation.
    fn resolve_out_of_domain(&mut self, a: f64, policy: Extrapolation) -> Result<f64> {
        let min = self.domain_min()?;
        let max = self.domain_max()?;
        match policy {
            Extrapolation::Error => Err(NumericsError::OutOfDomain { value: a, min, max }),
            Extrapolation::NearestEndpoint => Ok(if a < min { min } else { max }),
            Extrapolation::Extrapolate => {
                if self.scheme == InterpScheme::CubicNeighborhood {
                    // local neighborhoods are undefined outside the data
                    return Err(NumericsError::OutOfDomain { value: a, min, max });
                }
                if self.scheme.can_extrapolate() {
                    Ok(a)
                } else {
                    Ok(if a < min { min } else { max })
                }
            }
        }
    }

    /// Index of the knot interval containing `a`; clamps to the first or last
    /// interval when `a` is outside the domain (extrapolating schemes).
    pub(crate) fn lower_index(&self, a: f64) -> usize {
        let n = self.x.len();
        if a <= self.x[0] {
            return 0;
        }
        if a >= self.x[n - 1] {
            return n - 2;
        }
        // binary search for the first knot greater than a
        let upper = self.x.partition_point(|&v| v <= a);
        upper.saturating_sub(1).min(n - 2)
    }

    fn eval_linear(&self, a: f64) -> f64 {
        let i = self.lower_index(a);
        let t = (a - self.x[i]) / (self.x[i + 1] - self.x[i]);
        self.y[i] + t * (self.y[i + 1] - self.y[i])
    }

    fn invalidate(&mut self) {
        self.validated = false;
        self.state = None;
        self.clamped_set = false;
        self.clamped_first = 0.0;
        self.clamped_last = 0.0;
        self.neville_errors.clear();
    }

    fn ensure_validated(&mut self) -> Result<()> {
        if self.validated {
            return Ok(());
        }
        if self.x.len() < self.min_points() {
            return Err(NumericsError::invalid(format!(
                "{} interpolation requires a minimum of {} data points - currently have {}",
                self.scheme.name(),
                self.min_points(),
                self.x.len()
            )));
        }
        for i in 1..self.x.len() {
            if self.x[i - 1] == self.x[i] {
                return Err(NumericsError::invalid(format!(
                    "x values must be unique: x[{}] = {} = x[{}]",
                    i - 1,
                    self.x[i],
                    i
                )));
            }
            // Neville's algorithm gets the same result from unsorted data
            if self.x[i - 1] > self.x[i] && self.scheme != InterpScheme::PolynomialNeville {
                return Err(NumericsError::invalid(format!(
                    "x values must be in ascending order for {} interpolation: x[{}] = {} > x[{}] = {}",
                    self.scheme.name(),
                    i - 1,
                    self.x[i - 1],
                    i,
                    self.x[i]
                )));
            }
        }
        if self.scheme == InterpScheme::CubicNatPeriodic
            && self.y[0] != self.y[self.y.len() - 1]
        {
            return Err(NumericsError::invalid(
                "first and last y values must be equal for cubic-periodic interpolation",
            ));
        }
        self.validated = true;
        Ok(())
    }

    /// Validates the data set and computes the scheme's cached coefficients
    /// if they are stale.
    fn ensure_ready(&mut self) -> Result<()> {
        self.ensure_validated()?;
        if self.state.is_some() {
            return Ok(());
        }
        let state = match self.scheme {
            InterpScheme::CubicNatural => SplineState::SecondDerivs(
                cubic::second_derivatives(&self.x, &self.y, 1.0e30, 1.0e30),
            ),
            InterpScheme::CubicClamped => {
                if !self.clamped_set {
                    return Err(NumericsError::invalid(
                        "endpoint derivatives must be set after adding data to compute a \
                         clamped cubic spline",
                    ));
                }
                SplineState::SecondDerivs(cubic::second_derivatives(
                    &self.x,
                    &self.y,
                    self.clamped_first,
                    self.clamped_last,
                ))
            }
            InterpScheme::CubicNatPeriodic => {
                SplineState::SecondDerivs(cubic::periodic_second_derivatives(&self.x, &self.y))
            }
            InterpScheme::Polynomial => {
                SplineState::Newton(polynomial::divided_differences(&self.x, &self.y))
            }
            InterpScheme::Akima => {
                SplineState::Tangents(akima::tangents(&self.x, &self.y, false))
            }
            InterpScheme::AkimaPeriodic => {
                SplineState::Tangents(akima::tangents(&self.x, &self.y, true))
            }
            InterpScheme::CubicHermite => {
                if self.hermite_derivs.len() != self.x.len() {
                    return Err(NumericsError::invalid(format!(
                        "the first derivative list has {} entries for {} data points",
                        self.hermite_derivs.len(),
                        self.x.len()
                    )));
                }
                return Ok(());
            }
            // no derived coefficients for these
            InterpScheme::Linear
            | InterpScheme::PolynomialNeville
            | InterpScheme::CubicNeighborhood => return Ok(()),
        };
        self.state = Some(state);
        Ok(())
    }

    fn eval_cubic(&self, a: f64) -> f64 {
        let d2 = match &self.state {
            Some(SplineState::SecondDerivs(d)) => d,
            _ => unreachable!("cubic state computed by ensure_ready"),
        };
        cubic::eval(&self.x, &self.y, d2, a)
    }

    fn eval_newton(&self, a: f64) -> f64 {
        let coeffs = match &self.state {
            Some(SplineState::Newton(c)) => c,
            _ => unreachable!("Newton state computed by ensure_ready"),
        };
        polynomial::eval_newton(&self.x, coeffs, a)
    }

    fn eval_neville(&mut self, a: f64) -> f64 {
        let (value, err) = polynomial::eval_neville(&self.x, &self.y, a);
        self.neville_errors.push(err);
        value
    }

    fn eval_akima(&self, a: f64) -> f64 {
        let t = match &self.state {
            Some(SplineState::Tangents(t)) => t,
            _ => unreachable!("Akima state computed by ensure_ready"),
        };
        akima::eval(&self.x, &self.y, t, a)
    }

    fn eval_neighborhood(&self, a: f64) -> Result<f64> {
        cubic::eval_neighborhood(&self.x, &self.y, a)
    }

    fn eval_hermite(&self, a: f64) -> Result<f64> {
        hermite::eval(&self.x, &self.y, &self.hermite_derivs, self.lower_index(a), a)
    }

    /// Hermite-basis closed-form first derivative at `a`. Only valid for the
    /// cubic-Hermite scheme.
    pub fn hermite_first_derivative(&mut self, a: f64) -> Result<f64> {
        self.require_hermite()?;
        self.ensure_ready()?;
        hermite::first_derivative(&self.x, &self.y, &self.hermite_derivs, self.lower_index(a), a)
    }

    /// Hermite-basis closed-form second derivative at `a`. Only valid for the
    /// cubic-Hermite scheme.
    pub fn hermite_second_derivative(&mut self, a: f64) -> Result<f64> {
        self.require_hermite()?;
        self.ensure_ready()?;
        hermite::second_derivative(&self.x, &self.y, &self.hermite_derivs, self.lower_index(a), a)
    }

    fn require_hermite(&self) -> Result<()> {
        if self.scheme != InterpScheme::CubicHermite {
            return Err(NumericsError::invalid(format!(
                "method only valid for cubic-Hermite, not {} interpolation",
                self.scheme.name()
            )));
        }
        Ok(())
    }

    pub(crate) fn x_data(&self) -> &[f64] {
        &self.x
    }

    pub(crate) fn y_data(&self) -> &[f64] {
        &self.y
    }
}

#[cfg(test)]
mod tests;
