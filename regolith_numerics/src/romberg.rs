/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the Romberg integration driver over an arbitrary fallible integrand.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Romberg integration
//!
//! Repeated Richardson extrapolation of the extended trapezoidal rule. The
//! integrand is any fallible closure, so the same driver integrates both
//! tabulated-data interpolants and physical-model callbacks; integrand errors
//! propagate out unchanged.
//!
//! Each refinement stage halves the panel width, so the squared step size
//! shrinks by a factor of four per stage; a degree-four Neville extrapolation
//! over the last five (step-size-squared, trapezoid-estimate) pairs projects
//! the estimate to zero step size. Convergence is declared when the
//! extrapolation's own error estimate is within a relative tolerance of 1e-4
//! or an absolute tolerance of 1e-6.

use crate::error::NumericsError;
use crate::interp::polynomial;

/// Refinement stages attempted before reporting failure.
pub const MAX_STAGES: usize = 20;

/// Trapezoid estimates carried into the Richardson extrapolation.
const EXTRAP_POINTS: usize = 5;

const REL_TOLERANCE: f64 = 1.0e-4;
const ABS_TOLERANCE: f64 = 1.0e-6;

/// Integrates `f` over `[a, b]`, returning the value and the extrapolation's
/// error estimate.
pub fn integrate<F, E>(a: f64, b: f64, f: &mut F) -> std::result::Result<(f64, f64), E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
    E: From<NumericsError>,
{
    let mut h = [0.0; MAX_STAGES + 1];
    let mut s = [0.0; MAX_STAGES + 1];
    h[0] = 1.0;
    let mut trap = 0.0;

    for n in 1..=MAX_STAGES {
        trap = refine_trapezoid(a, b, f, trap, n)?;
        s[n - 1] = trap;
        if n >= EXTRAP_POINTS {
            let (ss, dss) =
                polynomial::eval_neville(&h[n - EXTRAP_POINTS..n], &s[n - EXTRAP_POINTS..n], 0.0);
            if dss.abs() <= REL_TOLERANCE * ss.abs() || dss.abs() <= ABS_TOLERANCE {
                return Ok((ss, dss));
            }
        }
        h[n] = 0.25 * h[n - 1];
    }
    Err(NumericsError::DidNotConverge {
        what: "Romberg integration",
        iterations: MAX_STAGES,
    }
    .into())
}

/// One stage of the extended trapezoidal rule. Stage 1 is the two-point
/// estimate; stage n folds in 2^(n-2) new midpoints and halves the panels.
fn refine_trapezoid<F, E>(
    a: f64,
    b: f64,
    f: &mut F,
    previous: f64,
    stage: usize,
) -> std::result::Result<f64, E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
{
    if stage == 1 {
        return Ok(0.5 * (b - a) * (f(a)? + f(b)?));
    }
    let it = 1usize << (stage - 2);
    let del = (b - a) / it as f64;
    let mut x = a + 0.5 * del;
    let mut sum = 0.0;
    for _ in 0..it {
        sum += f(x)?;
        x += del;
    }
    Ok(0.5 * (previous + (b - a) * sum / it as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use approx::assert_relative_eq;

    #[test]
    fn integrates_smooth_functions() {
        let (v, _) = integrate(0.0, std::f64::consts::PI, &mut |x: f64| -> Result<f64> {
            Ok(x.sin())
        })
        .unwrap();
        assert_relative_eq!(v, 2.0, max_relative = 1e-6);

        let (v, _) = integrate(1.0, 4.0, &mut |x: f64| -> Result<f64> { Ok(1.0 / x) })
            .unwrap();
        assert_relative_eq!(v, 4.0f64.ln(), max_relative = 1e-6);
    }

    #[test]
    fn polynomials_integrate_essentially_exactly() {
        let (v, err) = integrate(0.0, 2.0, &mut |x: f64| -> Result<f64> {
            Ok(3.0 * x * x - 2.0 * x + 1.0)
        })
        .unwrap();
        assert_relative_eq!(v, 8.0 - 4.0 + 2.0, max_relative = 1e-10);
        assert!(err.abs() < 1e-8);
    }

    #[test]
    fn integrand_errors_propagate() {
        let result = integrate(0.0, 1.0, &mut |x: f64| -> Result<f64> {
            if x > 0.5 {
                Err(NumericsError::invalid("integrand blew up"))
            } else {
                Ok(x)
            }
        });
        assert!(matches!(
            result,
            Err(NumericsError::InvalidArgument { .. })
        ));
    }
}
