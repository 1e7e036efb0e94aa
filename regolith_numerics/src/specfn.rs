/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the exponential-integral special functions and the second-order scattering
// helper used by the radiative-transfer tables.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Exponential-integral special functions
//!
//! Stateless evaluators for Ei(x), the generalized exponential integral
//! En(n, x), and the second-order scattering correction G11'(tau). The series
//! and continued-fraction formulations follow Numerical Recipes in C, 2nd
//! ed., section 6.3.

use crate::error::{NumericsError, Result};

const MAX_ITERATIONS: usize = 100;
const FPMIN: f64 = 1.0e-30;

/// Exponential integral Ei(x) for `x > 0`.
///
/// Uses the power series `Ei(x) = gamma + ln x + sum x^k / (k * k!)` for
/// small x and the asymptotic series `e^x / x * (1 + 1!/x + 2!/x^2 + ...)`
/// otherwise, truncating the latter at its smallest term.
pub fn ei(x: f64) -> Result<f64> {
    const EPSILON: f64 = 6.0e-8;
    const EULER: f64 = 0.57721566;

    if x <= 0.0 {
        return Err(NumericsError::invalid(format!(
            "Ei(x) requires x > 0, got x = {}",
            x
        )));
    }
    if x < FPMIN {
        // underflow would defeat the series convergence test
        return Ok(x.ln() + EULER);
    }
    if x <= -EPSILON.ln() {
        let mut sum = 0.0;
        let mut fact = 1.0;
        for k in 1..=MAX_ITERATIONS {
            fact = fact * x / k as f64;
            let term = fact / k as f64;
            sum += term;
            if term < EPSILON * sum {
                return Ok(sum + x.ln() + EULER);
            }
        }
        return Err(NumericsError::DidNotConverge {
            what: "Ei power series",
            iterations: MAX_ITERATIONS,
        });
    }
    // asymptotic series
    let mut sum = 0.0;
    let mut term = 1.0;
    for k in 1..=MAX_ITERATIONS {
        let prev = term;
        term = term * k as f64 / x;
        if term < EPSILON {
            break;
        }
        if term < prev {
            sum += term;
        } else {
            // series began diverging; back the last term out and stop
            sum -= prev;
            break;
        }
    }
    Ok(x.exp() * (1.0 + sum) / x)
}

/// Generalized exponential integral En(n, x) for `n >= 0, x >= 0`, excluding
/// the undefined `x = 0` with `n` in {0, 1}.
///
/// Direct formula for `n = 0`; `1/(n-1)` for `x = 0`; Lentz's continued
/// fraction for `x > 1`; otherwise the power series with its digamma
/// correction at the `i = n - 1` term.
pub fn en(n: u32, x: f64) -> Result<f64> {
    const EPSILON: f64 = 1.0e-7;
    const EULER: f64 = 0.5772156649;

    let nm1 = n as i64 - 1;
    if x < 0.0 || (x == 0.0 && (n == 0 || n == 1)) {
        return Err(NumericsError::invalid(format!(
            "En(n, x) requires (x > 0 and n >= 0) or (x >= 0 and n > 1), got n = {}, x = {}",
            n, x
        )));
    }
    if n == 0 {
        return Ok((-x).exp() / x);
    }
    if x == 0.0 {
        return Ok(1.0 / nm1 as f64);
    }
    if x > 1.0 {
        // Lentz's algorithm
        let mut b = x + n as f64;
        let mut c = 1.0 / FPMIN;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..=MAX_ITERATIONS {
            let a = -(i as f64) * (nm1 as f64 + i as f64);
            b += 2.0;
            d = 1.0 / (a * d + b);
            c = b + a / c;
            let delta = c * d;
            h *= delta;
            if (delta - 1.0).abs() < EPSILON {
                return Ok(h * (-x).exp());
            }
        }
        return Err(NumericsError::DidNotConverge {
            what: "En continued fraction",
            iterations: MAX_ITERATIONS,
        });
    }
    // power series
    let mut result = if nm1 != 0 {
        1.0 / nm1 as f64
    } else {
        -x.ln() - EULER
    };
    let mut fact = 1.0;
    for i in 1..=MAX_ITERATIONS {
        fact = -fact * x / i as f64;
        let delta = if i as i64 != nm1 {
            -fact / (i as f64 - nm1 as f64)
        } else {
            let mut psi = -EULER;
            for ii in 1..=nm1 {
                psi += 1.0 / ii as f64;
            }
            fact * (-x.ln() + psi)
        };
        result += delta;
        if delta.abs() < result.abs() * EPSILON {
            return Ok(result);
        }
    }
    Err(NumericsError::DidNotConverge {
        what: "En power series",
        iterations: MAX_ITERATIONS,
    })
}

/// Second-order scattering correction G11'(tau) for the anisotropic
/// atmospheric models: an alternating series accumulated to 1e-6 relative
/// tolerance, combined with En(1, tau) and En(2, tau).
pub fn g11_prime(tau: f64) -> Result<f64> {
    const TOLERANCE: f64 = 1.0e-6;
    const EULGAM: f64 = 0.5772156;

    let mut sum: f64 = 0.0;
    let mut icnt = 1.0;
    let mut fac = -tau;
    let mut term = fac;
    while term.abs() > sum.abs() * TOLERANCE {
        sum += term;
        icnt += 1.0;
        fac = fac * (-tau) / icnt;
        term = fac / (icnt * icnt);
    }
    let elog = tau.max(1.0e-30).ln() + EULGAM;
    let e1_squared = sum + std::f64::consts::PI.powi(2) / 12.0 + 0.5 * elog.powi(2);
    Ok(2.0 * (en(1, tau)? + elog * en(2, tau)? - tau * e1_squared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn en_regression_values() {
        assert_relative_eq!(en(1, 0.28).unwrap(), 0.957308, epsilon = 1e-5);
        // continued-fraction branch
        assert_relative_eq!(en(1, 2.0).unwrap(), 0.0489005, epsilon = 1e-5);
        // n = 0 closed form
        assert_relative_eq!(en(0, 1.0).unwrap(), (-1.0f64).exp(), epsilon = 1e-12);
        // x = 0, n > 1 closed form
        assert_relative_eq!(en(3, 0.0).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn ei_regression_values() {
        assert_relative_eq!(ei(1.5).unwrap(), 3.30129, epsilon = 1e-4);
        // asymptotic branch
        assert_relative_eq!(ei(20.0).unwrap(), 2.5615652e7, max_relative = 1e-5);
    }

    #[test]
    fn g11_prime_regression_value() {
        assert_relative_eq!(g11_prime(0.28).unwrap(), 0.79134, epsilon = 1e-4);
    }

    #[test]
    fn invalid_arguments_are_reported_not_nan() {
        assert!(matches!(
            ei(0.0),
            Err(NumericsError::InvalidArgument { .. })
        ));
        assert!(matches!(
            ei(-1.0),
            Err(NumericsError::InvalidArgument { .. })
        ));
        assert!(matches!(
            en(0, 0.0),
            Err(NumericsError::InvalidArgument { .. })
        ));
        assert!(matches!(
            en(1, 0.0),
            Err(NumericsError::InvalidArgument { .. })
        ));
        assert!(matches!(
            en(2, -0.5),
            Err(NumericsError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn en_series_and_fraction_branches_agree_near_the_boundary() {
        // both formulations should approximate the same function around x = 1
        let below = en(2, 0.999).unwrap();
        let above = en(2, 1.001).unwrap();
        assert!((below - above).abs() < 1e-3);
    }
}
