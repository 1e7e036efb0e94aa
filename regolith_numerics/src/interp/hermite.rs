/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements piecewise cubic Hermite interpolation from caller-supplied point derivatives.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::Result;

/// Evaluates the cubic Hermite segment `i` at `a` using the standard basis
/// functions. Outside the data domain this evaluates the first or last
/// segment's cubic, which is the scheme's extrapolation.
pub(crate) fn eval(x: &[f64], y: &[f64], fp: &[f64], i: usize, a: f64) -> Result<f64> {
    let h = x[i + 1] - x[i];
    let t = (a - x[i]) / h;
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    Ok(h00 * y[i] + h10 * h * fp[i] + h01 * y[i + 1] + h11 * h * fp[i + 1])
}

/// Closed-form first derivative of the Hermite segment at `a`.
pub(crate) fn first_derivative(x: &[f64], y: &[f64], fp: &[f64], i: usize, a: f64) -> Result<f64> {
    let h = x[i + 1] - x[i];
    let t = (a - x[i]) / h;
    let h00 = 6.0 * t * t - 6.0 * t;
    let h10 = 3.0 * t * t - 4.0 * t + 1.0;
    let h01 = -6.0 * t * t + 6.0 * t;
    let h11 = 3.0 * t * t - 2.0 * t;
    Ok((h00 * y[i] + h01 * y[i + 1]) / h + h10 * fp[i] + h11 * fp[i + 1])
}

/// Closed-form second derivative of the Hermite segment at `a`.
pub(crate) fn second_derivative(x: &[f64], y: &[f64], fp: &[f64], i: usize, a: f64) -> Result<f64> {
    let h = x[i + 1] - x[i];
    let t = (a - x[i]) / h;
    let h00 = 12.0 * t - 6.0;
    let h10 = 6.0 * t - 4.0;
    let h01 = -12.0 * t + 6.0;
    let h11 = 6.0 * t - 2.0;
    Ok((h00 * y[i] + h01 * y[i + 1]) / (h * h) + (h10 * fp[i] + h11 * fp[i + 1]) / h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hermite_reproduces_cubic_with_exact_derivatives() {
        // f(x) = x^3 - 2x, f'(x) = 3x^2 - 2
        let x = [0.0, 1.0, 2.0];
        let y: Vec<f64> = x.iter().map(|v| v * v * v - 2.0 * v).collect();
        let fp: Vec<f64> = x.iter().map(|v| 3.0 * v * v - 2.0).collect();
        for &a in &[0.25, 0.9, 1.5, 1.99] {
            let i = if a < 1.0 { 0 } else { 1 };
            assert_relative_eq!(
                eval(&x, &y, &fp, i, a).unwrap(),
                a * a * a - 2.0 * a,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                first_derivative(&x, &y, &fp, i, a).unwrap(),
                3.0 * a * a - 2.0,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                second_derivative(&x, &y, &fp, i, a).unwrap(),
                6.0 * a,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn segment_cubic_extends_past_the_endpoint() {
        let x = [0.0, 1.0];
        let y = [0.0, 1.0];
        let fp = [3.0, 3.0];
        // the segment is a genuine cubic, so the form continues outside [0, 1]
        let inside = eval(&x, &y, &fp, 0, 0.5).unwrap();
        let outside = eval(&x, &y, &fp, 0, 1.5).unwrap();
        assert!(inside.is_finite() && outside.is_finite());
        assert_relative_eq!(
            first_derivative(&x, &y, &fp, 0, 0.0).unwrap(),
            3.0,
            epsilon = 1e-12
        );
    }
}
