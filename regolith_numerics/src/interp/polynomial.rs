/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements global polynomial interpolation: Newton divided differences and Neville's
// algorithm with error estimates.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

/// Newton divided-difference coefficients, computed in place. `coeffs[k]` is
/// the k-th order difference f[x0, ..., xk].
pub(crate) fn divided_differences(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut coeffs = y.to_vec();
    for order in 1..n {
        for i in (order..n).rev() {
            coeffs[i] = (coeffs[i] - coeffs[i - 1]) / (x[i] - x[i - order]);
        }
    }
    coeffs
}

/// Evaluates the Newton-form polynomial by nested multiplication.
pub(crate) fn eval_newton(x: &[f64], coeffs: &[f64], a: f64) -> f64 {
    let n = coeffs.len();
    let mut value = coeffs[n - 1];
    for i in (0..n - 1).rev() {
        value = value * (a - x[i]) + coeffs[i];
    }
    value
}

/// Neville's algorithm: evaluates the unique interpolating polynomial at `a`
/// and returns `(value, error_estimate)`. The error estimate is the last
/// correction applied in the tableau. Works on unsorted data.
pub(crate) fn eval_neville(x: &[f64], y: &[f64], a: f64) -> (f64, f64) {
    let n = x.len();
    let mut c = y.to_vec();
    let mut d = y.to_vec();

    // start from the tabulated point nearest a
    let mut ns = 0;
    let mut dif = (a - x[0]).abs();
    for (i, &xi) in x.iter().enumerate().skip(1) {
        let dift = (a - xi).abs();
        if dift < dif {
            ns = i;
            dif = dift;
        }
    }
    let mut value = y[ns];
    let mut err = 0.0;
    let mut ns_level = ns;

    for m in 1..n {
        for i in 0..n - m {
            let ho = x[i] - a;
            let hp = x[i + m] - a;
            let w = c[i + 1] - d[i];
            let den = ho - hp;
            // den can only vanish for duplicate abscissas, which validation
            // has already rejected
            let den = w / den;
            d[i] = hp * den;
            c[i] = ho * den;
        }
        err = if 2 * ns_level < n - m {
            c[ns_level]
        } else {
            ns_level -= 1;
            d[ns_level]
        };
        value += err;
    }
    (value, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn newton_form_reproduces_quadratic() {
        let x = [0.0, 1.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v * v - v + 1.0).collect();
        let coeffs = divided_differences(&x, &y);
        // cubic coefficient of a quadratic data set vanishes
        assert_relative_eq!(coeffs[3], 0.0, epsilon = 1e-12);
        for &a in &[0.5, 2.0, 3.7] {
            assert_relative_eq!(
                eval_newton(&x, &coeffs, a),
                2.0 * a * a - a + 1.0,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn neville_matches_newton_on_same_data() {
        let x = [-1.0, 0.5, 2.0, 3.5, 5.0];
        let y = [2.0, -1.0, 0.5, 4.0, -3.0];
        let coeffs = divided_differences(&x, &y);
        for &a in &[-0.5, 1.0, 2.75, 4.5] {
            let (v, _) = eval_neville(&x, &y, a);
            assert_relative_eq!(v, eval_newton(&x, &coeffs, a), epsilon = 1e-9);
        }
    }

    #[test]
    fn neville_handles_unsorted_data() {
        let x = [2.0, -1.0, 5.0, 0.5, 3.5];
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let (v, err) = eval_neville(&x, &y, 1.25);
        assert_relative_eq!(v, 1.25 * 1.25, epsilon = 1e-10);
        assert!(err.abs() < 1e-10);
    }
}
