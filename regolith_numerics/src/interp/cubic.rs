/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the cubic spline family: natural, clamped, periodic, and local neighborhood.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{NumericsError, Result};
use crate::interp::NATURAL_BOUNDARY;

/// Second derivatives of the interpolating cubic spline at every knot, by the
/// standard tridiagonal recurrence. Endpoint first derivatives at or above
/// the natural-boundary sentinel magnitude select a zero second derivative at
/// that end instead.
pub(crate) fn second_derivatives(x: &[f64], y: &[f64], yp_first: f64, yp_last: f64) -> Vec<f64> {
    let n = x.len();
    let mut d2 = vec![0.0; n];
    let mut u = vec![0.0; n - 1];

    if yp_first.abs() < NATURAL_BOUNDARY {
        d2[0] = -0.5;
        u[0] = (3.0 / (x[1] - x[0])) * ((y[1] - y[0]) / (x[1] - x[0]) - yp_first);
    }
    for i in 1..n - 1 {
        let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
        let p = sig * d2[i - 1] + 2.0;
        d2[i] = (sig - 1.0) / p;
        u[i] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
        u[i] = (6.0 * u[i] / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
    }
    let (qn, un) = if yp_last.abs() < NATURAL_BOUNDARY {
        let h = x[n - 1] - x[n - 2];
        (0.5, (3.0 / h) * (yp_last - (y[n - 1] - y[n - 2]) / h))
    } else {
        (0.0, 0.0)
    };
    d2[n - 1] = (un - qn * u[n - 2]) / (qn * d2[n - 2] + 1.0);
    for i in (0..n - 1).rev() {
        d2[i] = d2[i] * d2[i + 1] + u[i];
    }
    d2
}

/// Second derivatives of the periodic cubic spline. The data must wrap
/// (equal first and last y values); the returned vector repeats the first
/// entry at the last knot.
pub(crate) fn periodic_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    // with two knots the only periodic spline is the constant segment
    if n == 2 {
        return vec![0.0; n];
    }
    let m = n - 1; // independent knots; knot m wraps to knot 0
    let h = |i: usize| x[i + 1] - x[i];
    let slope = |i: usize| (y[i + 1] - y[i]) / h(i);

    // cyclic tridiagonal system for the m independent second derivatives
    let mut diag = vec![0.0; m];
    let mut rhs = vec![0.0; m];
    let mut sub = vec![0.0; m];
    let mut sup = vec![0.0; m];
    for i in 0..m {
        let prev = if i == 0 { m - 1 } else { i - 1 };
        sub[i] = h(prev);
        sup[i] = h(i);
        diag[i] = 2.0 * (h(prev) + h(i));
        rhs[i] = 6.0 * (slope(i) - slope(prev));
    }

    let mut d2 = vec![0.0; n];
    if m == 2 {
        // 2x2 cyclic system: the sub- and super-diagonal entries coincide
        let b0 = sub[0] + sup[0];
        let b1 = sub[1] + sup[1];
        let det = diag[0] * diag[1] - b0 * b1;
        d2[0] = (rhs[0] * diag[1] - rhs[1] * b0) / det;
        d2[1] = (rhs[1] * diag[0] - rhs[0] * b1) / det;
    } else {
        let solved = solve_cyclic_tridiagonal(&sub, &diag, &sup, &rhs);
        d2[..m].copy_from_slice(&solved);
    }
    d2[n - 1] = d2[0];
    d2
}

/// Thomas-algorithm solve of a tridiagonal system. `sub[0]` and
/// `sup[n-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }
    for i in (0..n - 1).rev() {
        d[i] -= c[i] * d[i + 1];
    }
    d
}

/// Cyclic tridiagonal solve via the Sherman-Morrison correction. `sub[0]` is
/// the wrap-around entry in the top-right corner; `sup[n-1]` the one in the
/// bottom-left.
fn solve_cyclic_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let alpha = sub[0]; // top-right corner
    let beta = sup[n - 1]; // bottom-left corner
    let gamma = -diag[0];

    let mut diag_mod = diag.to_vec();
    diag_mod[0] -= gamma;
    diag_mod[n - 1] -= alpha * beta / gamma;

    let z = solve_tridiagonal(sub, &diag_mod, sup, rhs);
    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = beta;
    let q = solve_tridiagonal(sub, &diag_mod, sup, &u);

    let factor = (z[0] + alpha * z[n - 1] / gamma) / (1.0 + q[0] + alpha * q[n - 1] / gamma);
    z.iter().zip(q.iter()).map(|(&zi, &qi)| zi - factor * qi).collect()
}

/// Evaluates the cubic spline with precomputed second derivatives at `a`.
/// `a` at or beyond an endpoint evaluates the first or last segment's cubic,
/// which is how the clamped spline extrapolates.
pub(crate) fn eval(x: &[f64], y: &[f64], d2: &[f64], a: f64) -> f64 {
    let n = x.len();
    let i = if a <= x[0] {
        0
    } else if a >= x[n - 1] {
        n - 2
    } else {
        x.partition_point(|&v| v <= a).saturating_sub(1).min(n - 2)
    };
    let h = x[i + 1] - x[i];
    let ua = (x[i + 1] - a) / h;
    let ub = (a - x[i]) / h;
    ua * y[i]
        + ub * y[i + 1]
        + ((ua * ua * ua - ua) * d2[i] + (ub * ub * ub - ub) * d2[i + 1]) * (h * h) / 6.0
}

/// Local natural cubic through the four data points nearest `a`, re-solved
/// from scratch on each call. `a` outside the domain is an error.
pub(crate) fn eval_neighborhood(x: &[f64], y: &[f64], a: f64) -> Result<f64> {
    let n = x.len();
    if a < x[0] || a > x[n - 1] {
        return Err(NumericsError::OutOfDomain {
            value: a,
            min: x[0],
            max: x[n - 1],
        });
    }
    // interval index, then widen symmetrically to four points
    let i = x.partition_point(|&v| v <= a).saturating_sub(1).min(n - 2);
    let start = i.saturating_sub(1).min(n - 4);
    let xs = &x[start..start + 4];
    let ys = &y[start..start + 4];
    let d2 = second_derivatives(xs, ys, 1.0e30, 1.0e30);
    Ok(eval(xs, ys, &d2, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tridiagonal_solver_recovers_known_solution() {
        // A x = b with A = tri(1, 4, 1), x = [1, 2, 3]
        let sub = [0.0, 1.0, 1.0];
        let diag = [4.0, 4.0, 4.0];
        let sup = [1.0, 1.0, 0.0];
        let rhs = [6.0, 12.0, 14.0];
        let x = solve_tridiagonal(&sub, &diag, &sup, &rhs);
        assert_relative_eq!(x[0], 1.0, max_relative = 1e-12);
        assert_relative_eq!(x[1], 2.0, max_relative = 1e-12);
        assert_relative_eq!(x[2], 3.0, max_relative = 1e-12);
    }

    #[test]
    fn cyclic_solver_recovers_known_solution() {
        // cyclic tri(1, 4, 1) on 4 unknowns, x = [1, 2, 3, 4]
        let sub = [1.0, 1.0, 1.0, 1.0];
        let diag = [4.0, 4.0, 4.0, 4.0];
        let sup = [1.0, 1.0, 1.0, 1.0];
        // rhs_i = x_{i-1} + 4 x_i + x_{i+1}, cyclic
        let rhs = [10.0, 12.0, 18.0, 20.0];
        let x = solve_cyclic_tridiagonal(&sub, &diag, &sup, &rhs);
        for (got, want) in x.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert_relative_eq!(*got, want, max_relative = 1e-12);
        }
    }

    #[test]
    fn natural_spline_is_linear_for_linear_data() {
        let x = [0.0, 1.0, 2.5, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 1.0).collect();
        let d2 = second_derivatives(&x, &y, 1.0e30, 1.0e30);
        for d in &d2 {
            assert_relative_eq!(*d, 0.0, epsilon = 1e-10);
        }
        assert_relative_eq!(eval(&x, &y, &d2, 1.75), 3.0 * 1.75 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn clamped_spline_reproduces_cubic_exactly() {
        // f(x) = x^3 with exact endpoint derivatives 3x^2
        let x = [0.0, 0.5, 1.0, 1.5, 2.0];
        let y: Vec<f64> = x.iter().map(|v| v * v * v).collect();
        let d2 = second_derivatives(&x, &y, 0.0, 12.0);
        for &a in &[0.25, 0.9, 1.3, 1.99] {
            assert_relative_eq!(eval(&x, &y, &d2, a), a * a * a, epsilon = 1e-10);
        }
        // the clamped spline keeps the cubic form outside the domain too
        assert_relative_eq!(eval(&x, &y, &d2, 2.3), 2.3f64.powi(3), epsilon = 1e-9);
    }

    #[test]
    fn periodic_spline_matches_values_and_wraps() {
        let x: Vec<f64> = (0..=8).map(|i| i as f64 * std::f64::consts::PI / 4.0).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let d2 = periodic_second_derivatives(&x, &y);
        assert_relative_eq!(d2[0], d2[8], epsilon = 1e-12);
        for (i, &xi) in x.iter().enumerate() {
            assert_relative_eq!(eval(&x, &y, &d2, xi), y[i], epsilon = 1e-12);
        }
        // interior accuracy on a smooth periodic function
        assert_relative_eq!(eval(&x, &y, &d2, 1.0), 1.0f64.sin(), epsilon = 5e-3);
    }

    #[test]
    fn neighborhood_rejects_out_of_domain() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 1.0, 4.0, 9.0, 16.0];
        assert!(eval_neighborhood(&x, &y, -0.1).is_err());
        assert!(eval_neighborhood(&x, &y, 4.1).is_err());
        assert!(eval_neighborhood(&x, &y, 2.5).is_ok());
    }
}
