/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the non-rounded Akima spline, natural and periodic variants.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

/// Knot tangents for the Akima spline.
///
/// Interval slopes are extended by two ghost slopes on each side: quadratic
/// extrapolation for the natural variant, wrap-around for the periodic one.
/// The tangent at knot i is the slope-difference weighted mean of the two
/// adjacent interval slopes; where the weights both vanish (locally linear
/// data) the right-hand slope is used.
pub(crate) fn tangents(x: &[f64], y: &[f64], periodic: bool) -> Vec<f64> {
    let n = x.len();
    let q = n - 1; // interval count
    // ghost slopes occupy m[0], m[1] and m[q + 2], m[q + 3]
    let mut m = vec![0.0; q + 4];
    for i in 0..q {
        m[i + 2] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
    }
    if periodic {
        m[0] = m[q];
        m[1] = m[q + 1];
        m[q + 2] = m[2];
        m[q + 3] = m[3];
    } else {
        m[1] = 2.0 * m[2] - m[3];
        m[0] = 2.0 * m[1] - m[2];
        m[q + 2] = 2.0 * m[q + 1] - m[q];
        m[q + 3] = 2.0 * m[q + 2] - m[q + 1];
    }

    (0..n)
        .map(|i| {
            // knot i sits between extended slopes m[i + 1] and m[i + 2]
            let w_left = (m[i + 3] - m[i + 2]).abs();
            let w_right = (m[i + 1] - m[i]).abs();
            let denom = w_left + w_right;
            if denom == 0.0 {
                m[i + 2]
            } else {
                (w_left * m[i + 1] + w_right * m[i + 2]) / denom
            }
        })
        .collect()
}

/// Evaluates the Akima spline with precomputed knot tangents at `a`.
pub(crate) fn eval(x: &[f64], y: &[f64], t: &[f64], a: f64) -> f64 {
    let n = x.len();
    let i = if a <= x[0] {
        0
    } else if a >= x[n - 1] {
        n - 2
    } else {
        x.partition_point(|&v| v <= a).saturating_sub(1).min(n - 2)
    };
    let h = x[i + 1] - x[i];
    let m = (y[i + 1] - y[i]) / h;
    let c = (3.0 * m - 2.0 * t[i] - t[i + 1]) / h;
    let d = (t[i] + t[i + 1] - 2.0 * m) / (h * h);
    let dx = a - x[i];
    y[i] + dx * (t[i] + dx * (c + d * dx))
}
