/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements 1-D minimum bracketing, Brent minimization, and Brent root finding over a
// caller-supplied fallible objective.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # One-dimensional optimization
//!
//! Golden-ratio expansion to bracket a minimum, Brent's
//! parabolic-interpolation minimizer, and Brent's root finder. Objectives are
//! fallible closures so model-evaluation errors propagate out of the
//! iteration unchanged.
//!
//! Both iterative drivers share the same lifecycle: Initialized ->
//! Iterating -> Converged or MaxIterationsExceeded. They run synchronously to
//! completion; choosing new seeds or brackets after a failure is the
//! caller's decision.

use crate::error::NumericsError;

/// Golden-section expansion ratio.
const GOLD: f64 = 1.618034;
/// Cap on how far a parabolic-fit step may overshoot the current bracket.
const GROWTH_LIMIT: f64 = 110.0;
const TINY: f64 = 1.0e-20;

const BRACKET_MAX_ITERATIONS: usize = 1000;
const BRENT_MAX_ITERATIONS: usize = 100;

/// Lifecycle of an iterative driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerStatus {
    Initialized,
    Iterating,
    Converged,
    MaxIterationsExceeded,
}

/// A bracketing triple: `xa < xb < xc` (or the consistent reverse ordering)
/// with `f(xb) <= f(xa)` and `f(xb) <= f(xc)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub xa: f64,
    pub xb: f64,
    pub xc: f64,
    pub fa: f64,
    pub fb: f64,
    pub fc: f64,
}

/// A converged minimization result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub value: f64,
    pub iterations: usize,
}

/// A converged root-finding result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    pub iterations: usize,
}

/// Expands an initial downhill pair into a bracketing triple by golden-ratio
/// steps with parabolic-fit acceleration.
pub fn bracket_minimum<F, E>(xa: f64, xb: f64, f: &mut F) -> std::result::Result<Bracket, E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
    E: From<NumericsError>,
{
    let (mut xa, mut xb) = (xa, xb);
    let mut fa = f(xa)?;
    let mut fb = f(xb)?;
    if fb > fa {
        // walk downhill from a to b
        std::mem::swap(&mut xa, &mut xb);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut xc = xb + GOLD * (xb - xa);
    let mut fc = f(xc)?;

    for _ in 0..BRACKET_MAX_ITERATIONS {
        if fb <= fc {
            return Ok(Bracket {
                xa,
                xb,
                xc,
                fa,
                fb,
                fc,
            });
        }
        // parabolic fit through (xa, fa), (xb, fb), (xc, fc)
        let r = (xb - xa) * (fb - fc);
        let q = (xb - xc) * (fb - fa);
        let denom = 2.0 * (q - r).abs().max(TINY).copysign(q - r);
        let mut u = xb - ((xb - xc) * q - (xb - xa) * r) / denom;
        let ulim = xb + GROWTH_LIMIT * (xc - xb);

        if (xb - u) * (u - xc) > 0.0 {
            // parabolic u lands between b and c
            let fu = f(u)?;
            if fu < fc {
                return Ok(Bracket {
                    xa: xb,
                    xb: u,
                    xc,
                    fa: fb,
                    fb: fu,
                    fc,
                });
            }
            if fu > fb {
                return Ok(Bracket {
                    xa,
                    xb,
                    xc: u,
                    fa,
                    fb,
                    fc: fu,
                });
            }
            // the fit was no use; take a golden step past c
            u = xc + GOLD * (xc - xb);
            let fu = f(u)?;
            advance(&mut xa, &mut xb, &mut xc, &mut fa, &mut fb, &mut fc, u, fu);
        } else if (xc - u) * (u - ulim) > 0.0 {
            // parabolic u lands between c and the growth limit
            let mut fu = f(u)?;
            if fu < fc {
                let u_next = u + GOLD * (u - xc);
                xb = xc;
                xc = u;
                u = u_next;
                fb = fc;
                fc = fu;
                fu = f(u)?;
                advance(&mut xa, &mut xb, &mut xc, &mut fa, &mut fb, &mut fc, u, fu);
            } else {
                advance(&mut xa, &mut xb, &mut xc, &mut fa, &mut fb, &mut fc, u, fu);
            }
        } else if (u - ulim) * (ulim - xc) >= 0.0 {
            // clamp the runaway parabolic step to the growth limit
            u = ulim;
            let fu = f(u)?;
            advance(&mut xa, &mut xb, &mut xc, &mut fa, &mut fb, &mut fc, u, fu);
        } else {
            u = xc + GOLD * (xc - xb);
            let fu = f(u)?;
            advance(&mut xa, &mut xb, &mut xc, &mut fa, &mut fb, &mut fc, u, fu);
        }
    }
    Err(NumericsError::DidNotConverge {
        what: "minimum bracketing",
        iterations: BRACKET_MAX_ITERATIONS,
    }
    .into())
}

#[allow(clippy::too_many_arguments)]
fn advance(
    xa: &mut f64,
    xb: &mut f64,
    xc: &mut f64,
    fa: &mut f64,
    fb: &mut f64,
    fc: &mut f64,
    u: f64,
    fu: f64,
) {
    *xa = *xb;
    *xb = *xc;
    *xc = u;
    *fa = *fb;
    *fb = *fc;
    *fc = fu;
}

/// Brent's minimizer: parabolic interpolation with golden-section fallback
/// inside a shrinking bracket.
#[derive(Debug, Clone)]
pub struct BrentMinimizer {
    max_iterations: usize,
    status: OptimizerStatus,
}

impl Default for BrentMinimizer {
    fn default() -> Self {
        BrentMinimizer::new()
    }
}

impl BrentMinimizer {
    pub fn new() -> Self {
        BrentMinimizer {
            max_iterations: BRENT_MAX_ITERATIONS,
            status: OptimizerStatus::Initialized,
        }
    }

    pub fn status(&self) -> OptimizerStatus {
        self.status
    }

    /// Minimizes `f` over `[lower, upper]` starting from `guess`, stopping
    /// when the bracket shrinks within `tolerance` of the current best point.
    pub fn minimize<F, E>(
        &mut self,
        lower: f64,
        upper: f64,
        guess: f64,
        tolerance: f64,
        f: &mut F,
    ) -> std::result::Result<Minimum, E>
    where
        F: FnMut(f64) -> std::result::Result<f64, E>,
        E: From<NumericsError>,
    {
        const CGOLD: f64 = 0.3819660;
        const ZEPS: f64 = 1.0e-10;

        if !(lower <= guess && guess <= upper) {
            return Err(NumericsError::invalid(format!(
                "initial guess {} is outside the interval [{}, {}]",
                guess, lower, upper
            ))
            .into());
        }
        self.status = OptimizerStatus::Iterating;

        let (mut a, mut b) = (lower.min(upper), lower.max(upper));
        let mut x = guess;
        let mut w = guess;
        let mut v = guess;
        let mut fx = f(x)?;
        let mut fw = fx;
        let mut fv = fx;
        let mut d: f64 = 0.0;
        let mut e: f64 = 0.0;

        for iteration in 1..=self.max_iterations {
            let xm = 0.5 * (a + b);
            let tol1 = tolerance * x.abs() + ZEPS;
            let tol2 = 2.0 * tol1;
            if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
                self.status = OptimizerStatus::Converged;
                return Ok(Minimum {
                    x,
                    value: fx,
                    iterations: iteration,
                });
            }

            let mut use_golden = true;
            if e.abs() > tol1 {
                // trial parabolic fit through x, w, v
                let r = (x - w) * (fx - fv);
                let mut q = (x - v) * (fx - fw);
                let mut p = (x - v) * q - (x - w) * r;
                q = 2.0 * (q - r);
                if q > 0.0 {
                    p = -p;
                }
                q = q.abs();
                let e_prev = e;
                e = d;
                if p.abs() < (0.5 * q * e_prev).abs() && p > q * (a - x) && p < q * (b - x) {
                    d = p / q;
                    let u = x + d;
                    if u - a < tol2 || b - u < tol2 {
                        d = tol1.copysign(xm - x);
                    }
                    use_golden = false;
                }
            }
            if use_golden {
                e = if x >= xm { a - x } else { b - x };
                d = CGOLD * e;
            }
            let u = if d.abs() >= tol1 {
                x + d
            } else {
                x + tol1.copysign(d)
            };
            let fu = f(u)?;

            if fu <= fx {
                if u >= x {
                    a = x;
                } else {
                    b = x;
                }
                v = w;
                w = x;
                x = u;
                fv = fw;
                fw = fx;
                fx = fu;
            } else {
                if u < x {
                    a = u;
                } else {
                    b = u;
                }
                if fu <= fw || w == x {
                    v = w;
                    w = u;
                    fv = fw;
                    fw = fu;
                } else if fu <= fv || v == x || v == w {
                    v = u;
                    fv = fu;
                }
            }
        }
        self.status = OptimizerStatus::MaxIterationsExceeded;
        Err(NumericsError::DidNotConverge {
            what: "Brent minimization",
            iterations: self.max_iterations,
        }
        .into())
    }
}

/// Brent's root finder: inverse quadratic interpolation with secant and
/// bisection fallbacks. The interval must bracket a sign change.
#[derive(Debug, Clone)]
pub struct BrentSolver {
    max_iterations: usize,
    status: OptimizerStatus,
}

impl Default for BrentSolver {
    fn default() -> Self {
        BrentSolver::new()
    }
}

impl BrentSolver {
    pub fn new() -> Self {
        BrentSolver {
            max_iterations: BRENT_MAX_ITERATIONS,
            status: OptimizerStatus::Initialized,
        }
    }

    pub fn status(&self) -> OptimizerStatus {
        self.status
    }

    /// Finds the root of `f` in `[lower, upper]` to within `tolerance`.
    /// Detecting a non-bracketing interval is the caller's job; a
    /// same-signed pair is reported as `InvalidArgument` without any
    /// re-bracketing attempt.
    pub fn solve<F, E>(
        &mut self,
        lower: f64,
        upper: f64,
        tolerance: f64,
        f: &mut F,
    ) -> std::result::Result<Root, E>
    where
        F: FnMut(f64) -> std::result::Result<f64, E>,
        E: From<NumericsError>,
    {
        const EPS: f64 = 3.0e-8;

        let mut a = lower;
        let mut b = upper;
        let mut fa = f(a)?;
        let mut fb = f(b)?;
        if (fa > 0.0 && fb > 0.0) || (fa < 0.0 && fb < 0.0) {
            return Err(NumericsError::invalid(format!(
                "root must be bracketed: f({}) = {} and f({}) = {} have the same sign",
                a, fa, b, fb
            ))
            .into());
        }
        self.status = OptimizerStatus::Iterating;

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for iteration in 1..=self.max_iterations {
            if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
            let tol1 = 2.0 * EPS * b.abs() + 0.5 * tolerance;
            let xm = 0.5 * (c - b);
            if xm.abs() <= tol1 || fb == 0.0 {
                self.status = OptimizerStatus::Converged;
                return Ok(Root {
                    x: b,
                    iterations: iteration,
                });
            }
            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                // attempt inverse quadratic interpolation
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();
                let min1 = 3.0 * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }
            a = b;
            fa = fb;
            if d.abs() > tol1 {
                b += d;
            } else {
                b += tol1.copysign(xm);
            }
            fb = f(b)?;
        }
        self.status = OptimizerStatus::MaxIterationsExceeded;
        Err(NumericsError::DidNotConverge {
            what: "Brent root finding",
            iterations: self.max_iterations,
        }
        .into())
    }
}
