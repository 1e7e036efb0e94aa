/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements definite integration of the interpolated function: composite Newton-Cotes
// rules and Romberg's method.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{NumericsError, Result};
use crate::interp::{Extrapolation, Interpolator};
use crate::romberg;

impl Interpolator {
    /// Integral over `[a, b]` by the composite trapezoidal rule, sampling at
    /// the data's native resolution.
    pub fn trapezoid_integral(&mut self, a: f64, b: f64) -> Result<f64> {
        let (f, h) = self.sample_for_integration(a, b, 2)?;
        let n = f.len();
        let interior: f64 = f[1..n - 1].iter().sum();
        Ok(h * (0.5 * f[0] + interior + 0.5 * f[n - 1]))
    }

    /// Integral over `[a, b]` by the composite Simpson 1/3 rule.
    pub fn simpson_3point_integral(&mut self, a: f64, b: f64) -> Result<f64> {
        let (f, h) = self.sample_for_integration(a, b, 3)?;
        let n = f.len();
        let mut sum = f[0] + f[n - 1];
        for (i, &fi) in f.iter().enumerate().take(n - 1).skip(1) {
            sum += if i % 2 == 1 { 4.0 * fi } else { 2.0 * fi };
        }
        Ok(h / 3.0 * sum)
    }

    /// Integral over `[a, b]` by the composite Simpson 3/8 rule.
    pub fn simpson_4point_integral(&mut self, a: f64, b: f64) -> Result<f64> {
        let (f, h) = self.sample_for_integration(a, b, 4)?;
        let n = f.len();
        let mut sum = f[0] + f[n - 1];
        for (i, &fi) in f.iter().enumerate().take(n - 1).skip(1) {
            sum += if i % 3 == 0 { 2.0 * fi } else { 3.0 * fi };
        }
        Ok(3.0 * h / 8.0 * sum)
    }

    /// Integral over `[a, b]` by the composite Boole rule.
    pub fn booles_rule_integral(&mut self, a: f64, b: f64) -> Result<f64> {
        let (f, h) = self.sample_for_integration(a, b, 5)?;
        let n = f.len();
        let mut sum = 7.0 * (f[0] + f[n - 1]);
        for (i, &fi) in f.iter().enumerate().take(n - 1).skip(1) {
            sum += match i % 4 {
                0 => 14.0 * fi,
                2 => 12.0 * fi,
                _ => 32.0 * fi,
            };
        }
        Ok(2.0 * h / 45.0 * sum)
    }

    /// Integral over `[a, b]` by Romberg's method: successive trapezoid
    /// refinement with polynomial extrapolation of the step size to zero.
    pub fn romberg_integral(&mut self, a: f64, b: f64) -> Result<f64> {
        self.check_integration_limits(a, b)?;
        let (value, _err) =
            romberg::integrate(a, b, &mut |t| self.evaluate_inner(t, Extrapolation::Error))?;
        Ok(value)
    }

    /// Samples the interpolated function uniformly over `[a, b]` for a
    /// composite rule needing `points` values per panel, growing the segment
    /// count to the next multiple of `points - 1`. Returns the samples and
    /// the spacing.
    fn sample_for_integration(&mut self, a: f64, b: f64, points: usize) -> Result<(Vec<f64>, f64)> {
        self.check_integration_limits(a, b)?;
        let panel = points - 1;
        let mut segments = self.len() - 1;
        while segments % panel != 0 {
            segments += 1;
        }
        let h = (b - a) / segments as f64;
        let f = (0..=segments)
            .map(|i| self.evaluate_inner(a + h * i as f64, Extrapolation::Error))
            .collect::<Result<Vec<f64>>>()?;
        Ok((f, h))
    }

    fn check_integration_limits(&mut self, a: f64, b: f64) -> Result<()> {
        if a >= b {
            return Err(NumericsError::invalid(format!(
                "integration limits are out of order: a = {} >= b = {}",
                a, b
            )));
        }
        for &v in &[a, b] {
            if !self.contains(v)? {
                let min = self.domain_min()?;
                let max = self.domain_max()?;
                return Err(NumericsError::OutOfDomain { value: v, min, max });
            }
        }
        Ok(())
    }
}
