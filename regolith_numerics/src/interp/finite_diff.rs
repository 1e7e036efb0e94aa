/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements finite-difference derivative estimates over the interpolated function.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{NumericsError, Result};
use crate::interp::{Extrapolation, Interpolator};

impl Interpolator {
    /// First derivative at `a` by an n-point backward difference, n in
    /// {2, 3}, with stencil spacing `h`. Every stencil point must lie inside
    /// the data domain.
    pub fn backward_first_difference(&mut self, a: f64, n: usize, h: f64) -> Result<f64> {
        self.check_stencil(a, a - (n as f64 - 1.0) * h)?;
        match n {
            2 => {
                let f = self.stencil_values(a, &[-1.0, 0.0], h)?;
                Ok((-f[0] + f[1]) / h)
            }
            3 => {
                let f = self.stencil_values(a, &[-2.0, -1.0, 0.0], h)?;
                Ok((f[0] - 4.0 * f[1] + 3.0 * f[2]) / (2.0 * h))
            }
            _ => Err(NumericsError::invalid(format!(
                "backward first difference supports 2 or 3 points, not {}",
                n
            ))),
        }
    }

    /// First derivative at `a` by an n-point forward difference, n in {2, 3}.
    pub fn forward_first_difference(&mut self, a: f64, n: usize, h: f64) -> Result<f64> {
        self.check_stencil(a, a + (n as f64 - 1.0) * h)?;
        match n {
            2 => {
                let f = self.stencil_values(a, &[0.0, 1.0], h)?;
                Ok((-f[0] + f[1]) / h)
            }
            3 => {
                let f = self.stencil_values(a, &[0.0, 1.0, 2.0], h)?;
                Ok((-3.0 * f[0] + 4.0 * f[1] - f[2]) / (2.0 * h))
            }
            _ => Err(NumericsError::invalid(format!(
                "forward first difference supports 2 or 3 points, not {}",
                n
            ))),
        }
    }

    /// First derivative at `a` by an n-point centered difference, n in
    /// {3, 5}.
    pub fn center_first_difference(&mut self, a: f64, n: usize, h: f64) -> Result<f64> {
        let half = ((n - 1) / 2) as f64;
        self.check_stencil(a - half * h, a + half * h)?;
        match n {
            3 => {
                let f = self.stencil_values(a, &[-1.0, 0.0, 1.0], h)?;
                Ok((-f[0] + f[2]) / (2.0 * h))
            }
            5 => {
                let f = self.stencil_values(a, &[-2.0, -1.0, 0.0, 1.0, 2.0], h)?;
                Ok((f[0] - 8.0 * f[1] + 8.0 * f[3] - f[4]) / (12.0 * h))
            }
            _ => Err(NumericsError::invalid(format!(
                "center first difference supports 3 or 5 points, not {}",
                n
            ))),
        }
    }

    /// Second derivative at `a` by a 3-point backward difference.
    pub fn backward_second_difference(&mut self, a: f64, n: usize, h: f64) -> Result<f64> {
        self.check_stencil(a, a - (n as f64 - 1.0) * h)?;
        match n {
            3 => {
                let f = self.stencil_values(a, &[-2.0, -1.0, 0.0], h)?;
                Ok((f[0] - 2.0 * f[1] + f[2]) / (h * h))
            }
            _ => Err(NumericsError::invalid(format!(
                "backward second difference supports 3 points, not {}",
                n
            ))),
        }
    }

    /// Second derivative at `a` by a 3-point forward difference.
    pub fn forward_second_difference(&mut self, a: f64, n: usize, h: f64) -> Result<f64> {
        self.check_stencil(a, a + (n as f64 - 1.0) * h)?;
        match n {
            3 => {
                let f = self.stencil_values(a, &[0.0, 1.0, 2.0], h)?;
                Ok((f[0] - 2.0 * f[1] + f[2]) / (h * h))
            }
            _ => Err(NumericsError::invalid(format!(
                "forward second difference supports 3 points, not {}",
                n
            ))),
        }
    }

    /// Second derivative at `a` by an n-point centered difference, n in
    /// {3, 5}.
    pub fn center_second_difference(&mut self, a: f64, n: usize, h: f64) -> Result<f64> {
        let half = ((n - 1) / 2) as f64;
        self.check_stencil(a - half * h, a + half * h)?;
        match n {
            3 => {
                let f = self.stencil_values(a, &[-1.0, 0.0, 1.0], h)?;
                Ok((f[0] - 2.0 * f[1] + f[2]) / (h * h))
            }
            5 => {
                let f = self.stencil_values(a, &[-2.0, -1.0, 0.0, 1.0, 2.0], h)?;
                Ok((-f[0] + 16.0 * f[1] - 30.0 * f[2] + 16.0 * f[3] - f[4]) / (12.0 * h * h))
            }
            _ => Err(NumericsError::invalid(format!(
                "center second difference supports 3 or 5 points, not {}",
                n
            ))),
        }
    }

    fn check_stencil(&mut self, near: f64, far: f64) -> Result<()> {
        for &v in &[near, far] {
            if !self.contains(v)? {
                let min = self.domain_min()?;
                let max = self.domain_max()?;
                return Err(NumericsError::OutOfDomain { value: v, min, max });
            }
        }
        Ok(())
    }

    fn stencil_values(&mut self, a: f64, offsets: &[f64], h: f64) -> Result<Vec<f64>> {
        offsets
            .iter()
            .map(|&k| self.evaluate_inner(a + k * h, Extrapolation::Error))
            .collect()
    }
}
