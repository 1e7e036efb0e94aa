/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the built-in surface photometric laws.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{PhotomError, Result};
use crate::photometry::{LimbDarkeningLaw, PhotometricLaw, DEG2RAD};

fn past_limb(incidence: f64, emission: f64) -> bool {
    incidence >= 90.0 || emission >= 90.0
}

/// Lambert: albedo proportional to the cosine of incidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lambert;

impl PhotometricLaw for Lambert {
    fn name(&self) -> &'static str {
        "lambert"
    }

    fn surface_albedo(&self, _phase: f64, incidence: f64, emission: f64) -> Result<f64> {
        if past_limb(incidence, emission) {
            return Ok(0.0);
        }
        Ok((incidence * DEG2RAD).cos())
    }

    fn hemispheric_albedo(&self, _munot: f64) -> Option<f64> {
        Some(1.0)
    }
}

/// Lommel-Seeliger: single-scattering law for dark surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LommelSeeliger;

impl PhotometricLaw for LommelSeeliger {
    fn name(&self) -> &'static str {
        "lommel_seeliger"
    }

    fn surface_albedo(&self, _phase: f64, incidence: f64, emission: f64) -> Result<f64> {
        if past_limb(incidence, emission) {
            return Ok(0.0);
        }
        let munot = (incidence * DEG2RAD).cos();
        let mu = (emission * DEG2RAD).cos();
        Ok(2.0 * munot / (munot + mu))
    }

    fn hemispheric_albedo(&self, munot: f64) -> Option<f64> {
        Some(2.0 * ((1.0 + munot) / munot).ln())
    }
}

/// Minnaert: albedo `munot^k * mu^(k-1)` with exponent `k > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minnaert {
    k: f64,
}

impl Minnaert {
    pub fn new(k: f64) -> Result<Self> {
        if k <= 0.0 {
            return Err(PhotomError::parameter(
                "k",
                format!("Minnaert exponent must be positive, got {}", k),
            ));
        }
        Ok(Minnaert { k })
    }

    pub fn k(&self) -> f64 {
        self.k
    }
}

impl PhotometricLaw for Minnaert {
    fn name(&self) -> &'static str {
        "minnaert"
    }

    fn surface_albedo(&self, _phase: f64, incidence: f64, emission: f64) -> Result<f64> {
        if past_limb(incidence, emission) {
            return Ok(0.0);
        }
        let munot = (incidence * DEG2RAD).cos();
        let mu = (emission * DEG2RAD).cos();
        Ok(munot.powf(self.k) * mu.powf(self.k - 1.0))
    }

    fn hemispheric_albedo(&self, munot: f64) -> Option<f64> {
        // the closed form holds only at normal incidence; other incidences
        // go through the quadrature engine
        if munot == 1.0 {
            Some(1.0 / self.k)
        } else {
            None
        }
    }
}

impl LimbDarkeningLaw for Minnaert {
    fn limb_darkening(&self) -> f64 {
        self.k
    }

    fn set_limb_darkening(&mut self, value: f64) -> Result<()> {
        if value <= 0.0 {
            return Err(PhotomError::parameter(
                "k",
                format!("Minnaert exponent must be positive, got {}", value),
            ));
        }
        self.k = value;
        Ok(())
    }
}

/// Lunar-Lambert: weighted blend of Lommel-Seeliger and Lambert behavior
/// controlled by the limb-darkening parameter `l`. `l = 0` is Lambert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarLambert {
    l: f64,
}

impl LunarLambert {
    pub fn new(l: f64) -> Result<Self> {
        Ok(LunarLambert { l })
    }

    pub fn l(&self) -> f64 {
        self.l
    }
}

impl PhotometricLaw for LunarLambert {
    fn name(&self) -> &'static str {
        "lunar_lambert"
    }

    fn surface_albedo(&self, _phase: f64, incidence: f64, emission: f64) -> Result<f64> {
        if past_limb(incidence, emission) {
            return Ok(0.0);
        }
        let munot = (incidence * DEG2RAD).cos();
        let mu = (emission * DEG2RAD).cos();
        Ok(2.0 * self.l * munot / (munot + mu) + (1.0 - self.l) * munot)
    }

    fn hemispheric_albedo(&self, munot: f64) -> Option<f64> {
        Some(2.0 * self.l * ((1.0 + munot) / munot).ln() + 1.0 - self.l)
    }
}

impl LimbDarkeningLaw for LunarLambert {
    fn limb_darkening(&self) -> f64 {
        self.l
    }

    fn set_limb_darkening(&mut self, value: f64) -> Result<()> {
        self.l = value;
        Ok(())
    }
}

/// Hapke model with a two-term Henyey-Greenstein single-particle phase
/// function and an opposition surge, without macroscopic roughness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapkeHenyey {
    wh: f64,
    hg1: f64,
    hg2: f64,
    b0: f64,
    hh: f64,
}

impl HapkeHenyey {
    /// `wh` is the single-scattering albedo in (0, 1]; `hg1` the asymmetry
    /// in (-1, 1); `hg2` the back-scatter fraction in [0, 1]; `b0 >= 0` the
    /// opposition surge amplitude and `hh > 0` its angular width.
    pub fn new(wh: f64, hg1: f64, hg2: f64, b0: f64, hh: f64) -> Result<Self> {
        if wh <= 0.0 || wh > 1.0 {
            return Err(PhotomError::parameter(
                "wh",
                format!("single-scattering albedo must be in (0, 1], got {}", wh),
            ));
        }
        if hg1 <= -1.0 || hg1 >= 1.0 {
            return Err(PhotomError::parameter(
                "hg1",
                format!("asymmetry parameter must be in (-1, 1), got {}", hg1),
            ));
        }
        if !(0.0..=1.0).contains(&hg2) {
            return Err(PhotomError::parameter(
                "hg2",
                format!("back-scatter fraction must be in [0, 1], got {}", hg2),
            ));
        }
        if b0 < 0.0 {
            return Err(PhotomError::parameter(
                "b0",
                format!("opposition surge amplitude must be non-negative, got {}", b0),
            ));
        }
        if hh <= 0.0 {
            return Err(PhotomError::parameter(
                "hh",
                format!("opposition surge width must be positive, got {}", hh),
            ));
        }
        Ok(HapkeHenyey { wh, hg1, hg2, b0, hh })
    }

    /// Two-term Henyey-Greenstein phase function at phase angle `g` degrees.
    fn phase_function(&self, g: f64) -> f64 {
        let cosg = (g * DEG2RAD).cos();
        let gsq = self.hg1 * self.hg1;
        (1.0 - self.hg2) * (1.0 - gsq) / (1.0 + gsq + 2.0 * self.hg1 * cosg).powf(1.5)
            + self.hg2 * (1.0 - gsq) / (1.0 + gsq - 2.0 * self.hg1 * cosg).powf(1.5)
    }

    /// Chandrasekhar H-function approximation.
    fn h(&self, x: f64) -> f64 {
        (1.0 + 2.0 * x) / (1.0 + 2.0 * x * (1.0 - self.wh).sqrt())
    }

    /// Opposition surge at phase angle `g` degrees.
    fn surge(&self, g: f64) -> f64 {
        if self.b0 == 0.0 {
            return 0.0;
        }
        self.b0 / (1.0 + (0.5 * g * DEG2RAD).tan() / self.hh)
    }
}

impl PhotometricLaw for HapkeHenyey {
    fn name(&self) -> &'static str {
        "hapke_henyey"
    }

    fn surface_albedo(&self, phase: f64, incidence: f64, emission: f64) -> Result<f64> {
        if past_limb(incidence, emission) {
            return Ok(0.0);
        }
        let munot = (incidence * DEG2RAD).cos();
        let mu = (emission * DEG2RAD).cos();
        let p = self.phase_function(phase);
        let b = self.surge(phase);
        Ok(self.wh / 4.0 * munot / (munot + mu)
            * ((1.0 + b) * p + self.h(munot) * self.h(mu) - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lambert_is_cosine_of_incidence() {
        let law = Lambert;
        assert_relative_eq!(law.surface_albedo(10.0, 0.0, 30.0).unwrap(), 1.0);
        assert_relative_eq!(
            law.surface_albedo(10.0, 60.0, 30.0).unwrap(),
            0.5,
            epsilon = 1e-12
        );
        assert_eq!(law.surface_albedo(10.0, 90.0, 30.0).unwrap(), 0.0);
        assert_eq!(law.hemispheric_albedo(0.7), Some(1.0));
    }

    #[test]
    fn lunar_lambert_reduces_to_lambert_at_zero() {
        let blend = LunarLambert::new(0.0).unwrap();
        let lambert = Lambert;
        for &(inc, ema) in &[(0.0, 0.0), (30.0, 45.0), (75.0, 10.0)] {
            assert_relative_eq!(
                blend.surface_albedo(20.0, inc, ema).unwrap(),
                lambert.surface_albedo(20.0, inc, ema).unwrap(),
                epsilon = 1e-12
            );
        }
        assert_relative_eq!(blend.hemispheric_albedo(0.5).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn lunar_lambert_reduces_to_lommel_seeliger_at_one() {
        let blend = LunarLambert::new(1.0).unwrap();
        let ls = LommelSeeliger;
        assert_relative_eq!(
            blend.surface_albedo(20.0, 30.0, 45.0).unwrap(),
            ls.surface_albedo(20.0, 30.0, 45.0).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn minnaert_closed_form_only_at_normal_incidence() {
        let law = Minnaert::new(0.7).unwrap();
        assert_relative_eq!(law.hemispheric_albedo(1.0).unwrap(), 1.0 / 0.7, epsilon = 1e-12);
        assert_eq!(law.hemispheric_albedo(0.9), None);
        // k = 1 is Lambert
        let unit = Minnaert::new(1.0).unwrap();
        assert_relative_eq!(
            unit.surface_albedo(5.0, 40.0, 25.0).unwrap(),
            (40.0 * DEG2RAD).cos(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn minnaert_rejects_non_positive_exponent() {
        assert!(matches!(
            Minnaert::new(0.0),
            Err(PhotomError::InvalidParameter { .. })
        ));
        let mut law = Minnaert::new(0.5).unwrap();
        assert!(law.set_limb_darkening(-0.1).is_err());
        assert_relative_eq!(law.limb_darkening(), 0.5);
    }

    #[test]
    fn hapke_parameter_ranges_are_enforced() {
        assert!(HapkeHenyey::new(0.52, 0.213, 0.1, 0.0, 0.1).is_ok());
        assert!(HapkeHenyey::new(0.0, 0.2, 0.1, 0.0, 0.1).is_err());
        assert!(HapkeHenyey::new(0.5, 1.0, 0.1, 0.0, 0.1).is_err());
        assert!(HapkeHenyey::new(0.5, 0.2, 1.5, 0.0, 0.1).is_err());
        assert!(HapkeHenyey::new(0.5, 0.2, 0.1, -1.0, 0.1).is_err());
        assert!(HapkeHenyey::new(0.5, 0.2, 0.1, 0.0, 0.0).is_err());
    }

    #[test]
    fn hapke_albedo_is_finite_and_positive_over_the_hemisphere() {
        let law = HapkeHenyey::new(0.52, 0.213, 0.1, 1.0, 0.06).unwrap();
        for inc in [0.0, 20.0, 45.0, 70.0, 89.0] {
            for ema in [0.0, 30.0, 60.0, 89.0] {
                let v = law.surface_albedo(30.0, inc, ema).unwrap();
                assert!(v.is_finite() && v >= 0.0, "inc={} ema={} v={}", inc, ema, v);
            }
        }
        assert_eq!(law.hemispheric_albedo(0.8), None);
    }
}
