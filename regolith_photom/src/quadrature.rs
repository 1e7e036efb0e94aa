/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements nested Romberg integration of photometric-model kernels over the illuminated
// hemisphere.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Model quadrature
//!
//! Integrates physically defined kernels of a [`PhotometricLaw`] over the
//! illuminated hemisphere: an outer Romberg run over azimuth wraps an inner
//! Romberg run over cosine-of-emission, so total kernel evaluations scale
//! with the square of the refinement stage count.
//!
//! All inputs travel down the call chain as immutable parameters; nothing is
//! stashed on the model between evaluations, so nested and repeated runs
//! cannot alias each other's state.

use regolith_numerics::romberg;

use crate::error::{PhotomError, Result};
use crate::photometry::{PhotometricLaw, DEG2RAD};

/// Derived trigonometry of one incidence angle, fixed for a quadrature run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterGeometry {
    incidence: f64,
    munot: f64,
    sini: f64,
}

impl ScatterGeometry {
    /// Builds the geometry for `incidence` degrees in [0, 90].
    pub fn from_incidence(incidence: f64) -> Result<Self> {
        if !(0.0..=90.0).contains(&incidence) {
            return Err(crate::error::PhotomError::parameter(
                "incidence",
                format!("incidence angle must be in [0, 90] degrees, got {}", incidence),
            ));
        }
        Ok(ScatterGeometry {
            incidence,
            munot: (incidence * DEG2RAD).cos(),
            sini: (incidence * DEG2RAD).sin(),
        })
    }

    pub fn incidence(&self) -> f64 {
        self.incidence
    }

    /// Cosine of the incidence angle.
    pub fn munot(&self) -> f64 {
        self.munot
    }

    /// Sine of the incidence angle.
    pub fn sini(&self) -> f64 {
        self.sini
    }
}

/// Atmospheric scattering parameters entering the anisotropic kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterParams {
    /// Normal optical depth of the atmosphere.
    pub tau: f64,
    /// Henyey-Greenstein asymmetry of the atmospheric particles.
    pub hga: f64,
}

/// Selects the physically defined kernel to integrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrand {
    /// Cosine-of-emission-weighted surface albedo; the hemispheric-albedo
    /// kernel.
    HemisphericAlbedo,
    /// Forward-scatter correction for light transmitted through the haze.
    TransmittedScatter,
    /// Scatter correction entering the bihemispheric (sbar) sum.
    BihemisphericScatter,
    /// Forward-scatter correction for directly attenuated light.
    DirectScatter,
}

/// Integrates the selected kernel over azimuth `[phi_lo, phi_hi]` (degrees),
/// each azimuth itself integrating over cosine-of-emission up to 1.
/// Normalization factors are the caller's concern.
pub fn romberg_over_model(
    law: &dyn PhotometricLaw,
    integrand: Integrand,
    geometry: ScatterGeometry,
    params: ScatterParams,
    phi_lo: f64,
    phi_hi: f64,
) -> Result<f64> {
    // the albedo kernel stays off mu = 0 where Minnaert-style laws with
    // fractional exponents blow up
    let mu_lo = match integrand {
        Integrand::HemisphericAlbedo => 1.0e-6,
        _ => 0.0,
    };
    let (value, _err) = romberg::integrate::<_, PhotomError>(phi_lo, phi_hi, &mut |phi: f64| {
        let cosphi = (phi * DEG2RAD).cos();
        let (inner, _err) = romberg::integrate::<_, PhotomError>(mu_lo, 1.0, &mut |mu: f64| {
            kernel(law, integrand, geometry, params, cosphi, mu)
        })?;
        Ok(inner)
    })?;
    Ok(value)
}

/// One kernel evaluation at cosine-of-emission `mu` and azimuth cosine
/// `cosphi`.
fn kernel(
    law: &dyn PhotometricLaw,
    integrand: Integrand,
    geometry: ScatterGeometry,
    params: ScatterParams,
    cosphi: f64,
    mu: f64,
) -> Result<f64> {
    let emission = mu.acos() / DEG2RAD;
    let sine = (emission * DEG2RAD).sin();
    // cosine of the phase angle from spherical trigonometry
    let alpha = (geometry.sini() * sine * cosphi + geometry.munot() * mu).clamp(-1.0, 1.0);

    if integrand == Integrand::HemisphericAlbedo {
        let phase = alpha.acos() / DEG2RAD;
        return Ok(mu * law.surface_albedo(phase, geometry.incidence(), emission)?);
    }

    // single-term Henyey-Greenstein phase function of the haze particles
    let hga = params.hga;
    let phasefn = (1.0 - hga * hga) / (1.0 + hga * hga + 2.0 * hga * alpha).powf(1.5);

    let emu = attenuation(params.tau, mu);
    let emunot = attenuation(params.tau, geometry.munot());
    // transmission factor, with the removable singularity at mu = munot
    let tfac = if (mu - geometry.munot()).abs() < 1.0e-10 {
        params.tau * emunot / (geometry.munot() * geometry.munot())
    } else {
        (emunot - emu) / (geometry.munot() - mu)
    };

    Ok(match integrand {
        Integrand::HemisphericAlbedo => unreachable!("handled above"),
        Integrand::TransmittedScatter => mu * (phasefn - 1.0) * tfac,
        Integrand::BihemisphericScatter => {
            geometry.munot() * mu * (phasefn - 1.0) * (1.0 - emunot * emu)
                / (geometry.munot() + mu)
        }
        Integrand::DirectScatter => -sine * cosphi * (phasefn - 1.0) * tfac,
    })
}

/// `exp(-tau / x)`, flushed to zero when the exponent underflows.
fn attenuation(tau: f64, x: f64) -> f64 {
    let xx = -tau / x.max(1.0e-30);
    if xx > -69.0 {
        xx.exp()
    } else {
        0.0
    }
}
