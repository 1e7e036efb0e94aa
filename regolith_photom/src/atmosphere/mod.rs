/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the atmospheric radiative-transfer model: parameter management, standard
// conditions, and memoized table generation.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Atmospheric radiative-transfer tables
//!
//! [`AtmosphereModel`] owns a surface [`PhotometricLaw`] and the atmospheric
//! scattering parameters, and builds incidence-indexed tables of hemispheric
//! albedo and anisotropic forward-scatter corrections with clamped-cubic
//! lookup splines. Tables are rebuilt only when the optical depth or
//! single-scattering albedo has changed since the previous build; every
//! accessor that consumes a table goes through the rebuild check, so callers
//! cannot observe a stale table by mutating parameters between lookups.
//!
//! Single-threaded use only: lookups take `&mut self` because they may
//! rebuild tables and populate spline caches.

pub mod tables;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PhotomError, Result};
use crate::photometry::PhotometricLaw;
use crate::progress::ProgressSink;
use crate::quadrature::ScatterParams;
use tables::{AhTable, HahgTables};

/// Atmospheric parameters read once from the caller's key/value store.
///
/// Reference values (`tauref`, `wharef`, `bharef`, `hgaref`) are the
/// standard conditions the image is normalized to; they default to matching
/// the working values where the working value has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereSettings {
    /// Normal optical depth of the atmosphere.
    pub tau: f64,
    /// Reference optical depth.
    pub tauref: f64,
    /// Single-scattering albedo of atmospheric particles.
    pub wha: f64,
    /// Reference single-scattering albedo.
    pub wharef: f64,
    /// Coefficient of the single-particle Legendre phase function.
    pub bha: f64,
    /// Reference Legendre coefficient.
    pub bharef: f64,
    /// Coefficient of the single-particle Henyey-Greenstein phase function.
    pub hga: f64,
    /// Reference Henyey-Greenstein coefficient.
    pub hgaref: f64,
    /// Atmospheric shell thickness normalized to the planetary radius.
    pub hnorm: f64,
    /// Whether fits against this model include an additive offset term.
    pub additive_offset: bool,
    /// Whether negative values after atmospheric removal are nulled.
    pub null_negative: bool,
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        AtmosphereSettings {
            tau: 0.28,
            tauref: 0.0,
            wha: 0.95,
            wharef: 0.95,
            bha: 0.85,
            bharef: 0.85,
            hga: 0.68,
            hgaref: 0.68,
            hnorm: 0.003,
            additive_offset: false,
            null_negative: false,
        }
    }
}

/// Working parameter values saved while standard conditions are active.
#[derive(Debug, Clone, Copy)]
struct SavedParams {
    tau: f64,
    wha: f64,
    bha: f64,
    hga: f64,
}

/// The atmospheric model: a surface law plus scattering parameters plus
/// memoized radiative-transfer tables.
#[derive(Debug)]
pub struct AtmosphereModel {
    law: Box<dyn PhotometricLaw>,

    tau: f64,
    wha: f64,
    bha: f64,
    hga: f64,
    tauref: f64,
    wharef: f64,
    bharef: f64,
    hgaref: f64,
    hnorm: f64,
    additive_offset: bool,
    null_negative: bool,

    standard_conditions: bool,
    saved: Option<SavedParams>,

    // parameter values the current tables were built from
    tau_old: Option<f64>,
    wha_old: Option<f64>,
    ah: Option<AhTable>,
    hahg: Option<HahgTables>,

    progress: Option<Arc<dyn ProgressSink>>,
}

impl AtmosphereModel {
    /// Builds the model over `law`, validating every parameter range.
    pub fn new(law: Box<dyn PhotometricLaw>, settings: &AtmosphereSettings) -> Result<Self> {
        let mut model = AtmosphereModel {
            law,
            tau: 0.0,
            wha: 1.0,
            bha: 0.0,
            hga: 0.0,
            tauref: 0.0,
            wharef: 1.0,
            bharef: 0.0,
            hgaref: 0.0,
            hnorm: 0.0,
            additive_offset: settings.additive_offset,
            null_negative: settings.null_negative,
            standard_conditions: false,
            saved: None,
            tau_old: None,
            wha_old: None,
            ah: None,
            hahg: None,
            progress: None,
        };
        model.set_tau(settings.tau)?;
        model.set_wha(settings.wha)?;
        model.set_bha(settings.bha)?;
        model.set_hga(settings.hga)?;
        model.tauref = check_tau("tauref", settings.tauref)?;
        model.wharef = check_wha("wharef", settings.wharef)?;
        model.bharef = check_bha("bharef", settings.bharef)?;
        model.hgaref = check_hga("hgaref", settings.hgaref)?;
        model.hnorm = check_non_negative("hnorm", settings.hnorm)?;
        Ok(model)
    }

    /// Attaches a progress sink receiving table-generation events.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn law(&self) -> &dyn PhotometricLaw {
        self.law.as_ref()
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn wha(&self) -> f64 {
        self.wha
    }

    pub fn bha(&self) -> f64 {
        self.bha
    }

    pub fn hga(&self) -> f64 {
        self.hga
    }

    pub fn hnorm(&self) -> f64 {
        self.hnorm
    }

    pub fn additive_offset(&self) -> bool {
        self.additive_offset
    }

    pub fn null_negative(&self) -> bool {
        self.null_negative
    }

    pub fn standard_conditions(&self) -> bool {
        self.standard_conditions
    }

    /// Sets the normal optical depth, `tau >= 0`.
    pub fn set_tau(&mut self, tau: f64) -> Result<()> {
        self.tau = check_tau("tau", tau)?;
        Ok(())
    }

    /// Sets the single-scattering albedo, `wha` in (0, 1].
    pub fn set_wha(&mut self, wha: f64) -> Result<()> {
        self.wha = check_wha("wha", wha)?;
        Ok(())
    }

    /// Sets the Legendre phase-function coefficient, `bha` in [-1, 1].
    pub fn set_bha(&mut self, bha: f64) -> Result<()> {
        self.bha = check_bha("bha", bha)?;
        Ok(())
    }

    /// Sets the Henyey-Greenstein asymmetry, `hga` in (-1, 1).
    pub fn set_hga(&mut self, hga: f64) -> Result<()> {
        self.hga = check_hga("hga", hga)?;
        Ok(())
    }

    /// Toggles standard conditions: substitutes the reference values for the
    /// working parameters, saving the working set for restoration. Enabling
    /// twice without disabling keeps the original saved set.
    pub fn set_standard_conditions(&mut self, standard: bool) {
        if standard == self.standard_conditions {
            return;
        }
        self.standard_conditions = standard;
        if standard {
            self.saved = Some(SavedParams {
                tau: self.tau,
                wha: self.wha,
                bha: self.bha,
                hga: self.hga,
            });
            self.tau = self.tauref;
            self.wha = self.wharef;
            self.bha = self.bharef;
            self.hga = self.hgaref;
        } else if let Some(saved) = self.saved.take() {
            self.tau = saved.tau;
            self.wha = saved.wha;
            self.bha = saved.bha;
            self.hga = saved.hga;
        }
    }

    /// Whether tau or wha has changed since the tables were last built.
    pub fn tau_or_wha_changed(&self) -> bool {
        self.tau_old != Some(self.tau) || self.wha_old != Some(self.wha)
    }

    fn scatter_params(&self) -> ScatterParams {
        ScatterParams {
            tau: self.tau,
            hga: self.hga,
        }
    }

    /// Rebuilds the tables if tau or wha changed since the last build.
    fn ensure_tables(&mut self) -> Result<()> {
        if self.ah.is_some() && !self.tau_or_wha_changed() {
            return Ok(());
        }
        let progress = self.progress.as_deref();
        let params = self.scatter_params();
        self.ah = Some(AhTable::build(self.law.as_ref(), params, progress)?);
        self.hahg = Some(HahgTables::build(
            self.law.as_ref(),
            self.wha,
            params,
            progress,
        )?);
        self.tau_old = Some(self.tau);
        self.wha_old = Some(self.wha);
        Ok(())
    }

    /// The hemispheric-albedo table, rebuilt first if stale.
    pub fn ah_table(&mut self) -> Result<&AhTable> {
        self.ensure_tables()?;
        Ok(self.ah.as_ref().unwrap_or_else(|| unreachable!("built by ensure_tables")))
    }

    /// The anisotropic correction tables, rebuilt first if stale.
    pub fn hahg_tables(&mut self) -> Result<&HahgTables> {
        self.ensure_tables()?;
        Ok(self
            .hahg
            .as_ref()
            .unwrap_or_else(|| unreachable!("built by ensure_tables")))
    }

    /// Spline lookup of the hemispheric albedo at `incidence` degrees.
    pub fn hemispheric_albedo(&mut self, incidence: f64) -> Result<f64> {
        self.ensure_tables()?;
        self.ah
            .as_mut()
            .unwrap_or_else(|| unreachable!("built by ensure_tables"))
            .interpolate(incidence)
    }

    /// Bihemispheric albedo of the current tables.
    pub fn bihemispheric_albedo(&mut self) -> Result<f64> {
        Ok(self.ah_table()?.ab())
    }

    /// Spline lookup of the transmitted-light correction.
    pub fn transmitted_correction(&mut self, incidence: f64) -> Result<f64> {
        self.ensure_tables()?;
        self.hahg
            .as_mut()
            .unwrap_or_else(|| unreachable!("built by ensure_tables"))
            .interpolate_transmitted(incidence)
    }

    /// Spline lookup of the directly-attenuated-light correction.
    pub fn direct_correction(&mut self, incidence: f64) -> Result<f64> {
        self.ensure_tables()?;
        self.hahg
            .as_mut()
            .unwrap_or_else(|| unreachable!("built by ensure_tables"))
            .interpolate_direct(incidence)
    }

    /// Scalar bihemispheric forward-scatter correction.
    pub fn bihemispheric_correction(&mut self) -> Result<f64> {
        Ok(self.hahg_tables()?.hahgsb())
    }
}

fn check_tau(name: &'static str, tau: f64) -> Result<f64> {
    if tau < 0.0 {
        return Err(PhotomError::parameter(
            name,
            format!("optical depth must be non-negative, got {}", tau),
        ));
    }
    Ok(tau)
}

fn check_wha(name: &'static str, wha: f64) -> Result<f64> {
    if wha <= 0.0 || wha > 1.0 {
        return Err(PhotomError::parameter(
            name,
            format!("single-scattering albedo must be in (0, 1], got {}", wha),
        ));
    }
    Ok(wha)
}

fn check_bha(name: &'static str, bha: f64) -> Result<f64> {
    if !(-1.0..=1.0).contains(&bha) {
        return Err(PhotomError::parameter(
            name,
            format!("Legendre coefficient must be in [-1, 1], got {}", bha),
        ));
    }
    Ok(bha)
}

fn check_hga(name: &'static str, hga: f64) -> Result<f64> {
    if hga <= -1.0 || hga >= 1.0 {
        return Err(PhotomError::parameter(
            name,
            format!("Henyey-Greenstein asymmetry must be in (-1, 1), got {}", hga),
        ));
    }
    Ok(hga)
}

fn check_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value < 0.0 {
        return Err(PhotomError::parameter(
            name,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::laws::{Lambert, LunarLambert, Minnaert};
    use approx::assert_relative_eq;

    fn lambert_model() -> AtmosphereModel {
        AtmosphereModel::new(Box::new(Lambert), &AtmosphereSettings::default()).unwrap()
    }

    #[test]
    fn parameter_ranges_are_enforced() {
        let mut model = lambert_model();
        assert!(model.set_tau(-0.1).is_err());
        assert!(model.set_wha(0.0).is_err());
        assert!(model.set_wha(1.1).is_err());
        assert!(model.set_bha(-1.5).is_err());
        assert!(model.set_hga(1.0).is_err());
        // working values unchanged after rejected sets
        assert_relative_eq!(model.tau(), 0.28);
        assert_relative_eq!(model.wha(), 0.95);

        let bad = AtmosphereSettings {
            wharef: 0.0,
            ..AtmosphereSettings::default()
        };
        assert!(AtmosphereModel::new(Box::new(Lambert), &bad).is_err());
    }

    #[test]
    fn lambert_ah_table_is_unity_off_the_limb() {
        let mut model = lambert_model();
        let table = model.ah_table().unwrap();
        assert_eq!(table.values().len(), tables::TABLE_SIZE);
        for (row, &v) in table.values().iter().enumerate() {
            if row == 90 {
                assert_eq!(v, 0.0);
            } else {
                assert_eq!(v, 1.0);
            }
        }
    }

    #[test]
    fn lambert_bihemispheric_albedo_is_near_unity() {
        // trapezoid sum of cos*sin over 1-degree steps, times 2*pi/180
        let mut model = lambert_model();
        let ab = model.bihemispheric_albedo().unwrap();
        assert_relative_eq!(ab, 1.0, max_relative = 1e-3);
    }

    #[test]
    fn minnaert_table_mixes_closed_form_and_quadrature() {
        let k = 2.0;
        let law = Minnaert::new(k).unwrap();
        let mut model =
            AtmosphereModel::new(Box::new(law), &AtmosphereSettings::default()).unwrap();
        let table = model.ah_table().unwrap();
        // closed form at normal incidence
        assert_relative_eq!(table.values()[0], 1.0 / k, epsilon = 1e-12);
        // quadrature elsewhere
        let munot = (45.0f64 * crate::photometry::DEG2RAD).cos();
        assert_relative_eq!(
            table.values()[45],
            2.0 * munot.powf(k - 1.0) / (k + 1.0),
            max_relative = 1e-5
        );
    }

    #[test]
    fn tables_are_memoized_on_tau_and_wha() {
        let mut model = lambert_model();
        model.ah_table().unwrap();
        assert!(!model.tau_or_wha_changed());

        // bha/hga changes do not invalidate
        model.set_bha(0.5).unwrap();
        model.set_hga(0.1).unwrap();
        assert!(!model.tau_or_wha_changed());

        model.set_tau(0.5).unwrap();
        assert!(model.tau_or_wha_changed());
        model.ah_table().unwrap();
        assert!(!model.tau_or_wha_changed());

        model.set_wha(0.8).unwrap();
        assert!(model.tau_or_wha_changed());
    }

    #[test]
    fn standard_conditions_swap_and_restore() {
        let settings = AtmosphereSettings {
            tau: 0.3,
            tauref: 0.0,
            wha: 0.9,
            wharef: 0.95,
            ..AtmosphereSettings::default()
        };
        let mut model = AtmosphereModel::new(Box::new(Lambert), &settings).unwrap();
        model.set_standard_conditions(true);
        assert_relative_eq!(model.tau(), 0.0);
        assert_relative_eq!(model.wha(), 0.95);
        // enabling again is a no-op, not a double save
        model.set_standard_conditions(true);
        model.set_standard_conditions(false);
        assert_relative_eq!(model.tau(), 0.3);
        assert_relative_eq!(model.wha(), 0.9);
    }

    #[test]
    fn spline_lookup_tracks_the_table() {
        let law = LunarLambert::new(0.4).unwrap();
        let mut model =
            AtmosphereModel::new(Box::new(law), &AtmosphereSettings::default()).unwrap();
        // at a tabulated incidence the spline reproduces the table entry
        let expected = model.ah_table().unwrap().values()[30];
        assert_relative_eq!(
            model.hemispheric_albedo(30.0).unwrap(),
            expected,
            epsilon = 1e-9
        );
        // between rows it stays within the neighbors' range
        let lo = model.ah_table().unwrap().values()[31];
        let hi = model.ah_table().unwrap().values()[30];
        let mid = model.hemispheric_albedo(30.5).unwrap();
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        assert!(mid >= lo - 1e-6 && mid <= hi + 1e-6);
    }

    #[test]
    fn anisotropic_corrections_vanish_without_optical_depth() {
        let settings = AtmosphereSettings {
            tau: 0.0,
            ..AtmosphereSettings::default()
        };
        let mut model = AtmosphereModel::new(Box::new(Lambert), &settings).unwrap();
        // zero optical depth kills both attenuation factors
        let t = model.transmitted_correction(30.0).unwrap();
        let d = model.direct_correction(30.0).unwrap();
        assert_relative_eq!(t, 0.0, epsilon = 1e-9);
        assert_relative_eq!(d, 0.0, epsilon = 1e-9);
    }
}
