/////////////////////////////////////////////////////////////////////////////////////////////
//
// Builds the hemispheric-albedo and anisotropic-correction tables and their lookup splines.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use regolith_numerics::{Extrapolation, InterpScheme, Interpolator};

use crate::error::Result;
use crate::photometry::{PhotometricLaw, DEG2RAD};
use crate::progress::{ProgressMsg, ProgressSink};
use crate::quadrature::{romberg_over_model, Integrand, ScatterGeometry, ScatterParams};

/// Table rows: incidence 0-90 degrees at 1 degree steps.
pub const TABLE_SIZE: usize = 91;

/// Endpoint derivative magnitude pinning the lookup splines' clamped
/// boundaries to the natural form.
const SPLINE_ENDPOINT_DERIV: f64 = 1.0e30;

fn emit(progress: Option<&dyn ProgressSink>, msg: ProgressMsg) {
    if let Some(sink) = progress {
        sink.emit(msg);
    }
}

/// Builds a clamped-cubic lookup spline over a freshly computed table.
fn lookup_spline(incidence: &[f64], values: &[f64]) -> Result<Interpolator> {
    let mut spline = Interpolator::with_data(InterpScheme::CubicClamped, incidence, values)?;
    spline.set_clamped_endpoint_derivs(SPLINE_ENDPOINT_DERIV, SPLINE_ENDPOINT_DERIV)?;
    Ok(spline)
}

/// Hemispheric albedo per incidence angle, its lookup spline, and the
/// derived bihemispheric albedo.
#[derive(Debug, Clone)]
pub struct AhTable {
    incidence: Vec<f64>,
    values: Vec<f64>,
    spline: Interpolator,
    ab: f64,
}

impl AhTable {
    /// Integrates the surface photometric function times cosine-of-emission
    /// over the illuminated hemisphere at each tabulated incidence, using
    /// the law's closed form where one exists. The bihemispheric albedo is
    /// accumulated alongside by the trapezoid rule with half-weight
    /// endpoints.
    pub(crate) fn build(
        law: &dyn PhotometricLaw,
        params: ScatterParams,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<Self> {
        let mut incidence = Vec::with_capacity(TABLE_SIZE);
        let mut values = Vec::with_capacity(TABLE_SIZE);
        let mut ab = 0.0;

        for row in 0..TABLE_SIZE {
            let inc = row as f64;
            let geometry = ScatterGeometry::from_incidence(inc)?;
            let value = if inc == 90.0 {
                0.0
            } else if let Some(closed) = law.hemispheric_albedo(geometry.munot()) {
                closed
            } else {
                let raw = romberg_over_model(
                    law,
                    Integrand::HemisphericAlbedo,
                    geometry,
                    params,
                    0.0,
                    180.0,
                )?;
                // normalization with azimuth in degrees
                raw / (90.0 * geometry.munot())
            };
            incidence.push(inc);
            values.push(value);

            let factor = if row == 0 || row == TABLE_SIZE - 1 { 0.5 } else { 1.0 };
            ab += value * geometry.munot() * geometry.sini() * factor;

            emit(
                progress,
                ProgressMsg::TableRow {
                    table: "hemispheric_albedo",
                    incidence: inc,
                    progress: (row + 1) as f64 / TABLE_SIZE as f64,
                },
            );
        }
        ab *= 2.0 * std::f64::consts::PI / 180.0;

        let spline = lookup_spline(&incidence, &values)?;
        emit(progress, ProgressMsg::TableBuilt { table: "hemispheric_albedo" });
        Ok(AhTable {
            incidence,
            values,
            spline,
            ab,
        })
    }

    /// Tabulated hemispheric albedo values, one per degree of incidence.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn incidence(&self) -> &[f64] {
        &self.incidence
    }

    /// Bihemispheric albedo.
    pub fn ab(&self) -> f64 {
        self.ab
    }

    /// Spline lookup at arbitrary incidence; extrapolates past the table
    /// edges.
    pub fn interpolate(&mut self, incidence: f64) -> Result<f64> {
        Ok(self.spline.evaluate(incidence, Extrapolation::Extrapolate)?)
    }
}

/// Forward-scatter correction tables for the anisotropic atmospheric model:
/// transmitted light, directly attenuated light, and the scalar
/// bihemispheric correction.
#[derive(Debug, Clone)]
pub struct HahgTables {
    incidence: Vec<f64>,
    transmitted: Vec<f64>,
    direct: Vec<f64>,
    transmitted_spline: Interpolator,
    direct_spline: Interpolator,
    hahgsb: f64,
}

impl HahgTables {
    /// Integrates the three anisotropic correction kernels at each tabulated
    /// incidence. `wha` is the single-scattering albedo entering the
    /// normalization of every correction.
    pub(crate) fn build(
        law: &dyn PhotometricLaw,
        wha: f64,
        params: ScatterParams,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<Self> {
        let mut incidence = Vec::with_capacity(TABLE_SIZE);
        let mut transmitted = Vec::with_capacity(TABLE_SIZE);
        let mut direct = Vec::with_capacity(TABLE_SIZE);
        let mut hahgsb = 0.0;

        for row in 0..TABLE_SIZE {
            let inc = row as f64;
            let geometry = ScatterGeometry::from_incidence(inc)?;
            incidence.push(inc);

            let raw = romberg_over_model(
                law,
                Integrand::TransmittedScatter,
                geometry,
                params,
                0.0,
                180.0,
            )?;
            transmitted.push(raw * wha / 360.0);

            let raw = romberg_over_model(
                law,
                Integrand::BihemisphericScatter,
                geometry,
                params,
                0.0,
                180.0,
            )?;
            let factor = if row == 0 || row == TABLE_SIZE - 1 { 0.5 } else { 1.0 };
            hahgsb += geometry.sini() * factor * (raw * wha / 360.0);

            // the direct-attenuation kernel is odd in azimuth at normal
            // incidence, so the correction vanishes there
            if inc == 0.0 {
                direct.push(0.0);
            } else {
                let raw = romberg_over_model(
                    law,
                    Integrand::DirectScatter,
                    geometry,
                    params,
                    0.0,
                    180.0,
                )?;
                direct.push(raw * wha * geometry.munot() / (360.0 * geometry.sini()));
            }

            emit(
                progress,
                ProgressMsg::TableRow {
                    table: "anisotropic_corrections",
                    incidence: inc,
                    progress: (row + 1) as f64 / TABLE_SIZE as f64,
                },
            );
        }
        hahgsb *= 2.0 * std::f64::consts::PI / 180.0;

        let transmitted_spline = lookup_spline(&incidence, &transmitted)?;
        let direct_spline = lookup_spline(&incidence, &direct)?;
        emit(progress, ProgressMsg::TableBuilt { table: "anisotropic_corrections" });
        Ok(HahgTables {
            incidence,
            transmitted,
            direct,
            transmitted_spline,
            direct_spline,
            hahgsb,
        })
    }

    pub fn incidence(&self) -> &[f64] {
        &self.incidence
    }

    pub fn transmitted(&self) -> &[f64] {
        &self.transmitted
    }

    pub fn direct(&self) -> &[f64] {
        &self.direct
    }

    /// Scalar bihemispheric forward-scatter correction.
    pub fn hahgsb(&self) -> f64 {
        self.hahgsb
    }

    /// Spline lookup of the transmitted-light correction.
    pub fn interpolate_transmitted(&mut self, incidence: f64) -> Result<f64> {
        Ok(self
            .transmitted_spline
            .evaluate(incidence, Extrapolation::Extrapolate)?)
    }

    /// Spline lookup of the directly-attenuated-light correction.
    pub fn interpolate_direct(&mut self, incidence: f64) -> Result<f64> {
        Ok(self
            .direct_spline
            .evaluate(incidence, Extrapolation::Extrapolate)?)
    }
}
