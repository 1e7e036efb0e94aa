/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for photometric modelling and fitting.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Photometric modelling of planetary regolith.
//!
//! This crate models how a particulate planetary surface reflects light and
//! fits simple empirical photometric laws to physically grounded reference
//! models. It provides:
//!
//! - **Photometric laws** - Lambert, Lommel-Seeliger, Minnaert,
//!   Lunar-Lambert, and a Hapke model with a two-term Henyey-Greenstein
//!   phase function and opposition surge, behind the polymorphic
//!   [`PhotometricLaw`] capability with a name-based [`LawRegistry`].
//! - **Radiative-transfer tables** - hemispheric and bihemispheric albedo
//!   and anisotropic forward-scatter corrections, integrated by nested
//!   Romberg quadrature over the illuminated hemisphere and served through
//!   clamped-cubic lookup splines by [`AtmosphereModel`].
//! - **Empirical-model fitting** - hemisphere grids of reference radiances
//!   over randomly tilted facets, linear least-squares comparison, and a
//!   bracketed Brent search over the limb-darkening parameter.
//! - **Reports and tables** - versioned JSON fit reports and delimited
//!   measurement tables.
//!
//! The numerical kernels (interpolation, Romberg integration, special
//! functions, 1-D optimization) live in the companion
//! [`regolith_numerics`] crate.
//!
//! # Examples
//!
//! ```
//! use regolith_photom::fit::{fit_limb_darkening, Datum, FitOutcome, HemisphereGrid};
//! use regolith_photom::photometry::laws::{Lambert, LunarLambert};
//!
//! // Synthesize a reference grid from a Lambert surface at 30 degrees phase
//! let datum = Datum {
//!     phase: 30.0,
//!     incidence: 30.0,
//!     emission: 0.0,
//!     rms_slope: 20.0,
//! };
//! let grid = HemisphereGrid::synthesize(&Lambert, &datum, Some(42))?;
//!
//! // Fit the Lunar-Lambert limb-darkening parameter; Lambert is its L = 0 case
//! let mut empirical = LunarLambert::new(0.5)?;
//! match fit_limb_darkening(&mut empirical, &grid, datum.phase, false, (0.0, 1.0), None)? {
//!     FitOutcome::Fitted { parameter, .. } => assert!(parameter.abs() < 1e-3),
//!     FitOutcome::NoFitPossible => unreachable!(),
//! }
//! # Ok::<(), regolith_photom::PhotomError>(())
//! ```

pub mod atmosphere;

mod error;

pub mod fit;

pub mod photometry;

pub mod progress;

pub mod quadrature;

pub mod report;

pub use {
    atmosphere::{AtmosphereModel, AtmosphereSettings},
    error::{PhotomError, Result},
    fit::{fit_limb_darkening, Datum, FitOutcome, HemisphereGrid},
    photometry::{
        create_law, LawRegistry, LawSettings, LimbDarkeningLaw, MemoizedLaw, PhotometricLaw,
    },
    report::{FitReport, Measurement, ReportIoError},
};
