/////////////////////////////////////////////////////////////////////////////////////////////
//
// Crate root for the one-dimensional numerical analysis kernels.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # regolith_numerics
//!
//! One-dimensional numerical analysis kernels shared by the photometric and
//! radiative-transfer crates:
//!
//! - [`interp`] — a multi-scheme interpolator over tabulated data, with
//!   finite-difference derivatives and Newton-Cotes/Romberg integration.
//! - [`romberg`] — the Romberg integration driver over arbitrary fallible
//!   integrands.
//! - [`specfn`] — exponential-integral special functions Ei, En, and the
//!   second-order scattering helper G11'.
//! - [`optimize`] — minimum bracketing, Brent minimization, and Brent root
//!   finding.
//!
//! Everything operates on `f64`, synchronously, with no interior mutability;
//! a `&mut` receiver marks the operations that populate lazy caches.

pub mod error;
pub mod interp;
pub mod optimize;
pub mod romberg;
pub mod specfn;

pub use error::{NumericsError, Result};
pub use interp::{Extrapolation, InterpScheme, Interpolator};
