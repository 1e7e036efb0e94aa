/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the shared error type for the numerical analysis kernels.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NumericsError>;

/// Errors reported by the interpolation, quadrature, special function and
/// optimization routines.
///
/// The taxonomy is deliberately small:
/// - [`NumericsError::InvalidArgument`] — the caller handed in a value outside
///   the documented domain of the operation. Never retried.
/// - [`NumericsError::OutOfDomain`] — an evaluation was requested at an
///   abscissa outside the data's domain and the chosen extrapolation policy
///   forbids it.
/// - [`NumericsError::DidNotConverge`] — an iterative algorithm hit its
///   iteration ceiling without meeting tolerance. The crate never adapts
///   tolerance or retries internally; choosing new seeds or brackets is a
///   caller decision.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericsError {
    /// A value outside the documented domain of the operation.
    InvalidArgument { reason: String },

    /// An abscissa outside `[min, max]` under a policy that forbids it.
    OutOfDomain { value: f64, min: f64, max: f64 },

    /// An iteration ceiling was reached before meeting tolerance.
    DidNotConverge {
        what: &'static str,
        iterations: usize,
    },
}

impl NumericsError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        NumericsError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for NumericsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericsError::InvalidArgument { reason } => {
                write!(f, "invalid argument: {}", reason)
            }
            NumericsError::OutOfDomain { value, min, max } => {
                write!(f, "value {} is outside of domain [{}, {}]", value, min, max)
            }
            NumericsError::DidNotConverge { what, iterations } => {
                write!(f, "{} failed to converge in {} iterations", what, iterations)
            }
        }
    }
}

impl std::error::Error for NumericsError {}
