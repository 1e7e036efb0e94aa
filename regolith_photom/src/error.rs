/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the error type for the photometric and radiative-transfer layer.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use std::error::Error;
use std::fmt;

use regolith_numerics::NumericsError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PhotomError>;

/// Errors reported by the photometric laws, radiative-transfer tables, and
/// fitting routines.
#[derive(Debug)]
pub enum PhotomError {
    /// A physical parameter outside its documented range (negative tau,
    /// single-scattering albedo outside (0, 1], and so on).
    InvalidParameter { name: &'static str, reason: String },

    /// A named photometric law is not present in the registry.
    UnknownLaw { name: String },

    /// The least-squares accumulation hit a degenerate denominator; too few
    /// distinct sample points to fit. An expected runtime condition, reported
    /// to fitting drivers which surface it as an explicit outcome.
    NoFitPossible,

    /// An underlying interpolation, quadrature, or optimization failure.
    Numerics(NumericsError),

    /// Failure reading or writing a delimited geometry/brightness table.
    Table(csv::Error),

    /// Failure serializing or parsing a fit report.
    Report(serde_json::Error),

    /// Underlying file I/O failure.
    Io(std::io::Error),
}

impl PhotomError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        PhotomError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PhotomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotomError::InvalidParameter { name, reason } => {
                write!(f, "invalid value of {}: {}", name, reason)
            }
            PhotomError::UnknownLaw { name } => {
                write!(f, "unknown photometric law [{}]", name)
            }
            PhotomError::NoFitPossible => {
                write!(f, "insufficient distinct points for a least-squares fit")
            }
            PhotomError::Numerics(e) => write!(f, "numerics failure: {}", e),
            PhotomError::Table(e) => write!(f, "table I/O failure: {}", e),
            PhotomError::Report(e) => write!(f, "report serialization failure: {}", e),
            PhotomError::Io(e) => write!(f, "I/O failure: {}", e),
        }
    }
}

impl Error for PhotomError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PhotomError::Numerics(e) => Some(e),
            PhotomError::Table(e) => Some(e),
            PhotomError::Report(e) => Some(e),
            PhotomError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NumericsError> for PhotomError {
    fn from(e: NumericsError) -> Self {
        PhotomError::Numerics(e)
    }
}

impl From<csv::Error> for PhotomError {
    fn from(e: csv::Error) -> Self {
        PhotomError::Table(e)
    }
}

impl From<serde_json::Error> for PhotomError {
    fn from(e: serde_json::Error) -> Self {
        PhotomError::Report(e)
    }
}

impl From<std::io::Error> for PhotomError {
    fn from(e: std::io::Error) -> Self {
        PhotomError::Io(e)
    }
}
