/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements fit-report JSON persistence and delimited measurement-table I/O.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Reports and tables
//!
//! Persists fitting results as a versioned JSON envelope and reads/writes
//! delimited tables of photometric measurements.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};

use crate::fit::FitOutcome;
use crate::Result;

const JSON_FORMAT_NAME: &str = "regolith_photom.fit_report.json";
const JSON_VERSION: u32 = 1;

/// Borrowing envelope for SAVE (no clone of the report).
#[derive(Serialize)]
struct JsonEnvelopeRef<'a, T: ?Sized> {
    format: &'static str,
    version: u32,
    #[serde(flatten)]
    report: &'a T,
}

/// Owning envelope for LOAD.
#[derive(Serialize, Deserialize)]
struct JsonEnvelopeOwned<T> {
    format: String,
    version: u32,
    #[serde(flatten)]
    report: T,
}

/// Result of one limb-darkening fitting run, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Registry name of the fitted empirical law.
    pub law: String,
    /// Phase angle of the comparison, degrees.
    pub phase_angle: f64,
    /// Best-fit limb-darkening parameter.
    pub limb_darkening: f64,
    /// Best-fit multiplicative term.
    pub multiplier: f64,
    /// Best-fit additive term; absent for multiplier-only fits.
    pub offset: Option<f64>,
    /// RMS error of the fit at the best parameter.
    pub rms: f64,
}

impl FitReport {
    /// Builds a report from a successful fitting outcome; `None` when the
    /// outcome was `NoFitPossible`.
    pub fn from_outcome(
        law: &str,
        phase_angle: f64,
        with_offset: bool,
        outcome: &FitOutcome,
    ) -> Option<Self> {
        match *outcome {
            FitOutcome::Fitted {
                parameter,
                multiplier,
                offset,
                rms,
                ..
            } => Some(FitReport {
                law: law.to_string(),
                phase_angle,
                limb_darkening: parameter,
                multiplier,
                offset: with_offset.then_some(offset),
                rms,
            }),
            FitOutcome::NoFitPossible => None,
        }
    }

    /// Save this report to a JSON envelope `{ format, version, ...report }`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ReportIoResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ReportIoError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        let env = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            report: self,
        };

        serde_json::to_writer_pretty(&mut w, &env).map_err(|e| ReportIoError::Serialize {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.flush().map_err(|e| ReportIoError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Load a report from a versioned JSON envelope, validating format &
    /// version.
    pub fn load<P: AsRef<Path>>(path: P) -> ReportIoResult<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| ReportIoError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let env: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ReportIoError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        if env.format != JSON_FORMAT_NAME {
            return Err(ReportIoError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: env.format,
                expected: JSON_FORMAT_NAME,
            });
        }
        if env.version != JSON_VERSION {
            return Err(ReportIoError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: env.version,
                expected: JSON_VERSION,
            });
        }

        Ok(env.report)
    }
}

type ReportIoResult<T> = std::result::Result<T, ReportIoError>;

/// Errors that can occur when saving or loading a [`FitReport`].
#[derive(Debug)]
pub enum ReportIoError {
    /// Failed to create the target file before writing a report.
    Create { path: PathBuf, source: io::Error },
    /// Failed to open an existing report file for reading.
    Open { path: PathBuf, source: io::Error },
    /// Failed to flush buffered output when finishing a write.
    Flush { path: PathBuf, source: io::Error },
    /// Error serializing the in-memory report to JSON.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Error parsing JSON when reading a report from disk.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The JSON `format` field does not match the expected report format.
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },
    /// The JSON `version` field does not match the supported version.
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

impl fmt::Display for ReportIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportIoError::Create { path, source } => {
                write!(f, "creating {}: {}", path.display(), source)
            }
            ReportIoError::Open { path, source } => {
                write!(f, "opening {}: {}", path.display(), source)
            }
            ReportIoError::Flush { path, source } => {
                write!(f, "flushing {}: {}", path.display(), source)
            }
            ReportIoError::Serialize { path, source } => {
                write!(f, "serializing JSON to {}: {}", path.display(), source)
            }
            ReportIoError::Parse { path, source } => {
                write!(f, "parsing JSON in {}: {}", path.display(), source)
            }
            ReportIoError::FormatMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported format {:?} (expected {:?}) in {}",
                found,
                expected,
                path.display()
            ),
            ReportIoError::VersionMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported version {} (expected {}) in {}",
                found,
                expected,
                path.display()
            ),
        }
    }
}

impl Error for ReportIoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReportIoError::Create { source, .. }
            | ReportIoError::Open { source, .. }
            | ReportIoError::Flush { source, .. } => Some(source),
            ReportIoError::Serialize { source, .. } | ReportIoError::Parse { source, .. } => {
                Some(source)
            }
            ReportIoError::FormatMismatch { .. } | ReportIoError::VersionMismatch { .. } => None,
        }
    }
}

/// One photometric measurement: the observing geometry and the brightness
/// recorded there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Phase angle, degrees.
    pub phase: f64,
    /// Incidence angle, degrees.
    pub incidence: f64,
    /// Emission angle, degrees.
    pub emission: f64,
    /// Observed brightness.
    pub brightness: f64,
}

/// Write measurements to a delimited file with a header row.
pub fn write_measurements<P: AsRef<Path>>(path: P, measurements: &[Measurement]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = Writer::from_writer(BufWriter::new(file));
    for measurement in measurements {
        writer.serialize(measurement)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read measurements from a delimited file written by
/// [`write_measurements`].
pub fn read_measurements<P: AsRef<Path>>(path: P) -> Result<Vec<Measurement>> {
    let file = File::open(path.as_ref())?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));
    let mut measurements = Vec::new();
    for record in reader.deserialize() {
        measurements.push(record?);
    }
    Ok(measurements)
}
