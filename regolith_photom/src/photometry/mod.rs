/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the photometric-law capability, its configuration surface, and the law registry.
//
// Created on: 02 Jun 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Photometric laws
//!
//! [`PhotometricLaw`] is the polymorphic "evaluate surface albedo at
//! (phase, incidence, emission)" capability consumed by the quadrature
//! engine, the radiative-transfer tables, and the fitting drivers. Built-in
//! laws live in [`laws`]; additional laws can be registered by name through
//! [`LawRegistry`].
//!
//! All angles are in degrees.

pub mod laws;

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::{PhotomError, Result};
use laws::{HapkeHenyey, Lambert, LommelSeeliger, LunarLambert, Minnaert};

pub(crate) const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// A surface photometric function.
pub trait PhotometricLaw: Debug {
    /// Registry name of the law.
    fn name(&self) -> &'static str;

    /// Surface albedo at the given photometric geometry, angles in degrees.
    /// Geometry at or past the limb (incidence or emission >= 90) returns 0.
    fn surface_albedo(&self, phase: f64, incidence: f64, emission: f64) -> Result<f64>;

    /// Closed-form hemispheric albedo at cosine-of-incidence `munot`, when
    /// the law has one. `None` sends the table builder to numeric quadrature.
    fn hemispheric_albedo(&self, munot: f64) -> Option<f64> {
        let _ = munot;
        None
    }
}

/// A law with a single adjustable limb-darkening-style parameter, fittable
/// by the 1-D drivers.
pub trait LimbDarkeningLaw: PhotometricLaw {
    fn limb_darkening(&self) -> f64;
    fn set_limb_darkening(&mut self, value: f64) -> Result<()>;
}

/// Declarative law configuration, deserialized from the caller's key/value
/// store once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum LawSettings {
    Lambert,
    LommelSeeliger,
    Minnaert { k: f64 },
    LunarLambert { l: f64 },
    HapkeHenyey { wh: f64, hg1: f64, hg2: f64, b0: f64, hh: f64 },
}

/// Builds the configured law.
pub fn create_law(settings: &LawSettings) -> Result<Box<dyn PhotometricLaw>> {
    Ok(match *settings {
        LawSettings::Lambert => Box::new(Lambert),
        LawSettings::LommelSeeliger => Box::new(LommelSeeliger),
        LawSettings::Minnaert { k } => Box::new(Minnaert::new(k)?),
        LawSettings::LunarLambert { l } => Box::new(LunarLambert::new(l)?),
        LawSettings::HapkeHenyey { wh, hg1, hg2, b0, hh } => {
            Box::new(HapkeHenyey::new(wh, hg1, hg2, b0, hh)?)
        }
    })
}

/// Factory signature for registry-constructed laws: named double-valued
/// parameters in, law out.
pub type LawFactory = fn(&BTreeMap<String, f64>) -> Result<Box<dyn PhotometricLaw>>;

/// Name-to-factory registry for constructing laws from an external
/// configuration surface. The built-in laws are pre-registered; callers may
/// register additional factories under new names.
#[derive(Debug, Clone)]
pub struct LawRegistry {
    factories: BTreeMap<&'static str, LawFactory>,
}

impl Default for LawRegistry {
    fn default() -> Self {
        LawRegistry::with_builtin_laws()
    }
}

impl LawRegistry {
    pub fn with_builtin_laws() -> Self {
        let mut registry = LawRegistry {
            factories: BTreeMap::new(),
        };
        registry.register("lambert", |_| Ok(Box::new(Lambert)));
        registry.register("lommel_seeliger", |_| Ok(Box::new(LommelSeeliger)));
        registry.register("minnaert", |params| {
            Ok(Box::new(Minnaert::new(required(params, "k")?)?))
        });
        registry.register("lunar_lambert", |params| {
            Ok(Box::new(LunarLambert::new(required(params, "l")?)?))
        });
        registry.register("hapke_henyey", |params| {
            Ok(Box::new(HapkeHenyey::new(
                required(params, "wh")?,
                required(params, "hg1")?,
                required(params, "hg2")?,
                required(params, "b0")?,
                required(params, "hh")?,
            )?))
        });
        registry
    }

    /// Registers (or replaces) a factory under `name`.
    pub fn register(&mut self, name: &'static str, factory: LawFactory) {
        self.factories.insert(name, factory);
    }

    /// Constructs the named law from its parameters.
    pub fn create(&self, name: &str, params: &BTreeMap<String, f64>) -> Result<Box<dyn PhotometricLaw>> {
        let factory = self.factories.get(name).ok_or_else(|| PhotomError::UnknownLaw {
            name: name.to_string(),
        })?;
        factory(params)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

fn required(params: &BTreeMap<String, f64>, key: &'static str) -> Result<f64> {
    params
        .get(key)
        .copied()
        .ok_or_else(|| PhotomError::parameter(key, "required law parameter is missing"))
}

/// Wraps a law with a one-entry result cache keyed on the angle triple.
/// Hemisphere-grid synthesis and fitting re-evaluate the same geometry many
/// times in a row; a new key simply recomputes and replaces the entry.
#[derive(Debug)]
pub struct MemoizedLaw<L: PhotometricLaw> {
    law: L,
    last: Option<((u64, u64, u64), f64)>,
}

impl<L: PhotometricLaw> MemoizedLaw<L> {
    pub fn new(law: L) -> Self {
        MemoizedLaw { law, last: None }
    }

    pub fn inner(&self) -> &L {
        &self.law
    }

    /// Mutable access to the wrapped law; any mutation invalidates the cache.
    pub fn inner_mut(&mut self) -> &mut L {
        self.last = None;
        &mut self.law
    }

    pub fn surface_albedo(&mut self, phase: f64, incidence: f64, emission: f64) -> Result<f64> {
        let key = (phase.to_bits(), incidence.to_bits(), emission.to_bits());
        if let Some((cached_key, value)) = self.last {
            if cached_key == key {
                return Ok(value);
            }
        }
        let value = self.law.surface_albedo(phase, incidence, emission)?;
        self.last = Some((key, value));
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_json() {
        let settings = LawSettings::LunarLambert { l: 0.4 };
        let text = serde_json::to_string(&settings).unwrap();
        assert!(text.contains("lunar_lambert"));
        let back: LawSettings = serde_json::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn registry_constructs_builtin_laws() {
        let registry = LawRegistry::with_builtin_laws();
        let mut params = BTreeMap::new();
        params.insert("k".to_string(), 0.7);
        let law = registry.create("minnaert", &params).unwrap();
        assert_eq!(law.name(), "minnaert");

        assert!(matches!(
            registry.create("hapke_legendre", &params),
            Err(PhotomError::UnknownLaw { .. })
        ));
        assert!(matches!(
            registry.create("lunar_lambert", &params),
            Err(PhotomError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn memoized_law_reuses_the_last_result() {
        let mut law = MemoizedLaw::new(Lambert);
        let first = law.surface_albedo(30.0, 45.0, 15.0).unwrap();
        let second = law.surface_albedo(30.0, 45.0, 15.0).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
        // a new key recomputes
        let moved = law.surface_albedo(30.0, 60.0, 15.0).unwrap();
        assert!(moved < first);
    }
}
