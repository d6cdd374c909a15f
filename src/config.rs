//! TOML configuration for a coupled run.
//!
//! Every section and field is optional; missing values take the defaults of
//! the actin bundle setup (fiber regime for 10 time units, particle regime for
//! 1e-7, MEDYAN stepping by 5).

use crate::coupling::{Error, Regime};
use crate::engine::FiberEngineConfig;
use crate::translate::TranslatorConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternatorConfig {
    /// `[fiber_period, particle_period]`.
    pub periods: [f64; 2],
    pub initial: Regime,
}

impl Default for AlternatorConfig {
    fn default() -> Self {
        Self {
            periods: [10.0, 1e-7],
            initial: Regime::Fiber,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleEngineConfig {
    pub time_step: f64,
}

impl Default for ParticleEngineConfig {
    fn default() -> Self {
        Self { time_step: 1e-7 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    pub alternator: AlternatorConfig,
    pub fiber_engine: FiberEngineConfig,
    pub translator: TranslatorConfig,
    pub particle_engine: ParticleEngineConfig,
}

impl CouplingConfig {
    /// Parses and validates a configuration document.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )))
            }
        };

        positive("alternator.periods[0]", self.alternator.periods[0])?;
        positive("alternator.periods[1]", self.alternator.periods[1])?;
        positive("translator.monomer_spacing", self.translator.monomer_spacing)?;
        positive("translator.box_size", self.translator.box_size)?;
        positive("fiber_engine.snapshot", self.fiber_engine.snapshot)?;
        positive("fiber_engine.time_step", self.fiber_engine.time_step)?;
        positive("fiber_engine.compartment_size", self.fiber_engine.compartment_size)?;
        positive("particle_engine.time_step", self.particle_engine.time_step)?;

        if self.fiber_engine.time_step <= self.fiber_engine.snapshot {
            return Err(Error::InvalidConfig(format!(
                "fiber_engine.time_step ({}) must exceed the snapshot interval ({})",
                self.fiber_engine.time_step, self.fiber_engine.snapshot
            )));
        }
        Ok(())
    }
}
