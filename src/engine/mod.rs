//! Ports to the two external simulation engines.
//!
//! The coupling loop only sees [`FiberEngine`] and [`ParticleEngine`]. Each
//! step receives the current state by shared reference and returns the next
//! one; the caller decides whether to commit it.
//!
//! [`MedyanEngine`] adapts a MEDYAN-style filament mechanics executable that
//! communicates through a listing file, a rendered system file and a
//! trajectory snapshot.

mod config;
mod error;
mod medyan;
mod process;
mod template;

pub use config::FiberEngineConfig;
pub use error::Error;
pub use medyan::{MedyanEngine, n_compartments};
pub use process::{Invoker, ProcessInvoker};
pub use template::{ConfigRenderer, PlaceholderTemplate};

use crate::model::fiber::FiberState;
use crate::model::monomer::MonomerState;

/// Advances the continuous fiber representation.
pub trait FiberEngine {
    fn step(&mut self, state: &FiberState, dt: f64) -> Result<FiberState, Error>;
}

/// Advances the discrete particle representation.
pub trait ParticleEngine {
    fn step(&mut self, state: &MonomerState, dt: f64) -> Result<MonomerState, Error>;
}

impl<E: FiberEngine + ?Sized> FiberEngine for Box<E> {
    fn step(&mut self, state: &FiberState, dt: f64) -> Result<FiberState, Error> {
        (**self).step(state, dt)
    }
}

impl<E: ParticleEngine + ?Sized> ParticleEngine for Box<E> {
    fn step(&mut self, state: &MonomerState, dt: f64) -> Result<MonomerState, Error> {
        (**self).step(state, dt)
    }
}

/// Particle engine that leaves the monomer state as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticParticleEngine;

impl ParticleEngine for StaticParticleEngine {
    fn step(&mut self, state: &MonomerState, _dt: f64) -> Result<MonomerState, Error> {
        Ok(state.clone())
    }
}
