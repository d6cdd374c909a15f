//! Multiscale coupling between a continuous fiber model and a discrete
//! monomer model of a cytoskeletal filament network.
//!
//! Two external engines advance the same structure in turns: a filament
//! mechanics engine that works on polylines, and a reaction-diffusion engine
//! that works on particles linked into topologies. This crate owns both
//! representations, translates between them, and decides which one is
//! authoritative at any simulated time.
//!
//! # Features
//!
//! - **Alternation** — A two-state periodic controller ([`Alternator`]) gating
//!   exactly one engine per tick
//! - **Translation** — Fiber to monomer conversion with box cropping and stable
//!   entity ids, and the reverse projection ([`Translator`])
//! - **Reconciliation** — Add/update/delete diffs ([`Diff`], [`MonomerUpdate`])
//!   so the particle side receives incremental changes
//! - **Trajectory codec** — The fiber engine's `FILAMENT` listing and snapshot
//!   formats, id remapping and box extent recovery ([`io`])
//! - **Engine adapter** — A MEDYAN-style file and process driver
//!   ([`engine::MedyanEngine`])
//!
//! # Quick Start
//!
//! ```no_run
//! use filament_bridge::engine::{MedyanEngine, StaticParticleEngine};
//! use filament_bridge::{CouplingConfig, Coupler, FiberState};
//!
//! let config = CouplingConfig::from_toml_str("[fiber_engine]\nexecutable = \"medyan\"\n")?;
//! let fibers = FiberState::chandrasekaran_2019()?;
//! let engine = MedyanEngine::new(config.fiber_engine.clone())?;
//!
//! let mut coupler = Coupler::from_config(&config, engine, StaticParticleEngine, fibers)?;
//! coupler.run_until(20.0, |report| {
//!     println!("t = {:.3} ({})", report.time, report.regime);
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`geometry`] — Translation and axis-aligned box tests
//! - [`io`] — Listing and snapshot codec, system configuration parsing
//! - [`engine`] — Engine ports and the MEDYAN adapter
//!
//! # Data Types
//!
//! - [`Fiber`] / [`FiberState`] — Typed polylines keyed by fiber id
//! - [`Particle`] / [`Topology`] / [`MonomerState`] — Linked particles
//!   positioned relative to the particle box center
//! - [`Diff`] / [`MonomerUpdate`] — Transitions between keyed collections
//! - [`TickReport`] — Outcome of one coupling tick

mod config;
mod coupling;
mod model;
mod reconcile;
mod translate;

pub mod engine;
pub mod geometry;
pub mod io;

pub use model::fiber::{Fiber, FiberState};
pub use model::monomer::{MonomerState, Particle, Topology};
pub use model::types::{EntityId, Point3};

pub use reconcile::{Added, Diff, MonomerUpdate, diff};

pub use translate::{
    ChainGenerator, IdAllocator, LinearChainGenerator, Provenance, Translator,
    TranslatorConfig, crop_to_box, splice_cropped,
};

pub use coupling::{Alternator, Coupler, Regime, RegimeSelection, RegimeSwitch, TickReport};

pub use config::{AlternatorConfig, CouplingConfig, ParticleEngineConfig};

pub use coupling::Error as CouplingError;
pub use translate::Error as TranslateError;
