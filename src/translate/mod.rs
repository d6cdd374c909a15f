//! Conversion between the fiber and monomer representations.
//!
//! Fibers are cropped to the particle-regime box, discretized into monomer
//! chains by a [`ChainGenerator`], and stored relative to the box center. The
//! reverse direction walks each topology's particle chain back into a
//! polyline in the global frame.
//!
//! Identity is carried by an [`IdAllocator`] owned by the [`Translator`]: a
//! fiber that persists between ticks keeps its topology and particle ids, and
//! a chain created by the particle engine keeps its ids when it returns.

mod allocator;
mod config;
mod crop;
mod error;
mod fiber_to_monomer;
mod generator;
mod monomer_to_fiber;

pub use allocator::{IdAllocator, Provenance};
pub use config::TranslatorConfig;
pub use crop::{crop_to_box, splice_cropped};
pub use error::Error;
pub use generator::{ChainGenerator, LinearChainGenerator};

use crate::geometry::BoundingBox;
use crate::model::fiber::Fiber;
use crate::model::monomer::MonomerState;
use crate::model::types::EntityId;
use std::collections::BTreeMap;

/// Stateful translator pairing a configuration and chain generator with the
/// id allocator that keeps entity identity stable across ticks.
pub struct Translator {
    config: TranslatorConfig,
    generator: Box<dyn ChainGenerator + Send>,
    allocator: IdAllocator,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("config", &self.config)
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self::with_generator(config, LinearChainGenerator)
    }

    pub fn with_generator<G>(config: TranslatorConfig, generator: G) -> Self
    where
        G: ChainGenerator + Send + 'static,
    {
        Self {
            config,
            generator: Box::new(generator),
            allocator: IdAllocator::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// The particle-regime box fibers are cropped to.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::centered(self.config.box_center, self.config.box_size)
    }

    /// Projects fibers into a fresh monomer state.
    ///
    /// `previous` is the monomer state currently held by the particle regime;
    /// new ids are allocated above every id it contains.
    pub fn fibers_to_monomers(
        &mut self,
        fibers: &BTreeMap<String, Fiber>,
        previous: &MonomerState,
    ) -> Result<MonomerState, Error> {
        self.allocator.reserve_above(previous.max_id());
        fiber_to_monomer::fibers_to_monomers(
            fibers,
            &self.config,
            self.generator.as_ref(),
            &mut self.allocator,
        )
    }

    /// The fiber a topology stands for, if it was generated from or adopted
    /// as one.
    #[inline]
    pub fn fiber_of(&self, topology: EntityId) -> Option<&str> {
        self.allocator.fiber_of(topology)
    }

    pub fn monomers_to_fibers(
        &mut self,
        state: &MonomerState,
    ) -> Result<BTreeMap<String, Fiber>, Error> {
        monomer_to_fiber::monomers_to_fibers(state, &self.config, &mut self.allocator)
    }
}
