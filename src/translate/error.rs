use crate::model::types::EntityId;
use thiserror::Error;

/// Errors raised while converting between fiber and monomer representations.
#[derive(Debug, Error)]
pub enum Error {
    /// A topology lists a particle id that is absent from the monomer state.
    #[error("topology {topology} references unknown particle {particle}")]
    UnknownParticle {
        topology: EntityId,
        particle: EntityId,
    },

    /// Monomer spacing must be a positive, finite length.
    #[error("monomer spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),
}
