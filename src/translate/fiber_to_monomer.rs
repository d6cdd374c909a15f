use super::allocator::{IdAllocator, Provenance};
use super::config::TranslatorConfig;
use super::crop::crop_to_box;
use super::error::Error;
use super::generator::ChainGenerator;
use crate::geometry::{BoundingBox, translate};
use crate::model::fiber::Fiber;
use crate::model::monomer::{MonomerState, Particle, Topology};
use crate::model::types::EntityId;
use std::collections::BTreeMap;
use tracing::debug;

pub fn fibers_to_monomers<G: ChainGenerator + ?Sized>(
    fibers: &BTreeMap<String, Fiber>,
    config: &TranslatorConfig,
    generator: &G,
    allocator: &mut IdAllocator,
) -> Result<MonomerState, Error> {
    let spacing = config.monomer_spacing;
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(Error::InvalidSpacing(spacing));
    }

    let bbox = BoundingBox::centered(config.box_center, config.box_size);
    let cropped = crop_to_box(fibers, bbox.min, bbox.max);
    debug!(
        fibers = fibers.len(),
        inside = cropped.len(),
        "cropped fibers to monomer box"
    );

    let mut state = MonomerState::new(config.box_center, config.box_size);
    for (fiber_id, fiber) in &cropped {
        let chain = generator.generate(&fiber.points, spacing);
        if chain.is_empty() {
            debug!(fiber = %fiber_id, "generator produced no monomers");
            continue;
        }
        let local = translate(&chain, config.box_center, true);

        let topology_id = allocator.id_for(Provenance::topology(fiber_id));
        let particle_ids: Vec<EntityId> = (0..local.len())
            .map(|ordinal| allocator.id_for(Provenance::particle(fiber_id, ordinal)))
            .collect();
        allocator.truncate_chain(fiber_id, particle_ids.len());

        for (ordinal, (&id, position)) in particle_ids.iter().zip(&local).enumerate() {
            let neighbors = ordinal
                .checked_sub(1)
                .into_iter()
                .chain(Some(ordinal + 1).filter(|&next| next < particle_ids.len()))
                .map(|k| particle_ids[k]);
            state.insert_particle(
                Particle::new(id, config.monomer_type.as_str(), *position).with_neighbors(neighbors),
            );
        }
        state.insert_topology(Topology::new(
            topology_id,
            fiber.type_name.as_str(),
            particle_ids,
        ));
    }

    debug!(
        topologies = state.topology_count(),
        particles = state.particle_count(),
        "generated monomers"
    );
    Ok(state)
}
