use super::allocator::IdAllocator;
use super::config::TranslatorConfig;
use super::error::Error;
use crate::geometry::translate;
use crate::model::fiber::Fiber;
use crate::model::monomer::MonomerState;
use crate::model::types::Point3;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub fn monomers_to_fibers(
    state: &MonomerState,
    config: &TranslatorConfig,
    allocator: &mut IdAllocator,
) -> Result<BTreeMap<String, Fiber>, Error> {
    let mut chains = Vec::with_capacity(state.topologies.len());
    let mut referenced = BTreeSet::new();

    // Every chain resolves before any id is adopted, so a dangling particle
    // leaves the allocator untouched.
    for topology in state.topologies.values() {
        let local = topology
            .particle_ids
            .iter()
            .map(|pid| {
                state
                    .particles
                    .get(pid)
                    .map(|p| p.position)
                    .ok_or(Error::UnknownParticle {
                        topology: topology.id,
                        particle: *pid,
                    })
            })
            .collect::<Result<Vec<Point3>, _>>()?;
        referenced.extend(topology.particle_ids.iter().copied());

        if local.len() < 2 {
            debug!(topology = topology.id, "single-monomer topology is not a fiber");
            continue;
        }
        chains.push((topology, local));
    }

    let mut fibers = BTreeMap::new();
    for (topology, local) in chains {
        let fiber_id = allocator
            .fiber_of(topology.id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("topology-{}", topology.id));
        allocator.adopt(&fiber_id, topology.id, &topology.particle_ids);

        let type_name = if topology.type_name.is_empty() {
            config.default_fiber_type.clone()
        } else {
            topology.type_name.clone()
        };
        let points = translate(&local, state.box_center, false);
        fibers.insert(fiber_id.clone(), Fiber::new(fiber_id, type_name, points));
    }

    let dropped = state.particles.len().saturating_sub(referenced.len());
    debug!(fibers = fibers.len(), dropped, "projected monomers back to fibers");
    Ok(fibers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::monomer::{Particle, Topology};

    fn config() -> TranslatorConfig {
        TranslatorConfig {
            box_center: [10.0, 20.0, 30.0],
            ..TranslatorConfig::default()
        }
    }

    fn state() -> MonomerState {
        let mut state = MonomerState::new([10.0, 20.0, 30.0], 100.0);
        state.insert_particle(Particle::new(1, "actin", [0.0, 0.0, 0.0]));
        state.insert_particle(Particle::new(2, "actin", [1.0, 0.0, 0.0]));
        state.insert_particle(Particle::new(3, "actin", [2.0, 0.0, 0.0]));
        state.insert_particle(Particle::new(9, "arp2", [5.0, 5.0, 5.0]));
        state.insert_topology(Topology::new(4, "Actin-Polymer", vec![1, 2, 3]));
        state
    }

    #[test]
    fn chains_become_fibers_in_global_frame() {
        let mut alloc = IdAllocator::new();
        let fibers = monomers_to_fibers(&state(), &config(), &mut alloc).expect("consistent");
        assert_eq!(fibers.len(), 1);
        let fiber = &fibers["topology-4"];
        assert_eq!(fiber.type_name, "Actin-Polymer");
        assert_eq!(
            fiber.points,
            vec![[10.0, 20.0, 30.0], [11.0, 20.0, 30.0], [12.0, 20.0, 30.0]]
        );
        assert_eq!(alloc.fiber_of(4), Some("topology-4"));
    }

    #[test]
    fn untyped_topology_gets_default_type() {
        let mut s = state();
        s.insert_topology(Topology::new(4, "", vec![1, 2]));
        let mut alloc = IdAllocator::new();
        let fibers = monomers_to_fibers(&s, &config(), &mut alloc).unwrap();
        assert_eq!(fibers["topology-4"].type_name, "Actin-Polymer");
    }

    #[test]
    fn single_monomer_topology_is_dropped() {
        let mut s = state();
        s.insert_topology(Topology::new(8, "Arp23", vec![9]));
        let mut alloc = IdAllocator::new();
        let fibers = monomers_to_fibers(&s, &config(), &mut alloc).unwrap();
        assert!(!fibers.contains_key("topology-8"));
    }

    #[test]
    fn dangling_particle_reference_is_an_error() {
        let mut s = state();
        s.insert_topology(Topology::new(5, "A", vec![1, 77]));
        let mut alloc = IdAllocator::new();
        let err = monomers_to_fibers(&s, &config(), &mut alloc).expect_err("77 missing");
        assert!(matches!(
            err,
            Error::UnknownParticle {
                topology: 5,
                particle: 77
            }
        ));
    }

    #[test]
    fn failed_projection_adopts_nothing() {
        let mut s = state();
        s.insert_topology(Topology::new(5, "A", vec![1, 77]));
        let mut alloc = IdAllocator::new();
        monomers_to_fibers(&s, &config(), &mut alloc).expect_err("77 missing");
        assert_eq!(alloc.fiber_of(4), None);
        assert_eq!(alloc.peek_next(), 1);
    }
}
