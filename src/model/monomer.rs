use super::types::{EntityId, Point3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: EntityId,
    pub type_name: String,
    pub position: Point3,
    pub neighbor_ids: BTreeSet<EntityId>,
}

impl Particle {
    pub fn new(id: EntityId, type_name: impl Into<String>, position: Point3) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            position,
            neighbor_ids: BTreeSet::new(),
        }
    }

    pub fn with_neighbors(mut self, neighbors: impl IntoIterator<Item = EntityId>) -> Self {
        self.neighbor_ids.extend(neighbors);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub id: EntityId,
    pub type_name: String,
    pub particle_ids: Vec<EntityId>,
}

impl Topology {
    pub fn new(id: EntityId, type_name: impl Into<String>, particle_ids: Vec<EntityId>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            particle_ids,
        }
    }
}

/// Particle-regime view of the network: topologies group particles positioned
/// relative to the center of a cubic box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonomerState {
    pub box_center: Point3,
    pub box_size: f64,
    pub topologies: BTreeMap<EntityId, Topology>,
    pub particles: BTreeMap<EntityId, Particle>,
}

impl MonomerState {
    pub fn new(box_center: Point3, box_size: f64) -> Self {
        Self {
            box_center,
            box_size,
            ..Self::default()
        }
    }

    pub fn insert_topology(&mut self, topology: Topology) -> Option<Topology> {
        self.topologies.insert(topology.id, topology)
    }

    pub fn insert_particle(&mut self, particle: Particle) -> Option<Particle> {
        self.particles.insert(particle.id, particle)
    }

    #[inline]
    pub fn topology_count(&self) -> usize {
        self.topologies.len()
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty() && self.particles.is_empty()
    }

    /// Largest id used by any particle or topology.
    pub fn max_id(&self) -> Option<EntityId> {
        let topo = self.topologies.keys().next_back().copied();
        let part = self.particles.keys().next_back().copied();
        topo.max(part)
    }
}
