use crate::model::types::EntityId;
use std::collections::BTreeMap;

/// What a generated entity stands for, used to hand out the same id again
/// when the entity persists across ticks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provenance {
    /// The topology standing for a fiber.
    Topology { fiber_id: String },
    /// The `ordinal`-th monomer of a fiber's chain.
    Particle { fiber_id: String, ordinal: usize },
}

impl Provenance {
    pub fn topology(fiber_id: &str) -> Self {
        Self::Topology {
            fiber_id: fiber_id.to_string(),
        }
    }

    pub fn particle(fiber_id: &str, ordinal: usize) -> Self {
        Self::Particle {
            fiber_id: fiber_id.to_string(),
            ordinal,
        }
    }
}

/// Monotonic id source for particles and topologies.
///
/// Ids are never reused. Asking again for a known provenance returns its
/// previous id unchanged.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: EntityId,
    assigned: BTreeMap<Provenance, EntityId>,
    fiber_of_topology: BTreeMap<EntityId, String>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: 1,
            assigned: BTreeMap::new(),
            fiber_of_topology: BTreeMap::new(),
        }
    }

    /// Moves the counter past `max_id`, so ids issued by someone else (the
    /// particle engine) are never handed out.
    pub fn reserve_above(&mut self, max_id: Option<EntityId>) {
        if let Some(max_id) = max_id {
            self.next = self.next.max(max_id.saturating_add(1));
        }
    }

    pub fn id_for(&mut self, provenance: Provenance) -> EntityId {
        if let Some(&id) = self.assigned.get(&provenance) {
            return id;
        }
        let id = self.next;
        self.next += 1;
        if let Provenance::Topology { fiber_id } = &provenance {
            self.fiber_of_topology.insert(id, fiber_id.clone());
        }
        self.assigned.insert(provenance, id);
        id
    }

    /// Records ids that already exist for `fiber_id`, typically a chain the
    /// particle engine built and that now comes back as a fiber.
    pub fn adopt(&mut self, fiber_id: &str, topology: EntityId, particles: &[EntityId]) {
        self.reserve_above(particles.iter().copied().chain([topology]).max());
        self.assigned.insert(Provenance::topology(fiber_id), topology);
        self.fiber_of_topology.insert(topology, fiber_id.to_string());
        for (ordinal, &particle) in particles.iter().enumerate() {
            self.assigned
                .insert(Provenance::particle(fiber_id, ordinal), particle);
        }
        self.truncate_chain(fiber_id, particles.len());
    }

    /// Forgets monomer ids at ordinals `len..` of a fiber's chain. Their ids
    /// are retired, never issued again.
    pub fn truncate_chain(&mut self, fiber_id: &str, len: usize) {
        self.assigned.retain(|provenance, _| match provenance {
            Provenance::Particle {
                fiber_id: owner,
                ordinal,
            } => owner != fiber_id || *ordinal < len,
            Provenance::Topology { .. } => true,
        });
    }

    /// The fiber a topology was generated from, if any.
    pub fn fiber_of(&self, topology: EntityId) -> Option<&str> {
        self.fiber_of_topology.get(&topology).map(String::as_str)
    }

    #[inline]
    pub fn peek_next(&self) -> EntityId {
        self.next
    }
}
