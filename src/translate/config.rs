use crate::model::types::Point3;
use serde::{Deserialize, Serialize};

/// Settings for projecting fibers into the particle regime's box and back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Distance between consecutive monomers along a fiber.
    pub monomer_spacing: f64,
    /// Center of the particle-regime box, in the shared global frame.
    pub box_center: Point3,
    /// Edge length of the cubic particle-regime box.
    pub box_size: f64,
    /// Particle type assigned to generated monomers.
    pub monomer_type: String,
    /// Fiber type used when a topology carries no type name.
    pub default_fiber_type: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            monomer_spacing: 2.7,
            box_center: [2000.0, 1000.0, 1000.0],
            box_size: 1000.0,
            monomer_type: "actin".to_string(),
            default_fiber_type: "Actin-Polymer".to_string(),
        }
    }
}
