//! Material

use crate::inputmap::ArcInputMap;
use bitflags::bitflags;
use std::collections::HashMap;
use std::sync::Arc;

bitflags! {
    /// Combination of layers making up a layered material.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Layers: u32 {
        /// Emits light.
        const EMISSION = 1 << 0;
        /// Passes light straight through with some probability.
        const TRANSPARENCY = 1 << 1;
        /// Thin dielectric coat over the remaining layers.
        const COATING = 1 << 2;
        /// Glossy or mirror reflection.
        const REFLECTION = 1 << 3;
        /// Diffuse reflection.
        const DIFFUSE = 1 << 4;
        /// Transmission through the surface.
        const REFRACTION = 1 << 5;
        /// Normal perturbation from a bump map.
        const SHADING_NORMAL = 1 << 6;
    }
}

lazy_static! {
    /// Registered input slots and the layer each one belongs to.
    static ref REGISTERED_INPUTS: HashMap<&'static str, Layers> = {
        let mut slots = HashMap::new();
        slots.insert("emission.color", Layers::EMISSION);
        slots.insert("transparency", Layers::TRANSPARENCY);
        slots.insert("coating.color", Layers::COATING);
        slots.insert("coating.ior", Layers::COATING);
        slots.insert("reflection.color", Layers::REFLECTION);
        slots.insert("reflection.roughness", Layers::REFLECTION);
        slots.insert("reflection.ior", Layers::REFLECTION);
        slots.insert("reflection.metalness", Layers::REFLECTION);
        slots.insert("diffuse.color", Layers::DIFFUSE);
        slots.insert("refraction.color", Layers::REFRACTION);
        slots.insert("refraction.roughness", Layers::REFRACTION);
        slots.insert("refraction.ior", Layers::REFRACTION);
        slots.insert("shading_normal", Layers::SHADING_NORMAL);
        slots
    };
}

/// Layered material.
///
/// A material is a set of active layers plus the parameter expressions bound
/// to the input slots those layers register. Slots not bound by the loader are
/// left to the shading backend's defaults.
#[derive(Clone, Debug)]
pub struct UberMaterial {
    /// Material name.
    pub name: String,

    /// Active layers.
    layers: Layers,

    /// Bound parameter expressions keyed by slot name.
    inputs: HashMap<String, ArcInputMap>,
}

impl UberMaterial {
    /// Creates a new `UberMaterial` with the given active layers and no
    /// bound inputs.
    ///
    /// * `name`   - Material name.
    /// * `layers` - Active layers.
    pub fn new(name: &str, layers: Layers) -> Self {
        Self {
            name: String::from(name),
            layers,
            inputs: HashMap::new(),
        }
    }

    /// Returns the active layers.
    pub fn layers(&self) -> Layers {
        self.layers
    }

    /// Returns true if the emission layer is active.
    pub fn has_emission(&self) -> bool {
        self.layers.contains(Layers::EMISSION)
    }

    /// Binds a parameter expression to an input slot.
    ///
    /// Panics if the slot is not registered or its layer is not active;
    /// both are programming errors in the loader.
    ///
    /// * `slot`  - Input slot name, e.g. "diffuse.color".
    /// * `input` - Parameter expression.
    pub fn set_input(&mut self, slot: &str, input: ArcInputMap) {
        let layer = REGISTERED_INPUTS
            .get(slot)
            .unwrap_or_else(|| panic!("unknown material input '{}'", slot));
        assert!(
            self.layers.contains(*layer),
            "material '{}' has no active layer for input '{}'",
            self.name,
            slot
        );
        self.inputs.insert(String::from(slot), input);
    }

    /// Returns the expression bound to an input slot.
    ///
    /// * `slot` - Input slot name.
    pub fn input(&self, slot: &str) -> Option<&ArcInputMap> {
        self.inputs.get(slot)
    }
}

/// Atomic reference counted `UberMaterial`.
pub type ArcMaterial = Arc<UberMaterial>;
