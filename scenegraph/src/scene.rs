//! Scene

use crate::light::Light;
use crate::shape::Mesh;
use std::sync::Arc;

/// Scene container holding the shapes and lights a loader produced.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// All shapes in the scene.
    shapes: Vec<Arc<Mesh>>,

    /// All light sources in the scene.
    lights: Vec<Light>,
}

impl Scene {
    /// Creates an empty `Scene`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a shape to the scene.
    ///
    /// * `mesh` - The shape.
    pub fn attach_shape(&mut self, mesh: Arc<Mesh>) {
        self.shapes.push(mesh);
    }

    /// Attaches a light to the scene.
    ///
    /// * `light` - The light.
    pub fn attach_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// All shapes attached so far.
    pub fn shapes(&self) -> &[Arc<Mesh>] {
        &self.shapes
    }

    /// All lights attached so far.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
