//! Light

use crate::base::Vec3;
use crate::shape::Mesh;
use std::sync::Arc;

/// Light source attached to a scene.
#[derive(Clone, Debug)]
pub enum Light {
    /// Area light bound to a single emissive triangle of a mesh.
    Area {
        /// Mesh carrying the emissive material.
        mesh: Arc<Mesh>,
        /// Triangle index within the mesh.
        prim_id: usize,
    },

    /// Directional light covering the whole scene.
    Directional {
        /// Direction the light travels in, normalized.
        direction: Vec3,
        /// Emitted radiance.
        radiance: Vec3,
    },
}

impl Light {
    /// Creates an area light for one triangle of a mesh.
    ///
    /// * `mesh`    - Mesh carrying the emissive material.
    /// * `prim_id` - Triangle index within the mesh.
    pub fn area(mesh: Arc<Mesh>, prim_id: usize) -> Self {
        assert!(
            prim_id < mesh.triangle_count(),
            "prim_id {} out of range for mesh '{}'",
            prim_id,
            mesh.name
        );
        Self::Area { mesh, prim_id }
    }

    /// Creates a directional light.
    ///
    /// * `direction` - Direction the light travels in.
    /// * `radiance`  - Emitted radiance.
    pub fn directional(direction: Vec3, radiance: Vec3) -> Self {
        Self::Directional {
            direction: direction.normalize(),
            radiance,
        }
    }
}
