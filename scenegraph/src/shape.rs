//! Shape

use crate::base::{Vec2, Vec3};
use crate::material::ArcMaterial;

/// Triangle mesh with one material shared by all of its triangles.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Shape name from the source file.
    pub name: String,

    /// Vertex positions.
    pub positions: Vec<Vec3>,

    /// Vertex normals, one per position.
    pub normals: Vec<Vec3>,

    /// Vertex texture coordinates, one per position.
    pub uvs: Vec<Vec2>,

    /// Triangle vertex indices, three per triangle.
    pub indices: Vec<u32>,

    /// Material shared by all triangles.
    material: Option<ArcMaterial>,
}

impl Mesh {
    /// Creates a new `Mesh`.
    ///
    /// * `name`      - Shape name from the source file.
    /// * `positions` - Vertex positions.
    /// * `normals`   - Vertex normals, one per position.
    /// * `uvs`       - Vertex texture coordinates, one per position.
    /// * `indices`   - Triangle vertex indices, three per triangle.
    pub fn new(
        name: &str,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
        indices: Vec<u32>,
    ) -> Self {
        assert_eq!(indices.len() % 3, 0, "indices do not form whole triangles");
        assert_eq!(
            normals.len(),
            positions.len(),
            "normal count does not match position count"
        );
        assert_eq!(
            uvs.len(),
            positions.len(),
            "uv count does not match position count"
        );
        Self {
            name: String::from(name),
            positions,
            normals,
            uvs,
            indices,
            material: None,
        }
    }

    /// Sets the material shared by all triangles.
    ///
    /// * `material` - The material.
    pub fn set_material(&mut self, material: ArcMaterial) {
        self.material = Some(material);
    }

    /// Returns the material shared by all triangles.
    pub fn material(&self) -> Option<&ArcMaterial> {
        self.material.as_ref()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_count() {
        let mesh = Mesh::new(
            "quad",
            vec![Vec3::ZERO; 4],
            vec![Vec3::Z; 4],
            vec![Vec2::ZERO; 4],
            vec![0, 1, 2, 0, 2, 3],
        );
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.material().is_none());
    }

    #[test]
    #[should_panic(expected = "whole triangles")]
    fn partial_triangle_panics() {
        Mesh::new(
            "bad",
            vec![Vec3::ZERO; 3],
            vec![Vec3::Z; 3],
            vec![Vec2::ZERO; 3],
            vec![0, 1],
        );
    }
}
