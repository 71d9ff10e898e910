//! Scene loading

use crate::fileutil::file_extension;
use crate::image_io::{DiskImageIo, ImageIo};
use crate::obj::{load_obj, ObjMaterial, ObjShape};
use crate::translate::MaterialTranslator;
use scenegraph::base::Vec2;
use scenegraph::light::Light;
use scenegraph::material::ArcMaterial;
use scenegraph::scene::Scene;
use scenegraph::shape::Mesh;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Loads scene descriptions into a `Scene`.
pub trait SceneIo {
    /// Loads the scene at `filename`.
    ///
    /// * `filename` - Path to the scene description.
    /// * `basepath` - Path prepended to material library and texture names.
    fn load_scene(&self, filename: &str, basepath: &str) -> Result<Scene, String>;
}

/// `SceneIo` for Wavefront OBJ files.
pub struct ObjSceneIo {
    image_io: Box<dyn ImageIo>,
}

impl ObjSceneIo {
    /// Creates a loader decoding textures with the given image decoder.
    ///
    /// * `image_io` - Image decoder.
    pub fn new(image_io: Box<dyn ImageIo>) -> Self {
        Self { image_io }
    }
}

impl SceneIo for ObjSceneIo {
    fn load_scene(&self, filename: &str, basepath: &str) -> Result<Scene, String> {
        let (shapes, materials) = load_obj(filename, basepath)?;
        Ok(assemble_scene(
            self.image_io.as_ref(),
            &shapes,
            &materials,
            basepath,
        ))
    }
}

/// Returns a scene loader for the file name's extension.
///
/// * `filename` - Path to the scene description.
pub fn scene_io_for(filename: &str) -> Result<Box<dyn SceneIo>, String> {
    match file_extension(filename).as_str() {
        "obj" => Ok(Box::new(ObjSceneIo::new(Box::new(DiskImageIo)))),
        ext => Err(format!(
            "Scene format '{}' of {} is not supported",
            ext, filename
        )),
    }
}

/// Builds a scene from parsed shapes and materials.
///
/// Each shape is split into one mesh per used material id; meshes whose
/// material has an emission layer get one area light per triangle.
///
/// * `io`        - Image decoder for texture loads.
/// * `shapes`    - Parsed shapes.
/// * `materials` - Parsed material records.
/// * `basepath`  - Path prepended to texture names.
pub fn assemble_scene(
    io: &dyn ImageIo,
    shapes: &[ObjShape],
    materials: &[ObjMaterial],
    basepath: &str,
) -> Scene {
    let mut translator = MaterialTranslator::new();
    let translated: Vec<ArcMaterial> = materials
        .iter()
        .map(|record| translator.translate(io, record, basepath))
        .collect();

    let mut scene = Scene::new();
    for shape in shapes {
        assert_eq!(
            shape.indices.len() % 3,
            0,
            "shape '{}' is not triangulated",
            shape.name
        );
        assert_eq!(
            shape.material_ids.len(),
            shape.indices.len() / 3,
            "shape '{}' has inconsistent material ids",
            shape.name
        );

        // Split in deterministic order over the used material ids.
        let used: BTreeSet<i32> = shape.material_ids.iter().copied().collect();
        for material_id in used {
            let mut mesh = split_shape(shape, material_id);
            if material_id >= 0 {
                mesh.set_material(Arc::clone(&translated[material_id as usize]));
            }
            let mesh = Arc::new(mesh);
            scene.attach_shape(Arc::clone(&mesh));

            if mesh.material().map_or(false, |m| m.has_emission()) {
                for prim_id in 0..mesh.triangle_count() {
                    scene.attach_light(Light::area(Arc::clone(&mesh), prim_id));
                }
            }
        }
    }
    scene
}

/// Extracts the triangles of one material id into a mesh of their own,
/// remapping indices to the vertices they use.
fn split_shape(shape: &ObjShape, material_id: i32) -> Mesh {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for (triangle, id) in shape.indices.chunks_exact(3).zip(&shape.material_ids) {
        if *id != material_id {
            continue;
        }
        for index in triangle {
            let next = remap.len() as u32;
            let mapped = *remap.entry(*index).or_insert_with(|| {
                positions.push(shape.positions[*index as usize]);
                normals.push(shape.normals[*index as usize]);
                // Shapes without texture coordinates get zeroes.
                uvs.push(
                    shape
                        .texcoords
                        .get(*index as usize)
                        .copied()
                        .unwrap_or(Vec2::ZERO),
                );
                next
            });
            indices.push(mapped);
        }
    }

    Mesh::new(&shape.name, positions, normals, uvs, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenegraph::base::Vec3;
    use scenegraph::texture::Texture;

    /// `ImageIo` for scenes that reference no textures.
    struct NoImages;

    impl ImageIo for NoImages {
        fn load_image(&self, path: &str) -> Result<Texture, String> {
            Err(format!("no images in tests: {}", path))
        }
    }

    fn quad_shape(material_ids: Vec<i32>) -> ObjShape {
        ObjShape {
            name: String::from("quad"),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            texcoords: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3],
            material_ids,
        }
    }

    fn diffuse_record(name: &str) -> ObjMaterial {
        ObjMaterial {
            name: String::from(name),
            diffuse: Vec3::new(0.5, 0.5, 0.5),
            ..ObjMaterial::default()
        }
    }

    #[test]
    fn shapes_are_split_per_material() {
        let shape = quad_shape(vec![0, 1]);
        let materials = vec![diffuse_record("red"), diffuse_record("green")];

        let scene = assemble_scene(&NoImages, &[shape], &materials, "");
        assert_eq!(scene.shapes().len(), 2);

        let first = &scene.shapes()[0];
        assert_eq!(first.triangle_count(), 1);
        assert_eq!(first.indices, vec![0, 1, 2]);
        assert_eq!(first.positions.len(), 3);
        assert_eq!(first.material().unwrap().name, "red");

        // The second triangle reuses vertices 0 and 2; both get remapped.
        let second = &scene.shapes()[1];
        assert_eq!(second.indices, vec![0, 1, 2]);
        assert_eq!(second.positions[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(second.positions[1], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(second.positions[2], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(second.material().unwrap().name, "green");

        // Zero filled texture coordinates, one per vertex.
        assert_eq!(first.uvs, vec![Vec2::ZERO; 3]);
    }

    #[test]
    fn emissive_meshes_get_one_area_light_per_triangle() {
        let shape = quad_shape(vec![0, 0]);
        let mut lamp = diffuse_record("lamp");
        lamp.emission = Vec3::new(5.0, 5.0, 5.0);

        let scene = assemble_scene(&NoImages, &[shape], &[lamp], "");
        assert_eq!(scene.shapes().len(), 1);
        assert_eq!(scene.lights().len(), 2);

        for (expected, light) in scene.lights().iter().enumerate() {
            match light {
                Light::Area { mesh, prim_id } => {
                    assert!(Arc::ptr_eq(mesh, &scene.shapes()[0]));
                    assert_eq!(*prim_id, expected);
                }
                other => panic!("unexpected light {:?}", other),
            }
        }
    }

    #[test]
    fn unbound_faces_get_no_material_and_no_light() {
        let shape = quad_shape(vec![-1, -1]);

        let scene = assemble_scene(&NoImages, &[shape], &[], "");
        assert_eq!(scene.shapes().len(), 1);
        assert!(scene.shapes()[0].material().is_none());
        assert!(scene.lights().is_empty());
    }

    #[test]
    fn shapes_share_translated_materials() {
        let first = quad_shape(vec![0, 0]);
        let second = quad_shape(vec![0, 0]);
        let materials = vec![diffuse_record("walls")];

        let scene = assemble_scene(&NoImages, &[first, second], &materials, "");
        assert_eq!(scene.shapes().len(), 2);
        assert!(Arc::ptr_eq(
            scene.shapes()[0].material().unwrap(),
            scene.shapes()[1].material().unwrap()
        ));
    }

    #[test]
    fn loaders_are_selected_by_extension() {
        assert!(scene_io_for("scenes/room.obj").is_ok());
        match scene_io_for("scenes/room.ply") {
            Ok(_) => panic!("ply should not resolve to a loader"),
            Err(err) => assert!(err.contains("not supported"), "{}", err),
        }
    }
}
