//! Material translation

use crate::image_io::ImageIo;
use crate::obj::ObjMaterial;
use scenegraph::base::{Float, Vec3};
use scenegraph::inputmap::{ArcInputMap, InputMap};
use scenegraph::material::{ArcMaterial, Layers, UberMaterial};
use scenegraph::texture::ArcTexture;
use std::collections::HashMap;
use std::sync::Arc;

/// Index of refraction bound to the reflective layers of translated
/// materials.
const DEFAULT_IOR: Float = 3.0;

/// Roughness bound to the reflective layers of translated materials.
const DEFAULT_ROUGHNESS: Float = 0.01;

/// Metalness bound to the reflection layer of translated materials.
const DEFAULT_METALNESS: Float = 1.0;

/// Session scoped cache of loaded textures, keyed by name.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, ArcTexture>,
}

impl TextureCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture with the given name, loading it on first request.
    /// Within a session a name maps to at most one instance. Returns `None`
    /// when the image cannot be decoded; only successful loads are cached.
    ///
    /// * `io`       - Image decoder.
    /// * `basepath` - Path prepended to the texture name.
    /// * `name`     - Texture name from the material record.
    pub fn load(&mut self, io: &dyn ImageIo, basepath: &str, name: &str) -> Option<ArcTexture> {
        if let Some(texture) = self.textures.get(name) {
            return Some(Arc::clone(texture));
        }
        info!("Loading {}", name);
        match io.load_image(&format!("{}{}", basepath, name)) {
            Ok(texture) => {
                let texture = Arc::new(texture);
                self.textures.insert(String::from(name), Arc::clone(&texture));
                Some(texture)
            }
            Err(err) => {
                info!("Missing texture: {} ({})", name, err);
                None
            }
        }
    }
}

/// Translates legacy single layer material records into layered materials.
///
/// One translator holds the texture and material caches for a load session;
/// within the session the same record name always yields the identical
/// material instance.
#[derive(Default)]
pub struct MaterialTranslator {
    textures: TextureCache,
    materials: HashMap<String, ArcMaterial>,
}

impl MaterialTranslator {
    /// Creates a translator with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a material record, reusing the cached result for names
    /// seen before.
    ///
    /// Translation never fails; a texture that cannot be loaded falls back
    /// to the record's constant color.
    ///
    /// * `io`       - Image decoder for texture loads.
    /// * `record`   - Source material record.
    /// * `basepath` - Path prepended to texture names.
    pub fn translate(
        &mut self,
        io: &dyn ImageIo,
        record: &ObjMaterial,
        basepath: &str,
    ) -> ArcMaterial {
        if let Some(material) = self.materials.get(&record.name) {
            return Arc::clone(material);
        }
        let material = Arc::new(self.build(io, record, basepath));
        self.materials
            .insert(record.name.clone(), Arc::clone(&material));
        material
    }

    fn build(&mut self, io: &dyn ImageIo, record: &ObjMaterial, basepath: &str) -> UberMaterial {
        // Emissive records translate to an emission layer and nothing else.
        if record.emission.length_squared() > 0.0 {
            let mut material = UberMaterial::new(&record.name, Layers::EMISSION);
            material.set_input(
                "emission.color",
                self.color_input(io, basepath, &record.diffuse_texname, record.emission),
            );
            return material;
        }

        let d = record.diffuse;
        let s = record.specular;
        let r = record.transmittance;

        let bump = if record.bump_texname.is_empty() {
            None
        } else {
            self.textures.load(io, basepath, &record.bump_texname)
        };

        let mut layers = if r.length_squared() > 0.0 && s.length_squared() > 0.0 {
            Layers::DIFFUSE | Layers::REFLECTION | Layers::REFRACTION
        } else if d.length_squared() < 0.01 && s.length_squared() > 0.0 {
            Layers::REFLECTION
        } else if s.length_squared() > 0.0 || !record.specular_texname.is_empty() {
            Layers::DIFFUSE | Layers::REFLECTION
        } else {
            Layers::DIFFUSE
        };
        if bump.is_some() {
            layers |= Layers::SHADING_NORMAL;
        }

        let mut material = UberMaterial::new(&record.name, layers);

        if layers.contains(Layers::DIFFUSE) {
            material.set_input(
                "diffuse.color",
                self.color_input(io, basepath, &record.diffuse_texname, d),
            );
        }
        if layers.contains(Layers::REFLECTION) {
            material.set_input(
                "reflection.color",
                self.color_input(io, basepath, &record.specular_texname, s),
            );
            material.set_input("reflection.ior", InputMap::constant_float(DEFAULT_IOR));
            material.set_input(
                "reflection.roughness",
                InputMap::constant_float(DEFAULT_ROUGHNESS),
            );
            material.set_input(
                "reflection.metalness",
                InputMap::constant_float(DEFAULT_METALNESS),
            );
        }
        if layers.contains(Layers::REFRACTION) {
            // The transmitted color stays constant even when a texture is
            // present.
            material.set_input("refraction.color", InputMap::constant_float3(r));
            material.set_input("refraction.ior", InputMap::constant_float(DEFAULT_IOR));
            material.set_input(
                "refraction.roughness",
                InputMap::constant_float(DEFAULT_ROUGHNESS),
            );
        }
        if let Some(texture) = bump {
            material.set_input(
                "shading_normal",
                InputMap::remap(
                    InputMap::constant_float3(Vec3::new(0.0, 1.0, 0.0)),
                    InputMap::constant_float3(Vec3::new(-1.0, 1.0, 0.0)),
                    InputMap::sampler_bump_map(texture),
                ),
            );
        }

        material
    }

    /// Returns a gamma decoded sampling expression when the named texture
    /// loads, else the constant color.
    fn color_input(
        &mut self,
        io: &dyn ImageIo,
        basepath: &str,
        texname: &str,
        color: Vec3,
    ) -> ArcInputMap {
        if !texname.is_empty() {
            if let Some(texture) = self.textures.load(io, basepath, texname) {
                // Legacy color textures are stored gamma encoded.
                return InputMap::pow(InputMap::sampler(texture), InputMap::constant_float(2.2));
            }
        }
        InputMap::constant_float3(color)
    }
}
