//! Input maps

use crate::base::{Float, Vec3};
use crate::texture::ArcTexture;
use std::sync::Arc;

/// Atomic reference counted `InputMap`.
pub type ArcInputMap = Arc<InputMap>;

/// A node in a material parameter expression.
///
/// Loaders build these graphs to describe how a material input is computed at
/// a shading point; the shading backend evaluates them. This crate only
/// represents the structure.
#[derive(Clone, Debug)]
pub enum InputMap {
    /// Scalar constant.
    ConstantFloat(Float),

    /// RGB constant.
    ConstantFloat3(Vec3),

    /// Samples a texture at the shading point's UV coordinates.
    Sampler(ArcTexture),

    /// Samples a texture as a tangent space normal perturbation.
    SamplerBumpMap(ArcTexture),

    /// Raises `base` to `power`, component wise.
    Pow {
        /// Value being raised.
        base: ArcInputMap,
        /// Exponent.
        power: ArcInputMap,
    },

    /// Linearly remaps `data` from the `source` range to the `destination`
    /// range, component wise.
    Remap {
        /// Input range.
        source: ArcInputMap,
        /// Output range.
        destination: ArcInputMap,
        /// Value being remapped.
        data: ArcInputMap,
    },
}

impl InputMap {
    /// Creates a scalar constant input.
    ///
    /// * `value` - The constant value.
    pub fn constant_float(value: Float) -> ArcInputMap {
        Arc::new(Self::ConstantFloat(value))
    }

    /// Creates an RGB constant input.
    ///
    /// * `value` - The constant value.
    pub fn constant_float3(value: Vec3) -> ArcInputMap {
        Arc::new(Self::ConstantFloat3(value))
    }

    /// Creates a texture sampling input.
    ///
    /// * `texture` - The texture to sample.
    pub fn sampler(texture: ArcTexture) -> ArcInputMap {
        Arc::new(Self::Sampler(texture))
    }

    /// Creates a bump map sampling input.
    ///
    /// * `texture` - The texture to sample.
    pub fn sampler_bump_map(texture: ArcTexture) -> ArcInputMap {
        Arc::new(Self::SamplerBumpMap(texture))
    }

    /// Creates a power input raising `base` to `power`.
    ///
    /// * `base`  - Value being raised.
    /// * `power` - Exponent.
    pub fn pow(base: ArcInputMap, power: ArcInputMap) -> ArcInputMap {
        Arc::new(Self::Pow { base, power })
    }

    /// Creates a remap input taking `data` from the `source` range to the
    /// `destination` range.
    ///
    /// * `source`      - Input range.
    /// * `destination` - Output range.
    /// * `data`        - Value being remapped.
    pub fn remap(source: ArcInputMap, destination: ArcInputMap, data: ArcInputMap) -> ArcInputMap {
        Arc::new(Self::Remap {
            source,
            destination,
            data,
        })
    }

    /// Returns the payload of a `ConstantFloat` node.
    pub fn as_constant_float(&self) -> Option<Float> {
        match self {
            Self::ConstantFloat(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the payload of a `ConstantFloat3` node.
    pub fn as_constant_float3(&self) -> Option<Vec3> {
        match self {
            Self::ConstantFloat3(value) => Some(*value),
            _ => None,
        }
    }

    /// Collects the textures referenced anywhere in the expression.
    ///
    /// * `textures` - Receives a clone of every referenced texture handle.
    pub fn collect_textures(&self, textures: &mut Vec<ArcTexture>) {
        match self {
            Self::ConstantFloat(_) | Self::ConstantFloat3(_) => (),
            Self::Sampler(texture) | Self::SamplerBumpMap(texture) => {
                textures.push(Arc::clone(texture));
            }
            Self::Pow { base, power } => {
                base.collect_textures(textures);
                power.collect_textures(textures);
            }
            Self::Remap {
                source,
                destination,
                data,
            } => {
                source.collect_textures(textures);
                destination.collect_textures(textures);
                data.collect_textures(textures);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;

    fn test_texture(name: &str) -> ArcTexture {
        Arc::new(Texture::new(name, 1, 1, vec![Vec3::ONE]))
    }

    #[test]
    fn constant_accessors() {
        let f = InputMap::constant_float(0.25);
        assert_eq!(f.as_constant_float(), Some(0.25));
        assert_eq!(f.as_constant_float3(), None);

        let c = InputMap::constant_float3(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(c.as_constant_float3(), Some(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(c.as_constant_float(), None);
    }

    #[test]
    fn collect_textures_walks_nested_expressions() {
        let albedo = test_texture("albedo.png");
        let bump = test_texture("bump.png");

        let expr = InputMap::remap(
            InputMap::constant_float3(Vec3::new(0.0, 1.0, 0.0)),
            InputMap::constant_float3(Vec3::new(-1.0, 1.0, 0.0)),
            InputMap::pow(
                InputMap::sampler(Arc::clone(&albedo)),
                InputMap::constant_float(2.2),
            ),
        );

        let mut textures = Vec::new();
        expr.collect_textures(&mut textures);
        assert_eq!(textures.len(), 1);
        assert!(Arc::ptr_eq(&textures[0], &albedo));

        let mut textures = Vec::new();
        InputMap::sampler_bump_map(Arc::clone(&bump)).collect_textures(&mut textures);
        assert_eq!(textures.len(), 1);
        assert!(Arc::ptr_eq(&textures[0], &bump));
    }

    #[test]
    fn constants_reference_no_textures() {
        let mut textures = Vec::new();
        InputMap::constant_float(1.0).collect_textures(&mut textures);
        InputMap::constant_float3(Vec3::ZERO).collect_textures(&mut textures);
        assert!(textures.is_empty());
    }
}
