//! Texture

use crate::base::Vec3;
use std::sync::Arc;

/// A decoded RGB image addressed by name.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Name the image was requested under.
    pub name: String,

    /// Width in texels.
    pub width: usize,

    /// Height in texels.
    pub height: usize,

    /// Texel values in row-major order. Values are stored as decoded; gamma
    /// conversion is expressed in the material inputs, not here.
    pub texels: Vec<Vec3>,
}

impl Texture {
    /// Creates a new `Texture`.
    ///
    /// * `name`   - Name the image was requested under.
    /// * `width`  - Width in texels.
    /// * `height` - Height in texels.
    /// * `texels` - Texel values in row-major order.
    pub fn new(name: &str, width: usize, height: usize, texels: Vec<Vec3>) -> Self {
        assert_eq!(
            texels.len(),
            width * height,
            "texel count does not match image dimensions"
        );
        Self {
            name: String::from(name),
            width,
            height,
            texels,
        }
    }
}

/// Atomic reference counted `Texture`.
pub type ArcTexture = Arc<Texture>;
