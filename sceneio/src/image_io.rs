//! Image I/O

use scenegraph::base::Vec3;
use scenegraph::texture::Texture;

/// Decodes images into textures.
///
/// Scene loaders go through this interface so material translation can be
/// tested without touching the file system.
pub trait ImageIo {
    /// Decodes the image at the given path into an RGB texture named after
    /// the path.
    ///
    /// * `path` - Path to the image file.
    fn load_image(&self, path: &str) -> Result<Texture, String>;
}

/// `ImageIo` reading files from disk with the `image` crate.
///
/// Integer formats are scaled to `[0, 1]`; no gamma conversion is applied.
pub struct DiskImageIo;

impl ImageIo for DiskImageIo {
    fn load_image(&self, path: &str) -> Result<Texture, String> {
        let image =
            image::open(path).map_err(|err| format!("Error reading image {}. {}.", path, err))?;
        let rgb = image.to_rgb32f();
        let (width, height) = rgb.dimensions();
        let texels: Vec<Vec3> = rgb
            .pixels()
            .map(|pixel| Vec3::new(pixel[0], pixel[1], pixel[2]))
            .collect();
        Ok(Texture::new(path, width as usize, height as usize, texels))
    }
}
