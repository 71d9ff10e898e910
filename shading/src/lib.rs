//! Shading

mod flags;
mod fresnel;
mod ubershader;

// Re-export.
pub use flags::*;
pub use fresnel::*;
pub use ubershader::*;
