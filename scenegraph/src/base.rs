//! Common

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

// Vector math comes from `glam`.
pub use glam::{Vec2, Vec3};
