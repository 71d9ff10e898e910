//! Scene graph

#[macro_use]
extern crate lazy_static;

// Re-export.
pub mod base;
pub mod inputmap;
pub mod light;
pub mod material;
pub mod scene;
pub mod shape;
pub mod texture;
