//! Scene I/O

#[macro_use]
extern crate log;

mod fileutil;
mod image_io;
mod obj;
mod scene_io;
mod translate;

// Re-export.
pub use fileutil::*;
pub use image_io::*;
pub use obj::*;
pub use scene_io::*;
pub use translate::*;
