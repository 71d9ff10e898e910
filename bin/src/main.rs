#[macro_use]
extern crate log;

use clap::Parser;
use scenegraph::base::Vec3;
use scenegraph::light::Light;
use scenegraph::scene::Scene;
use sceneio::{parent_path, scene_io_for};

/// Scene loading options.
#[derive(Parser, Clone)]
#[clap(author, version, about, long_about = None)]
struct Options {
    /// Base path for material libraries and textures.
    #[clap(
        long = "basepath",
        short = 'b',
        value_name = "PATH",
        help = "Resolve material library and texture names against this path \
                instead of the scene file's directory."
    )]
    basepath: Option<String>,

    /// Suppress the scene summaries.
    #[clap(long, help = "Suppress all text output other than error messages.")]
    quiet: bool,

    /// Input scene file paths.
    #[clap(help = "Input scene files")]
    paths: Vec<String>,
}

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();

    // Process the scene files.
    for path in options.paths.iter() {
        // In case of error report it and continue.
        match load(path, &options) {
            Ok(scene) => summarize(path, &scene, options.quiet),
            Err(e) => error!("{e}"),
        }
    }
}

/// Loads one scene file.
fn load(path: &str, options: &Options) -> Result<Scene, String> {
    let io = scene_io_for(path)?;
    let basepath = match &options.basepath {
        Some(basepath) => basepath.clone(),
        None => parent_path(path),
    };
    let mut scene = io.load_scene(path, &basepath)?;

    // Later stages expect at least one light in the scene.
    if scene.lights().is_empty() {
        scene.attach_light(Light::directional(
            Vec3::new(-0.5, -1.0, -0.5),
            Vec3::new(1.0, 1.0, 1.0),
        ));
    }

    Ok(scene)
}

/// Prints what a scene contains.
fn summarize(path: &str, scene: &Scene, quiet: bool) {
    if quiet {
        return;
    }
    let triangles: usize = scene
        .shapes()
        .iter()
        .map(|shape| shape.triangle_count())
        .sum();
    info!(
        "Loaded {path}: {} shapes, {} triangles, {} lights",
        scene.shapes().len(),
        triangles,
        scene.lights().len()
    );
}
