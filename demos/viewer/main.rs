//! # Tartan Viewer Demo
//!
//! Opens a window with the default scene: a textured ground, a pyramid of
//! cubes, a floating cube and the icosphere model.
//!
//! ## Usage:
//! ```bash
//! TARTAN_ASSET_DIR=path/to/assets cargo run --example viewer
//! ```
//!
//! ## Controls:
//! - W/S/A/D/Q/E move the camera, right mouse button looks around
//! - U/N, H/L, K/J move the selected object along y, x and z
//! - +/- scale it, X/Y/C rotate it (hold Ctrl to reverse)
//! - P switches between perspective and orthographic projection
//!
//! Extra OBJ files given on the command line are loaded after the default scene.

use anyhow::Context;
use std::path::PathBuf;
use tartan::{TartanApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env().with_title("Tartan Viewer");
    let mut app = TartanApp::new(config)?;

    let viewer = app.viewer_mut();
    viewer.load_default_scene();

    let models: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if !models.is_empty() {
        viewer
            .load_models(&models)
            .context("failed to load models from the command line")?;
    }

    app.run()
}
