//! Viewer configuration
//!
//! Builder-style settings for the window, initial camera, render state and the
//! assets used by the default scene.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use crate::gfx::camera::ProjectionMode;

/// Environment variable that overrides [`ViewerConfig::asset_dir`]
pub const ASSET_DIR_ENV: &str = "TARTAN_ASSET_DIR";

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Vector3<f32>,
    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(6.5, 5.5, -10.0),
            yaw: -32.0,
            pitch: -15.0,
            speed: 0.1,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f64; 4],
    pub camera: CameraConfig,
    pub projection: ProjectionMode,
    pub back_face_culling: bool,
    pub seed: u64,
    pub asset_dir: PathBuf,
    pub ground_texture: PathBuf,
    pub default_model: PathBuf,
    /// Scene name given to the default model
    pub default_model_name: String,
    pub default_model_texture: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Tartan".to_string(),
            width: 1200,
            height: 800,
            clear_color: [0.2, 0.2, 0.2, 1.0],
            camera: CameraConfig::default(),
            projection: ProjectionMode::Perspective,
            back_face_culling: false,
            seed: 0x7a27a2,
            asset_dir: PathBuf::from("assets"),
            ground_texture: PathBuf::from("textures/bricks.jpg"),
            default_model: PathBuf::from("models/icoSphere.obj"),
            default_model_name: "IcoSphere".to_string(),
            default_model_texture: PathBuf::from("textures/steelMesh.jpg"),
        }
    }
}

impl ViewerConfig {
    /// Default configuration with the asset directory taken from `TARTAN_ASSET_DIR`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(ASSET_DIR_ENV) {
            log::info!("Using asset directory from {}: {}", ASSET_DIR_ENV, dir);
            config.asset_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_clear_color(mut self, color: [f64; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_projection(mut self, projection: ProjectionMode) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_back_face_culling(mut self, enabled: bool) -> Self {
        self.back_face_culling = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Resolves a path relative to the asset directory; absolute paths pass through
    pub fn asset_path(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.asset_dir.join(relative)
        }
    }
}
