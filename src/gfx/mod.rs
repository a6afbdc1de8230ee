//! # Graphics Module
//!
//! Everything between the scene description and pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Fly camera, projection modes and key bindings
//! - **Geometry** ([`geometry`]) - Procedural primitives and the OBJ reader
//! - **Scene Management** ([`scene`]) - Mesh objects, the light and the selection
//! - **Resource Management** ([`resources`]) - Uniforms, textures and per-object GPU handles
//! - **Rendering Pipeline** ([`rendering`]) - Frame plans executed by the [`RenderEngine`]
//!
//! ## Usage
//!
//! The graphics system is normally driven by [`Viewer`](crate::viewer::Viewer):
//!
//! ```no_run
//! use tartan::config::ViewerConfig;
//! use tartan::diagnostics::Diagnostics;
//! use tartan::gfx::RenderEngine;
//!
//! let mut diagnostics = Diagnostics::new();
//! let engine = pollster::block_on(RenderEngine::new_headless(
//!     640,
//!     480,
//!     &ViewerConfig::default(),
//!     &mut diagnostics,
//! ));
//! ```

pub mod camera;
pub mod context;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{CameraManager, FlyCamera};
pub use context::GpuContext;
pub use rendering::render_engine::RenderEngine;
