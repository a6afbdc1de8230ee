// src/lib.rs
//! Tartan scene viewer
//!
//! An interactive 3D viewer built on wgpu and winit: procedural and OBJ
//! meshes, one point light, textured and bump-mapped Blinn-Phong shading,
//! and a free-flying camera.
//!
//! The [`Viewer`] is the core and can run headless; [`TartanApp`] hosts it
//! in a window with an ImGui panel.

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gfx;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TartanApp;
pub use config::ViewerConfig;
pub use error::{ObjError, ViewerError};
pub use viewer::{UiEvent, Viewer};
