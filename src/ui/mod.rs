//! # User Interface Module
//!
//! Dear ImGui overlay for the viewer.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`scene_panel`] - Object selection, asset loading, light and material editing
//!
//! The panel never mutates the scene directly. It returns
//! [`UiEvent`](crate::viewer::UiEvent)s that the host hands to the viewer,
//! so loads go through the same path as every other input.
//!
//! ## Input Handling
//!
//! When ImGui wants the mouse, camera look is suspended; when it wants the
//! keyboard, held movement keys are dropped. Each is tracked separately in
//! [`UiCapture`].

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::{UiCapture, UiManager};
pub use panel::{scene_panel, ScenePanelState};
