// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles frame planning, render pipelines, and frame execution.

pub mod frame;
pub mod pipeline_manager;
pub mod render_engine;
#[cfg(test)]
mod shading;

// Re-export main types
pub use frame::{DrawItem, FramePlan, FrameStats};
pub use pipeline_manager::{BindingSlots, PipelineConfig, PipelineManager, PipelineStats, ShaderLog};
pub use render_engine::{OverlayFn, RenderEngine};
