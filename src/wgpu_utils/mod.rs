//! WGPU utility functions and helpers
//!
//! Builders for bind group layouts and bind groups, binding type shorthands
//! and a typed uniform buffer.

pub mod binding_builder;
pub mod binding_types;
pub mod uniform_buffer;

// Re-export main types
pub use binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};
pub use binding_types::*;
pub use uniform_buffer::UniformBuffer;
