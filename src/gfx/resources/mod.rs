//! GPU resource management
//!
//! Uniform layouts, textures, and the per-object resource registry.

pub mod global_bindings;
pub mod gpu_resources;
pub mod material;
pub mod registry;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{FrameUBO, FrameUniform, GlobalBindings};
pub use gpu_resources::{DrawMesh, GpuResourceManager, MeshGpuResources};
pub use material::{ObjectLayouts, ObjectUBO, ObjectUniform};
pub use registry::ResourceRegistry;
pub use texture_resource::{TextureResource, TextureSlot};
