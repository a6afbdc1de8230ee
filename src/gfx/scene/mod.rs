//! # Scene Management Module
//!
//! The scene object model: named mesh objects plus exactly one point light,
//! their transforms, materials and textures, and the current selection.
//!
//! ## Key Components
//!
//! - [`Scene`] - Ordered object list with the light pinned at slot 0
//! - [`SceneObject`] - Tagged union over [`MeshData`] and [`LightData`]
//! - [`Transform`] - Translation, rotation and scale with the fixed model-matrix order
//! - [`Vertex`] - The GPU vertex layout
//!
//! ## Usage
//!
//! ```no_run
//! use tartan::gfx::geometry::make_cube_at_origin;
//! use tartan::gfx::scene::Scene;
//!
//! let mut scene = Scene::new();
//! let id = scene.add_mesh("Cube", make_cube_at_origin());
//! scene.select_last();
//! ```
//!
//! GPU handles are not stored on objects. They live in the resource registry,
//! keyed by [`ObjectId`].

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{
    Axis, LightData, Material, MaterialChannel, MeshData, ObjectId, ObjectKind, SceneObject,
    TextureMapping, TextureMappingKind, Transform,
};
pub use scene::{Scene, SceneStatistics, LIGHT_INDEX};
pub use vertex::Vertex;
