//! # Geometry Generation and Loading
//!
//! Procedural primitives and the OBJ reader. Both produce plain [`MeshData`]
//! that the scene owns; uploading happens later in the resource manager.
//!
//! ## Usage
//!
//! ```no_run
//! use tartan::gfx::geometry::{make_pyramid, parse_obj_file};
//! use tartan::gfx::scene::{MeshData, Scene};
//!
//! let mut scene = Scene::new();
//! scene.add_mesh("Pyramid", make_pyramid(3));
//!
//! let sphere: MeshData = parse_obj_file("assets/models/icoSphere.obj").unwrap().into();
//! scene.add_mesh("IcoSphere", sphere);
//! ```
//!
//! [`MeshData`]: crate::gfx::scene::MeshData

pub mod obj_parser;
pub mod primitives;

pub use obj_parser::{parse_obj_file, parse_obj_str, ObjMesh};
pub use primitives::*;
