use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use image::RgbaImage;

use crate::error::{Result, ViewerError};

use super::vertex::Vertex;

/// Stable identity of a scene object, independent of its position in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Blinn-Phong material. Colors are linear, not gamma-encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    /// Shininess factor, always positive
    specular_power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient_color: [0.1; 3],
            diffuse_color: [0.5; 3],
            specular_color: [1.0; 3],
            specular_power: 10.0,
        }
    }
}

/// Selects one of the material color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialChannel {
    Ambient,
    Diffuse,
    Specular,
}

impl Material {
    /// Builder pattern: Set diffuse color
    pub fn with_diffuse(mut self, color: [f32; 3]) -> Self {
        self.diffuse_color = color;
        self
    }

    pub fn color(&self, channel: MaterialChannel) -> [f32; 3] {
        match channel {
            MaterialChannel::Ambient => self.ambient_color,
            MaterialChannel::Diffuse => self.diffuse_color,
            MaterialChannel::Specular => self.specular_color,
        }
    }

    pub fn set_color(&mut self, channel: MaterialChannel, color: [f32; 3]) {
        match channel {
            MaterialChannel::Ambient => self.ambient_color = color,
            MaterialChannel::Diffuse => self.diffuse_color = color,
            MaterialChannel::Specular => self.specular_color = color,
        }
    }

    pub fn specular_power(&self) -> f32 {
        self.specular_power
    }

    pub fn set_specular_power(&mut self, power: f32) -> Result<()> {
        if !power.is_finite() || power <= 0.0 {
            return Err(ViewerError::precondition(format!(
                "shininess must be a positive number, got {}",
                power
            )));
        }
        self.specular_power = power;
        Ok(())
    }
}

/// How texture coordinates are derived in the fragment stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureMappingKind {
    #[default]
    Simple,
    Planar,
    Cylindrical,
    Spherical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureMapping {
    pub kind: TextureMappingKind,
    pub axis: Axis,
}

impl TextureMapping {
    pub const ALL_KINDS: [TextureMappingKind; 4] = [
        TextureMappingKind::Simple,
        TextureMappingKind::Planar,
        TextureMappingKind::Cylindrical,
        TextureMappingKind::Spherical,
    ];
    pub const ALL_AXES: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn new(kind: TextureMappingKind, axis: Axis) -> Self {
        Self { kind, axis }
    }

    /// Only pass-through mapping has defined shader behavior
    pub fn is_designed(&self) -> bool {
        self.kind == TextureMappingKind::Simple
    }

    /// Values written to the object uniform, matching the constants in `scene.wgsl`
    pub fn shader_codes(&self) -> (u32, u32) {
        let kind = match self.kind {
            TextureMappingKind::Simple => 0,
            TextureMappingKind::Planar => 1,
            TextureMappingKind::Cylindrical => 2,
            TextureMappingKind::Spherical => 3,
        };
        let axis = match self.axis {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        };
        (kind, axis)
    }
}

/// Translation, per-axis rotation (radians) and scale of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Model matrix `T * Rx * Rz * Ry * S`.
    ///
    /// Rotation is not commutative; the renderer depends on this exact order.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse-transpose of the model matrix, identity when the model is singular
    pub fn normal_matrix(&self) -> Matrix4<f32> {
        use cgmath::Matrix;

        self.model_matrix()
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity)
    }
}

/// Geometry and surface state of a mesh object
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Material,
    pub texture: Option<RgbaImage>,
    pub bump_map: Option<RgbaImage>,
    pub texture_mapping: TextureMapping,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks the invariants a mesh must hold before it can be buffered
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(ViewerError::precondition("mesh has no vertices"));
        }
        if self.indices.is_empty() {
            return Err(ViewerError::precondition("mesh has no indices"));
        }
        if self.indices.len() % 3 != 0 {
            return Err(ViewerError::precondition(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let vertex_count = self.vertices.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ViewerError::precondition(format!(
                "index {} references past {} vertices",
                bad, vertex_count
            )));
        }
        Ok(())
    }

    /// Appends another mesh, rebasing its indices onto this vertex list
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// Point light state. Position is `transform.translation`, power is `transform.scale.x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    pub color: [f32; 3],
}

impl Default for LightData {
    fn default() -> Self {
        Self { color: [1.0; 3] }
    }
}

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Mesh(MeshData),
    Light(LightData),
}

/// A named object in the scene: either a mesh or the single point light
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub(crate) id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, ObjectKind::Light(_))
    }

    pub fn as_mesh(&self) -> Option<&MeshData> {
        match &self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            ObjectKind::Light(_) => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshData> {
        match &mut self.kind {
            ObjectKind::Mesh(mesh) => Some(mesh),
            ObjectKind::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&LightData> {
        match &self.kind {
            ObjectKind::Light(light) => Some(light),
            ObjectKind::Mesh(_) => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut LightData> {
        match &mut self.kind {
            ObjectKind::Light(light) => Some(light),
            ObjectKind::Mesh(_) => None,
        }
    }

    /// Light position, meaningful for the light object
    pub fn light_position(&self) -> Vector3<f32> {
        self.transform.translation
    }

    /// Light intensity, stored in the scale's x component
    pub fn light_power(&self) -> f32 {
        self.transform.scale.x
    }
}
