//! # Vertex Data Structures
//!
//! The vertex format shared by every mesh in the viewer. The byte layout and
//! field order are a contract with `scene.wgsl`: locations 0, 1 and 2 are read
//! at the offsets produced by [`Vertex::desc`].

use std::mem;

/// A mesh vertex with position, texture coordinate and normal.
///
/// # Memory Layout
///
/// `#[repr(C)]`, 32 bytes: position at offset 0, uv at 12, normal at 20.
/// The struct is uploaded verbatim with `bytemuck::cast_slice`.
///
/// # Examples
///
/// ```no_run
/// use tartan::gfx::scene::vertex::Vertex;
///
/// let vertex = Vertex::new([0.0, 1.0, 0.0], [0.5, 0.5], [0.0, 1.0, 0.0]);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position [x, y, z]
    pub position: [f32; 3],
    /// Texture coordinate [u, v]
    pub uv: [f32; 2],
    /// Normal [nx, ny, nz], not required to be unit length
    pub normal: [f32; 3],
}

impl Vertex {
    pub const POSITION_OFFSET: wgpu::BufferAddress = 0;
    pub const UV_OFFSET: wgpu::BufferAddress = mem::size_of::<[f32; 3]>() as wgpu::BufferAddress;
    pub const NORMAL_OFFSET: wgpu::BufferAddress =
        (mem::size_of::<[f32; 3]>() + mem::size_of::<[f32; 2]>()) as wgpu::BufferAddress;

    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
        wgpu::VertexAttribute {
            offset: Self::POSITION_OFFSET,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: Self::UV_OFFSET,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x2,
        },
        wgpu::VertexAttribute {
            offset: Self::NORMAL_OFFSET,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];

    pub fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: UV (Float32x2)
    /// - Attribute 2: Normal (Float32x3)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_shader_contract() {
        assert_eq!(mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::UV_OFFSET, 12);
        assert_eq!(Vertex::NORMAL_OFFSET, 20);

        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 32);
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }
}
