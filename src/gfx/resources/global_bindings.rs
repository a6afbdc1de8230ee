//! Per-frame uniform bindings
//!
//! Camera matrices and the point light, shared by every draw in a frame and
//! bound at group 0.

use cgmath::Matrix4;

use crate::{
    gfx::camera::convert_matrix4_to_array,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Frame uniform content
///
/// MUST match `struct Frame` in `scene.wgsl`: 160 bytes, vec3 fields padded
/// out by the trailing scalar.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub light_position: [f32; 3],
    pub light_power: f32,
    pub light_color: [f32; 3],
    _padding: f32,
}

impl FrameUniform {
    pub fn new(
        projection: Matrix4<f32>,
        view: Matrix4<f32>,
        light_position: [f32; 3],
        light_power: f32,
        light_color: [f32; 3],
    ) -> Self {
        Self {
            projection: convert_matrix4_to_array(projection),
            view: convert_matrix4_to_array(view),
            light_position,
            light_power,
            light_color,
            _padding: 0.0,
        }
    }
}

pub type FrameUBO = UniformBuffer<FrameUniform>;

/// Layout and bind group for the frame uniform, bound to slot 0
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    /// Creates the layout and a bind group over `ubo`
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `ubo` - The frame uniform buffer to bind
    pub fn new(device: &wgpu::Device, ubo: &FrameUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Frame Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Frame Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn test_frame_uniform_layout() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 160);

        let frame = FrameUniform::new(
            Matrix4::identity(),
            Matrix4::identity(),
            [0.0, 2.0, 0.0],
            40.0,
            [1.0; 3],
        );
        let floats: [f32; 40] = bytemuck::cast(frame);
        assert_eq!(floats[33], 2.0);
        assert_eq!(floats[35], 40.0);
    }
}
