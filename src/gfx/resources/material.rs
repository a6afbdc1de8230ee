//! Per-object uniforms and bind group layouts
//!
//! Each mesh gets its own object uniform (model and normal matrices plus the
//! Blinn-Phong material) at group 1, and a texture bind group holding the
//! diffuse image and bump map at group 2.

use cgmath::Matrix4;

use crate::{
    gfx::{
        camera::convert_matrix4_to_array,
        scene::{Material, TextureMapping},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::texture_resource::TextureResource;

/// GPU uniform data for one object
///
/// MUST match `struct Object` in `scene.wgsl` (192 bytes). The trailing pads
/// are separate scalars; a `vec3<u32>` would change the alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub ambient: [f32; 3],
    pub specular_power: f32,
    pub diffuse: [f32; 3],
    pub mapping_kind: u32,
    pub specular: [f32; 3],
    pub mapping_axis: u32,
    pub has_bump: u32,
    _padding0: u32,
    _padding1: u32,
    _padding2: u32,
}

impl ObjectUniform {
    pub fn new(
        model: Matrix4<f32>,
        normal_matrix: Matrix4<f32>,
        material: &Material,
        mapping: TextureMapping,
        has_bump: bool,
    ) -> Self {
        let (mapping_kind, mapping_axis) = mapping.shader_codes();
        Self {
            model: convert_matrix4_to_array(model),
            normal_matrix: convert_matrix4_to_array(normal_matrix),
            ambient: material.ambient_color,
            specular_power: material.specular_power(),
            diffuse: material.diffuse_color,
            mapping_kind,
            specular: material.specular_color,
            mapping_axis,
            has_bump: has_bump as u32,
            _padding0: 0,
            _padding1: 0,
            _padding2: 0,
        }
    }
}

pub type ObjectUBO = UniformBuffer<ObjectUniform>;

/// Layouts shared by every object's bind groups
#[derive(Clone)]
pub struct ObjectLayouts {
    object: BindGroupLayoutWithDesc,
    textures: BindGroupLayoutWithDesc,
}

impl ObjectLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let object = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Object Bind Group Layout");

        let textures = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Texture Bind Group Layout");

        Self { object, textures }
    }

    pub fn object_layout(&self) -> &wgpu::BindGroupLayout {
        &self.object.layout
    }

    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.textures.layout
    }

    pub fn create_object_bind_group(&self, device: &wgpu::Device, ubo: &ObjectUBO) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.object)
            .resource(ubo.binding_resource())
            .create(device, "Object Bind Group")
    }

    /// Texture units 0 (diffuse) and 1 (bump), each as texture + sampler
    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        diffuse: &TextureResource,
        bump: &TextureResource,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.textures)
            .texture(&diffuse.view)
            .sampler(&diffuse.sampler)
            .texture(&bump.view)
            .sampler(&bump.sampler)
            .create(device, "Texture Bind Group")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{Axis, TextureMappingKind};
    use cgmath::SquareMatrix;

    #[test]
    fn test_object_uniform_layout() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 192);
        assert_eq!(std::mem::size_of::<ObjectUniform>() % 16, 0);
    }

    #[test]
    fn test_object_uniform_packs_material() {
        let mut material = Material::default();
        material.set_specular_power(32.0).unwrap();
        let mapping = TextureMapping::new(TextureMappingKind::Cylindrical, Axis::Z);

        let uniform = ObjectUniform::new(
            Matrix4::identity(),
            Matrix4::identity(),
            &material,
            mapping,
            true,
        );
        assert_eq!(uniform.specular_power, 32.0);
        assert_eq!(uniform.diffuse, [0.5; 3]);
        assert_eq!((uniform.mapping_kind, uniform.mapping_axis), (2, 2));
        assert_eq!(uniform.has_bump, 1);
    }
}
