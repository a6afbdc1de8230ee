//! GPU resource manager
//!
//! Creates and owns the vertex, index, uniform and texture resources of every
//! uploaded mesh object, keyed by [`ObjectId`]. Two 1x1 fallback textures are
//! bound for objects without a diffuse image or bump map.

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::{
    error::{Result, ViewerError},
    gfx::{
        context::GpuContext,
        scene::{MeshData, ObjectId},
    },
};

use super::{
    material::{ObjectLayouts, ObjectUBO, ObjectUniform},
    registry::ResourceRegistry,
    texture_resource::{TextureResource, TextureSlot},
};

/// Everything the draw loop needs for one mesh
pub struct MeshGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform: ObjectUBO,
    pub object_bind_group: wgpu::BindGroup,
    pub diffuse: Option<TextureResource>,
    pub bump: Option<TextureResource>,
    pub texture_bind_group: wgpu::BindGroup,
}

impl MeshGpuResources {
    pub fn has_texture(&self, slot: TextureSlot) -> bool {
        match slot {
            TextureSlot::Diffuse => self.diffuse.is_some(),
            TextureSlot::Bump => self.bump.is_some(),
        }
    }
}

pub struct GpuResourceManager {
    context: GpuContext,
    layouts: ObjectLayouts,
    default_diffuse: TextureResource,
    default_bump: TextureResource,
    meshes: ResourceRegistry<MeshGpuResources>,
}

impl GpuResourceManager {
    /// `layouts` must be the ones the scene pipeline was linked with
    pub fn new(context: GpuContext, layouts: ObjectLayouts) -> Self {
        let default_diffuse =
            TextureResource::create_default(&context.device, &context.queue, TextureSlot::Diffuse);
        let default_bump =
            TextureResource::create_default(&context.device, &context.queue, TextureSlot::Bump);

        Self {
            context,
            layouts,
            default_diffuse,
            default_bump,
            meshes: ResourceRegistry::new(),
        }
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn layouts(&self) -> &ObjectLayouts {
        &self.layouts
    }

    /// Largest texture edge the device accepts
    pub fn max_texture_dimension(&self) -> u32 {
        self.context.device.limits().max_texture_dimension_2d
    }

    /// Fails for images the device cannot hold as a 2D texture
    pub fn check_texture_size(&self, image: &RgbaImage) -> Result<()> {
        let (width, height) = image.dimensions();
        let limit = self.max_texture_dimension();
        if width == 0 || height == 0 || width > limit || height > limit {
            return Err(ViewerError::precondition(format!(
                "texture of {}x{} does not fit the device limit of {}",
                width, height, limit
            )));
        }
        Ok(())
    }

    /// Size check for every image a mesh carries
    pub fn check_mesh_textures(&self, mesh: &MeshData) -> Result<()> {
        for image in [&mesh.texture, &mesh.bump_map].into_iter().flatten() {
            self.check_texture_size(image)?;
        }
        Ok(())
    }

    /// Uploads a mesh and its textures, replacing anything held for `id`
    ///
    /// The mesh and its image sizes are validated first; an invalid mesh
    /// makes no GPU calls.
    pub fn upload_mesh(&mut self, id: ObjectId, mesh: &MeshData, uniform: ObjectUniform) -> Result<()> {
        mesh.validate()?;
        self.check_mesh_textures(mesh)?;

        let device = &self.context.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = ObjectUBO::new_with_data(device, &uniform);
        let object_bind_group = self.layouts.create_object_bind_group(device, &uniform);

        let upload = |image: &Option<RgbaImage>, slot: TextureSlot| {
            image.as_ref().map(|image| {
                TextureResource::create_from_image(device, &self.context.queue, image, slot, slot.label())
            })
        };
        let diffuse = upload(&mesh.texture, TextureSlot::Diffuse);
        let bump = upload(&mesh.bump_map, TextureSlot::Bump);

        let texture_bind_group = self.layouts.create_texture_bind_group(
            device,
            diffuse.as_ref().unwrap_or(&self.default_diffuse),
            bump.as_ref().unwrap_or(&self.default_bump),
        );

        log::debug!(
            "Uploaded object {}: {} vertices, {} indices",
            id.raw(),
            mesh.vertex_count(),
            mesh.index_count()
        );

        self.meshes.insert(
            id,
            MeshGpuResources {
                vertex_buffer,
                index_buffer,
                index_count: mesh.index_count() as u32,
                uniform,
                object_bind_group,
                diffuse,
                bump,
                texture_bind_group,
            },
        );
        Ok(())
    }

    /// Replaces (or clears, with `None`) one texture of an uploaded object
    ///
    /// An image too large for the device is rejected and the bound texture kept.
    pub fn set_texture(&mut self, id: ObjectId, slot: TextureSlot, image: Option<&RgbaImage>) -> Result<()> {
        if let Some(image) = image {
            self.check_texture_size(image)?;
        }

        let device = &self.context.device;
        let resources = self.meshes.get_mut(id).ok_or_else(|| {
            ViewerError::precondition(format!("object {} has no GPU resources", id.raw()))
        })?;

        let texture = image.map(|image| {
            TextureResource::create_from_image(device, &self.context.queue, image, slot, slot.label())
        });
        match slot {
            TextureSlot::Diffuse => resources.diffuse = texture,
            TextureSlot::Bump => resources.bump = texture,
        }

        resources.texture_bind_group = self.layouts.create_texture_bind_group(
            device,
            resources.diffuse.as_ref().unwrap_or(&self.default_diffuse),
            resources.bump.as_ref().unwrap_or(&self.default_bump),
        );
        Ok(())
    }

    /// Writes the object uniform if it changed; false when `id` is unknown or unchanged
    pub fn update_object(&mut self, id: ObjectId, uniform: ObjectUniform) -> bool {
        match self.meshes.get_mut(id) {
            Some(resources) => resources.uniform.update_content(&self.context.queue, uniform),
            None => false,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&MeshGpuResources> {
        self.meshes.get(id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.meshes.contains(id)
    }

    pub fn release(&mut self, id: ObjectId) -> bool {
        self.meshes.release(id)
    }

    pub fn uploaded_count(&self) -> usize {
        self.meshes.len()
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a MeshGpuResources, object_slot: u32, texture_slot: u32);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b MeshGpuResources, object_slot: u32, texture_slot: u32) {
        self.set_bind_group(object_slot, &mesh.object_bind_group, &[]);
        self.set_bind_group(texture_slot, &mesh.texture_bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
