//! Texture resource management for wgpu
//!
//! GPU textures with their views and samplers: the depth buffer and the two
//! per-object sampled textures (diffuse image and bump height map).

use image::RgbaImage;

/// Which of an object's two texture units a texture is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Unit 0: the surface image
    Diffuse,
    /// Unit 1: height map for bump mapping
    Bump,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 2] = [TextureSlot::Diffuse, TextureSlot::Bump];

    pub fn unit(self) -> u32 {
        match self {
            TextureSlot::Diffuse => 0,
            TextureSlot::Bump => 1,
        }
    }

    /// (magnification, minification) filters
    pub fn filters(self) -> (wgpu::FilterMode, wgpu::FilterMode) {
        match self {
            TextureSlot::Diffuse => (wgpu::FilterMode::Linear, wgpu::FilterMode::Nearest),
            TextureSlot::Bump => (wgpu::FilterMode::Linear, wgpu::FilterMode::Linear),
        }
    }

    /// Texel bound when no image has been applied. White leaves the shaded
    /// color unchanged; black is a flat height field.
    pub fn default_texel(self) -> [u8; 4] {
        match self {
            TextureSlot::Diffuse => [255, 255, 255, 255],
            TextureSlot::Bump => [0, 0, 0, 255],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextureSlot::Diffuse => "Diffuse Texture",
            TextureSlot::Bump => "Bump Map",
        }
    }
}

/// GPU texture resource containing texture, view, and sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the viewer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Sampled textures hold linear values; the shader applies gamma itself
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Creates a depth buffer of the given size
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `width`, `height` - Must match the color target
    /// * `label` - Debug label for the texture
    pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads an RGBA8 image for the given slot
    ///
    /// The sampler repeats in both directions and uses the slot's filters.
    pub fn create_from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        slot: TextureSlot,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        Self::create_from_rgba_data(device, queue, image.as_raw(), width, height, slot, label)
    }

    /// The 1x1 texture bound to a slot that has no image
    pub fn create_default(device: &wgpu::Device, queue: &wgpu::Queue, slot: TextureSlot) -> Self {
        let label = format!("Default {}", slot.label());
        Self::create_from_rgba_data(device, queue, &slot.default_texel(), 1, 1, slot, &label)
    }

    /// Creates a 2D texture from raw RGBA8 data (4 bytes per pixel)
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        slot: TextureSlot,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (mag_filter, min_filter) = slot.filters();
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter,
            min_filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::debug!("Uploaded {} ({}x{})", label, width, height);

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_filters() {
        assert_eq!(
            TextureSlot::Diffuse.filters(),
            (wgpu::FilterMode::Linear, wgpu::FilterMode::Nearest)
        );
        assert_eq!(
            TextureSlot::Bump.filters(),
            (wgpu::FilterMode::Linear, wgpu::FilterMode::Linear)
        );
        assert_eq!(TextureSlot::Bump.unit(), 1);
    }

    #[test]
    fn test_default_texels() {
        assert_eq!(TextureSlot::Diffuse.default_texel(), [255; 4]);
        assert_eq!(TextureSlot::Bump.default_texel()[..3], [0, 0, 0]);
    }
}
