use std::marker::PhantomData;

/// Typed uniform buffer holding exactly one `Content`
///
/// Writes are skipped when the bytes match the last upload.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        match type_name.rfind(':') {
            Some(pos) => &type_name[(pos + 1)..],
            None => type_name,
        }
    }

    fn descriptor(label: &str, mapped_at_creation: bool) -> wgpu::BufferDescriptor<'_> {
        wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation,
        }
    }

    pub fn new(device: &wgpu::Device) -> Self {
        let label = format!("UniformBuffer: {}", Self::name());
        let buffer = device.create_buffer(&Self::descriptor(&label, false));

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Create buffer with initial data
    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let label = format!("UniformBuffer: {}", Self::name());
        let buffer = device.create_buffer(&Self::descriptor(&label, true));

        buffer
            .slice(..)
            .get_mapped_range_mut()
            .clone_from_slice(bytemuck::bytes_of(initial_content));
        buffer.unmap();

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: bytemuck::bytes_of(initial_content).to_vec(),
        }
    }

    /// Update buffer content, skipping the write if nothing changed.
    /// Returns true when a write was queued.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        let new_content = bytemuck::bytes_of(&content);
        if !content_changed(&self.previous_content, new_content) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

fn content_changed(previous: &[u8], new: &[u8]) -> bool {
    previous != new
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_always_happens() {
        assert!(content_changed(&[], &[0, 0, 0, 0]));
        assert!(!content_changed(&[1, 2], &[1, 2]));
        assert!(content_changed(&[1, 2], &[1, 3]));
    }
}
