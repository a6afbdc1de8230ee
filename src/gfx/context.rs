//! Device and queue handle
//!
//! Every GPU upload in the crate takes a [`GpuContext`]. There is no ambient
//! "current" context: holding this handle is what makes uploads legal, and
//! all writes queued through it land before the next submission.

use std::sync::Arc;

use crate::error::{Result, ViewerError};

#[derive(Clone)]
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self { device, queue }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Requests a device from `adapter` with the limits the viewer relies on
    pub async fn request(adapter: &wgpu::Adapter) -> Result<Self> {
        let info = adapter.get_info();
        log::info!("Selected GPU: \"{}\", Backend: {:?}", info.name, info.backend);

        let required_limits = wgpu::Limits {
            max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
            ..wgpu::Limits::downlevel_defaults()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Tartan Device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| ViewerError::UnsupportedContext(format!("failed to request a device: {}", e)))?;
        log::info!("Logical device and command queue created");

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }
}
