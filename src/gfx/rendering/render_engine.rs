//! WGPU-based rendering engine for the Tartan viewer
//!
//! Owns the render target (a window surface, or an offscreen texture for
//! headless use), the depth buffer, the scene pipeline and the frame uniform.
//! A frame is described by a [`FramePlan`] and executed inside a validation
//! error scope; errors come back in [`FrameStats`] instead of aborting.

use crate::{
    config::ViewerConfig,
    diagnostics::{DiagnosticKind, Diagnostics},
    error::{Result, ViewerError},
    gfx::{
        context::GpuContext,
        resources::{
            gpu_resources::{DrawMesh, GpuResourceManager},
            global_bindings::{FrameUBO, GlobalBindings},
            material::ObjectLayouts,
            texture_resource::TextureResource,
        },
    },
};

use super::{
    frame::{FramePlan, FrameStats},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

pub const SCENE_PIPELINE: &str = "Scene";
pub const SCENE_SHADER: &str = "scene.wgsl";
pub const FRAME_BINDING: &str = "frame";
pub const OBJECT_BINDING: &str = "object";
pub const TEXTURE_BINDING: &str = "textures";

const SCENE_SHADER_SOURCE: &str = include_str!("scene.wgsl");

/// Overlay callback signature, used for the UI pass
pub type OverlayFn = fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView);

enum RenderTarget {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, Copy)]
struct SceneSlots {
    frame: u32,
    object: u32,
    textures: u32,
}

/// Core rendering engine managing the render target and draw calls
pub struct RenderEngine {
    context: GpuContext,
    target: RenderTarget,
    format: wgpu::TextureFormat,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    object_layouts: ObjectLayouts,
    frame_ubo: FrameUBO,
    global_bindings: GlobalBindings,
}

impl RenderEngine {
    /// Creates a render engine drawing to a window surface
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width`, `height` - Initial surface size in pixels
    /// * `config` - Viewer settings (culling)
    /// * `diagnostics` - Receives shader and pipeline messages
    ///
    /// # Errors
    /// [`ViewerError::UnsupportedContext`] when no adapter or device is available
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        config: &ViewerConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| ViewerError::UnsupportedContext(format!("failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::UnsupportedContext(format!("no suitable adapter: {}", e)))?;

        let context = GpuContext::request(&adapter).await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // Gamma is applied in the shader, so prefer a linear surface format
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| ViewerError::UnsupportedContext("surface reports no formats".into()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &surface_config);
        log::info!(
            "Surface configured: Format={:?}, Size={}x{}",
            format,
            surface_config.width,
            surface_config.height
        );

        let target = RenderTarget::Surface {
            surface,
            config: surface_config,
        };
        Ok(Self::with_target(context, target, format, config, diagnostics))
    }

    /// Creates a render engine drawing to an offscreen RGBA texture
    ///
    /// # Errors
    /// [`ViewerError::UnsupportedContext`] when no adapter or device is available
    pub async fn new_headless(
        width: u32,
        height: u32,
        config: &ViewerConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::UnsupportedContext(format!("no suitable adapter: {}", e)))?;

        let context = GpuContext::request(&adapter).await?;
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let target = Self::offscreen_target(&context.device, format, width, height);

        Ok(Self::with_target(context, target, format, config, diagnostics))
    }

    fn offscreen_target(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> RenderTarget {
        let (width, height) = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        RenderTarget::Offscreen {
            texture,
            width,
            height,
        }
    }

    fn with_target(
        context: GpuContext,
        target: RenderTarget,
        format: wgpu::TextureFormat,
        config: &ViewerConfig,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let device = &context.device;
        let (width, height) = target_size(&target);
        let depth_texture = TextureResource::create_depth_texture(device, width, height, "depth_texture");

        let frame_ubo = FrameUBO::new(device);
        let global_bindings = GlobalBindings::new(device, &frame_ubo);
        let object_layouts = ObjectLayouts::new(device);

        let mut pipeline_manager = PipelineManager::new(context.device.clone());
        let shader_log = pipeline_manager.load_shader(SCENE_SHADER, SCENE_SHADER_SOURCE);
        for message in shader_log.messages {
            diagnostics.report(DiagnosticKind::Shader, message);
        }

        let cull_mode = config.back_face_culling.then_some(wgpu::Face::Back);
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default_with_shader(SCENE_SHADER)
                .with_label("Scene Pipeline")
                .with_bind_group(FRAME_BINDING, global_bindings.bind_group_layout().clone())
                .with_bind_group(OBJECT_BINDING, object_layouts.object_layout().clone())
                .with_bind_group(TEXTURE_BINDING, object_layouts.texture_layout().clone())
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_cull_mode(cull_mode),
        );
        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                diagnostics.report(DiagnosticKind::Graphics, error);
            }
        }

        Self {
            context,
            target,
            format,
            depth_texture,
            pipeline_manager,
            object_layouts,
            frame_ubo,
            global_bindings,
        }
    }

    /// Renders a plan, then the optional overlay, and presents
    ///
    /// Validation errors raised while recording or submitting are returned in
    /// [`FrameStats::error`]. Meshes without uploaded resources are skipped.
    ///
    /// # Errors
    /// [`ViewerError::Surface`] when the surface texture cannot be acquired.
    /// A lost or outdated surface is reconfigured before returning.
    pub fn render_frame<F>(
        &mut self,
        plan: &FramePlan,
        resources: &mut GpuResourceManager,
        overlay: Option<F>,
    ) -> Result<FrameStats>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let (surface_texture, target_view) = self.acquire_target()?;
        let device = self.context.device.clone();
        let queue = self.context.queue.clone();

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        self.frame_ubo.update_content(&queue, plan.frame);
        for item in &plan.items {
            resources.update_object(item.id, item.uniform);
        }
        let resources: &GpuResourceManager = resources;

        let mut stats = FrameStats::default();
        let slots = match self.scene_slots() {
            Ok(slots) => Some(slots),
            Err(e) => {
                stats.error = Some(e);
                None
            }
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let pipeline = self.pipeline_manager.pipeline(SCENE_PIPELINE);
            if let (Some(pipeline), Some(slots)) = (pipeline, slots) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(slots.frame, self.global_bindings.bind_group(), &[]);

                for item in &plan.items {
                    match resources.get(item.id) {
                        Some(mesh) => {
                            render_pass.draw_mesh(mesh, slots.object, slots.textures);
                            stats.draw_calls += 1;
                            stats.indices_drawn += mesh.index_count as u64;
                        }
                        None => stats.skipped += 1,
                    }
                }
            }
        }

        if let Some(overlay) = overlay {
            overlay(&*device, &*queue, &mut encoder, &target_view);
        }

        queue.submit(std::iter::once(encoder.finish()));
        if let Some(surface_texture) = surface_texture {
            surface_texture.present();
        }

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            let message = format!("frame validation error: {}", error);
            stats.error = Some(match stats.error.take() {
                Some(previous) => format!("{}; {}", previous, message),
                None => message,
            });
        }

        Ok(stats)
    }

    /// Convenience method for rendering without an overlay
    pub fn render_plan(&mut self, plan: &FramePlan, resources: &mut GpuResourceManager) -> Result<FrameStats> {
        self.render_frame(plan, resources, None::<OverlayFn>)
    }

    fn acquire_target(&self) -> Result<(Option<wgpu::SurfaceTexture>, wgpu::TextureView)> {
        match &self.target {
            RenderTarget::Surface { surface, config } => match surface.get_current_texture() {
                Ok(surface_texture) => {
                    let view = surface_texture
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());
                    Ok((Some(surface_texture), view))
                }
                Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    log::debug!("Surface {:?}, reconfiguring", e);
                    surface.configure(&self.context.device, config);
                    Err(e.into())
                }
                Err(e) => Err(e.into()),
            },
            RenderTarget::Offscreen { texture, .. } => {
                Ok((None, texture.create_view(&wgpu::TextureViewDescriptor::default())))
            }
        }
    }

    fn scene_slots(&mut self) -> std::result::Result<SceneSlots, String> {
        self.pipeline_manager.get_pipeline(SCENE_PIPELINE)?;
        let slots = self
            .pipeline_manager
            .binding_slots(SCENE_PIPELINE)
            .ok_or_else(|| format!("pipeline '{}' has no binding slots", SCENE_PIPELINE))?;

        let slot = |name: &str| {
            slots
                .slot(name)
                .ok_or_else(|| format!("pipeline '{}' has no '{}' binding", SCENE_PIPELINE, name))
        };
        Ok(SceneSlots {
            frame: slot(FRAME_BINDING)?,
            object: slot(OBJECT_BINDING)?,
            textures: slot(TEXTURE_BINDING)?,
        })
    }

    /// Resizes the render target and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        if let RenderTarget::Surface { surface, config } = &mut self.target {
            config.width = width;
            config.height = height;
            surface.configure(&self.context.device, config);
        } else {
            let target = Self::offscreen_target(&self.context.device, self.format, width, height);
            self.target = target;
        }

        self.depth_texture =
            TextureResource::create_depth_texture(&self.context.device, width, height, "depth_texture");
        log::debug!("Render target resized to {}x{}", width, height);
    }

    /// Returns current target dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        target_size(&self.target)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.context.queue
    }

    /// Layouts the scene pipeline expects for object and texture bind groups
    pub fn object_layouts(&self) -> &ObjectLayouts {
        &self.object_layouts
    }

    /// A resource manager whose bind groups match this engine's pipeline
    pub fn create_resource_manager(&self) -> GpuResourceManager {
        GpuResourceManager::new(self.context.clone(), self.object_layouts.clone())
    }

    pub fn pipeline_manager(&self) -> &PipelineManager {
        &self.pipeline_manager
    }
}

fn target_size(target: &RenderTarget) -> (u32, u32) {
    match target {
        RenderTarget::Surface { config, .. } => (config.width, config.height),
        RenderTarget::Offscreen { width, height, .. } => (*width, *height),
    }
}
