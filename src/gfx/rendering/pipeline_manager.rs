//! Render pipeline management system for wgpu
//!
//! Compiles WGSL modules inside validation error scopes, builds pipelines
//! lazily from registered configurations and caches the bind group slot of
//! every named binding when the pipeline is linked.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::Vertex;

/// Configuration for creating a render pipeline
///
/// `bind_group_names[i]` names the layout at `bind_group_layouts[i]`; the
/// pair becomes the pipeline's binding slot map.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub bind_group_names: Vec<String>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub multisample: MultisampleState,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene.wgsl".to_string(),
            bind_group_layouts: Vec::new(),
            bind_group_names: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            depth_format: None,
            multisample: MultisampleState::default(),
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
        }
    }
}

impl PipelineConfig {
    /// Creates a new config with a specific shader
    pub fn default_with_shader(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Appends a named bind group layout; its index is the binding slot
    pub fn with_bind_group(mut self, name: &str, layout: BindGroupLayout) -> Self {
        self.bind_group_names.push(name.to_string());
        self.bind_group_layouts.push(layout);
        self
    }

    /// Enables depth testing against a buffer of this format
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Single opaque color target of the given format
    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_targets = vec![Some(ColorTargetState {
            format,
            blend: Some(BlendState::REPLACE),
            write_mask: ColorWrites::ALL,
        })];
        self
    }

    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }

    /// Binding name to bind group index
    pub fn binding_slots(&self) -> BindingSlots {
        BindingSlots(
            self.bind_group_names
                .iter()
                .enumerate()
                .map(|(index, name)| (name.clone(), index as u32))
                .collect(),
        )
    }
}

/// Bind group index of every named binding of a linked pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSlots(HashMap<String, u32>);

impl BindingSlots {
    pub fn slot(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Messages collected while compiling a shader module
#[derive(Debug, Default)]
pub struct ShaderLog {
    pub messages: Vec<String>,
    pub has_errors: bool,
}

/// Manages render pipelines with caching and lazy creation
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    binding_slots: HashMap<String, BindingSlots>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            binding_slots: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// Pipelines are created lazily when first requested via `get_pipeline()`.
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Compiles a WGSL module and collects the compiler's messages
    ///
    /// The module is stored even when compilation reports errors, so callers
    /// can keep rendering and surface the log instead of aborting.
    pub fn load_shader(&mut self, name: &str, source: &str) -> ShaderLog {
        log::trace!("Compiling shader '{}':\n{}", name, source);

        self.device.push_error_scope(ErrorFilter::Validation);
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        let scope_error = pollster::block_on(self.device.pop_error_scope());

        let info = pollster::block_on(shader_module.get_compilation_info());
        let mut log = ShaderLog::default();
        for message in &info.messages {
            let location = message
                .location
                .as_ref()
                .map(|l| format!("{}:{}: ", l.line_number, l.line_position))
                .unwrap_or_default();
            log.has_errors |= matches!(message.message_type, CompilationMessageType::Error);
            log.messages.push(format!(
                "shader '{}' {:?}: {}{}",
                name, message.message_type, location, message.message
            ));
        }
        if let Some(error) = scope_error {
            log.has_errors = true;
            log.messages.push(format!("shader '{}': {}", name, error));
        }

        if log.has_errors {
            log::warn!("Shader '{}' compiled with errors", name);
        } else {
            log::debug!("Shader '{}' compiled", name);
        }

        self.shader_modules.insert(name.to_string(), shader_module);
        log
    }

    /// Gets or creates a pipeline (lazy loading)
    pub fn get_pipeline(&mut self, name: &str) -> Result<&RenderPipeline, String> {
        if !self.pipelines.contains_key(name) {
            let config = self
                .pipeline_configs
                .get(name)
                .cloned()
                .ok_or_else(|| format!("pipeline '{}' is not registered", name))?;

            let pipeline = self.create_pipeline_from_config(name, &config)?;
            self.binding_slots.insert(name.to_string(), config.binding_slots());
            self.pipelines.insert(name.to_string(), pipeline);
            self.pending_pipelines.retain(|n| n != name);
        }

        self.pipelines
            .get(name)
            .ok_or_else(|| format!("pipeline '{}' is missing", name))
    }

    /// Creates all pending pipelines immediately
    ///
    /// # Returns
    /// Error messages for the pipelines that failed
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = self.pending_pipelines.clone();

        for name in pending {
            if let Err(e) = self.get_pipeline(&name) {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// An already linked pipeline, without creating it
    pub fn pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Binding slot map of a linked pipeline
    pub fn binding_slots(&self, name: &str) -> Option<&BindingSlots> {
        self.binding_slots.get(name)
    }

    /// Creates a render pipeline from configuration, inside a validation scope
    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        self.device.push_error_scope(ErrorFilter::Validation);

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: config.multisample,
                multiview: None,
                cache: None,
            });

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(format!("failed to create pipeline '{}': {}", name, error)),
            None => {
                log::debug!("Created pipeline '{}'", name);
                Ok(pipeline)
            }
        }
    }

    /// Returns pipeline manager statistics
    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            total_pipelines: self.pipelines.len(),
            pending_pipelines: self.pending_pipelines.len(),
            loaded_shaders: self.shader_modules.len(),
        }
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipeline_configs.contains_key(name)
    }
}

/// Statistics about pipeline manager state
#[derive(Debug)]
pub struct PipelineStats {
    pub total_pipelines: usize,
    pub pending_pipelines: usize,
    pub loaded_shaders: usize,
}
