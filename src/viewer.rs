//! Viewer facade
//!
//! [`Viewer`] owns the scene, camera, diagnostics and, once attached, the
//! render engine with its GPU resources. Every input the host delivers
//! (commands, mouse input, UI events) goes through it, and every mutation
//! ends by requesting a redraw.
//!
//! Uploads need the GPU context, which only the viewer holds. A mesh added
//! while an engine is attached is uploaded before `add_mesh` returns, so it
//! is always resident before the next frame that draws it.

use std::path::{Path, PathBuf};

use cgmath::{ElementWise, Vector3};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::ViewerConfig,
    diagnostics::{DiagnosticKind, Diagnostics},
    error::{Result, ViewerError},
    gfx::{
        camera::{
            camera_controller::{SCALE_DOWN_FACTOR, SCALE_UP_FACTOR},
            CameraManager, ViewerCommand,
        },
        geometry::{self, parse_obj_file},
        rendering::{FramePlan, FrameStats, OverlayFn, RenderEngine},
        resources::{GpuResourceManager, ObjectUniform, TextureSlot},
        scene::{Axis, MaterialChannel, MeshData, ObjectId, Scene, TextureMapping, Transform},
    },
};

const GROUND_HALF_EXTENT: f32 = 5.0;

/// Coalescing redraw flag; any number of requests yield one redraw
#[derive(Debug, Default)]
pub struct RedrawRequest {
    pending: bool,
}

impl RedrawRequest {
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Returns whether a redraw was requested and clears the flag
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Discrete UI intents, already decoded by the host
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    LoadModels(Vec<PathBuf>),
    ApplyTexture {
        path: PathBuf,
        mapping: TextureMapping,
    },
    ApplyBumpMap(PathBuf),
    SetLightColor([f32; 3]),
    SetMaterialColor {
        channel: MaterialChannel,
        color: [f32; 3],
    },
    SetShininess(f32),
    SelectObject(usize),
}

struct GpuState {
    engine: RenderEngine,
    resources: GpuResourceManager,
}

pub struct Viewer {
    config: ViewerConfig,
    scene: Scene,
    camera: CameraManager,
    diagnostics: Diagnostics,
    redraw: RedrawRequest,
    rng: StdRng,
    gpu: Option<GpuState>,
}

impl Viewer {
    /// Viewer with an empty scene and no render engine
    pub fn new(config: ViewerConfig) -> Self {
        let camera = CameraManager::from_config(&config.camera, config.projection);
        let rng = StdRng::seed_from_u64(config.seed);

        Self {
            config,
            scene: Scene::new(),
            camera,
            diagnostics: Diagnostics::new(),
            redraw: RedrawRequest::default(),
            rng,
            gpu: None,
        }
    }

    /// Attaches a render engine and uploads every mesh already in the scene
    pub fn attach_engine(&mut self, engine: RenderEngine) {
        let mut resources = engine.create_resource_manager();
        for (object, mesh) in self.scene.meshes() {
            let uniform = object_uniform(object.transform, mesh);
            if let Err(e) = resources.upload_mesh(object.id(), mesh, uniform) {
                log::error!("Failed to upload '{}': {}", object.name, e);
                self.diagnostics
                    .report(DiagnosticKind::Graphics, format!("upload of '{}' failed: {}", object.name, e));
            }
        }

        self.gpu = Some(GpuState { engine, resources });
        self.redraw.request();
    }

    /// Moves the engine's diagnostics (shader logs, pipeline errors) into the viewer
    pub fn absorb_diagnostics(&mut self, other: &mut Diagnostics) {
        for diagnostic in other.drain() {
            self.diagnostics.report(diagnostic.kind, diagnostic.message);
        }
    }

    pub fn has_engine(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn engine(&self) -> Option<&RenderEngine> {
        self.gpu.as_ref().map(|gpu| &gpu.engine)
    }

    pub fn resources(&self) -> Option<&GpuResourceManager> {
        self.gpu.as_ref().map(|gpu| &gpu.resources)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &CameraManager {
        &self.camera
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    // Redraw requests

    pub fn request_redraw(&mut self) {
        self.redraw.request();
    }

    pub fn take_redraw_request(&mut self) -> bool {
        self.redraw.take()
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    // Scene population

    /// Appends a mesh, uploading it immediately when an engine is attached
    ///
    /// # Errors
    /// [`ViewerError::Precondition`] for meshes that break the data model
    /// (empty, ragged, or out-of-range indices) or that carry an image the
    /// device cannot hold; nothing is added.
    pub fn add_mesh(&mut self, name: &str, mesh: MeshData) -> Result<ObjectId> {
        mesh.validate()?;
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.resources.check_mesh_textures(&mesh)?;
        }

        let id = self.scene.add_mesh(name, mesh);
        self.upload(id)?;
        self.redraw.request();
        Ok(id)
    }

    fn upload(&mut self, id: ObjectId) -> Result<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        let object = self
            .scene
            .find(id)
            .ok_or_else(|| ViewerError::precondition(format!("object {} is not in the scene", id.raw())))?;
        let mesh = object
            .as_mesh()
            .ok_or_else(|| ViewerError::precondition("only mesh objects can be uploaded"))?;

        gpu.resources
            .upload_mesh(id, mesh, object_uniform(object.transform, mesh))
    }

    /// Ground, pyramid, cube and the icosphere model, skipping missing assets
    ///
    /// Ground, pyramid and cube share the ground texture.
    pub fn load_default_scene(&mut self) {
        let ground_texture = self.config.asset_path(&self.config.ground_texture);
        let model_path = self.config.asset_path(&self.config.default_model);
        let model_texture = self.config.asset_path(&self.config.default_model_texture);
        let bricks = self.load_asset_image(&ground_texture);

        let mut ground = geometry::make_ground(GROUND_HALF_EXTENT);
        ground.texture = bricks.clone();
        self.add_default("Ground", ground, |_| {});

        let mut pyramid = geometry::make_pyramid(3);
        pyramid.material = geometry::procedural_material(&mut self.rng);
        pyramid.texture = bricks.clone();
        self.add_default("Pyramid", pyramid, |transform| {
            transform.translation.x = -5.0;
            transform.translation.z = -5.0;
        });

        let mut cube = geometry::make_cube_at_origin();
        cube.material = geometry::procedural_material(&mut self.rng);
        cube.texture = bricks;
        self.add_default("Cube", cube, |transform| transform.translation.y = 5.0);

        match parse_obj_file(&model_path) {
            Ok(obj) => {
                let mut model: MeshData = obj.into();
                model.texture = self.load_asset_image(&model_texture);
                let name = self.config.default_model_name.clone();
                self.add_default(&name, model, |_| {});
            }
            Err(e) => self.report_missing_asset(&model_path, &e.to_string()),
        }

        log::info!(
            "Default scene loaded: {} objects",
            self.scene.get_object_count()
        );
    }

    fn add_default(
        &mut self,
        name: &str,
        mesh: MeshData,
        place: impl FnOnce(&mut Transform),
    ) {
        match self.add_mesh(name, mesh) {
            Ok(id) => {
                if let Some(object) = self.scene.find_mut(id) {
                    place(&mut object.transform);
                }
            }
            Err(e) => {
                log::error!("Failed to add '{}': {}", name, e);
                self.diagnostics
                    .report(DiagnosticKind::Load, format!("'{}' not added: {}", name, e));
            }
        }
    }

    fn load_asset_image(&mut self, path: &Path) -> Option<image::RgbaImage> {
        match load_image(path) {
            Ok(image) => Some(image),
            Err(e) => {
                self.report_missing_asset(path, &e.to_string());
                None
            }
        }
    }

    fn report_missing_asset(&mut self, path: &Path, reason: &str) {
        log::warn!("Skipping asset {}: {}", path.display(), reason);
        self.diagnostics.report(
            DiagnosticKind::Load,
            format!("asset '{}' skipped: {}", path.display(), reason),
        );
    }

    // Input

    pub fn handle_command(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::MoveCamera(movement) => self.camera.process_move(movement),
            ViewerCommand::ToggleProjection => self.camera.toggle_projection(),
            ViewerCommand::MoveObject(movement) => {
                self.scene.selected_mut().transform.translation += movement.delta();
            }
            ViewerCommand::ScaleUp => self.scale_selected(SCALE_UP_FACTOR),
            ViewerCommand::ScaleDown => self.scale_selected(SCALE_DOWN_FACTOR),
            ViewerCommand::Rotate { axis, inverted } => {
                let delta = ViewerCommand::rotation_delta(inverted);
                let rotation = &mut self.scene.selected_mut().transform.rotation;
                match axis {
                    Axis::X => rotation.x += delta,
                    Axis::Y => rotation.y += delta,
                    Axis::Z => rotation.z += delta,
                }
            }
        }
        self.redraw.request();
    }

    pub fn handle_commands(&mut self, commands: impl IntoIterator<Item = ViewerCommand>) {
        for command in commands {
            self.handle_command(command);
        }
    }

    fn scale_selected(&mut self, factor: f32) {
        let transform = &mut self.scene.selected_mut().transform;
        transform.scale = transform.scale.mul_element_wise(Vector3::new(factor, factor, factor));
    }

    /// Press or release of the look button
    pub fn mouse_button(&mut self, pressed: bool) {
        self.camera.controller.set_look_pressed(pressed);
    }

    /// Cursor position in window pixels; turns the camera while looking
    pub fn mouse_moved(&mut self, x: f64, y: f64) {
        if self.camera.process_cursor(x, y) {
            self.redraw.request();
        }
    }

    /// Dispatches a UI event; failures are also recorded as diagnostics
    pub fn handle_ui_event(&mut self, event: UiEvent) -> Result<()> {
        let result = match event {
            UiEvent::LoadModels(paths) => self.load_models(&paths).map(|_| ()),
            UiEvent::ApplyTexture { path, mapping } => self.apply_texture(&path, mapping),
            UiEvent::ApplyBumpMap(path) => self.apply_bump_map(&path),
            UiEvent::SetLightColor(color) => {
                self.set_light_color(color);
                Ok(())
            }
            UiEvent::SetMaterialColor { channel, color } => self.set_material_color(channel, color),
            UiEvent::SetShininess(value) => self.set_shininess(value),
            UiEvent::SelectObject(index) => self.select_object(index),
        };

        if let Err(e) = &result {
            log::error!("{}", e);
            let kind = match e {
                ViewerError::Obj(_) | ViewerError::Image { .. } => DiagnosticKind::Load,
                ViewerError::Precondition(_) => DiagnosticKind::Input,
                _ => DiagnosticKind::Graphics,
            };
            self.diagnostics.report(kind, e.to_string());
        }
        result
    }

    /// Parses every file, then appends all of them and selects the last
    ///
    /// Any parse failure aborts the whole load; the scene is unchanged.
    pub fn load_models(&mut self, paths: &[PathBuf]) -> Result<Vec<ObjectId>> {
        let mut parsed = Vec::with_capacity(paths.len());
        for path in paths {
            let mesh: MeshData = parse_obj_file(path)?.into();
            parsed.push((model_name(path), mesh));
        }

        let mut ids = Vec::with_capacity(parsed.len());
        for (name, mut mesh) in parsed {
            mesh.material = geometry::procedural_material(&mut self.rng);
            log::info!("Loaded model '{}' ({} triangles)", name, mesh.triangle_count());
            ids.push(self.add_mesh(&name, mesh)?);
        }

        if !ids.is_empty() {
            self.scene.select_last();
        }
        Ok(ids)
    }

    /// Decodes an image and makes it the selected mesh's diffuse texture
    ///
    /// On any failure the previous texture stays in place.
    pub fn apply_texture(&mut self, path: &Path, mapping: TextureMapping) -> Result<()> {
        self.scene.selected_mesh_mut()?;
        let image = load_image(path)?;

        if !mapping.is_designed() {
            self.diagnostics.report(
                DiagnosticKind::Input,
                format!("{:?} texture mapping is not implemented, using simple coordinates", mapping.kind),
            );
        }

        let (id, mesh) = self.scene.selected_mesh_mut()?;
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resources.set_texture(id, TextureSlot::Diffuse, Some(&image))?;
        }
        mesh.texture = Some(image);
        mesh.texture_mapping = mapping;

        log::info!("Applied texture {}", path.display());
        self.redraw.request();
        Ok(())
    }

    /// Decodes an image and makes it the selected mesh's bump map
    ///
    /// On any failure the previous bump map stays in place.
    pub fn apply_bump_map(&mut self, path: &Path) -> Result<()> {
        self.scene.selected_mesh_mut()?;
        let image = load_image(path)?;

        let (id, mesh) = self.scene.selected_mesh_mut()?;
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resources.set_texture(id, TextureSlot::Bump, Some(&image))?;
        }
        mesh.bump_map = Some(image);

        log::info!("Applied bump map {}", path.display());
        self.redraw.request();
        Ok(())
    }

    pub fn set_light_color(&mut self, color: [f32; 3]) {
        self.scene.set_light_color(color);
        self.redraw.request();
    }

    pub fn set_material_color(&mut self, channel: MaterialChannel, color: [f32; 3]) -> Result<()> {
        let (_, mesh) = self.scene.selected_mesh_mut()?;
        mesh.material.set_color(channel, color);
        self.redraw.request();
        Ok(())
    }

    pub fn set_shininess(&mut self, value: f32) -> Result<()> {
        let (_, mesh) = self.scene.selected_mesh_mut()?;
        mesh.material.set_specular_power(value)?;
        self.redraw.request();
        Ok(())
    }

    pub fn select_object(&mut self, index: usize) -> Result<()> {
        self.scene.select(index)?;
        self.redraw.request();
        Ok(())
    }

    // Rendering

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.engine.resize(width, height);
        }
        self.redraw.request();
    }

    /// Frame plan for the current scene and camera at the given target size
    pub fn frame_plan(&self, width: u32, height: u32) -> FramePlan {
        FramePlan::build(&self.scene, &self.camera, width, height, self.config.clear_color)
    }

    pub fn render_frame(&mut self) -> Result<FrameStats> {
        self.render_with_overlay(None::<OverlayFn>)
    }

    /// Renders one frame, handing the encoder to `overlay` after the scene pass
    ///
    /// # Errors
    /// [`ViewerError::Precondition`] without an attached engine, or
    /// [`ViewerError::Surface`] when no frame could be acquired.
    pub fn render_with_overlay<F>(&mut self, overlay: Option<F>) -> Result<FrameStats>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let gpu = self
            .gpu
            .as_mut()
            .ok_or_else(|| ViewerError::precondition("no render engine attached"))?;

        let (width, height) = gpu.engine.get_surface_size();
        let plan = FramePlan::build(&self.scene, &self.camera, width, height, self.config.clear_color);
        let stats = gpu.engine.render_frame(&plan, &mut gpu.resources, overlay)?;

        if let Some(error) = &stats.error {
            log::warn!("{}", error);
            self.diagnostics.report(DiagnosticKind::Graphics, error.clone());
        }
        Ok(stats)
    }
}

fn object_uniform(transform: Transform, mesh: &MeshData) -> ObjectUniform {
    ObjectUniform::new(
        transform.model_matrix(),
        transform.normal_matrix(),
        &mesh.material,
        mesh.texture_mapping,
        mesh.bump_map.is_some(),
    )
}

fn load_image(path: &Path) -> Result<image::RgbaImage> {
    let image = image::open(path).map_err(|source| ViewerError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

fn model_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Model".to_string())
}
