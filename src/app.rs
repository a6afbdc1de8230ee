use anyhow::Context;
use std::{collections::HashSet, sync::Arc};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    diagnostics::Diagnostics,
    gfx::{
        camera::{key_command, ViewerCommand},
        RenderEngine,
    },
    ui::{scene_panel, ScenePanelState, UiCapture, UiManager},
    viewer::{UiEvent, Viewer},
};

/// Windowed host for the [`Viewer`]
///
/// Keeps the set of held keys, turns them into [`ViewerCommand`]s once per
/// frame, routes the right mouse button to camera look and draws the scene
/// panel. Keyboard and mouse go to the viewer only while the panel leaves
/// them alone. A redraw is only requested when the viewer asks for one.
pub struct TartanApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    viewer: Viewer,
    ui_manager: Option<UiManager>,
    panel: ScenePanelState,
    held_keys: HashSet<KeyCode>,
    ctrl_held: bool,
    ui_capture: UiCapture,
    startup_error: Option<anyhow::Error>,
}

impl TartanApp {
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                viewer: Viewer::new(config),
                ui_manager: None,
                panel: ScenePanelState::default(),
                held_keys: HashSet::new(),
                ctrl_held: false,
                ui_capture: UiCapture::default(),
                startup_error: None,
            },
        })
    }

    /// The viewer, for populating the scene before `run`
    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.app_state.viewer
    }

    /// Runs the event loop until the window closes
    ///
    /// # Errors
    /// Fails when the event loop cannot start or no render engine could be
    /// created for the window.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated with an error")?;

        match self.app_state.startup_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn create_engine(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let (width, height) = window.inner_size().into();
        let config = self.viewer.config().clone();
        let mut diagnostics = Diagnostics::new();

        let engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &config,
            &mut diagnostics,
        ))
        .context("failed to initialize the render engine")?;

        let mut ui_manager = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            &window,
        );
        ui_manager.set_display_size(width, height);

        self.viewer.absorb_diagnostics(&mut diagnostics);
        self.viewer.attach_engine(engine);
        self.ui_manager = Some(ui_manager);
        Ok(())
    }

    fn apply_held_keys(&mut self) {
        if self.ui_capture.keyboard {
            return;
        }
        let commands: Vec<ViewerCommand> = self
            .held_keys
            .iter()
            .filter_map(|key| key_command(*key, self.ctrl_held))
            .collect();
        self.viewer.handle_commands(commands);
    }

    fn redraw(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };

        self.viewer.take_redraw_request();
        self.apply_held_keys();

        let mut events: Vec<UiEvent> = Vec::new();
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let panel = &mut self.panel;
            let viewer = &self.viewer;
            self.ui_capture = ui_manager.build_frame(&window, |ui| {
                events = scene_panel(ui, panel, viewer.scene(), viewer.diagnostics());
            });
        }
        for event in events {
            // Failures are already recorded as diagnostics
            let _ = self.viewer.handle_ui_event(event);
        }

        let result = match self.ui_manager.as_mut() {
            Some(ui_manager) => self.viewer.render_with_overlay(Some(
                |device: &wgpu::Device,
                 queue: &wgpu::Queue,
                 encoder: &mut wgpu::CommandEncoder,
                 view: &wgpu::TextureView| {
                    ui_manager.render_overlay(device, queue, encoder, view);
                },
            )),
            None => self.viewer.render_frame(),
        };

        if let Err(e) = result {
            log::warn!("Frame skipped: {}", e);
            self.viewer.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = self.viewer.config();
        let attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.startup_error = Some(anyhow::Error::new(e).context("failed to create window"));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        if let Err(e) = self.create_engine(window.clone()) {
            log::error!("{:#}", e);
            self.startup_error = Some(e);
            event_loop.exit();
            return;
        }

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI sees input first; whatever it claims never reaches the viewer
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            self.ui_capture = ui_manager.handle_window_event(&window, window_id, &event);
        }
        let capture = self.ui_capture;

        match event {
            WindowEvent::KeyboardInput { .. } if capture.keyboard => {
                self.held_keys.clear();
                window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    match key_code {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::KeyP if !repeat => {
                            self.viewer.handle_command(ViewerCommand::ToggleProjection)
                        }
                        _ => {
                            self.held_keys.insert(key_code);
                        }
                    }
                    window.request_redraw();
                }
                ElementState::Released => {
                    self.held_keys.remove(&key_code);
                }
            },
            WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::CursorMoved { .. }
                if capture.mouse =>
            {
                self.viewer.mouse_button(false);
                window.request_redraw();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.ctrl_held = modifiers.state().control_key();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.viewer.mouse_button(state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.viewer.mouse_moved(position.x, position.y);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.set_display_size(width, height);
                }
                self.viewer.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if self.viewer.take_redraw_request() || !self.held_keys.is_empty() {
            window.request_redraw();
        }
    }
}
