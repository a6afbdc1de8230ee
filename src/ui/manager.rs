// src/ui/manager.rs
//! ImGui overlay for the Tartan viewer
//!
//! Owns the ImGui context with its winit platform and wgpu renderer. The
//! host feeds window events through [`UiManager::handle_window_event`], builds
//! the panel once per redraw with [`UiManager::build_frame`] and draws it on
//! top of the scene with [`UiManager::render_overlay`].

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const UI_FONT_SIZE: f32 = 20.0;

/// Which input devices the panel currently claims
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiCapture {
    pub mouse: bool,
    pub keyboard: bool,
}

impl UiCapture {
    pub fn any(self) -> bool {
        self.mouse || self.keyboard
    }

    fn from_io(io: &imgui::Io) -> Self {
        Self {
            mouse: io.want_capture_mouse,
            keyboard: io.want_capture_keyboard,
        }
    }
}

/// Events ImGui consumes; everything else goes straight to the viewer
pub fn is_ui_input(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::ModifiersChanged(_)
            | WindowEvent::Focused(_)
    )
}

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
    capture: UiCapture,
}

impl UiManager {
    /// `target_format` is the format of the surface the overlay draws into
    pub fn new(device: &Device, queue: &Queue, target_format: TextureFormat, window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        // Sizes are physical pixels
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: UI_FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: target_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
            capture: UiCapture::default(),
        }
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Forwards an input event to ImGui and returns what it now claims
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> UiCapture {
        if is_ui_input(event) {
            let event: Event<()> = Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            self.platform.handle_event(self.context.io_mut(), window, &event);
            self.capture = UiCapture::from_io(self.context.io());
        }
        self.capture
    }

    /// Starts a UI frame and lets `build` lay out the widgets
    pub fn build_frame<F>(&mut self, window: &Window, build: F) -> UiCapture
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::error!("Failed to prepare UI frame: {}", e);
        }

        let ui = self.context.frame();
        build(&*ui);

        let cursor = ui.mouse_cursor();
        if self.last_cursor != cursor {
            self.last_cursor = cursor;
            self.platform.prepare_render(ui, window);
        }

        self.capture = UiCapture::from_io(self.context.io());
        self.capture
    }

    /// Draws the last built frame over `target`, keeping the scene underneath
    pub fn render_overlay(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
    ) {
        let draw_data = self.context.render();
        let [width, height] = draw_data.display_size;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self.renderer.render(draw_data, queue, device, &mut pass) {
            log::error!("Failed to render UI: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_only_input_events_reach_imgui() {
        assert!(is_ui_input(&WindowEvent::Focused(true)));
        assert!(!is_ui_input(&WindowEvent::Resized(PhysicalSize::new(10, 10))));
        assert!(!is_ui_input(&WindowEvent::CloseRequested));
        assert!(!is_ui_input(&WindowEvent::RedrawRequested));
    }

    #[test]
    fn test_capture_any() {
        assert!(!UiCapture::default().any());
        assert!(UiCapture { mouse: true, keyboard: false }.any());
        assert!(UiCapture { mouse: false, keyboard: true }.any());
    }
}
