//! Renders small scenes into an offscreen target.
//!
//! Every test skips (passes) when the machine has no usable GPU adapter.

use std::path::PathBuf;

use tartan::{
    diagnostics::{DiagnosticKind, Diagnostics},
    gfx::{
        camera::ViewerCommand,
        geometry::{make_cube_at_origin, make_pyramid},
        resources::TextureSlot,
        scene::{ObjectId, TextureMapping},
        RenderEngine,
    },
    UiEvent, Viewer, ViewerConfig, ViewerError,
};

fn headless_viewer(config: ViewerConfig) -> Option<Viewer> {
    let mut diagnostics = Diagnostics::new();
    match pollster::block_on(RenderEngine::new_headless(320, 240, &config, &mut diagnostics)) {
        Ok(engine) => {
            let mut viewer = Viewer::new(config);
            viewer.absorb_diagnostics(&mut diagnostics);
            viewer.attach_engine(engine);
            Some(viewer)
        }
        Err(ViewerError::UnsupportedContext(reason)) => {
            eprintln!("skipping headless render test: {}", reason);
            None
        }
        Err(e) => panic!("unexpected engine error: {}", e),
    }
}

fn png_fixture(name: &str, color: [u8; 4]) -> PathBuf {
    sized_png_fixture(name, 4, 4, color)
}

fn sized_png_fixture(name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tartan-headless-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    image::RgbaImage::from_pixel(width, height, image::Rgba(color))
        .save(&path)
        .unwrap();
    path
}

fn diffuse_size(viewer: &Viewer, id: ObjectId) -> Option<(u32, u32)> {
    let resources = viewer.resources().unwrap().get(id).unwrap();
    resources
        .diffuse
        .as_ref()
        .map(|texture| (texture.texture.width(), texture.texture.height()))
}

fn assert_no_gpu_diagnostics(viewer: &Viewer) {
    let messages: Vec<_> = viewer.diagnostics().iter().collect();
    assert_eq!(viewer.diagnostics().count(DiagnosticKind::Shader), 0, "{:?}", messages);
    assert_eq!(viewer.diagnostics().count(DiagnosticKind::Graphics), 0, "{:?}", messages);
}

#[test]
fn cube_renders_in_one_draw_of_36_indices() {
    let Some(mut viewer) = headless_viewer(ViewerConfig::default()) else {
        return;
    };
    viewer.add_mesh("Cube", make_cube_at_origin()).unwrap();

    let stats = viewer.render_frame().unwrap();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.indices_drawn, 36);
    assert_eq!(stats.error, None);
    assert!(stats.is_clean());
    assert_no_gpu_diagnostics(&viewer);
}

#[test]
fn meshes_added_before_attach_are_uploaded() {
    let config = ViewerConfig::default();
    let mut viewer = Viewer::new(config.clone());
    viewer.add_mesh("Pyramid", make_pyramid(3)).unwrap();
    viewer.add_mesh("Cube", make_cube_at_origin()).unwrap();

    let mut diagnostics = Diagnostics::new();
    let engine = match pollster::block_on(RenderEngine::new_headless(64, 64, &config, &mut diagnostics)) {
        Ok(engine) => engine,
        Err(ViewerError::UnsupportedContext(_)) => return,
        Err(e) => panic!("unexpected engine error: {}", e),
    };
    viewer.attach_engine(engine);

    assert_eq!(viewer.resources().unwrap().uploaded_count(), 2);
    let stats = viewer.render_frame().unwrap();
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.indices_drawn, 504 + 36);
    assert_eq!(stats.error, None);
}

#[test]
fn textured_and_bump_mapped_cube_with_culling() {
    let config = ViewerConfig::default().with_back_face_culling(true);
    let Some(mut viewer) = headless_viewer(config) else {
        return;
    };
    viewer.add_mesh("Cube", make_cube_at_origin()).unwrap();
    viewer.select_object(1).unwrap();

    let diffuse = png_fixture("diffuse.png", [200, 120, 40, 255]);
    let bump = png_fixture("bump.png", [128, 128, 128, 255]);
    viewer.apply_texture(&diffuse, TextureMapping::default()).unwrap();
    viewer.apply_bump_map(&bump).unwrap();

    let stats = viewer.render_frame().unwrap();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.error, None);
    assert_no_gpu_diagnostics(&viewer);
}

#[test]
fn resize_and_projection_toggle_keep_rendering() {
    let Some(mut viewer) = headless_viewer(ViewerConfig::default()) else {
        return;
    };
    viewer.add_mesh("Cube", make_cube_at_origin()).unwrap();

    viewer.resize(640, 360);
    viewer.handle_command(ViewerCommand::ToggleProjection);
    assert_eq!(viewer.engine().unwrap().get_surface_size(), (640, 360));

    let stats = viewer.render_frame().unwrap();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.error, None);

    // minimized windows report zero; the target keeps its last size
    viewer.resize(0, 0);
    assert_eq!(viewer.engine().unwrap().get_surface_size(), (640, 360));
}

#[test]
fn empty_scene_only_clears() {
    let Some(mut viewer) = headless_viewer(ViewerConfig::default()) else {
        return;
    };
    let stats = viewer.render_frame().unwrap();
    assert_eq!(stats.draw_calls, 0);
    assert_eq!(stats.indices_drawn, 0);
    assert_eq!(stats.error, None);
}

#[test]
fn reapplied_texture_replaces_the_bound_one() {
    let Some(mut viewer) = headless_viewer(ViewerConfig::default()) else {
        return;
    };
    let id = viewer.add_mesh("Cube", make_cube_at_origin()).unwrap();
    viewer.select_object(1).unwrap();
    assert_eq!(diffuse_size(&viewer, id), None);

    let first = sized_png_fixture("first.png", 4, 4, [255, 0, 0, 255]);
    viewer.apply_texture(&first, TextureMapping::default()).unwrap();
    assert_eq!(diffuse_size(&viewer, id), Some((4, 4)));

    let missing = std::env::temp_dir().join("tartan-headless-missing.png");
    let result = viewer.handle_ui_event(UiEvent::ApplyTexture {
        path: missing,
        mapping: TextureMapping::default(),
    });
    assert!(matches!(result, Err(ViewerError::Image { .. })));
    let gpu = viewer.resources().unwrap().get(id).unwrap();
    assert!(gpu.has_texture(TextureSlot::Diffuse));
    assert_eq!(diffuse_size(&viewer, id), Some((4, 4)));

    let second = sized_png_fixture("second.png", 8, 2, [0, 0, 255, 255]);
    viewer.apply_texture(&second, TextureMapping::default()).unwrap();
    assert_eq!(diffuse_size(&viewer, id), Some((8, 2)));

    let stats = viewer.render_frame().unwrap();
    assert_eq!(stats.error, None);
}

#[test]
fn texture_beyond_device_limit_is_rejected() {
    let Some(mut viewer) = headless_viewer(ViewerConfig::default()) else {
        return;
    };
    let id = viewer.add_mesh("Cube", make_cube_at_origin()).unwrap();
    viewer.select_object(1).unwrap();

    let fits = png_fixture("fits.png", [10, 200, 10, 255]);
    viewer.apply_texture(&fits, TextureMapping::default()).unwrap();

    let limit = viewer.resources().unwrap().max_texture_dimension();
    let wide = sized_png_fixture("too-wide.png", limit + 1, 1, [255, 255, 255, 255]);
    let result = viewer.handle_ui_event(UiEvent::ApplyTexture {
        path: wide.clone(),
        mapping: TextureMapping::default(),
    });
    assert!(matches!(result, Err(ViewerError::Precondition(_))));
    assert!(matches!(viewer.apply_bump_map(&wide), Err(ViewerError::Precondition(_))));

    assert_eq!(diffuse_size(&viewer, id), Some((4, 4)));
    let gpu = viewer.resources().unwrap().get(id).unwrap();
    assert!(!gpu.has_texture(TextureSlot::Bump));
    let mesh = viewer.scene().find(id).unwrap().as_mesh().unwrap();
    assert_eq!(mesh.texture.as_ref().unwrap().dimensions(), (4, 4));
    assert!(mesh.bump_map.is_none());

    let mut oversized = make_cube_at_origin();
    oversized.texture = Some(image::RgbaImage::new(1, limit + 1));
    assert!(matches!(
        viewer.add_mesh("Tall", oversized),
        Err(ViewerError::Precondition(_))
    ));
    assert_eq!(viewer.scene().mesh_count(), 1);

    let stats = viewer.render_frame().unwrap();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.error, None);
}
