// src/ui/panel.rs
//! Scene panel for the Tartan viewer
//!
//! Object selection, model/texture/bump-map loading, texture mapping, light
//! color and material editing. Edits come back as [`UiEvent`]s.

use std::path::PathBuf;

use crate::{
    diagnostics::Diagnostics,
    gfx::scene::{Axis, MaterialChannel, Scene, TextureMapping, TextureMappingKind},
    viewer::UiEvent,
};

const MAPPING_KIND_LABELS: [&str; 4] = ["Simple", "Planar", "Cylindrical", "Spherical"];
const MAPPING_AXIS_LABELS: [&str; 3] = ["X", "Y", "Z"];
const SHININESS_RANGE: (f32, f32) = (1.0, 128.0);
const DIAGNOSTIC_LINES: usize = 8;

/// Text fields and combo selections that persist between frames
#[derive(Debug, Clone, Default)]
pub struct ScenePanelState {
    /// One or more OBJ paths separated by `;`
    pub model_paths: String,
    pub texture_path: String,
    pub bump_map_path: String,
    pub mapping_kind: usize,
    pub mapping_axis: usize,
}

impl ScenePanelState {
    pub fn mapping(&self) -> TextureMapping {
        let kind = TextureMapping::ALL_KINDS
            .get(self.mapping_kind)
            .copied()
            .unwrap_or(TextureMappingKind::Simple);
        let axis = TextureMapping::ALL_AXES
            .get(self.mapping_axis)
            .copied()
            .unwrap_or(Axis::X);
        TextureMapping::new(kind, axis)
    }

    pub fn model_path_list(&self) -> Vec<PathBuf> {
        self.model_paths
            .split(';')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

/// Draws the scene panel and returns the edits made this frame
pub fn scene_panel(
    ui: &imgui::Ui,
    state: &mut ScenePanelState,
    scene: &Scene,
    diagnostics: &Diagnostics,
) -> Vec<UiEvent> {
    let mut events = Vec::new();

    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return events;
    }
    let panel_width = (display_size[0] * 0.3).clamp(320.0, 460.0);

    ui.window("Scene")
        .size([panel_width, display_size[1] * 0.8], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_object_combo(ui, scene, &mut events);
            ui.separator();
            render_loaders(ui, state, &mut events);
            ui.separator();
            render_light(ui, scene, &mut events);
            render_material(ui, scene, &mut events);
            render_diagnostics(ui, diagnostics);
        });

    events
}

fn render_object_combo(ui: &imgui::Ui, scene: &Scene, events: &mut Vec<UiEvent>) {
    let names = scene.get_object_names();
    let labels: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut selected = scene.selected_index();

    if ui.combo_simple_string("Object", &mut selected, &labels) && selected != scene.selected_index() {
        events.push(UiEvent::SelectObject(selected));
    }

    let stats = scene.get_statistics();
    ui.text(format!(
        "{} objects, {} triangles",
        stats.object_count, stats.total_triangles
    ));
}

fn render_loaders(ui: &imgui::Ui, state: &mut ScenePanelState, events: &mut Vec<UiEvent>) {
    ui.input_text("Models", &mut state.model_paths).build();
    if ui.button("Load models") {
        let paths = state.model_path_list();
        if !paths.is_empty() {
            events.push(UiEvent::LoadModels(paths));
        }
    }

    ui.spacing();
    ui.input_text("Texture", &mut state.texture_path).build();
    ui.combo_simple_string("Mapping", &mut state.mapping_kind, &MAPPING_KIND_LABELS);
    ui.combo_simple_string("Axis", &mut state.mapping_axis, &MAPPING_AXIS_LABELS);
    if ui.button("Apply texture") && !state.texture_path.trim().is_empty() {
        events.push(UiEvent::ApplyTexture {
            path: PathBuf::from(state.texture_path.trim()),
            mapping: state.mapping(),
        });
    }

    ui.spacing();
    ui.input_text("Bump map", &mut state.bump_map_path).build();
    if ui.button("Apply bump map") && !state.bump_map_path.trim().is_empty() {
        events.push(UiEvent::ApplyBumpMap(PathBuf::from(state.bump_map_path.trim())));
    }
}

fn render_light(ui: &imgui::Ui, scene: &Scene, events: &mut Vec<UiEvent>) {
    if ui.collapsing_header("Light", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        let mut color = scene.light_color();
        if ui.color_edit3("Light color", &mut color) {
            events.push(UiEvent::SetLightColor(color));
        }
    }
}

fn render_material(ui: &imgui::Ui, scene: &Scene, events: &mut Vec<UiEvent>) {
    let Some(mesh) = scene.selected().as_mesh() else {
        return;
    };

    if ui.collapsing_header("Material", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        let channels = [
            ("Ambient", MaterialChannel::Ambient),
            ("Diffuse", MaterialChannel::Diffuse),
            ("Specular", MaterialChannel::Specular),
        ];
        for (label, channel) in channels {
            let mut color = mesh.material.color(channel);
            if ui.color_edit3(label, &mut color) {
                events.push(UiEvent::SetMaterialColor { channel, color });
            }
        }

        let mut shininess = mesh.material.specular_power();
        if ui.slider("Shininess", SHININESS_RANGE.0, SHININESS_RANGE.1, &mut shininess) {
            events.push(UiEvent::SetShininess(shininess));
        }
    }
}

fn render_diagnostics(ui: &imgui::Ui, diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }

    if ui.collapsing_header("Messages", imgui::TreeNodeFlags::empty()) {
        let skip = diagnostics.len().saturating_sub(DIAGNOSTIC_LINES);
        for diagnostic in diagnostics.iter().skip(skip) {
            ui.text_wrapped(format!("[{:?}] {}", diagnostic.kind, diagnostic.message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_paths_split_and_trim() {
        let state = ScenePanelState {
            model_paths: " a.obj ; models/b.obj;;".to_string(),
            ..Default::default()
        };
        assert_eq!(
            state.model_path_list(),
            vec![PathBuf::from("a.obj"), PathBuf::from("models/b.obj")]
        );
        assert!(ScenePanelState::default().model_path_list().is_empty());
    }

    #[test]
    fn test_mapping_from_combo_indices() {
        let state = ScenePanelState {
            mapping_kind: 2,
            mapping_axis: 1,
            ..Default::default()
        };
        assert_eq!(
            state.mapping(),
            TextureMapping::new(TextureMappingKind::Cylindrical, Axis::Y)
        );

        let out_of_range = ScenePanelState {
            mapping_kind: 9,
            mapping_axis: 9,
            ..Default::default()
        };
        assert_eq!(out_of_range.mapping(), TextureMapping::default());
    }

    #[test]
    fn test_labels_cover_every_option() {
        assert_eq!(MAPPING_KIND_LABELS.len(), TextureMapping::ALL_KINDS.len());
        assert_eq!(MAPPING_AXIS_LABELS.len(), TextureMapping::ALL_AXES.len());
    }
}
