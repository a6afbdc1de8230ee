//! Frame planning
//!
//! A [`FramePlan`] is everything one frame draws, computed on the CPU from
//! the scene and camera: the frame uniform plus one [`DrawItem`] per mesh in
//! scene order. The render engine only executes it.

use crate::gfx::{
    camera::CameraManager,
    resources::{FrameUniform, ObjectUniform},
    scene::{ObjectId, Scene},
};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub id: ObjectId,
    pub uniform: ObjectUniform,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct FramePlan {
    pub clear_color: wgpu::Color,
    pub frame: FrameUniform,
    pub items: Vec<DrawItem>,
}

impl FramePlan {
    pub fn build(
        scene: &Scene,
        camera: &CameraManager,
        width: u32,
        height: u32,
        clear_color: [f64; 4],
    ) -> Self {
        let light = scene.light();
        let light_position = light.light_position();
        let frame = FrameUniform::new(
            camera.projection_matrix(width, height),
            camera.view_matrix(),
            [light_position.x, light_position.y, light_position.z],
            light.light_power(),
            scene.light_color(),
        );

        let items = scene
            .meshes()
            .map(|(object, mesh)| DrawItem {
                id: object.id(),
                uniform: ObjectUniform::new(
                    object.transform.model_matrix(),
                    object.transform.normal_matrix(),
                    &mesh.material,
                    mesh.texture_mapping,
                    mesh.bump_map.is_some(),
                ),
                index_count: mesh.index_count() as u32,
            })
            .collect();

        let [r, g, b, a] = clear_color;
        Self {
            clear_color: wgpu::Color { r, g, b, a },
            frame,
            items,
        }
    }

    pub fn total_indices(&self) -> u64 {
        self.items.iter().map(|item| item.index_count as u64).sum()
    }
}

/// What a rendered frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub indices_drawn: u64,
    /// Meshes in the plan without uploaded GPU resources
    pub skipped: u32,
    /// Validation error raised while recording or submitting the frame
    pub error: Option<String>,
}

impl FrameStats {
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.skipped == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CameraConfig,
        gfx::{camera::ProjectionMode, geometry::make_cube_at_origin, geometry::make_ground},
    };
    use cgmath::Vector3;

    fn camera() -> CameraManager {
        CameraManager::from_config(&CameraConfig::default(), ProjectionMode::Perspective)
    }

    #[test]
    fn test_plan_has_one_item_per_mesh_in_order() {
        let mut scene = Scene::new();
        let ground = scene.add_mesh("Ground", make_ground(5.0));
        let cube = scene.add_mesh("Cube", make_cube_at_origin());

        let plan = FramePlan::build(&scene, &camera(), 1200, 800, [0.2, 0.2, 0.2, 1.0]);
        let ids: Vec<ObjectId> = plan.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![ground, cube]);
        assert_eq!(plan.items[1].index_count, 36);
        assert_eq!(plan.total_indices(), 42);
        assert_eq!(plan.clear_color.r, 0.2);
    }

    #[test]
    fn test_plan_carries_light_and_transform() {
        let mut scene = Scene::new();
        scene.set_light_color([1.0, 0.5, 0.25]);
        scene.add_mesh("Cube", make_cube_at_origin());
        scene.select_last();
        scene.selected_mut().transform.translation = Vector3::new(0.0, 5.0, 0.0);

        let plan = FramePlan::build(&scene, &camera(), 800, 600, [0.0; 4]);
        assert_eq!(plan.frame.light_position, [0.0, 2.0, 0.0]);
        assert_eq!(plan.frame.light_power, 40.0);
        assert_eq!(plan.frame.light_color, [1.0, 0.5, 0.25]);
        assert_eq!(plan.items[0].uniform.model[3], [0.0, 5.0, 0.0, 1.0]);
        assert_eq!(plan.items[0].uniform.has_bump, 0);
    }

    #[test]
    fn test_empty_scene_plans_nothing() {
        let plan = FramePlan::build(&Scene::new(), &camera(), 800, 600, [0.0; 4]);
        assert!(plan.items.is_empty());
    }
}
