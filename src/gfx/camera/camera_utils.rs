use cgmath::{Deg, Matrix4};

use super::{
    camera_controller::{CameraController, CameraMove},
    fly_camera::FlyCamera,
};
use crate::config::CameraConfig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub const PERSPECTIVE_FOVY_DEGREES: f32 = 70.0;
pub const PERSPECTIVE_NEAR: f32 = 0.01;
pub const PERSPECTIVE_FAR: f32 = 1000.0;
pub const ORTHO_HALF_EXTENT: f32 = 10.0;
pub const ORTHO_DEPTH: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }

    /// Projection in wgpu clip space for a viewport of `width` x `height` pixels
    pub fn matrix(self, width: u32, height: u32) -> Matrix4<f32> {
        let projection = match self {
            ProjectionMode::Orthographic => cgmath::ortho(
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_DEPTH,
                ORTHO_DEPTH,
            ),
            ProjectionMode::Perspective => {
                let aspect = width.max(1) as f32 / height.max(1) as f32;
                cgmath::perspective(
                    Deg(PERSPECTIVE_FOVY_DEGREES),
                    aspect,
                    PERSPECTIVE_NEAR,
                    PERSPECTIVE_FAR,
                )
            }
        };

        OPENGL_TO_WGPU_MATRIX * projection
    }
}

/// The fly camera, its mouse-look controller and the active projection
pub struct CameraManager {
    pub camera: FlyCamera,
    pub controller: CameraController,
    pub projection: ProjectionMode,
}

impl CameraManager {
    pub fn new(camera: FlyCamera, controller: CameraController, projection: ProjectionMode) -> Self {
        Self {
            camera,
            controller,
            projection,
        }
    }

    pub fn from_config(config: &CameraConfig, projection: ProjectionMode) -> Self {
        Self::new(FlyCamera::from_config(config), CameraController::new(), projection)
    }

    pub fn process_move(&mut self, movement: CameraMove) {
        self.camera.process_move(movement);
    }

    /// Feeds a cursor position; returns true if the camera turned
    pub fn process_cursor(&mut self, x: f64, y: f64) -> bool {
        match self.controller.cursor_moved(x, y) {
            Some((dx, dy)) => {
                self.camera.process_look(dx, dy);
                true
            }
            None => false,
        }
    }

    pub fn toggle_projection(&mut self) {
        self.projection = self.projection.toggled();
        log::debug!("Projection switched to {:?}", self.projection);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        self.projection.matrix(width, height)
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector4, Zero};

    #[test]
    fn test_toggle_flips_projection() {
        let mode = ProjectionMode::Perspective;
        assert_eq!(mode.toggled(), ProjectionMode::Orthographic);
        assert_eq!(mode.toggled().toggled(), mode);
    }

    #[test]
    fn test_orthographic_maps_extent_to_clip_edges() {
        let projection = ProjectionMode::Orthographic.matrix(800, 600);
        let corner = projection * Vector4::new(10.0, -10.0, 0.0, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-6);
        assert!((corner.y + 1.0).abs() < 1e-6);
        // wgpu depth range is [0, 1]; the plane z = 0 sits halfway
        assert!((corner.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_depth_in_wgpu_range() {
        let projection = ProjectionMode::Perspective.matrix(1200, 800);
        let near = projection * Vector4::new(0.0, 0.0, -PERSPECTIVE_NEAR, 1.0);
        let far = projection * Vector4::new(0.0, 0.0, -PERSPECTIVE_FAR, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_height_viewport_is_finite() {
        let projection = ProjectionMode::Perspective.matrix(800, 0);
        let column: Vector4<f32> = projection.x;
        assert!(column.x.is_finite() && !column.is_zero());
    }

    #[test]
    fn test_matrix_array_is_column_major() {
        let matrix = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0));
        let array = convert_matrix4_to_array(matrix);
        assert_eq!(array[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
