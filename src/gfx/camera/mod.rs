pub mod camera_controller;
pub mod camera_utils;
pub mod fly_camera;

// Re-export main types
pub use camera_controller::{key_command, CameraController, CameraMove, ObjectMove, ViewerCommand};
pub use camera_utils::{convert_matrix4_to_array, CameraManager, ProjectionMode, OPENGL_TO_WGPU_MATRIX};
pub use fly_camera::FlyCamera;
