use cgmath::*;

use super::camera_controller::CameraMove;
use crate::config::CameraConfig;

pub const PITCH_LIMIT: f32 = 89.0;

/// First-person camera with a fixed world up of +Y. Angles are in degrees.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub speed: f32,
    pub sensitivity: f32,
}

impl FlyCamera {
    pub fn new(position: Vector3<f32>, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            front: Vector3::unit_z(), // Recomputed in `update()`
            up: Vector3::unit_y(),
            speed: 0.1,
            sensitivity: 0.1,
        };
        camera.update();
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(config.position, config.yaw, config.pitch);
        camera.speed = config.speed;
        camera.sensitivity = config.sensitivity;
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    /// Unit vector to the camera's right
    pub fn right(&self) -> Vector3<f32> {
        self.front.cross(self.up).normalize()
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update();
    }

    pub fn process_move(&mut self, movement: CameraMove) {
        let direction = match movement {
            CameraMove::Forward => self.front,
            CameraMove::Backward => -self.front,
            CameraMove::Left => -self.right(),
            CameraMove::Right => self.right(),
            CameraMove::Up => self.up,
            CameraMove::Down => -self.up,
        };
        self.position += direction * self.speed;
    }

    /// Turns the camera by a cursor delta in pixels
    pub fn process_look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.set_pitch(self.pitch - dy * self.sensitivity);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        Matrix4::look_at_rh(eye, eye + self.front, self.up)
    }

    /// Recomputes `front` after changing `yaw` or `pitch`
    fn update(&mut self) {
        let (yaw, pitch) = (Rad::from(Deg(self.yaw)), Rad::from(Deg(self.pitch)));
        self.front = Vector3::new(
            pitch.0.cos() * yaw.0.sin(),
            pitch.0.sin(),
            pitch.0.cos() * yaw.0.cos(),
        )
        .normalize();
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_defaults() {
        let camera = FlyCamera::default();
        assert_eq!(camera.position, Vector3::new(6.5, 5.5, -10.0));
        assert_eq!(camera.yaw(), -32.0);
        assert_eq!(camera.pitch(), -15.0);
        assert!((camera.front().magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_clamps_at_limit() {
        let mut camera = FlyCamera::new(Vector3::zero(), 0.0, 0.0);
        camera.sensitivity = 1.0;

        // dy of -1000 would push pitch to +1000 degrees
        camera.process_look(0.0, -1000.0);
        assert_eq!(camera.pitch(), 89.0);

        camera.process_look(0.0, 5000.0);
        assert_eq!(camera.pitch(), -89.0);
        assert!(camera.front().y > -1.0);
    }

    #[test]
    fn test_front_follows_yaw() {
        let mut camera = FlyCamera::new(Vector3::zero(), 0.0, 0.0);
        assert_vec_close(camera.front(), Vector3::unit_z());

        camera.set_yaw(90.0);
        assert_vec_close(camera.front(), Vector3::unit_x());
    }

    #[test]
    fn test_moves_scale_by_speed() {
        let mut camera = FlyCamera::new(Vector3::zero(), 0.0, 0.0);
        camera.speed = 2.0;

        camera.process_move(CameraMove::Forward);
        assert_vec_close(camera.position, Vector3::new(0.0, 0.0, 2.0));

        // Facing +Z with +Y up, the camera's right is -X
        camera.process_move(CameraMove::Right);
        assert_vec_close(camera.position, Vector3::new(-2.0, 0.0, 2.0));

        camera.process_move(CameraMove::Up);
        camera.process_move(CameraMove::Backward);
        camera.process_move(CameraMove::Left);
        assert_vec_close(camera.position, Vector3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_view_matrix_looks_along_front() {
        let camera = FlyCamera::new(Vector3::new(1.0, 2.0, 3.0), 0.0, 0.0);
        let view = camera.view_matrix();

        let eye = view * Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert!(eye.truncate().magnitude() < 1e-5);

        // A point ahead of the camera lands on the -Z view axis
        let ahead = view * Vector4::new(1.0, 2.0, 5.0, 1.0);
        assert!((ahead.z + 2.0).abs() < 1e-5);
    }
}
