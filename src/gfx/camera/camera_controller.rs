use cgmath::Vector3;
use winit::keyboard::KeyCode;

use crate::gfx::scene::Axis;

/// Translation applied to the selected object per move command
pub const OBJECT_MOVE_STEP: f32 = 0.25;
pub const SCALE_UP_FACTOR: f32 = 1.05;
pub const SCALE_DOWN_FACTOR: f32 = 0.95;
/// Radians per rotate command
pub const ROTATE_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMove {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Direction of an object move command, in world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectMove {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl ObjectMove {
    pub fn delta(self) -> Vector3<f32> {
        let s = OBJECT_MOVE_STEP;
        match self {
            ObjectMove::PositiveX => Vector3::new(s, 0.0, 0.0),
            ObjectMove::NegativeX => Vector3::new(-s, 0.0, 0.0),
            ObjectMove::PositiveY => Vector3::new(0.0, s, 0.0),
            ObjectMove::NegativeY => Vector3::new(0.0, -s, 0.0),
            ObjectMove::PositiveZ => Vector3::new(0.0, 0.0, s),
            ObjectMove::NegativeZ => Vector3::new(0.0, 0.0, -s),
        }
    }
}

/// Discrete input commands understood by the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    MoveCamera(CameraMove),
    MoveObject(ObjectMove),
    ScaleUp,
    ScaleDown,
    /// Rotation of the selected object; `inverted` flips the direction
    Rotate { axis: Axis, inverted: bool },
    ToggleProjection,
}

impl ViewerCommand {
    /// Signed rotation step for a rotate command
    pub fn rotation_delta(inverted: bool) -> f32 {
        if inverted {
            -ROTATE_STEP
        } else {
            ROTATE_STEP
        }
    }
}

/// Maps a held key to its command. `ctrl` inverts rotations.
pub fn key_command(key: KeyCode, ctrl: bool) -> Option<ViewerCommand> {
    use ViewerCommand::*;

    let command = match key {
        KeyCode::KeyW => MoveCamera(CameraMove::Forward),
        KeyCode::KeyS => MoveCamera(CameraMove::Backward),
        KeyCode::KeyA => MoveCamera(CameraMove::Left),
        KeyCode::KeyD => MoveCamera(CameraMove::Right),
        KeyCode::KeyQ => MoveCamera(CameraMove::Up),
        KeyCode::KeyE => MoveCamera(CameraMove::Down),

        KeyCode::KeyU => MoveObject(ObjectMove::PositiveY),
        KeyCode::KeyN => MoveObject(ObjectMove::NegativeY),
        KeyCode::KeyH => MoveObject(ObjectMove::PositiveX),
        KeyCode::KeyL => MoveObject(ObjectMove::NegativeX),
        KeyCode::KeyK => MoveObject(ObjectMove::PositiveZ),
        KeyCode::KeyJ => MoveObject(ObjectMove::NegativeZ),

        KeyCode::Equal | KeyCode::NumpadAdd => ScaleUp,
        KeyCode::Minus | KeyCode::NumpadSubtract => ScaleDown,

        KeyCode::KeyX => Rotate {
            axis: Axis::X,
            inverted: ctrl,
        },
        KeyCode::KeyY => Rotate {
            axis: Axis::Y,
            inverted: ctrl,
        },
        KeyCode::KeyC => Rotate {
            axis: Axis::Z,
            inverted: ctrl,
        },
        _ => return None,
    };

    Some(command)
}

/// Mouse-look state: the look button and the last cursor position
#[derive(Debug, Default)]
pub struct CameraController {
    is_look_pressed: bool,
    last_cursor: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_look_pressed(&mut self, pressed: bool) {
        self.is_look_pressed = pressed;
        if !pressed {
            self.last_cursor = None;
        }
    }

    pub fn is_looking(&self) -> bool {
        self.is_look_pressed
    }

    /// Records a cursor position and returns the delta since the previous one
    /// while the look button is held. The first sample after a press only
    /// establishes the reference point.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        if !self.is_look_pressed {
            return None;
        }

        let delta = self
            .last_cursor
            .map(|(last_x, last_y)| ((x - last_x) as f32, (y - last_y) as f32));
        self.last_cursor = Some((x, y));
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_requires_button() {
        let mut controller = CameraController::new();
        assert_eq!(controller.cursor_moved(10.0, 10.0), None);

        controller.set_look_pressed(true);
        assert_eq!(controller.cursor_moved(10.0, 10.0), None);
        assert_eq!(controller.cursor_moved(13.0, 8.0), Some((3.0, -2.0)));

        controller.set_look_pressed(false);
        assert_eq!(controller.cursor_moved(50.0, 50.0), None);

        // Releasing forgets the reference point so the view does not jump
        controller.set_look_pressed(true);
        assert_eq!(controller.cursor_moved(100.0, 100.0), None);
    }

    #[test]
    fn test_keymap() {
        assert_eq!(
            key_command(KeyCode::KeyW, false),
            Some(ViewerCommand::MoveCamera(CameraMove::Forward))
        );
        assert_eq!(
            key_command(KeyCode::KeyH, false),
            Some(ViewerCommand::MoveObject(ObjectMove::PositiveX))
        );
        assert_eq!(
            key_command(KeyCode::KeyC, true),
            Some(ViewerCommand::Rotate {
                axis: Axis::Z,
                inverted: true
            })
        );
        assert_eq!(key_command(KeyCode::KeyZ, false), None);
    }

    #[test]
    fn test_object_steps() {
        assert_eq!(ObjectMove::NegativeZ.delta(), Vector3::new(0.0, 0.0, -0.25));
        assert_eq!(ViewerCommand::rotation_delta(true), -0.1);
    }
}
