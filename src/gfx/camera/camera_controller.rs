//! Keyboard/mouse input state for the fly camera.

use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

use super::fly_camera::{FlyCamera, MoveDirection};

const BASE_SPEED: f32 = 2.5;
const BOOST_FACTOR: f32 = 1.5;

/// Accumulates input events between frames and applies them to a
/// [`FlyCamera`] once per frame with the measured delta time.
pub struct CameraController {
    forward_pressed: bool,
    backward_pressed: bool,
    left_pressed: bool,
    right_pressed: bool,
    boost_pressed: bool,
    /// Pending mouse-look delta, consumed each frame.
    mouse_delta: (f32, f32),
    pending_scroll: f32,
    /// The first cursor sample after focus establishes a reference position
    /// and must not produce a look jump.
    first_mouse: bool,
    last_cursor: (f32, f32),
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            forward_pressed: false,
            backward_pressed: false,
            left_pressed: false,
            right_pressed: false,
            boost_pressed: false,
            mouse_delta: (0.0, 0.0),
            pending_scroll: 0.0,
            first_mouse: true,
            last_cursor: (0.0, 0.0),
        }
    }

    /// Records a key transition. Returns true when the key is one we track.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => {
                self.forward_pressed = pressed;
                true
            }
            KeyCode::KeyS | KeyCode::ArrowDown => {
                self.backward_pressed = pressed;
                true
            }
            KeyCode::KeyA | KeyCode::ArrowLeft => {
                self.left_pressed = pressed;
                true
            }
            KeyCode::KeyD | KeyCode::ArrowRight => {
                self.right_pressed = pressed;
                true
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.boost_pressed = pressed;
                true
            }
            _ => false,
        }
    }

    /// Folds a cursor position sample into the pending look delta.
    ///
    /// Window coordinates grow downward, so the vertical delta is inverted to
    /// make upward motion pitch up.
    pub fn process_cursor(&mut self, x: f32, y: f32) {
        if self.first_mouse {
            self.last_cursor = (x, y);
            self.first_mouse = false;
            return;
        }
        self.mouse_delta.0 += x - self.last_cursor.0;
        self.mouse_delta.1 += self.last_cursor.1 - y;
        self.last_cursor = (x, y);
    }

    /// Resets the cursor reference, e.g. after the window regains focus.
    pub fn reset_cursor(&mut self) {
        self.first_mouse = true;
    }

    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        self.pending_scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
        };
    }

    /// Applies buffered input to the camera, scaled by `dt` seconds.
    pub fn update_camera(&mut self, camera: &mut FlyCamera, dt: f32) {
        let speed = if self.boost_pressed {
            BASE_SPEED * BOOST_FACTOR
        } else {
            BASE_SPEED
        };

        if self.forward_pressed {
            camera.process_keyboard(MoveDirection::Forward, dt, speed);
        }
        if self.backward_pressed {
            camera.process_keyboard(MoveDirection::Backward, dt, speed);
        }
        if self.left_pressed {
            camera.process_keyboard(MoveDirection::Left, dt, speed);
        }
        if self.right_pressed {
            camera.process_keyboard(MoveDirection::Right, dt, speed);
        }

        let (dx, dy) = self.mouse_delta;
        if dx != 0.0 || dy != 0.0 {
            camera.process_mouse(dx, dy, true);
            self.mouse_delta = (0.0, 0.0);
        }

        if self.pending_scroll != 0.0 {
            camera.process_scroll(self.pending_scroll);
            self.pending_scroll = 0.0;
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_cursor_sample_produces_no_look_jump() {
        let mut controller = CameraController::new();
        let mut camera = FlyCamera::default();
        let (yaw0, pitch0) = (camera.yaw, camera.pitch);

        controller.process_cursor(640.0, 360.0);
        controller.update_camera(&mut camera, 1.0 / 60.0);
        assert_eq!(camera.yaw, yaw0);
        assert_eq!(camera.pitch, pitch0);

        // The second sample is a real delta.
        controller.process_cursor(650.0, 360.0);
        controller.update_camera(&mut camera, 1.0 / 60.0);
        assert_relative_eq!(camera.yaw, yaw0 + 1.0, epsilon = 1e-5);
    }

    #[test]
    fn shift_boosts_movement_speed() {
        let mut plain = CameraController::new();
        let mut camera_plain = FlyCamera::default();
        plain.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        plain.update_camera(&mut camera_plain, 1.0);

        let mut boosted = CameraController::new();
        let mut camera_boosted = FlyCamera::default();
        boosted.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        boosted.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        boosted.update_camera(&mut camera_boosted, 1.0);

        let plain_dist = 3.0 - camera_plain.position.z;
        let boosted_dist = 3.0 - camera_boosted.position.z;
        assert_relative_eq!(boosted_dist, plain_dist * 1.5, epsilon = 1e-5);
    }

    #[test]
    fn released_key_stops_contributing() {
        let mut controller = CameraController::new();
        let mut camera = FlyCamera::default();
        controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        controller.process_keyboard(KeyCode::KeyD, ElementState::Released);
        controller.update_camera(&mut camera, 1.0);
        assert_eq!(camera.position.x, 0.0);
    }
}
