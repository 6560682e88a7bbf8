//! First-person free-fly camera
//!
//! Orientation is derived from yaw/pitch in degrees; the {front, right, up}
//! basis is recomputed eagerly at the end of every mutator so the render loop
//! never reads stale vectors within a frame.

use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use super::camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};

const MOUSE_SENSITIVITY: f32 = 0.1;
const PITCH_LIMIT: f32 = 89.0;
const FOV_MIN: f32 = 1.0;
const FOV_MAX: f32 = 45.0;
const ZNEAR: f32 = 0.1;
const ZFAR: f32 = 100.0;

/// Movement direction relative to the camera basis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-fly camera with yaw/pitch orientation and a perspective projection.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Point3<f32>,
    pub world_up: Vector3<f32>,
    pub front: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Rotation around Y, degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Rotation around X, degrees, clamped to ±89 when constrained.
    pub pitch: f32,
    /// Field of view in degrees, clamped to [1, 45].
    pub fov: f32,
    pub aspect: f32,
}

impl FlyCamera {
    pub fn new(position: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            world_up: Vector3::unit_y(),
            front: -Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: Vector3::unit_y(),
            yaw,
            pitch,
            fov: 45.0,
            aspect: 16.0 / 9.0,
        };
        camera.update_vectors();
        camera
    }

    /// Look-at view matrix targeting `position + front`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.fov), self.aspect, ZNEAR, ZFAR)
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        let p = self.position.to_vec();
        CameraUniform {
            view_position: [p.x, p.y, p.z, 1.0],
            view_proj: self.build_view_projection_matrix().into(),
        }
    }

    /// Moves along the camera basis, scaled by `dt` for framerate
    /// independence.
    pub fn process_keyboard(&mut self, direction: MoveDirection, dt: f32, speed: f32) {
        let velocity = speed * dt;
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= self.right * velocity,
            MoveDirection::Right => self.position += self.right * velocity,
        }
    }

    /// Applies a mouse delta to yaw/pitch and recomputes the basis.
    pub fn process_mouse(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * MOUSE_SENSITIVITY;
        self.pitch += dy * MOUSE_SENSITIVITY;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Scroll-to-zoom: narrows or widens the field of view.
    pub fn process_scroll(&mut self, dy: f32) {
        self.fov = (self.fov - dy).clamp(FOV_MIN, FOV_MAX);
    }

    /// Updates the aspect ratio on window resize. Zero dimensions (a
    /// minimized window reports 0x0) are treated as one; the projection
    /// rejects an aspect of zero.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Rederives {front, right, up} from yaw/pitch. Called at the end of
    /// every orientation mutator, never deferred across frames.
    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FlyCamera {
    /// Starts slightly back from the origin, looking down -Z.
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 3.0), -90.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::InnerSpace;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn default_orientation_faces_negative_z() {
        let camera = FlyCamera::default();
        assert_relative_eq!(camera.front.x, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.front.y, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.front.z, -1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn quarter_turn_right_faces_positive_x() {
        let mut camera = FlyCamera::default();
        // Raw delta of 900 at sensitivity 0.1 adds 90 degrees of yaw.
        camera.process_mouse(900.0, 0.0, true);
        assert_relative_eq!(camera.yaw, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.front.x, 1.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.front.y, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(camera.front.z, 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn basis_stays_orthonormal_under_arbitrary_look_input() {
        let mut camera = FlyCamera::default();
        let deltas = [
            (123.0, -45.0),
            (-310.0, 77.0),
            (12.5, 12.5),
            (-800.0, -200.0),
            (55.0, 400.0),
        ];
        for (dx, dy) in deltas {
            camera.process_mouse(dx, dy, true);
            assert_relative_eq!(camera.front.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(camera.right.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(camera.up.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(camera.front.dot(camera.right), 0.0, epsilon = TOLERANCE);
            assert_relative_eq!(camera.front.dot(camera.up), 0.0, epsilon = TOLERANCE);
            assert_relative_eq!(camera.right.dot(camera.up), 0.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn pitch_clamps_only_when_constrained() {
        let mut camera = FlyCamera::default();
        camera.process_mouse(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse(0.0, -30_000.0, true);
        assert_eq!(camera.pitch, -89.0);

        let mut free = FlyCamera::default();
        free.process_mouse(0.0, 10_000.0, false);
        assert_relative_eq!(free.pitch, 1000.0, epsilon = TOLERANCE);
    }

    #[test]
    fn fov_clamps_to_valid_range() {
        let mut camera = FlyCamera::default();
        camera.process_scroll(100.0);
        assert_eq!(camera.fov, 1.0);
        camera.process_scroll(-500.0);
        assert_eq!(camera.fov, 45.0);
    }

    #[test]
    fn movement_is_framerate_independent() {
        let mut whole = FlyCamera::default();
        whole.process_keyboard(MoveDirection::Forward, 0.2, 2.5);

        let mut halves = FlyCamera::default();
        halves.process_keyboard(MoveDirection::Forward, 0.1, 2.5);
        halves.process_keyboard(MoveDirection::Forward, 0.1, 2.5);

        assert_relative_eq!(whole.position.x, halves.position.x, epsilon = TOLERANCE);
        assert_relative_eq!(whole.position.y, halves.position.y, epsilon = TOLERANCE);
        assert_relative_eq!(whole.position.z, halves.position.z, epsilon = TOLERANCE);
    }

    #[test]
    fn zero_height_resize_does_not_divide_by_zero() {
        let mut camera = FlyCamera::default();
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }

    #[test]
    fn minimized_window_resize_keeps_projection_valid() {
        // Minimizing delivers 0x0 (or 0xN) resize events; the aspect must
        // stay positive or the perspective projection asserts.
        let mut camera = FlyCamera::default();
        camera.set_aspect(0, 600);
        assert!(camera.aspect > 0.0);
        let _ = camera.projection_matrix();

        camera.set_aspect(0, 0);
        assert_eq!(camera.aspect, 1.0);
        let _ = camera.projection_matrix();
    }
}
