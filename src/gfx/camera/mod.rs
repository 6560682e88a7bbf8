//! Free-fly camera system: state, input handling and GPU uniform layout.

pub mod camera_controller;
pub mod camera_utils;
pub mod fly_camera;

pub use camera_controller::CameraController;
pub use camera_utils::CameraUniform;
pub use fly_camera::{FlyCamera, MoveDirection};
