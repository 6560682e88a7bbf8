//! Graphics subsystems: camera, rendering, resources and scene management.

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;
