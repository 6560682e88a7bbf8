//! Scene management: named render objects, transforms and vertex formats.

pub mod object;
pub mod scene;
pub mod transform;
pub mod vertex;

pub use object::RenderObject;
pub use scene::Scene;
pub use transform::{Scale, Transform};
