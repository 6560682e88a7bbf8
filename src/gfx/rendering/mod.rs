//! Forward rendering on wgpu.

pub mod render_engine;

pub use render_engine::RenderEngine;
