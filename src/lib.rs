//! Neeps 3D Viewer
//!
//! A minimal interactive model viewer built on wgpu and winit: OBJ/MTL asset
//! loading, a name-keyed scene, a free-fly camera and Phong shading.

pub mod app;
pub mod asset;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::NeepsApp;
pub use asset::{AssetError, Material, MeshData};
pub use gfx::scene::{Scale, Transform};

/// Creates a default viewer instance
pub fn default() -> NeepsApp {
    NeepsApp::new()
}
