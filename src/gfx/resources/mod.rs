//! GPU resource management: uniform layouts, textures and bindings.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, LightConfig};
pub use texture_resource::TextureResource;

use crate::wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};

/// Bind group layouts shared by every render object.
///
/// Created once by the render engine and passed to objects when their GPU
/// resources are uploaded, so pipeline and per-object bind groups always
/// agree on layout.
pub struct ObjectBindingLayouts {
    /// Group 1: per-object model matrix, vertex stage.
    pub transform: BindGroupLayoutWithDesc,
    /// Group 2: Phong material constants, fragment stage.
    pub material: BindGroupLayoutWithDesc,
    /// Group 3: diffuse texture and sampler, fragment stage.
    pub texture: BindGroupLayoutWithDesc,
}

impl ObjectBindingLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let transform = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Transform Bind Group Layout");

        let material = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group Layout");

        let texture = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Texture Bind Group Layout");

        Self {
            transform,
            material,
            texture,
        }
    }
}
