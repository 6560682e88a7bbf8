//! GPU-side material representation
//!
//! Converts a parsed [`Material`](crate::asset::Material) into the std140-style
//! uniform layout the lighting shader expects.

use crate::asset::Material;
use crate::wgpu_utils::uniform_buffer::UniformBuffer;

/// Phong material uniform.
///
/// Three vec3 rows, each padded to 16 bytes by a scalar slot. MUST match the
/// MaterialUniform struct in the shader exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 3],
    pub shininess: f32,
    pub diffuse: [f32; 3],
    /// 1.0 when a diffuse texture is bound and the mesh carries texture
    /// coordinates, otherwise 0.0.
    pub use_texture: f32,
    pub specular: [f32; 3],
    _padding: f32,
}

impl MaterialUniform {
    pub fn new(material: &Material, use_texture: bool) -> Self {
        Self {
            ambient: material.ambient,
            shininess: material.shininess,
            diffuse: material.diffuse,
            use_texture: if use_texture { 1.0 } else { 0.0 },
            specular: material.specular,
            _padding: 0.0,
        }
    }
}

/// Per-object material uniform buffer.
pub type MaterialUBO = UniformBuffer<MaterialUniform>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_three_padded_rows() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn use_texture_flag_is_encoded_as_float() {
        let material = Material::default();
        assert_eq!(MaterialUniform::new(&material, true).use_texture, 1.0);
        assert_eq!(MaterialUniform::new(&material, false).use_texture, 0.0);
    }
}
