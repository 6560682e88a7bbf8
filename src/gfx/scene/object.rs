//! Scene render objects
//!
//! A [`RenderObject`] binds one parsed mesh to a transform and a material.
//! Geometry stays on the CPU until the GPU device exists; after upload the
//! object exclusively owns its vertex/index buffers, uniform buffers and
//! optional texture, all released together when the object is dropped.

use log::warn;
use wgpu::Device;

use crate::asset::{Material, MeshData};
use crate::gfx::resources::{
    material::{MaterialUBO, MaterialUniform},
    texture_resource::TextureResource,
    ObjectBindingLayouts,
};
use crate::wgpu_utils::{BindGroupBuilder, UniformBuffer};

use super::transform::Transform;

/// Per-object model matrix uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn from_matrix(matrix: cgmath::Matrix4<f32>) -> Self {
        Self {
            model: matrix.into(),
        }
    }
}

/// GPU resources owned by one render object.
pub struct ObjectGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub transform_ubo: UniformBuffer<TransformUniform>,
    pub transform_bind_group: wgpu::BindGroup,
    pub material_ubo: MaterialUBO,
    pub material_bind_group: wgpu::BindGroup,
    /// Kept alive for the bind group's lifetime; `None` means the white
    /// fallback texture is bound instead.
    pub texture: Option<TextureResource>,
    pub texture_bind_group: wgpu::BindGroup,
}

/// A named scene entry: mesh resources plus an optional transform.
pub struct RenderObject {
    pub name: String,
    /// CPU-side geometry, taken when GPU buffers are created.
    mesh: Option<MeshData>,
    pub material: Material,
    pub has_texcoords: bool,
    pub transform: Transform,
    pub gpu: Option<ObjectGpuResources>,
}

impl RenderObject {
    /// Wraps parsed mesh data under a scene name.
    ///
    /// The mesh's own material is used when present, otherwise the renderer
    /// default.
    pub fn new(name: &str, mesh: MeshData, transform: Transform) -> Self {
        let material = mesh.material.clone().unwrap_or_default();
        let has_texcoords = mesh.has_texcoords;
        Self {
            name: name.to_string(),
            mesh: Some(mesh),
            material,
            has_texcoords,
            transform,
            gpu: None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Creates vertex/index buffers, uniform buffers and bind groups.
    ///
    /// Idempotent: a second call is a no-op. Texture decode failure is logged
    /// and rendering continues untextured with the white fallback bound.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layouts: &ObjectBindingLayouts,
        fallback_texture: &TextureResource,
    ) {
        let Some(mesh) = self.mesh.take() else {
            return;
        };

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Vertex Buffer: {}", self.name)),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Index Buffer: {}", self.name)),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let transform_ubo = UniformBuffer::new_with_data(
            device,
            &TransformUniform::from_matrix(self.transform.model_matrix()),
        );
        let transform_bind_group = BindGroupBuilder::new(&layouts.transform)
            .resource(transform_ubo.binding_resource())
            .create(device, &format!("Transform Bind Group: {}", self.name));

        // A texture only takes effect when it both decodes and the mesh has
        // texture coordinates to sample it with.
        let texture = self.material.diffuse_texture.as_ref().and_then(|path| {
            match TextureResource::load_diffuse(device, queue, path) {
                Ok(texture) => Some(texture),
                Err(err) => {
                    warn!(
                        "failed to load texture {} for '{}': {err}; rendering untextured",
                        path.display(),
                        self.name
                    );
                    None
                }
            }
        });
        let use_texture = texture.is_some() && self.has_texcoords;

        let mut material_ubo = MaterialUBO::new(device);
        material_ubo.update_content(queue, MaterialUniform::new(&self.material, use_texture));
        let material_bind_group = BindGroupBuilder::new(&layouts.material)
            .resource(material_ubo.binding_resource())
            .create(device, &format!("Material Bind Group: {}", self.name));

        let bound_texture = texture.as_ref().unwrap_or(fallback_texture);
        let texture_bind_group = BindGroupBuilder::new(&layouts.texture)
            .resource(wgpu::BindingResource::TextureView(&bound_texture.view))
            .resource(wgpu::BindingResource::Sampler(&bound_texture.sampler))
            .create(device, &format!("Texture Bind Group: {}", self.name));

        self.gpu = Some(ObjectGpuResources {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            transform_ubo,
            transform_bind_group,
            material_ubo,
            material_bind_group,
            texture,
            texture_bind_group,
        });
    }

    /// Writes a model matrix for this frame's draw.
    pub fn update_model_matrix(&mut self, queue: &wgpu::Queue, matrix: cgmath::Matrix4<f32>) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.transform_ubo
                .update_content(queue, TransformUniform::from_matrix(matrix));
        }
    }
}

/// Draw-call extension for render passes.
pub trait DrawRenderObject<'a> {
    /// Binds the object's per-draw state and issues one indexed draw.
    ///
    /// Objects without uploaded buffers are skipped so one bad entry never
    /// blocks the rest of the frame.
    fn draw_render_object(&mut self, object: &'a RenderObject);
}

impl<'a, 'b> DrawRenderObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_render_object(&mut self, object: &'b RenderObject) {
        let Some(gpu) = object.gpu.as_ref() else {
            return;
        };

        self.set_bind_group(1, &gpu.transform_bind_group, &[]);
        self.set_bind_group(2, &gpu.material_bind_group, &[]);
        self.set_bind_group(3, &gpu.texture_bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..gpu.index_count, 0, 0..1);
    }
}
