//! Name-keyed scene registry
//!
//! A flat mapping from unique name to [`RenderObject`]. Iteration order is
//! whatever the map yields; consumers must not rely on insertion order
//! surviving removals.

use std::collections::HashMap;

use log::warn;
use wgpu::Device;

use crate::gfx::resources::{texture_resource::TextureResource, ObjectBindingLayouts};

use super::object::RenderObject;

/// Flat registry of named render objects.
///
/// Single-threaded by design; all access happens on the render thread between
/// frame boundaries.
pub struct Scene {
    objects: HashMap<String, RenderObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    /// Inserts an object, replacing (and dropping) any entry of the same name.
    pub fn add(&mut self, object: RenderObject) {
        self.objects.insert(object.name.clone(), object);
    }

    /// Removes an object, releasing its GPU resources. Absent names are a
    /// logged no-op.
    pub fn remove(&mut self, name: &str) -> Option<RenderObject> {
        let removed = self.objects.remove(name);
        if removed.is_none() {
            warn!("remove: no object named '{name}' in scene");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<&RenderObject> {
        self.objects.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RenderObject> {
        self.objects.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Lazy iteration in implementation-defined order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RenderObject)> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut RenderObject)> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Uploads GPU resources for every staged object.
    ///
    /// Must be called once the device exists and before the first frame;
    /// already-uploaded objects are untouched.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layouts: &ObjectBindingLayouts,
        fallback_texture: &TextureResource,
    ) {
        for object in self.objects.values_mut() {
            object.init_gpu_resources(device, queue, layouts, fallback_texture);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MeshData;
    use crate::gfx::scene::transform::Transform;

    fn test_object(name: &str) -> RenderObject {
        let mesh = MeshData {
            vertices: Vec::new(),
            indices: Vec::new(),
            has_texcoords: false,
            material: None,
        };
        RenderObject::new(name, mesh, Transform::new())
    }

    #[test]
    fn removed_object_is_excluded_from_iteration() {
        let mut scene = Scene::new();
        scene.add(test_object("cube"));
        scene.add(test_object("floor"));
        assert!(scene.contains("cube"));

        scene.remove("cube");
        assert_eq!(scene.len(), 1);
        assert!(scene.iter().all(|(name, _)| name != "cube"));
    }

    #[test]
    fn removing_an_absent_name_is_a_noop() {
        let mut scene = Scene::new();
        scene.add(test_object("cube"));
        assert!(scene.remove("ghost").is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn same_name_overwrites_the_existing_entry() {
        let mut scene = Scene::new();
        scene.add(test_object("cube"));
        let mut replacement = test_object("cube");
        replacement.transform = Transform::new().with_scale(3.0);
        scene.add(replacement);

        assert_eq!(scene.len(), 1);
        let stored = scene.get("cube").unwrap();
        assert_eq!(stored.transform, Transform::new().with_scale(3.0));
    }
}
