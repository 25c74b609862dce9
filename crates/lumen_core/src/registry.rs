//! Geometry registry: the set of mesh objects the ray tracer sees.
//!
//! Objects are registered and unregistered by the host. Whenever the set
//! changes, the registry is marked dirty and the next `rebuild_if_dirty`
//! flattens every object's mesh into one global vertex array, one global
//! index array and one `MeshObject` record per object. The rebuild always
//! starts from scratch: each object's index offset depends on everything
//! registered before it.
//!
//! The registry is mutated through `&mut self` from the render thread only.
//! It is not meant to be shared for concurrent registration; wrap it in a
//! lock if the host ever registers from several threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use lumen_math::Mat4;

use crate::mesh::Mesh;

/// Stable identity of a render object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A mesh instance placed in the world.
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub id: ObjectId,
    pub mesh: Arc<Mesh>,
    /// Local → world transform
    pub transform: Mat4,
}

impl RenderObject {
    /// Create an object with a freshly allocated id.
    pub fn new(mesh: Arc<Mesh>, transform: Mat4) -> Self {
        Self {
            id: ObjectId::next(),
            mesh,
            transform,
        }
    }
}

/// Per-object record in the GPU mesh-object buffer.
///
/// Matches the WGSL `MeshObject` struct (80 bytes, padded to 16).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshObject {
    pub local_to_world: [[f32; 4]; 4],
    pub indices_offset: u32,
    pub indices_count: u32,
    pub _padding: [u32; 2],
}

/// All registered geometry, concatenated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedGeometry {
    /// Object-space vertex positions, 12 bytes each
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices into `vertices`, already rebased per object
    pub indices: Vec<u32>,
    /// One record per registered object, in registration order
    pub mesh_objects: Vec<MeshObject>,
}

impl FlattenedGeometry {
    fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.mesh_objects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.mesh_objects.is_empty()
    }
}

/// Tracks registered render objects and their flattened geometry.
#[derive(Debug, Default)]
pub struct GeometryRegistry {
    objects: Vec<RenderObject>,
    geometry: FlattenedGeometry,
    dirty: bool,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object at the end of the registration order.
    ///
    /// Returns false (and changes nothing) if the id is already registered
    /// or the mesh has indices past its vertex list.
    pub fn register(&mut self, object: RenderObject) -> bool {
        if self.contains(object.id) {
            log::warn!("Object {:?} is already registered", object.id);
            return false;
        }
        if !object.mesh.has_valid_indices() {
            log::warn!(
                "Object {:?} rejected: indices reference missing vertices",
                object.id
            );
            return false;
        }
        log::debug!(
            "Registered object {:?} ({} vertices, {} triangles)",
            object.id,
            object.mesh.vertex_count(),
            object.mesh.triangle_count()
        );
        self.objects.push(object);
        self.dirty = true;
        true
    }

    /// Remove an object. Removing an unknown id is a no-op and returns None.
    pub fn unregister(&mut self, id: ObjectId) -> Option<RenderObject> {
        let pos = self.objects.iter().position(|o| o.id == id)?;
        self.dirty = true;
        log::debug!("Unregistered object {:?}", id);
        Some(self.objects.remove(pos))
    }

    /// Replace an object's world transform. Its record picks the change up
    /// on the next rebuild.
    pub fn set_transform(&mut self, id: ObjectId, transform: Mat4) -> bool {
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(object) => {
                if object.transform != transform {
                    object.transform = transform;
                    self.dirty = true;
                }
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&RenderObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flattened geometry as of the last rebuild.
    pub fn geometry(&self) -> &FlattenedGeometry {
        &self.geometry
    }

    /// Rebuild the flattened arrays if the object set changed, then return them.
    ///
    /// When clean this is a no-op and the previous arrays are returned as is.
    pub fn rebuild_if_dirty(&mut self) -> &FlattenedGeometry {
        if !self.dirty {
            return &self.geometry;
        }
        self.dirty = false;
        self.geometry.clear();

        for object in &self.objects {
            let mesh = &object.mesh;

            // Indices are rebased by the vertex count before this object
            let first_vertex = self.geometry.vertices.len() as u32;
            self.geometry
                .vertices
                .extend(mesh.positions.iter().map(|p| p.to_array()));

            let first_index = self.geometry.indices.len() as u32;
            self.geometry
                .indices
                .extend(mesh.indices.iter().map(|&i| i + first_vertex));

            self.geometry.mesh_objects.push(MeshObject {
                local_to_world: object.transform.to_cols_array_2d(),
                indices_offset: first_index,
                indices_count: mesh.indices.len() as u32,
                _padding: [0; 2],
            });
        }

        log::info!(
            "Rebuilt geometry: {} objects, {} vertices, {} indices",
            self.geometry.mesh_objects.len(),
            self.geometry.vertices.len(),
            self.geometry.indices.len()
        );

        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;

    fn triangle() -> Arc<Mesh> {
        Arc::new(Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]))
    }

    fn quad() -> Arc<Mesh> {
        Arc::new(Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            vec![0, 1, 2, 0, 2, 3],
        ))
    }

    #[test]
    fn test_two_instances_flatten() {
        let mut registry = GeometryRegistry::new();
        registry.register(RenderObject::new(triangle(), Mat4::IDENTITY));
        registry.register(RenderObject::new(quad(), Mat4::IDENTITY));

        let geometry = registry.rebuild_if_dirty();

        assert_eq!(geometry.vertices.len(), 7);
        assert_eq!(geometry.indices.len(), 9);
        assert_eq!(&geometry.indices[3..], &[3, 4, 5, 3, 5, 6]);
        assert_eq!(geometry.mesh_objects[1].indices_offset, 3);
        assert_eq!(geometry.mesh_objects[1].indices_count, 6);
    }

    #[test]
    fn test_reregistration_moves_to_end() {
        let mut registry = GeometryRegistry::new();
        let a = RenderObject::new(triangle(), Mat4::IDENTITY);
        let b = RenderObject::new(quad(), Mat4::IDENTITY);
        let a_id = a.id;

        registry.register(a);
        registry.register(b);
        let a = registry.unregister(a_id).unwrap();
        registry.register(a);

        let geometry = registry.rebuild_if_dirty();

        // Order is now {B, A}: quad first, triangle rebased after its 4 vertices
        assert_eq!(geometry.mesh_objects[0].indices_count, 6);
        assert_eq!(geometry.mesh_objects[1].indices_offset, 6);
        assert_eq!(geometry.mesh_objects[1].indices_count, 3);
        assert_eq!(&geometry.indices[6..], &[4, 5, 6]);
    }

    #[test]
    fn test_rebuild_clears_dirty_and_is_noop_when_clean() {
        let mut registry = GeometryRegistry::new();
        registry.register(RenderObject::new(triangle(), Mat4::IDENTITY));
        assert!(registry.is_dirty());

        let first = registry.rebuild_if_dirty().clone();
        assert!(!registry.is_dirty());

        let second = registry.rebuild_if_dirty().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut registry = GeometryRegistry::new();
        registry.register(RenderObject::new(triangle(), Mat4::IDENTITY));
        registry.rebuild_if_dirty();

        assert!(registry.unregister(ObjectId::next()).is_none());
        assert!(!registry.is_dirty());
    }

    #[test]
    fn test_duplicate_register_ignored() {
        let mut registry = GeometryRegistry::new();
        let object = RenderObject::new(triangle(), Mat4::IDENTITY);

        assert!(registry.register(object.clone()));
        assert!(!registry.register(object));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        let mut registry = GeometryRegistry::new();
        let broken = Arc::new(Mesh::new(vec![Vec3::ZERO, Vec3::X], vec![0, 1, 2]));

        assert!(!registry.register(RenderObject::new(broken, Mat4::IDENTITY)));
        assert!(registry.is_empty());
        assert!(!registry.is_dirty());
    }

    #[test]
    fn test_unregister_all_gives_empty_geometry() {
        let mut registry = GeometryRegistry::new();
        let object = RenderObject::new(triangle(), Mat4::IDENTITY);
        let id = object.id;
        registry.register(object);
        registry.rebuild_if_dirty();

        registry.unregister(id);
        let geometry = registry.rebuild_if_dirty();

        assert!(geometry.is_empty());
        assert!(geometry.vertices.is_empty());
        assert!(geometry.indices.is_empty());
    }

    #[test]
    fn test_set_transform_updates_record() {
        let mut registry = GeometryRegistry::new();
        let object = RenderObject::new(triangle(), Mat4::IDENTITY);
        let id = object.id;
        registry.register(object);
        registry.rebuild_if_dirty();

        let moved = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0));
        assert!(registry.set_transform(id, moved));
        assert!(registry.is_dirty());

        let geometry = registry.rebuild_if_dirty();
        assert_eq!(geometry.mesh_objects[0].local_to_world, moved.to_cols_array_2d());
    }

    #[test]
    fn test_mesh_object_layout() {
        assert_eq!(std::mem::size_of::<MeshObject>(), 80);
    }
}
