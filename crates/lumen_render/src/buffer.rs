//! Storage buffer management.
//!
//! Every structured buffer the kernel reads goes through `sync_buffer`: the
//! existing buffer is kept when element count and stride still match, is
//! released otherwise, and is released without replacement when the data is
//! empty. Whatever survives gets the full data uploaded.

use bytemuck::Pod;

use crate::backend::RenderBackend;

/// A storage buffer together with the shape it was allocated for.
#[derive(Debug)]
pub struct ComputeBuffer<B> {
    raw: B,
    count: usize,
    stride: usize,
}

impl<B> ComputeBuffer<B> {
    /// Backend handle
    pub fn raw(&self) -> &B {
        &self.raw
    }

    /// Number of elements
    pub fn count(&self) -> usize {
        self.count
    }

    /// Size of one element in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn size_bytes(&self) -> u64 {
        (self.count * self.stride) as u64
    }
}

/// What `sync_buffer` did with the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSync {
    /// No data: the slot is empty
    Empty,
    /// The previous buffer was kept and overwritten
    Reused,
    /// A new buffer was allocated
    Allocated,
}

/// Bring `slot` in line with `data` and upload it.
pub fn sync_buffer<R, T>(
    backend: &mut R,
    slot: &mut Option<ComputeBuffer<R::Buffer>>,
    label: &str,
    data: &[T],
) -> BufferSync
where
    R: RenderBackend + ?Sized,
    T: Pod,
{
    let count = data.len();
    let stride = std::mem::size_of::<T>();

    if let Some(existing) = slot {
        if count == 0 || existing.count != count || existing.stride != stride {
            log::debug!(
                "Releasing {} buffer ({} x {} bytes)",
                label,
                existing.count,
                existing.stride
            );
            *slot = None;
        }
    }

    if count == 0 {
        return BufferSync::Empty;
    }

    let outcome = if slot.is_some() {
        BufferSync::Reused
    } else {
        BufferSync::Allocated
    };

    let buffer = slot.get_or_insert_with(|| {
        log::debug!("Allocating {} buffer ({} x {} bytes)", label, count, stride);
        ComputeBuffer {
            raw: backend.create_buffer(label, (count * stride) as u64),
            count,
            stride,
        }
    });
    backend.write_buffer(&buffer.raw, bytemuck::cast_slice(data));

    outcome
}

/// The four structured buffers of the scene.
#[derive(Debug)]
pub struct SceneBuffers<B> {
    pub spheres: Option<ComputeBuffer<B>>,
    pub mesh_objects: Option<ComputeBuffer<B>>,
    pub vertices: Option<ComputeBuffer<B>>,
    pub indices: Option<ComputeBuffer<B>>,
}

impl<B> Default for SceneBuffers<B> {
    fn default() -> Self {
        Self {
            spheres: None,
            mesh_objects: None,
            vertices: None,
            indices: None,
        }
    }
}

impl<B> SceneBuffers<B> {
    /// Drop every buffer.
    pub fn release(&mut self) {
        self.spheres = None;
        self.mesh_objects = None;
        self.vertices = None;
        self.indices = None;
    }

    fn count_of(buffer: &Option<ComputeBuffer<B>>) -> u32 {
        buffer.as_ref().map_or(0, |b| b.count as u32)
    }

    pub fn sphere_count(&self) -> u32 {
        Self::count_of(&self.spheres)
    }

    pub fn mesh_object_count(&self) -> u32 {
        Self::count_of(&self.mesh_objects)
    }

    pub fn vertex_count(&self) -> u32 {
        Self::count_of(&self.vertices)
    }

    pub fn index_count(&self) -> u32 {
        Self::count_of(&self.indices)
    }
}
