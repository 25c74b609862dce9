//! CPU stand-in for the GPU, used by the render loop tests.

use std::collections::HashMap;

use bytemuck::Pod;

use crate::backend::{ImageRole, KernelBindings, RenderBackend};
use crate::params::FrameParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessBuffer {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessImage {
    pub id: u64,
    pub role: ImageRole,
    pub width: u32,
    pub height: u32,
}

/// One recorded kernel dispatch.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub params: FrameParams,
    pub groups: [u32; 3],
    pub bound: [Option<u64>; 4],
}

type Kernel = Box<dyn FnMut(&FrameParams) -> [f32; 4]>;

pub struct HeadlessBackend {
    next_id: u64,
    buffers: HashMap<u64, Vec<u8>>,
    images: HashMap<u64, Vec<[f32; 4]>>,
    kernel: Kernel,
    pub buffers_created: usize,
    pub images_created: usize,
    pub dispatches: Vec<Dispatch>,
    pub presented: Vec<Vec<[f32; 4]>>,
    /// Make the next `present` fail as if the surface was lost
    pub fail_next_present: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::with_kernel(|_| [0.5, 0.5, 0.5, 1.0])
    }

    /// Backend whose trace kernel fills the whole image with one color.
    pub fn with_kernel(kernel: impl FnMut(&FrameParams) -> [f32; 4] + 'static) -> Self {
        Self {
            next_id: 1,
            buffers: HashMap::new(),
            images: HashMap::new(),
            kernel: Box::new(kernel),
            buffers_created: 0,
            images_created: 0,
            dispatches: Vec::new(),
            presented: Vec::new(),
            fail_next_present: false,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn buffer_contents<T: Pod>(&self, buffer: &HeadlessBuffer) -> Vec<T> {
        self.buffers[&buffer.id]
            .chunks_exact(std::mem::size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    pub fn last_presented(&self) -> &[[f32; 4]] {
        self.presented.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl RenderBackend for HeadlessBackend {
    type Buffer = HeadlessBuffer;
    type Image = HeadlessImage;

    fn create_buffer(&mut self, _label: &str, size: u64) -> HeadlessBuffer {
        let id = self.allocate_id();
        self.buffers.insert(id, vec![0; size as usize]);
        self.buffers_created += 1;
        HeadlessBuffer { id }
    }

    fn write_buffer(&mut self, buffer: &HeadlessBuffer, data: &[u8]) {
        let bytes = self.buffers.get_mut(&buffer.id).expect("unknown buffer");
        assert!(data.len() <= bytes.len(), "write past end of buffer");
        bytes[..data.len()].copy_from_slice(data);
    }

    fn create_image(&mut self, role: ImageRole, width: u32, height: u32) -> HeadlessImage {
        let id = self.allocate_id();
        self.images
            .insert(id, vec![[0.0; 4]; (width * height) as usize]);
        self.images_created += 1;
        HeadlessImage {
            id,
            role,
            width,
            height,
        }
    }

    fn dispatch(
        &mut self,
        bindings: &KernelBindings<'_, HeadlessBuffer>,
        target: &HeadlessImage,
        groups: [u32; 3],
    ) {
        let color = (self.kernel)(&bindings.params);
        let pixels = self.images.get_mut(&target.id).expect("unknown image");
        pixels.fill(color);

        self.dispatches.push(Dispatch {
            params: bindings.params,
            groups,
            bound: [
                bindings.spheres.map(|b| b.id),
                bindings.mesh_objects.map(|b| b.id),
                bindings.vertices.map(|b| b.id),
                bindings.indices.map(|b| b.id),
            ],
        });
    }

    fn blend(&mut self, raw: &HeadlessImage, converged: &HeadlessImage, sample: u32) {
        let weight = crate::accumulator::blend_weight(sample);
        let source = self.images[&raw.id].clone();
        let target = self.images.get_mut(&converged.id).expect("unknown image");
        for (dst, src) in target.iter_mut().zip(source) {
            for c in 0..3 {
                dst[c] = src[c] * weight + dst[c] * (1.0 - weight);
            }
            dst[3] = 1.0;
        }
    }

    fn present(&mut self, converged: &HeadlessImage) -> anyhow::Result<()> {
        if std::mem::take(&mut self.fail_next_present) {
            anyhow::bail!("surface lost");
        }
        self.presented.push(self.images[&converged.id].clone());
        Ok(())
    }
}
