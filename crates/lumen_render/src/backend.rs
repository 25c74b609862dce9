//! The seam between the render loop and the GPU.
//!
//! `RenderPipeline` only talks to the device through `RenderBackend`, so the
//! whole frame sequence (buffer management, parameter binding, accumulation)
//! runs the same against wgpu and against a headless backend in tests.

use crate::params::FrameParams;

/// Which of the two accumulation images is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// Per-frame kernel output, written by the trace dispatch
    Raw,
    /// Running average, written by the blend pass and presented
    Converged,
}

/// Everything the trace kernel reads for one dispatch.
///
/// Absent buffers mean "no elements of this kind"; the matching count in
/// `params` is zero and the backend binds a placeholder.
#[derive(Debug)]
pub struct KernelBindings<'a, B> {
    pub params: FrameParams,
    pub spheres: Option<&'a B>,
    pub mesh_objects: Option<&'a B>,
    pub vertices: Option<&'a B>,
    pub indices: Option<&'a B>,
}

/// GPU operations the render loop needs.
pub trait RenderBackend {
    type Buffer;
    type Image;

    /// Allocate a storage buffer of `size` bytes.
    fn create_buffer(&mut self, label: &str, size: u64) -> Self::Buffer;

    /// Upload `data` to the start of `buffer`.
    fn write_buffer(&mut self, buffer: &Self::Buffer, data: &[u8]);

    /// Allocate a float RGBA image.
    fn create_image(&mut self, role: ImageRole, width: u32, height: u32) -> Self::Image;

    /// Run the trace kernel over `groups` thread groups, writing `target`.
    fn dispatch(
        &mut self,
        bindings: &KernelBindings<'_, Self::Buffer>,
        target: &Self::Image,
        groups: [u32; 3],
    );

    /// Blend `raw` into `converged` with weight `1 / (sample + 1)`.
    fn blend(&mut self, raw: &Self::Image, converged: &Self::Image, sample: u32);

    /// Show `converged` on the output surface.
    fn present(&mut self, converged: &Self::Image) -> anyhow::Result<()>;
}
