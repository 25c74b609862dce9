//! Progressive GPU ray tracing.
//!
//! `RenderPipeline` drives the per-frame sequence over any `RenderBackend`;
//! `WgpuBackend` is the window-backed implementation.

pub mod accumulator;
pub mod backend;
pub mod buffer;
pub mod error;
pub mod gpu;
pub mod params;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod headless;

pub use accumulator::{blend_weight, dispatch_size, Accumulator, THREAD_GROUP_SIZE};
pub use backend::{ImageRole, KernelBindings, RenderBackend};
pub use buffer::{sync_buffer, BufferSync, ComputeBuffer, SceneBuffers};
pub use error::{RenderError, RenderResult};
pub use gpu::{GpuImage, OverlayFrame, WgpuBackend};
pub use params::{FrameInputs, FrameParams, ParameterBinder, GROUND_PLANE_Y};
pub use pipeline::{load_environment, FrameStats, FrameView, RenderPipeline};
