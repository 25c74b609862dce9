//! Per-frame kernel parameters.

use bytemuck::{Pod, Zeroable};
use lumen_core::DirectionalLight;
use lumen_math::{Camera, Mat4, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::KernelBindings;
use crate::buffer::SceneBuffers;

/// Height of the ground plane the kernel intersects.
pub const GROUND_PLANE_Y: f32 = 0.0;

/// Uniform block of the trace kernel.
///
/// Matches the WGSL `FrameParams` struct (192 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameParams {
    pub camera_to_world: [[f32; 4]; 4],
    pub camera_inverse_projection: [[f32; 4]; 4],
    /// xyz: direction the light travels, w: intensity
    pub directional_light: [f32; 4],
    /// Sub-pixel jitter in [0, 1)
    pub pixel_offset: [f32; 2],
    pub ground_plane_y: f32,
    pub seed: f32,
    pub global_illumination: f32,
    pub reflections: u32,
    pub sample: u32,
    pub sphere_count: u32,
    pub mesh_object_count: u32,
    pub vertex_count: u32,
    pub index_count: u32,
    pub _padding: u32,
}

/// Scene state the binder turns into `FrameParams`.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    pub camera_to_world: Mat4,
    pub inverse_projection: Mat4,
    pub light: DirectionalLight,
    pub global_illumination: f32,
    pub reflections: u32,
}

impl FrameInputs {
    pub fn new(
        camera: &Camera,
        light: DirectionalLight,
        global_illumination: f32,
        reflections: u32,
    ) -> Self {
        Self {
            camera_to_world: camera.camera_to_world(),
            inverse_projection: camera.inverse_projection(),
            light,
            global_illumination,
            reflections,
        }
    }
}

/// Builds the kernel binding set for each frame.
///
/// Owns the frame random source used for jitter and the kernel seed. It is
/// separate from the seeded scene generator, so frame timing never affects
/// which spheres get generated.
#[derive(Debug)]
pub struct ParameterBinder {
    rng: StdRng,
}

impl Default for ParameterBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterBinder {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Binder with a reproducible frame random source.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh jitter and seed, then everything else from `inputs` and `buffers`.
    ///
    /// Jitter and seed are resampled on every call, converged or not.
    pub fn bind<'a, B>(
        &mut self,
        inputs: &FrameInputs,
        sample: u32,
        buffers: &'a SceneBuffers<B>,
    ) -> KernelBindings<'a, B> {
        let jitter = Vec2::new(self.rng.gen(), self.rng.gen());
        let seed: f32 = self.rng.gen();

        let params = FrameParams {
            camera_to_world: inputs.camera_to_world.to_cols_array_2d(),
            camera_inverse_projection: inputs.inverse_projection.to_cols_array_2d(),
            directional_light: inputs.light.as_vec4().to_array(),
            pixel_offset: jitter.to_array(),
            ground_plane_y: GROUND_PLANE_Y,
            seed,
            global_illumination: inputs.global_illumination,
            reflections: inputs.reflections,
            sample,
            sphere_count: buffers.sphere_count(),
            mesh_object_count: buffers.mesh_object_count(),
            vertex_count: buffers.vertex_count(),
            index_count: buffers.index_count(),
            _padding: 0,
        };

        KernelBindings {
            params,
            spheres: buffers.spheres.as_ref().map(|b| b.raw()),
            mesh_objects: buffers.mesh_objects.as_ref().map(|b| b.raw()),
            vertices: buffers.vertices.as_ref().map(|b| b.raw()),
            indices: buffers.indices.as_ref().map(|b| b.raw()),
        }
    }
}
