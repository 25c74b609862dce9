//! The per-frame render loop.
//!
//! `RenderPipeline` owns every piece of renderer state: the scene config,
//! the generated spheres, the geometry registry, the invalidation tracker,
//! the GPU buffers and the accumulation images. A frame runs:
//!
//! 1. invalidation check against the last observed view
//! 2. accumulation images sized to the output (resize forces a reset)
//! 3. geometry rebuild and re-upload if the registry is dirty
//! 4. parameter binding, kernel dispatch, blend, present
//! 5. sample counter increment

use std::sync::Arc;

use lumen_core::{
    generate_spheres, AccumulationPhase, DirectionalLight, EnvironmentMap, GeometryRegistry,
    GpuSphere, InvalidationTracker, Mesh, ObjectId, RenderObject, SceneConfig, Sphere,
    TransformSource, WatchKey,
};
use lumen_math::{Camera, Mat4};

use crate::accumulator::{dispatch_size, Accumulator};
use crate::backend::RenderBackend;
use crate::buffer::{sync_buffer, SceneBuffers};
use crate::error::{RenderError, RenderResult};
use crate::params::{FrameInputs, ParameterBinder};

/// Size of the procedural sky used when no skybox is configured.
const GRADIENT_SKY_SIZE: (u32, u32) = (512, 256);

/// Load the configured skybox, or build the procedural sky.
///
/// A configured skybox that fails to load is an error: the kernel has
/// nothing to shade escaping rays with.
pub fn load_environment(config: &SceneConfig) -> RenderResult<EnvironmentMap> {
    match &config.skybox {
        Some(path) => Ok(EnvironmentMap::load(path)?),
        None => Ok(EnvironmentMap::gradient_sky(
            GRADIENT_SKY_SIZE.0,
            GRADIENT_SKY_SIZE.1,
        )),
    }
}

/// What the host is looking at this frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView {
    pub camera: Camera,
    pub light: DirectionalLight,
    /// Output size in pixels
    pub resolution: (u32, u32),
}

/// Summary of a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Samples averaged before this frame's blend (0 on a reset frame)
    pub sample: u32,
    pub phase: AccumulationPhase,
    /// Geometry buffers were rebuilt this frame
    pub rebuilt_geometry: bool,
    /// Thread groups dispatched
    pub groups: [u32; 3],
}

/// Resolves watched keys against the current frame.
struct FrameTransforms<'a> {
    view: &'a FrameView,
    registry: &'a GeometryRegistry,
}

impl TransformSource for FrameTransforms<'_> {
    fn world_transform(&self, key: WatchKey) -> Option<Mat4> {
        match key {
            WatchKey::Camera => Some(self.view.camera.camera_to_world()),
            WatchKey::DirectionalLight => Some(self.view.light.world_transform()),
            WatchKey::Object(id) => self.registry.get(id).map(|o| o.transform),
        }
    }
}

/// Progressive ray tracing pipeline over a `RenderBackend`.
pub struct RenderPipeline<R: RenderBackend> {
    backend: R,
    config: SceneConfig,
    spheres: Vec<Sphere>,
    registry: GeometryRegistry,
    tracker: InvalidationTracker,
    binder: ParameterBinder,
    buffers: SceneBuffers<R::Buffer>,
    accumulator: Accumulator<R::Image>,
}

impl<R: RenderBackend> RenderPipeline<R> {
    /// Validate `config`, generate the sphere scene and upload it.
    pub fn new(backend: R, config: SceneConfig) -> RenderResult<Self> {
        Self::with_binder(backend, config, ParameterBinder::new())
    }

    /// Like `new`, with a caller-supplied parameter binder.
    pub fn with_binder(
        backend: R,
        config: SceneConfig,
        binder: ParameterBinder,
    ) -> RenderResult<Self> {
        config.validate()?;

        let mut pipeline = Self {
            backend,
            config,
            spheres: Vec::new(),
            registry: GeometryRegistry::new(),
            tracker: InvalidationTracker::new(),
            binder,
            buffers: SceneBuffers::default(),
            accumulator: Accumulator::new(),
        };
        pipeline.setup_scene();
        Ok(pipeline)
    }

    /// Regenerate the spheres from the current config and upload them.
    pub fn setup_scene(&mut self) {
        self.spheres = generate_spheres(&self.config.sphere_settings());
        let gpu: Vec<GpuSphere> = self.spheres.iter().map(Sphere::to_gpu).collect();
        sync_buffer(&mut self.backend, &mut self.buffers.spheres, "Sphere Buffer", &gpu);
        self.tracker.invalidate();
    }

    /// Switch to a new configuration.
    ///
    /// The config is validated first and rejected as a whole on error. The
    /// environment map is uploaded once, so a different skybox is rejected
    /// too. The spheres are regenerated only if their inputs changed;
    /// accumulation restarts either way.
    pub fn apply_config(&mut self, config: SceneConfig) -> RenderResult<()> {
        config.validate()?;
        if config.skybox != self.config.skybox {
            return Err(RenderError::SkyboxChanged {
                current: self.config.skybox.clone(),
                requested: config.skybox,
            });
        }

        let regenerate = self.config.spheres_differ(&config);
        self.config = config;
        if regenerate {
            self.setup_scene();
        } else {
            self.tracker.invalidate();
        }
        log::info!("Applied scene config (spheres regenerated: {})", regenerate);
        Ok(())
    }

    /// Register a render object. Returns false if it was already registered.
    pub fn register_object(&mut self, object: RenderObject) -> bool {
        self.registry.register(object)
    }

    /// Convenience: register `mesh` at `transform` and return its id.
    ///
    /// Returns None if the registry rejected the mesh.
    pub fn add_mesh(&mut self, mesh: Arc<Mesh>, transform: Mat4) -> Option<ObjectId> {
        let object = RenderObject::new(mesh, transform);
        let id = object.id;
        self.registry.register(object).then_some(id)
    }

    /// Unregister a render object; unknown ids are ignored.
    pub fn unregister_object(&mut self, id: ObjectId) -> Option<RenderObject> {
        let removed = self.registry.unregister(id);
        if removed.is_some() {
            self.tracker.unwatch(WatchKey::Object(id));
        }
        removed
    }

    /// Move a registered object. Returns false for unknown ids.
    pub fn update_object_transform(&mut self, id: ObjectId, transform: Mat4) -> bool {
        self.registry.set_transform(id, transform)
    }

    /// Restart accumulation whenever this object's transform changes.
    pub fn watch_object(&mut self, id: ObjectId) -> bool {
        self.tracker.watch(WatchKey::Object(id))
    }

    pub fn unwatch_object(&mut self, id: ObjectId) -> bool {
        self.tracker.unwatch(WatchKey::Object(id))
    }

    /// Restart accumulation on the next frame.
    pub fn invalidate(&mut self) {
        self.tracker.invalidate();
    }

    /// Render one frame. Returns None if the output has zero size.
    pub fn render_frame(&mut self, view: &FrameView) -> anyhow::Result<Option<FrameStats>> {
        let (width, height) = view.resolution;
        if width == 0 || height == 0 {
            return Ok(None);
        }

        let transforms = FrameTransforms {
            view,
            registry: &self.registry,
        };
        let mut phase = self
            .tracker
            .check(view.resolution, view.camera.fov_y, &transforms);

        if self
            .accumulator
            .ensure_images(&mut self.backend, view.resolution)
        {
            phase = AccumulationPhase::Reset;
        }

        let rebuilt_geometry = self.registry.is_dirty();
        if rebuilt_geometry {
            let geometry = self.registry.rebuild_if_dirty();
            sync_buffer(
                &mut self.backend,
                &mut self.buffers.mesh_objects,
                "Mesh Object Buffer",
                &geometry.mesh_objects,
            );
            sync_buffer(
                &mut self.backend,
                &mut self.buffers.vertices,
                "Vertex Buffer",
                &geometry.vertices,
            );
            sync_buffer(
                &mut self.backend,
                &mut self.buffers.indices,
                "Index Buffer",
                &geometry.indices,
            );
            phase = AccumulationPhase::Reset;
        }

        if phase == AccumulationPhase::Reset {
            self.accumulator.reset();
        }
        let sample = self.accumulator.sample();

        let inputs = FrameInputs::new(
            &view.camera,
            view.light,
            self.config.global_illumination,
            self.config.reflections,
        );
        let bindings = self.binder.bind(&inputs, sample, &self.buffers);
        let groups = dispatch_size(width, height);

        let Some((raw, converged)) = self.accumulator.images() else {
            anyhow::bail!("Accumulation images missing after resize");
        };
        self.backend.dispatch(&bindings, raw, groups);
        self.backend.blend(raw, converged, sample);
        let presented = self.backend.present(converged);
        // The blend is submitted even when the surface is unavailable
        self.accumulator.advance();
        presented?;

        Ok(Some(FrameStats {
            sample,
            phase,
            rebuilt_geometry,
            groups,
        }))
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut R {
        &mut self.backend
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    /// Samples accumulated so far.
    pub fn sample(&self) -> u32 {
        self.accumulator.sample()
    }
}

impl<R: RenderBackend> Drop for RenderPipeline<R> {
    fn drop(&mut self) {
        self.accumulator.release();
        self.buffers.release();
        log::info!("Render pipeline released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;
    use lumen_math::Vec3;

    fn view(resolution: (u32, u32)) -> FrameView {
        FrameView {
            camera: Camera::new(Vec3::new(0.0, 20.0, 120.0), Vec3::ZERO, 16.0 / 9.0),
            light: DirectionalLight::default(),
            resolution,
        }
    }

    fn pipeline(backend: HeadlessBackend) -> RenderPipeline<HeadlessBackend> {
        RenderPipeline::with_binder(backend, SceneConfig::default(), ParameterBinder::with_seed(3))
            .unwrap()
    }

    fn triangle() -> Arc<Mesh> {
        Arc::new(Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]))
    }

    fn render(pipeline: &mut RenderPipeline<HeadlessBackend>, view: &FrameView) -> FrameStats {
        pipeline.render_frame(view).unwrap().unwrap()
    }

    #[test]
    fn test_sample_counter_resets_only_on_change() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let mut view = view((64, 48));

        let samples: Vec<u32> = (0..3).map(|_| render(&mut pipeline, &view).sample).collect();
        assert_eq!(samples, vec![0, 1, 2]);

        view.camera.translate_local(1.0, 0.0, 0.0, 1.0);
        assert_eq!(render(&mut pipeline, &view).sample, 0);
        assert_eq!(render(&mut pipeline, &view).sample, 1);

        view.light = DirectionalLight::new(Vec3::new(0.2, -1.0, 0.1), 1.0);
        assert_eq!(render(&mut pipeline, &view).sample, 0);

        view.camera.fov_y = 45.0_f32.to_radians();
        assert_eq!(render(&mut pipeline, &view).sample, 0);

        view.resolution = (32, 32);
        let stats = render(&mut pipeline, &view);
        assert_eq!(stats.sample, 0);
        assert_eq!(stats.phase, AccumulationPhase::Reset);

        let stats = render(&mut pipeline, &view);
        assert_eq!(stats.sample, 1);
        assert_eq!(stats.phase, AccumulationPhase::Converging);
        assert_eq!(pipeline.sample(), 2);
    }

    #[test]
    fn test_constant_samples_converge_to_value() {
        let v = [0.25, 0.5, 0.75, 1.0];
        let mut pipeline = pipeline(HeadlessBackend::with_kernel(move |_| v));
        let view = view((16, 16));

        for frame in 0..20 {
            render(&mut pipeline, &view);
            for pixel in pipeline.backend().last_presented() {
                for c in 0..3 {
                    assert!(
                        (pixel[c] - v[c]).abs() < 1e-5,
                        "frame {}: {:?} drifted from {:?}",
                        frame,
                        pixel,
                        v
                    );
                }
            }
        }
    }

    #[test]
    fn test_running_mean_of_varying_samples() {
        let mut next = 0.0;
        let kernel = move |_: &crate::params::FrameParams| {
            next += 1.0;
            [next, next, next, 1.0]
        };
        let mut pipeline = pipeline(HeadlessBackend::with_kernel(kernel));
        let view = view((8, 8));

        // Samples 1, 2, 3, 4 average to 2.5
        for _ in 0..4 {
            render(&mut pipeline, &view);
        }
        let pixel = pipeline.backend().last_presented()[0];
        assert!((pixel[0] - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_failed_present_still_counts_blended_sample() {
        let mut next = 0.0;
        let kernel = move |_: &crate::params::FrameParams| {
            next += 1.0;
            [next, next, next, 1.0]
        };
        let mut pipeline = pipeline(HeadlessBackend::with_kernel(kernel));
        let view = view((8, 8));
        render(&mut pipeline, &view);
        render(&mut pipeline, &view);

        pipeline.backend_mut().fail_next_present = true;
        assert!(pipeline.render_frame(&view).is_err());
        assert_eq!(pipeline.sample(), 3);

        // Samples 1, 2, 3, 4 still average to 2.5
        let stats = render(&mut pipeline, &view);
        assert_eq!(stats.sample, 3);
        let pixel = pipeline.backend().last_presented()[0];
        assert!((pixel[0] - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_rare_bright_samples_converge_to_mean() {
        // One sample in a hundred is 100, the rest are 0: the mean is 1
        let kernel = |params: &crate::params::FrameParams| {
            let v = if params.sample % 100 == 99 { 100.0 } else { 0.0 };
            [v, v, v, 1.0]
        };
        let mut pipeline = pipeline(HeadlessBackend::with_kernel(kernel));
        let view = view((1, 1));

        for _ in 0..10_000 {
            render(&mut pipeline, &view);
        }

        let pixel = pipeline.backend().last_presented()[0];
        assert!((pixel[0] - 1.0).abs() < 1e-2, "converged to {}", pixel[0]);
    }

    #[test]
    fn test_dispatch_covers_resolution() {
        let mut pipeline = pipeline(HeadlessBackend::new());

        let stats = render(&mut pipeline, &view((100, 50)));

        assert_eq!(stats.groups, [13, 7, 1]);
        assert_eq!(pipeline.backend().dispatches[0].groups, [13, 7, 1]);
    }

    #[test]
    fn test_spheres_only_scene_binds_no_mesh_buffers() {
        let mut pipeline = pipeline(HeadlessBackend::new());

        render(&mut pipeline, &view((32, 32)));

        let dispatch = &pipeline.backend().dispatches[0];
        assert!(dispatch.bound[0].is_some());
        assert_eq!(dispatch.bound[1..], [None, None, None]);
        assert_eq!(dispatch.params.sphere_count as usize, pipeline.spheres().len());
        assert_eq!(dispatch.params.mesh_object_count, 0);
        assert_eq!(dispatch.params.index_count, 0);
    }

    #[test]
    fn test_registering_geometry_rebuilds_and_resets() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let view = view((32, 32));
        render(&mut pipeline, &view);
        render(&mut pipeline, &view);

        let id = pipeline.add_mesh(triangle(), Mat4::IDENTITY).unwrap();
        let stats = render(&mut pipeline, &view);
        assert!(stats.rebuilt_geometry);
        assert_eq!(stats.sample, 0);

        let dispatch = pipeline.backend().dispatches.last().unwrap();
        assert!(dispatch.bound.iter().all(Option::is_some));
        assert_eq!(dispatch.params.mesh_object_count, 1);
        assert_eq!(dispatch.params.vertex_count, 3);
        assert_eq!(dispatch.params.index_count, 3);

        let stats = render(&mut pipeline, &view);
        assert!(!stats.rebuilt_geometry);
        assert_eq!(stats.sample, 1);

        // Removing the last object drops the mesh buffers again
        assert!(pipeline.unregister_object(id).is_some());
        render(&mut pipeline, &view);
        let dispatch = pipeline.backend().dispatches.last().unwrap();
        assert_eq!(dispatch.bound[1..], [None, None, None]);
    }

    #[test]
    fn test_unregister_unknown_keeps_accumulating() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let view = view((32, 32));
        render(&mut pipeline, &view);

        assert!(pipeline.unregister_object(ObjectId::next()).is_none());
        assert_eq!(render(&mut pipeline, &view).sample, 1);
    }

    #[test]
    fn test_object_transform_update_resets() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let view = view((32, 32));
        let id = pipeline.add_mesh(triangle(), Mat4::IDENTITY).unwrap();
        assert!(pipeline.watch_object(id));
        render(&mut pipeline, &view);
        render(&mut pipeline, &view);

        assert!(pipeline.update_object_transform(id, Mat4::from_translation(Vec3::Y)));
        let stats = render(&mut pipeline, &view);
        assert_eq!(stats.sample, 0);
        assert!(stats.rebuilt_geometry);

        assert!(!pipeline.update_object_transform(ObjectId::next(), Mat4::IDENTITY));
    }

    #[test]
    fn test_mesh_buffer_reused_when_shape_unchanged() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let view = view((32, 32));
        let id = pipeline.add_mesh(triangle(), Mat4::IDENTITY).unwrap();
        render(&mut pipeline, &view);
        let before = pipeline.backend().dispatches.last().unwrap().bound;

        pipeline.update_object_transform(id, Mat4::from_translation(Vec3::X));
        render(&mut pipeline, &view);
        let after = pipeline.backend().dispatches.last().unwrap().bound;

        assert_eq!(before, after);
    }

    #[test]
    fn test_apply_config_regenerates_only_when_needed() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let view = view((32, 32));
        render(&mut pipeline, &view);
        render(&mut pipeline, &view);
        let spheres = pipeline.spheres().to_vec();
        let sphere_buffer = pipeline.backend().dispatches[0].bound[0];

        // Kernel-only change: same spheres, same buffer, fresh accumulation
        let brighter = SceneConfig {
            global_illumination: 1.5,
            ..SceneConfig::default()
        };
        pipeline.apply_config(brighter).unwrap();
        let stats = render(&mut pipeline, &view);
        assert_eq!(stats.sample, 0);
        assert_eq!(pipeline.spheres(), spheres.as_slice());
        let dispatch = pipeline.backend().dispatches.last().unwrap();
        assert_eq!(dispatch.bound[0], sphere_buffer);
        assert_eq!(dispatch.params.global_illumination, 1.5);

        // Fewer spheres: regenerated into a new buffer
        let fewer = SceneConfig {
            spheres_max: 3,
            ..SceneConfig::default()
        };
        pipeline.apply_config(fewer).unwrap();
        render(&mut pipeline, &view);
        assert!(pipeline.spheres().len() <= 3);
        let dispatch = pipeline.backend().dispatches.last().unwrap();
        assert_ne!(dispatch.bound[0], sphere_buffer);
    }

    #[test]
    fn test_invalid_config_rejected_whole() {
        let mut pipeline = pipeline(HeadlessBackend::new());

        let bad = SceneConfig {
            reflections: 0,
            global_illumination: 1.2,
            ..SceneConfig::default()
        };
        assert!(pipeline.apply_config(bad.clone()).is_err());
        assert_eq!(pipeline.config(), &SceneConfig::default());

        assert!(RenderPipeline::new(HeadlessBackend::new(), bad).is_err());
    }

    #[test]
    fn test_skybox_change_rejected() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let view = view((16, 16));
        render(&mut pipeline, &view);

        let new_sky = SceneConfig {
            skybox: Some("skies/dusk.hdr".into()),
            global_illumination: 1.5,
            ..SceneConfig::default()
        };
        assert!(matches!(
            pipeline.apply_config(new_sky),
            Err(RenderError::SkyboxChanged { .. })
        ));
        assert_eq!(pipeline.config(), &SceneConfig::default());
        assert_eq!(render(&mut pipeline, &view).sample, 1);
    }

    #[test]
    fn test_zero_spheres_binds_nothing() {
        let config = SceneConfig {
            spheres_max: 0,
            ..SceneConfig::default()
        };
        let mut pipeline = RenderPipeline::new(HeadlessBackend::new(), config).unwrap();

        render(&mut pipeline, &view((16, 16)));

        let dispatch = &pipeline.backend().dispatches[0];
        assert_eq!(dispatch.bound, [None, None, None, None]);
        assert_eq!(dispatch.params.sphere_count, 0);
    }

    #[test]
    fn test_zero_size_output_skips_frame() {
        let mut pipeline = pipeline(HeadlessBackend::new());

        assert!(pipeline.render_frame(&view((0, 600))).unwrap().is_none());
        assert!(pipeline.backend().dispatches.is_empty());
        assert_eq!(pipeline.backend().images_created, 0);
    }

    #[test]
    fn test_jitter_changes_while_converging() {
        let mut pipeline = pipeline(HeadlessBackend::new());
        let view = view((16, 16));
        render(&mut pipeline, &view);
        render(&mut pipeline, &view);

        let dispatches = &pipeline.backend().dispatches;
        assert_ne!(dispatches[0].params.pixel_offset, dispatches[1].params.pixel_offset);
        assert_ne!(dispatches[0].params.seed, dispatches[1].params.seed);
    }

    #[test]
    fn test_gradient_sky_when_no_skybox() {
        let env = load_environment(&SceneConfig::default()).unwrap();
        assert_eq!((env.width, env.height), GRADIENT_SKY_SIZE);
    }

    #[test]
    fn test_missing_skybox_is_fatal() {
        let config = SceneConfig {
            skybox: Some("no/such/sky.hdr".into()),
            ..SceneConfig::default()
        };
        assert!(matches!(
            load_environment(&config),
            Err(crate::error::RenderError::Environment(_))
        ));
    }
}
