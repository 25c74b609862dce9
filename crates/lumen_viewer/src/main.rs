mod controller;
mod ui;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use lumen_core::{Mesh, SceneConfig, Transform};
use lumen_math::{Camera, Quat, Vec3};
use lumen_render::{load_environment, FrameView, OverlayFrame, RenderPipeline, WgpuBackend};
use winit::{
    application::ApplicationHandler,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use controller::FlyController;
use ui::{Overlay, OverlayStats};

/// Window-bound state, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    pipeline: RenderPipeline<WgpuBackend>,
    egui_state: egui_winit::State,
}

/// Application state
struct App {
    config: SceneConfig,
    gpu: Option<Gpu>,
    egui_ctx: egui::Context,
    camera: Camera,
    controller: FlyController,
    overlay: Overlay,
    stats: OverlayStats,
    last_frame_time: Instant,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        let overlay = Overlay::new(&config);
        Self {
            config,
            gpu: None,
            egui_ctx: egui::Context::default(),
            camera: Camera::new(Vec3::new(0.0, 45.0, 180.0), Vec3::new(0.0, 5.0, 0.0), 16.0 / 9.0),
            controller: FlyController::default(),
            overlay,
            stats: OverlayStats::default(),
            last_frame_time: Instant::now(),
            init_error: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let window_attrs = Window::default_attributes()
            .with_title("Lumen")
            .with_inner_size(winit::dpi::PhysicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let environment = load_environment(&self.config)?;
        let backend = pollster::block_on(WgpuBackend::new(window.clone(), &environment))?;
        let mut pipeline = RenderPipeline::new(backend, self.config.clone())?;

        let (width, height) = pipeline.backend().size();
        if width > 0 && height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }

        // A mirror cube and a floating panel next to the sphere field
        let cube = pipeline
            .add_mesh(
                Arc::new(Mesh::cube(16.0)),
                Transform::from_translation(Vec3::new(0.0, 8.0, 0.0))
                    .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4))
                    .to_matrix(),
            )
            .context("demo cube was rejected")?;
        pipeline
            .add_mesh(
                Arc::new(Mesh::quad(1.0)),
                Transform::from_translation(Vec3::new(0.0, 60.0, -60.0))
                    .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))
                    .with_uniform_scale(40.0)
                    .to_matrix(),
            )
            .context("demo panel was rejected")?;
        pipeline.watch_object(cube);

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Gpu {
            window,
            pipeline,
            egui_state,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let now = Instant::now();
        let delta_time = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.overlay.fps.update(delta_time);
        self.controller.update(&mut self.camera, delta_time);

        // Build the overlay for this frame
        let raw_input = gpu.egui_state.take_egui_input(&gpu.window);
        let overlay = &mut self.overlay;
        let stats = &self.stats;
        let mut requested = None;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            requested = overlay.show(ctx, stats);
        });
        gpu.egui_state
            .handle_platform_output(&gpu.window, full_output.platform_output);
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        gpu.pipeline.backend_mut().set_overlay(OverlayFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });

        if let Some(config) = requested {
            match gpu.pipeline.apply_config(config) {
                Ok(()) => self.config = gpu.pipeline.config().clone(),
                Err(e) => {
                    log::warn!("Rejected settings: {}", e);
                    self.overlay.sync(&self.config);
                }
            }
        }

        let view = FrameView {
            camera: self.camera,
            light: self.config.light.to_light(),
            resolution: gpu.pipeline.backend().size(),
        };

        match gpu.pipeline.render_frame(&view) {
            Ok(Some(frame)) => {
                self.stats = OverlayStats {
                    sample: frame.sample + 1,
                    spheres: gpu.pipeline.spheres().len(),
                    objects: gpu.pipeline.registry().len(),
                    resolution: view.resolution,
                };
            }
            Ok(None) => {}
            Err(e) => {
                if let Some(surface_err) = e.downcast_ref::<wgpu::SurfaceError>() {
                    match surface_err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            gpu.pipeline.backend_mut().reconfigure();
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            log::error!("Out of memory!");
                            event_loop.exit();
                        }
                        _ => {
                            log::error!("Surface error: {:?}", surface_err);
                        }
                    }
                } else {
                    log::error!("Render error: {:?}", e);
                }
            }
        }

        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                log::info!(
                    "Renderer initialized: {} spheres, {} mesh objects",
                    gpu.pipeline.spheres().len(),
                    gpu.pipeline.registry().len()
                );
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let Some(gpu) = &mut self.gpu {
            if gpu.egui_state.on_window_event(&gpu.window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                // Drop GPU resources before the window goes away
                self.gpu = None;
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.pipeline
                        .backend_mut()
                        .resize((physical_size.width, physical_size.height));
                }
                if physical_size.width > 0 && physical_size.height > 0 {
                    self.camera
                        .set_aspect(physical_size.width as f32 / physical_size.height as f32);
                }
                log::info!("Resized to {}x{}", physical_size.width, physical_size.height);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.controller.mouse_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.controller
                    .cursor_moved(&mut self.camera, (position.x, position.y));
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(keycode),
                    state,
                    repeat,
                    ..
                },
                ..
            } => {
                self.controller.key(keycode, state);

                if state.is_pressed() && !repeat {
                    match keycode {
                        KeyCode::KeyH => self.overlay.visible = !self.overlay.visible,
                        KeyCode::Escape => {
                            self.gpu = None;
                            event_loop.exit();
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Lumen");

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(&path)?,
        None => SceneConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
