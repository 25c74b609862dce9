//! wgpu implementation of `RenderBackend`.
//!
//! Work for a frame is recorded into one command encoder: the trace
//! dispatch, the blend pass, the present blit and the egui overlay. The
//! encoder is submitted when the frame is presented, so the host never
//! waits on the device between stages.

use std::cell::{Cell, OnceCell};
use std::sync::Arc;

use anyhow::Result;
use lumen_core::EnvironmentMap;
use wgpu::util::DeviceExt;
use wgpu::{Device, Instance, Queue, Surface, SurfaceConfiguration};

use crate::accumulator::{blend_weight, dispatch_size};
use crate::backend::{ImageRole, KernelBindings, RenderBackend};
use crate::params::FrameParams;

const TRACE_WGSL: &str = include_str!("shaders/trace.wgsl");
const ACCUMULATE_WGSL: &str = include_str!("shaders/accumulate.wgsl");
const PRESENT_WGSL: &str = include_str!("shaders/present.wgsl");

/// Format of the per-frame kernel output.
const RAW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Format of the running average. Half floats would round small updates
/// away once the sample count grows.
const CONVERGED_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Bound in place of absent storage buffers; large enough for one element
/// of any kernel buffer.
const PLACEHOLDER_SIZE: u64 = 80;

struct Plane {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Plane {
    fn new(texture: wgpu::Texture) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// A GPU image.
///
/// Converged images own two planes: each blend reads the front plane,
/// writes the back one and flips, so `front` always holds the latest mean.
pub struct GpuImage {
    planes: Vec<Plane>,
    front: Cell<usize>,
}

impl GpuImage {
    fn new(
        device: &Device,
        label: &str,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        size: (u32, u32),
        plane_count: usize,
    ) -> Self {
        let planes = (0..plane_count.max(1))
            .map(|_| {
                Plane::new(device.create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: size.0,
                        height: size.1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage,
                    view_formats: &[],
                }))
            })
            .collect();
        Self {
            planes,
            front: Cell::new(0),
        }
    }

    fn from_texture(texture: wgpu::Texture) -> Self {
        Self {
            planes: vec![Plane::new(texture)],
            front: Cell::new(0),
        }
    }

    fn front(&self) -> &Plane {
        &self.planes[self.front.get()]
    }

    fn back(&self) -> &Plane {
        &self.planes[(self.front.get() + 1) % self.planes.len()]
    }

    fn flip(&self) {
        self.front.set((self.front.get() + 1) % self.planes.len());
    }

    fn view(&self) -> &wgpu::TextureView {
        &self.front().view
    }

    pub fn width(&self) -> u32 {
        self.front().texture.width()
    }

    pub fn height(&self) -> u32 {
        self.front().texture.height()
    }
}

/// Tessellated egui output to draw over the next presented frame.
pub struct OverlayFrame {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Blend kernel, built on first use.
struct BlendPass {
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
    params: wgpu::Buffer,
}

impl BlendPass {
    fn new(device: &Device) -> Self {
        log::debug!("Creating blend pipeline");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Accumulate Shader"),
            source: wgpu::ShaderSource::Wgsl(ACCUMULATE_WGSL.into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Accumulate Bind Group Layout"),
            entries: &[
                texture_entry(0, wgpu::ShaderStages::COMPUTE),
                texture_entry(1, wgpu::ShaderStages::COMPUTE),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: CONVERGED_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Accumulate Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Accumulate Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "main",
            compilation_options: Default::default(),
            cache: None,
        });

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Accumulate Params Buffer"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            layout,
            params,
        }
    }
}

fn texture_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
        },
        count: None,
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// The buffer, or the placeholder when it is absent.
fn storage_binding<'a>(
    buffer: Option<&'a wgpu::Buffer>,
    placeholder: &'a wgpu::Buffer,
) -> wgpu::BindingResource<'a> {
    buffer.unwrap_or(placeholder).as_entire_binding()
}


/// The frame's command encoder, created on first use.
fn frame_encoder<'a>(
    device: &Device,
    slot: &'a mut Option<wgpu::CommandEncoder>,
) -> &'a mut wgpu::CommandEncoder {
    slot.get_or_insert_with(|| {
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        })
    })
}

/// Window-backed wgpu renderer.
pub struct WgpuBackend {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    size: (u32, u32),

    trace_pipeline: wgpu::ComputePipeline,
    trace_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    placeholder: wgpu::Buffer,
    environment: GpuImage,

    blend: OnceCell<BlendPass>,

    present_pipeline: wgpu::RenderPipeline,
    present_layout: wgpu::BindGroupLayout,

    egui_renderer: egui_wgpu::Renderer,
    overlay: Option<OverlayFrame>,

    encoder: Option<wgpu::CommandEncoder>,
}

impl WgpuBackend {
    /// Create the device, the surface and every pipeline, and upload the
    /// environment map.
    pub async fn new(
        window: Arc<winit::window::Window>,
        environment: &EnvironmentMap,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Lumen Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Environment map
        let max_dim = device.limits().max_texture_dimension_2d;
        if environment.width > max_dim || environment.height > max_dim {
            anyhow::bail!(
                "Environment map {} is {}x{}, larger than the device limit {}",
                environment.source,
                environment.width,
                environment.height,
                max_dim
            );
        }
        let env_texture = device.create_texture_with_data(
            &queue,
            &wgpu::TextureDescriptor {
                label: Some("Environment Texture"),
                size: wgpu::Extent3d {
                    width: environment.width,
                    height: environment.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba32Float,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            environment.as_bytes(),
        );
        let environment = GpuImage::from_texture(env_texture);

        // Trace kernel
        let trace_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Trace Shader"),
            source: wgpu::ShaderSource::Wgsl(TRACE_WGSL.into()),
        });

        let trace_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Trace Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage_entry(1),
                storage_entry(2),
                storage_entry(3),
                storage_entry(4),
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: RAW_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                texture_entry(6, wgpu::ShaderStages::COMPUTE),
            ],
        });

        let trace_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trace Pipeline Layout"),
            bind_group_layouts: &[&trace_layout],
            push_constant_ranges: &[],
        });

        let trace_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Trace Pipeline"),
            layout: Some(&trace_pipeline_layout),
            module: &trace_shader,
            entry_point: "main",
            compilation_options: Default::default(),
            cache: None,
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Params Buffer"),
            size: std::mem::size_of::<FrameParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let placeholder = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Placeholder Buffer"),
            contents: &[0u8; PLACEHOLDER_SIZE as usize],
            usage: wgpu::BufferUsages::STORAGE,
        });

        // Present blit
        let present_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Present Shader"),
            source: wgpu::ShaderSource::Wgsl(PRESENT_WGSL.into()),
        });

        let present_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Present Bind Group Layout"),
            entries: &[texture_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });

        let present_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Present Pipeline Layout"),
                bind_group_layouts: &[&present_layout],
                push_constant_ranges: &[],
            });

        let present_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Present Pipeline"),
            layout: Some(&present_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &present_shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &present_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1, false);

        log::info!(
            "GPU backend initialized ({}x{}, surface {:?})",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size: (size.width, size.height),
            trace_pipeline,
            trace_layout,
            params_buffer,
            placeholder,
            environment,
            blend: OnceCell::new(),
            present_pipeline,
            present_layout,
            egui_renderer,
            overlay: None,
            encoder: None,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 > 0 && new_size.1 > 0 {
            self.size = new_size;
            self.config.width = new_size.0;
            self.config.height = new_size.1;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface at its current size (after `SurfaceError::Lost`).
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Draw `overlay` on top of the next presented frame.
    pub fn set_overlay(&mut self, overlay: OverlayFrame) {
        self.overlay = Some(overlay);
    }

    fn submit(&mut self, extra: Vec<wgpu::CommandBuffer>) {
        let encoder = self.encoder.take();
        self.queue.submit(
            extra
                .into_iter()
                .chain(encoder.map(wgpu::CommandEncoder::finish)),
        );
    }

    fn draw_overlay(
        &mut self,
        target: &wgpu::TextureView,
        overlay: OverlayFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: overlay.pixels_per_point,
        };

        for (id, image_delta) in &overlay.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let encoder = frame_encoder(&self.device, &mut self.encoder);
        let user_buffers = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            encoder,
            &overlay.paint_jobs,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut egui_pass, &overlay.paint_jobs, &screen_descriptor);
        }

        for id in &overlay.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        user_buffers
    }
}

impl RenderBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Image = GpuImage;

    fn create_buffer(&mut self, label: &str, size: u64) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write_buffer(&mut self, buffer: &wgpu::Buffer, data: &[u8]) {
        self.queue.write_buffer(buffer, 0, data);
    }

    fn create_image(&mut self, role: ImageRole, width: u32, height: u32) -> GpuImage {
        match role {
            ImageRole::Raw => GpuImage::new(
                &self.device,
                "Raw Frame",
                RAW_FORMAT,
                wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
                (width, height),
                1,
            ),
            ImageRole::Converged => GpuImage::new(
                &self.device,
                "Converged Frame",
                CONVERGED_FORMAT,
                wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
                (width, height),
                2,
            ),
        }
    }

    fn dispatch(
        &mut self,
        bindings: &KernelBindings<'_, wgpu::Buffer>,
        target: &GpuImage,
        groups: [u32; 3],
    ) {
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&bindings.params));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Trace Bind Group"),
            layout: &self.trace_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: storage_binding(bindings.spheres, &self.placeholder),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: storage_binding(bindings.mesh_objects, &self.placeholder),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: storage_binding(bindings.vertices, &self.placeholder),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: storage_binding(bindings.indices, &self.placeholder),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::TextureView(target.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: wgpu::BindingResource::TextureView(self.environment.view()),
                },
            ],
        });

        let encoder = frame_encoder(&self.device, &mut self.encoder);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Trace Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.trace_pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(groups[0], groups[1], groups[2]);
    }

    fn blend(&mut self, raw: &GpuImage, converged: &GpuImage, sample: u32) {
        let blend = self.blend.get_or_init(|| BlendPass::new(&self.device));

        let weight = [blend_weight(sample), 0.0, 0.0, 0.0];
        self.queue
            .write_buffer(&blend.params, 0, bytemuck::cast_slice(&weight));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Accumulate Bind Group"),
            layout: &blend.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(raw.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&converged.front().view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&converged.back().view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: blend.params.as_entire_binding(),
                },
            ],
        });

        let groups = dispatch_size(converged.width(), converged.height());
        let encoder = frame_encoder(&self.device, &mut self.encoder);
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Accumulate Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&blend.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups[0], groups[1], groups[2]);
        }
        converged.flip();
    }

    fn present(&mut self, converged: &GpuImage) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                // Keep the traced sample even if this frame cannot be shown
                self.submit(Vec::new());
                return Err(e.into());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Present Bind Group"),
            layout: &self.present_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(converged.view()),
            }],
        });

        {
            let encoder = frame_encoder(&self.device, &mut self.encoder);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.present_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        let extra = match self.overlay.take() {
            Some(overlay) => self.draw_overlay(&view, overlay),
            None => Vec::new(),
        };

        self.submit(extra);
        output.present();

        Ok(())
    }
}
