use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use glam::{Mat4, Vec2, Vec3};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::camera::{screen_projection, Camera2D};
use crate::camera3d::Camera3D;
use crate::color::Color;
use crate::mesh::Shape;

mod font;
pub(crate) mod geometry;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Pixel format code reported in [`TextureInfo`]; only RGBA8 is produced.
pub const PIXELFORMAT_UNCOMPRESSED_R8G8B8A8: u32 = 7;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub pos: [f32; 4],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Flat description of a loaded texture. This is the whole handle: scripts
/// receive these five fields and must hand the same five back on every call
/// that consumes the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub mipmaps: u32,
    pub format: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawScope {
    /// Between begin/end frame but outside 2D/3D mode: y-down pixel space.
    Screen,
    Mode3D,
    Mode2D,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextureSlot {
    Font,
    Registry(u32),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BatchKey {
    Tris { depth: bool },
    Lines { depth: bool },
    Quads { slot: TextureSlot },
}

struct Batch {
    key: BatchKey,
    vertices: Vec<Vertex>,
}

struct TextureEntry {
    info: TextureInfo,
    pixels: Vec<u8>,
    bind_group: Option<wgpu::BindGroup>,
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    window: Arc<Window>,
    depth_view: wgpu::TextureView,
    tri_depth: wgpu::RenderPipeline,
    tri_flat: wgpu::RenderPipeline,
    line_depth: wgpu::RenderPipeline,
    line_flat: wgpu::RenderPipeline,
    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white_bg: wgpu::BindGroup,
    font_bg: wgpu::BindGroup,
    vertex_buf: Option<wgpu::Buffer>,
    vertex_capacity: usize,
}

/// The rendering device. All GPU state is optional: without a window every
/// draw call still validates scope discipline and batches vertices, which is
/// how the engine runs under tests and on CI.
pub struct Renderer {
    title: String,
    vsync: bool,
    size: PhysicalSize<u32>,
    gpu: Option<GpuState>,
    textures: HashMap<u32, TextureEntry>,
    next_texture_id: u32,
    frame_open: bool,
    scope: DrawScope,
    clear_color: Color,
    vp: Mat4,
    screen_vp: Mat4,
    batches: Vec<Batch>,
}

/// Everything the egui overlay pass needs from the caller.
pub struct OverlayPass<'a> {
    pub painter: &'a mut egui_wgpu::Renderer,
    pub paint_jobs: &'a [egui::ClippedPrimitive],
    pub screen: &'a egui_wgpu::ScreenDescriptor,
    pub textures_delta: &'a egui::TexturesDelta,
}

impl Renderer {
    pub fn new(config: &crate::config::WindowConfig) -> Self {
        let size = PhysicalSize::new(config.width.max(1), config.height.max(1));
        Self {
            title: config.title.clone(),
            vsync: config.vsync,
            size,
            gpu: None,
            textures: HashMap::new(),
            next_texture_id: 1,
            frame_open: false,
            scope: DrawScope::Screen,
            clear_color: Color::BLACK,
            vp: screen_projection(size),
            screen_vp: screen_projection(size),
            batches: Vec::new(),
        }
    }

    pub fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        if self.gpu.is_some() {
            return Ok(());
        }
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title(&self.title).with_inner_size(self.size))
                .context("Failed to create window")?,
        );
        let gpu = pollster::block_on(Self::init_gpu(window, self.size, self.vsync))?;
        self.gpu = Some(gpu);
        let ids: Vec<u32> = self.textures.keys().copied().collect();
        for id in ids {
            self.upload_texture(id);
        }
        Ok(())
    }

    fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
        formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(formats[0])
    }

    async fn init_gpu(window: Arc<Window>, size: PhysicalSize<u32>, vsync: bool) -> Result<GpuState> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone()).context("Failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| anyhow!("No compatible GPU adapter: {err}"))?;
        let required_limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
            })
            .await
            .context("Failed to acquire device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = Self::choose_surface_format(&caps.formats);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: if vsync { wgpu::PresentMode::Fifo } else { wgpu::PresentMode::AutoNoVsync },
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = Self::create_depth_view(&device, size);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Engine Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../assets/shaders/engine.wgsl").into()),
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture BGL"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Nearest Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white_bg = Self::make_texture_bind_group(
            &device,
            &queue,
            &texture_bgl,
            &sampler,
            &[255, 255, 255, 255],
            1,
            1,
            "White",
        );
        let font_pixels = font::build_atlas();
        let font_bg = Self::make_texture_bind_group(
            &device,
            &queue,
            &texture_bgl,
            &sampler,
            &font_pixels,
            font::ATLAS_WIDTH,
            font::ATLAS_HEIGHT,
            "Font Atlas",
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[&texture_bgl],
            push_constant_ranges: &[],
        });
        let make = |topology: wgpu::PrimitiveTopology, depth: bool, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute { shader_location: 0, format: wgpu::VertexFormat::Float32x4, offset: 0 },
                            wgpu::VertexAttribute { shader_location: 1, format: wgpu::VertexFormat::Float32x2, offset: 16 },
                            wgpu::VertexAttribute { shader_location: 2, format: wgpu::VertexFormat::Float32x4, offset: 24 },
                        ],
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState { topology, cull_mode: None, ..Default::default() },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth,
                    depth_compare: if depth { wgpu::CompareFunction::LessEqual } else { wgpu::CompareFunction::Always },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let tri_depth = make(wgpu::PrimitiveTopology::TriangleList, true, "Tri Depth");
        let tri_flat = make(wgpu::PrimitiveTopology::TriangleList, false, "Tri Flat");
        let line_depth = make(wgpu::PrimitiveTopology::LineList, true, "Line Depth");
        let line_flat = make(wgpu::PrimitiveTopology::LineList, false, "Line Flat");

        Ok(GpuState {
            surface,
            device,
            queue,
            config,
            window,
            depth_view,
            tri_depth,
            tri_flat,
            line_depth,
            line_flat,
            texture_bgl,
            sampler,
            white_bg,
            font_bg,
            vertex_buf: None,
            vertex_capacity: 0,
        })
    }

    fn create_depth_view(device: &wgpu::Device, size: PhysicalSize<u32>) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth"),
            size: wgpu::Extent3d { width: size.width.max(1), height: size.height.max(1), depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    #[allow(clippy::too_many_arguments)]
    fn make_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        pixels: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> wgpu::BindGroup {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(width * 4), rows_per_image: Some(height) },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        })
    }

    pub fn window(&self) -> Option<&Window> {
        self.gpu.as_ref().map(|gpu| gpu.window.as_ref())
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn surface_format(&self) -> Option<wgpu::TextureFormat> {
        self.gpu.as_ref().map(|gpu| gpu.config.format)
    }

    pub fn device(&self) -> Option<&wgpu::Device> {
        self.gpu.as_ref().map(|gpu| &gpu.device)
    }

    pub fn queue(&self) -> Option<&wgpu::Queue> {
        self.gpu.as_ref().map(|gpu| &gpu.queue)
    }

    pub fn pixels_per_point(&self) -> f32 {
        1.0
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.screen_vp = screen_projection(new_size);
        if let Some(gpu) = &mut self.gpu {
            gpu.config.width = new_size.width;
            gpu.config.height = new_size.height;
            gpu.surface.configure(&gpu.device, &gpu.config);
            gpu.depth_view = Self::create_depth_view(&gpu.device, new_size);
        }
    }

    // --- frame and scope discipline -------------------------------------

    pub fn frame_open(&self) -> bool {
        self.frame_open
    }

    pub fn scope(&self) -> DrawScope {
        self.scope
    }

    pub fn begin_frame(&mut self) -> Result<()> {
        if self.frame_open {
            bail!("begin_frame: previous frame is still open");
        }
        self.frame_open = true;
        self.scope = DrawScope::Screen;
        self.vp = self.screen_vp;
        self.batches.clear();
        Ok(())
    }

    pub fn clear_background(&mut self, color: Color) -> Result<()> {
        self.ensure_open()?;
        self.clear_color = color;
        Ok(())
    }

    pub fn begin_mode_3d(&mut self, camera: &Camera3D) -> Result<()> {
        self.ensure_open()?;
        if self.scope != DrawScope::Screen {
            bail!("begin_mode_3d: another drawing mode is already open");
        }
        self.scope = DrawScope::Mode3D;
        self.vp = camera.view_projection(self.size);
        Ok(())
    }

    pub fn end_mode_3d(&mut self) -> Result<()> {
        if self.scope != DrawScope::Mode3D {
            bail!("end_mode_3d: no 3D mode open");
        }
        self.scope = DrawScope::Screen;
        self.vp = self.screen_vp;
        Ok(())
    }

    pub fn begin_mode_2d(&mut self, camera: &Camera2D) -> Result<()> {
        self.ensure_open()?;
        if self.scope != DrawScope::Screen {
            bail!("begin_mode_2d: another drawing mode is already open");
        }
        self.scope = DrawScope::Mode2D;
        self.vp = camera.view_projection(self.size);
        Ok(())
    }

    pub fn end_mode_2d(&mut self) -> Result<()> {
        if self.scope != DrawScope::Mode2D {
            bail!("end_mode_2d: no 2D mode open");
        }
        self.scope = DrawScope::Screen;
        self.vp = self.screen_vp;
        Ok(())
    }

    pub fn end_frame(&mut self, overlay: Option<OverlayPass<'_>>) -> Result<()> {
        self.ensure_open()?;
        if self.scope != DrawScope::Screen {
            bail!("end_frame: a drawing mode is still open");
        }
        self.frame_open = false;
        self.flush(overlay)
    }

    /// Drops the current frame's state after a failed pass so the next
    /// `begin_frame` starts clean.
    pub fn abort_frame(&mut self) {
        self.frame_open = false;
        self.scope = DrawScope::Screen;
        self.vp = self.screen_vp;
        self.batches.clear();
    }

    fn ensure_open(&self) -> Result<()> {
        if !self.frame_open {
            bail!("no frame is open; call begin_frame first");
        }
        Ok(())
    }

    fn ensure_mode_3d(&self) -> Result<()> {
        self.ensure_open()?;
        if self.scope != DrawScope::Mode3D {
            bail!("this primitive requires an open 3D mode");
        }
        Ok(())
    }

    /// Vertices batched so far in the current frame.
    pub fn queued_vertices(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    fn batch_mut(&mut self, key: BatchKey) -> &mut Vec<Vertex> {
        let matches = self.batches.last().map_or(false, |b| b.key == key);
        if !matches {
            self.batches.push(Batch { key, vertices: Vec::new() });
        }
        &mut self.batches.last_mut().expect("batch exists").vertices
    }

    // --- 2D primitives ----------------------------------------------------

    pub fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<()> {
        self.ensure_open()?;
        let vp = self.vp;
        let buf = self.batch_mut(BatchKey::Tris { depth: false });
        geometry::solid_quad(buf, &vp, geometry::rect_corners(x, y, width, height), color);
        Ok(())
    }

    pub fn draw_rectangle_lines(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> Result<()> {
        self.ensure_open()?;
        let vp = self.vp;
        let buf = self.batch_mut(BatchKey::Lines { depth: false });
        geometry::rect_lines(buf, &vp, x, y, width, height, color);
        Ok(())
    }

    pub fn draw_circle(&mut self, center_x: f32, center_y: f32, radius: f32, color: Color) -> Result<()> {
        self.ensure_open()?;
        let vp = self.vp;
        let buf = self.batch_mut(BatchKey::Tris { depth: false });
        geometry::circle(buf, &vp, Vec2::new(center_x, center_y), radius, color);
        Ok(())
    }

    pub fn draw_circle_lines(&mut self, center_x: f32, center_y: f32, radius: f32, color: Color) -> Result<()> {
        self.ensure_open()?;
        let vp = self.vp;
        let buf = self.batch_mut(BatchKey::Lines { depth: false });
        geometry::circle_lines(buf, &vp, Vec2::new(center_x, center_y), radius, color);
        Ok(())
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) -> Result<()> {
        self.ensure_open()?;
        let vp = self.vp;
        let buf = self.batch_mut(BatchKey::Lines { depth: false });
        geometry::line(buf, &vp, Vec3::new(x1, y1, 0.0), Vec3::new(x2, y2, 0.0), color);
        Ok(())
    }

    pub fn draw_pixel(&mut self, x: f32, y: f32, color: Color) -> Result<()> {
        self.draw_rectangle(x, y, 1.0, 1.0, color)
    }

    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) -> Result<()> {
        self.ensure_open()?;
        let vp = self.vp;
        let glyph = font_size.max(1.0);
        let mut pen_x = x;
        let buf = self.batch_mut(BatchKey::Quads { slot: TextureSlot::Font });
        for c in text.chars() {
            if c != ' ' {
                let (col, row) = font::glyph_cell(c);
                let u0 = (col * font::GLYPH_SIZE) as f32 / font::ATLAS_WIDTH as f32;
                let v0 = (row * font::GLYPH_SIZE) as f32 / font::ATLAS_HEIGHT as f32;
                let du = font::GLYPH_SIZE as f32 / font::ATLAS_WIDTH as f32;
                let dv = font::GLYPH_SIZE as f32 / font::ATLAS_HEIGHT as f32;
                geometry::textured_quad(
                    buf,
                    &vp,
                    geometry::rect_corners(pen_x, y, glyph, glyph),
                    [
                        Vec2::new(u0, v0),
                        Vec2::new(u0 + du, v0),
                        Vec2::new(u0 + du, v0 + dv),
                        Vec2::new(u0, v0 + dv),
                    ],
                    color,
                );
            }
            pen_x += glyph;
        }
        Ok(())
    }

    // --- 3D primitives ----------------------------------------------------

    pub fn draw_mesh(&mut self, shape: &Shape, model: Mat4, color: Color) -> Result<()> {
        self.ensure_mode_3d()?;
        let mat = self.vp * model;
        match *shape {
            Shape::Cube { size } => {
                let buf = self.batch_mut(BatchKey::Tris { depth: true });
                geometry::cube(buf, &mat, size, color);
            }
            Shape::Sphere { radius, rings, slices } => {
                let buf = self.batch_mut(BatchKey::Tris { depth: true });
                geometry::sphere(buf, &mat, radius, rings, slices, color);
            }
        }
        Ok(())
    }

    pub fn draw_cube(&mut self, position: Vec3, width: f32, height: f32, length: f32, color: Color) -> Result<()> {
        self.draw_mesh(
            &Shape::Cube { size: Vec3::new(width, height, length) },
            Mat4::from_translation(position),
            color,
        )
    }

    pub fn draw_cube_wires(&mut self, position: Vec3, width: f32, height: f32, length: f32, color: Color) -> Result<()> {
        self.ensure_mode_3d()?;
        let mat = self.vp * Mat4::from_translation(position);
        let buf = self.batch_mut(BatchKey::Lines { depth: true });
        geometry::cube_wires(buf, &mat, Vec3::new(width, height, length), color);
        Ok(())
    }

    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Color) -> Result<()> {
        self.draw_mesh(&Shape::Sphere { radius, rings: 16, slices: 16 }, Mat4::from_translation(center), color)
    }

    pub fn draw_sphere_wires(&mut self, center: Vec3, radius: f32, rings: u32, slices: u32, color: Color) -> Result<()> {
        self.ensure_mode_3d()?;
        let mat = self.vp * Mat4::from_translation(center);
        let buf = self.batch_mut(BatchKey::Lines { depth: true });
        geometry::sphere_wires(buf, &mat, radius, rings, slices, color);
        Ok(())
    }

    pub fn draw_grid(&mut self, slices: i32, spacing: f32) -> Result<()> {
        self.ensure_mode_3d()?;
        let vp = self.vp;
        let buf = self.batch_mut(BatchKey::Lines { depth: true });
        geometry::grid(buf, &vp, slices.max(1), spacing);
        Ok(())
    }

    // --- textures ---------------------------------------------------------

    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureInfo> {
        let path = path.as_ref();
        let image = image::open(path).with_context(|| format!("Loading texture {}", path.display()))?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(self.register_texture(image.into_raw(), width, height))
    }

    /// Procedural single-color texture, handy for demos and tests.
    pub fn solid_texture(&mut self, width: u32, height: u32, color: Color) -> TextureInfo {
        let width = width.max(1);
        let height = height.max(1);
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        self.register_texture(pixels, width, height)
    }

    fn register_texture(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> TextureInfo {
        let id = self.next_texture_id;
        self.next_texture_id += 1;
        let info = TextureInfo { id, width, height, mipmaps: 1, format: PIXELFORMAT_UNCOMPRESSED_R8G8B8A8 };
        self.textures.insert(id, TextureEntry { info, pixels, bind_group: None });
        self.upload_texture(id);
        info
    }

    fn upload_texture(&mut self, id: u32) {
        let Some(gpu) = &self.gpu else { return };
        if let Some(entry) = self.textures.get_mut(&id) {
            entry.bind_group = Some(Self::make_texture_bind_group(
                &gpu.device,
                &gpu.queue,
                &gpu.texture_bgl,
                &gpu.sampler,
                &entry.pixels,
                entry.info.width,
                entry.info.height,
                "Registry Texture",
            ));
        }
    }

    pub fn unload_texture(&mut self, id: u32) -> bool {
        self.textures.remove(&id).is_some()
    }

    pub fn texture_info(&self, id: u32) -> Option<TextureInfo> {
        self.textures.get(&id).map(|entry| entry.info)
    }

    pub fn draw_texture(&mut self, texture: &TextureInfo, x: f32, y: f32, tint: Color) -> Result<()> {
        let source = Rect::new(0.0, 0.0, texture.width as f32, texture.height as f32);
        let dest = Rect::new(x, y, texture.width as f32, texture.height as f32);
        self.draw_texture_pro(texture, source, dest, Vec2::ZERO, 0.0, tint)
    }

    pub fn draw_texture_pro(
        &mut self,
        texture: &TextureInfo,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation_degrees: f32,
        tint: Color,
    ) -> Result<()> {
        self.ensure_open()?;
        if !self.textures.contains_key(&texture.id) {
            bail!("unknown texture id {}", texture.id);
        }
        let vp = self.vp;
        let (sin, cos) = rotation_degrees.to_radians().sin_cos();
        let rotate = |local: Vec2| {
            Vec3::new(dest.x + local.x * cos - local.y * sin, dest.y + local.x * sin + local.y * cos, 0.0)
        };
        let corners = [
            rotate(Vec2::new(-origin.x, -origin.y)),
            rotate(Vec2::new(dest.width - origin.x, -origin.y)),
            rotate(Vec2::new(dest.width - origin.x, dest.height - origin.y)),
            rotate(Vec2::new(-origin.x, dest.height - origin.y)),
        ];
        let tw = texture.width.max(1) as f32;
        let th = texture.height.max(1) as f32;
        let u0 = source.x / tw;
        let v0 = source.y / th;
        let u1 = (source.x + source.width) / tw;
        let v1 = (source.y + source.height) / th;
        let uvs = [Vec2::new(u0, v0), Vec2::new(u1, v0), Vec2::new(u1, v1), Vec2::new(u0, v1)];
        let buf = self.batch_mut(BatchKey::Quads { slot: TextureSlot::Registry(texture.id) });
        geometry::textured_quad(buf, &vp, corners, uvs, tint);
        Ok(())
    }

    // --- frame submission -------------------------------------------------

    fn ensure_vertex_capacity(&mut self, count: usize) {
        let Some(gpu) = &mut self.gpu else { return };
        if gpu.vertex_capacity >= count {
            return;
        }
        let mut new_cap = gpu.vertex_capacity.max(1024);
        while new_cap < count {
            new_cap *= 2;
        }
        gpu.vertex_buf = Some(gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Vertex Buffer"),
            size: (new_cap * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        gpu.vertex_capacity = new_cap;
    }

    fn flush(&mut self, overlay: Option<OverlayPass<'_>>) -> Result<()> {
        let batches = std::mem::take(&mut self.batches);
        if self.gpu.is_none() {
            return Ok(());
        }

        let total: usize = batches.iter().map(|b| b.vertices.len()).sum();
        self.ensure_vertex_capacity(total);
        let gpu = self.gpu.as_mut().expect("gpu present");
        if total > 0 {
            let mut staging: Vec<Vertex> = Vec::with_capacity(total);
            for batch in &batches {
                staging.extend_from_slice(&batch.vertices);
            }
            let buf = gpu.vertex_buf.as_ref().expect("vertex buffer allocated");
            gpu.queue.write_buffer(buf, 0, bytemuck::cast_slice(&staging));
        }

        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(err) => return Err(anyhow!("surface error: {err:?}")),
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Frame Encoder") });

        let clear = self.clear_color.to_linear();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r: clear[0], g: clear[1], b: clear[2], a: clear[3] }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut offset = 0u32;
            for batch in &batches {
                let count = batch.vertices.len() as u32;
                if count == 0 {
                    continue;
                }
                match batch.key {
                    BatchKey::Tris { depth } => {
                        pass.set_pipeline(if depth { &gpu.tri_depth } else { &gpu.tri_flat });
                        pass.set_bind_group(0, &gpu.white_bg, &[]);
                    }
                    BatchKey::Lines { depth } => {
                        pass.set_pipeline(if depth { &gpu.line_depth } else { &gpu.line_flat });
                        pass.set_bind_group(0, &gpu.white_bg, &[]);
                    }
                    BatchKey::Quads { slot } => {
                        pass.set_pipeline(&gpu.tri_flat);
                        let bg = match slot {
                            TextureSlot::Font => &gpu.font_bg,
                            TextureSlot::Registry(id) => self
                                .textures
                                .get(&id)
                                .and_then(|entry| entry.bind_group.as_ref())
                                .unwrap_or(&gpu.white_bg),
                        };
                        pass.set_bind_group(0, bg, &[]);
                    }
                }
                let buf = gpu.vertex_buf.as_ref().expect("vertex buffer allocated");
                pass.set_vertex_buffer(0, buf.slice(..));
                pass.draw(offset..offset + count, 0..1);
                offset += count;
            }
        }

        let mut command_buffers = Vec::new();
        if let Some(overlay) = overlay {
            for (id, delta) in &overlay.textures_delta.set {
                overlay.painter.update_texture(&gpu.device, &gpu.queue, *id, delta);
            }
            let mut extra = overlay.painter.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                overlay.paint_jobs,
                overlay.screen,
            );
            command_buffers.append(&mut extra);
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
                let pass = unsafe {
                    std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(&mut pass)
                };
                overlay.painter.render(pass, overlay.paint_jobs, overlay.screen);
            }
            for id in &overlay.textures_delta.free {
                overlay.painter.free_texture(id);
            }
        }

        command_buffers.push(encoder.finish());
        gpu.queue.submit(command_buffers);
        frame.present();
        Ok(())
    }
}
