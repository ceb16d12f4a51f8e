use anyhow::{Context as _, Result};
use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};

use egui::Context as EguiCtx;
use egui_wgpu::{Renderer as EguiRenderer, RendererOptions, ScreenDescriptor};
use egui_winit::State as EguiWinit;

use crate::audio::AudioManager;
use crate::camera::Camera2D;
use crate::camera3d::{Camera3D, CameraMode, Projection};
use crate::color::Color;
use crate::config::AppConfig;
use crate::entity::{Entity, Services, Transform2D, Transform3D};
use crate::input::{Input, InputEvent, KEY_F1};
use crate::mesh::{Material, Model, Shape, ShapeRender, Spin};
use crate::overlay::GuiPanel;
use crate::renderer::{OverlayPass, Renderer};
use crate::scene::Scene;
use crate::script::ScriptBridge;
use crate::sprite::Sprite;
use crate::time::FrameClock;
use crate::window::WindowCtl;

pub fn run() -> Result<()> {
    let config = AppConfig::load_or_default("config/app.json");
    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

pub struct App {
    config: AppConfig,
    renderer: Renderer,
    scene: Scene,
    input: Input,
    clock: FrameClock,
    audio: AudioManager,
    window_ctl: WindowCtl,
    camera: Camera3D,
    camera2d: Camera2D,
    egui_ctx: EguiCtx,
    egui_winit: Option<EguiWinit>,
    egui_renderer: Option<EguiRenderer>,
    egui_screen: Option<ScreenDescriptor>,
    scene_ready: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let renderer = Renderer::new(&config.window);
        let window_ctl = WindowCtl::new(&config.window);
        let camera = Camera3D::new(
            Vec3::from_array(config.camera.position),
            Vec3::from_array(config.camera.target),
            Vec3::Y,
            config.camera.fov_y_degrees,
            Projection::Perspective,
        );
        Self {
            config,
            renderer,
            scene: Scene::new(),
            input: Input::new(),
            clock: FrameClock::new(),
            audio: AudioManager::new(),
            window_ctl,
            camera,
            camera2d: Camera2D::default(),
            egui_ctx: EguiCtx::default(),
            egui_winit: None,
            egui_renderer: None,
            egui_screen: None,
            scene_ready: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn setup_scene(&mut self) {
        let mut cube = Entity::new()
            .with_transform(Transform3D::at(Vec3::ZERO))
            .with_model(Model::cube(Vec3::splat(2.0), Color::RED));
        cube.attach(Spin::new(40.0));
        self.scene.add_entity(cube);

        let mut sphere = Entity::new().with_transform(Transform3D::at(Vec3::new(3.5, 1.0, 0.0)));
        sphere.attach(Material::new(Color::GOLD));
        sphere.attach(ShapeRender::new(Shape::Sphere { radius: 1.0, rings: 16, slices: 16 }));
        self.scene.add_entity(sphere);

        let badge = self.renderer.solid_texture(24, 24, Color::SKYBLUE);
        let mut sprite = Entity::new()
            .with_transform2d(Transform2D::at(glam::Vec2::new(48.0, 120.0)).with_z_index(5));
        sprite.attach(Sprite::new(badge));
        self.scene.add_entity(sprite);

        for (index, path) in self.config.scripts.clone().iter().enumerate() {
            let mut scripted = Entity::new()
                .with_transform2d(Transform2D::default().with_z_index(10 + index as i32));
            scripted.attach(ScriptBridge::new(path));
            self.scene.add_entity(scripted);
        }

        let mut diagnostics = Entity::new();
        diagnostics.attach(
            GuiPanel::new("Diagnostics", KEY_F1)
                .opened()
                .with_contents(|ui, stats| {
                    ui.label(format!("{} fps, {:.1}s up", stats.fps, stats.elapsed));
                    GuiPanel::plot_line(ui, "ms/frame", &stats.frame_ms);
                }),
        );
        self.scene.add_entity(diagnostics);
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        self.camera.update(CameraMode::Orbital, dt, &self.input);
        {
            let mut services = Services {
                gfx: &mut self.renderer,
                input: &mut self.input,
                clock: &self.clock,
                audio: &mut self.audio,
                window: &mut self.window_ctl,
            };
            self.scene.update_all(dt, &mut services);
        }
        if let Err(err) = self.render_frame() {
            eprintln!("[render] {err:#}");
            self.renderer.abort_frame();
        }
        self.input.clear_frame();
        self.clock.pace(self.window_ctl.target_fps);
        if self.window_ctl.should_close {
            event_loop.exit();
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        if self.renderer.window().is_none() {
            return Ok(());
        }
        self.renderer.begin_frame()?;
        self.renderer.clear_background(Color::BLACK)?;

        self.renderer.begin_mode_3d(&self.camera)?;
        {
            let mut services = Services {
                gfx: &mut self.renderer,
                input: &mut self.input,
                clock: &self.clock,
                audio: &mut self.audio,
                window: &mut self.window_ctl,
            };
            services.gfx.draw_grid(16, 1.0)?;
            self.scene.render_all(&mut services);
        }
        self.renderer.end_mode_3d()?;

        self.renderer.begin_mode_2d(&self.camera2d)?;
        {
            let mut services = Services {
                gfx: &mut self.renderer,
                input: &mut self.input,
                clock: &self.clock,
                audio: &mut self.audio,
                window: &mut self.window_ctl,
            };
            self.scene.render_2d(&mut services);
        }
        self.renderer.end_mode_2d()?;

        match self.run_overlay() {
            Some((meshes, textures_delta, screen)) => {
                let painter = self.egui_renderer.as_mut().expect("overlay ran, painter exists");
                self.renderer.end_frame(Some(OverlayPass {
                    painter,
                    paint_jobs: &meshes,
                    screen: &screen,
                    textures_delta: &textures_delta,
                }))
            }
            None => self.renderer.end_frame(None),
        }
    }

    fn run_overlay(&mut self) -> Option<(Vec<egui::ClippedPrimitive>, egui::TexturesDelta, ScreenDescriptor)> {
        if self.egui_renderer.is_none() {
            return None;
        }
        let screen = self.egui_screen.as_ref().map(|s| ScreenDescriptor {
            size_in_pixels: s.size_in_pixels,
            pixels_per_point: s.pixels_per_point,
        })?;
        let raw_input = {
            let window = self.renderer.window()?;
            self.egui_winit.as_mut()?.take_egui_input(window)
        };
        let ctx = self.egui_ctx.clone();
        let scene = &mut self.scene;
        let full_output = ctx.run(raw_input, |ui_ctx| scene.overlay(ui_ctx));
        let egui::FullOutput { platform_output, textures_delta, shapes, .. } = full_output;
        if let (Some(window), Some(state)) = (self.renderer.window(), self.egui_winit.as_mut()) {
            state.handle_platform_output(window, platform_output);
        }
        let meshes = ctx.tessellate(shapes, screen.pixels_per_point);
        Some((meshes, textures_delta, screen))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.renderer.ensure_window(event_loop) {
            eprintln!("[render] {err:#}");
            event_loop.exit();
            return;
        }

        if self.egui_winit.is_none() {
            if let Some(window) = self.renderer.window() {
                let state = EguiWinit::new(
                    self.egui_ctx.clone(),
                    egui::ViewportId::ROOT,
                    window,
                    Some(self.renderer.pixels_per_point()),
                    window.theme(),
                    None,
                );
                self.egui_winit = Some(state);
            }
        }
        if self.egui_renderer.is_none() {
            if let (Some(device), Some(format)) = (self.renderer.device(), self.renderer.surface_format()) {
                self.egui_renderer = Some(EguiRenderer::new(device, format, RendererOptions::default()));
            }
        }
        let size = self.renderer.size();
        self.egui_screen = Some(ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.renderer.pixels_per_point(),
        });

        if !self.scene_ready {
            self.setup_scene();
            self.scene_ready = true;
        }
    }

    fn window_event(&mut self, _el: &ActiveEventLoop, id: winit::window::WindowId, event: WindowEvent) {
        // The overlay gets first refusal on events.
        let mut consumed = false;
        let input_event = InputEvent::from_window_event(&event);
        let is_cursor_event = matches!(&input_event, InputEvent::CursorPos { .. });
        if let (Some(window), Some(state)) = (self.renderer.window(), self.egui_winit.as_mut()) {
            if id == window.id() {
                let response = state.on_window_event(window, &event);
                consumed = response.consumed;
            }
        }
        if !consumed || is_cursor_event {
            self.input.push(input_event);
        }
        if consumed {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.window_ctl.request_close(),
            WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
                self.window_ctl.width = size.width;
                self.window_ctl.height = size.height;
                if let Some(screen) = &mut self.egui_screen {
                    screen.size_in_pixels = [size.width, size.height];
                    screen.pixels_per_point = self.renderer.pixels_per_point();
                }
            }
            WindowEvent::KeyboardInput { event: KeyEvent { logical_key, state, .. }, .. } => {
                if let Key::Named(NamedKey::Escape) = logical_key {
                    if *state == ElementState::Pressed {
                        self.window_ctl.request_close();
                    }
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _el: &ActiveEventLoop, _device: winit::event::DeviceId, event: DeviceEvent) {
        self.input.push(InputEvent::from_device_event(&event));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_ctl.should_close {
            event_loop.exit();
            return;
        }
        self.frame(event_loop);
    }
}
