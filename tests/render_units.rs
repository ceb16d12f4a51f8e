use glam::{Vec2, Vec3};
use starling_engine::audio::AudioManager;
use starling_engine::camera::Camera2D;
use starling_engine::camera3d::{Camera3D, Projection};
use starling_engine::color::Color;
use starling_engine::config::WindowConfig;
use starling_engine::entity::{Entity, Services, Transform2D, Transform3D};
use starling_engine::input::Input;
use starling_engine::mesh::{Material, Shape, ShapeRender};
use starling_engine::renderer::Renderer;
use starling_engine::scene::Scene;
use starling_engine::sprite::Sprite;
use starling_engine::time::FrameClock;
use starling_engine::window::WindowCtl;

struct Host {
    renderer: Renderer,
    input: Input,
    clock: FrameClock,
    audio: AudioManager,
    window: WindowCtl,
}

impl Host {
    fn new() -> Self {
        let config = WindowConfig::default();
        Self {
            renderer: Renderer::new(&config),
            input: Input::new(),
            clock: FrameClock::new(),
            audio: AudioManager::new(),
            window: WindowCtl::new(&config),
        }
    }

    fn services(&mut self) -> Services<'_> {
        Services {
            gfx: &mut self.renderer,
            input: &mut self.input,
            clock: &self.clock,
            audio: &mut self.audio,
            window: &mut self.window,
        }
    }
}

fn camera3d() -> Camera3D {
    Camera3D::new(Vec3::new(5.0, 5.0, 5.0), Vec3::ZERO, Vec3::Y, 45.0, Projection::Perspective)
}

#[test]
fn sprite_draws_one_quad_through_its_2d_transform() {
    let mut host = Host::new();
    let texture = host.renderer.solid_texture(16, 16, Color::SKYBLUE);
    let mut scene = Scene::new();
    let mut entity = Entity::new().with_transform2d(Transform2D::at(Vec2::new(100.0, 100.0)));
    entity.attach(Sprite::new(texture));
    scene.add_entity(entity);

    host.renderer.begin_frame().expect("frame opens");
    host.renderer.begin_mode_2d(&Camera2D::default()).expect("2d scope opens");
    scene.render_2d(&mut host.services());
    host.renderer.end_mode_2d().expect("scope closes");
    assert_eq!(host.renderer.queued_vertices(), 6);
    host.renderer.end_frame(None).expect("frame closes");
}

#[test]
fn sprite_without_a_2d_transform_draws_nothing() {
    let mut host = Host::new();
    let texture = host.renderer.solid_texture(16, 16, Color::WHITE);
    let mut scene = Scene::new();
    let mut entity = Entity::new();
    entity.attach(Sprite::new(texture));
    scene.add_entity(entity);

    host.renderer.begin_frame().expect("frame opens");
    host.renderer.begin_mode_3d(&camera3d()).expect("3d scope opens");
    scene.render_all(&mut host.services());
    host.renderer.end_mode_3d().expect("scope closes");
    assert_eq!(host.renderer.queued_vertices(), 0);
    host.renderer.end_frame(None).expect("frame closes");
}

#[test]
fn unknown_texture_ids_are_rejected() {
    let mut host = Host::new();
    let texture = host.renderer.solid_texture(8, 8, Color::RED);
    assert!(host.renderer.unload_texture(texture.id));
    assert!(!host.renderer.unload_texture(texture.id));

    host.renderer.begin_frame().expect("frame opens");
    let result = host.renderer.draw_texture(&texture, 0.0, 0.0, Color::WHITE);
    assert!(result.is_err(), "stale tuple no longer resolves");
    host.renderer.end_frame(None).expect("frame closes");
}

#[test]
fn shape_render_draws_in_the_3d_pass() {
    let mut host = Host::new();
    let mut scene = Scene::new();
    let mut entity = Entity::new().with_transform(Transform3D::at(Vec3::ZERO));
    entity.attach(ShapeRender::new(Shape::Cube { size: Vec3::ONE }));
    scene.add_entity(entity);

    host.renderer.begin_frame().expect("frame opens");
    host.renderer.begin_mode_3d(&camera3d()).expect("3d scope opens");
    scene.render_all(&mut host.services());
    host.renderer.end_mode_3d().expect("scope closes");
    assert_eq!(host.renderer.queued_vertices(), 36);
    host.renderer.end_frame(None).expect("frame closes");
}

#[test]
fn shape_render_prefers_a_sibling_material() {
    // A material attached before the shape must win over the shape's own
    // tint; with no material the tint stands. Observable through the scene
    // passes not batching any differently, so assert via the unit API.
    let mut entity = Entity::new().with_transform(Transform3D::at(Vec3::ZERO));
    entity.attach(Material::new(Color::GOLD));
    entity.attach(ShapeRender::new(Shape::Sphere { radius: 1.0, rings: 4, slices: 4 }).with_tint(Color::RED));
    assert_eq!(entity.find_unit::<Material>().expect("attached").base_color, Color::GOLD);
    assert_eq!(entity.find_unit::<ShapeRender>().expect("attached").tint, Color::RED);
}
