use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use starling_engine::audio::AudioManager;
use starling_engine::config::WindowConfig;
use starling_engine::entity::{Behavior, DrawCtx, Entity, Services, Transform2D, Transform3D, UpdateCtx};
use starling_engine::input::Input;
use starling_engine::renderer::Renderer;
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

struct Tag {
    label: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Tag {
    fn new(label: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Self {
        Self { label, log: Rc::clone(log) }
    }
}

impl Behavior for Tag {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn update(&mut self, _ctx: &mut UpdateCtx<'_>) {
        self.log.borrow_mut().push(self.label);
    }

    fn draw(&mut self, _ctx: &mut DrawCtx<'_>) {
        self.log.borrow_mut().push(self.label);
    }
}

fn tagged_2d(label: &'static str, z_index: i32, log: &Rc<RefCell<Vec<&'static str>>>) -> Entity {
    let mut entity = Entity::new().with_transform2d(Transform2D::default().with_z_index(z_index));
    entity.attach(Tag::new(label, log));
    entity
}

#[test]
fn update_all_walks_entities_in_insertion_order() {
    let mut host = Host::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scene = starling_engine::scene::Scene::new();
    for label in ["one", "two", "three"] {
        let mut entity = Entity::new();
        entity.attach(Tag::new(label, &log));
        scene.add_entity(entity);
    }
    scene.update_all(0.016, &mut host.services());
    assert_eq!(*log.borrow(), vec!["one", "two", "three"]);
}

#[test]
fn render_2d_sorts_by_z_index_ascending() {
    let mut host = Host::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scene = starling_engine::scene::Scene::new();
    scene.add_entity(tagged_2d("front", 5, &log));
    scene.add_entity(tagged_2d("back", -5, &log));
    scene.add_entity(tagged_2d("middle", 0, &log));

    scene.render_2d(&mut host.services());
    assert_eq!(*log.borrow(), vec!["back", "middle", "front"]);
}

#[test]
fn render_2d_is_stable_under_z_ties() {
    // Every permutation of three tied entities around one outlier must keep
    // the tied entities in their insertion order.
    let orders: [[(&'static str, i32); 4]; 3] = [
        [("a", 1), ("b", 1), ("low", 0), ("c", 1)],
        [("low", 0), ("a", 1), ("b", 1), ("c", 1)],
        [("a", 1), ("b", 1), ("c", 1), ("low", 0)],
    ];
    for order in orders {
        let mut host = Host::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = starling_engine::scene::Scene::new();
        for (label, z) in order {
            scene.add_entity(tagged_2d(label, z, &log));
        }
        scene.render_2d(&mut host.services());
        let drawn = log.borrow().clone();
        assert_eq!(drawn[0], "low");
        assert_eq!(&drawn[1..], &["a", "b", "c"], "tied entities out of order for {order:?}");
    }
}

#[test]
fn render_all_skips_entities_owned_by_the_2d_pass() {
    let mut host = Host::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scene = starling_engine::scene::Scene::new();

    let mut solid = Entity::new().with_transform(Transform3D::at(Vec3::ZERO));
    solid.attach(Tag::new("solid", &log));
    scene.add_entity(solid);
    scene.add_entity(tagged_2d("sprite", 0, &log));
    let mut bare = Entity::new();
    bare.attach(Tag::new("bare", &log));
    scene.add_entity(bare);

    scene.render_all(&mut host.services());
    assert_eq!(*log.borrow(), vec!["solid", "bare"]);

    log.borrow_mut().clear();
    scene.render_2d(&mut host.services());
    assert_eq!(*log.borrow(), vec!["sprite"]);
}

#[test]
fn frame_and_scope_discipline_is_enforced() {
    let config = WindowConfig::default();
    let mut renderer = Renderer::new(&config);
    let camera2d = starling_engine::camera::Camera2D::default();

    // No frame open yet.
    assert!(renderer.begin_mode_2d(&camera2d).is_err());
    assert!(renderer.draw_rectangle(0.0, 0.0, 1.0, 1.0, starling_engine::color::Color::WHITE).is_err());

    renderer.begin_frame().expect("first frame opens");
    assert!(renderer.begin_frame().is_err(), "nested frames are rejected");

    renderer.begin_mode_2d(&camera2d).expect("2d scope opens");
    assert!(renderer.begin_mode_2d(&camera2d).is_err(), "one scope at a time");
    assert!(renderer.end_mode_3d().is_err(), "mismatched scope close");
    assert!(renderer.end_frame(None).is_err(), "frame cannot close over an open scope");
    renderer.end_mode_2d().expect("2d scope closes");

    renderer.end_frame(None).expect("headless frame submits");
    assert!(!renderer.frame_open());
}

#[test]
fn headless_frame_batches_and_discards() {
    let config = WindowConfig::default();
    let mut renderer = Renderer::new(&config);
    renderer.begin_frame().expect("frame opens");
    renderer.draw_rectangle(0.0, 0.0, 8.0, 8.0, starling_engine::color::Color::RED).expect("draws");
    assert_eq!(renderer.queued_vertices(), 6);
    renderer.end_frame(None).expect("frame closes");
    renderer.begin_frame().expect("next frame opens");
    assert_eq!(renderer.queued_vertices(), 0);
    renderer.end_frame(None).expect("frame closes");
}

#[test]
fn three_d_primitives_require_an_open_3d_scope() {
    let config = WindowConfig::default();
    let mut renderer = Renderer::new(&config);
    renderer.begin_frame().expect("frame opens");
    assert!(renderer.draw_cube(Vec3::ZERO, 1.0, 1.0, 1.0, starling_engine::color::Color::RED).is_err());
    let camera = starling_engine::camera3d::Camera3D::new(
        Vec3::new(5.0, 5.0, 5.0),
        Vec3::ZERO,
        Vec3::Y,
        45.0,
        starling_engine::camera3d::Projection::Perspective,
    );
    renderer.begin_mode_3d(&camera).expect("3d scope opens");
    renderer.draw_cube(Vec3::ZERO, 1.0, 1.0, 1.0, starling_engine::color::Color::RED).expect("draws");
    assert_eq!(renderer.queued_vertices(), 36);
    renderer.end_mode_3d().expect("3d scope closes");
    renderer.end_frame(None).expect("frame closes");
}

#[test]
fn zero_scale_suppresses_the_direct_model_path() {
    let mut host = Host::new();
    let mut scene = starling_engine::scene::Scene::new();

    let visible = Entity::new()
        .with_transform(Transform3D::at(Vec3::ZERO))
        .with_model(starling_engine::mesh::Model::cube(Vec3::ONE, starling_engine::color::Color::RED));
    let mut hidden_transform = Transform3D::at(Vec3::ZERO);
    hidden_transform.scale = Vec3::ZERO;
    let hidden = Entity::new()
        .with_transform(hidden_transform)
        .with_model(starling_engine::mesh::Model::cube(Vec3::ONE, starling_engine::color::Color::BLUE));
    scene.add_entity(visible);
    scene.add_entity(hidden);

    host.renderer.begin_frame().expect("frame opens");
    let camera = starling_engine::camera3d::Camera3D::new(
        Vec3::new(5.0, 5.0, 5.0),
        Vec3::ZERO,
        Vec3::Y,
        45.0,
        starling_engine::camera3d::Projection::Perspective,
    );
    host.renderer.begin_mode_3d(&camera).expect("3d scope opens");
    scene.render_all(&mut host.services());
    host.renderer.end_mode_3d().expect("scope closes");
    // Only the visible cube contributed vertices.
    assert_eq!(host.renderer.queued_vertices(), 36);
    host.renderer.end_frame(None).expect("frame closes");
}
