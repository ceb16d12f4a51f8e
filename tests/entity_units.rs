use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use starling_engine::audio::AudioManager;
use starling_engine::config::WindowConfig;
use starling_engine::entity::{Behavior, DrawCtx, Entity, EntityId, Services, UpdateCtx};
use starling_engine::input::Input;
use starling_engine::mesh::{Material, Spin};
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

#[derive(Clone)]
struct Probe {
    label: &'static str,
    owner: Option<EntityId>,
    log: Rc<RefCell<Vec<String>>>,
}

impl Probe {
    fn new(label: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self { label, owner: None, log: Rc::clone(log) }
    }
}

impl Behavior for Probe {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn attached(&mut self, owner: EntityId) {
        self.owner = Some(owner);
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        self.log.borrow_mut().push(format!("update:{}:{}", self.label, ctx.dt));
    }

    fn draw(&mut self, _ctx: &mut DrawCtx<'_>) {
        self.log.borrow_mut().push(format!("draw:{}", self.label));
    }
}

#[test]
fn find_unit_returns_first_match_in_attachment_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut entity = Entity::new();
    entity.attach(Spin::new(10.0));
    entity.attach(Probe::new("first", &log));
    entity.attach(Probe::new("second", &log));
    entity.attach(Material::new(starling_engine::color::Color::RED));

    let found = entity.find_unit::<Probe>().expect("a probe is attached");
    assert_eq!(found.label, "first");
    assert!(entity.find_unit::<Spin>().is_some());
    assert!(entity.find_unit::<starling_engine::overlay::GuiPanel>().is_none());
}

#[test]
fn find_unit_is_independent_of_non_matching_neighbours() {
    let log = Rc::new(RefCell::new(Vec::new()));
    // Same lookup, different amounts of unrelated units around the target.
    for padding in 0..4 {
        let mut entity = Entity::new();
        for _ in 0..padding {
            entity.attach(Spin::new(1.0));
        }
        entity.attach(Probe::new("target", &log));
        for _ in 0..padding {
            entity.attach(Spin::new(2.0));
        }
        assert_eq!(entity.find_unit::<Probe>().expect("present").label, "target");
    }
}

#[test]
fn attach_returns_a_live_reference() {
    let mut entity = Entity::new();
    let spin = entity.attach(Spin::new(10.0));
    spin.degrees_per_second = 99.0;
    assert_eq!(entity.find_unit::<Spin>().expect("present").degrees_per_second, 99.0);
}

#[test]
fn attached_sets_the_owner_back_reference_once() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut entity = Entity::new();
    let id = entity.id();
    let probe = entity.attach(Probe::new("p", &log));
    assert_eq!(probe.owner, Some(id));
}

#[test]
fn update_all_visits_every_unit_once_in_attachment_order() {
    let mut host = Host::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut entity = Entity::new();
    entity.attach(Probe::new("a", &log));
    entity.attach(Probe::new("b", &log));
    entity.attach(Probe::new("c", &log));

    entity.update_all(0.25, &mut host.services());
    assert_eq!(*log.borrow(), vec!["update:a:0.25", "update:b:0.25", "update:c:0.25"]);

    log.borrow_mut().clear();
    entity.update_all(0.5, &mut host.services());
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn draw_all_visits_every_unit_in_attachment_order() {
    let mut host = Host::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut entity = Entity::new();
    entity.attach(Probe::new("a", &log));
    entity.attach(Probe::new("b", &log));

    entity.draw_all(&mut host.services());
    assert_eq!(*log.borrow(), vec!["draw:a", "draw:b"]);
}
