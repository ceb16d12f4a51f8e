use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::audio::AudioManager;
use crate::input::Input;
use crate::mesh::Model;
use crate::renderer::Renderer;
use crate::time::FrameClock;
use crate::window::WindowCtl;

pub type EntityId = u64;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// 3D placement: position, axis-angle rotation (degrees) and non-uniform
/// scale. A zero scale is the "invisible" sentinel for the direct render
/// path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    pub rotation_axis: Vec3,
    pub rotation_angle: f32,
    pub scale: Vec3,
}

impl Transform3D {
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_translation(self.position)
            * glam::Mat4::from_axis_angle(self.rotation_axis.normalize_or_zero(), self.rotation_angle.to_radians())
            * glam::Mat4::from_scale(self.scale)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation_axis: Vec3::Y, rotation_angle: 0.0, scale: Vec3::ONE }
    }
}

/// 2D placement plus the z-index that orders the 2D render pass
/// (lower draws first, higher occludes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub z_index: i32,
}

impl Transform2D {
    pub fn at(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self { position: Vec2::ZERO, rotation: 0.0, scale: Vec2::ONE, z_index: 0 }
    }
}

/// The engine services a behaviour unit may touch during a frame.
pub struct Services<'a> {
    pub gfx: &'a mut Renderer,
    pub input: &'a mut Input,
    pub clock: &'a FrameClock,
    pub audio: &'a mut AudioManager,
    pub window: &'a mut WindowCtl,
}

/// Per-unit view of the update pass. Transforms are mutable so behaviours
/// can move their entity.
pub struct UpdateCtx<'a> {
    pub dt: f32,
    pub gfx: &'a mut Renderer,
    pub input: &'a mut Input,
    pub clock: &'a FrameClock,
    pub audio: &'a mut AudioManager,
    pub window: &'a mut WindowCtl,
    pub transform: &'a mut Option<Transform3D>,
    pub transform2d: &'a mut Option<Transform2D>,
}

/// Per-unit view of a render pass. `peers` are the entity's other units,
/// for sibling lookups (a shape render consulting a material, say).
pub struct DrawCtx<'a> {
    pub gfx: &'a mut Renderer,
    pub input: &'a mut Input,
    pub clock: &'a FrameClock,
    pub audio: &'a mut AudioManager,
    pub window: &'a mut WindowCtl,
    pub transform: Option<&'a Transform3D>,
    pub transform2d: Option<&'a Transform2D>,
    pub peers: PeerView<'a>,
}

/// The sibling units of the one currently being drawn, in attachment order.
pub struct PeerView<'a> {
    before: &'a [Box<dyn Behavior>],
    after: &'a [Box<dyn Behavior>],
}

impl<'a> PeerView<'a> {
    pub fn empty() -> Self {
        Self { before: &[], after: &[] }
    }

    /// First sibling of the requested concrete type, in attachment order.
    pub fn find<B: Behavior>(&self) -> Option<&B> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(|unit| unit.as_any().downcast_ref::<B>())
    }
}

/// A composable unit of per-frame behaviour. Both hooks default to no-ops so
/// a concrete unit implements only what it needs; `overlay` additionally
/// runs during the debug-GUI pass.
pub trait Behavior: 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Called exactly once, when the unit is attached to its owner.
    fn attached(&mut self, _owner: EntityId) {}

    fn update(&mut self, _ctx: &mut UpdateCtx<'_>) {}

    fn draw(&mut self, _ctx: &mut DrawCtx<'_>) {}

    fn overlay(&mut self, _gui: &egui::Context) {}
}

/// Owns an ordered list of behaviour units plus optional spatial attributes
/// and a directly drawable model. Insertion order is update/draw order.
pub struct Entity {
    id: EntityId,
    pub transform: Option<Transform3D>,
    pub transform2d: Option<Transform2D>,
    pub model: Option<Model>,
    units: SmallVec<[Box<dyn Behavior>; 4]>,
}

impl Entity {
    pub fn new() -> Self {
        Self {
            id: NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed),
            transform: None,
            transform2d: None,
            model: None,
            units: SmallVec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_transform2d(mut self, transform: Transform2D) -> Self {
        self.transform2d = Some(transform);
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Appends a unit, wires its back-reference, and returns a live borrow.
    pub fn attach<B: Behavior>(&mut self, unit: B) -> &mut B {
        let id = self.id;
        self.units.push(Box::new(unit));
        let slot = self.units.last_mut().expect("unit just pushed");
        slot.attached(id);
        slot.as_any_mut().downcast_mut::<B>().expect("pushed unit has its own type")
    }

    /// First attached unit of the requested type, or None. Linear scan in
    /// attachment order; never allocates.
    pub fn find_unit<B: Behavior>(&self) -> Option<&B> {
        self.units.iter().find_map(|unit| unit.as_any().downcast_ref::<B>())
    }

    pub fn find_unit_mut<B: Behavior>(&mut self) -> Option<&mut B> {
        self.units.iter_mut().find_map(|unit| unit.as_any_mut().downcast_mut::<B>())
    }

    /// Runs every unit's update hook, in attachment order, unconditionally.
    pub fn update_all(&mut self, dt: f32, services: &mut Services<'_>) {
        let Entity { units, transform, transform2d, .. } = self;
        for unit in units.iter_mut() {
            let mut ctx = UpdateCtx {
                dt,
                gfx: &mut *services.gfx,
                input: &mut *services.input,
                clock: services.clock,
                audio: &mut *services.audio,
                window: &mut *services.window,
                transform: &mut *transform,
                transform2d: &mut *transform2d,
            };
            unit.update(&mut ctx);
        }
    }

    /// Direct model render (skipped entirely at zero scale), then every
    /// unit's draw hook in attachment order. The caller must hold an open
    /// drawing scope on the device.
    pub fn draw_all(&mut self, services: &mut Services<'_>) {
        let Entity { units, transform, transform2d, model, .. } = self;
        if let (Some(model), Some(transform)) = (model.as_ref(), transform.as_ref()) {
            if transform.scale != Vec3::ZERO {
                model.draw(transform, &mut *services.gfx);
            }
        }
        for index in 0..units.len() {
            let (before, rest) = units.split_at_mut(index);
            let (unit, after) = rest.split_first_mut().expect("index in range");
            let mut ctx = DrawCtx {
                gfx: &mut *services.gfx,
                input: &mut *services.input,
                clock: services.clock,
                audio: &mut *services.audio,
                window: &mut *services.window,
                transform: transform.as_ref(),
                transform2d: transform2d.as_ref(),
                peers: PeerView { before, after },
            };
            unit.draw(&mut ctx);
        }
    }

    /// Runs every unit's overlay hook (the debug-GUI pass).
    pub fn overlay_all(&mut self, gui: &egui::Context) {
        for unit in self.units.iter_mut() {
            unit.overlay(gui);
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}
