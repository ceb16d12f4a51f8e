use std::any::Any;

use glam::Vec3;

use crate::color::Color;
use crate::entity::{Behavior, DrawCtx, Transform3D};
use crate::renderer::Renderer;

/// Procedural solid for the 3D pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cube { size: Vec3 },
    Sphere { radius: f32, rings: u32, slices: u32 },
}

/// Directly drawable resource an entity may own without any behaviour unit:
/// a shape plus its tint, rendered through the entity's 3D transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    pub shape: Shape,
    pub tint: Color,
}

impl Model {
    pub fn cube(size: Vec3, tint: Color) -> Self {
        Self { shape: Shape::Cube { size }, tint }
    }

    pub fn sphere(radius: f32, tint: Color) -> Self {
        Self { shape: Shape::Sphere { radius, rings: 16, slices: 16 }, tint }
    }

    pub fn draw(&self, transform: &Transform3D, gfx: &mut Renderer) {
        if let Err(err) = gfx.draw_mesh(&self.shape, transform.matrix(), self.tint) {
            eprintln!("[mesh] draw error: {err:#}");
        }
    }
}

/// Behaviour unit wrapping a [`Shape`]: draws through the owning entity's 3D
/// transform, taking its color from a sibling [`Material`] when one is
/// attached.
pub struct ShapeRender {
    pub shape: Shape,
    pub tint: Color,
}

impl ShapeRender {
    pub fn new(shape: Shape) -> Self {
        Self { shape, tint: Color::WHITE }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

impl Behavior for ShapeRender {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
        let Some(transform) = ctx.transform else { return };
        let tint = ctx.peers.find::<Material>().map(|m| m.base_color).unwrap_or(self.tint);
        if let Err(err) = ctx.gfx.draw_mesh(&self.shape, transform.matrix(), tint) {
            eprintln!("[mesh] draw error: {err:#}");
        }
    }
}

/// Surface properties consulted by sibling render units.
pub struct Material {
    pub base_color: Color,
}

impl Material {
    pub fn new(base_color: Color) -> Self {
        Self { base_color }
    }
}

impl Behavior for Material {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Rotates the owning entity's 3D transform about its rotation axis.
pub struct Spin {
    pub degrees_per_second: f32,
}

impl Spin {
    pub fn new(degrees_per_second: f32) -> Self {
        Self { degrees_per_second }
    }
}

impl Behavior for Spin {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn update(&mut self, ctx: &mut crate::entity::UpdateCtx<'_>) {
        if let Some(transform) = ctx.transform.as_mut() {
            transform.rotation_angle = (transform.rotation_angle + self.degrees_per_second * ctx.dt) % 360.0;
        }
    }
}
