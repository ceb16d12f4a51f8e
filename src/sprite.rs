use std::any::Any;

use glam::Vec2;

use crate::color::Color;
use crate::entity::{Behavior, DrawCtx};
use crate::renderer::{Rect, TextureInfo};

/// Textured quad drawn through the owning entity's 2D transform, centered on
/// its position. Without a 2D transform the unit draws nothing.
pub struct Sprite {
    pub texture: TextureInfo,
    pub tint: Color,
}

impl Sprite {
    pub fn new(texture: TextureInfo) -> Self {
        Self { texture, tint: Color::WHITE }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

impl Behavior for Sprite {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
        let Some(t2d) = ctx.transform2d else { return };
        let source = Rect::new(0.0, 0.0, self.texture.width as f32, self.texture.height as f32);
        let dest = Rect::new(
            t2d.position.x,
            t2d.position.y,
            self.texture.width as f32 * t2d.scale.x,
            self.texture.height as f32 * t2d.scale.y,
        );
        let origin = Vec2::new(dest.width / 2.0, dest.height / 2.0);
        if let Err(err) = ctx.gfx.draw_texture_pro(&self.texture, source, dest, origin, t2d.rotation, self.tint) {
            eprintln!("[sprite] draw error: {err:#}");
        }
    }
}
