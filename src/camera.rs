use glam::{Mat4, Vec2, Vec3, Vec4};
use winit::dpi::PhysicalSize;

/// 2D camera: `screen = offset + rotate(zoom * (world - target))`.
///
/// Screen space is y-down pixels, which is also what the 2D drawing
/// operations take; an identity camera (zero offset/target, zoom 1) draws in
/// raw pixel coordinates.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub offset: Vec2,
    pub target: Vec2,
    pub rotation_degrees: f32,
    pub zoom: f32,
}

impl Camera2D {
    pub fn new(offset: Vec2, target: Vec2, rotation_degrees: f32, zoom: f32) -> Self {
        Self { offset, target, rotation_degrees, zoom }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset.extend(0.0))
            * Mat4::from_rotation_z(self.rotation_degrees.to_radians())
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation(-self.target.extend(0.0))
    }

    pub fn view_projection(&self, size: PhysicalSize<u32>) -> Mat4 {
        screen_projection(size) * self.view_matrix()
    }

    pub fn screen_to_world(&self, screen: Vec2, size: PhysicalSize<u32>) -> Option<Vec2> {
        if size.width == 0 || size.height == 0 {
            return None;
        }
        let inv = self.view_projection(size).inverse();
        let ndc_x = (screen.x / size.width as f32) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen.y / size.height as f32) * 2.0;
        let world = inv * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        if world.w.abs() <= f32::EPSILON {
            return None;
        }
        let world = world / world.w;
        Some(Vec2::new(world.x, world.y))
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self { offset: Vec2::ZERO, target: Vec2::ZERO, rotation_degrees: 0.0, zoom: 1.0 }
    }
}

/// Pixel-space orthographic projection, y-down, origin in the top-left.
pub fn screen_projection(size: PhysicalSize<u32>) -> Mat4 {
    let w = size.width.max(1) as f32;
    let h = size.height.max(1) as f32;
    Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: PhysicalSize<u32> = PhysicalSize::new(800, 450);

    #[test]
    fn identity_camera_is_pixel_space() {
        let camera = Camera2D::default();
        let vp = camera.view_projection(SIZE);
        let top_left = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = vp * Vec4::new(800.0, 450.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn screen_to_world_inverts_projection() {
        let camera = Camera2D::new(Vec2::new(400.0, 225.0), Vec2::new(32.0, 16.0), 0.0, 2.0);
        let world = camera.screen_to_world(Vec2::new(400.0, 225.0), SIZE).unwrap();
        assert!((world.x - 32.0).abs() < 1e-3);
        assert!((world.y - 16.0).abs() < 1e-3);
    }
}
