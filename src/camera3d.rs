use glam::{Mat3, Mat4, Vec2, Vec3};
use winit::dpi::PhysicalSize;

use crate::input::{self, Input};

const NEAR_PLANE: f32 = 0.01;
const FAR_PLANE: f32 = 1000.0;
const ORBITAL_SPEED: f32 = 0.5; // radians per second
const MOUSE_SENSITIVITY: f32 = 0.003;
const MOVE_SPEED: f32 = 5.4; // world units per second

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

impl Projection {
    pub fn code(self) -> i64 {
        match self {
            Projection::Perspective => 0,
            Projection::Orthographic => 1,
        }
    }

    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Projection::Orthographic
        } else {
            Projection::Perspective
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Custom,
    Free,
    Orbital,
    FirstPerson,
    ThirdPerson,
}

impl CameraMode {
    pub fn code(self) -> i64 {
        match self {
            CameraMode::Custom => 0,
            CameraMode::Free => 1,
            CameraMode::Orbital => 2,
            CameraMode::FirstPerson => 3,
            CameraMode::ThirdPerson => 4,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => CameraMode::Free,
            2 => CameraMode::Orbital,
            3 => CameraMode::FirstPerson,
            4 => CameraMode::ThirdPerson,
            _ => CameraMode::Custom,
        }
    }
}

/// Perspective or orthographic look-at camera for the 3D pass.
///
/// For the orthographic projection `fov_y_degrees` is reinterpreted as the
/// vertical extent of the view volume in world units.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub projection: Projection,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, up: Vec3, fov_y_degrees: f32, projection: Projection) -> Self {
        Self { position, target, up, fov_y_degrees, projection }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = aspect.max(0.0001);
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
            }
            Projection::Orthographic => {
                let half_height = self.fov_y_degrees * 0.5;
                let half_width = half_height * aspect;
                Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, NEAR_PLANE, FAR_PLANE)
            }
        }
    }

    pub fn view_projection(&self, viewport: PhysicalSize<u32>) -> Mat4 {
        let aspect = if viewport.height > 0 { viewport.width as f32 / viewport.height as f32 } else { 1.0 };
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// Applies one frame of the given controller mode and leaves the mutated
    /// state readable by the caller.
    pub fn update(&mut self, mode: CameraMode, dt: f32, input: &Input) {
        match mode {
            CameraMode::Custom => {}
            CameraMode::Orbital => {
                let rotation = Mat3::from_axis_angle(self.up.normalize_or_zero(), ORBITAL_SPEED * dt);
                self.position = self.target + rotation * (self.position - self.target);
            }
            CameraMode::Free | CameraMode::FirstPerson => {
                self.rotate_by_mouse(input, mode == CameraMode::Free);
                self.translate_by_keys(input, dt, mode == CameraMode::Free);
            }
            CameraMode::ThirdPerson => {
                if input.is_mouse_button_down(input::MOUSE_BUTTON_RIGHT) {
                    let delta = Vec2::new(input.mouse_delta.0, input.mouse_delta.1);
                    let yaw = Mat3::from_axis_angle(self.up.normalize_or_zero(), -delta.x * MOUSE_SENSITIVITY);
                    let pitch_axis = self.right();
                    let pitch = Mat3::from_axis_angle(pitch_axis, -delta.y * MOUSE_SENSITIVITY);
                    self.position = self.target + pitch * yaw * (self.position - self.target);
                }
            }
        }
    }

    fn rotate_by_mouse(&mut self, input: &Input, allow_pitch: bool) {
        let delta = Vec2::new(input.mouse_delta.0, input.mouse_delta.1);
        if delta == Vec2::ZERO {
            return;
        }
        let mut offset = self.target - self.position;
        let yaw = Mat3::from_axis_angle(self.up.normalize_or_zero(), -delta.x * MOUSE_SENSITIVITY);
        offset = yaw * offset;
        if allow_pitch {
            let pitch = Mat3::from_axis_angle(self.right(), -delta.y * MOUSE_SENSITIVITY);
            offset = pitch * offset;
        }
        self.target = self.position + offset;
    }

    fn translate_by_keys(&mut self, input: &Input, dt: f32, allow_vertical: bool) {
        let mut movement = Vec3::ZERO;
        let forward = self.forward();
        let right = self.right();
        if input.is_key_down(87) || input.is_key_down(input::KEY_UP) {
            movement += forward;
        }
        if input.is_key_down(83) || input.is_key_down(input::KEY_DOWN) {
            movement -= forward;
        }
        if input.is_key_down(68) || input.is_key_down(input::KEY_RIGHT) {
            movement += right;
        }
        if input.is_key_down(65) || input.is_key_down(input::KEY_LEFT) {
            movement -= right;
        }
        if allow_vertical {
            if input.is_key_down(69) {
                movement += self.up;
            }
            if input.is_key_down(81) {
                movement -= self.up;
            }
        }
        let movement = movement.normalize_or_zero() * MOVE_SPEED * dt;
        self.position += movement;
        self.target += movement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera3D {
        Camera3D::new(Vec3::new(10.0, 10.0, 10.0), Vec3::ZERO, Vec3::Y, 45.0, Projection::Perspective)
    }

    #[test]
    fn view_projection_is_finite() {
        let vp = camera().view_projection(PhysicalSize::new(800, 450));
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn orbital_mode_keeps_distance_to_target() {
        let mut cam = camera();
        let before = cam.position.distance(cam.target);
        cam.update(CameraMode::Orbital, 0.25, &Input::new());
        let after = cam.position.distance(cam.target);
        assert!((before - after).abs() < 1e-3);
        assert!(cam.position.distance(Vec3::new(10.0, 10.0, 10.0)) > 1e-3);
    }

    #[test]
    fn mode_codes_round_trip() {
        for mode in [
            CameraMode::Custom,
            CameraMode::Free,
            CameraMode::Orbital,
            CameraMode::FirstPerson,
            CameraMode::ThirdPerson,
        ] {
            assert_eq!(CameraMode::from_code(mode.code()), mode);
        }
        assert_eq!(Projection::from_code(Projection::Orthographic.code()), Projection::Orthographic);
    }
}
