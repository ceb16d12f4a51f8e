//! CPU tessellation for the immediate-mode primitives. Every helper emits
//! clip-space vertices (the view-projection is applied here, not on the GPU).

use glam::{Mat4, Vec2, Vec3};

use super::Vertex;
use crate::color::Color;

const CIRCLE_SEGMENTS: u32 = 36;

fn vertex(vp: &Mat4, pos: Vec3, uv: Vec2, color: [f32; 4]) -> Vertex {
    let clip = *vp * pos.extend(1.0);
    Vertex { pos: clip.to_array(), uv: uv.to_array(), color }
}

pub(crate) fn rect_corners(x: f32, y: f32, w: f32, h: f32) -> [Vec3; 4] {
    [
        Vec3::new(x, y, 0.0),
        Vec3::new(x + w, y, 0.0),
        Vec3::new(x + w, y + h, 0.0),
        Vec3::new(x, y + h, 0.0),
    ]
}

pub(crate) fn solid_quad(out: &mut Vec<Vertex>, vp: &Mat4, corners: [Vec3; 4], color: Color) {
    textured_quad(out, vp, corners, [Vec2::ZERO; 4], color);
}

pub(crate) fn textured_quad(
    out: &mut Vec<Vertex>,
    vp: &Mat4,
    corners: [Vec3; 4],
    uvs: [Vec2; 4],
    color: Color,
) {
    let c = color.to_f32_array();
    let v = |i: usize| vertex(vp, corners[i], uvs[i], c);
    out.extend_from_slice(&[v(0), v(1), v(2), v(0), v(2), v(3)]);
}

pub(crate) fn line(out: &mut Vec<Vertex>, vp: &Mat4, a: Vec3, b: Vec3, color: Color) {
    let c = color.to_f32_array();
    out.push(vertex(vp, a, Vec2::ZERO, c));
    out.push(vertex(vp, b, Vec2::ZERO, c));
}

pub(crate) fn rect_lines(out: &mut Vec<Vertex>, vp: &Mat4, x: f32, y: f32, w: f32, h: f32, color: Color) {
    let [a, b, c, d] = rect_corners(x, y, w, h);
    line(out, vp, a, b, color);
    line(out, vp, b, c, color);
    line(out, vp, c, d, color);
    line(out, vp, d, a, color);
}

pub(crate) fn circle(out: &mut Vec<Vertex>, vp: &Mat4, center: Vec2, radius: f32, color: Color) {
    let c = color.to_f32_array();
    let hub = vertex(vp, center.extend(0.0), Vec2::ZERO, c);
    for i in 0..CIRCLE_SEGMENTS {
        let a0 = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
        let a1 = (i + 1) as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
        out.push(hub);
        out.push(vertex(vp, (center + Vec2::from_angle(a0) * radius).extend(0.0), Vec2::ZERO, c));
        out.push(vertex(vp, (center + Vec2::from_angle(a1) * radius).extend(0.0), Vec2::ZERO, c));
    }
}

pub(crate) fn circle_lines(out: &mut Vec<Vertex>, vp: &Mat4, center: Vec2, radius: f32, color: Color) {
    for i in 0..CIRCLE_SEGMENTS {
        let a0 = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
        let a1 = (i + 1) as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
        line(
            out,
            vp,
            (center + Vec2::from_angle(a0) * radius).extend(0.0),
            (center + Vec2::from_angle(a1) * radius).extend(0.0),
            color,
        );
    }
}

const CUBE_FACES: [[Vec3; 4]; 6] = [
    // +Z, -Z, +X, -X, +Y, -Y; unit cube corners, scaled by half-extents.
    [Vec3::new(-1.0, -1.0, 1.0), Vec3::new(1.0, -1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, 1.0, 1.0)],
    [Vec3::new(1.0, -1.0, -1.0), Vec3::new(-1.0, -1.0, -1.0), Vec3::new(-1.0, 1.0, -1.0), Vec3::new(1.0, 1.0, -1.0)],
    [Vec3::new(1.0, -1.0, 1.0), Vec3::new(1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)],
    [Vec3::new(-1.0, -1.0, -1.0), Vec3::new(-1.0, -1.0, 1.0), Vec3::new(-1.0, 1.0, 1.0), Vec3::new(-1.0, 1.0, -1.0)],
    [Vec3::new(-1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, -1.0), Vec3::new(-1.0, 1.0, -1.0)],
    [Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, -1.0, -1.0), Vec3::new(1.0, -1.0, 1.0), Vec3::new(-1.0, -1.0, 1.0)],
];

pub(crate) fn cube(out: &mut Vec<Vertex>, mat: &Mat4, size: Vec3, color: Color) {
    let half = size * 0.5;
    for face in CUBE_FACES {
        let corners = [face[0] * half, face[1] * half, face[2] * half, face[3] * half];
        solid_quad(out, mat, corners, color);
    }
}

pub(crate) fn cube_wires(out: &mut Vec<Vertex>, mat: &Mat4, size: Vec3, color: Color) {
    let h = size * 0.5;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    let bottom = [corner(-1.0, -1.0, -1.0), corner(1.0, -1.0, -1.0), corner(1.0, -1.0, 1.0), corner(-1.0, -1.0, 1.0)];
    let top = [corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)];
    for i in 0..4 {
        line(out, mat, bottom[i], bottom[(i + 1) % 4], color);
        line(out, mat, top[i], top[(i + 1) % 4], color);
        line(out, mat, bottom[i], top[i], color);
    }
}

fn sphere_point(radius: f32, ring: u32, rings: u32, slice: u32, slices: u32) -> Vec3 {
    let lat = std::f32::consts::PI * (ring as f32 / rings as f32) - std::f32::consts::FRAC_PI_2;
    let lon = std::f32::consts::TAU * (slice as f32 / slices as f32);
    Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin()) * radius
}

pub(crate) fn sphere(out: &mut Vec<Vertex>, mat: &Mat4, radius: f32, rings: u32, slices: u32, color: Color) {
    let rings = rings.max(2);
    let slices = slices.max(3);
    for ring in 0..rings {
        for slice in 0..slices {
            let a = sphere_point(radius, ring, rings, slice, slices);
            let b = sphere_point(radius, ring + 1, rings, slice, slices);
            let c = sphere_point(radius, ring + 1, rings, slice + 1, slices);
            let d = sphere_point(radius, ring, rings, slice + 1, slices);
            solid_quad(out, mat, [a, b, c, d], color);
        }
    }
}

pub(crate) fn sphere_wires(out: &mut Vec<Vertex>, mat: &Mat4, radius: f32, rings: u32, slices: u32, color: Color) {
    let rings = rings.max(2);
    let slices = slices.max(3);
    for ring in 0..=rings {
        for slice in 0..slices {
            let a = sphere_point(radius, ring, rings, slice, slices);
            let b = sphere_point(radius, ring, rings, slice + 1, slices);
            line(out, mat, a, b, color);
        }
    }
    for slice in 0..slices {
        for ring in 0..rings {
            let a = sphere_point(radius, ring, rings, slice, slices);
            let b = sphere_point(radius, ring + 1, rings, slice, slices);
            line(out, mat, a, b, color);
        }
    }
}

pub(crate) fn grid(out: &mut Vec<Vertex>, vp: &Mat4, slices: i32, spacing: f32) {
    let half = slices as f32 * spacing * 0.5;
    for i in -slices / 2..=slices / 2 {
        let at = i as f32 * spacing;
        let color = if i == 0 { Color::DARKGRAY } else { Color::LIGHTGRAY };
        line(out, vp, Vec3::new(at, 0.0, -half), Vec3::new(at, 0.0, half), color);
        line(out, vp, Vec3::new(-half, 0.0, at), Vec3::new(half, 0.0, at), color);
    }
}
