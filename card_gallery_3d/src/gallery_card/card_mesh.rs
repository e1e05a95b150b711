/// CPU-side mesh builders for card bodies and selection rings.

use std::f32::consts::{FRAC_PI_2, TAU};
use glam::{Vec2, Vec3};
use crate::graphics_device::{CardVertex, GeometryDesc};
use crate::layout::{CARD_HEIGHT, CARD_WIDTH};
use crate::lod::LodLevel;

pub const CARD_THICKNESS: f32 = 0.02;
pub const CARD_CORNER_RADIUS: f32 = 0.15;
pub const RING_RADIUS: f32 = 1.8;
pub const RING_TUBE: f32 = 0.05;
const RING_RADIAL_SEGMENTS: u32 = 8;

/// Outline segments of the card body at a LOD
pub fn card_segments(lod: LodLevel) -> u32 {
    match lod {
        LodLevel::High => 32,
        LodLevel::Medium => 16,
        LodLevel::Low => 8,
    }
}

/// Tubular segments of the selection ring at a LOD
pub fn ring_segments(lod: LodLevel) -> u32 {
    match lod {
        LodLevel::High => 64,
        LodLevel::Medium => 32,
        LodLevel::Low => 16,
    }
}

/// Rounded-rectangle outline, counter-clockwise, `segments / 4` steps per corner
fn rounded_outline(segments: u32) -> Vec<Vec2> {
    let steps = (segments / 4).max(1);
    let half = Vec2::new(CARD_WIDTH * 0.5, CARD_HEIGHT * 0.5);
    let r = CARD_CORNER_RADIUS;
    let corners = [
        (Vec2::new(half.x - r, half.y - r), 0.0),
        (Vec2::new(-half.x + r, half.y - r), FRAC_PI_2),
        (Vec2::new(-half.x + r, -half.y + r), 2.0 * FRAC_PI_2),
        (Vec2::new(half.x - r, -half.y + r), 3.0 * FRAC_PI_2),
    ];

    let mut outline = Vec::with_capacity((4 * (steps + 1)) as usize);
    for (center, start) in corners {
        for step in 0..=steps {
            let angle = start + FRAC_PI_2 * step as f32 / steps as f32;
            outline.push(center + Vec2::new(angle.cos(), angle.sin()) * r);
        }
    }
    outline
}

fn face_uv(point: Vec2) -> [f32; 2] {
    [point.x / CARD_WIDTH + 0.5, 0.5 - point.y / CARD_HEIGHT]
}

/// Card body: front face, back face, and side walls
pub fn build_card_mesh(label: impl Into<String>, segments: u32) -> GeometryDesc {
    let outline = rounded_outline(segments);
    let n = outline.len() as u16;
    let z = CARD_THICKNESS * 0.5;
    let mut vertices = Vec::with_capacity(outline.len() * 4 + 2);
    let mut indices = Vec::new();

    // Front (+Z) and back (-Z) fans
    for (side, normal_z) in [(z, 1.0f32), (-z, -1.0f32)] {
        let base = vertices.len() as u16;
        vertices.push(CardVertex { position: [0.0, 0.0, side], normal: [0.0, 0.0, normal_z], uv: [0.5, 0.5] });
        for point in &outline {
            vertices.push(CardVertex {
                position: [point.x, point.y, side],
                normal: [0.0, 0.0, normal_z],
                uv: face_uv(*point),
            });
        }
        for i in 0..n {
            let a = base + 1 + i;
            let b = base + 1 + (i + 1) % n;
            if normal_z > 0.0 {
                indices.extend_from_slice(&[base, a, b]);
            } else {
                indices.extend_from_slice(&[base, b, a]);
            }
        }
    }

    // Side walls
    let base = vertices.len() as u16;
    for point in &outline {
        let normal = Vec3::new(point.x, point.y, 0.0).normalize_or_zero();
        for side in [z, -z] {
            vertices.push(CardVertex {
                position: [point.x, point.y, side],
                normal: normal.to_array(),
                uv: face_uv(*point),
            });
        }
    }
    for i in 0..n {
        let front_a = base + 2 * i;
        let back_a = front_a + 1;
        let front_b = base + 2 * ((i + 1) % n);
        let back_b = front_b + 1;
        indices.extend_from_slice(&[front_a, back_a, back_b, back_b, front_b, front_a]);
    }

    GeometryDesc::from_vertices(label, &vertices, indices)
}

/// Flat torus around the Y axis
pub fn build_ring_mesh(label: impl Into<String>, tubular_segments: u32) -> GeometryDesc {
    let tubular = tubular_segments.max(3);
    let radial = RING_RADIAL_SEGMENTS;
    let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring_center = Vec3::new(u.cos() * RING_RADIUS, 0.0, u.sin() * RING_RADIUS);
            let position = Vec3::new(
                (RING_RADIUS + RING_TUBE * v.cos()) * u.cos(),
                RING_TUBE * v.sin(),
                (RING_RADIUS + RING_TUBE * v.cos()) * u.sin(),
            );
            vertices.push(CardVertex {
                position: position.to_array(),
                normal: (position - ring_center).normalize_or_zero().to_array(),
                uv: [i as f32 / tubular as f32, j as f32 / radial as f32],
            });
        }
    }

    let row = (tubular + 1) as u16;
    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 0..radial as u16 {
        for i in 0..tubular as u16 {
            let a = j * row + i;
            let b = (j + 1) * row + i;
            let c = (j + 1) * row + i + 1;
            let d = j * row + i + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    GeometryDesc::from_vertices(label, &vertices, indices)
}

#[cfg(test)]
#[path = "card_mesh_tests.rs"]
mod tests;
