use std::f32::consts::TAU;

use glam::Vec3;

/// GPU ready triangle mesh with interleaved vertex data.
///
/// Vertices are laid out as `position.xyz` followed by `normal.xyz`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 6
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.vertices.extend_from_slice(&[
            position.x, position.y, position.z, normal.x, normal.y, normal.z,
        ]);
    }
}

/// Axis-aligned cuboid centered at the origin with flat-shaded faces.
pub fn cuboid(size: Vec3) -> Mesh {
    // (normal, tangent u, tangent v) per face, with u x v = normal so the
    // winding comes out counter-clockwise seen from outside.
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let half = size * 0.5;
    let mut mesh = Mesh::default();
    for (normal, tan_u, tan_v) in faces {
        let base = mesh.vertex_count() as u32;
        let origin = normal * half;
        let eu = tan_u * half;
        let ev = tan_v * half;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            mesh.push_vertex(origin + eu * su + ev * sv, normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Unit die, one cell wide.
pub fn unit_cube() -> Mesh {
    cuboid(Vec3::ONE)
}

/// Flat rectangle in the XZ plane at y = 0, facing up.
pub fn plane(width: f32, depth: f32) -> Mesh {
    let hw = width * 0.5;
    let hd = depth * 0.5;
    let mut mesh = Mesh::default();
    let corners = [
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(-hw, 0.0, hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(hw, 0.0, -hd),
    ];
    for corner in corners {
        mesh.push_vertex(corner, Vec3::Y);
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

/// Torus lying in the XY plane, hole along the Z axis.
///
/// `ring_radius` runs from the center to the middle of the tube;
/// `tube_segments` is the cross-section resolution, `ring_segments` the
/// resolution around the ring.
pub fn torus(
    ring_radius: f32,
    tube_radius: f32,
    tube_segments: usize,
    ring_segments: usize,
) -> Mesh {
    let mut mesh = Mesh::default();

    for j in 0..=ring_segments {
        let theta = j as f32 / ring_segments as f32 * TAU;
        let ring_center = Vec3::new(theta.cos(), theta.sin(), 0.0) * ring_radius;
        for i in 0..=tube_segments {
            let phi = i as f32 / tube_segments as f32 * TAU;
            let normal = Vec3::new(theta.cos() * phi.cos(), theta.sin() * phi.cos(), phi.sin());
            mesh.push_vertex(ring_center + normal * tube_radius, normal);
        }
    }

    let stride = tube_segments as u32 + 1;
    for j in 1..=ring_segments as u32 {
        for i in 1..=tube_segments as u32 {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}
