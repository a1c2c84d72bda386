//! Procedural stand-in meshes
//!
//! Used for any part whose geometry the model file does not provide. Sizes
//! follow the authoring tool's defaults (unit radius, two units tall, Y up)
//! so the authored part transforms still place and scale them sensibly.

use super::Geometry;
use crate::rasterizer::{Face, Vec3};
use std::f32::consts::TAU;

/// Shape used when a geometry is missing, picked from its name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Cylinder,
    Torus,
    Cube,
    Plane,
}

impl PrimitiveKind {
    /// "Cylinder019" -> Cylinder, "Torus004" -> Torus, unknown -> Cube
    pub fn for_geometry(name: &str) -> Self {
        if name.starts_with("Cylinder") {
            PrimitiveKind::Cylinder
        } else if name.starts_with("Torus") {
            PrimitiveKind::Torus
        } else if name.starts_with("Plane") {
            PrimitiveKind::Plane
        } else {
            PrimitiveKind::Cube
        }
    }

    pub fn build(self) -> Geometry {
        match self {
            PrimitiveKind::Cylinder => cylinder(16),
            PrimitiveKind::Torus => torus(16, 8, 1.0, 0.25),
            PrimitiveKind::Cube => cube(),
            PrimitiveKind::Plane => plane(),
        }
    }
}

/// Closed cylinder along Y, radius 1, from y=-1 to y=1
pub fn cylinder(segments: usize) -> Geometry {
    let segments = segments.max(3);
    let mut g = Geometry::default();

    // Side: one quad per segment with outward normals
    for i in 0..segments {
        let a0 = i as f32 / segments as f32 * TAU;
        let a1 = (i + 1) as f32 / segments as f32 * TAU;
        let n0 = Vec3::new(a0.cos(), 0.0, a0.sin());
        let n1 = Vec3::new(a1.cos(), 0.0, a1.sin());

        let base = g.positions.len();
        g.push_vertex(Vec3::new(n0.x, -1.0, n0.z), n0);
        g.push_vertex(Vec3::new(n1.x, -1.0, n1.z), n1);
        g.push_vertex(Vec3::new(n1.x, 1.0, n1.z), n1);
        g.push_vertex(Vec3::new(n0.x, 1.0, n0.z), n0);
        g.faces.push(Face::new(base, base + 2, base + 1));
        g.faces.push(Face::new(base, base + 3, base + 2));
    }

    // Caps: triangle fans around a center vertex
    for (y, normal) in [(1.0, Vec3::UP), (-1.0, -Vec3::UP)] {
        let center = g.positions.len();
        g.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        for i in 0..segments {
            let a = i as f32 / segments as f32 * TAU;
            g.push_vertex(Vec3::new(a.cos(), y, a.sin()), normal);
        }
        for i in 0..segments {
            let cur = center + 1 + i;
            let next = center + 1 + (i + 1) % segments;
            if y > 0.0 {
                g.faces.push(Face::new(center, next, cur));
            } else {
                g.faces.push(Face::new(center, cur, next));
            }
        }
    }

    g
}

/// Torus lying in the XZ plane around the Y axis
pub fn torus(major_segments: usize, minor_segments: usize, major_radius: f32, minor_radius: f32) -> Geometry {
    let major_segments = major_segments.max(3);
    let minor_segments = minor_segments.max(3);
    let mut g = Geometry::default();

    for i in 0..major_segments {
        let u = i as f32 / major_segments as f32 * TAU;
        let ring_center = Vec3::new(u.cos() * major_radius, 0.0, u.sin() * major_radius);
        let outward = Vec3::new(u.cos(), 0.0, u.sin());
        for j in 0..minor_segments {
            let v = j as f32 / minor_segments as f32 * TAU;
            let normal = outward.scale(v.cos()) + Vec3::UP.scale(v.sin());
            g.push_vertex(ring_center + normal.scale(minor_radius), normal);
        }
    }

    let index = |i: usize, j: usize| (i % major_segments) * minor_segments + (j % minor_segments);
    for i in 0..major_segments {
        for j in 0..minor_segments {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i + 1, j + 1);
            let d = index(i, j + 1);
            g.faces.push(Face::new(a, c, b));
            g.faces.push(Face::new(a, d, c));
        }
    }

    g
}

/// Cube from -1 to 1 on every axis, flat-shaded faces
pub fn cube() -> Geometry {
    let mut g = Geometry::default();
    let axes = [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    ];

    for (normal, u, v) in axes {
        for side in [1.0f32, -1.0] {
            let n = normal.scale(side);
            let base = g.positions.len();
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                g.push_vertex(n + u.scale(su) + v.scale(sv), n);
            }
            // u x v == normal, so this order faces outward on the positive side
            if side > 0.0 {
                g.faces.push(Face::new(base, base + 1, base + 2));
                g.faces.push(Face::new(base, base + 2, base + 3));
            } else {
                g.faces.push(Face::new(base, base + 2, base + 1));
                g.faces.push(Face::new(base, base + 3, base + 2));
            }
        }
    }

    g
}

/// Plane in XZ from -1 to 1, facing +Y
pub fn plane() -> Geometry {
    let mut g = Geometry::default();
    for (x, z) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        g.push_vertex(Vec3::new(x, 0.0, z), Vec3::UP);
    }
    g.faces.push(Face::new(0, 2, 1));
    g.faces.push(Face::new(0, 3, 2));
    g
}
