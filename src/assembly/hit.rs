//! Screen-space picking
//!
//! Every part under the pointer is reported with its nearest depth, sorted
//! front to back. The first hit is the one that receives the event; the
//! whole list is the set of parts currently under the pointer.

use super::SceneMesh;
use crate::rasterizer::{barycentric, point_in_triangle_2d, Camera, Vec3, NEAR_PLANE};
use crate::store::MaterialId;

/// A part under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Index into the assembly's part list
    pub part: usize,
    pub material: MaterialId,
    /// Camera-space depth at the pointer
    pub depth: f32,
}

/// All parts under framebuffer position (`x`, `y`), nearest first
pub fn hit_test(mesh: &SceneMesh, camera: &Camera, fb_width: usize, fb_height: usize, x: f32, y: f32) -> Vec<Hit> {
    let focal = camera.focal_length(fb_height);
    let projected: Vec<Vec3> = mesh
        .vertices
        .iter()
        .map(|v| {
            let cam = camera.to_camera_space(v.pos);
            crate::rasterizer::math::project(cam, focal, fb_width, fb_height)
        })
        .collect();

    // Nearest depth per part
    let mut nearest: Vec<Option<f32>> = vec![None; mesh.materials.len()];

    for (face, &part) in mesh.faces.iter().zip(&mesh.owners) {
        let (Some(&p1), Some(&p2), Some(&p3)) = (
            projected.get(face.v0),
            projected.get(face.v1),
            projected.get(face.v2),
        ) else {
            continue;
        };
        if p1.z <= NEAR_PLANE || p2.z <= NEAR_PLANE || p3.z <= NEAR_PLANE {
            continue;
        }

        // Collapsed triangles (zero-scale parts) would match everywhere
        let signed_area = (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y);
        if signed_area.abs() < 1e-6 {
            continue;
        }

        if !point_in_triangle_2d(x, y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y) {
            continue;
        }

        // Perspective-correct depth at the pointer
        let bc = barycentric(Vec3::new(x, y, 0.0), p1, p2, p3);
        let inv_z = bc.x / p1.z + bc.y / p2.z + bc.z / p3.z;
        let depth = if inv_z > 0.0 { 1.0 / inv_z } else { p1.z.min(p2.z).min(p3.z) };

        if let Some(slot) = nearest.get_mut(part) {
            if slot.map_or(true, |best| depth < best) {
                *slot = Some(depth);
            }
        }
    }

    let mut hits: Vec<Hit> = nearest
        .into_iter()
        .enumerate()
        .filter_map(|(part, depth)| {
            depth.map(|depth| Hit { part, material: mesh.materials[part].clone(), depth })
        })
        .collect();
    hits.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    hits
}
