//! Contact shadow
//!
//! A soft dark patch on a ground plane under the model. Every frame the
//! model's triangles are splatted top-down into a small grid covering the
//! plane; geometry close to the plane darkens more, geometry `far` or more
//! above it not at all. The grid is blurred and then drawn by casting each
//! framebuffer pixel's view ray onto the plane, darkening with alpha like a
//! blob shadow.

use crate::assembly::SceneMesh;
use crate::rasterizer::{point_in_triangle_2d, Camera, Color, Framebuffer, Vec3, barycentric};
use serde::{Deserialize, Serialize};

/// Grid cells per side
const SHADOW_RESOLUTION: usize = 96;

const SHADOW_COLOR: Color = Color::BLACK;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactShadowSettings {
    /// Height of the ground plane
    pub plane_y: f32,
    /// Darkness at full coverage (0-1)
    pub opacity: f32,
    /// Extent of the plane along X
    pub width: f32,
    /// Extent of the plane along Z
    pub height: f32,
    /// Softening radius, in grid cells per unit of blur
    pub blur: f32,
    /// Geometry this far above the plane no longer casts
    pub far: f32,
}

impl Default for ContactShadowSettings {
    fn default() -> Self {
        Self { plane_y: -0.8, opacity: 0.25, width: 10.0, height: 10.0, blur: 1.5, far: 0.8 }
    }
}

pub struct ContactShadow {
    settings: ContactShadowSettings,
    /// Coverage 0-1, row-major over Z then X
    grid: Vec<f32>,
    scratch: Vec<f32>,
}

impl ContactShadow {
    pub fn new(settings: ContactShadowSettings) -> Self {
        let cells = SHADOW_RESOLUTION * SHADOW_RESOLUTION;
        Self { settings, grid: vec![0.0; cells], scratch: vec![0.0; cells] }
    }

    pub fn settings(&self) -> &ContactShadowSettings {
        &self.settings
    }

    fn cell_size(&self) -> (f32, f32) {
        (
            self.settings.width / SHADOW_RESOLUTION as f32,
            self.settings.height / SHADOW_RESOLUTION as f32,
        )
    }

    /// World X/Z to fractional grid coordinates
    fn to_grid(&self, x: f32, z: f32) -> (f32, f32) {
        let (cw, ch) = self.cell_size();
        (
            (x + self.settings.width * 0.5) / cw,
            (z + self.settings.height * 0.5) / ch,
        )
    }

    /// Rebuild coverage from the model's current placement
    pub fn update(&mut self, mesh: &SceneMesh) {
        self.grid.iter_mut().for_each(|c| *c = 0.0);
        let far = self.settings.far.max(1e-3);
        let plane_y = self.settings.plane_y;
        let n = SHADOW_RESOLUTION;

        for face in &mesh.faces {
            let (Some(a), Some(b), Some(c)) = (
                mesh.vertices.get(face.v0),
                mesh.vertices.get(face.v1),
                mesh.vertices.get(face.v2),
            ) else {
                continue;
            };

            let heights = [a.pos.y - plane_y, b.pos.y - plane_y, c.pos.y - plane_y];
            if heights.iter().all(|h| *h > far) || heights.iter().all(|h| *h < 0.0) {
                continue;
            }

            // Top-down triangle in grid space; z carries height above the plane
            let (ax, az) = self.to_grid(a.pos.x, a.pos.z);
            let (bx, bz) = self.to_grid(b.pos.x, b.pos.z);
            let (cx, cz) = self.to_grid(c.pos.x, c.pos.z);
            let ga = Vec3::new(ax, az, heights[0]);
            let gb = Vec3::new(bx, bz, heights[1]);
            let gc = Vec3::new(cx, cz, heights[2]);

            let area = (gb.x - ga.x) * (gc.y - ga.y) - (gc.x - ga.x) * (gb.y - ga.y);
            if area.abs() < 1e-6 {
                continue;
            }

            let min_x = ga.x.min(gb.x).min(gc.x).floor().max(0.0) as usize;
            let max_x = (ga.x.max(gb.x).max(gc.x).ceil() as i64).clamp(0, n as i64) as usize;
            let min_z = ga.y.min(gb.y).min(gc.y).floor().max(0.0) as usize;
            let max_z = (ga.y.max(gb.y).max(gc.y).ceil() as i64).clamp(0, n as i64) as usize;

            for gz in min_z..max_z {
                for gx in min_x..max_x {
                    let (px, pz) = (gx as f32 + 0.5, gz as f32 + 0.5);
                    if !point_in_triangle_2d(px, pz, ga.x, ga.y, gb.x, gb.y, gc.x, gc.y) {
                        continue;
                    }
                    let bc = barycentric(Vec3::new(px, pz, 0.0), ga, gb, gc);
                    let h = bc.x * ga.z + bc.y * gb.z + bc.z * gc.z;
                    if !(0.0..=far).contains(&h) {
                        continue;
                    }
                    let closeness = 1.0 - h / far;
                    let cell = &mut self.grid[gz * n + gx];
                    *cell = cell.max(closeness * closeness);
                }
            }
        }

        let radius = (self.settings.blur * 2.0).round().max(0.0) as usize;
        if radius > 0 {
            // Two box passes approximate a gaussian
            for _ in 0..2 {
                box_blur(&mut self.grid, &mut self.scratch, n, radius);
            }
        }
    }

    /// Darkness (0-1, opacity applied) at a point on the plane
    pub fn darkness_at(&self, x: f32, z: f32) -> f32 {
        let (gx, gz) = self.to_grid(x, z);
        if gx < 0.0 || gz < 0.0 {
            return 0.0;
        }
        let (ix, iz) = (gx as usize, gz as usize);
        if ix >= SHADOW_RESOLUTION || iz >= SHADOW_RESOLUTION {
            return 0.0;
        }
        self.grid[iz * SHADOW_RESOLUTION + ix] * self.settings.opacity.clamp(0.0, 1.0)
    }

    /// Darken the framebuffer where the view ray meets shadowed plane
    pub fn render(&self, fb: &mut Framebuffer, camera: &Camera) {
        let focal = camera.focal_length(fb.height);
        let (half_w, half_h) = (fb.width as f32 * 0.5, fb.height as f32 * 0.5);
        let plane_y = self.settings.plane_y;

        for y in 0..fb.height {
            let row = camera.basis_y.scale((y as f32 + 0.5 - half_h) / focal);
            for x in 0..fb.width {
                let dir = camera.basis_z + row + camera.basis_x.scale((x as f32 + 0.5 - half_w) / focal);
                if dir.y.abs() < 1e-6 {
                    continue;
                }
                let t = (plane_y - camera.position.y) / dir.y;
                if t <= 0.0 {
                    continue;
                }
                let hit = camera.position + dir.scale(t);
                let alpha = (self.darkness_at(hit.x, hit.z) * 255.0) as u8;
                if alpha > 2 {
                    fb.set_pixel_alpha(x, y, SHADOW_COLOR, alpha);
                }
            }
        }
    }
}

/// Separable box blur, `radius` cells each side
fn box_blur(grid: &mut [f32], scratch: &mut [f32], n: usize, radius: usize) {
    let window = (2 * radius + 1) as f32;

    for z in 0..n {
        for x in 0..n {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(n - 1);
            let sum: f32 = grid[z * n + lo..=z * n + hi].iter().sum();
            scratch[z * n + x] = sum / window;
        }
    }
    for z in 0..n {
        for x in 0..n {
            let lo = z.saturating_sub(radius);
            let hi = (z + radius).min(n - 1);
            let sum: f32 = (lo..=hi).map(|zz| scratch[zz * n + x]).sum();
            grid[z * n + x] = sum / window;
        }
    }
}
