//! Core rendering functions
//! Z-buffered triangle rasterization with per-vertex lighting

use super::camera::Camera;
use super::math::{Vec3, NEAR_PLANE};
use super::types::{Color, Face, Light, LightType, RasterSettings, ShadingMode, Vertex};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.zbuffer = vec![f32::MAX; width * height];
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    /// Clear framebuffer with a vertical gradient
    /// top_color at y=0, bottom_color at y=height-1
    pub fn clear_gradient(&mut self, top_color: Color, bottom_color: Color) {
        let h = self.height;
        for y in 0..h {
            // Linear interpolation factor (0.0 at top, 1.0 at bottom)
            let t = if h > 1 { y as f32 / (h - 1) as f32 } else { 0.0 };
            let bytes = top_color.lerp(bottom_color, t).to_bytes();

            let row = y * self.width * 4;
            for px in self.pixels[row..row + self.width * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Set pixel if closer than what is already there. Returns true if written.
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                self.set_pixel(x, y, color);
                return true;
            }
        }
        false
    }

    /// Read back a pixel (for tests and debugging)
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Some(Color::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
        } else {
            None
        }
    }

    /// Set a pixel with alpha blending (0 = transparent, 255 = opaque)
    #[inline]
    pub fn set_pixel_alpha(&mut self, x: usize, y: usize, color: Color, alpha: u8) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;

            let back_r = self.pixels[idx];
            let back_g = self.pixels[idx + 1];
            let back_b = self.pixels[idx + 2];

            // Alpha blend: result = front * alpha + back * (1 - alpha)
            let a = alpha as u16;
            let inv_a = 255 - a;
            self.pixels[idx] = ((color.r as u16 * a + back_r as u16 * inv_a) / 255) as u8;
            self.pixels[idx + 1] = ((color.g as u16 * a + back_g as u16 * inv_a) / 255) as u8;
            self.pixels[idx + 2] = ((color.b as u16 * a + back_b as u16 * inv_a) / 255) as u8;
            self.pixels[idx + 3] = 255;
        }
    }
}

/// Projected surface (triangle ready for rasterization)
struct Surface {
    v1: Vec3, // Screen-space vertex 1 (z = camera depth)
    v2: Vec3,
    v3: Vec3,
    w1: Vec3, // World-space vertex 1 (for positional lights)
    w2: Vec3,
    w3: Vec3,
    wn1: Vec3, // World-space vertex normal 1
    wn2: Vec3,
    wn3: Vec3,
    c1: Color, // Surface color 1
    c2: Color,
    c3: Color,
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < f32::EPSILON {
        return if x >= edge1 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Calculate shading color from multiple lights (with colored light support)
/// Returns RGB values 0.0-1.0 for each channel
pub(crate) fn shade_multi_light_color(normal: Vec3, world_pos: Vec3, lights: &[Light], ambient: f32) -> (f32, f32, f32) {
    let mut total_r = ambient;
    let mut total_g = ambient;
    let mut total_b = ambient;

    for light in lights.iter().filter(|l| l.enabled) {
        let (light_r, light_g, light_b) = light.color.to_f32();

        let contribution = match &light.light_type {
            LightType::Spot { position, direction, angle, penumbra, radius } => {
                let to_light = *position - world_pos;
                let dist = to_light.len();
                if dist < 0.001 || (*radius > 0.0 && dist > *radius) {
                    0.0
                } else {
                    let light_dir = to_light.normalize();
                    let angle_cos = (-light_dir).dot(*direction);
                    let cone_cos = angle.cos();
                    let inner_cos = (angle * (1.0 - penumbra)).cos();
                    let cone = smoothstep(cone_cos, inner_cos, angle_cos);
                    let attenuation = if *radius > 0.0 {
                        let a = 1.0 - dist / radius;
                        a * a
                    } else {
                        1.0
                    };
                    let n_dot_l = normal.dot(light_dir).max(0.0);
                    n_dot_l * light.intensity * attenuation * cone
                }
            }
            LightType::Hemisphere { sky, ground } => {
                // Tinted fill: blend ground->sky by how much the normal faces up
                let t = normal.y * 0.5 + 0.5;
                let (r, g, b) = ground.lerp(*sky, t).to_f32();
                total_r += r * light.intensity * light_r;
                total_g += g * light.intensity * light_g;
                total_b += b * light.intensity * light_b;
                continue;
            }
        };

        total_r += contribution * light_r;
        total_g += contribution * light_g;
        total_b += contribution * light_b;
    }

    (total_r.min(1.0), total_g.min(1.0), total_b.min(1.0))
}

/// Apply RGB shading to a color
fn shade_color_rgb(color: Color, shade_r: f32, shade_g: f32, shade_b: f32) -> Color {
    Color::new(
        (color.r as f32 * shade_r).min(255.0) as u8,
        (color.g as f32 * shade_g).min(255.0) as u8,
        (color.b as f32 * shade_b).min(255.0) as u8,
    )
}

/// Ordered dither matrix (signed offsets -4 to +3)
const DITHER_MATRIX: [[i8; 4]; 4] = [
    [-4,  0, -3,  1],
    [ 2, -2,  3, -1],
    [-3,  1, -4,  0],
    [ 3, -1,  2, -2],
];

/// Ordered dithering down to 5 bits per channel
fn apply_dither(color: Color, x: usize, y: usize) -> Color {
    let offset = DITHER_MATRIX[y & 3][x & 3] as i32;

    // Add offset, shift by 3, clamp to 5-bit, then expand back to 8-bit
    let r5 = ((color.r as i32 + offset) >> 3).clamp(0, 31) as u8;
    let g5 = ((color.g as i32 + offset) >> 3).clamp(0, 31) as u8;
    let b5 = ((color.b as i32 + offset) >> 3).clamp(0, 31) as u8;

    Color::new(r5 << 3, g5 << 3, b5 << 3)
}

/// Rasterize a single triangle using incremental barycentric stepping.
/// Uses edge function increments instead of recalculating barycentric
/// coordinates per-pixel.
fn rasterize_triangle(fb: &mut Framebuffer, surface: &Surface, settings: &RasterSettings) {
    // Bounding box
    let min_x = surface.v1.x.min(surface.v2.x).min(surface.v3.x).max(0.0) as usize;
    let max_x = (surface.v1.x.max(surface.v2.x).max(surface.v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = surface.v1.y.min(surface.v2.y).min(surface.v3.y).max(0.0) as usize;
    let max_y = (surface.v1.y.max(surface.v2.y).max(surface.v3.y) + 1.0).min(fb.height as f32) as usize;

    // Early exit for degenerate/off-screen triangles
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Per-vertex (or per-face) lighting
    let (s1, s2, s3) = match settings.shading {
        ShadingMode::None => ((1.0, 1.0, 1.0), (1.0, 1.0, 1.0), (1.0, 1.0, 1.0)),
        ShadingMode::Flat => {
            let center_pos = (surface.w1 + surface.w2 + surface.w3).scale(1.0 / 3.0);
            let world_normal = (surface.wn1 + surface.wn2 + surface.wn3).scale(1.0 / 3.0).normalize();
            let s = shade_multi_light_color(world_normal, center_pos, &settings.lights, settings.ambient);
            (s, s, s)
        }
        ShadingMode::Gouraud => (
            shade_multi_light_color(surface.wn1, surface.w1, &settings.lights, settings.ambient),
            shade_multi_light_color(surface.wn2, surface.w2, &settings.lights, settings.ambient),
            shade_multi_light_color(surface.wn3, surface.w3, &settings.lights, settings.ambient),
        ),
    };
    let lit1 = shade_color_rgb(surface.c1, s1.0, s1.1, s1.2);
    let lit2 = shade_color_rgb(surface.c2, s2.0, s2.1, s2.2);
    let lit3 = shade_color_rgb(surface.c3, s3.0, s3.1, s3.2);

    // === EDGE FUNCTION SETUP ===
    let v1 = surface.v1;
    let v2 = surface.v2;
    let v3 = surface.v3;

    // Triangle area * 2 (used for normalization)
    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 0.00001 {
        return; // Degenerate triangle
    }
    let inv_area = 1.0 / area;

    // Edge function coefficients for bc.x (weight for v1) and bc.y (weight for v2)
    let a0 = v2.y - v3.y;
    let b0 = v3.x - v2.x;
    let a1 = v3.y - v1.y;
    let b1 = v1.x - v3.x;

    // Sample at pixel centers
    let start_x = min_x as f32 + 0.5;
    let start_y = min_y as f32 + 0.5;

    let mut w0_row = a0 * (start_x - v3.x) + b0 * (start_y - v3.y);
    let mut w1_row = a1 * (start_x - v3.x) + b1 * (start_y - v3.y);

    let inv_z1 = 1.0 / v1.z;
    let inv_z2 = 1.0 / v2.z;
    let inv_z3 = 1.0 / v3.z;

    for y in min_y..max_y {
        let mut w0 = w0_row;
        let mut w1 = w1_row;

        for x in min_x..max_x {
            let bc_x = w0 * inv_area;
            let bc_y = w1 * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;

            const ERR: f32 = -0.0001;
            if bc_x >= ERR && bc_y >= ERR && bc_z >= ERR {
                // In screen space 1/z interpolates linearly, not z itself
                let z = 1.0 / (bc_x * inv_z1 + bc_y * inv_z2 + bc_z * inv_z3);

                let idx = y * fb.width + x;
                if z < fb.zbuffer[idx] {
                    let mut color = Color::new(
                        (bc_x * lit1.r as f32 + bc_y * lit2.r as f32 + bc_z * lit3.r as f32) as u8,
                        (bc_x * lit1.g as f32 + bc_y * lit2.g as f32 + bc_z * lit3.g as f32) as u8,
                        (bc_x * lit1.b as f32 + bc_y * lit2.b as f32 + bc_z * lit3.b as f32) as u8,
                    );

                    if settings.dithering {
                        color = apply_dither(color, x, y);
                    }

                    fb.set_pixel_with_depth(x, y, z, color);
                }
            }

            w0 += a0;
            w1 += a1;
        }

        w0_row += b0;
        w1_row += b1;
    }
}

/// Render world-space geometry into the framebuffer.
/// Returns the number of triangles rasterized.
pub fn render_mesh(
    fb: &mut Framebuffer,
    vertices: &[Vertex],
    faces: &[Face],
    camera: &Camera,
    settings: &RasterSettings,
) -> usize {
    let focal = camera.focal_length(fb.height);

    // Transform all vertices to camera space and project
    let projected: Vec<Vec3> = vertices
        .iter()
        .map(|v| {
            let cam = camera.to_camera_space(v.pos);
            super::math::project(cam, focal, fb.width, fb.height)
        })
        .collect();

    let mut drawn = 0;
    for face in faces {
        let (Some(p1), Some(p2), Some(p3)) = (
            projected.get(face.v0),
            projected.get(face.v1),
            projected.get(face.v2),
        ) else {
            continue;
        };

        // Skip triangles that have ANY vertex behind the near plane
        if p1.z <= NEAR_PLANE || p2.z <= NEAR_PLANE || p3.z <= NEAR_PLANE {
            continue;
        }

        // 2D screen-space backface test. Screen y points down, so
        // counter-clockwise (front) faces have negative area.
        let signed_area = (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y);
        if signed_area.abs() < 1e-6 {
            continue;
        }
        let is_backface = signed_area > 0.0;
        if is_backface && settings.backface_cull {
            continue;
        }

        let (a, b, c) = (&vertices[face.v0], &vertices[face.v1], &vertices[face.v2]);
        // Back faces are lit from their visible side
        let flip = if is_backface { -1.0 } else { 1.0 };
        let surface = Surface {
            v1: *p1,
            v2: *p2,
            v3: *p3,
            w1: a.pos,
            w2: b.pos,
            w3: c.pos,
            wn1: a.normal.scale(flip),
            wn2: b.normal.scale(flip),
            wn3: c.normal.scale(flip),
            c1: a.color,
            c2: b.color,
            c3: c.color,
        };
        rasterize_triangle(fb, &surface, settings);
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::types::Light;

    fn front_camera() -> Camera {
        let mut cam = Camera::new(50.0);
        cam.look_at(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO);
        cam
    }

    fn quad(z: f32, size: f32, color: Color) -> (Vec<Vertex>, Vec<Face>) {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let verts = vec![
            Vertex::new(Vec3::new(-size, -size, z), n, color),
            Vertex::new(Vec3::new(size, -size, z), n, color),
            Vertex::new(Vec3::new(size, size, z), n, color),
            Vertex::new(Vec3::new(-size, size, z), n, color),
        ];
        (verts, vec![Face::new(0, 1, 2), Face::new(0, 2, 3)])
    }

    #[test]
    fn test_unlit_quad_fills_center() {
        let mut fb = Framebuffer::new(64, 48);
        fb.clear(Color::BLACK);
        let (verts, faces) = quad(0.0, 1.0, Color::new(200, 10, 10));
        let settings = RasterSettings { shading: ShadingMode::None, lights: vec![], ..RasterSettings::default() };

        let drawn = render_mesh(&mut fb, &verts, &faces, &front_camera(), &settings);
        assert_eq!(drawn, 2);
        let c = fb.get_pixel(32, 24).unwrap();
        assert!(c.r > 190 && c.g < 20);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_nearer_surface_wins() {
        let mut fb = Framebuffer::new(64, 48);
        fb.clear(Color::BLACK);
        let settings = RasterSettings { shading: ShadingMode::None, lights: vec![], ..RasterSettings::default() };
        let cam = front_camera();

        let (near_v, near_f) = quad(1.0, 0.5, Color::new(0, 0, 255));
        let (far_v, far_f) = quad(-1.0, 2.0, Color::new(0, 255, 0));
        render_mesh(&mut fb, &near_v, &near_f, &cam, &settings);
        render_mesh(&mut fb, &far_v, &far_f, &cam, &settings);

        let center = fb.get_pixel(32, 24).unwrap();
        assert!(center.b > 200 && center.g < 20);
    }

    #[test]
    fn test_front_faces_survive_culling() {
        let mut fb = Framebuffer::new(64, 48);
        fb.clear(Color::BLACK);
        let (verts, faces) = quad(0.0, 1.0, Color::WHITE);
        let settings = RasterSettings {
            backface_cull: true,
            lights: vec![Light::spot(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, 1.0, 0.5, 1.0)],
            ambient: 0.0,
            ..RasterSettings::default()
        };

        assert_eq!(render_mesh(&mut fb, &verts, &faces, &front_camera(), &settings), 2);
        // Lit from the camera side, so the facing side is bright
        assert!(fb.get_pixel(32, 24).unwrap().r > 200);

        // Reversed winding faces away and is culled
        let reversed: Vec<Face> = faces.iter().map(|f| Face::new(f.v0, f.v2, f.v1)).collect();
        assert_eq!(render_mesh(&mut fb, &verts, &reversed, &front_camera(), &settings), 0);
    }

    #[test]
    fn test_flat_shading_lights_whole_face_evenly() {
        let mut fb = Framebuffer::new(64, 48);
        fb.clear(Color::BLACK);
        let (verts, faces) = quad(0.0, 1.0, Color::WHITE);
        // Wide cone so every vertex is lit, but from off to one side
        let spot = Light::spot(Vec3::new(3.0, 0.0, 1.0), Vec3::ZERO, 1.5, 0.0, 1.0);
        let settings = RasterSettings { shading: ShadingMode::Flat, lights: vec![spot], ambient: 0.0, ..RasterSettings::default() };

        render_mesh(&mut fb, &verts, &faces, &front_camera(), &settings);
        // Two pixels inside the same triangle get one light value
        let a = fb.get_pixel(30, 32).unwrap();
        let b = fb.get_pixel(34, 32).unwrap();
        assert!(a.r > 0);
        assert!((a.r as i32 - b.r as i32).abs() <= 1);
    }

    #[test]
    fn test_spot_cone_limits_light() {
        let spot = Light::spot(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, 0.1, 1.0, 1.0);
        let up = Vec3::UP;
        let (inside, _, _) = shade_multi_light_color(up, Vec3::ZERO, &[spot.clone()], 0.0);
        let (outside, _, _) = shade_multi_light_color(up, Vec3::new(5.0, 0.0, 0.0), &[spot], 0.0);
        assert!(inside > 0.9);
        assert_eq!(outside, 0.0);
    }

    #[test]
    fn test_hemisphere_tints_by_normal() {
        let hemi = Light::hemisphere(Color::new(255, 0, 0), Color::new(0, 0, 255), 1.0);
        let (r, _, b) = shade_multi_light_color(Vec3::UP, Vec3::ZERO, &[hemi.clone()], 0.0);
        assert!(r > 0.99 && b < 0.01);
        let (r, _, b) = shade_multi_light_color(-Vec3::UP, Vec3::ZERO, &[hemi], 0.0);
        assert!(r < 0.01 && b > 0.99);
    }

    #[test]
    fn test_gradient_clear() {
        let mut fb = Framebuffer::new(4, 3);
        fb.clear_gradient(Color::WHITE, Color::BLACK);
        assert_eq!(fb.get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(3, 2), Some(Color::BLACK));
        assert!(fb.zbuffer.iter().all(|z| *z == f32::MAX));
    }
}
