//! Vector math for 3D rendering

use std::ops::{Add, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

/// Transform a vertex by camera basis vectors (rotation)
pub fn perspective_transform(v: Vec3, cam_x: Vec3, cam_y: Vec3, cam_z: Vec3) -> Vec3 {
    Vec3 {
        x: v.dot(cam_x),
        y: v.dot(cam_y),
        z: v.dot(cam_z),
    }
}

/// Distance from the eye to the near plane, in world units
pub const NEAR_PLANE: f32 = 0.05;

/// Project a camera-space point to framebuffer coordinates.
///
/// `focal` is the focal length in pixels (see `Camera::focal_length`).
/// Returns a Vec3 where x,y are screen coords and z is the camera-space depth.
pub fn project(v: Vec3, focal: f32, width: usize, height: usize) -> Vec3 {
    if v.z.abs() < 0.0001 {
        return Vec3::new(width as f32 / 2.0, height as f32 / 2.0, v.z);
    }

    Vec3 {
        x: v.x * focal / v.z + width as f32 / 2.0,
        y: v.y * focal / v.z + height as f32 / 2.0,
        z: v.z,
    }
}

/// Calculate barycentric coordinates for point p in triangle (v1, v2, v3)
/// Returns (u, v, w) where u + v + w = 1 if point is inside triangle
pub fn barycentric(p: Vec3, v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    let d = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);

    if d.abs() < 0.00001 {
        return Vec3::new(-1.0, -1.0, -1.0); // Degenerate triangle
    }

    let u = ((v2.y - v3.y) * (p.x - v3.x) + (v3.x - v2.x) * (p.y - v3.y)) / d;
    let v = ((v3.y - v1.y) * (p.x - v3.x) + (v1.x - v3.x) * (p.y - v3.y)) / d;
    let w = 1.0 - u - v;

    Vec3::new(u, v, w)
}

/// Test if point is inside 2D triangle using sign-based edge test.
/// Works regardless of triangle winding order.
pub fn point_in_triangle_2d(
    px: f32, py: f32,      // Point
    x1: f32, y1: f32,      // Triangle v1
    x2: f32, y2: f32,      // Triangle v2
    x3: f32, y3: f32,      // Triangle v3
) -> bool {
    fn sign(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
        (px - bx) * (ay - by) - (ax - bx) * (py - by)
    }

    let d1 = sign(px, py, x1, y1, x2, y2);
    let d2 = sign(px, py, x2, y2, x3, y3);
    let d3 = sign(px, py, x3, y3, x1, y1);

    let has_neg = (d1 < 0.0) || (d2 < 0.0) || (d3 < 0.0);
    let has_pos = (d1 > 0.0) || (d2 > 0.0) || (d3 > 0.0);

    // Point is inside if all signs are same (all positive or all negative)
    !(has_neg && has_pos)
}

// =============================================================================
// 4x4 Matrix operations (for transforms)
// =============================================================================

/// 4x4 transformation matrix type (row-major, column vectors)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub fn mat4_identity() -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create translation matrix
pub fn mat4_translation(t: Vec3) -> Mat4 {
    [
        [1.0, 0.0, 0.0, t.x],
        [0.0, 1.0, 0.0, t.y],
        [0.0, 0.0, 1.0, t.z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create per-axis scale matrix
pub fn mat4_scale(s: Vec3) -> Mat4 {
    [
        [s.x, 0.0, 0.0, 0.0],
        [0.0, s.y, 0.0, 0.0],
        [0.0, 0.0, s.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Build a rotation matrix from euler angles (radians).
/// Order XYZ: the matrix is Rx * Ry * Rz, so Z is applied first.
pub fn mat4_rotation(rot: Vec3) -> Mat4 {
    let (a, b) = (rot.x.cos(), rot.x.sin());
    let (c, d) = (rot.y.cos(), rot.y.sin());
    let (e, f) = (rot.z.cos(), rot.z.sin());

    let ae = a * e;
    let af = a * f;
    let be = b * e;
    let bf = b * f;

    [
        [c * e, -c * f, d, 0.0],
        [af + be * d, ae - bf * d, -b * c, 0.0],
        [bf - ae * d, be + af * d, a * c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Multiply two 4x4 matrices
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Transform a point by a 4x4 matrix
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
    )
}

/// Transform a surface normal by the upper 3x3 of a matrix.
///
/// Uses the cofactor matrix, which is the inverse-transpose scaled by the
/// determinant, so non-uniform scale keeps normals perpendicular. The result
/// is normalized; a degenerate matrix yields `Vec3::ZERO`.
pub fn mat4_transform_normal(m: &Mat4, n: Vec3) -> Vec3 {
    let c0 = Vec3::new(m[0][0], m[1][0], m[2][0]);
    let c1 = Vec3::new(m[0][1], m[1][1], m[2][1]);
    let c2 = Vec3::new(m[0][2], m[1][2], m[2][2]);

    let r0 = c1.cross(c2);
    let r1 = c2.cross(c0);
    let r2 = c0.cross(c1);

    let out = r0.scale(n.x) + r1.scale(n.y) + r2.scale(n.z);
    // Mirrored transforms flip the cofactor; keep the normal on the same side
    let det = c0.dot(r0);
    if det < 0.0 {
        (-out).normalize()
    } else {
        out.normalize()
    }
}

/// Build a combined transform from position, rotation (radians) and scale
pub fn mat4_from_trs(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    let trans_mat = mat4_translation(position);
    let rot_mat = mat4_rotation(rotation);
    let scale_mat = mat4_scale(scale);
    mat4_mul(&trans_mat, &mat4_mul(&rot_mat, &scale_mat))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 0.001
    }

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_barycentric_inside() {
        let v1 = Vec3::new(0.0, 0.0, 0.0);
        let v2 = Vec3::new(10.0, 0.0, 0.0);
        let v3 = Vec3::new(5.0, 10.0, 0.0);
        let p = Vec3::new(5.0, 3.0, 0.0);
        let bc = barycentric(p, v1, v2, v3);
        assert!(bc.x >= 0.0 && bc.y >= 0.0 && bc.z >= 0.0);
    }

    #[test]
    fn test_point_in_triangle_either_winding() {
        assert!(point_in_triangle_2d(2.0, 2.0, 0.0, 0.0, 10.0, 0.0, 0.0, 10.0));
        assert!(point_in_triangle_2d(2.0, 2.0, 0.0, 0.0, 0.0, 10.0, 10.0, 0.0));
        assert!(!point_in_triangle_2d(8.0, 8.0, 0.0, 0.0, 10.0, 0.0, 0.0, 10.0));
    }

    #[test]
    fn test_rotation_single_axis() {
        let quarter = std::f32::consts::FRAC_PI_2;
        let rz = mat4_rotation(Vec3::new(0.0, 0.0, quarter));
        assert!(close(mat4_transform_point(&rz, Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 1.0, 0.0)));

        let rx = mat4_rotation(Vec3::new(quarter, 0.0, 0.0));
        assert!(close(mat4_transform_point(&rx, Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 0.0, 1.0)));

        let ry = mat4_rotation(Vec3::new(0.0, quarter, 0.0));
        assert!(close(mat4_transform_point(&ry, Vec3::new(0.0, 0.0, 1.0)), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotation_order_is_xyz() {
        // Euler XYZ applies Z first, then Y, then X
        let rot = Vec3::new(0.3, -0.7, 1.1);
        let composed = mat4_mul(
            &mat4_rotation(Vec3::new(rot.x, 0.0, 0.0)),
            &mat4_mul(&mat4_rotation(Vec3::new(0.0, rot.y, 0.0)), &mat4_rotation(Vec3::new(0.0, 0.0, rot.z))),
        );
        let direct = mat4_rotation(rot);
        let p = Vec3::new(0.4, -1.2, 2.5);
        assert!(close(mat4_transform_point(&composed, p), mat4_transform_point(&direct, p)));
    }

    #[test]
    fn test_trs_applies_scale_then_rotation_then_translation() {
        let m = mat4_from_trs(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            Vec3::new(2.0, 1.0, 1.0),
        );
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (1,4,3)
        assert!(close(mat4_transform_point(&m, Vec3::new(1.0, 0.0, 0.0)), Vec3::new(1.0, 4.0, 3.0)));
    }

    #[test]
    fn test_normal_stays_perpendicular_under_nonuniform_scale() {
        let m = mat4_scale(Vec3::new(4.0, 1.0, 1.0));
        // Surface x = y has normal (1,-1,0); after stretching x it becomes x = 4y
        let n = mat4_transform_normal(&m, Vec3::new(1.0, -1.0, 0.0).normalize());
        let tangent = mat4_transform_point(&m, Vec3::new(1.0, 1.0, 0.0));
        assert!(n.dot(tangent).abs() < 0.001);
        assert!((n.len() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_project_centers_points_on_axis() {
        let p = project(Vec3::new(0.0, 0.0, 5.0), 100.0, 320, 240);
        assert!((p.x - 160.0).abs() < 0.001 && (p.y - 120.0).abs() < 0.001);
        let q = project(Vec3::new(1.0, 0.0, 2.0), 100.0, 320, 240);
        assert!((q.x - 210.0).abs() < 0.001);
        assert!((q.z - 2.0).abs() < 0.001);
    }
}
