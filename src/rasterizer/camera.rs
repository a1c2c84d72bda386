//! Camera for 3D rendering
//!
//! Provides camera positioning and orientation for perspective projection.

use super::math::{perspective_transform, project, Vec3, NEAR_PLANE};

/// Camera state for 3D rendering
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch
    pub rotation_y: f32, // Yaw
    /// Vertical field of view in degrees
    pub fov_y: f32,

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new(fov_y: f32) -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            fov_y,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        let upward = Vec3::new(0.0, -1.0, 0.0);  // Use -Y as up to match screen coordinates

        // Forward vector based on rotation
        self.basis_z = Vec3 {
            x: self.rotation_x.cos() * self.rotation_y.sin(),
            y: -self.rotation_x.sin(),
            z: self.rotation_x.cos() * self.rotation_y.cos(),
        };

        // Right vector
        self.basis_x = upward.cross(self.basis_z).normalize();

        // Up vector
        self.basis_y = self.basis_z.cross(self.basis_x);
    }

    /// Place the camera `distance` away from `target`, looking at it.
    /// `yaw` turns around the vertical axis, `pitch` tilts (0 = level).
    pub fn orbit(&mut self, target: Vec3, distance: f32, yaw: f32, pitch: f32) {
        self.rotation_x = pitch;
        self.rotation_y = yaw;
        self.update_basis();
        // Camera sits behind the target along the forward direction
        self.position = target - self.basis_z * distance;
    }

    /// Point the camera from `position` at `target`
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        let dir = (target - position).normalize();
        let pitch = (-dir.y).clamp(-1.0, 1.0).asin();
        let yaw = dir.x.atan2(dir.z);
        self.rotation_x = pitch;
        self.rotation_y = yaw;
        self.position = position;
        self.update_basis();
    }

    /// Focal length in pixels for a framebuffer of the given height
    pub fn focal_length(&self, fb_height: usize) -> f32 {
        let half_fov = (self.fov_y.to_radians() * 0.5).max(0.01);
        (fb_height as f32 * 0.5) / half_fov.tan()
    }

    /// World point into camera space (x right, y down, z forward)
    pub fn to_camera_space(&self, world_pos: Vec3) -> Vec3 {
        perspective_transform(world_pos - self.position, self.basis_x, self.basis_y, self.basis_z)
    }

    /// Project a world-space point to framebuffer coordinates with depth.
    /// Returns `None` when the point is behind the near plane.
    pub fn world_to_screen(&self, world_pos: Vec3, fb_width: usize, fb_height: usize) -> Option<Vec3> {
        let cam = self.to_camera_space(world_pos);
        if cam.z <= NEAR_PLANE {
            return None;
        }
        Some(project(cam, self.focal_length(fb_height), fb_width, fb_height))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(50.0)
    }
}
