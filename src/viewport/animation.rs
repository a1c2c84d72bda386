//! Idle float-and-sway animation for the model root

use crate::rasterizer::{mat4_from_trs, Mat4, Vec3};

/// Root transform at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdlePose {
    /// XYZ Euler angles in radians
    pub rotation: Vec3,
    pub position_y: f32,
}

impl IdlePose {
    pub fn matrix(&self) -> Mat4 {
        mat4_from_trs(Vec3::new(0.0, self.position_y, 0.0), self.rotation, Vec3::ONE)
    }
}

/// Pose at `t` seconds since start. Depends on nothing but time.
pub fn idle_pose(t: f32) -> IdlePose {
    let bob = (1.0 + (t / 1.5).sin()) / 20.0;
    IdlePose {
        rotation: Vec3::new((t / 4.0).cos() / 8.0, (t / 4.0).sin() / 8.0, -0.2 - bob),
        position_y: (1.0 + (t / 1.5).sin()) / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: IdlePose, b: IdlePose, eps: f32) -> bool {
        (a.rotation - b.rotation).len() < eps && (a.position_y - b.position_y).abs() < eps
    }

    #[test]
    fn test_pose_at_zero() {
        let pose = idle_pose(0.0);
        assert!((pose.rotation.x - 0.125).abs() < 1e-6);
        assert!(pose.rotation.y.abs() < 1e-6);
        assert!((pose.rotation.z + 0.25).abs() < 1e-6);
        assert!((pose.position_y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_pose_is_bounded() {
        for i in 0..10_000 {
            let pose = idle_pose(i as f32 * 0.037);
            assert!(pose.rotation.x.abs() <= 0.125 + 1e-6);
            assert!(pose.rotation.y.abs() <= 0.125 + 1e-6);
            assert!(pose.rotation.z <= -0.2 + 1e-6 && pose.rotation.z >= -0.3 - 1e-6);
            assert!(pose.position_y >= -1e-6 && pose.position_y <= 0.2 + 1e-6);
        }
    }

    #[test]
    fn test_pose_is_continuous() {
        let dt = 1e-3;
        for i in 0..1000 {
            let t = i as f32 * 0.1;
            assert!(close(idle_pose(t), idle_pose(t + dt), 1e-3), "jump at t={}", t);
        }
    }

    #[test]
    fn test_pose_is_periodic() {
        // sin(t/1.5) repeats every 3*pi, sin/cos(t/4) every 8*pi
        let period = 24.0 * PI;
        for t in [0.0f32, 1.0, 2.5, 7.0] {
            assert!(close(idle_pose(t), idle_pose(t + period), 1e-3));
        }
    }
}
