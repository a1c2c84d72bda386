//! Software rasterizer
//!
//! Features:
//! - Perspective projection from a vertical field of view
//! - Flat and Gouraud shading with directional, point, spot and hemisphere lights
//! - Z-buffer
//! - Optional ordered dithering
//!
//! # Module Organization
//!
//! - `types` - Color, Light, Vertex, Face, RasterSettings
//! - `math` - Vec3, Mat4, projection and 2D triangle helpers
//! - `camera` - Camera struct for 3D rendering
//! - `render` - Framebuffer and mesh rendering functions

pub mod camera;
pub mod math;
pub mod render;
pub mod types;

pub use types::{Color, Face, Light, LightType, RasterSettings, ShadingMode, Vertex};

pub use math::{
    Vec3, Mat4, NEAR_PLANE,
    barycentric, point_in_triangle_2d,
    mat4_identity, mat4_mul, mat4_transform_point, mat4_transform_normal, mat4_from_trs,
};

pub use camera::Camera;

pub use render::{Framebuffer, render_mesh};
