//! Core types for the rasterizer

use super::math::Vec3;
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    /// Mid grey used for surfaces that have no material at all
    pub const NEUTRAL: Color = Color { r: 128, g: 128, b: 128 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From linear 0.0-1.0 float channels (glTF base color factors)
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Interpolate between two colors
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;
        Self {
            r: (self.r as f32 * inv_t + other.r as f32 * t) as u8,
            g: (self.g as f32 * inv_t + other.g as f32 * t) as u8,
            b: (self.b as f32 * inv_t + other.b as f32 * t) as u8,
        }
    }

    /// Channels as 0.0-1.0 floats
    pub fn to_f32(self) -> (f32, f32, f32) {
        (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
    }

    /// Convert to [u8; 4] for framebuffer (RGBA, always opaque)
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// A vertex with position, normal, and surface color
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub pos: Vec3,
    pub normal: Vec3,
    /// Surface (albedo) color before lighting
    pub color: Color,
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3, color: Color) -> Self {
        Self { pos, normal, color }
    }
}

/// A triangle face (indices into vertex array)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }
}

/// Shading mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    None,     // No shading, raw vertex colors
    Flat,     // One light calculation per face
    #[default]
    Gouraud,  // Interpolate vertex lighting
}

/// Light type
#[derive(Debug, Clone, Copy)]
pub enum LightType {
    /// Spot light aimed along `direction`.
    /// `angle` is the half-angle of the cone in radians; `penumbra` (0-1) is
    /// the fraction of the cone that fades out toward the edge. A `radius`
    /// of 0 means no distance falloff.
    Spot { position: Vec3, direction: Vec3, angle: f32, penumbra: f32, radius: f32 },
    /// Sky/ground fill: normals facing up get `sky`, facing down get `ground`
    Hemisphere { sky: Color, ground: Color },
}

/// A light source in the scene
#[derive(Debug, Clone)]
pub struct Light {
    pub light_type: LightType,
    pub color: Color,
    pub intensity: f32,
    pub enabled: bool,
    pub name: String,
}

impl Light {
    /// Create a new spot light pointing from `position` at `target`
    pub fn spot(position: Vec3, target: Vec3, angle: f32, penumbra: f32, intensity: f32) -> Self {
        Self {
            light_type: LightType::Spot {
                position,
                direction: (target - position).normalize(),
                angle,
                penumbra: penumbra.clamp(0.0, 1.0),
                radius: 0.0,
            },
            color: Color::WHITE,
            intensity,
            enabled: true,
            name: String::from("Spot"),
        }
    }

    /// Create a sky/ground fill light
    pub fn hemisphere(sky: Color, ground: Color, intensity: f32) -> Self {
        Self {
            light_type: LightType::Hemisphere { sky, ground },
            color: Color::WHITE,
            intensity,
            enabled: true,
            name: String::from("Hemisphere"),
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone)]
pub struct RasterSettings {
    /// Shading mode
    pub shading: ShadingMode,
    /// Backface culling
    pub backface_cull: bool,
    /// Scene lights (multiple light sources)
    pub lights: Vec<Light>,
    /// Ambient light intensity (0.0-1.0)
    pub ambient: f32,
    /// Enable ordered dithering (4x4 Bayer matrix)
    pub dithering: bool,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Gouraud,
            backface_cull: false,
            lights: Vec::new(),
            ambient: 0.3,
            dithering: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32_rounds_and_clamps() {
        assert_eq!(Color::from_f32(1.0, 0.5, -2.0), Color::new(255, 128, 0));
    }

    #[test]
    fn test_spot_aims_at_target() {
        let light = Light::spot(Vec3::new(10.0, 15.0, 10.0), Vec3::ZERO, 0.1, 1.0, 0.5);
        match light.light_type {
            LightType::Spot { direction, penumbra, .. } => {
                let expected = Vec3::new(-10.0, -15.0, -10.0).normalize();
                assert!((direction - expected).len() < 0.001);
                assert_eq!(penumbra, 1.0);
            }
            _ => panic!("expected spot light"),
        }
    }
}
