//! Scooter model assets
//!
//! `ModelAsset` is whatever the model file provided: named geometries and
//! material base colors. `GeometryLibrary` sits on top and always answers,
//! falling back to procedural shapes for geometries the file lacks (or when
//! there is no file at all).

mod glb;
pub mod primitives;

#[cfg(test)]
pub(crate) use glb::tests::triangle_glb;

use crate::rasterizer::{Color, Face, Vec3};
use primitives::PrimitiveKind;
use std::collections::HashMap;
use thiserror::Error;

/// Error type for model loading
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Triangle mesh in local (node) space
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, same length as `positions`
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Geometry {
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position);
        self.normals.push(normal);
    }

    /// Axis-aligned bounds, `None` when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Area-weighted smooth normals from face winding
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for face in &self.faces {
            let a = self.positions[face.v0];
            let b = self.positions[face.v1];
            let c = self.positions[face.v2];
            let n = (b - a).cross(c - a);
            normals[face.v0] = normals[face.v0] + n;
            normals[face.v1] = normals[face.v1] + n;
            normals[face.v2] = normals[face.v2] + n;
        }
        self.normals = normals.into_iter().map(Vec3::normalize).collect();
    }
}

/// Contents of a model file
#[derive(Debug, Clone, Default)]
pub struct ModelAsset {
    pub geometries: HashMap<String, Geometry>,
    /// Material name -> base color
    pub materials: HashMap<String, Color>,
    /// Geometry name -> name of the material its primitive uses
    pub node_materials: HashMap<String, String>,
}

impl ModelAsset {
    pub fn from_glb(bytes: &[u8]) -> Result<Self, AssetError> {
        glb::parse(bytes)
    }
}

/// Load a model file through macroquad (works on native and web)
pub async fn load_model(path: &str) -> Result<ModelAsset, AssetError> {
    let bytes = macroquad::prelude::load_file(path)
        .await
        .map_err(|e| AssetError::Io(format!("{}: {}", path, e)))?;
    ModelAsset::from_glb(&bytes)
}

/// Base colors for the scooter's material slots when the model file is
/// missing or does not define them
const FALLBACK_MATERIALS: &[(&str, Color)] = &[
    ("Claxon", Color::new(225, 225, 225)),
    ("Cylinder019", Color::new(225, 225, 225)),
    ("material", Color::new(225, 225, 225)),
    ("Far", Color::new(250, 245, 225)),
    ("Sticla far", Color::new(190, 215, 235)),
    ("Disc frana", Color::new(150, 150, 155)),
    ("Metal 2.001", Color::new(175, 178, 185)),
    ("Inscriptie", Color::new(30, 30, 30)),
];

/// Default surface color for unknown materials
const FALLBACK_SURFACE: Color = Color::new(60, 60, 64);

/// Where a resolved geometry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySource {
    Model,
    Procedural(PrimitiveKind),
}

/// Geometry and material lookup for the part assembly
pub struct GeometryLibrary {
    asset: ModelAsset,
    cylinder: Geometry,
    torus: Geometry,
    cube: Geometry,
    plane: Geometry,
}

impl GeometryLibrary {
    pub fn new(asset: ModelAsset) -> Self {
        Self {
            asset,
            cylinder: PrimitiveKind::Cylinder.build(),
            torus: PrimitiveKind::Torus.build(),
            cube: PrimitiveKind::Cube.build(),
            plane: PrimitiveKind::Plane.build(),
        }
    }

    /// Library with no model file, every part procedural
    pub fn procedural() -> Self {
        Self::new(ModelAsset::default())
    }

    /// Geometry for a part. Never fails: unknown names get a stand-in.
    pub fn resolve(&self, name: &str) -> (&Geometry, GeometrySource) {
        if let Some(geometry) = self.asset.geometries.get(name) {
            return (geometry, GeometrySource::Model);
        }
        let kind = PrimitiveKind::for_geometry(name);
        let geometry = match kind {
            PrimitiveKind::Cylinder => &self.cylinder,
            PrimitiveKind::Torus => &self.torus,
            PrimitiveKind::Cube => &self.cube,
            PrimitiveKind::Plane => &self.plane,
        };
        (geometry, GeometrySource::Procedural(kind))
    }

    /// Base color of a material slot, before any user recoloring
    pub fn material_color(&self, material: &str) -> Color {
        if let Some(color) = self.asset.materials.get(material) {
            return *color;
        }
        FALLBACK_MATERIALS
            .iter()
            .find(|(name, _)| *name == material)
            .map(|(_, color)| *color)
            .unwrap_or(FALLBACK_SURFACE)
    }

    /// Material the model assigns to a geometry, if it names one
    pub fn node_material(&self, geometry: &str) -> Option<&str> {
        self.asset.node_materials.get(geometry).map(String::as_str)
    }

    pub fn has_model(&self) -> bool {
        !self.asset.geometries.is_empty()
    }
}
