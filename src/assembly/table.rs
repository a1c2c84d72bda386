//! Part table loading
//!
//! The table ships inside the binary; a file on disk can replace it at
//! startup (native only). A broken override falls back to the embedded copy.

use super::part::{PartDef, PartNode};
use crate::model::GeometryLibrary;
use crate::rasterizer::{mat4_identity, mat4_mul, Mat4};
use crate::store::MaterialId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Embedded copy of `assets/parts.ron`
pub const EMBEDDED_PARTS: &str = include_str!("../../assets/parts.ron");

#[derive(Debug, Error)]
pub enum PartTableError {
    #[error("failed to read part table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse part table: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("part table has no meshes")]
    Empty,
}

/// Root of the part table file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTable {
    pub nodes: Vec<PartNode>,
}

/// A mesh with its group transforms folded in
#[derive(Debug, Clone)]
pub struct FlatPart {
    pub geometry: String,
    pub material: MaterialId,
    /// Local placement under the assembly root
    pub transform: Mat4,
}

impl PartTable {
    pub fn parse(source: &str) -> Result<Self, PartTableError> {
        let table: PartTable = ron::from_str(source)?;
        if table.mesh_count() == 0 {
            return Err(PartTableError::Empty);
        }
        Ok(table)
    }

    pub fn embedded() -> Result<Self, PartTableError> {
        Self::parse(EMBEDDED_PARTS)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, PartTableError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Use the file at `path` when given and valid, otherwise the embedded table
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self, PartTableError> {
        if let Some(path) = path {
            match Self::load_from_file(path) {
                Ok(table) => {
                    log::info!("Loaded part table from {}", path.display());
                    return Ok(table);
                }
                Err(e) => log::warn!("Ignoring part table {}: {}", path.display(), e),
            }
        }
        Self::embedded()
    }

    /// Total number of meshes, including those inside groups
    pub fn mesh_count(&self) -> usize {
        fn count(nodes: &[PartNode]) -> usize {
            nodes
                .iter()
                .map(|n| match n {
                    PartNode::Mesh(_) => 1,
                    PartNode::Group(g) => count(&g.children),
                })
                .sum()
        }
        count(&self.nodes)
    }

    /// Every mesh in table order with its full local transform and its
    /// material resolved against `library`
    pub fn flatten(&self, library: &GeometryLibrary) -> Vec<FlatPart> {
        let mut out = Vec::with_capacity(self.mesh_count());
        flatten_into(&self.nodes, &mat4_identity(), library, &mut out);
        out
    }
}

fn flatten_into(nodes: &[PartNode], parent: &Mat4, library: &GeometryLibrary, out: &mut Vec<FlatPart>) {
    for node in nodes {
        match node {
            PartNode::Mesh(part) => out.push(flat_part(part, parent, library)),
            PartNode::Group(group) => {
                let transform = mat4_mul(parent, &group.transform());
                flatten_into(&group.children, &transform, library, out);
            }
        }
    }
}

fn flat_part(part: &PartDef, parent: &Mat4, library: &GeometryLibrary) -> FlatPart {
    FlatPart {
        geometry: part.geometry.clone(),
        material: part.material.resolve(&part.geometry, library),
        transform: mat4_mul(parent, &part.transform()),
    }
}
