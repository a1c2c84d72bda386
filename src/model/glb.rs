//! glTF / GLB reader
//!
//! Pulls named geometries and material base colors out of a binary glTF.
//! Vertices stay in each node's local space; placement comes from the part
//! table.

use super::{AssetError, Geometry, ModelAsset};
use crate::rasterizer::{Color, Face, Vec3};
use base64::Engine;
use gltf::Gltf;

/// Parse a `.glb` (or self-contained `.gltf`) from memory
pub fn parse(bytes: &[u8]) -> Result<ModelAsset, AssetError> {
    let gltf = Gltf::from_slice(bytes).map_err(|e| AssetError::Parse(e.to_string()))?;
    let buffers = load_buffers(&gltf)?;

    let mut asset = ModelAsset::default();

    for material in gltf.materials() {
        let Some(name) = material.name() else { continue };
        let [r, g, b, _] = material.pbr_metallic_roughness().base_color_factor();
        asset.materials.insert(name.to_string(), Color::from_f32(r, g, b));
    }

    for node in gltf.nodes() {
        let (Some(name), Some(mesh)) = (node.name(), node.mesh()) else { continue };
        let primitive_count = mesh.primitives().count();

        for (i, primitive) in mesh.primitives().enumerate() {
            // Multi-material meshes are split into one geometry per primitive
            let key = if primitive_count == 1 {
                name.to_string()
            } else {
                format!("{}_{}", name, i + 1)
            };

            match load_primitive(&primitive, &buffers) {
                Some(geometry) => {
                    if let Some(material) = primitive.material().name() {
                        asset.node_materials.insert(key.clone(), material.to_string());
                    }
                    asset.geometries.insert(key, geometry);
                }
                None => log::warn!("Skipping unreadable primitive '{}' (compressed or empty)", key),
            }
        }
    }

    log::info!(
        "Parsed model: {} geometries, {} materials",
        asset.geometries.len(),
        asset.materials.len()
    );
    Ok(asset)
}

fn load_buffers(gltf: &Gltf) -> Result<Vec<Vec<u8>>, AssetError> {
    let mut buffers = Vec::new();

    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_ref() {
                Some(blob) => buffers.push(blob.clone()),
                None => return Err(AssetError::Parse("missing embedded buffer".into())),
            },
            gltf::buffer::Source::Uri(uri) => {
                buffers.push(decode_data_uri(uri)?);
            }
        }
    }

    Ok(buffers)
}

/// Only base64 `data:` URIs are accepted; the viewer has no file search path
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, AssetError> {
    let (header, data) = uri
        .split_once(',')
        .ok_or_else(|| AssetError::Parse(format!("unsupported buffer uri '{}'", uri)))?;

    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(AssetError::Parse(format!("unsupported buffer uri '{}'", header)));
    }

    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| AssetError::Parse(format!("bad base64 buffer: {}", e)))
}

fn load_primitive(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Option<Geometry> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return None;
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.as_slice()));

    let positions: Vec<Vec3> = reader.read_positions()?.map(Vec3::from).collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let faces: Vec<Face> = indices
        .chunks_exact(3)
        .map(|t| Face::new(t[0] as usize, t[1] as usize, t[2] as usize))
        .filter(|f| f.v0 < positions.len() && f.v1 < positions.len() && f.v2 < positions.len())
        .collect();

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(iter) => iter.map(Vec3::from).collect(),
        None => Vec::new(),
    };

    let mut geometry = Geometry { positions, normals, faces };
    if geometry.normals.len() != geometry.positions.len() {
        geometry.compute_normals();
    }
    Some(geometry)
}
