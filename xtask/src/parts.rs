//! glTF node tree to part table
//!
//! Mesh nodes with one primitive become `Mesh` entries carrying the node's
//! transform. Nodes with several primitives or with children become `Group`
//! entries; their primitives are named `{node}_{n}` starting at 1, the same
//! names the app gives them when it loads the model. Every material is
//! written as `Intrinsic`; shared slots have to be marked `Named` by hand.

use anyhow::{bail, Context, Result};
use std::fmt::Write;

pub fn extract(gltf: &gltf::Gltf) -> Result<String> {
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .context("File has no scene")?;

    let mut body = String::new();
    let mut meshes = 0;
    for node in scene.nodes() {
        write_node(&mut body, &node, 2, &mut meshes)?;
    }
    if meshes == 0 {
        bail!("Scene has no meshes");
    }

    let mut out = String::new();
    writeln!(out, "// Part table extracted from a glTF node tree ({} meshes).", meshes)?;
    writeln!(out, "PartTable(")?;
    writeln!(out, "    nodes: [")?;
    out.push_str(&body);
    writeln!(out, "    ],")?;
    writeln!(out, ")")?;
    Ok(out)
}

fn write_node(out: &mut String, node: &gltf::Node, depth: usize, meshes: &mut usize) -> Result<()> {
    let pad = "    ".repeat(depth);
    let name = node.name().map(str::to_string).unwrap_or_else(|| format!("Node{}", node.index()));
    let (translation, rotation, scale) = node.transform().decomposed();
    let transform = [
        format!("position: {}", tuple(translation)),
        format!("rotation: {}", tuple(quat_to_euler_xyz(rotation))),
        format!("scale: {}", tuple(scale)),
    ];

    let primitives: Vec<_> = node.mesh().map(|m| m.primitives().collect()).unwrap_or_default();
    let children: Vec<_> = node.children().collect();

    if primitives.len() == 1 && children.is_empty() {
        writeln!(out, "{}Mesh((", pad)?;
        writeln!(out, "{}    geometry: {:?},", pad, name)?;
        writeln!(out, "{}    material: {},", pad, material(&primitives[0], &name))?;
        for line in &transform {
            writeln!(out, "{}    {},", pad, line)?;
        }
        writeln!(out, "{})),", pad)?;
        *meshes += 1;
        return Ok(());
    }
    if primitives.is_empty() && children.is_empty() {
        return Ok(());
    }

    writeln!(out, "{}Group((", pad)?;
    for line in &transform {
        writeln!(out, "{}    {},", pad, line)?;
    }
    writeln!(out, "{}    children: [", pad)?;
    for (i, primitive) in primitives.iter().enumerate() {
        let geometry = if primitives.len() > 1 { format!("{}_{}", name, i + 1) } else { name.clone() };
        writeln!(
            out,
            "{}        Mesh((geometry: {:?}, material: {})),",
            pad,
            geometry,
            material(primitive, &geometry)
        )?;
        *meshes += 1;
    }
    for child in &children {
        write_node(out, child, depth + 2, meshes)?;
    }
    writeln!(out, "{}    ],", pad)?;
    writeln!(out, "{})),", pad)?;
    Ok(())
}

fn material(primitive: &gltf::Primitive, fallback: &str) -> String {
    format!("Intrinsic({:?})", primitive.material().name().unwrap_or(fallback))
}

fn tuple(v: [f32; 3]) -> String {
    format!("({}, {}, {})", num(v[0]), num(v[1]), num(v[2]))
}

/// Four decimals, trailing zeros dropped
fn num(v: f32) -> String {
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0');
    let s = if s.ends_with('.') { format!("{}0", s) } else { s.to_string() };
    if s == "-0.0" {
        "0.0".to_string()
    } else {
        s
    }
}

/// Quaternion `[x, y, z, w]` to XYZ Euler angles, matching a rotation
/// matrix composed as Rx * Ry * Rz
fn quat_to_euler_xyz([x, y, z, w]: [f32; 4]) -> [f32; 3] {
    let m11 = 1.0 - 2.0 * (y * y + z * z);
    let m12 = 2.0 * (x * y - z * w);
    let m13 = 2.0 * (x * z + y * w);
    let m22 = 1.0 - 2.0 * (x * x + z * z);
    let m23 = 2.0 * (y * z - x * w);
    let m32 = 2.0 * (y * z + x * w);
    let m33 = 1.0 - 2.0 * (x * x + y * y);

    let ry = m13.clamp(-1.0, 1.0).asin();
    if m13.abs() < 0.999_999 {
        [(-m23).atan2(m33), ry, (-m12).atan2(m11)]
    } else {
        // Gimbal lock: fold Z into X
        [m32.atan2(m22), ry, 0.0]
    }
}
