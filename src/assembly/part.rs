//! Part definitions as authored in the part table

use crate::model::GeometryLibrary;
use crate::rasterizer::{mat4_from_trs, Mat4, Vec3};
use crate::store::MaterialId;
use serde::{Deserialize, Serialize};

/// Which material a mesh uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialRef {
    /// The mesh node's own material
    Intrinsic(MaterialId),
    /// A shared material slot
    Named(MaterialId),
}

impl MaterialRef {
    /// Part identity for hover and selection
    pub fn id(&self) -> &MaterialId {
        match self {
            MaterialRef::Intrinsic(id) | MaterialRef::Named(id) => id,
        }
    }

    /// Identity once a model is loaded. An intrinsic material takes the name
    /// the model gives `geometry`; the authored id is kept when the model
    /// names none.
    pub fn resolve(&self, geometry: &str, library: &GeometryLibrary) -> MaterialId {
        match self {
            MaterialRef::Intrinsic(id) => library.node_material(geometry).map(MaterialId::from).unwrap_or_else(|| id.clone()),
            MaterialRef::Named(id) => id.clone(),
        }
    }
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// A single mesh: geometry name, material and local transform.
/// Rotation is XYZ Euler in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDef {
    pub geometry: String,
    pub material: MaterialRef,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

impl PartDef {
    pub fn transform(&self) -> Mat4 {
        trs(self.position, self.rotation, self.scale)
    }
}

/// Transform node whose children share its placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    pub children: Vec<PartNode>,
}

impl GroupDef {
    pub fn transform(&self) -> Mat4 {
        trs(self.position, self.rotation, self.scale)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartNode {
    Mesh(PartDef),
    Group(GroupDef),
}

fn trs(position: [f32; 3], rotation: [f32; 3], scale: [f32; 3]) -> Mat4 {
    mat4_from_trs(Vec3::from(position), Vec3::from(rotation), Vec3::from(scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{triangle_glb, ModelAsset};

    #[test]
    fn test_material_ref_id() {
        let intrinsic = MaterialRef::Intrinsic(MaterialId::from("Cylinder019"));
        let named = MaterialRef::Named(MaterialId::from("Claxon"));
        assert_eq!(intrinsic.id(), "Cylinder019");
        assert_eq!(named.id(), "Claxon");
    }

    #[test]
    fn test_intrinsic_follows_model_material() {
        let library = GeometryLibrary::new(ModelAsset::from_glb(&triangle_glb()).unwrap());
        let intrinsic = MaterialRef::Intrinsic(MaterialId::from("Torus004"));
        assert_eq!(intrinsic.resolve("Torus004", &library), "Claxon");
        // Geometry the model doesn't have keeps the authored id
        assert_eq!(intrinsic.resolve("Cylinder005", &library), "Torus004");
        assert_eq!(intrinsic.resolve("Torus004", &GeometryLibrary::procedural()), "Torus004");

        let named = MaterialRef::Named(MaterialId::from("Far"));
        assert_eq!(named.resolve("Torus004", &library), "Far");
    }

    #[test]
    fn test_defaults_when_transform_omitted() {
        let part: PartDef = ron::from_str(r#"(geometry: "Cube", material: Intrinsic("material"))"#).unwrap();
        assert_eq!(part.position, [0.0; 3]);
        assert_eq!(part.rotation, [0.0; 3]);
        assert_eq!(part.scale, [1.0; 3]);
    }
}
