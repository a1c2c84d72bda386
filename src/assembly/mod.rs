//! Part assembly
//!
//! The scooter is a flat list of parts placed under one animated root. Each
//! part is identified by its material; if that material is recolorable, the
//! color in the store replaces the model's own.
//!
//! # Module Organization
//!
//! - `part` - part table entries (mesh, group, material reference)
//! - `table` - loading and flattening the part table
//! - `hit` - screen-space picking
//! - `events` - enter/leave/down/missed routing and hover state

pub mod events;
pub mod hit;
pub mod part;
pub mod table;

pub use events::{HoverState, PointerEvent, PointerInput, PointerRouter};
pub use hit::{hit_test, Hit};
pub use part::{GroupDef, MaterialRef, PartDef, PartNode};
pub use table::{PartTable, PartTableError};

use crate::model::GeometryLibrary;
use crate::rasterizer::{
    mat4_identity, mat4_mul, mat4_transform_normal, mat4_transform_point, Color, Face, Mat4, Vec3, Vertex,
};
use crate::rasterizer::math::{mat4_scale, mat4_translation};
use crate::store::{MaterialId, SceneState};
use table::FlatPart;

/// World-space triangles for one frame, with the part that owns each face
#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    /// Part index per face
    pub owners: Vec<usize>,
    /// Material per part index
    pub materials: Vec<MaterialId>,
}

impl SceneMesh {
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.pos;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(v.pos), max.max(v.pos))),
        )
    }
}

pub struct Assembly {
    parts: Vec<FlatPart>,
    /// Recenters the authored model on the origin at unit radius
    framing: Mat4,
}

impl Assembly {
    pub fn new(table: &PartTable, library: &GeometryLibrary) -> Self {
        let parts = table.flatten(library);
        let framing = compute_framing(&parts, library);
        log::info!("Assembly: {} parts", parts.len());
        Self { parts, framing }
    }

    pub fn parts(&self) -> &[FlatPart] {
        &self.parts
    }

    pub fn framing(&self) -> &Mat4 {
        &self.framing
    }

    /// Color a part is drawn with: the store's color when the material is
    /// recolorable and the value parses, the model's own otherwise
    pub fn surface_color(material: &MaterialId, state: &SceneState, library: &GeometryLibrary) -> Color {
        state
            .color(material)
            .and_then(|hex| hex.to_rgb())
            .map(|(r, g, b)| Color::new(r, g, b))
            .unwrap_or_else(|| library.material_color(material.as_str()))
    }

    /// Place every part in world space under `root`
    pub fn build_mesh(&self, root: &Mat4, state: &SceneState, library: &GeometryLibrary) -> SceneMesh {
        let mut mesh = SceneMesh::default();
        let placed = mat4_mul(root, &self.framing);

        for (index, part) in self.parts.iter().enumerate() {
            let (geometry, _) = library.resolve(&part.geometry);
            let world = mat4_mul(&placed, &part.transform);
            let color = Self::surface_color(&part.material, state, library);

            let base = mesh.vertices.len();
            for (pos, normal) in geometry.positions.iter().zip(&geometry.normals) {
                mesh.vertices.push(Vertex::new(
                    mat4_transform_point(&world, *pos),
                    mat4_transform_normal(&world, *normal),
                    color,
                ));
            }
            for face in &geometry.faces {
                mesh.faces.push(Face::new(base + face.v0, base + face.v1, base + face.v2));
                mesh.owners.push(index);
            }
            mesh.materials.push(part.material.clone());
        }

        mesh
    }
}

/// Scale and offset that fit all parts inside a unit sphere at the origin
fn compute_framing(parts: &[FlatPart], library: &GeometryLibrary) -> Mat4 {
    let mut bounds: Option<(Vec3, Vec3)> = None;
    let mut points = Vec::new();

    for part in parts {
        let (geometry, _) = library.resolve(&part.geometry);
        for pos in &geometry.positions {
            let p = mat4_transform_point(&part.transform, *pos);
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(p), max.max(p)),
                None => (p, p),
            });
            points.push(p);
        }
    }

    let Some((min, max)) = bounds else {
        return mat4_identity();
    };
    let center = (min + max).scale(0.5);
    let radius = points.iter().map(|p| (*p - center).len()).fold(0.0f32, f32::max);
    if radius < 1e-6 {
        return mat4_translation(-center);
    }

    let s = 1.0 / radius;
    mat4_mul(&mat4_scale(Vec3::new(s, s, s)), &mat4_translation(-center))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{triangle_glb, ModelAsset};
    use crate::store::{HexColor, SceneAction, SceneStore};

    fn two_part_table() -> PartTable {
        PartTable::parse(
            r#"PartTable(nodes: [
                Mesh((geometry: "Cube", material: Intrinsic("material"), position: (10.0, 0.0, 0.0))),
                Mesh((geometry: "Torus004", material: Named("Claxon"), position: (14.0, 0.0, 0.0))),
            ])"#,
        )
        .unwrap()
    }

    #[test]
    fn test_framing_fits_unit_sphere() {
        let library = GeometryLibrary::procedural();
        let assembly = Assembly::new(&two_part_table(), &library);
        let mesh = assembly.build_mesh(&mat4_identity(), &SceneState::default(), &library);

        let (min, max) = mesh.bounds().unwrap();
        let center = (min + max).scale(0.5);
        assert!(center.len() < 1e-4);
        assert!(mesh.vertices.iter().all(|v| v.pos.len() <= 1.0 + 1e-4));
        assert!(mesh.vertices.iter().any(|v| v.pos.len() > 0.99));
    }

    #[test]
    fn test_faces_know_their_part() {
        let library = GeometryLibrary::procedural();
        let assembly = Assembly::new(&two_part_table(), &library);
        let mesh = assembly.build_mesh(&mat4_identity(), &SceneState::default(), &library);

        assert_eq!(mesh.faces.len(), mesh.owners.len());
        assert_eq!(mesh.materials, vec![MaterialId::from("material"), MaterialId::from("Claxon")]);
        assert!(mesh.owners.contains(&0) && mesh.owners.contains(&1));
    }

    #[test]
    fn test_store_color_overrides_material() {
        let library = GeometryLibrary::procedural();
        let assembly = Assembly::new(&two_part_table(), &library);
        let mut store = SceneStore::default();
        let claxon = MaterialId::from("Claxon");

        store.dispatch(SceneAction::Select(Some(claxon.clone())));
        store.dispatch(SceneAction::SetSelectedColor(HexColor::from("#ff0000")));

        let mesh = assembly.build_mesh(&mat4_identity(), store.state(), &library);
        let claxon_face = mesh.owners.iter().position(|&o| o == 1).unwrap();
        let vertex = mesh.vertices[mesh.faces[claxon_face].v0];
        assert_eq!(vertex.color, Color::new(255, 0, 0));

        // Default white for the untouched recolorable material
        let cube_face = mesh.owners.iter().position(|&o| o == 0).unwrap();
        assert_eq!(mesh.vertices[mesh.faces[cube_face].v0].color, Color::WHITE);
    }

    #[test]
    fn test_model_material_names_the_part() {
        let library = GeometryLibrary::new(ModelAsset::from_glb(&triangle_glb()).unwrap());
        let table =
            PartTable::parse(r#"PartTable(nodes: [Mesh((geometry: "Torus004", material: Intrinsic("Torus004")))])"#)
                .unwrap();
        let assembly = Assembly::new(&table, &library);
        let mut store = SceneStore::default();

        // Recolorable, so it starts at the store's white rather than the model's red
        let mesh = assembly.build_mesh(&mat4_identity(), store.state(), &library);
        assert_eq!(mesh.materials, vec![MaterialId::from("Claxon")]);
        assert_eq!(mesh.vertices[0].color, Color::WHITE);

        store.dispatch(SceneAction::Select(Some(MaterialId::from("Claxon"))));
        store.dispatch(SceneAction::SetSelectedColor(HexColor::from("#00ff00")));
        let mesh = assembly.build_mesh(&mat4_identity(), store.state(), &library);
        assert!(mesh.vertices.iter().all(|v| v.color == Color::new(0, 255, 0)));
    }

    #[test]
    fn test_model_base_color_for_fixed_material() {
        let library = GeometryLibrary::new(ModelAsset::from_glb(&triangle_glb()).unwrap());
        let table =
            PartTable::parse(r#"PartTable(nodes: [Mesh((geometry: "Torus004", material: Intrinsic("Torus004")))])"#)
                .unwrap();
        let assembly = Assembly::new(&table, &library);

        // Nothing recolorable: the model's own red shows through
        let store = SceneStore::new(&[] as &[&str], HexColor::from("#ffffff"));
        let mesh = assembly.build_mesh(&mat4_identity(), store.state(), &library);
        assert_eq!(mesh.vertices[0].color, Color::new(255, 0, 0));
    }

    #[test]
    fn test_unparseable_color_falls_back_to_material() {
        let library = GeometryLibrary::procedural();
        let mut store = SceneStore::default();
        let claxon = MaterialId::from("Claxon");
        store.dispatch(SceneAction::Select(Some(claxon.clone())));
        store.dispatch(SceneAction::SetSelectedColor(HexColor::from("tomato")));

        assert_eq!(
            Assembly::surface_color(&claxon, store.state(), &library),
            library.material_color("Claxon")
        );
        // Not recolorable at all
        let far = MaterialId::from("Far");
        assert_eq!(Assembly::surface_color(&far, store.state(), &library), library.material_color("Far"));
    }
}
