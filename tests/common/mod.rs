// Shared with the unit tests of the library
#[path = "../../src/test_support.rs"]
mod test_support;

pub use test_support::TempTree;

pub fn static_mesh(actor: &str, object_path: &str) -> String {
    format!(
        r#"{{ "Type": "StaticMeshComponent", "Name": "StaticMeshComponent0", "Outer": "{}", "Properties": {{
            "StaticMesh": {{ "ObjectName": "StaticMesh'Mesh'", "ObjectPath": "{}" }},
            "RelativeLocation": {{ "X": 100.0, "Y": 100.0, "Z": 100.0 }}
        }} }}"#,
        actor, object_path
    )
}

pub fn gltf(mesh: &str, material: &str) -> String {
    format!(
        r#"{{ "meshes": [ {{ "name": "{}", "primitives": [ {{ "material": 0 }} ] }} ], "materials": [ {{ "name": "{}" }} ] }}"#,
        mesh, material
    )
}
