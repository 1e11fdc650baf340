use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Serialize;
use thiserror::Error;
use umap_files::common::object_path::split_object_path;
use umap_files::entity::types::PropertyMap;

use crate::resolver::ComponentLookup;

pub mod coordinate_systems;
pub mod game_light;
pub mod game_sound;
/// Turn raw entities into placeable records, without touching the scene.
pub mod skeletal_mesh;
pub mod static_mesh;

/// Used when an entity lacks the field it is named after.
pub const FALLBACK_NAME: &str = "Error";

const MESH_EXTENSION: &str = "gltf";
const BASIC_SHAPES: &str = "BasicShapes";

/// Why an entity won't be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no properties")]
    NoProperties,
    #[error("no {0} reference")]
    NoMeshReference(&'static str),
    #[error("no object path")]
    NoObjectPath,
    #[error("basic shape")]
    BasicShape,
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

/// Everything the record builders need besides the entity itself.
#[derive(Debug, Copy, Clone)]
pub struct ImportContext<'a> {
    pub base_dir: &'a Path,
    pub scale_factor: f32,
    pub components: &'a ComponentLookup,
}

/// Blender space transform: location in meters, XYZ euler rotation in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TransformRecord {
    pub location: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformRecord {
    fn default() -> Self {
        Self::from_location(Vec3::ZERO)
    }
}

impl TransformRecord {
    pub fn from_location(location: Vec3) -> Self {
        Self {
            location,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Reads `RelativeLocation`, `RelativeRotation` and `RelativeScale3D`. Missing vectors and components
    /// default to zero, except for scale, which defaults to one.
    pub fn from_properties(props: &PropertyMap, scale_factor: f32) -> Self {
        let location = props
            .vector3("RelativeLocation", ["X", "Y", "Z"], 0.0)
            .map(Vec3::from_array)
            .unwrap_or(Vec3::ZERO);
        let rotation = props
            .vector3("RelativeRotation", ["Roll", "Pitch", "Yaw"], 0.0)
            .map(Vec3::from_array)
            .unwrap_or(Vec3::ZERO);
        let scale = props
            .vector3("RelativeScale3D", ["X", "Y", "Z"], 1.0)
            .map(Vec3::from_array);

        Self {
            location: coordinate_systems::ue_to_blender_location(location, scale_factor),
            rotation: coordinate_systems::ue_to_blender_rotation(rotation),
            scale: coordinate_systems::ue_to_blender_scale(scale, scale_factor),
        }
    }
}

/// Resolves the `.gltf` that the `reference_key` property points to.
pub(crate) fn mesh_import_path(
    props: &PropertyMap,
    reference_key: &'static str,
    base_dir: &Path,
    allow_basic_shapes: bool,
) -> Result<PathBuf, SkipReason> {
    if props.object(reference_key).is_empty() {
        return Err(SkipReason::NoMeshReference(reference_key));
    }

    let object_path = props
        .reference(reference_key)
        .path()
        .ok_or(SkipReason::NoObjectPath)?;

    if !allow_basic_shapes && object_path.contains(BASIC_SHAPES) {
        return Err(SkipReason::BasicShape);
    }

    let relative = split_object_path(object_path).trim_start_matches('/');
    let import_path = base_dir.join(format!("{}.{}", relative, MESH_EXTENSION));

    if !import_path.exists() {
        return Err(SkipReason::FileNotFound(import_path));
    }

    Ok(import_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transform_defaults() {
        let value = json!({ "RelativeLocation": { "X": 100.0 }, "RelativeScale3D": {} });
        let props = PropertyMap::from_value(Some(&value));
        let transform = TransformRecord::from_properties(&props, 2.0);

        assert_eq!(transform.location, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(transform.rotation, Vec3::ZERO);
        assert_eq!(transform.scale, Vec3::splat(2.0));
    }

    #[test]
    fn transform_conversion() {
        let value = json!({
            "RelativeLocation": { "X": 100.0, "Y": 100.0, "Z": 100.0 },
            "RelativeRotation": { "Pitch": 20.0, "Yaw": 30.0, "Roll": 10.0 },
            "RelativeScale3D": { "X": 2.0, "Z": 3.0 }
        });
        let props = PropertyMap::from_value(Some(&value));
        let transform = TransformRecord::from_properties(&props, 1.0);

        assert_eq!(transform.location, Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(transform.rotation, Vec3::new(10.0, -20.0, -30.0));
        assert_eq!(transform.scale, Vec3::new(2.0, 1.0, 3.0));
    }

    #[test]
    fn skip_reasons_are_readable() {
        assert_eq!(SkipReason::NoProperties.to_string(), "no properties");
        assert_eq!(
            SkipReason::NoMeshReference("StaticMesh").to_string(),
            "no StaticMesh reference"
        );
    }
}
