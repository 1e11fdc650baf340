use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::importer::TransformRecord;
use crate::importer::game_light::LightKind;
use crate::material::graph::ShaderGraph;

/// An in-memory host, used by the command line tool and the tests.
pub mod memory;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectHandle(pub u64);

/// Mesh data that can be shared between objects (linked duplicates).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MeshHandle(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Empty,
    Mesh,
    Armature,
    Light,
    Speaker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerSettings {
    pub volume: f32,
    pub attenuation: f32,
    pub distance_reference: f32,
    pub distance_max: f32,
    /// Name of the sound datablock
    pub sound: Option<String>,
}

/// What a newly created object carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ObjectData {
    Mesh(MeshHandle),
    Light(LightKind),
    Speaker(SpeakerSettings),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum BlendMethod {
    Opaque,
    Clip,
    Blend,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MaterialSettings {
    pub blend_method: Option<BlendMethod>,
    pub alpha_threshold: Option<f32>,
    pub backface_culling: bool,
}

impl Default for MaterialSettings {
    /// Double sided, blend method untouched
    fn default() -> Self {
        Self {
            blend_method: None,
            alpha_threshold: None,
            backface_culling: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Unknown object {0:?}")]
    UnknownObject(ObjectHandle),

    #[error("Unknown collection {0}")]
    UnknownCollection(String),

    #[error("Unknown material {0}")]
    UnknownMaterial(String),

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to import {}, because: {reason}", path.display())]
    ImportFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

/// The scene graph of the host tool. Names of collections and materials are unique, like in blender.
pub trait SceneRepository {
    fn has_collection(&self, name: &str) -> bool;

    /// Creates a collection below `parent` (or the scene root) and returns its final, unique, name.
    fn create_collection(&mut self, name: &str, parent: Option<&str>) -> Result<String, HostError>;

    fn collection_objects(&self, collection: &str) -> Vec<ObjectHandle>;

    /// Every object of the scene, in creation order.
    fn scene_objects(&self) -> Vec<ObjectHandle>;

    fn create_object(&mut self, name: &str, data: ObjectData, collection: &str) -> Result<ObjectHandle, HostError>;

    /// Unlinks the object from all collections and links it to `collection`.
    fn move_to_collection(&mut self, object: ObjectHandle, collection: &str) -> Result<(), HostError>;

    fn set_name(&mut self, object: ObjectHandle, name: &str) -> Result<(), HostError>;

    fn set_transform(&mut self, object: ObjectHandle, transform: &TransformRecord) -> Result<(), HostError>;

    fn object_kind(&self, object: ObjectHandle) -> Option<ObjectKind>;

    fn object_name(&self, object: ObjectHandle) -> Option<String>;

    fn mesh_of(&self, object: ObjectHandle) -> Option<MeshHandle>;

    fn children(&self, object: ObjectHandle) -> Vec<ObjectHandle>;

    /// The armature that deforms a mesh object, if it has an armature modifier.
    fn armature_modifier_target(&self, object: ObjectHandle) -> Option<ObjectHandle>;

    fn remove_object(&mut self, object: ObjectHandle);

    fn material_names(&self) -> Vec<String>;

    fn has_material(&self, name: &str) -> bool;

    fn remove_material(&mut self, name: &str);

    /// Material names per slot, `None` for an empty slot.
    fn material_slots(&self, object: ObjectHandle) -> Vec<Option<String>>;

    fn set_material_slot(&mut self, object: ObjectHandle, slot: usize, material: &str) -> Result<(), HostError>;

    fn configure_material(&mut self, name: &str, settings: &MaterialSettings) -> Result<(), HostError>;

    /// Replaces the node tree of the material.
    fn apply_shader_graph(&mut self, name: &str, graph: ShaderGraph) -> Result<(), HostError>;

    /// Looks up a loaded sound by the file name it was loaded from.
    fn find_sound(&self, file_name: &str) -> Option<String>;

    fn load_sound(&mut self, path: &Path) -> Result<String, HostError>;

    fn has_action(&self, name: &str) -> bool;
}

/// The host's file importers. Imported objects end up in the scene, but in no particular collection.
pub trait ImportService {
    type Scene: SceneRepository;

    /// Imports a glTF file and returns the imported (active) object, if anything was imported.
    fn import_gltf(&mut self, scene: &mut Self::Scene, path: &Path) -> Result<Option<ObjectHandle>, HostError>;

    /// Imports a PSA file as an action named `action_name` for `armature`. The action isn't assigned.
    fn import_psa(
        &mut self,
        scene: &mut Self::Scene,
        armature: ObjectHandle,
        path: &Path,
        action_name: &str,
    ) -> Result<Option<String>, HostError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub current_file: String,
    pub entity_current: usize,
    pub entity_total: usize,
    pub queue_index: usize,
    pub queue_total: usize,
    /// Over the whole queue, 0..=100
    pub overall_percent: f32,
    pub running: bool,
    pub complete: bool,
}

/// Receives the queue's progress, e.g. to redraw a progress bar.
pub trait ProgressSink {
    /// The queue wants to be ticked from now on.
    fn start_timer(&mut self);

    fn release_timer(&mut self);

    fn update(&mut self, snapshot: &ProgressSnapshot);
}

/// Blender style unique names: `name`, then `name.001`, `name.002`, ...
pub fn unique_name(name: &str, exists: impl Fn(&str) -> bool) -> String {
    if !exists(name) {
        return name.to_string();
    }

    (1..)
        .map(|counter| format!("{}.{:03}", name, counter))
        .find(|candidate| !exists(candidate))
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_names() {
        let taken = ["E1_2A", "E1_2A.001"];
        assert_eq!(unique_name("E1_3B", |name| taken.contains(&name)), "E1_3B");
        assert_eq!(unique_name("E1_2A", |name| taken.contains(&name)), "E1_2A.002");
    }
}
