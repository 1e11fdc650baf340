use log::info;

use crate::host::{ImportService, ProgressSink};
use crate::io::audio_index::AudioIndex;
use crate::io::file_index::{FileIndex, MATERIAL_EXTENSIONS};
use crate::settings::ImportSettings;

/// Imports a list of JSON files one after another.
pub mod queue;
/// Imports the entities of a single JSON file.
pub mod task;

const STATIC_MESH_TYPES: [&str; 2] = ["StaticMeshComponent", "InstancedStaticMeshComponent"];
const SKELETAL_MESH_TYPES: [&str; 1] = ["SkeletalMeshComponent"];
const LIGHT_TYPES: [&str; 3] = ["SpotLightComponent", "AnimatedLightComponent", "PointLightComponent"];
const SOUND_TYPES: [&str; 1] = ["SD3DSound"];

/// How an entity is imported.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntityClass {
    Mesh,
    Skeletal,
    Light,
    Sound,
}

impl EntityClass {
    /// `None` for types that aren't imported at all, or whose import is switched off.
    pub fn classify(entity_type: &str, settings: &ImportSettings) -> Option<Self> {
        if settings.import_meshes && STATIC_MESH_TYPES.contains(&entity_type) {
            Some(EntityClass::Mesh)
        } else if settings.import_meshes && SKELETAL_MESH_TYPES.contains(&entity_type) {
            Some(EntityClass::Skeletal)
        } else if settings.import_lights && LIGHT_TYPES.contains(&entity_type) {
            Some(EntityClass::Light)
        } else if settings.import_sounds && SOUND_TYPES.contains(&entity_type) {
            Some(EntityClass::Sound)
        } else {
            None
        }
    }
}

/// The lookups into the asset root, built once per queue run and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AssetIndexes {
    pub materials: FileIndex,
    /// Empty unless animations are imported
    pub animations: FileIndex,
    /// Empty unless sounds are imported
    pub audio: AudioIndex,
}

impl AssetIndexes {
    pub fn build(settings: &ImportSettings) -> Self {
        let materials = FileIndex::build(&settings.base_dir, &MATERIAL_EXTENSIONS);

        let animations = if settings.import_animations {
            FileIndex::build_animation_index(&settings.base_dir)
        } else {
            FileIndex::default()
        };

        let audio = if settings.import_sounds {
            let audio = AudioIndex::build(&settings.base_dir);
            info!("Indexed {} audio files", audio.len());
            audio
        } else {
            AudioIndex::default()
        };

        Self {
            materials,
            animations,
            audio,
        }
    }
}

/// The host's side of an import: its scene, its file importers and its progress display.
pub struct HostContext<'a, I: ImportService> {
    pub scene: &'a mut I::Scene,
    pub importer: &'a mut I,
    pub progress: &'a mut dyn ProgressSink,
}
