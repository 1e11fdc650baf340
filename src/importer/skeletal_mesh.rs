use std::collections::HashSet;
use std::path::PathBuf;

use umap_files::common::object_path::quoted_reference;
use umap_files::entity::types::{Entity, visit_objects};

use crate::importer::{FALLBACK_NAME, ImportContext, SkipReason, TransformRecord, mesh_import_path};

const ANIM_SEQUENCE_TAG: &str = "AnimSequence";

#[derive(Debug, Clone, PartialEq)]
pub struct SkeletalMeshRecord {
    pub entity_name: String,
    pub import_path: PathBuf,
    pub transform: TransformRecord,
    /// Names of the `AnimSequence` references anywhere in the properties
    pub anim_sequences: Vec<String>,
}

impl SkeletalMeshRecord {
    pub fn from_entity(entity: &Entity, context: &ImportContext) -> Result<Self, SkipReason> {
        let props = entity.properties();
        if props.is_empty() {
            return Err(SkipReason::NoProperties);
        }

        // Characters never use the engine primitives, so there's no placeholder check here.
        let import_path = mesh_import_path(&props, "SkeletalMesh", context.base_dir, true)?;

        Ok(Self {
            entity_name: entity.outer.clone().unwrap_or_else(|| FALLBACK_NAME.to_string()),
            import_path,
            transform: TransformRecord::from_properties(&props, context.scale_factor),
            anim_sequences: entity
                .properties
                .as_ref()
                .map(collect_anim_sequences)
                .unwrap_or_default(),
        })
    }

    /// The name used to find the mesh from matinee groups, `CH_L_Hayden01` for `.../CH_L_Hayden01.gltf`.
    pub fn mesh_name(&self) -> &str {
        self.import_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
    }
}

fn collect_anim_sequences(properties: &serde_json::Value) -> Vec<String> {
    let mut seen_paths = HashSet::new();
    let mut sequences = Vec::new();

    visit_objects(properties, &mut |object| {
        let Some(object_name) = object.get("ObjectName").and_then(|name| name.as_str()) else {
            return;
        };
        let Some(sequence) = quoted_reference(object_name, ANIM_SEQUENCE_TAG) else {
            return;
        };

        let key = object
            .get("ObjectPath")
            .and_then(|path| path.as_str())
            .filter(|path| !path.is_empty())
            .unwrap_or(sequence);

        if seen_paths.insert(key.to_string()) {
            sequences.push(sequence.to_string());
        }
    });

    sequences
}
