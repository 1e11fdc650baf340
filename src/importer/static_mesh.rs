use std::path::PathBuf;

use umap_files::entity::types::Entity;

use crate::importer::{FALLBACK_NAME, ImportContext, SkipReason, TransformRecord, mesh_import_path};

#[derive(Debug, Clone, PartialEq)]
pub struct StaticMeshRecord {
    pub entity_name: String,
    pub import_path: PathBuf,
    pub transform: TransformRecord,
}

impl StaticMeshRecord {
    pub fn from_entity(entity: &Entity, context: &ImportContext) -> Result<Self, SkipReason> {
        let props = entity.properties();
        if props.is_empty() {
            return Err(SkipReason::NoProperties);
        }

        let import_path = mesh_import_path(&props, "StaticMesh", context.base_dir, false)?;

        Ok(Self {
            entity_name: entity.outer.clone().unwrap_or_else(|| FALLBACK_NAME.to_string()),
            import_path,
            transform: TransformRecord::from_properties(&props, context.scale_factor),
        })
    }
}
