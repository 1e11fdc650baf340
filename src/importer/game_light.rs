use serde::Serialize;
use umap_files::entity::types::Entity;

use crate::importer::{FALLBACK_NAME, ImportContext, SkipReason, TransformRecord};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum LightKind {
    Spot,
    Point,
}

impl LightKind {
    /// Anything that isn't a spot light (e.g. `AnimatedLightComponent`) is imported as point light.
    pub fn from_component_type(entity_type: &str) -> Self {
        match entity_type {
            "SpotLightComponent" => LightKind::Spot,
            _ => LightKind::Point,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightRecord {
    pub entity_name: String,
    pub kind: LightKind,
    pub transform: TransformRecord,
}

impl LightRecord {
    pub fn from_entity(entity: &Entity, context: &ImportContext) -> Result<Self, SkipReason> {
        let props = entity.properties();
        if props.is_empty() {
            return Err(SkipReason::NoProperties);
        }

        Ok(Self {
            entity_name: entity.outer.clone().unwrap_or_else(|| FALLBACK_NAME.to_string()),
            kind: LightKind::from_component_type(entity.entity_type()),
            transform: TransformRecord::from_properties(&props, context.scale_factor),
        })
    }
}
