use glam::Vec3;
use umap_files::entity::types::Entity;

use crate::importer::coordinate_systems::{UNITS_PER_METER, ue_to_blender_location};
use crate::importer::{FALLBACK_NAME, ImportContext, SkipReason};
use crate::resolver::audio_matcher::sound_name_candidates;

pub const DEFAULT_INNER_RADIUS: f32 = 200.0;
pub const DEFAULT_OUTER_RADIUS: f32 = 1000.0;

/// A `SD3DSound` actor. Its location lives on the `SceneComponent` whose `Outer` is the sound's name.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRecord {
    pub entity_name: String,
    pub audio_id: String,
    pub ak_event_path: String,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub location: Vec3,
    scale_factor: f32,
}

impl SoundRecord {
    pub fn from_entity(entity: &Entity, context: &ImportContext) -> Result<Self, SkipReason> {
        let props = entity.properties();
        if props.is_empty() {
            return Err(SkipReason::NoProperties);
        }

        let entity_name = entity.name.clone().unwrap_or_else(|| FALLBACK_NAME.to_string());

        let location = context
            .components
            .get(&entity_name)
            .and_then(|component| {
                component
                    .properties()
                    .vector3("RelativeLocation", ["X", "Y", "Z"], 0.0)
            })
            .map(|location| ue_to_blender_location(Vec3::from_array(location), context.scale_factor))
            .unwrap_or(Vec3::ZERO);

        Ok(Self {
            audio_id: props.str_or_empty("Audio_ID").to_string(),
            ak_event_path: props.reference("AkEvent").object_path.unwrap_or_default().to_string(),
            inner_radius: props.f32_or("InnerRadius", DEFAULT_INNER_RADIUS),
            outer_radius: props.f32_or("OuterRadius", DEFAULT_OUTER_RADIUS),
            location,
            scale_factor: context.scale_factor,
            entity_name,
        })
    }

    /// The audio id if there is one, the entity name otherwise.
    pub fn speaker_name(&self) -> &str {
        if self.audio_id.is_empty() {
            &self.entity_name
        } else {
            &self.audio_id
        }
    }

    /// Distance in meters below which the volume isn't attenuated.
    pub fn distance_reference(&self) -> f32 {
        self.inner_radius / UNITS_PER_METER * self.scale_factor
    }

    pub fn distance_max(&self) -> f32 {
        self.outer_radius / UNITS_PER_METER * self.scale_factor
    }

    pub fn name_candidates(&self) -> Vec<String> {
        sound_name_candidates(&self.audio_id, &self.ak_event_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::component_lookup;
    use std::path::Path;
    use umap_files::entity::reader::EntityReader;

    const LEVEL: &str = r#"[
        { "Type": "SceneComponent", "Name": "SceneComponent0", "Outer": "SD3DSound_0", "Properties": {
            "RelativeLocation": { "X": 100.0, "Y": 50.0, "Z": 200.0 }
        } },
        { "Type": "SD3DSound", "Name": "SD3DSound_0", "Properties": {
            "Audio_ID": "A_NextDoor_Skate",
            "OuterRadius": 2500.0,
            "AkEvent": { "ObjectName": "AkEvent'Play_A_NextDoor_Skate'", "ObjectPath": "LiS/Content/WwiseAudio/Events/Play_A_NextDoor_Skate.0" }
        } },
        { "Type": "SD3DSound", "Name": "SD3DSound_1", "Properties": { "InnerRadius": 50.0 } },
        { "Type": "SD3DSound", "Name": "SD3DSound_2" }
    ]"#;

    #[test]
    fn sound_positions_come_from_components() -> Result<(), anyhow::Error> {
        let entities = EntityReader::parse_str(LEVEL)?;
        let components = component_lookup(&entities);
        let context = ImportContext {
            base_dir: Path::new("/assets"),
            scale_factor: 2.0,
            components: &components,
        };

        let skate = SoundRecord::from_entity(&entities[1], &context)?;
        assert_eq!(skate.speaker_name(), "A_NextDoor_Skate");
        assert_eq!(skate.location, Vec3::new(2.0, -1.0, 4.0));
        assert_eq!(skate.distance_reference(), 4.0);
        assert_eq!(skate.distance_max(), 50.0);
        assert_eq!(
            skate.ak_event_path,
            "LiS/Content/WwiseAudio/Events/Play_A_NextDoor_Skate.0"
        );

        let silent = SoundRecord::from_entity(&entities[2], &context)?;
        assert_eq!(silent.speaker_name(), "SD3DSound_1");
        assert_eq!(silent.location, Vec3::ZERO);
        assert_eq!(silent.distance_reference(), 1.0);
        assert_eq!(silent.distance_max(), 20.0);
        assert!(silent.name_candidates().is_empty());

        assert_eq!(
            SoundRecord::from_entity(&entities[3], &context),
            Err(SkipReason::NoProperties)
        );
        Ok(())
    }
}
