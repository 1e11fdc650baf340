use std::collections::{BTreeMap, HashSet};

use log::trace;
use serde_json::Value;
use umap_files::common::object_path::{actor_short_name, quoted_reference};
use umap_files::entity::types::{Entity, PropertyMap};

pub mod audio_matcher;

const SCENE_COMPONENT: &str = "SceneComponent";
const MATINEE_ACTOR: &str = "MatineeActor";
const SKELETAL_MESH_COMPONENT: &str = "SkeletalMeshComponent";
const SKELETAL_MESH_ACTOR: &str = "SkeletalMeshActorMAT";
const ANIM_TRACK: &str = "InterpTrackAnimControl";

/// Actor name -> the `SceneComponent` placed below it.
pub type ComponentLookup = BTreeMap<String, Entity>;

/// Interpolation group name -> skeletal mesh name.
pub type GroupToMesh = BTreeMap<String, String>;

pub fn component_lookup(entities: &[Entity]) -> ComponentLookup {
    entities
        .iter()
        .filter(|entity| entity.entity_type() == SCENE_COMPONENT && !entity.outer().is_empty())
        .map(|entity| (entity.outer().to_string(), entity.clone()))
        .collect()
}

/// Follows `MatineeActor` group infos to the animated actor and from there to its skeletal mesh.
pub fn anim_actor_mapping(entities: &[Entity]) -> GroupToMesh {
    let mut group_to_actor = BTreeMap::new();
    for entity in entities.iter().filter(|e| e.entity_type() == MATINEE_ACTOR) {
        let props = entity.properties();
        for info in props.array("GroupActorInfos") {
            let info = PropertyMap::from_value(Some(info));
            let group = info.str_or_empty("ObjectName");
            if group.is_empty() {
                continue;
            }

            // Actors may contain nulls
            let actor = info
                .array("Actors")
                .iter()
                .filter_map(|actor| actor.get("ObjectName").and_then(Value::as_str))
                .filter(|name| name.contains(SKELETAL_MESH_ACTOR))
                .find_map(actor_short_name);

            if let Some(actor) = actor {
                group_to_actor.insert(group.to_string(), actor.to_string());
            }
        }
    }

    let mut actor_to_mesh = BTreeMap::new();
    for entity in entities.iter().filter(|e| e.entity_type() == SKELETAL_MESH_COMPONENT) {
        if entity.outer().is_empty() {
            continue;
        }

        let mesh_reference = entity.properties().reference("SkeletalMesh");
        if let Some(mesh) = quoted_reference(mesh_reference.name(), "SkeletalMesh") {
            actor_to_mesh.insert(entity.outer(), mesh.to_string());
        }
    }

    group_to_actor
        .into_iter()
        .filter_map(|(group, actor)| {
            let mesh = actor_to_mesh.get(actor.as_str())?;
            trace!("{} -> {} -> {}", group, actor, mesh);
            Some((group, mesh.clone()))
        })
        .collect()
}

/// One animation of a matinee `InterpTrackAnimControl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimTrack {
    pub name: String,
    pub path: String,
    /// The `InterpGroup` the track belongs to
    pub group: String,
    pub slot: String,
}

/// Collects the animations of all anim control tracks, once per object path.
pub fn collect_anim_tracks(entities: &[Entity]) -> Vec<AnimTrack> {
    let mut tracks = Vec::new();
    let mut seen_paths = HashSet::new();

    for entity in entities.iter().filter(|e| e.entity_type() == ANIM_TRACK) {
        let props = entity.properties();
        let slot = props.str_or_empty("SlotName");

        for sequence in props.array("AnimSeqs") {
            let reference = PropertyMap::from_value(Some(sequence)).reference("AnimSeq");
            let Some(path) = reference.path() else {
                continue;
            };

            if !seen_paths.insert(path) {
                continue;
            }

            if let Some(name) = quoted_reference(reference.name(), "AnimSequence") {
                tracks.push(AnimTrack {
                    name: name.to_string(),
                    path: path.to_string(),
                    group: entity.outer().to_string(),
                    slot: slot.to_string(),
                });
            }
        }
    }

    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use umap_files::entity::reader::EntityReader;

    const SEQUENCE: &str = r#"[
        { "Type": "MatineeActor", "Outer": "PersistentLevel", "Properties": {
            "GroupActorInfos": [
                { "ObjectName": "InterpGroup_2", "Actors": [
                    null,
                    { "ObjectName": "CameraActor'E1_2A:PersistentLevel.CameraActor_0'" },
                    { "ObjectName": "SkeletalMeshActorMAT'E1_2A:PersistentLevel.SkeletalMeshActorMAT_9'" }
                ] },
                { "ObjectName": "InterpGroup_3", "Actors": [
                    { "ObjectName": "SkeletalMeshActorMAT'E1_2A:PersistentLevel.SkeletalMeshActorMAT_4'" }
                ] },
                { "ObjectName": "", "Actors": [
                    { "ObjectName": "SkeletalMeshActorMAT'E1_2A:PersistentLevel.SkeletalMeshActorMAT_9'" }
                ] }
            ]
        } },
        { "Type": "SkeletalMeshComponent", "Outer": "SkeletalMeshActorMAT_9", "Properties": {
            "SkeletalMesh": { "ObjectName": "SkeletalMesh'CH_L_Hayden01'", "ObjectPath": "LiS/Content/Characters/CH_L_Hayden01.0" }
        } },
        { "Type": "InterpTrackAnimControl", "Outer": "InterpGroup_2", "Properties": {
            "SlotName": "FullBody",
            "AnimSeqs": [
                { "AnimSeq": { "ObjectName": "AnimSequence'A_E1_2A_Hayden_Loop'", "ObjectPath": "LiS/Content/Anims/A_E1_2A_Hayden_Loop.0" } },
                { "AnimSeq": { "ObjectName": "AnimSequence'A_E1_2A_Hayden_Loop'", "ObjectPath": "LiS/Content/Anims/A_E1_2A_Hayden_Loop.0" } },
                { "AnimSeq": { "ObjectName": "AnimSequence'A_E1_2A_Hayden_Wave'", "ObjectPath": "" } },
                { "AnimSeq": { "ObjectName": "Broken", "ObjectPath": "LiS/Content/Anims/Broken.0" } }
            ]
        } },
        { "Type": "InterpTrackAnimControl", "Outer": "InterpGroup_3", "Properties": {
            "AnimSeqs": [
                { "AnimSeq": { "ObjectName": "AnimSequence'A_E1_2A_Alyssa_Loop'", "ObjectPath": "LiS/Content/Anims/A_E1_2A_Alyssa_Loop.0" } }
            ]
        } },
        { "Type": "SceneComponent", "Outer": "SD3DSound_0", "Properties": { "RelativeLocation": { "X": 1.0 } } },
        { "Type": "SceneComponent", "Outer": "SD3DSound_0", "Name": "Second" },
        { "Type": "SceneComponent", "Outer": "" }
    ]"#;

    #[test]
    fn group_to_mesh() -> Result<(), anyhow::Error> {
        let entities = EntityReader::parse_str(SEQUENCE)?;
        let mapping = anim_actor_mapping(&entities);

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("InterpGroup_2").map(String::as_str), Some("CH_L_Hayden01"));
        Ok(())
    }

    #[test]
    fn anim_tracks() -> Result<(), anyhow::Error> {
        let entities = EntityReader::parse_str(SEQUENCE)?;
        let tracks = collect_anim_tracks(&entities);

        assert_eq!(
            tracks,
            vec![
                AnimTrack {
                    name: "A_E1_2A_Hayden_Loop".into(),
                    path: "LiS/Content/Anims/A_E1_2A_Hayden_Loop.0".into(),
                    group: "InterpGroup_2".into(),
                    slot: "FullBody".into(),
                },
                AnimTrack {
                    name: "A_E1_2A_Alyssa_Loop".into(),
                    path: "LiS/Content/Anims/A_E1_2A_Alyssa_Loop.0".into(),
                    group: "InterpGroup_3".into(),
                    slot: "".into(),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn components_last_write_wins() -> Result<(), anyhow::Error> {
        let entities = EntityReader::parse_str(SEQUENCE)?;
        let lookup = component_lookup(&entities);

        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.get("SD3DSound_0").map(Entity::name), Some("Second"));
        Ok(())
    }
}
