use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use serde::Serialize;
use thiserror::Error;
use umap_files::common::object_path::strip_export_index;
use umap_files::entity::reader::EntityReader;
use umap_files::entity::types::Entity;

use crate::host::{
    HostError, ImportService, MeshHandle, ObjectData, ObjectHandle, ObjectKind, SceneRepository, SpeakerSettings,
};
use crate::import::{AssetIndexes, EntityClass};
use crate::importer::game_light::LightRecord;
use crate::importer::game_sound::SoundRecord;
use crate::importer::skeletal_mesh::SkeletalMeshRecord;
use crate::importer::static_mesh::StaticMeshRecord;
use crate::importer::{ImportContext, SkipReason, TransformRecord};
use crate::io::file_index::ANIMATION_EXTENSION;
use crate::resolver::audio_matcher::resolve_sound;
use crate::resolver::{
    AnimTrack, ComponentLookup, GroupToMesh, anim_actor_mapping, collect_anim_tracks, component_lookup,
};
use crate::settings::ImportSettings;

const JSON_EXTENSION: &str = ".json";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum TaskState {
    Pending,
    Running,
    Cancelled,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// Objects placed into the file's collection
    pub objects: usize,
    pub skipped: usize,
    pub animations: usize,
    /// Speakers that got a sound
    pub sounds_linked: usize,
}

#[derive(Debug, Error)]
enum PlacementError {
    #[error(transparent)]
    Skipped(#[from] SkipReason),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("importing {} created no object", .0.display())]
    NothingImported(PathBuf),
}

/// Walks an armature hierarchy: the object itself, its children, and finally a mesh's armature modifier.
pub fn find_armature<S: SceneRepository + ?Sized>(scene: &S, object: ObjectHandle) -> Option<ObjectHandle> {
    let kind = scene.object_kind(object)?;
    if kind == ObjectKind::Armature {
        return Some(object);
    }

    if let Some(armature) = scene
        .children(object)
        .into_iter()
        .find_map(|child| find_armature(scene, child))
    {
        return Some(armature);
    }

    match kind {
        ObjectKind::Mesh => scene.armature_modifier_target(object),
        _ => None,
    }
}

fn first_armature<S: SceneRepository + ?Sized>(scene: &S) -> Option<ObjectHandle> {
    scene
        .scene_objects()
        .into_iter()
        .find(|&object| scene.object_kind(object) == Some(ObjectKind::Armature))
}

/// Existing actions are reused, they are never imported twice.
fn import_action<I: ImportService>(
    scene: &mut I::Scene,
    importer: &mut I,
    armature: ObjectHandle,
    path: &Path,
    name: &str,
) -> Result<Option<String>, HostError> {
    if scene.has_action(name) {
        trace!("Reusing action {}", name);
        return Ok(Some(name.to_string()));
    }

    importer.import_psa(scene, armature, path, name)
}

/// Imports one JSON file into its own collection, a batch of entities per [`ImportTask::advance`].
pub struct ImportTask {
    json_path: PathBuf,
    settings: ImportSettings,
    state: TaskState,
    collection: String,
    entities: Vec<(EntityClass, Entity)>,
    cursor: usize,
    components: ComponentLookup,
    group_to_mesh: GroupToMesh,
    pending_animations: Vec<AnimTrack>,
    /// Skeletal mesh name -> armature of its first import
    mesh_to_armature: BTreeMap<String, ObjectHandle>,
    /// glTF path -> mesh data of its first import
    mesh_cache: BTreeMap<PathBuf, MeshHandle>,
    stats: TaskStats,
}

impl ImportTask {
    pub fn new(json_path: impl Into<PathBuf>, settings: ImportSettings) -> Self {
        Self {
            json_path: json_path.into(),
            settings,
            state: TaskState::Pending,
            collection: String::new(),
            entities: vec![],
            cursor: 0,
            components: ComponentLookup::new(),
            group_to_mesh: GroupToMesh::new(),
            pending_animations: vec![],
            mesh_to_armature: BTreeMap::new(),
            mesh_cache: BTreeMap::new(),
            stats: TaskStats::default(),
        }
    }

    pub fn file_name(&self) -> String {
        self.json_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// `E1_2A_Diner` for `E1_2A_Diner.json`
    pub fn map_name(&self) -> String {
        let file_name = self.file_name();
        file_name
            .strip_suffix(JSON_EXTENSION)
            .map(str::to_string)
            .unwrap_or(file_name)
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// The collection the entities are placed in, empty until started.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn total(&self) -> usize {
        self.entities.len()
    }

    pub fn current(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entities.len()
    }

    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    fn context(&self) -> ImportContext<'_> {
        ImportContext {
            base_dir: &self.settings.base_dir,
            scale_factor: self.settings.scale_factor,
            components: &self.components,
        }
    }

    /// Loads the JSON and creates the collection below `parent`. Returns the number of importable entities,
    /// when that is zero, no collection is created and the task is finished right away.
    pub fn start<S: SceneRepository>(&mut self, scene: &mut S, parent: Option<&str>) -> anyhow::Result<usize> {
        if self.state != TaskState::Pending {
            bail!("{} was already started", self.file_name());
        }

        let entities = EntityReader::parse_file(&self.json_path)
            .with_context(|| format!("Failed to load {}", self.json_path.display()))?;

        if self.settings.import_sounds {
            self.components = component_lookup(&entities);
        }

        if self.settings.import_animations {
            self.group_to_mesh = anim_actor_mapping(&entities);
            self.pending_animations = collect_anim_tracks(&entities);
            debug!(
                "{} sequence animations, {} mapped groups",
                self.pending_animations.len(),
                self.group_to_mesh.len()
            );
        }

        let settings = &self.settings;
        let classified = entities
            .into_iter()
            .filter_map(|entity| EntityClass::classify(entity.entity_type(), settings).map(|class| (class, entity)))
            .collect_vec();
        self.entities = classified;

        if self.entities.is_empty() {
            self.state = TaskState::Finished;
            return Ok(0);
        }

        self.collection = scene
            .create_collection(&self.map_name(), parent)
            .with_context(|| format!("Failed to create the collection for {}", self.file_name()))?;
        self.state = TaskState::Running;

        info!(
            "Starting import of {} entities from {}",
            self.entities.len(),
            self.file_name()
        );
        Ok(self.entities.len())
    }

    /// Places up to `batch_size` entities and returns how many were processed.
    pub fn advance<I: ImportService>(
        &mut self,
        scene: &mut I::Scene,
        importer: &mut I,
        indexes: &AssetIndexes,
        batch_size: usize,
    ) -> usize {
        if self.state != TaskState::Running {
            return 0;
        }

        let end = (self.cursor + batch_size.max(1)).min(self.entities.len());
        let entities = std::mem::take(&mut self.entities);

        for (class, entity) in &entities[self.cursor..end] {
            let label = match entity.outer() {
                "" => entity.name(),
                outer => outer,
            };

            match self.place(scene, importer, indexes, *class, entity) {
                Ok(object) => {
                    trace!("Placed {} as {:?}", label, object);
                    self.stats.objects += 1;
                }
                Err(PlacementError::Skipped(reason)) => {
                    debug!("Skipping {} {}: {}", entity.entity_type(), label, reason);
                    self.stats.skipped += 1;
                }
                Err(err) => {
                    warn!("Failed to place {} {}: {}", entity.entity_type(), label, err);
                    self.stats.skipped += 1;
                }
            }
        }

        self.entities = entities;
        let processed = end - self.cursor;
        self.cursor = end;
        processed
    }

    /// Imports the sequence animations, once all entities are placed.
    pub fn finish<I: ImportService>(&mut self, scene: &mut I::Scene, importer: &mut I, indexes: &AssetIndexes) {
        if self.state != TaskState::Running {
            return;
        }

        if self.settings.import_animations && !self.pending_animations.is_empty() {
            self.import_sequence_animations(scene, importer, indexes);
        }

        self.state = TaskState::Finished;
        info!(
            "Imported {} objects from {} ({} entities)",
            self.stats.objects,
            self.file_name(),
            self.entities.len()
        );
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, TaskState::Pending | TaskState::Running) {
            self.state = TaskState::Cancelled;
        }
    }

    fn place<I: ImportService>(
        &mut self,
        scene: &mut I::Scene,
        importer: &mut I,
        indexes: &AssetIndexes,
        class: EntityClass,
        entity: &Entity,
    ) -> Result<ObjectHandle, PlacementError> {
        match class {
            EntityClass::Mesh => {
                let record = StaticMeshRecord::from_entity(entity, &self.context())?;
                let (object, _) = self.place_mesh(
                    scene,
                    importer,
                    &record.entity_name,
                    &record.import_path,
                    &record.transform,
                )?;
                Ok(object)
            }
            EntityClass::Skeletal => {
                let record = SkeletalMeshRecord::from_entity(entity, &self.context())?;
                let (object, fresh) = self.place_mesh(
                    scene,
                    importer,
                    &record.entity_name,
                    &record.import_path,
                    &record.transform,
                )?;

                // Linked instances share the armature of the first import
                if fresh
                    && self.settings.import_animations
                    && let Some(armature) = find_armature(&*scene, object)
                {
                    trace!("Mapped {} to armature {:?}", record.mesh_name(), armature);
                    self.mesh_to_armature
                        .insert(record.mesh_name().to_string(), armature);
                    self.import_referenced_animations(scene, importer, indexes, armature, &record);
                }
                Ok(object)
            }
            EntityClass::Light => {
                let record = LightRecord::from_entity(entity, &self.context())?;
                let object = scene.create_object(&record.entity_name, ObjectData::Light(record.kind), &self.collection)?;
                scene.set_transform(object, &record.transform)?;
                Ok(object)
            }
            EntityClass::Sound => {
                let record = SoundRecord::from_entity(entity, &self.context())?;
                self.place_speaker(scene, indexes, &record)
            }
        }
    }

    /// Imports the glTF once per file, later uses become linked instances of the same mesh data.
    /// Returns the object and whether it was freshly imported.
    fn place_mesh<I: ImportService>(
        &mut self,
        scene: &mut I::Scene,
        importer: &mut I,
        name: &str,
        import_path: &Path,
        transform: &TransformRecord,
    ) -> Result<(ObjectHandle, bool), PlacementError> {
        let (object, fresh) = match self.mesh_cache.get(import_path) {
            Some(&mesh) => (scene.create_object(name, ObjectData::Mesh(mesh), &self.collection)?, false),
            None => {
                let object = importer
                    .import_gltf(scene, import_path)?
                    .ok_or_else(|| PlacementError::NothingImported(import_path.to_path_buf()))?;

                if let Some(mesh) = scene.mesh_of(object) {
                    self.mesh_cache.insert(import_path.to_path_buf(), mesh);
                }
                scene.set_name(object, name)?;
                (object, true)
            }
        };

        scene.set_transform(object, transform)?;
        scene.move_to_collection(object, &self.collection)?;
        Ok((object, fresh))
    }

    fn import_referenced_animations<I: ImportService>(
        &mut self,
        scene: &mut I::Scene,
        importer: &mut I,
        indexes: &AssetIndexes,
        armature: ObjectHandle,
        record: &SkeletalMeshRecord,
    ) {
        let mut imported = 0;
        for name in &record.anim_sequences {
            let Some(path) = indexes.animations.get(name) else {
                continue;
            };

            match import_action(scene, importer, armature, path, name) {
                Ok(Some(_)) => imported += 1,
                Ok(None) => {}
                Err(err) => warn!("Failed to import animation {}: {}", name, err),
            }
        }

        if imported > 0 {
            debug!("Imported {} animations for {}", imported, record.entity_name);
            self.stats.animations += imported;
        }
    }

    fn place_speaker<S: SceneRepository>(
        &mut self,
        scene: &mut S,
        indexes: &AssetIndexes,
        record: &SoundRecord,
    ) -> Result<ObjectHandle, PlacementError> {
        let candidates = record.name_candidates();

        let sound = match resolve_sound(&candidates, &indexes.audio) {
            Some(path) => match Self::sound_datablock(scene, &path) {
                Ok(sound) => Some(sound),
                Err(err) => {
                    warn!("Failed to load {}: {}", path.display(), err);
                    None
                }
            },
            None => {
                debug!(
                    "Audio not found for {}, tried: {:?}",
                    record.speaker_name(),
                    candidates.iter().take(3).collect_vec()
                );
                None
            }
        };

        if sound.is_some() {
            self.stats.sounds_linked += 1;
        }

        let speaker = SpeakerSettings {
            volume: 1.0,
            attenuation: 1.0,
            distance_reference: record.distance_reference(),
            distance_max: record.distance_max(),
            sound,
        };

        let object = scene.create_object(record.speaker_name(), ObjectData::Speaker(speaker), &self.collection)?;
        scene.set_transform(object, &TransformRecord::from_location(record.location))?;
        Ok(object)
    }

    /// Sounds are shared by file name.
    fn sound_datablock<S: SceneRepository>(scene: &mut S, path: &Path) -> Result<String, HostError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        match scene.find_sound(&file_name) {
            Some(sound) => Ok(sound),
            None => scene.load_sound(path),
        }
    }

    fn sequence_animation_path(&self, track: &AnimTrack, indexes: &AssetIndexes) -> Option<PathBuf> {
        let relative = strip_export_index(&track.path).trim_start_matches('/');
        let psa_path = self
            .settings
            .base_dir
            .join(format!("{}{}", relative, ANIMATION_EXTENSION));

        if psa_path.exists() {
            return Some(psa_path);
        }

        indexes.animations.get(&track.name).map(Path::to_path_buf)
    }

    fn import_sequence_animations<I: ImportService>(
        &mut self,
        scene: &mut I::Scene,
        importer: &mut I,
        indexes: &AssetIndexes,
    ) {
        let tracks = std::mem::take(&mut self.pending_animations);
        let mut imported = 0;
        let mut linked = 0;

        for track in &tracks {
            let Some(psa_path) = self.sequence_animation_path(track, indexes) else {
                debug!("Animation not found: {}", track.name);
                continue;
            };

            let target = self
                .group_to_mesh
                .get(&track.group)
                .and_then(|mesh| self.mesh_to_armature.get(mesh))
                .copied();

            // Without a mapped armature the action is stored on any armature, but not linked.
            let Some(armature) = target.or_else(|| first_armature(&*scene)) else {
                debug!("No armature found to import animation {}", track.name);
                continue;
            };

            match import_action(scene, importer, armature, &psa_path, &track.name) {
                Ok(Some(_)) if target.is_some() => {
                    trace!("{} -> group {} -> armature {:?}", track.name, track.group, armature);
                    imported += 1;
                    linked += 1;
                }
                Ok(Some(_)) => {
                    imported += 1;
                    if !track.group.is_empty() {
                        debug!("{} imported, but group {} has no armature", track.name, track.group);
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("Failed to import animation {}: {}", track.name, err),
            }
        }

        if imported > 0 {
            info!(
                "Imported {} sequence animations ({} linked to armatures)",
                imported, linked
            );
        }
        self.stats.animations += imported;
    }
}
