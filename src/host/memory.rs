use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::host::{
    HostError, ImportService, MaterialSettings, MeshHandle, ObjectData, ObjectHandle, ObjectKind, ProgressSink,
    ProgressSnapshot, SceneRepository, unique_name,
};
use crate::importer::TransformRecord;
use crate::material::graph::ShaderGraph;

/// Chunk id at the start of every PSA file.
const PSA_MAGIC: &[u8; 8] = b"ANIMHEAD";

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryCollection {
    pub parent: Option<String>,
    pub objects: Vec<ObjectHandle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryObject {
    pub name: String,
    pub kind: ObjectKind,
    pub data: Option<ObjectData>,
    pub transform: TransformRecord,
    pub children: Vec<ObjectHandle>,
    pub armature_modifier: Option<ObjectHandle>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryMesh {
    pub name: String,
    pub material_slots: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryMaterial {
    pub settings: MaterialSettings,
    pub graph: Option<ShaderGraph>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryAction {
    pub armature: ObjectHandle,
    pub source: PathBuf,
}

/// Keeps the whole scene in maps. Material slots belong to the mesh data, so linked duplicates share them.
#[derive(Debug, Default, Serialize)]
pub struct MemoryScene {
    collections: BTreeMap<String, MemoryCollection>,
    objects: BTreeMap<ObjectHandle, MemoryObject>,
    meshes: BTreeMap<MeshHandle, MemoryMesh>,
    materials: BTreeMap<String, MemoryMaterial>,
    /// File name -> path
    sounds: BTreeMap<String, PathBuf>,
    actions: BTreeMap<String, MemoryAction>,
    #[serde(skip)]
    next_id: u64,
}

impl MemoryScene {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_mesh(&mut self, name: &str, material_slots: Vec<Option<String>>) -> MeshHandle {
        let handle = MeshHandle(self.next_id());
        self.meshes.insert(
            handle,
            MemoryMesh {
                name: name.to_string(),
                material_slots,
            },
        );
        handle
    }

    /// Adds an empty material, a name clash results in a `.001` style name.
    pub fn add_material(&mut self, name: &str) -> String {
        let name = unique_name(name, |candidate| self.materials.contains_key(candidate));
        self.materials.insert(name.clone(), MemoryMaterial::default());
        name
    }

    /// Adds an object that isn't linked to any collection.
    pub fn add_object(&mut self, name: &str, kind: ObjectKind, data: Option<ObjectData>) -> ObjectHandle {
        let handle = ObjectHandle(self.next_id());
        self.objects.insert(
            handle,
            MemoryObject {
                name: name.to_string(),
                kind,
                data,
                transform: TransformRecord::default(),
                children: vec![],
                armature_modifier: None,
            },
        );
        handle
    }

    pub fn set_parent(&mut self, child: ObjectHandle, parent: ObjectHandle) -> Result<(), HostError> {
        if !self.objects.contains_key(&child) {
            return Err(HostError::UnknownObject(child));
        }

        let parent = self
            .objects
            .get_mut(&parent)
            .ok_or(HostError::UnknownObject(parent))?;
        parent.children.push(child);
        Ok(())
    }

    pub fn set_armature_modifier(&mut self, object: ObjectHandle, armature: ObjectHandle) -> Result<(), HostError> {
        self.object_mut(object)?.armature_modifier = Some(armature);
        Ok(())
    }

    pub fn add_action(&mut self, name: &str, armature: ObjectHandle, source: &Path) -> String {
        let name = unique_name(name, |candidate| self.actions.contains_key(candidate));
        self.actions.insert(
            name.clone(),
            MemoryAction {
                armature,
                source: source.to_path_buf(),
            },
        );
        name
    }

    pub fn object(&self, object: ObjectHandle) -> Option<&MemoryObject> {
        self.objects.get(&object)
    }

    fn object_mut(&mut self, object: ObjectHandle) -> Result<&mut MemoryObject, HostError> {
        self.objects
            .get_mut(&object)
            .ok_or(HostError::UnknownObject(object))
    }

    pub fn objects_named(&self, name: &str) -> Vec<ObjectHandle> {
        self.objects
            .iter()
            .filter(|(_, object)| object.name == name)
            .map(|(&handle, _)| handle)
            .collect_vec()
    }

    pub fn collection(&self, name: &str) -> Option<&MemoryCollection> {
        self.collections.get(name)
    }

    pub fn material(&self, name: &str) -> Option<&MemoryMaterial> {
        self.materials.get(name)
    }

    pub fn mesh(&self, mesh: MeshHandle) -> Option<&MemoryMesh> {
        self.meshes.get(&mesh)
    }

    pub fn action(&self, name: &str) -> Option<&MemoryAction> {
        self.actions.get(name)
    }

    pub fn sound_path(&self, file_name: &str) -> Option<&Path> {
        self.sounds.get(file_name).map(PathBuf::as_path)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

impl SceneRepository for MemoryScene {
    fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    fn create_collection(&mut self, name: &str, parent: Option<&str>) -> Result<String, HostError> {
        if let Some(parent) = parent
            && !self.collections.contains_key(parent)
        {
            return Err(HostError::UnknownCollection(parent.to_string()));
        }

        let name = unique_name(name, |candidate| self.collections.contains_key(candidate));
        self.collections.insert(
            name.clone(),
            MemoryCollection {
                parent: parent.map(str::to_string),
                objects: vec![],
            },
        );
        Ok(name)
    }

    fn collection_objects(&self, collection: &str) -> Vec<ObjectHandle> {
        self.collections
            .get(collection)
            .map(|collection| collection.objects.clone())
            .unwrap_or_default()
    }

    fn scene_objects(&self) -> Vec<ObjectHandle> {
        self.objects.keys().copied().collect_vec()
    }

    fn create_object(&mut self, name: &str, data: ObjectData, collection: &str) -> Result<ObjectHandle, HostError> {
        if !self.collections.contains_key(collection) {
            return Err(HostError::UnknownCollection(collection.to_string()));
        }

        let kind = match &data {
            ObjectData::Mesh(mesh) if !self.meshes.contains_key(mesh) => {
                return Err(HostError::ImportFailed {
                    path: PathBuf::from(name),
                    reason: format!("mesh data {:?} does not exist", mesh),
                });
            }
            ObjectData::Mesh(_) => ObjectKind::Mesh,
            ObjectData::Light(_) => ObjectKind::Light,
            ObjectData::Speaker(_) => ObjectKind::Speaker,
        };

        let handle = self.add_object(name, kind, Some(data));
        self.move_to_collection(handle, collection)?;
        Ok(handle)
    }

    fn move_to_collection(&mut self, object: ObjectHandle, collection: &str) -> Result<(), HostError> {
        if !self.objects.contains_key(&object) {
            return Err(HostError::UnknownObject(object));
        }
        if !self.collections.contains_key(collection) {
            return Err(HostError::UnknownCollection(collection.to_string()));
        }

        for (name, linked) in self.collections.iter_mut() {
            linked.objects.retain(|&handle| handle != object);
            if name == collection {
                linked.objects.push(object);
            }
        }
        Ok(())
    }

    fn set_name(&mut self, object: ObjectHandle, name: &str) -> Result<(), HostError> {
        self.object_mut(object)?.name = name.to_string();
        Ok(())
    }

    fn set_transform(&mut self, object: ObjectHandle, transform: &TransformRecord) -> Result<(), HostError> {
        self.object_mut(object)?.transform = *transform;
        Ok(())
    }

    fn object_kind(&self, object: ObjectHandle) -> Option<ObjectKind> {
        self.objects.get(&object).map(|object| object.kind)
    }

    fn object_name(&self, object: ObjectHandle) -> Option<String> {
        self.objects.get(&object).map(|object| object.name.clone())
    }

    fn mesh_of(&self, object: ObjectHandle) -> Option<MeshHandle> {
        match self.objects.get(&object)?.data {
            Some(ObjectData::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    fn children(&self, object: ObjectHandle) -> Vec<ObjectHandle> {
        self.objects
            .get(&object)
            .map(|object| object.children.clone())
            .unwrap_or_default()
    }

    fn armature_modifier_target(&self, object: ObjectHandle) -> Option<ObjectHandle> {
        self.objects.get(&object)?.armature_modifier
    }

    fn remove_object(&mut self, object: ObjectHandle) {
        if self.objects.remove(&object).is_none() {
            return;
        }

        for collection in self.collections.values_mut() {
            collection.objects.retain(|&handle| handle != object);
        }
        for other in self.objects.values_mut() {
            other.children.retain(|&handle| handle != object);
            if other.armature_modifier == Some(object) {
                other.armature_modifier = None;
            }
        }
    }

    fn material_names(&self) -> Vec<String> {
        self.materials.keys().cloned().collect_vec()
    }

    fn has_material(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    fn remove_material(&mut self, name: &str) {
        if self.materials.remove(name).is_none() {
            return;
        }

        for mesh in self.meshes.values_mut() {
            for slot in mesh.material_slots.iter_mut() {
                if slot.as_deref() == Some(name) {
                    *slot = None;
                }
            }
        }
    }

    fn material_slots(&self, object: ObjectHandle) -> Vec<Option<String>> {
        self.mesh_of(object)
            .and_then(|mesh| self.meshes.get(&mesh))
            .map(|mesh| mesh.material_slots.clone())
            .unwrap_or_default()
    }

    fn set_material_slot(&mut self, object: ObjectHandle, slot: usize, material: &str) -> Result<(), HostError> {
        if !self.materials.contains_key(material) {
            return Err(HostError::UnknownMaterial(material.to_string()));
        }

        let mesh = self
            .mesh_of(object)
            .and_then(|mesh| self.meshes.get_mut(&mesh))
            .ok_or(HostError::UnknownObject(object))?;

        if mesh.material_slots.len() <= slot {
            mesh.material_slots.resize(slot + 1, None);
        }
        mesh.material_slots[slot] = Some(material.to_string());
        Ok(())
    }

    fn configure_material(&mut self, name: &str, settings: &MaterialSettings) -> Result<(), HostError> {
        let material = self
            .materials
            .get_mut(name)
            .ok_or_else(|| HostError::UnknownMaterial(name.to_string()))?;
        material.settings = *settings;
        Ok(())
    }

    fn apply_shader_graph(&mut self, name: &str, graph: ShaderGraph) -> Result<(), HostError> {
        let material = self
            .materials
            .get_mut(name)
            .ok_or_else(|| HostError::UnknownMaterial(name.to_string()))?;
        material.graph = Some(graph);
        Ok(())
    }

    fn find_sound(&self, file_name: &str) -> Option<String> {
        self.sounds.contains_key(file_name).then(|| file_name.to_string())
    }

    fn load_sound(&mut self, path: &Path) -> Result<String, HostError> {
        if !path.exists() {
            return Err(HostError::MissingFile(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| HostError::MissingFile(path.to_path_buf()))?;

        self.sounds.insert(file_name.clone(), path.to_path_buf());
        Ok(file_name)
    }

    fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }
}

#[derive(Debug, Default, Deserialize)]
struct GltfDocument {
    #[serde(default)]
    meshes: Vec<GltfMesh>,
    #[serde(default)]
    materials: Vec<GltfMaterial>,
    #[serde(default)]
    skins: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct GltfMesh {
    name: Option<String>,
    #[serde(default)]
    primitives: Vec<GltfPrimitive>,
}

#[derive(Debug, Default, Deserialize)]
struct GltfPrimitive {
    material: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct GltfMaterial {
    name: Option<String>,
}

/// Reads the files from disk, but only as deep as the scene needs: a glTF becomes one mesh object
/// (the first mesh) with its material slots, skinned files get an armature. PSA files are checked for
/// their header and become an action.
#[derive(Debug, Default)]
pub struct LocalImportService {
    imported_files: usize,
}

impl LocalImportService {
    pub fn imported_files(&self) -> usize {
        self.imported_files
    }
}

impl ImportService for LocalImportService {
    type Scene = MemoryScene;

    fn import_gltf(&mut self, scene: &mut MemoryScene, path: &Path) -> Result<Option<ObjectHandle>, HostError> {
        if !path.exists() {
            return Err(HostError::MissingFile(path.to_path_buf()));
        }

        let document: GltfDocument =
            serde_json::from_slice(&std::fs::read(path)?).map_err(|err| HostError::ImportFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        self.imported_files += 1;

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let Some(mesh) = document.meshes.first() else {
            debug!("{} contains no meshes", path.display());
            return Ok(None);
        };

        // Every import creates new materials, clashing names get a numeric suffix.
        let material_slots = mesh
            .primitives
            .iter()
            .filter_map(|primitive| primitive.material)
            .unique()
            .map(|index| {
                let name = document
                    .materials
                    .get(index)
                    .and_then(|material| material.name.as_deref())
                    .unwrap_or("Material");
                Some(scene.add_material(name))
            })
            .collect_vec();

        let mesh_name = mesh.name.clone().unwrap_or(stem);
        let mesh_handle = scene.add_mesh(&mesh_name, material_slots);
        let object = scene.add_object(&mesh_name, ObjectKind::Mesh, Some(ObjectData::Mesh(mesh_handle)));

        if !document.skins.is_empty() {
            let armature = scene.add_object("Armature", ObjectKind::Armature, None);
            scene.set_parent(object, armature)?;
            scene.set_armature_modifier(object, armature)?;
        }

        trace!("Imported {} as {:?}", path.display(), object);
        Ok(Some(object))
    }

    fn import_psa(
        &mut self,
        scene: &mut MemoryScene,
        armature: ObjectHandle,
        path: &Path,
        action_name: &str,
    ) -> Result<Option<String>, HostError> {
        if scene.object_kind(armature) != Some(ObjectKind::Armature) {
            return Err(HostError::UnknownObject(armature));
        }

        let mut magic = [0u8; 8];
        std::fs::File::open(path)
            .and_then(|mut file| file.read_exact(&mut magic))
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => HostError::MissingFile(path.to_path_buf()),
                _ => HostError::IOError(err),
            })?;

        if &magic != PSA_MAGIC {
            return Err(HostError::ImportFailed {
                path: path.to_path_buf(),
                reason: "not a PSA file".to_string(),
            });
        }

        self.imported_files += 1;
        Ok(Some(scene.add_action(action_name, armature, path)))
    }
}

/// Remembers everything it was told, for tests and reports.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub timer_running: bool,
    pub timer_starts: usize,
    pub snapshots: Vec<ProgressSnapshot>,
}

impl ProgressSink for RecordingProgress {
    fn start_timer(&mut self) {
        self.timer_running = true;
        self.timer_starts += 1;
    }

    fn release_timer(&mut self) {
        self.timer_running = false;
    }

    fn update(&mut self, snapshot: &ProgressSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}
