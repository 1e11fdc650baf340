use log::{debug, info, trace, warn};
use umap_files::mat::reader::MatReader;
use umap_files::props::reader::PropsReader;
use umap_files::props::types::{BlendMode, MaterialProperties};

use crate::host::{BlendMethod, HostError, MaterialSettings, ObjectKind, SceneRepository};
use crate::io::file_index::FileIndex;
use crate::material::roughness::{AlphaSampler, resolve_roughness};
use crate::material::synthesizer::{ResolvedTextures, cleared_graph, synthesize};
use crate::material::texture_path;

const PLACEHOLDER_MATERIAL: &str = "WorldGridMaterial";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialImportReport {
    /// Materials that received a textured shader graph, the others are left with a bare output
    pub built: usize,
    pub removed_materials: usize,
    /// `Foo.001` style materials without a `Foo` to merge into
    pub unresolved_duplicates: Vec<String>,
    pub removed_objects: usize,
}

fn material_settings(props: Option<&MaterialProperties>) -> MaterialSettings {
    let Some(props) = props else {
        return MaterialSettings::default();
    };

    let (blend_method, alpha_threshold) = match props.blend_mode {
        BlendMode::Opaque => (BlendMethod::Opaque, None),
        BlendMode::Masked => (BlendMethod::Clip, Some(props.opacity_clip)),
        BlendMode::Translucent | BlendMode::Additive => (BlendMethod::Blend, None),
    };

    MaterialSettings {
        blend_method: Some(blend_method),
        alpha_threshold,
        backface_culling: !props.two_sided,
    }
}

/// Rebuilds the scene's materials from the `.mat`/`.props.txt`/`.tga` files of the asset root.
pub struct MaterialImporter<'a> {
    index: &'a FileIndex,
    sampler: &'a dyn AlphaSampler,
}

impl<'a> MaterialImporter<'a> {
    pub fn new(index: &'a FileIndex, sampler: &'a dyn AlphaSampler) -> Self {
        Self { index, sampler }
    }

    /// Processes every material of the scene, then removes the mesh objects of `collection` that
    /// ended up without a material.
    pub fn import<S: SceneRepository>(
        &self,
        scene: &mut S,
        collection: &str,
    ) -> Result<MaterialImportReport, HostError> {
        if !scene.has_collection(collection) {
            return Err(HostError::UnknownCollection(collection.to_string()));
        }

        let mut report = MaterialImportReport::default();
        let mut to_remove = Vec::new();

        for name in scene.material_names() {
            if name.contains(PLACEHOLDER_MATERIAL) {
                to_remove.push(name);
                continue;
            }

            scene.configure_material(&name, &MaterialSettings::default())?;
            scene.apply_shader_graph(&name, cleared_graph())?;

            if let Some((base_name, _)) = name.split_once('.') {
                if scene.has_material(base_name) {
                    self.repoint_slots(scene, &name, base_name)?;
                    to_remove.push(name);
                } else {
                    warn!("Cannot merge {} into {}, which doesn't exist", name, base_name);
                    report.unresolved_duplicates.push(name);
                }
                continue;
            }

            if self.build_material(scene, &name)? {
                report.built += 1;
            }
        }

        for name in &to_remove {
            scene.remove_material(name);
        }
        report.removed_materials = to_remove.len();

        for object in scene.collection_objects(collection) {
            if scene.object_kind(object) != Some(ObjectKind::Mesh) {
                continue;
            }

            let slots = scene.material_slots(object);
            if slots.first().is_none_or(Option::is_none) {
                debug!("Removing {:?}, it has no material", scene.object_name(object));
                scene.remove_object(object);
                report.removed_objects += 1;
            }
        }

        info!(
            "Material import for {}: {} built, {} removed, {} objects without material",
            collection, report.built, report.removed_materials, report.removed_objects
        );
        Ok(report)
    }

    fn repoint_slots<S: SceneRepository>(&self, scene: &mut S, from: &str, to: &str) -> Result<(), HostError> {
        for object in scene.scene_objects() {
            let slots = scene.material_slots(object);
            for (slot, material) in slots.iter().enumerate() {
                if material.as_deref() == Some(from) {
                    scene.set_material_slot(object, slot, to)?;
                }
            }
        }

        trace!("Merged {} into {}", from, to);
        Ok(())
    }

    /// Returns whether a graph was applied.
    fn build_material<S: SceneRepository>(&self, scene: &mut S, name: &str) -> Result<bool, HostError> {
        let Some(mat_path) = self.index.get(&format!("{}.mat", name)) else {
            debug!("No .mat for {}", name);
            return Ok(false);
        };

        let props = self
            .index
            .get(&format!("{}.props.txt", name))
            .map(PropsReader::parse_file);

        scene.configure_material(name, &material_settings(props.as_ref()))?;

        let legacy = match MatReader::parse_file(mat_path) {
            Ok(legacy) => legacy,
            Err(err) => {
                debug!("Unreadable {}: {}", mat_path.display(), err);
                return Ok(false);
            }
        };

        if !legacy.has_surface() {
            debug!("{} has neither diffuse nor normal texture", name);
            return Ok(false);
        }

        let roughness = resolve_roughness(
            props.as_ref(),
            self.index,
            texture_path(self.index, &legacy.roughness),
            texture_path(self.index, &legacy.normal),
            self.sampler,
        );

        let textures = ResolvedTextures {
            diffuse: texture_path(self.index, &legacy.diffuse),
            normal: roughness.normal,
            spec: texture_path(self.index, &legacy.spec),
            roughness: roughness.roughness,
            normal_alpha_roughness: roughness.normal_alpha_roughness,
        };

        trace!("{}: {:?}", name, textures);
        scene.apply_shader_graph(name, synthesize(name, &textures, props.as_ref()))?;
        Ok(true)
    }
}
