use std::path::PathBuf;

use crate::io::file_index::FileIndex;

/// Renderer agnostic description of a material's node tree, interpreted by the host.
pub mod graph;
pub mod material_importer;
pub mod roughness;
pub mod synthesizer;

pub const TEXTURE_EXTENSION: &str = ".tga";

/// Textures are referenced by their base name, the exporter writes them as `.tga`.
pub fn texture_path(index: &FileIndex, texture_name: &str) -> Option<PathBuf> {
    if texture_name.is_empty() {
        return None;
    }

    index
        .get(&format!("{}{}", texture_name, TEXTURE_EXTENSION))
        .map(|path| path.to_path_buf())
}
