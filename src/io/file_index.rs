use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

/// The files the material import looks up by name.
pub const MATERIAL_EXTENSIONS: [&str; 3] = [".mat", ".tga", ".props.txt"];
pub const ANIMATION_EXTENSION: &str = ".psa";

/// Maps file names (or stems, for the animation index) to their location below an asset root.
/// When a name exists in multiple directories, the last one in walk order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    files: BTreeMap<String, PathBuf>,
}

impl FileIndex {
    pub fn build(root: &Path, extensions: &[&str]) -> Self {
        let files = walk_files(root)
            .filter(|(name, _)| extensions.iter().any(|ext| name.ends_with(ext)))
            .collect();

        let index = Self { files };
        info!("Indexed {} files below {}", index.len(), root.display());
        index
    }

    /// `.psa` files, keyed by the name without extension (i.e. the animation name).
    pub fn build_animation_index(root: &Path) -> Self {
        let files = walk_files(root)
            .filter_map(|(name, path)| {
                name.strip_suffix(ANIMATION_EXTENSION)
                    .map(|stem| (stem.to_string(), path))
            })
            .collect();

        let index = Self { files };
        info!("Indexed {} PSA files", index.len());
        index
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.files.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

impl FromIterator<(String, PathBuf)> for FileIndex {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Every regular file below `root` as `(file name, path)`, in a stable order.
pub(crate) fn walk_files(root: &Path) -> impl Iterator<Item = (String, PathBuf)> + use<> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.into_path()))
        })
}
