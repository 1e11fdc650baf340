use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use umap_files::audio::reader::TranslationTableReader;
use umap_files::audio::types::{is_wwise_id, TranslationTable};

use crate::io::file_index::walk_files;

/// Where the converted wwise audio may live, relative to the asset root. First existing wins.
const WWISE_DIRECTORIES: [&str; 3] = [
    "LiS/Content/WwiseAudio/Windows",
    "LiS/Content/WwiseAudio",
    "WwiseAudio",
];

const AUDIO_EXTENSIONS: [&str; 2] = ["wav", "ogg"];
const TABLE_EXTENSION: &str = "txt";

/// Sound name -> converted audio file.
/// The converted files are named by their wwise id, the soundbank tables translate those ids to names.
#[derive(Debug, Clone, Default)]
pub struct AudioIndex {
    names: BTreeMap<String, PathBuf>,
}

impl AudioIndex {
    pub fn locate_wwise_dir(root: &Path) -> Option<PathBuf> {
        WWISE_DIRECTORIES
            .iter()
            .map(|dir| root.join(dir))
            .find(|dir| dir.exists())
    }

    pub fn build(root: &Path) -> Self {
        let Some(wwise_dir) = Self::locate_wwise_dir(root) else {
            debug!("No WwiseAudio directory below {}", root.display());
            return Self::default();
        };

        let mut names = BTreeMap::new();
        let mut id_to_file = BTreeMap::new();

        for (_, path) in walk_files(&wwise_dir) {
            let is_audio = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext));
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string) else {
                continue;
            };

            if !is_audio {
                continue;
            }

            if is_wwise_id(&stem) {
                id_to_file.insert(stem, path);
            } else {
                names.insert(stem, path);
            }
        }

        let table = Self::read_translation_tables(&wwise_dir);

        for (id, name) in &table.names {
            let Some(file) = id_to_file.get(id) else {
                continue;
            };

            names.insert(name.clone(), file.clone());
            if let Some(short_name) = name.strip_prefix("A_") {
                names.insert(short_name.to_string(), file.clone());
            }
        }

        info!(
            "Audio index: {} files, {} name mappings, {} indexed",
            id_to_file.len(),
            table.len(),
            names.len()
        );

        Self { names }
    }

    /// Reads every `*.txt` directly inside `wwise_dir`, in file name order.
    fn read_translation_tables(wwise_dir: &Path) -> TranslationTable {
        let mut table = TranslationTable::default();

        let mut tables = match std::fs::read_dir(wwise_dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .filter(|path| path.extension().is_some_and(|ext| ext == TABLE_EXTENSION))
                .collect::<Vec<_>>(),
            Err(err) => {
                warn!("Failed to list {}: {}", wwise_dir.display(), err);
                return table;
            }
        };
        tables.sort();

        for path in tables {
            match TranslationTableReader::parse_file(&path) {
                Ok(parsed) => table.extend(parsed),
                Err(err) => warn!("Failed to parse {}: {}", path.display(), err),
            }
        }

        table
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.names.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// In name order, which is also the tie-breaking order of the fuzzy matcher.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.names
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

impl FromIterator<(String, PathBuf)> for AudioIndex {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempTree;

    const TABLE: &str = "In Memory Audio\tID\tName\tAudio source file\n\
\t364785238\tA_E1_S02_ClassArt_NextDoor_Skate_01\tSkate.wav\n\
\t402615791\tA_BlowTrees\tBlowTrees.wav\n\
\t555\tA_Missing\tMissing.wav\n\
Event\tID\tName\n\
\t1\tPlay_A_BlowTrees\n";

    #[test_log::test]
    fn translated_names() -> Result<(), anyhow::Error> {
        let tree = TempTree::new("audio-index")?;
        let skate = tree.write("LiS/Content/WwiseAudio/Windows/SFX/364785238.wav", "")?;
        let trees = tree.write("LiS/Content/WwiseAudio/Windows/402615791.ogg", "")?;
        let rain = tree.write("LiS/Content/WwiseAudio/Windows/Ambience/A_Rain.wav", "")?;
        tree.write("LiS/Content/WwiseAudio/Windows/123.wem", "")?;
        tree.write("LiS/Content/WwiseAudio/Windows/E1_2A.txt", TABLE)?;

        let index = AudioIndex::build(tree.path());

        assert_eq!(
            index.get("A_E1_S02_ClassArt_NextDoor_Skate_01"),
            Some(skate.as_path())
        );
        assert_eq!(index.get("E1_S02_ClassArt_NextDoor_Skate_01"), Some(skate.as_path()));
        assert_eq!(index.get("A_BlowTrees"), Some(trees.as_path()));
        assert_eq!(index.get("BlowTrees"), Some(trees.as_path()));
        assert_eq!(index.get("A_Rain"), Some(rain.as_path()));
        assert_eq!(index.get("A_Missing"), None);
        assert_eq!(index.get("Play_A_BlowTrees"), None);
        assert_eq!(index.get("123"), None);
        assert_eq!(index.len(), 5);
        Ok(())
    }

    #[test]
    fn wwise_directory_fallbacks() -> Result<(), anyhow::Error> {
        let tree = TempTree::new("audio-index-dirs")?;
        assert_eq!(AudioIndex::locate_wwise_dir(tree.path()), None);
        assert!(AudioIndex::build(tree.path()).is_empty());

        tree.write("WwiseAudio/A_Door.ogg", "")?;
        assert_eq!(
            AudioIndex::locate_wwise_dir(tree.path()),
            Some(tree.path().join("WwiseAudio"))
        );

        tree.write("LiS/Content/WwiseAudio/A_Door.ogg", "")?;
        assert_eq!(
            AudioIndex::locate_wwise_dir(tree.path()),
            Some(tree.path().join("LiS/Content/WwiseAudio"))
        );
        assert!(AudioIndex::build(tree.path()).get("A_Door").is_some());
        Ok(())
    }
}
