use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{Rgba, RgbaImage};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A directory below the system temp dir that is removed again on drop.
pub struct TempTree {
    root: PathBuf,
}

impl TempTree {
    pub fn new(name: &str) -> Result<Self, std::io::Error> {
        let root = std::env::temp_dir().join(format!(
            "umap-importer-{}-{}-{}",
            name,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        if root.exists() {
            std::fs::remove_dir_all(&root)?;
        }
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> Result<PathBuf, std::io::Error> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// A small image whose alpha alternates between transparent and opaque columns.
    pub fn write_striped_alpha(&self, relative: &str) -> Result<PathBuf, anyhow::Error> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        RgbaImage::from_fn(8, 8, |x, _| Rgba([128, 128, 255, if x % 2 == 0 { 0 } else { 255 }])).save(&path)?;
        Ok(path)
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
