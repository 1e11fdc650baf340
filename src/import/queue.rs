use std::path::{Path, PathBuf};

use anyhow::bail;
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::host::{ImportService, ProgressSnapshot, SceneRepository};
use crate::import::task::ImportTask;
use crate::import::{AssetIndexes, HostContext};
use crate::material::material_importer::MaterialImporter;
use crate::material::roughness::{AlphaSampler, ImageAlphaSampler};
use crate::settings::ImportSettings;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum QueueState {
    Idle,
    Running,
    Complete,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedFile {
    pub name: String,
    pub entity_count: usize,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportTotals {
    pub maps: usize,
    pub objects: usize,
    /// Materials in the scene once the queue completed
    pub materials: usize,
}

/// `E1_3A` for `E1_3A_Diner.json`, the whole stem if there is no second part.
pub fn parent_collection_name(first_file: &Path) -> String {
    let stem = first_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut parts = stem.splitn(3, '_');
    if let (Some(first), Some(second)) = (parts.next(), parts.next()) {
        return format!("{}_{}", first, second);
    }

    stem
}

/// Imports JSON files one after another, driven by [`ImportQueue::tick`]. Every tick places one batch.
pub struct ImportQueue {
    settings: ImportSettings,
    sampler: Box<dyn AlphaSampler>,
    state: QueueState,
    files: Vec<PathBuf>,
    queue_index: usize,
    parent_collection: Option<String>,
    indexes: AssetIndexes,
    task: Option<ImportTask>,
    completed: Vec<CompletedFile>,
    totals: ImportTotals,
    snapshot: ProgressSnapshot,
}

impl ImportQueue {
    pub fn new(settings: ImportSettings) -> Self {
        Self {
            settings,
            sampler: Box::new(ImageAlphaSampler::default()),
            state: QueueState::Idle,
            files: vec![],
            queue_index: 0,
            parent_collection: None,
            indexes: AssetIndexes::default(),
            task: None,
            completed: vec![],
            totals: ImportTotals::default(),
            snapshot: ProgressSnapshot::default(),
        }
    }

    pub fn with_sampler(mut self, sampler: Box<dyn AlphaSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn completed(&self) -> &[CompletedFile] {
        &self.completed
    }

    pub fn totals(&self) -> ImportTotals {
        self.totals
    }

    pub fn parent_collection(&self) -> Option<&str> {
        self.parent_collection.as_deref()
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    /// Queues the `.json` files among `files`, creates the parent collection and builds the asset indexes.
    pub fn start<I: ImportService>(
        &mut self,
        host: &mut HostContext<I>,
        files: impl IntoIterator<Item = PathBuf>,
    ) -> anyhow::Result<()> {
        if self.state == QueueState::Running {
            bail!("An import is already running");
        }

        let (files, ignored): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"));

        for path in &ignored {
            warn!("Ignoring {}, it is not a JSON file", path.display());
        }

        let Some(first) = files.first() else {
            bail!("No valid JSON files selected");
        };

        let parent = host
            .scene
            .create_collection(&parent_collection_name(first), None)?;
        info!("Starting import of {} files into {}", files.len(), parent);

        self.indexes = AssetIndexes::build(&self.settings);
        self.parent_collection = Some(parent);
        self.completed.clear();
        self.totals = ImportTotals {
            maps: files.len(),
            ..ImportTotals::default()
        };
        self.snapshot = ProgressSnapshot {
            queue_total: files.len(),
            running: true,
            ..ProgressSnapshot::default()
        };
        self.files = files;
        self.queue_index = 0;
        self.task = None;
        self.state = QueueState::Running;

        host.progress.start_timer();
        host.progress.update(&self.snapshot);
        Ok(())
    }

    /// Places the next batch. Returns the state after the batch.
    pub fn tick<I: ImportService>(&mut self, host: &mut HostContext<I>) -> QueueState {
        if self.state != QueueState::Running {
            return self.state;
        }

        if self.task.is_none() && !self.open_next(host) {
            self.complete(host);
            return self.state;
        }

        let Some(task) = self.task.as_mut() else {
            return self.state;
        };

        task.advance(
            &mut *host.scene,
            &mut *host.importer,
            &self.indexes,
            self.settings.batch_size,
        );

        let file_fraction = task.current() as f32 / task.total().max(1) as f32;
        self.snapshot.entity_current = task.current();
        self.snapshot.overall_percent =
            (self.queue_index as f32 + file_fraction) / self.files.len().max(1) as f32 * 100.0;

        if task.is_exhausted() {
            self.finish_file(host);
        } else {
            host.progress.update(&self.snapshot);
        }

        self.state
    }

    /// Stops between two batches. Totals are kept, everything else starts over.
    pub fn cancel<I: ImportService>(&mut self, host: &mut HostContext<I>) {
        if self.state != QueueState::Running {
            return;
        }

        if let Some(task) = self.task.as_mut() {
            task.cancel();
        }
        self.task = None;
        self.files.clear();
        self.queue_index = 0;
        self.completed.clear();
        self.snapshot = ProgressSnapshot::default();
        self.state = QueueState::Cancelled;

        host.progress.release_timer();
        host.progress.update(&self.snapshot);
        warn!("Import cancelled");
    }

    /// Starts the next file that has something to import. Returns false when the queue is drained.
    fn open_next<I: ImportService>(&mut self, host: &mut HostContext<I>) -> bool {
        while let Some(path) = self.files.get(self.queue_index) {
            let mut task = ImportTask::new(path, self.settings.clone());
            self.snapshot.current_file = task.file_name();
            self.snapshot.queue_index = self.queue_index;

            match task.start(&mut *host.scene, self.parent_collection.as_deref()) {
                Ok(0) => warn!("No importable entities found in {}", path.display()),
                Ok(total) => {
                    self.snapshot.entity_current = 0;
                    self.snapshot.entity_total = total;
                    self.task = Some(task);
                    host.progress.update(&self.snapshot);
                    return true;
                }
                Err(err) => error!("Skipping {}: {:#}", path.display(), err),
            }

            self.queue_index += 1;
        }

        false
    }

    fn finish_file<I: ImportService>(&mut self, host: &mut HostContext<I>) {
        let Some(mut task) = self.task.take() else {
            return;
        };

        task.finish(&mut *host.scene, &mut *host.importer, &self.indexes);

        self.completed.push(CompletedFile {
            name: task.file_name(),
            entity_count: task.total(),
        });
        self.totals.objects += task.stats().objects;

        match MaterialImporter::new(&self.indexes.materials, self.sampler.as_ref())
            .import(&mut *host.scene, task.collection())
        {
            Ok(report) => debug!("{}: {:?}", task.collection(), report),
            Err(err) => warn!("Material import for {} failed: {}", task.collection(), err),
        }

        self.queue_index += 1;
        if self.queue_index >= self.files.len() {
            self.complete(host);
        } else {
            host.progress.update(&self.snapshot);
        }
    }

    fn complete<I: ImportService>(&mut self, host: &mut HostContext<I>) {
        self.totals.materials = host.scene.material_names().len();
        self.files.clear();
        self.queue_index = 0;
        self.snapshot = ProgressSnapshot {
            overall_percent: 100.0,
            complete: true,
            ..ProgressSnapshot::default()
        };
        self.state = QueueState::Complete;

        host.progress.release_timer();
        host.progress.update(&self.snapshot);
        info!(
            "Import complete: {} maps, {} objects, {} materials",
            self.totals.maps, self.totals.objects, self.totals.materials
        );
    }
}
