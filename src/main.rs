use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use clap::Parser;
use log::info;
use serde::Serialize;
use umap_importer::host::memory::{LocalImportService, MemoryScene};
use umap_importer::host::{ProgressSink, ProgressSnapshot};
use umap_importer::import::HostContext;
use umap_importer::import::queue::{CompletedFile, ImportQueue, ImportTotals, QueueState};
use umap_importer::settings::{CliArgs, ImportSettings};

/// There is no progress bar on the command line, every new percent is logged instead.
#[derive(Debug, Default)]
struct LogProgress {
    last_percent: Option<u32>,
}

impl ProgressSink for LogProgress {
    fn start_timer(&mut self) {
        self.last_percent = None;
    }

    fn release_timer(&mut self) {}

    fn update(&mut self, snapshot: &ProgressSnapshot) {
        if !snapshot.running {
            return;
        }

        let percent = snapshot.overall_percent.floor() as u32;
        if self.last_percent != Some(percent) {
            info!(
                "{:>3}% {} ({}/{})",
                percent, snapshot.current_file, snapshot.entity_current, snapshot.entity_total
            );
            self.last_percent = Some(percent);
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    totals: ImportTotals,
    completed: &'a [CompletedFile],
    scene: &'a MemoryScene,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    let mut scene = MemoryScene::default();
    let mut importer = LocalImportService::default();
    let mut progress = LogProgress::default();
    let mut queue = ImportQueue::new(ImportSettings::from(&args));

    {
        let mut host = HostContext {
            scene: &mut scene,
            importer: &mut importer,
            progress: &mut progress,
        };

        queue.start(&mut host, args.json_files.clone())?;
        while queue.tick(&mut host) == QueueState::Running {}
    }

    if let Some(report_path) = &args.report {
        let file = File::create(report_path)
            .with_context(|| format!("Failed to create {}", report_path.display()))?;

        serde_json::to_writer_pretty(
            BufWriter::new(file),
            &Report {
                totals: queue.totals(),
                completed: queue.completed(),
                scene: &scene,
            },
        )?;
        info!("Wrote the scene to {}", report_path.display());
    }

    Ok(())
}
