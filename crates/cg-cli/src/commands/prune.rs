use std::error::Error;
use std::path::PathBuf;

use cg_core::PipelineConfig;
use cg_report::{prune_folder, ProcessedFileRegistry};
use clap::Args;

use super::missing_path;

#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Folder holding the reports to prune.
    #[arg(long)]
    pub folder: Option<PathBuf>,
    /// Column whose minimum sets the threshold.
    #[arg(long)]
    pub column: Option<String>,
    /// JSON file recording already pruned reports.
    #[arg(long)]
    pub registry: Option<PathBuf>,
}

pub fn run(args: &PruneArgs, config: &PipelineConfig) -> Result<(), Box<dyn Error>> {
    let folder = match (&args.folder, &config.prune.folder) {
        (Some(folder), _) => folder.clone(),
        (None, Some(folder)) => config.resolve(folder),
        (None, None) => return Err(missing_path("folder to prune", "--folder", "prune.folder").into()),
    };
    let column = args
        .column
        .clone()
        .unwrap_or_else(|| config.prune.column.clone());
    let registry_path = args
        .registry
        .clone()
        .unwrap_or_else(|| config.resolve(&config.prune.registry));

    tracing::info!(
        folder = %folder.display(),
        column = %column,
        registry = %registry_path.display(),
        "scanning folder"
    );
    let mut registry = ProcessedFileRegistry::load(registry_path);
    let summary = prune_folder(&folder, &column, &mut registry)?;
    tracing::info!(
        found = summary.found,
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        "prune summary"
    );
    Ok(())
}
