use std::error::Error;
use std::path::PathBuf;

use cg_core::PipelineConfig;
use cg_report::{merge_reports, timestamped_output};
use chrono::Local;
use clap::Args;

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Folder with the inbuilt voice reports.
    #[arg(long)]
    pub inbuilt: Option<PathBuf>,
    /// Folder with the voice agent reports.
    #[arg(long)]
    pub voice: Option<PathBuf>,
    /// Merged workbook; defaults to a timestamped name in the merge output directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &MergeArgs, config: &PipelineConfig) -> Result<(), Box<dyn Error>> {
    let inbuilt = args
        .inbuilt
        .clone()
        .unwrap_or_else(|| config.resolve(&config.generate.output_inbuilt));
    let voice = args
        .voice
        .clone()
        .unwrap_or_else(|| config.resolve(&config.generate.output_voice));
    let output = match &args.out {
        Some(out) => out.clone(),
        None => timestamped_output(
            &config.resolve(&config.merge.output_dir),
            Local::now().naive_local(),
        ),
    };

    tracing::info!(
        inbuilt = %inbuilt.display(),
        voice = %voice.display(),
        output = %output.display(),
        "merging reports"
    );
    let summary = merge_reports(&inbuilt, &voice, &output)?;
    tracing::info!(
        files_inbuilt = summary.files_a,
        files_voice = summary.files_b,
        rows = summary.rows,
        output = %summary.output.display(),
        "merge completed"
    );
    Ok(())
}
