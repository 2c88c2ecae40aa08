use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cg_core::{load_config, CgError, PipelineConfig};
use clap::{Parser, Subcommand};
use commands::{
    doctor::{self, DoctorArgs},
    generate::{self, GenerateArgs},
    merge::{self, MergeArgs},
    prune::{self, PruneArgs},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod commands;

/// Configuration picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "costgrid.yaml";

#[derive(Parser, Debug)]
#[command(name = "costgrid", about = "Batch pricing report pipeline")]
struct Cli {
    /// YAML configuration; built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Only log warnings and errors.
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price every scenario row in both voice modes and write one report per pair.
    Generate(GenerateArgs),
    /// Drop rows costing more than twice the per-file minimum.
    Prune(PruneArgs),
    /// Interleave the inbuilt and voice reports into one workbook.
    Merge(MergeArgs),
    /// Check that the engine, its launcher and the configured paths are available.
    Doctor(DoctorArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet { LevelFilter::WARN } else { LevelFilter::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = pipeline_config(cli.config.as_deref())?;
    match cli.command {
        Command::Generate(args) => generate::run(&args, &config),
        Command::Prune(args) => prune::run(&args, &config),
        Command::Merge(args) => merge::run(&args, &config),
        Command::Doctor(args) => doctor::run(&args, &config),
    }
}

fn pipeline_config(path: Option<&Path>) -> Result<PipelineConfig, CgError> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG).is_file() => load_config(DEFAULT_CONFIG),
        None => Ok(PipelineConfig::default()),
    }
}
