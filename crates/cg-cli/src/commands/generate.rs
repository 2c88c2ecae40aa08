use std::error::Error;
use std::path::PathBuf;

use cg_core::PipelineConfig;
use cg_engine::VoiceMode;
use cg_report::{generate, load_scenarios, GenerateOpts};
use clap::Args;

use super::engine_client;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Scenario table (CSV or spreadsheet) with users, minutes and concurrency columns.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Directory for inbuilt voice reports.
    #[arg(long = "out-inbuilt")]
    pub out_inbuilt: Option<PathBuf>,
    /// Directory for voice agent reports.
    #[arg(long = "out-voice")]
    pub out_voice: Option<PathBuf>,
    /// Pricing engine script.
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Monthly budget in INR.
    #[arg(long)]
    pub budget: Option<f64>,
    /// Percentage of the budget allocated to APIs.
    #[arg(long = "api-percent")]
    pub api_percent: Option<f64>,
    /// Percentage of the budget allocated to hosting.
    #[arg(long = "hosting-percent")]
    pub hosting_percent: Option<f64>,
}

pub fn run(args: &GenerateArgs, config: &PipelineConfig) -> Result<(), Box<dyn Error>> {
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| config.resolve(&config.generate.input));
    let mut budget = config.budget.clone();
    if let Some(value) = args.budget {
        budget.monthly_budget_inr = value;
    }
    if let Some(value) = args.api_percent {
        budget.api_allocation_percent = value;
    }
    if let Some(value) = args.hosting_percent {
        budget.hosting_allocation_percent = value;
    }
    let opts = GenerateOpts {
        budget,
        output_inbuilt: args
            .out_inbuilt
            .clone()
            .unwrap_or_else(|| config.resolve(&config.generate.output_inbuilt)),
        output_voice: args
            .out_voice
            .clone()
            .unwrap_or_else(|| config.resolve(&config.generate.output_voice)),
    };

    tracing::info!(
        input = %input.display(),
        inbuilt = %opts.output_inbuilt.display(),
        voice = %opts.output_voice.display(),
        "budget {} INR (api {}%, hosting {}%)",
        opts.budget.monthly_budget_inr,
        opts.budget.api_allocation_percent,
        opts.budget.hosting_allocation_percent
    );

    let client = engine_client(config, args.script.as_deref())?;
    client.check_script()?;
    tracing::info!(launcher = %client.launcher(), script = %client.script().display(), "engine found");

    let rows = load_scenarios(&input)?;
    tracing::info!(rows = rows.len(), "scenario table loaded");

    let report = generate(&client, &rows, &opts);
    tracing::info!(
        rows = report.rows,
        inbuilt = report.saved(VoiceMode::Inbuilt),
        voice = report.saved(VoiceMode::Voice),
        failures = report.failures.len(),
        "batch processing completed"
    );
    Ok(())
}
