//! Report stages of the costgrid pipeline: flattening engine scenarios,
//! batch generation, outlier pruning and interleaved merging.

mod flatten;
mod generate;
mod merge;
mod natural;
mod prune;
mod registry;

pub use flatten::{
    flatten, flatten_all, rows_to_table, FlatRow, COLUMNS, INBUILT_PRICING_MODEL,
    INBUILT_VOICE_AGENT,
};
pub use generate::{
    generate, load_scenarios, output_file_name, GenerateOpts, GenerateReport, GeneratedFile,
    RowFailure, ScenarioRow, Workload, REQUIRED_COLUMNS,
};
pub use merge::{merge_reports, sorted_reports, timestamped_output, MergeSummary};
pub use natural::{natural_key, sort_natural, NaturalKey};
pub use prune::{prune_folder, prune_table, FileOutcome, PruneOutcome, PruneSummary};
pub use registry::ProcessedFileRegistry;
