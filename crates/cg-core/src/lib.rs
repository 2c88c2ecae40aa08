#![deny(missing_docs)]
#![doc = "Error taxonomy, serde helpers and configuration shared by the costgrid crates."]

pub mod config;
pub mod errors;
pub mod serde;

pub use config::{
    load_config, BudgetSpec, EngineSpec, GenerateSpec, MergeSpec, PipelineConfig, PruneSpec,
};
pub use errors::{io_error, CgError, ErrorInfo};
