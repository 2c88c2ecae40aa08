use std::env;
use std::path::Path;

use cg_core::{CgError, ErrorInfo, PipelineConfig};
use cg_engine::{locate_launcher, EngineClient};

pub mod doctor;
pub mod generate;
pub mod merge;
pub mod prune;

/// Builds the engine client, resolving the script against the current directory.
///
/// The child runs inside the engine working directory, so a relative script
/// path must be made absolute before it is handed over.
pub(crate) fn engine_client(
    config: &PipelineConfig,
    script_override: Option<&Path>,
) -> Result<EngineClient, CgError> {
    let launcher = locate_launcher(&config.engine.launcher)?;
    let script = match script_override {
        Some(script) => script.to_path_buf(),
        None => config.resolve(&config.engine.script),
    };
    let script = if script.is_absolute() {
        script
    } else {
        env::current_dir()
            .map_err(|err| cg_core::io_error("cli.current_dir", Path::new("."), err))?
            .join(script)
    };
    Ok(EngineClient::new(
        launcher,
        script,
        config.resolve(&config.engine.working_dir),
    ))
}

pub(crate) fn missing_path(what: &str, flag: &str, key: &str) -> CgError {
    CgError::Config(
        ErrorInfo::new("config.missing_path", format!("no {what} configured"))
            .with_hint(format!("pass {flag} or set {key} in the configuration")),
    )
}
