use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use cg_core::errors::{CgError, ErrorInfo};
use cg_core::serde::to_json_bytes;
use tempfile::NamedTempFile;

use crate::codes;
use crate::launcher::Launcher;
use crate::request::ScenarioRequest;
use crate::result::ScenarioResult;

/// Request/response contract of the pricing engine.
pub trait PricingEngine {
    /// Prices one request, returning the scenarios in rank order.
    fn invoke(&self, request: &ScenarioRequest) -> Result<Vec<ScenarioResult>, CgError>;
}

/// Runs the engine script as a child process, one process per request.
///
/// The request is written to a temporary `.json` file whose path is passed
/// as the last argument; stdout must hold a single JSON array. There is no
/// retry and no timeout.
#[derive(Debug, Clone)]
pub struct EngineClient {
    launcher: Launcher,
    script: PathBuf,
    working_dir: PathBuf,
}

impl EngineClient {
    /// Creates a client for `script`, run by `launcher` inside `working_dir`.
    pub fn new(launcher: Launcher, script: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            launcher,
            script: script.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Launcher used for every invocation.
    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    /// Engine script passed to the launcher.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Fails with a configuration error when the engine script does not exist.
    pub fn check_script(&self) -> Result<(), CgError> {
        if self.script.is_file() {
            return Ok(());
        }
        Err(CgError::Config(
            ErrorInfo::new(codes::ENGINE_SCRIPT_MISSING, "calculator script not found")
                .with_context("path", self.script.display().to_string()),
        ))
    }

    fn write_request(&self, request: &ScenarioRequest) -> Result<NamedTempFile, CgError> {
        let payload = to_json_bytes(request)?;
        let mut file = tempfile::Builder::new()
            .prefix("costgrid-request-")
            .suffix(".json")
            .tempfile()
            .map_err(|err| CgError::Io(ErrorInfo::new(codes::ENGINE_REQUEST_FILE, err.to_string())))?;
        if let Err(err) = file.write_all(&payload).and_then(|_| file.flush()) {
            return Err(CgError::Io(
                ErrorInfo::new(codes::ENGINE_REQUEST_FILE, err.to_string())
                    .with_context("path", file.path().display().to_string()),
            ));
        }
        Ok(file)
    }
}

impl PricingEngine for EngineClient {
    fn invoke(&self, request: &ScenarioRequest) -> Result<Vec<ScenarioResult>, CgError> {
        // Dropping the handle removes the file on every return path; removal
        // errors are ignored.
        let input = self.write_request(request)?;
        let command_line = self.launcher.command_line(&self.script, input.path());
        tracing::debug!(command = %command_line, "invoking pricing engine");

        let output = Command::new(&self.launcher.program)
            .args(&self.launcher.prefix)
            .arg(&self.script)
            .arg(input.path())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                CgError::Engine(
                    ErrorInfo::new(codes::ENGINE_SPAWN, err.to_string())
                        .with_context("command", command_line.clone()),
                )
            })?;
        drop(input);

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            let exit_code = output
                .status
                .code()
                .map(|code| code.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(CgError::Engine(
                ErrorInfo::new(codes::ENGINE_EXIT_STATUS, "error running calculator")
                    .with_context("command", command_line)
                    .with_context("exit_code", exit_code)
                    .with_context("stdout", stdout)
                    .with_context("stderr", stderr),
            ));
        }
        parse_output(&stdout)
    }
}

/// Parses the engine's stdout into ranked scenarios.
pub fn parse_output(stdout: &str) -> Result<Vec<ScenarioResult>, CgError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(CgError::Engine(ErrorInfo::new(
            codes::ENGINE_EMPTY_OUTPUT,
            "no output from calculator script",
        )));
    }
    serde_json::from_str(trimmed).map_err(|err| {
        CgError::Engine(
            ErrorInfo::new(codes::ENGINE_MALFORMED_OUTPUT, err.to_string())
                .with_context("output", trimmed.to_string()),
        )
    })
}
