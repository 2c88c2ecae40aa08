//! Structured error types shared across costgrid crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic payload carried by every [`CgError`]: what failed in the
/// pipeline, where, and what the operator can do about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Dotted error code such as `engine.exit_status` or `prune.folder_missing`.
    pub code: String,
    /// Short description shown in run logs.
    pub message: String,
    /// Report paths, engine command line, exit code and captured stdout/stderr.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Remediation shown after the message, e.g. how to install the engine runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with a code and message and no context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Attaches one context entry, replacing an earlier value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the reporting pipeline.
///
/// Only [`CgError::Config`] is fatal for a run; every other family is scoped
/// to a single request, file or row and is logged by the batch loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CgError {
    /// Missing input table, engine, required columns or output path.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Pricing engine lookup, spawn, exit status or output failures.
    #[error("engine error: {0}")]
    Engine(ErrorInfo),
    /// Spreadsheet or registry read/write failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Expected column absent, empty or holding unusable values.
    #[error("data shape error: {0}")]
    DataShape(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl CgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CgError::Config(info)
            | CgError::Engine(info)
            | CgError::Io(info)
            | CgError::DataShape(info)
            | CgError::Serde(info) => info,
        }
    }

    /// Stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Whether the error must abort the whole run before any work starts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CgError::Config(_))
    }
}

/// Wraps an I/O failure on `path` into [`CgError::Io`].
pub fn io_error(code: &str, path: &std::path::Path, err: impl ToString) -> CgError {
    CgError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}
