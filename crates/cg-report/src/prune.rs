use std::path::Path;

use cg_core::errors::{CgError, ErrorInfo};
use cg_sheet::{list_spreadsheets, read_table, write_table, Table};
use serde::Serialize;

use crate::natural::sort_natural;
use crate::registry::ProcessedFileRegistry;

/// Result of pruning one table in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneOutcome {
    /// Smallest numeric value in the column.
    pub lowest: f64,
    /// Twice `lowest`; rows above it are dropped.
    pub threshold: f64,
    /// Data rows before filtering.
    pub rows_before: usize,
    /// Data rows kept.
    pub rows_after: usize,
    /// Surviving rows, in their original order.
    pub table: Table,
}

/// What happened to one file during a folder scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Pruned {
        lowest: f64,
        threshold: f64,
        rows_before: usize,
        rows_after: usize,
    },
    /// Already listed in the registry.
    Skipped,
    ColumnMissing,
    ColumnEmpty,
    Failed { message: String },
}

impl FileOutcome {
    fn is_failure(&self) -> bool {
        matches!(
            self,
            FileOutcome::ColumnMissing | FileOutcome::ColumnEmpty | FileOutcome::Failed { .. }
        )
    }
}

/// Counters and per-file outcomes of [`prune_folder`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PruneSummary {
    pub found: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<(String, FileOutcome)>,
}

impl PruneSummary {
    fn record(&mut self, name: String, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Pruned { .. } => self.processed += 1,
            FileOutcome::Skipped => self.skipped += 1,
            other if other.is_failure() => self.failed += 1,
            _ => {}
        }
        self.outcomes.push((name, outcome));
    }
}

/// Drops rows whose `column` value exceeds twice the column minimum.
///
/// Cells without a numeric value never survive. Fails with a data shape
/// error when the column is absent (`prune.column_missing`) or holds no
/// numeric value (`prune.column_empty`).
pub fn prune_table(table: &Table, column: &str) -> Result<PruneOutcome, CgError> {
    let idx = table.column_index(column).ok_or_else(|| {
        CgError::DataShape(
            ErrorInfo::new("prune.column_missing", format!("column '{column}' not found"))
                .with_context("available", table.columns.join(", ")),
        )
    })?;
    let lowest = table
        .column(idx)
        .filter_map(|cell| cell.as_f64())
        .reduce(f64::min)
        .ok_or_else(|| {
            CgError::DataShape(ErrorInfo::new(
                "prune.column_empty",
                format!("column '{column}' is empty"),
            ))
        })?;
    let threshold = 2.0 * lowest;

    let mut pruned = table.clone();
    pruned.retain_rows(|row| {
        row[idx]
            .as_f64()
            .map(|value| value <= threshold)
            .unwrap_or(false)
    });
    Ok(PruneOutcome {
        lowest,
        threshold,
        rows_before: table.len(),
        rows_after: pruned.len(),
        table: pruned,
    })
}

/// Prunes every unregistered spreadsheet directly inside `folder`.
///
/// Files are visited in natural name order. Each successfully rewritten file
/// is registered and the registry flushed before the next file is touched;
/// per-file problems are logged and leave the file unregistered.
pub fn prune_folder(
    folder: &Path,
    column: &str,
    registry: &mut ProcessedFileRegistry,
) -> Result<PruneSummary, CgError> {
    if !folder.is_dir() {
        return Err(CgError::Config(
            ErrorInfo::new("prune.folder_missing", "folder does not exist")
                .with_context("path", folder.display().to_string()),
        ));
    }
    let mut files = list_spreadsheets(folder)?;
    sort_natural(&mut files);

    let mut summary = PruneSummary {
        found: files.len(),
        ..PruneSummary::default()
    };
    for path in files {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if registry.contains(&name) {
            tracing::info!(file = %name, "skipping already processed file");
            summary.record(name, FileOutcome::Skipped);
            continue;
        }
        let outcome = prune_file(&path, column);
        if let FileOutcome::Pruned { .. } = outcome {
            registry.insert(name.clone());
            registry.save()?;
        }
        summary.record(name, outcome);
    }
    Ok(summary)
}

fn prune_file(path: &Path, column: &str) -> FileOutcome {
    let name = path.display();
    let table = match read_table(path) {
        Ok(table) => table,
        Err(err) => {
            tracing::error!(file = %name, code = err.code(), error = %err, "failed to read report");
            return FileOutcome::Failed { message: err.to_string() };
        }
    };
    let outcome = match prune_table(&table, column) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(file = %name, code = err.code(), error = %err, "report left untouched");
            return match err.code() {
                "prune.column_missing" => FileOutcome::ColumnMissing,
                _ => FileOutcome::ColumnEmpty,
            };
        }
    };
    if let Err(err) = write_table(path, &outcome.table) {
        tracing::error!(file = %name, code = err.code(), error = %err, "failed to rewrite report");
        return FileOutcome::Failed { message: err.to_string() };
    }
    tracing::info!(
        file = %name,
        lowest = outcome.lowest,
        threshold = outcome.threshold,
        rows_before = outcome.rows_before,
        rows_after = outcome.rows_after,
        removed = outcome.rows_before - outcome.rows_after,
        "pruned report"
    );
    FileOutcome::Pruned {
        lowest: outcome.lowest,
        threshold: outcome.threshold,
        rows_before: outcome.rows_before,
        rows_after: outcome.rows_after,
    }
}
