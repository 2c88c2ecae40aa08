use std::path::{Path, PathBuf};

use cg_core::errors::{CgError, ErrorInfo};
use cg_core::BudgetSpec;
use cg_engine::{PricingEngine, ScenarioRequest, VoiceMode};
use cg_sheet::{read_table, write_table, Cell};
use serde::Serialize;

use crate::flatten::{flatten_all, rows_to_table};

/// Input columns that every scenario table must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["users", "minutes", "concurrency"];

/// One input row as read from the scenario table, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRow {
    /// 1-based position among the data rows.
    pub number: usize,
    pub users: Cell,
    pub minutes: Cell,
    pub concurrency: Cell,
}

/// Validated workload of a [`ScenarioRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    pub users: u64,
    pub minutes: u64,
    pub concurrency: u64,
}

impl ScenarioRow {
    /// Converts the raw cells to counts, truncating toward zero.
    pub fn workload(&self) -> Result<Workload, CgError> {
        Ok(Workload {
            users: count(&self.users, "users", self.number)?,
            minutes: count(&self.minutes, "minutes", self.number)?,
            concurrency: count(&self.concurrency, "concurrency", self.number)?,
        })
    }
}

fn count(cell: &Cell, column: &str, row: usize) -> Result<u64, CgError> {
    let value = match cell {
        Cell::Number(value) => Some(*value),
        Cell::Text(text) => text.trim().parse::<f64>().ok(),
        Cell::Empty | Cell::Bool(_) => None,
    };
    match value {
        Some(value) if value.is_finite() && value >= 0.0 => Ok(value.trunc() as u64),
        _ => Err(CgError::DataShape(
            ErrorInfo::new("generate.invalid_value", format!("invalid {column} value"))
                .with_context("row", row.to_string())
                .with_context("column", column)
                .with_context("value", cell.to_string()),
        )),
    }
}

/// Reads the scenario table (CSV or spreadsheet).
///
/// Header names match case-insensitively; extra columns are ignored and
/// fully blank rows are skipped. Cell values are validated per row later,
/// by [`ScenarioRow::workload`].
pub fn load_scenarios(path: &Path) -> Result<Vec<ScenarioRow>, CgError> {
    if !path.is_file() {
        return Err(CgError::Config(
            ErrorInfo::new("config.input_missing", "scenario table not found")
                .with_context("path", path.display().to_string()),
        ));
    }
    let table = read_table(path)?;
    let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| table.column_index_ignore_case(name))
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .zip(&positions)
        .filter(|(_, position)| position.is_none())
        .map(|(name, _)| *name)
        .collect();
    let (users, minutes, concurrency) = match positions[..] {
        [Some(users), Some(minutes), Some(concurrency)] => (users, minutes, concurrency),
        _ => {
            let available: Vec<String> =
                table.columns.iter().map(|name| name.to_lowercase()).collect();
            return Err(CgError::Config(
                ErrorInfo::new("config.missing_columns", "missing required columns")
                    .with_context("missing", missing.join(", "))
                    .with_context("available", available.join(", "))
                    .with_context("path", path.display().to_string()),
            ));
        }
    };

    Ok(table
        .rows
        .iter()
        .filter(|row| !row.iter().all(Cell::is_blank))
        .enumerate()
        .map(|(idx, row)| ScenarioRow {
            number: idx + 1,
            users: row[users].clone(),
            minutes: row[minutes].clone(),
            concurrency: row[concurrency].clone(),
        })
        .collect())
}

/// Output settings for [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOpts {
    pub budget: BudgetSpec,
    pub output_inbuilt: PathBuf,
    pub output_voice: PathBuf,
}

impl GenerateOpts {
    /// Directory receiving the reports of `mode`.
    pub fn output_dir(&self, mode: VoiceMode) -> &Path {
        match mode {
            VoiceMode::Inbuilt => &self.output_inbuilt,
            VoiceMode::Voice => &self.output_voice,
        }
    }
}

/// Report file name for one (row, mode) pair.
pub fn output_file_name(workload: &Workload, mode: VoiceMode) -> String {
    format!("{}_{}_{}.xlsx", workload.minutes, workload.concurrency, mode.label())
}

/// A report written by [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFile {
    pub row: usize,
    pub mode: VoiceMode,
    pub path: PathBuf,
    pub combinations: usize,
}

/// A row or (row, mode) pair that produced no report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    /// `None` when the row itself was invalid and no mode ran.
    pub mode: Option<VoiceMode>,
    pub error: CgError,
}

/// Outcome of a [`generate`] run: written reports and per-row failures.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GenerateReport {
    /// Input rows seen, valid or not.
    pub rows: usize,
    pub files: Vec<GeneratedFile>,
    pub failures: Vec<RowFailure>,
}

impl GenerateReport {
    /// Number of reports written for `mode`.
    pub fn saved(&self, mode: VoiceMode) -> usize {
        self.files.iter().filter(|file| file.mode == mode).count()
    }
}

/// Prices every row in both voice modes and writes one report per pair.
///
/// Rows run in input order, inbuilt before voice. A failure is recorded and
/// logged without affecting the other mode or later rows.
pub fn generate<E: PricingEngine>(
    engine: &E,
    rows: &[ScenarioRow],
    opts: &GenerateOpts,
) -> GenerateReport {
    let mut report = GenerateReport {
        rows: rows.len(),
        ..GenerateReport::default()
    };
    for (idx, row) in rows.iter().enumerate() {
        let workload = match row.workload() {
            Ok(workload) => workload,
            Err(err) => {
                tracing::error!(row = row.number, code = err.code(), error = %err, "skipping row");
                report.failures.push(RowFailure {
                    row: row.number,
                    mode: None,
                    error: err,
                });
                continue;
            }
        };
        tracing::info!(
            "[{}/{}] processing: {} min, {} concurrent, {} users",
            idx + 1,
            rows.len(),
            workload.minutes,
            workload.concurrency,
            workload.users
        );
        for mode in VoiceMode::ALL {
            match run_mode(engine, &workload, mode, opts) {
                Ok((path, combinations)) => {
                    tracing::info!(row = row.number, %mode, file = %path.display(), "saved {combinations} combinations");
                    report.files.push(GeneratedFile {
                        row: row.number,
                        mode,
                        path,
                        combinations,
                    });
                }
                Err(err) => {
                    tracing::error!(row = row.number, %mode, code = err.code(), error = %err, "mode failed");
                    report.failures.push(RowFailure {
                        row: row.number,
                        mode: Some(mode),
                        error: err,
                    });
                }
            }
        }
    }
    report
}

fn run_mode<E: PricingEngine>(
    engine: &E,
    workload: &Workload,
    mode: VoiceMode,
    opts: &GenerateOpts,
) -> Result<(PathBuf, usize), CgError> {
    let request = ScenarioRequest::new(
        &opts.budget,
        workload.users,
        workload.minutes,
        workload.concurrency,
        mode,
    );
    let results = engine.invoke(&request)?;
    let table = rows_to_table(&flatten_all(&results));
    let path = opts.output_dir(mode).join(output_file_name(workload, mode));
    write_table(&path, &table)?;
    Ok((path, results.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(users: Cell, minutes: Cell, concurrency: Cell) -> ScenarioRow {
        ScenarioRow {
            number: 3,
            users,
            minutes,
            concurrency,
        }
    }

    #[test]
    fn numbers_and_numeric_text_truncate() {
        let workload = row(Cell::Number(50.9), Cell::text("900"), Cell::text(" 5.0 "))
            .workload()
            .expect("valid row");
        assert_eq!(
            workload,
            Workload {
                users: 50,
                minutes: 900,
                concurrency: 5
            }
        );
    }

    #[test]
    fn blank_negative_and_text_values_fail_the_row() {
        for bad in [Cell::Empty, Cell::Number(-1.0), Cell::text("many"), Cell::Bool(true)] {
            let err = row(Cell::Number(1.0), bad, Cell::Number(1.0))
                .workload()
                .expect_err("invalid");
            assert_eq!(err.code(), "generate.invalid_value");
            assert_eq!(err.info().context.get("column").map(String::as_str), Some("minutes"));
            assert_eq!(err.info().context.get("row").map(String::as_str), Some("3"));
        }
    }

    #[test]
    fn file_names_use_minutes_concurrency_and_mode() {
        let workload = Workload {
            users: 10,
            minutes: 1000,
            concurrency: 20,
        };
        assert_eq!(output_file_name(&workload, VoiceMode::Inbuilt), "1000_20_INBUILT.xlsx");
        assert_eq!(output_file_name(&workload, VoiceMode::Voice), "1000_20_VOICE.xlsx");
    }
}
