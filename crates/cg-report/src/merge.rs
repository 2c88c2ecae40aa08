use std::path::{Path, PathBuf};

use cg_core::errors::{CgError, ErrorInfo};
use cg_sheet::{list_spreadsheets, read_table, write_table, Table};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::natural::sort_natural;

/// Counters reported by [`merge_reports`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub files_a: usize,
    pub files_b: usize,
    /// Data rows written, separators included.
    pub rows: usize,
    pub output: PathBuf,
}

/// Default merged report location: `merged_excel_{YYYYmmdd_HHMMSS}.xlsx` under `dir`.
pub fn timestamped_output(dir: &Path, at: NaiveDateTime) -> PathBuf {
    dir.join(format!("merged_excel_{}.xlsx", at.format("%Y%m%d_%H%M%S")))
}

/// Spreadsheets directly inside `folder` in natural order; a missing folder
/// contributes nothing.
pub fn sorted_reports(folder: &Path) -> Result<Vec<PathBuf>, CgError> {
    if !folder.is_dir() {
        tracing::warn!(folder = %folder.display(), "folder does not exist");
        return Ok(Vec::new());
    }
    let mut files = list_spreadsheets(folder)?;
    sort_natural(&mut files);
    Ok(files)
}

/// Interleaves the reports of two folders into one workbook at `output`.
///
/// Pairs are taken by position after natural sorting: `A[i]`, blank row,
/// `B[i]`, blank row. The first readable file with a header row supplies the
/// header; rows of later files are mapped onto it by position. Files without
/// any column are skipped like unreadable ones.
pub fn merge_reports(folder_a: &Path, folder_b: &Path, output: &Path) -> Result<MergeSummary, CgError> {
    let files_a = sorted_reports(folder_a)?;
    let files_b = sorted_reports(folder_b)?;
    if files_a.is_empty() && files_b.is_empty() {
        return Err(CgError::Config(
            ErrorInfo::new("merge.no_inputs", "no spreadsheet files found in either folder")
                .with_context("folder_a", folder_a.display().to_string())
                .with_context("folder_b", folder_b.display().to_string()),
        ));
    }
    tracing::info!(
        files_a = files_a.len(),
        files_b = files_b.len(),
        "starting merge"
    );

    let mut merged: Option<Table> = None;
    for idx in 0..files_a.len().max(files_b.len()) {
        for path in [files_a.get(idx), files_b.get(idx)].into_iter().flatten() {
            append_report(&mut merged, path);
        }
    }
    let mut merged = merged.ok_or_else(|| {
        CgError::DataShape(ErrorInfo::new("merge.no_data", "no readable report with a header row"))
    })?;
    merged.trim_trailing_blank_row();

    write_table(output, &merged)?;
    tracing::info!(output = %output.display(), rows = merged.len(), "merged report written");
    Ok(MergeSummary {
        files_a: files_a.len(),
        files_b: files_b.len(),
        rows: merged.len(),
        output: output.to_path_buf(),
    })
}

fn append_report(merged: &mut Option<Table>, path: &Path) {
    tracing::info!(file = %path.display(), "merging report");
    let table = match read_table(path) {
        Ok(table) => table,
        Err(err) => {
            tracing::error!(file = %path.display(), code = err.code(), error = %err, "skipping unreadable report");
            return;
        }
    };
    if table.columns.is_empty() {
        tracing::warn!(file = %path.display(), "skipping report without a header row");
        return;
    }
    match merged {
        Some(target) => {
            if table.columns != target.columns {
                tracing::warn!(
                    file = %path.display(),
                    "header differs from the first report; rows mapped by position"
                );
            }
            for row in table.rows {
                target.push_row(row);
            }
            target.push_blank_row();
        }
        None => {
            let mut first = table;
            first.push_blank_row();
            *merged = Some(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_name_carries_local_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|date| date.and_hms_opt(9, 5, 30))
            .expect("valid timestamp");
        assert_eq!(
            timestamped_output(Path::new("out"), at),
            Path::new("out").join("merged_excel_20240307_090530.xlsx")
        );
    }

    #[test]
    fn missing_folder_contributes_no_files() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let files = sorted_reports(&dir.path().join("absent")).expect("missing folder");
        assert!(files.is_empty());
    }
}
