//! Spreadsheet and CSV file access.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use cg_core::errors::{CgError, ErrorInfo};
use rust_xlsxwriter::{Format, Workbook};
use walkdir::WalkDir;

use crate::table::{normalise_header, Cell, Table};

/// Extensions recognised as spreadsheets when scanning result folders.
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

fn sheet_error(code: &str, path: &Path, err: impl ToString) -> CgError {
    CgError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// True when the path carries a spreadsheet extension (case-insensitive).
pub fn is_spreadsheet(path: &Path) -> bool {
    extension_lower(path)
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Spreadsheet files directly inside `dir`, in directory order.
pub fn list_spreadsheets(dir: &Path) -> Result<Vec<PathBuf>, CgError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| sheet_error("sheet.list", dir, err))?;
        if entry.file_type().is_file() && is_spreadsheet(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Reads the first worksheet (or a CSV file) into a [`Table`].
///
/// The first row becomes the header; data rows are padded to its width.
pub fn read_table(path: &Path) -> Result<Table, CgError> {
    match extension_lower(path).as_deref() {
        Some("csv") => read_csv(path),
        _ => read_workbook(path),
    }
}

fn read_workbook(path: &Path) -> Result<Table, CgError> {
    let mut workbook = open_workbook_auto(path).map_err(|err| sheet_error("sheet.open", path, err))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| sheet_error("sheet.no_worksheet", path, "workbook has no worksheet"))?
        .map_err(|err| sheet_error("sheet.read", path, err))?;
    let leading_columns = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let mut rows = range.rows().map(|row| {
        let mut cells = vec![Cell::Empty; leading_columns];
        cells.extend(row.iter().map(cell_from_data));
        cells
    });
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Table::default()),
    };
    let mut table = Table::new(header.iter().map(|cell| header_name(cell)));
    for row in rows {
        table.push_row(row);
    }
    Ok(table)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::String(value) => Cell::text(value.as_str()),
        other => Cell::text(other.to_string()),
    }
}

fn header_name(cell: &Cell) -> String {
    normalise_header(&cell.to_string()).to_string()
}

fn read_csv(path: &Path) -> Result<Table, CgError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| sheet_error("sheet.open", path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| sheet_error("sheet.read", path, err))?
        .iter()
        .map(|name| normalise_header(name).to_string())
        .collect::<Vec<_>>();
    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.map_err(|err| sheet_error("sheet.read", path, err))?;
        table.push_row(record.iter().map(parse_csv_field).collect());
    }
    Ok(table)
}

fn parse_csv_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Number(value),
        _ => Cell::text(field),
    }
}

/// Writes `table` as a single-sheet xlsx workbook, replacing any existing file.
///
/// Parent directories are created. Only the `.xlsx` format can be written.
pub fn write_table(path: &Path, table: &Table) -> Result<(), CgError> {
    if extension_lower(path).as_deref() != Some("xlsx") {
        return Err(CgError::Io(
            ErrorInfo::new("sheet.unsupported_format", "only .xlsx files can be written")
                .with_context("path", path.display().to_string()),
        ));
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| sheet_error("sheet.create_dir", parent, err))?;
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    for (col, name) in table.columns.iter().enumerate() {
        let col = column_number(path, col)?;
        worksheet
            .write_string_with_format(0, col, name.as_str(), &header_format)
            .map_err(|err| sheet_error("sheet.write", path, err))?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(idx + 1)
            .map_err(|_| sheet_error("sheet.write", path, "too many rows"))?;
        for (col, cell) in row.iter().enumerate() {
            let col = column_number(path, col)?;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Number(value) if !value.is_finite() => continue,
                Cell::Number(value) => worksheet.write_number(row_num, col, *value).map(|_| ()),
                Cell::Bool(value) => worksheet.write_boolean(row_num, col, *value).map(|_| ()),
                Cell::Text(value) => worksheet.write_string(row_num, col, value.as_str()).map(|_| ()),
            };
            written.map_err(|err| sheet_error("sheet.write", path, err))?;
        }
    }
    workbook
        .save(path)
        .map_err(|err| sheet_error("sheet.write", path, err))
}

fn column_number(path: &Path, col: usize) -> Result<u16, CgError> {
    u16::try_from(col).map_err(|_| sheet_error("sheet.write", path, "too many columns"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_extensions_are_case_insensitive() {
        assert!(is_spreadsheet(Path::new("900_5_INBUILT.xlsx")));
        assert!(is_spreadsheet(Path::new("legacy.XLS")));
        assert!(!is_spreadsheet(Path::new("notes.csv")));
        assert!(!is_spreadsheet(Path::new("xlsx")));
    }

    #[test]
    fn csv_fields_parse_finite_numbers_only() {
        assert_eq!(parse_csv_field(" 900 "), Cell::Number(900.0));
        assert_eq!(parse_csv_field("NaN"), Cell::Text("NaN".into()));
        assert_eq!(parse_csv_field(""), Cell::Empty);
        assert_eq!(parse_csv_field("abc"), Cell::Text("abc".into()));
    }
}
