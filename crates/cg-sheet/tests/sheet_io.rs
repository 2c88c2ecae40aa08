use std::fs;

use cg_sheet::{list_spreadsheets, read_table, write_table, Cell, Table};

fn sample_table() -> Table {
    let mut table = Table::new(["Rank", "Fits Budget", "Total Cost (INR)", "Plan Note"]);
    table.push_row(vec![
        Cell::Number(1.0),
        Cell::text("Yes"),
        Cell::Number(81234.5),
        Cell::Empty,
    ]);
    table.push_row(vec![
        Cell::Number(2.0),
        Cell::text("No"),
        Cell::Number(120000.0),
        Cell::text("annual commitment"),
    ]);
    table
}

#[test]
fn xlsx_write_then_read_preserves_cells() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("nested").join("10_1_INBUILT.xlsx");
    let table = sample_table();
    write_table(&path, &table).expect("write table");
    let restored = read_table(&path).expect("read table");
    assert_eq!(restored, table);
}

#[test]
fn blank_rows_inside_the_sheet_survive() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("merged.xlsx");
    let mut table = sample_table();
    table.push_blank_row();
    table.push_row(vec![Cell::Number(1.0), Cell::text("Yes"), Cell::Number(5.0)]);
    write_table(&path, &table).expect("write table");
    let restored = read_table(&path).expect("read table");
    assert_eq!(restored.len(), 4);
    assert!(restored.rows[2].iter().all(Cell::is_blank));
    assert_eq!(restored.rows[3][2], Cell::Number(5.0));
}

#[test]
fn csv_tables_are_read_with_numeric_cells() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("software numbers.csv");
    fs::write(&path, "Users,Minutes,Concurrency,Label\n50,900,5,small\n200,10000,20,\n").expect("write csv");
    let table = read_table(&path).expect("read csv");
    assert_eq!(table.columns, vec!["Users", "Minutes", "Concurrency", "Label"]);
    assert_eq!(table.rows[0][1], Cell::Number(900.0));
    assert_eq!(table.rows[0][3], Cell::text("small"));
    assert_eq!(table.rows[1][3], Cell::Empty);
}

#[test]
fn xls_output_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = write_table(&dir.path().join("legacy.xls"), &sample_table()).expect_err("xls write");
    assert_eq!(err.code(), "sheet.unsupported_format");
    assert!(!err.is_fatal());
}

#[test]
fn listing_is_not_recursive_and_filters_extensions() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let table = sample_table();
    write_table(&dir.path().join("a.xlsx"), &table).expect("write a");
    write_table(&dir.path().join("sub").join("b.xlsx"), &table).expect("write b");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write txt");
    fs::write(dir.path().join("C.XLS"), "not really xls").expect("write xls");

    let mut names = list_spreadsheets(dir.path())
        .expect("list")
        .into_iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, vec!["C.XLS", "a.xlsx"]);
}

#[test]
fn unreadable_workbook_reports_io_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("corrupt.xlsx");
    fs::write(&path, "definitely not a zip archive").expect("write corrupt");
    let err = read_table(&path).expect_err("corrupt workbook");
    assert!(matches!(err, cg_core::CgError::Io(_)));
}
