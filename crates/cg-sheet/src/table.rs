//! In-memory tabular model shared by the generator, the filter and the merger.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single spreadsheet value.
///
/// Empty strings never appear as [`Cell::Text`]; they are normalised to
/// [`Cell::Empty`] so that a value survives a write/read cycle unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// Boolean value.
    Bool(bool),
    /// Numeric value; integers are widened to `f64`.
    Number(f64),
    /// Non-empty text.
    Text(String),
}

impl Cell {
    /// Builds a text cell, mapping the empty string to [`Cell::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    /// Numeric value of the cell, if it holds a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    /// Text value of the cell, if it holds text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    /// True when the cell carries no value.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.trim().is_empty(),
            Cell::Number(value) => value.is_nan(),
            Cell::Bool(_) => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(value) => f.write_str(value),
        }
    }
}

/// Header plus rows; every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Column names in sheet order.
    pub columns: Vec<String>,
    /// Data rows below the header.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table with the given header.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, padding with empty cells or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.width(), Cell::Empty);
        self.rows.push(row);
    }

    /// Appends a row with every cell empty.
    pub fn push_blank_row(&mut self) {
        self.rows.push(vec![Cell::Empty; self.width()]);
    }

    /// Position of the first column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Position of the first column whose trimmed name matches ignoring ASCII case.
    pub fn column_index_ignore_case(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| normalise_header(column).eq_ignore_ascii_case(name.trim()))
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Keeps only the rows accepted by `keep`, preserving their order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Removes the last row when every one of its cells is blank.
    pub fn trim_trailing_blank_row(&mut self) -> bool {
        let blank = self
            .rows
            .last()
            .map(|row| row.iter().all(Cell::is_blank))
            .unwrap_or(false);
        if blank {
            self.rows.pop();
        }
        blank
    }
}

pub(crate) fn normalise_header(name: &str) -> &str {
    name.trim_start_matches('\u{feff}').trim()
}
