#![deny(missing_docs)]
#![doc = "Tabular value model and spreadsheet read/write helpers for costgrid."]

pub mod io;
pub mod table;

pub use io::{is_spreadsheet, list_spreadsheets, read_table, write_table, SPREADSHEET_EXTENSIONS};
pub use table::{Cell, Table};
