//! Workbook interface for the crosswalk reports.
//!
//! Every report reads tabs through [`SheetSource`] and writes through
//! [`SheetSink`]. Three backends are provided:
//!
//! - [`CsvWorkbook`] - a directory with one `<tab>.csv` file per tab
//! - [`MemoryWorkbook`] - in-memory, for tests and dry runs
//! - [`XlsxWorkbook`] - a read-only exported Excel file
//!
//! # Examples
//!
//! ```
//! use nmo_sheets::{MemoryWorkbook, SheetRange, SheetSink, SheetSource};
//!
//! let mut book = MemoryWorkbook::new();
//! let grid = vec![vec!["model".to_owned(), "Table".to_owned()]];
//! book.replace_range("FieldPairs", SheetRange::columns(6, 11), &grid).unwrap();
//!
//! let tab = book.read_tab("FieldPairs").unwrap();
//! assert_eq!(tab[0][6], "model");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod csv_workbook;
mod error;
mod headered;
mod memory;
mod range;
mod workbook;
mod xlsx;

pub use csv_workbook::{CsvWorkbook, read_csv_grid, write_csv_grid};
pub use error::SheetError;
pub use headered::HeaderedGrid;
pub use memory::MemoryWorkbook;
pub use range::SheetRange;
pub use workbook::{SheetSink, SheetSource};
pub use xlsx::XlsxWorkbook;
