//! In-memory workbook.

use std::collections::BTreeMap;

use nmo_core::Grid;

use crate::error::SheetError;
use crate::workbook::{SheetSink, SheetSource};

/// A workbook held entirely in memory.
///
/// Used by tests and for dry runs where nothing should touch disk.
///
/// # Examples
///
/// ```
/// use nmo_sheets::{MemoryWorkbook, SheetSink, SheetSource};
///
/// let mut book = MemoryWorkbook::new();
/// book.write_tab("Matched", &[vec!["Old Table Name".to_owned()]]).unwrap();
/// assert_eq!(book.tab_titles().unwrap(), vec!["Matched".to_owned()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWorkbook {
    tabs: BTreeMap<String, Grid>,
}

impl MemoryWorkbook {
    /// Creates an empty workbook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a tab. Builder-style helper for fixtures.
    #[must_use]
    pub fn with_tab(mut self, title: impl Into<String>, grid: Grid) -> Self {
        self.tabs.insert(title.into(), grid);
        self
    }
}

impl SheetSource for MemoryWorkbook {
    fn tab_titles(&self) -> Result<Vec<String>, SheetError> {
        Ok(self.tabs.keys().cloned().collect())
    }

    fn read_tab(&self, title: &str) -> Result<Grid, SheetError> {
        self.tabs
            .get(title)
            .cloned()
            .ok_or_else(|| SheetError::tab_not_found(title))
    }
}

impl SheetSink for MemoryWorkbook {
    fn ensure_tab(&mut self, title: &str) -> Result<bool, SheetError> {
        if self.tabs.contains_key(title) {
            return Ok(false);
        }
        self.tabs.insert(title.to_owned(), Grid::new());
        Ok(true)
    }

    fn write_tab(&mut self, title: &str, grid: &[Vec<String>]) -> Result<(), SheetError> {
        self.tabs.insert(title.to_owned(), grid.to_vec());
        Ok(())
    }
}
