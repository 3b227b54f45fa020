//! The workbook interface every report writes through.
//!
//! Reports never talk to a storage backend directly. They read tabs through
//! [`SheetSource`] and write through [`SheetSink`], which offers exactly the
//! two write shapes the reports need: "clear a column span and write a grid"
//! ([`SheetSink::replace_range`]) and "append rows that are not already there"
//! ([`SheetSink::append_unique`]).
//!
//! Backends implement four primitives (`tab_titles`, `read_tab`,
//! `ensure_tab`, `write_tab`); the range and append operations are provided
//! on top of them.

use std::hash::Hash;

use nmo_core::{FxHashSet, Grid, fx_hash_set};
use tracing::debug;

use crate::error::SheetError;
use crate::range::SheetRange;

/// Read access to a workbook.
pub trait SheetSource {
    /// Returns every tab title in the workbook.
    fn tab_titles(&self) -> Result<Vec<String>, SheetError>;

    /// Reads all non-empty rows of a tab, top to bottom.
    ///
    /// Returns [`SheetError::TabNotFound`] when the tab does not exist.
    fn read_tab(&self, title: &str) -> Result<Grid, SheetError>;

    /// Returns `true` if a tab with this exact title exists.
    fn has_tab(&self, title: &str) -> Result<bool, SheetError> {
        Ok(self.tab_titles()?.iter().any(|t| t == title))
    }
}

/// Write access to a workbook.
pub trait SheetSink: SheetSource {
    /// Creates the tab if it does not exist. Returns `true` if it was created.
    fn ensure_tab(&mut self, title: &str) -> Result<bool, SheetError>;

    /// Replaces the whole content of an existing tab.
    fn write_tab(&mut self, title: &str, grid: &[Vec<String>]) -> Result<(), SheetError>;

    /// Clears every cell in `columns`, then writes `grid` with its top-left
    /// cell at row 1 of the span's first column.
    ///
    /// Cells outside the span are left alone. The tab is created if needed.
    fn replace_range(
        &mut self,
        title: &str,
        columns: SheetRange,
        grid: &[Vec<String>],
    ) -> Result<(), SheetError> {
        self.ensure_tab(title)?;
        let mut current = self.read_tab(title)?;
        splice_columns(&mut current, columns, grid);
        debug!(tab = title, range = %columns, rows = grid.len(), "Replacing range");
        self.write_tab(title, &current)
    }

    /// Appends rows after the last row of the tab. The tab is created if needed.
    fn append_rows(&mut self, title: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.ensure_tab(title)?;
        let mut current = self.read_tab(title)?;
        current.extend(rows.iter().cloned());
        debug!(tab = title, rows = rows.len(), "Appending rows");
        self.write_tab(title, &current)
    }

    /// Appends the rows whose key is not already present in the tab.
    ///
    /// Existing rows are keyed with `key_fn`. The first row is skipped only
    /// when it starts with `header` (cells compared trimmed), so a tab that
    /// never had a header keeps every row's key. The batch itself is
    /// de-duplicated too, so the first of several equal rows is kept. When
    /// the tab is empty, `header` is written first.
    /// Returns the number of data rows appended.
    fn append_unique<K, F>(
        &mut self,
        title: &str,
        header: &[&str],
        rows: impl IntoIterator<Item = Vec<String>>,
        key_fn: F,
    ) -> Result<usize, SheetError>
    where
        Self: Sized,
        K: Eq + Hash,
        F: Fn(&[String]) -> K,
    {
        self.ensure_tab(title)?;
        let existing = self.read_tab(title)?;
        let is_empty = existing
            .iter()
            .all(|row| row.iter().all(|cell| cell.trim().is_empty()));

        let mut seen: FxHashSet<K> = fx_hash_set();
        if !is_empty {
            let skip = usize::from(existing.first().is_some_and(|row| is_header(row, header)));
            seen.extend(existing.iter().skip(skip).map(|row| key_fn(row)));
        }

        let mut pending: Grid = Vec::new();
        if is_empty {
            pending.push(header.iter().map(|h| (*h).to_owned()).collect());
        }
        let mut appended = 0;
        for row in rows {
            if seen.insert(key_fn(&row)) {
                pending.push(row);
                appended += 1;
            }
        }

        if appended > 0 {
            self.append_rows(title, &pending)?;
        }
        Ok(appended)
    }
}

/// Returns `true` when `row` begins with the `header` cells, ignoring
/// surrounding whitespace.
fn is_header(row: &[String], header: &[&str]) -> bool {
    !header.is_empty()
        && row.len() >= header.len()
        && row.iter().zip(header).all(|(cell, name)| cell.trim() == name.trim())
}

/// Clears the cells of `columns` in `current` and writes `grid` at row 1.
///
/// Trailing blank cells and rows are dropped afterwards so the stored tab
/// stays as small as its content.
pub(crate) fn splice_columns(current: &mut Grid, columns: SheetRange, grid: &[Vec<String>]) {
    for row in current.iter_mut() {
        for cell in row.iter_mut().skip(columns.first()).take(columns.width()) {
            cell.clear();
        }
    }

    for (r, values) in grid.iter().enumerate() {
        if current.len() <= r {
            current.resize_with(r + 1, Vec::new);
        }
        let row = &mut current[r];
        let needed = columns.first() + values.len();
        if row.len() < needed {
            row.resize(needed, String::new());
        }
        for (offset, value) in values.iter().enumerate() {
            row[columns.first() + offset].clone_from(value);
        }
    }

    for row in current.iter_mut() {
        while row.last().is_some_and(String::is_empty) {
            row.pop();
        }
    }
    while current.last().is_some_and(Vec::is_empty) {
        current.pop();
    }
}
