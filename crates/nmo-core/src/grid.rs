//! Two-dimensional cell grids.
//!
//! A [`Grid`] is the unit every report hands to a workbook tab: a list of rows,
//! each a list of cell strings. Column-oriented reports (the matrix view, the
//! issue columns) are built as columns first and turned into rows with
//! [`columns_to_grid`], which also makes the result rectangular.

/// Rows of cell values, top to bottom.
pub type Grid = Vec<Vec<String>>;

/// Transposes a list of columns into rows.
///
/// Shorter columns are padded with empty strings so every row has exactly
/// `columns.len()` cells.
///
/// # Examples
///
/// ```
/// use nmo_core::columns_to_grid;
///
/// let columns = vec![
///     vec!["Wells".to_owned(), "Lat".to_owned(), "Lon".to_owned()],
///     vec!["Sites".to_owned(), "Name".to_owned()],
/// ];
/// let grid = columns_to_grid(&columns);
/// assert_eq!(grid.len(), 3);
/// assert_eq!(grid[2], vec!["Lon".to_owned(), String::new()]);
/// ```
#[must_use]
pub fn columns_to_grid(columns: &[Vec<String>]) -> Grid {
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|row| {
            columns
                .iter()
                .map(|column| column.get(row).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}
