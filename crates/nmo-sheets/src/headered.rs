//! Header-addressed access to a grid.

use nmo_core::Grid;

/// A grid whose first row is a header.
///
/// Columns are looked up by trimmed header text, so reports keep working when
/// a reviewer reorders or inserts columns in a tab.
///
/// # Examples
///
/// ```
/// use nmo_sheets::HeaderedGrid;
///
/// let grid = vec![
///     vec!["table_name".to_owned(), " columns ".to_owned()],
///     vec!["Wells".to_owned(), "Well_ID, Lat".to_owned()],
/// ];
/// let table = HeaderedGrid::new(grid);
/// let columns = table.index("columns").unwrap();
/// assert_eq!(HeaderedGrid::cell(&table.rows()[0], Some(columns)), "Well_ID, Lat");
/// assert_eq!(table.missing(&["table_name", "notes"]), vec!["notes"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderedGrid {
    header: Vec<String>,
    rows: Grid,
}

impl HeaderedGrid {
    /// Splits a grid into its header row and data rows.
    ///
    /// Header cells are trimmed. An empty grid has an empty header and no rows.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        let mut rows = grid.into_iter();
        let header = rows
            .next()
            .map(|row| row.iter().map(|h| h.trim().to_owned()).collect())
            .unwrap_or_default();
        Self {
            header,
            rows: rows.collect(),
        }
    }

    /// Returns the trimmed header row.
    #[inline]
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Returns the data rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns `true` if the grid had no rows at all, not even a header.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Returns the index of the first header cell equal to `name`.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Returns the required names absent from the header, in the given order.
    #[must_use]
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| self.index(name).is_none())
            .collect()
    }

    /// Returns the trimmed cell at `index`, or `""` when the column is absent
    /// or the row is short.
    #[must_use]
    pub fn cell(row: &[String], index: Option<usize>) -> &str {
        index
            .and_then(|i| row.get(i))
            .map_or("", |cell| cell.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn test_empty_grid() {
        let table = HeaderedGrid::new(Grid::new());
        assert!(table.is_empty());
        assert!(table.rows().is_empty());
        assert_eq!(table.missing(&["a"]), vec!["a"]);
    }

    #[test]
    fn test_header_only() {
        let table = HeaderedGrid::new(vec![row(&["a", "b"])]);
        assert!(!table.is_empty());
        assert!(table.rows().is_empty());
        assert_eq!(table.index("b"), Some(1));
    }

    #[test]
    fn test_cell_handles_short_rows() {
        let short = row(&["only"]);
        assert_eq!(HeaderedGrid::cell(&short, Some(0)), "only");
        assert_eq!(HeaderedGrid::cell(&short, Some(3)), "");
        assert_eq!(HeaderedGrid::cell(&short, None), "");
    }

    #[test]
    fn test_first_duplicate_header_wins() {
        let table = HeaderedGrid::new(vec![row(&["Note", "Note"])]);
        assert_eq!(table.index("Note"), Some(0));
    }
}
