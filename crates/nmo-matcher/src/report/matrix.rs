//! The matrix view: one column per legacy table, one cell per field.

use std::collections::BTreeMap;

use nmo_core::{Grid, MatchResult, StatusCounts, columns_to_grid};

/// One column of the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixColumn {
    /// Legacy table name (the column header).
    pub table: String,
    /// `false` when the table has no mapping sheet.
    pub has_mapping_sheet: bool,
    /// `field (status)` cells: matched fields first, then unmatched ones.
    pub cells: Vec<String>,
}

/// The matrix view and the tallies behind its legend.
///
/// Columns for tables with a mapping sheet come first, then tables without
/// one; each group is sorted case-insensitively by table name.
///
/// # Examples
///
/// ```
/// use nmo_core::{FieldRef, MatchResult, UnmatchedReason};
/// use nmo_matcher::report::MatrixView;
///
/// let results = vec![MatchResult::Unmatched {
///     old: FieldRef::new("Logs", "Depth"),
///     reason: UnmatchedReason::NoMappingSheet,
/// }];
/// let matrix = MatrixView::build(&results);
/// assert_eq!(matrix.grid(), vec![vec!["Logs".to_owned()], vec!["Depth (pending)".to_owned()]]);
/// assert_eq!(matrix.tables_without_sheet().collect::<Vec<_>>(), vec!["Logs"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixView {
    /// Columns in display order.
    pub columns: Vec<MatrixColumn>,
    /// Existence-flag tallies over all results.
    pub counts: StatusCounts,
}

impl MatrixView {
    /// Builds the matrix from a result set.
    #[must_use]
    pub fn build(results: &[MatchResult]) -> Self {
        let mut by_table: BTreeMap<&str, MatrixColumn> = BTreeMap::new();
        for result in results.iter().filter(|r| r.is_matched()) {
            column_for(&mut by_table, result).cells.push(result.matrix_cell());
        }
        for result in results.iter().filter(|r| !r.is_matched()) {
            let column = column_for(&mut by_table, result);
            column.cells.push(result.matrix_cell());
            if result.lacks_mapping_sheet() {
                column.has_mapping_sheet = false;
            }
        }

        let mut columns: Vec<MatrixColumn> = by_table.into_values().collect();
        columns.sort_by(|a, b| {
            (!a.has_mapping_sheet, a.table.to_lowercase(), &a.table).cmp(&(
                !b.has_mapping_sheet,
                b.table.to_lowercase(),
                &b.table,
            ))
        });

        Self {
            columns,
            counts: StatusCounts::tally(results),
        }
    }

    /// Returns `true` if there are no columns to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the tables flagged as having no mapping sheet.
    pub fn tables_without_sheet(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| !c.has_mapping_sheet)
            .map(|c| c.table.as_str())
    }

    /// Renders the header row and the padded cell rows.
    #[must_use]
    pub fn grid(&self) -> Grid {
        let columns: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| {
                let mut column = Vec::with_capacity(c.cells.len() + 1);
                column.push(c.table.clone());
                column.extend(c.cells.iter().cloned());
                column
            })
            .collect();
        columns_to_grid(&columns)
    }

    /// Renders the five-row legend with percentages of all results.
    #[must_use]
    pub fn legend(&self) -> Grid {
        let counts = &self.counts;
        let line = |color: &str, meaning: &str, n: usize| {
            vec![color.to_owned(), meaning.to_owned(), counts.share(n)]
        };
        vec![
            vec!["Legend".to_owned()],
            line("Green", "migrated", counts.yes),
            line("Yellow", "will be migrated", counts.no),
            line("Gray", "won't be migrated", counts.not_applicable),
            line("Light red", "pending assessment", counts.other),
        ]
    }

    /// Renders the legend followed by the matrix, as written to the tab.
    #[must_use]
    pub fn sheet_grid(&self) -> Grid {
        let mut grid = self.legend();
        grid.extend(self.grid());
        grid
    }
}

fn column_for<'a, 'r>(
    by_table: &'a mut BTreeMap<&'r str, MatrixColumn>,
    result: &'r MatchResult,
) -> &'a mut MatrixColumn {
    let table = result.old().table.as_str();
    by_table.entry(table).or_insert_with(|| MatrixColumn {
        table: table.to_owned(),
        has_mapping_sheet: true,
        cells: Vec::new(),
    })
}
