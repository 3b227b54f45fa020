//! Issue reports built from transfer-log issues.

use std::collections::BTreeMap;

use nmo_core::{FxHashMap, Grid, columns_to_grid, fx_hash_map};
use nmo_sheets::{HeaderedGrid, SheetRange, SheetSink};
use tracing::info;

use crate::error::TransferError;
use crate::log::{BlockSummary, TransferIssue};

/// Header of the pairs column that issue counts align to.
pub const TABLE_FIELD_COLUMN: &str = "NMAquifer_TableField";

/// Header of the column receiving issue counts.
pub const ISSUES_COLUMN: &str = "Issues";

/// Columns `G:L`, where block summaries are written.
pub const SUMMARY_RANGE: SheetRange = SheetRange::columns(6, 11);

/// Renders one column per issue label.
///
/// Labels are sorted. Each column holds the label (`(unknown)` when blank),
/// the number of non-blank point IDs, then those point IDs in log order.
///
/// # Examples
///
/// ```
/// use nmo_transfer::{TransferIssue, issue_columns_grid};
///
/// let issues = vec![TransferIssue::parse_line("W-1|Wells|Lat|bad")];
/// let grid = issue_columns_grid(&issues);
/// assert_eq!(grid, vec![vec!["Wells.Lat"], vec!["1"], vec!["W-1"]]);
/// ```
#[must_use]
pub fn issue_columns_grid(issues: &[TransferIssue]) -> Grid {
    let mut by_label: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for issue in issues {
        by_label
            .entry(issue.label())
            .or_default()
            .push(issue.point_id.as_str());
    }

    let columns: Vec<Vec<String>> = by_label
        .into_iter()
        .map(|(label, ids)| {
            let ids: Vec<String> = ids
                .into_iter()
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect();
            let header = if label.is_empty() {
                "(unknown)".to_owned()
            } else {
                label
            };
            let mut column = Vec::with_capacity(ids.len() + 2);
            column.push(header);
            column.push(ids.len().to_string());
            column.extend(ids);
            column
        })
        .collect();
    columns_to_grid(&columns)
}

/// Replaces the issues tab with [`issue_columns_grid`].
///
/// Returns the number of columns written.
pub fn write_issue_columns<S: SheetSink + ?Sized>(
    book: &mut S,
    tab: &str,
    issues: &[TransferIssue],
) -> Result<usize, TransferError> {
    let grid = issue_columns_grid(issues);
    let width = grid.first().map_or(0, Vec::len);
    book.ensure_tab(tab)?;
    book.write_tab(tab, &grid)?;
    info!(tab, columns = width, rows = grid.len(), "Wrote issue columns");
    Ok(width)
}

/// Counts issues per label, keyed by the trimmed, lower-cased label.
#[must_use]
pub fn issue_counts(issues: &[TransferIssue]) -> FxHashMap<String, usize> {
    let mut counts = fx_hash_map();
    for issue in issues {
        *counts.entry(issue.label().trim().to_lowercase()).or_insert(0) += 1;
    }
    counts
}

/// Writes an `Issues` count beside every pair of the tab.
///
/// Rows are matched on `NMAquifer_TableField`, ignoring case; rows with no
/// issues get `0`. The `Issues` column is reused when present and added after
/// the last header cell otherwise. Returns the number of rows written.
pub fn write_issue_counts<S: SheetSink + ?Sized>(
    book: &mut S,
    tab: &str,
    counts: &FxHashMap<String, usize>,
) -> Result<usize, TransferError> {
    let grid = HeaderedGrid::new(book.read_tab(tab)?);
    if grid.is_empty() {
        return Err(TransferError::EmptyInput {
            input: tab.to_owned(),
        });
    }
    let Some(key_column) = grid.index(TABLE_FIELD_COLUMN) else {
        return Err(TransferError::missing_columns(tab, &[TABLE_FIELD_COLUMN]));
    };
    let column = grid.index(ISSUES_COLUMN).unwrap_or(grid.header().len());

    let mut values: Grid = Vec::with_capacity(grid.rows().len() + 1);
    values.push(vec![ISSUES_COLUMN.to_owned()]);
    for row in grid.rows() {
        let key = HeaderedGrid::cell(row, Some(key_column)).to_lowercase();
        values.push(vec![counts.get(&key).copied().unwrap_or(0).to_string()]);
    }

    book.replace_range(tab, SheetRange::column(column), &values)?;
    info!(tab, rows = grid.rows().len(), "Wrote issue counts");
    Ok(grid.rows().len())
}

/// Renders the block summaries under [`BlockSummary::HEADER`].
#[must_use]
pub fn summaries_grid(summaries: &[BlockSummary]) -> Grid {
    let mut grid = Vec::with_capacity(summaries.len() + 1);
    grid.push(BlockSummary::HEADER.iter().map(|h| (*h).to_owned()).collect());
    grid.extend(summaries.iter().map(BlockSummary::to_row));
    grid
}

/// Writes the block summaries to [`SUMMARY_RANGE`] of the tab.
pub fn write_block_summaries<S: SheetSink + ?Sized>(
    book: &mut S,
    tab: &str,
    summaries: &[BlockSummary],
) -> Result<(), TransferError> {
    book.replace_range(tab, SUMMARY_RANGE, &summaries_grid(summaries))?;
    info!(tab, blocks = summaries.len(), "Wrote block summaries");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmo_sheets::{MemoryWorkbook, SheetSource};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    fn issues() -> Vec<TransferIssue> {
        [
            "W-2|Wells|Lat|bad",
            "W-1|Wells|Lat|bad",
            "|Wells|Lat|bad",
            "L-1|Logs||missing",
            "X-1|||",
        ]
        .iter()
        .map(|line| TransferIssue::parse_line(line))
        .collect()
    }

    #[test]
    fn test_issue_columns_layout() {
        insta::assert_json_snapshot!(issue_columns_grid(&issues()), @r#"
        [
          [
            "(unknown)",
            "Logs",
            "Wells.Lat"
          ],
          [
            "1",
            "1",
            "2"
          ],
          [
            "X-1",
            "L-1",
            "W-2"
          ],
          [
            "",
            "",
            "W-1"
          ]
        ]
        "#);
    }

    #[test]
    fn test_write_issue_columns_replaces_tab() {
        let mut book = MemoryWorkbook::new().with_tab("TableField_Issues", vec![row(&["old"; 5])]);
        let width = write_issue_columns(&mut book, "TableField_Issues", &issues()).unwrap();
        assert_eq!(width, 3);
        assert_eq!(book.read_tab("TableField_Issues").unwrap()[0][0], "(unknown)");
    }

    #[test]
    fn test_issue_counts_ignore_case() {
        let mut list = issues();
        list.push(TransferIssue::parse_line("W-3|WELLS|lat|bad"));
        let counts = issue_counts(&list);
        assert_eq!(counts["wells.lat"], 4);
        assert_eq!(counts["logs"], 1);
    }

    #[test]
    fn test_write_issue_counts_aligns_rows() {
        let mut book = MemoryWorkbook::new().with_tab(
            "FieldPairs_Checked",
            vec![
                row(&["NMAquifer_TableField", "Ocotillo_TableField"]),
                row(&["Wells.Lat", "sites.latitude"]),
                row(&["Wells.Lon"]),
                row(&[" logs ", ""]),
            ],
        );
        let rows = write_issue_counts(&mut book, "FieldPairs_Checked", &issue_counts(&issues())).unwrap();
        assert_eq!(rows, 3);

        let tab = book.read_tab("FieldPairs_Checked").unwrap();
        let column: Vec<&str> = tab.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(column, vec!["Issues", "3", "0", "1"]);
    }

    #[test]
    fn test_write_issue_counts_needs_key_column() {
        let mut book = MemoryWorkbook::new().with_tab("FieldPairs_Checked", vec![row(&["Pairs"])]);
        let err = write_issue_counts(&mut book, "FieldPairs_Checked", &FxHashMap::default()).unwrap_err();
        assert!(matches!(err, TransferError::MissingColumns { .. }));

        let mut empty = MemoryWorkbook::new().with_tab("FieldPairs_Checked", Vec::new());
        let err = write_issue_counts(&mut empty, "FieldPairs_Checked", &FxHashMap::default()).unwrap_err();
        assert!(matches!(err, TransferError::EmptyInput { .. }));
    }

    #[test]
    fn test_block_summaries_go_to_g_through_l() {
        let mut book = MemoryWorkbook::new().with_tab(
            "FieldPairs_Checked",
            vec![row(&["NMAquifer_TableField", "Ocotillo_TableField"])],
        );
        let summaries = vec![BlockSummary {
            model: "WellModel".to_owned(),
            table: "Wells".to_owned(),
            input_count: "120".to_owned(),
            cleaned_count: "118".to_owned(),
            transferred: "110".to_owned(),
            issue_percentage: "6.8%".to_owned(),
        }];
        write_block_summaries(&mut book, "FieldPairs_Checked", &summaries).unwrap();

        let tab = book.read_tab("FieldPairs_Checked").unwrap();
        assert_eq!(tab[0][0], "NMAquifer_TableField");
        assert_eq!(tab[0][6..], row(&BlockSummary::HEADER));
        assert_eq!(tab[1][6..], row(&["WellModel", "Wells", "120", "118", "110", "6.8%"]));
    }
}
