//! Matched and unmatched report rows, and the JSON side reports.
//!
//! The matched and unmatched reports are written both as local CSV files and
//! as workbook tabs. The pair-building commands read the CSV files back, so
//! [`read_results`] is the inverse of [`matched_grid`] and [`unmatched_grid`].

use std::collections::BTreeMap;

use camino::Utf8Path;
use nmo_core::{
    ExistsInTarget, FieldRef, Grid, MatchResult, TableStats, UnmatchedReason,
};
use nmo_sheets::{HeaderedGrid, read_csv_grid};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::MatchError;

const OLD_TABLE: &str = "Old Table Name";
const OLD_COLUMN: &str = "Old Column Name";
const MAPPED_NAME: &str = "NMAquifer Field Name";
const TARGET_TABLE: &str = "Ocotillo Table Name";
const TARGET_FIELD: &str = "Ocotillo Field Name";
const EXISTS: &str = "Does field exist in Ocotillo?";
const NOTE: &str = "Note";
const REASON: &str = "Reason";

/// Header of the matched report.
pub const MATCHED_HEADER: [&str; 7] = [
    OLD_TABLE,
    OLD_COLUMN,
    MAPPED_NAME,
    TARGET_TABLE,
    TARGET_FIELD,
    EXISTS,
    NOTE,
];

/// Header of the unmatched report.
pub const UNMATCHED_HEADER: [&str; 3] = [OLD_TABLE, OLD_COLUMN, REASON];

fn header_row(header: &[&str]) -> Vec<String> {
    header.iter().map(|h| (*h).to_owned()).collect()
}

/// Renders the matched results with their header row.
#[must_use]
pub fn matched_grid(results: &[MatchResult]) -> Grid {
    let mut grid = vec![header_row(&MATCHED_HEADER)];
    for result in results {
        if let MatchResult::Matched {
            old,
            mapped_name,
            new,
            exists,
            note,
        } = result
        {
            grid.push(vec![
                old.table.clone(),
                old.field.clone(),
                mapped_name.clone(),
                new.table.clone(),
                new.field.clone(),
                exists.as_str().to_owned(),
                note.clone(),
            ]);
        }
    }
    grid
}

/// Renders the unmatched results with their header row.
#[must_use]
pub fn unmatched_grid(results: &[MatchResult]) -> Grid {
    let mut grid = vec![header_row(&UNMATCHED_HEADER)];
    for result in results {
        if let MatchResult::Unmatched { old, reason } = result {
            grid.push(vec![
                old.table.clone(),
                old.field.clone(),
                reason.to_string(),
            ]);
        }
    }
    grid
}

/// Rebuilds a result set from report grids.
///
/// The matched grid must carry the legacy and target table/field columns;
/// the other matched columns default to blank. The unmatched grid is
/// optional and is ignored, with a warning, when it lacks the legacy
/// table/field columns. Matched rows come first in the returned set.
pub fn results_from_grids(
    matched_input: &str,
    matched: Grid,
    unmatched: Option<(&str, Grid)>,
) -> Result<Vec<MatchResult>, MatchError> {
    let matched = HeaderedGrid::new(matched);
    let missing = matched.missing(&[OLD_TABLE, OLD_COLUMN, TARGET_TABLE, TARGET_FIELD]);
    if !missing.is_empty() {
        return Err(MatchError::missing_columns(matched_input, &missing));
    }

    let cell = HeaderedGrid::cell;
    let (table, column) = (matched.index(OLD_TABLE), matched.index(OLD_COLUMN));
    let (mapped, exists, note) = (
        matched.index(MAPPED_NAME),
        matched.index(EXISTS),
        matched.index(NOTE),
    );
    let (target_table, target_field) = (matched.index(TARGET_TABLE), matched.index(TARGET_FIELD));

    let mut results: Vec<MatchResult> = matched
        .rows()
        .iter()
        .map(|row| MatchResult::Matched {
            old: FieldRef::new(cell(row, table), cell(row, column)),
            mapped_name: cell(row, mapped).to_owned(),
            new: FieldRef::new(cell(row, target_table), cell(row, target_field)),
            exists: ExistsInTarget::new(cell(row, exists)),
            note: cell(row, note).to_owned(),
        })
        .collect();

    if let Some((input, grid)) = unmatched {
        let unmatched = HeaderedGrid::new(grid);
        if unmatched.missing(&[OLD_TABLE, OLD_COLUMN]).is_empty() {
            let (table, column, reason) = (
                unmatched.index(OLD_TABLE),
                unmatched.index(OLD_COLUMN),
                unmatched.index(REASON),
            );
            results.extend(unmatched.rows().iter().map(|row| MatchResult::Unmatched {
                old: FieldRef::new(cell(row, table), cell(row, column)),
                reason: UnmatchedReason::from_text(cell(row, reason)),
            }));
        } else {
            warn!(input, "Ignoring unmatched report without table and column headers");
        }
    }
    Ok(results)
}

/// Reads the matched report (required) and the unmatched report (optional).
pub fn read_results(matched: &Utf8Path, unmatched: &Utf8Path) -> Result<Vec<MatchResult>, MatchError> {
    if !matched.is_file() {
        return Err(MatchError::MissingFile(matched.to_owned()));
    }
    let matched_grid = read_csv_grid(matched)?;
    let unmatched_grid = if unmatched.is_file() {
        Some((unmatched.as_str(), read_csv_grid(unmatched)?))
    } else {
        debug!(path = %unmatched, "No unmatched report");
        None
    };
    results_from_grids(matched.as_str(), matched_grid, unmatched_grid)
}

/// Groups matched target field names by legacy table.
///
/// Tables are sorted; fields keep result order.
#[must_use]
pub fn matched_fields_by_table(results: &[MatchResult]) -> BTreeMap<String, Vec<String>> {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for result in results {
        if let MatchResult::Matched { old, new, .. } = result {
            fields
                .entry(old.table.clone())
                .or_default()
                .push(new.field.clone());
        }
    }
    fields
}

/// Writes a value as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Utf8Path, value: &T) -> Result<(), MatchError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| MatchError::Json {
        path: path.to_owned(),
        source,
    })?;
    std::fs::write(path, text).map_err(|e| MatchError::io(path, e))
}

/// Writes the per-table statistics report.
pub fn write_stats_json(
    path: &Utf8Path,
    stats: &BTreeMap<String, TableStats>,
) -> Result<(), MatchError> {
    write_json(path, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use nmo_sheets::write_csv_grid;

    fn sample() -> Vec<MatchResult> {
        vec![
            MatchResult::Unmatched {
                old: FieldRef::new("Wells", "Well_ID"),
                reason: UnmatchedReason::NoMatchingField,
            },
            MatchResult::Matched {
                old: FieldRef::new("Wells", "Lat"),
                mapped_name: "lat".to_owned(),
                new: FieldRef::new("sites", "latitude"),
                exists: ExistsInTarget::new("N/A"),
                note: "see ticket".to_owned(),
            },
        ]
    }

    #[test]
    fn test_matched_grid_rows() {
        let grid = matched_grid(&sample());
        insta::assert_json_snapshot!(grid, @r#"
        [
          [
            "Old Table Name",
            "Old Column Name",
            "NMAquifer Field Name",
            "Ocotillo Table Name",
            "Ocotillo Field Name",
            "Does field exist in Ocotillo?",
            "Note"
          ],
          [
            "Wells",
            "Lat",
            "lat",
            "sites",
            "latitude",
            "N/A",
            "see ticket"
          ]
        ]
        "#);
    }

    #[test]
    fn test_unmatched_grid_rows() {
        let grid = unmatched_grid(&sample());
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][2], "no matching field name after normalization");
    }

    #[test]
    fn test_csv_files_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let matched = root.join("matched.csv");
        let unmatched = root.join("unmatched.csv");
        write_csv_grid(&matched, &matched_grid(&sample())).unwrap();
        write_csv_grid(&unmatched, &unmatched_grid(&sample())).unwrap();

        let results = read_results(&matched, &unmatched).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], sample()[1]);
        assert_eq!(results[1], sample()[0]);
    }

    #[test]
    fn test_unmatched_report_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let matched = root.join("matched.csv");
        write_csv_grid(&matched, &matched_grid(&sample())).unwrap();

        let results = read_results(&matched, &root.join("absent.csv")).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_matched_report_is_required() {
        let err = read_results(Utf8Path::new("/no/m.csv"), Utf8Path::new("/no/u.csv")).unwrap_err();
        assert!(matches!(err, MatchError::MissingFile(_)));
    }

    #[test]
    fn test_matched_report_needs_target_columns() {
        let grid = vec![vec![OLD_TABLE.to_owned(), OLD_COLUMN.to_owned()]];
        let err = results_from_grids("m.csv", grid, None).unwrap_err();
        assert!(err.is_missing_columns());
    }

    #[test]
    fn test_unmatched_without_headers_is_ignored() {
        let matched = vec![header_row(&MATCHED_HEADER)];
        let unmatched = vec![vec!["table".to_owned()], vec!["Wells".to_owned()]];
        let results = results_from_grids("m.csv", matched, Some(("u.csv", unmatched))).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_matched_fields_by_table() {
        let fields = matched_fields_by_table(&sample());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Wells"], vec!["latitude"]);
    }

    #[test]
    fn test_write_stats_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("stats.json")).unwrap();
        let mut stats = BTreeMap::new();
        stats.insert(
            "Wells".to_owned(),
            TableStats {
                csv_column_count: 2,
                mapping_row_count: 1,
                matched_count: 1,
                unmatched_count: 1,
                has_mapping_sheet: true,
            },
        );
        write_stats_json(&path, &stats).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["Wells"]["csv_cols"], 2);
        assert_eq!(parsed["Wells"]["has_sheet"], true);
    }
}
