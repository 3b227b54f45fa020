//! Checks reviewed field pairs against an export of the target schema.
//!
//! The export is a CSV with a `table_field` column (`sites.latitude`). Each
//! `Ocotillo_TableField` cell of the reviewed pairs tab is looked up in it and
//! the verdict is written to an `ExistsInOcotillo` column, with a small
//! summary block beside the pairs.

use camino::Utf8Path;
use nmo_core::{FxHashSet, Grid};
use nmo_sheets::{HeaderedGrid, SheetRange, SheetSink, read_csv_grid};
use tracing::{debug, info};

use crate::error::MatchError;

/// Header of the column receiving the verdicts.
pub const EXISTS_IN_TARGET_COLUMN: &str = "ExistsInOcotillo";

/// Columns `O:Q`, where the summary block is written.
pub const SUMMARY_RANGE: SheetRange = SheetRange::columns(14, 16);

const TABLE_FIELD_COLUMN: &str = "table_field";

/// Position of `Ocotillo_TableField` in the pairs tab.
const TARGET_COLUMN: usize = 1;

/// The set of `table.field` keys exported from the target schema.
#[derive(Debug, Clone, Default)]
pub struct TargetSchema {
    fields: FxHashSet<String>,
}

impl TargetSchema {
    /// Reads the export CSV.
    pub fn from_path(path: &Utf8Path) -> Result<Self, MatchError> {
        if !path.is_file() {
            return Err(MatchError::MissingFile(path.to_owned()));
        }
        Self::from_grid(path.as_str(), read_csv_grid(path)?)
    }

    /// Builds the key set from a grid whose header has a `table_field` column.
    ///
    /// Keys are trimmed and lower-cased; blank keys are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use nmo_matcher::TargetSchema;
    ///
    /// let grid = vec![
    ///     vec!["table_field".to_owned()],
    ///     vec![" Sites.Latitude ".to_owned()],
    /// ];
    /// let schema = TargetSchema::from_grid("export.csv", grid).unwrap();
    /// assert!(schema.contains("sites.latitude"));
    /// assert_eq!(schema.verdict("SITES.LATITUDE"), "yes");
    /// assert_eq!(schema.verdict("n/a"), "N/A");
    /// ```
    pub fn from_grid(input: &str, grid: Grid) -> Result<Self, MatchError> {
        let grid = HeaderedGrid::new(grid);
        let Some(column) = grid.index(TABLE_FIELD_COLUMN) else {
            return Err(MatchError::missing_columns(input, &[TABLE_FIELD_COLUMN]));
        };
        let fields: FxHashSet<String> = grid
            .rows()
            .iter()
            .map(|row| HeaderedGrid::cell(row, Some(column)).to_lowercase())
            .filter(|key| !key.is_empty())
            .collect();
        debug!(input, fields = fields.len(), "Loaded target schema export");
        Ok(Self { fields })
    }

    /// Returns `true` if the export lists this `table.field`.
    #[must_use]
    pub fn contains(&self, table_field: &str) -> bool {
        self.fields.contains(&table_field.trim().to_lowercase())
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the export had no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Classifies one `Ocotillo_TableField` cell: `""` when blank, `N/A` for
    /// `n/a` or `na`, otherwise `yes` or `no`.
    #[must_use]
    pub fn verdict(&self, cell: &str) -> &'static str {
        let value = cell.trim();
        if value.is_empty() {
            ""
        } else if value.eq_ignore_ascii_case("n/a") || value.eq_ignore_ascii_case("na") {
            "N/A"
        } else if self.contains(value) {
            "yes"
        } else {
            "no"
        }
    }
}

/// Verdict counts, excluding `N/A`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistenceSummary {
    /// Pairs found in the export.
    pub yes: usize,
    /// Pairs missing from the export.
    pub no: usize,
    /// Rows without a target pair.
    pub blank: usize,
    /// Rows marked `N/A`; not part of the percentages.
    pub not_applicable: usize,
}

impl ExistenceSummary {
    fn record(&mut self, verdict: &str) {
        match verdict {
            "yes" => self.yes += 1,
            "no" => self.no += 1,
            "N/A" => self.not_applicable += 1,
            _ => self.blank += 1,
        }
    }

    /// Returns `yes + no + blank`.
    #[must_use]
    pub const fn counted(&self) -> usize {
        self.yes + self.no + self.blank
    }

    #[allow(clippy::cast_precision_loss)]
    fn percent(&self, count: usize) -> String {
        let total = self.counted().max(1);
        format!("{:.1}%", count as f64 * 100.0 / total as f64)
    }

    /// Renders the summary block written to [`SUMMARY_RANGE`].
    #[must_use]
    pub fn grid(&self) -> Grid {
        let line = |label: &str, count: usize| {
            vec![label.to_owned(), count.to_string(), self.percent(count)]
        };
        vec![
            vec![
                "ExistsInOcotillo Summary (excluding N/A)".to_owned(),
                String::new(),
                String::new(),
            ],
            vec!["Value".to_owned(), "Count".to_owned(), "Percent".to_owned()],
            line("yes", self.yes),
            line("no", self.no),
            line("blank", self.blank),
        ]
    }
}

/// Annotates the pairs tab with a verdict per row and writes the summary.
///
/// The tab must have a header and at least two columns. The verdict column is
/// reused when present, otherwise it is added after the last header cell.
pub fn check_field_pairs<S: SheetSink + ?Sized>(
    book: &mut S,
    tab: &str,
    schema: &TargetSchema,
) -> Result<ExistenceSummary, MatchError> {
    let grid = HeaderedGrid::new(book.read_tab(tab)?);
    if grid.is_empty() {
        return Err(MatchError::EmptyInput {
            input: tab.to_owned(),
        });
    }
    if grid.header().len() <= TARGET_COLUMN {
        return Err(MatchError::missing_columns(tab, &["Ocotillo_TableField"]));
    }

    let column = grid
        .index(EXISTS_IN_TARGET_COLUMN)
        .unwrap_or(grid.header().len());

    let mut summary = ExistenceSummary::default();
    let mut values: Grid = Vec::with_capacity(grid.rows().len() + 1);
    values.push(vec![EXISTS_IN_TARGET_COLUMN.to_owned()]);
    for row in grid.rows() {
        let verdict = schema.verdict(HeaderedGrid::cell(row, Some(TARGET_COLUMN)));
        summary.record(verdict);
        values.push(vec![verdict.to_owned()]);
    }

    book.replace_range(tab, SheetRange::column(column), &values)?;
    book.replace_range(tab, SUMMARY_RANGE, &summary.grid())?;
    info!(
        tab,
        yes = summary.yes,
        no = summary.no,
        blank = summary.blank,
        not_applicable = summary.not_applicable,
        "Checked target existence"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmo_sheets::{MemoryWorkbook, SheetSource};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    fn schema() -> TargetSchema {
        TargetSchema::from_grid(
            "export.csv",
            vec![
                row(&["table_name", "table_field"]),
                row(&["sites", "sites.latitude"]),
                row(&["sites", ""]),
            ],
        )
        .unwrap()
    }

    fn pairs() -> Vec<Vec<String>> {
        vec![
            row(&["NMAquifer_TableField", "Ocotillo_TableField"]),
            row(&["Wells.Lat", "Sites.Latitude"]),
            row(&["Wells.Lon", "sites.longitude"]),
            row(&["Wells.Well_ID", ""]),
            row(&["Wells.Owner", "N/A"]),
        ]
    }

    #[test]
    fn test_export_needs_table_field() {
        let err = TargetSchema::from_grid("export.csv", vec![row(&["table"])]).unwrap_err();
        assert!(err.is_missing_columns());
    }

    #[test]
    fn test_blank_export_keys_are_skipped() {
        assert_eq!(schema().len(), 1);
    }

    #[test]
    fn test_check_field_pairs_writes_column_and_summary() {
        let mut book = MemoryWorkbook::new().with_tab("FieldPairs_Checked", pairs());
        let summary = check_field_pairs(&mut book, "FieldPairs_Checked", &schema()).unwrap();
        assert_eq!(
            summary,
            ExistenceSummary {
                yes: 1,
                no: 1,
                blank: 1,
                not_applicable: 1,
            }
        );

        let tab = book.read_tab("FieldPairs_Checked").unwrap();
        let verdicts: Vec<&str> = tab
            .iter()
            .map(|r| r.get(2).map_or("", String::as_str))
            .collect();
        assert_eq!(verdicts, vec!["ExistsInOcotillo", "yes", "no", "", "N/A"]);
        insta::assert_json_snapshot!(&tab[0][14..], @r#"
        [
          "ExistsInOcotillo Summary (excluding N/A)"
        ]
        "#);
        assert_eq!(tab[2][14..], row(&["yes", "1", "33.3%"]));
        assert_eq!(tab[4][14..], row(&["blank", "1", "33.3%"]));
    }

    #[test]
    fn test_existing_verdict_column_is_reused() {
        let mut grid = pairs();
        grid[0].push("ExistsInOcotillo".to_owned());
        grid[1].push("stale".to_owned());
        let mut book = MemoryWorkbook::new().with_tab("FieldPairs_Checked", grid);
        check_field_pairs(&mut book, "FieldPairs_Checked", &schema()).unwrap();

        let tab = book.read_tab("FieldPairs_Checked").unwrap();
        assert_eq!(tab[0][2], "ExistsInOcotillo");
        assert_eq!(tab[1][2], "yes");
        assert_eq!(tab[0].len(), 15);
    }

    #[test]
    fn test_empty_pairs_tab_is_fatal() {
        let mut book = MemoryWorkbook::new().with_tab("FieldPairs_Checked", Vec::new());
        let err = check_field_pairs(&mut book, "FieldPairs_Checked", &schema()).unwrap_err();
        assert!(matches!(err, MatchError::EmptyInput { .. }));
    }

    #[test]
    fn test_single_column_pairs_tab_is_fatal() {
        let mut book =
            MemoryWorkbook::new().with_tab("FieldPairs_Checked", vec![row(&["NMAquifer_TableField"])]);
        let err = check_field_pairs(&mut book, "FieldPairs_Checked", &schema()).unwrap_err();
        assert!(err.is_missing_columns());
    }

    #[test]
    fn test_summary_of_nothing_divides_by_one() {
        let grid = ExistenceSummary::default().grid();
        assert_eq!(grid[2], row(&["yes", "0", "0.0%"]));
    }
}
