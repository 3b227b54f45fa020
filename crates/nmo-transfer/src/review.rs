//! Review log sync.
//!
//! The review tab is an append-only log of `(Table.Field, PointID, Error)`
//! triples that reviewers annotate in extra columns. New transfer issues are
//! appended without duplicating rows already present, and reviewer columns
//! can be copied over from a working copy of the tab.

use nmo_core::{FxHashMap, fx_hash_map};
use nmo_sheets::{HeaderedGrid, SheetSink};
use tracing::{debug, info};

use crate::cleaner::clean_error;
use crate::error::TransferError;
use crate::log::TransferIssue;

/// Header of the review log.
pub const REVIEW_HEADER: [&str; 3] = ["NMAquifer_Table.Field", "PointID", "Error"];

/// Reviewer columns copied by [`copy_review_columns`].
pub const REVIEWER_COLUMNS: [&str; 4] = [
    "Reviewed (yes/no)",
    "Fixed (yes/no)",
    "AMP_Reviewer",
    "Notes",
];

/// One review log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewRow {
    /// `Table.Field` label of the issue.
    pub table_field: String,
    /// Point identifier.
    pub point_id: String,
    /// Cleaned error text.
    pub error: String,
}

impl ReviewRow {
    /// Builds the entry for an issue, cleaning its error text.
    ///
    /// # Examples
    ///
    /// ```
    /// use nmo_transfer::{ReviewRow, TransferIssue};
    ///
    /// let issue = TransferIssue::parse_line("W-1|Wells|Lat|Value error: \"bad\"");
    /// let row = ReviewRow::from_issue(&issue)?;
    /// assert_eq!(row.table_field, "Wells.Lat");
    /// assert_eq!(row.error, "bad");
    /// # Ok::<(), nmo_transfer::TransferError>(())
    /// ```
    pub fn from_issue(issue: &TransferIssue) -> Result<Self, TransferError> {
        Ok(Self {
            table_field: issue.label(),
            point_id: issue.point_id.clone(),
            error: clean_error(&issue.error)?,
        })
    }

    /// Returns the three cells written to the tab.
    #[must_use]
    pub fn into_cells(self) -> Vec<String> {
        vec![self.table_field, self.point_id, self.error]
    }
}

fn triple_key(row: &[String]) -> (String, String, String) {
    let cell = |i: usize| row.get(i).map_or("", |c| c.trim()).to_owned();
    (cell(0), cell(1), cell(2))
}

/// Appends the issues not already in the review tab.
///
/// Rows are compared on their trimmed `A:C` triple. Repeats within the batch
/// are dropped as well, and the header is written first when the tab is
/// empty. Returns the number of rows appended.
pub fn append_review_rows<S: SheetSink>(
    book: &mut S,
    tab: &str,
    issues: &[TransferIssue],
) -> Result<usize, TransferError> {
    let rows = issues
        .iter()
        .map(|issue| ReviewRow::from_issue(issue).map(ReviewRow::into_cells))
        .collect::<Result<Vec<_>, _>>()?;
    let appended = book.append_unique(tab, &REVIEW_HEADER, rows, triple_key)?;
    if appended == 0 {
        info!(tab, "No new review rows");
    } else {
        info!(tab, rows = appended, "Appended review rows");
    }
    Ok(appended)
}

/// Outcome of a reviewer-column copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSyncReport {
    /// Target rows whose triple appears in the source.
    pub matched: usize,
    /// Matched rows with at least one reviewer cell changed.
    pub updated: usize,
}

/// Copies reviewer columns from `source_tab` into `target_tab`.
///
/// Rows are matched on the `NMAquifer_Table.Field, PointID, Error` triple
/// (trimmed). When the source repeats a triple, its last row wins. Both tabs
/// must carry all three key columns and all four reviewer columns. The target
/// is only rewritten when a cell changed.
pub fn copy_review_columns<S: SheetSink + ?Sized>(
    book: &mut S,
    source_tab: &str,
    target_tab: &str,
) -> Result<ReviewSyncReport, TransferError> {
    let required: Vec<&str> = REVIEW_HEADER.iter().chain(&REVIEWER_COLUMNS).copied().collect();

    let source = HeaderedGrid::new(book.read_tab(source_tab)?);
    let missing = source.missing(&required);
    if !missing.is_empty() {
        return Err(TransferError::missing_columns(source_tab, &missing));
    }
    let raw_target = book.read_tab(target_tab)?;
    let raw_header = raw_target.first().cloned().unwrap_or_default();
    let target = HeaderedGrid::new(raw_target);
    let missing = target.missing(&required);
    if !missing.is_empty() {
        return Err(TransferError::missing_columns(target_tab, &missing));
    }

    let key_of = |grid: &HeaderedGrid, row: &[String]| {
        let cell = |name: &str| HeaderedGrid::cell(row, grid.index(name)).to_owned();
        (cell(REVIEW_HEADER[0]), cell(REVIEW_HEADER[1]), cell(REVIEW_HEADER[2]))
    };

    let mut lookup: FxHashMap<(String, String, String), Vec<String>> = fx_hash_map();
    for row in source.rows() {
        let values = REVIEWER_COLUMNS
            .iter()
            .map(|name| HeaderedGrid::cell(row, source.index(name)).to_owned())
            .collect();
        lookup.insert(key_of(&source, row), values);
    }
    debug!(tab = source_tab, keys = lookup.len(), "Built reviewer lookup");

    let indices: Vec<usize> = REVIEWER_COLUMNS
        .iter()
        .filter_map(|name| target.index(name))
        .collect();
    let width = target.header().len();
    let mut report = ReviewSyncReport::default();
    let mut rows = Vec::with_capacity(target.rows().len());
    for row in target.rows() {
        let mut row = row.clone();
        if let Some(values) = lookup.get(&key_of(&target, &row)) {
            report.matched += 1;
            if row.len() < width {
                row.resize(width, String::new());
            }
            let mut changed = false;
            for (&index, value) in indices.iter().zip(values) {
                if row[index] != *value {
                    row[index].clone_from(value);
                    changed = true;
                }
            }
            if changed {
                report.updated += 1;
            }
        }
        rows.push(row);
    }

    if report.updated > 0 {
        let mut grid = Vec::with_capacity(rows.len() + 1);
        grid.push(raw_header);
        grid.extend(rows);
        book.write_tab(target_tab, &grid)?;
    }
    info!(
        source = source_tab,
        target = target_tab,
        matched = report.matched,
        updated = report.updated,
        "Copied reviewer columns"
    );
    Ok(report)
}
