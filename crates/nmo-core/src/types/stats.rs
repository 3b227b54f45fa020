//! Per-table statistics and existence-flag tallies.
//!
//! [`TableStats`] is recomputed on every match run and written to the stats
//! JSON report. [`StatusCounts`] feeds the matrix legend.

use serde::{Deserialize, Serialize};

use super::mapping::ExistenceKind;
use super::outcome::MatchResult;

/// Aggregate counts for one legacy table.
///
/// Serialized with the short keys the stats report has always used.
///
/// # Examples
///
/// ```
/// use nmo_core::TableStats;
///
/// let stats = TableStats {
///     csv_column_count: 2,
///     mapping_row_count: 1,
///     matched_count: 1,
///     unmatched_count: 1,
///     has_mapping_sheet: true,
/// };
/// let json = serde_json::to_string(&stats).unwrap();
/// assert_eq!(
///     json,
///     r#"{"csv_cols":2,"sheet_rows":1,"matched":1,"unmatched":1,"has_sheet":true}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    /// Columns listed for the table in the schema inventory.
    #[serde(rename = "csv_cols")]
    pub csv_column_count: usize,
    /// Accepted rows in the table's mapping sheet.
    #[serde(rename = "sheet_rows")]
    pub mapping_row_count: usize,
    /// Columns that found a mapping row.
    #[serde(rename = "matched")]
    pub matched_count: usize,
    /// Columns that did not.
    #[serde(rename = "unmatched")]
    pub unmatched_count: usize,
    /// Whether a mapping sheet exists for the table.
    #[serde(rename = "has_sheet")]
    pub has_mapping_sheet: bool,
}

impl TableStats {
    /// Adds another record's counts into this one.
    ///
    /// Used when the inventory lists the same table more than once.
    pub fn absorb(&mut self, other: &Self) {
        self.csv_column_count += other.csv_column_count;
        self.matched_count += other.matched_count;
        self.unmatched_count += other.unmatched_count;
        self.mapping_row_count = self.mapping_row_count.max(other.mapping_row_count);
        self.has_mapping_sheet |= other.has_mapping_sheet;
    }
}

/// Tally of existence flags over a result set.
///
/// Unmatched results count as [`other`](Self::other).
///
/// # Examples
///
/// ```
/// use nmo_core::StatusCounts;
///
/// let counts = StatusCounts { yes: 1, no: 0, not_applicable: 0, other: 1 };
/// assert_eq!(counts.total(), 2);
/// assert_eq!(counts.share(counts.yes), "50.0% (1/2)");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Flags reading `yes`.
    pub yes: usize,
    /// Flags reading `no`.
    pub no: usize,
    /// Flags reading `N/A` or `NA`.
    pub not_applicable: usize,
    /// Blank flags, free text, and unmatched fields.
    pub other: usize,
}

impl StatusCounts {
    /// Tallies a result set.
    #[must_use]
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> Self {
        let mut counts = Self::default();
        for result in results {
            let kind = match result {
                MatchResult::Matched { exists, .. } => exists.kind(),
                MatchResult::Unmatched { .. } => ExistenceKind::Unknown,
            };
            match kind {
                ExistenceKind::Yes => counts.yes += 1,
                ExistenceKind::No => counts.no += 1,
                ExistenceKind::NotApplicable => counts.not_applicable += 1,
                ExistenceKind::Unknown => counts.other += 1,
            }
        }
        counts
    }

    /// Returns the number of tallied results.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> usize {
        self.yes + self.no + self.not_applicable + self.other
    }

    /// Returns `count` as a percentage of the total, rounded to one decimal.
    ///
    /// An empty tally divides by one so the legend never shows `NaN`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self, count: usize) -> f64 {
        let total = self.total().max(1);
        (count as f64 * 1000.0 / total as f64).round() / 10.0
    }

    /// Renders a legend cell such as `"50.0% (1/2)"`.
    #[must_use]
    pub fn share(&self, count: usize) -> String {
        format!("{:.1}% ({count}/{})", self.percent(count), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExistsInTarget, FieldRef, UnmatchedReason};

    fn matched(flag: &str) -> MatchResult {
        MatchResult::Matched {
            old: FieldRef::new("Wells", "Lat"),
            mapped_name: "Lat".to_owned(),
            new: FieldRef::new("sites", "latitude"),
            exists: ExistsInTarget::new(flag),
            note: String::new(),
        }
    }

    #[test]
    fn test_tally_counts_unmatched_as_other() {
        let results = vec![
            matched("yes"),
            matched("No"),
            matched("n/a"),
            matched(""),
            MatchResult::Unmatched {
                old: FieldRef::new("Wells", "Well_ID"),
                reason: UnmatchedReason::NoMatchingField,
            },
        ];
        let counts = StatusCounts::tally(&results);
        assert_eq!(
            counts,
            StatusCounts {
                yes: 1,
                no: 1,
                not_applicable: 1,
                other: 2
            }
        );
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_percent_rounds_to_one_decimal() {
        let counts = StatusCounts {
            yes: 1,
            no: 2,
            not_applicable: 0,
            other: 0,
        };
        assert!((counts.percent(1) - 33.3).abs() < f64::EPSILON);
        assert!((counts.percent(2) - 66.7).abs() < f64::EPSILON);
        assert_eq!(counts.share(2), "66.7% (2/3)");
    }

    #[test]
    fn test_empty_tally_does_not_divide_by_zero() {
        let counts = StatusCounts::default();
        assert_eq!(counts.share(0), "0.0% (0/0)");
    }

    #[test]
    fn test_absorb_duplicate_table() {
        let mut first = TableStats {
            csv_column_count: 2,
            mapping_row_count: 3,
            matched_count: 1,
            unmatched_count: 1,
            has_mapping_sheet: true,
        };
        first.absorb(&TableStats {
            csv_column_count: 1,
            mapping_row_count: 3,
            matched_count: 1,
            unmatched_count: 0,
            has_mapping_sheet: true,
        });
        assert_eq!(first.csv_column_count, 3);
        assert_eq!(first.matched_count, 2);
        assert_eq!(first.mapping_row_count, 3);
        assert_eq!(first.unmatched_count, 1);
    }

    #[test]
    fn test_stats_json_keys() {
        let stats: TableStats = serde_json::from_str(
            r#"{"csv_cols":4,"sheet_rows":0,"matched":0,"unmatched":4,"has_sheet":false}"#,
        )
        .unwrap();
        assert_eq!(stats.unmatched_count, 4);
        assert!(!stats.has_mapping_sheet);
    }
}
