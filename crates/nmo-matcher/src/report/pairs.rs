//! Field pair layouts: one flat list, or two columns per legacy table.

use std::collections::{BTreeMap, BTreeSet};

use nmo_core::{FieldRef, FxHashMap, FxHashSet, Grid, MatchResult, fx_hash_map, fx_hash_set};

/// Header of the flat pair layout.
pub const FLAT_HEADER: [&str; 2] = ["NMAquifer_TableField", "Ocotillo_TableField"];

/// Sub-header repeated over every table in the per-table layout.
pub const WIDE_SUBHEADER: [&str; 2] = ["NMAquifer_Field", "Ocotillo_TableField"];

/// One row of the flat pair layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatPair {
    /// The legacy field.
    pub old: FieldRef,
    /// `table.field` of the first match, or `""` when unmatched.
    pub target: String,
}

fn trimmed(field: &FieldRef) -> (String, String) {
    (field.table.trim().to_owned(), field.field.trim().to_owned())
}

/// Builds the flat pair list.
///
/// Every distinct legacy `(table, field)` appears exactly once, sorted by
/// table then field. When the same legacy field matched more than once, the
/// first match decides the target.
///
/// # Examples
///
/// ```
/// use nmo_core::{ExistsInTarget, FieldRef, MatchResult, UnmatchedReason};
/// use nmo_matcher::report::flat_pairs;
///
/// let results = vec![
///     MatchResult::Unmatched {
///         old: FieldRef::new("Wells", "Well_ID"),
///         reason: UnmatchedReason::NoMatchingField,
///     },
///     MatchResult::Matched {
///         old: FieldRef::new("Wells", "Lat"),
///         mapped_name: "Lat".to_owned(),
///         new: FieldRef::new("sites", ""),
///         exists: ExistsInTarget::new("no"),
///         note: String::new(),
///     },
/// ];
/// let pairs = flat_pairs(&results);
/// assert_eq!(pairs[0].old.field, "Lat");
/// assert_eq!(pairs[0].target, "sites.");
/// assert_eq!(pairs[1].target, "");
/// ```
#[must_use]
pub fn flat_pairs(results: &[MatchResult]) -> Vec<FlatPair> {
    let mut pairs: BTreeMap<(String, String), String> = BTreeMap::new();
    for result in results {
        if let MatchResult::Matched { old, new, .. } = result {
            pairs.entry(trimmed(old)).or_insert_with(|| new.table_field());
        }
    }
    for result in results {
        if !result.is_matched() {
            pairs.entry(trimmed(result.old())).or_default();
        }
    }
    pairs
        .into_iter()
        .map(|((table, field), target)| FlatPair {
            old: FieldRef::new(table, field),
            target,
        })
        .collect()
}

/// Renders the flat pair list with its header row.
#[must_use]
pub fn flat_pairs_grid(results: &[MatchResult]) -> Grid {
    let mut grid: Grid = vec![FLAT_HEADER.iter().map(|h| (*h).to_owned()).collect()];
    grid.extend(
        flat_pairs(results)
            .into_iter()
            .map(|pair| vec![pair.old.to_string(), pair.target]),
    );
    grid
}

/// Renders the per-table pair layout.
///
/// Tables run left to right in alphabetical order, two columns each. Row 1
/// holds the table name, row 2 the sub-headers, and the remaining rows the
/// table's fields: matched fields first, then unmatched ones, each group in
/// input order and without repeats. The target column joins every non-blank
/// `table, field` pair with `" | "`. Short tables are padded with blanks.
#[must_use]
pub fn wide_pairs_grid(results: &[MatchResult]) -> Grid {
    let mut targets: FxHashMap<(String, String), Vec<String>> = fx_hash_map();
    for result in results {
        if let MatchResult::Matched { old, new, .. } = result {
            let formatted = new.comma_pair();
            if !formatted.is_empty() {
                targets.entry(trimmed(old)).or_default().push(formatted);
            }
        }
    }

    let tables: BTreeSet<&str> = results.iter().map(|r| r.old().table.trim()).collect();
    let mut columns: Vec<(&str, Vec<String>)> = Vec::with_capacity(tables.len());
    for table in tables {
        let mut seen: FxHashSet<String> = fx_hash_set();
        let ordered = results
            .iter()
            .filter(|r| r.is_matched())
            .chain(results.iter().filter(|r| !r.is_matched()))
            .filter(|r| r.old().table.trim() == table)
            .map(|r| r.old().field.trim().to_owned())
            .filter(|field| seen.insert(field.clone()))
            .collect();
        columns.push((table, ordered));
    }

    let height = columns.iter().map(|(_, fields)| fields.len()).max().unwrap_or(0);
    let mut header = Vec::with_capacity(columns.len() * 2);
    let mut subheader = Vec::with_capacity(columns.len() * 2);
    for (table, _) in &columns {
        header.extend([(*table).to_owned(), String::new()]);
        subheader.extend(WIDE_SUBHEADER.iter().map(|h| (*h).to_owned()));
    }

    let mut grid = vec![header, subheader];
    for i in 0..height {
        let mut row = Vec::with_capacity(columns.len() * 2);
        for (table, fields) in &columns {
            match fields.get(i) {
                Some(field) => {
                    let target = targets
                        .get(&((*table).to_owned(), field.clone()))
                        .map(|values| values.join(" | "))
                        .unwrap_or_default();
                    row.push(field.clone());
                    row.push(target);
                }
                None => row.extend([String::new(), String::new()]),
            }
        }
        grid.push(row);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmo_core::{ExistsInTarget, UnmatchedReason};

    fn matched(table: &str, field: &str, target: (&str, &str)) -> MatchResult {
        MatchResult::Matched {
            old: FieldRef::new(table, field),
            mapped_name: field.to_owned(),
            new: FieldRef::new(target.0, target.1),
            exists: ExistsInTarget::new("yes"),
            note: String::new(),
        }
    }

    fn unmatched(table: &str, field: &str) -> MatchResult {
        MatchResult::Unmatched {
            old: FieldRef::new(table, field),
            reason: UnmatchedReason::NoMatchingField,
        }
    }

    #[test]
    fn test_flat_pairs_is_sorted_bijection() {
        let results = vec![
            unmatched("Wells", "Well_ID"),
            matched("Wells", "Lat", ("sites", "latitude")),
            matched("Logs", "Depth", ("", "depth")),
            matched("Wells", "Lat", ("other", "lat")),
            unmatched("Logs", "Depth"),
        ];
        let grid = flat_pairs_grid(&results);
        insta::assert_json_snapshot!(grid, @r#"
        [
          [
            "NMAquifer_TableField",
            "Ocotillo_TableField"
          ],
          [
            "Logs.Depth",
            ".depth"
          ],
          [
            "Wells.Lat",
            "sites.latitude"
          ],
          [
            "Wells.Well_ID",
            ""
          ]
        ]
        "#);
    }

    #[test]
    fn test_flat_pairs_blank_target() {
        let pairs = flat_pairs(&[matched("Wells", "Lat", ("", ""))]);
        assert_eq!(pairs[0].target, "");
    }

    #[test]
    fn test_wide_pairs_layout() {
        let results = vec![
            unmatched("Wells", "Well_ID"),
            matched("Wells", "Lat", ("sites", "latitude")),
            matched("Wells", "Lat", ("locations", "")),
            matched("Logs", "Depth", ("", "")),
        ];
        let grid = wide_pairs_grid(&results);
        insta::assert_json_snapshot!(grid, @r#"
        [
          [
            "Logs",
            "",
            "Wells",
            ""
          ],
          [
            "NMAquifer_Field",
            "Ocotillo_TableField",
            "NMAquifer_Field",
            "Ocotillo_TableField"
          ],
          [
            "Depth",
            "",
            "Lat",
            "sites, latitude | locations, "
          ],
          [
            "",
            "",
            "Well_ID",
            ""
          ]
        ]
        "#);
    }

    #[test]
    fn test_wide_pairs_is_rectangular() {
        let results = vec![
            unmatched("A", "x"),
            unmatched("A", "y"),
            unmatched("A", "z"),
            unmatched("B", "w"),
        ];
        let grid = wide_pairs_grid(&results);
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_wide_pairs_empty() {
        let grid = wide_pairs_grid(&[]);
        assert_eq!(grid, vec![Vec::<String>::new(), Vec::new()]);
    }
}
