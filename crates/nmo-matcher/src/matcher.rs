//! Joins legacy columns against the mapping sheets.

use std::collections::BTreeMap;

use nmo_core::{
    FieldRef, FxHashMap, MappingRecord, MatchResult, NormalizedKey, TableStats, UnmatchedReason,
    fx_hash_map,
};
use tracing::{debug, info};

use crate::inventory::SchemaInventory;
use crate::mapping::MappingSet;

/// Results of one match run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// One result per legacy column, in inventory order.
    pub results: Vec<MatchResult>,
    /// Per-table aggregates, keyed by legacy table name.
    pub stats: BTreeMap<String, TableStats>,
}

impl MatchOutcome {
    /// Iterates the matched results.
    pub fn matched(&self) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().filter(|r| r.is_matched())
    }

    /// Iterates the unmatched results.
    pub fn unmatched(&self) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().filter(|r| !r.is_matched())
    }

    /// Returns the number of matched results.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    /// Returns the number of unmatched results.
    #[must_use]
    pub fn unmatched_count(&self) -> usize {
        self.results.len() - self.matched_count()
    }
}

/// Matches legacy columns to mapping records by normalized field name.
///
/// Lookups are built once per mapping sheet when the matcher is created.
///
/// # Examples
///
/// ```
/// use nmo_core::FieldRef;
/// use nmo_matcher::{MappingSet, MappingSheet, Matcher};
///
/// let mut mappings = MappingSet::new();
/// mappings.insert(MappingSheet { table: "Logs".to_owned(), records: Vec::new() });
///
/// let matcher = Matcher::new(&mappings);
/// let (results, stats) = matcher.match_table("Logs", &["Depth".to_owned()]);
/// assert!(!results[0].is_matched());
/// assert!(stats.has_mapping_sheet);
/// ```
#[derive(Debug)]
pub struct Matcher<'a> {
    lookups: FxHashMap<&'a str, TableLookup<'a>>,
}

#[derive(Debug)]
struct TableLookup<'a> {
    by_key: FxHashMap<NormalizedKey, &'a MappingRecord>,
    row_count: usize,
}

impl<'a> Matcher<'a> {
    /// Prepares lookups for every sheet in `mappings`.
    #[must_use]
    pub fn new(mappings: &'a MappingSet) -> Self {
        let mut lookups = fx_hash_map();
        for sheet in mappings.iter() {
            lookups.insert(
                sheet.table.as_str(),
                TableLookup {
                    by_key: sheet.lookup(),
                    row_count: sheet.records.len(),
                },
            );
        }
        Self { lookups }
    }

    /// Matches one table's columns.
    ///
    /// Without a mapping sheet every column is unmatched with
    /// [`UnmatchedReason::NoMappingSheet`]. Otherwise each column is looked up
    /// by its normalized name; matched results copy the target reference,
    /// existence flag, and note verbatim from the record.
    #[must_use]
    pub fn match_table(&self, table: &str, columns: &[String]) -> (Vec<MatchResult>, TableStats) {
        let mut stats = TableStats {
            csv_column_count: columns.len(),
            ..TableStats::default()
        };

        let Some(lookup) = self.lookups.get(table) else {
            stats.unmatched_count = columns.len();
            let results = columns
                .iter()
                .map(|column| MatchResult::Unmatched {
                    old: FieldRef::new(table, column.as_str()),
                    reason: UnmatchedReason::NoMappingSheet,
                })
                .collect();
            debug!(table, columns = columns.len(), "No mapping sheet for table");
            return (results, stats);
        };

        stats.has_mapping_sheet = true;
        stats.mapping_row_count = lookup.row_count;

        let mut results = Vec::with_capacity(columns.len());
        for column in columns {
            let old = FieldRef::new(table, column.as_str());
            match lookup.by_key.get(&old.key()) {
                Some(record) => {
                    stats.matched_count += 1;
                    results.push(MatchResult::Matched {
                        old,
                        mapped_name: record.old.field.clone(),
                        new: record.new.clone(),
                        exists: record.exists.clone(),
                        note: record.note.clone(),
                    });
                }
                None => {
                    stats.unmatched_count += 1;
                    results.push(MatchResult::Unmatched {
                        old,
                        reason: UnmatchedReason::NoMatchingField,
                    });
                }
            }
        }
        (results, stats)
    }

    /// Matches every table of the inventory.
    ///
    /// A table listed more than once in the inventory gets its statistics
    /// combined into one entry.
    #[must_use]
    pub fn run(&self, inventory: &SchemaInventory) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();
        for table in inventory.tables() {
            let (results, stats) = self.match_table(&table.name, &table.columns);
            outcome.results.extend(results);
            outcome
                .stats
                .entry(table.name.clone())
                .and_modify(|existing| existing.absorb(&stats))
                .or_insert(stats);
        }
        info!(
            tables = outcome.stats.len(),
            matched = outcome.matched_count(),
            unmatched = outcome.unmatched_count(),
            "Matched legacy columns"
        );
        outcome
    }
}

/// Matches an inventory against a mapping set in one call.
#[must_use]
pub fn match_inventory(inventory: &SchemaInventory, mappings: &MappingSet) -> MatchOutcome {
    Matcher::new(mappings).run(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingSheet;
    use nmo_core::ExistsInTarget;

    fn inventory(rows: &[(&str, &str)]) -> SchemaInventory {
        let mut grid = vec![vec!["table_name".to_owned(), "columns".to_owned()]];
        grid.extend(
            rows.iter()
                .map(|(t, c)| vec![(*t).to_owned(), (*c).to_owned()]),
        );
        SchemaInventory::from_grid("inventory", grid).unwrap()
    }

    fn record(table: &str, field: &str, target: (&str, &str), exists: &str) -> MappingRecord {
        MappingRecord {
            old: FieldRef::new(table, field),
            new: FieldRef::new(target.0, target.1),
            exists: ExistsInTarget::new(exists),
            note: String::new(),
        }
    }

    fn wells_mappings() -> MappingSet {
        let mut set = MappingSet::new();
        set.insert(MappingSheet {
            table: "Wells".to_owned(),
            records: vec![record("Wells", "Lat", ("sites", "latitude"), "yes")],
        });
        set
    }

    #[test]
    fn test_wells_end_to_end() {
        let outcome = match_inventory(&inventory(&[("Wells", "Well_ID, Lat")]), &wells_mappings());

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(
            outcome.results[0],
            MatchResult::Unmatched {
                old: FieldRef::new("Wells", "Well_ID"),
                reason: UnmatchedReason::NoMatchingField,
            }
        );
        assert_eq!(
            outcome.results[1],
            MatchResult::Matched {
                old: FieldRef::new("Wells", "Lat"),
                mapped_name: "Lat".to_owned(),
                new: FieldRef::new("sites", "latitude"),
                exists: ExistsInTarget::new("yes"),
                note: String::new(),
            }
        );
        assert_eq!(
            outcome.stats["Wells"],
            TableStats {
                csv_column_count: 2,
                mapping_row_count: 1,
                matched_count: 1,
                unmatched_count: 1,
                has_mapping_sheet: true,
            }
        );
    }

    #[test]
    fn test_table_without_sheet() {
        let outcome = match_inventory(&inventory(&[("Logs", "Depth, Date")]), &wells_mappings());
        assert!(outcome.results.iter().all(MatchResult::lacks_mapping_sheet));
        let stats = outcome.stats["Logs"];
        assert!(!stats.has_mapping_sheet);
        assert_eq!(stats.unmatched_count, 2);
        assert_eq!(stats.mapping_row_count, 0);
    }

    #[test]
    fn test_normalized_names_match() {
        let outcome = match_inventory(&inventory(&[("Wells", "LAT")]), &wells_mappings());
        match &outcome.results[0] {
            MatchResult::Matched {
                old, mapped_name, ..
            } => {
                assert_eq!(old.field, "LAT");
                assert_eq!(mapped_name, "Lat");
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn test_one_result_per_column() {
        let outcome = match_inventory(
            &inventory(&[("Wells", "Lat, Lat, Well_ID"), ("Logs", "Depth")]),
            &wells_mappings(),
        );
        assert_eq!(outcome.results.len(), 4);
        assert_eq!(outcome.matched_count(), 2);
        assert_eq!(outcome.unmatched_count(), 2);
    }

    #[test]
    fn test_duplicate_inventory_tables_combine_stats() {
        let outcome = match_inventory(
            &inventory(&[("Wells", "Lat"), ("Wells", "Well_ID")]),
            &wells_mappings(),
        );
        let stats = outcome.stats["Wells"];
        assert_eq!(stats.csv_column_count, 2);
        assert_eq!(stats.matched_count, 1);
        assert_eq!(stats.unmatched_count, 1);
    }

    #[test]
    fn test_existence_flag_is_not_reinterpreted() {
        let mut set = MappingSet::new();
        set.insert(MappingSheet {
            table: "Wells".to_owned(),
            records: vec![record("Wells", "Lat", ("", ""), "N/A")],
        });
        let outcome = match_inventory(&inventory(&[("Wells", "Lat")]), &set);
        match &outcome.results[0] {
            MatchResult::Matched { exists, new, .. } => {
                assert_eq!(exists.as_str(), "N/A");
                assert!(new.is_blank());
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }
}
