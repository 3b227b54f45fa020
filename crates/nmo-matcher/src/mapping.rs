//! Mapping sheets: the human-curated old-to-new field table per legacy table.
//!
//! Each legacy table has its own tab named `NMAquifer_<table>`. A tab looks
//! like:
//!
//! | NMAquifer Field Name | Ocotillo Table Name | Ocotillo Field Name | Does field exist in Ocotillo? | Note |
//! |----------------------|---------------------|---------------------|-------------------------------|------|
//! | Lat                  | sites               | latitude            | yes                           |      |
//!
//! Some tabs call the existence column `Does field exist in the model?`; it
//! is read as the same column. `Note` is optional.

use std::collections::BTreeMap;

use nmo_core::{
    ExistsInTarget, FieldRef, FxHashMap, MappingRecord, NormalizedKey, fx_hash_map,
};
use nmo_sheets::{HeaderedGrid, SheetSource};
use tracing::{debug, info, warn};

use crate::error::MatchError;

/// `NMAquifer Field Name` header.
pub const FIELD_NAME_COLUMN: &str = "NMAquifer Field Name";
/// `Ocotillo Table Name` header.
pub const TARGET_TABLE_COLUMN: &str = "Ocotillo Table Name";
/// `Ocotillo Field Name` header.
pub const TARGET_FIELD_COLUMN: &str = "Ocotillo Field Name";
/// `Does field exist in Ocotillo?` header.
pub const EXISTS_COLUMN: &str = "Does field exist in Ocotillo?";
/// Older spelling of [`EXISTS_COLUMN`].
pub const EXISTS_ALIAS_COLUMN: &str = "Does field exist in the model?";
/// `Note` header.
pub const NOTE_COLUMN: &str = "Note";

const REQUIRED_COLUMNS: [&str; 3] = [FIELD_NAME_COLUMN, TARGET_TABLE_COLUMN, TARGET_FIELD_COLUMN];

/// The accepted records of one mapping tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSheet {
    /// Legacy table name taken from the tab title.
    pub table: String,
    /// Accepted rows, in tab order.
    pub records: Vec<MappingRecord>,
}

impl MappingSheet {
    /// Parses a mapping tab.
    ///
    /// A completely empty tab yields a sheet with no records. A tab with a
    /// header row must carry every required column. Rows with a blank
    /// `NMAquifer Field Name` are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use nmo_matcher::MappingSheet;
    ///
    /// let grid = vec![
    ///     vec![
    ///         "NMAquifer Field Name".to_owned(),
    ///         "Ocotillo Table Name".to_owned(),
    ///         "Ocotillo Field Name".to_owned(),
    ///         "Does field exist in the model?".to_owned(),
    ///     ],
    ///     vec!["Lat".to_owned(), "sites".to_owned(), "latitude".to_owned(), "N/A".to_owned()],
    /// ];
    /// let sheet = MappingSheet::from_grid("Wells", "NMAquifer_Wells", grid).unwrap();
    /// assert_eq!(sheet.records[0].exists.as_str(), "N/A");
    /// ```
    pub fn from_grid(
        table: &str,
        tab_title: &str,
        grid: nmo_core::Grid,
    ) -> Result<Self, MatchError> {
        let grid = HeaderedGrid::new(grid);
        if grid.is_empty() {
            return Ok(Self {
                table: table.to_owned(),
                records: Vec::new(),
            });
        }
        let missing = grid.missing(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(MatchError::missing_columns(tab_title, &missing));
        }

        let field_idx = grid.index(FIELD_NAME_COLUMN);
        let target_table_idx = grid.index(TARGET_TABLE_COLUMN);
        let target_field_idx = grid.index(TARGET_FIELD_COLUMN);
        let exists_idx = grid
            .index(EXISTS_COLUMN)
            .or_else(|| grid.index(EXISTS_ALIAS_COLUMN));
        let note_idx = grid.index(NOTE_COLUMN);

        let mut records = Vec::with_capacity(grid.rows().len());
        for (line, row) in grid.rows().iter().enumerate() {
            let field = HeaderedGrid::cell(row, field_idx);
            if field.is_empty() {
                debug!(tab = tab_title, row = line + 2, "Skipping mapping row without a field name");
                continue;
            }
            records.push(MappingRecord {
                old: FieldRef::new(table, field),
                new: FieldRef::new(
                    HeaderedGrid::cell(row, target_table_idx),
                    HeaderedGrid::cell(row, target_field_idx),
                ),
                exists: ExistsInTarget::new(HeaderedGrid::cell(row, exists_idx)),
                note: HeaderedGrid::cell(row, note_idx).to_owned(),
            });
        }

        Ok(Self {
            table: table.to_owned(),
            records,
        })
    }

    /// Builds the lookup from normalized field name to record.
    ///
    /// When two rows normalize to the same key, the first row wins.
    #[must_use]
    pub fn lookup(&self) -> FxHashMap<NormalizedKey, &MappingRecord> {
        let mut lookup = fx_hash_map();
        for record in &self.records {
            lookup.entry(record.key()).or_insert(record);
        }
        lookup
    }
}

/// Every mapping sheet found in a workbook, keyed by legacy table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSet {
    sheets: BTreeMap<String, MappingSheet>,
}

impl MappingSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every tab whose title starts with `prefix` (ignoring case).
    ///
    /// The legacy table name is the remainder of the title, trimmed. When two
    /// tabs resolve to the same table, the first one in title order is kept.
    pub fn load<S: SheetSource + ?Sized>(source: &S, prefix: &str) -> Result<Self, MatchError> {
        let mut set = Self::new();
        for title in source.tab_titles()? {
            let Some(table) = strip_prefix_ignore_case(&title, prefix) else {
                continue;
            };
            let table = table.trim();
            if set.sheets.contains_key(table) {
                warn!(tab = %title, table, "Duplicate mapping tab, keeping the first");
                continue;
            }
            let sheet = MappingSheet::from_grid(table, &title, source.read_tab(&title)?)?;
            debug!(tab = %title, records = sheet.records.len(), "Loaded mapping tab");
            set.insert(sheet);
        }
        info!(sheets = set.len(), "Loaded mapping sheets");
        Ok(set)
    }

    /// Adds a sheet, replacing any sheet for the same table.
    pub fn insert(&mut self, sheet: MappingSheet) {
        self.sheets.insert(sheet.table.clone(), sheet);
    }

    /// Returns the sheet for a legacy table.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<&MappingSheet> {
        self.sheets.get(table)
    }

    /// Returns the number of sheets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Returns `true` if no mapping sheets were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Iterates sheets in table-name order.
    pub fn iter(&self) -> impl Iterator<Item = &MappingSheet> {
        self.sheets.values()
    }
}

/// Strips `prefix` from `title`, comparing ASCII case-insensitively.
///
/// # Examples
///
/// ```
/// use nmo_matcher::strip_prefix_ignore_case;
///
/// assert_eq!(strip_prefix_ignore_case("nmaquifer_Wells", "NMAquifer_"), Some("Wells"));
/// assert_eq!(strip_prefix_ignore_case("Matrix", "NMAquifer_"), None);
/// ```
#[must_use]
pub fn strip_prefix_ignore_case<'a>(title: &'a str, prefix: &str) -> Option<&'a str> {
    let head = title.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &title[prefix.len()..])
}
