//! Schema inventory: the legacy tables and their columns.
//!
//! The inventory is a CSV export with one row per legacy table:
//!
//! ```text
//! table_name,columns
//! Wells,"Well_ID, Lat"
//! WaterLevels,"['PointID', 'DepthToWater']"
//! ```
//!
//! The `columns` cell is a comma-separated list, optionally wrapped in `[]`
//! and with each name optionally quoted.

use camino::Utf8Path;
use nmo_core::clean_cell;
use nmo_sheets::{HeaderedGrid, read_csv_grid};
use tracing::{debug, warn};

use crate::error::MatchError;

const TABLE_NAME: &str = "table_name";
const COLUMNS: &str = "columns";

/// One legacy table and its columns, in inventory order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryTable {
    /// Trimmed table name.
    pub name: String,
    /// Column names, trimmed and unquoted.
    pub columns: Vec<String>,
}

/// The parsed schema inventory.
///
/// # Examples
///
/// ```
/// use nmo_matcher::SchemaInventory;
///
/// let grid = vec![
///     vec!["table_name".to_owned(), "columns".to_owned()],
///     vec!["Wells".to_owned(), "Well_ID, Lat".to_owned()],
/// ];
/// let inventory = SchemaInventory::from_grid("inventory", grid).unwrap();
/// assert_eq!(inventory.tables()[0].columns, vec!["Well_ID", "Lat"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaInventory {
    tables: Vec<InventoryTable>,
}

impl SchemaInventory {
    /// Reads the inventory CSV at `path`.
    pub fn from_path(path: &Utf8Path) -> Result<Self, MatchError> {
        if !path.is_file() {
            return Err(MatchError::MissingFile(path.to_owned()));
        }
        let grid = read_csv_grid(path)?;
        Self::from_grid(path.as_str(), grid)
    }

    /// Parses an inventory from rows whose first row is the header.
    ///
    /// `input` names the source in error messages. Rows with a blank
    /// `table_name` are skipped with a warning.
    pub fn from_grid(input: &str, grid: nmo_core::Grid) -> Result<Self, MatchError> {
        let table = HeaderedGrid::new(grid);
        let missing = table.missing(&[TABLE_NAME, COLUMNS]);
        if !missing.is_empty() {
            return Err(MatchError::missing_columns(input, &missing));
        }
        let name_idx = table.index(TABLE_NAME);
        let columns_idx = table.index(COLUMNS);

        let mut tables = Vec::with_capacity(table.rows().len());
        for (line, row) in table.rows().iter().enumerate() {
            let name = clean_cell(Some(HeaderedGrid::cell(row, name_idx)));
            if name.is_empty() {
                warn!(input, row = line + 2, "Skipping inventory row without a table name");
                continue;
            }
            let columns = split_columns_cell(HeaderedGrid::cell(row, columns_idx));
            debug!(table = %name, columns = columns.len(), "Inventory table");
            tables.push(InventoryTable { name, columns });
        }
        Ok(Self { tables })
    }

    /// Returns the tables in inventory order.
    #[inline]
    #[must_use]
    pub fn tables(&self) -> &[InventoryTable] {
        &self.tables
    }

    /// Returns the total number of legacy columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

/// Splits an inventory `columns` cell into column names.
///
/// # Examples
///
/// ```
/// use nmo_matcher::split_columns_cell;
///
/// assert_eq!(split_columns_cell("['PointID', \"Lat\" ,,]"), vec!["PointID", "Lat"]);
/// assert!(split_columns_cell("  ").is_empty());
/// ```
#[must_use]
pub fn split_columns_cell(cell: &str) -> Vec<String> {
    cell.trim()
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}
