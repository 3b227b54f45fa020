//! Configuration structures for the crosswalk tool.
//!
//! This module provides configuration types for every batch operation:
//!
//! - [`InputConfig`] - Source files (schema inventory, transfer log, target export)
//! - [`SheetConfig`] - Workbook location, mapping tab prefix, output tab names
//! - [`OutputConfig`] - Local report directory and file names
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with the file and tab names the
//! migration team uses, so a JSON file only needs the values that differ.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Input file locations.
///
/// # Examples
///
/// ```
/// use nmo_core::InputConfig;
///
/// let inputs = InputConfig::default();
/// assert_eq!(inputs.inventory, "NM_Aquifer_Testing_DB_tables_cols.csv");
/// assert!(inputs.mapping_xlsx.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Schema inventory CSV with `table_name` and `columns` headers.
    pub inventory: Utf8PathBuf,

    /// Exported mapping workbook.
    ///
    /// When set, mapping tabs are read from this Excel file instead of the
    /// working workbook.
    pub mapping_xlsx: Option<Utf8PathBuf>,

    /// Pipe-delimited transfer log.
    pub transfer_log: Utf8PathBuf,

    /// Target schema export with a `table_field` column.
    pub target_schema: Utf8PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            inventory: Utf8PathBuf::from("NM_Aquifer_Testing_DB_tables_cols.csv"),
            mapping_xlsx: None,
            transfer_log: Utf8PathBuf::from("transfer_metrics.csv"),
            target_schema: Utf8PathBuf::from("ocotillo_current.csv"),
        }
    }
}

/// Workbook location and tab names.
///
/// # Examples
///
/// ```
/// use nmo_core::SheetConfig;
///
/// let sheets = SheetConfig::default();
/// assert_eq!(sheets.mapping_prefix, "NMAquifer_");
/// assert_eq!(sheets.matrix, "Matrix");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Directory holding the working workbook, one CSV file per tab.
    pub workbook: Utf8PathBuf,

    /// Title prefix that marks a tab as a mapping sheet (`NMAquifer_Location`).
    pub mapping_prefix: String,

    /// Tab receiving matched rows.
    pub matched: String,

    /// Tab receiving unmatched rows.
    pub unmatched: String,

    /// Tab receiving the matrix view and its legend.
    pub matrix: String,

    /// Tab receiving the flat or per-table field pairs.
    pub field_pairs: String,

    /// Reviewed copy of the field pairs that issue counts, block summaries and
    /// the target existence check annotate.
    pub field_pairs_checked: String,

    /// Tab receiving the per-`Table.Field` issue columns.
    pub issues: String,

    /// Append-only review log.
    pub review: String,

    /// Tab whose reviewer columns are copied into [`review`](Self::review).
    pub review_source: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            workbook: Utf8PathBuf::from("workbook"),
            mapping_prefix: "NMAquifer_".to_owned(),
            matched: "Matched".to_owned(),
            unmatched: "Unmatched".to_owned(),
            matrix: "Matrix".to_owned(),
            field_pairs: "FieldPairs".to_owned(),
            field_pairs_checked: "FieldPairs_Checked".to_owned(),
            issues: "TableField_Issues".to_owned(),
            review: "AMP_review".to_owned(),
            review_source: "Copy of AMP_review".to_owned(),
        }
    }
}

impl SheetConfig {
    fn named_tabs(&self) -> [(&'static str, &str); 9] {
        [
            ("sheets.mapping_prefix", &self.mapping_prefix),
            ("sheets.matched", &self.matched),
            ("sheets.unmatched", &self.unmatched),
            ("sheets.matrix", &self.matrix),
            ("sheets.field_pairs", &self.field_pairs),
            ("sheets.field_pairs_checked", &self.field_pairs_checked),
            ("sheets.issues", &self.issues),
            ("sheets.review", &self.review),
            ("sheets.review_source", &self.review_source),
        ]
    }
}

/// Local report files.
///
/// File names are joined onto [`dir`](Self::dir) by the accessor methods.
///
/// # Examples
///
/// ```
/// use nmo_core::OutputConfig;
///
/// let outputs = OutputConfig::default();
/// assert_eq!(outputs.matched_csv_path(), "./mapping_report_matched.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for local report files.
    pub dir: Utf8PathBuf,

    /// Matched rows CSV name.
    pub matched_csv: String,

    /// Unmatched rows CSV name.
    pub unmatched_csv: String,

    /// Per-table statistics JSON name.
    pub stats_json: String,

    /// Matched target fields per legacy table, JSON name.
    pub matched_json: String,

    /// Matrix view CSV name.
    pub matrix_csv: String,

    /// Flat field pairs CSV name.
    pub flat_pairs_csv: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: Utf8PathBuf::from("."),
            matched_csv: "mapping_report_matched.csv".to_owned(),
            unmatched_csv: "mapping_report_unmatched.csv".to_owned(),
            stats_json: "mapping_report_stats.json".to_owned(),
            matched_json: "mapping_report_matched.json".to_owned(),
            matrix_csv: "visual_matrix_for_sheets.csv".to_owned(),
            flat_pairs_csv: "FieldPairs_flat.csv".to_owned(),
        }
    }
}

impl OutputConfig {
    /// Path of the matched rows CSV.
    #[must_use]
    pub fn matched_csv_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.matched_csv)
    }

    /// Path of the unmatched rows CSV.
    #[must_use]
    pub fn unmatched_csv_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.unmatched_csv)
    }

    /// Path of the statistics JSON.
    #[must_use]
    pub fn stats_json_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.stats_json)
    }

    /// Path of the matched-fields JSON.
    #[must_use]
    pub fn matched_json_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.matched_json)
    }

    /// Path of the matrix CSV.
    #[must_use]
    pub fn matrix_csv_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.matrix_csv)
    }

    /// Path of the flat pairs CSV.
    #[must_use]
    pub fn flat_pairs_csv_path(&self) -> Utf8PathBuf {
        self.dir.join(&self.flat_pairs_csv)
    }
}

/// Root configuration for the crosswalk tool.
///
/// Built once by the command line and passed by reference into every
/// operation; nothing in the workspace reads process-wide settings.
///
/// # Examples
///
/// ```
/// use nmo_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("NMAquifer_"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input files.
    pub inputs: InputConfig,

    /// Workbook and tab names.
    pub sheets: SheetConfig,

    /// Local report files.
    pub outputs: OutputConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing sections and fields fall back to their defaults. The result is
    /// validated before it is returned.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that no tab name or prefix is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (option, value) in self.sheets.named_tabs() {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_option(option, "must not be blank"));
            }
        }
        if self.sheets.matched == self.sheets.unmatched {
            return Err(ConfigError::invalid_option(
                "sheets.unmatched",
                "must differ from sheets.matched",
            ));
        }
        Ok(())
    }
}
