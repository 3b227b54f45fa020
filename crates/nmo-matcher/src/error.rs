//! Error types for the nmo-matcher crate.
//!
//! Every variant is a fatal precondition failure: a required file or column is
//! absent, or an input cannot be read at all. Per-field problems (an unmatched
//! column, a rejected mapping row) are never errors; they travel as data in the
//! [`MatchResult`](nmo_core::MatchResult) set or as log lines.

use camino::Utf8PathBuf;
use nmo_sheets::SheetError;

/// Errors that abort a matching or report run.
///
/// # Examples
///
/// ```
/// use nmo_matcher::MatchError;
///
/// let err = MatchError::missing_columns("NMAquifer_Wells", &["Ocotillo Field Name"]);
/// assert_eq!(
///     err.to_string(),
///     "NMAquifer_Wells is missing required columns: Ocotillo Field Name"
/// );
/// ```
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A required input file does not exist.
    #[error("required file not found: {0}")]
    MissingFile(Utf8PathBuf),

    /// An input lacks one or more required header columns.
    #[error("{input} is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// The file or tab being read.
        input: String,
        /// The absent column names, in the order they are required.
        columns: Vec<String>,
    },

    /// An input that must have data rows is empty.
    #[error("{input} is empty")]
    EmptyInput {
        /// The file or tab being read.
        input: String,
    },

    /// Writing a local report failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The report file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing a JSON report failed.
    #[error("failed to encode {path}: {source}")]
    Json {
        /// The report file.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The workbook backend failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl MatchError {
    /// Creates a new [`MatchError::MissingColumns`] error.
    pub fn missing_columns(input: impl Into<String>, columns: &[&str]) -> Self {
        Self::MissingColumns {
            input: input.into(),
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    /// Creates a new [`MatchError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error names absent input columns.
    #[inline]
    #[must_use]
    pub const fn is_missing_columns(&self) -> bool {
        matches!(self, Self::MissingColumns { .. })
    }
}
