//! Error types for the nmo-transfer crate.

use camino::Utf8PathBuf;
use nmo_sheets::SheetError;

/// Errors that abort a transfer-log or review operation.
///
/// # Examples
///
/// ```
/// use nmo_transfer::TransferError;
///
/// let err = TransferError::missing_columns("AMP_review", &["Notes"]);
/// assert!(err.is_fatal_input());
/// assert_eq!(err.to_string(), "AMP_review is missing required columns: Notes");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// A required input file does not exist.
    #[error("required file not found: {0}")]
    MissingFile(Utf8PathBuf),

    /// The transfer log has content but no `PointID|Table|Field|Error` line.
    #[error("{0} has no PointID|Table|Field|Error header")]
    MissingHeader(Utf8PathBuf),

    /// A tab lacks one or more required header columns.
    #[error("{input} is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// The tab being read.
        input: String,
        /// The absent column names, in the order they are required.
        columns: Vec<String>,
    },

    /// A tab that must have a header row is empty.
    #[error("{input} is empty")]
    EmptyInput {
        /// The tab being read.
        input: String,
    },

    /// No files matched a combine pattern.
    #[error("no files matching {prefix}*.csv in {dir}")]
    NoInputs {
        /// Directory that was searched.
        dir: Utf8PathBuf,
        /// File name prefix.
        prefix: String,
    },

    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The file being accessed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be read or written.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// The CSV file.
        path: Utf8PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// An error-cleaning rule failed to compile.
    #[error("invalid pattern {pattern}: {source}")]
    Pattern {
        /// The rule's regular expression.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The workbook backend failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl TransferError {
    /// Creates a new [`TransferError::MissingColumns`] error.
    pub fn missing_columns(input: impl Into<String>, columns: &[&str]) -> Self {
        Self::MissingColumns {
            input: input.into(),
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    /// Creates a new [`TransferError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`TransferError::Csv`] error.
    #[inline]
    pub fn csv(path: impl Into<Utf8PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by the shape of the input rather than
    /// by the filesystem or the workbook backend.
    #[must_use]
    pub const fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            Self::MissingFile(_)
                | Self::MissingHeader(_)
                | Self::MissingColumns { .. }
                | Self::EmptyInput { .. }
                | Self::NoInputs { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_is_not_input_error() {
        let err = TransferError::io(
            "log.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_fatal_input());
        assert!(err.to_string().starts_with("failed to access log.csv"));
    }

    #[test]
    fn test_missing_header_message() {
        let err = TransferError::MissingHeader(Utf8PathBuf::from("transfer_metrics.csv"));
        assert_eq!(
            err.to_string(),
            "transfer_metrics.csv has no PointID|Table|Field|Error header"
        );
    }
}
