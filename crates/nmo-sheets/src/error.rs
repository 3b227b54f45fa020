//! Error types for the nmo-sheets crate.

use camino::Utf8PathBuf;

/// Errors raised by workbook backends.
///
/// A missing tab is reported as [`SheetError::TabNotFound`] so callers can
/// decide whether absence is fatal for their operation. Everything else is an
/// I/O or format failure of the backend itself.
///
/// # Examples
///
/// ```
/// use nmo_sheets::SheetError;
///
/// let err = SheetError::tab_not_found("Matrix");
/// assert!(matches!(err, SheetError::TabNotFound { .. }));
/// assert_eq!(err.to_string(), "tab not found: Matrix");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The requested tab does not exist.
    #[error("tab not found: {tab}")]
    TabNotFound {
        /// Title of the missing tab.
        tab: String,
    },

    /// A tab title cannot be stored by this backend.
    #[error("invalid tab title '{title}': {reason}")]
    InvalidTitle {
        /// The rejected title.
        title: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The workbook directory does not exist.
    #[error("workbook directory not found: {0}")]
    MissingWorkbook(Utf8PathBuf),

    /// An I/O error on a workbook file.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File or directory being accessed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV tab file could not be read or written.
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        /// The tab file.
        path: Utf8PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// An Excel workbook could not be read.
    #[error("failed to read Excel workbook {path}: {source}")]
    Xlsx {
        /// The workbook file.
        path: Utf8PathBuf,
        /// The underlying reader error.
        #[source]
        source: calamine::XlsxError,
    },

    /// A path inside the workbook directory is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl SheetError {
    /// Creates a new [`SheetError::TabNotFound`] error.
    #[inline]
    pub fn tab_not_found(tab: impl Into<String>) -> Self {
        Self::TabNotFound { tab: tab.into() }
    }

    /// Creates a new [`SheetError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`SheetError::Csv`] error.
    #[inline]
    pub fn csv(path: impl Into<Utf8PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_tab_not_found() {
        let err = SheetError::tab_not_found("AMP_review");
        assert!(matches!(err, SheetError::TabNotFound { ref tab } if tab == "AMP_review"));
        assert_eq!(err.to_string(), "tab not found: AMP_review");
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = SheetError::io(
            "workbook/Matched.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, SheetError::Io { ref path, .. } if path == "workbook/Matched.csv"));
        assert!(err.to_string().contains("workbook/Matched.csv"));
    }

    #[test]
    fn test_invalid_title_display() {
        let err = SheetError::InvalidTitle {
            title: "a/b".to_owned(),
            reason: "contains a path separator",
        };
        assert_eq!(
            err.to_string(),
            "invalid tab title 'a/b': contains a path separator"
        );
    }
}
