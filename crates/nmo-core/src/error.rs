//! Error types for the nmo-core crate.
//!
//! This module provides the [`ConfigError`] type for failures while loading or
//! validating a [`Config`](crate::Config).

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use nmo_core::ConfigError;
///
/// let error = ConfigError::InvalidOption {
///     option: "sheets.mapping_prefix".to_owned(),
///     reason: "must not be empty".to_owned(),
/// };
/// assert!(error.to_string().contains("sheets.mapping_prefix"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    MissingFile(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// Dotted name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`Config`](crate::Config).
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_display() {
        let error = ConfigError::MissingFile(Utf8PathBuf::from("/etc/nmo.json"));
        assert_eq!(
            error.to_string(),
            "configuration file not found: /etc/nmo.json"
        );
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("sheets.matrix", "must not be blank");
        let msg = error.to_string();
        assert!(msg.contains("sheets.matrix"));
        assert!(msg.contains("must not be blank"));
    }

    #[test]
    fn test_io_display_includes_path() {
        let error = ConfigError::Io {
            path: Utf8PathBuf::from("nmo.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("nmo.json"));
    }
}
