//! Name normalization for fuzzy field matching.
//!
//! Legacy column names and the names typed into the mapping sheets rarely agree
//! on case or punctuation (`Well_ID`, `well id`, `WELL-ID`). Both sides of every
//! comparison go through [`normalize_key`], which lowercases and keeps only
//! ASCII letters and digits.
//!
//! # Examples
//!
//! ```
//! use nmo_core::normalize_key;
//!
//! assert_eq!(normalize_key("Well_ID").as_str(), "wellid");
//! assert_eq!(normalize_key("well id"), normalize_key("WELL-ID"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical comparison key derived from a raw field or table name.
///
/// Only ever contains `[0-9a-z]`. The empty key is valid and is what blank
/// input normalizes to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the raw name contained no letters or digits.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Option<&str>> for NormalizedKey {
    fn from(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::default, normalize_key)
    }
}

/// Normalizes a raw name into a [`NormalizedKey`].
///
/// Lowercases the input, then drops every character outside `[0-9a-z]`.
/// Total and idempotent.
///
/// # Examples
///
/// ```
/// use nmo_core::normalize_key;
///
/// let key = normalize_key("  Site-Name (2) ");
/// assert_eq!(key.as_str(), "sitename2");
/// assert_eq!(normalize_key(key.as_str()), key);
/// assert!(normalize_key("").is_empty());
/// ```
#[must_use]
pub fn normalize_key(raw: &str) -> NormalizedKey {
    let key = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect();
    NormalizedKey(key)
}

/// Cleans a single input cell: `None` becomes empty, anything else is trimmed.
///
/// # Examples
///
/// ```
/// use nmo_core::clean_cell;
///
/// assert_eq!(clean_cell(Some("  Lat ")), "Lat");
/// assert_eq!(clean_cell(None), "");
/// ```
#[must_use]
pub fn clean_cell(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_owned()
}
