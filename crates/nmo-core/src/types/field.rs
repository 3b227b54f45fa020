//! Field references shared by both schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::{NormalizedKey, normalize_key};

/// A column in either the legacy or the target schema.
///
/// Two references name "the same field" when their [`key`](Self::key)s are
/// equal; the literal text is kept for display and for the reports.
///
/// # Examples
///
/// ```
/// use nmo_core::FieldRef;
///
/// let a = FieldRef::new("Location", "Well_ID");
/// let b = FieldRef::new("Location", "well id");
/// assert_eq!(a.key(), b.key());
/// assert_eq!(a.table_field(), "Location.Well_ID");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldRef {
    /// Table name.
    pub table: String,
    /// Field (column) name.
    pub field: String,
}

impl FieldRef {
    /// Creates a new field reference.
    #[must_use]
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Returns the normalized key of the field name.
    #[inline]
    #[must_use]
    pub fn key(&self) -> NormalizedKey {
        normalize_key(&self.field)
    }

    /// Returns `true` if both the table and the field are blank.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.table.is_empty() && self.field.is_empty()
    }

    /// Renders the reference as `Table.Field`.
    ///
    /// A blank side keeps the dot (`"sites."`, `".latitude"`) so a partially
    /// filled mapping stays visible; a fully blank reference renders as `""`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nmo_core::FieldRef;
    ///
    /// assert_eq!(FieldRef::new("sites", "latitude").table_field(), "sites.latitude");
    /// assert_eq!(FieldRef::new("sites", "").table_field(), "sites.");
    /// assert_eq!(FieldRef::new("", "latitude").table_field(), ".latitude");
    /// assert_eq!(FieldRef::default().table_field(), "");
    /// ```
    #[must_use]
    pub fn table_field(&self) -> String {
        if self.is_blank() {
            String::new()
        } else {
            format!("{}.{}", self.table, self.field)
        }
    }

    /// Renders the reference as `table, field` for the per-table pair layout.
    ///
    /// Partial references keep the separator (`"sites, "`, `", latitude"`);
    /// a fully blank reference renders as `""`.
    #[must_use]
    pub fn comma_pair(&self) -> String {
        if self.is_blank() {
            String::new()
        } else {
            format!("{}, {}", self.table, self.field)
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.field)
    }
}
