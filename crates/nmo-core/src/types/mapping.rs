//! Mapping sheet records and the "does the field exist" flag.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::FieldRef;
use crate::normalize::NormalizedKey;

/// Classification of an existence flag.
///
/// # Examples
///
/// ```
/// use nmo_core::{ExistenceKind, ExistsInTarget};
///
/// assert_eq!(ExistsInTarget::new("Yes").kind(), ExistenceKind::Yes);
/// assert_eq!(ExistsInTarget::new("NA").kind(), ExistenceKind::NotApplicable);
/// assert_eq!(ExistsInTarget::new("maybe").kind(), ExistenceKind::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistenceKind {
    /// The field already exists in the target schema.
    Yes,
    /// The field does not exist yet.
    No,
    /// The field will not be migrated.
    NotApplicable,
    /// Blank or free text; still needs assessment.
    Unknown,
}

impl ExistenceKind {
    /// Returns the legend label used in the matrix view.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::NotApplicable => "N/A",
            Self::Unknown => "other",
        }
    }
}

/// The verbatim "Does field exist in Ocotillo?" cell.
///
/// The text is preserved exactly as typed so reports echo `N/A` as `N/A`
/// rather than collapsing it into a boolean. [`kind`](Self::kind) is the
/// derived classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExistsInTarget(String);

impl ExistsInTarget {
    /// Wraps the raw cell text.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the cell text as written in the mapping sheet.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classifies the flag. Comparison ignores case and surrounding spaces.
    #[must_use]
    pub fn kind(&self) -> ExistenceKind {
        let value = self.0.trim();
        if value.eq_ignore_ascii_case("yes") {
            ExistenceKind::Yes
        } else if value.eq_ignore_ascii_case("no") {
            ExistenceKind::No
        } else if value.eq_ignore_ascii_case("n/a") || value.eq_ignore_ascii_case("na") {
            ExistenceKind::NotApplicable
        } else {
            ExistenceKind::Unknown
        }
    }

    /// Returns the status shown in a matrix cell: the raw text, or
    /// `pending` when the cell is blank.
    #[must_use]
    pub fn status_label(&self) -> &str {
        if self.0.trim().is_empty() {
            "pending"
        } else {
            &self.0
        }
    }
}

impl fmt::Display for ExistsInTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a mapping sheet.
///
/// `old.table` is the legacy table the sheet belongs to and `old.field` is the
/// "NMAquifer Field Name" cell as typed. `new` is the target table and field,
/// either of which may be blank.
///
/// # Examples
///
/// ```
/// use nmo_core::{ExistsInTarget, FieldRef, MappingRecord};
///
/// let record = MappingRecord {
///     old: FieldRef::new("Wells", "Lat"),
///     new: FieldRef::new("sites", "latitude"),
///     exists: ExistsInTarget::new("yes"),
///     note: String::new(),
/// };
/// assert_eq!(record.key().as_str(), "lat");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// The legacy field this row describes.
    pub old: FieldRef,
    /// The target table and field.
    pub new: FieldRef,
    /// Verbatim existence flag.
    pub exists: ExistsInTarget,
    /// Free-text note.
    pub note: String,
}

impl MappingRecord {
    /// Returns the lookup key of this record (the normalized old field name).
    #[inline]
    #[must_use]
    pub fn key(&self) -> NormalizedKey {
        self.old.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existence_kind_classification() {
        assert_eq!(ExistsInTarget::new("yes").kind(), ExistenceKind::Yes);
        assert_eq!(ExistsInTarget::new(" YES ").kind(), ExistenceKind::Yes);
        assert_eq!(ExistsInTarget::new("No").kind(), ExistenceKind::No);
        assert_eq!(ExistsInTarget::new("N/A").kind(), ExistenceKind::NotApplicable);
        assert_eq!(ExistsInTarget::new("na").kind(), ExistenceKind::NotApplicable);
        assert_eq!(ExistsInTarget::new("").kind(), ExistenceKind::Unknown);
        assert_eq!(ExistsInTarget::new("partial").kind(), ExistenceKind::Unknown);
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let flag = ExistsInTarget::new("N/A");
        assert_eq!(flag.as_str(), "N/A");
        assert_eq!(flag.to_string(), "N/A");
        assert_eq!(flag.status_label(), "N/A");
    }

    #[test]
    fn test_blank_status_is_pending() {
        assert_eq!(ExistsInTarget::default().status_label(), "pending");
        assert_eq!(ExistsInTarget::new("  ").status_label(), "pending");
    }

    #[test]
    fn test_existence_kind_labels() {
        assert_eq!(ExistenceKind::Yes.label(), "yes");
        assert_eq!(ExistenceKind::NotApplicable.label(), "N/A");
        assert_eq!(ExistenceKind::Unknown.label(), "other");
    }
}
