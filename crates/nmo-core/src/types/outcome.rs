//! Per-field match outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::FieldRef;
use super::mapping::ExistsInTarget;

/// Why a legacy field did not match any mapping row.
///
/// # Examples
///
/// ```
/// use nmo_core::UnmatchedReason;
///
/// let reason = UnmatchedReason::NoMatchingField;
/// assert_eq!(reason.to_string(), "no matching field name after normalization");
/// assert_eq!(UnmatchedReason::from_text(&reason.to_string()), reason);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// The table has no mapping sheet at all.
    NoMappingSheet,
    /// The table has a mapping sheet, but no row's normalized field name
    /// equals the legacy field's normalized name.
    NoMatchingField,
    /// A reason read back from a report that this tool did not write.
    Other(String),
}

impl UnmatchedReason {
    /// Parses a reason cell from an unmatched report.
    ///
    /// Recognises this tool's own wording and the older
    /// `No corresponding sheet ...` / `No matching ...` phrasing; anything else
    /// is kept verbatim as [`Other`](Self::Other).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let lower = text.trim().to_ascii_lowercase();
        if lower.starts_with("no corresponding") {
            Self::NoMappingSheet
        } else if lower.starts_with("no matching") {
            Self::NoMatchingField
        } else {
            Self::Other(text.trim().to_owned())
        }
    }
}

impl fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMappingSheet => f.write_str("no corresponding mapping sheet for table"),
            Self::NoMatchingField => f.write_str("no matching field name after normalization"),
            Self::Other(text) => f.write_str(text),
        }
    }
}

/// The outcome for one legacy field.
///
/// Exactly one result is produced per legacy column per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    /// A mapping row was found.
    Matched {
        /// The legacy field, spelled as in the schema inventory.
        old: FieldRef,
        /// The legacy field name as typed in the mapping sheet.
        mapped_name: String,
        /// Target table and field, copied verbatim.
        new: FieldRef,
        /// Existence flag, copied verbatim.
        exists: ExistsInTarget,
        /// Note, copied verbatim.
        note: String,
    },
    /// No mapping row was found.
    Unmatched {
        /// The legacy field.
        old: FieldRef,
        /// Why it did not match.
        reason: UnmatchedReason,
    },
}

impl MatchResult {
    /// Returns the legacy field this result is about.
    #[inline]
    #[must_use]
    pub fn old(&self) -> &FieldRef {
        match self {
            Self::Matched { old, .. } | Self::Unmatched { old, .. } => old,
        }
    }

    /// Returns `true` for [`Matched`](Self::Matched).
    #[inline]
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Returns the target reference of a matched result.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&FieldRef> {
        match self {
            Self::Matched { new, .. } => Some(new),
            Self::Unmatched { .. } => None,
        }
    }

    /// Returns `true` if this result says the table has no mapping sheet.
    #[inline]
    #[must_use]
    pub fn lacks_mapping_sheet(&self) -> bool {
        matches!(
            self,
            Self::Unmatched {
                reason: UnmatchedReason::NoMappingSheet,
                ..
            }
        )
    }

    /// Renders the matrix cell: `field (status)`, with `pending` for
    /// unmatched fields and blank flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use nmo_core::{ExistsInTarget, FieldRef, MatchResult, UnmatchedReason};
    ///
    /// let matched = MatchResult::Matched {
    ///     old: FieldRef::new("Wells", "Lat"),
    ///     mapped_name: "Lat".to_owned(),
    ///     new: FieldRef::new("sites", "latitude"),
    ///     exists: ExistsInTarget::new("N/A"),
    ///     note: String::new(),
    /// };
    /// assert_eq!(matched.matrix_cell(), "Lat (N/A)");
    ///
    /// let unmatched = MatchResult::Unmatched {
    ///     old: FieldRef::new("Wells", "Well_ID"),
    ///     reason: UnmatchedReason::NoMatchingField,
    /// };
    /// assert_eq!(unmatched.matrix_cell(), "Well_ID (pending)");
    /// ```
    #[must_use]
    pub fn matrix_cell(&self) -> String {
        match self {
            Self::Matched { old, exists, .. } => {
                format!("{} ({})", old.field, exists.status_label())
            }
            Self::Unmatched { old, .. } => format!("{} (pending)", old.field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(field: &str) -> MatchResult {
        MatchResult::Matched {
            old: FieldRef::new("Wells", field),
            mapped_name: field.to_owned(),
            new: FieldRef::new("sites", "latitude"),
            exists: ExistsInTarget::new(""),
            note: String::new(),
        }
    }

    #[test]
    fn test_reason_round_trips_through_text() {
        for reason in [UnmatchedReason::NoMappingSheet, UnmatchedReason::NoMatchingField] {
            assert_eq!(UnmatchedReason::from_text(&reason.to_string()), reason);
        }
    }

    #[test]
    fn test_reason_accepts_older_wording() {
        assert_eq!(
            UnmatchedReason::from_text(
                "No corresponding sheet (expected 'NMAquifer_{old table name}')"
            ),
            UnmatchedReason::NoMappingSheet
        );
        assert_eq!(
            UnmatchedReason::from_text("No matching 'NMAquifer Field Name' (after normalization)"),
            UnmatchedReason::NoMatchingField
        );
        assert_eq!(
            UnmatchedReason::from_text(" renamed upstream "),
            UnmatchedReason::Other("renamed upstream".to_owned())
        );
    }

    #[test]
    fn test_accessors() {
        let m = matched("Lat");
        assert!(m.is_matched());
        assert_eq!(m.old().field, "Lat");
        assert_eq!(m.target().map(FieldRef::table_field).as_deref(), Some("sites.latitude"));
        assert!(!m.lacks_mapping_sheet());

        let u = MatchResult::Unmatched {
            old: FieldRef::new("Logs", "Depth"),
            reason: UnmatchedReason::NoMappingSheet,
        };
        assert!(!u.is_matched());
        assert!(u.target().is_none());
        assert!(u.lacks_mapping_sheet());
    }

    #[test]
    fn test_blank_flag_renders_pending() {
        assert_eq!(matched("Lat").matrix_cell(), "Lat (pending)");
    }
}
