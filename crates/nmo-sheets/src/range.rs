//! A1-style column spans.

use std::fmt;

/// A contiguous span of whole columns, such as `A:Z` or `G:L`.
///
/// Column indices are zero-based (`A` is `0`). Rows are not part of the span;
/// writes into a span are always anchored at row 1.
///
/// # Examples
///
/// ```
/// use nmo_sheets::SheetRange;
///
/// let range = SheetRange::columns(6, 11);
/// assert_eq!(range.first(), 6);
/// assert_eq!(range.width(), 6);
/// assert_eq!(range.to_string(), "G:L");
///
/// assert_eq!(SheetRange::columns(16, 14).to_string(), "O:Q");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetRange {
    first: usize,
    last: usize,
}

impl SheetRange {
    /// Creates a span from two zero-based column indices, in either order.
    #[must_use]
    pub const fn columns(a: usize, b: usize) -> Self {
        if a <= b {
            Self { first: a, last: b }
        } else {
            Self { first: b, last: a }
        }
    }

    /// Creates a single-column span.
    #[must_use]
    pub const fn column(index: usize) -> Self {
        Self {
            first: index,
            last: index,
        }
    }

    /// First column of the span.
    #[inline]
    #[must_use]
    pub const fn first(&self) -> usize {
        self.first
    }

    /// Number of columns in the span.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.last - self.first + 1
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            column_letters(self.first),
            column_letters(self.last)
        )
    }
}

/// Converts a zero-based column index to its letters.
fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
