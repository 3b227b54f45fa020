//! Transfer-log ingestion and review sync for the NM Aquifer → Ocotillo crosswalk.
//!
//! - [`log`] reads pipe-delimited transfer logs into issues and block summaries
//! - [`cleaner`] normalizes error text before it reaches reviewers
//! - [`issues`] writes the issue columns, per-pair issue counts and block summaries
//! - [`review`] appends to the review log and copies reviewer columns
//! - [`combine`] concatenates CSV exports that share a header

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod cleaner;
pub mod combine;
pub mod error;
pub mod issues;
pub mod log;
pub mod review;

pub use cleaner::clean_error;
pub use combine::{CombineSummary, combine_csv_files, matching_files};
pub use error::TransferError;
pub use issues::{
    issue_columns_grid, issue_counts, summaries_grid, write_block_summaries, write_issue_columns,
    write_issue_counts,
};
pub use log::{BlockSummary, TransferIssue, TransferLog};
pub use review::{ReviewRow, ReviewSyncReport, append_review_rows, copy_review_columns};
