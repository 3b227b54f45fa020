//! Domain types for the crosswalk.
//!
//! # Module Organization
//!
//! - [`field`] - Table/field references
//! - [`mapping`] - Mapping sheet rows and the existence flag
//! - [`outcome`] - Per-field match results
//! - [`stats`] - Per-table statistics and legend tallies
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use nmo_core::{FieldRef, MatchResult, TableStats};
//! use nmo_core::types::MappingRecord;
//! ```

mod field;
mod mapping;
mod outcome;
mod stats;

pub use field::FieldRef;
pub use mapping::{ExistenceKind, ExistsInTarget, MappingRecord};
pub use outcome::{MatchResult, UnmatchedReason};
pub use stats::{StatusCounts, TableStats};
