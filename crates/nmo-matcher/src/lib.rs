//! Field matching and report building for the NM Aquifer → Ocotillo crosswalk.
//!
//! The pipeline reads a [`SchemaInventory`] of legacy columns and a
//! [`MappingSet`] of curated mapping sheets, joins them by normalized field
//! name with a [`Matcher`], and reshapes the results through [`report`].
//! [`existence`] checks reviewed pairs against an export of the target schema.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod existence;
pub mod inventory;
pub mod mapping;
pub mod matcher;
pub mod report;

pub use error::MatchError;
pub use existence::{ExistenceSummary, TargetSchema, check_field_pairs};
pub use inventory::{InventoryTable, SchemaInventory, split_columns_cell};
pub use mapping::{MappingSet, MappingSheet, strip_prefix_ignore_case};
pub use matcher::{MatchOutcome, Matcher, match_inventory};
