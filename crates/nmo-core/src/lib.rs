//! Core types, errors, and utilities for the NM Aquifer → Ocotillo crosswalk.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - The key normalizer used on both sides of every name comparison
//! - Domain types ([`FieldRef`], [`MappingRecord`], [`MatchResult`], [`TableStats`])
//! - Configuration structures ([`Config`]) and their errors
//! - Rectangular grid helpers for tab-shaped output
//! - Type aliases for `FxHashMap`/`FxHashSet`

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod grid;
pub mod hash;
pub mod normalize;
pub mod types;

pub use config::{Config, InputConfig, OutputConfig, SheetConfig};
pub use error::ConfigError;
pub use grid::{Grid, columns_to_grid};
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use normalize::{NormalizedKey, clean_cell, normalize_key};
pub use types::{
    ExistenceKind, ExistsInTarget, FieldRef, MappingRecord, MatchResult, StatusCounts,
    TableStats, UnmatchedReason,
};
