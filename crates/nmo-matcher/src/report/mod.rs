//! Report shapes built from a match result set.
//!
//! - [`rows`] - matched/unmatched report rows, their CSV round trip, JSON reports
//! - [`pairs`] - flat and per-table field pair layouts
//! - [`matrix`] - the one-column-per-table matrix view with its legend
//!
//! Every builder is a pure function of its input slice; the same results
//! always render the same grid.

pub mod matrix;
pub mod pairs;
pub mod rows;

pub use matrix::{MatrixColumn, MatrixView};
pub use pairs::{FLAT_HEADER, FlatPair, WIDE_SUBHEADER, flat_pairs, flat_pairs_grid, wide_pairs_grid};
pub use rows::{
    MATCHED_HEADER, UNMATCHED_HEADER, matched_fields_by_table, matched_grid, read_results,
    results_from_grids, unmatched_grid, write_json, write_stats_json,
};
