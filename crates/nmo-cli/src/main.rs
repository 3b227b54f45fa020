//! CLI entry point for the NM Aquifer → Ocotillo crosswalk.
//!
//! Every subcommand is one batch job: read its inputs, compute in memory,
//! then write local report files and workbook tabs.
//!
//! # Usage
//!
//! ```bash
//! nmo [OPTIONS] <COMMAND>
//!
//! # Match the schema inventory against the mapping tabs
//! nmo --workbook ./workbook match
//!
//! # Rebuild the field pairs from the match reports
//! nmo pairs --flat
//!
//! # Append new transfer issues to the review log
//! nmo review --log transfer_metrics.csv
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{WrapErr, eyre};
use nmo_core::Config;
use nmo_matcher::report::{
    self, MatrixView, flat_pairs_grid, matched_grid, unmatched_grid, wide_pairs_grid,
};
use nmo_matcher::{MappingSet, MatchOutcome, SchemaInventory, TargetSchema, match_inventory};
use nmo_sheets::{CsvWorkbook, SheetSink, SheetSource, XlsxWorkbook, write_csv_grid};
use nmo_transfer::TransferLog;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Field crosswalk between the NM Aquifer and Ocotillo schemas.
///
/// Matches legacy columns against the curated mapping tabs and keeps the
/// review workbook in sync with transfer results.
#[derive(clap::Parser)]
#[command(name = "nmo", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, global = true, env = "NMO_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Workbook directory (one CSV file per tab).
    #[arg(short, long, global = true, env = "NMO_WORKBOOK")]
    workbook: Option<Utf8PathBuf>,

    /// Directory for local report files.
    #[arg(short, long, global = true, env = "NMO_OUTPUT_DIR")]
    output_dir: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Match the schema inventory against the mapping tabs.
    Match {
        /// Schema inventory CSV (`table_name`, `columns`).
        #[arg(long)]
        inventory: Option<Utf8PathBuf>,

        /// Read mapping tabs from an Excel export instead of the workbook.
        #[arg(long)]
        mapping_xlsx: Option<Utf8PathBuf>,
    },

    /// Build field pairs from the match reports.
    Pairs {
        /// One row per legacy field instead of two columns per table.
        #[arg(long)]
        flat: bool,
    },

    /// Write one column of point IDs per `Table.Field` with issues.
    Issues {
        /// Transfer log to read.
        #[arg(long)]
        log: Option<Utf8PathBuf>,
    },

    /// Write per-pair issue counts into the reviewed pairs tab.
    IssueCounts {
        /// Transfer log to read.
        #[arg(long)]
        log: Option<Utf8PathBuf>,
    },

    /// Write transfer block summaries beside the reviewed pairs.
    Summaries {
        /// Transfer log to read.
        #[arg(long)]
        log: Option<Utf8PathBuf>,
    },

    /// Append new transfer issues to the review log.
    Review {
        /// Transfer log to read.
        #[arg(long)]
        log: Option<Utf8PathBuf>,
    },

    /// Copy reviewer columns from the working copy into the review log.
    ReviewSync,

    /// Flag which reviewed pairs exist in the target schema export.
    CheckTarget {
        /// Target schema export CSV with a `table_field` column.
        #[arg(long)]
        export: Option<Utf8PathBuf>,
    },

    /// Concatenate CSV exports that share a header.
    Combine {
        /// Directory holding the exports.
        #[arg(long, default_value = ".")]
        dir: Utf8PathBuf,

        /// File name prefix of the exports.
        #[arg(long, default_value = "InvalidWellData")]
        prefix: String,

        /// Combined file (defaults to `<dir>/<prefix>_combined.csv`).
        #[arg(long)]
        output: Option<Utf8PathBuf>,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},calamine=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the config file and the global flags.
///
/// Flags override file values.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(workbook) = &cli.workbook {
        config.sheets.workbook.clone_from(workbook);
    }
    if let Some(dir) = &cli.output_dir {
        config.outputs.dir.clone_from(dir);
    }
    config.validate()?;
    Ok(config)
}

fn open_workbook(config: &Config) -> color_eyre::Result<CsvWorkbook> {
    CsvWorkbook::open(&config.sheets.workbook)
        .wrap_err("Create the workbook directory or pass --workbook")
}

fn read_issue_log(config: &Config, log: Option<&Utf8Path>) -> color_eyre::Result<TransferLog> {
    let path = log.unwrap_or(&config.inputs.transfer_log);
    let log = TransferLog::read(path)?;
    Ok(log.require_issue_header(path)?)
}

fn write_tab(book: &mut CsvWorkbook, title: &str, grid: &[Vec<String>]) -> color_eyre::Result<()> {
    book.ensure_tab(title)?;
    book.write_tab(title, grid)?;
    info!(tab = title, rows = grid.len(), "Wrote tab");
    Ok(())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Matches the inventory and writes every match report.
fn run_match(
    config: &Config,
    inventory: Option<&Utf8Path>,
    mapping_xlsx: Option<&Utf8Path>,
) -> color_eyre::Result<()> {
    let inventory_path = inventory.unwrap_or(&config.inputs.inventory);
    info!(inventory = %inventory_path, "Starting match");

    let inventory = SchemaInventory::from_path(inventory_path)?;
    info!(
        tables = inventory.tables().len(),
        columns = inventory.column_count(),
        "Loaded inventory"
    );
    let mut book = CsvWorkbook::create(&config.sheets.workbook)?;
    let mapping_xlsx = mapping_xlsx.or(config.inputs.mapping_xlsx.as_deref());
    let mappings = match mapping_xlsx {
        Some(path) => MappingSet::load(&XlsxWorkbook::open(path)?, &config.sheets.mapping_prefix)?,
        None => MappingSet::load(&book, &config.sheets.mapping_prefix)?,
    };
    if mappings.is_empty() {
        warn!(
            prefix = %config.sheets.mapping_prefix,
            "No mapping tabs found; every column will be unmatched"
        );
    }

    let outcome = match_inventory(&inventory, &mappings);
    let matrix = MatrixView::build(&outcome.results);
    let matched = matched_grid(&outcome.results);
    let unmatched = unmatched_grid(&outcome.results);

    let outputs = &config.outputs;
    std::fs::create_dir_all(&outputs.dir)
        .wrap_err_with(|| format!("Failed to create {}", outputs.dir))?;
    write_csv_grid(&outputs.matched_csv_path(), &matched)?;
    write_csv_grid(&outputs.unmatched_csv_path(), &unmatched)?;
    write_csv_grid(&outputs.matrix_csv_path(), &matrix.grid())?;
    report::write_stats_json(&outputs.stats_json_path(), &outcome.stats)?;
    report::write_json(
        &outputs.matched_json_path(),
        &report::matched_fields_by_table(&outcome.results),
    )?;

    write_tab(&mut book, &config.sheets.matched, &matched)?;
    write_tab(&mut book, &config.sheets.unmatched, &unmatched)?;
    write_tab(&mut book, &config.sheets.matrix, &matrix.sheet_grid())?;

    print_match_summary(&outcome, &matrix);
    Ok(())
}

/// Rebuilds field pairs from the local match reports.
fn run_pairs(config: &Config, flat: bool) -> color_eyre::Result<()> {
    let outputs = &config.outputs;
    let results = report::read_results(&outputs.matched_csv_path(), &outputs.unmatched_csv_path())?;
    let mut book = CsvWorkbook::create(&config.sheets.workbook)?;

    let grid = if flat {
        let grid = flat_pairs_grid(&results);
        write_csv_grid(&outputs.flat_pairs_csv_path(), &grid)?;
        grid
    } else {
        wide_pairs_grid(&results)
    };
    write_tab(&mut book, &config.sheets.field_pairs, &grid)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let layout = if flat { "flat" } else { "per-table" };
    writeln!(
        handle,
        "Wrote {} {layout} pair rows to '{}'",
        grid.len().saturating_sub(if flat { 1 } else { 2 }),
        config.sheets.field_pairs
    )?;
    Ok(())
}

fn run_issues(config: &Config, log: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let log = read_issue_log(config, log)?;
    let mut book = CsvWorkbook::create(&config.sheets.workbook)?;
    let columns = nmo_transfer::write_issue_columns(&mut book, &config.sheets.issues, &log.issues)?;
    writeln!(
        std::io::stdout().lock(),
        "Wrote {columns} issue columns to '{}'",
        config.sheets.issues
    )?;
    Ok(())
}

fn run_issue_counts(config: &Config, log: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let log = read_issue_log(config, log)?;
    let mut book = open_workbook(config)?;
    let counts = nmo_transfer::issue_counts(&log.issues);
    let rows = nmo_transfer::write_issue_counts(&mut book, &config.sheets.field_pairs_checked, &counts)?;
    writeln!(
        std::io::stdout().lock(),
        "Wrote issue counts for {rows} rows to '{}'",
        config.sheets.field_pairs_checked
    )?;
    Ok(())
}

fn run_summaries(config: &Config, log: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let path = log.unwrap_or(&config.inputs.transfer_log);
    let log = TransferLog::read(path)?;
    let mut book = open_workbook(config)?;
    nmo_transfer::write_block_summaries(&mut book, &config.sheets.field_pairs_checked, &log.summaries)?;
    writeln!(
        std::io::stdout().lock(),
        "Wrote {} block summaries to '{}'",
        log.summaries.len(),
        config.sheets.field_pairs_checked
    )?;
    Ok(())
}

fn run_review(config: &Config, log: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let log = read_issue_log(config, log)?;
    let mut book = CsvWorkbook::create(&config.sheets.workbook)?;
    let appended = nmo_transfer::append_review_rows(&mut book, &config.sheets.review, &log.issues)?;
    writeln!(
        std::io::stdout().lock(),
        "Appended {appended} new rows to '{}'",
        config.sheets.review
    )?;
    Ok(())
}

fn run_review_sync(config: &Config) -> color_eyre::Result<()> {
    let mut book = open_workbook(config)?;
    for tab in [&config.sheets.review_source, &config.sheets.review] {
        if !book.has_tab(tab)? {
            return Err(eyre!("Tab '{tab}' not found in {}", book.root()));
        }
    }
    let report = nmo_transfer::copy_review_columns(
        &mut book,
        &config.sheets.review_source,
        &config.sheets.review,
    )?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Matched rows: {}", report.matched)?;
    writeln!(handle, "Updated rows: {}", report.updated)?;
    Ok(())
}

fn run_check_target(config: &Config, export: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let export = export.unwrap_or(&config.inputs.target_schema);
    let schema = TargetSchema::from_path(export)?;
    let mut book = open_workbook(config)?;
    let summary =
        nmo_matcher::check_field_pairs(&mut book, &config.sheets.field_pairs_checked, &schema)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Target fields exported: {}", schema.len())?;
    writeln!(handle, "  yes:   {}", summary.yes)?;
    writeln!(handle, "  no:    {}", summary.no)?;
    writeln!(handle, "  blank: {}", summary.blank)?;
    writeln!(handle, "  N/A:   {}", summary.not_applicable)?;
    Ok(())
}

fn run_combine(dir: &Utf8Path, prefix: &str, output: Option<&Utf8Path>) -> color_eyre::Result<()> {
    let output = output.map_or_else(|| dir.join(format!("{prefix}_combined.csv")), Utf8Path::to_owned);
    let summary = nmo_transfer::combine_csv_files(dir, prefix, &output)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for input in &summary.inputs {
        writeln!(handle, "  - {input}")?;
    }
    writeln!(handle, "Wrote {} data rows to {output}", summary.rows)?;
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints a summary of a match run.
fn print_match_summary(outcome: &MatchOutcome, matrix: &MatrixView) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let counts = &matrix.counts;

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Crosswalk Summary");
    let _ = writeln!(handle, "=================");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Tables:    {}", outcome.stats.len());
    let _ = writeln!(handle, "Matched:   {}", outcome.matched_count());
    let _ = writeln!(handle, "Unmatched: {}", outcome.unmatched_count());
    let _ = writeln!(handle);
    let _ = writeln!(handle, "  Migrated:         {}", counts.share(counts.yes));
    let _ = writeln!(handle, "  Will be migrated: {}", counts.share(counts.no));
    let _ = writeln!(handle, "  Won't migrate:    {}", counts.share(counts.not_applicable));
    let _ = writeln!(handle, "  Pending:          {}", counts.share(counts.other));

    let missing: Vec<&str> = matrix.tables_without_sheet().collect();
    if !missing.is_empty() {
        let _ = writeln!(handle);
        let _ = writeln!(handle, "Tables without a mapping tab ({}):", missing.len());
        for table in missing {
            let _ = writeln!(handle, "  {table}");
        }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = <Cli as clap::Parser>::parse();

    init_tracing(cli.verbose, cli.no_color);

    match &cli.command {
        Commands::Match {
            inventory,
            mapping_xlsx,
        } => run_match(
            &build_config(&cli)?,
            inventory.as_deref(),
            mapping_xlsx.as_deref(),
        ),
        Commands::Pairs { flat } => run_pairs(&build_config(&cli)?, *flat),
        Commands::Issues { log } => run_issues(&build_config(&cli)?, log.as_deref()),
        Commands::IssueCounts { log } => run_issue_counts(&build_config(&cli)?, log.as_deref()),
        Commands::Summaries { log } => run_summaries(&build_config(&cli)?, log.as_deref()),
        Commands::Review { log } => run_review(&build_config(&cli)?, log.as_deref()),
        Commands::ReviewSync => run_review_sync(&build_config(&cli)?),
        Commands::CheckTarget { export } => {
            run_check_target(&build_config(&cli)?, export.as_deref())
        }
        Commands::Combine {
            dir,
            prefix,
            output,
        } => run_combine(dir, prefix, output.as_deref()),
    }
}
