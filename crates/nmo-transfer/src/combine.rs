//! Concatenation of same-shaped CSV exports.

use camino::{Utf8Path, Utf8PathBuf};
use csv::StringRecord;
use tracing::{debug, info};

use crate::error::TransferError;

/// What [`combine_csv_files`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineSummary {
    /// Input files, in the order they were read.
    pub inputs: Vec<Utf8PathBuf>,
    /// Data rows written, excluding the header.
    pub rows: usize,
}

/// Lists the `<prefix>*.csv` files of `dir`, sorted by name.
///
/// `exclude` is left out so the combined file never reads itself.
pub fn matching_files(
    dir: &Utf8Path,
    prefix: &str,
    exclude: Option<&Utf8Path>,
) -> Result<Vec<Utf8PathBuf>, TransferError> {
    let entries = dir.read_dir_utf8().map_err(|e| TransferError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TransferError::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name();
        if path.is_file()
            && name.starts_with(prefix)
            && path.extension() == Some("csv")
            && exclude.is_none_or(|skip| skip.file_name() != Some(name))
        {
            files.push(path.to_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// Writes every `<prefix>*.csv` file of `dir` into `output`.
///
/// The first file's header is written once; the header row of every file is
/// skipped. Rows of differing width are copied as they are.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use nmo_transfer::combine_csv_files;
///
/// let summary = combine_csv_files(
///     Utf8Path::new("exports"),
///     "InvalidWellData",
///     Utf8Path::new("exports/InvalidWellData_combined.csv"),
/// )?;
/// println!("{} rows from {} files", summary.rows, summary.inputs.len());
/// # Ok::<(), nmo_transfer::TransferError>(())
/// ```
pub fn combine_csv_files(
    dir: &Utf8Path,
    prefix: &str,
    output: &Utf8Path,
) -> Result<CombineSummary, TransferError> {
    let inputs = matching_files(dir, prefix, Some(output))?;
    if inputs.is_empty() {
        return Err(TransferError::NoInputs {
            dir: dir.to_owned(),
            prefix: prefix.to_owned(),
        });
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .map_err(|e| TransferError::csv(output, e))?;

    let mut rows = 0;
    let mut wrote_header = false;
    for input in &inputs {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(input)
            .map_err(|e| TransferError::csv(input, e))?;
        let mut record = StringRecord::new();
        let mut first = true;
        while reader
            .read_record(&mut record)
            .map_err(|e| TransferError::csv(input, e))?
        {
            if first {
                first = false;
                if wrote_header {
                    continue;
                }
                wrote_header = true;
            } else {
                rows += 1;
            }
            writer
                .write_record(&record)
                .map_err(|e| TransferError::csv(output, e))?;
        }
        debug!(path = %input, "Combined file");
    }
    writer.flush().map_err(|e| TransferError::io(output, e))?;

    info!(files = inputs.len(), rows, output = %output, "Combined CSV files");
    Ok(CombineSummary { inputs, rows })
}
