//! Directory-backed workbook, one CSV file per tab.
//!
//! A tab titled `Copy of AMP_review` lives in `Copy of AMP_review.csv` inside
//! the workbook directory. Files are read without header handling and with
//! ragged rows allowed, so a tab round-trips exactly as written.

use camino::{Utf8Path, Utf8PathBuf};
use nmo_core::Grid;
use tracing::{debug, info};

use crate::error::SheetError;
use crate::workbook::{SheetSink, SheetSource};

const TAB_EXTENSION: &str = "csv";

/// A workbook stored as a directory of CSV files.
///
/// # Examples
///
/// ```
/// use nmo_sheets::{CsvWorkbook, SheetSink, SheetSource};
///
/// let dir = tempfile::tempdir().unwrap();
/// let root = camino::Utf8Path::from_path(dir.path()).unwrap();
///
/// let mut book = CsvWorkbook::open(root).unwrap();
/// book.write_tab("Matrix", &[vec!["Wells".to_owned()]]).unwrap();
/// assert_eq!(book.read_tab("Matrix").unwrap()[0][0], "Wells");
/// ```
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    root: Utf8PathBuf,
}

impl CsvWorkbook {
    /// Opens an existing workbook directory.
    pub fn open(root: impl Into<Utf8PathBuf>) -> Result<Self, SheetError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SheetError::MissingWorkbook(root));
        }
        Ok(Self { root })
    }

    /// Opens a workbook directory, creating it first if needed.
    pub fn create(root: impl Into<Utf8PathBuf>) -> Result<Self, SheetError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| SheetError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Returns the workbook directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the file backing a tab.
    pub fn tab_path(&self, title: &str) -> Result<Utf8PathBuf, SheetError> {
        validate_title(title)?;
        Ok(self.root.join(format!("{title}.{TAB_EXTENSION}")))
    }
}

fn validate_title(title: &str) -> Result<(), SheetError> {
    let reason = if title.trim().is_empty() {
        Some("is blank")
    } else if title.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if title.starts_with('.') {
        Some("starts with a dot")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SheetError::InvalidTitle {
            title: title.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Reads a CSV file into a grid, keeping every row including the first.
pub fn read_csv_grid(path: &Utf8Path) -> Result<Grid, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SheetError::csv(path, e))?;

    let mut grid = Grid::new();
    for record in reader.records() {
        let record = record.map_err(|e| SheetError::csv(path, e))?;
        grid.push(record.iter().map(str::to_owned).collect());
    }
    if let Some(first) = grid.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_owned();
        }
    }
    Ok(grid)
}

/// Writes a grid to a CSV file, replacing it.
pub fn write_csv_grid(path: &Utf8Path, grid: &[Vec<String>]) -> Result<(), SheetError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| SheetError::csv(path, e))?;
    for row in grid {
        writer
            .write_record(row)
            .map_err(|e| SheetError::csv(path, e))?;
    }
    writer.flush().map_err(|e| SheetError::io(path, e))
}

impl SheetSource for CsvWorkbook {
    fn tab_titles(&self) -> Result<Vec<String>, SheetError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| SheetError::io(&self.root, e))?;
        let mut titles = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SheetError::io(&self.root, e))?;
            let path = Utf8PathBuf::from_path_buf(entry.path()).map_err(SheetError::NonUtf8Path)?;
            if path.is_file() && path.extension() == Some(TAB_EXTENSION) {
                if let Some(stem) = path.file_stem() {
                    titles.push(stem.to_owned());
                }
            }
        }
        titles.sort();
        Ok(titles)
    }

    fn read_tab(&self, title: &str) -> Result<Grid, SheetError> {
        let path = self.tab_path(title)?;
        if !path.is_file() {
            return Err(SheetError::tab_not_found(title));
        }
        let grid = read_csv_grid(&path)?;
        debug!(tab = title, rows = grid.len(), "Read tab");
        Ok(grid)
    }
}

impl SheetSink for CsvWorkbook {
    fn ensure_tab(&mut self, title: &str) -> Result<bool, SheetError> {
        let path = self.tab_path(title)?;
        if path.is_file() {
            return Ok(false);
        }
        std::fs::write(&path, "").map_err(|e| SheetError::io(&path, e))?;
        info!(tab = title, "Created tab");
        Ok(true)
    }

    fn write_tab(&mut self, title: &str, grid: &[Vec<String>]) -> Result<(), SheetError> {
        let path = self.tab_path(title)?;
        write_csv_grid(&path, grid)?;
        debug!(tab = title, rows = grid.len(), "Wrote tab");
        Ok(())
    }
}
