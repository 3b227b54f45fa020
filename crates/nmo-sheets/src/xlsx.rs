//! Read-only Excel workbook source.
//!
//! Mapping sheets are sometimes only available as an exported `.xlsx` file.
//! [`XlsxWorkbook`] loads every worksheet once at open time and then serves
//! them through [`SheetSource`] like any other workbook.

use calamine::{Data, Reader, Xlsx, open_workbook};
use camino::Utf8Path;
use nmo_core::Grid;
use tracing::debug;

use crate::error::SheetError;
use crate::workbook::SheetSource;

/// An Excel workbook, fully loaded into memory.
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    tabs: Vec<(String, Grid)>,
}

impl XlsxWorkbook {
    /// Opens and loads every worksheet of an `.xlsx` file.
    ///
    /// Leading blank rows are dropped, so the first row with any text is the
    /// header, as with CSV tabs. Columns keep their position: a sheet whose
    /// used range starts at column `B` gets one blank leading cell per row.
    pub fn open(path: &Utf8Path) -> Result<Self, SheetError> {
        if !path.is_file() {
            return Err(SheetError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            ));
        }
        let xlsx_err = |source| SheetError::Xlsx {
            path: path.to_owned(),
            source,
        };
        let mut workbook: Xlsx<_> = open_workbook(path).map_err(xlsx_err)?;

        let mut tabs = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(xlsx_err)?;
            let mut grid = Grid::new();
            if let Some((_, left)) = range.start() {
                for row in range.rows() {
                    let text: Vec<String> = row.iter().map(cell_text).collect();
                    if grid.is_empty() && text.iter().all(|cell| cell.trim().is_empty()) {
                        continue;
                    }
                    let mut cells = vec![String::new(); left as usize];
                    cells.extend(text);
                    grid.push(cells);
                }
            }
            debug!(sheet = %name, rows = grid.len(), "Loaded worksheet");
            tabs.push((name, grid));
        }
        debug!(path = %path, sheets = tabs.len(), "Opened Excel workbook");
        Ok(Self { tabs })
    }
}

/// Renders a cell the way it reads in a spreadsheet.
///
/// Whole floats lose their `.0`; errors and empty cells become blank.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{f:.0}")
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::Empty | Data::Error(_) => String::new(),
        other @ Data::DateTime(_) => other.to_string(),
    }
}

impl SheetSource for XlsxWorkbook {
    fn tab_titles(&self) -> Result<Vec<String>, SheetError> {
        Ok(self.tabs.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_tab(&self, title: &str) -> Result<Grid, SheetError> {
        self.tabs
            .iter()
            .find(|(name, _)| name == title)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| SheetError::tab_not_found(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::String("Lat".to_owned())), "Lat");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_leading_blank_rows_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("mapping.xlsx")).unwrap();

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("NMAquifer_Wells").unwrap();
        sheet.write_string(1, 0, "NMAquifer Field Name").unwrap();
        sheet.write_string(1, 1, "Ocotillo Field Name").unwrap();
        sheet.write_string(2, 0, "Depth").unwrap();
        sheet.write_number(2, 1, 12.0).unwrap();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "   ").unwrap();
        notes.write_string(2, 1, "kept").unwrap();
        workbook.save(path.as_std_path()).unwrap();

        let book = XlsxWorkbook::open(&path).unwrap();
        assert_eq!(book.tab_titles().unwrap(), vec!["NMAquifer_Wells", "Notes"]);
        assert_eq!(
            book.read_tab("NMAquifer_Wells").unwrap(),
            vec![
                vec!["NMAquifer Field Name".to_owned(), "Ocotillo Field Name".to_owned()],
                vec!["Depth".to_owned(), "12".to_owned()],
            ]
        );
        assert_eq!(
            book.read_tab("Notes").unwrap(),
            vec![vec![String::new(), "kept".to_owned()]]
        );
    }

    #[test]
    fn test_open_missing_file() {
        let err = XlsxWorkbook::open(Utf8Path::new("/no/such/mapping.xlsx")).unwrap_err();
        assert!(matches!(err, SheetError::Io { .. }));
    }

    #[test]
    fn test_open_rejects_non_excel() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("mapping.xlsx")).unwrap();
        std::fs::write(&path, "not a zip archive").unwrap();
        assert!(matches!(
            XlsxWorkbook::open(&path),
            Err(SheetError::Xlsx { .. })
        ));
    }
}
