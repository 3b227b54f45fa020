//! Transfer-log reader.
//!
//! A transfer log is a plain-text file of pipe-delimited blocks:
//!
//! ```text
//! model|input_count|cleaned_count|transferred|issue_percentage
//! WellModel|120|118|110|6.8%
//! PointID|Table|Field|Error
//! W-1|Wells|Lat|value error, must be a number
//! W-2|Wells||missing row | retry later
//!
//! SensorModel|40|40|39|2.5
//! PointID|Table|Field|Error
//! S-9|Sensors|Type|key error adding sensor_type: Foo error: 'Foo'
//! ```
//!
//! Data lines follow a `PointID|Table|Field|Error` header up to the next
//! blank line. The error text may itself contain pipes. Each summary values
//! line describes the block after it.

use camino::Utf8Path;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::error::TransferError;

/// Lower-case form of the issue header line.
pub const ISSUE_HEADER: &str = "pointid|table|field|error";

const SUMMARY_KEYS: [&str; 5] = [
    "model",
    "input_count",
    "cleaned_count",
    "transferred",
    "issue_percentage",
];

/// Returns `true` for an optionally negative integer or decimal such as
/// `-12` or `6.80`.
fn is_number(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

/// One data line of a transfer log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferIssue {
    /// Point identifier; may be blank.
    pub point_id: String,
    /// Legacy table.
    pub table: String,
    /// Legacy field; blank for table-level issues.
    pub field: String,
    /// Raw error text, including any pipes it contained.
    pub error: String,
}

impl TransferIssue {
    /// Splits a data line on its first three pipes.
    ///
    /// Short lines are padded with blank parts; every part is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use nmo_transfer::TransferIssue;
    ///
    /// let issue = TransferIssue::parse_line("W-1 | Wells | Lat | bad | value");
    /// assert_eq!(issue.error, "bad | value");
    /// assert_eq!(issue.label(), "Wells.Lat");
    /// assert_eq!(TransferIssue::parse_line("W-2|Wells").label(), "Wells");
    /// ```
    #[must_use]
    pub fn parse_line(line: &str) -> Self {
        let parts: SmallVec<[&str; 4]> = line.splitn(4, '|').map(str::trim).collect();
        let part = |i: usize| parts.get(i).copied().unwrap_or_default().to_owned();
        Self {
            point_id: part(0),
            table: part(1),
            field: part(2),
            error: part(3),
        }
    }

    /// Returns `Table.Field`, or just `Table` when the field is blank.
    #[must_use]
    pub fn label(&self) -> String {
        if self.field.is_empty() {
            self.table.clone()
        } else {
            format!("{}.{}", self.table, self.field)
        }
    }
}

/// Counts reported for one transfer block.
///
/// Values are kept as written so percentages keep their `%` sign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSummary {
    /// Model name.
    pub model: String,
    /// Table of the first issue in the block, blank when the block is empty.
    pub table: String,
    /// Rows read.
    pub input_count: String,
    /// Rows left after cleaning.
    pub cleaned_count: String,
    /// Rows transferred.
    pub transferred: String,
    /// Share of rows with issues.
    pub issue_percentage: String,
}

impl BlockSummary {
    /// Header written above the summary rows.
    pub const HEADER: [&'static str; 6] = [
        "model",
        "Table",
        "input_count",
        "cleaned_count",
        "transferred",
        "issue_percentage",
    ];

    /// Parses a summary values line. Returns `None` if the line is not one.
    ///
    /// The line needs five parts; parts two to four must be numbers and the
    /// fifth a number or a value ending in `%`.
    #[must_use]
    pub fn parse_values(line: &str) -> Option<Self> {
        let parts: SmallVec<[&str; 5]> = line.splitn(5, '|').map(str::trim).collect();
        let [model, input, cleaned, transferred, percentage] = parts.as_slice() else {
            return None;
        };
        let numeric = [input, cleaned, transferred]
            .iter()
            .all(|part| is_number(part));
        if !numeric || !(is_number(percentage) || percentage.ends_with('%')) {
            return None;
        }
        Some(Self {
            model: (*model).to_owned(),
            table: String::new(),
            input_count: (*input).to_owned(),
            cleaned_count: (*cleaned).to_owned(),
            transferred: (*transferred).to_owned(),
            issue_percentage: (*percentage).to_owned(),
        })
    }

    /// Returns the row written under [`HEADER`](Self::HEADER).
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.model.clone(),
            self.table.clone(),
            self.input_count.clone(),
            self.cleaned_count.clone(),
            self.transferred.clone(),
            self.issue_percentage.clone(),
        ]
    }
}

fn is_issue_header(line: &str) -> bool {
    line.eq_ignore_ascii_case(ISSUE_HEADER)
}

fn is_summary_header(line: &str) -> bool {
    let parts: SmallVec<[String; 5]> = line
        .split('|')
        .take(SUMMARY_KEYS.len())
        .map(|p| p.trim().to_lowercase())
        .collect();
    parts.iter().map(String::as_str).eq(SUMMARY_KEYS)
}

/// Everything read from one transfer log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferLog {
    /// Data lines, in file order.
    pub issues: Vec<TransferIssue>,
    /// Block summaries, in file order.
    pub summaries: Vec<BlockSummary>,
    has_issue_header: bool,
    has_content: bool,
}

impl TransferLog {
    /// Reads and parses a log file.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, and a leading byte
    /// order mark is ignored.
    pub fn read(path: &Utf8Path) -> Result<Self, TransferError> {
        if !path.is_file() {
            return Err(TransferError::MissingFile(path.to_owned()));
        }
        let bytes = std::fs::read(path).map_err(|e| TransferError::io(path, e))?;
        let log = Self::parse(&String::from_utf8_lossy(&bytes));
        info!(
            path = %path,
            issues = log.issues.len(),
            summaries = log.summaries.len(),
            "Read transfer log"
        );
        Ok(log)
    }

    /// Parses log text.
    ///
    /// # Examples
    ///
    /// ```
    /// use nmo_transfer::TransferLog;
    ///
    /// let log = TransferLog::parse("m|3|2|2|33%\nPointID|Table|Field|Error\nW-1|Wells|Lat|bad\n");
    /// assert_eq!(log.issues.len(), 1);
    /// assert_eq!(log.summaries[0].table, "Wells");
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut log = Self::default();
        let mut in_block = false;
        let mut pending_summary: Option<usize> = None;

        for line in text.lines().map(str::trim) {
            if line.is_empty() {
                in_block = false;
                continue;
            }
            log.has_content = true;
            if is_issue_header(line) {
                log.has_issue_header = true;
                in_block = true;
                continue;
            }
            if is_summary_header(line) {
                in_block = false;
                continue;
            }
            if let Some(summary) = BlockSummary::parse_values(line) {
                in_block = false;
                pending_summary = Some(log.summaries.len());
                log.summaries.push(summary);
                continue;
            }
            if !in_block {
                debug!(line, "Skipping line outside an issue block");
                continue;
            }

            let issue = TransferIssue::parse_line(line);
            if let Some(index) = pending_summary.take() {
                log.summaries[index].table.clone_from(&issue.table);
            }
            log.issues.push(issue);
        }
        log
    }

    /// Returns `true` if a `PointID|Table|Field|Error` line was seen.
    #[must_use]
    pub const fn has_issue_header(&self) -> bool {
        self.has_issue_header
    }

    /// Fails when the log has content but never declares its issue columns.
    ///
    /// An empty file is accepted and simply has no issues.
    pub fn require_issue_header(self, path: &Utf8Path) -> Result<Self, TransferError> {
        if self.has_content && !self.has_issue_header {
            return Err(TransferError::MissingHeader(path.to_owned()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    const LOG: &str = "\
model|input_count|cleaned_count|transferred|issue_percentage
WellModel|120|118|110|6.8%
PointID|Table|Field|Error
W-1|Wells|Lat|value error, must be a number
W-2|Wells||missing row | retry later
 |Wells|Lon|blank point

SensorModel|40|40|40|0
pointid|table|field|error

SensorModel2|40|40|39|2.5
PointID|Table|Field|Error
S-9|Sensors|Type|bad type
";

    #[test]
    fn test_parse_blocks() {
        let log = TransferLog::parse(LOG);
        assert!(log.has_issue_header());
        assert_eq!(log.issues.len(), 4);
        assert_eq!(log.issues[1].error, "missing row | retry later");
        assert_eq!(log.issues[1].label(), "Wells");
        assert_eq!(log.issues[2].point_id, "");

        let tables: Vec<&str> = log.summaries.iter().map(|s| s.table.as_str()).collect();
        assert_eq!(tables, vec!["Wells", "", "Sensors"]);
        assert_eq!(log.summaries[0].issue_percentage, "6.8%");
        assert_eq!(log.summaries[2].to_row()[0], "SensorModel2");
    }

    #[test]
    fn test_lines_outside_blocks_are_ignored() {
        let log = TransferLog::parse("W-1|Wells|Lat|bad\n\nPointID|Table|Field|Error\nW-2|Wells|Lat|bad\n");
        assert_eq!(log.issues.len(), 1);
        assert_eq!(log.issues[0].point_id, "W-2");
    }

    #[test]
    fn test_values_line_detection() {
        assert!(BlockSummary::parse_values("m|1|2|3|4.5").is_some());
        assert!(BlockSummary::parse_values("m|1|2|3|n/a%").is_some());
        assert!(BlockSummary::parse_values("m|1|2|3").is_none());
        assert!(BlockSummary::parse_values("W-1|Wells|Lat|bad|x").is_none());
        assert!(BlockSummary::parse_values("m|1|two|3|4").is_none());
    }

    #[test]
    fn test_is_number() {
        assert!(is_number("120"));
        assert!(is_number("-6.80"));
        assert!(!is_number(""));
        assert!(!is_number("6."));
        assert!(!is_number(".5"));
        assert!(!is_number("1e5"));
    }

    #[test]
    fn test_short_data_line_is_padded() {
        let issue = TransferIssue::parse_line("W-1");
        assert_eq!(issue, TransferIssue {
            point_id: "W-1".to_owned(),
            ..TransferIssue::default()
        });
        assert_eq!(issue.label(), "");
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let path = Utf8PathBuf::from("log.csv");
        let log = TransferLog::parse("W-1|Wells|Lat|bad\n");
        assert!(matches!(
            log.require_issue_header(&path),
            Err(TransferError::MissingHeader(_))
        ));
        assert!(TransferLog::parse("\n\n").require_issue_header(&path).is_ok());
    }

    #[test]
    fn test_read_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("log.csv")).unwrap();
        std::fs::write(&path, "\u{feff}PointID|Table|Field|Error\nW-1|Wells|Lat|bad\n").unwrap();
        let log = TransferLog::read(&path).unwrap();
        assert!(log.has_issue_header());
        assert_eq!(log.issues.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let err = TransferLog::read(Utf8Path::new("/no/such/log.csv")).unwrap_err();
        assert!(matches!(err, TransferError::MissingFile(_)));
    }
}
