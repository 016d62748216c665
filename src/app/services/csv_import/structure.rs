//! Structural validation of logger CSV files
//!
//! Locates the header row and the timestamp column, then checks every data row
//! for a consistent width and a recognizable timestamp. Problems are classified:
//! errors block the import, warnings are reported and never block.

use super::timestamp::is_valid_timestamp;
use crate::constants::{
    HEADER_KEYWORDS, HEADER_MIN_FILL_RATIO, HEADER_MIN_FILLED_CELLS, HEADER_SCAN_ROWS,
    MAX_REPORTED_WARNINGS, MIN_CSV_ROWS, TIMESTAMP_KEYWORDS, TIMESTAMP_SCAN_COLUMNS,
};
use crate::{Error, Result};
use serde::Serialize;
use tracing::debug;

// =============================================================================
// Result Types
// =============================================================================

/// Severity of a structural issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Error,
    Warning,
}

/// One structural problem found in a CSV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl CsvIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == IssueKind::Error
    }
}

/// Layout discovered in a structurally valid CSV file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvStructure {
    /// Zero-based index of the header row in the input rows
    pub header_row_index: usize,

    /// Header cells, verbatim
    pub headers: Vec<String>,

    /// Index of the timestamp column within the header
    pub timestamp_column: usize,

    /// Indices of non-blank, non-timestamp header cells
    pub data_columns: Vec<usize>,

    /// Data rows whose width matches the header
    pub data_row_count: usize,

    /// One-based row numbers skipped for a width mismatch
    pub skipped_rows: Vec<usize>,
}

impl CsvStructure {
    /// Header of the timestamp column
    pub fn timestamp_header(&self) -> &str {
        self.headers
            .get(self.timestamp_column)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Outcome of [`validate_csv_structure`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvValidationResult {
    /// False iff at least one issue is an error
    pub is_valid: bool,
    pub issues: Vec<CsvIssue>,
    pub data: Option<CsvStructure>,
}

impl CsvValidationResult {
    fn from_issues(issues: Vec<CsvIssue>, data: Option<CsvStructure>) -> Self {
        let is_valid = !issues.iter().any(CsvIssue::is_error);
        Self {
            is_valid,
            issues,
            data: if is_valid { data } else { None },
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &CsvIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CsvIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    /// Discovered layout, or a blocking [`Error::CsvStructure`] naming every error
    pub fn into_structure(self, source_name: &str) -> Result<CsvStructure> {
        if let (true, Some(structure)) = (self.is_valid, self.data) {
            return Ok(structure);
        }

        let messages: Vec<&str> = self
            .issues
            .iter()
            .filter(|issue| issue.is_error())
            .map(|issue| issue.message.as_str())
            .collect();
        Err(Error::csv_structure(source_name, messages.join("; ")))
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate the layout of tokenized CSV rows
pub fn validate_csv_structure(rows: &[Vec<String>]) -> CsvValidationResult {
    let mut issues = Vec::new();

    let rows: Vec<(usize, &Vec<String>)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    if rows.len() < MIN_CSV_ROWS {
        issues.push(CsvIssue::error(format!(
            "CSV file must contain at least {} non-empty rows (a header and one data row), found {}",
            MIN_CSV_ROWS,
            rows.len()
        )));
        return CsvValidationResult::from_issues(issues, None);
    }

    let header_position = match rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|(_, row)| looks_like_header(row))
    {
        Some(position) => position,
        None => {
            issues.push(CsvIssue::warning(format!(
                "No header row detected in the first {} rows; assuming row {} is the header",
                HEADER_SCAN_ROWS,
                rows[0].0 + 1
            )));
            0
        }
    };

    let (header_row_index, header_row) = rows[header_position];
    let headers = header_row.clone();
    debug!(
        "Header row {} with {} columns",
        header_row_index + 1,
        headers.len()
    );

    if headers.iter().all(|cell| cell.trim().is_empty()) {
        issues.push(CsvIssue::error("Header row contains no column names"));
        return CsvValidationResult::from_issues(issues, None);
    }

    let timestamp_column = match find_timestamp_column(&headers) {
        Some(index) => index,
        None => {
            issues.push(CsvIssue::warning(
                "No timestamp column found in header; using the first column",
            ));
            0
        }
    };

    let data_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(index, cell)| *index != timestamp_column && !cell.trim().is_empty())
        .map(|(index, _)| index)
        .collect();

    if data_columns.is_empty() {
        issues.push(CsvIssue::error(
            "No data columns found besides the timestamp column",
        ));
    }

    let data_rows = &rows[header_position + 1..];
    if data_rows.is_empty() {
        issues.push(CsvIssue::error("No data rows found after the header row"));
    }

    let mut width_warnings = WarningRollup::new("rows with an unexpected column count");
    let mut timestamp_warnings = WarningRollup::new("rows with an unrecognized timestamp");
    let mut skipped_rows = Vec::new();
    let mut data_row_count = 0;

    for (index, row) in data_rows {
        let row_number = index + 1;

        if row.len() != headers.len() {
            width_warnings.push(format!(
                "Row {} has {} columns, expected {}; row skipped",
                row_number,
                row.len(),
                headers.len()
            ));
            skipped_rows.push(row_number);
            continue;
        }

        data_row_count += 1;

        let timestamp = row[timestamp_column].as_str();
        if !is_valid_timestamp(timestamp) {
            timestamp_warnings.push(format!(
                "Row {} has an unrecognized timestamp '{}'",
                row_number,
                timestamp.trim()
            ));
        }
    }

    width_warnings.drain_into(&mut issues);
    timestamp_warnings.drain_into(&mut issues);

    let structure = CsvStructure {
        header_row_index,
        headers,
        timestamp_column,
        data_columns,
        data_row_count,
        skipped_rows,
    };

    CsvValidationResult::from_issues(issues, Some(structure))
}

/// Whether a row has the shape and vocabulary of a header row
fn looks_like_header(row: &[String]) -> bool {
    if row.len() <= 1 {
        return false;
    }

    let filled = row.iter().filter(|cell| !cell.trim().is_empty()).count();
    let threshold = (HEADER_MIN_FILLED_CELLS as f64).max(row.len() as f64 * HEADER_MIN_FILL_RATIO);
    if filled as f64 <= threshold {
        return false;
    }

    row.iter().any(|cell| {
        let lowered = cell.to_lowercase();
        HEADER_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword))
    })
}

/// First of the leading header cells that names a timestamp
pub fn find_timestamp_column(headers: &[String]) -> Option<usize> {
    headers
        .iter()
        .take(TIMESTAMP_SCAN_COLUMNS)
        .position(|cell| {
            let lowered = cell.to_lowercase();
            TIMESTAMP_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
}

/// Reports the first few warnings of one kind, then a single count for the rest
struct WarningRollup {
    label: &'static str,
    reported: Vec<String>,
    suppressed: usize,
}

impl WarningRollup {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            reported: Vec::new(),
            suppressed: 0,
        }
    }

    fn push(&mut self, message: String) {
        if self.reported.len() < MAX_REPORTED_WARNINGS {
            self.reported.push(message);
        } else {
            self.suppressed += 1;
        }
    }

    fn drain_into(self, issues: &mut Vec<CsvIssue>) {
        issues.extend(self.reported.into_iter().map(CsvIssue::warning));
        if self.suppressed > 0 {
            issues.push(CsvIssue::warning(format!(
                "...and {} more {}",
                self.suppressed, self.label
            )));
        }
    }
}
