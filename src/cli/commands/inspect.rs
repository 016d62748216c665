//! Inspect command implementation
//!
//! Shows what an import would infer from a CSV file without touching any
//! document: structural issues, the detected header row and one line of
//! inferred metadata per data column.

use super::shared::{CommandStats, load_configuration, log_completion, setup_logging};
use crate::app::models::ColumnInfo;
use crate::app::services::csv_import::{
    CsvIssue, CsvValidationResult, parse_column_header, read_csv_file, validate_csv_structure,
};
use crate::cli::args::{InspectArgs, OutputFormat};
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// Machine-readable inspection result
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub file: String,
    pub is_valid: bool,
    pub issues: Vec<CsvIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_column: Option<String>,
    pub data_row_count: usize,
    pub columns: Vec<ColumnInfo>,
}

impl InspectionReport {
    /// Build a report from the structural validation of a file
    pub fn from_validation(file: impl Into<String>, validation: CsvValidationResult) -> Self {
        let mut report = Self {
            file: file.into(),
            is_valid: validation.is_valid,
            issues: validation.issues,
            header_row: None,
            timestamp_column: None,
            data_row_count: 0,
            columns: Vec::new(),
        };

        if let Some(structure) = validation.data {
            report.header_row = Some(structure.header_row_index + 1);
            report.timestamp_column = Some(structure.timestamp_header().to_string());
            report.data_row_count = structure.data_row_count;
            report.columns = structure
                .data_columns
                .iter()
                .filter_map(|&index| structure.headers.get(index))
                .map(|header| parse_column_header(header))
                .collect();
        }

        report
    }
}

/// Inspect command runner
pub async fn run_inspect(args: InspectArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    let mut config = load_configuration(args.common.config_file.as_deref())?;
    if let Some(delimiter) = &args.delimiter {
        config = config.with_delimiter(delimiter.as_str());
    }
    setup_logging(&args.common, &config)?;
    debug!("Inspect arguments: {:?}", args);

    let rows = read_csv_file(&args.csv_file, config.delimiter_byte()?).await?;
    let report = InspectionReport::from_validation(
        args.csv_file.display().to_string(),
        validate_csv_structure(&rows),
    );

    match args.output_format {
        OutputFormat::Human => print_human(&report),
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&report)
                .map_err(|e| Error::document("Failed to serialize inspection report", Some(e)))?;
            println!("{}", text);
        }
    }

    let stats = CommandStats {
        points_affected: report.columns.len(),
        errors_found: report.issues.iter().filter(|issue| issue.is_error()).count(),
        warnings_found: report.issues.iter().filter(|issue| !issue.is_error()).count(),
        processing_time: start_time.elapsed(),
        ..Default::default()
    };
    log_completion("inspect", &stats);

    if !report.is_valid {
        return Err(Error::csv_structure(
            report.file.as_str(),
            "structural errors found (see report above)",
        ));
    }
    Ok(stats)
}

fn print_human(report: &InspectionReport) {
    println!("{}", report.file.bold());

    for issue in &report.issues {
        if issue.is_error() {
            println!("   {} {}", "error".red(), issue.message);
        } else {
            println!("   {} {}", "warning".yellow(), issue.message);
        }
    }

    if let (Some(header_row), Some(timestamp)) = (report.header_row, &report.timestamp_column) {
        println!(
            "   Header row {}, timestamp column '{}', {} data row(s)",
            header_row, timestamp, report.data_row_count
        );
    }

    if report.columns.is_empty() {
        return;
    }

    println!();
    println!(
        "   {:<28} {:<24} {:>9} {:<10} {:<8}",
        "COLUMN", "TYPE", "HEIGHT", "UNIT", "STAT"
    );
    for column in &report.columns {
        let height = column
            .height
            .map(|h| format!("{}m", h))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:<28} {:<24} {:>9} {:<10} {:<8}",
            column.name,
            column.measurement_type.as_str(),
            height,
            column.unit.as_deref().unwrap_or("-"),
            column.statistic_type.as_str()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{MeasurementType, StatisticType};

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_report_lists_data_columns() {
        let validation = validate_csv_structure(&rows(&[
            &["Timestamp", "WS_80m_Avg", "WD_78m"],
            &["2024-01-01 00:00", "7.1", "245"],
        ]));

        let report = InspectionReport::from_validation("mast.csv", validation);

        assert!(report.is_valid);
        assert_eq!(report.header_row, Some(1));
        assert_eq!(report.timestamp_column.as_deref(), Some("Timestamp"));
        assert_eq!(report.columns.len(), 2);
        assert_eq!(report.columns[0].measurement_type, MeasurementType::WindSpeed);
        assert_eq!(report.columns[0].statistic_type, StatisticType::Avg);
        assert_eq!(report.columns[1].height, Some(78.0));
    }

    #[test]
    fn test_report_for_invalid_file_has_no_columns() {
        let validation = validate_csv_structure(&rows(&[&["Timestamp", "WS_80m"]]));

        let report = InspectionReport::from_validation("short.csv", validation);

        assert!(!report.is_valid);
        assert!(report.columns.is_empty());
        assert!(report.header_row.is_none());
    }
}
