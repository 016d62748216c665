//! Validate command implementation
//!
//! Runs the required-fields check and JSON-Schema compliance against one or
//! more documents and prints a report per document. Nothing is written.

use super::shared::{CommandStats, load_configuration, log_completion, print_report, setup_logging};
use crate::app::services::document::load_document;
use crate::app::services::validation::{SchemaValidator, check_export};
use crate::cli::args::ValidateArgs;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Validate command runner
///
/// Fails when any document has a blocking error, after every report is printed.
pub async fn run_validate(args: ValidateArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    let config = load_configuration(args.common.config_file.as_deref())?;
    setup_logging(&args.common, &config)?;
    debug!("Validate arguments: {:?}", args);

    let documents = expand_document_patterns(&args.documents)?;
    let schema_path = args.schema.as_deref().or(config.export.schema_path.as_deref());
    let validator = SchemaValidator::from_optional_path(schema_path).await?;
    info!(
        "Validating {} document(s) against {}",
        documents.len(),
        validator.source()
    );

    let mut stats = CommandStats::default();
    let mut failed = 0;
    for path in &documents {
        let document = load_document(path).await?;
        let report = check_export(&document, &validator)?;
        if !report.can_export() {
            failed += 1;
        }
        stats.record_report(&report);
        print_report(&path.display().to_string(), &report, args.output_format)?;
    }

    stats.processing_time = start_time.elapsed();
    log_completion("validate", &stats);

    if failed > 0 {
        return Err(Error::data_validation(format!(
            "{} of {} document(s) failed validation",
            failed,
            documents.len()
        )));
    }
    Ok(stats)
}

/// Resolve document arguments that may be plain paths or glob patterns
///
/// Existing paths are taken as given; anything else is expanded as a glob and
/// must match at least one file.
pub fn expand_document_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for pattern in patterns {
        if Path::new(pattern).is_file() {
            documents.push(PathBuf::from(pattern));
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| {
            Error::configuration(format!("Invalid document pattern '{}': {}", pattern, e))
        })?;

        let mut matched: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        if matched.is_empty() {
            return Err(Error::file_not_found(pattern.clone()));
        }

        matched.sort();
        debug!("Pattern '{}' matched {} file(s)", pattern, matched.len());
        documents.extend(matched);
    }

    documents.dedup();
    Ok(documents)
}
