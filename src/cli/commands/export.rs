//! Export command implementation
//!
//! Validates a document with both tiers and writes the cleaned export copy only
//! when neither tier reports an error.

use super::shared::{CommandStats, load_configuration, log_completion, print_report, setup_logging};
use crate::app::services::document::load_document;
use crate::app::services::validation::{SchemaValidator, check_export, write_export};
use crate::cli::args::ExportArgs;
use crate::Result;
use std::time::Instant;
use tracing::debug;

/// Export command runner
pub async fn run_export(args: ExportArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    let mut config = load_configuration(args.common.config_file.as_deref())?;
    if let Some(output) = &args.output {
        config = config.with_output_file(output.clone());
    }
    if let Some(schema) = &args.schema {
        config = config.with_schema_path(schema.clone());
    }
    setup_logging(&args.common, &config)?;
    debug!("Export arguments: {:?}", args);

    let document = load_document(&args.document).await?;
    let validator = SchemaValidator::from_optional_path(config.export.schema_path.as_deref()).await?;
    let report = check_export(&document, &validator)?;

    let mut stats = CommandStats::default();
    stats.record_report(&report);

    if !args.common.quiet || !report.can_export() {
        print_report(&args.document.display().to_string(), &report, args.output_format)?;
    }

    let output_file = &config.export.output_file;
    write_export(
        &report,
        output_file,
        args.force || config.export.force_overwrite,
    )
    .await?;

    if !args.common.quiet {
        println!(
            "Exported {} point(s) to {}",
            document.point_count(),
            output_file.display()
        );
    }

    stats.points_affected = document.point_count();
    stats.processing_time = start_time.elapsed();
    log_completion("export", &stats);
    Ok(stats)
}
