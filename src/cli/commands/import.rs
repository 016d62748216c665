//! Import command implementation
//!
//! Reads a logger CSV file, validates its structure, infers measurement points
//! from the header row and merges them into a measurement location. Structural
//! errors stop the import before the document is touched.

use super::shared::{CommandStats, create_spinner, load_configuration, log_completion, setup_logging};
use crate::app::services::csv_import::{
    BuildOptions, CsvStructure, build_points, read_csv_file, validate_csv_structure,
};
use crate::app::services::document::{
    MergeSummary, ensure_logger, load_document, merge_imported_points, migrate_legacy_sensors,
    save_document,
};
use crate::cli::args::ImportArgs;
use crate::config::Config;
use crate::Result;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Import command runner
pub async fn run_import(args: ImportArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    let config = apply_cli_overrides(load_configuration(args.common.config_file.as_deref())?, &args);
    setup_logging(&args.common, &config)?;
    debug!("Import arguments: {:?}", args);

    config.validate()?;
    args.validate()?;

    let mut document = load_document(&args.document).await?;

    let spinner = create_spinner(
        &format!("Reading {}", args.csv_file.display()),
        args.common.quiet,
    );
    let rows = read_csv_file(&args.csv_file, config.delimiter_byte()?).await;
    spinner.finish_and_clear();
    let rows = rows?;

    let validation = validate_csv_structure(&rows);
    let warning_count = validation.warnings().count();
    for issue in validation.warnings() {
        warn!("{}: {}", args.csv_file.display(), issue.message);
    }
    let structure = validation.into_structure(&args.csv_file.display().to_string())?;
    info!(
        "Header row {} with {} data column(s), timestamp column '{}'",
        structure.header_row_index + 1,
        structure.data_columns.len(),
        structure.timestamp_header()
    );

    let now = Utc::now();
    let location = document.location_mut(args.location)?;
    let logger_added = ensure_logger(location, args.logger.trim(), now);
    let logger_id = location.canonical_logger_id(&args.logger);
    debug!("Importing as logger '{}'", logger_id);

    let options = BuildOptions::new(logger_id.as_str(), now)
        .with_grouping(config.import.grouping)
        .with_height_reference(config.import.height_reference.as_str());
    let points = build_points(&structure.headers, structure.timestamp_column, &options);
    let summary = merge_imported_points(location, &logger_id, points);
    let migrated = migrate_legacy_sensors(location);
    if migrated > 0 {
        info!("Moved legacy sensors onto {} point(s)", migrated);
    }

    if args.dry_run {
        info!("Dry run: {} not written", args.document.display());
    } else {
        save_document(&args.document, &document).await?;
    }

    if !args.common.quiet {
        print_summary(&args, &structure, &summary, logger_added);
    }

    let stats = CommandStats {
        documents_processed: 1,
        points_affected: summary.added,
        warnings_found: warning_count,
        processing_time: start_time.elapsed(),
        ..Default::default()
    };
    log_completion("import", &stats);
    Ok(stats)
}

/// Apply import flags on top of the loaded configuration
pub fn apply_cli_overrides(mut config: Config, args: &ImportArgs) -> Config {
    if let Some(grouping) = args.grouping {
        config = config.with_grouping(grouping);
    }
    if let Some(delimiter) = &args.delimiter {
        config = config.with_delimiter(delimiter.as_str());
    }
    if let Some(reference) = &args.height_reference {
        config.import.height_reference = reference.clone();
    }
    config
}

fn print_summary(
    args: &ImportArgs,
    structure: &CsvStructure,
    summary: &MergeSummary,
    logger_added: bool,
) {
    println!(
        "Imported {} data column(s) from {} ({} data row(s))",
        structure.data_columns.len(),
        args.csv_file.display(),
        structure.data_row_count
    );
    println!(
        "   • Points added: {}, replaced: {}, preserved: {}",
        summary.added, summary.replaced, summary.preserved
    );
    if !structure.skipped_rows.is_empty() {
        println!(
            "   • Rows skipped for a column count mismatch: {}",
            structure.skipped_rows.len()
        );
    }
    if logger_added {
        println!(
            "   • Added logger '{}'; fill in its manufacturer before export",
            args.logger.trim()
        );
    }
    if args.dry_run {
        println!("   • Dry run, document not saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::csv_import::PointGrouping;
    use crate::cli::args::{Args, Commands};
    use clap::Parser;

    fn import_args(extra: &[&str]) -> ImportArgs {
        let mut argv = vec!["wra-config", "import", "station.json", "data.csv", "-l", "LOG-1"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Some(Commands::Import(args)) => args,
            other => panic!("expected import command, got {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = import_args(&[
            "--grouping",
            "by-type-and-height",
            "--delimiter",
            "tab",
            "--height-reference",
            "sea_level",
        ]);

        let config = apply_cli_overrides(Config::default(), &args);

        assert_eq!(config.import.grouping, PointGrouping::ByTypeAndHeight);
        assert_eq!(config.delimiter_byte().unwrap(), Some(b'\t'));
        assert_eq!(config.import.height_reference, "sea_level");
    }

    #[test]
    fn test_config_kept_without_flags() {
        let base = Config::default().with_grouping(PointGrouping::ByTypeAndHeight);
        let config = apply_cli_overrides(base.clone(), &import_args(&[]));
        assert_eq!(config, base);
    }
}
