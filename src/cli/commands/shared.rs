//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::services::validation::{ExportReport, ValidationIssue};
use crate::cli::args::{CommonArgs, OutputFormat};
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Command statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Number of documents read or written
    pub documents_processed: usize,
    /// Number of measurement points created, edited or removed
    pub points_affected: usize,
    /// Number of blocking validation errors reported
    pub errors_found: usize,
    /// Number of non-blocking warnings reported
    pub warnings_found: usize,
    /// Total command time
    pub processing_time: Duration,
}

impl CommandStats {
    /// Add the counts of one validation report
    pub fn record_report(&mut self, report: &ExportReport) {
        self.documents_processed += 1;
        self.errors_found += report.error_count();
        self.warnings_found += report.warning_count();
    }
}

/// Set up structured logging for a command
pub fn setup_logging(common: &CommonArgs, config: &Config) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = common.get_log_level(&config.logging.level);

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wra_station_config={}", log_level)));

    let initialized = if common.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    // A subscriber installed earlier in the process stays in place
    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
    Ok(())
}

/// Load configuration for a command
///
/// An explicit `--config` file must exist; otherwise the platform config file is
/// used when present. Environment overrides apply in both cases.
pub fn load_configuration(config_file: Option<&Path>) -> Result<Config> {
    let config = match config_file {
        Some(path) => Config::load_layered(Some(path))?,
        None => {
            let default_path = Config::default_config_path().ok().filter(|p| p.exists());
            Config::load_layered(default_path.as_deref())?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Create a spinner for a single long-running step
pub fn create_spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print both validation tiers of a report
pub fn print_report(name: &str, report: &ExportReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            print_human_report(name, report);
            Ok(())
        }
        OutputFormat::Json => {
            let output = json!({
                "document": name,
                "can_export": report.can_export(),
                "required_fields": report.required_fields,
                "schema": report.schema,
            });
            let text = serde_json::to_string_pretty(&output)
                .map_err(|e| Error::document("Failed to serialize validation report", Some(e)))?;
            println!("{}", text);
            Ok(())
        }
    }
}

fn print_human_report(name: &str, report: &ExportReport) {
    let status = if report.can_export() {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };
    println!("{} {}", status, name.bold());

    print_tier("Required fields", &report.required_fields.errors, &report.required_fields.warnings);
    print_tier("Schema compliance", &report.schema.errors, &report.schema.warnings);

    println!(
        "   {} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
}

fn print_tier(title: &str, errors: &[ValidationIssue], warnings: &[ValidationIssue]) {
    if errors.is_empty() && warnings.is_empty() {
        println!("   {} {}", "✓".green(), title);
        return;
    }

    println!("   {}", title.bold());
    for issue in errors {
        println!("     {} {}", "error".red(), issue);
    }
    for issue in warnings {
        println!("     {} {}", "warning".yellow(), issue);
    }
}

/// Log a short completion summary
pub fn log_completion(command: &str, stats: &CommandStats) {
    info!(
        "{} finished in {:.2?}: {} document(s), {} point(s), {} error(s), {} warning(s)",
        command,
        stats.processing_time,
        stats.documents_processed,
        stats.points_affected,
        stats.errors_found,
        stats.warnings_found
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_command_stats_default() {
        let stats = CommandStats::default();
        assert_eq!(stats.documents_processed, 0);
        assert_eq!(stats.errors_found, 0);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let result = load_configuration(Some(Path::new("/nonexistent/wra-config.toml")));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_explicit_config_is_validated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[import]\ndelimiter = \"::\"").unwrap();

        let result = load_configuration(Some(file.path()));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_quiet_spinner_is_hidden() {
        let spinner = create_spinner("Reading", true);
        assert!(spinner.is_hidden());
    }
}
