//! Command-line argument definitions for wra-config
//!
//! This module defines the complete CLI interface using clap derive API. Every
//! subcommand shares the logging and configuration flags in [`CommonArgs`].

use crate::app::models::MeasurementType;
use crate::app::services::csv_import::PointGrouping;
use crate::app::services::document::{BulkEdit, PointSelector};
use crate::constants::{HEIGHT_REFERENCES, PLANT_TYPES, STATION_TYPES};
use crate::{Error, Result};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the WRA station configuration tool
///
/// Builds IEA Task 43 wind resource assessment documents from logger CSV files
/// and gates their export on required-field and JSON-Schema validation.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wra-config",
    version,
    about = "Build and validate IEA Task 43 WRA station configuration documents",
    long_about = "Creates IEA Task 43 wind resource assessment (WRA) documents, infers \
                  measurement points from logger CSV column headers, supports bulk editing \
                  of points, and exports the document only when it passes both the \
                  required-fields check and JSON-Schema compliance."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for wra-config
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create a new document with root metadata and an optional first location
    Init(InitArgs),
    /// Import a logger CSV file as measurement points
    Import(ImportArgs),
    /// Show the inferred column metadata of a logger CSV file
    Inspect(InspectArgs),
    /// Bulk edit or remove measurement points
    Edit(EditArgs),
    /// Run both validation tiers against one or more documents
    Validate(ValidateArgs),
    /// Validate a document and write the export file
    Export(ExportArgs),
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Path to a TOML configuration file
    ///
    /// When omitted, `<config dir>/wra-config/config.toml` is used if it exists.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl CommonArgs {
    /// Log level from the flags, falling back to the configured level
    pub fn get_log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => configured,
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

// =============================================================================
// init
// =============================================================================

/// Arguments for the init command
#[derive(Debug, Clone, Parser)]
pub struct InitArgs {
    /// Document file to create
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    #[arg(long = "author", value_name = "NAME", help = "Document author")]
    pub author: String,

    #[arg(
        long = "organisation",
        visible_alias = "organization",
        value_name = "NAME",
        help = "Organisation responsible for the campaign"
    )]
    pub organisation: String,

    /// Document date, today when omitted
    #[arg(long = "date", value_name = "YYYY-MM-DD", help = "Document date (default: today)")]
    pub date: Option<NaiveDate>,

    #[arg(long = "plant-name", value_name = "NAME", help = "Wind plant name")]
    pub plant_name: Option<String>,

    #[arg(long = "plant-type", value_name = "TYPE", help = "Plant type (onshore_wind, offshore_wind, solar)")]
    pub plant_type: Option<String>,

    /// Name of the first measurement location
    ///
    /// Latitude and longitude are required together with the name.
    #[arg(
        long = "location-name",
        value_name = "NAME",
        requires_all = ["latitude", "longitude"],
        help = "Create a first measurement location with this name"
    )]
    pub location_name: Option<String>,

    #[arg(
        long = "latitude",
        value_name = "DEG",
        allow_negative_numbers = true,
        requires = "location_name",
        help = "Latitude of the location in decimal degrees"
    )]
    pub latitude: Option<f64>,

    #[arg(
        long = "longitude",
        value_name = "DEG",
        allow_negative_numbers = true,
        requires = "location_name",
        help = "Longitude of the location in decimal degrees"
    )]
    pub longitude: Option<f64>,

    #[arg(
        long = "station-type",
        value_name = "TYPE",
        default_value = "mast",
        help = "Measurement station type (mast, lidar, sodar, ...)"
    )]
    pub station_type: String,

    #[arg(long = "force", help = "Overwrite an existing document")]
    pub force: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl InitArgs {
    /// Validate the init command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.author.trim().is_empty() {
            return Err(Error::configuration("Author must not be empty"));
        }
        if self.organisation.trim().is_empty() {
            return Err(Error::configuration("Organisation must not be empty"));
        }

        if let Some(plant_type) = &self.plant_type {
            if !PLANT_TYPES.contains(&plant_type.as_str()) {
                return Err(Error::configuration(format!(
                    "Unknown plant type '{}' (expected one of: {})",
                    plant_type,
                    PLANT_TYPES.join(", ")
                )));
            }
        }

        if !STATION_TYPES.contains(&self.station_type.as_str()) {
            return Err(Error::configuration(format!(
                "Unknown station type '{}' (expected one of: {})",
                self.station_type,
                STATION_TYPES.join(", ")
            )));
        }

        if let Some(latitude) = self.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(Error::configuration(format!(
                    "Latitude {} is outside -90..90",
                    latitude
                )));
            }
        }
        if let Some(longitude) = self.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(Error::configuration(format!(
                    "Longitude {} is outside -180..180",
                    longitude
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// import
// =============================================================================

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Document to update
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Logger CSV file whose header row describes the points
    #[arg(value_name = "CSV")]
    pub csv_file: PathBuf,

    /// Logger that produced the file (logger id or serial number)
    #[arg(short = 'l', long = "logger", value_name = "ID", help = "Logger id or serial number")]
    pub logger: String,

    #[arg(
        long = "location",
        value_name = "INDEX",
        default_value_t = 0,
        help = "Index of the measurement location to import into"
    )]
    pub location: usize,

    /// Overrides the configured grouping
    #[arg(long = "grouping", value_enum, help = "How columns map onto measurement points")]
    pub grouping: Option<PointGrouping>,

    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "CSV delimiter (',', ';', 'tab', '|'); sniffed when omitted"
    )]
    pub delimiter: Option<String>,

    #[arg(
        long = "height-reference",
        value_name = "REF",
        help = "Height reference for imported points (default: ground_level)"
    )]
    pub height_reference: Option<String>,

    /// Report what would change without writing the document
    #[arg(long = "dry-run", help = "Show the import summary without saving")]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ImportArgs {
    pub fn validate(&self) -> Result<()> {
        if self.logger.trim().is_empty() {
            return Err(Error::configuration("Logger identifier must not be empty"));
        }
        if !self.csv_file.exists() {
            return Err(Error::file_not_found(self.csv_file.display().to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// inspect
// =============================================================================

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Logger CSV file to inspect
    #[arg(value_name = "CSV")]
    pub csv_file: PathBuf,

    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "CSV delimiter (',', ';', 'tab', '|'); sniffed when omitted"
    )]
    pub delimiter: Option<String>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the column report"
    )]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

// =============================================================================
// edit
// =============================================================================

/// Arguments for the edit command
///
/// Selection flags narrow the affected points; every given criterion must match.
#[derive(Debug, Clone, Parser)]
pub struct EditArgs {
    /// Document to edit
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    #[arg(
        long = "location",
        value_name = "INDEX",
        default_value_t = 0,
        help = "Index of the measurement location to edit"
    )]
    pub location: usize,

    #[arg(
        short = 'p',
        long = "point",
        value_name = "NAME",
        help = "Select a point by name (repeatable)"
    )]
    pub points: Vec<String>,

    #[arg(long = "type", value_name = "TYPE", help = "Select points of this measurement type")]
    pub measurement_type: Option<MeasurementType>,

    #[arg(long = "at-height", value_name = "M", help = "Select points at this height")]
    pub at_height: Option<f64>,

    #[arg(long = "logger", value_name = "ID", help = "Select points owned by this logger")]
    pub logger: Option<String>,

    /// Required to edit every point of the location
    #[arg(long = "all", help = "Apply to every point when no selector is given")]
    pub all: bool,

    #[arg(long = "set-height", value_name = "M", help = "New height in metres")]
    pub set_height: Option<f64>,

    #[arg(long = "set-height-reference", value_name = "REF", help = "New height reference")]
    pub set_height_reference: Option<String>,

    #[arg(long = "set-type", value_name = "TYPE", help = "New measurement type")]
    pub set_type: Option<MeasurementType>,

    #[arg(long = "set-notes", value_name = "TEXT", help = "New notes")]
    pub set_notes: Option<String>,

    #[arg(
        long = "remove",
        help = "Remove the selected points instead of editing them",
        conflicts_with_all = ["set_height", "set_height_reference", "set_type", "set_notes"]
    )]
    pub remove: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl EditArgs {
    /// Point selection described by the flags
    pub fn selector(&self) -> PointSelector {
        let mut selector = PointSelector::all().with_names(self.points.iter().cloned());
        if let Some(measurement_type) = self.measurement_type {
            selector = selector.with_measurement_type(measurement_type);
        }
        if let Some(height) = self.at_height {
            selector = selector.with_height(height);
        }
        if let Some(logger) = &self.logger {
            selector = selector.with_logger(logger.clone());
        }
        selector
    }

    /// Field changes described by the flags
    pub fn bulk_edit(&self) -> BulkEdit {
        BulkEdit {
            height_m: self.set_height,
            height_reference_id: self.set_height_reference.clone(),
            measurement_type: self.set_type,
            notes: self.set_notes.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.selector().is_unrestricted() && !self.all {
            return Err(Error::configuration(
                "No points selected; pass --point, --type, --at-height, --logger or --all",
            ));
        }

        if !self.remove {
            let edit = self.bulk_edit();
            if edit.is_empty() {
                return Err(Error::configuration(
                    "Nothing to change; pass a --set-* option or --remove",
                ));
            }
            if let Some(reference) = &edit.height_reference_id {
                if !HEIGHT_REFERENCES.contains(&reference.as_str()) {
                    return Err(Error::configuration(format!(
                        "Unknown height reference '{}' (expected one of: {})",
                        reference,
                        HEIGHT_REFERENCES.join(", ")
                    )));
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// validate
// =============================================================================

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Document files or glob patterns
    #[arg(value_name = "DOCUMENTS", required = true, num_args = 1..)]
    pub documents: Vec<String>,

    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE",
        help = "JSON-Schema to validate against (default: built-in schema)"
    )]
    pub schema: Option<PathBuf>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for validation reports"
    )]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

// =============================================================================
// export
// =============================================================================

/// Arguments for the export command
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// Document to export
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Export file (default: iea-task43-data.json)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE",
        help = "JSON-Schema to validate against (default: built-in schema)"
    )]
    pub schema: Option<PathBuf>,

    #[arg(short = 'f', long = "force", help = "Overwrite an existing export file")]
    pub force: bool,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the validation report"
    )]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}
