//! Application constants for the WRA station configuration toolkit
//!
//! This module contains the keyword tables, limits and default values used by
//! CSV import, validation and export.

// =============================================================================
// CSV Structure Discovery
// =============================================================================

/// Number of leading rows scanned when looking for the header row
pub const HEADER_SCAN_ROWS: usize = 5;

/// Number of leading header cells searched for the timestamp column
pub const TIMESTAMP_SCAN_COLUMNS: usize = 6;

/// Minimum number of non-empty rows (header plus one data row)
pub const MIN_CSV_ROWS: usize = 2;

/// Fraction of a row's width that must be filled for it to qualify as a header
pub const HEADER_MIN_FILL_RATIO: f64 = 0.2;

/// Absolute floor on the non-empty cell count of a header row
pub const HEADER_MIN_FILLED_CELLS: usize = 2;

/// Keywords that mark a row as a likely header row
pub const HEADER_KEYWORDS: &[&str] = &[
    "time", "date", "wind", "speed", "dir", "temp", "humidity", "pressure", "wave",
];

/// Keywords that mark a header cell as the timestamp column
pub const TIMESTAMP_KEYWORDS: &[&str] = &["timestamp", "date", "time", "iso", "utc"];

/// Individually reported warnings of one kind before the remainder is rolled up
pub const MAX_REPORTED_WARNINGS: usize = 3;

/// Candidate delimiters, in preference order when counts tie
pub const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

// =============================================================================
// Column Header Inference
// =============================================================================

/// Unit tokens searched in the lower-cased header, first match wins
///
/// Each entry is (needle, reported unit).
pub const UNIT_PATTERNS: &[(&str, &str)] = &[
    ("m/s", "m/s"),
    ("deg", "deg"),
    ("%", "%"),
    ("hpa", "hPa"),
    ("mbar", "mbar"),
];

/// Height assigned to imported columns whose header carries no height
pub const DEFAULT_IMPORT_HEIGHT_M: f64 = 0.0;

/// Height reference assigned to imported points
pub const DEFAULT_HEIGHT_REFERENCE: &str = "ground_level";

// =============================================================================
// Document and Export
// =============================================================================

/// Default file name of the exported document
pub const DEFAULT_EXPORT_FILENAME: &str = "iea-task43-data.json";

/// Root and location level fields that only exist for the editing workflow
pub const FORM_ONLY_FIELDS: &[&str] = &["startDate", "endDate", "campaignStatus"];

/// Measurement point fields that only exist for the editing workflow
pub const FORM_ONLY_POINT_FIELDS: &[&str] = &["unit", "statistic_type_id"];

/// Legacy location-level sensor list, superseded by per-point sensors
pub const LEGACY_SENSORS_FIELD: &str = "sensors";

/// Measurement station types accepted by the IEA Task 43 data model
pub const STATION_TYPES: &[&str] = &[
    "mast",
    "lidar",
    "sodar",
    "floating_lidar",
    "wave_buoy",
    "adcp",
    "solar",
    "virtual_met_mast",
    "reanalysis",
];

/// Height references accepted by the IEA Task 43 data model
pub const HEIGHT_REFERENCES: &[&str] = &["ground_level", "sea_level", "sea_floor"];

/// Plant types accepted by the IEA Task 43 data model
pub const PLANT_TYPES: &[&str] = &["onshore_wind", "offshore_wind", "solar"];

/// Version of the data model the built-in schema describes
pub const DATA_MODEL_VERSION: &str = "1.3.0-2024.03";

// =============================================================================
// Configuration
// =============================================================================

/// Directory name used under the platform configuration directory
pub const CONFIG_DIR_NAME: &str = "wra-config";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the schema path
pub const ENV_SCHEMA_PATH: &str = "WRA_SCHEMA_PATH";

/// Environment variable overriding the export file name
pub const ENV_OUTPUT_FILE: &str = "WRA_OUTPUT_FILE";

/// Environment variable overriding the point grouping mode
pub const ENV_POINT_GROUPING: &str = "WRA_POINT_GROUPING";

/// Default logging level
pub const DEFAULT_LOG_LEVEL: &str = "warn";
