//! Logger CSV import
//!
//! This module turns a logger data file into measurement points for a WRA
//! document. Header parsing never fails; structural problems in the file are
//! reported as errors (blocking) or warnings (informational).
//!
//! ## Architecture
//!
//! - [`reader`] - Tokenization with delimiter sniffing and ragged-row tolerance
//! - [`structure`] - Header row, timestamp column and row-level checks
//! - [`timestamp`] - Timestamp recognition for individual cells
//! - [`column_header`] - Measurement metadata inference from header text
//! - [`point_builder`] - Measurement points and logger configs from headers
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use wra_station_config::app::services::csv_import::{
//!     build_points, read_csv_rows, validate_csv_structure, BuildOptions,
//! };
//!
//! # fn example() -> wra_station_config::Result<()> {
//! let rows = read_csv_rows("Timestamp,WS_80m_Avg\n2024-01-01 00:00,7.2\n", None, "met.csv")?;
//! let structure = validate_csv_structure(&rows).into_structure("met.csv")?;
//! let options = BuildOptions::new("LOG-1", Utc::now());
//! let points = build_points(&structure.headers, structure.timestamp_column, &options);
//! assert_eq!(points.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod column_header;
pub mod point_builder;
pub mod reader;
pub mod structure;
pub mod timestamp;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_header::parse_column_header;
pub use point_builder::{BuildOptions, PointGrouping, build_points};
pub use reader::{read_csv_file, read_csv_rows};
pub use structure::{CsvIssue, CsvStructure, CsvValidationResult, IssueKind, validate_csv_structure};
pub use timestamp::{TimestampFormat, classify_timestamp, is_valid_timestamp};
