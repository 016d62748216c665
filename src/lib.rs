//! WRA Station Configuration Library
//!
//! A Rust library for authoring IEA Task 43 Wind Resource Assessment (WRA)
//! station-configuration documents and exporting them as schema-compliant JSON.
//!
//! This library provides tools for:
//! - Inferring measurement metadata (type, height, statistic, unit) from free-form
//!   logger column headers
//! - Validating the structure of logger CSV files before import
//! - Building measurement points from imported columns and merging them per logger
//! - Checking documents for required fields and JSON-Schema compliance
//! - Stripping form-only fields and gating export on validation results

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_import;
        pub mod document;
        pub mod validation;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ColumnInfo, MeasurementLocation, MeasurementPoint, MeasurementType, StatisticType,
    WraDocument,
};
pub use config::Config;

/// Result type alias for WRA station configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for import, validation and export operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV tokenization error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Blocking structural problem found in an imported CSV file
    #[error("CSV structure error in file '{file}': {message}")]
    CsvStructure { file: String, message: String },

    /// Document could not be read or written as JSON
    #[error("Document error: {message}")]
    Document {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The JSON-Schema document itself is unusable
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Export refused because validation reported errors
    #[error(
        "Export blocked: {required_errors} required-field error(s), {schema_errors} schema error(s)"
    )]
    ExportBlocked {
        required_errors: usize,
        schema_errors: usize,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a blocking CSV structure error
    pub fn csv_structure(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CsvStructure {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a document error
    pub fn document(message: impl Into<String>, source: Option<serde_json::Error>) -> Self {
        Self::Document {
            message: message.into(),
            source,
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an export blocked error
    pub fn export_blocked(required_errors: usize, schema_errors: usize) -> Self {
        Self::ExportBlocked {
            required_errors,
            schema_errors,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Document {
            message: "JSON processing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid TOML configuration: {}", error),
        }
    }
}
