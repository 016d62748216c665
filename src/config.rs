//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then a TOML file (explicit `--config`
//! or `<config dir>/wra-config/config.toml`), then environment variables, then
//! command-line flags (applied by the CLI layer).
//!
//! ```toml
//! [import]
//! grouping = "by_type_and_height"
//! delimiter = ";"
//! height_reference = "ground_level"
//!
//! [export]
//! schema_path = "/opt/iea43/iea43_wra_data_model.schema.json"
//! output_file = "iea-task43-data.json"
//! force_overwrite = false
//!
//! [logging]
//! level = "info"
//! ```

use crate::app::services::csv_import::PointGrouping;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_EXPORT_FILENAME, DEFAULT_HEIGHT_REFERENCE,
    DEFAULT_LOG_LEVEL, ENV_OUTPUT_FILE, ENV_POINT_GROUPING, ENV_SCHEMA_PATH, HEIGHT_REFERENCES,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Global configuration for the WRA station configuration toolkit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub import: ImportConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// CSV import settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// How imported columns map onto measurement points
    pub grouping: PointGrouping,

    /// Field delimiter; sniffed from the file when unset
    pub delimiter: Option<String>,

    /// Height reference assigned to imported points
    pub height_reference: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            grouping: PointGrouping::default(),
            delimiter: None,
            height_reference: DEFAULT_HEIGHT_REFERENCE.to_string(),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// JSON-Schema used for compliance checks; the built-in schema when unset
    pub schema_path: Option<PathBuf>,

    /// Export file written by `export`
    pub output_file: PathBuf,

    /// Replace an existing export file
    pub force_overwrite: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            schema_path: None,
            output_file: PathBuf::from(DEFAULT_EXPORT_FILENAME),
            force_overwrite: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Platform location of the configuration file
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine configuration directory"))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read configuration file {}", path.display()),
                e,
            )
        })?;
        let config: Self = toml::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults, then the optional file, then environment variables
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `WRA_*` overrides using the given variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(schema_path) = non_empty(ENV_SCHEMA_PATH) {
            debug!("{} overrides schema path", ENV_SCHEMA_PATH);
            self.export.schema_path = Some(PathBuf::from(schema_path));
        }
        if let Some(output_file) = non_empty(ENV_OUTPUT_FILE) {
            debug!("{} overrides output file", ENV_OUTPUT_FILE);
            self.export.output_file = PathBuf::from(output_file);
        }
        if let Some(grouping) = non_empty(ENV_POINT_GROUPING) {
            self.import.grouping = grouping.parse()?;
        }
        Ok(())
    }

    /// Set the point grouping mode
    pub fn with_grouping(mut self, grouping: PointGrouping) -> Self {
        self.import.grouping = grouping;
        self
    }

    /// Set the CSV delimiter
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.import.delimiter = Some(delimiter.into());
        self
    }

    /// Set the JSON-Schema path
    pub fn with_schema_path(mut self, schema_path: impl Into<PathBuf>) -> Self {
        self.export.schema_path = Some(schema_path.into());
        self
    }

    /// Set the export file
    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.export.output_file = output_file.into();
        self
    }

    /// Configured delimiter as a byte, `None` to sniff
    ///
    /// Accepts a single character or the names `tab`, `comma`, `semicolon`, `pipe`.
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        let Some(raw) = self.import.delimiter.as_deref() else {
            return Ok(None);
        };

        let byte = match raw.to_lowercase().as_str() {
            "tab" | "\\t" | "\t" => b'\t',
            "comma" | "," => b',',
            "semicolon" | ";" => b';',
            "pipe" | "|" => b'|',
            _ => {
                return Err(Error::configuration(format!(
                    "Unsupported delimiter '{}' (expected one of: , ; tab |)",
                    raw
                )));
            }
        };
        Ok(Some(byte))
    }

    /// Validate settings that cannot be checked by deserialization alone
    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;

        if self.export.output_file.as_os_str().is_empty() {
            return Err(Error::configuration("Export output file must not be empty"));
        }

        if !HEIGHT_REFERENCES.contains(&self.import.height_reference.as_str()) {
            return Err(Error::configuration(format!(
                "Unknown height reference '{}' (expected one of: {})",
                self.import.height_reference,
                HEIGHT_REFERENCES.join(", ")
            )));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::configuration(format!(
                "Unknown log level '{}' (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
