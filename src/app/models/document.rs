//! IEA Task 43 station-configuration document structures
//!
//! These types mirror the WRA data model closely enough for import, editing and
//! validation. Every level keeps unknown properties in a flattened `extra` map so
//! documents produced by other tools survive a load/save cycle unchanged.
//!
//! Fields are optional wherever the editing workflow allows a document to be
//! incomplete; completeness is the job of the required-fields validator.

use crate::constants::DATA_MODEL_VERSION;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Root Document
// =============================================================================

/// Root of an IEA Task 43 WRA station-configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WraDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,

    /// Document date (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Data model version the document claims to follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_type: Option<String>,

    #[serde(default)]
    pub measurement_location: Vec<MeasurementLocation>,

    /// Campaign start date (editing workflow only, stripped on export)
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Campaign end date (editing workflow only, stripped on export)
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Campaign status (editing workflow only, stripped on export)
    #[serde(rename = "campaignStatus", skip_serializing_if = "Option::is_none")]
    pub campaign_status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WraDocument {
    /// Create a document with the root metadata filled in and no locations
    pub fn skeleton(
        author: impl Into<String>,
        organisation: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            author: Some(author.into()),
            organisation: Some(organisation.into()),
            date: Some(date.format("%Y-%m-%d").to_string()),
            version: Some(DATA_MODEL_VERSION.to_string()),
            ..Default::default()
        }
    }

    /// Parse a document from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::document("Failed to parse WRA document", Some(e)))
    }

    /// Serialize as pretty-printed JSON (two-space indent)
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::document("Failed to serialize WRA document", Some(e)))
    }

    /// Borrow a location by index
    pub fn location_mut(&mut self, index: usize) -> Result<&mut MeasurementLocation> {
        let count = self.measurement_location.len();
        self.measurement_location.get_mut(index).ok_or_else(|| {
            Error::data_validation(format!(
                "Measurement location {} does not exist (document has {})",
                index, count
            ))
        })
    }

    /// Total number of measurement points across all locations
    pub fn point_count(&self) -> usize {
        self.measurement_location
            .iter()
            .map(|location| location.measurement_point.len())
            .sum()
    }
}

// =============================================================================
// Measurement Location
// =============================================================================

/// A physical station (mast, lidar, buoy...) with its loggers and points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude_ddeg: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude_ddeg: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_station_type_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub logger_main_config: Vec<LoggerMainConfig>,

    #[serde(default)]
    pub measurement_point: Vec<MeasurementPoint>,

    /// Legacy location-level sensor list; see `migrate_legacy_sensors`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensors: Vec<Sensor>,

    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(rename = "campaignStatus", skip_serializing_if = "Option::is_none")]
    pub campaign_status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MeasurementLocation {
    /// Create a location with a fresh UUID
    pub fn new(
        name: impl Into<String>,
        latitude_ddeg: f64,
        longitude_ddeg: f64,
        station_type: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Some(uuid::Uuid::new_v4().to_string()),
            name: Some(name.into()),
            latitude_ddeg: Some(latitude_ddeg),
            longitude_ddeg: Some(longitude_ddeg),
            measurement_station_type_id: Some(station_type.into()),
            ..Default::default()
        }
    }

    /// Find a logger by its identity (logger id, then serial number)
    pub fn find_logger(&self, logger_id: &str) -> Option<&LoggerMainConfig> {
        self.logger_main_config
            .iter()
            .find(|logger| logger.matches(logger_id))
    }

    /// The identity of the logger answering to `logger_id`, or the trimmed id
    /// itself when no such logger is configured
    pub fn canonical_logger_id(&self, logger_id: &str) -> String {
        self.find_logger(logger_id)
            .and_then(LoggerMainConfig::identity)
            .unwrap_or(logger_id)
            .trim()
            .to_string()
    }

    /// Number of sensors across the legacy list and all points
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
            + self
                .measurement_point
                .iter()
                .map(|point| point.sensor.len())
                .sum::<usize>()
    }

    /// Location label for reports
    pub fn display_name(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("location #{}", index),
        }
    }
}

// =============================================================================
// Logger
// =============================================================================

/// Data logger installed at a location (`logger_main_config`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerMainConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_oem_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_model_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_serial_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_firmware_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoggerMainConfig {
    /// Identity used to link measurement configs: logger id, else serial number
    pub fn identity(&self) -> Option<&str> {
        self.logger_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .or(self.logger_serial_number.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    /// Whether this logger answers to the given identifier
    pub fn matches(&self, logger_id: &str) -> bool {
        let wanted = logger_id.trim();
        [&self.logger_id, &self.logger_serial_number]
            .into_iter()
            .flatten()
            .any(|candidate| candidate.trim() == wanted)
    }
}

// =============================================================================
// Measurement Point
// =============================================================================

/// A named, height-referenced measurement recorded at a location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_type_id: Option<String>,

    /// Height in metres; `null` is kept distinct from a missing key
    #[serde(default)]
    pub height_m: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_reference_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Unit inferred at import (editing workflow only, stripped on export)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Statistic inferred at import (editing workflow only, stripped on export)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic_type_id: Option<String>,

    #[serde(default)]
    pub logger_measurement_config: Vec<LoggerMeasurementConfig>,

    #[serde(default)]
    pub sensor: Vec<Sensor>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MeasurementPoint {
    /// A point belongs to a logger when every one of its configs references it
    pub fn is_owned_by(&self, logger_id: &str) -> bool {
        let wanted = logger_id.trim();
        !self.logger_measurement_config.is_empty()
            && self.logger_measurement_config.iter().all(|config| {
                config
                    .logger_id
                    .as_deref()
                    .is_some_and(|id| id.trim() == wanted)
            })
    }

    /// Like [`Self::is_owned_by`], accepting any identifier of `logger`
    pub fn is_owned_by_logger(&self, logger: &LoggerMainConfig) -> bool {
        !self.logger_measurement_config.is_empty()
            && self.logger_measurement_config.iter().all(|config| {
                config.logger_id.as_deref().is_some_and(|id| logger.matches(id))
            })
    }

    /// Verbatim column names referenced by this point's configs
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.logger_measurement_config
            .iter()
            .flat_map(|config| config.column_name.iter())
            .filter_map(|column| column.column_name.as_deref())
    }
}

/// Link between a measurement point and logger data columns over a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerMeasurementConfig {
    /// Identity of the logger recording these columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_units_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_m: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_channel: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,

    /// Open-ended configs serialize an explicit `null`
    #[serde(default)]
    pub date_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ignored: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub column_name: Vec<ColumnName>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One logger data-file column and the statistic it records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnName {
    /// Header exactly as it appears in the logger data file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic_type_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ignored: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Sensor
// =============================================================================

/// Physical instrument attached to a measurement point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oem: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_type_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
