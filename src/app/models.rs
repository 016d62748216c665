//! Data models for WRA station configuration
//!
//! This module contains the measurement vocabulary used by column-header inference
//! (measurement types, statistic types, inferred column descriptors) and re-exports
//! the IEA Task 43 document structures defined in [`document`].

pub mod document;

pub use document::{
    ColumnName, LoggerMainConfig, LoggerMeasurementConfig, MeasurementLocation, MeasurementPoint,
    Sensor, WraDocument,
};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Measurement Types
// =============================================================================

/// Measurement type identifiers inferred from logger column headers
///
/// Serialized with the snake_case identifiers of the IEA Task 43
/// `measurement_type_id` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    VerticalWindSpeed,
    WindSpeed,
    WindDirection,
    WindShear,
    WindVeer,
    AirTemperature,
    AirPressure,
    RelativeHumidity,
    WaveHeight,
    WaveSignificantHeight,
    WaveMaximumHeight,
    WavePeriod,
    WavePeakPeriod,
    WaveDirection,
    Position,
    Other,
}

impl MeasurementType {
    /// Identifier as written to `measurement_type_id`
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementType::VerticalWindSpeed => "vertical_wind_speed",
            MeasurementType::WindSpeed => "wind_speed",
            MeasurementType::WindDirection => "wind_direction",
            MeasurementType::WindShear => "wind_shear",
            MeasurementType::WindVeer => "wind_veer",
            MeasurementType::AirTemperature => "air_temperature",
            MeasurementType::AirPressure => "air_pressure",
            MeasurementType::RelativeHumidity => "relative_humidity",
            MeasurementType::WaveHeight => "wave_height",
            MeasurementType::WaveSignificantHeight => "wave_significant_height",
            MeasurementType::WaveMaximumHeight => "wave_maximum_height",
            MeasurementType::WavePeriod => "wave_period",
            MeasurementType::WavePeakPeriod => "wave_peak_period",
            MeasurementType::WaveDirection => "wave_direction",
            MeasurementType::Position => "position",
            MeasurementType::Other => "other",
        }
    }

    /// All measurement types in inference order
    pub fn all_values() -> [MeasurementType; 16] {
        [
            MeasurementType::VerticalWindSpeed,
            MeasurementType::WindSpeed,
            MeasurementType::WindDirection,
            MeasurementType::WindShear,
            MeasurementType::WindVeer,
            MeasurementType::AirTemperature,
            MeasurementType::AirPressure,
            MeasurementType::RelativeHumidity,
            MeasurementType::WaveHeight,
            MeasurementType::WaveSignificantHeight,
            MeasurementType::WaveMaximumHeight,
            MeasurementType::WavePeriod,
            MeasurementType::WavePeakPeriod,
            MeasurementType::WaveDirection,
            MeasurementType::Position,
            MeasurementType::Other,
        ]
    }

    /// Whether heights of this type may be encoded as a range (`40m-60m`)
    pub fn spans_heights(self) -> bool {
        matches!(self, MeasurementType::WindShear | MeasurementType::WindVeer)
    }
}

impl FromStr for MeasurementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        MeasurementType::all_values()
            .into_iter()
            .find(|candidate| candidate.as_str() == wanted)
            .ok_or_else(|| {
                Error::data_validation(format!("Unknown measurement type '{}'", s.trim()))
            })
    }
}

impl std::fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Statistic Types
// =============================================================================

/// Statistic recorded by a logger column (`statistic_type_id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticType {
    #[default]
    Avg,
    Max,
    Min,
    Sd,
    Ti,
    Gust,
    Sum,
    Count,
    Median,
}

impl StatisticType {
    /// Identifier as written to `statistic_type_id`
    pub fn as_str(self) -> &'static str {
        match self {
            StatisticType::Avg => "avg",
            StatisticType::Max => "max",
            StatisticType::Min => "min",
            StatisticType::Sd => "sd",
            StatisticType::Ti => "ti",
            StatisticType::Gust => "gust",
            StatisticType::Sum => "sum",
            StatisticType::Count => "count",
            StatisticType::Median => "median",
        }
    }
}

impl FromStr for StatisticType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "avg" => Ok(StatisticType::Avg),
            "max" => Ok(StatisticType::Max),
            "min" => Ok(StatisticType::Min),
            "sd" => Ok(StatisticType::Sd),
            "ti" => Ok(StatisticType::Ti),
            "gust" => Ok(StatisticType::Gust),
            "sum" => Ok(StatisticType::Sum),
            "count" => Ok(StatisticType::Count),
            "median" => Ok(StatisticType::Median),
            other => Err(Error::data_validation(format!(
                "Unknown statistic type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StatisticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Inferred Column Descriptor
// =============================================================================

/// Measurement metadata inferred from one logger column header
///
/// `name` is always the header exactly as it appeared in the CSV file; it is later
/// matched against the logger's data file, so it must never be normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Verbatim column header
    pub name: String,

    /// Inferred measurement type
    pub measurement_type: MeasurementType,

    /// Measurement height in metres, if the header encodes one
    pub height: Option<f64>,

    /// Unit token found in the header
    pub unit: Option<String>,

    /// Inferred statistic
    pub statistic_type: StatisticType,
}

impl ColumnInfo {
    /// Descriptor with every field at its fallback value
    pub fn unclassified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurement_type: MeasurementType::Other,
            height: None,
            unit: None,
            statistic_type: StatisticType::Avg,
        }
    }
}
