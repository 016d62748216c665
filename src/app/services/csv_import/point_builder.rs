//! Measurement point construction from imported CSV headers
//!
//! Every non-timestamp column becomes a `column_name` entry inside a
//! `logger_measurement_config` that links it to the importing logger. Columns are
//! either kept one point per column or grouped into one point per
//! (measurement type, height) pair.

use super::column_header::parse_column_header;
use crate::app::models::{
    ColumnInfo, ColumnName, LoggerMeasurementConfig, MeasurementPoint, MeasurementType,
};
use crate::constants::{DEFAULT_HEIGHT_REFERENCE, DEFAULT_IMPORT_HEIGHT_M};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// How imported columns map onto measurement points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PointGrouping {
    /// One point per column, named by its header
    #[default]
    PerColumn,
    /// Columns with the same measurement type and height share one point
    ByTypeAndHeight,
}

impl FromStr for PointGrouping {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_column" | "column" => Ok(PointGrouping::PerColumn),
            "by_type_and_height" | "grouped" => Ok(PointGrouping::ByTypeAndHeight),
            other => Err(Error::configuration(format!(
                "Unknown point grouping '{}' (expected per_column or by_type_and_height)",
                other
            ))),
        }
    }
}

/// Options for one import run
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Identity of the logger that recorded the file
    pub logger_id: String,
    pub grouping: PointGrouping,
    /// Written to every config's `date_from`
    pub imported_at: DateTime<Utc>,
    pub height_reference: String,
}

impl BuildOptions {
    pub fn new(logger_id: impl Into<String>, imported_at: DateTime<Utc>) -> Self {
        Self {
            logger_id: logger_id.into(),
            grouping: PointGrouping::default(),
            imported_at,
            height_reference: DEFAULT_HEIGHT_REFERENCE.to_string(),
        }
    }

    pub fn with_grouping(mut self, grouping: PointGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_height_reference(mut self, height_reference: impl Into<String>) -> Self {
        self.height_reference = height_reference.into();
        self
    }

    fn date_from(&self) -> String {
        self.imported_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Build measurement points for every data column of a header row
///
/// The column at `timestamp_column` and blank headers are skipped. Header text is
/// copied into `column_name` without any normalization.
pub fn build_points(
    headers: &[String],
    timestamp_column: usize,
    options: &BuildOptions,
) -> Vec<MeasurementPoint> {
    let columns: Vec<ColumnInfo> = headers
        .iter()
        .enumerate()
        .filter(|(index, header)| *index != timestamp_column && !header.trim().is_empty())
        .map(|(_, header)| parse_column_header(header))
        .collect();

    debug!(
        "Building points for {} columns of logger {} ({:?})",
        columns.len(),
        options.logger_id,
        options.grouping
    );

    match options.grouping {
        PointGrouping::PerColumn => columns
            .iter()
            .map(|column| {
                let mut point = new_point(column, column.name.clone(), options);
                point
                    .logger_measurement_config
                    .push(new_config(vec![column_entry(column)], options));
                point
            })
            .collect(),
        PointGrouping::ByTypeAndHeight => group_by_type_and_height(&columns, options),
    }
}

fn group_by_type_and_height(columns: &[ColumnInfo], options: &BuildOptions) -> Vec<MeasurementPoint> {
    let mut groups: Vec<((MeasurementType, u64), &ColumnInfo, Vec<ColumnName>)> = Vec::new();

    for column in columns {
        let key = (column.measurement_type, effective_height(column).to_bits());
        match groups.iter_mut().find(|(existing, _, _)| *existing == key) {
            Some((_, _, entries)) => entries.push(column_entry(column)),
            None => groups.push((key, column, vec![column_entry(column)])),
        }
    }

    groups
        .into_iter()
        .map(|(_, first, entries)| {
            let name = format!(
                "{}_{}m",
                first.measurement_type.as_str(),
                format_height(effective_height(first))
            );
            let mut point = new_point(first, name, options);
            point
                .logger_measurement_config
                .push(new_config(entries, options));
            point
        })
        .collect()
}

fn effective_height(column: &ColumnInfo) -> f64 {
    column.height.unwrap_or(DEFAULT_IMPORT_HEIGHT_M)
}

fn new_point(column: &ColumnInfo, name: String, options: &BuildOptions) -> MeasurementPoint {
    MeasurementPoint {
        name: Some(name),
        measurement_type_id: Some(column.measurement_type.as_str().to_string()),
        height_m: Some(effective_height(column)),
        height_reference_id: Some(options.height_reference.clone()),
        unit: column.unit.clone(),
        statistic_type_id: Some(column.statistic_type.as_str().to_string()),
        ..Default::default()
    }
}

fn new_config(column_name: Vec<ColumnName>, options: &BuildOptions) -> LoggerMeasurementConfig {
    LoggerMeasurementConfig {
        logger_id: Some(options.logger_id.clone()),
        date_from: Some(options.date_from()),
        date_to: None,
        is_ignored: Some(false),
        column_name,
        ..Default::default()
    }
}

fn column_entry(column: &ColumnInfo) -> ColumnName {
    ColumnName {
        column_name: Some(column.name.clone()),
        statistic_type_id: Some(column.statistic_type.as_str().to_string()),
        is_ignored: Some(false),
        ..Default::default()
    }
}

/// Render a height without a trailing `.0` for whole metres
pub fn format_height(height: f64) -> String {
    if height.fract() == 0.0 {
        format!("{:.0}", height)
    } else {
        height.to_string()
    }
}
