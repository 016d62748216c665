//! Test utilities for document operations
//!
//! The fixtures here are shared with the validation tests: a minimally complete
//! document that passes both validators, and helpers for imported points.

use crate::app::models::{
    ColumnName, LoggerMainConfig, LoggerMeasurementConfig, MeasurementLocation, MeasurementPoint,
    Sensor, WraDocument,
};

// Test modules
mod editing_tests;
mod migration_tests;

pub const LOGGER_ID: &str = "LOG-1";

/// A sensor with every required field
pub fn sensor(serial: &str) -> Sensor {
    Sensor {
        oem: Some("Thies Clima".to_string()),
        model: Some("First Class Advanced".to_string()),
        serial_number: Some(serial.to_string()),
        sensor_type_id: Some("anemometer".to_string()),
        date_from: Some("2024-01-01T00:00:00Z".to_string()),
        ..Default::default()
    }
}

/// A point recorded by `logger_id` through one column
pub fn point(name: &str, logger_id: &str) -> MeasurementPoint {
    MeasurementPoint {
        name: Some(name.to_string()),
        measurement_type_id: Some("wind_speed".to_string()),
        height_m: Some(80.0),
        height_reference_id: Some("ground_level".to_string()),
        logger_measurement_config: vec![LoggerMeasurementConfig {
            logger_id: Some(logger_id.to_string()),
            date_from: Some("2024-01-01T00:00:00Z".to_string()),
            is_ignored: Some(false),
            column_name: vec![ColumnName {
                column_name: Some(name.to_string()),
                statistic_type_id: Some("avg".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// A logger with every required field
pub fn logger(id: &str) -> LoggerMainConfig {
    LoggerMainConfig {
        logger_oem_id: Some("Campbell Scientific".to_string()),
        logger_model_name: Some("CR1000X".to_string()),
        logger_serial_number: Some(id.to_string()),
        logger_id: Some(id.to_string()),
        date_from: Some("2024-01-01T00:00:00Z".to_string()),
        ..Default::default()
    }
}

/// Minimally complete document accepted by both validators
pub fn complete_document() -> WraDocument {
    let mut location = MeasurementLocation::new("North Ridge Mast", 56.123, -3.456, "mast");
    location.logger_main_config.push(logger(LOGGER_ID));

    let mut measurement = point("WS_80m", LOGGER_ID);
    measurement.sensor.push(sensor("S-001"));
    location.measurement_point.push(measurement);

    let mut document = WraDocument::skeleton(
        "Jane Analyst",
        "Example Wind Ltd",
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    );
    document.plant_name = Some("North Ridge".to_string());
    document.plant_type = Some("onshore_wind".to_string());
    document.measurement_location.push(location);
    document
}
