//! Required-field checks over the document tree
//!
//! Collects every violation in a single pass. Blank strings and empty lists count
//! as missing; a `height_m` of 0 is present, `null` is not.

use super::report::{ValidationIssue, ValidationResult};
use crate::app::models::{
    LoggerMainConfig, LoggerMeasurementConfig, MeasurementLocation, MeasurementPoint, Sensor,
    WraDocument,
};
use tracing::debug;

/// Check a document for missing mandatory fields
pub fn validate_required_fields(document: &WraDocument) -> ValidationResult {
    let mut result = ValidationResult::new();

    require_text(&mut result, "", "author", &document.author);
    require_text(&mut result, "", "organisation", &document.organisation);
    require_text(&mut result, "", "date", &document.date);
    require_text(&mut result, "", "version", &document.version);

    if document.measurement_location.is_empty() {
        result.add_error(at_least_one("measurement_location", "measurement location"));
    }

    for (index, location) in document.measurement_location.iter().enumerate() {
        check_location(&mut result, &format!("measurement_location[{}]", index), location);
    }

    debug!("Required-field check {}", result.summary());
    result
}

fn check_location(result: &mut ValidationResult, path: &str, location: &MeasurementLocation) {
    require_text(result, path, "name", &location.name);
    require_value(result, path, "latitude_ddeg", location.latitude_ddeg.is_some());
    require_value(result, path, "longitude_ddeg", location.longitude_ddeg.is_some());
    require_text(
        result,
        path,
        "measurement_station_type_id",
        &location.measurement_station_type_id,
    );

    if location.logger_main_config.is_empty() {
        result.add_error(at_least_one(&join(path, "logger_main_config"), "logger"));
    }
    for (index, logger) in location.logger_main_config.iter().enumerate() {
        check_logger(
            result,
            &format!("{}.logger_main_config[{}]", path, index),
            logger,
        );
    }

    if location.sensor_count() == 0 {
        result.add_error(at_least_one(path, "sensor"));
    }
    for (index, sensor) in location.sensors.iter().enumerate() {
        check_sensor(result, &format!("{}.sensors[{}]", path, index), sensor);
    }

    if location.measurement_point.is_empty() {
        result.add_error(at_least_one(&join(path, "measurement_point"), "measurement point"));
    }
    for (index, point) in location.measurement_point.iter().enumerate() {
        check_point(
            result,
            &format!("{}.measurement_point[{}]", path, index),
            point,
        );
    }
}

fn check_logger(result: &mut ValidationResult, path: &str, logger: &LoggerMainConfig) {
    require_text(result, path, "logger_oem_id", &logger.logger_oem_id);
    require_text(result, path, "logger_serial_number", &logger.logger_serial_number);
    require_text(result, path, "date_from", &logger.date_from);
}

fn check_point(result: &mut ValidationResult, path: &str, point: &MeasurementPoint) {
    require_text(result, path, "name", &point.name);
    require_text(result, path, "measurement_type_id", &point.measurement_type_id);
    require_value(result, path, "height_m", point.height_m.is_some());
    require_text(result, path, "height_reference_id", &point.height_reference_id);

    if point.logger_measurement_config.is_empty() {
        result.add_error(at_least_one(
            &join(path, "logger_measurement_config"),
            "logger measurement config",
        ));
    }
    for (index, config) in point.logger_measurement_config.iter().enumerate() {
        check_measurement_config(
            result,
            &format!("{}.logger_measurement_config[{}]", path, index),
            config,
        );
    }

    for (index, sensor) in point.sensor.iter().enumerate() {
        check_sensor(result, &format!("{}.sensor[{}]", path, index), sensor);
    }
}

fn check_measurement_config(
    result: &mut ValidationResult,
    path: &str,
    config: &LoggerMeasurementConfig,
) {
    require_text(result, path, "date_from", &config.date_from);

    if config.column_name.is_empty() {
        result.add_error(at_least_one(&join(path, "column_name"), "column name"));
    }
    for (index, column) in config.column_name.iter().enumerate() {
        let column_path = format!("{}.column_name[{}]", path, index);
        require_text(result, &column_path, "column_name", &column.column_name);
        require_text(result, &column_path, "statistic_type_id", &column.statistic_type_id);
    }
}

fn check_sensor(result: &mut ValidationResult, path: &str, sensor: &Sensor) {
    require_text(result, path, "oem", &sensor.oem);
    require_text(result, path, "model", &sensor.model);
    require_text(result, path, "serial_number", &sensor.serial_number);
    require_text(result, path, "sensor_type_id", &sensor.sensor_type_id);
    require_text(result, path, "date_from", &sensor.date_from);
}

// =============================================================================
// Helpers
// =============================================================================

fn join(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

fn require_text(result: &mut ValidationResult, parent: &str, field: &str, value: &Option<String>) {
    let present = value.as_deref().is_some_and(|text| !text.trim().is_empty());
    require_value(result, parent, field, present);
}

fn require_value(result: &mut ValidationResult, parent: &str, field: &str, present: bool) {
    if !present {
        result.add_error(ValidationIssue::missing(join(parent, field), field));
    }
}

fn at_least_one(path: &str, what: &str) -> ValidationIssue {
    ValidationIssue::new(path, format!("At least one {} is required", what))
        .with_keyword("minItems")
}
