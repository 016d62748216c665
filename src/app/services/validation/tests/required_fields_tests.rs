//! Tests for the required-fields validator

use super::super::required_fields::validate_required_fields;
use super::{complete_document, error_paths, sensor};
use crate::app::models::WraDocument;

#[test]
fn test_complete_document_passes() {
    let result = validate_required_fields(&complete_document());

    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    assert!(result.errors.is_empty());
}

#[test]
fn test_empty_document_reports_every_root_field() {
    let result = validate_required_fields(&WraDocument::default());

    assert!(!result.is_valid);
    assert_eq!(
        error_paths(&result),
        vec!["author", "organisation", "date", "version", "measurement_location"]
    );
    assert_eq!(result.errors[0].message, "Missing required field: author");
}

#[test]
fn test_missing_author() {
    let mut document = complete_document();
    document.author = None;

    let result = validate_required_fields(&document);

    assert_eq!(error_paths(&result), vec!["author"]);
}

#[test]
fn test_blank_strings_count_as_missing() {
    let mut document = complete_document();
    document.organisation = Some("   ".to_string());
    document.measurement_location[0].name = Some(String::new());

    let result = validate_required_fields(&document);

    assert_eq!(
        error_paths(&result),
        vec!["organisation", "measurement_location[0].name"]
    );
}

#[test]
fn test_zero_height_is_valid_null_is_not() {
    let mut document = complete_document();
    document.measurement_location[0].measurement_point[0].height_m = Some(0.0);
    assert!(validate_required_fields(&document).is_valid);

    document.measurement_location[0].measurement_point[0].height_m = None;
    let result = validate_required_fields(&document);
    assert_eq!(
        error_paths(&result),
        vec!["measurement_location[0].measurement_point[0].height_m"]
    );
}

#[test]
fn test_logger_paths_are_indexed() {
    let mut document = complete_document();
    let mut second = document.measurement_location[0].logger_main_config[0].clone();
    second.logger_oem_id = None;
    second.date_from = None;
    document.measurement_location[0]
        .logger_main_config
        .push(second);

    let result = validate_required_fields(&document);

    assert_eq!(
        error_paths(&result),
        vec![
            "measurement_location[0].logger_main_config[1].logger_oem_id",
            "measurement_location[0].logger_main_config[1].date_from",
        ]
    );
}

#[test]
fn test_location_needs_logger_point_and_sensor() {
    let mut document = complete_document();
    let location = &mut document.measurement_location[0];
    location.logger_main_config.clear();
    location.measurement_point.clear();

    let result = validate_required_fields(&document);

    assert_eq!(
        error_paths(&result),
        vec![
            "measurement_location[0].logger_main_config",
            "measurement_location[0]",
            "measurement_location[0].measurement_point",
        ]
    );
    assert!(result.errors[1].message.contains("sensor"));
}

#[test]
fn test_legacy_sensors_count_and_are_checked() {
    let mut document = complete_document();
    let location = &mut document.measurement_location[0];
    location.measurement_point[0].sensor.clear();
    let mut legacy = sensor("LEGACY-1");
    legacy.model = None;
    location.sensors.push(legacy);

    let result = validate_required_fields(&document);

    assert_eq!(
        error_paths(&result),
        vec!["measurement_location[0].sensors[0].model"]
    );
}

#[test]
fn test_point_sensor_fields_checked() {
    let mut document = complete_document();
    document.measurement_location[0].measurement_point[0].sensor[0].sensor_type_id = None;

    let result = validate_required_fields(&document);

    assert_eq!(
        error_paths(&result),
        vec!["measurement_location[0].measurement_point[0].sensor[0].sensor_type_id"]
    );
}

#[test]
fn test_measurement_config_requirements() {
    let mut document = complete_document();
    let point = &mut document.measurement_location[0].measurement_point[0];
    point.logger_measurement_config[0].date_from = None;
    point.logger_measurement_config[0].column_name[0].statistic_type_id = None;

    let result = validate_required_fields(&document);
    assert_eq!(
        error_paths(&result),
        vec![
            "measurement_location[0].measurement_point[0].logger_measurement_config[0].date_from",
            "measurement_location[0].measurement_point[0].logger_measurement_config[0].column_name[0].statistic_type_id",
        ]
    );

    let point = &mut document.measurement_location[0].measurement_point[0];
    point.logger_measurement_config[0].column_name.clear();
    point.logger_measurement_config[0].date_from = Some("2024-01-01T00:00:00Z".to_string());
    let result = validate_required_fields(&document);
    assert_eq!(
        error_paths(&result),
        vec!["measurement_location[0].measurement_point[0].logger_measurement_config[0].column_name"]
    );

    document.measurement_location[0].measurement_point[0]
        .logger_measurement_config
        .clear();
    let result = validate_required_fields(&document);
    assert_eq!(
        error_paths(&result),
        vec!["measurement_location[0].measurement_point[0].logger_measurement_config"]
    );
}
