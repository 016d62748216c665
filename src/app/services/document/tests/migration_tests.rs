//! Tests for legacy sensor migration

use super::super::migration::{migrate_document, migrate_legacy_sensors};
use super::{LOGGER_ID, complete_document, point, sensor};

#[test]
fn test_legacy_sensors_move_to_points_without_sensors() {
    let mut document = complete_document();
    let location = &mut document.measurement_location[0];
    location.measurement_point.push(point("WD_78m", LOGGER_ID));
    location.sensors.push(sensor("LEGACY-1"));

    let migrated = migrate_legacy_sensors(location);

    assert_eq!(migrated, 1);
    assert!(location.sensors.is_empty());
    assert_eq!(
        location.measurement_point[0].sensor[0].serial_number.as_deref(),
        Some("S-001"),
        "existing point sensors are kept"
    );
    assert_eq!(
        location.measurement_point[1].sensor[0].serial_number.as_deref(),
        Some("LEGACY-1")
    );
}

#[test]
fn test_location_without_points_keeps_legacy_sensors() {
    let mut document = complete_document();
    let location = &mut document.measurement_location[0];
    location.measurement_point.clear();
    location.sensors.push(sensor("LEGACY-1"));

    assert_eq!(migrate_legacy_sensors(location), 0);
    assert_eq!(location.sensors.len(), 1);
}

#[test]
fn test_legacy_sensors_kept_when_every_point_has_sensors() {
    let mut document = complete_document();
    let location = &mut document.measurement_location[0];
    location.sensors.push(sensor("LEGACY-1"));

    assert_eq!(migrate_legacy_sensors(location), 0);
    assert_eq!(
        location.sensors[0].serial_number.as_deref(),
        Some("LEGACY-1")
    );
    assert_eq!(location.sensor_count(), 2);
}

#[test]
fn test_migration_runs_once() {
    let mut document = complete_document();
    document.measurement_location[0].measurement_point[0]
        .sensor
        .clear();
    document.measurement_location[0]
        .sensors
        .push(sensor("LEGACY-1"));

    assert_eq!(migrate_document(&mut document), 1);
    assert_eq!(migrate_document(&mut document), 0);
    assert_eq!(document.measurement_location[0].sensor_count(), 1);
}
