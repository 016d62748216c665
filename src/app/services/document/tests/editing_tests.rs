//! Tests for point merge, logger registration and bulk editing

use super::super::editing::{
    BulkEdit, PointSelector, apply_bulk_edit, ensure_logger, merge_imported_points, remove_points,
};
use super::{LOGGER_ID, complete_document, logger, point};
use crate::Error;
use crate::app::models::{MeasurementLocation, MeasurementType};
use chrono::{TimeZone, Utc};

fn location() -> MeasurementLocation {
    let mut document = complete_document();
    let mut location = document.measurement_location.remove(0);
    location.measurement_point.push(point("WS_60m", LOGGER_ID));
    location.measurement_point.push(point("Other_Logger_WS", "LOG-2"));
    location
}

fn names(location: &MeasurementLocation) -> Vec<&str> {
    location
        .measurement_point
        .iter()
        .map(|p| p.name.as_deref().unwrap())
        .collect()
}

mod merge_tests {
    use super::*;

    #[test]
    fn test_reimport_replaces_logger_points() {
        let mut location = location();

        let summary = merge_imported_points(
            &mut location,
            LOGGER_ID,
            vec![point("WS_100m", LOGGER_ID)],
        );

        assert_eq!(summary.replaced, 2);
        assert_eq!(summary.preserved, 1);
        assert_eq!(summary.added, 1);
        assert_eq!(names(&location), vec!["Other_Logger_WS", "WS_100m"]);
    }

    #[test]
    fn test_reimport_under_serial_number_replaces_points() {
        let mut location = MeasurementLocation::new("North Ridge Mast", 56.123, -3.456, "mast");
        let mut main_config = logger("L1");
        main_config.logger_serial_number = Some("SN1".to_string());
        location.logger_main_config.push(main_config);

        // An earlier document stamped the serial number into the config
        location.measurement_point.push(point("WS_80m", "SN1"));

        let logger_id = location.canonical_logger_id("SN1");
        assert_eq!(logger_id, "L1");
        let summary = merge_imported_points(
            &mut location,
            &logger_id,
            vec![point("WS_80m", &logger_id)],
        );
        assert_eq!(summary.replaced, 1);
        assert_eq!(summary.preserved, 0);

        let summary = merge_imported_points(&mut location, "SN1", vec![point("WS_80m", "L1")]);
        assert_eq!(summary.replaced, 1);
        assert_eq!(location.measurement_point.len(), 1);
    }

    #[test]
    fn test_import_for_new_logger_keeps_everything() {
        let mut location = location();

        let summary = merge_imported_points(&mut location, "LOG-3", vec![point("T_2m", "LOG-3")]);

        assert_eq!(summary.replaced, 0);
        assert_eq!(summary.preserved, 3);
        assert_eq!(location.measurement_point.len(), 4);
    }

    #[test]
    fn test_points_shared_between_loggers_are_preserved() {
        let mut location = location();
        let mut shared = point("Shared", LOGGER_ID);
        let mut second = shared.logger_measurement_config[0].clone();
        second.logger_id = Some("LOG-2".to_string());
        shared.logger_measurement_config.push(second);
        location.measurement_point.push(shared);

        merge_imported_points(&mut location, LOGGER_ID, Vec::new());

        assert_eq!(names(&location), vec!["Other_Logger_WS", "Shared"]);
    }

    #[test]
    fn test_manual_points_without_configs_are_preserved() {
        let mut location = location();
        location.measurement_point[0].logger_measurement_config.clear();

        let summary = merge_imported_points(&mut location, LOGGER_ID, Vec::new());

        assert_eq!(summary.replaced, 1);
        assert_eq!(names(&location), vec!["WS_80m", "Other_Logger_WS"]);
    }
}

mod logger_tests {
    use super::*;

    #[test]
    fn test_known_logger_not_duplicated() {
        let mut location = location();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        assert!(!ensure_logger(&mut location, LOGGER_ID, now));
        assert_eq!(location.logger_main_config.len(), 1);
    }

    #[test]
    fn test_unknown_logger_gets_stub() {
        let mut location = location();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        assert!(ensure_logger(&mut location, "SN-9931", now));

        let stub = location.find_logger("SN-9931").unwrap();
        assert_eq!(stub.logger_serial_number.as_deref(), Some("SN-9931"));
        assert_eq!(stub.date_from.as_deref(), Some("2024-03-01T12:00:00Z"));
        assert!(stub.logger_oem_id.is_none());
    }
}

mod bulk_edit_tests {
    use super::*;

    #[test]
    fn test_selector_criteria() {
        let location = location();

        let by_logger = PointSelector::all().with_logger("LOG-2");
        let selected: Vec<_> = location
            .measurement_point
            .iter()
            .filter(|p| by_logger.matches(p))
            .collect();
        assert_eq!(selected.len(), 1);

        let by_name_and_type = PointSelector::all()
            .with_names(["WS_80m", "WS_60m"])
            .with_measurement_type(MeasurementType::WindSpeed);
        assert_eq!(
            location
                .measurement_point
                .iter()
                .filter(|p| by_name_and_type.matches(p))
                .count(),
            2
        );

        assert!(PointSelector::all().is_unrestricted());
        assert!(!PointSelector::all().with_height(80.0).is_unrestricted());
    }

    #[test]
    fn test_bulk_edit_sets_fields() {
        let mut location = location();
        let selector = PointSelector::all().with_logger(LOGGER_ID);
        let edit = BulkEdit {
            height_m: Some(78.5),
            height_reference_id: Some("sea_level".to_string()),
            notes: Some("Boom moved".to_string()),
            ..Default::default()
        };

        let edited = apply_bulk_edit(&mut location, &selector, &edit).unwrap();

        assert_eq!(edited, 2);
        for point in &location.measurement_point[..2] {
            assert_eq!(point.height_m, Some(78.5));
            assert_eq!(point.height_reference_id.as_deref(), Some("sea_level"));
            assert_eq!(point.notes.as_deref(), Some("Boom moved"));
        }
        assert_eq!(location.measurement_point[2].height_m, Some(80.0));
    }

    #[test]
    fn test_bulk_edit_measurement_type() {
        let mut location = location();
        let selector = PointSelector::all().with_names(["WS_60m"]);
        let edit = BulkEdit {
            measurement_type: Some(MeasurementType::WindDirection),
            ..Default::default()
        };

        apply_bulk_edit(&mut location, &selector, &edit).unwrap();

        assert_eq!(
            location.measurement_point[1].measurement_type_id.as_deref(),
            Some("wind_direction")
        );
    }

    #[test]
    fn test_bulk_edit_rejects_bad_input() {
        let mut location = location();

        let empty = apply_bulk_edit(&mut location, &PointSelector::all(), &BulkEdit::default());
        assert!(matches!(empty, Err(Error::DataValidation { .. })));

        let bad_reference = BulkEdit {
            height_reference_id: Some("hub_height".to_string()),
            ..Default::default()
        };
        match apply_bulk_edit(&mut location, &PointSelector::all(), &bad_reference) {
            Err(Error::DataValidation { message }) => assert!(message.contains("hub_height")),
            other => panic!("Expected DataValidation error, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_points() {
        let mut location = location();

        let removed = remove_points(&mut location, &PointSelector::all().with_height(80.0));

        assert_eq!(removed, 3);
        assert!(location.measurement_point.is_empty());
    }

    #[test]
    fn test_remove_by_name() {
        let mut location = location();

        let removed = remove_points(&mut location, &PointSelector::all().with_names(["WS_60m"]));

        assert_eq!(removed, 1);
        assert_eq!(names(&location), vec!["WS_80m", "Other_Logger_WS"]);
    }
}
