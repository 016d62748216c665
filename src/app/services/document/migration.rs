//! Migration of legacy location-level sensors
//!
//! Older documents list sensors once per location. The current data model keeps
//! them on each measurement point, so the legacy list is copied onto every point
//! that has no sensors of its own and then cleared.

use crate::app::models::{MeasurementLocation, WraDocument};
use tracing::info;

/// Move a location's legacy sensors onto its points
///
/// Returns the number of points that received sensors. Points that already have
/// sensors keep theirs. The legacy list is cleared only once some point has
/// taken it, so a location whose points all carry sensors (or that has no points
/// yet) keeps it.
pub fn migrate_legacy_sensors(location: &mut MeasurementLocation) -> usize {
    if location.sensors.is_empty()
        || !location
            .measurement_point
            .iter()
            .any(|point| point.sensor.is_empty())
    {
        return 0;
    }

    let legacy = std::mem::take(&mut location.sensors);
    let mut migrated = 0;
    for point in location
        .measurement_point
        .iter_mut()
        .filter(|point| point.sensor.is_empty())
    {
        point.sensor = legacy.clone();
        migrated += 1;
    }

    migrated
}

/// Migrate every location of a document, returning the number of points updated
pub fn migrate_document(document: &mut WraDocument) -> usize {
    let mut migrated = 0;
    for (index, location) in document.measurement_location.iter_mut().enumerate() {
        let count = migrate_legacy_sensors(location);
        if count > 0 {
            info!(
                "Moved legacy sensors of {} onto {} point(s)",
                location.display_name(index),
                count
            );
        }
        migrated += count;
    }
    migrated
}
