//! Point and logger editing on a measurement location

use crate::app::models::{LoggerMainConfig, MeasurementLocation, MeasurementPoint, MeasurementType};
use crate::constants::HEIGHT_REFERENCES;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

// =============================================================================
// Import Merge
// =============================================================================

/// Outcome of merging imported points into a location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// Points previously owned by the importing logger and now replaced
    pub replaced: usize,
    /// Points left untouched
    pub preserved: usize,
    /// Points added by this import
    pub added: usize,
}

/// Merge freshly imported points into a location
///
/// Points owned by `logger_id` (every config references it) are replaced by the
/// new set; all other points are kept in their original order ahead of the new
/// ones. Re-importing a file for the same logger is therefore idempotent. When
/// the logger is configured, configs naming it by either its id or its serial
/// number count as owned.
pub fn merge_imported_points(
    location: &mut MeasurementLocation,
    logger_id: &str,
    points: Vec<MeasurementPoint>,
) -> MergeSummary {
    let logger = location.find_logger(logger_id).cloned();
    let before = location.measurement_point.len();
    location.measurement_point.retain(|point| match &logger {
        Some(logger) => !point.is_owned_by_logger(logger),
        None => !point.is_owned_by(logger_id),
    });
    let preserved = location.measurement_point.len();

    let summary = MergeSummary {
        replaced: before - preserved,
        preserved,
        added: points.len(),
    };

    location.measurement_point.extend(points);
    debug!("Merged points for logger {}: {:?}", logger_id, summary);
    summary
}

/// Make sure a logger with the given identity exists at the location
///
/// Returns true when a stub logger was added. The stub carries the identifier as
/// both logger id and serial number; its manufacturer is left for the user.
pub fn ensure_logger(location: &mut MeasurementLocation, logger_id: &str, now: DateTime<Utc>) -> bool {
    if location.find_logger(logger_id).is_some() {
        return false;
    }

    warn!(
        "Logger '{}' is not configured at this location; adding a stub logger",
        logger_id
    );
    location.logger_main_config.push(LoggerMainConfig {
        logger_id: Some(logger_id.to_string()),
        logger_serial_number: Some(logger_id.to_string()),
        date_from: Some(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ..Default::default()
    });
    true
}

// =============================================================================
// Selection
// =============================================================================

/// Criteria selecting measurement points; all given criteria must match
///
/// A selector without criteria selects every point.
#[derive(Debug, Clone, Default)]
pub struct PointSelector {
    /// Exact point names
    pub names: Vec<String>,
    pub measurement_type: Option<MeasurementType>,
    pub height_m: Option<f64>,
    /// Points owned by this logger
    pub logger_id: Option<String>,
}

impl PointSelector {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_measurement_type(mut self, measurement_type: MeasurementType) -> Self {
        self.measurement_type = Some(measurement_type);
        self
    }

    pub fn with_height(mut self, height_m: f64) -> Self {
        self.height_m = Some(height_m);
        self
    }

    pub fn with_logger(mut self, logger_id: impl Into<String>) -> Self {
        self.logger_id = Some(logger_id.into());
        self
    }

    /// True when no criterion is set
    pub fn is_unrestricted(&self) -> bool {
        self.names.is_empty()
            && self.measurement_type.is_none()
            && self.height_m.is_none()
            && self.logger_id.is_none()
    }

    pub fn matches(&self, point: &MeasurementPoint) -> bool {
        let name_matches = self.names.is_empty()
            || point
                .name
                .as_deref()
                .is_some_and(|name| self.names.iter().any(|wanted| wanted == name));

        let type_matches = self.measurement_type.is_none_or(|wanted| {
            point.measurement_type_id.as_deref() == Some(wanted.as_str())
        });

        let height_matches = self
            .height_m
            .is_none_or(|wanted| point.height_m.is_some_and(|h| (h - wanted).abs() < 1e-9));

        let logger_matches = self
            .logger_id
            .as_deref()
            .is_none_or(|logger_id| point.is_owned_by(logger_id));

        name_matches && type_matches && height_matches && logger_matches
    }
}

// =============================================================================
// Bulk Edit
// =============================================================================

/// Field values applied to every selected point
#[derive(Debug, Clone, Default)]
pub struct BulkEdit {
    pub height_m: Option<f64>,
    pub height_reference_id: Option<String>,
    pub measurement_type: Option<MeasurementType>,
    pub notes: Option<String>,
}

impl BulkEdit {
    pub fn is_empty(&self) -> bool {
        self.height_m.is_none()
            && self.height_reference_id.is_none()
            && self.measurement_type.is_none()
            && self.notes.is_none()
    }

    /// Reject edits that could never pass validation
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::data_validation("Bulk edit sets no fields"));
        }

        if let Some(height) = self.height_m {
            if !height.is_finite() {
                return Err(Error::data_validation(format!(
                    "Height must be a finite number, got {}",
                    height
                )));
            }
        }

        if let Some(reference) = &self.height_reference_id {
            if !HEIGHT_REFERENCES.contains(&reference.as_str()) {
                return Err(Error::data_validation(format!(
                    "Unknown height reference '{}' (expected one of: {})",
                    reference,
                    HEIGHT_REFERENCES.join(", ")
                )));
            }
        }

        Ok(())
    }

    fn apply(&self, point: &mut MeasurementPoint) {
        if let Some(height) = self.height_m {
            point.height_m = Some(height);
        }
        if let Some(reference) = &self.height_reference_id {
            point.height_reference_id = Some(reference.clone());
        }
        if let Some(measurement_type) = self.measurement_type {
            point.measurement_type_id = Some(measurement_type.as_str().to_string());
        }
        if let Some(notes) = &self.notes {
            point.notes = Some(notes.clone());
        }
    }
}

/// Apply one edit to every selected point, returning how many changed
pub fn apply_bulk_edit(
    location: &mut MeasurementLocation,
    selector: &PointSelector,
    edit: &BulkEdit,
) -> Result<usize> {
    edit.validate()?;

    let mut edited = 0;
    for point in location
        .measurement_point
        .iter_mut()
        .filter(|point| selector.matches(point))
    {
        edit.apply(point);
        edited += 1;
    }

    info!("Bulk edit applied to {} point(s)", edited);
    Ok(edited)
}

/// Delete every selected point, returning how many were removed
pub fn remove_points(location: &mut MeasurementLocation, selector: &PointSelector) -> usize {
    let before = location.measurement_point.len();
    location
        .measurement_point
        .retain(|point| !selector.matches(point));
    let removed = before - location.measurement_point.len();

    info!("Removed {} point(s)", removed);
    removed
}
