//! Export of schema-compliant documents
//!
//! The export copy of a document has legacy sensors migrated onto points and
//! every editing-only field removed. It is written only when both validation
//! tiers report zero errors.

use super::report::ValidationResult;
use super::required_fields::validate_required_fields;
use super::schema_compliance::{SchemaValidator, legacy_sensor_warning};
use crate::app::models::WraDocument;
use crate::app::services::document::migration::migrate_document;
use crate::app::services::document::store::write_json_file;
use crate::constants::{FORM_ONLY_FIELDS, FORM_ONLY_POINT_FIELDS, LEGACY_SENSORS_FIELD};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

/// Both validation tiers plus the export-ready JSON they were run against
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub required_fields: ValidationResult,
    pub schema: ValidationResult,
    #[serde(skip)]
    pub document: Value,
}

impl ExportReport {
    /// Export is allowed only when neither tier reported an error
    pub fn can_export(&self) -> bool {
        self.required_fields.errors.is_empty() && self.schema.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.required_fields.errors.len() + self.schema.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.required_fields.warnings.len() + self.schema.warnings.len()
    }
}

/// Build the export copy of a document
///
/// Legacy location-level sensors are migrated first, then root and location
/// form fields, point-level `unit`/`statistic_type_id` and any remaining legacy
/// sensor lists are removed. The input document is not modified.
pub fn clean_for_export(document: &WraDocument) -> Result<Value> {
    let mut export_copy = document.clone();
    migrate_document(&mut export_copy);

    let mut value = serde_json::to_value(&export_copy)
        .map_err(|e| Error::document("Failed to serialize document for export", Some(e)))?;

    if let Some(root) = value.as_object_mut() {
        strip_fields(root, FORM_ONLY_FIELDS);

        let locations = root
            .get_mut("measurement_location")
            .and_then(Value::as_array_mut);
        for location in locations.into_iter().flatten().filter_map(Value::as_object_mut) {
            strip_fields(location, FORM_ONLY_FIELDS);
            strip_fields(location, &[LEGACY_SENSORS_FIELD]);

            let points = location
                .get_mut("measurement_point")
                .and_then(Value::as_array_mut);
            for point in points.into_iter().flatten().filter_map(Value::as_object_mut) {
                strip_fields(point, FORM_ONLY_POINT_FIELDS);
            }
        }
    }

    Ok(value)
}

fn strip_fields(object: &mut Map<String, Value>, fields: &[&str]) {
    for field in fields {
        object.remove(*field);
    }
}

/// Run both validation tiers against a document
pub fn check_export(document: &WraDocument, validator: &SchemaValidator) -> Result<ExportReport> {
    let cleaned = clean_for_export(document)?;

    let required_fields = validate_required_fields(document);
    let mut schema = validator.validate(&cleaned);

    for (index, location) in document.measurement_location.iter().enumerate() {
        if !location.sensors.is_empty() {
            schema.add_warning(legacy_sensor_warning(format!(
                "measurement_location[{}].{}",
                index, LEGACY_SENSORS_FIELD
            )));
        }
    }

    Ok(ExportReport {
        required_fields,
        schema,
        document: cleaned,
    })
}

/// Write the export copy, refusing when validation reported errors
///
/// Nothing is written for a blocked export. An existing file is only replaced
/// when `force_overwrite` is set.
pub async fn write_export(report: &ExportReport, path: &Path, force_overwrite: bool) -> Result<()> {
    if !report.can_export() {
        warn!(
            "Export blocked by {} validation error(s)",
            report.error_count()
        );
        return Err(Error::export_blocked(
            report.required_fields.errors.len(),
            report.schema.errors.len(),
        ));
    }

    if path.exists() && !force_overwrite {
        return Err(Error::configuration(format!(
            "Output file {} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let content = serde_json::to_string_pretty(&report.document)
        .map_err(|e| Error::document("Failed to serialize export document", Some(e)))?;
    write_json_file(path, &content).await?;

    info!("Exported document to {}", path.display());
    Ok(())
}
