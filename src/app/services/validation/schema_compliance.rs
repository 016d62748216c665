//! JSON-Schema compliance against the IEA Task 43 data model
//!
//! Validation itself is delegated to the `jsonschema` crate; this module turns
//! its errors into [`ValidationIssue`]s with readable messages and
//! dotted/indexed paths. Expected types, enum options and limits are read back
//! from the schema document at the failing keyword's location.

use super::report::{ValidationIssue, ValidationResult};
use crate::constants::LEGACY_SENSORS_FIELD;
use crate::{Error, Result};
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Reduced IEA Task 43 schema shipped with the crate
pub const BUILTIN_SCHEMA: &str = include_str!("../../../../schema/iea43_wra_data_model.schema.json");

/// Compiled JSON-Schema plus the raw document used to explain failures
pub struct SchemaValidator {
    validator: jsonschema::Validator,
    schema: Value,
    source: String,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile a schema document
    ///
    /// The draft is taken from the schema's `$schema`. Format assertions are
    /// enabled and `uuid` is checked for every draft.
    pub fn from_value(schema: Value, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .with_format("uuid", |value: &str| uuid::Uuid::parse_str(value).is_ok())
            .build(&schema)
            .map_err(|e| Error::schema(format!("Invalid JSON-Schema {}: {}", source, e)))?;

        debug!("Compiled JSON-Schema from {}", source);
        Ok(Self {
            validator,
            schema,
            source,
        })
    }

    /// The schema bundled with the crate
    pub fn builtin() -> Result<Self> {
        let schema: Value = serde_json::from_str(BUILTIN_SCHEMA)
            .map_err(|e| Error::schema(format!("Built-in schema is not valid JSON: {}", e)))?;
        Self::from_value(schema, "built-in IEA Task 43 schema")
    }

    /// Load and compile a schema file
    pub async fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(format!("Failed to read schema {}", path.display()), e))?;
        let schema: Value = serde_json::from_str(&content).map_err(|e| {
            Error::schema(format!("Schema {} is not valid JSON: {}", path.display(), e))
        })?;

        info!("Using JSON-Schema {}", path.display());
        Self::from_value(schema, path.display().to_string())
    }

    /// The configured schema file, or the built-in schema when none is given
    pub async fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path).await,
            None => Self::builtin(),
        }
    }

    /// Where the schema came from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Validate an export-ready JSON document
    ///
    /// Every schema violation becomes an error. Legacy location-level sensor
    /// lists are reported as warnings.
    pub fn validate(&self, instance: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();

        for error in self.validator.iter_errors(instance) {
            let instance_path = pointer_to_path(&error.instance_path.to_string());
            let schema_path = error.schema_path.to_string();
            let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();

            let issue = match &error.kind {
                ValidationErrorKind::Required { property, .. } => {
                    let field = property
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| property.to_string());
                    let path = if instance_path.is_empty() {
                        field.clone()
                    } else {
                        format!("{}.{}", instance_path, field)
                    };
                    ValidationIssue::missing(path, &field)
                }
                _ => {
                    let path = if instance_path.is_empty() {
                        pointer_to_path(&schema_path)
                    } else {
                        instance_path
                    };
                    let keyword_value = resolve_schema_node(&self.schema, &schema_path);
                    describe_violation(path, &keyword, keyword_value, &error.instance, || {
                        error.to_string()
                    })
                }
            };

            result.add_error(issue.with_keyword(keyword));
        }

        for path in legacy_sensor_paths(instance) {
            result.add_warning(legacy_sensor_warning(path));
        }

        debug!("Schema compliance {}", result.summary());
        result
    }
}

/// Warning for a location that still carries a legacy sensor list
pub fn legacy_sensor_warning(path: impl Into<String>) -> ValidationIssue {
    ValidationIssue::new(
        path,
        "Location-level sensors are a legacy shape; they are moved onto measurement points on export",
    )
    .with_keyword(LEGACY_SENSORS_FIELD)
}

fn legacy_sensor_paths(instance: &Value) -> Vec<String> {
    instance
        .get("measurement_location")
        .and_then(Value::as_array)
        .map(|locations| {
            locations
                .iter()
                .enumerate()
                .filter(|(_, location)| {
                    location
                        .get(LEGACY_SENSORS_FIELD)
                        .and_then(Value::as_array)
                        .is_some_and(|sensors| !sensors.is_empty())
                })
                .map(|(index, _)| format!("measurement_location[{}].{}", index, LEGACY_SENSORS_FIELD))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Message Translation
// =============================================================================

fn describe_violation(
    path: String,
    keyword: &str,
    keyword_value: Option<&Value>,
    actual: &Value,
    fallback: impl FnOnce() -> String,
) -> ValidationIssue {
    let issue = match (keyword, keyword_value) {
        ("enum", Some(Value::Array(options))) => {
            let options: Vec<String> = options.iter().map(display_value).collect();
            ValidationIssue::new(
                path,
                format!("Invalid value. Must be one of: {}", options.join(", ")),
            )
        }
        ("type", Some(expected)) => {
            let expected = match expected {
                Value::Array(kinds) => kinds.iter().map(display_value).collect::<Vec<_>>().join(" or "),
                other => display_value(other),
            };
            ValidationIssue::new(
                path,
                format!("Expected {}, got {}", expected, json_type_name(actual)),
            )
            .with_expected_type(expected)
        }
        ("format", Some(format)) => ValidationIssue::new(
            path,
            format!("Invalid format. Expected {}", display_value(format)),
        ),
        ("minimum", Some(limit)) => ValidationIssue::new(
            path,
            format!("Value must be at least {}", display_value(limit)),
        ),
        ("maximum", Some(limit)) => ValidationIssue::new(
            path,
            format!("Value must be at most {}", display_value(limit)),
        ),
        ("exclusiveMinimum", Some(limit)) => ValidationIssue::new(
            path,
            format!("Value must be greater than {}", display_value(limit)),
        ),
        ("exclusiveMaximum", Some(limit)) => ValidationIssue::new(
            path,
            format!("Value must be less than {}", display_value(limit)),
        ),
        ("minLength", Some(limit)) => ValidationIssue::new(
            path,
            format!("Must be at least {} character(s) long", display_value(limit)),
        ),
        ("maxLength", Some(limit)) => ValidationIssue::new(
            path,
            format!("Must be at most {} character(s) long", display_value(limit)),
        ),
        ("minItems", Some(limit)) => ValidationIssue::new(
            path,
            format!("Must contain at least {} item(s)", display_value(limit)),
        ),
        _ => ValidationIssue::new(path, fallback()),
    };

    issue.with_actual_value(actual.clone())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() || number.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Paths
// =============================================================================

fn pointer_segments(pointer: &str) -> impl Iterator<Item = String> + '_ {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
}

/// Render a JSON pointer as a dotted/indexed path (`/a/0/b` -> `a[0].b`)
pub fn pointer_to_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer_segments(pointer) {
        if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
            path.push_str(&format!("[{}]", segment));
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    path
}

/// Follow a keyword location through the schema, resolving local `$ref`s
fn resolve_schema_node<'a>(root: &'a Value, schema_path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in pointer_segments(schema_path) {
        if segment == "$ref" {
            node = follow_ref(root, node)?;
            continue;
        }
        node = match child(node, &segment) {
            Some(next) => next,
            None => child(follow_ref(root, node)?, &segment)?,
        };
    }
    Some(node)
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn follow_ref<'a>(root: &'a Value, node: &'a Value) -> Option<&'a Value> {
    let reference = node.get("$ref")?.as_str()?;
    root.pointer(reference.strip_prefix('#')?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pointer_to_path() {
        assert_eq!(
            pointer_to_path("/measurement_location/0/measurement_point/2/height_m"),
            "measurement_location[0].measurement_point[2].height_m"
        );
        assert_eq!(pointer_to_path(""), "");
        assert_eq!(pointer_to_path("/a~1b"), "a/b");
    }

    #[test]
    fn test_resolve_through_refs() {
        let schema = json!({
            "properties": {"items": {"type": "array", "items": {"$ref": "#/definitions/item"}}},
            "definitions": {"item": {"properties": {"kind": {"enum": ["a", "b"]}}}}
        });

        let with_ref = resolve_schema_node(
            &schema,
            "/properties/items/items/$ref/properties/kind/enum",
        );
        let without_ref =
            resolve_schema_node(&schema, "/properties/items/items/properties/kind/enum");

        assert_eq!(with_ref, Some(&json!(["a", "b"])));
        assert_eq!(without_ref, Some(&json!(["a", "b"])));
        assert_eq!(resolve_schema_node(&schema, "/properties/missing"), None);
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let result = SchemaValidator::from_value(json!({"type": 12}), "inline");
        assert!(matches!(result, Err(Error::Schema { .. })));
    }

    #[test]
    fn test_builtin_schema_compiles() {
        let validator = SchemaValidator::builtin().unwrap();
        assert!(validator.source().contains("built-in"));
    }
}
