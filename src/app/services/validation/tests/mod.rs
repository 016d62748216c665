//! Test utilities for validation and export
//!
//! Documents come from the document-service fixtures so both test suites share
//! one definition of a minimally complete document.

pub use crate::app::services::document::tests::{LOGGER_ID, complete_document, point, sensor};

use super::schema_compliance::SchemaValidator;

mod required_fields_tests;

/// The built-in schema, compiled
pub fn builtin_validator() -> SchemaValidator {
    SchemaValidator::builtin().expect("built-in schema compiles")
}

/// Paths of a result's errors, for compact assertions
pub fn error_paths(result: &super::report::ValidationResult) -> Vec<&str> {
    result.errors.iter().map(|issue| issue.path.as_str()).collect()
}
