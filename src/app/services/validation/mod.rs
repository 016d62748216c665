//! Document validation and export gating
//!
//! Two independent tiers run before a document may be exported:
//! - [`required_fields`] walks the document tree and reports every missing
//!   mandatory field with a dotted/indexed path
//! - [`schema_compliance`] validates the cleaned export JSON against the
//!   IEA Task 43 JSON-Schema
//!
//! Export proceeds only when neither tier reports an error. Warnings are
//! informational and never block.
//!
//! - [`report`] - Shared issue and result types
//! - [`export`] - Form-field stripping, the export gate and output writing

pub mod export;
pub mod report;
pub mod required_fields;
pub mod schema_compliance;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use export::{ExportReport, check_export, clean_for_export, write_export};
pub use report::{ValidationIssue, ValidationResult};
pub use required_fields::validate_required_fields;
pub use schema_compliance::SchemaValidator;
