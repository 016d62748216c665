//! WRA document operations
//!
//! Everything the command line does to a document between loading and saving it:
//! merging imported points, registering loggers, bulk edits and deletions, and
//! the one-time migration of legacy location-level sensors.
//!
//! ## Architecture
//!
//! - [`store`] - Asynchronous load/save of JSON document files
//! - [`editing`] - Point merge, logger registration, bulk edit and removal
//! - [`migration`] - Legacy location-level sensor migration

pub mod editing;
pub mod migration;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use editing::{
    BulkEdit, MergeSummary, PointSelector, apply_bulk_edit, ensure_logger, merge_imported_points,
    remove_points,
};
pub use migration::{migrate_document, migrate_legacy_sensors};
pub use store::{load_document, save_document};
