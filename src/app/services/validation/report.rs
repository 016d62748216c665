//! Validation result structures

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Dotted/indexed location, e.g. `measurement_location[0].name`
    pub path: String,
    /// Human-readable message
    pub message: String,
    /// JSON-Schema keyword that failed, for schema findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<Value>,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            keyword: None,
            expected_type: None,
            actual_value: None,
        }
    }

    /// Finding for a mandatory field that is absent or blank
    pub fn missing(path: impl Into<String>, field: &str) -> Self {
        Self::new(path, format!("Missing required field: {}", field)).with_keyword("required")
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    #[must_use]
    pub fn with_expected_type(mut self, expected_type: impl Into<String>) -> Self {
        self.expected_type = Some(expected_type.into());
        self
    }

    #[must_use]
    pub fn with_actual_value(mut self, value: Value) -> Self {
        self.actual_value = Some(value);
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of one validation tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// True when `errors` is empty
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.is_valid = false;
        self.errors.push(issue);
    }

    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// One-line summary for reports
    pub fn summary(&self) -> String {
        if self.is_valid {
            format!("passed with {} warning(s)", self.warnings.len())
        } else {
            format!(
                "failed with {} error(s) and {} warning(s)",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}
