//! Test utilities for logger CSV import
//!
//! Shared fixtures used by the column header, structure and point builder tests.

use chrono::{DateTime, TimeZone, Utc};


/// Build owned CSV rows from string literals
pub fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// Header row of a typical met mast logger export
pub fn mast_headers() -> Vec<String> {
    [
        "Timestamp",
        "WS_80m_Avg",
        "WS_80m_SD",
        "WD_78m",
        "Temp_2m",
        "Pressure_hPa",
    ]
    .iter()
    .map(|header| header.to_string())
    .collect()
}

/// Fixed import time so generated `date_from` values are predictable
pub fn import_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}
