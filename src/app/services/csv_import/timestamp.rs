//! Timestamp recognition for logger CSV cells
//!
//! Logger exports use a handful of timestamp layouts. A cell is accepted when it
//! matches one of the literal layouts below, tried in order, or when a generic
//! calendar parse succeeds. Day-first and month-first slash layouts are accepted
//! by separate rules and are never disambiguated.

use crate::constants::TIMESTAMP_KEYWORDS;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Which rule accepted a timestamp cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Header label such as "Timestamp" or "Date/Time (UTC)"
    HeaderLabel,
    /// `YYYY-MM-DDTHH:mm:ss[.fff][Z|±HH:mm]`
    Iso8601,
    /// `DD/MM/YYYY HH:mm`
    DayMonthYear,
    /// `MM/DD/YYYY H:mm[:ss][AM/PM]`
    MonthDayYear,
    /// `YYYY/MM/DD H:mm[:ss]`
    YearMonthDay,
    /// `YYYYMMDD_HHMMSS`
    Compact,
    /// Ten-digit Unix epoch seconds
    UnixSeconds,
    /// Accepted by the generic calendar parse
    Calendar,
}

static ISO_8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$")
        .expect("valid ISO-8601 pattern")
});

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4} \d{2}:\d{2}$").expect("valid DD/MM pattern"));

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}(:\d{2})?\s*([AaPp][Mm])?$")
        .expect("valid MM/DD pattern")
});

static YEAR_MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}/\d{2}/\d{2} \d{1,2}:\d{2}(:\d{2})?$").expect("valid YYYY/MM/DD pattern")
});

static COMPACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}_\d{6}$").expect("valid compact pattern"));

static UNIX_SECONDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid epoch pattern"));

/// Layouts tried by the generic calendar fallback
const CALENDAR_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%dT%H:%M",
];

const CALENDAR_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

/// Whether a CSV cell looks like a timestamp
pub fn is_valid_timestamp(value: &str) -> bool {
    classify_timestamp(value).is_some()
}

/// Report which rule accepts a cell, if any
pub fn classify_timestamp(value: &str) -> Option<TimestampFormat> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_header_label(trimmed) {
        return Some(TimestampFormat::HeaderLabel);
    }

    let literal_rules: [(&Lazy<Regex>, TimestampFormat); 6] = [
        (&ISO_8601, TimestampFormat::Iso8601),
        (&DAY_MONTH_YEAR, TimestampFormat::DayMonthYear),
        (&MONTH_DAY_YEAR, TimestampFormat::MonthDayYear),
        (&YEAR_MONTH_DAY, TimestampFormat::YearMonthDay),
        (&COMPACT, TimestampFormat::Compact),
        (&UNIX_SECONDS, TimestampFormat::UnixSeconds),
    ];

    literal_rules
        .iter()
        .find(|(pattern, _)| pattern.is_match(trimmed))
        .map(|(_, format)| *format)
        .or_else(|| parses_as_calendar(trimmed).then_some(TimestampFormat::Calendar))
}

/// Header labels pass so the header row is never flagged as a bad timestamp
///
/// A label has a word starting with a timestamp keyword. Hyphens do not split
/// words: "Local time" and "Date/Time (UTC)" are labels, "not-a-date" is data.
fn is_header_label(value: &str) -> bool {
    value
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .any(|word| {
            TIMESTAMP_KEYWORDS
                .iter()
                .any(|keyword| word.starts_with(keyword))
        })
}

/// Generic calendar parse used when no literal layout matches
fn parses_as_calendar(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_rfc2822(value).is_ok()
        || CALENDAR_DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || CALENDAR_DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
}
