//! Column header inference for logger data files
//!
//! Logger column names are free-form ("WS_80m_Avg", "WindDir 78m SD",
//! "WindShear_40m-60m"). This module turns one header into a [`ColumnInfo`]
//! describing measurement type, height, unit and statistic.
//!
//! Matching is case-insensitive and runs over three views of the header:
//! - the lower-cased header, for unit and height patterns
//! - a compact form with separators removed, so "Wind Speed", "wind_speed" and
//!   "WindSpeed" look alike
//! - word tokens split at separators, camelCase humps and letter/digit boundaries
//!
//! The measurement-type rules form an ordered cascade. More specific rules come
//! first ("vertical wind speed" before "wind speed") and the first match wins.
//! Inference never fails: unrecognised headers come back as `other`/`avg` with no
//! height or unit.

use crate::app::models::{ColumnInfo, MeasurementType, StatisticType};
use crate::constants::UNIT_PATTERNS;
use once_cell::sync::Lazy;
use regex::Regex;

/// Single-height patterns, tried in order on the lower-cased header
static HEIGHT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "40m", "80.5m" not followed by a letter (skips "10min")
        r"(\d+(?:\.\d+)?)m(?:[^a-z]|$)",
        // "_80mavg" but not the averaging period in "_10min"
        r"_(\d+(?:\.\d+)?)m(?:[^i]|$)",
        // "80 m"
        r"(\d+(?:\.\d+)?)\s+m\b",
        // "height80", "height_80"
        r"height[\s_:=-]*(\d+(?:\.\d+)?)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid height pattern"))
    .collect()
});

/// Fallback when no height pattern matches: the first run of digits that is not
/// an averaging period ("10min")
static FIRST_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(min)?").expect("valid digit pattern"));

/// Height range used by shear and veer columns ("40m-60m")
static HEIGHT_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)m?\s*-\s*(\d+(?:\.\d+)?)m").expect("valid height range pattern")
});

/// Parse a logger column header into measurement metadata
///
/// The returned `name` is the header exactly as given.
pub fn parse_column_header(header: &str) -> ColumnInfo {
    let view = HeaderView::new(header);

    let (measurement_type, forced_statistic) = classify_measurement(&view);
    let statistic_type = forced_statistic.unwrap_or_else(|| detect_statistic(&view));

    let height = if measurement_type.spans_heights() {
        extract_height_range(&view.lowered).or_else(|| extract_height(&view.lowered))
    } else {
        extract_height(&view.lowered)
    };

    ColumnInfo {
        name: header.to_string(),
        measurement_type,
        height,
        unit: extract_unit(&view.lowered),
        statistic_type,
    }
}

/// Lower-cased, compact and tokenized views of one header
struct HeaderView {
    lowered: String,
    compact: String,
    tokens: Vec<String>,
}

impl HeaderView {
    fn new(header: &str) -> Self {
        let lowered = header.to_lowercase();
        let compact = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
        Self {
            lowered,
            compact,
            tokens: tokenize(header),
        }
    }

    fn has_token(&self, candidates: &[&str]) -> bool {
        self.tokens
            .iter()
            .any(|token| candidates.contains(&token.as_str()))
    }

    fn compact_contains(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.compact.contains(needle))
    }

    /// A "min"/"minimum" token that is not the unit of a duration ("10min")
    fn has_minimum_token(&self) -> bool {
        self.tokens.iter().enumerate().any(|(index, token)| {
            matches!(token.as_str(), "min" | "minimum") && !self.follows_number(index)
        })
    }

    fn follows_number(&self, index: usize) -> bool {
        index > 0 && self.tokens[index - 1].chars().all(|c| c.is_ascii_digit())
    }

    /// Mentions a quantity other than wind, so a bare statistic token is not wind
    fn mentions_non_wind_quantity(&self) -> bool {
        self.compact_contains(&["temp", "press", "baro", "humid", "wave"])
            || self.has_token(&["rh", "tmp", "bp"])
    }
}

/// Split a header into lower-case word tokens
///
/// Boundaries are non-alphanumeric characters, lower-to-upper camelCase humps,
/// the end of an acronym followed by a capitalised word ("WSMax" -> ws, max), and
/// transitions between letters and digits.
pub fn tokenize(header: &str) -> Vec<String> {
    let chars: Vec<char> = header.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = index.checked_sub(1).and_then(|i| chars.get(i)) {
            let next = chars.get(index + 1).copied();
            let boundary = prev.is_alphanumeric()
                && ((prev.is_lowercase() && ch.is_uppercase())
                    || (prev.is_alphabetic() && ch.is_ascii_digit())
                    || (prev.is_ascii_digit() && ch.is_alphabetic())
                    || (prev.is_uppercase()
                        && ch.is_uppercase()
                        && next.is_some_and(char::is_lowercase)));
            if boundary && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        }

        current.extend(ch.to_lowercase());
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// First unit token found in the lower-cased header
fn extract_unit(lowered: &str) -> Option<String> {
    UNIT_PATTERNS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, unit)| unit.to_string())
}

/// Single measurement height in metres
fn extract_height(lowered: &str) -> Option<f64> {
    HEIGHT_PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(lowered)
                .and_then(|captures| captures.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .or_else(|| {
            FIRST_DIGITS
                .captures_iter(lowered)
                .find(|captures| captures.get(2).is_none())
                .and_then(|captures| captures.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
}

/// Mean of a "NNm-NNm" height range
fn extract_height_range(lowered: &str) -> Option<f64> {
    let captures = HEIGHT_RANGE.captures(lowered)?;
    let lower = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let upper = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some((lower + upper) / 2.0)
}

/// Ordered measurement-type cascade
///
/// Returns the type and, for branches that imply one, a fixed statistic.
fn classify_measurement(view: &HeaderView) -> (MeasurementType, Option<StatisticType>) {
    if is_vertical_wind_speed(view) {
        (MeasurementType::VerticalWindSpeed, None)
    } else if is_wind_speed(view) {
        (MeasurementType::WindSpeed, None)
    } else if is_wind_direction(view) {
        (MeasurementType::WindDirection, None)
    } else if view.compact.contains("gust") {
        (MeasurementType::WindSpeed, Some(StatisticType::Gust))
    } else if view.compact.contains("wind") && view.has_token(&["max", "maximum"]) {
        (MeasurementType::WindSpeed, Some(StatisticType::Max))
    } else if view.compact.contains("wind") && view.has_minimum_token() {
        (MeasurementType::WindSpeed, Some(StatisticType::Min))
    } else if is_standard_deviation(view) && !view.mentions_non_wind_quantity() {
        (MeasurementType::WindSpeed, Some(StatisticType::Sd))
    } else if view.compact.contains("shear") {
        (MeasurementType::WindShear, None)
    } else if view.compact.contains("veer") {
        (MeasurementType::WindVeer, None)
    } else if is_turbulence_intensity(view) {
        (MeasurementType::WindSpeed, Some(StatisticType::Ti))
    } else if view.compact_contains(&["temp", "airtemp"]) || view.has_token(&["tmp", "tair"]) {
        (MeasurementType::AirTemperature, None)
    } else if view.compact_contains(&["press", "baro", "hpa", "mbar"]) || view.has_token(&["bp"]) {
        (MeasurementType::AirPressure, None)
    } else if view.compact.contains("humid") || view.has_token(&["rh", "hum"]) {
        (MeasurementType::RelativeHumidity, None)
    } else if let Some(wave_type) = classify_wave(view) {
        (wave_type, None)
    } else if view.compact_contains(&["gps", "latitude", "longitude", "position"])
        || view.has_token(&["lat", "lon", "lng", "long"])
    {
        (MeasurementType::Position, None)
    } else {
        (MeasurementType::Other, None)
    }
}

fn is_vertical_wind_speed(view: &HeaderView) -> bool {
    view.has_token(&["vws"])
        || (view.compact.contains("vert")
            && (view.compact_contains(&["wind", "speed", "spd"]) || view.has_token(&["ws"])))
}

fn is_wind_speed(view: &HeaderView) -> bool {
    view.compact_contains(&["windspeed", "wspd", "anemometer"])
        || view.has_token(&["ws", "spd", "speed", "anem"])
}

fn is_wind_direction(view: &HeaderView) -> bool {
    // Wave and swell directions are handled by the wave rules further down
    if view.compact_contains(&["wave", "swell"]) || view.has_token(&["mwd", "pwd"]) {
        return false;
    }
    view.compact_contains(&["winddir", "direction", "vane"])
        || view.has_token(&["wd", "wdir", "dir"])
}

fn is_standard_deviation(view: &HeaderView) -> bool {
    view.has_token(&["sd", "std", "stdev", "stddev", "sigma"])
        || view.compact_contains(&["stdev", "stddev", "standarddeviation"])
}

fn is_turbulence_intensity(view: &HeaderView) -> bool {
    view.compact.contains("turbulence") || view.has_token(&["ti", "turb"])
}

fn classify_wave(view: &HeaderView) -> Option<MeasurementType> {
    let wave_context = view.compact_contains(&["wave", "swell"])
        || view.compact_contains(&["hm0", "hmax", "tm02", "tm01"])
        || view.has_token(&["hs", "swh", "tp", "tz", "mwd", "pwd"]);
    if !wave_context {
        return None;
    }

    let wave_type = if view.compact_contains(&["significant", "hm0"]) || view.has_token(&["hs", "swh"])
    {
        MeasurementType::WaveSignificantHeight
    } else if view.compact_contains(&["hmax", "maxheight", "maximumheight", "wavemax", "maxwave"])
    {
        MeasurementType::WaveMaximumHeight
    } else if view.compact.contains("peakperiod") || view.has_token(&["tp"]) {
        MeasurementType::WavePeakPeriod
    } else if view.compact_contains(&["period", "tm02", "tm01"]) || view.has_token(&["tz"]) {
        MeasurementType::WavePeriod
    } else if view.compact_contains(&["direction", "dir"]) || view.has_token(&["mwd", "pwd"]) {
        MeasurementType::WaveDirection
    } else {
        MeasurementType::WaveHeight
    };
    Some(wave_type)
}

/// Statistic named by the header's tokens, `avg` when none is present
fn detect_statistic(view: &HeaderView) -> StatisticType {
    if view.compact.contains("gust") {
        return StatisticType::Gust;
    }
    if is_turbulence_intensity(view) {
        return StatisticType::Ti;
    }
    if is_standard_deviation(view) {
        return StatisticType::Sd;
    }

    for (index, token) in view.tokens.iter().enumerate() {
        match token.as_str() {
            "max" | "maximum" => return StatisticType::Max,
            // "10min" is an averaging period, not a minimum
            "min" | "minimum" if !view.follows_number(index) => return StatisticType::Min,
            "sum" | "total" => return StatisticType::Sum,
            "count" | "cnt" => return StatisticType::Count,
            "median" | "med" => return StatisticType::Median,
            _ => {}
        }
    }

    StatisticType::Avg
}
