// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::MISSING;

const NULL_MARKERS: [&str; 7] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Formatting used for every normalized date written back into a table.
pub const NORMALIZED_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// True for cells that carry no value in a raw CSV.
pub fn is_null_cell(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NULL_MARKERS.contains(&trimmed)
}

/// True for cells that are empty, a null marker, or the missing marker.
pub fn is_missing(cell: &str) -> bool {
    cell == MISSING || is_null_cell(cell)
}

/// Parses a date/time cell into wall-clock time.
///
/// Accepts ISO dates, date-times with an optional ` UTC` suffix and RFC 3339
/// timestamps. Offsets are dropped, keeping the local wall time.
pub fn parse_datetime(date_str: &str) -> Option<NaiveDateTime> {
    if is_missing(date_str) {
        return None;
    }
    let trimmed = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f %z") {
        return Some(dt.naive_local());
    }

    let without_zone = trimmed
        .strip_suffix("UTC")
        .map(str::trim_end)
        .unwrap_or(trimmed);

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(without_zone, format) {
            return Some(dt);
        }
    }

    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(without_zone, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses a numeric cell; anything that is not a finite number becomes `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turns an optional value into a table cell.
pub fn cell_or_missing(value: Option<String>) -> String {
    value.unwrap_or_else(|| MISSING.to_string())
}
