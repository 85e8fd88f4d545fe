//! Type coercion for canonical rows.
//!
//! Nothing in here fails: a cell that cannot be read as the expected type
//! becomes `None` on the record and the row is kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{CanonicalRecord, Dataset};
use crate::schema::CanonicalRow;

/// Layout used when rendering timestamps back to text. Fractional seconds
/// are only written when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

static DATETIME_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a timestamp cell, trying RFC 3339 first and then the common
/// ISO-like layouts. Date-only values land on midnight.
pub fn parse_timestamp(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parses a PM2.5 cell. Empty, non-numeric and NaN values are missing data,
/// which is not the same as a reading of zero.
pub fn parse_pm25(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Blank city labels are absent; anything else passes through as-is.
pub fn parse_city(s: Option<&str>) -> Option<String> {
    s.filter(|c| !c.trim().is_empty()).map(str::to_string)
}

/// Converts canonical-shape rows into typed records.
pub fn coerce(rows: &[CanonicalRow]) -> Dataset {
    rows.iter()
        .map(|row| CanonicalRecord {
            timestamp: parse_timestamp(row.timestamp.as_deref()),
            city: parse_city(row.city.as_deref()),
            pm25: parse_pm25(row.pm25.as_deref()),
        })
        .collect()
}

/// Renders a typed record back to its canonical text form. Coercing the
/// result yields the original record.
impl From<&CanonicalRecord> for CanonicalRow {
    fn from(record: &CanonicalRecord) -> Self {
        CanonicalRow {
            timestamp: record
                .timestamp
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            city: record.city.clone(),
            pm25: record.pm25.map(|v| v.to_string()),
        }
    }
}
