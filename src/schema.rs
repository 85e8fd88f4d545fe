//! Column-name inference: maps an arbitrary header row onto the canonical
//! timestamp / city / PM2.5 layout.
//!
//! Matching is deliberately loose. Source files name the PM2.5 column
//! `PM2.5`, `pm25`, `PM2_5 (ug/m3)` and so on, so the first header that
//! contains `pm2` in any case wins. The timestamp column is matched exactly
//! first and by a `time` substring second.

use tracing::{debug, warn};

use crate::error::{AirError, Result};

/// Header used for the timestamp column on export and for exact matching.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";
/// Header used for the city column; matched exactly.
pub const CITY_COLUMN: &str = "City";
/// Header used for the PM2.5 column on export.
pub const PM25_COLUMN: &str = "PM2.5";

const TIME_HINT: &str = "time";
const PM25_HINT: &str = "pm2";

/// A header row plus untyped cells, as read from a delimited file.
///
/// Empty cells are stored as `None`. Rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }
}

/// Which source columns feed the three canonical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub timestamp: Option<usize>,
    pub city: Option<usize>,
    pub pm25: usize,
}

impl ColumnMapping {
    /// Resolves the canonical columns from a header row.
    ///
    /// # Errors
    ///
    /// Returns [`AirError::MissingPm25Column`] when no header contains `pm2`.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let timestamp = headers
            .iter()
            .position(|h| h == TIMESTAMP_COLUMN)
            .or_else(|| {
                headers
                    .iter()
                    .position(|h| h.to_lowercase().contains(TIME_HINT))
            });

        let pm25 = headers
            .iter()
            .position(|h| h.to_lowercase().contains(PM25_HINT))
            .ok_or_else(|| AirError::MissingPm25Column {
                columns: headers.to_vec(),
            })?;

        let city = headers.iter().position(|h| h == CITY_COLUMN);

        if timestamp.is_none() {
            warn!("No timestamp-like column found; date filters will exclude every record");
        }
        if city.is_none() {
            warn!("No City column found; city filters will exclude every record");
        }
        debug!(
            timestamp = ?timestamp.map(|i| &headers[i]),
            city = ?city.map(|i| &headers[i]),
            pm25 = %headers[pm25],
            "Resolved column mapping"
        );

        Ok(Self {
            timestamp,
            city,
            pm25,
        })
    }
}

/// A canonical-shape row whose cells are still raw text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRow {
    pub timestamp: Option<String>,
    pub city: Option<String>,
    pub pm25: Option<String>,
}

/// Projects every row of `table` onto the canonical layout.
///
/// Row count and order are preserved.
pub fn normalize(table: &RawTable) -> Result<Vec<CanonicalRow>> {
    let mapping = ColumnMapping::resolve(&table.headers)?;

    let cell = |row: &[Option<String>], idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i)).cloned().flatten()
    };

    Ok(table
        .rows
        .iter()
        .map(|row| CanonicalRow {
            timestamp: cell(row, mapping.timestamp),
            city: cell(row, mapping.city),
            pm25: cell(row, Some(mapping.pm25)),
        })
        .collect())
}
