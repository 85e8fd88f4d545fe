//! Reads a delimited file and runs it through normalization and coercion.
//!
//! This is the only stage that touches the filesystem.

use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::coerce::coerce;
use crate::error::{AirError, Result};
use crate::model::Dataset;
use crate::schema::{RawTable, normalize};
use crate::stats::DatasetStats;

/// Loads a comma-separated file into a canonical [`Dataset`].
///
/// # Errors
///
/// Fails with [`AirError::SourceNotFound`] when `path` does not exist and
/// with [`AirError::MissingPm25Column`] when no header looks like PM2.5.
/// Bad individual cells never fail the load.
pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    load_with_delimiter(path, b',')
}

pub fn load_with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> Result<Dataset> {
    load_path(path.as_ref(), delimiter)
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
fn load_path(path: &Path, delimiter: u8) -> Result<Dataset> {
    if !path.is_file() {
        return Err(AirError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path)?;
    let dataset = read_dataset(file, delimiter)?;

    let stats = DatasetStats::from_dataset(&dataset);
    info!(
        rows = stats.total_rows,
        cities = stats.cities,
        missing_pm25 = stats.missing_pm25,
        missing_timestamp = stats.missing_timestamp,
        missing_city = stats.missing_city,
        missing_pm25_pct = %format!("{:.1}", stats.missing_pm25_pct()),
        missing_timestamp_pct = %format!("{:.1}", stats.missing_timestamp_pct()),
        "Dataset loaded"
    );

    Ok(dataset)
}

/// Parses delimited text from any reader into a [`Dataset`].
pub fn read_dataset<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let table = read_table(reader, delimiter)?;
    let rows = normalize(&table)?;
    Ok(coerce(&rows))
}

/// Reads the header row and all records as untyped cells.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    debug!(columns = headers.len(), "Read CSV headers");

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        rows.push(record.iter().map(decode_cell).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Empty or non-UTF-8 cells are absent.
fn decode_cell(cell: &[u8]) -> Option<String> {
    match std::str::from_utf8(cell) {
        Ok(text) if !text.is_empty() => Some(text.to_string()),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Dropping non-UTF-8 cell");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(temp_path("air_aware_does_not_exist.csv")).unwrap_err();
        assert!(matches!(err, AirError::SourceNotFound { .. }));
    }

    #[test]
    fn test_load_without_pm25_column() {
        let path = temp_path("air_aware_test_no_pm.csv");
        fs::write(&path, "Timestamp,City,NO2\n2024-01-01,A,3\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, AirError::MissingPm25Column { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_dataset_degrades_bad_cells() {
        let text = "Timestamp,City,PM2.5\n2024-01-01,A,25\nnot a date,,N/A\n";
        let ds = read_dataset(text.as_bytes(), b',').unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].pm25, Some(25.0));
        assert!(ds.records()[1].timestamp.is_none());
        assert!(ds.records()[1].city.is_none());
        assert!(ds.records()[1].pm25.is_none());
    }

    #[test]
    fn test_read_dataset_ragged_rows() {
        let text = "City,pm2_5,obs_time\nA,10\nB,20,2024-01-02 10:00:00,extra\n";
        let ds = read_dataset(text.as_bytes(), b',').unwrap();

        assert_eq!(ds.len(), 2);
        assert!(ds.records()[0].timestamp.is_none());
        assert!(ds.records()[1].timestamp.is_some());
    }

    #[test]
    fn test_read_dataset_custom_delimiter() {
        let text = "Timestamp;City;PM25\n2024-01-01;A;12.5\n";
        let ds = read_dataset(text.as_bytes(), b';').unwrap();

        assert_eq!(ds.records()[0].pm25, Some(12.5));
    }

    #[test]
    fn test_read_dataset_tolerates_invalid_utf8_cells() {
        let text: &[u8] = b"Timestamp,City,PM2.5,Note\n\
            2024-01-01,A,25,ok\n\
            2024-01-02,A,30,caf\xE9\n\
            2024-01-03,B,4\xB50,ok\n";
        let ds = read_dataset(text, b',').unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[1].pm25, Some(30.0));
        assert_eq!(ds.records()[2].pm25, None);
        assert_eq!(ds.records()[2].city.as_deref(), Some("B"));
    }

    #[test]
    fn test_read_table_lossy_headers() {
        let text: &[u8] = b"Timestamp,City,PM2.5 (\xB5g/m3)\n2024-01-01,A,7\n";
        let ds = read_dataset(text, b',').unwrap();

        assert_eq!(ds.records()[0].pm25, Some(7.0));
    }
}
