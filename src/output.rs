//! Output formatting and persistence for datasets and summaries.
//!
//! Supports debug pretty-printing and canonical CSV export, plain or gzip.

use bytes::Bytes;
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{AirError, Result};
use crate::model::Dataset;
use crate::schema::{CITY_COLUMN, CanonicalRow, PM25_COLUMN, TIMESTAMP_COLUMN};

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Serializes `dataset` as CSV with a `Timestamp,City,PM2.5` header.
///
/// Absent values become empty cells. Loading the output again yields the
/// same records.
pub fn export(dataset: &Dataset) -> Result<Bytes> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record([TIMESTAMP_COLUMN, CITY_COLUMN, PM25_COLUMN])?;
    for record in dataset {
        let row = CanonicalRow::from(record);
        writer.write_record([
            row.timestamp.as_deref().unwrap_or(""),
            row.city.as_deref().unwrap_or(""),
            row.pm25.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;

    let buf = writer
        .into_inner()
        .map_err(|e| AirError::Io(e.into_error()))?;
    debug!(rows = dataset.len(), bytes = buf.len(), "Exported dataset");
    Ok(Bytes::from(buf))
}

/// Same as [`export`], gzip-compressed.
pub fn export_gzip(dataset: &Dataset) -> Result<Bytes> {
    let csv = export(dataset)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&csv)?;
    Ok(Bytes::from(encoder.finish()?))
}

/// Writes the export of `dataset` to `path`, compressed when `gzip` is set.
pub fn write_export(path: impl AsRef<Path>, dataset: &Dataset, gzip: bool) -> Result<()> {
    let path = path.as_ref();
    let body = if gzip {
        export_gzip(dataset)?
    } else {
        export(dataset)?
    };
    std::fs::write(path, &body)?;
    info!(path = %path.display(), rows = dataset.len(), gzip, "Export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_dataset;
    use crate::model::CanonicalRecord;
    use chrono::NaiveDate;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample() -> Dataset {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(6, 30, 0, 125)
            .unwrap();
        Dataset::from_records(vec![
            CanonicalRecord::new(Some(t), Some("New Delhi, IN"), Some(25.5)),
            CanonicalRecord::new(None, None, None),
            CanonicalRecord::new(Some(t), Some("Agra"), Some(0.0)),
        ])
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample());
    }

    #[test]
    fn test_export_header_and_empty_cells() {
        let text = String::from_utf8(export(&sample()).unwrap().to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Timestamp,City,PM2.5");
        assert_eq!(lines[1], "2024-01-01 06:30:00.125,\"New Delhi, IN\",25.5");
        assert_eq!(lines[2], ",,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_empty_dataset_still_has_header() {
        let text = String::from_utf8(export(&Dataset::default()).unwrap().to_vec()).unwrap();
        assert_eq!(text.trim_end(), "Timestamp,City,PM2.5");
    }

    #[test]
    fn test_export_round_trips_through_loader() {
        let ds = sample();
        let bytes = export(&ds).unwrap();
        let reloaded = read_dataset(&bytes[..], b',').unwrap();

        assert_eq!(reloaded, ds);
    }

    #[test]
    fn test_export_gzip_decompresses_to_plain_export() {
        let ds = sample();
        let compressed = export_gzip(&ds).unwrap();
        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut plain = Vec::new();
        decoder.read_to_end(&mut plain).unwrap();

        assert_eq!(plain, export(&ds).unwrap().to_vec());
    }

    #[test]
    fn test_write_export_creates_file() {
        let path = temp_path("air_aware_test_export.csv");
        let _ = fs::remove_file(&path);

        write_export(&path, &sample(), false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Timestamp,City,PM2.5"));

        fs::remove_file(&path).unwrap();
    }
}
