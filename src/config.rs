//! Runtime settings read from the environment (and `.env`, via `dotenvy`).

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use crate::analyzers::aggregate::{DEFAULT_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS};

pub const DEFAULT_DATA_PATH: &str = "data/cleaned_air_data.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/air_aware.log";

/// Settings shared by every CLI command. Flags override these.
///
/// | Variable                   | Default                      |
/// |----------------------------|------------------------------|
/// | `AIR_AWARE_DATA_PATH`      | `data/cleaned_air_data.csv`  |
/// | `AIR_AWARE_DELIMITER`      | `,`                          |
/// | `AIR_AWARE_HISTOGRAM_BINS` | `30`                         |
/// | `LOG_FILE_PATH`            | `logs/air_aware.log`         |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub delimiter: u8,
    pub histogram_bins: usize,
    pub log_file_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            delimiter: b',',
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Settings::default();

        if let Some(path) = lookup("AIR_AWARE_DATA_PATH") {
            s.data_path = PathBuf::from(path);
        }
        if let Some(delim) = lookup("AIR_AWARE_DELIMITER") {
            s.delimiter = parse_delimiter(&delim)?;
        }
        if let Some(bins) = lookup("AIR_AWARE_HISTOGRAM_BINS") {
            s.histogram_bins = parse_bins(&bins).context("invalid AIR_AWARE_HISTOGRAM_BINS")?;
        }
        if let Some(path) = lookup("LOG_FILE_PATH") {
            s.log_file_path = PathBuf::from(path);
        }

        Ok(s)
    }
}

/// Accepts a single ASCII character or the escape `\t`.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => bail!("delimiter must be a single ASCII character, got '{s}'"),
    }
}

/// Histogram bin count between 1 and [`MAX_HISTOGRAM_BINS`].
pub fn parse_bins(s: &str) -> Result<usize> {
    let bins: usize = s
        .trim()
        .parse()
        .with_context(|| format!("bin count is not a number: '{s}'"))?;
    if !(1..=MAX_HISTOGRAM_BINS).contains(&bins) {
        bail!("bin count must be between 1 and {MAX_HISTOGRAM_BINS}, got {bins}");
    }
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.histogram_bins, 30);
    }

    #[test]
    fn test_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("AIR_AWARE_DATA_PATH", "/tmp/x.csv"),
            ("AIR_AWARE_DELIMITER", ";"),
            ("AIR_AWARE_HISTOGRAM_BINS", "12"),
            ("LOG_FILE_PATH", "/tmp/air.log"),
        ]))
        .unwrap();

        assert_eq!(s.data_path, PathBuf::from("/tmp/x.csv"));
        assert_eq!(s.delimiter, b';');
        assert_eq!(s.histogram_bins, 12);
        assert_eq!(s.log_file_path, PathBuf::from("/tmp/air.log"));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Settings::from_lookup(lookup(&[("AIR_AWARE_HISTOGRAM_BINS", "lots")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("AIR_AWARE_HISTOGRAM_BINS", "0")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("AIR_AWARE_DELIMITER", "::")])).is_err());
    }

    #[test]
    fn test_parse_bins_bounds() {
        assert_eq!(parse_bins(" 12 ").unwrap(), 12);
        assert_eq!(parse_bins("1").unwrap(), 1);
        assert!(parse_bins("0").is_err());
        assert!(parse_bins("18446744073709551615").is_err());
        assert!(
            Settings::from_lookup(lookup(&[("AIR_AWARE_HISTOGRAM_BINS", "100000000")])).is_err()
        );
    }

    #[test]
    fn test_parse_delimiter_tab() {
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
    }
}
