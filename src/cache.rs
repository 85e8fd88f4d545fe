//! Single-entry memo of the canonical dataset, keyed on source identity.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

use crate::error::{AirError, Result};
use crate::loader::load_with_delimiter;
use crate::model::Dataset;

/// What makes two loads of a file interchangeable: the same resolved path,
/// size and modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceIdentity {
    pub fn of(path: &Path) -> Result<Self> {
        let path = path.canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => AirError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => AirError::Io(e),
        })?;
        let meta = std::fs::metadata(&path)?;
        Ok(Self {
            path,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Holds at most one loaded dataset. Asking for a different source, or for
/// the same file after it changed on disk, replaces the entry.
#[derive(Debug)]
pub struct DatasetCache {
    delimiter: u8,
    entry: Option<(SourceIdentity, Dataset)>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl DatasetCache {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            entry: None,
        }
    }

    /// Returns the cached dataset for `path`, loading it on a miss.
    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let identity = SourceIdentity::of(path)?;

        if let Some((cached, dataset)) = &self.entry {
            if *cached == identity {
                debug!(path = %identity.path.display(), "Dataset cache hit");
                return Ok(dataset.clone());
            }
        }

        info!(path = %identity.path.display(), "Dataset cache miss, loading");
        let dataset = load_with_delimiter(&identity.path, self.delimiter)?;
        self.entry = Some((identity, dataset.clone()));
        Ok(dataset)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
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
    fn test_second_load_is_shared() {
        let path = temp_path("air_aware_test_cache_hit.csv");
        fs::write(&path, "Timestamp,City,PM2.5\n2024-01-01,A,10\n").unwrap();

        let mut cache = DatasetCache::default();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();

        assert!(std::ptr::eq(first.records(), second.records()));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_changed_file_is_reloaded() {
        let path = temp_path("air_aware_test_cache_change.csv");
        fs::write(&path, "Timestamp,City,PM2.5\n2024-01-01,A,10\n").unwrap();

        let mut cache = DatasetCache::default();
        let first = cache.get_or_load(&path).unwrap();
        assert_eq!(first.len(), 1);

        fs::write(
            &path,
            "Timestamp,City,PM2.5\n2024-01-01,A,10\n2024-01-02,A,20\n",
        )
        .unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert_eq!(second.len(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let path = temp_path("air_aware_test_cache_invalidate.csv");
        fs::write(&path, "Timestamp,City,PM2.5\n2024-01-01,A,10\n").unwrap();

        let mut cache = DatasetCache::default();
        let first = cache.get_or_load(&path).unwrap();
        cache.invalidate();
        let second = cache.get_or_load(&path).unwrap();

        assert_eq!(first, second);
        assert!(!std::ptr::eq(first.records(), second.records()));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_source() {
        let mut cache = DatasetCache::default();
        let err = cache
            .get_or_load(temp_path("air_aware_test_cache_missing.csv"))
            .unwrap_err();
        assert!(matches!(err, AirError::SourceNotFound { .. }));
    }

    #[test]
    fn test_unresolvable_path_is_io_error() {
        let path = temp_path("air_aware_test_cache_not_a_dir.csv");
        fs::write(&path, "Timestamp,City,PM2.5\n").unwrap();

        // a regular file used as a directory component fails with NotADirectory
        let err = SourceIdentity::of(&Path::new(&path).join("inner.csv")).unwrap_err();
        assert!(matches!(err, AirError::Io(_)));

        fs::remove_file(&path).unwrap();
    }
}
