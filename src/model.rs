//! Canonical record and dataset types shared by every pipeline stage.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::analyzers::category::Category;

/// One normalized, typed row of the source file.
///
/// Every field is optional: a missing or unparseable source value is kept as
/// `None` on the record instead of dropping the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub city: Option<String>,
    pub pm25: Option<f64>,
}

impl CanonicalRecord {
    pub fn new(timestamp: Option<NaiveDateTime>, city: Option<&str>, pm25: Option<f64>) -> Self {
        Self {
            timestamp,
            city: city.map(str::to_string),
            pm25,
        }
    }
}

/// An immutable, ordered sequence of [`CanonicalRecord`]s.
///
/// Records keep source row order. Cloning shares the underlying storage, so
/// the unfiltered dataset can be handed around while filters derive new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Arc<[CanonicalRecord]>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

impl Dataset {
    pub fn from_records(records: Vec<CanonicalRecord>) -> Self {
        Self {
            records: Arc::from(records),
        }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-absent cities in first-seen order.
    pub fn cities(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.city.as_deref())
            .filter(|c| seen.insert(*c))
            .map(str::to_string)
            .collect()
    }

    /// Earliest and latest present timestamp, or `None` if no record has one.
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut stamps = self.records.iter().filter_map(|r| r.timestamp);
        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// The first `n` records, for table previews.
    pub fn head(&self, n: usize) -> &[CanonicalRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

impl FromIterator<CanonicalRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = CanonicalRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A record together with its derived air-quality band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedRecord {
    #[serde(flatten)]
    pub record: CanonicalRecord,
    pub category: Category,
}
