//! City and date-range filtering over a [`Dataset`].

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

use crate::model::{CanonicalRecord, Dataset};

/// Inclusive timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Range between two calendar dates, both taken at midnight. A reading at
    /// noon on `end` is therefore outside the range.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN),
            end: end.and_time(chrono::NaiveTime::MIN),
        }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// A record passes when its city is selected and its timestamp is present
/// and inside the range.
fn passes(record: &CanonicalRecord, cities: &BTreeSet<String>, range: &DateRange) -> bool {
    let city_ok = record
        .city
        .as_ref()
        .is_some_and(|c| cities.contains(c));
    city_ok && record.timestamp.is_some_and(|t| range.contains(t))
}

/// Returns the records of `dataset` whose city is in `cities` and whose
/// timestamp lies in `[start, end]`.
///
/// * An empty `cities` set selects nothing.
/// * `start > end` selects nothing; the range is not swapped.
/// * Records without a city or timestamp never pass.
///
/// The input is left untouched and the output keeps its order.
pub fn filter(
    dataset: &Dataset,
    cities: &BTreeSet<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Dataset {
    filter_range(dataset, cities, &DateRange::new(start, end))
}

pub fn filter_range(dataset: &Dataset, cities: &BTreeSet<String>, range: &DateRange) -> Dataset {
    if cities.is_empty() || range.start > range.end {
        return Dataset::default();
    }
    dataset
        .iter()
        .filter(|r| passes(r, cities, range))
        .cloned()
        .collect()
}
