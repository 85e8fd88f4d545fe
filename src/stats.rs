use serde::Serialize;

use crate::model::Dataset;

/// Data-quality counters for a loaded dataset.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total_rows: usize,
    pub missing_timestamp: usize,
    pub missing_city: usize,
    pub missing_pm25: usize,
    pub cities: usize,
}

impl DatasetStats {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut s = DatasetStats {
            total_rows: dataset.len(),
            cities: dataset.cities().len(),
            ..Default::default()
        };

        for r in dataset {
            if r.timestamp.is_none() {
                s.missing_timestamp += 1;
            }

            if r.city.is_none() {
                s.missing_city += 1;
            }

            if r.pm25.is_none() {
                s.missing_pm25 += 1;
            }
        }

        s
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn missing_pm25_pct(&self) -> f64 {
        Self::pct(self.missing_pm25, self.total_rows)
    }

    pub fn missing_timestamp_pct(&self) -> f64 {
        Self::pct(self.missing_timestamp, self.total_rows)
    }
}
