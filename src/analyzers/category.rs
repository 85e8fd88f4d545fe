use serde::Serialize;
use std::fmt;

use crate::model::{CategorizedRecord, Dataset};

/// Upper bound (inclusive) of the `Good` band, in µg/m³.
pub const GOOD_MAX: f64 = 30.0;
/// Upper bound (inclusive) of the `Moderate` band, in µg/m³.
pub const MODERATE_MAX: f64 = 60.0;

/// Air-quality band derived from a PM2.5 reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Good,
    Moderate,
    Poor,
    Unknown,
}

impl Category {
    /// Legend order used by charts.
    pub const ALL: [Category; 4] = [
        Category::Good,
        Category::Moderate,
        Category::Poor,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::Poor => "Poor",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a PM2.5 reading into its band.
///
/// | Range            | Band     |
/// |------------------|----------|
/// | absent           | Unknown  |
/// | <= 30            | Good     |
/// | > 30 and <= 60   | Moderate |
/// | > 60             | Poor     |
pub fn categorize(pm25: Option<f64>) -> Category {
    match pm25 {
        None => Category::Unknown,
        Some(p) if p <= GOOD_MAX => Category::Good,
        Some(p) if p <= MODERATE_MAX => Category::Moderate,
        Some(_) => Category::Poor,
    }
}

/// Tags every record of `dataset` with its band, in dataset order.
pub fn categorize_all(dataset: &Dataset) -> Vec<CategorizedRecord> {
    dataset
        .iter()
        .map(|record| CategorizedRecord {
            category: categorize(record.pm25),
            record: record.clone(),
        })
        .collect()
}
