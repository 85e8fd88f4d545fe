//! Data types produced by the aggregation pipeline.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::analyzers::category::Category;
use crate::model::CanonicalRecord;

/// Number of records per air-quality band.
///
/// Only bands that occur are present; an empty input gives an empty count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub(crate) counts: HashMap<Category, usize>,
}

impl CategoryCount {
    /// Count for `category`, 0 when it does not occur.
    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.counts.contains_key(&category)
    }

    /// Number of distinct bands present.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Present bands in legend order (Good, Moderate, Poor, Unknown).
    pub fn in_legend_order(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .filter_map(|c| self.counts.get(c).map(|n| (*c, *n)))
            .collect()
    }
}

/// One slice of the category pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub count: usize,
    pub percent: f64,
}

/// A single point on a city's trend line. `pm25` is `None` where the
/// reading was missing, which renders as a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub pm25: Option<f64>,
}

/// Trend line for one city, points in dataset order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySeries {
    pub city: String,
    pub points: Vec<TrendPoint>,
}

/// Half-open bin `[lower, upper)`; the last bin also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl fmt::Display for HistogramBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.1}, {:.1}): {}", self.lower, self.upper, self.count)
    }
}

/// Equal-width histogram over present PM2.5 readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Five-number summary plus mean and spread of present PM2.5 readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
}

/// Everything one dashboard render needs for a filtered dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub records_shown: usize,
    pub categories: Vec<CategoryShare>,
    pub trend: Vec<CitySeries>,
    pub histogram: Histogram,
    pub distribution: Option<BoxSummary>,
    pub sample: Vec<CanonicalRecord>,
}
