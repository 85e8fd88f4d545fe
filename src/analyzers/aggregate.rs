use std::collections::HashMap;

use crate::analyzers::types::{
    BoxSummary, CategoryCount, CategoryShare, CitySeries, Histogram, HistogramBin, TrendPoint,
};
use crate::analyzers::utility::{mean, quantile, stddev};
use crate::model::{CategorizedRecord, Dataset};
use crate::stats::DatasetStats;

/// Bins used by the distribution view unless configured otherwise.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Upper bound on histogram bins; larger requests are clamped.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Counts categorized records per band.
pub fn counts(records: &[CategorizedRecord]) -> CategoryCount {
    let mut counts = HashMap::new();
    for r in records {
        *counts.entry(r.category).or_insert(0) += 1;
    }
    CategoryCount { counts }
}

/// Number of records with both a city and a timestamp, i.e. the rows a
/// city/date filter can show.
pub fn record_count(dataset: &Dataset) -> usize {
    dataset
        .iter()
        .filter(|r| r.city.is_some() && r.timestamp.is_some())
        .count()
}

/// Pie slices in legend order, with each band's share of the total.
pub fn shares(counts: &CategoryCount) -> Vec<CategoryShare> {
    let total = counts.total();
    counts
        .in_legend_order()
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            percent: DatasetStats::pct(count, total),
        })
        .collect()
}

/// Groups records into one trend line per city, cities in first-seen order.
///
/// Records without a city or timestamp cannot be placed on a line and are
/// skipped; a missing reading stays in the series as a gap.
pub fn trend_series(dataset: &Dataset) -> Vec<CitySeries> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<CitySeries> = Vec::new();

    for r in dataset {
        let (Some(city), Some(timestamp)) = (r.city.as_deref(), r.timestamp) else {
            continue;
        };
        let slot = *index.entry(city).or_insert_with(|| {
            series.push(CitySeries {
                city: city.to_string(),
                points: Vec::new(),
            });
            series.len() - 1
        });
        series[slot].points.push(TrendPoint {
            timestamp,
            pm25: r.pm25,
        });
    }

    series
}

fn finite_readings(dataset: &Dataset) -> Vec<f64> {
    dataset
        .iter()
        .filter_map(|r| r.pm25)
        .filter(|v| v.is_finite())
        .collect()
}

/// Equal-width histogram of present readings between their min and max.
pub fn histogram(dataset: &Dataset, bins: usize) -> Histogram {
    let values = finite_readings(dataset);
    if values.is_empty() {
        return Histogram::default();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
    let width = (hi - lo) / bins as f64;
    let bins = if width > 0.0 { bins } else { 1 };

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = if width > 0.0 {
            (((v - lo) / width) as usize).min(bins - 1)
        } else {
            0
        };
        out[idx].count += 1;
    }

    Histogram { bins: out }
}

/// Box-plot summary of present readings, `None` when there are none.
pub fn box_summary(dataset: &Dataset) -> Option<BoxSummary> {
    let mut values = finite_readings(dataset);
    values.sort_by(f64::total_cmp);

    let avg = mean(&values);
    Some(BoxSummary {
        count: values.len(),
        min: *values.first()?,
        q1: quantile(&values, 0.25)?,
        median: quantile(&values, 0.5)?,
        q3: quantile(&values, 0.75)?,
        max: *values.last()?,
        mean: avg,
        stddev: stddev(&values, avg),
    })
}
