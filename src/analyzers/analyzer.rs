use tracing::debug;

use crate::analyzers::aggregate::{
    box_summary, counts, histogram, record_count, shares, trend_series,
};
use crate::analyzers::category::categorize_all;
use crate::analyzers::types::DashboardSummary;
use crate::model::Dataset;

/// Rows included in the summary's table preview.
pub const SAMPLE_ROWS: usize = 200;

/// Builds every view of the dashboard from an already filtered dataset.
pub fn summarize(dataset: &Dataset, bins: usize) -> DashboardSummary {
    let records_shown = record_count(dataset);
    let categorized = categorize_all(dataset);
    let category_counts = counts(&categorized);

    debug!(
        records = dataset.len(),
        records_shown,
        categories = category_counts.len(),
        "Summarizing dataset"
    );

    DashboardSummary {
        records_shown,
        categories: shares(&category_counts),
        trend: trend_series(dataset),
        histogram: histogram(dataset, bins),
        distribution: box_summary(dataset),
        sample: dataset.head(SAMPLE_ROWS).to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::category::Category;
    use crate::model::CanonicalRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_summarize_empty() {
        let s = summarize(&Dataset::default(), 30);

        assert_eq!(s.records_shown, 0);
        assert!(s.categories.is_empty());
        assert!(s.trend.is_empty());
        assert!(s.histogram.bins.is_empty());
        assert!(s.distribution.is_none());
        assert!(s.sample.is_empty());
    }

    #[test]
    fn test_summarize_small_dataset() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        let ds = Dataset::from_records(vec![
            CanonicalRecord::new(t, Some("A"), Some(10.0)),
            CanonicalRecord::new(t, Some("B"), Some(70.0)),
        ]);
        let s = summarize(&ds, 30);

        assert_eq!(s.records_shown, 2);
        assert_eq!(s.categories.len(), 2);
        assert_eq!(s.categories[0].category, Category::Good);
        assert_eq!(s.trend.len(), 2);
        assert_eq!(s.histogram.total(), 2);
        assert_eq!(s.sample.len(), 2);
    }
}
