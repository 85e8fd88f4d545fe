//! CLI entry point for Air Aware.
//!
//! Loads a PM2.5 dataset, applies city and date filters, and reports the
//! category shares, trend lines, and distribution a dashboard would draw.
//! Filtered data can be exported as CSV.

use air_aware::analyzers::analyzer::summarize;
use air_aware::analyzers::types::DashboardSummary;
use air_aware::cache::DatasetCache;
use air_aware::config::{Settings, parse_bins, parse_delimiter};
use air_aware::filter::{DateRange, filter_range};
use air_aware::output::{print_pretty, write_export};
use air_aware::Dataset;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "air_aware")]
#[command(about = "PM2.5 air-quality summaries from a CSV dataset", long_about = None)]
struct Cli {
    /// Input delimiter (overrides AIR_AWARE_DELIMITER)
    #[arg(long, global = true, value_name = "CHAR")]
    delimiter: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// CSV file to load (overrides AIR_AWARE_DATA_PATH)
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,
}

#[derive(Args)]
struct Filters {
    /// City to include; repeat for several. Defaults to every city
    #[arg(short, long = "city", value_name = "CITY")]
    cities: Vec<String>,

    /// First day of the range (YYYY-MM-DD). Defaults to the earliest reading
    #[arg(long, value_name = "DATE")]
    start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), taken at midnight. Defaults to the latest reading
    #[arg(long, value_name = "DATE")]
    end: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the filtered dataset: category shares, trend, and distribution
    Summary {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        filters: Filters,

        /// Histogram bins (overrides AIR_AWARE_HISTOGRAM_BINS)
        #[arg(short, long, value_parser = parse_bins)]
        bins: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// List the cities and the date span of the dataset
    Cities {
        #[command(flatten)]
        source: Source,
    },
    /// Write the filtered dataset as CSV
    Export {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        filters: Filters,

        /// Destination file
        #[arg(short, long, default_value = "air_filtered.csv")]
        out: PathBuf,

        /// Gzip compress the CSV
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let mut settings = Settings::from_env()?;
    let cli = Cli::parse();
    if let Some(delim) = &cli.delimiter {
        settings.delimiter = parse_delimiter(delim)?;
    }

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("air_aware.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let mut cache = DatasetCache::new(settings.delimiter);

    match cli.command {
        Commands::Summary {
            source,
            filters,
            bins,
            format,
        } => {
            let dataset = load_source(&mut cache, &settings, &source)?;
            let filtered = apply_filters(&dataset, &filters);
            let summary = summarize(&filtered, bins.unwrap_or(settings.histogram_bins));

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Pretty => report_summary(&summary),
            }
        }
        Commands::Cities { source } => {
            let dataset = load_source(&mut cache, &settings, &source)?;
            for city in dataset.cities() {
                info!(city = %city, "City");
            }
            match dataset.time_bounds() {
                Some((first, last)) => info!(first = %first, last = %last, "Date span"),
                None => warn!("Dataset has no parseable timestamps"),
            }
        }
        Commands::Export {
            source,
            filters,
            out,
            gzip,
        } => {
            let dataset = load_source(&mut cache, &settings, &source)?;
            let filtered = apply_filters(&dataset, &filters);
            write_export(&out, &filtered, gzip)
                .with_context(|| format!("writing export to {}", out.display()))?;
        }
    }

    Ok(())
}

/// Loads the dataset named on the command line, or the configured default.
fn load_source(cache: &mut DatasetCache, settings: &Settings, source: &Source) -> Result<Dataset> {
    let path = source.data.as_ref().unwrap_or(&settings.data_path);
    cache
        .get_or_load(path)
        .with_context(|| format!("loading dataset from {}", path.display()))
}

/// Applies CLI filters; omitted options select every city and the full
/// span of the data.
fn apply_filters(dataset: &Dataset, filters: &Filters) -> Dataset {
    let cities: BTreeSet<String> = if filters.cities.is_empty() {
        dataset.cities().into_iter().collect()
    } else {
        filters.cities.iter().cloned().collect()
    };

    let Some((first, last)) = dataset.time_bounds() else {
        warn!("Dataset has no parseable timestamps; date filter excludes every record");
        return Dataset::default();
    };
    let at_midnight = |d: NaiveDate| -> NaiveDateTime { d.and_time(NaiveTime::MIN) };
    let range = match (filters.start, filters.end) {
        (Some(s), Some(e)) => DateRange::from_dates(s, e),
        (s, e) => DateRange::new(
            s.map(at_midnight).unwrap_or(first),
            e.map(at_midnight).unwrap_or(last),
        ),
    };

    let filtered = filter_range(dataset, &cities, &range);
    info!(
        total = dataset.len(),
        shown = filtered.len(),
        cities = cities.len(),
        start = %range.start,
        end = %range.end,
        "Filters applied"
    );
    filtered
}

fn report_summary(summary: &DashboardSummary) {
    info!(records_shown = summary.records_shown, "Records shown");
    if summary.records_shown == 0 {
        info!("No data for selected filters.");
        return;
    }

    for share in &summary.categories {
        info!(
            category = %share.category,
            count = share.count,
            percent = %format!("{:.1}", share.percent),
            "Air quality category"
        );
    }

    for series in &summary.trend {
        info!(city = %series.city, points = series.points.len(), "PM2.5 trend");
    }

    if let Some(b) = &summary.distribution {
        info!(
            count = b.count,
            min = b.min,
            q1 = b.q1,
            median = b.median,
            q3 = b.q3,
            max = b.max,
            mean = b.mean,
            stddev = b.stddev,
            "PM2.5 distribution"
        );
    }

    for bin in &summary.histogram.bins {
        info!(bin = %bin, "PM2.5 histogram");
    }

    print_pretty(summary);
}
