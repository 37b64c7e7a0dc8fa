//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orderlens::clean::{FillStrategy, Keep, OutlierMethod};
use orderlens::forecast::{DateAggregation, ForecastMethod};
use orderlens::{ExportFormat, RecommendationMethod};

/// Orderlens: delivery-order ingestion, cleaning and analysis
#[derive(Parser)]
#[command(name = "orderlens")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pipeline configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the schema and first rows of a data file
    Inspect {
        /// Path to the data file (csv, tsv, xlsx, xls, json, ndjson, parquet)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of preview rows
        #[arg(short = 'n', long, default_value = "5")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean a data file and write the result
    Clean {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>_cleaned.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default: from the output extension, else the input's)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Start from the delivery preset (drop nulls, parse order/delivery times)
        #[arg(long)]
        delivery_defaults: bool,

        /// Remove rows containing any null
        #[arg(long)]
        drop_nulls: bool,

        /// Remove duplicate rows
        #[arg(long)]
        drop_duplicates: bool,

        /// Key columns for duplicate detection (comma-separated)
        #[arg(long, value_delimiter = ',')]
        subset: Vec<String>,

        /// Which duplicate to keep (first, last)
        #[arg(long, default_value = "first")]
        keep: Keep,

        /// Fill nulls in every numeric column (forward, backward, mean, median,
        /// min, max, zero, custom:<value>)
        #[arg(long)]
        fill: Option<FillStrategy>,

        /// Fill nulls in one column, as COLUMN=STRATEGY (repeatable)
        #[arg(long = "fill-column", value_name = "COLUMN=STRATEGY")]
        fill_columns: Vec<String>,

        /// Strip whitespace around string values
        #[arg(long)]
        trim: bool,

        /// Column to parse as timestamps (repeatable)
        #[arg(long = "date-column")]
        date_columns: Vec<String>,

        /// Drop outlier rows in this numeric column after cleaning
        #[arg(long)]
        outliers: Option<String>,

        /// Outlier rule (iqr, zscore)
        #[arg(long, default_value = "iqr")]
        outlier_method: OutlierMethod,

        /// Print the cleaning report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the delivery analytics report
    Analyze {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forecast a numeric column over time
    Forecast {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column holding the dates
        #[arg(short, long)]
        date: String,

        /// Numeric column to forecast
        #[arg(short = 'c', long)]
        value: String,

        /// Number of future periods
        #[arg(short, long, default_value = "7")]
        periods: usize,

        /// Method (exponential_smoothing, moving_average, linear_trend); all when omitted
        #[arg(short, long)]
        method: Option<ForecastMethod>,

        /// Moving-average window
        #[arg(long)]
        window: Option<usize>,

        /// Exponential-smoothing span
        #[arg(long)]
        span: Option<usize>,

        /// Collapse rows to one per day first (sum, mean, count)
        #[arg(long)]
        per_day: Option<DateAggregation>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend items from order history
    Recommend {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Item column
        #[arg(short, long)]
        item: String,

        /// Method (popular_items, by_category, frequently_bought_together,
        /// trending); every applicable method when omitted
        #[arg(short, long)]
        method: Option<RecommendationMethod>,

        /// Category column (by_category)
        #[arg(long)]
        category: Option<String>,

        /// Order id column (frequently_bought_together)
        #[arg(long)]
        order_id: Option<String>,

        /// Date column (trending)
        #[arg(long)]
        date: Option<String>,

        /// Number of entries (default depends on the method)
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Date buckets in the recent trending window
        #[arg(long, default_value = "7")]
        recent_periods: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a data file to another format
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (default: from the output extension)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
}
