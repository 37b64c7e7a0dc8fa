//! Orderlens: ingestion, cleaning, analytics, forecasting and item
//! recommendations for delivery-order tables.
//!
//! Every stage is a pure function over an immutable [`Table`]: ingestion
//! builds one from raw bytes, cleaning produces a new one, and the analysis
//! stages read it without changing it.
//!
//! # Core Principles
//!
//! - **Format-agnostic**: CSV/TSV, JSON, NDJSON, Parquet and workbooks all
//!   become the same [`Table`]
//! - **Non-destructive**: cleaning returns a new table and reports each step
//! - **Degrade, don't fail**: aggregation and recommendation return empty
//!   results on missing columns; only ingestion, export and forecasting error
//!
//! # Example
//!
//! ```no_run
//! use orderlens::{Pipeline, forecast, recommend};
//!
//! let loaded = Pipeline::new().load_file("orders.csv").unwrap();
//! let popular = recommend::popular_items(&loaded.table, "pizza_type", 5);
//! let trend = forecast::linear_trend(&loaded.table, "order_time", "estimated_duration", 7);
//!
//! println!("Rows: {}", loaded.table.row_count());
//! println!("Top item: {:?}", popular.first());
//! println!("Forecast: {:?}", trend.map(|r| r.forecast));
//! ```

pub mod analytics;
pub mod clean;
pub mod error;
pub mod forecast;
pub mod input;
pub mod output;
pub mod recommend;
pub mod stats;
pub mod table;

mod pipeline;

pub use crate::pipeline::{LoadedTable, Pipeline, PipelineConfig};
pub use clean::{CleaningConfig, CleaningReport, FillStrategy, Keep, OutlierMethod};
pub use error::{OrderlensError, Result};
pub use forecast::{ForecastMethod, ForecastResult};
pub use input::{FileFormat, ParserConfig, SourceMetadata, ingest};
pub use output::{ExportFormat, export};
pub use recommend::{RecommendationMethod, RecommendationResult};
pub use table::{Column, ColumnType, Table, Value};
