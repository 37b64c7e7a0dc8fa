//! Cleaning: null handling, de-duplication, trimming, date parsing and
//! outlier filtering. Every operation returns a new table.

mod config;
mod engine;
mod report;

pub use config::{CleaningConfig, FillStrategy, Keep, OutlierMethod};
pub use engine::{clean, clean_with_report, handle_outliers, remove_duplicates};
pub use report::{CleaningReport, CleaningStep};
