//! Error types for the orderlens library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for orderlens operations.
///
/// Only ingestion, export and forecasting surface hard errors; aggregation and
/// recommendation degrade to empty results instead.
#[derive(Debug, Error)]
pub enum OrderlensError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The format hint does not name a supported parser or writer.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The bytes could not be parsed as the declared format.
    #[error("Malformed {format} input: {message}")]
    MalformedInput { format: String, message: String },

    /// A column required by the operation is absent from the table.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A table could not be built because its invariants do not hold.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// A configuration value or strategy name could not be understood.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A forecast could not be computed from the input series.
    #[error("Forecast failed: {0}")]
    ForecastFailure(String),

    /// The table could not be serialized to the requested format.
    #[error("Export failed: {0}")]
    ExportFailure(String),
}

impl OrderlensError {
    /// Shorthand for a [`OrderlensError::MalformedInput`].
    pub(crate) fn malformed(format: impl Into<String>, message: impl std::fmt::Display) -> Self {
        OrderlensError::MalformedInput {
            format: format.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for orderlens operations.
pub type Result<T> = std::result::Result<T, OrderlensError>;
