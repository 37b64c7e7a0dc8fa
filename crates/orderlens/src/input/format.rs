//! File format hints.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrderlensError, Result};

/// A format the ingestion adapter can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Comma-separated (or auto-detected) delimited text.
    Csv,
    /// Tab-separated text.
    Tsv,
    /// Excel or OpenDocument workbook.
    Spreadsheet,
    /// A JSON array of objects.
    Json,
    /// One JSON object per line.
    NdJson,
    /// Apache Parquet.
    Parquet,
}

impl FileFormat {
    /// Map a file extension (with or without the leading dot) to a format.
    pub fn from_extension(extension: &str) -> Result<Self> {
        let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "tsv" | "tab" => Ok(FileFormat::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Ok(FileFormat::Spreadsheet),
            "json" => Ok(FileFormat::Json),
            "ndjson" | "jsonl" => Ok(FileFormat::NdJson),
            "parquet" | "pq" => Ok(FileFormat::Parquet),
            _ => Err(OrderlensError::UnsupportedFormat(extension.to_string())),
        }
    }

    /// Detect the format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .ok_or_else(|| {
                OrderlensError::UnsupportedFormat(format!("no extension on '{}'", path.display()))
            })?;
        Self::from_extension(&ext)
    }

    /// True for text formats read with the delimited parser.
    pub fn is_delimited(&self) -> bool {
        matches!(self, FileFormat::Csv | FileFormat::Tsv)
    }
}

impl FromStr for FileFormat {
    type Err = OrderlensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spreadsheet" | "excel" => Ok(FileFormat::Spreadsheet),
            other => Self::from_extension(other),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Tsv => write!(f, "tsv"),
            FileFormat::Spreadsheet => write!(f, "spreadsheet"),
            FileFormat::Json => write!(f, "json"),
            FileFormat::NdJson => write!(f, "ndjson"),
            FileFormat::Parquet => write!(f, "parquet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extensions() {
        assert_eq!(FileFormat::from_extension(".xlsx").unwrap(), FileFormat::Spreadsheet);
        assert_eq!(FileFormat::from_extension("xls").unwrap(), FileFormat::Spreadsheet);
        assert_eq!(FileFormat::from_extension("CSV").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_extension(".parquet").unwrap(), FileFormat::Parquet);
        assert_eq!(FileFormat::from_extension("json").unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_extension("jsonl").unwrap(), FileFormat::NdJson);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            FileFormat::from_extension(".docx"),
            Err(OrderlensError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(FileFormat::from_path("data/orders.tsv").unwrap(), FileFormat::Tsv);
        assert!(FileFormat::from_path("orders").is_err());
    }
}
