//! Export formats.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrderlensError, Result};

/// A format a table can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    /// A JSON array of row objects.
    Json,
    /// One JSON object per line.
    NdJson,
    Parquet,
    /// Excel workbook with a single sheet.
    Xlsx,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::NdJson => "ndjson",
            ExportFormat::Parquet => "parquet",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// True for formats that produce UTF-8 text.
    pub fn is_text(&self) -> bool {
        !matches!(self, ExportFormat::Parquet | ExportFormat::Xlsx)
    }

    /// Detect the format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                OrderlensError::UnsupportedFormat(format!("no extension on '{}'", path.display()))
            })?
            .parse()
    }
}

impl FromStr for ExportFormat {
    type Err = OrderlensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            "ndjson" | "jsonl" => Ok(ExportFormat::NdJson),
            "parquet" => Ok(ExportFormat::Parquet),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            _ => Err(OrderlensError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("jsonl".parse::<ExportFormat>().unwrap(), ExportFormat::NdJson);
        assert_eq!(".xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(OrderlensError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ExportFormat::from_path("out/orders.parquet").unwrap(),
            ExportFormat::Parquet
        );
        assert!(ExportFormat::from_path("orders").is_err());
    }
}
