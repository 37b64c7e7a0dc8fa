//! Config-driven ingest and clean.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::DeliveryColumns;
use crate::clean::{CleaningConfig, CleaningReport, clean_with_report};
use crate::error::{OrderlensError, Result};
use crate::input::{FileFormat, Parser, ParserConfig, SourceMetadata};
use crate::table::Table;

/// Configuration for a [`Pipeline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How raw bytes are parsed.
    pub parser: ParserConfig,
    /// Cleaning applied after ingestion (None = keep the table as parsed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning: Option<CleaningConfig>,
    /// Column bindings for the delivery analyses.
    pub columns: DeliveryColumns,
}

fn io_error(path: &Path, source: std::io::Error) -> OrderlensError {
    OrderlensError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl PipelineConfig {
    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| io_error(path, e))?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            OrderlensError::InvalidConfig(format!(
                "failed to parse pipeline config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| io_error(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            OrderlensError::InvalidConfig(format!("failed to serialize pipeline config: {}", e))
        })
    }
}

/// A table ready for analysis, with where it came from and how it was cleaned.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub source: SourceMetadata,
    /// Present when the pipeline has a cleaning stage.
    pub cleaning: Option<CleaningReport>,
}

/// Ingests a source and runs the configured cleaning over it.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    parser: Parser,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ingest in-memory bytes; `format_hint` is a file extension.
    pub fn load_bytes(&self, bytes: &[u8], format_hint: &str) -> Result<LoadedTable> {
        let format = FileFormat::from_extension(format_hint)?;
        let (table, source) = self.parser.parse_with_metadata(bytes, format)?;
        Ok(self.finish(table, source))
    }

    /// Ingest a file, choosing the format from its extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadedTable> {
        let (table, source) = self.parser.parse_file(path)?;
        Ok(self.finish(table, source))
    }

    fn finish(&self, table: Table, source: SourceMetadata) -> LoadedTable {
        let Some(cleaning) = &self.config.cleaning else {
            return LoadedTable {
                table,
                source,
                cleaning: None,
            };
        };

        let (table, report) = clean_with_report(&table, cleaning);
        info!(
            original = report.original_rows,
            cleaned = report.cleaned_rows,
            "cleaned {}",
            source.file.as_deref().unwrap_or("input")
        );
        LoadedTable {
            table,
            source,
            cleaning: Some(report),
        }
    }
}
