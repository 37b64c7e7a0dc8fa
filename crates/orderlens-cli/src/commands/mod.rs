//! CLI command implementations.

pub mod analyze;
pub mod clean;
pub mod export;
pub mod forecast;
pub mod inspect;
pub mod recommend;

use std::path::Path;

use colored::Colorize;
use orderlens::{LoadedTable, Pipeline, PipelineConfig, Value};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// The configuration from `--config`, or defaults.
pub fn pipeline_config(
    config: Option<&Path>,
) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    match config {
        Some(path) => Ok(PipelineConfig::load(path)?),
        None => Ok(PipelineConfig::default()),
    }
}

/// Ingest `file` through a pipeline built from `config`.
pub fn load(
    file: &Path,
    config: PipelineConfig,
) -> Result<LoadedTable, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let loaded = Pipeline::with_config(config).load_file(file)?;
    eprintln!(
        "{} {} ({} rows, {} columns)",
        "Loaded".cyan().bold(),
        file.display().to_string().white(),
        loaded.table.row_count(),
        loaded.table.column_count()
    );
    Ok(loaded)
}

/// Cell text for printed tables.
pub fn cell(value: &Value) -> String {
    if value.is_null() {
        "null".to_string()
    } else {
        value.to_string()
    }
}
