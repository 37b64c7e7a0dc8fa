//! Export command - convert a data file to another format.

use std::path::{Path, PathBuf};

use colored::Colorize;
use orderlens::ExportFormat;
use orderlens::output::export_to_path;

use super::{CommandResult, load, pipeline_config};

pub fn run(
    file: PathBuf,
    output: PathBuf,
    format: Option<ExportFormat>,
    config: Option<&Path>,
) -> CommandResult {
    let format = match format {
        Some(format) => format,
        None => ExportFormat::from_path(&output)?,
    };
    let loaded = load(&file, pipeline_config(config)?)?;

    export_to_path(&loaded.table, format, &output)?;

    println!(
        "{} {} rows as {} to {}",
        "Exported".green().bold(),
        loaded.table.row_count(),
        format,
        output.display().to_string().white()
    );
    Ok(())
}
