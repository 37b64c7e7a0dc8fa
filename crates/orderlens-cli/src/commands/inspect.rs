//! Inspect command - schema and preview of a data file.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::{CommandResult, cell, load, pipeline_config};

pub fn run(file: PathBuf, rows: usize, json_output: bool, config: Option<&Path>) -> CommandResult {
    let loaded = load(&file, pipeline_config(config)?)?;
    let table = &loaded.table;
    let preview = table.head(rows);

    if json_output {
        let schema: Vec<serde_json::Value> = table
            .columns()
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name(),
                    "type": c.dtype(),
                    "nulls": c.null_count(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "source": loaded.source,
            "schema": schema,
            "preview": preview.records(),
            "cleaning": loaded.cleaning,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({}, {} bytes)",
        "Source".cyan().bold(),
        file.display().to_string().white(),
        loaded.source.format,
        loaded.source.size_bytes
    );
    println!("  {}", loaded.source.hash.dimmed());
    println!();

    println!("{}", "Schema:".yellow().bold());
    for column in table.columns() {
        let nulls = column.null_count();
        let nulls = if nulls > 0 {
            format!("{} nulls", nulls).yellow().to_string()
        } else {
            String::new()
        };
        println!("  {:24} {:10} {}", column.name(), column.dtype().to_string(), nulls);
    }
    println!();

    println!(
        "{} ({} of {} rows)",
        "Preview:".yellow().bold(),
        preview.row_count(),
        table.row_count()
    );
    println!("  {}", table.column_names().join(" | ").bold());
    for row in 0..preview.row_count() {
        let cells: Vec<String> = preview.row(row).into_iter().map(cell).collect();
        println!("  {}", cells.join(" | "));
    }

    if let Some(report) = &loaded.cleaning {
        println!();
        println!(
            "Cleaned: {} -> {} rows",
            report.original_rows,
            report.cleaned_rows.to_string().white().bold()
        );
    }

    Ok(())
}
