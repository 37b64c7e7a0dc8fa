//! Clean command - run the cleaning engine and write the cleaned table.

use std::path::{Path, PathBuf};

use colored::Colorize;
use orderlens::clean::{FillStrategy, Keep, OutlierMethod, clean_with_report, handle_outliers};
use orderlens::output::export_to_path;
use orderlens::{CleaningConfig, ExportFormat, FileFormat};

use super::{CommandResult, load, pipeline_config};

pub struct CleanArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub delivery_defaults: bool,
    pub drop_nulls: bool,
    pub drop_duplicates: bool,
    pub subset: Vec<String>,
    pub keep: Keep,
    pub fill: Option<FillStrategy>,
    pub fill_columns: Vec<String>,
    pub trim: bool,
    pub date_columns: Vec<String>,
    pub outliers: Option<String>,
    pub outlier_method: OutlierMethod,
    pub json: bool,
}

/// Parse `COLUMN=STRATEGY`.
fn parse_fill_column(arg: &str) -> Result<(String, FillStrategy), Box<dyn std::error::Error>> {
    let (column, strategy) = arg
        .split_once('=')
        .ok_or_else(|| format!("Expected COLUMN=STRATEGY, got '{}'", arg))?;
    Ok((column.trim().to_string(), strategy.parse()?))
}

/// Flags switch steps on; they never switch off steps set by the preset or
/// the config file.
fn cleaning_config(args: &CleanArgs, base: Option<CleaningConfig>) -> CleaningConfig {
    let mut config = if args.delivery_defaults {
        CleaningConfig::delivery_defaults()
    } else {
        base.unwrap_or_default()
    };

    config.drop_nulls |= args.drop_nulls;
    config.drop_duplicates |= args.drop_duplicates;
    config.trim_strings |= args.trim;
    if !args.subset.is_empty() {
        config.duplicate_subset = Some(args.subset.clone());
    }
    if args.keep != Keep::default() {
        config.keep = args.keep;
    }
    for column in &args.date_columns {
        if !config.date_columns.contains(column) {
            config.date_columns.push(column.clone());
        }
    }
    config
}

/// `<stem>_cleaned.<ext>` next to the input.
fn default_output(file: &Path, format: ExportFormat) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}_cleaned.{}", stem, format.extension()))
}

/// The export format matching an input format.
fn same_format(format: FileFormat) -> ExportFormat {
    match format {
        FileFormat::Csv => ExportFormat::Csv,
        FileFormat::Tsv => ExportFormat::Tsv,
        FileFormat::Json => ExportFormat::Json,
        FileFormat::NdJson => ExportFormat::NdJson,
        FileFormat::Parquet => ExportFormat::Parquet,
        FileFormat::Spreadsheet => ExportFormat::Xlsx,
    }
}

pub fn run(args: CleanArgs, config: Option<&Path>) -> CommandResult {
    let mut pipeline = pipeline_config(config)?;
    let mut cleaning = cleaning_config(&args, pipeline.cleaning.take());

    let fills: Vec<(String, FillStrategy)> = args
        .fill_columns
        .iter()
        .map(|arg| parse_fill_column(arg.as_str()))
        .collect::<Result<_, _>>()?;

    // --fill targets the numeric columns of the parsed table
    let loaded = load(&args.file, pipeline)?;
    if let Some(strategy) = &args.fill {
        cleaning.fill_null_strategy.extend(strategy.apply_to_numeric(&loaded.table));
    }
    cleaning.fill_null_strategy.extend(fills);

    let (mut table, report) = clean_with_report(&loaded.table, &cleaning);
    if let Some(column) = &args.outliers {
        let before = table.row_count();
        table = handle_outliers(&table, column, args.outlier_method);
        eprintln!(
            "Removed {} outlier rows from '{}' ({})",
            (before - table.row_count()).to_string().yellow(),
            column,
            args.outlier_method
        );
    }

    let format = match (&args.format, &args.output) {
        (Some(format), _) => *format,
        (None, Some(path)) => ExportFormat::from_path(path)?,
        (None, None) => same_format(loaded.source.format),
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.file, format));
    export_to_path(&table, format, &output)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for step in &report.steps {
            let target = step
                .column
                .as_deref()
                .map(|c| format!(" [{}]", c))
                .unwrap_or_default();
            println!(
                "  {:14}{} {} rows removed, {} values changed",
                step.operation, target, step.rows_removed, step.values_changed
            );
        }
        println!(
            "{} {} -> {} rows",
            "Cleaned".green().bold(),
            report.original_rows,
            table.row_count().to_string().white().bold()
        );
    }

    eprintln!(
        "{} {}",
        "Saved to".green().bold(),
        output.display().to_string().white()
    );
    Ok(())
}
