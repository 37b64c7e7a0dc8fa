//! Orderlens CLI - delivery-order analytics from the command line.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Log to stderr so JSON on stdout stays machine-readable. `RUST_LOG` wins
/// over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Inspect { file, rows, json } => commands::inspect::run(file, rows, json, config),

        Commands::Clean {
            file,
            output,
            format,
            delivery_defaults,
            drop_nulls,
            drop_duplicates,
            subset,
            keep,
            fill,
            fill_columns,
            trim,
            date_columns,
            outliers,
            outlier_method,
            json,
        } => commands::clean::run(
            commands::clean::CleanArgs {
                file,
                output,
                format,
                delivery_defaults,
                drop_nulls,
                drop_duplicates,
                subset,
                keep,
                fill,
                fill_columns,
                trim,
                date_columns,
                outliers,
                outlier_method,
                json,
            },
            config,
        ),

        Commands::Analyze { file, json } => commands::analyze::run(file, json, config),

        Commands::Forecast {
            file,
            date,
            value,
            periods,
            method,
            window,
            span,
            per_day,
            json,
        } => commands::forecast::run(
            commands::forecast::ForecastArgs {
                file,
                date,
                value,
                periods,
                method,
                window,
                span,
                per_day,
                json,
            },
            config,
        ),

        Commands::Recommend {
            file,
            item,
            method,
            category,
            order_id,
            date,
            top,
            recent_periods,
            json,
        } => commands::recommend::run(
            commands::recommend::RecommendArgs {
                file,
                item,
                method,
                category,
                order_id,
                date,
                top,
                recent_periods,
                json,
            },
            config,
        ),

        Commands::Export {
            file,
            output,
            format,
        } => commands::export::run(file, output, format, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
