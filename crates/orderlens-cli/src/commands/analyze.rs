//! Analyze command - delivery analytics report.

use std::path::{Path, PathBuf};

use colored::Colorize;
use orderlens::analytics::{GroupCount, full_report};

use super::{CommandResult, cell, load, pipeline_config};

fn print_counts(title: &str, counts: &[GroupCount]) {
    println!("{}", title.yellow().bold());
    if counts.is_empty() {
        println!("  {}", "(no data)".dimmed());
    }
    for group in counts {
        println!("  {:20} {}", cell(&group.key), group.count);
    }
    println!();
}

pub fn run(file: PathBuf, json_output: bool, config: Option<&Path>) -> CommandResult {
    let config = pipeline_config(config)?;
    let columns = config.columns.clone();
    let loaded = load(&file, config)?;
    let report = full_report(&loaded.table, &columns);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = &report.summary;
    println!("{} ({})", "Summary:".yellow().bold(), columns.value);
    println!(
        "  count {}  sum {:.2}  mean {:.2}  min {:.2}  max {:.2}",
        summary.count, summary.sum, summary.mean, summary.min, summary.max
    );
    println!();

    let performance = &report.performance;
    println!("{} ({})", "Delivery performance:".yellow().bold(), columns.delay_flag);
    println!(
        "  {} orders, {} on time, {} delayed ({}%)",
        performance.total.to_string().white().bold(),
        performance.on_time.to_string().green(),
        performance.delayed.to_string().red(),
        performance.delay_rate
    );
    println!();

    print_counts("Orders by hour:", &report.orders_by_hour);
    print_counts("Orders by month:", &report.orders_by_month);

    println!("{}", "Traffic:".yellow().bold());
    for group in &report.traffic {
        println!(
            "  {:20} {:6} orders  {}% delayed",
            cell(&group.key),
            group.count,
            group.rate
        );
    }
    println!();

    println!("{}", "Pizzas:".yellow().bold());
    for pair in &report.pizzas {
        println!(
            "  {:12} {:12} {}",
            cell(&pair.first),
            cell(&pair.second),
            pair.count
        );
    }
    println!();

    print_counts("Payments:", &report.payments);
    Ok(())
}
