//! Example: Load, clean and analyze a delivery-order file with orderlens.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>
//!
//! Example:
//!   cargo run --example analyze -- data/pizza_orders.csv

use std::env;
use std::path::Path;

use orderlens::analytics::{DeliveryColumns, full_report};
use orderlens::forecast::{DateAggregation, aggregate_by_date, forecast_all};
use orderlens::recommend::{RecommendationColumns, recommend_all};
use orderlens::{CleaningConfig, Pipeline, PipelineConfig};

fn main() -> orderlens::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- data/pizza_orders.csv");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Order Analysis: {}", file_path);
    println!("{}", separator);
    println!();

    let pipeline = Pipeline::with_config(PipelineConfig {
        cleaning: Some(CleaningConfig {
            drop_duplicates: true,
            ..CleaningConfig::delivery_defaults()
        }),
        ..PipelineConfig::default()
    });
    let loaded = pipeline.load_file(path)?;
    let table = &loaded.table;

    println!("## Source Metadata");
    println!("  Format: {}", loaded.source.format);
    println!("  Rows: {}", loaded.source.row_count);
    println!("  Columns: {}", loaded.source.column_count);
    println!("  Hash: {}", loaded.source.hash);
    if let Some(report) = &loaded.cleaning {
        println!(
            "  Cleaned: {} -> {} rows",
            report.original_rows, report.cleaned_rows
        );
    }
    println!();

    println!("## Schema ({} columns)", table.column_count());
    for (name, dtype) in table.schema() {
        println!("  {:24} {}", name, dtype);
    }
    println!();

    let columns = DeliveryColumns::default();
    let report = full_report(table, &columns);
    println!("## Delivery Performance");
    println!("  Orders: {}", report.performance.total);
    println!("  Delayed: {}", report.performance.delayed);
    println!("  Delay rate: {:.2}%", report.performance.delay_rate);
    println!("  Mean duration: {:.2}", report.summary.mean);
    println!();

    println!("## Traffic");
    for group in &report.traffic {
        println!(
            "  {:12} {:6} orders  {:6.2}% delayed",
            group.key, group.count, group.rate
        );
    }
    println!();

    if table.has_column("order_time") && table.has_column(&columns.value) {
        let daily = aggregate_by_date(
            table,
            "order_time",
            &columns.value,
            DateAggregation::Count,
        )?;
        let forecasts = forecast_all(&daily, "order_time", &columns.value, 7)?;
        println!("## Daily Order Forecast (7 days)");
        for (name, result) in [
            ("ewma", &forecasts.exponential_smoothing),
            ("moving average", &forecasts.moving_average),
            ("linear trend", &forecasts.linear_trend),
        ] {
            let values: Vec<String> = result.forecast.iter().map(|v| format!("{:.1}", v)).collect();
            println!("  {:16} {}", name, values.join(", "));
        }
        println!();
    }

    let recommendations = recommend_all(
        table,
        &RecommendationColumns::new(columns.pizza_type.clone())
            .with_category(columns.pizza_size.clone())
            .with_date("order_time"),
        Some(5),
        7,
    );
    println!("## Popular Pizzas");
    for (rank, entry) in recommendations.popular_items.iter().enumerate() {
        println!(
            "  {}. {} ({} orders, {:.2}%)",
            rank + 1,
            entry.item,
            entry.order_count,
            entry.percentage
        );
    }
    if let Some(trending) = &recommendations.trending {
        println!();
        println!("## Trending");
        for entry in trending {
            println!("  {} ({:+.2})", entry.item, entry.trend);
        }
    }

    Ok(())
}
