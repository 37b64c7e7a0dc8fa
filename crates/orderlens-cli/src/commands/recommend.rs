//! Recommend command - rank items from order history.

use std::path::{Path, PathBuf};

use colored::Colorize;
use orderlens::recommend::{
    AllRecommendations, Recommendation, RecommendationColumns, RecommendationMethod,
    RecommendationRequest, recommend, recommend_all,
};

use super::{CommandResult, cell, load, pipeline_config};

pub struct RecommendArgs {
    pub file: PathBuf,
    pub item: String,
    pub method: Option<RecommendationMethod>,
    pub category: Option<String>,
    pub order_id: Option<String>,
    pub date: Option<String>,
    pub top: Option<usize>,
    pub recent_periods: usize,
    pub json: bool,
}

fn entry_line(entry: &Recommendation) -> String {
    match entry {
        Recommendation::Popular(p) => format!(
            "{:24} {:6} orders  {:6.2}%",
            cell(&p.item),
            p.order_count,
            p.percentage
        ),
        Recommendation::Categorized(c) => format!(
            "{:16} {:24} {:6} orders",
            cell(&c.category),
            cell(&c.item),
            c.order_count
        ),
        Recommendation::Pair(p) => format!(
            "{:20} + {:20} {:6} orders",
            cell(&p.item1),
            cell(&p.item2),
            p.co_occurrence
        ),
        Recommendation::Trending(t) => format!(
            "{:24} trend {:+.4}  recent {} ({:.2}/period)",
            cell(&t.item),
            t.trend,
            t.recent_count,
            t.recent_average
        ),
    }
}

fn print_section(title: &str, entries: &[Recommendation]) {
    println!("{}", title.yellow().bold());
    if entries.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (rank, entry) in entries.iter().enumerate() {
        println!("  {:>3}. {}", rank + 1, entry_line(entry));
    }
    println!();
}

fn print_all(all: &AllRecommendations) {
    let sections: [(&str, Option<Vec<Recommendation>>); 4] = [
        (
            "Popular items:",
            Some(all.popular_items.iter().cloned().map(Recommendation::Popular).collect()),
        ),
        (
            "By category:",
            all.by_category
                .as_ref()
                .map(|v| v.iter().cloned().map(Recommendation::Categorized).collect()),
        ),
        (
            "Frequently bought together:",
            all.frequently_bought_together
                .as_ref()
                .map(|v| v.iter().cloned().map(Recommendation::Pair).collect()),
        ),
        (
            "Trending:",
            all.trending
                .as_ref()
                .map(|v| v.iter().cloned().map(Recommendation::Trending).collect()),
        ),
    ];
    for (title, entries) in sections {
        if let Some(entries) = entries {
            print_section(title, &entries);
        }
    }
}

pub fn run(args: RecommendArgs, config: Option<&Path>) -> CommandResult {
    let loaded = load(&args.file, pipeline_config(config)?)?;
    let columns = RecommendationColumns {
        item: args.item.clone(),
        category: args.category.clone(),
        order_id: args.order_id.clone(),
        date: args.date.clone(),
    };

    if !loaded.table.has_column(&columns.item) {
        eprintln!(
            "{} item column '{}' not found; no recommendations",
            "Warning:".yellow().bold(),
            columns.item
        );
    }

    match args.method {
        Some(method) => {
            let mut request = RecommendationRequest::new(method, columns)
                .with_recent_periods(args.recent_periods);
            request.n = args.top;
            let result = recommend(&loaded.table, &request);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_section(&format!("{}:", result.method), &result.recommendations);
            }
        }
        None => {
            let all = recommend_all(&loaded.table, &columns, args.top, args.recent_periods);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                print_all(&all);
            }
        }
    }

    Ok(())
}
