//! Fuzz target for cleaning, analytics, forecasting and recommendations.
//!
//! Parses fuzzed CSV, then runs every stage with fuzzed options. Stages
//! that return `Result` may fail; none may panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use orderlens::analytics::{DeliveryColumns, full_report};
use orderlens::clean::{CleaningConfig, FillStrategy, Keep, OutlierMethod, clean, handle_outliers};
use orderlens::forecast::{ForecastMethod, forecast};
use orderlens::recommend::{RecommendationColumns, recommend_all};
use orderlens::ingest;

#[derive(Debug, Arbitrary)]
struct Input {
    csv: String,
    drop_nulls: bool,
    drop_duplicates: bool,
    keep_last: bool,
    trim_strings: bool,
    fill: u8,
    zscore: bool,
    periods: u8,
    window: u8,
    span: Option<u8>,
    recent_periods: u8,
}

fuzz_target!(|input: Input| {
    if input.csv.len() > 20_000 {
        return;
    }
    let Ok(table) = ingest(input.csv.as_bytes(), "csv") else {
        return;
    };
    let names: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
    let first = names.first().cloned().unwrap_or_default();
    let last = names.last().cloned().unwrap_or_default();

    let strategy = match input.fill % 7 {
        0 => FillStrategy::Forward,
        1 => FillStrategy::Backward,
        2 => FillStrategy::Mean,
        3 => FillStrategy::Median,
        4 => FillStrategy::Min,
        5 => FillStrategy::Max,
        _ => FillStrategy::Zero,
    };
    let mut config = CleaningConfig {
        drop_nulls: input.drop_nulls,
        drop_duplicates: input.drop_duplicates,
        keep: if input.keep_last { Keep::Last } else { Keep::First },
        trim_strings: input.trim_strings,
        date_columns: vec![first.clone()],
        ..CleaningConfig::default()
    };
    config.fill_null_strategy = strategy.apply_to_numeric(&table);

    let cleaned = clean(&table, &config);
    let method = if input.zscore { OutlierMethod::Zscore } else { OutlierMethod::Iqr };
    let cleaned = handle_outliers(&cleaned, &last, method);

    let _ = full_report(&cleaned, &DeliveryColumns::default());

    let periods = usize::from(input.periods % 32);
    for method in [
        ForecastMethod::ExponentialSmoothing { span: input.span.map(usize::from) },
        ForecastMethod::MovingAverage { window: usize::from(input.window) },
        ForecastMethod::LinearTrend,
    ] {
        let _ = forecast(&cleaned, &first, &last, periods, &method);
    }

    let columns = RecommendationColumns::new(last.clone())
        .with_category(first.clone())
        .with_order_id(first.clone())
        .with_date(first);
    let _ = recommend_all(&cleaned, &columns, None, usize::from(input.recent_periods));
});
