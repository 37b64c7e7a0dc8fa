//! Forecast command - extend a numeric column over future periods.

use std::path::{Path, PathBuf};

use colored::Colorize;
use orderlens::forecast::{
    self, DEFAULT_WINDOW, DateAggregation, ForecastComparison, ForecastMethod, ForecastResult,
    aggregate_by_date,
};

use super::{CommandResult, cell, load, pipeline_config};

pub struct ForecastArgs {
    pub file: PathBuf,
    pub date: String,
    pub value: String,
    pub periods: usize,
    pub method: Option<ForecastMethod>,
    pub window: Option<usize>,
    pub span: Option<usize>,
    pub per_day: Option<DateAggregation>,
    pub json: bool,
}

/// Apply `--window` / `--span` to the method they tune.
fn tuned(method: ForecastMethod, window: Option<usize>, span: Option<usize>) -> ForecastMethod {
    match method {
        ForecastMethod::MovingAverage { window: default } => ForecastMethod::MovingAverage {
            window: window.unwrap_or(default),
        },
        ForecastMethod::ExponentialSmoothing { span: default } => {
            ForecastMethod::ExponentialSmoothing {
                span: span.or(default),
            }
        }
        ForecastMethod::LinearTrend => ForecastMethod::LinearTrend,
    }
}

fn print_result(name: &str, result: &ForecastResult) {
    println!("{} {:?}", name.yellow().bold(), result.parameters);
    if let Some(last) = result.historical.last() {
        println!(
            "  last observation {} = {:.2} (fitted {:.2})",
            cell(&last.date),
            last.actual,
            last.fitted
        );
    }
    let forecast: Vec<String> = result.forecast.iter().map(|v| format!("{:.2}", v)).collect();
    println!("  forecast: {}", forecast.join(", ").white().bold());
    println!();
}

pub fn run(args: ForecastArgs, config: Option<&Path>) -> CommandResult {
    let loaded = load(&args.file, pipeline_config(config)?)?;
    let table = match args.per_day {
        Some(aggregation) => {
            aggregate_by_date(&loaded.table, &args.date, &args.value, aggregation)?
        }
        None => loaded.table,
    };

    match args.method {
        Some(method) => {
            let method = tuned(method, args.window, args.span);
            let result =
                forecast::forecast(&table, &args.date, &args.value, args.periods, &method)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(method.name(), &result);
            }
        }
        None => {
            let all = if args.window.is_none() && args.span.is_none() {
                forecast::forecast_all(&table, &args.date, &args.value, args.periods)?
            } else {
                let run = |method: ForecastMethod| {
                    let method = tuned(method, args.window, args.span);
                    forecast::forecast(&table, &args.date, &args.value, args.periods, &method)
                };
                ForecastComparison {
                    exponential_smoothing: run(ForecastMethod::ExponentialSmoothing {
                        span: None,
                    })?,
                    moving_average: run(ForecastMethod::MovingAverage {
                        window: DEFAULT_WINDOW,
                    })?,
                    linear_trend: run(ForecastMethod::LinearTrend)?,
                }
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                print_result("exponential_smoothing", &all.exponential_smoothing);
                print_result("moving_average", &all.moving_average);
                print_result("linear_trend", &all.linear_trend);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuned_only_touches_matching_method() {
        let ma = "moving_average".parse::<ForecastMethod>().unwrap();
        assert_eq!(
            tuned(ma, Some(3), Some(9)),
            ForecastMethod::MovingAverage { window: 3 }
        );
        assert_eq!(
            tuned(ForecastMethod::LinearTrend, Some(3), Some(9)),
            ForecastMethod::LinearTrend
        );
        let ewma = "ewma".parse::<ForecastMethod>().unwrap();
        assert_eq!(
            tuned(ewma, None, Some(4)),
            ForecastMethod::ExponentialSmoothing { span: Some(4) }
        );
    }
}
