//! The three forecasting methods.

use tracing::debug;

use crate::error::{OrderlensError, Result};
use crate::stats;
use crate::table::Table;

use super::result::{FittedParameters, ForecastResult, HistoricalPoint};
use super::series::{Series, prepare_series};

/// Pair each observation with its fitted value.
fn historical(series: &Series, fitted: &[f64]) -> Vec<HistoricalPoint> {
    series
        .dates
        .iter()
        .zip(&series.values)
        .zip(fitted)
        .map(|((date, &actual), &fitted)| HistoricalPoint {
            date: date.clone(),
            actual,
            fitted,
        })
        .collect()
}

/// Reject NaN or infinite output instead of returning it.
fn check_finite(result: ForecastResult) -> Result<ForecastResult> {
    let finite = result.forecast.iter().all(|v| v.is_finite())
        && result.historical.iter().all(|p| p.fitted.is_finite());
    if finite {
        Ok(result)
    } else {
        Err(OrderlensError::ForecastFailure(format!(
            "{} produced non-finite values",
            result.parameters.name()
        )))
    }
}

/// Exponentially weighted moving average.
///
/// `span` defaults to `min(2 * periods, rows)` and is at least 1; the
/// smoothing factor is `2 / (span + 1)`. Every forecast step repeats the
/// last smoothed value.
pub fn exponential_smoothing(
    table: &Table,
    date_column: &str,
    value_column: &str,
    periods: usize,
    span: Option<usize>,
) -> Result<ForecastResult> {
    let series = prepare_series(table, date_column, value_column)?;
    let span = span
        .unwrap_or_else(|| (2 * periods).min(series.len()))
        .max(1);
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut smoothed = series.values[0];
    let mut fitted = Vec::with_capacity(series.len());
    fitted.push(smoothed);
    for &value in &series.values[1..] {
        smoothed = alpha * value + (1.0 - alpha) * smoothed;
        fitted.push(smoothed);
    }

    debug!(span, alpha, rows = series.len(), "fitted exponential smoothing");
    check_finite(ForecastResult {
        historical: historical(&series, &fitted),
        forecast: vec![smoothed; periods],
        parameters: FittedParameters::ExponentialSmoothing { span, alpha },
    })
}

/// Trailing moving average over up to `window` values.
///
/// Near the start of the series the window expands from a single value.
/// Every forecast step repeats the mean of the last `window` values.
pub fn moving_average(
    table: &Table,
    date_column: &str,
    value_column: &str,
    periods: usize,
    window: usize,
) -> Result<ForecastResult> {
    let series = prepare_series(table, date_column, value_column)?;
    let window = window.min(series.len()).max(1);

    let fitted: Vec<f64> = (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            stats::mean(&series.values[start..=i]).unwrap_or_default()
        })
        .collect();
    let next = stats::mean(&series.values[series.len() - window..]).unwrap_or_default();

    debug!(window, rows = series.len(), "fitted moving average");
    check_finite(ForecastResult {
        historical: historical(&series, &fitted),
        forecast: vec![next; periods],
        parameters: FittedParameters::MovingAverage { window },
    })
}

/// Ordinary least squares of value against row position (0-based).
///
/// Forecasts below zero are clamped to zero; fitted values are not.
pub fn linear_trend(
    table: &Table,
    date_column: &str,
    value_column: &str,
    periods: usize,
) -> Result<ForecastResult> {
    let series = prepare_series(table, date_column, value_column)?;
    let n = series.len();

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = stats::mean(&series.values).unwrap_or_default();
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, &y) in series.values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    // A single point has no slope
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * x_mean;

    let fitted: Vec<f64> = (0..n).map(|i| intercept + slope * i as f64).collect();
    let forecast = (n..n + periods)
        .map(|i| (intercept + slope * i as f64).max(0.0))
        .collect();

    debug!(slope, intercept, rows = n, "fitted linear trend");
    check_finite(ForecastResult {
        historical: historical(&series, &fitted),
        forecast,
        parameters: FittedParameters::LinearTrend { slope, intercept },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn series_table(values: &[f64]) -> Table {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| vec![Value::Integer(i as i64), Value::Float(*v)])
            .collect();
        Table::from_rows(vec!["day".into(), "value".into()], rows).unwrap()
    }

    fn fitted(result: &ForecastResult) -> Vec<f64> {
        result.historical.iter().map(|p| p.fitted).collect()
    }

    #[test]
    fn test_moving_average_window_three() {
        let table = series_table(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = moving_average(&table, "day", "value", 2, 3).unwrap();
        assert_eq!(fitted(&result), vec![1.0, 1.5, 2.0, 3.0, 4.0]);
        assert_eq!(result.forecast, vec![4.0, 4.0]);
        assert_eq!(result.parameters, FittedParameters::MovingAverage { window: 3 });
    }

    #[test]
    fn test_moving_average_window_larger_than_series() {
        let table = series_table(&[2.0, 4.0]);
        let result = moving_average(&table, "day", "value", 1, 7).unwrap();
        assert_eq!(result.forecast, vec![3.0]);
        assert_eq!(result.parameters, FittedParameters::MovingAverage { window: 2 });
    }

    #[test]
    fn test_exponential_smoothing() {
        let table = series_table(&[10.0, 20.0, 30.0]);
        // span = min(2 * 1, 3) = 2, alpha = 2/3
        let result = exponential_smoothing(&table, "day", "value", 1, None).unwrap();
        let f = fitted(&result);
        assert_eq!(f[0], 10.0);
        assert!((f[1] - (10.0 / 3.0 + 40.0 / 3.0)).abs() < 1e-9);
        assert!((result.forecast[0] - f[2]).abs() < 1e-12);
        match result.parameters {
            FittedParameters::ExponentialSmoothing { span, alpha } => {
                assert_eq!(span, 2);
                assert!((alpha - 2.0 / 3.0).abs() < 1e-12);
            }
            other => panic!("unexpected parameters {:?}", other),
        }
    }

    #[test]
    fn test_exponential_smoothing_zero_periods() {
        let table = series_table(&[1.0, 2.0]);
        let result = exponential_smoothing(&table, "day", "value", 0, None).unwrap();
        assert!(result.forecast.is_empty());
        assert_eq!(fitted(&result), vec![1.0, 2.0]);
    }

    #[test]
    fn test_linear_trend_exact_line() {
        let table = series_table(&[3.0, 5.0, 7.0, 9.0]);
        let result = linear_trend(&table, "day", "value", 2).unwrap();
        match result.parameters {
            FittedParameters::LinearTrend { slope, intercept } => {
                assert!((slope - 2.0).abs() < 1e-9);
                assert!((intercept - 3.0).abs() < 1e-9);
            }
            other => panic!("unexpected parameters {:?}", other),
        }
        assert!((result.forecast[0] - 11.0).abs() < 1e-9);
        assert!((result.forecast[1] - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_trend_clamps_negative_forecast() {
        let table = series_table(&[6.0, 4.0, 2.0]);
        let result = linear_trend(&table, "day", "value", 3).unwrap();
        assert_eq!(result.forecast, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_linear_trend_single_point() {
        let table = series_table(&[5.0]);
        let result = linear_trend(&table, "day", "value", 2).unwrap();
        assert_eq!(result.forecast, vec![5.0, 5.0]);
    }

    #[test]
    fn test_sorts_by_date_before_fitting() {
        let table = Table::from_rows(
            vec!["day".into(), "value".into()],
            vec![
                vec![Value::Integer(2), Value::Float(3.0)],
                vec![Value::Integer(0), Value::Float(1.0)],
                vec![Value::Integer(1), Value::Float(2.0)],
            ],
        )
        .unwrap();
        let result = moving_average(&table, "day", "value", 1, 1).unwrap();
        assert_eq!(fitted(&result), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_infinite_values_fail() {
        let table = series_table(&[f64::MAX, f64::MAX]);
        assert!(matches!(
            moving_average(&table, "day", "value", 1, 2),
            Err(OrderlensError::ForecastFailure(_))
        ));
    }
}
