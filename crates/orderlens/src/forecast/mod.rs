//! Forecasting a numeric column over time.
//!
//! Every method sorts the table by the date column (stable), drops rows
//! whose value is null, fits the remaining series and extends it by a
//! number of periods.

mod methods;
mod result;
mod series;

pub use methods::{exponential_smoothing, linear_trend, moving_average};
pub use result::{
    DEFAULT_PERIODS, DEFAULT_WINDOW, FittedParameters, ForecastComparison, ForecastMethod,
    ForecastResult, HistoricalPoint,
};
pub use series::{DateAggregation, aggregate_by_date};

use crate::error::Result;
use crate::table::Table;

/// Run one method.
pub fn forecast(
    table: &Table,
    date_column: &str,
    value_column: &str,
    periods: usize,
    method: &ForecastMethod,
) -> Result<ForecastResult> {
    match *method {
        ForecastMethod::ExponentialSmoothing { span } => {
            exponential_smoothing(table, date_column, value_column, periods, span)
        }
        ForecastMethod::MovingAverage { window } => {
            moving_average(table, date_column, value_column, periods, window)
        }
        ForecastMethod::LinearTrend => linear_trend(table, date_column, value_column, periods),
    }
}

/// Run all three methods with default parameters.
pub fn forecast_all(
    table: &Table,
    date_column: &str,
    value_column: &str,
    periods: usize,
) -> Result<ForecastComparison> {
    let (date, value) = (date_column, value_column);
    Ok(ForecastComparison {
        exponential_smoothing: exponential_smoothing(table, date, value, periods, None)?,
        moving_average: moving_average(table, date, value, periods, DEFAULT_WINDOW)?,
        linear_trend: linear_trend(table, date, value, periods)?,
    })
}
