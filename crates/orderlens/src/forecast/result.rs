//! Forecast requests and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrderlensError, Result};
use crate::table::Value;

/// Default forecast horizon.
pub const DEFAULT_PERIODS: usize = 7;
/// Default moving-average window.
pub const DEFAULT_WINDOW: usize = 7;

/// A forecasting method with its tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ForecastMethod {
    /// EWMA; `span` of None derives it from the horizon.
    ExponentialSmoothing { span: Option<usize> },
    MovingAverage { window: usize },
    LinearTrend,
}

impl ForecastMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ForecastMethod::ExponentialSmoothing { .. } => "exponential_smoothing",
            ForecastMethod::MovingAverage { .. } => "moving_average",
            ForecastMethod::LinearTrend => "linear_trend",
        }
    }
}

impl FromStr for ForecastMethod {
    type Err = OrderlensError;

    /// Parse a method name with default parameters.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "exponential_smoothing" | "ewma" => {
                Ok(ForecastMethod::ExponentialSmoothing { span: None })
            }
            "moving_average" | "ma" => Ok(ForecastMethod::MovingAverage {
                window: DEFAULT_WINDOW,
            }),
            "linear_trend" | "linear" => Ok(ForecastMethod::LinearTrend),
            other => Err(OrderlensError::InvalidConfig(format!(
                "unknown forecast method '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters a method actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FittedParameters {
    ExponentialSmoothing { span: usize, alpha: f64 },
    MovingAverage { window: usize },
    LinearTrend { slope: f64, intercept: f64 },
}

impl FittedParameters {
    pub fn name(&self) -> &'static str {
        match self {
            FittedParameters::ExponentialSmoothing { .. } => "exponential_smoothing",
            FittedParameters::MovingAverage { .. } => "moving_average",
            FittedParameters::LinearTrend { .. } => "linear_trend",
        }
    }
}

/// One observation and the model's fitted value for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: Value,
    pub actual: f64,
    pub fitted: f64,
}

/// Fitted history plus the values predicted for the next periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Date-sorted observations used for fitting.
    pub historical: Vec<HistoricalPoint>,
    /// Exactly `periods` future values.
    pub forecast: Vec<f64>,
    #[serde(flatten)]
    pub parameters: FittedParameters,
}

/// Results of every method over the same series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastComparison {
    pub exponential_smoothing: ForecastResult,
    pub moving_average: ForecastResult,
    pub linear_trend: ForecastResult,
}
