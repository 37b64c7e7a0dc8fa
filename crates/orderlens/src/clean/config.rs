//! Cleaning configuration and the named strategies it refers to.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{OrderlensError, Result};
use crate::input::parse_literal;
use crate::table::{Table, Value};

/// How nulls in one column are replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FillStrategy {
    /// Copy the nearest earlier non-null value.
    Forward,
    /// Copy the nearest later non-null value.
    Backward,
    Mean,
    Median,
    Min,
    Max,
    /// Substitute the integer 0.
    Zero,
    /// Substitute a caller-supplied literal.
    Custom(Value),
}

impl FillStrategy {
    /// Map every numeric column of `table` to this strategy.
    pub fn apply_to_numeric(&self, table: &Table) -> IndexMap<String, FillStrategy> {
        table
            .columns()
            .iter()
            .filter(|c| c.dtype().is_numeric())
            .map(|c| (c.name().to_string(), self.clone()))
            .collect()
    }
}

impl FromStr for FillStrategy {
    type Err = OrderlensError;

    /// Parse a strategy name; custom values are written `custom:<literal>`.
    fn from_str(s: &str) -> Result<Self> {
        if let Some(literal) = s.strip_prefix("custom:") {
            return Ok(FillStrategy::Custom(parse_literal(literal)));
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "ffill" => Ok(FillStrategy::Forward),
            "backward" | "bfill" => Ok(FillStrategy::Backward),
            "mean" => Ok(FillStrategy::Mean),
            "median" => Ok(FillStrategy::Median),
            "min" => Ok(FillStrategy::Min),
            "max" => Ok(FillStrategy::Max),
            "zero" => Ok(FillStrategy::Zero),
            other => Err(OrderlensError::InvalidConfig(format!(
                "unknown fill strategy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStrategy::Forward => write!(f, "forward"),
            FillStrategy::Backward => write!(f, "backward"),
            FillStrategy::Mean => write!(f, "mean"),
            FillStrategy::Median => write!(f, "median"),
            FillStrategy::Min => write!(f, "min"),
            FillStrategy::Max => write!(f, "max"),
            FillStrategy::Zero => write!(f, "zero"),
            FillStrategy::Custom(value) => write!(f, "custom:{}", value),
        }
    }
}

impl TryFrom<String> for FillStrategy {
    type Error = OrderlensError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FillStrategy> for String {
    fn from(strategy: FillStrategy) -> Self {
        strategy.to_string()
    }
}

/// Which occurrence of a duplicate survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keep {
    #[default]
    First,
    Last,
}

impl FromStr for Keep {
    type Err = OrderlensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Keep::First),
            "last" => Ok(Keep::Last),
            other => Err(OrderlensError::InvalidConfig(format!(
                "unknown keep option '{}' (expected first or last)",
                other
            ))),
        }
    }
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keep::First => write!(f, "first"),
            Keep::Last => write!(f, "last"),
        }
    }
}

/// Rule for deciding which numeric values are outliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Outside `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`.
    Iqr,
    /// More than three standard deviations from the mean.
    #[serde(alias = "z_score")]
    Zscore,
}

impl FromStr for OutlierMethod {
    type Err = OrderlensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(OutlierMethod::Iqr),
            "zscore" | "z_score" | "z-score" => Ok(OutlierMethod::Zscore),
            other => Err(OrderlensError::InvalidConfig(format!(
                "unknown outlier method '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierMethod::Iqr => write!(f, "iqr"),
            OutlierMethod::Zscore => write!(f, "zscore"),
        }
    }
}

/// Options for [`clean`](super::clean). Every step is off by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Remove rows containing any null.
    pub drop_nulls: bool,

    /// Remove duplicate rows.
    pub drop_duplicates: bool,

    /// Key columns for duplicate detection (None = the whole row).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_subset: Option<Vec<String>>,

    /// Which duplicate to retain.
    pub keep: Keep,

    /// Per-column null replacement, applied in insertion order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub fill_null_strategy: IndexMap<String, FillStrategy>,

    /// Strip surrounding whitespace from string values.
    pub trim_strings: bool,

    /// Columns to convert from text to timestamps.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub date_columns: Vec<String>,
}

impl CleaningConfig {
    /// Preset for delivery exports: drop incomplete rows and parse the order
    /// and delivery times.
    pub fn delivery_defaults() -> Self {
        Self {
            drop_nulls: true,
            date_columns: vec!["order_time".to_string(), "delivery_time".to_string()],
            ..Self::default()
        }
    }

    /// Set the fill strategy for one column.
    pub fn fill(mut self, column: impl Into<String>, strategy: FillStrategy) -> Self {
        self.fill_null_strategy.insert(column.into(), strategy);
        self
    }
}
