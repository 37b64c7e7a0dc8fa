//! Turning a table into the ordered numeric series a forecast is fitted on.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OrderlensError, Result};
use crate::stats;
use crate::table::{Column, ColumnType, Table, Value};

/// A date-ordered series of observations.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Series {
    pub dates: Vec<Value>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Sort by `date_column` (stable) and collect the non-null values of
/// `value_column`.
pub(crate) fn prepare_series(
    table: &Table,
    date_column: &str,
    value_column: &str,
) -> Result<Series> {
    table.require_column(date_column)?;
    let value = table.require_column(value_column)?;
    if !value.dtype().is_numeric() && value.dtype() != ColumnType::Null {
        return Err(OrderlensError::ForecastFailure(format!(
            "column '{}' is {}, not numeric",
            value_column,
            value.dtype()
        )));
    }

    let sorted = table.sort_by_column(date_column)?;
    let dates = sorted.require_column(date_column)?;
    let values = sorted.require_column(value_column)?;

    let mut series = Series {
        dates: Vec::with_capacity(sorted.row_count()),
        values: Vec::with_capacity(sorted.row_count()),
    };
    for (date, value) in dates.iter().zip(values.iter()) {
        if let Some(v) = value.as_f64() {
            series.dates.push(date.clone());
            series.values.push(v);
        }
    }

    let skipped = sorted.row_count() - series.len();
    if skipped > 0 {
        debug!(skipped, column = value_column, "skipped rows with null values");
    }
    if series.values.is_empty() {
        return Err(OrderlensError::ForecastFailure(format!(
            "column '{}' has no values to fit",
            value_column
        )));
    }
    Ok(series)
}

/// How rows sharing a date are combined by [`aggregate_by_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateAggregation {
    #[default]
    Sum,
    Mean,
    /// Number of rows, regardless of the value.
    Count,
}

impl FromStr for DateAggregation {
    type Err = OrderlensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(DateAggregation::Sum),
            "mean" | "avg" => Ok(DateAggregation::Mean),
            "count" => Ok(DateAggregation::Count),
            other => Err(OrderlensError::InvalidConfig(format!(
                "unknown date aggregation '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DateAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateAggregation::Sum => write!(f, "sum"),
            DateAggregation::Mean => write!(f, "mean"),
            DateAggregation::Count => write!(f, "count"),
        }
    }
}

/// Collapse the table to one row per date, sorted by date.
///
/// Timestamps are grouped by calendar day. The result has two columns named
/// after `date_column` and `value_column`. Null values are ignored by `Sum`
/// and `Mean`; a date with no values gets a null mean.
pub fn aggregate_by_date(
    table: &Table,
    date_column: &str,
    value_column: &str,
    aggregation: DateAggregation,
) -> Result<Table> {
    let dates = table.require_column(date_column)?;
    let values = table.require_column(value_column)?;

    let mut groups: IndexMap<Value, (usize, Vec<f64>)> = IndexMap::new();
    for (date, value) in dates.iter().zip(values.iter()) {
        let entry = groups.entry(date.to_day()).or_default();
        entry.0 += 1;
        if let Some(v) = value.as_f64() {
            entry.1.push(v);
        }
    }
    groups.sort_keys();

    let integer_sums = values.dtype() == ColumnType::Integer;
    let (keys, aggregated): (Vec<Value>, Vec<Value>) = groups
        .into_iter()
        .map(|(date, (rows, present))| {
            let value = match aggregation {
                DateAggregation::Count => Value::Integer(rows as i64),
                DateAggregation::Sum if integer_sums => {
                    Value::Integer(present.iter().map(|v| *v as i64).sum())
                }
                DateAggregation::Sum => Value::Float(present.iter().sum()),
                DateAggregation::Mean => {
                    stats::mean(&present).map(Value::Float).unwrap_or_default()
                }
            };
            (date, value)
        })
        .unzip();

    Table::new(vec![
        Column::new(date_column, keys),
        Column::new(value_column, aggregated),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> Value {
        Value::Timestamp(NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap())
    }

    fn sample() -> Table {
        Table::from_rows(
            vec!["date".into(), "sales".into()],
            vec![
                vec![ts("2024-01-02 09:00:00"), Value::Integer(3)],
                vec![ts("2024-01-01 12:00:00"), Value::Integer(1)],
                vec![ts("2024-01-02 18:00:00"), Value::Null],
                vec![ts("2024-01-02 20:00:00"), Value::Integer(5)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_prepare_series_sorts_and_skips_nulls() {
        let series = prepare_series(&sample(), "date", "sales").unwrap();
        assert_eq!(series.values, vec![1.0, 3.0, 5.0]);
        assert_eq!(series.dates[0], ts("2024-01-01 12:00:00"));
    }

    #[test]
    fn test_prepare_series_missing_column() {
        assert!(matches!(
            prepare_series(&sample(), "day", "sales"),
            Err(OrderlensError::ColumnNotFound(c)) if c == "day"
        ));
        assert!(matches!(
            prepare_series(&sample(), "date", "revenue"),
            Err(OrderlensError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_prepare_series_rejects_non_numeric() {
        assert!(matches!(
            prepare_series(&sample(), "sales", "date"),
            Err(OrderlensError::ForecastFailure(_))
        ));
    }

    #[test]
    fn test_aggregate_by_date() {
        let daily = aggregate_by_date(&sample(), "date", "sales", DateAggregation::Sum).unwrap();
        assert_eq!(daily.column_names(), vec!["date", "sales"]);
        assert_eq!(
            daily.column("date").unwrap().values(),
            &[ts("2024-01-01 00:00:00"), ts("2024-01-02 00:00:00")]
        );
        assert_eq!(
            daily.column("sales").unwrap().values(),
            &[Value::Integer(1), Value::Integer(8)]
        );

        let counts = aggregate_by_date(&sample(), "date", "sales", DateAggregation::Count).unwrap();
        assert_eq!(counts.get(1, 1), Some(&Value::Integer(3)));

        let means = aggregate_by_date(&sample(), "date", "sales", DateAggregation::Mean).unwrap();
        assert_eq!(means.get(1, 1), Some(&Value::Float(4.0)));
    }
}
