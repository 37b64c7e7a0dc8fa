//! The cleaning steps and the fixed order they run in.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::stats::NumericStatistics;
use crate::table::{Column, ColumnType, TIMESTAMP_FORMAT, Table, Value};

use super::config::{CleaningConfig, FillStrategy, Keep, OutlierMethod};
use super::report::{CleaningReport, CleaningStep};

const DATE_FORMAT: &str = "%Y-%m-%d";
const IQR_MULTIPLIER: f64 = 1.5;
const ZSCORE_THRESHOLD: f64 = 3.0;

/// Clean a table according to `config`, returning a new table.
pub fn clean(table: &Table, config: &CleaningConfig) -> Table {
    clean_with_report(table, config).0
}

/// Clean a table and report what each step did.
///
/// Steps run in this order: drop nulls, drop duplicates, trim strings, fill
/// nulls, coerce dates. Steps that are switched off are not reported.
pub fn clean_with_report(table: &Table, config: &CleaningConfig) -> (Table, CleaningReport) {
    let mut report = CleaningReport::new(table.row_count());
    let mut current = table.clone();

    if config.drop_nulls {
        let before = current.row_count();
        current = drop_null_rows(&current);
        let removed = before - current.row_count();
        debug!(removed, "dropped rows with nulls");
        report.add_step(CleaningStep::rows("drop_nulls", removed));
    }

    if config.drop_duplicates {
        let before = current.row_count();
        current = remove_duplicates(&current, config.duplicate_subset.as_deref(), config.keep);
        let removed = before - current.row_count();
        debug!(removed, keep = %config.keep, "dropped duplicate rows");
        report.add_step(CleaningStep::rows("drop_duplicates", removed));
    }

    if config.trim_strings {
        let (trimmed, changed) = trim_strings(&current);
        current = trimmed;
        debug!(changed, "trimmed string values");
        report.add_step(CleaningStep::values("trim_strings", None, changed));
    }

    for (name, strategy) in &config.fill_null_strategy {
        let Some(column) = current.column(name) else {
            warn!(column = %name, "fill strategy names a missing column, skipping");
            continue;
        };
        let changed = match fill_nulls(column, strategy) {
            Some(filled) => {
                let changed = column.null_count() - filled.null_count();
                current = current.map_columns(|c| {
                    if c.name() == name { filled.clone() } else { c.clone() }
                });
                changed
            }
            None => 0,
        };
        debug!(column = %name, strategy = %strategy, changed, "filled nulls");
        report.add_step(CleaningStep::values("fill_null", Some(name), changed));
    }

    for name in &config.date_columns {
        let Some(column) = current.column(name) else {
            warn!(column = %name, "date column not found, skipping");
            continue;
        };
        let changed = match coerce_dates(column) {
            Some(coerced) => {
                let changed = coerced.len() - coerced.null_count();
                current = current.map_columns(|c| {
                    if c.name() == name { coerced.clone() } else { c.clone() }
                });
                changed
            }
            None => 0,
        };
        report.add_step(CleaningStep::values("coerce_dates", Some(name), changed));
    }

    (current, report)
}

fn drop_null_rows(table: &Table) -> Table {
    table.filter_rows(|i| !table.row_has_null(i))
}

fn row_key<'a>(columns: &[&'a Column], row: usize) -> Vec<&'a Value> {
    columns.iter().map(|c| &c.values()[row]).collect()
}

/// Remove duplicate rows, keeping the first or last occurrence of each.
///
/// With a `subset`, rows are duplicates when they agree on those columns;
/// otherwise the whole row is compared. Surviving rows keep their relative
/// order. Unknown subset columns are ignored.
pub fn remove_duplicates(table: &Table, subset: Option<&[String]>, keep: Keep) -> Table {
    let key_columns: Vec<&Column> = match subset {
        Some(names) if !names.is_empty() => {
            let known: Vec<&Column> = names
                .iter()
                .filter_map(|name| {
                    let column = table.column(name);
                    if column.is_none() {
                        warn!(column = %name, "duplicate key column not found, skipping");
                    }
                    column
                })
                .collect();
            if known.is_empty() {
                return table.clone();
            }
            known
        }
        _ => table.columns().iter().collect(),
    };

    let rows = table.row_count();
    let retained: Vec<usize> = match keep {
        Keep::First => {
            let mut seen = HashSet::with_capacity(rows);
            (0..rows)
                .filter(|&i| seen.insert(row_key(&key_columns, i)))
                .collect()
        }
        Keep::Last => {
            let mut last_seen: HashMap<Vec<&Value>, usize> = HashMap::with_capacity(rows);
            for i in 0..rows {
                last_seen.insert(row_key(&key_columns, i), i);
            }
            (0..rows)
                .filter(|&i| last_seen.get(&row_key(&key_columns, i)) == Some(&i))
                .collect()
        }
    };

    table.take_rows(&retained)
}

/// Trim every string value; returns the table and the number of values changed.
fn trim_strings(table: &Table) -> (Table, usize) {
    let mut changed = 0;
    let trimmed = table.map_columns(|column| {
        if column.dtype() != ColumnType::String {
            return column.clone();
        }
        let values = column
            .iter()
            .map(|value| match value {
                Value::String(s) => {
                    let t = s.trim();
                    if t.len() != s.len() {
                        changed += 1;
                    }
                    Value::String(t.to_string())
                }
                other => other.clone(),
            })
            .collect();
        column.with_values(values)
    });
    (trimmed, changed)
}

/// Fill the nulls of one column, or `None` when the strategy has nothing to
/// work with.
fn fill_nulls(column: &Column, strategy: &FillStrategy) -> Option<Column> {
    if column.null_count() == 0 {
        return None;
    }

    match strategy {
        FillStrategy::Forward => Some(column.with_values(carry_forward(column.iter()))),
        FillStrategy::Backward => {
            let mut values = carry_forward(column.iter().rev());
            values.reverse();
            Some(column.with_values(values))
        }
        FillStrategy::Mean | FillStrategy::Median => {
            if !column.dtype().is_numeric() {
                warn!(column = column.name(), strategy = %strategy, "column is not numeric");
                return None;
            }
            let stats = NumericStatistics::from_values(&column.numeric_values())?;
            let fill = if *strategy == FillStrategy::Mean {
                stats.mean
            } else {
                stats.median
            };
            Some(substitute(column, Value::Float(fill)))
        }
        FillStrategy::Min => {
            let fill = column.iter().filter(|v| !v.is_null()).min()?.clone();
            Some(substitute(column, fill))
        }
        FillStrategy::Max => {
            let fill = column.iter().filter(|v| !v.is_null()).max()?.clone();
            Some(substitute(column, fill))
        }
        FillStrategy::Zero => {
            let zero = match column.dtype() {
                ColumnType::Float => Value::Float(0.0),
                ColumnType::Boolean => Value::Boolean(false),
                _ => Value::Integer(0),
            };
            substitute_same_type(column, strategy, zero)
        }
        FillStrategy::Custom(value) => substitute_same_type(column, strategy, value.clone()),
    }
}

/// Substitute `fill` only if the column keeps its type. An all-null column
/// takes the type of the fill.
fn substitute_same_type(column: &Column, strategy: &FillStrategy, fill: Value) -> Option<Column> {
    let dtype = column.dtype();
    if dtype != ColumnType::Null && dtype.unify(fill.column_type()) != dtype {
        warn!(
            column = column.name(),
            strategy = %strategy,
            dtype = %dtype,
            "fill value does not match the column type, skipping"
        );
        return None;
    }
    Some(substitute(column, fill))
}

fn carry_forward<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<Value> {
    let mut last: Option<&Value> = None;
    values
        .map(|value| {
            if value.is_null() {
                last.cloned().unwrap_or_default()
            } else {
                last = Some(value);
                value.clone()
            }
        })
        .collect()
}

fn substitute(column: &Column, fill: Value) -> Column {
    let values = column
        .iter()
        .map(|v| if v.is_null() { fill.clone() } else { v.clone() })
        .collect();
    column.with_values(values)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a whole string column with `parse`, or `None` if any value fails.
fn parse_all(column: &Column, parse: fn(&str) -> Option<NaiveDateTime>) -> Option<Vec<Value>> {
    column
        .iter()
        .map(|value| match value {
            Value::Null => Some(Value::Null),
            Value::String(s) => parse(s).map(Value::Timestamp),
            _ => None,
        })
        .collect()
}

/// Convert a text column to timestamps, trying the full timestamp pattern
/// and then the date-only one. The column is left as is if neither fits.
fn coerce_dates(column: &Column) -> Option<Column> {
    match column.dtype() {
        ColumnType::Timestamp | ColumnType::Null => return None,
        ColumnType::String => {}
        other => {
            warn!(column = column.name(), dtype = %other, "cannot coerce non-text column to dates");
            return None;
        }
    }

    match parse_all(column, parse_timestamp).or_else(|| parse_all(column, parse_date)) {
        Some(values) => Some(column.with_values(values)),
        None => {
            warn!(column = column.name(), "values do not match a date pattern, left unchanged");
            None
        }
    }
}

/// Drop rows whose value in `column` is an outlier under `method`.
///
/// Rows with a null or non-numeric value are kept. A missing or non-numeric
/// column leaves the table unchanged.
pub fn handle_outliers(table: &Table, column: &str, method: OutlierMethod) -> Table {
    let Some(col) = table.column(column) else {
        warn!(column, "outlier column not found, skipping");
        return table.clone();
    };
    let Some(stats) = NumericStatistics::from_values(&col.numeric_values()) else {
        return table.clone();
    };

    let (low, high) = stats.iqr_bounds(IQR_MULTIPLIER);
    let within = |x: f64| match method {
        OutlierMethod::Iqr => x >= low && x <= high,
        OutlierMethod::Zscore => stats.z_score(x).abs() <= ZSCORE_THRESHOLD,
    };

    let filtered = table.filter_rows(|i| col.values()[i].as_f64().is_none_or(within));
    debug!(
        column,
        method = %method,
        removed = table.row_count() - filtered.row_count(),
        "removed outliers"
    );
    filtered
}
