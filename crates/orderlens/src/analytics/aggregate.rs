//! Grouped counts, rates and summaries.
//!
//! None of these fail: an empty table or a missing column gives an empty or
//! zeroed result.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::stats::{self, NumericStatistics};
use crate::table::{Column, Table, Value};

/// Row count plus sum, mean, min and max of one numeric column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Rows in the table, including rows where the value is null.
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Counts of a boolean flag and the rate at which it is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// Rows in the table.
    pub total: usize,
    /// Rows where the flag is false.
    pub on_time: usize,
    /// Rows where the flag is true.
    pub delayed: usize,
    /// `delayed / total` as a percentage, two decimals.
    pub delay_rate: f64,
}

/// Number of rows sharing one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: Value,
    pub count: usize,
}

/// Number of rows sharing a pair of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCount {
    pub first: Value,
    pub second: Value,
    pub count: usize,
}

/// Row count and flag rate for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRate {
    pub key: Value,
    pub count: usize,
    /// Percentage of rows with the flag set, over rows where it is known.
    pub rate: f64,
}

/// Read a flag cell. Booleans and the integers 0/1 are understood.
fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(0) => Some(false),
        Value::Integer(1) => Some(true),
        _ => None,
    }
}

/// Summarize `value_column`. Sum, mean, min and max are 0 when the column
/// is missing, not numeric, or entirely null.
pub fn summarize(table: &Table, value_column: &str) -> Summary {
    let count = table.row_count();
    let stats = table
        .column(value_column)
        .filter(|c| c.dtype().is_numeric())
        .and_then(|c| NumericStatistics::from_values(&c.numeric_values()));

    match stats {
        Some(s) => Summary {
            count,
            sum: s.sum,
            mean: s.mean,
            min: s.min,
            max: s.max,
        },
        None => Summary {
            count,
            ..Summary::default()
        },
    }
}

/// Count true and false values of `flag_column`.
pub fn performance(table: &Table, flag_column: &str) -> Performance {
    let total = table.row_count();
    let Some(column) = table.column(flag_column) else {
        return Performance {
            total,
            ..Performance::default()
        };
    };

    let (mut delayed, mut on_time) = (0, 0);
    for value in column.iter() {
        match flag(value) {
            Some(true) => delayed += 1,
            Some(false) => on_time += 1,
            None => {}
        }
    }

    Performance {
        total,
        on_time,
        delayed,
        delay_rate: stats::percentage(delayed, total),
    }
}

/// Group row indices by key, in first-seen key order.
fn group_rows(column: &Column) -> IndexMap<&Value, Vec<usize>> {
    let mut groups: IndexMap<&Value, Vec<usize>> = IndexMap::new();
    for (row, value) in column.iter().enumerate() {
        groups.entry(value).or_default().push(row);
    }
    groups
}

/// Rows per distinct value of `column`, sorted ascending by value.
pub fn count_by(table: &Table, column: &str) -> Vec<GroupCount> {
    let Some(column) = table.column(column) else {
        return Vec::new();
    };

    let mut counts: Vec<GroupCount> = group_rows(column)
        .into_iter()
        .map(|(key, rows)| GroupCount {
            key: key.clone(),
            count: rows.len(),
        })
        .collect();
    counts.sort_by(|a, b| a.key.cmp(&b.key));
    counts
}

/// Rows per distinct `(first, second)` pair, in first-seen order.
pub fn count_by_pair(table: &Table, first: &str, second: &str) -> Vec<PairCount> {
    let (Some(first), Some(second)) = (table.column(first), table.column(second)) else {
        return Vec::new();
    };

    let mut counts: IndexMap<(&Value, &Value), usize> = IndexMap::new();
    for (a, b) in first.iter().zip(second.iter()) {
        *counts.entry((a, b)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((a, b), count)| PairCount {
            first: a.clone(),
            second: b.clone(),
            count,
        })
        .collect()
}

/// Rows per distinct value of `group_column` with the rate of `flag_column`,
/// in first-seen order.
pub fn rate_by(table: &Table, group_column: &str, flag_column: &str) -> Vec<GroupRate> {
    let (Some(group), Some(flags)) = (table.column(group_column), table.column(flag_column)) else {
        return Vec::new();
    };

    group_rows(group)
        .into_iter()
        .map(|(key, rows)| {
            let known: Vec<bool> = rows.iter().filter_map(|&r| flag(&flags.values()[r])).collect();
            let set = known.iter().filter(|&&b| b).count();
            GroupRate {
                key: key.clone(),
                count: rows.len(),
                rate: stats::percentage(set, known.len()),
            }
        })
        .collect()
}
