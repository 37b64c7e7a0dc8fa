//! The four ranking methods.
//!
//! Rows whose item, category, order id or date is null never form a group.
//! Equal scores keep the order in which their groups were first seen.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::stats::{self, round_to};
use crate::table::{Column, Table, Value};

use super::result::{CategoryItem, ItemPair, PopularItem, TrendingItem};

/// Occurrences per non-null value, in first-seen order.
fn count_values<'a>(values: impl Iterator<Item = &'a Value>) -> IndexMap<&'a Value, usize> {
    let mut counts: IndexMap<&Value, usize> = IndexMap::new();
    for value in values.filter(|v| !v.is_null()) {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Counts sorted descending; the sort is stable so ties keep first-seen order.
fn ranked<'a>(counts: IndexMap<&'a Value, usize>) -> Vec<(&'a Value, usize)> {
    let mut ranked: Vec<(&Value, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn columns<'t>(table: &'t Table, names: &[&str]) -> Option<Vec<&'t Column>> {
    names.iter().map(|name| table.column(name)).collect()
}

/// The `n` most frequent items, with their share of all rows.
pub fn popular_items(table: &Table, item_column: &str, n: usize) -> Vec<PopularItem> {
    let Some(items) = table.column(item_column) else {
        return Vec::new();
    };
    let total = table.row_count();

    ranked(count_values(items.iter()))
        .into_iter()
        .take(n)
        .map(|(item, count)| PopularItem {
            item: item.clone(),
            order_count: count,
            percentage: stats::percentage(count, total),
        })
        .collect()
}

/// The `n` most frequent items within each category, categories in the
/// order they first appear.
pub fn by_category(
    table: &Table,
    category_column: &str,
    item_column: &str,
    n: usize,
) -> Vec<CategoryItem> {
    let Some(cols) = columns(table, &[category_column, item_column]) else {
        return Vec::new();
    };
    let (categories, items) = (cols[0], cols[1]);

    let mut per_category: IndexMap<&Value, Vec<&Value>> = IndexMap::new();
    for (category, item) in categories.iter().zip(items.iter()) {
        if !category.is_null() {
            per_category.entry(category).or_default().push(item);
        }
    }

    per_category
        .into_iter()
        .flat_map(|(category, members)| {
            ranked(count_values(members.into_iter()))
                .into_iter()
                .take(n)
                .map(move |(item, count)| CategoryItem {
                    category: category.clone(),
                    item: item.clone(),
                    order_count: count,
                })
        })
        .collect()
}

/// The `n` item pairs that share an order most often.
///
/// Each order contributes at most once per pair, however many times an item
/// repeats within it. Pairs are reported with the smaller item first.
pub fn frequently_bought_together(
    table: &Table,
    order_id_column: &str,
    item_column: &str,
    n: usize,
) -> Vec<ItemPair> {
    let Some(cols) = columns(table, &[order_id_column, item_column]) else {
        return Vec::new();
    };
    let (orders, items) = (cols[0], cols[1]);

    let mut baskets: IndexMap<&Value, IndexSet<&Value>> = IndexMap::new();
    for (order, item) in orders.iter().zip(items.iter()) {
        if !order.is_null() && !item.is_null() {
            baskets.entry(order).or_default().insert(item);
        }
    }

    let mut pairs: IndexMap<(&Value, &Value), usize> = IndexMap::new();
    for basket in baskets.values() {
        let basket: Vec<&Value> = basket.iter().copied().collect();
        for (i, &a) in basket.iter().enumerate() {
            for &b in &basket[i + 1..] {
                let key = if a <= b { (a, b) } else { (b, a) };
                *pairs.entry(key).or_insert(0) += 1;
            }
        }
    }
    debug!(orders = baskets.len(), pairs = pairs.len(), "counted item pairs");

    let mut ranked: Vec<((&Value, &Value), usize)> = pairs.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|((a, b), count)| ItemPair {
            item1: a.clone(),
            item2: b.clone(),
            co_occurrence: count,
        })
        .collect()
}

/// Items whose recent daily counts rose the most against the window before.
///
/// Each item gets a count per date bucket (timestamps bucket by calendar
/// day), in date order. `recent` is the mean of the last `recent_periods`
/// buckets and `older` the mean of the `recent_periods` buckets before
/// them, or `recent` when there are none. Buckets are the dates the item was
/// ordered on, so gaps between dates are not filled.
pub fn trending(
    table: &Table,
    date_column: &str,
    item_column: &str,
    n: usize,
    recent_periods: usize,
) -> Vec<TrendingItem> {
    let Some(cols) = columns(table, &[date_column, item_column]) else {
        return Vec::new();
    };
    let (dates, items) = (cols[0], cols[1]);
    let recent_periods = recent_periods.max(1);

    let mut per_item: IndexMap<&Value, IndexMap<Value, usize>> = IndexMap::new();
    for (date, item) in dates.iter().zip(items.iter()) {
        if date.is_null() || item.is_null() {
            continue;
        }
        *per_item.entry(item).or_default().entry(date.to_day()).or_insert(0) += 1;
    }

    let mut scored: Vec<TrendingItem> = per_item
        .into_iter()
        .map(|(item, mut buckets)| {
            buckets.sort_keys();
            let counts: Vec<f64> = buckets.values().map(|&c| c as f64).collect();

            let split = counts.len().saturating_sub(recent_periods);
            let recent_window = &counts[split..];
            let older_window = &counts[split.saturating_sub(recent_periods)..split];

            let recent = stats::mean(recent_window).unwrap_or_default();
            let older = stats::mean(older_window).unwrap_or(recent);
            let trend = if counts.len() < 2 || older <= 0.0 {
                0.0
            } else {
                (recent - older) / older
            };

            TrendingItem {
                item: item.clone(),
                trend: round_to(trend, 4),
                recent_count: recent_window.iter().sum::<f64>() as usize,
                recent_average: round_to(recent, 2),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.trend.total_cmp(&a.trend));
    scored.truncate(n);
    scored
}
