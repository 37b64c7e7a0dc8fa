//! Property-based tests for orderlens.
//!
//! These tests use proptest to generate random tables and verify that
//! cleaning, forecasting and recommendation keep their invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p orderlens --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p orderlens --test property_tests
//! ```

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use orderlens::clean::{CleaningConfig, Keep, clean_with_report, remove_duplicates};
use orderlens::forecast::{FittedParameters, exponential_smoothing, linear_trend, moving_average};
use orderlens::recommend::{frequently_bought_together, popular_items};
use orderlens::{Table, Value, ingest};

// =============================================================================
// Test Strategies
// =============================================================================

/// Rows of two small integer columns, so duplicates are common.
fn small_rows() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..4, 0i64..4), 0..40)
}

/// Item names drawn from a small menu.
fn item() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["pizza", "soda", "pasta", "salad", "wings"]).prop_map(String::from)
}

/// `(order_id, item)` lines of an order history.
fn order_lines() -> impl Strategy<Value = Vec<(i64, String)>> {
    prop::collection::vec((0i64..8, item()), 0..60)
}

/// Arbitrary text that may or may not be CSV.
fn csv_like() -> impl Strategy<Value = String> {
    "[a-z0-9,\"\\.\\-\n ]{0,200}"
}

fn pair_table(rows: &[(i64, i64)]) -> Table {
    Table::from_rows(
        vec!["a".into(), "b".into()],
        rows.iter()
            .map(|&(a, b)| vec![Value::Integer(a), Value::Integer(b)])
            .collect(),
    )
    .unwrap()
}

fn series_table(values: &[i64]) -> Table {
    Table::from_rows(
        vec!["day".into(), "orders".into()],
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| vec![Value::Integer(i as i64), Value::Integer(v)])
            .collect(),
    )
    .unwrap()
}

fn order_table(lines: &[(i64, String)]) -> Table {
    Table::from_rows(
        vec!["order_id".into(), "item".into()],
        lines
            .iter()
            .map(|(order, item)| vec![Value::Integer(*order), Value::from(item.as_str())])
            .collect(),
    )
    .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + b.abs())
}

// =============================================================================
// Ingestion Properties
// =============================================================================

proptest! {
    /// Ingesting arbitrary text never panics; it parses or reports an error.
    #[test]
    fn ingest_never_panics(text in csv_like()) {
        let _ = ingest(text.as_bytes(), "csv");
        let _ = ingest(text.as_bytes(), "json");
    }
}

// =============================================================================
// Cleaning Properties
// =============================================================================

proptest! {
    /// Deduplicating rows that are already unique keeps every row.
    #[test]
    fn dedupe_keeps_unique_rows(keys in prop::collection::hash_set(0i64..1000, 0..50)) {
        let rows: Vec<(i64, i64)> = keys.iter().map(|&k| (k, k % 7)).collect();
        let config = CleaningConfig { drop_duplicates: true, ..CleaningConfig::default() };

        let (cleaned, report) = clean_with_report(&pair_table(&rows), &config);
        prop_assert_eq!(cleaned.row_count(), rows.len());
        prop_assert_eq!(report.removed_rows, 0);
    }

    /// Removing duplicates twice changes nothing the second time.
    #[test]
    fn remove_duplicates_is_idempotent(rows in small_rows(), keep_last in any::<bool>()) {
        let keep = if keep_last { Keep::Last } else { Keep::First };
        let once = remove_duplicates(&pair_table(&rows), None, keep);
        let twice = remove_duplicates(&once, None, keep);
        prop_assert_eq!(&once, &twice);

        let distinct: HashSet<(i64, i64)> = rows.iter().copied().collect();
        prop_assert_eq!(once.row_count(), distinct.len());
    }

    /// Cleaning never adds rows and the report accounts for every removal.
    #[test]
    fn cleaning_report_balances(rows in small_rows(), drop_duplicates in any::<bool>()) {
        let config = CleaningConfig {
            drop_nulls: true,
            drop_duplicates,
            ..CleaningConfig::default()
        };
        let (cleaned, report) = clean_with_report(&pair_table(&rows), &config);
        prop_assert!(cleaned.row_count() <= rows.len());
        prop_assert_eq!(report.original_rows, rows.len());
        prop_assert_eq!(report.original_rows - report.cleaned_rows, report.removed_rows);
        let step_total: usize = report.steps.iter().map(|s| s.rows_removed).sum();
        prop_assert_eq!(step_total, report.removed_rows);
    }
}

// =============================================================================
// Forecasting Properties
// =============================================================================

proptest! {
    /// A constant series forecasts that constant with the smoothing methods.
    #[test]
    fn constant_series_forecasts_constant(
        c in -1000i64..1000,
        len in 1usize..30,
        periods in 1usize..10,
        window in 1usize..10,
    ) {
        let table = series_table(&vec![c; len]);
        let expected = c as f64;

        let ma = moving_average(&table, "day", "orders", periods, window).unwrap();
        prop_assert_eq!(ma.forecast.len(), periods);
        prop_assert!(ma.forecast.iter().all(|&v| close(v, expected)));

        let ewma = exponential_smoothing(&table, "day", "orders", periods, None).unwrap();
        prop_assert_eq!(ewma.forecast.len(), periods);
        prop_assert!(ewma.forecast.iter().all(|&v| close(v, expected)));
        prop_assert!(ewma.historical.iter().all(|p| close(p.fitted, expected)));
    }

    /// An exactly linear series recovers its slope and intercept.
    #[test]
    fn linear_series_recovers_line(
        m in -20i64..20,
        b in 0i64..500,
        len in 2usize..40,
    ) {
        let values: Vec<i64> = (0..len as i64).map(|i| m * i + b).collect();
        let result = linear_trend(&series_table(&values), "day", "orders", 3).unwrap();

        match result.parameters {
            FittedParameters::LinearTrend { slope, intercept } => {
                prop_assert!(close(slope, m as f64), "slope {} vs {}", slope, m);
                prop_assert!(close(intercept, b as f64), "intercept {} vs {}", intercept, b);
            }
            other => prop_assert!(false, "unexpected parameters {:?}", other),
        }
        prop_assert!(result.forecast.iter().all(|&v| v >= 0.0));
        for (point, &actual) in result.historical.iter().zip(&values) {
            prop_assert!(close(point.fitted, actual as f64));
        }
    }
}

// =============================================================================
// Recommendation Properties
// =============================================================================

proptest! {
    /// Popular percentages are bounded, sum to at most 100 and never increase.
    #[test]
    fn popular_percentages_are_ranked(lines in order_lines(), n in 1usize..8) {
        let popular = popular_items(&order_table(&lines), "item", n);
        prop_assert!(popular.len() <= n);

        let total: f64 = popular.iter().map(|p| p.percentage).sum();
        prop_assert!(total <= 100.0 + 0.05);
        for entry in &popular {
            prop_assert!((0.0..=100.0).contains(&entry.percentage));
        }
        for window in popular.windows(2) {
            prop_assert!(window[0].order_count >= window[1].order_count);
            prop_assert!(window[0].percentage >= window[1].percentage);
        }
    }

    /// Each pair's count is exactly the number of orders holding both items.
    #[test]
    fn pair_counts_match_shared_orders(lines in order_lines()) {
        let table = order_table(&lines);
        let pairs = frequently_bought_together(&table, "order_id", "item", usize::MAX);

        let mut baskets: std::collections::BTreeMap<i64, BTreeSet<&str>> = Default::default();
        for (order, item) in &lines {
            baskets.entry(*order).or_default().insert(item.as_str());
        }

        for pair in &pairs {
            let (Value::String(a), Value::String(b)) = (&pair.item1, &pair.item2) else {
                return Err(TestCaseError::fail("pair items should be strings"));
            };
            prop_assert!(a < b);
            let shared = baskets
                .values()
                .filter(|basket| basket.contains(a.as_str()) && basket.contains(b.as_str()))
                .count();
            prop_assert_eq!(pair.co_occurrence, shared);
        }
        for window in pairs.windows(2) {
            prop_assert!(window[0].co_occurrence >= window[1].co_occurrence);
        }
    }
}
