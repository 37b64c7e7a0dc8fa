//! Item recommendations from order history.
//!
//! Recommendation is tolerant by contract: a missing column or an empty
//! table yields an empty list, never an error.

mod methods;
mod result;

pub use methods::{by_category, frequently_bought_together, popular_items, trending};
pub use result::{
    AllRecommendations, CategoryItem, DEFAULT_RECENT_PERIODS, ItemPair, PopularItem,
    Recommendation, RecommendationColumns, RecommendationMethod, RecommendationRequest,
    RecommendationResult, TrendingItem,
};

use tracing::warn;

use crate::table::Table;

/// Run one method.
///
/// A method whose optional column (category, order id, date) was not
/// supplied returns an empty result.
pub fn recommend(table: &Table, request: &RecommendationRequest) -> RecommendationResult {
    let columns = &request.columns;
    let n = request.limit();
    let item = columns.item.as_str();

    let recommendations = match request.method {
        RecommendationMethod::PopularItems => popular_items(table, item, n)
            .into_iter()
            .map(Recommendation::Popular)
            .collect(),
        RecommendationMethod::ByCategory => match &columns.category {
            Some(category) => by_category(table, category, item, n)
                .into_iter()
                .map(Recommendation::Categorized)
                .collect(),
            None => skipped(request.method, "category"),
        },
        RecommendationMethod::FrequentlyBoughtTogether => match &columns.order_id {
            Some(order_id) => frequently_bought_together(table, order_id, item, n)
                .into_iter()
                .map(Recommendation::Pair)
                .collect(),
            None => skipped(request.method, "order_id"),
        },
        RecommendationMethod::Trending => match &columns.date {
            Some(date) => trending(table, date, item, n, request.recent_periods)
                .into_iter()
                .map(Recommendation::Trending)
                .collect(),
            None => skipped(request.method, "date"),
        },
    };

    RecommendationResult {
        method: request.method,
        recommendations,
    }
}

fn skipped(method: RecommendationMethod, column: &str) -> Vec<Recommendation> {
    warn!(%method, column, "no column supplied, returning no recommendations");
    Vec::new()
}

/// Run every method whose columns were supplied.
///
/// `n` overrides each method's default count when given.
pub fn recommend_all(
    table: &Table,
    columns: &RecommendationColumns,
    n: Option<usize>,
    recent_periods: usize,
) -> AllRecommendations {
    let limit = |method: RecommendationMethod| n.unwrap_or_else(|| method.default_n());
    let item = columns.item.as_str();

    AllRecommendations {
        popular_items: popular_items(table, item, limit(RecommendationMethod::PopularItems)),
        by_category: columns.category.as_deref().map(|category| {
            by_category(table, category, item, limit(RecommendationMethod::ByCategory))
        }),
        frequently_bought_together: columns.order_id.as_deref().map(|order_id| {
            let n = limit(RecommendationMethod::FrequentlyBoughtTogether);
            frequently_bought_together(table, order_id, item, n)
        }),
        trending: columns.date.as_deref().map(|date| {
            let n = limit(RecommendationMethod::Trending);
            trending(table, date, item, n, recent_periods)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn orders() -> Table {
        let rows = [
            ("O1", "pizza", "main"),
            ("O1", "soda", "drink"),
            ("O2", "pizza", "main"),
        ];
        Table::from_rows(
            vec!["order_id".into(), "item".into(), "category".into()],
            rows.iter()
                .map(|&(o, i, c)| vec![Value::from(o), Value::from(i), Value::from(c)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_recommend_popular() {
        let request = RecommendationRequest::new(
            RecommendationMethod::PopularItems,
            RecommendationColumns::new("item"),
        );
        let result = recommend(&orders(), &request);
        assert_eq!(result.method, RecommendationMethod::PopularItems);
        assert_eq!(result.len(), 2);
        match &result.recommendations[0] {
            Recommendation::Popular(entry) => assert_eq!(entry.order_count, 2),
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn test_recommend_without_required_column_is_empty() {
        let request = RecommendationRequest::new(
            RecommendationMethod::FrequentlyBoughtTogether,
            RecommendationColumns::new("item"),
        );
        assert!(recommend(&orders(), &request).is_empty());
    }

    #[test]
    fn test_recommend_all_skips_unsupplied_methods() {
        let columns = RecommendationColumns::new("item").with_order_id("order_id");
        let all = recommend_all(&orders(), &columns, None, DEFAULT_RECENT_PERIODS);
        assert_eq!(all.popular_items.len(), 2);
        assert!(all.by_category.is_none());
        assert!(all.trending.is_none());
        let pairs = all.frequently_bought_together.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].co_occurrence, 1);

        let one_each = recommend_all(&orders(), &columns, Some(1), DEFAULT_RECENT_PERIODS);
        let json = serde_json::to_value(one_each).unwrap();
        assert!(json.get("by_category").is_none());
        assert_eq!(json["popular_items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_recommend_all_by_category() {
        let columns = RecommendationColumns::new("item").with_category("category");
        let all = recommend_all(&orders(), &columns, Some(1), DEFAULT_RECENT_PERIODS);
        let ranked = all.by_category.unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].category, Value::from("main"));
    }
}
