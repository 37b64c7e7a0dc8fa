//! Recommendation requests and result records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OrderlensError, Result};
use crate::table::Value;

/// An item ranked by how often it was ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularItem {
    pub item: Value,
    pub order_count: usize,
    /// Share of all rows, two decimals.
    pub percentage: f64,
}

/// An item ranked within its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub category: Value,
    pub item: Value,
    pub order_count: usize,
}

/// Two distinct items and the number of orders containing both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPair {
    pub item1: Value,
    pub item2: Value,
    pub co_occurrence: usize,
}

/// An item's relative change in daily count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    pub item: Value,
    /// `(recent - older) / older`, four decimals.
    pub trend: f64,
    /// Orders in the recent window.
    pub recent_count: usize,
    /// Mean orders per date bucket in the recent window.
    pub recent_average: f64,
}

/// One entry of a [`RecommendationResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendation {
    Popular(PopularItem),
    Categorized(CategoryItem),
    Pair(ItemPair),
    Trending(TrendingItem),
}

/// A recommendation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMethod {
    PopularItems,
    ByCategory,
    FrequentlyBoughtTogether,
    Trending,
}

impl RecommendationMethod {
    /// Number of entries returned when the caller does not say.
    pub fn default_n(&self) -> usize {
        match self {
            RecommendationMethod::PopularItems | RecommendationMethod::Trending => 10,
            RecommendationMethod::ByCategory | RecommendationMethod::FrequentlyBoughtTogether => 5,
        }
    }
}

impl FromStr for RecommendationMethod {
    type Err = OrderlensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "popular_items" | "popular" => Ok(RecommendationMethod::PopularItems),
            "by_category" | "category" => Ok(RecommendationMethod::ByCategory),
            "frequently_bought_together" | "pairs" => {
                Ok(RecommendationMethod::FrequentlyBoughtTogether)
            }
            "trending" => Ok(RecommendationMethod::Trending),
            other => Err(OrderlensError::InvalidConfig(format!(
                "unknown recommendation method '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RecommendationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationMethod::PopularItems => write!(f, "popular_items"),
            RecommendationMethod::ByCategory => write!(f, "by_category"),
            RecommendationMethod::FrequentlyBoughtTogether => {
                write!(f, "frequently_bought_together")
            }
            RecommendationMethod::Trending => write!(f, "trending"),
        }
    }
}

/// Column names a recommendation reads. Only `item` is always required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationColumns {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl RecommendationColumns {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, column: impl Into<String>) -> Self {
        self.category = Some(column.into());
        self
    }

    pub fn with_order_id(mut self, column: impl Into<String>) -> Self {
        self.order_id = Some(column.into());
        self
    }

    pub fn with_date(mut self, column: impl Into<String>) -> Self {
        self.date = Some(column.into());
        self
    }
}

/// Default number of date buckets in the trending window.
pub const DEFAULT_RECENT_PERIODS: usize = 7;

/// A single-method request for [`recommend`](super::recommend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub method: RecommendationMethod,
    pub columns: RecommendationColumns,
    /// Entries to return (None = the method's default).
    #[serde(default)]
    pub n: Option<usize>,
    #[serde(default = "default_recent_periods")]
    pub recent_periods: usize,
}

fn default_recent_periods() -> usize {
    DEFAULT_RECENT_PERIODS
}

impl RecommendationRequest {
    pub fn new(method: RecommendationMethod, columns: RecommendationColumns) -> Self {
        Self {
            method,
            columns,
            n: None,
            recent_periods: DEFAULT_RECENT_PERIODS,
        }
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_recent_periods(mut self, periods: usize) -> Self {
        self.recent_periods = periods;
        self
    }

    /// The requested count, or the method's default.
    pub fn limit(&self) -> usize {
        self.n.unwrap_or_else(|| self.method.default_n())
    }
}

/// The entries one method produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub method: RecommendationMethod,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationResult {
    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Every applicable method, keyed by name. Methods whose columns were not
/// supplied are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllRecommendations {
    pub popular_items: Vec<PopularItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_category: Option<Vec<CategoryItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequently_bought_together: Option<Vec<ItemPair>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending: Option<Vec<TrendingItem>>,
}
