//! Named delivery analyses bound to configurable column names.

use serde::{Deserialize, Serialize};

use crate::table::Table;

use super::aggregate::{
    GroupCount, GroupRate, PairCount, Performance, Summary, count_by, count_by_pair, performance,
    rate_by, summarize,
};

/// Column names the delivery analyses read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryColumns {
    /// Numeric column summarized by [`sales_summary`].
    pub value: String,
    /// Boolean column, true when a delivery was late.
    pub delay_flag: String,
    pub hour: String,
    pub month: String,
    pub traffic: String,
    pub pizza_size: String,
    pub pizza_type: String,
    pub payment: String,
}

impl Default for DeliveryColumns {
    fn default() -> Self {
        Self {
            value: "estimated_duration".to_string(),
            delay_flag: "is_delayed".to_string(),
            hour: "order_hour".to_string(),
            month: "order_month".to_string(),
            traffic: "traffic_level".to_string(),
            pizza_size: "pizza_size".to_string(),
            pizza_type: "pizza_type".to_string(),
            payment: "payment_method".to_string(),
        }
    }
}

/// Every delivery analysis over one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub summary: Summary,
    pub performance: Performance,
    pub orders_by_hour: Vec<GroupCount>,
    pub orders_by_month: Vec<GroupCount>,
    pub traffic: Vec<GroupRate>,
    pub pizzas: Vec<PairCount>,
    pub payments: Vec<GroupCount>,
}

pub fn sales_summary(table: &Table, columns: &DeliveryColumns) -> Summary {
    summarize(table, &columns.value)
}

pub fn delivery_performance(table: &Table, columns: &DeliveryColumns) -> Performance {
    performance(table, &columns.delay_flag)
}

pub fn orders_by_hour(table: &Table, columns: &DeliveryColumns) -> Vec<GroupCount> {
    count_by(table, &columns.hour)
}

pub fn orders_by_month(table: &Table, columns: &DeliveryColumns) -> Vec<GroupCount> {
    count_by(table, &columns.month)
}

/// Order count and delay rate per traffic level.
pub fn traffic_analysis(table: &Table, columns: &DeliveryColumns) -> Vec<GroupRate> {
    rate_by(table, &columns.traffic, &columns.delay_flag)
}

/// Order count per pizza size and type.
pub fn pizza_analysis(table: &Table, columns: &DeliveryColumns) -> Vec<PairCount> {
    count_by_pair(table, &columns.pizza_size, &columns.pizza_type)
}

pub fn payment_analysis(table: &Table, columns: &DeliveryColumns) -> Vec<GroupCount> {
    count_by(table, &columns.payment)
}

/// Run every delivery analysis.
pub fn full_report(table: &Table, columns: &DeliveryColumns) -> AnalyticsReport {
    AnalyticsReport {
        summary: sales_summary(table, columns),
        performance: delivery_performance(table, columns),
        orders_by_hour: orders_by_hour(table, columns),
        orders_by_month: orders_by_month(table, columns),
        traffic: traffic_analysis(table, columns),
        pizzas: pizza_analysis(table, columns),
        payments: payment_analysis(table, columns),
    }
}
