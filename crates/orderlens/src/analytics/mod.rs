//! Aggregation analytics over order tables.

mod aggregate;
mod delivery;

pub use aggregate::{
    GroupCount, GroupRate, PairCount, Performance, Summary, count_by, count_by_pair, performance,
    rate_by, summarize,
};
pub use delivery::{
    AnalyticsReport, DeliveryColumns, delivery_performance, full_report, orders_by_hour,
    orders_by_month, payment_analysis, pizza_analysis, sales_summary, traffic_analysis,
};
