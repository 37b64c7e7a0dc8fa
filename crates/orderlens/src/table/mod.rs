//! The uniform in-memory table every component reads and produces.

mod column;
mod frame;
mod types;

pub use column::Column;
pub use frame::{Record, Table};
pub use types::{ColumnType, TIMESTAMP_FORMAT, Value};
