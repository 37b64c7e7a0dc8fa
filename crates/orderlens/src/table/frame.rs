//! The in-memory columnar table.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{OrderlensError, Result};

use super::column::Column;
use super::types::{ColumnType, Value};

/// An ordered set of equal-length, uniquely named columns.
///
/// Tables are values: every transformation returns a new table and leaves the
/// input untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

/// One row as an ordered `column -> value` map, for row-oriented output.
pub type Record<'a> = IndexMap<&'a str, &'a Value>;

impl Table {
    /// Create a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name()) {
                return Err(OrderlensError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    col.name()
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(OrderlensError::InvalidTable(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name(),
                    bad.len(),
                    expected
                )));
            }
        }

        Ok(Self { columns })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a header and row-major values.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let width = headers.len();
        let mut buffers: Vec<Vec<Value>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(OrderlensError::InvalidTable(format!(
                    "row {} has {} values, expected {}",
                    row_idx + 1,
                    row.len(),
                    width
                )));
            }
            for (buffer, value) in buffers.iter_mut().zip(row) {
                buffer.push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(buffers)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Self::new(columns)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Column names paired with their types, in order.
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        self.columns.iter().map(|c| (c.name(), c.dtype())).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Get a column by name, or fail with [`OrderlensError::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| OrderlensError::ColumnNotFound(name.to_string()))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.get(row))
    }

    /// All values of one row, in column order.
    pub fn row(&self, index: usize) -> Vec<&Value> {
        self.columns.iter().filter_map(|c| c.get(index)).collect()
    }

    /// True if any value in the row is null.
    pub fn row_has_null(&self, index: usize) -> bool {
        self.columns
            .iter()
            .any(|c| c.get(index).is_some_and(Value::is_null))
    }

    /// Row `index` as an ordered map keyed by column name.
    pub fn record(&self, index: usize) -> Record<'_> {
        self.columns
            .iter()
            .filter_map(|c| c.get(index).map(|v| (c.name(), v)))
            .collect()
    }

    /// All rows as ordered maps.
    pub fn records(&self) -> Vec<Record<'_>> {
        (0..self.row_count()).map(|i| self.record(i)).collect()
    }

    /// A new table holding the rows at `indices`, in that order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }

    /// A new table holding the rows for which `keep` returns true.
    pub fn filter_rows(&self, mut keep: impl FnMut(usize) -> bool) -> Table {
        let indices: Vec<usize> = (0..self.row_count()).filter(|&i| keep(i)).collect();
        self.take_rows(&indices)
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..self.row_count().min(n)).collect();
        self.take_rows(&indices)
    }

    /// Apply `f` to every column. `f` must keep each column's name and length.
    pub(crate) fn map_columns(&self, mut f: impl FnMut(&Column) -> Column) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let mapped = f(c);
                debug_assert_eq!(mapped.name(), c.name());
                debug_assert_eq!(mapped.len(), c.len());
                mapped
            })
            .collect();
        Table { columns }
    }

    /// A new table sorted ascending by `name`; equal keys keep their order.
    pub fn sort_by_column(&self, name: &str) -> Result<Table> {
        let key = self.require_column(name)?;
        let mut indices: Vec<usize> = (0..self.row_count()).collect();
        indices.sort_by(|&a, &b| key.values()[a].cmp(&key.values()[b]));
        Ok(self.take_rows(&indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["item".into(), "qty".into()],
            vec![
                vec![Value::from("pizza"), Value::Integer(2)],
                vec![Value::from("soda"), Value::Null],
                vec![Value::from("pasta"), Value::Integer(1)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_names(), vec!["item", "qty"]);
        assert_eq!(table.get(1, 0), Some(&Value::from("soda")));
        assert_eq!(table.column("qty").unwrap().dtype(), ColumnType::Integer);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Table::new(vec![Column::nulls("a", 1), Column::nulls("a", 1)]).unwrap_err();
        assert!(matches!(err, OrderlensError::InvalidTable(_)));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Table::new(vec![Column::nulls("a", 1), Column::nulls("b", 2)]).unwrap_err();
        assert!(matches!(err, OrderlensError::InvalidTable(_)));
    }

    #[test]
    fn test_require_column() {
        let table = sample();
        assert!(table.require_column("item").is_ok());
        assert!(matches!(
            table.require_column("price"),
            Err(OrderlensError::ColumnNotFound(name)) if name == "price"
        ));
    }

    #[test]
    fn test_filter_rows_and_nulls() {
        let table = sample();
        assert!(table.row_has_null(1));
        let filtered = table.filter_rows(|i| !table.row_has_null(i));
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_sort_by_column_is_stable() {
        let table = Table::from_rows(
            vec!["k".into(), "tag".into()],
            vec![
                vec![Value::Integer(2), Value::from("a")],
                vec![Value::Integer(1), Value::from("b")],
                vec![Value::Integer(2), Value::from("c")],
            ],
        )
        .unwrap();
        let sorted = table.sort_by_column("k").unwrap();
        let tags: Vec<String> = sorted
            .column("tag")
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_record_keeps_column_order() {
        let table = sample();
        let record = table.record(0);
        let keys: Vec<&str> = record.keys().copied().collect();
        assert_eq!(keys, vec!["item", "qty"]);
    }
}
