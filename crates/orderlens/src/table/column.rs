//! A named, homogeneously typed column.

use serde::Serialize;

use super::types::{ColumnType, Value};

/// A named sequence of values sharing one semantic type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Create a column, unifying the value types.
    ///
    /// Integers mixed with floats become floats; any other mix is stored as
    /// strings, so the column stays homogeneous.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let dtype = values
            .iter()
            .fold(ColumnType::Null, |acc, v| acc.unify(v.column_type()));

        let needs_cast = values
            .iter()
            .any(|v| !v.is_null() && v.column_type() != dtype);
        let values = if needs_cast {
            values.into_iter().map(|v| v.cast_to(dtype)).collect()
        } else {
            values
        };

        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Create an all-null column of the given length.
    pub fn nulls(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, vec![Value::Null; len])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Number of null values.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Non-null values as `f64`, in row order. Empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// A column with the same name and new values.
    pub fn with_values(&self, values: Vec<Value>) -> Self {
        Self::new(self.name.clone(), values)
    }

    /// Gather the values at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Self {
        let values = indices
            .iter()
            .map(|&i| self.values.get(i).cloned().unwrap_or_default())
            .collect();
        Self {
            name: self.name.clone(),
            dtype: self.dtype,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_float_widen() {
        let col = Column::new("x", vec![Value::Integer(1), Value::Float(2.5), Value::Null]);
        assert_eq!(col.dtype(), ColumnType::Float);
        assert_eq!(col.values(), &[Value::Float(1.0), Value::Float(2.5), Value::Null]);
    }

    #[test]
    fn test_mixed_types_become_strings() {
        let col = Column::new("x", vec![Value::Integer(1), Value::Boolean(true)]);
        assert_eq!(col.dtype(), ColumnType::String);
        assert_eq!(col.values(), &[Value::from("1"), Value::from("true")]);
    }

    #[test]
    fn test_all_null_column() {
        let col = Column::nulls("x", 3);
        assert_eq!(col.dtype(), ColumnType::Null);
        assert_eq!(col.null_count(), 3);
        assert!(col.numeric_values().is_empty());
    }

    #[test]
    fn test_take_reorders() {
        let col = Column::new("x", vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        let taken = col.take(&[2, 0]);
        assert_eq!(taken.values(), &[Value::Integer(3), Value::Integer(1)]);
        assert_eq!(taken.dtype(), ColumnType::Integer);
    }
}
