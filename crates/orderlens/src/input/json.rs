//! Row-oriented JSON readers (array of objects, or one object per line).

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::error::{OrderlensError, Result};
use crate::table::{Column, Table, Value};

/// Read a JSON array of objects.
pub(crate) fn read_json(bytes: &[u8]) -> Result<Table> {
    let parsed: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| OrderlensError::malformed("json", e))?;

    let JsonValue::Array(items) = parsed else {
        return Err(OrderlensError::malformed("json", "expected an array of objects"));
    };

    let mut objects = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            JsonValue::Object(map) => objects.push(map),
            other => {
                return Err(OrderlensError::malformed(
                    "json",
                    format!("element {} is {}, expected an object", idx, json_kind(&other)),
                ));
            }
        }
    }

    objects_to_table(objects, "json")
}

/// Read newline-delimited JSON objects; blank lines are skipped.
pub(crate) fn read_ndjson(bytes: &[u8]) -> Result<Table> {
    let text = std::str::from_utf8(bytes).map_err(|e| OrderlensError::malformed("ndjson", e))?;

    let mut objects = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed: JsonValue = serde_json::from_str(line).map_err(|e| {
            OrderlensError::malformed("ndjson", format!("line {}: {}", line_no + 1, e))
        })?;
        match parsed {
            JsonValue::Object(map) => objects.push(map),
            other => {
                return Err(OrderlensError::malformed(
                    "ndjson",
                    format!("line {} is {}, expected an object", line_no + 1, json_kind(&other)),
                ));
            }
        }
    }

    objects_to_table(objects, "ndjson")
}

/// Build columns from the union of keys, in first-seen order.
///
/// A key missing from an object reads as null.
fn objects_to_table(objects: Vec<Map<String, JsonValue>>, format: &str) -> Result<Table> {
    let row_count = objects.len();
    let mut buffers: IndexMap<String, Vec<Value>> = IndexMap::new();

    for (row_idx, object) in objects.into_iter().enumerate() {
        for (key, json) in object {
            let buffer = buffers
                .entry(key)
                .or_insert_with(|| vec![Value::Null; row_idx]);
            buffer.push(json_to_value(json));
        }
        for buffer in buffers.values_mut() {
            if buffer.len() < row_idx + 1 {
                buffer.push(Value::Null);
            }
        }
    }

    let columns = buffers
        .into_iter()
        .map(|(name, mut values)| {
            values.resize(row_count, Value::Null);
            Column::new(name, values)
        })
        .collect();

    Table::new(columns).map_err(|e| OrderlensError::malformed(format, e))
}

fn json_to_value(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        JsonValue::String(s) => Value::String(s),
        // Nested structures are kept as their JSON text
        nested => Value::String(nested.to_string()),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;

    #[test]
    fn test_read_json_array() {
        let table = read_json(br#"[{"item":"pizza","qty":2},{"item":"soda","qty":1.5}]"#).unwrap();
        assert_eq!(table.column_names(), vec!["item", "qty"]);
        assert_eq!(table.column("qty").unwrap().dtype(), ColumnType::Float);
        assert_eq!(table.get(0, 1), Some(&Value::Float(2.0)));
    }

    #[test]
    fn test_missing_keys_are_null() {
        let table = read_json(br#"[{"a":1},{"b":true},{"a":3,"b":false}]"#).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.column("a").unwrap().values(),
            &[Value::Integer(1), Value::Null, Value::Integer(3)]
        );
        assert_eq!(
            table.column("b").unwrap().values(),
            &[Value::Null, Value::Boolean(true), Value::Boolean(false)]
        );
    }

    #[test]
    fn test_empty_array() {
        let table = read_json(b"[]").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(
            read_json(br#"{"a":1}"#),
            Err(OrderlensError::MalformedInput { .. })
        ));
        assert!(matches!(
            read_json(br#"[1, 2]"#),
            Err(OrderlensError::MalformedInput { .. })
        ));
        assert!(read_json(b"[{").is_err());
    }

    #[test]
    fn test_read_ndjson() {
        let table = read_ndjson(b"{\"a\":1}\n\n{\"a\":2}\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("a").unwrap().dtype(), ColumnType::Integer);
    }

    #[test]
    fn test_ndjson_reports_line() {
        let err = read_ndjson(b"{\"a\":1}\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
