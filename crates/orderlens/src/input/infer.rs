//! Type inference for text cells.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::table::{ColumnType, Value};

// Patterns compiled once on first use. Rust's float parser also accepts
// "inf" and "nan", which would turn item names into numbers.
static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());
static FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$").unwrap());

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_integer(s: &str) -> Option<i64> {
    if INTEGER_PATTERN.is_match(s) {
        s.parse().ok()
    } else {
        None
    }
}

fn parse_float(s: &str) -> Option<f64> {
    if FLOAT_PATTERN.is_match(s) {
        s.parse().ok()
    } else {
        None
    }
}

/// Pick the narrowest type that parses every non-null cell.
fn infer_type(cells: &[Option<String>]) -> ColumnType {
    let mut present = cells.iter().flatten().peekable();
    if present.peek().is_none() {
        return ColumnType::Null;
    }

    let non_null: Vec<&String> = present.collect();
    if non_null.iter().all(|s| parse_integer(s).is_some()) {
        ColumnType::Integer
    } else if non_null.iter().all(|s| parse_float(s).is_some()) {
        ColumnType::Float
    } else if non_null.iter().all(|s| parse_bool(s).is_some()) {
        ColumnType::Boolean
    } else {
        ColumnType::String
    }
}

/// Convert one column of raw text cells (`None` = null) to typed values.
pub(crate) fn infer_column(cells: Vec<Option<String>>) -> Vec<Value> {
    let dtype = infer_type(&cells);
    cells
        .into_iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(s) => match dtype {
                ColumnType::Integer => parse_integer(&s).map(Value::Integer).unwrap_or(Value::Null),
                ColumnType::Float => parse_float(&s).map(Value::Float).unwrap_or(Value::Null),
                ColumnType::Boolean => parse_bool(&s).map(Value::Boolean).unwrap_or(Value::Null),
                _ => Value::String(s),
            },
        })
        .collect()
}

/// Parse a single literal the way a delimited cell would be typed.
///
/// Used for caller-supplied literals such as custom fill values.
pub fn parse_literal(s: &str) -> Value {
    if let Some(i) = parse_integer(s) {
        Value::Integer(i)
    } else if let Some(f) = parse_float(s) {
        Value::Float(f)
    } else if let Some(b) = parse_bool(s) {
        Value::Boolean(b)
    } else {
        Value::String(s.to_string())
    }
}
