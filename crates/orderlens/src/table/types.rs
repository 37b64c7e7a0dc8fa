//! Scalar values and their semantic column types.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Canonical text form of a timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Text values.
    String,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// true/false.
    Boolean,
    /// Date and time without a zone.
    Timestamp,
    /// Every value in the column is null.
    #[default]
    Null,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// The type a column takes when it holds values of both `self` and `other`.
    ///
    /// Nulls never widen a column, integers widen to floats, and any other
    /// mix falls back to strings.
    pub fn unify(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (ColumnType::Null, t) | (t, ColumnType::Null) => t,
            (a, b) if a == b => a,
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                ColumnType::Float
            }
            _ => ColumnType::String,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Null => "null",
        };
        f.write_str(name)
    }
}

/// A single cell.
///
/// `Value` is totally ordered and hashable so it can serve as a grouping or
/// de-duplication key. Floats compare by value with `-0.0 == 0.0` and all NaNs
/// equal to each other.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The column type this value belongs to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Null => ColumnType::Null,
            Value::String(_) => ColumnType::String,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::Timestamp(_) => ColumnType::Timestamp,
        }
    }

    /// Numeric view of integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Timestamps truncated to midnight; other values unchanged.
    pub fn to_day(&self) -> Value {
        match self {
            Value::Timestamp(ts) => ts
                .date()
                .and_hms_opt(0, 0, 0)
                .map(Value::Timestamp)
                .unwrap_or(Value::Null),
            other => other.clone(),
        }
    }

    /// Convert this value so it fits a column of type `target`.
    ///
    /// Only the conversions produced by [`ColumnType::unify`] are meaningful:
    /// integer to float, and anything to its string form.
    pub fn cast_to(self, target: ColumnType) -> Value {
        match (self, target) {
            (Value::Null, _) => Value::Null,
            (Value::Integer(i), ColumnType::Float) => Value::Float(i as f64),
            (Value::String(s), ColumnType::String) => Value::String(s),
            (v, ColumnType::String) => Value::String(v.to_string()),
            (v, _) => v,
        }
    }

    /// Normalized float bits: all NaNs collapse to one pattern, `-0.0` to `0.0`.
    fn float_key(f: f64) -> u64 {
        if f.is_nan() {
            f64::NAN.to_bits()
        } else if f == 0.0 {
            0.0f64.to_bits()
        } else {
            f.to_bits()
        }
    }

    fn normalized(f: f64) -> f64 {
        f64::from_bits(Value::float_key(f))
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::Timestamp(_) => 3,
            Value::String(_) => 4,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Value::float_key(*a) == Value::float_key(*b),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => Value::float_key(*f).hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Timestamp(ts) => ts.hash(state),
        }
    }
}

impl Ord for Value {
    /// Nulls sort first; integers and floats compare numerically with each
    /// other (integer first on a tie); other types never interleave.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => {
                Value::normalized(*a).total_cmp(&Value::normalized(*b))
            }
            (Value::Integer(a), Value::Float(b)) => (*a as f64)
                .total_cmp(&Value::normalized(*b))
                .then(Ordering::Less),
            (Value::Float(a), Value::Integer(b)) => Value::normalized(*a)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Timestamp(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a scalar value (null, boolean, number or string)")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Boolean(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(i64::try_from(v)
                    .map(Value::Integer)
                    .unwrap_or(Value::Float(v as f64)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::String(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::String(v))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_unify_types() {
        assert_eq!(ColumnType::Integer.unify(ColumnType::Float), ColumnType::Float);
        assert_eq!(ColumnType::Null.unify(ColumnType::Boolean), ColumnType::Boolean);
        assert_eq!(ColumnType::Boolean.unify(ColumnType::Integer), ColumnType::String);
        assert_eq!(ColumnType::Timestamp.unify(ColumnType::Timestamp), ColumnType::Timestamp);
    }

    #[test]
    fn test_float_equality_is_normalized() {
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(1.0), Value::Integer(1));

        let set: HashSet<Value> = [Value::Float(0.0), Value::Float(-0.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_puts_nulls_first() {
        let mut values = vec![
            Value::Integer(3),
            Value::Null,
            Value::Float(1.5),
            Value::Integer(1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![Value::Null, Value::Integer(1), Value::Float(1.5), Value::Integer(3)]
        );
    }

    #[test]
    fn test_to_day() {
        let ts = NaiveDateTime::parse_from_str("2024-01-02 03:04:05", TIMESTAMP_FORMAT).unwrap();
        let day = NaiveDateTime::parse_from_str("2024-01-02 00:00:00", TIMESTAMP_FORMAT).unwrap();
        assert_eq!(Value::Timestamp(ts).to_day(), Value::Timestamp(day));
        assert_eq!(Value::from("2024-01-02").to_day(), Value::from("2024-01-02"));
    }

    #[test]
    fn test_serialize_scalars() {
        let ts = NaiveDateTime::parse_from_str("2024-01-02 03:04:05", TIMESTAMP_FORMAT).unwrap();
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::from("pizza"),
            Value::Integer(2),
            Value::Boolean(true),
            Value::Timestamp(ts),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,"pizza",2,true,"2024-01-02 03:04:05"]"#);
    }

    #[test]
    fn test_deserialize_scalars() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, 1, 2.5, "x", false]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Integer(1),
                Value::Float(2.5),
                Value::from("x"),
                Value::Boolean(false)
            ]
        );
    }
}
