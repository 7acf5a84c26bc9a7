//! Scalar column types: JSON conversion, text parsing, row decoding.

use crate::sql::SqlValue;
use serde_json::Value;
use sqlx::any::AnyRow;
use sqlx::Row;
use std::fmt;

/// Storage class of a column. Drives parameter typing, query-string parsing and DDL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
    Boolean,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Real => "real",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "boolean",
        };
        f.write_str(s)
    }
}

impl ColumnKind {
    /// Convert a JSON body value. `null` is accepted for every kind; a mismatched type is `None`.
    pub fn coerce_json(self, v: &Value) -> Option<SqlValue> {
        if v.is_null() {
            return Some(SqlValue::Null(self));
        }
        match self {
            ColumnKind::Integer => v.as_i64().map(SqlValue::Integer),
            ColumnKind::Real => v.as_f64().map(SqlValue::Real),
            ColumnKind::Text => v.as_str().map(|s| SqlValue::Text(s.to_string())),
            ColumnKind::Boolean => v.as_bool().map(SqlValue::Bool),
        }
    }

    /// Parse a value that arrived as text (path segment or query string).
    pub fn parse_text(self, s: &str) -> Option<SqlValue> {
        match self {
            ColumnKind::Integer => s.parse::<i64>().ok().map(SqlValue::Integer),
            ColumnKind::Real => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(SqlValue::Real),
            ColumnKind::Text => Some(SqlValue::Text(s.to_string())),
            ColumnKind::Boolean => {
                if s.eq_ignore_ascii_case("true") || s == "1" {
                    Some(SqlValue::Bool(true))
                } else if s.eq_ignore_ascii_case("false") || s == "0" {
                    Some(SqlValue::Bool(false))
                } else {
                    None
                }
            }
        }
    }

    /// Read one cell as JSON; SQL NULL becomes `Value::Null`.
    pub fn decode_json(self, row: &AnyRow, name: &str) -> Result<Value, sqlx::Error> {
        Ok(match self {
            ColumnKind::Integer => row.try_get::<Option<i64>, _>(name)?.map(Value::from),
            ColumnKind::Real => row.try_get::<Option<f64>, _>(name)?.map(Value::from),
            ColumnKind::Text => row.try_get::<Option<String>, _>(name)?.map(Value::String),
            ColumnKind::Boolean => decode_bool(row, name)?.map(Value::Bool),
        }
        .unwrap_or(Value::Null))
    }
}

/// PostgreSQL hands back booleans; SQLite stores them as 0/1 integers.
fn decode_bool(row: &AnyRow, column: &str) -> Result<Option<bool>, sqlx::Error> {
    match row.try_get::<Option<bool>, _>(column) {
        Ok(v) => Ok(v),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let n: Option<i64> = row.try_get(column)?;
            Ok(n.map(|n| n != 0))
        }
        Err(e) => Err(e),
    }
}

/// A Rust type that can back a row-model field.
pub trait ColumnValue: Sized + Clone + Send + Sync + 'static {
    const KIND: ColumnKind;

    fn to_sql(&self) -> SqlValue;

    fn to_json(&self) -> Value;

    /// `None` when the JSON value has the wrong type for this column.
    fn from_json(v: &Value) -> Option<Self>;

    fn decode(row: &AnyRow, column: &str) -> Result<Option<Self>, sqlx::Error>;
}

impl ColumnValue for i64 {
    const KIND: ColumnKind = ColumnKind::Integer;

    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(*self)
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn from_json(v: &Value) -> Option<Self> {
        v.as_i64()
    }

    fn decode(row: &AnyRow, column: &str) -> Result<Option<Self>, sqlx::Error> {
        row.try_get(column)
    }
}

impl ColumnValue for i32 {
    const KIND: ColumnKind = ColumnKind::Integer;

    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(i64::from(*self))
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn from_json(v: &Value) -> Option<Self> {
        v.as_i64().and_then(|n| i32::try_from(n).ok())
    }

    fn decode(row: &AnyRow, column: &str) -> Result<Option<Self>, sqlx::Error> {
        let wide: Option<i64> = row.try_get(column)?;
        wide.map(i32::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            })
    }
}

impl ColumnValue for f64 {
    const KIND: ColumnKind = ColumnKind::Real;

    fn to_sql(&self) -> SqlValue {
        SqlValue::Real(*self)
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn from_json(v: &Value) -> Option<Self> {
        v.as_f64()
    }

    fn decode(row: &AnyRow, column: &str) -> Result<Option<Self>, sqlx::Error> {
        row.try_get(column)
    }
}

impl ColumnValue for bool {
    const KIND: ColumnKind = ColumnKind::Boolean;

    fn to_sql(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_json(v: &Value) -> Option<Self> {
        v.as_bool()
    }

    fn decode(row: &AnyRow, column: &str) -> Result<Option<Self>, sqlx::Error> {
        decode_bool(row, column)
    }
}

impl ColumnValue for String {
    const KIND: ColumnKind = ColumnKind::Text;

    fn to_sql(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_json(v: &Value) -> Option<Self> {
        v.as_str().map(str::to_string)
    }

    fn decode(row: &AnyRow, column: &str) -> Result<Option<Self>, sqlx::Error> {
        row.try_get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_json_rejects_mismatched_types() {
        assert_eq!(ColumnKind::Integer.coerce_json(&json!(5)), Some(SqlValue::Integer(5)));
        assert_eq!(ColumnKind::Integer.coerce_json(&json!("5")), None);
        assert_eq!(ColumnKind::Text.coerce_json(&json!(5)), None);
        assert_eq!(ColumnKind::Real.coerce_json(&json!(2)), Some(SqlValue::Real(2.0)));
        assert_eq!(
            ColumnKind::Boolean.coerce_json(&Value::Null),
            Some(SqlValue::Null(ColumnKind::Boolean))
        );
    }

    #[test]
    fn parse_text_follows_column_kind() {
        assert_eq!(ColumnKind::Integer.parse_text("20"), Some(SqlValue::Integer(20)));
        assert_eq!(ColumnKind::Integer.parse_text("twenty"), None);
        assert_eq!(ColumnKind::Real.parse_text("NaN"), None);
        assert_eq!(ColumnKind::Boolean.parse_text("TRUE"), Some(SqlValue::Bool(true)));
        assert_eq!(ColumnKind::Boolean.parse_text("0"), Some(SqlValue::Bool(false)));
        assert_eq!(ColumnKind::Boolean.parse_text("yes"), None);
        assert_eq!(
            ColumnKind::Text.parse_text("abc"),
            Some(SqlValue::Text("abc".into()))
        );
    }

    #[test]
    fn i32_from_json_rejects_overflow() {
        assert_eq!(<i32 as ColumnValue>::from_json(&json!(7)), Some(7));
        assert_eq!(<i32 as ColumnValue>::from_json(&json!(i64::MAX)), None);
    }
}
