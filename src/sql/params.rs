//! Values bound to statements, and binding them onto an `Any` query.

use crate::model::ColumnKind;
use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;

/// A value that can be bound to a query. `Null` keeps its column kind so the store sees a typed NULL.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null(ColumnKind),
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl SqlValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Null(_) => serde_json::Value::Null,
            SqlValue::Integer(n) => (*n).into(),
            SqlValue::Real(f) => (*f).into(),
            SqlValue::Text(s) => serde_json::Value::String(s.clone()),
            SqlValue::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

pub fn bind_params<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Any, AnyArguments<'q>> {
    for p in params {
        query = match p {
            SqlValue::Null(ColumnKind::Integer) => query.bind(None::<i64>),
            SqlValue::Null(ColumnKind::Real) => query.bind(None::<f64>),
            SqlValue::Null(ColumnKind::Text) => query.bind(None::<String>),
            SqlValue::Null(ColumnKind::Boolean) => query.bind(None::<bool>),
            SqlValue::Integer(n) => query.bind(*n),
            SqlValue::Real(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Bool(b) => query.bind(*b),
        };
    }
    query
}
