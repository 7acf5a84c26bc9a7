//! Search filters: `key=value` for equality, `key-prefix=value` for a case-sensitive prefix match.

use super::SqlValue;
use crate::error::AppError;
use crate::model::{ColumnKind, ModelDescriptor, MODIFIER_SEPARATOR};
use serde_json::Value;

pub const PREFIX_MODIFIER: &str = "prefix";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Column value, read as text, starts with the filter value.
    Prefix,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: SqlValue,
}

impl Filter {
    pub fn parse(model: &ModelDescriptor, key: &str, value: &Value) -> Result<Filter, AppError> {
        let (field, op) = match key.split_once(MODIFIER_SEPARATOR) {
            None => (key, FilterOp::Eq),
            Some((field, PREFIX_MODIFIER)) => (field, FilterOp::Prefix),
            Some((_, other)) => {
                return Err(AppError::Validation(format!(
                    "unknown filter modifier '{}' in '{}'",
                    other, key
                )))
            }
        };
        let column = model
            .column(field)
            .ok_or_else(|| AppError::Validation(format!("unknown filter field '{}'", field)))?;
        // Booleans have no common text form across stores.
        if op == FilterOp::Prefix && column.kind == ColumnKind::Boolean {
            return Err(AppError::Validation(format!(
                "prefix filter not supported on boolean field '{}'",
                field
            )));
        }
        let value = match op {
            FilterOp::Eq => eq_value(column.kind, value),
            FilterOp::Prefix => prefix_value(value),
        }
        .ok_or_else(|| {
            AppError::Validation(format!("invalid value for filter '{}': {}", key, value))
        })?;
        Ok(Filter {
            column: column.name,
            op,
            value,
        })
    }
}

/// Parse every filter; all of them must hold for a row to match.
pub fn parse_filters(
    model: &ModelDescriptor,
    filters: &[(String, Value)],
) -> Result<Vec<Filter>, AppError> {
    filters
        .iter()
        .map(|(k, v)| Filter::parse(model, k, v))
        .collect()
}

fn eq_value(kind: ColumnKind, value: &Value) -> Option<SqlValue> {
    match value {
        Value::Null => None,
        Value::String(s) if kind != ColumnKind::Text => kind.parse_text(s),
        other => kind.coerce_json(other),
    }
}

fn prefix_value(value: &Value) -> Option<SqlValue> {
    match value {
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        Value::Number(n) => Some(SqlValue::Text(n.to_string())),
        Value::Bool(b) => Some(SqlValue::Text(b.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnDef;
    use serde_json::json;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef {
            name: "uid",
            key: "uid",
            kind: ColumnKind::Integer,
        },
        ColumnDef {
            name: "string_attr",
            key: "name",
            kind: ColumnKind::Text,
        },
        ColumnDef {
            name: "active",
            key: "active",
            kind: ColumnKind::Boolean,
        },
    ];

    fn model() -> ModelDescriptor {
        ModelDescriptor::from_parts("T", "test", "uid", COLUMNS).expect("valid model")
    }

    #[test]
    fn plain_key_is_equality_parsed_by_kind() {
        let f = Filter::parse(&model(), "uid", &json!("20")).expect("filter");
        assert_eq!(
            f,
            Filter {
                column: "uid",
                op: FilterOp::Eq,
                value: SqlValue::Integer(20)
            }
        );
    }

    #[test]
    fn prefix_modifier_uses_column_name_and_text_value() {
        let f = Filter::parse(&model(), "name-prefix", &json!("ab")).expect("filter");
        assert_eq!(f.column, "string_attr");
        assert_eq!(f.op, FilterOp::Prefix);
        assert_eq!(f.value, SqlValue::Text("ab".into()));

        let f = Filter::parse(&model(), "uid-prefix", &json!(1)).expect("filter");
        assert_eq!(f.value, SqlValue::Text("1".into()));
    }

    #[test]
    fn unknown_field_and_modifier_are_validation_errors() {
        assert!(matches!(
            Filter::parse(&model(), "bogus", &json!("1")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Filter::parse(&model(), "name-suffix", &json!("x")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Filter::parse(&model(), "string_attr", &json!("x")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn unparsable_value_is_validation_error() {
        assert!(matches!(
            Filter::parse(&model(), "uid", &json!("abc")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Filter::parse(&model(), "uid", &Value::Null),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn boolean_fields_take_equality_only() {
        let f = Filter::parse(&model(), "active", &json!("true")).expect("filter");
        assert_eq!(f.value, SqlValue::Bool(true));
        assert!(matches!(
            Filter::parse(&model(), "active-prefix", &json!("t")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn parse_filters_keeps_order() {
        let filters = parse_filters(
            &model(),
            &[
                ("name".to_string(), json!("a")),
                ("uid".to_string(), json!(2)),
            ],
        )
        .expect("filters");
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].column, "string_attr");
        assert_eq!(filters[1].value, SqlValue::Integer(2));
    }
}
