//! Transfer maps: the JSON-object form of a row.

use super::ColumnValue;
use crate::error::AppError;
use serde_json::Value;

/// Column key to scalar value, in column declaration order.
pub type TransferMap = serde_json::Map<String, Value>;

/// Read one field from a transfer map. Absent and `null` both mean unset.
pub fn take_field<T: ColumnValue>(map: &TransferMap, key: &str) -> Result<Option<T>, AppError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => T::from_json(v)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{} must be of type {}", key, T::KIND))),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::RowModel;
    use serde_json::json;

    crate::row_model! {
        struct Sample {
            table = "sample",
            primary_key = uid,
            uid: i64,
            value: i64,
            label: String as "displayLabel",
            ratio: f64,
        }
    }

    fn map(v: serde_json::Value) -> super::TransferMap {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn to_map_skips_unset_columns() {
        let row = Sample {
            uid: Some(1),
            value: None,
            label: Some("a".into()),
            ratio: None,
        };
        let out = row.to_map();
        assert_eq!(json!(out), json!({"uid": 1, "displayLabel": "a"}));
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["uid", "displayLabel"]);
    }

    #[test]
    fn from_map_ignores_unknown_and_leaves_missing_unset() {
        let row = Sample::from_map(&map(json!({"value": 2, "bogus": true, "label": "raw"})))
            .expect("valid map");
        assert_eq!(
            row,
            Sample {
                uid: None,
                value: Some(2),
                label: None,
                ratio: None,
            }
        );
    }

    #[test]
    fn from_map_treats_null_as_unset() {
        let row = Sample::from_map(&map(json!({"uid": 3, "value": null}))).expect("valid map");
        assert_eq!(row.uid, Some(3));
        assert_eq!(row.value, None);
    }

    #[test]
    fn from_map_rejects_wrong_json_type() {
        let err = Sample::from_map(&map(json!({"value": "two"}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("value")));
    }

    #[test]
    fn round_trip_keeps_non_null_columns() {
        let row = Sample {
            uid: Some(9),
            value: Some(-4),
            label: Some("x".into()),
            ratio: Some(0.5),
        };
        assert_eq!(Sample::from_map(&row.to_map()).expect("round trip"), row);
    }

    #[test]
    fn column_values_align_with_columns() {
        let row = Sample {
            uid: None,
            value: Some(7),
            label: None,
            ratio: None,
        };
        let values = row.column_values();
        assert_eq!(values.len(), Sample::COLUMNS.len());
        assert_eq!(values[1], Some(crate::SqlValue::Integer(7)));
        assert!(values[0].is_none());
    }
}
