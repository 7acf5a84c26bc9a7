//! Column descriptors resolved once when a model is registered.

use super::{ColumnDef, ColumnKind, RowModel};
use crate::config::validate_identifier;
use crate::error::ConfigError;
use std::collections::HashMap;

/// Separates a filter key from its modifier (`name-prefix`).
pub const MODIFIER_SEPARATOR: char = '-';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub key: &'static str,
    pub kind: ColumnKind,
    pub primary_key: bool,
}

#[derive(Clone, Debug)]
pub struct ModelDescriptor {
    pub model: &'static str,
    pub table: &'static str,
    pub columns: Vec<ColumnDescriptor>,
    pk_index: usize,
    by_key: HashMap<&'static str, usize>,
}

impl ModelDescriptor {
    pub fn of<M: RowModel>() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::any::type_name::<M>(),
            M::TABLE,
            M::PRIMARY_KEY,
            M::COLUMNS,
        )
    }

    pub fn from_parts(
        model: &'static str,
        table: &'static str,
        primary_key: &'static str,
        defs: &'static [ColumnDef],
    ) -> Result<Self, ConfigError> {
        validate_identifier("table", table)?;
        let mut columns = Vec::with_capacity(defs.len());
        let mut by_key = HashMap::with_capacity(defs.len());
        let mut pk_index = None;
        for (i, def) in defs.iter().enumerate() {
            validate_identifier("column", def.name)?;
            if def.key.is_empty() || def.key.contains(MODIFIER_SEPARATOR) {
                return Err(ConfigError::InvalidIdentifier {
                    kind: "json key",
                    name: def.key.to_string(),
                });
            }
            if by_key.insert(def.key, i).is_some() {
                return Err(ConfigError::DuplicateKey {
                    table: table.to_string(),
                    key: def.key.to_string(),
                });
            }
            let is_pk = def.name == primary_key;
            if is_pk {
                pk_index = Some(i);
            }
            columns.push(ColumnDescriptor {
                name: def.name,
                key: def.key,
                kind: def.kind,
                primary_key: is_pk,
            });
        }
        let pk_index = pk_index.ok_or_else(|| ConfigError::InvalidPrimaryKey {
            table: table.to_string(),
            column: primary_key.to_string(),
        })?;
        Ok(ModelDescriptor {
            model,
            table,
            columns,
            pk_index,
            by_key,
        })
    }

    pub fn primary_key(&self) -> &ColumnDescriptor {
        &self.columns[self.pk_index]
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.by_key.get(key).map(|&i| &self.columns[i])
    }

    /// Integer keys are generated by the store when omitted on insert.
    pub fn generates_key(&self) -> bool {
        self.primary_key().kind == ColumnKind::Integer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef {
            name: "uid",
            key: "uid",
            kind: ColumnKind::Integer,
        },
        ColumnDef {
            name: "string_attr",
            key: "stringAttr",
            kind: ColumnKind::Text,
        },
    ];

    #[test]
    fn resolves_primary_key_and_keys() {
        let d = ModelDescriptor::from_parts("T", "test", "uid", COLUMNS).expect("valid model");
        assert_eq!(d.primary_key().name, "uid");
        assert!(d.primary_key().primary_key);
        assert!(d.generates_key());
        assert_eq!(d.column("stringAttr").map(|c| c.name), Some("string_attr"));
        assert!(d.column("string_attr").is_none());
        assert!(!d.column("stringAttr").map(|c| c.primary_key).unwrap_or(true));
    }

    #[test]
    fn rejects_missing_primary_key() {
        let err = ModelDescriptor::from_parts("T", "test", "id", COLUMNS).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrimaryKey { ref column, .. } if column == "id"));
    }

    #[test]
    fn rejects_bad_table_name() {
        let err = ModelDescriptor::from_parts("T", "test; drop", "uid", COLUMNS).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentifier { kind: "table", .. }));
    }

    #[test]
    fn rejects_separator_in_json_key() {
        const BAD: &[ColumnDef] = &[ColumnDef {
            name: "uid",
            key: "u-id",
            kind: ColumnKind::Integer,
        }];
        let err = ModelDescriptor::from_parts("T", "test", "uid", BAD).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentifier { kind: "json key", .. }));
    }

    #[test]
    fn rejects_duplicate_json_keys() {
        const DUP: &[ColumnDef] = &[
            ColumnDef {
                name: "uid",
                key: "uid",
                kind: ColumnKind::Integer,
            },
            ColumnDef {
                name: "other",
                key: "uid",
                kind: ColumnKind::Text,
            },
        ];
        let err = ModelDescriptor::from_parts("T", "test", "uid", DUP).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey { .. }));
    }
}
