//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a model descriptor.

use super::{Dialect, Filter, FilterOp, SqlValue};
use crate::model::{ColumnDescriptor, ModelDescriptor};

/// Quote identifier (safe: only from validated descriptors).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
    dialect: Dialect,
}

impl QueryBuf {
    fn new(dialect: Dialect) -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    fn push_param(&mut self, v: SqlValue) -> String {
        self.params.push(v);
        self.dialect.placeholder(self.params.len())
    }
}

fn select_column_list(model: &ModelDescriptor) -> String {
    model
        .columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT one row by primary key.
pub fn select_by_key(model: &ModelDescriptor, dialect: Dialect, key: SqlValue) -> QueryBuf {
    let mut q = QueryBuf::new(dialect);
    let ph = q.push_param(key);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(model),
        quoted(model.table),
        quoted(model.primary_key().name),
        ph
    );
    q
}

/// SELECT rows matching all filters, ORDER BY primary key, optional LIMIT.
pub fn select_filtered(
    model: &ModelDescriptor,
    dialect: Dialect,
    filters: &[Filter],
    limit: Option<u32>,
) -> QueryBuf {
    let mut q = QueryBuf::new(dialect);
    let mut where_parts = Vec::with_capacity(filters.len());
    for f in filters {
        let col = quoted(f.column);
        match f.op {
            FilterOp::Eq => {
                let ph = q.push_param(f.value.clone());
                where_parts.push(format!("{} = {}", col, ph));
            }
            FilterOp::Prefix => {
                let len_ph = q.push_param(f.value.clone());
                let eq_ph = q.push_param(f.value.clone());
                where_parts.push(format!(
                    "substr(CAST({} AS TEXT), 1, length({})) = {}",
                    col, len_ph, eq_ph
                ));
            }
        }
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}{}",
        select_column_list(model),
        quoted(model.table),
        where_clause,
        quoted(model.primary_key().name),
        limit_clause
    );
    q
}

/// INSERT the given columns and return the primary key.
/// With no columns, the row is inserted with store defaults.
pub fn insert(
    model: &ModelDescriptor,
    dialect: Dialect,
    values: Vec<(&ColumnDescriptor, SqlValue)>,
) -> QueryBuf {
    let mut q = QueryBuf::new(dialect);
    let table = quoted(model.table);
    let returning = quoted(model.primary_key().name);
    if values.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning);
        return q;
    }
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (c, v) in values {
        cols.push(quoted(c.name));
        placeholders.push(q.push_param(v));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        cols.join(", "),
        placeholders.join(", "),
        returning
    );
    q
}

/// UPDATE by primary key: SET only the given columns. Callers must pass at least one column.
pub fn update(
    model: &ModelDescriptor,
    dialect: Dialect,
    key: SqlValue,
    sets: Vec<(&ColumnDescriptor, SqlValue)>,
) -> QueryBuf {
    let mut q = QueryBuf::new(dialect);
    let mut assignments = Vec::with_capacity(sets.len());
    for (c, v) in sets {
        let ph = q.push_param(v);
        assignments.push(format!("{} = {}", quoted(c.name), ph));
    }
    let key_ph = q.push_param(key);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(model.table),
        assignments.join(", "),
        quoted(model.primary_key().name),
        key_ph
    );
    q
}

/// DELETE by primary key.
pub fn delete(model: &ModelDescriptor, dialect: Dialect, key: SqlValue) -> QueryBuf {
    let mut q = QueryBuf::new(dialect);
    let ph = q.push_param(key);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(model.table),
        quoted(model.primary_key().name),
        ph
    );
    q
}

/// COUNT rows with the given primary key (0 or 1).
pub fn count_by_key(model: &ModelDescriptor, dialect: Dialect, key: SqlValue) -> QueryBuf {
    let mut q = QueryBuf::new(dialect);
    let ph = q.push_param(key);
    q.sql = format!(
        "SELECT COUNT(*) AS \"count\" FROM {} WHERE {} = {}",
        quoted(model.table),
        quoted(model.primary_key().name),
        ph
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnDef, ColumnKind};

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef {
            name: "uid",
            key: "uid",
            kind: ColumnKind::Integer,
        },
        ColumnDef {
            name: "value",
            key: "value",
            kind: ColumnKind::Integer,
        },
        ColumnDef {
            name: "string_attr",
            key: "stringAttr",
            kind: ColumnKind::Text,
        },
    ];

    fn model() -> ModelDescriptor {
        ModelDescriptor::from_parts("T", "test", "uid", COLUMNS).expect("valid model")
    }

    #[test]
    fn select_by_key_sqlite() {
        let q = select_by_key(&model(), Dialect::Sqlite, SqlValue::Integer(1));
        assert_eq!(
            q.sql,
            r#"SELECT "uid", "value", "string_attr" FROM "test" WHERE "uid" = ?"#
        );
        assert_eq!(q.params, vec![SqlValue::Integer(1)]);
    }

    #[test]
    fn filtered_select_numbers_postgres_placeholders() {
        let filters = vec![
            Filter {
                column: "value",
                op: FilterOp::Eq,
                value: SqlValue::Integer(20),
            },
            Filter {
                column: "string_attr",
                op: FilterOp::Prefix,
                value: SqlValue::Text("ab".into()),
            },
        ];
        let q = select_filtered(&model(), Dialect::Postgres, &filters, Some(1));
        assert_eq!(
            q.sql,
            r#"SELECT "uid", "value", "string_attr" FROM "test" WHERE "value" = $1 AND substr(CAST("string_attr" AS TEXT), 1, length($2)) = $3 ORDER BY "uid" LIMIT 1"#
        );
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn filtered_select_without_filters() {
        let q = select_filtered(&model(), Dialect::Sqlite, &[], None);
        assert_eq!(
            q.sql,
            r#"SELECT "uid", "value", "string_attr" FROM "test" ORDER BY "uid""#
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_returns_primary_key() {
        let m = model();
        let value = m.column("value").expect("column");
        let q = insert(&m, Dialect::Postgres, vec![(value, SqlValue::Integer(2))]);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "test" ("value") VALUES ($1) RETURNING "uid""#
        );
        let q = insert(&m, Dialect::Sqlite, Vec::new());
        assert_eq!(q.sql, r#"INSERT INTO "test" DEFAULT VALUES RETURNING "uid""#);
    }

    #[test]
    fn update_binds_key_last() {
        let m = model();
        let value = m.column("value").expect("column");
        let text = m.column("stringAttr").expect("column");
        let q = update(
            &m,
            Dialect::Postgres,
            SqlValue::Integer(1),
            vec![
                (value, SqlValue::Integer(5)),
                (text, SqlValue::Null(ColumnKind::Text)),
            ],
        );
        assert_eq!(
            q.sql,
            r#"UPDATE "test" SET "value" = $1, "string_attr" = $2 WHERE "uid" = $3"#
        );
        assert_eq!(q.params[2], SqlValue::Integer(1));
    }

    #[test]
    fn delete_and_count_by_key() {
        let q = delete(&model(), Dialect::Sqlite, SqlValue::Integer(4));
        assert_eq!(q.sql, r#"DELETE FROM "test" WHERE "uid" = ?"#);
        let q = count_by_key(&model(), Dialect::Sqlite, SqlValue::Integer(4));
        assert_eq!(
            q.sql,
            r#"SELECT COUNT(*) AS "count" FROM "test" WHERE "uid" = ?"#
        );
    }

    #[test]
    fn quoted_escapes_double_quotes() {
        assert_eq!(quoted(r#"a"b"#), r#""a""b""#);
    }
}
