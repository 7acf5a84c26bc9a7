//! CREATE TABLE for bound models, from their column descriptors.

use super::builder::quoted;
use super::Dialect;
use crate::model::{ColumnDescriptor, ColumnKind, ModelDescriptor};

fn column_type(kind: ColumnKind, dialect: Dialect) -> &'static str {
    match (kind, dialect) {
        (ColumnKind::Integer, Dialect::Sqlite) => "INTEGER",
        (ColumnKind::Integer, Dialect::Postgres) => "BIGINT",
        (ColumnKind::Real, Dialect::Sqlite) => "REAL",
        (ColumnKind::Real, Dialect::Postgres) => "DOUBLE PRECISION",
        (ColumnKind::Text, _) => "TEXT",
        (ColumnKind::Boolean, Dialect::Sqlite) => "INTEGER",
        (ColumnKind::Boolean, Dialect::Postgres) => "BOOLEAN",
    }
}

fn column_sql(c: &ColumnDescriptor, dialect: Dialect) -> String {
    let name = quoted(c.name);
    if !c.primary_key {
        return format!("{} {}", name, column_type(c.kind, dialect));
    }
    // Integer keys are generated: rowid alias on SQLite, a sequence on PostgreSQL.
    match (c.kind, dialect) {
        (ColumnKind::Integer, Dialect::Sqlite) => format!("{} INTEGER PRIMARY KEY", name),
        (ColumnKind::Integer, Dialect::Postgres) => format!("{} BIGSERIAL PRIMARY KEY", name),
        (kind, _) => format!("{} {} NOT NULL PRIMARY KEY", name, column_type(kind, dialect)),
    }
}

/// `CREATE TABLE IF NOT EXISTS` with every declared column; non-key columns are nullable.
pub fn create_table_sql(model: &ModelDescriptor, dialect: Dialect) -> String {
    let columns: Vec<String> = model.columns.iter().map(|c| column_sql(c, dialect)).collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(model.table),
        columns.join(", ")
    )
}
