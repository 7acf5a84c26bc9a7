//! Generic CRUD execution for one row model inside a caller-owned session.

use crate::error::{AppError, ConfigError};
use crate::model::{ColumnDescriptor, ModelDescriptor, RowModel, TransferMap};
use crate::session::Session;
use crate::sql::{
    bind_params, count_by_key, delete, insert, parse_filters, select_by_key, select_filtered,
    update, Dialect, QueryBuf, SqlValue,
};
use serde_json::Value;
use sqlx::any::AnyRow;
use sqlx::Row;
use std::marker::PhantomData;

/// Create/get/update/delete/search for `M`. Never commits or rolls back; the session owner does.
pub struct DataAccess<M> {
    model: ModelDescriptor,
    dialect: Dialect,
    _marker: PhantomData<fn() -> M>,
}

impl<M: RowModel> DataAccess<M> {
    pub fn new(dialect: Dialect) -> Result<Self, ConfigError> {
        Ok(DataAccess {
            model: ModelDescriptor::of::<M>()?,
            dialect,
            _marker: PhantomData,
        })
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.model
    }

    /// Primary-key value from its text form (a path segment).
    pub fn parse_key(&self, text: &str) -> Result<Value, AppError> {
        let pk = self.model.primary_key();
        pk.kind
            .parse_text(text)
            .map(|v| v.to_json())
            .ok_or_else(|| AppError::Validation(format!("invalid {} '{}'", pk.key, text)))
    }

    /// Insert a row built from `fields` and return its primary key, including a store-generated one.
    pub async fn create(&self, session: &mut Session, fields: &TransferMap) -> Result<Value, AppError> {
        let row = M::from_map(fields)?;
        self.insert(session, &row).await
    }

    /// Insert the set columns of `row` and return its primary key.
    pub async fn insert(&self, session: &mut Session, row: &M) -> Result<Value, AppError> {
        let pk = self.model.primary_key();
        let values: Vec<(&ColumnDescriptor, SqlValue)> = self
            .model
            .columns
            .iter()
            .zip(row.column_values())
            .filter_map(|(c, v)| v.map(|v| (c, v)))
            .collect();
        if !self.model.generates_key() && !values.iter().any(|(c, _)| c.primary_key) {
            return Err(AppError::Validation(format!("{} is required", pk.key)));
        }
        let q = insert(&self.model, self.dialect, values);
        let inserted = fetch_one(session, &q).await?;
        Ok(pk.kind.decode_json(&inserted, pk.name)?)
    }

    /// Typed lookup by primary key.
    pub async fn fetch(&self, session: &mut Session, pkey: &Value) -> Result<Option<M>, AppError> {
        let q = select_by_key(&self.model, self.dialect, self.key_param(pkey)?);
        let row = fetch_optional(session, &q).await?;
        Ok(row.map(|r| M::from_row(&r)).transpose()?)
    }

    pub async fn get(&self, session: &mut Session, pkey: &Value) -> Result<Option<TransferMap>, AppError> {
        Ok(self.fetch(session, pkey).await?.map(|m| m.to_map()))
    }

    /// Set only the columns present in `fields` on the row with `pkey`. Returns the number of rows matched (0 or 1).
    pub async fn update(
        &self,
        session: &mut Session,
        pkey: &Value,
        fields: &TransferMap,
    ) -> Result<u64, AppError> {
        let key = self.key_param(pkey)?;
        let mut sets = Vec::with_capacity(fields.len());
        for (k, v) in fields {
            let column = self
                .model
                .column(k)
                .ok_or_else(|| AppError::Validation(format!("unknown field '{}'", k)))?;
            let value = column.kind.coerce_json(v).ok_or_else(|| {
                AppError::Validation(format!("{} must be of type {}", k, column.kind))
            })?;
            if column.primary_key {
                if value != key {
                    return Err(AppError::Validation(format!("{} cannot be changed", k)));
                }
                continue;
            }
            sets.push((column, value));
        }
        if sets.is_empty() {
            let q = count_by_key(&self.model, self.dialect, key);
            let row = fetch_one(session, &q).await?;
            let count: i64 = row.try_get("count")?;
            return Ok(u64::try_from(count).unwrap_or(0));
        }
        let q = update(&self.model, self.dialect, key, sets);
        execute(session, &q).await
    }

    /// Delete the row with `pkey`. Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, session: &mut Session, pkey: &Value) -> Result<u64, AppError> {
        let q = delete(&self.model, self.dialect, self.key_param(pkey)?);
        execute(session, &q).await
    }

    /// Rows matching every filter, ordered by primary key.
    ///
    /// Filter keys are JSON keys, optionally suffixed with `-prefix`. Values may be text
    /// (as in a query string) and are parsed by column kind.
    pub async fn search(
        &self,
        session: &mut Session,
        filters: &[(String, Value)],
    ) -> Result<SearchResults<M>, AppError> {
        let filters = parse_filters(&self.model, filters)?;
        let q = select_filtered(&self.model, self.dialect, &filters, None);
        let rows = fetch_all(session, &q).await?;
        Ok(SearchResults {
            rows: rows.into_iter(),
            _marker: PhantomData,
        })
    }

    /// First row (by primary key) matching every filter.
    pub async fn get_one(
        &self,
        session: &mut Session,
        filters: &[(String, Value)],
    ) -> Result<Option<TransferMap>, AppError> {
        let filters = parse_filters(&self.model, filters)?;
        let q = select_filtered(&self.model, self.dialect, &filters, Some(1));
        let row = fetch_optional(session, &q).await?;
        Ok(row.map(|r| M::from_row(&r)).transpose()?.map(|m| m.to_map()))
    }

    fn key_param(&self, pkey: &Value) -> Result<SqlValue, AppError> {
        let pk = self.model.primary_key();
        let value = match pkey {
            Value::Null => None,
            Value::String(s) => pk.kind.parse_text(s),
            other => pk.kind.coerce_json(other),
        };
        value.ok_or_else(|| AppError::Validation(format!("invalid {} {}", pk.key, pkey)))
    }
}

/// Search results, converted to transfer maps one row at a time in a single forward pass.
pub struct SearchResults<M> {
    rows: std::vec::IntoIter<AnyRow>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: RowModel> Iterator for SearchResults<M> {
    type Item = Result<TransferMap, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows
            .next()
            .map(|r| M::from_row(&r).map(|m| m.to_map()).map_err(AppError::from))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

async fn fetch_optional(session: &mut Session, q: &QueryBuf) -> Result<Option<AnyRow>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let row = bind_params(sqlx::query(&q.sql), &q.params)
        .fetch_optional(session.connection())
        .await?;
    Ok(row)
}

async fn fetch_one(session: &mut Session, q: &QueryBuf) -> Result<AnyRow, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let row = bind_params(sqlx::query(&q.sql), &q.params)
        .fetch_one(session.connection())
        .await?;
    Ok(row)
}

async fn fetch_all(session: &mut Session, q: &QueryBuf) -> Result<Vec<AnyRow>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let rows = bind_params(sqlx::query(&q.sql), &q.params)
        .fetch_all(session.connection())
        .await?;
    Ok(rows)
}

async fn execute(session: &mut Session, q: &QueryBuf) -> Result<u64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
    let result = bind_params(sqlx::query(&q.sql), &q.params)
        .execute(session.connection())
        .await?;
    Ok(result.rows_affected())
}
