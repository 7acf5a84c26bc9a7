//! Transactional sessions: one per request, committed on success and rolled back on error.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::sql::Dialect;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::{Any, AnyConnection, AnyPool, Transaction};
use std::time::Duration;

/// Opens sessions against one pool.
#[derive(Clone, Debug)]
pub struct SessionFactory {
    pool: AnyPool,
    dialect: Dialect,
}

impl SessionFactory {
    /// Connect a pool for `config.url`. In-memory SQLite keeps a single connection alive so
    /// every session sees the same database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        install_default_drivers();
        let dialect = Dialect::from_url(&config.url)?;
        let options = if config.is_memory() {
            AnyPoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            AnyPoolOptions::new().max_connections(config.max_connections)
        };
        let pool = options.connect(&config.url).await?;
        tracing::info!(dialect = ?dialect, "database pool connected");
        Ok(SessionFactory { pool, dialect })
    }

    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        SessionFactory { pool, dialect }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub async fn open(&self) -> Result<Session, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Session { tx })
    }
}

/// One unit of work. Dropping a session without committing rolls it back.
pub struct Session {
    tx: Transaction<'static, Any>,
}

impl Session {
    pub fn connection(&mut self) -> &mut AnyConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }

    /// Close the session according to `result`: commit on `Ok`, roll back and return the error on `Err`.
    /// A failed commit is reported as the request's error.
    pub async fn finish<T>(self, result: Result<T, AppError>) -> Result<T, AppError> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "rolling back session");
                if let Err(rollback_err) = self.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(e)
            }
        }
    }
}
