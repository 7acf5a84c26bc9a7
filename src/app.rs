//! RestApp: binds row models to URL prefixes and assembles the router.

use crate::config::{validate_prefix, DatabaseConfig, DEFAULT_BODY_LIMIT};
use crate::error::{AppError, ConfigError};
use crate::model::RowModel;
use crate::registry::Registry;
use crate::routes::{entity_routes, status_routes};
use crate::service::DataAccess;
use crate::session::SessionFactory;
use crate::sql::create_table_sql;
use crate::state::EndpointState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Owns the session factory, the registry of bound models and the routes generated for them.
pub struct RestApp {
    sessions: SessionFactory,
    registry: Registry,
    router: Router,
    body_limit: usize,
}

impl RestApp {
    pub fn new(sessions: SessionFactory) -> Self {
        RestApp {
            sessions,
            registry: Registry::new(),
            router: Router::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Connect to the database described by `config` and start with no bound models.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        Ok(Self::new(SessionFactory::connect(config).await?))
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Register GET/POST on `prefix` and GET/PUT/DELETE on `prefix/:pkey` for `M`.
    pub fn bind<M: RowModel>(&mut self, prefix: &str) -> Result<Arc<DataAccess<M>>, ConfigError> {
        validate_prefix(prefix)?;
        let api = Arc::new(DataAccess::<M>::new(self.sessions.dialect())?);
        self.registry.insert(prefix, Arc::clone(&api))?;
        let state = EndpointState::new(self.sessions.clone(), Arc::clone(&api));
        let router = std::mem::replace(&mut self.router, Router::new());
        self.router = router.merge(entity_routes(prefix, state));
        tracing::info!(prefix = %prefix, table = M::TABLE, "bound rest endpoints");
        Ok(api)
    }

    /// The data access component bound for `M`, if any.
    pub fn api<M: RowModel>(&self) -> Option<Arc<DataAccess<M>>> {
        self.registry.get::<M>()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionFactory {
        &self.sessions
    }

    /// Create the table of every bound model that does not exist yet.
    pub async fn create_all(&self) -> Result<(), AppError> {
        let mut session = self.sessions.open().await?;
        let mut result = Ok(());
        for model in self.registry.descriptors() {
            let sql = create_table_sql(model, self.sessions.dialect());
            tracing::info!(table = model.table, "ensuring table");
            tracing::debug!(sql = %sql, "ddl");
            if let Err(e) = sqlx::query(&sql).execute(session.connection()).await {
                result = Err(AppError::from(e));
                break;
            }
        }
        session.finish(result).await
    }

    /// GET /health and GET /ready for this app's database and bound models.
    pub fn status_routes(&self) -> Router {
        status_routes(self.sessions.clone(), &self.registry)
    }

    /// The generated routes with request tracing and the body size limit applied.
    pub fn into_router(self) -> Router {
        self.router
            .layer(DefaultBodyLimit::max(self.body_limit))
            .layer(RequestBodyLimitLayer::new(self.body_limit))
            .layer(TraceLayer::new_for_http())
    }
}
