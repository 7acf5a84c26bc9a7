//! Rowrest: REST CRUD endpoints generated for declared row models.
//!
//! Declare a model with [`row_model!`], bind it to a URL prefix with [`RestApp::bind`], and serve
//! [`RestApp::into_router`]. Every request runs in its own database session, committed when the
//! handler succeeds and rolled back otherwise.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod registry;
pub mod response;
pub mod routes;
pub mod service;
pub mod session;
pub mod sql;
pub mod state;
pub mod telemetry;

pub use app::RestApp;
pub use config::{AppConfig, DatabaseConfig};
pub use error::{AppError, ConfigError};
pub use model::{ColumnDef, ColumnKind, ColumnValue, ModelDescriptor, RowModel, TransferMap};
pub use registry::Registry;
pub use routes::{entity_routes, status_routes, BoundModel};
pub use service::{DataAccess, SearchResults};
pub use session::{Session, SessionFactory};
pub use sql::{Dialect, SqlValue};
pub use telemetry::init_tracing;

pub use sqlx;
pub use sqlx::any::AnyRow;
