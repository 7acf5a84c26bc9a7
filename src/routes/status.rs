//! Liveness and readiness of a served app.

use crate::registry::Registry;
use crate::session::SessionFactory;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// A bound model as reported by `/ready`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoundModel {
    pub prefix: String,
    pub table: &'static str,
}

#[derive(Clone)]
struct StatusState {
    sessions: SessionFactory,
    models: Arc<Vec<BoundModel>>,
}

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    models: Vec<BoundModel>,
}

async fn live() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// 200 when the store answers, 503 otherwise.
async fn ready(State(state): State<StatusState>) -> (StatusCode, Json<Readiness>) {
    let (code, status) = match sqlx::query("SELECT 1").execute(state.sessions.pool()).await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };
    let models = state.models.as_ref().clone();
    (code, Json(Readiness { status, models }))
}

/// GET /health and GET /ready. The model list is taken once, when the routes are built.
pub fn status_routes(sessions: SessionFactory, registry: &Registry) -> Router {
    let models = registry
        .bound()
        .into_iter()
        .map(|(prefix, d)| BoundModel {
            prefix: prefix.to_string(),
            table: d.table,
        })
        .collect();
    Router::new()
        .route("/health", get(live))
        .route("/ready", get(ready))
        .with_state(StatusState {
            sessions,
            models: Arc::new(models),
        })
}
