//! Row-model CRUD handlers: each request runs in its own session.

use crate::error::AppError;
use crate::model::{RowModel, TransferMap};
use crate::response::{Created, Deleted, Modified, SearchBody};
use crate::state::EndpointState;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

fn body_to_map(body: &[u8]) -> Result<TransferMap, AppError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err(AppError::Validation("body must be a JSON object".into())),
        Err(e) => Err(AppError::Validation(format!("malformed JSON body: {}", e))),
    }
}

fn query_filters(
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Vec<(String, Value)>, AppError> {
    let Query(params) =
        query.map_err(|e| AppError::Validation(format!("malformed query string: {}", e.body_text())))?;
    Ok(params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect())
}

/// GET P/{pkey}
pub async fn read<M: RowModel>(
    State(state): State<EndpointState<M>>,
    Path(pkey): Path<String>,
) -> Result<Json<TransferMap>, AppError> {
    let key = state.api.parse_key(&pkey)?;
    let mut session = state.sessions.open().await?;
    let found = state.api.get(&mut session, &key).await;
    let found = session.finish(found).await?;
    found.map(Json).ok_or(AppError::NotFound(pkey))
}

/// PUT P/{pkey}
pub async fn update<M: RowModel>(
    State(state): State<EndpointState<M>>,
    Path(pkey): Path<String>,
    body: Bytes,
) -> Result<Json<Modified>, AppError> {
    let key = state.api.parse_key(&pkey)?;
    let fields = body_to_map(&body)?;
    let mut session = state.sessions.open().await?;
    let modified = state.api.update(&mut session, &key, &fields).await;
    let modified = session.finish(modified).await?;
    Ok(Json(Modified { modified }))
}

/// POST P
pub async fn create<M: RowModel>(
    State(state): State<EndpointState<M>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let fields = body_to_map(&body)?;
    let mut session = state.sessions.open().await?;
    let key = state.api.create(&mut session, &fields).await;
    let key = session.finish(key).await?;
    Ok((StatusCode::CREATED, Json(Created { key })))
}

/// DELETE P/{pkey}
pub async fn delete<M: RowModel>(
    State(state): State<EndpointState<M>>,
    Path(pkey): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let key = state.api.parse_key(&pkey)?;
    let mut session = state.sessions.open().await?;
    let deleted = state.api.delete(&mut session, &key).await;
    let deleted = session.finish(deleted).await?;
    Ok(Json(Deleted { deleted }))
}

/// GET P?field=v&field-prefix=v
pub async fn search<M: RowModel>(
    State(state): State<EndpointState<M>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchBody>, AppError> {
    let filters = query_filters(query)?;
    let mut session = state.sessions.open().await?;
    let result = match state.api.search(&mut session, &filters).await {
        Ok(rows) => rows.collect::<Result<Vec<_>, _>>(),
        Err(e) => Err(e),
    };
    let result = session.finish(result).await?;
    Ok(Json(SearchBody { result }))
}
