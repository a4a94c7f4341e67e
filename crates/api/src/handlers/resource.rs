//! Axum handlers shared by every plain resource.
//!
//! Each function is generic over the [`Resource`] it serves and is mounted
//! once per resource, e.g. `get(resource::list::<CategoryRepo>)`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_db::repositories::Resource;
use serde_json::Value;

use crate::crud::ResourceHandler;
use crate::error::AppResult;
use crate::query::WithDeletedParams;
use crate::state::AppState;

/// GET /api/v1/{resource}
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<WithDeletedParams>,
) -> AppResult<Json<Vec<R::Row>>> {
    let rows = ResourceHandler::<R>::new()
        .list(&state.pool, params.with_deleted)
        .await?;
    Ok(Json(rows))
}

/// POST /api/v1/{resource}
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<(StatusCode, Json<R::Row>)> {
    let row = ResourceHandler::<R>::new()
        .create(&state.pool, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/{resource}/{id}
pub async fn get_by_id<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<WithDeletedParams>,
) -> AppResult<Json<R::Row>> {
    let row = ResourceHandler::<R>::new()
        .read_one(&state.pool, &id, params.with_deleted)
        .await?;
    Ok(Json(row))
}

/// PUT|PATCH /api/v1/{resource}/{id}
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<R::Row>> {
    let row = ResourceHandler::<R>::new()
        .update(&state.pool, &id, payload)
        .await?;
    Ok(Json(row))
}

/// DELETE /api/v1/{resource}/{id}
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    ResourceHandler::<R>::new().delete(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
