//! Handlers for the `/trash` resource.
//!
//! A unified view over soft-deleted rows of every catalog resource:
//! listing trashed items, restoring them, and hard-deleting (purging)
//! individual or all trashed records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_db::repositories::trash_repo::{TrashRepo, TrashSummary, KNOWN_ENTITY_TYPES};
use catalog_db::repositories::{CastMemberRepo, CategoryRepo, GenreRepo, Resource, VideoRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the trash listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TrashQuery {
    /// Optional entity type filter (e.g. "categories", "cast-members").
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

/// GET /api/v1/trash
///
/// List all soft-deleted items, optionally filtered by entity type.
pub async fn list_trashed(
    State(state): State<AppState>,
    Query(params): Query<TrashQuery>,
) -> AppResult<Json<TrashSummary>> {
    let entity_type = params
        .entity_type
        .as_deref()
        .map(validate_entity_type)
        .transpose()?;
    let summary = TrashRepo::list_trashed(&state.pool, entity_type).await?;
    Ok(Json(summary))
}

/// POST /api/v1/trash/{entity_type}/{id}/restore
///
/// Restore a soft-deleted row. Returns 404 if the row is not in the trash.
pub async fn restore(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    let entity_type = validate_entity_type(&entity_type)?;
    let id = parse_trashed_id(&id)?;

    if dispatch_restore(&state.pool, entity_type, id).await? {
        tracing::info!(%entity_type, %id, "Restored from trash");
        Ok(Json(serde_json::json!({
            "restored": true,
            "entity_type": entity_type,
            "id": id,
        })))
    } else {
        Err(AppError::Core(CoreError::not_found("TrashedItem", id)))
    }
}

/// DELETE /api/v1/trash/purge
///
/// Hard-delete all soft-deleted records across every entity table.
pub async fn purge_all(State(state): State<AppState>) -> AppResult<StatusCode> {
    let purged = TrashRepo::purge_all(&state.pool).await?;
    tracing::info!(purged, "Purged trash");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/trash/{entity_type}/{id}/purge
///
/// Hard-delete a single soft-deleted record.
pub async fn purge_one(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let entity_type = validate_entity_type(&entity_type)?;
    let id = parse_trashed_id(&id)?;
    if TrashRepo::purge_one(&state.pool, entity_type, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("TrashedItem", id)))
    }
}

// ── Private helpers ──────────────────────────────────────────────────────

/// Resolve `entity_type` to its table name. The hyphenated resource path
/// form (`cast-members`) is accepted alongside the table name.
fn validate_entity_type(entity_type: &str) -> AppResult<&'static str> {
    let table = entity_type.replace('-', "_");
    KNOWN_ENTITY_TYPES
        .iter()
        .find(|known| **known == table)
        .copied()
        .ok_or_else(|| AppError::BadRequest(format!("Unknown entity type: {entity_type}")))
}

fn parse_trashed_id(id: &str) -> AppResult<DbId> {
    id.parse()
        .map_err(|_| AppError::Core(CoreError::not_found("TrashedItem", id)))
}

/// Dispatch a restore call to the correct entity repository.
///
/// Returns `true` if a row was restored, `false` if the row was not
/// found in the trash (already live or does not exist).
async fn dispatch_restore(
    pool: &sqlx::PgPool,
    entity_type: &str,
    id: DbId,
) -> Result<bool, sqlx::Error> {
    match entity_type {
        "categories" => CategoryRepo::restore(pool, id).await,
        "genres" => GenreRepo::restore(pool, id).await,
        "cast_members" => CastMemberRepo::restore(pool, id).await,
        "videos" => VideoRepo::restore(pool, id).await,
        // validate_entity_type is called before dispatch, so this is unreachable
        _ => Ok(false),
    }
}
