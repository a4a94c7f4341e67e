//! Handlers for the `/videos` resource.
//!
//! Create and update replace the video's category and genre associations
//! inside the same transaction as the row write. The remaining actions are
//! the shared ones from [`super::resource`].

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::types::DbId;
use catalog_db::models::video::{Video, VideoRelations};
use catalog_db::repositories::VideoRepo;
use serde_json::{Map, Value};
use sqlx::PgConnection;

use crate::crud::{RelationSync, RelationalHandler};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Replaces `category_video` and `genre_video` rows with the validated
/// `categories_id` and `genres_id` sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoRelationSync;

#[async_trait]
impl RelationSync<VideoRepo> for VideoRelationSync {
    async fn sync(
        &self,
        conn: &mut PgConnection,
        id: DbId,
        validated: &Map<String, Value>,
    ) -> AppResult<()> {
        let relations: VideoRelations = serde_json::from_value(Value::Object(validated.clone()))
            .map_err(|e| AppError::BadRequest(format!("Invalid video relations: {e}")))?;
        VideoRepo::sync_relations(conn, id, &relations).await?;
        Ok(())
    }
}

fn handler() -> RelationalHandler<VideoRepo, VideoRelationSync> {
    RelationalHandler::new(VideoRelationSync)
}

/// POST /api/v1/videos
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<(StatusCode, Json<Video>)> {
    let video = handler().create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// PUT|PATCH /api/v1/videos/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<Video>> {
    let video = handler().update(&state.pool, &id, payload).await?;
    Ok(Json(video))
}
