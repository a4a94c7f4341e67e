//! Repository for the `videos` table and its category/genre junction tables.

use async_trait::async_trait;
use catalog_core::types::{new_id, DbId};
use catalog_core::validation::RuleSet;
use sqlx::{PgConnection, PgPool};

use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoRelations, VIDEO_RULES};
use crate::repositories::Resource;

const COLUMNS: &str = "id, title, description, year_launched, opened, rating, duration, \
                       created_at, updated_at, deleted_at";

/// Junction tables keyed by `video_id`, with the foreign key column of the
/// associated entity.
const CATEGORY_PIVOT: (&str, &str) = ("category_video", "category_id");
const GENRE_PIVOT: (&str, &str) = ("genre_video", "genre_id");

/// Provides CRUD operations for videos.
pub struct VideoRepo;

#[async_trait]
impl Resource for VideoRepo {
    type Row = Video;
    type Create = CreateVideo;
    type Update = UpdateVideo;

    const ENTITY: &'static str = "Video";
    const TABLE: &'static str = "videos";
    const COLUMNS: &'static str = COLUMNS;

    fn store_rules() -> &'static RuleSet {
        &VIDEO_RULES
    }

    fn key(row: &Video) -> DbId {
        row.id
    }

    /// If `opened` is `None` in the input, defaults to `false`.
    async fn insert(conn: &mut PgConnection, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (id, title, description, year_launched, opened, rating, duration)
             VALUES ($1, $2, $3, $4, COALESCE($5, false), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(new_id())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.year_launched)
            .bind(input.opened)
            .bind(&input.rating)
            .bind(input.duration)
            .fetch_one(conn)
            .await
    }

    async fn apply_update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                year_launched = COALESCE($4, year_launched),
                opened = COALESCE($5, opened),
                rating = COALESCE($6, rating),
                duration = COALESCE($7, duration)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.year_launched)
            .bind(input.opened)
            .bind(&input.rating)
            .bind(input.duration)
            .fetch_optional(conn)
            .await
    }
}

impl VideoRepo {
    /// Replace both association sets of a video on `conn`.
    ///
    /// Callers run this inside the same transaction as the row write so a
    /// failure leaves neither the row nor the associations changed.
    pub async fn sync_relations(
        conn: &mut PgConnection,
        video_id: DbId,
        relations: &VideoRelations,
    ) -> Result<(), sqlx::Error> {
        Self::sync_pivot(conn, CATEGORY_PIVOT, video_id, &relations.categories_id).await?;
        Self::sync_pivot(conn, GENRE_PIVOT, video_id, &relations.genres_id).await?;
        Ok(())
    }

    /// Category ids currently associated with a video.
    pub async fn category_ids(pool: &PgPool, video_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        Self::pivot_ids(pool, CATEGORY_PIVOT, video_id).await
    }

    /// Genre ids currently associated with a video.
    pub async fn genre_ids(pool: &PgPool, video_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        Self::pivot_ids(pool, GENRE_PIVOT, video_id).await
    }

    /// Make the junction rows for `video_id` exactly equal to `ids`.
    ///
    /// Rows outside the set are removed, missing ones are inserted and rows
    /// already present are left untouched.
    async fn sync_pivot(
        conn: &mut PgConnection,
        (table, fk): (&str, &str),
        video_id: DbId,
        ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let delete = format!("DELETE FROM {table} WHERE video_id = $1 AND NOT ({fk} = ANY($2))");
        sqlx::query(&delete)
            .bind(video_id)
            .bind(ids)
            .execute(&mut *conn)
            .await?;

        let insert = format!(
            "INSERT INTO {table} ({fk}, video_id)
             SELECT DISTINCT unnest($2::uuid[]), $1::uuid
             ON CONFLICT ON CONSTRAINT uq_{table} DO NOTHING"
        );
        sqlx::query(&insert)
            .bind(video_id)
            .bind(ids)
            .execute(&mut *conn)
            .await?;

        tracing::debug!(table, %video_id, count = ids.len(), "Synced video associations");
        Ok(())
    }

    async fn pivot_ids(
        pool: &PgPool,
        (table, fk): (&str, &str),
        video_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!("SELECT {fk} FROM {table} WHERE video_id = $1 ORDER BY created_at, {fk}");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }
}
