//! Repository for the `genres` table.

use async_trait::async_trait;
use catalog_core::types::{new_id, DbId};
use catalog_core::validation::RuleSet;
use sqlx::PgConnection;

use crate::models::genre::{CreateGenre, Genre, UpdateGenre, GENRE_RULES};
use crate::repositories::Resource;

const COLUMNS: &str = "id, name, is_active, created_at, updated_at, deleted_at";

/// Provides CRUD operations for genres.
pub struct GenreRepo;

#[async_trait]
impl Resource for GenreRepo {
    type Row = Genre;
    type Create = CreateGenre;
    type Update = UpdateGenre;

    const ENTITY: &'static str = "Genre";
    const TABLE: &'static str = "genres";
    const COLUMNS: &'static str = COLUMNS;

    fn store_rules() -> &'static RuleSet {
        &GENRE_RULES
    }

    fn key(row: &Genre) -> DbId {
        row.id
    }

    async fn insert(conn: &mut PgConnection, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query = format!(
            "INSERT INTO genres (id, name, is_active)
             VALUES ($1, $2, COALESCE($3, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_one(conn)
            .await
    }

    async fn apply_update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateGenre,
    ) -> Result<Option<Genre>, sqlx::Error> {
        let query = format!(
            "UPDATE genres SET
                name = COALESCE($2, name),
                is_active = COALESCE($3, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Genre>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_optional(conn)
            .await
    }
}
