//! Shared persistence contract for soft-deletable catalog resources.
//!
//! Every catalog table has a UUID `id`, `created_at`/`updated_at`
//! timestamps and a nullable `deleted_at`. Entity repositories only supply
//! their insert and update statements; listing, lookup, soft delete,
//! restore and purge are provided here.

use async_trait::async_trait;
use catalog_core::types::DbId;
use catalog_core::validation::RuleSet;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};

#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Row struct returned by every query.
    type Row: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin;
    /// DTO built from a validated create payload.
    type Create: DeserializeOwned + Send + Sync;
    /// DTO built from a validated update payload.
    type Update: DeserializeOwned + Send + Sync;

    /// Human-readable entity name used in not-found errors.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Column list selected and returned by every query.
    const COLUMNS: &'static str;
    /// Column the path identifier is matched against.
    const ROUTE_KEY: &'static str = "id";

    fn store_rules() -> &'static RuleSet;

    fn update_rules() -> &'static RuleSet {
        Self::store_rules()
    }

    /// Identifier of a returned row.
    fn key(row: &Self::Row) -> DbId;

    /// Insert a new row on `conn`, returning it.
    async fn insert(conn: &mut PgConnection, input: &Self::Create)
        -> Result<Self::Row, sqlx::Error>;

    /// Apply `input` to a live row on `conn`.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    async fn apply_update(
        conn: &mut PgConnection,
        id: DbId,
        input: &Self::Update,
    ) -> Result<Option<Self::Row>, sqlx::Error>;

    /// Insert a new row outside any caller-managed transaction.
    async fn create(pool: &PgPool, input: &Self::Create) -> Result<Self::Row, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert(&mut *conn, input).await
    }

    /// Update a live row outside any caller-managed transaction.
    async fn update(
        pool: &PgPool,
        id: DbId,
        input: &Self::Update,
    ) -> Result<Option<Self::Row>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::apply_update(&mut *conn, id, input).await
    }

    /// List rows in creation order. Soft-deleted rows are included only
    /// when `with_deleted` is set.
    async fn list(pool: &PgPool, with_deleted: bool) -> Result<Vec<Self::Row>, sqlx::Error> {
        let filter = if with_deleted {
            ""
        } else {
            "WHERE deleted_at IS NULL"
        };
        let query = format!(
            "SELECT {} FROM {} {filter} ORDER BY created_at, id",
            Self::COLUMNS,
            Self::TABLE
        );
        sqlx::query_as::<_, Self::Row>(&query).fetch_all(pool).await
    }

    /// Find a row by its identifier. Excludes soft-deleted rows.
    async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Self::Row>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 AND deleted_at IS NULL",
            Self::COLUMNS,
            Self::TABLE,
            Self::ROUTE_KEY
        );
        sqlx::query_as::<_, Self::Row>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a row by its identifier, including soft-deleted rows.
    async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Self::Row>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            Self::COLUMNS,
            Self::TABLE,
            Self::ROUTE_KEY
        );
        sqlx::query_as::<_, Self::Row>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a row. Returns `true` if a row was marked deleted.
    async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET deleted_at = NOW() WHERE {} = $1 AND deleted_at IS NULL",
            Self::TABLE,
            Self::ROUTE_KEY
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted row. Returns `true` if a row was restored.
    async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET deleted_at = NULL WHERE {} = $1 AND deleted_at IS NOT NULL",
            Self::TABLE,
            Self::ROUTE_KEY
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a row. Returns `true` if a row was removed.
    async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE {} = $1", Self::TABLE, Self::ROUTE_KEY);
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
