//! Repository for cross-table trash operations.
//!
//! Provides a unified view of soft-deleted rows across the catalog tables,
//! plus single-item and bulk purge (hard delete).

use catalog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::PgPool;

/// Entity types that support soft-delete, in purge order.
pub const KNOWN_ENTITY_TYPES: &[&str] = &["videos", "cast_members", "genres", "categories"];

/// A single soft-deleted item surfaced in the trash list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TrashedItem {
    pub id: DbId,
    pub entity_type: String,
    pub name_or_label: Option<String>,
    pub deleted_at: Timestamp,
}

/// Summary returned by [`TrashRepo::list_trashed`].
#[derive(Debug, Clone, Serialize)]
pub struct TrashSummary {
    pub items: Vec<TrashedItem>,
    pub total_count: i64,
}

/// Returns `true` if `entity_type` is one of the known types.
pub fn is_known_entity_type(entity_type: &str) -> bool {
    KNOWN_ENTITY_TYPES.contains(&entity_type)
}

/// Provides cross-table trash operations.
pub struct TrashRepo;

impl TrashRepo {
    /// List soft-deleted items, newest deletion first.
    ///
    /// When `entity_type` is `Some`, only that table is queried. Callers
    /// check the type with [`is_known_entity_type`] first.
    pub async fn list_trashed(
        pool: &PgPool,
        entity_type: Option<&str>,
    ) -> Result<TrashSummary, sqlx::Error> {
        let selects: Vec<String> = match entity_type {
            Some(et) => vec![trashed_select(et)],
            None => KNOWN_ENTITY_TYPES.iter().map(|et| trashed_select(et)).collect(),
        };
        let sql = format!("{} ORDER BY deleted_at DESC, id", selects.join(" UNION ALL "));
        let items = sqlx::query_as::<_, TrashedItem>(&sql).fetch_all(pool).await?;
        let total_count = items.len() as i64;
        Ok(TrashSummary { items, total_count })
    }

    /// Hard-delete every soft-deleted row across the catalog tables.
    ///
    /// Association rows of purged videos go with them through the
    /// junction tables' cascading foreign keys.
    pub async fn purge_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut total: u64 = 0;
        for table in KNOWN_ENTITY_TYPES {
            let sql = format!("DELETE FROM {table} WHERE deleted_at IS NOT NULL");
            let result = sqlx::query(&sql).execute(&mut *tx).await?;
            total += result.rows_affected();
        }
        tx.commit().await?;
        Ok(total)
    }

    /// Hard-delete a single soft-deleted row.
    ///
    /// Returns `true` if a row was removed, `false` if no matching
    /// soft-deleted row exists.
    pub async fn purge_one(
        pool: &PgPool,
        entity_type: &str,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let table = table_and_name_expr(entity_type).0;
        let sql = format!("DELETE FROM {table} WHERE id = $1 AND deleted_at IS NOT NULL");
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn trashed_select(entity_type: &str) -> String {
    let (table, name_expr) = table_and_name_expr(entity_type);
    format!(
        "SELECT id, '{table}' AS entity_type, {name_expr} AS name_or_label, \
         deleted_at FROM {table} WHERE deleted_at IS NOT NULL"
    )
}

/// Map an entity type to its table and the SQL expression that yields a
/// human-readable label.
fn table_and_name_expr(entity_type: &str) -> (&'static str, &'static str) {
    match entity_type {
        "videos" => ("videos", "title"),
        "cast_members" => ("cast_members", "name"),
        "genres" => ("genres", "name"),
        // Unreachable when callers validate entity_type first
        _ => ("categories", "name"),
    }
}
