//! Existence lookups backing `exists:` validation rules.

use std::collections::BTreeSet;

use catalog_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

/// Resolves references from validated payloads against live rows.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Returns `true` if every value names a live row of `table.column`.
    ///
    /// Values that are not UUIDs can never match and fail the check.
    /// `table` and `column` must already be validated identifiers.
    pub async fn all_exist(
        pool: &PgPool,
        table: &str,
        column: &str,
        values: &[Value],
    ) -> Result<bool, sqlx::Error> {
        let mut ids = BTreeSet::new();
        for value in values {
            match value.as_str().and_then(|s| s.parse::<DbId>().ok()) {
                Some(id) => {
                    ids.insert(id);
                }
                None => return Ok(false),
            }
        }
        if ids.is_empty() {
            return Ok(true);
        }

        let ids: Vec<DbId> = ids.into_iter().collect();
        let query = format!(
            "SELECT COUNT(*) FROM {table} WHERE {column} = ANY($1) AND deleted_at IS NULL"
        );
        let (count,): (i64,) = sqlx::query_as(&query).bind(&ids).fetch_one(pool).await?;
        Ok(count == ids.len() as i64)
    }
}
