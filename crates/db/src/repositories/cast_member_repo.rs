//! Repository for the `cast_members` table.

use async_trait::async_trait;
use catalog_core::types::{new_id, DbId};
use catalog_core::validation::RuleSet;
use sqlx::PgConnection;

use crate::models::cast_member::{
    CastMember, CreateCastMember, UpdateCastMember, CAST_MEMBER_RULES,
};
use crate::repositories::Resource;

const COLUMNS: &str = "id, name, type, created_at, updated_at, deleted_at";

/// Provides CRUD operations for cast members.
pub struct CastMemberRepo;

#[async_trait]
impl Resource for CastMemberRepo {
    type Row = CastMember;
    type Create = CreateCastMember;
    type Update = UpdateCastMember;

    const ENTITY: &'static str = "CastMember";
    const TABLE: &'static str = "cast_members";
    const COLUMNS: &'static str = COLUMNS;

    fn store_rules() -> &'static RuleSet {
        &CAST_MEMBER_RULES
    }

    fn key(row: &CastMember) -> DbId {
        row.id
    }

    async fn insert(
        conn: &mut PgConnection,
        input: &CreateCastMember,
    ) -> Result<CastMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO cast_members (id, name, type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastMember>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(input.member_type)
            .fetch_one(conn)
            .await
    }

    async fn apply_update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateCastMember,
    ) -> Result<Option<CastMember>, sqlx::Error> {
        let query = format!(
            "UPDATE cast_members SET
                name = COALESCE($2, name),
                type = COALESCE($3, type)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastMember>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.member_type)
            .fetch_optional(conn)
            .await
    }
}
