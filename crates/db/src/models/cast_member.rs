//! Cast member entity model, DTOs, and rule set.

use std::sync::LazyLock;

use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::RuleSet;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cast member type ID matching the SMALLINT `cast_members.type` column.
pub type CastMemberTypeId = i16;

/// Role a cast member plays in a video.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastMemberType {
    Director = 1,
    Actor = 2,
}

impl CastMemberType {
    pub const ALL: [CastMemberType; 2] = [CastMemberType::Director, CastMemberType::Actor];

    /// Return the database type ID.
    pub fn id(self) -> CastMemberTypeId {
        self as CastMemberTypeId
    }

    pub fn from_id(id: CastMemberTypeId) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

impl From<CastMemberType> for CastMemberTypeId {
    fn from(value: CastMemberType) -> Self {
        value as CastMemberTypeId
    }
}

pub static CAST_MEMBER_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    let allowed: Vec<String> = CastMemberType::ALL
        .iter()
        .map(|t| t.id().to_string())
        .collect();
    let type_rule = format!("required|integer|in:{}", allowed.join(","));
    RuleSet::parse(&[("name", "required|string|max:255"), ("type", &type_rule)])
        .expect("valid cast member rules")
});

/// A row from the `cast_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CastMember {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub member_type: CastMemberTypeId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCastMember {
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: CastMemberTypeId,
}

/// DTO for updating an existing cast member. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCastMember {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub member_type: Option<CastMemberTypeId>,
}
