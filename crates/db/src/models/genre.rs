//! Genre entity model, DTOs, and rule set.

use std::sync::LazyLock;

use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::RuleSet;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub static GENRE_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::parse(&[("name", "required|string|max:255"), ("is_active", "boolean")])
        .expect("valid genre rules")
});

/// A row from the `genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new genre.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGenre {
    pub name: String,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating an existing genre. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGenre {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
