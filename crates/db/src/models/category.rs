//! Category entity model, DTOs, and rule set.

use std::sync::LazyLock;

use catalog_core::serde_helpers::deserialize_some;
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::RuleSet;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Validation rules shared by create and update.
pub static CATEGORY_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::parse(&[
        ("name", "required|string|max:255"),
        ("description", "nullable|string"),
        ("is_active", "boolean"),
    ])
    .expect("valid category rules")
});

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
}

/// DTO for updating an existing category.
///
/// `description` distinguishes "not sent" (`None`) from "sent as null"
/// (`Some(None)`), so it can be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}
