//! Video entity model, DTOs, and rule set.
//!
//! Videos own two many-to-many associations (categories and genres) stored
//! in the `category_video` and `genre_video` junction tables. Both id lists
//! are required on every write and replace the stored membership.

use std::sync::LazyLock;

use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::RuleSet;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Accepted content ratings.
pub const RATING_LIST: [&str; 6] = ["L", "10", "12", "14", "16", "18"];

pub static VIDEO_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    let rating_rule = format!("required|in:{}", RATING_LIST.join(","));
    // `duration` is an INTEGER column.
    let duration_rule = format!("required|integer|min:{}|max:{}", i32::MIN, i32::MAX);
    RuleSet::parse(&[
        ("title", "required|string|max:255"),
        ("description", "required|string"),
        ("year_launched", "required|date_format:Y"),
        ("opened", "boolean"),
        ("rating", &rating_rule),
        ("duration", &duration_rule),
        ("categories_id", "required|array|exists:categories,id"),
        ("genres_id", "required|array|exists:genres,id"),
    ])
    .expect("valid video rules")
});

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub year_launched: i16,
    pub opened: bool,
    pub rating: String,
    pub duration: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub title: String,
    pub description: String,
    pub year_launched: i16,
    /// Defaults to `false` if omitted.
    pub opened: Option<bool>,
    pub rating: String,
    pub duration: i32,
}

/// DTO for updating an existing video. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub year_launched: Option<i16>,
    pub opened: Option<bool>,
    pub rating: Option<String>,
    pub duration: Option<i32>,
}

/// Association id sets carried by a video write.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoRelations {
    pub categories_id: Vec<DbId>,
    pub genres_id: Vec<DbId>,
}
