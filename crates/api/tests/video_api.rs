//! HTTP-level integration tests for `/api/v1/videos`, plus the transactional
//! behaviour of the relational handler.

mod common;

use assert_matches::assert_matches;
use async_trait::async_trait;
use axum::http::StatusCode;
use catalog_api::crud::{RelationSync, RelationalHandler};
use catalog_api::error::{AppError, AppResult};
use catalog_api::handlers::video::VideoRelationSync;
use catalog_core::types::DbId;
use catalog_db::models::video::VideoRelations;
use catalog_db::repositories::{Resource, VideoRepo};
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::{json, Map, Value};
use sqlx::{PgConnection, PgPool};

const BASE: &str = "/api/v1/videos";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed(pool: &PgPool, uri: &str, name: &str) -> String {
    let response = post_json(build_test_app(pool.clone()), uri, json!({"name": name})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

async fn seed_category(pool: &PgPool) -> String {
    seed(pool, "/api/v1/categories", "category").await
}

async fn seed_genre(pool: &PgPool) -> String {
    seed(pool, "/api/v1/genres", "genre").await
}

fn payload(categories: &[&String], genres: &[&String]) -> Value {
    json!({
        "title": "title",
        "description": "description",
        "year_launched": 2010,
        "rating": "L",
        "duration": 90,
        "categories_id": categories,
        "genres_id": genres,
    })
}

async fn video_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM videos")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

fn sorted(ids: Vec<DbId>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    ids.sort();
    ids
}

fn sorted_strs(ids: &[&String]) -> Vec<String> {
    let mut ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
    ids.sort();
    ids
}

/// Associates the video, then links a category that does not exist.
struct FailingSync;

#[async_trait]
impl RelationSync<VideoRepo> for FailingSync {
    async fn sync(
        &self,
        conn: &mut PgConnection,
        id: DbId,
        validated: &Map<String, Value>,
    ) -> AppResult<()> {
        VideoRelationSync.sync(conn, id, validated).await?;
        let dangling = VideoRelations {
            categories_id: vec![uuid::Uuid::new_v4()],
            genres_id: Vec::new(),
        };
        VideoRepo::sync_relations(conn, id, &dangling).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_relations(pool: PgPool) {
    let category = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;

    let response = post_json(
        build_test_app(pool.clone()),
        BASE,
        payload(&[&category], &[&genre]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["title"], "title");
    assert_eq!(json["year_launched"], 2010);
    assert_eq!(json["opened"], false);
    assert_eq!(json["rating"], "L");
    assert_eq!(json["duration"], 90);
    assert!(json.get("categories_id").is_none());

    let id: DbId = json["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(
        sorted(VideoRepo::category_ids(&pool, id).await.unwrap()),
        vec![category]
    );
    assert_eq!(sorted(VideoRepo::genre_ids(&pool, id).await.unwrap()), vec![genre]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_coerces_year_and_rating(pool: PgPool) {
    let category = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;

    let mut body = payload(&[&category], &[&genre]);
    body["year_launched"] = json!("1999");
    body["rating"] = json!(14);
    body["opened"] = json!("1");

    let response = post_json(build_test_app(pool), BASE, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["year_launched"], 1999);
    assert_eq!(json["rating"], "14");
    assert_eq!(json["opened"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_validation_messages(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        BASE,
        json!({
            "title": "t",
            "description": "d",
            "year_launched": "20",
            "rating": "0",
            "duration": "long",
            "categories_id": "a",
            "genres_id": [],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let errors = &body_json(response).await["errors"];
    assert_eq!(
        errors["year_launched"],
        json!(["The year launched does not match the format Y."])
    );
    assert_eq!(errors["rating"], json!(["The selected rating is invalid."]));
    assert_eq!(errors["duration"], json!(["The duration must be an integer."]));
    assert_eq!(
        errors["categories_id"],
        json!([
            "The categories id must be an array.",
            "The selected categories id is invalid."
        ])
    );
    assert_eq!(errors["genres_id"], json!(["The genres id field is required."]));
    assert_eq!(video_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_duration_outside_column_range(pool: PgPool) {
    let category = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;

    let mut body = payload(&[&category], &[&genre]);
    body["duration"] = json!(3_000_000_000_i64);
    let response = post_json(build_test_app(pool.clone()), BASE, body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["errors"]["duration"],
        json!(["The duration may not be greater than 2147483647."])
    );

    let mut body = payload(&[&category], &[&genre]);
    body["duration"] = json!(-3_000_000_000_i64);
    let response = post_json(build_test_app(pool.clone()), BASE, body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(video_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_unknown_and_deleted_references(pool: PgPool) {
    let category = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;
    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/genres/{genre}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let unknown = uuid::Uuid::new_v4().to_string();
    let response = post_json(
        build_test_app(pool.clone()),
        BASE,
        payload(&[&category, &unknown], &[&genre]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let errors = &body_json(response).await["errors"];
    assert_eq!(
        errors["categories_id"],
        json!(["The selected categories id is invalid."])
    );
    assert_eq!(errors["genres_id"], json!(["The selected genres id is invalid."]));
    assert_eq!(video_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failing_sync_rolls_back_create(pool: PgPool) {
    let category = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;

    let handler = RelationalHandler::<VideoRepo, _>::new(FailingSync);
    let result = handler
        .create(&pool, payload(&[&category], &[&genre]))
        .await;
    assert_matches!(result, Err(AppError::Database(_)));

    assert_eq!(video_count(&pool).await, 0, "no orphan video row should remain");
    let (links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM category_video")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_relations(pool: PgPool) {
    let c1 = seed_category(&pool).await;
    let c2 = seed_category(&pool).await;
    let c3 = seed_category(&pool).await;
    let g1 = seed_genre(&pool).await;
    let g2 = seed_genre(&pool).await;

    let created = body_json(
        post_json(build_test_app(pool.clone()), BASE, payload(&[&c1, &c2], &[&g1])).await,
    )
    .await;
    let id_str = created["id"].as_str().unwrap();
    let id: DbId = id_str.parse().unwrap();

    let mut body = payload(&[&c2, &c3], &[&g2]);
    body["title"] = json!("renamed");
    let response = put_json(build_test_app(pool.clone()), &format!("{BASE}/{id_str}"), body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "renamed");

    assert_eq!(
        sorted(VideoRepo::category_ids(&pool, id).await.unwrap()),
        sorted_strs(&[&c2, &c3])
    );
    assert_eq!(
        sorted(VideoRepo::genre_ids(&pool, id).await.unwrap()),
        vec![g2]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_requires_relation_keys(pool: PgPool) {
    let category = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;
    let created = body_json(
        post_json(build_test_app(pool.clone()), BASE, payload(&[&category], &[&genre])).await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("{BASE}/{id}"),
        json!({"title": "only title"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let errors = &body_json(response).await["errors"];
    assert_eq!(
        errors["categories_id"],
        json!(["The categories id field is required."])
    );

    let read = body_json(get(build_test_app(pool), &format!("{BASE}/{id}")).await).await;
    assert_eq!(read["title"], "title", "invalid update must not change the row");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failing_sync_rolls_back_update(pool: PgPool) {
    let c1 = seed_category(&pool).await;
    let c2 = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;

    let created = body_json(
        post_json(build_test_app(pool.clone()), BASE, payload(&[&c1], &[&genre])).await,
    )
    .await;
    let id_str = created["id"].as_str().unwrap();
    let id: DbId = id_str.parse().unwrap();

    let mut body = payload(&[&c2], &[&genre]);
    body["title"] = json!("never stored");
    let handler = RelationalHandler::<VideoRepo, _>::new(FailingSync);
    let result = handler.update(&pool, id_str, body).await;
    assert_matches!(result, Err(AppError::Database(_)));

    let video = VideoRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(video.title, "title");
    assert_eq!(
        sorted(VideoRepo::category_ids(&pool, id).await.unwrap()),
        vec![c1]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_unknown_video_is_404(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        &format!("{BASE}/{}", uuid::Uuid::new_v4()),
        payload(&[], &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_keeps_relations_until_purge(pool: PgPool) {
    let category = seed_category(&pool).await;
    let genre = seed_genre(&pool).await;
    let created = body_json(
        post_json(build_test_app(pool.clone()), BASE, payload(&[&category], &[&genre])).await,
    )
    .await;
    let id_str = created["id"].as_str().unwrap();
    let id: DbId = id_str.parse().unwrap();

    let response = delete(build_test_app(pool.clone()), &format!("{BASE}/{id_str}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool.clone()), &format!("{BASE}/{id_str}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let relations = VideoRelations {
        categories_id: VideoRepo::category_ids(&pool, id).await.unwrap(),
        genres_id: VideoRepo::genre_ids(&pool, id).await.unwrap(),
    };
    assert_eq!(relations.categories_id.len(), 1);
    assert_eq!(relations.genres_id.len(), 1);
}
