pub mod health;
pub mod resource;
pub mod trash;
pub mod video;

use axum::Router;
use catalog_db::repositories::{CastMemberRepo, CategoryRepo, GenreRepo};

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /categories              generic CRUD
/// /genres                  generic CRUD
/// /cast-members            generic CRUD
/// /videos                  CRUD with category/genre association sync
/// /trash                   soft-deleted rows across all resources
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", resource::router::<CategoryRepo>())
        .nest("/genres", resource::router::<GenreRepo>())
        .nest("/cast-members", resource::router::<CastMemberRepo>())
        .nest("/videos", video::router())
        .nest("/trash", trash::router())
}
