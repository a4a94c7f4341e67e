//! Route definitions for the `/videos` resource.

use axum::routing::get;
use axum::Router;
use catalog_db::repositories::VideoRepo;

use crate::handlers::{resource, video};
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// GET    /        -> list       (?with_deleted=true)
/// POST   /        -> create     (transactional, syncs associations)
/// GET    /{id}    -> get_by_id  (?with_deleted=true)
/// PUT    /{id}    -> update     (transactional, syncs associations)
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(resource::list::<VideoRepo>).post(video::create))
        .route(
            "/{id}",
            get(resource::get_by_id::<VideoRepo>)
                .put(video::update)
                .patch(video::update)
                .delete(resource::delete::<VideoRepo>),
        )
}
