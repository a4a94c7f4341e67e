//! Route table shared by the plain resources.

use axum::routing::get;
use axum::Router;
use catalog_db::repositories::Resource;

use crate::handlers::resource;
use crate::state::AppState;

/// Routes mounted at `/{resource}`.
///
/// ```text
/// GET    /        -> list       (?with_deleted=true)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id  (?with_deleted=true)
/// PUT    /{id}    -> update
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(resource::list::<R>).post(resource::create::<R>))
        .route(
            "/{id}",
            get(resource::get_by_id::<R>)
                .put(resource::update::<R>)
                .patch(resource::update::<R>)
                .delete(resource::delete::<R>),
        )
}
