//! Route definitions for the `/sections` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::section;
use crate::state::AppState;

/// Routes mounted at `/sections`.
///
/// ```text
/// GET    /          -> list        (?story_id=&offset=&limit=)
/// POST   /          -> create      (?story_id=)
/// GET    /{id}      -> get_by_id
/// PATCH  /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(section::list).post(section::create))
        .route(
            "/{id}",
            get(section::get_by_id)
                .patch(section::update)
                .delete(section::delete),
        )
}
