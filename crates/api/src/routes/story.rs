//! Route definitions for `/story` and `/stories`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::story;
use crate::state::AppState;

/// Routes mounted at `/story` (the current story).
///
/// ```text
/// GET    /              -> get_current      (?version=N)
/// POST   /publish       -> publish_current
/// ```
pub fn current_router() -> Router<AppState> {
    Router::new()
        .route("/", get(story::get_current))
        .route("/publish", post(story::publish_current))
}

/// Routes mounted at `/stories`.
///
/// ```text
/// GET    /                  -> list            (?offset=&limit=)
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id       (?version=N)
/// PATCH  /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/publish      -> publish
/// GET    /{id}/versions     -> list_versions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(story::list).post(story::create))
        .route(
            "/{id}",
            get(story::get_by_id)
                .patch(story::update)
                .delete(story::delete),
        )
        .route("/{id}/publish", post(story::publish))
        .route("/{id}/versions", get(story::list_versions))
}
