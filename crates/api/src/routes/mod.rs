pub mod health;
pub mod import;
pub mod post;
pub mod section;
pub mod story;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /story                                  current story document (?version=)
/// /story/publish                          publish the current story (POST)
///
/// /stories                                list, create
/// /stories/{id}                           get (?version=), update, delete
/// /stories/{id}/publish                   publish (POST)
/// /stories/{id}/versions                  version history (GET)
///
/// /sections                               list (?story_id=), create (?story_id=)
/// /sections/{id}                          get, update / move, delete
///
/// /posts                                  list, create
/// /posts/{id}                             get, update (PUT/PATCH), delete
///
/// /import/story                           posts per section (POST)
/// /import/story-merged                    single merged post (POST)
/// /import/story-upload                    story from uploaded document (POST)
///
/// /upload                                 store a media file (POST, multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Current story and its publish shortcut.
        .nest("/story", story::current_router())
        // Stories by id, with versions.
        .nest("/stories", story::router())
        // Ordered story sections.
        .nest("/sections", section::router())
        // Legacy posts with media.
        .nest("/posts", post::router())
        // Story document importers.
        .nest("/import", import::router())
        // Media uploads.
        .route("/upload", post(handlers::upload::upload))
}
