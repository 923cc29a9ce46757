//! Route definitions for `/import`.

use axum::routing::post;
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Routes mounted at `/import`.
///
/// ```text
/// POST   /story             -> posts_per_section   (?frontend_root=)
/// POST   /story-merged      -> merged              (?frontend_root=)
/// POST   /story-upload      -> story_upload        (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/story", post(import::posts_per_section))
        .route("/story-merged", post(import::merged))
        .route("/story-upload", post(import::story_upload))
}
