use std::sync::Arc;

use folio_core::mirror::StoryMirror;
use folio_core::upload::UploadPolicy;

use crate::config::{ContentConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Content locations (mirror file, media root, import directory).
    pub content: Arc<ContentConfig>,
    /// Static mirror of the latest story document.
    pub mirror: StoryMirror,
    /// Where uploads go and how they are addressed.
    pub uploads: Arc<UploadPolicy>,
}

impl AppState {
    /// Build state from configuration, wiring the mirror and upload policy
    /// to the configured content locations.
    pub fn new(pool: folio_db::DbPool, config: ServerConfig, content: ContentConfig) -> Self {
        let mirror = StoryMirror::local(content.story_json_path.clone());
        let uploads = UploadPolicy::new(
            content.media_root.clone(),
            &content.media_url_prefix,
            &content.media_base_url,
        );
        Self {
            pool,
            config: Arc::new(config),
            content: Arc::new(content),
            mirror,
            uploads: Arc::new(uploads),
        }
    }
}
