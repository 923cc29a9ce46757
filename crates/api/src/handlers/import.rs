//! Handlers for `/import`: converting a story document into stories or posts.

use std::path::PathBuf;

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::import::{self, ImportedStory};
use folio_db::models::post::{CreatePost, PostWithMedia};
use folio_db::models::story::{CreateStory, StoryWithSections};
use folio_db::repositories::{PostRepo, StoryRepo};

use crate::config::STORY_JSON_FILE;
use crate::error::{AppError, AppResult};
use crate::mirror::sync_story;
use crate::query::ImportParams;
use crate::state::AppState;

/// POST /api/v1/import/story
///
/// Creates one post per section of the `story.json` found in
/// `frontend_root` (or the configured import root).
pub async fn posts_per_section(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
) -> AppResult<(StatusCode, Json<Vec<PostWithMedia>>)> {
    let document = read_story_json(&state, params.frontend_root).await?;
    let drafts = import::posts_per_section(&document)?;

    let mut posts = Vec::with_capacity(drafts.len());
    for draft in drafts {
        posts.push(PostRepo::create(&state.pool, &CreatePost::from(draft)).await?);
    }
    tracing::info!(count = posts.len(), "Imported story sections as posts");
    Ok((StatusCode::CREATED, Json(posts)))
}

/// POST /api/v1/import/story-merged
///
/// Folds the whole document into a single post.
pub async fn merged(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
) -> AppResult<(StatusCode, Json<PostWithMedia>)> {
    let document = read_story_json(&state, params.frontend_root).await?;
    let draft = import::merged_post(&document)?;
    let post = PostRepo::create(&state.pool, &CreatePost::from(draft)).await?;
    tracing::info!(post_id = post.post.id, media = post.media.len(), "Imported merged story post");
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/v1/import/story-upload
///
/// Accepts a multipart form with a required `file` field holding a story
/// document and stores it as a new story.
pub async fn story_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoryWithSections>)> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some(data.to_vec());
        }
    }

    let data =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let imported = ImportedStory::from_slice(&data)?;

    let created = StoryRepo::create(&state.pool, &CreateStory::from(imported)).await?;
    tracing::info!(
        story_id = created.story.id,
        sections = created.sections.len(),
        "Imported uploaded story"
    );
    sync_story(&state, created.story.id).await;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Read and parse `story.json` from an import directory.
async fn read_story_json(
    state: &AppState,
    frontend_root: Option<String>,
) -> AppResult<serde_json::Value> {
    let root = frontend_root
        .filter(|r| !r.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state.content.import_root.clone());
    let path = root.join(STORY_JSON_FILE);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "{STORY_JSON_FILE} not found at {}",
                path.display()
            )));
        }
        Err(e) => {
            return Err(AppError::InternalError(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Core(CoreError::Validation(format!("Invalid JSON: {e}"))))
}
