//! Handlers for `/story` (the current story) and `/stories`.
//!
//! Document reads return either the live assembled story or, with
//! `?version=N`, the frozen snapshot of that version.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIMIT};
use folio_core::story::{self, StoryDocument};
use folio_core::types::{DbId, Timestamp};
use folio_db::models::story::{CreateStory, Story, StoryWithSections, UpdateStory};
use folio_db::models::story_version::StoryVersionSummary;
use folio_db::repositories::{StoryRepo, StoryVersionRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::mirror::sync_story;
use crate::query::{PaginationParams, VersionParams};
use crate::state::AppState;

/// A story document as served to readers.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StoryBody {
    /// Live state, annotated with the latest published version if any.
    Live(StoryDocument),
    /// A stored snapshot, returned as published.
    Snapshot(serde_json::Value),
}

/// Response body of a publish.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub version_number: i32,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Current story
// ---------------------------------------------------------------------------

/// GET /api/v1/story
pub async fn get_current(
    State(state): State<AppState>,
    Query(params): Query<VersionParams>,
) -> AppResult<Json<StoryBody>> {
    let story = current_story(&state).await?;
    let body = story_body(&state, &story, params.version).await?;
    Ok(Json(body))
}

/// POST /api/v1/story/publish
pub async fn publish_current(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<PublishResponse>)> {
    let story = current_story(&state).await?;
    publish_story(&state, story.id).await
}

// ---------------------------------------------------------------------------
// Stories by id
// ---------------------------------------------------------------------------

/// GET /api/v1/stories
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Story>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let stories = StoryRepo::list(&state.pool, offset, limit).await?;
    Ok(Json(stories))
}

/// POST /api/v1/stories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStory>,
) -> AppResult<(StatusCode, Json<StoryWithSections>)> {
    let created = StoryRepo::create(&state.pool, &input).await?;
    sync_story(&state, created.story.id).await;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/stories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<VersionParams>,
) -> AppResult<Json<StoryBody>> {
    let story = find_story(&state, id).await?;
    let body = story_body(&state, &story, params.version).await?;
    Ok(Json(body))
}

/// PATCH /api/v1/stories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStory>,
) -> AppResult<Json<StoryBody>> {
    let story = StoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id,
        }))?;
    sync_story(&state, id).await;
    let body = story_body(&state, &story, None).await?;
    Ok(Json(body))
}

/// DELETE /api/v1/stories/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = StoryRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(story_id = id, "Story deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id,
        }))
    }
}

/// POST /api/v1/stories/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<PublishResponse>)> {
    publish_story(&state, id).await
}

/// GET /api/v1/stories/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<StoryVersionSummary>>> {
    find_story(&state, id).await?;
    let versions = StoryVersionRepo::list_by_story(&state.pool, id).await?;
    Ok(Json(versions))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn current_story(state: &AppState) -> AppResult<Story> {
    StoryRepo::find_current(&state.pool)
        .await?
        .ok_or(AppError::Core(CoreError::NoneFound { entity: "story" }))
}

async fn find_story(state: &AppState, id: DbId) -> AppResult<Story> {
    StoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id,
        }))
}

/// Live document or the requested snapshot for `story`.
async fn story_body(state: &AppState, story: &Story, version: Option<i32>) -> AppResult<StoryBody> {
    if let Some(version_number) = version {
        let snapshot = StoryVersionRepo::find(&state.pool, story.id, Some(version_number))
            .await?
            .ok_or(AppError::Core(CoreError::VersionNotFound {
                story_id: story.id,
                version_number,
            }))?;
        let payload = story::read_snapshot(&snapshot.payload, snapshot.version_number)?;
        return Ok(StoryBody::Snapshot(payload));
    }

    let document = StoryVersionRepo::live_document(&state.pool, story.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id: story.id,
        }))?;
    Ok(StoryBody::Live(document))
}

async fn publish_story(
    state: &AppState,
    story_id: DbId,
) -> AppResult<(StatusCode, Json<PublishResponse>)> {
    let version = StoryVersionRepo::publish(&state.pool, story_id)
        .await
        .map_err(version_conflict)?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id: story_id,
        }))?;
    Ok((
        StatusCode::CREATED,
        Json(PublishResponse {
            version_number: version.version_number,
            created_at: version.created_at,
        }),
    ))
}

/// A duplicate version number means another publish won the race.
fn version_conflict(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::Core(CoreError::Conflict(
                "Another publish of this story completed first; retry".into(),
            ))
        }
        _ => AppError::Database(err),
    }
}
