//! Handlers for the `/sections` resource.
//!
//! Every successful mutation re-syncs the owning story's mirror.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_SECTION_LIMIT, MAX_LIMIT};
use folio_core::types::DbId;
use folio_db::models::section::{NewSection, Section, UpdateSection};
use folio_db::repositories::SectionRepo;

use crate::error::{AppError, AppResult};
use crate::mirror::sync_story;
use crate::query::{SectionListParams, StoryIdParams};
use crate::state::AppState;

/// GET /api/v1/sections
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SectionListParams>,
) -> AppResult<Json<Vec<Section>>> {
    let limit = clamp_limit(params.limit, DEFAULT_SECTION_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let sections = SectionRepo::list(&state.pool, params.story_id, offset, limit).await?;
    Ok(Json(sections))
}

/// POST /api/v1/sections?story_id={id}
pub async fn create(
    State(state): State<AppState>,
    Query(params): Query<StoryIdParams>,
    Json(input): Json<NewSection>,
) -> AppResult<(StatusCode, Json<Section>)> {
    if input.section_type.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Section type must not be empty".into(),
        )));
    }
    let section = SectionRepo::create(&state.pool, params.story_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id: params.story_id,
        }))?;
    sync_story(&state, section.story_id).await;
    Ok((StatusCode::CREATED, Json(section)))
}

/// GET /api/v1/sections/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Section>> {
    let section = SectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id,
        }))?;
    Ok(Json(section))
}

/// PATCH /api/v1/sections/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSection>,
) -> AppResult<Json<Section>> {
    let section = SectionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id,
        }))?;
    sync_story(&state, section.story_id).await;
    Ok(Json(section))
}

/// DELETE /api/v1/sections/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let story_id = SectionRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id,
        }))?;
    sync_story(&state, story_id).await;
    Ok(StatusCode::NO_CONTENT)
}
