//! Handlers for the legacy `/posts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::media::validate_media_kind;
use folio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIMIT};
use folio_core::types::DbId;
use folio_db::models::post::{CreateMedia, CreatePost, PostWithMedia, UpdatePost};
use folio_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/posts
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<PostWithMedia>)> {
    validate_media(&input.media)?;
    let post = PostRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/posts
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<PostWithMedia>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let posts = PostRepo::list(&state.pool, offset, limit).await?;
    Ok(Json(posts))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PostWithMedia>> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(post))
}

/// PUT or PATCH /api/v1/posts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<PostWithMedia>> {
    if let Some(media) = &input.media {
        validate_media(media)?;
    }
    let post = PostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(post))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if PostRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Post", id }))
    }
}

fn validate_media(media: &[CreateMedia]) -> Result<(), CoreError> {
    media.iter().try_for_each(|m| validate_media_kind(&m.kind))
}
