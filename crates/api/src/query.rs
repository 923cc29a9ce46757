//! Shared query parameter types for API handlers.

use folio_core::types::DbId;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handlers via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?version=` selector for story reads.
#[derive(Debug, Deserialize)]
pub struct VersionParams {
    pub version: Option<i32>,
}

/// Section listing filter (`?story_id=&offset=&limit=`).
#[derive(Debug, Deserialize)]
pub struct SectionListParams {
    pub story_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Required owning story for section creation (`?story_id=`).
#[derive(Debug, Deserialize)]
pub struct StoryIdParams {
    pub story_id: DbId,
}

/// Directory holding the `story.json` to import (`?frontend_root=`).
#[derive(Debug, Deserialize)]
pub struct ImportParams {
    pub frontend_root: Option<String>,
}
