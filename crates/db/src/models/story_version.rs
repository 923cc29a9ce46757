//! Story version model.
//!
//! Versions are immutable snapshots of the assembled story document, created
//! on every publish.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `story_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryVersion {
    pub id: DbId,
    pub story_id: DbId,
    pub version_number: i32,
    /// JSON text of the document at publish time, `versionNumber` included.
    pub payload: String,
    pub created_at: Timestamp,
}

/// A version without its payload, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryVersionSummary {
    pub id: DbId,
    pub version_number: i32,
    pub created_at: Timestamp,
}
