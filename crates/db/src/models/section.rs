//! Section entity model and DTOs.
//!
//! Sections serialize with camelCase keys (`storyId`, `sortOrder`) to match
//! the renderer's resource shape; input DTOs also accept `sort_order`.

use folio_core::story::SectionView;
use folio_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: DbId,
    pub story_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub section_type: String,
    pub sort_order: i32,
    /// JSON-encoded section payload.
    pub data: Option<String>,
}

impl Section {
    pub fn view(&self) -> SectionView<'_> {
        SectionView {
            section_type: &self.section_type,
            data: self.data.as_deref(),
        }
    }
}

/// A section to insert. `sort_order` is the requested position; any integer
/// is accepted and clamped into the story's range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    #[serde(rename = "type")]
    pub section_type: String,
    pub data: Option<String>,
    #[serde(default, alias = "sort_order")]
    pub sort_order: Option<i64>,
}

/// DTO for updating a section. Supplying `sort_order` moves the section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSection {
    #[serde(default, rename = "type")]
    pub section_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, alias = "sort_order")]
    pub sort_order: Option<i64>,
}
