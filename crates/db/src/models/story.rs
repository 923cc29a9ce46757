//! Story entity model and DTOs.

use folio_core::import::ImportedStory;
use folio_core::story::StoryHeader;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::section::{NewSection, Section};

/// A row from the `stories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub title: Option<String>,
    pub version: Option<String>,
    pub standfirst: Option<String>,
    pub theme_font: Option<String>,
    pub theme_primary_color: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Story {
    /// Borrowed view used by the document assembler.
    pub fn header(&self) -> StoryHeader<'_> {
        StoryHeader {
            id: self.id,
            title: self.title.as_deref(),
            version: self.version.as_deref(),
            standfirst: self.standfirst.as_deref(),
            theme_font: self.theme_font.as_deref(),
            theme_primary_color: self.theme_primary_color.as_deref(),
        }
    }
}

/// A story together with its sections in order.
#[derive(Debug, Clone, Serialize)]
pub struct StoryWithSections {
    #[serde(flatten)]
    pub story: Story,
    pub sections: Vec<Section>,
}

/// DTO for creating a story, optionally with its initial sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStory {
    pub title: Option<String>,
    pub version: Option<String>,
    pub standfirst: Option<String>,
    pub theme_font: Option<String>,
    pub theme_primary_color: Option<String>,
    #[serde(default)]
    pub sections: Vec<NewSection>,
}

impl From<ImportedStory> for CreateStory {
    fn from(story: ImportedStory) -> Self {
        Self {
            title: Some(story.title),
            version: Some(story.version),
            standfirst: Some(story.standfirst),
            theme_font: story.theme_font,
            theme_primary_color: story.theme_primary_color,
            sections: story
                .sections
                .into_iter()
                .map(|s| NewSection {
                    section_type: s.section_type,
                    data: Some(s.data),
                    sort_order: Some(i64::from(s.sort_order)),
                })
                .collect(),
        }
    }
}

/// DTO for updating a story. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStory {
    pub title: Option<String>,
    pub version: Option<String>,
    pub standfirst: Option<String>,
    pub theme_font: Option<String>,
    pub theme_primary_color: Option<String>,
}
